use std::collections::BTreeMap;
use std::fmt;

use chrono::Utc;

use crate::domain::utils::id::ProvisioningActivityId;
use crate::error::ActivityError;

/// Lifecycle phases of a provisioned node, in the order they are entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    Provisioning,
    Launching,
    Operating,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Status {
    Ok,
    Warn,
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentKind {
    Message,
    /// Carries the debug rendering of the failure.
    Exception { detail: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseExecutionAttachment {
    pub status: Status,
    pub title: String,
    pub kind: AttachmentKind,
}

impl PhaseExecutionAttachment {
    pub fn message(status: Status, title: impl Into<String>) -> Self {
        PhaseExecutionAttachment { status, title: title.into(), kind: AttachmentKind::Message }
    }

    pub fn exception<E: std::error::Error + fmt::Debug>(status: Status, error: &E) -> Self {
        PhaseExecutionAttachment { status, title: error.to_string(), kind: AttachmentKind::Exception { detail: format!("{:?}", error) } }
    }

    pub fn is_exception(&self) -> bool {
        matches!(self.kind, AttachmentKind::Exception { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseExecution {
    pub phase: Phase,
    /// Epoch milliseconds.
    pub started_at: i64,
    pub attachments: Vec<PhaseExecutionAttachment>,
}

/// Phase log of one node, keyed by its provisioning activity id.
#[derive(Debug, Clone)]
pub struct ProvisioningActivity {
    pub id: ProvisioningActivityId,
    executions: BTreeMap<Phase, PhaseExecution>,
}

impl ProvisioningActivity {
    /// New activity in the `Provisioning` phase.
    pub fn new(id: ProvisioningActivityId) -> Self {
        let mut activity = ProvisioningActivity { id, executions: BTreeMap::new() };
        activity.enter_if_not_already(Phase::Provisioning);
        activity
    }

    pub fn current_phase(&self) -> Phase {
        self.executions.keys().next_back().copied().unwrap_or(Phase::Provisioning)
    }

    pub fn is_completed(&self) -> bool {
        self.executions.contains_key(&Phase::Completed)
    }

    /// Enters `phase` unless the activity is already in it or past it.
    ///
    /// Returns whether the phase was entered.
    pub fn enter_if_not_already(&mut self, phase: Phase) -> bool {
        if self.executions.keys().next_back().is_some_and(|current| *current >= phase) {
            return false;
        }

        self.executions.insert(phase, PhaseExecution { phase, started_at: Utc::now().timestamp_millis(), attachments: Vec::new() });
        true
    }

    pub fn attach(&mut self, phase: Phase, attachment: PhaseExecutionAttachment) -> Result<(), ActivityError> {
        match self.executions.get_mut(&phase) {
            Some(execution) => {
                execution.attachments.push(attachment);
                Ok(())
            }
            None => Err(ActivityError::PhaseNotEntered { activity: self.id.to_string(), phase }),
        }
    }

    pub fn attachments(&self, phase: Phase) -> &[PhaseExecutionAttachment] {
        self.executions.get(&phase).map(|execution| execution.attachments.as_slice()).unwrap_or(&[])
    }
}
