use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, PoisonError};

use crate::domain::activity::activity_store::ActivityHistoryStore;
use crate::domain::activity::provisioning_activity::{Phase, PhaseExecutionAttachment, Status};
use crate::domain::disposal::disposable::{Disposable, DisposalState, same_disposable};
use crate::domain::utils::id::ProvisioningActivityId;
use crate::error::DisposalError;
use crate::logger::LIFECYCLE_TARGET;

/// Wraps a disposal so that every failure it raises is also attached to the node's
/// provisioning activity. The failure itself is passed on unchanged.
pub struct RecordDisposal<D> {
    inner: D,
    provisioning_id: ProvisioningActivityId,
    activities: Arc<dyn ActivityHistoryStore>,
}

impl<D: Disposable + PartialEq> RecordDisposal<D> {
    pub fn new(inner: D, provisioning_id: ProvisioningActivityId, activities: Arc<dyn ActivityHistoryStore>) -> Self {
        RecordDisposal { inner, provisioning_id, activities }
    }

    fn record_failure(&self, error: &DisposalError) {
        // Activities are usually completed by now and no longer returned by the active lookup.
        let Some(handle) = self.activities.activity_including_completed(&self.provisioning_id) else {
            tracing::warn!(
                target: LIFECYCLE_TARGET,
                ProvisioningId = %self.provisioning_id,
                "No provisioning activity to record disposal failure: {}",
                error
            );
            return;
        };

        let mut activity = handle.write().unwrap_or_else(PoisonError::into_inner);
        if let Err(attach_error) = activity.attach(Phase::Completed, PhaseExecutionAttachment::exception(Status::Warn, error)) {
            tracing::warn!(
                target: LIFECYCLE_TARGET,
                ProvisioningId = %self.provisioning_id,
                "Unable to record disposal failure ({}): {}",
                attach_error,
                error
            );
        }
    }
}

impl<D: Disposable + PartialEq> Disposable for RecordDisposal<D> {
    fn dispose(&self) -> Result<DisposalState, DisposalError> {
        self.inner.dispose().inspect_err(|error| {
            tracing::warn!(
                target: LIFECYCLE_TARGET,
                ProvisioningId = %self.provisioning_id,
                Task = %self.inner.display_name(),
                "Disposal failed: {}",
                error
            );
            self.record_failure(error);
        })
    }

    fn display_name(&self) -> String {
        self.inner.display_name()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn Disposable) -> bool {
        same_disposable(self, other)
    }
}

impl<D: PartialEq> PartialEq for RecordDisposal<D> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner && self.provisioning_id == other.provisioning_id
    }
}

impl<D: Eq> Eq for RecordDisposal<D> {}

impl<D: Hash> Hash for RecordDisposal<D> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.hash(state);
        self.provisioning_id.hash(state);
    }
}

impl<D: fmt::Debug> fmt::Debug for RecordDisposal<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordDisposal").field("inner", &self.inner).field("provisioning_id", &self.provisioning_id).finish_non_exhaustive()
    }
}
