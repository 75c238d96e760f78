use std::fmt;

/// Why a node went offline for good, as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfflineCause {
    pub description: String,
}

impl OfflineCause {
    pub fn new(description: impl Into<String>) -> Self {
        OfflineCause { description: description.into() }
    }
}

impl fmt::Display for OfflineCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description)
    }
}

/// Live connection between the host and a node. Only exists while the node is connected.
pub trait ExecutionChannel: fmt::Debug + Send + Sync {
    /// `true` until the node has accepted its first task.
    fn is_new(&self) -> bool;

    fn fatal_offline_cause(&self) -> Option<OfflineCause>;
}
