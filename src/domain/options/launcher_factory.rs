/// How the host connects to a started node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LauncherFactory {
    /// Host opens an SSH connection using the referenced credentials.
    Ssh { credentials_id: Option<String> },

    /// The node dials back to the host as a remote agent.
    Jnlp,
}
