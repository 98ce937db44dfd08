/// Phase of a feeder run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayState {
    Idle,
    Discovering,
    Ingesting,
    Replaying,
    Draining,
    Stopped,
}

impl std::fmt::Display for ReplayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReplayState::Idle => write!(f, "idle"),
            ReplayState::Discovering => write!(f, "discovering"),
            ReplayState::Ingesting => write!(f, "ingesting"),
            ReplayState::Replaying => write!(f, "replaying"),
            ReplayState::Draining => write!(f, "draining"),
            ReplayState::Stopped => write!(f, "stopped"),
        }
    }
}
