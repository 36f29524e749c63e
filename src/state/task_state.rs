use std::fmt;

/// States of a single URL's fetch task
///
/// ```text
/// Pending -> Requesting -> Succeeded
///               |   ^
///               v   |
///             Retrying -> Exhausted (only with an attempt cap)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskState {
    /// Created, waiting for a worker slot
    Pending,

    /// Holding a worker slot and issuing (or waiting to issue) a request
    Requesting,

    /// Last attempt failed, sleeping before the next one
    Retrying,

    /// Got a 200 and stored its records
    Succeeded,

    /// Hit the configured attempt cap without a 200
    Exhausted,
}

impl TaskState {
    /// Returns true if the task will make no further requests
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Exhausted)
    }

    /// Returns true if the task occupies a worker slot in this state
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Requesting | Self::Retrying)
    }

    /// Returns true if `next` is a legal successor of this state
    pub fn can_transition_to(&self, next: TaskState) -> bool {
        use TaskState::*;
        matches!(
            (self, next),
            (Pending, Requesting)
                | (Requesting, Succeeded)
                | (Requesting, Retrying)
                | (Retrying, Requesting)
                | (Retrying, Exhausted)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Requesting => "requesting",
            Self::Retrying => "retrying",
            Self::Succeeded => "succeeded",
            Self::Exhausted => "exhausted",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
