//! Connection state machine for a channel.
//!
//! ```text
//! Idle -> Connecting -> Open -> Closed
//!              |          |
//!              |          +--> Erroring -> Closed
//!              +--> Erroring -> Closed
//!              +--> Closed            (close requested while connecting)
//! ```

use std::fmt;

use tokio::sync::watch;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ChannelState {
    #[default]
    Idle,
    Connecting,
    Open,
    Erroring,
    Closed,
}

impl ChannelState {
    /// Whether the machine allows moving from `self` to `next`.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Connecting)
                | (Self::Connecting, Self::Open | Self::Erroring | Self::Closed)
                | (Self::Open, Self::Erroring | Self::Closed)
                | (Self::Erroring, Self::Closed)
        )
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        self == Self::Closed
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::Open => "open",
            Self::Erroring => "erroring",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for ChannelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Apply `next` if the machine allows it. Returns the previous state on success.
pub(crate) fn advance(cell: &watch::Sender<ChannelState>, next: ChannelState) -> Option<ChannelState> {
    let mut previous = None;
    cell.send_if_modified(|current| {
        if current.can_transition_to(next) {
            previous = Some(*current);
            *current = next;
            true
        } else {
            false
        }
    });
    previous
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
