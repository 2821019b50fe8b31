//! Simulation lifecycle states.

use std::fmt;

/// Lifecycle of a [`Flock`](crate::Flock).
///
/// ```text
/// Idle ──start──▶ Running ──pause──▶ Paused
///                    ▲                 │
///                    └─────resume──────┘
/// any non-stopped state ──stop──▶ Stopped (terminal)
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SimState {
    #[default]
    Idle,
    Running,
    Paused,
    Stopped,
}

impl SimState {
    #[inline]
    pub fn is_running(self) -> bool {
        self == SimState::Running
    }

    #[inline]
    pub fn is_stopped(self) -> bool {
        self == SimState::Stopped
    }
}

impl fmt::Display for SimState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SimState::Idle    => "idle",
            SimState::Running => "running",
            SimState::Paused  => "paused",
            SimState::Stopped => "stopped",
        })
    }
}
