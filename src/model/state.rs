// SPDX-License-Identifier: GPL-3.0-only
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppState {
    Unknown,
    Available,
    Installing,
    Installed,
    Updatable,
    Removing,
}

impl AppState {
    /// Installing and Removing only exist while a store call is in flight
    pub fn is_transient(self) -> bool {
        matches!(self, Self::Installing | Self::Removing)
    }

    pub fn can_transition_to(self, next: AppState) -> bool {
        use AppState::*;

        if self == next {
            return true;
        }
        match self {
            Unknown => true,
            Available => matches!(next, Installing | Installed | Updatable),
            Installed => matches!(next, Removing | Updatable | Available),
            Updatable => matches!(next, Installing | Removing | Installed | Available),
            Installing => matches!(next, Installed | Available | Updatable),
            Removing => matches!(next, Available | Installed | Updatable),
        }
    }
}

impl fmt::Display for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unknown => "unknown",
            Self::Available => "available",
            Self::Installing => "installing",
            Self::Installed => "installed",
            Self::Updatable => "updatable",
            Self::Removing => "removing",
        };
        f.write_str(name)
    }
}

/// Current state plus the last stable state to fall back to
#[derive(Debug, Clone, Copy)]
pub(crate) struct StateCell {
    current: AppState,
    last_stable: AppState,
}

impl StateCell {
    pub(crate) fn new(initial: AppState) -> Self {
        let last_stable = if initial.is_transient() { AppState::Unknown } else { initial };
        Self {
            current: initial,
            last_stable,
        }
    }

    pub(crate) fn current(&self) -> AppState {
        self.current
    }

    /// Returns false and leaves the state untouched if the transition is not allowed
    pub(crate) fn set(&mut self, next: AppState) -> bool {
        if !self.current.can_transition_to(next) {
            return false;
        }
        if !next.is_transient() {
            self.last_stable = next;
        }
        self.current = next;
        true
    }

    pub(crate) fn recover(&mut self) -> AppState {
        if self.current.is_transient() {
            self.current = self.last_stable;
        }
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_lifecycle() {
        let mut cell = StateCell::new(AppState::Available);
        assert!(cell.set(AppState::Installing));
        assert!(cell.set(AppState::Installed));
        assert_eq!(cell.current(), AppState::Installed);
    }

    #[test]
    fn test_update_lifecycle() {
        let mut cell = StateCell::new(AppState::Installed);
        assert!(cell.set(AppState::Updatable));
        assert!(cell.set(AppState::Installing));
        assert!(cell.set(AppState::Installed));
    }

    #[test]
    fn test_invalid_transition_is_rejected() {
        let mut cell = StateCell::new(AppState::Available);
        assert!(!cell.set(AppState::Removing));
        assert_eq!(cell.current(), AppState::Available);

        let mut cell = StateCell::new(AppState::Installed);
        assert!(!cell.set(AppState::Installing));
        assert_eq!(cell.current(), AppState::Installed);
    }

    #[test]
    fn test_recover_restores_last_stable_state() {
        let mut cell = StateCell::new(AppState::Updatable);
        cell.set(AppState::Installing);
        assert_eq!(cell.recover(), AppState::Updatable);

        let mut cell = StateCell::new(AppState::Installed);
        cell.set(AppState::Removing);
        assert_eq!(cell.recover(), AppState::Installed);
    }

    #[test]
    fn test_recover_is_noop_for_stable_state() {
        let mut cell = StateCell::new(AppState::Installed);
        assert_eq!(cell.recover(), AppState::Installed);
    }

    #[test]
    fn test_transient_flags() {
        assert!(AppState::Installing.is_transient());
        assert!(AppState::Removing.is_transient());
        assert!(!AppState::Installed.is_transient());
        assert!(!AppState::Updatable.is_transient());
    }
}
