//! Read-only view of the game economy consumed by the engine

use serde::{Deserialize, Serialize};

/// Kind of temporary production multiplier the economy can have active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrenzyKind {
    /// Global production multiplier
    Production,
    /// Click power multiplier
    Click,
    /// Single building type boosted
    Building,
    /// Production penalty (still animated, just differently)
    Elder,
}

/// Temporary multiplier state as reported by the economy
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FrenzyState {
    #[default]
    Inactive,
    Active {
        kind: FrenzyKind,
        /// Seconds left on the effect
        remaining: f64,
    },
}

impl FrenzyState {
    /// The active kind, if any. An effect with no time left counts as inactive.
    pub fn active_kind(&self) -> Option<FrenzyKind> {
        match *self {
            FrenzyState::Active { kind, remaining } if remaining > 0.0 => Some(kind),
            _ => None,
        }
    }
}

/// Snapshot polled from the economy collaborator
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EconomySnapshot {
    /// Effective production rate per second (non-negative in a healthy economy)
    pub production_rate: f64,
    pub frenzy: FrenzyState,
}

impl EconomySnapshot {
    pub fn new(production_rate: f64) -> Self {
        Self {
            production_rate,
            frenzy: FrenzyState::Inactive,
        }
    }

    pub fn with_frenzy(mut self, kind: FrenzyKind, remaining: f64) -> Self {
        self.frenzy = FrenzyState::Active { kind, remaining };
        self
    }

    /// Production rate sanitized for display and intensity math.
    /// Negative and NaN inputs read as zero; `+inf` saturates to `f64::MAX`.
    pub fn sanitized_rate(&self) -> f64 {
        if self.production_rate > 0.0 {
            self.production_rate.min(f64::MAX)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expired_frenzy_is_inactive() {
        let state = FrenzyState::Active {
            kind: FrenzyKind::Click,
            remaining: 0.0,
        };
        assert_eq!(state.active_kind(), None);
        assert_eq!(FrenzyState::Inactive.active_kind(), None);
    }

    #[test]
    fn sanitized_rate_rejects_garbage() {
        assert_eq!(EconomySnapshot::new(-5.0).sanitized_rate(), 0.0);
        assert_eq!(EconomySnapshot::new(f64::NAN).sanitized_rate(), 0.0);
        assert_eq!(EconomySnapshot::new(f64::INFINITY).sanitized_rate(), f64::MAX);
        assert_eq!(EconomySnapshot::new(12.5).sanitized_rate(), 12.5);
    }

    #[test]
    fn with_frenzy_sets_kind() {
        let snap = EconomySnapshot::new(1.0).with_frenzy(FrenzyKind::Production, 30.0);
        assert_eq!(snap.frenzy.active_kind(), Some(FrenzyKind::Production));
    }
}
