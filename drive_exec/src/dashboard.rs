//! # Dashboard module
//!
//! The dashboard is the store of values the operator can change while the
//! robot runs: the controller gains and the tunable drive setpoint. Writers
//! (the input processor, or a network thread) go through [`TunableStore::set`],
//! which refuses values that would break the gains or setpoint invariants.
//! The scheduler takes one [`TunableStore::snapshot`] per cycle, so every task
//! in a cycle sees the same, latest values.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::{
    fmt,
    str::FromStr,
    sync::{Arc, PoisonError, RwLock},
};

use log::info;
use serde::Serialize;

use crate::ctrl_task::{self, ControlGains, GainsError, Setpoint, SetpointError};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The values the dashboard can change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TunableValues {
    /// Gains of the straight driving tasks.
    pub gains: ControlGains,

    /// Proportional gain of the turning task.
    pub turn_k_p: f64,

    /// Setpoint of the TunableGainDrive task.
    pub tunable_setpoint: Setpoint,
}

/// Shared handle to the dashboard values.
///
/// Clones refer to the same values.
#[derive(Debug, Clone)]
pub struct TunableStore {
    values: Arc<RwLock<TunableValues>>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Keys which can be written on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TunableKey {
    KP,
    TurnKP,
    KI,
    KD,
    KF,
    MinOutput,
    MaxOutput,
    Distance,
    Margin,
}

#[derive(Debug, thiserror::Error)]
pub enum TunableError {
    #[error("Unknown dashboard key \"{0}\"")]
    UnknownKey(String),

    #[error("Value for {0} must be finite, found {1}")]
    NonFinite(TunableKey, f64),

    #[error("Rejected gains: {0}")]
    InvalidGains(#[from] GainsError),

    #[error("Rejected setpoint: {0}")]
    InvalidSetpoint(#[from] SetpointError),

    #[error("Sync primitive is poisoned")]
    PoisonError,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TunableValues {
    /// Initial values from the control task parameters.
    pub fn from_params(params: &ctrl_task::Params) -> Self {
        Self {
            gains: params.gains,
            turn_k_p: params.turn_k_p,
            tunable_setpoint: params.tunable_setpoint,
        }
    }

    /// Gains of the turning task: the shared gains with the turn
    /// proportional gain.
    pub fn turn_gains(&self) -> ControlGains {
        ControlGains {
            k_p: self.turn_k_p,
            ..self.gains
        }
    }

    /// Get the current value of a key.
    pub fn get(&self, key: TunableKey) -> f64 {
        match key {
            TunableKey::KP => self.gains.k_p,
            TunableKey::TurnKP => self.turn_k_p,
            TunableKey::KI => self.gains.k_i,
            TunableKey::KD => self.gains.k_d,
            TunableKey::KF => self.gains.k_f,
            TunableKey::MinOutput => self.gains.min_output,
            TunableKey::MaxOutput => self.gains.max_output,
            TunableKey::Distance => self.tunable_setpoint.target_revs,
            TunableKey::Margin => self.tunable_setpoint.margin_revs,
        }
    }

    /// Return a copy with one value changed, or an error if the copy would be
    /// invalid.
    fn with(&self, key: TunableKey, value: f64) -> Result<Self, TunableError> {
        if !value.is_finite() {
            return Err(TunableError::NonFinite(key, value));
        }

        let mut new = *self;

        match key {
            TunableKey::KP => new.gains.k_p = value,
            TunableKey::TurnKP => new.turn_k_p = value,
            TunableKey::KI => new.gains.k_i = value,
            TunableKey::KD => new.gains.k_d = value,
            TunableKey::KF => new.gains.k_f = value,
            TunableKey::MinOutput => new.gains.min_output = value,
            TunableKey::MaxOutput => new.gains.max_output = value,
            TunableKey::Distance => new.tunable_setpoint.target_revs = value,
            TunableKey::Margin => new.tunable_setpoint.margin_revs = value,
        }

        new.gains.validate()?;
        new.tunable_setpoint.validate()?;

        Ok(new)
    }
}

impl TunableStore {
    pub fn new(initial: TunableValues) -> Self {
        Self {
            values: Arc::new(RwLock::new(initial)),
        }
    }

    /// Copy of the current values, to be used for a whole cycle.
    pub fn snapshot(&self) -> Result<TunableValues, TunableError> {
        Ok(*self.values.read()?)
    }

    /// Write a value by its dashboard key.
    ///
    /// If the key is unknown or the value is invalid the previous value is
    /// kept and an error returned.
    pub fn set(&self, key: &str, value: f64) -> Result<(), TunableError> {
        let key: TunableKey = key.parse()?;

        let mut values = self.values.write()?;
        let new = values.with(key, value)?;
        let old = values.get(key);
        *values = new;

        info!("Dashboard {} changed from {} to {}", key, old, value);

        Ok(())
    }
}

impl TunableKey {
    pub const ALL: [TunableKey; 9] = [
        TunableKey::KP,
        TunableKey::TurnKP,
        TunableKey::KI,
        TunableKey::KD,
        TunableKey::KF,
        TunableKey::MinOutput,
        TunableKey::MaxOutput,
        TunableKey::Distance,
        TunableKey::Margin,
    ];

    /// The key as shown on the dashboard.
    pub fn as_str(&self) -> &'static str {
        match self {
            TunableKey::KP => "kP",
            TunableKey::TurnKP => "turnkP",
            TunableKey::KI => "kI",
            TunableKey::KD => "kD",
            TunableKey::KF => "kF",
            TunableKey::MinOutput => "minOutput",
            TunableKey::MaxOutput => "maxOutput",
            TunableKey::Distance => "distance",
            TunableKey::Margin => "margin",
        }
    }
}

impl FromStr for TunableKey {
    type Err = TunableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TunableKey::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| TunableError::UnknownKey(String::from(s)))
    }
}

impl fmt::Display for TunableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl<G> From<PoisonError<G>> for TunableError {
    fn from(_: PoisonError<G>) -> Self {
        Self::PoisonError
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::ctrl_task::test_tunables;

    #[test]
    fn test_set_and_snapshot() {
        let store = TunableStore::new(test_tunables());
        let other = store.clone();

        other.set("kP", 0.02).unwrap();
        other.set("turnkP", 0.03).unwrap();
        other.set("distance", 40.0).unwrap();

        let v = store.snapshot().unwrap();
        assert_eq!(v.gains.k_p, 0.02);
        assert_eq!(v.turn_k_p, 0.03);
        assert_eq!(v.tunable_setpoint.target_revs, 40.0);

        let turn = v.turn_gains();
        assert_eq!(turn.k_p, 0.03);
        assert_eq!(turn.max_output, v.gains.max_output);
    }

    #[test]
    fn test_rejects_invalid() {
        let store = TunableStore::new(test_tunables());
        let before = store.snapshot().unwrap();

        assert!(matches!(
            store.set("kQ", 1.0),
            Err(TunableError::UnknownKey(ref k)) if k == "kQ"
        ));
        assert!(matches!(
            store.set("margin", -1.0),
            Err(TunableError::InvalidSetpoint(_))
        ));
        assert!(matches!(
            store.set("minOutput", 1.0 + 1e-3),
            Err(TunableError::InvalidGains(_))
        ));
        assert!(matches!(
            store.set("kD", f64::NAN),
            Err(TunableError::NonFinite(TunableKey::KD, _))
        ));

        // Ordering of the limits is checked against the current values
        store.set("maxOutput", 0.5).unwrap();
        assert!(store.set("minOutput", 0.6).is_err());
        store.set("minOutput", -0.5).unwrap();

        let after = store.snapshot().unwrap();
        assert_eq!(after.tunable_setpoint, before.tunable_setpoint);
        assert_eq!(after.gains.k_d, before.gains.k_d);
        assert_eq!(after.gains.min_output, -0.5);
        assert_eq!(after.gains.max_output, 0.5);
    }

    #[test]
    fn test_keys() {
        for &key in TunableKey::ALL.iter() {
            assert_eq!(key.as_str().parse::<TunableKey>().unwrap(), key);
            assert_eq!(test_tunables().with(key, 0.1).unwrap().get(key), 0.1);
        }
    }
}
