//! Classifier configuration: one canonical set of thresholds.
//!
//! Every rule constant is configurable; the defaults below are the documented
//! canonical values.

use serde::{Deserialize, Serialize};

use crate::params::{check_fraction, check_multiplier, check_window, ParamError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// L: bars before this index are never tagged. Must be >= 1.
    pub lookback: usize,
    /// K: the last K bars are never tagged; also the absorption scan horizon.
    pub lookahead: usize,
    /// Trailing bars, current one included, inspected by the aggressive and
    /// fake-move duplicate guards.
    pub dedup_window: usize,
    pub aggressive: AggressiveParams,
    pub absorption: AbsorptionParams,
    pub por: PorParams,
    pub poi: PoiParams,
    pub weak_leg: WeakLegParams,
    pub fake_move: FakeMoveParams,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            lookback: 3,
            lookahead: 5,
            dedup_window: 4,
            aggressive: AggressiveParams::default(),
            absorption: AbsorptionParams::default(),
            por: PorParams::default(),
            poi: PoiParams::default(),
            weak_leg: WeakLegParams::default(),
            fake_move: FakeMoveParams::default(),
        }
    }
}

impl ClassifierConfig {
    /// Fewest bars for which at least one index is classified: L + K + 1.
    pub fn min_bars(&self) -> usize {
        self.lookback
            .saturating_add(self.lookahead)
            .saturating_add(1)
    }

    pub fn validate(&self) -> Result<(), ParamError> {
        check_window("classifier.lookback", self.lookback, 1)?;
        check_window("classifier.lookahead", self.lookahead, 1)?;
        check_window("classifier.dedup_window", self.dedup_window, 1)?;

        check_fraction(
            "classifier.aggressive.close_fraction",
            self.aggressive.close_fraction,
        )?;
        check_multiplier(
            "classifier.aggressive.volume_mult",
            self.aggressive.volume_mult,
        )?;
        check_multiplier(
            "classifier.absorption.volume_mult",
            self.absorption.volume_mult,
        )?;
        check_window("classifier.por.lookback", self.por.lookback, 1)?;
        check_window("classifier.por.dedup_window", self.por.dedup_window, 1)?;
        check_multiplier("classifier.por.volume_mult", self.por.volume_mult)?;
        check_fraction("classifier.poi.body_fraction", self.poi.body_fraction)?;
        check_multiplier("classifier.poi.volume_mult", self.poi.volume_mult)?;
        check_multiplier("classifier.weak_leg.body_ratio", self.weak_leg.body_ratio)?;
        check_multiplier("classifier.weak_leg.volume_mult", self.weak_leg.volume_mult)?;
        check_multiplier("classifier.fake_move.body_ratio", self.fake_move.body_ratio)?;
        check_multiplier(
            "classifier.fake_move.volume_mult",
            self.fake_move.volume_mult,
        )?;
        Ok(())
    }
}

/// Rules 1-2.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggressiveParams {
    /// Close must sit within this fraction of the range from the extreme.
    pub close_fraction: f64,
    pub volume_mult: f64,
}

impl Default for AggressiveParams {
    fn default() -> Self {
        Self {
            close_fraction: 0.1,
            volume_mult: 1.5,
        }
    }
}

/// Rules 3-4.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbsorptionParams {
    pub volume_mult: f64,
}

impl Default for AbsorptionParams {
    fn default() -> Self {
        Self { volume_mult: 1.2 }
    }
}

/// Rules 5-6.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PorParams {
    /// Preceding bars whose extreme must be broken.
    pub lookback: usize,
    pub volume_mult: f64,
    pub dedup_window: usize,
}

impl Default for PorParams {
    fn default() -> Self {
        Self {
            lookback: 10,
            volume_mult: 1.8,
            dedup_window: 3,
        }
    }
}

/// Rules 7-8.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoiParams {
    /// Body must exceed this fraction of the range.
    pub body_fraction: f64,
    pub volume_mult: f64,
}

impl Default for PoiParams {
    fn default() -> Self {
        Self {
            body_fraction: 0.7,
            volume_mult: 2.0,
        }
    }
}

/// Rules 9-10.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeakLegParams {
    /// Body must be below this multiple of the previous body.
    pub body_ratio: f64,
    /// Volume must be below this multiple of the baseline.
    pub volume_mult: f64,
}

impl Default for WeakLegParams {
    fn default() -> Self {
        Self {
            body_ratio: 0.3,
            volume_mult: 1.1,
        }
    }
}

/// Rules 11-12.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FakeMoveParams {
    /// Body must be at least this multiple of the previous body.
    pub body_ratio: f64,
    /// Volume must be below this multiple of the baseline.
    pub volume_mult: f64,
}

impl Default for FakeMoveParams {
    fn default() -> Self {
        Self {
            body_ratio: 0.3,
            volume_mult: 1.1,
        }
    }
}
