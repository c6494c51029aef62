//! The rule seam: one trait implemented by every rule family in the cascade.
//!
//! A rule receives the prepared series, the precomputed indicators and the
//! tag book as it stands before bar `i` is decided. It never mutates state;
//! it returns a [`Placement`] and the classifier applies it.

use super::book::TagBook;
use crate::domain::{Bar, BarStats, Series, Tag};
use crate::indicators::{Indicator, IndicatorValues};

/// Which side of the market a rule instance looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bias {
    Bullish,
    Bearish,
}

/// A tag to write at `index`, which may differ from the bar being evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub index: usize,
    pub tag: Tag,
    /// Clear every other bar holding `tag` before writing.
    pub exclusive: bool,
}

impl Placement {
    pub fn at(index: usize, tag: Tag) -> Self {
        Self {
            index,
            tag,
            exclusive: false,
        }
    }

    pub fn exclusive(index: usize, tag: Tag) -> Self {
        Self {
            index,
            tag,
            exclusive: true,
        }
    }
}

/// Read-only view of everything a rule may consult during a pass.
pub struct ScanContext<'a> {
    pub series: &'a Series,
    pub indicators: &'a IndicatorValues,
    /// Exclusive end of the classified window (len - K). Forward placements
    /// must land before it.
    pub window_end: usize,
}

impl<'a> ScanContext<'a> {
    pub fn bar(&self, index: usize) -> &'a Bar {
        self.series.bar(index)
    }

    pub fn stat(&self, index: usize) -> &'a BarStats {
        self.series.stat(index)
    }

    pub fn avg_volume(&self, index: usize) -> f64 {
        self.series.avg_volume_at(index)
    }

    /// Volume of bar `index` strictly above `mult` × baseline.
    pub fn volume_above(&self, index: usize, mult: f64) -> bool {
        self.bar(index).volume > self.avg_volume(index) * mult
    }

    /// Volume of bar `index` strictly below `mult` × baseline.
    pub fn volume_below(&self, index: usize, mult: f64) -> bool {
        self.bar(index).volume < self.avg_volume(index) * mult
    }
}

/// One step of the priority cascade.
pub trait SignalRule: Send + Sync {
    /// Human-readable name (e.g., "aggressive_buyers").
    fn name(&self) -> &str;

    /// Tag this rule writes when it matches.
    fn tag(&self) -> Tag;

    /// Lowest bar index this rule can evaluate.
    fn warmup_bars(&self) -> usize {
        1
    }

    /// Indicators the rule reads from `ScanContext::indicators`.
    fn required_indicators(&self) -> Vec<Box<dyn Indicator>> {
        Vec::new()
    }

    /// Decide bar `index`. `None` lets the cascade fall through to the next rule.
    fn evaluate(
        &self,
        ctx: &ScanContext<'_>,
        index: usize,
        book: &TagBook,
    ) -> Option<Placement>;
}
