//! Signal classifier — the strict-priority cascade over a prepared series.
//!
//! One pass, ascending by bar index, over the classified window `[L, len - K)`.
//! For each bar the rules are tried in priority order and the first one that
//! returns a placement wins. Absorption rules place their tag on a later bar
//! and clear earlier occurrences of the same tag, so the pass is a stateful
//! scan over one shared [`TagBook`].

pub mod book;
pub mod config;
pub mod rule;
pub mod rules;

pub use book::TagBook;
pub use config::{
    AbsorptionParams, AggressiveParams, ClassifierConfig, FakeMoveParams, PoiParams, PorParams,
    WeakLegParams,
};
pub use rule::{Bias, Placement, ScanContext, SignalRule};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Range;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::{Series, Tag};
use crate::indicators::{precompute, Indicator};
use crate::params::ParamError;
use crate::signal_log::SignalRecord;

/// Soft failure: the series is too short for any bar to be classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("insufficient history: {bars} bars, need at least {required}")]
pub struct InsufficientHistory {
    pub bars: usize,
    pub required: usize,
}

pub struct Classifier {
    config: ClassifierConfig,
    rules: Vec<Box<dyn SignalRule>>,
}

impl Classifier {
    /// Build the standard twelve-rule cascade from a validated configuration.
    pub fn new(config: ClassifierConfig) -> Result<Self, ParamError> {
        config.validate()?;
        let rules = rules::standard_cascade(&config);
        Ok(Self { config, rules })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Rule names in priority order.
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Indices that receive a cascade decision: `[L, len - K)`.
    pub fn window(&self, len: usize) -> Range<usize> {
        let start = self.config.lookback;
        let end = len.saturating_sub(self.config.lookahead);
        start..end.max(start)
    }

    /// Tag every bar of `series`. Total over any prepared series.
    pub fn classify(&self, series: Series) -> TaggedSeries {
        let (tags, warning) = self.tag(&series);
        TaggedSeries {
            series,
            tags,
            warning,
        }
    }

    /// Run the pass and return the raw tag vector (one entry per bar).
    pub fn tag(&self, series: &Series) -> (Vec<Tag>, Option<InsufficientHistory>) {
        let mut book = TagBook::new(series.len());
        let window = self.window(series.len());

        if window.is_empty() {
            let warning = InsufficientHistory {
                bars: series.len(),
                required: self.config.min_bars(),
            };
            warn!(symbol = series.symbol(), %warning, "leaving series untagged");
            return (book.into_tags(), Some(warning));
        }

        let required: Vec<Box<dyn Indicator>> = self
            .rules
            .iter()
            .flat_map(|r| r.required_indicators())
            .collect();
        let indicators = precompute(series.bars(), &required);
        let ctx = ScanContext {
            series,
            indicators: &indicators,
            window_end: window.end,
        };

        for index in window.clone() {
            let placement = self
                .rules
                .iter()
                .filter(|rule| index >= rule.warmup_bars())
                .find_map(|rule| rule.evaluate(&ctx, index, &book));
            if let Some(placement) = placement {
                book.place(placement);
            }
        }

        debug!(
            symbol = series.symbol(),
            bars = series.len(),
            classified = window.len(),
            tagged = book.as_slice().iter().filter(|t| !t.is_none()).count(),
            "classification pass complete"
        );

        (book.into_tags(), None)
    }
}

/// Convenience: build a classifier from `config` and tag `series`.
pub fn classify(series: Series, config: &ClassifierConfig) -> Result<TaggedSeries, ParamError> {
    Ok(Classifier::new(config.clone())?.classify(series))
}

/// A series together with one tag per bar.
#[derive(Debug, Clone)]
pub struct TaggedSeries {
    series: Series,
    tags: Vec<Tag>,
    warning: Option<InsufficientHistory>,
}

impl TaggedSeries {
    pub fn series(&self) -> &Series {
        &self.series
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn tag(&self, index: usize) -> Tag {
        self.tags[index]
    }

    pub fn warning(&self) -> Option<&InsufficientHistory> {
        self.warning.as_ref()
    }

    /// Number of bars per non-NONE tag.
    pub fn counts(&self) -> BTreeMap<Tag, usize> {
        let mut counts = BTreeMap::new();
        for tag in self.tags.iter().filter(|t| !t.is_none()) {
            *counts.entry(*tag).or_insert(0) += 1;
        }
        counts
    }

    /// Signal log entries for every tagged bar, in date order.
    pub fn signals(&self) -> Vec<SignalRecord> {
        self.tags
            .iter()
            .enumerate()
            .filter(|(_, tag)| !tag.is_none())
            .map(|(index, tag)| {
                let bar = self.series.bar(index);
                SignalRecord {
                    symbol: self.series.symbol().to_string(),
                    index,
                    date: bar.date,
                    close: bar.close,
                    point_change: self.series.stat(index).point_change,
                    tag: *tag,
                }
            })
            .collect()
    }
}
