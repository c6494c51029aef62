//! Signal log — the non-NONE rows of one or more tagged series.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::Tag;

/// One tagged bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRecord {
    pub symbol: String,
    /// Position of the bar in its series.
    pub index: usize,
    pub date: NaiveDate,
    pub close: f64,
    pub point_change: f64,
    pub tag: Tag,
}

impl SignalRecord {
    pub fn label(&self) -> &'static str {
        self.tag.label()
    }

    pub fn glyph(&self) -> &'static str {
        self.tag.glyph()
    }
}

/// Records dated on or after `latest - days`, newest first.
///
/// `latest` is the last date of the scanned data, not of the signals and not
/// today, so a quiet tail yields an empty digest. Ties on date are ordered by
/// symbol, then index.
pub fn recent_signals(records: &[SignalRecord], latest: NaiveDate, days: u32) -> Vec<SignalRecord> {
    let since = latest - Duration::days(i64::from(days));

    let mut recent: Vec<SignalRecord> = records
        .iter()
        .filter(|r| r.date >= since && !r.tag.is_none())
        .cloned()
        .collect();
    recent.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| a.symbol.cmp(&b.symbol))
            .then_with(|| a.index.cmp(&b.index))
    });
    recent
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn record(symbol: &str, day: u32, tag: Tag) -> SignalRecord {
        SignalRecord {
            symbol: symbol.to_string(),
            index: day as usize,
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            close: 100.0,
            point_change: 0.0,
            tag,
        }
    }

    fn march(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    #[test]
    fn empty_log_has_no_recent_signals() {
        assert!(recent_signals(&[], march(10), 7).is_empty());
    }

    #[test]
    fn cutoff_is_relative_to_latest_data_date() {
        let records = vec![
            record("AAA", 1, Tag::AggressiveBuy),
            record("AAA", 9, Tag::FakeDrop),
            record("BBB", 10, Tag::BullishPoi),
            record("BBB", 8, Tag::BearishPor),
        ];

        let recent = recent_signals(&records, march(10), 1);
        let days: Vec<u32> = recent.iter().map(|r| r.date.day()).collect();
        assert_eq!(days, vec![10, 9]);

        let recent = recent_signals(&records, march(10), 2);
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[2].tag, Tag::BearishPor);
    }

    #[test]
    fn quiet_tail_yields_empty_digest() {
        let records = vec![record("AAA", 1, Tag::FakeDrop)];
        assert!(recent_signals(&records, march(20), 1).is_empty());
        assert_eq!(recent_signals(&records, march(20), 19).len(), 1);
    }

    #[test]
    fn same_day_ties_sort_by_symbol() {
        let records = vec![
            record("ZZZ", 5, Tag::FakeRise),
            record("AAA", 5, Tag::FakeDrop),
        ];
        let recent = recent_signals(&records, march(5), 0);
        assert_eq!(recent[0].symbol, "AAA");
        assert_eq!(recent[1].symbol, "ZZZ");
    }

    #[test]
    fn none_tags_are_skipped() {
        let records = vec![record("AAA", 5, Tag::None), record("AAA", 4, Tag::FakeRise)];
        let recent = recent_signals(&records, march(5), 3);
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].glyph(), "⬆");
        assert_eq!(recent[0].label(), Tag::FakeRise.label());
    }
}
