//! Signal tag taxonomy.
//!
//! Every bar carries exactly one `Tag` after classification; `Tag::None`
//! marks a bar with no signal. Each tag has a stable snake_case code used in
//! CSV/JSON exports, a human label, and the glyph drawn on chart overlays.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Tag {
    #[default]
    None,
    AggressiveBuy,
    AggressiveSell,
    BuyerAbsorption,
    SellerAbsorption,
    BullishPor,
    BearishPor,
    BullishPoi,
    BearishPoi,
    BullishWeakLeg,
    BearishWeakLeg,
    FakeDrop,
    FakeRise,
}

impl Tag {
    pub const ALL: [Tag; 13] = [
        Tag::None,
        Tag::AggressiveBuy,
        Tag::AggressiveSell,
        Tag::BuyerAbsorption,
        Tag::SellerAbsorption,
        Tag::BullishPor,
        Tag::BearishPor,
        Tag::BullishPoi,
        Tag::BearishPoi,
        Tag::BullishWeakLeg,
        Tag::BearishWeakLeg,
        Tag::FakeDrop,
        Tag::FakeRise,
    ];

    pub fn is_none(&self) -> bool {
        matches!(self, Tag::None)
    }

    /// Stable machine-readable code (matches the serde representation).
    pub fn code(&self) -> &'static str {
        match self {
            Tag::None => "none",
            Tag::AggressiveBuy => "aggressive_buy",
            Tag::AggressiveSell => "aggressive_sell",
            Tag::BuyerAbsorption => "buyer_absorption",
            Tag::SellerAbsorption => "seller_absorption",
            Tag::BullishPor => "bullish_por",
            Tag::BearishPor => "bearish_por",
            Tag::BullishPoi => "bullish_poi",
            Tag::BearishPoi => "bearish_poi",
            Tag::BullishWeakLeg => "bullish_weak_leg",
            Tag::BearishWeakLeg => "bearish_weak_leg",
            Tag::FakeDrop => "fake_drop",
            Tag::FakeRise => "fake_rise",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tag::None => "",
            Tag::AggressiveBuy => "Aggressive Buyers",
            Tag::AggressiveSell => "Aggressive Sellers",
            Tag::BuyerAbsorption => "Buyer Absorption",
            Tag::SellerAbsorption => "Seller Absorption",
            Tag::BullishPor => "Bullish POR",
            Tag::BearishPor => "Bearish POR",
            Tag::BullishPoi => "Bullish POI",
            Tag::BearishPoi => "Bearish POI",
            Tag::BullishWeakLeg => "Bullish Weak Leg",
            Tag::BearishWeakLeg => "Bearish Weak Leg",
            Tag::FakeDrop => "Fake Drop",
            Tag::FakeRise => "Fake Rise",
        }
    }

    /// Marker drawn above the bar on chart overlays.
    pub fn glyph(&self) -> &'static str {
        match self {
            Tag::None => "",
            Tag::AggressiveBuy => "🟢",
            Tag::AggressiveSell => "🔴",
            Tag::BuyerAbsorption => "⛔",
            Tag::SellerAbsorption => "🚀",
            Tag::BullishPor => "💥",
            Tag::BearishPor => "💣",
            Tag::BullishPoi => "🐂",
            Tag::BearishPoi => "🐻",
            Tag::BullishWeakLeg => "📉",
            Tag::BearishWeakLeg => "📈",
            Tag::FakeDrop => "⬇",
            Tag::FakeRise => "⬆",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown signal tag '{0}'")]
pub struct ParseTagError(pub String);

impl FromStr for Tag {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Tag::ALL
            .iter()
            .copied()
            .find(|t| t.code().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ParseTagError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_serde_representation() {
        for tag in Tag::ALL {
            let json = serde_json::to_string(&tag).unwrap();
            assert_eq!(json, format!("\"{}\"", tag.code()));
        }
    }

    #[test]
    fn codes_parse_back() {
        for tag in Tag::ALL {
            assert_eq!(tag.code().parse::<Tag>().unwrap(), tag);
        }
        assert_eq!(" FAKE_DROP ".parse::<Tag>().unwrap(), Tag::FakeDrop);
    }

    #[test]
    fn unknown_code_is_rejected() {
        let err = "bullish_flag".parse::<Tag>().unwrap_err();
        assert_eq!(err, ParseTagError("bullish_flag".into()));
    }

    #[test]
    fn only_none_has_empty_label_and_glyph() {
        for tag in Tag::ALL {
            assert_eq!(tag.label().is_empty(), tag.is_none());
            assert_eq!(tag.glyph().is_empty(), tag.is_none());
        }
    }

    #[test]
    fn default_is_none() {
        assert_eq!(Tag::default(), Tag::None);
    }
}
