//! Rule families of the cascade, one file per family.
//!
//! Each family is a single struct parameterized by [`Bias`](super::rule::Bias); the bullish and
//! bearish instances occupy adjacent slots in the priority order.

pub mod absorption;
pub mod aggressive;
pub mod fake_move;
pub mod poi;
pub mod por;
pub mod weak_leg;

pub use absorption::AbsorptionRule;
pub use aggressive::AggressiveRule;
pub use fake_move::FakeMoveRule;
pub use poi::PoiRule;
pub use por::PorRule;
pub use weak_leg::WeakLegRule;

use super::config::ClassifierConfig;
use super::rule::SignalRule;

/// The twelve rules in strict priority order.
pub fn standard_cascade(config: &ClassifierConfig) -> Vec<Box<dyn SignalRule>> {
    vec![
        Box::new(AggressiveRule::buyers(
            &config.aggressive,
            config.dedup_window,
        )),
        Box::new(AggressiveRule::sellers(
            &config.aggressive,
            config.dedup_window,
        )),
        Box::new(AbsorptionRule::buyers(&config.absorption, config.lookahead)),
        Box::new(AbsorptionRule::sellers(&config.absorption, config.lookahead)),
        Box::new(PorRule::bullish(&config.por)),
        Box::new(PorRule::bearish(&config.por)),
        Box::new(PoiRule::bullish(&config.poi)),
        Box::new(PoiRule::bearish(&config.poi)),
        Box::new(WeakLegRule::bullish(&config.weak_leg)),
        Box::new(WeakLegRule::bearish(&config.weak_leg)),
        Box::new(FakeMoveRule::fake_drop(
            &config.fake_move,
            config.dedup_window,
        )),
        Box::new(FakeMoveRule::fake_rise(
            &config.fake_move,
            config.dedup_window,
        )),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Tag;

    #[test]
    fn cascade_tags_follow_priority() {
        let rules = standard_cascade(&ClassifierConfig::default());
        let tags: Vec<Tag> = rules.iter().map(|r| r.tag()).collect();
        assert_eq!(tags, Tag::ALL[1..].to_vec());
    }

    #[test]
    fn only_por_needs_indicators() {
        let rules = standard_cascade(&ClassifierConfig::default());
        let with_indicators: Vec<&str> = rules
            .iter()
            .filter(|r| !r.required_indicators().is_empty())
            .map(|r| r.name())
            .collect();
        assert_eq!(with_indicators, vec!["bullish_por", "bearish_por"]);
    }
}
