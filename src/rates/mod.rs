pub mod repricing;
pub mod schedule;

use std::collections::BTreeMap;

use crate::decimal::Rate;

pub use repricing::RepricingPolicy;
pub use schedule::RateSchedule;

/// source of revised annual rates for a variable-rate loan
///
/// intervals are numbered from 1; interval 0 runs at the loan's nominal rate
/// and is never requested from the feed.
pub trait RateRevisionFeed {
    fn revised_rate(&self, interval: u32) -> Option<Rate>;
}

impl RateRevisionFeed for [Rate] {
    fn revised_rate(&self, interval: u32) -> Option<Rate> {
        let index = interval.checked_sub(1)?;
        self.get(index as usize).copied()
    }
}

impl RateRevisionFeed for Vec<Rate> {
    fn revised_rate(&self, interval: u32) -> Option<Rate> {
        self.as_slice().revised_rate(interval)
    }
}

impl RateRevisionFeed for BTreeMap<u32, Rate> {
    fn revised_rate(&self, interval: u32) -> Option<Rate> {
        self.get(&interval).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_feed_is_one_based() {
        let rates = vec![Rate::from_percentage(5), Rate::from_percentage(6)];

        assert_eq!(rates.revised_rate(0), None);
        assert_eq!(rates.revised_rate(1), Some(Rate::from_percentage(5)));
        assert_eq!(rates.revised_rate(2), Some(Rate::from_percentage(6)));
        assert_eq!(rates.revised_rate(3), None);
    }

    #[test]
    fn test_map_feed() {
        let mut rates: BTreeMap<u32, Rate> = BTreeMap::new();
        rates.insert(2, Rate::from_bps(475));

        assert_eq!(rates.revised_rate(1), None);
        assert_eq!(rates.revised_rate(2), Some(Rate::from_bps(475)));
    }
}
