use chrono::{Months, NaiveDate};
use log::trace;
use serde::{Deserialize, Serialize};

use crate::decimal::Rate;
use crate::errors::{AmortizationError, Result};
use crate::rates::RateRevisionFeed;
use crate::terms::MAX_ANNUAL_RATE;

/// repricing rule for a variable-rate loan
///
/// periods are grouped into reset intervals of `interval_periods` periods
/// counted from period 1. interval 0 runs at the loan's nominal rate and
/// `revisions[i - 1]` applies to interval `i`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepricingPolicy {
    pub interval_periods: u32,
    pub revisions: Vec<Rate>,
}

impl RepricingPolicy {
    pub fn new(interval_periods: u32, revisions: Vec<Rate>) -> Result<Self> {
        let policy = Self {
            interval_periods,
            revisions,
        };
        policy.validate()?;
        Ok(policy)
    }

    /// pull the revisions a loan of `term` periods needs from a feed
    ///
    /// stops at the first interval the feed has no rate for; looking up a
    /// period in that interval later fails with a configuration error.
    pub fn from_feed<F>(interval_periods: u32, term: u32, feed: &F) -> Result<Self>
    where
        F: RateRevisionFeed + ?Sized,
    {
        if interval_periods == 0 {
            return Err(AmortizationError::configuration(
                "repricing interval must be at least one period",
            ));
        }

        let intervals = term.div_ceil(interval_periods);
        let mut revisions = Vec::new();
        for interval in 1..intervals {
            match feed.revised_rate(interval) {
                Some(rate) => revisions.push(rate),
                None => {
                    trace!("rate feed has no rate for reset interval {}", interval);
                    break;
                }
            }
        }

        Self::new(interval_periods, revisions)
    }

    pub fn validate(&self) -> Result<()> {
        if self.interval_periods == 0 {
            return Err(AmortizationError::configuration(
                "repricing interval must be at least one period",
            ));
        }
        if let Some((index, rate)) = self
            .revisions
            .iter()
            .enumerate()
            .find(|(_, rate)| rate.is_negative() || **rate > MAX_ANNUAL_RATE)
        {
            return Err(AmortizationError::configuration(format!(
                "revised rate {} for reset interval {} is outside 0 to {}",
                rate,
                index + 1,
                MAX_ANNUAL_RATE
            )));
        }
        Ok(())
    }

    /// reset interval containing a 1-based period
    pub fn interval_of(&self, period: u32) -> u32 {
        period.saturating_sub(1) / self.interval_periods.max(1)
    }

    /// first period of a reset interval
    pub fn first_period_of(&self, interval: u32) -> u32 {
        interval * self.interval_periods + 1
    }

    /// calendar date of the first payment in a reset interval
    pub fn reset_date(&self, first_payment_date: NaiveDate, interval: u32) -> Option<NaiveDate> {
        let months = interval.checked_mul(self.interval_periods)?;
        first_payment_date.checked_add_months(Months::new(months))
    }
}
