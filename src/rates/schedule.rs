use serde::{Deserialize, Serialize};

use crate::decimal::Rate;
use crate::errors::{AmortizationError, Result};
use crate::rates::RepricingPolicy;
use crate::terms::{LoanTerms, MAX_ANNUAL_RATE};
use crate::types::RateSelection;

/// annual rate in force for each period of a loan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateSchedule {
    Fixed {
        annual_rate: Rate,
    },
    Variable {
        /// rate for the first reset interval
        base_rate: Rate,
        policy: RepricingPolicy,
    },
}

impl RateSchedule {
    pub fn fixed(annual_rate: Rate) -> Self {
        RateSchedule::Fixed { annual_rate }
    }

    pub fn variable(base_rate: Rate, policy: RepricingPolicy) -> Result<Self> {
        let schedule = RateSchedule::Variable { base_rate, policy };
        schedule.validate()?;
        Ok(schedule)
    }

    /// schedule matching a loan's rate selection
    ///
    /// fixed loans take no repricing policy and variable loans require one.
    pub fn for_terms(terms: &LoanTerms, repricing: Option<RepricingPolicy>) -> Result<Self> {
        match (terms.rate_selection, repricing) {
            (RateSelection::Fixed, None) => Ok(Self::fixed(terms.nominal_annual_rate)),
            (RateSelection::Variable, Some(policy)) => {
                Self::variable(terms.nominal_annual_rate, policy)
            }
            (RateSelection::Fixed, Some(_)) => Err(AmortizationError::configuration(
                "fixed-rate loan cannot take a repricing policy",
            )),
            (RateSelection::Variable, None) => Err(AmortizationError::configuration(
                "variable-rate loan requires a repricing policy",
            )),
        }
    }

    pub fn selection(&self) -> RateSelection {
        match self {
            RateSchedule::Fixed { .. } => RateSelection::Fixed,
            RateSchedule::Variable { .. } => RateSelection::Variable,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            RateSchedule::Fixed { annual_rate } => check_rate(*annual_rate),
            RateSchedule::Variable { base_rate, policy } => {
                check_rate(*base_rate)?;
                policy.validate()
            }
        }
    }

    /// annual rate in force for a 1-based period
    pub fn rate_at(&self, period: u32) -> Result<Rate> {
        if period == 0 {
            return Err(AmortizationError::configuration("periods are numbered from 1"));
        }

        match self {
            RateSchedule::Fixed { annual_rate } => Ok(*annual_rate),
            RateSchedule::Variable { base_rate, policy } => {
                let interval = policy.interval_of(period);
                if interval == 0 {
                    return Ok(*base_rate);
                }
                policy
                    .revisions
                    .get((interval - 1) as usize)
                    .copied()
                    .ok_or_else(|| {
                        AmortizationError::configuration(format!(
                            "no rate supplied for reset interval {} (period {})",
                            interval, period
                        ))
                    })
            }
        }
    }

    /// whether the rate may change at this period; the level payment of a
    /// compound loan is recomputed here
    pub fn is_reset_period(&self, period: u32) -> bool {
        match self {
            RateSchedule::Fixed { .. } => period == 1,
            RateSchedule::Variable { policy, .. } => {
                period >= 1 && (period - 1) % policy.interval_periods.max(1) == 0
            }
        }
    }

    /// reset periods within a term, starting with period 1
    pub fn reset_periods(&self, term: u32) -> Vec<u32> {
        match self {
            RateSchedule::Fixed { .. } => {
                if term >= 1 {
                    vec![1]
                } else {
                    Vec::new()
                }
            }
            RateSchedule::Variable { policy, .. } => (1..=term)
                .step_by(policy.interval_periods.max(1) as usize)
                .collect(),
        }
    }
}

fn check_rate(rate: Rate) -> Result<()> {
    if rate.is_negative() {
        return Err(AmortizationError::configuration(format!(
            "annual rate must not be negative, got {}",
            rate
        )));
    }
    if rate > MAX_ANNUAL_RATE {
        return Err(AmortizationError::configuration(format!(
            "annual rate {} exceeds maximum {}",
            rate, MAX_ANNUAL_RATE
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Money;
    use crate::types::AccrualMethod;
    use chrono::NaiveDate;

    fn variable_terms() -> LoanTerms {
        LoanTerms::builder()
            .principal(Money::from_major(100_000))
            .term(36)
            .rate(Rate::from_percentage(4))
            .rate_selection(RateSelection::Variable)
            .accrual_method(AccrualMethod::Compound)
            .first_payment_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_fixed_rate_is_constant() {
        let schedule = RateSchedule::fixed(Rate::from_bps(490));

        for period in [1, 12, 360] {
            assert_eq!(schedule.rate_at(period).unwrap(), Rate::from_bps(490));
        }
        assert_eq!(schedule.reset_periods(360), vec![1]);
        assert!(schedule.is_reset_period(1));
        assert!(!schedule.is_reset_period(13));
    }

    #[test]
    fn test_rate_above_maximum_is_rejected() {
        let schedule = RateSchedule::fixed(Rate::from_percentage(150));
        assert!(matches!(
            schedule.validate(),
            Err(AmortizationError::Configuration { .. })
        ));
        assert!(RateSchedule::fixed(MAX_ANNUAL_RATE).validate().is_ok());
    }

    #[test]
    fn test_period_zero_is_rejected() {
        let schedule = RateSchedule::fixed(Rate::from_bps(490));
        assert!(matches!(
            schedule.rate_at(0),
            Err(AmortizationError::Configuration { .. })
        ));
    }

    #[test]
    fn test_variable_rate_steps_at_boundaries() {
        let policy = RepricingPolicy::new(12, vec![Rate::from_percentage(5), Rate::from_percentage(6)]).unwrap();
        let schedule = RateSchedule::for_terms(&variable_terms(), Some(policy)).unwrap();

        assert_eq!(schedule.rate_at(1).unwrap(), Rate::from_percentage(4));
        assert_eq!(schedule.rate_at(12).unwrap(), Rate::from_percentage(4));
        assert_eq!(schedule.rate_at(13).unwrap(), Rate::from_percentage(5));
        assert_eq!(schedule.rate_at(25).unwrap(), Rate::from_percentage(6));
        assert_eq!(schedule.reset_periods(36), vec![1, 13, 25]);
        assert!(schedule.is_reset_period(13));
        assert!(!schedule.is_reset_period(14));
    }

    #[test]
    fn test_variable_rate_missing_interval() {
        let policy = RepricingPolicy::new(12, vec![Rate::from_percentage(5)]).unwrap();
        let schedule = RateSchedule::for_terms(&variable_terms(), Some(policy)).unwrap();

        assert!(schedule.rate_at(24).is_ok());
        assert!(matches!(
            schedule.rate_at(25),
            Err(AmortizationError::Configuration { .. })
        ));
    }

    #[test]
    fn test_for_terms_checks_selection() {
        let variable = variable_terms();
        assert!(RateSchedule::for_terms(&variable, None).is_err());

        let fixed = LoanTerms {
            rate_selection: RateSelection::Fixed,
            ..variable
        };
        let policy = RepricingPolicy::new(12, vec![]).unwrap();
        assert!(RateSchedule::for_terms(&fixed, Some(policy)).is_err());

        let schedule = RateSchedule::for_terms(&fixed, None).unwrap();
        assert_eq!(schedule.selection(), RateSelection::Fixed);
    }
}
