use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::amortization::report::{RepaymentSummary, ScheduleEntry, ScheduleReport};
use crate::amortization::single::SingleLoanAmortizer;
use crate::config::AmortizationConfig;
use crate::errors::Result;
use crate::rates::RateSchedule;
use crate::terms::{validate_pair, CombinedLoanTerms};
use crate::types::LoanType;

/// merged schedule of a combined loan plus the schedule of each part
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedScheduleReport {
    pub merged: ScheduleReport,
    pub commercial: ScheduleReport,
    pub housing_fund: ScheduleReport,
}

impl CombinedScheduleReport {
    pub fn summary(&self) -> RepaymentSummary {
        self.merged.summary()
    }
}

/// amortizes a commercial loan and a housing fund loan taken together
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedLoanAmortizer {
    terms: CombinedLoanTerms,
    commercial_rates: RateSchedule,
    housing_fund_rates: RateSchedule,
    config: AmortizationConfig,
}

impl CombinedLoanAmortizer {
    pub fn new(
        terms: CombinedLoanTerms,
        commercial_rates: RateSchedule,
        housing_fund_rates: RateSchedule,
    ) -> Self {
        Self {
            terms,
            commercial_rates,
            housing_fund_rates,
            config: AmortizationConfig::default(),
        }
    }

    pub fn with_config(mut self, config: AmortizationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn terms(&self) -> &CombinedLoanTerms {
        &self.terms
    }

    pub fn config(&self) -> &AmortizationConfig {
        &self.config
    }

    /// amortize both parts and merge them period by period
    pub fn amortize(&self) -> Result<CombinedScheduleReport> {
        validate_pair(self.terms.commercial(), self.terms.housing_fund())?;

        debug!(
            "amortizing combined loan {}: principal {} over {} periods",
            self.terms.loan_id(),
            self.terms.principal(),
            self.terms.term()
        );

        let commercial = SingleLoanAmortizer::new(
            self.terms.commercial().clone(),
            self.commercial_rates.clone(),
        )
        .with_config(self.config)
        .amortize()?;
        let housing_fund = SingleLoanAmortizer::new(
            self.terms.housing_fund().clone(),
            self.housing_fund_rates.clone(),
        )
        .with_config(self.config)
        .amortize()?;

        let merged = self.merge(&commercial, &housing_fund);
        if let Err(err) = merged.verify() {
            warn!(
                "combined loan {} failed its consistency check: {}",
                merged.loan_id, err
            );
            return Err(err);
        }

        debug!(
            "combined loan {} amortized: total interest {}, total payment {}",
            merged.loan_id, merged.total_interest, merged.total_payment
        );

        Ok(CombinedScheduleReport {
            merged,
            commercial,
            housing_fund,
        })
    }

    fn merge(&self, commercial: &ScheduleReport, housing_fund: &ScheduleReport) -> ScheduleReport {
        let term = self.terms.term();

        let entries = (1..=term)
            .map(|period| match (commercial.entry(period), housing_fund.entry(period)) {
                (Some(c), Some(h)) => c.merge(h),
                (Some(only), None) | (None, Some(only)) => only.clone(),
                (None, None) => ScheduleEntry::empty(period),
            })
            .collect();

        // totals come from the parts; verify() then holds the merged rows to them
        ScheduleReport {
            loan_id: self.terms.loan_id(),
            loan_type: LoanType::Combined,
            principal: self.terms.principal(),
            term,
            entries,
            total_principal: commercial.total_principal + housing_fund.total_principal,
            total_interest: commercial.total_interest + housing_fund.total_interest,
            total_payment: commercial.total_payment + housing_fund.total_payment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::{Money, Rate};
    use crate::errors::AmortizationError;
    use crate::rates::RepricingPolicy;
    use crate::terms::{LoanPart, LoanTerms};
    use crate::types::{AccrualMethod, RateSelection};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn money(s: &str) -> Money {
        Money::from_str_exact(s).unwrap()
    }

    fn combined_terms(method: AccrualMethod) -> CombinedLoanTerms {
        CombinedLoanTerms::from_parts(
            method,
            RateSelection::Fixed,
            date(2024, 1, 1),
            LoanPart {
                term: 12,
                annual_rate: Rate::from_percentage(5),
                amount: Money::from_major(100_000),
            },
            LoanPart {
                term: 24,
                annual_rate: Rate::from_percentage(4),
                amount: Money::from_major(50_000),
            },
        )
        .unwrap()
    }

    fn amortizer(method: AccrualMethod) -> CombinedLoanAmortizer {
        let terms = combined_terms(method);
        let commercial_rates = RateSchedule::for_terms(terms.commercial(), None).unwrap();
        let housing_fund_rates = RateSchedule::for_terms(terms.housing_fund(), None).unwrap();
        CombinedLoanAmortizer::new(terms, commercial_rates, housing_fund_rates)
    }

    #[test]
    fn test_merged_entries_sum_both_parts() {
        let report = amortizer(AccrualMethod::Compound).amortize().unwrap();

        assert_eq!(report.merged.term, 24);
        assert_eq!(report.merged.entries.len(), 24);
        assert_eq!(report.merged.loan_type, LoanType::Combined);
        assert_eq!(report.commercial.term, 12);
        assert_eq!(report.housing_fund.term, 24);

        let first = report.merged.entry(1).unwrap();
        assert_eq!(first.opening_balance, Money::from_major(150_000));
        assert_eq!(first.interest_portion, money("583.34"));
        assert_eq!(first.principal_portion, money("10148.66"));
        assert_eq!(first.payment_amount, money("10732.00"));
        assert_eq!(first.remaining_balance, money("139851.34"));

        assert_eq!(report.merged.balance_after(12), money("25499.04"));
    }

    #[test]
    fn test_longer_part_carries_on_alone() {
        let report = amortizer(AccrualMethod::Compound).amortize().unwrap();

        for period in 13..=24 {
            assert_eq!(report.merged.entry(period), report.housing_fund.entry(period));
        }
        assert_eq!(report.merged.entry(24).unwrap().remaining_balance, Money::ZERO);
    }

    #[test]
    fn test_longer_commercial_part_carries_on_alone() {
        let terms = CombinedLoanTerms::from_parts(
            AccrualMethod::Compound,
            RateSelection::Fixed,
            date(2024, 1, 1),
            LoanPart {
                term: 24,
                annual_rate: Rate::from_percentage(5),
                amount: Money::from_major(100_000),
            },
            LoanPart {
                term: 12,
                annual_rate: Rate::from_percentage(4),
                amount: Money::from_major(50_000),
            },
        )
        .unwrap();
        let commercial_rates = RateSchedule::for_terms(terms.commercial(), None).unwrap();
        let housing_fund_rates = RateSchedule::for_terms(terms.housing_fund(), None).unwrap();

        let report = CombinedLoanAmortizer::new(terms, commercial_rates, housing_fund_rates)
            .amortize()
            .unwrap();

        assert_eq!(report.merged.entries.len(), 24);
        assert_eq!(report.merged.entry(1).unwrap().payment_amount, money("8644.64"));
        assert_eq!(report.merged.balance_after(12), money("51247.14"));
        for period in 13..=24 {
            assert_eq!(report.merged.entry(period), report.commercial.entry(period));
        }
        assert_eq!(report.merged.total_principal, Money::from_major(150_000));
    }

    #[test]
    fn test_totals_are_sum_of_parts() {
        let report = amortizer(AccrualMethod::Compound).amortize().unwrap();

        assert_eq!(report.commercial.total_interest, money("2728.98"));
        assert_eq!(report.housing_fund.total_interest, money("2109.88"));
        assert_eq!(report.merged.total_principal, Money::from_major(150_000));
        assert_eq!(report.merged.total_interest, money("4838.86"));
        assert_eq!(report.merged.total_payment, money("154838.86"));

        let summary = report.summary();
        assert_eq!(summary.loan_total, Money::from_major(150_000));
        assert_eq!(summary.loan_term, 24);
        assert_eq!(summary.first_payment, money("10732.00"));
    }

    #[test]
    fn test_simple_combined_loan() {
        let report = amortizer(AccrualMethod::Simple).amortize().unwrap();

        // 100000 / 12 and 50000 / 24 rounded to cents
        let first = report.merged.entry(1).unwrap();
        assert_eq!(first.principal_portion, money("10416.66"));
        assert_eq!(first.interest_portion, money("583.34"));
        assert!(report.merged.verify().is_ok());
    }

    #[test]
    fn test_mismatched_start_is_rejected() {
        let (commercial, housing_fund) = combined_terms(AccrualMethod::Compound).into_parts();
        let late = LoanTerms {
            first_payment_date: date(2024, 3, 1),
            ..housing_fund
        };
        assert_eq!(
            CombinedLoanTerms::new(commercial, late).unwrap_err(),
            AmortizationError::MismatchedStart {
                commercial: date(2024, 1, 1),
                housing_fund: date(2024, 3, 1),
            }
        );

        // deserialized terms skip construction checks, amortize still catches them
        let mut amortizer = amortizer(AccrualMethod::Compound);
        let json = serde_json::to_string(&amortizer.terms).unwrap();
        let tampered = json.replacen("2024-01-01", "2024-03-01", 1);
        amortizer.terms = serde_json::from_str(&tampered).unwrap();
        assert_eq!(
            amortizer.amortize().unwrap_err(),
            AmortizationError::MismatchedStart {
                commercial: date(2024, 3, 1),
                housing_fund: date(2024, 1, 1),
            }
        );
    }

    #[test]
    fn test_invalid_deserialized_part_is_rejected() {
        let mut amortizer = amortizer(AccrualMethod::Compound);
        let json = serde_json::to_string(&amortizer.terms).unwrap();
        // commercial part is serialized first
        let tampered = json.replacen("\"term\":12", "\"term\":0", 1);
        assert_ne!(tampered, json);
        amortizer.terms = serde_json::from_str(&tampered).unwrap();

        assert!(matches!(
            amortizer.amortize(),
            Err(AmortizationError::InvalidTerms { .. })
        ));
    }

    #[test]
    fn test_configuration_errors_propagate() {
        let terms = combined_terms(AccrualMethod::Compound);
        let commercial_rates = RateSchedule::for_terms(terms.commercial(), None).unwrap();
        let policy = RepricingPolicy::new(12, vec![Rate::from_percentage(5)]).unwrap();
        let wrong = RateSchedule::variable(Rate::from_percentage(4), policy).unwrap();

        let result = CombinedLoanAmortizer::new(terms, commercial_rates, wrong).amortize();
        assert!(matches!(result, Err(AmortizationError::Configuration { .. })));
    }
}
