use log::{debug, trace, warn};
use rust_decimal::Decimal;

use crate::amortization::level_payment;
use crate::amortization::report::{ScheduleEntry, ScheduleReport};
use crate::config::AmortizationConfig;
use crate::decimal::Money;
use crate::errors::{AmortizationError, Result};
use crate::rates::RateSchedule;
use crate::terms::LoanTerms;
use crate::types::AccrualMethod;

/// amortizes one commercial or housing fund loan
#[derive(Debug, Clone, PartialEq)]
pub struct SingleLoanAmortizer {
    terms: LoanTerms,
    rates: RateSchedule,
    config: AmortizationConfig,
}

impl SingleLoanAmortizer {
    pub fn new(terms: LoanTerms, rates: RateSchedule) -> Self {
        Self {
            terms,
            rates,
            config: AmortizationConfig::default(),
        }
    }

    pub fn with_config(mut self, config: AmortizationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn terms(&self) -> &LoanTerms {
        &self.terms
    }

    pub fn rates(&self) -> &RateSchedule {
        &self.rates
    }

    pub fn config(&self) -> &AmortizationConfig {
        &self.config
    }

    /// compute the full schedule
    pub fn amortize(&self) -> Result<ScheduleReport> {
        self.check_inputs()?;

        debug!(
            "amortizing loan {} ({:?}, {:?}, {:?}) principal {} over {} periods",
            self.terms.loan_id,
            self.terms.category,
            self.terms.accrual_method,
            self.terms.rate_selection,
            self.terms.principal,
            self.terms.term
        );

        let entries = match self.terms.accrual_method {
            AccrualMethod::Simple => self.amortize_simple()?,
            AccrualMethod::Compound => self.amortize_compound()?,
        };

        let report = ScheduleReport::from_entries(
            self.terms.loan_id,
            self.terms.category.into(),
            self.terms.principal,
            entries,
        );
        if let Err(err) = report.verify() {
            warn!("loan {} failed its consistency check: {}", report.loan_id, err);
            return Err(err);
        }

        debug!(
            "loan {} amortized: total interest {}, total payment {}",
            report.loan_id, report.total_interest, report.total_payment
        );
        Ok(report)
    }

    fn check_inputs(&self) -> Result<()> {
        self.terms.validate()?;
        self.config.validate()?;
        self.rates.validate()?;

        if self.config.round(self.terms.principal) != self.terms.principal {
            return Err(AmortizationError::invalid_terms(format!(
                "principal {} is finer than the currency unit of {} decimal places",
                self.terms.principal, self.config.currency_scale
            )));
        }
        if self.rates.selection() != self.terms.rate_selection {
            return Err(AmortizationError::configuration(format!(
                "rate schedule is {:?} but loan terms select {:?}",
                self.rates.selection(),
                self.terms.rate_selection
            )));
        }
        // the first interval always runs at the nominal rate
        let initial_rate = self.rates.rate_at(1)?;
        if initial_rate != self.terms.nominal_annual_rate {
            return Err(AmortizationError::configuration(format!(
                "rate schedule starts at {} but loan terms carry {}",
                initial_rate, self.terms.nominal_annual_rate
            )));
        }
        Ok(())
    }

    /// flat method: equal principal portions, interest on the original
    /// principal every period
    fn amortize_simple(&self) -> Result<Vec<ScheduleEntry>> {
        let principal = self.terms.principal;
        let term = self.terms.term;
        let level_principal = self.config.round(principal / Decimal::from(term));

        let mut entries = Vec::with_capacity(term as usize);
        let mut balance = principal;

        for period in 1..=term {
            let rate = self.rates.rate_at(period)?;
            let interest = self.config.round(principal.periodic_interest(rate));

            // last period takes whatever rounding left behind
            let principal_portion = if period == term {
                balance
            } else {
                level_principal.min(balance)
            };

            entries.push(entry(period, balance, principal_portion, interest));
            balance -= principal_portion;
        }

        Ok(entries)
    }

    /// declining balance: level payment recomputed at each rate reset over
    /// the periods left in the loan, interest on the outstanding balance
    fn amortize_compound(&self) -> Result<Vec<ScheduleEntry>> {
        let term = self.terms.term;

        let mut entries = Vec::with_capacity(term as usize);
        let mut balance = self.terms.principal;
        let mut payment = Money::ZERO;

        for period in 1..=term {
            let rate = self.rates.rate_at(period)?;

            if self.rates.is_reset_period(period) {
                let remaining_periods = term - period + 1;
                payment = self.config.round(level_payment(balance, rate, remaining_periods));
                trace!(
                    "loan {} period {}: level payment {} at {} over {} periods",
                    self.terms.loan_id,
                    period,
                    payment,
                    rate,
                    remaining_periods
                );
            }

            let interest = self.config.round(balance.periodic_interest(rate));
            let principal_portion = if period == term {
                balance
            } else {
                (payment - interest).max(Money::ZERO).min(balance)
            };

            entries.push(entry(period, balance, principal_portion, interest));
            balance -= principal_portion;
        }

        Ok(entries)
    }
}

fn entry(period: u32, opening_balance: Money, principal_portion: Money, interest_portion: Money) -> ScheduleEntry {
    ScheduleEntry {
        period,
        opening_balance,
        principal_portion,
        interest_portion,
        payment_amount: principal_portion + interest_portion,
        remaining_balance: opening_balance - principal_portion,
    }
}
