use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::amortization::{
    CombinedLoanAmortizer, CombinedScheduleReport, ScheduleReport, SingleLoanAmortizer,
};
use crate::decimal::Money;
use crate::errors::Result;

/// amortize independent loans in parallel; results keep the input order
pub fn amortize_all(loans: &[SingleLoanAmortizer]) -> Vec<Result<ScheduleReport>> {
    debug!("amortizing {} loans", loans.len());
    loans.par_iter().map(SingleLoanAmortizer::amortize).collect()
}

/// combined-loan counterpart of [`amortize_all`]
pub fn amortize_all_combined(loans: &[CombinedLoanAmortizer]) -> Vec<Result<CombinedScheduleReport>> {
    debug!("amortizing {} combined loans", loans.len());
    loans.par_iter().map(CombinedLoanAmortizer::amortize).collect()
}

/// aggregate figures across a batch of schedules
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioTotals {
    pub loans: usize,
    /// loans whose amortization returned an error
    pub failed: usize,
    pub total_principal: Money,
    pub total_interest: Money,
    pub total_payment: Money,
}

impl PortfolioTotals {
    /// sum the successful reports and count the failures
    pub fn from_reports<'a, I>(results: I) -> Self
    where
        I: IntoIterator<Item = &'a Result<ScheduleReport>>,
    {
        let mut totals = Self::default();
        for result in results {
            match result {
                Ok(report) => totals.add(report),
                Err(_) => totals.failed += 1,
            }
        }
        totals
    }

    /// sum the merged schedules of combined loans
    pub fn from_combined_reports<'a, I>(results: I) -> Self
    where
        I: IntoIterator<Item = &'a Result<CombinedScheduleReport>>,
    {
        let mut totals = Self::default();
        for result in results {
            match result {
                Ok(report) => totals.add(&report.merged),
                Err(_) => totals.failed += 1,
            }
        }
        totals
    }

    fn add(&mut self, report: &ScheduleReport) {
        self.loans += 1;
        self.total_principal += report.total_principal;
        self.total_interest += report.total_interest;
        self.total_payment += report.total_payment;
    }
}
