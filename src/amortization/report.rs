use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{AmortizationError, Result};
use crate::types::{LoanId, LoanType};

/// one period of an amortization schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// 1-based period index
    pub period: u32,
    pub opening_balance: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    pub payment_amount: Money,
    pub remaining_balance: Money,
}

impl ScheduleEntry {
    /// entry for a sub-loan that has already run off
    pub(crate) fn empty(period: u32) -> Self {
        Self {
            period,
            opening_balance: Money::ZERO,
            principal_portion: Money::ZERO,
            interest_portion: Money::ZERO,
            payment_amount: Money::ZERO,
            remaining_balance: Money::ZERO,
        }
    }

    /// field-wise sum of two entries for the same period
    pub(crate) fn merge(&self, other: &ScheduleEntry) -> Self {
        Self {
            period: self.period,
            opening_balance: self.opening_balance + other.opening_balance,
            principal_portion: self.principal_portion + other.principal_portion,
            interest_portion: self.interest_portion + other.interest_portion,
            payment_amount: self.payment_amount + other.payment_amount,
            remaining_balance: self.remaining_balance + other.remaining_balance,
        }
    }
}

/// headline figures of a schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepaymentSummary {
    pub loan_total: Money,
    pub loan_term: u32,
    /// first period's payment; the level payment until the first reset
    pub first_payment: Money,
    pub total_interest: Money,
    pub total_repayment: Money,
}

/// full amortization schedule and totals for one loan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleReport {
    pub loan_id: LoanId,
    pub loan_type: LoanType,
    pub principal: Money,
    pub term: u32,
    pub entries: Vec<ScheduleEntry>,
    pub total_principal: Money,
    pub total_interest: Money,
    pub total_payment: Money,
}

impl ScheduleReport {
    /// build a report, totalling the entries
    pub(crate) fn from_entries(
        loan_id: LoanId,
        loan_type: LoanType,
        principal: Money,
        entries: Vec<ScheduleEntry>,
    ) -> Self {
        let total_principal = entries.iter().map(|e| e.principal_portion).sum();
        let total_interest = entries.iter().map(|e| e.interest_portion).sum();
        let total_payment = entries.iter().map(|e| e.payment_amount).sum();

        Self {
            loan_id,
            loan_type,
            principal,
            term: entries.len() as u32,
            entries,
            total_principal,
            total_interest,
            total_payment,
        }
    }

    /// get entry for a 1-based period
    pub fn entry(&self, period: u32) -> Option<&ScheduleEntry> {
        let index = period.checked_sub(1)?;
        self.entries.get(index as usize)
    }

    /// balance outstanding after a period; the principal before period 1
    pub fn balance_after(&self, period: u32) -> Money {
        if period == 0 {
            return self.principal;
        }
        match self.entry(period) {
            Some(entry) => entry.remaining_balance,
            None => Money::ZERO,
        }
    }

    pub fn summary(&self) -> RepaymentSummary {
        RepaymentSummary {
            loan_total: self.principal,
            loan_term: self.term,
            first_payment: self
                .entries
                .first()
                .map(|e| e.payment_amount)
                .unwrap_or(Money::ZERO),
            total_interest: self.total_interest,
            total_repayment: self.total_payment,
        }
    }

    /// check the schedule invariants
    ///
    /// periods run 1..=term without gaps, every payment splits exactly into
    /// principal and interest, balances never go negative or up, the last
    /// balance is zero and the totals match the entries and the principal.
    pub fn verify(&self) -> Result<()> {
        if self.entries.len() != self.term as usize {
            return Err(AmortizationError::inconsistent(format!(
                "{} entries for a term of {} periods",
                self.entries.len(),
                self.term
            )));
        }

        let mut previous_balance = self.principal;
        for (index, entry) in self.entries.iter().enumerate() {
            let expected_period = index as u32 + 1;
            if entry.period != expected_period {
                return Err(AmortizationError::inconsistent(format!(
                    "expected period {}, found {}",
                    expected_period, entry.period
                )));
            }
            if entry.principal_portion + entry.interest_portion != entry.payment_amount {
                return Err(AmortizationError::inconsistent(format!(
                    "period {}: principal {} + interest {} != payment {}",
                    entry.period, entry.principal_portion, entry.interest_portion, entry.payment_amount
                )));
            }
            if entry.opening_balance != previous_balance {
                return Err(AmortizationError::inconsistent(format!(
                    "period {}: opening balance {} does not carry over {}",
                    entry.period, entry.opening_balance, previous_balance
                )));
            }
            if entry.opening_balance - entry.principal_portion != entry.remaining_balance {
                return Err(AmortizationError::inconsistent(format!(
                    "period {}: balance {} less principal {} != remaining {}",
                    entry.period, entry.opening_balance, entry.principal_portion, entry.remaining_balance
                )));
            }
            if entry.remaining_balance.is_negative() || entry.remaining_balance > previous_balance {
                return Err(AmortizationError::inconsistent(format!(
                    "period {}: remaining balance {} after {}",
                    entry.period, entry.remaining_balance, previous_balance
                )));
            }
            previous_balance = entry.remaining_balance;
        }

        if !previous_balance.is_zero() {
            return Err(AmortizationError::inconsistent(format!(
                "final balance is {}, expected zero",
                previous_balance
            )));
        }

        let principal: Money = self.entries.iter().map(|e| e.principal_portion).sum();
        let interest: Money = self.entries.iter().map(|e| e.interest_portion).sum();
        let payment: Money = self.entries.iter().map(|e| e.payment_amount).sum();
        if principal != self.total_principal
            || interest != self.total_interest
            || payment != self.total_payment
        {
            return Err(AmortizationError::inconsistent(format!(
                "totals {}/{}/{} do not match entries {}/{}/{}",
                self.total_principal, self.total_interest, self.total_payment, principal, interest, payment
            )));
        }
        if self.total_principal != self.principal {
            return Err(AmortizationError::inconsistent(format!(
                "repaid principal {} differs from loan principal {}",
                self.total_principal, self.principal
            )));
        }

        Ok(())
    }
}
