use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::{Money, Rate};
use crate::errors::{AmortizationError, Result};
use crate::types::{AccrualMethod, LoanCategory, LoanId, RateSelection};

/// largest principal accepted, in major units
pub const MAX_PRINCIPAL: Money = Money::from_minor(1_000_000_000_000_000_000, 0);

/// longest term accepted, in monthly periods (100 years)
pub const MAX_TERM: u32 = 1_200;

/// highest annual rate accepted, for the nominal rate and every revision
pub const MAX_ANNUAL_RATE: Rate = Rate::ONE;

/// commercial parameters of one loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub loan_id: LoanId,
    pub category: LoanCategory,
    /// number of monthly periods
    pub term: u32,
    pub accrual_method: AccrualMethod,
    pub principal: Money,
    pub rate_selection: RateSelection,
    pub nominal_annual_rate: Rate,
    pub first_payment_date: NaiveDate,
}

impl LoanTerms {
    /// create validated loan terms
    pub fn new(
        category: LoanCategory,
        term: u32,
        accrual_method: AccrualMethod,
        principal: Money,
        rate_selection: RateSelection,
        nominal_annual_rate: Rate,
        first_payment_date: NaiveDate,
    ) -> Result<Self> {
        let terms = Self {
            loan_id: Uuid::new_v4(),
            category,
            term,
            accrual_method,
            principal,
            rate_selection,
            nominal_annual_rate,
            first_payment_date,
        };
        terms.validate()?;
        Ok(terms)
    }

    /// commercial loan terms
    pub fn commercial(
        term: u32,
        accrual_method: AccrualMethod,
        principal: Money,
        rate_selection: RateSelection,
        nominal_annual_rate: Rate,
        first_payment_date: NaiveDate,
    ) -> Result<Self> {
        Self::new(
            LoanCategory::Commercial,
            term,
            accrual_method,
            principal,
            rate_selection,
            nominal_annual_rate,
            first_payment_date,
        )
    }

    /// housing provident fund loan terms
    pub fn housing_fund(
        term: u32,
        accrual_method: AccrualMethod,
        principal: Money,
        rate_selection: RateSelection,
        nominal_annual_rate: Rate,
        first_payment_date: NaiveDate,
    ) -> Result<Self> {
        Self::new(
            LoanCategory::HousingFund,
            term,
            accrual_method,
            principal,
            rate_selection,
            nominal_annual_rate,
            first_payment_date,
        )
    }

    pub fn builder() -> LoanTermsBuilder {
        LoanTermsBuilder::new()
    }

    /// check structural invariants; also applies to deserialized terms
    pub fn validate(&self) -> Result<()> {
        if self.term == 0 {
            return Err(AmortizationError::invalid_terms("term must be at least one period"));
        }
        if self.term > MAX_TERM {
            return Err(AmortizationError::invalid_terms(format!(
                "term of {} periods exceeds maximum {}",
                self.term, MAX_TERM
            )));
        }
        if !self.principal.is_positive() {
            return Err(AmortizationError::invalid_terms(format!(
                "principal must be positive, got {}",
                self.principal
            )));
        }
        if self.principal > MAX_PRINCIPAL {
            return Err(AmortizationError::invalid_terms(format!(
                "principal {} exceeds maximum {}",
                self.principal, MAX_PRINCIPAL
            )));
        }
        if self.nominal_annual_rate.is_negative() {
            return Err(AmortizationError::invalid_terms(format!(
                "annual rate must not be negative, got {}",
                self.nominal_annual_rate
            )));
        }
        if self.nominal_annual_rate > MAX_ANNUAL_RATE {
            return Err(AmortizationError::invalid_terms(format!(
                "annual rate {} exceeds maximum {}",
                self.nominal_annual_rate, MAX_ANNUAL_RATE
            )));
        }
        Ok(())
    }
}

/// builder for loan terms
pub struct LoanTermsBuilder {
    loan_id: Option<LoanId>,
    category: Option<LoanCategory>,
    term: Option<u32>,
    accrual_method: Option<AccrualMethod>,
    principal: Option<Money>,
    rate_selection: Option<RateSelection>,
    rate: Option<Rate>,
    first_payment_date: Option<NaiveDate>,
}

impl LoanTermsBuilder {
    pub fn new() -> Self {
        Self {
            loan_id: None,
            category: None,
            term: None,
            accrual_method: None,
            principal: None,
            rate_selection: None,
            rate: None,
            first_payment_date: None,
        }
    }

    pub fn loan_id(mut self, id: LoanId) -> Self {
        self.loan_id = Some(id);
        self
    }

    pub fn category(mut self, category: LoanCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn term(mut self, periods: u32) -> Self {
        self.term = Some(periods);
        self
    }

    pub fn accrual_method(mut self, method: AccrualMethod) -> Self {
        self.accrual_method = Some(method);
        self
    }

    pub fn principal(mut self, principal: Money) -> Self {
        self.principal = Some(principal);
        self
    }

    pub fn rate_selection(mut self, selection: RateSelection) -> Self {
        self.rate_selection = Some(selection);
        self
    }

    pub fn rate(mut self, rate: Rate) -> Self {
        self.rate = Some(rate);
        self
    }

    pub fn first_payment_date(mut self, date: NaiveDate) -> Self {
        self.first_payment_date = Some(date);
        self
    }

    /// build validated terms; category defaults to commercial, accrual to
    /// compound and rate selection to fixed
    pub fn build(self) -> Result<LoanTerms> {
        let term = self
            .term
            .ok_or_else(|| AmortizationError::invalid_terms("term required"))?;
        let principal = self
            .principal
            .ok_or_else(|| AmortizationError::invalid_terms("principal required"))?;
        let rate = self
            .rate
            .ok_or_else(|| AmortizationError::invalid_terms("rate required"))?;
        let first_payment_date = self
            .first_payment_date
            .ok_or_else(|| AmortizationError::invalid_terms("first payment date required"))?;

        let terms = LoanTerms {
            loan_id: self.loan_id.unwrap_or_else(Uuid::new_v4),
            category: self.category.unwrap_or(LoanCategory::Commercial),
            term,
            accrual_method: self.accrual_method.unwrap_or(AccrualMethod::Compound),
            principal,
            rate_selection: self.rate_selection.unwrap_or(RateSelection::Fixed),
            nominal_annual_rate: rate,
            first_payment_date,
        };
        terms.validate()?;
        Ok(terms)
    }
}

impl Default for LoanTermsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// term, rate and amount of one part of a combined loan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanPart {
    pub term: u32,
    pub annual_rate: Rate,
    pub amount: Money,
}

/// a commercial sub-loan paired with a housing fund sub-loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedLoanTerms {
    loan_id: LoanId,
    commercial: LoanTerms,
    housing_fund: LoanTerms,
}

impl CombinedLoanTerms {
    pub fn new(commercial: LoanTerms, housing_fund: LoanTerms) -> Result<Self> {
        let combined = Self {
            loan_id: Uuid::new_v4(),
            commercial,
            housing_fund,
        };
        combined.validate()?;
        Ok(combined)
    }

    /// build both sub-loans from shared settings and per-part figures
    pub fn from_parts(
        accrual_method: AccrualMethod,
        rate_selection: RateSelection,
        first_payment_date: NaiveDate,
        commercial: LoanPart,
        housing_fund: LoanPart,
    ) -> Result<Self> {
        let commercial = LoanTerms::commercial(
            commercial.term,
            accrual_method,
            commercial.amount,
            rate_selection,
            commercial.annual_rate,
            first_payment_date,
        )?;
        let housing_fund = LoanTerms::housing_fund(
            housing_fund.term,
            accrual_method,
            housing_fund.amount,
            rate_selection,
            housing_fund.annual_rate,
            first_payment_date,
        )?;
        Self::new(commercial, housing_fund)
    }

    pub fn validate(&self) -> Result<()> {
        validate_pair(&self.commercial, &self.housing_fund)
    }

    pub fn loan_id(&self) -> LoanId {
        self.loan_id
    }

    pub fn commercial(&self) -> &LoanTerms {
        &self.commercial
    }

    pub fn housing_fund(&self) -> &LoanTerms {
        &self.housing_fund
    }

    /// combined term is the longer of the two sub-terms
    pub fn term(&self) -> u32 {
        self.commercial.term.max(self.housing_fund.term)
    }

    pub fn principal(&self) -> Money {
        self.commercial.principal + self.housing_fund.principal
    }

    pub fn first_payment_date(&self) -> NaiveDate {
        self.commercial.first_payment_date
    }

    pub fn into_parts(self) -> (LoanTerms, LoanTerms) {
        (self.commercial, self.housing_fund)
    }
}

/// check that two terms can form a combined loan
pub(crate) fn validate_pair(commercial: &LoanTerms, housing_fund: &LoanTerms) -> Result<()> {
    if commercial.category != LoanCategory::Commercial {
        return Err(AmortizationError::invalid_terms(
            "commercial part of a combined loan must be tagged commercial",
        ));
    }
    if housing_fund.category != LoanCategory::HousingFund {
        return Err(AmortizationError::invalid_terms(
            "housing fund part of a combined loan must be tagged housing fund",
        ));
    }
    commercial.validate()?;
    housing_fund.validate()?;

    if commercial.first_payment_date != housing_fund.first_payment_date {
        return Err(AmortizationError::MismatchedStart {
            commercial: commercial.first_payment_date,
            housing_fund: housing_fund.first_payment_date,
        });
    }
    Ok(())
}
