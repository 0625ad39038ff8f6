use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// unique identifier for a loan
pub type LoanId = Uuid;

/// loan category carried by a single loan's terms
///
/// both categories amortize identically; the tag is only read by presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanCategory {
    Commercial,
    /// housing provident fund loan
    HousingFund,
}

/// loan type of a produced schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanType {
    Commercial,
    HousingFund,
    /// merged commercial + housing fund schedule
    Combined,
}

impl From<LoanCategory> for LoanType {
    fn from(category: LoanCategory) -> Self {
        match category {
            LoanCategory::Commercial => LoanType::Commercial,
            LoanCategory::HousingFund => LoanType::HousingFund,
        }
    }
}

/// rule for splitting a payment into principal and interest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccrualMethod {
    /// flat interest on the original principal, equal principal portions
    Simple,
    /// declining balance with a level payment between rate resets
    Compound,
}

/// rate regime for the life of the loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RateSelection {
    Fixed,
    /// repriced at a fixed period interval
    Variable,
}
