pub mod amortization;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod portfolio;
pub mod rates;
pub mod terms;
pub mod types;

// re-export key types
pub use amortization::{
    level_payment, CombinedLoanAmortizer, CombinedScheduleReport, RepaymentSummary, ScheduleEntry,
    ScheduleReport, SingleLoanAmortizer,
};
pub use config::AmortizationConfig;
pub use decimal::{Money, Rate};
pub use errors::{AmortizationError, Result};
pub use portfolio::{amortize_all, amortize_all_combined, PortfolioTotals};
pub use rates::{RateRevisionFeed, RateSchedule, RepricingPolicy};
pub use terms::{CombinedLoanTerms, LoanPart, LoanTerms, LoanTermsBuilder};
pub use types::{AccrualMethod, LoanCategory, LoanId, LoanType, RateSelection};

// re-export external dependencies that users will need
pub use chrono;
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
