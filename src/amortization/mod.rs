pub mod combined;
pub mod report;
pub mod single;

use rust_decimal::Decimal;

use crate::decimal::{Money, Rate};

pub use combined::{CombinedLoanAmortizer, CombinedScheduleReport};
pub use report::{RepaymentSummary, ScheduleEntry, ScheduleReport};
pub use single::SingleLoanAmortizer;

/// unrounded level payment that clears `balance` over `periods` monthly
/// payments at `annual_rate`
///
/// A = P * r / (1 - (1 + r)^-n), the annuity formula written with the
/// discount factor so long terms at high rates cannot overflow. a zero rate
/// spreads the balance evenly.
pub fn level_payment(balance: Money, annual_rate: Rate, periods: u32) -> Money {
    if periods == 0 {
        return balance;
    }

    let r = annual_rate.monthly_rate().as_decimal();
    if r.is_zero() {
        return balance / Decimal::from(periods);
    }

    let v = Decimal::ONE / (Decimal::ONE + r);
    let mut discount = Decimal::ONE;
    for _ in 0..periods {
        discount *= v;
    }

    balance * r / (Decimal::ONE - discount)
}
