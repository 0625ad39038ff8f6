/// quick start - amortize a combined commercial and housing fund mortgage
use chrono::NaiveDate;
use loan_amortization_rs::{
    AccrualMethod, CombinedLoanAmortizer, CombinedLoanTerms, LoanPart, Money, Rate,
    RateSchedule, RateSelection,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let first_payment = NaiveDate::from_ymd_opt(2024, 1, 1).ok_or("bad date")?;

    // 1,000,000 commercial over 30 years plus 600,000 housing fund over 20
    let terms = CombinedLoanTerms::from_parts(
        AccrualMethod::Compound,
        RateSelection::Fixed,
        first_payment,
        LoanPart {
            term: 360,
            annual_rate: Rate::from_bps(490),
            amount: Money::from_major(1_000_000),
        },
        LoanPart {
            term: 240,
            annual_rate: Rate::from_bps(325),
            amount: Money::from_major(600_000),
        },
    )?;

    let commercial_rates = RateSchedule::for_terms(terms.commercial(), None)?;
    let housing_fund_rates = RateSchedule::for_terms(terms.housing_fund(), None)?;
    let report = CombinedLoanAmortizer::new(terms, commercial_rates, housing_fund_rates).amortize()?;

    for entry in report.merged.entries.iter().take(3) {
        println!(
            "period {:>3}: payment {} (principal {}, interest {}), remaining {}",
            entry.period,
            entry.payment_amount,
            entry.principal_portion,
            entry.interest_portion,
            entry.remaining_balance
        );
    }

    println!("{}", serde_json::to_string_pretty(&report.summary())?);

    Ok(())
}
