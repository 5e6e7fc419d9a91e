/// contractual repayment schedule with a fixed period followed by a variable rate
use mortgage_balance_rs::chrono::NaiveDate;
use mortgage_balance_rs::report::loan_summary;
use mortgage_balance_rs::{AmortizationSchedule, LoanConfiguration, Money, Rate};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = LoanConfiguration::builder()
        .principal(Money::from_major(250_000))
        .fixed_rate(Rate::from_bps(425))
        .variable_rate(Rate::from_bps(699))
        .fixed_tenure_years(5)
        .start_date(NaiveDate::from_ymd_opt(2025, 1, 1).ok_or("bad date")?)
        .tenure_years(25)
        .build()?;

    let schedule = AmortizationSchedule::generate(&config)?;
    println!("{}", loan_summary(&config, &schedule, None).join("\n"));

    // first month of each rate period
    for month in [1, 60, 61, schedule.term_months] {
        if let Some(row) = schedule.get_payment(month) {
            println!(
                "month {:>3} ({})  {:<8} payment {:>9}  interest {:>8}  balance {:>11}",
                row.month,
                row.payment_date,
                row.rate_type.to_string(),
                row.payment.to_pence(),
                row.interest.to_pence(),
                row.balance.to_pence()
            );
        }
    }

    Ok(())
}
