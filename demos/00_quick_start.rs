/// quick start - minimal example to get started
use mortgage_balance_rs::chrono::NaiveDate;
use mortgage_balance_rs::{DailyBalanceEngine, LoanConfiguration, Money, PaymentRecord, Rate};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // a £300,000 mortgage at 3.5% fixed over 25 years
    let config = LoanConfiguration::builder()
        .principal(Money::from_major(300_000))
        .fixed_rate(Rate::from_bps(350))
        .start_date(NaiveDate::from_ymd_opt(2024, 1, 1).ok_or("bad date")?)
        .tenure_years(25)
        .build()?;

    let on = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).ok_or("bad date");
    let payments = vec![
        PaymentRecord::new(on(2024, 12, 16)?, "2350.98".parse()?),
        PaymentRecord::new(on(2025, 1, 2)?, "1691.02".parse()?),
    ];

    let schedule = DailyBalanceEngine::compute(&config, &payments)?;

    // print the headline figures
    println!("{}", serde_json::to_string_pretty(&schedule.summary())?);

    Ok(())
}
