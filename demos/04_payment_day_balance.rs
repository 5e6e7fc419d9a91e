/// balance rolled from payment to payment, with a pinned clock for "today"
use mortgage_balance_rs::chrono::{NaiveDate, TimeZone, Utc};
use mortgage_balance_rs::{
    DailyBalanceEngine, LoanConfiguration, Money, PaymentDayEngine, PaymentRecord, Rate,
    SafeTimeProvider, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // freeze time so the run is repeatable
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).single().ok_or("bad time")?,
    ));
    let today = time.now().date_naive();

    let config = LoanConfiguration::builder()
        .principal(Money::from_major(331_794))
        .fixed_rate(Rate::from_bps(455))
        .start_date(NaiveDate::from_ymd_opt(2024, 11, 15).ok_or("bad date")?)
        .tenure_years(30)
        .build_with_time(&time)?;

    let on = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).ok_or("bad date");
    let payments = vec![
        PaymentRecord::new(on(2024, 12, 16)?, "2350.98".parse()?),
        PaymentRecord::new(on(2025, 1, 2)?, "1691.02".parse()?),
        PaymentRecord::new(on(2025, 2, 3)?, "1691.02".parse()?),
    ];

    let by_payment = PaymentDayEngine::compute(&config, &payments, today, Money::ZERO)?;
    for row in &by_payment.entries {
        println!(
            "{}  {:>3} days  interest {:>8}  paid {:>9}  balance {:>11}",
            row.date,
            row.days_accrued,
            row.interest.to_pence(),
            row.payment.to_pence(),
            row.closing_balance.to_pence()
        );
    }

    // both engines agree on the balance today
    let daily = DailyBalanceEngine::compute(&config, &payments)?;
    println!("payment-day balance: {}", by_payment.final_balance().to_pence());
    println!("daily balance:       {:?}", daily.balance_on(today).map(|b| b.to_pence()));

    Ok(())
}
