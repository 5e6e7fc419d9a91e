/// daily balance from a csv payment history, compared with paying nothing
use mortgage_balance_rs::chrono::NaiveDate;
use mortgage_balance_rs::report::balance_summary;
use mortgage_balance_rs::{
    read_payments, DailyBalanceEngine, Decimal, LoanConfiguration, Money, Rate,
};

const PAYMENTS: &str = "\
payment_date,amount
16/12/2024,2350.98
02/01/2025,\"£1,691.02\"
03/02/2025,1691.02
03/03/2025,1691.02
01/04/2025,1691.02
";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = LoanConfiguration::builder()
        .principal(Money::from_major(331_794))
        .fixed_rate(Rate::from_percent(Decimal::new(455, 2)))
        .start_date(NaiveDate::from_ymd_opt(2024, 11, 15).ok_or("bad date")?)
        .tenure_years(30)
        .build()?;

    let payments = read_payments(PAYMENTS.as_bytes())?;
    let schedule = DailyBalanceEngine::compute(&config, &payments)?;
    let baseline = DailyBalanceEngine::baseline(&config)?;
    let comparison = schedule.compare(&baseline);

    println!("{}", balance_summary(&schedule, Some(&comparison)).join("\n"));

    // the days around each payment
    for entry in schedule.entries().iter().filter(|entry| entry.has_payment()) {
        println!(
            "{}  paid {:>10}  interest {:>6}  balance {:>12}",
            entry.date,
            entry.payment.to_pence(),
            entry.interest.to_pence(),
            entry.balance.to_pence()
        );
    }

    // full daily schedule as csv on stdout
    if std::env::args().any(|arg| arg == "--csv") {
        mortgage_balance_rs::io::write_balance_csv(&schedule, std::io::stdout().lock())?;
    }

    Ok(())
}
