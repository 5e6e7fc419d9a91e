/// effect of paying an extra £300 every month
use mortgage_balance_rs::chrono::NaiveDate;
use mortgage_balance_rs::report::comparison_summary;
use mortgage_balance_rs::{
    AmortizationSchedule, LoanConfiguration, Money, OverpaymentSchedule, Rate,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = LoanConfiguration::builder()
        .principal(Money::from_major(331_794))
        .fixed_rate(Rate::from_bps(455))
        .variable_rate(Rate::from_bps(799))
        .fixed_tenure_years(2)
        .start_date(NaiveDate::from_ymd_opt(2024, 11, 15).ok_or("bad date")?)
        .tenure_years(30)
        .build()?;

    let standard = AmortizationSchedule::generate(&config)?;
    let overpaid = OverpaymentSchedule::generate(&config, Money::from_major(300))?;
    let comparison = overpaid.compare(&standard);

    println!("{}", comparison_summary(&config, &comparison).join("\n"));
    println!("{}", serde_json::to_string_pretty(&comparison)?);

    Ok(())
}
