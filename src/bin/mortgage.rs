//! Command line front end: daily balances, amortisation and overpayment
//! schedules from flags or a json settings file.

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::json;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process;

use mortgage_balance_rs::chrono::NaiveDate;
use mortgage_balance_rs::io::{write_amortization_csv, write_balance_csv, write_payment_day_csv};
use mortgage_balance_rs::report::{
    balance_summary, comparison_summary, format_currency, loan_summary,
};
use mortgage_balance_rs::{
    load_payments, parse_date, AmortizationSchedule, DailyBalanceEngine, Decimal,
    LoanConfiguration, LoanSettings, Money, OverpaymentSchedule, PaymentDayEngine, PaymentRecord,
    SafeTimeProvider, TimeSource, DATE_FORMAT,
};

/// Mortgage balance and repayment calculations
#[derive(Parser)]
#[command(
    name = "mortgage",
    version,
    about = "Mortgage balance and repayment calculations",
    long_about = "Track a mortgage balance day by day against the payments actually made, \
                  or project amortisation and overpayment schedules. Dates are DD/MM/YYYY, \
                  rates are percentages."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Print a json summary instead of text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Outstanding balance from a payment history
    Balance(BalanceArgs),
    /// Contractual monthly repayment schedule
    Amortise(AmortiseArgs),
    /// Repayment schedule with a monthly overpayment
    Overpay(OverpayArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    /// one row per calendar day
    Daily,
    /// one row per payment
    PaymentDay,
}

/// loan terms, from a settings file and/or flags; flags win
#[derive(Args)]
struct LoanArgs {
    /// json settings file
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    loan_amount: Option<Decimal>,
    /// fixed rate as a percentage, e.g. 4.55
    #[arg(long)]
    fixed_rate: Option<Decimal>,
    /// variable rate as a percentage
    #[arg(long)]
    variable_rate: Option<Decimal>,
    /// years at the fixed rate before the variable rate applies
    #[arg(long)]
    fixed_tenure: Option<u32>,
    /// DD/MM/YYYY, defaults to today
    #[arg(long)]
    start_date: Option<String>,
    /// term in years
    #[arg(long)]
    tenure: Option<u32>,
}

#[derive(Args)]
struct BalanceArgs {
    #[command(flatten)]
    loan: LoanArgs,
    /// payment_date,amount csv; falls back to payment_schedule in the settings file
    #[arg(long)]
    payments: Option<PathBuf>,
    #[arg(long, value_enum, default_value = "daily")]
    mode: Mode,
    /// DD/MM/YYYY balance date, defaults to today
    #[arg(long)]
    as_of: Option<String>,
    /// payment made on the balance date
    #[arg(long, default_value = "0")]
    as_of_payment: Decimal,
    /// write the schedule as csv
    #[arg(long)]
    output: Option<PathBuf>,
    /// compare against making no payments at all
    #[arg(long)]
    compare: bool,
}

#[derive(Args)]
struct AmortiseArgs {
    #[command(flatten)]
    loan: LoanArgs,
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct OverpayArgs {
    #[command(flatten)]
    loan: LoanArgs,
    /// extra paid every month on top of the contractual payment
    #[arg(long)]
    overpayment: Decimal,
    /// compare against the contractual schedule
    #[arg(long)]
    compare: bool,
    #[arg(long)]
    output: Option<PathBuf>,
}

fn today(time: &SafeTimeProvider) -> String {
    time.now().date_naive().format(DATE_FORMAT).to_string()
}

impl LoanArgs {
    fn settings(&self, time: &SafeTimeProvider) -> anyhow::Result<LoanSettings> {
        let mut settings = match &self.config {
            Some(path) => {
                let contents = std::fs::read_to_string(path)
                    .with_context(|| format!("reading settings from {}", path.display()))?;
                serde_json::from_str::<LoanSettings>(&contents)
                    .with_context(|| format!("parsing settings in {}", path.display()))?
            }
            None => LoanSettings {
                loan_amount: self
                    .loan_amount
                    .context("--loan-amount is required without --config")?,
                fixed_rate: None,
                variable_rate: None,
                fixed_tenure: None,
                start_date: today(time),
                tenure: self.tenure.context("--tenure is required without --config")?,
                day_count: Default::default(),
                payment_schedule: None,
            },
        };

        if let Some(amount) = self.loan_amount {
            settings.loan_amount = amount;
        }
        if let Some(rate) = self.fixed_rate {
            settings.fixed_rate = Some(rate);
        }
        if let Some(rate) = self.variable_rate {
            settings.variable_rate = Some(rate);
        }
        if let Some(years) = self.fixed_tenure {
            settings.fixed_tenure = Some(years);
        }
        if let Some(date) = &self.start_date {
            settings.start_date = date.clone();
        }
        if let Some(years) = self.tenure {
            settings.tenure = years;
        }

        Ok(settings)
    }

    fn configuration(&self, time: &SafeTimeProvider) -> anyhow::Result<LoanConfiguration> {
        Ok(self.settings(time)?.into_configuration()?)
    }
}

fn create_output(path: &Path) -> anyhow::Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    Ok(BufWriter::new(file))
}

fn print_lines(lines: Vec<String>) {
    println!("{}", lines.join("\n"));
}

/// a relative `payment_schedule` is read from beside the settings file
fn schedule_path(settings_file: Option<&Path>, schedule: &str) -> PathBuf {
    let schedule = Path::new(schedule);
    match settings_file.and_then(Path::parent) {
        Some(dir) if schedule.is_relative() => dir.join(schedule),
        _ => schedule.to_path_buf(),
    }
}

/// add the balance-date payment to the history, if one was made
fn with_as_of_payment(
    mut payments: Vec<PaymentRecord>,
    as_of: NaiveDate,
    amount: Decimal,
) -> anyhow::Result<Vec<PaymentRecord>> {
    if amount < Decimal::ZERO {
        bail!("--as-of-payment must not be negative, got {}", amount);
    }
    if !amount.is_zero() {
        payments.push(PaymentRecord::new(as_of, Money::from_decimal(amount)));
    }
    Ok(payments)
}

fn run_balance(args: BalanceArgs, as_json: bool, time: &SafeTimeProvider) -> anyhow::Result<()> {
    let settings = args.loan.settings(time)?;
    let payments_path = match (&args.payments, &settings.payment_schedule) {
        (Some(path), _) => path.clone(),
        (None, Some(path)) => schedule_path(args.loan.config.as_deref(), path),
        (None, None) => {
            bail!("--payments is required when the settings file names no payment_schedule")
        }
    };
    let config = settings.into_configuration()?;
    let payments = load_payments(&payments_path)
        .with_context(|| format!("loading payments from {}", payments_path.display()))?;

    let as_of = match &args.as_of {
        Some(date) => parse_date(date)?,
        None => time.now().date_naive(),
    };

    match args.mode {
        Mode::Daily => {
            let payments = with_as_of_payment(payments, as_of, args.as_of_payment)?;
            let schedule = DailyBalanceEngine::compute(&config, &payments)?;
            let comparison = if args.compare {
                Some(schedule.compare(&DailyBalanceEngine::baseline(&config)?))
            } else {
                None
            };

            if let Some(path) = &args.output {
                write_balance_csv(&schedule, create_output(path)?)?;
            }

            let balance_as_of = schedule.balance_on(as_of).map(|balance| balance.to_pence());
            if as_json {
                let value = json!({
                    "summary": schedule.summary(),
                    "as_of": as_of,
                    "balance_as_of": balance_as_of,
                    "comparison": comparison,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                print_lines(balance_summary(&schedule, comparison.as_ref()));
                if let Some(balance) = balance_as_of {
                    println!(
                        "• Balance on {}: {}",
                        as_of.format(DATE_FORMAT),
                        format_currency(balance)
                    );
                }
            }
        }
        Mode::PaymentDay => {
            let as_of_payment = Money::from_decimal(args.as_of_payment);
            let schedule = PaymentDayEngine::compute(&config, &payments, as_of, as_of_payment)?;

            if let Some(path) = &args.output {
                write_payment_day_csv(&schedule, create_output(path)?)?;
            }

            if as_json {
                let value = json!({
                    "as_of": schedule.as_of,
                    "balance": schedule.final_balance().to_pence(),
                    "total_interest": schedule.total_interest().to_pence(),
                    "payoff_date": schedule.payoff_date,
                    "entries": schedule.entries,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!(
                    "Balance on {}: {}",
                    schedule.as_of.format(DATE_FORMAT),
                    format_currency(schedule.final_balance())
                );
                println!("Interest charged: {}", format_currency(schedule.total_interest()));
            }
        }
    }

    Ok(())
}

fn run_amortise(args: AmortiseArgs, as_json: bool, time: &SafeTimeProvider) -> anyhow::Result<()> {
    let config = args.loan.configuration(time)?;
    let schedule = AmortizationSchedule::generate(&config)?;

    if let Some(path) = &args.output {
        write_amortization_csv(&schedule, create_output(path)?)?;
    }

    if as_json {
        let value = json!({
            "monthly_payment": schedule.initial_payment().to_pence(),
            "total_interest": schedule.total_interest.to_pence(),
            "total_payment": schedule.total_payment.to_pence(),
            "repayment_ratio": schedule.repayment_ratio(),
            "months": schedule.payments.len(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print_lines(loan_summary(&config, &schedule, None));
    }

    Ok(())
}

fn run_overpay(args: OverpayArgs, as_json: bool, time: &SafeTimeProvider) -> anyhow::Result<()> {
    let config = args.loan.configuration(time)?;
    let overpayment = Money::from_decimal(args.overpayment);
    let overpaid = OverpaymentSchedule::generate(&config, overpayment)?;

    if let Some(path) = &args.output {
        write_amortization_csv(&overpaid.schedule, create_output(path)?)?;
    }

    let comparison = if args.compare {
        Some(overpaid.compare(&AmortizationSchedule::generate(&config)?))
    } else {
        None
    };

    if as_json {
        let value = json!({
            "months": overpaid.months(),
            "total_interest": overpaid.total_interest().to_pence(),
            "total_payment": overpaid.schedule.total_payment.to_pence(),
            "repayment_ratio": overpaid.schedule.repayment_ratio(),
            "comparison": comparison,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        match &comparison {
            Some(comparison) => print_lines(comparison_summary(&config, comparison)),
            None => print_lines(loan_summary(&config, &overpaid.schedule, Some(overpayment))),
        }
    }

    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let time = SafeTimeProvider::new(TimeSource::System);

    let result = match cli.command {
        Commands::Balance(args) => run_balance(args, cli.json, &time),
        Commands::Amortise(args) => run_amortise(args, cli.json, &time),
        Commands::Overpay(args) => run_overpay(args, cli.json, &time),
    };

    if let Err(e) = result {
        eprintln!("error: {:#}", e);
        process::exit(1);
    }
}
