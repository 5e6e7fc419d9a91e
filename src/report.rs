//! Plain-text loan summaries for the terminal.

use crate::balance::{BalanceSchedule, ScheduleComparison};
use crate::config::{LoanConfiguration, DATE_FORMAT};
use crate::decimal::{Money, Rate};
use crate::payments::{AmortizationSchedule, OverpaymentComparison};

const RULE_WIDTH: usize = 30;

/// format as pounds with thousands separators, e.g. `£331,794.00`
pub fn format_currency(amount: Money) -> String {
    let rounded = format!("{:.2}", amount.to_pence().as_decimal().abs());
    let (whole, pence) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount.to_pence().is_negative() { "-" } else { "" };
    format!("{}£{}.{}", sign, grouped, pence)
}

fn format_rate(rate: Rate) -> String {
    format!("{:.2}%", rate.as_percentage())
}

fn header(lines: &mut Vec<String>, title: &str) {
    lines.push("=".repeat(RULE_WIDTH));
    lines.push(format!(" {}", title));
    lines.push("-".repeat(RULE_WIDTH));
}

/// amount, term and rate structure
fn loan_terms(config: &LoanConfiguration, lines: &mut Vec<String>) {
    lines.push(format!("• Amount: {}", format_currency(config.principal)));
    lines.push(format!(
        "• Term: {} years ({} months)",
        config.tenure_years,
        config.tenure_months()
    ));

    match (config.fixed_rate, config.variable_rate, config.fixed_tenure_years) {
        (Some(fixed), Some(variable), Some(years)) => {
            lines.push(format!("• Fixed: {} for {} years", format_rate(fixed), years));
            lines.push(format!("• Variable: {} thereafter", format_rate(variable)));
        }
        (Some(fixed), _, _) => {
            lines.push(format!("• Fixed Rate: {} (full term)", format_rate(fixed)))
        }
        (None, Some(variable), _) => {
            lines.push(format!("• Variable Rate: {} (full term)", format_rate(variable)))
        }
        (None, None, _) => {}
    }
}

fn repayment_ratio_line(ratio: Option<rust_decimal::Decimal>) -> Option<String> {
    ratio.map(|ratio| format!("• Repayment Ratio: £{} for every £1 borrowed", ratio))
}

/// summary of a repayment schedule, optionally with a monthly overpayment
pub fn loan_summary(
    config: &LoanConfiguration,
    schedule: &AmortizationSchedule,
    overpayment: Option<Money>,
) -> Vec<String> {
    let mut lines = Vec::new();
    header(&mut lines, "Loan Summary");
    loan_terms(config, &mut lines);

    lines.push(format!("• Monthly Payment: {}", format_currency(schedule.initial_payment())));
    if let Some(amount) = overpayment.filter(|amount| amount.is_positive()) {
        lines.push(format!("• Monthly Overpayment: {}", format_currency(amount)));
    }
    lines.push(format!("• Total Interest: {}", format_currency(schedule.total_interest)));
    lines.extend(repayment_ratio_line(schedule.repayment_ratio()));

    lines
}

/// summary with the effect of overpaying against the contractual schedule
pub fn comparison_summary(
    config: &LoanConfiguration,
    comparison: &OverpaymentComparison,
) -> Vec<String> {
    let mut lines = Vec::new();
    header(&mut lines, "Loan Summary");
    loan_terms(config, &mut lines);

    if comparison.monthly_overpayment.is_positive() {
        lines.push(format!(
            "• Monthly Overpayment: {}",
            format_currency(comparison.monthly_overpayment)
        ));
    }
    lines.extend(repayment_ratio_line(comparison.standard_ratio));

    lines.push(" Comparison Summary:".to_string());
    if let Some(ratio) = comparison.overpayment_ratio {
        lines.push(format!("   - Overpayment Repayment Ratio: £{} per £1 borrowed", ratio));
    }
    lines.push(format!(
        "   - Mortgage Term with Overpayment: {} year(s) and {} month(s)",
        comparison.years, comparison.months
    ));
    lines.push(format!("   - Interest Savings: {}", format_currency(comparison.interest_saved)));

    lines
}

/// summary of a daily balance run, with its comparison to the no-payment
/// baseline when one is given
pub fn balance_summary(
    schedule: &BalanceSchedule,
    baseline: Option<&ScheduleComparison>,
) -> Vec<String> {
    let summary = schedule.summary();
    let mut lines = Vec::new();
    header(&mut lines, "Balance Summary");
    loan_terms(schedule.config(), &mut lines);

    lines.push(format!(
        "• Period: {} to {} ({} days)",
        summary.start_date.format(DATE_FORMAT),
        summary.end_date.format(DATE_FORMAT),
        summary.total_days
    ));
    lines.push(format!("• Total Paid: {}", format_currency(summary.total_payments)));
    lines.push(format!("• Interest Charged: {}", format_currency(summary.total_interest)));
    lines.push(format!("• Balance: {}", format_currency(summary.final_balance)));

    if let Some(paid_on) = summary.payoff_date {
        lines.push(format!("• Paid Off: {}", paid_on.format(DATE_FORMAT)));
    }
    if summary.absorbed_excess.is_positive() {
        lines.push(format!("• Overpaid By: {}", format_currency(summary.absorbed_excess)));
    }
    if summary.unapplied_payments > 0 {
        lines.push(format!("• Payments Not Applied: {}", summary.unapplied_payments));
    }

    if let Some(comparison) = baseline {
        lines.push(" Against No Payments:".to_string());
        lines.push(format!(
            "   - Interest Savings: {}",
            format_currency(comparison.interest_saved)
        ));
        lines.push(format!(
            "   - Balance Reduction: {}",
            format_currency(comparison.balance_reduction)
        ));
    }

    lines
}
