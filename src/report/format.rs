//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the scoring code stays clean and testable
//! - output changes are localized

use chrono::{Datelike, NaiveDate};

use crate::app::pipeline::DecisionOutput;
use crate::domain::{Savings, TenorSignal};
use crate::window::{current_window, days_until_next_window, next_window, windows_in};

/// Format the full decision summary: headline, reasons, per-tenor table, savings.
pub fn format_decision(output: &DecisionOutput) -> String {
    let signal = &output.signal;
    let mut out = String::new();

    out.push_str("=== fixrate - bind or wait ===\n");
    out.push_str(&format!("As-of: {}\n", output.as_of.format("%Y-%m-%d %H:%M UTC")));
    if let Some(period) = &output.period {
        out.push_str(&format!("Rate period: {period}\n"));
    }
    out.push_str(&format!("Loan amount: {}\n", fmt_amount(output.loan_amount)));
    match (output.next_window, output.days_to_window) {
        (Some(w), Some(0)) => out.push_str(&format!("Window open: {} .. {}\n", w.start, w.end)),
        (Some(w), Some(days)) => out.push_str(&format!(
            "Next window: {} .. {} (in {days} days)\n",
            w.start, w.end
        )),
        _ => {}
    }

    out.push_str(&format!("\nRecommendation: {}\n", signal.headline()));
    if let Some(opportunity) = &signal.opportunity {
        out.push_str(&format!("Max opportunity: {}\n", opportunity.note));
    }
    for reason in &signal.reasons {
        out.push_str(&format!("- {reason}\n"));
    }

    out.push_str("\nPer tenor:\n");
    out.push_str(&format_tenor_table(&signal.per_tenor));

    if !output.savings.is_empty() {
        out.push_str("\nSavings (bind now vs. next rate):\n");
        out.push_str(&format_savings_table(&output.savings));
    }

    out
}

fn format_tenor_table(rows: &[TenorSignal]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<6} {:<10} {:>8} {:>6} {:<7} {:>8} {:>8} {:>8} {:>8}\n",
        "tenor", "verdict", "score", "conf", "quality", "current", "est", "diff", "swap"
    ));
    out.push_str(&format!(
        "{:-<6} {:-<10} {:-<8} {:-<6} {:-<7} {:-<8} {:-<8} {:-<8} {:-<8}\n",
        "", "", "", "", "", "", "", "", ""
    ));
    for s in rows {
        out.push_str(
            format!(
                "{:<6} {:<10} {:>+8.2} {:>6.2} {:<7} {:>8} {:>8} {:>8} {:>8}\n",
                s.tenor.to_string(),
                s.verdict.as_str(),
                s.score,
                s.confidence,
                s.data_quality.as_str(),
                fmt_opt(s.current_rate, false),
                fmt_opt(s.estimated_next, false),
                fmt_opt(s.estimate_diff, true),
                fmt_opt(s.swap_trend, true),
            )
            .trim_end(),
        );
        out.push('\n');
    }
    out
}

fn format_savings_table(rows: &[Savings]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<6} {:>8} {:>8} {:>12} {:>12} {:<9} {:<6}\n",
        "tenor", "fixed", "next", "per year", "total", "action", "risk"
    ));
    out.push_str(&format!(
        "{:-<6} {:-<8} {:-<8} {:-<12} {:-<12} {:-<9} {:-<6}\n",
        "", "", "", "", "", "", ""
    ));
    for s in rows {
        out.push_str(&format!(
            "{:<6} {:>8.3} {:>8.3} {:>12} {:>12} {:<9} {:<6}\n",
            s.tenor.to_string(),
            s.fixed_rate,
            s.estimated_next_rate,
            fmt_amount(s.annual_diff),
            fmt_amount(s.total_diff),
            if s.bind_now { "bind now" } else { "wait" },
            s.risk.to_string(),
        ));
    }
    out
}

/// Rate-setting windows for `today`'s year, marking the open/next one.
pub fn format_windows(today: NaiveDate) -> String {
    let mut out = String::new();
    let current = current_window(today);
    let next = next_window(today);

    out.push_str(&format!("Rate-setting windows ({today}):\n"));
    for w in windows_in(today.year()) {
        let marker = if Some(w) == current {
            "  <- open"
        } else if Some(w) == next {
            "  <- next"
        } else {
            ""
        };
        out.push_str(&format!("  {} .. {}{marker}\n", w.start, w.end));
    }
    if let (Some(w), Some(days)) = (next, days_until_next_window(today)) {
        if current.is_none() {
            out.push_str(&format!("Next window opens {} (in {days} days)\n", w.start));
        }
    }
    out
}

fn fmt_opt(v: Option<f64>, signed: bool) -> String {
    match v {
        Some(x) if signed => format!("{x:+.3}"),
        Some(x) => format!("{x:.3}"),
        None => "-".to_string(),
    }
}

/// Whole currency units with thousands separators, e.g. `-12 500`.
fn fmt_amount(v: f64) -> String {
    let rounded = v.round();
    let digits = format!("{}", rounded.abs() as u64);
    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}
