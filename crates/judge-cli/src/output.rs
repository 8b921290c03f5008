//! Human and CI output for run reports

use colored::Colorize;
use judge_core::{ItemOutcome, ItemStatus, RunReport};

use crate::error::{CliError, Result};

fn tag(status: ItemStatus) -> colored::ColoredString {
    match status {
        ItemStatus::Succeeded => "OK".green().bold(),
        ItemStatus::Skipped => "SKIP".yellow().bold(),
        ItemStatus::Failed => "FAIL".red().bold(),
    }
}

/// Escape a value for a GitHub Actions workflow command.
fn escape_annotation(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// `::error file=<file>::<message>` for one failed item.
pub fn annotation(outcome: &ItemOutcome) -> String {
    let message = escape_annotation(outcome.message.as_deref().unwrap_or("failed"));
    let file = outcome.file.as_deref().unwrap_or(&outcome.item);
    format!("::error file={}::{message}", escape_annotation(file))
}

/// Print every item, then the summary line.
pub fn print_report(report: &RunReport, ci: bool) {
    for outcome in &report.items {
        match &outcome.message {
            Some(message) => println!(
                "{} {} {}",
                tag(outcome.status),
                outcome.item.cyan(),
                message.dimmed()
            ),
            None => println!("{} {}", tag(outcome.status), outcome.item.cyan()),
        }
    }

    println!();
    println!(
        "{} {} succeeded, {} skipped, {} failed",
        "Summary:".bold(),
        report.count(ItemStatus::Succeeded),
        report.count(ItemStatus::Skipped),
        report.count(ItemStatus::Failed)
    );

    if ci {
        for failure in report.failures() {
            eprintln!("{}", annotation(failure));
        }
    }
}

/// Exit status of a finished run.
pub fn finish(report: &RunReport) -> Result<()> {
    let failed = report.count(ItemStatus::Failed);
    if failed > 0 {
        Err(CliError::Incomplete { failed })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed(file: Option<&str>, message: &str) -> ItemOutcome {
        ItemOutcome {
            item: "p/sumas".into(),
            status: ItemStatus::Failed,
            file: file.map(str::to_string),
            message: Some(message.into()),
        }
    }

    #[test]
    fn annotation_escapes_workflow_characters() {
        let line = annotation(&failed(Some("p/sumas/settings.json"), "100% bad\r\nline"));
        assert_eq!(
            line,
            "::error file=p/sumas/settings.json::100%25 bad%0D%0Aline"
        );
    }

    #[test]
    fn annotation_falls_back_to_item() {
        assert_eq!(annotation(&failed(None, "boom")), "::error file=p/sumas::boom");
    }

    #[test]
    fn finish_fails_on_any_failure() {
        let mut report = RunReport::new();
        report.succeeded("a");
        assert!(finish(&report).is_ok());
        report.failed("b", "x");
        assert!(matches!(
            finish(&report),
            Err(CliError::Incomplete { failed: 1 })
        ));
    }
}
