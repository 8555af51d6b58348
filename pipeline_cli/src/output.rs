use colored::*;
use pipeline_core::ValidationVerdict;
use serde_json::json;

pub fn print_verdict(verdict: &ValidationVerdict, format: &str) {
    match format {
        "json" => print_json_verdict(verdict),
        _ => print_text_verdict(verdict),
    }
}

fn print_text_verdict(verdict: &ValidationVerdict) {
    println!("\n{}", "═".repeat(60));
    println!("{}", "  VALIDATION VERDICT".bold());
    println!("{}", "═".repeat(60));

    if verdict.passed() {
        println!(
            "\n{} {}",
            "✓".green().bold(),
            "Validation PASSED".green().bold()
        );
    } else {
        println!(
            "\n{} {}",
            "✗".red().bold(),
            "Validation FAILED".red().bold()
        );
    }

    println!("\n{}", "Checks:".bold());
    for check in verdict.checks() {
        if check.passed {
            println!("  {} {}: {}", "✓".green(), check.name, check.message);
        } else {
            println!(
                "  {} {}: {}",
                "✗".red(),
                check.name.red(),
                check.message.red()
            );
        }
    }

    let failed = verdict.failures().count();
    println!("\n{}", "Summary:".bold());
    println!("  Total checks: {}", verdict.checks().len());
    println!("  Failed:       {failed}");
    println!("{}", "═".repeat(60));
}

fn print_json_verdict(verdict: &ValidationVerdict) {
    let output = json!({
        "passed": verdict.passed(),
        "checks": verdict.checks(),
        "summary": {
            "check_count": verdict.checks().len(),
            "failure_count": verdict.failures().count(),
        }
    });

    match serde_json::to_string_pretty(&output) {
        Ok(rendered) => println!("{rendered}"),
        Err(error) => eprintln!("Failed to render JSON verdict: {error}"),
    }
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}
