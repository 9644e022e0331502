use anyhow::{Context, Result};
use colored::Colorize;
use std::process::Command;
use std::time::Instant;

/// Run one `cargo test` invocation, printing its summary.
fn run_suite(label: &str, args: &[&str]) -> Result<()> {
    println!("{}", format!("  Running {label}...").cyan());
    let start = Instant::now();

    let output = Command::new("cargo")
        .args(args)
        .output()
        .with_context(|| format!("Failed to run {label}"))?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !output.status.success() {
        eprintln!("{}", format!("  ✗ {label} failed").red().bold());
        eprintln!();
        for line in stdout.lines() {
            eprintln!("  {line}");
        }
        anyhow::bail!("{label} failed");
    }

    println!(
        "{}",
        format!(
            "  ✓ {label} passed {} in {:.2}s",
            extract_test_summary(&stdout),
            start.elapsed().as_secs_f64()
        )
        .green()
    );
    println!();
    Ok(())
}

pub fn run(unit_only: bool, integration_only: bool) -> Result<()> {
    println!();
    println!("{}", "🧪 Running tests...".cyan().bold());
    println!();

    let total_start = Instant::now();

    if !integration_only {
        run_suite("unit tests", &["test", "--lib", "--workspace"])?;
    }

    if !unit_only {
        run_suite("platform integration tests", &["test", "-p", "hpm-platform", "--tests"])?;
        run_suite("board integration tests", &["test", "-p", "hpm6300evk", "--tests"])?;
        // The boot prints and SDRAM paths only run with their features on
        run_suite(
            "board tests with every boot option",
            &["test", "-p", "hpm6300evk", "--features", "show-clock,show-banner,ext-ram,flash-xip,flash-uf2"],
        )?;
    }

    if !unit_only && !integration_only {
        run_suite("doc tests", &["test", "--doc", "--workspace"])?;
    }

    println!(
        "{}",
        format!("✓ All tests completed in {:.2}s", total_start.elapsed().as_secs_f64())
            .green()
            .bold()
    );
    println!();

    Ok(())
}

fn extract_test_summary(output: &str) -> String {
    // Last "test result: ok. 5 passed; 0 failed; ..." line
    output
        .lines()
        .filter_map(|line| line.split("test result:").nth(1))
        .last()
        .map_or_else(|| "(summary not available)".to_string(), |s| s.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::extract_test_summary;

    #[test]
    fn summary_is_taken_from_result_line() {
        let out = "running 2 tests\ntest a ... ok\ntest result: ok. 2 passed; 0 failed\n";
        assert_eq!(extract_test_summary(out), "ok. 2 passed; 0 failed");
        assert_eq!(extract_test_summary(""), "(summary not available)");
    }
}
