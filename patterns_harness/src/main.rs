//! Pattern Harness CLI
//!
//! Run the built-in design pattern scenarios and report their verdicts.

use clap::Parser;
use patterns_env::HarnessError;
use patterns_harness::{run_suite, Category, HarnessConfig, RunExport, RunStatus, ScenarioId};
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Widest trace message printed by `--show-trace`; the export keeps every message whole.
const TRACE_DISPLAY_WIDTH: usize = 160;

/// Design pattern scenario harness
#[derive(Parser, Debug)]
#[command(name = "patterns-harness")]
#[command(about = "Run design pattern demonstrations and check their traces", long_about = None)]
struct Args {
    /// Scenario to run (e.g. shipping_strategy, order_validation, all)
    #[arg(short = 'S', long, default_value = "all")]
    scenario: String,

    /// Only run scenarios of this category (behavioral, creational, structural)
    #[arg(short, long)]
    category: Option<String>,

    /// List the available scenarios and exit
    #[arg(short, long)]
    list: bool,

    /// Print every run's trace
    #[arg(short = 't', long)]
    show_trace: bool,

    /// Stop after the first run that does not pass
    #[arg(long)]
    fail_fast: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// JSON output for CI parsing
    #[arg(long)]
    json: bool,

    /// Export all run results, traces included, to a JSON file
    #[arg(long)]
    export: Option<String>,
}

fn list_scenarios() {
    for category in [Category::Behavioral, Category::Creational, Category::Structural] {
        println!("{}:", category);
        for scenario in ScenarioId::by_category(category) {
            println!("  {:<22} {}", scenario.name(), scenario.description());
        }
    }
}

/// Cuts a message to `max_chars` for console display.
fn clip(message: &str, max_chars: usize) -> String {
    if message.chars().count() <= max_chars {
        return message.to_string();
    }
    let mut cut: String = message.chars().take(max_chars.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}

fn write_export(export: &RunExport, path: &str) -> Result<(), HarnessError> {
    export.write_to_file(path)?;
    info!("Exported {} runs to {}", export.total, path);
    Ok(())
}

fn print_summary(export: &RunExport) {
    info!("");
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    if export.all_passed() {
        info!("✅ All {} scenario runs passed!", export.total);
    } else {
        error!("❌ {}/{} scenario runs failed!", export.failed, export.total);
        for result in export.failures() {
            error!(
                "  - {} [{}]: {}",
                result.scenario(),
                result.status(),
                result.failure_reason().unwrap_or("unknown")
            );
        }
    }
}

fn main() {
    let args = Args::parse();

    if args.list {
        list_scenarios();
        return;
    }

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    if !args.json {
        info!("Pattern Harness v{}", env!("CARGO_PKG_VERSION"));
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    }

    // Parse scenarios
    let mut config = HarnessConfig {
        fail_fast: args.fail_fast,
        ..HarnessConfig::default()
    };
    if args.scenario != "all" {
        match args.scenario.parse::<ScenarioId>() {
            Ok(scenario) => config.scenarios = vec![scenario],
            Err(e) => {
                eprintln!("Error: {}", e);
                eprintln!("Run with --list to see the available scenarios");
                std::process::exit(2);
            }
        }
    }
    if let Some(category) = &args.category {
        match category.parse::<Category>() {
            Ok(category) => config = config.only_category(category),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(2);
            }
        }
    }
    if config.scenarios.is_empty() {
        warn!("No scenario matches the selection");
    }

    let export = match run_suite(&config) {
        Ok(export) => export,
        Err(e) => {
            error!("Harness setup failed: {}", e);
            std::process::exit(2);
        }
    };

    if !args.json {
        for result in &export.results {
            match result.status() {
                RunStatus::Passed => info!("✓ {} PASSED", result.scenario()),
                status => error!(
                    "✗ {} {}: {}",
                    result.scenario(),
                    status,
                    result.failure_reason().unwrap_or("unknown")
                ),
            }
            if args.show_trace {
                for event in result.trace() {
                    info!(
                        "    [{:>3}] {}",
                        event.sequence,
                        clip(&event.message, TRACE_DISPLAY_WIDTH)
                    );
                }
            }
        }
    }

    if let Some(path) = &args.export {
        if let Err(e) = write_export(&export, path) {
            error!("Failed to write export: {}", e);
            std::process::exit(2);
        }
    }

    if args.json {
        // JSON output for CI parsing
        let summary = serde_json::json!({
            "total": export.total,
            "passed": export.passed,
            "failed": export.failed,
            "results": export.results.iter().map(|r| {
                serde_json::json!({
                    "scenario": r.scenario(),
                    "run_id": r.run_id(),
                    "status": r.status(),
                    "steps": r.steps_executed(),
                    "trace_events": r.trace().len(),
                    "failure_reason": r.failure_reason(),
                })
            }).collect::<Vec<_>>(),
        });
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => error!("Failed to encode summary: {}", e),
        }
    } else {
        print_summary(&export);
    }

    // Exit with proper code for CI
    if !export.all_passed() {
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_only_cuts_long_messages() {
        assert_eq!(clip("shipping.free -> calculate(100) = 0", 80), "shipping.free -> calculate(100) = 0");
        let cut = clip(&"x".repeat(200), 20);
        assert_eq!(cut.chars().count(), 20);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn test_write_export_reports_unwritable_path() {
        let err = write_export(&RunExport::new(), "/nonexistent-dir/for/sure/export.json").unwrap_err();
        assert!(matches!(err, HarnessError::Export(_)));
    }
}
