pub mod config;
pub mod error;

use crate::platform::PlatformResolution;
use crate::strategy::{DeadlineWait, DispatchWait, PollMode, PollWait};
use crate::timing::{shared_queue, Harness, ResolutionGuard};
use crate::ui::{render_table, StrategyReport};
use crate::utils::system_info::{cpu_brand, os_description};
use colored::*;
use config::{BenchmarkingParameters, SETTINGS_FILE};
use error::BenchResult;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tracing::info;

/// Measure every configured delay with `strategy`.
pub fn measure_strategy(
    harness: &Harness,
    strategy: &mut dyn DeadlineWait,
    params: &BenchmarkingParameters,
) -> BenchResult<StrategyReport> {
    let mut report = StrategyReport::new(strategy.label());

    let pb = ProgressBar::new(params.target_delays_ms.len() as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        pb.set_style(style.progress_chars("##-"));
    }

    for target in params.target_delays() {
        pb.set_message(format!("{} ({} ms)", report.label, target.as_millis()));
        let summary = harness.run(strategy, target)?;
        report.push(target, summary);
        pb.inc(1);
    }
    pb.finish_and_clear();
    Ok(report)
}

fn print_report(report: &StrategyReport) {
    println!("{}", report.label.bold().yellow());
    println!("━━━━━━━━━━━━━━━━━━━");
    println!("{}\n", render_table(report));
}

/// Run both strategies over the configuration in `appsettings.json` and
/// print a results table for each.
pub fn run_benchmark() -> BenchResult<()> {
    let params = BenchmarkingParameters::load(Path::new(SETTINGS_FILE))?;

    let separator = "=".repeat(60);
    println!("\n{}", separator);
    println!("{:^60}", "Sleep Latency Benchmark".bold().cyan());
    println!("{}\n", separator);

    println!("{}", "System Information".bold().yellow());
    println!("━━━━━━━━━━━━━━━━━━━");
    println!("Version:     {}", crate::VERSION);
    println!("OS:          {}", os_description());
    println!("CPU:         {}", cpu_brand());
    println!("Delays (ms): {:?}", params.target_delays_ms);
    println!("Repetitions: {}", params.repetitions);
    println!("Poll mode:   {:?}\n", params.poll_mode);
    info!(?params, "starting benchmark");

    let harness = Harness::new(shared_queue()?, params.repetitions);

    let mut dispatch = DispatchWait::new(harness.queue());
    let report = measure_strategy(&harness, &mut dispatch, &params)?;
    print_report(&report);
    drop(dispatch);

    let mut poll = PollWait::new(harness.queue(), params.poll_mode);
    let report = {
        let _global = match params.poll_mode {
            PollMode::GlobalHighRes => Some(ResolutionGuard::acquire(PlatformResolution::new())?),
            _ => None,
        };
        measure_strategy(&harness, &mut poll, &params)?
    };
    print_report(&report);

    info!("benchmark complete");
    Ok(())
}
