//! ab-runner: headless A/B analysis runner for the up-sell carousel.
//!
//! Usage:
//!   ab-runner --seed 42 --users 10000 --confidence 95
//!   ab-runner --config params.json --json
//!   ab-runner --control-rate 0.10 --treatment-rate 0.10 --welch --no-yates

use anyhow::Result;
use serde::Serialize;
use std::env;
use std::process::ExitCode;
use upsell_ab_core::{
    config::ParameterBounds,
    report::{render_summary, ConversionChart, PurchaseBoxPlot},
    run_analysis,
    significance::TTestType,
    AnalysisError, AnalysisReport, SimulationParameters,
};

#[derive(Serialize)]
struct RunnerOutput<'a> {
    generated_at:      String,
    parameters:        &'a SimulationParameters,
    conversion_chart:  ConversionChart,
    purchase_box_plot: PurchaseBoxPlot,
    report:            &'a AnalysisReport,
}

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<AnalysisError>() {
                Some(AnalysisError::InvalidParameters(violations)) => {
                    eprintln!("Invalid parameters:");
                    for v in violations {
                        eprintln!("  - {v}");
                    }
                }
                _ => eprintln!("error: {e:#}"),
            }
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let params = build_parameters(&args)?;
    let json = has_flag(&args, "--json");
    let include_users = has_flag(&args, "--include-users");
    log::debug!("parameters: {params:?}");

    if !has_flag(&args, "--no-range-check") {
        ParameterBounds::interactive().check(&params)?;
    }

    if !json {
        println!("A/B Test Analysis for Up-sell Carousel");
        println!("  seed:        {}", params.seed);
        println!("  users:       {}", params.population);
        println!(
            "  store-brand:    rate {:.2}  purchase ~ N({:.2}, {:.2})",
            params.control.conversion_rate,
            params.control.purchase_mean,
            params.control.purchase_std
        );
        println!(
            "  national-brand: rate {:.2}  purchase ~ N({:.2}, {:.2})",
            params.treatment.conversion_rate,
            params.treatment.purchase_mean,
            params.treatment.purchase_std
        );
        println!("  confidence:  {:.0}% (alpha {:.2})", params.confidence * 100.0, params.alpha());
        println!("  t-test:      {:?}", params.t_test);
        println!();
    }

    let mut report = run_analysis(&params)?;
    let conversion_chart = ConversionChart::from_report(&report);
    let purchase_box_plot = PurchaseBoxPlot::from_users(&report.users);

    if json {
        if !include_users {
            report.users.clear();
        }
        let output = RunnerOutput {
            generated_at: chrono::Utc::now().to_rfc3339(),
            parameters: &params,
            conversion_chart,
            purchase_box_plot,
            report: &report,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print!("{}", render_summary(&report));
        println!();
        print_box_plot(&purchase_box_plot);
    }
    Ok(())
}

fn build_parameters(args: &[String]) -> Result<SimulationParameters> {
    let mut params = match arg_value(args, "--config") {
        Some(path) => SimulationParameters::load(path)?,
        None => SimulationParameters::default(),
    };

    params.seed = parse_arg(args, "--seed", params.seed)?;
    params.population = parse_arg(args, "--users", params.population)?;
    params.split = parse_arg(args, "--split", params.split)?;
    params.control.conversion_rate =
        parse_arg(args, "--control-rate", params.control.conversion_rate)?;
    params.treatment.conversion_rate =
        parse_arg(args, "--treatment-rate", params.treatment.conversion_rate)?;
    params.control.purchase_mean =
        parse_arg(args, "--control-mean", params.control.purchase_mean)?;
    params.control.purchase_std = parse_arg(args, "--control-std", params.control.purchase_std)?;
    params.treatment.purchase_mean =
        parse_arg(args, "--treatment-mean", params.treatment.purchase_mean)?;
    params.treatment.purchase_std =
        parse_arg(args, "--treatment-std", params.treatment.purchase_std)?;
    // Percent on the command line, fraction internally.
    if arg_value(args, "--confidence").is_some() {
        params.confidence = parse_arg(args, "--confidence", 0.0)? / 100.0;
    }

    if has_flag(args, "--welch") {
        params.t_test = TTestType::Welch;
    }
    if has_flag(args, "--no-yates") {
        params.yates_correction = false;
    }
    Ok(params)
}

fn print_box_plot(plot: &PurchaseBoxPlot) {
    println!("=== {} ===", plot.title.to_uppercase());
    for series in &plot.series {
        match &series.summary {
            Some(s) => println!(
                "  {:<15} n={:<6} min {:>7.2} | q1 {:>7.2} | median {:>7.2} | q3 {:>7.2} | max {:>7.2}",
                series.label, series.count, s.min, s.q1, s.median, s.q3, s.max
            ),
            None => println!("  {:<15} n=0      (no converted users)", series.label),
        }
    }
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T>(args: &[String], flag: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match arg_value(args, flag) {
        Some(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("Cannot parse {flag} value '{raw}': {e}")),
        None => Ok(default),
    }
}
