mod app;
mod core;
mod effect;
mod error;
mod event;
mod event_emitter;
mod platform;
mod sim;
mod simulate;

use std::path::PathBuf;

use anyhow::{Context, Result};
use argh::FromArgs;
use resizerable_proto::{EventFilter, Margins, Rect};
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Resizerable - margin resize and smart minimize for desktop windows
#[derive(FromArgs)]
struct Cli {
    #[argh(subcommand)]
    command: Option<SubCommand>,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum SubCommand {
    Simulate(SimulateCmd),
    TargetRect(TargetRectCmd),
    Version(VersionCmd),
}

/// Replay a scenario against a simulated desktop
#[derive(FromArgs)]
#[argh(subcommand, name = "simulate")]
struct SimulateCmd {
    /// scenario file (JSON)
    #[argh(positional)]
    scenario: PathBuf,
    /// settings file (JSON), overrides the scenario's own settings
    #[argh(option)]
    settings: Option<PathBuf>,
    /// event categories to print (window,binding,minimize,lifecycle or all)
    #[argh(option, default = "String::from(\"all\")")]
    events: String,
}

/// Show where a window would land for a work area and margins
#[derive(FromArgs)]
#[argh(subcommand, name = "target-rect")]
struct TargetRectCmd {
    /// work area x
    #[argh(positional)]
    x: i32,
    /// work area y
    #[argh(positional)]
    y: i32,
    /// work area width
    #[argh(positional)]
    width: u32,
    /// work area height
    #[argh(positional)]
    height: u32,
    /// margins as fractions: <all> | <vert> <horiz> | <top> <right> <bottom> <left>
    #[argh(positional, greedy)]
    margins: Vec<String>,
}

/// Show version information
#[derive(FromArgs)]
#[argh(subcommand, name = "version")]
struct VersionCmd {}

fn main() -> Result<()> {
    let cli: Cli = argh::from_env();

    match cli.command {
        None => {
            // No subcommand: show top-level help
            let args: Vec<&str> = vec!["resizerable", "--help"];
            if let Err(e) = Cli::from_args(&args[..1], &args[1..]) {
                println!("{}", e.output);
            }
            Ok(())
        }
        Some(SubCommand::Simulate(cmd)) => {
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::from_default_env())
                .with_writer(std::io::stderr)
                .init();
            run_simulate(cmd)
        }
        Some(SubCommand::TargetRect(cmd)) => run_target_rect(cmd),
        Some(SubCommand::Version(_)) => {
            println!("resizerable {}", VERSION);
            Ok(())
        }
    }
}

fn run_simulate(cmd: SimulateCmd) -> Result<()> {
    let filter = EventFilter::from_names(&cmd.events)
        .map_err(anyhow::Error::msg)?
        .effective();

    let scenario = simulate::load_scenario(&cmd.scenario)?;
    let seed = simulate::resolve_seed(&scenario, cmd.settings.as_deref())?;
    tracing::info!(
        "Replaying {} steps on {} windows",
        scenario.steps.len(),
        scenario.windows.len()
    );

    let report = simulate::run(&scenario, &seed)?;
    for event in report.events.iter().filter(|e| filter.matches(e)) {
        println!("{}", serde_json::to_string(event)?);
    }
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("Failed to encode report")?
    );
    Ok(())
}

fn run_target_rect(cmd: TargetRectCmd) -> Result<()> {
    let margins = if cmd.margins.is_empty() {
        Margins::default()
    } else {
        Margins::from_args(&cmd.margins)
            .context("Expected 1, 2 or 4 margin fractions")?
            .sanitized()
    };
    let work_area = Rect::new(cmd.x, cmd.y, cmd.width, cmd.height);
    let target = crate::core::target_rect(&work_area, &margins);

    println!("margins: {}", margins);
    println!("target: {}", target);
    println!("area: {}", crate::core::target_area(&work_area, &margins));
    Ok(())
}
