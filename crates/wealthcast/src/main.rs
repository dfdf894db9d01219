use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::eyre;
use wealthcast::commands::{self, CrisisSelection, RunOptions};
use wealthcast::{OutputFormat, PlanFile, init_logging};

#[derive(Parser, Debug)]
#[command(name = "wealthcast")]
#[command(about = "Monte Carlo portfolio projections and historical crisis stress tests")]
struct Args {
    /// Plan file describing the client, goals and scenarios
    #[arg(short, long, global = true)]
    plan: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Base seed for reproducible runs (random when omitted)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Number of Monte Carlo runs per scenario
    #[arg(short = 'n', long, global = true)]
    simulations: Option<usize>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the Monte Carlo simulation for one scenario, or all of them
    Evaluate {
        #[arg(short, long)]
        scenario: Option<String>,
    },
    /// Replay historical crises on evaluated scenarios
    Stress {
        #[arg(short, long)]
        scenario: Option<String>,
        /// Crisis id from the built-in catalog
        #[arg(short, long, required_unless_present = "all", conflicts_with = "all")]
        crisis: Option<String>,
        /// Replay every crisis in the catalog
        #[arg(long)]
        all: bool,
    },
    /// Evaluate every scenario in the plan and rank them
    Compare,
    /// List the built-in crisis profiles
    Crises,
}

fn load_plan(path: Option<&PathBuf>) -> color_eyre::Result<PlanFile> {
    let path = path.ok_or_else(|| eyre!("this command needs a plan file (--plan)"))?;
    PlanFile::load(path)
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_logging(args.log_file.as_deref(), &args.log_level)?;

    let options = RunOptions {
        seed: args.seed,
        simulations: args.simulations,
    };

    let report = match &args.command {
        Command::Evaluate { scenario } => {
            let plan = load_plan(args.plan.as_ref())?;
            commands::evaluate(&plan, options, scenario.as_deref())?
        }
        Command::Stress {
            scenario,
            crisis,
            all,
        } => {
            let plan = load_plan(args.plan.as_ref())?;
            let selection = match crisis {
                Some(id) if !*all => CrisisSelection::One(id.as_str().into()),
                _ => CrisisSelection::All,
            };
            commands::stress(&plan, options, scenario.as_deref(), &selection)?
        }
        Command::Compare => {
            let plan = load_plan(args.plan.as_ref())?;
            commands::compare(&plan, options)?
        }
        Command::Crises => commands::list_crises()?,
    };

    let rendered = report.render(args.format)?;
    std::io::stdout().lock().write_all(rendered.as_bytes())?;

    tracing::debug!("Done");
    Ok(())
}
