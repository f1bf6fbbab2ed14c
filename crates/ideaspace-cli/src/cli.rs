use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use ideaspace_client::HttpExpansionService;
use ideaspace_core::{Explorer, SphereLayout};
use ideaspace_layout::nearest_pair_distance;
use serde::Serialize;
use tracing::info;

use crate::config::{Overrides, Settings};
use crate::error::{CliError, Result};
use crate::logging;
use crate::session::{Session, spawn_line_reader};

#[derive(Debug, Parser)]
#[command(
    name = "ideaspace",
    about = "Walk a graph of related ideas, one expansion at a time",
    version
)]
pub struct Cli {
    /// Raise log verbosity on stderr (repeatable). `RUST_LOG` wins when set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Explore interactively against the expansion service.
    Explore(ExploreArgs),

    /// Print Fibonacci-sphere positions as JSON.
    Layout(LayoutArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct ExploreArgs {
    /// TOML settings file; flags override its values.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Service root, e.g. http://localhost:8000.
    #[arg(long)]
    pub base_url: Option<String>,

    #[arg(long)]
    pub expand_path: Option<String>,

    #[arg(long)]
    pub embed_path: Option<String>,

    /// Per-request timeout in milliseconds.
    #[arg(long = "timeout-ms", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_ms: Option<u64>,

    /// Send each new neighborhood to the embed endpoint.
    #[arg(long)]
    pub prewarm: bool,

    #[arg(long)]
    pub radius: Option<f64>,

    /// Column budget for labels.
    #[arg(long)]
    pub label_width: Option<usize>,

    /// Start from this sentence instead of prompting.
    #[arg(long)]
    pub seed: Option<String>,
}

impl From<&ExploreArgs> for Overrides {
    fn from(args: &ExploreArgs) -> Self {
        Self {
            config: args.config.clone(),
            base_url: args.base_url.clone(),
            expand_path: args.expand_path.clone(),
            embed_path: args.embed_path.clone(),
            timeout_ms: args.timeout_ms,
            prewarm: args.prewarm,
            radius: args.radius,
            label_width: args.label_width,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct LayoutArgs {
    /// Number of neighbors to place.
    #[arg(long, short = 'n', value_parser = clap::value_parser!(u64).range(1..))]
    pub count: u64,

    #[arg(long, default_value_t = ideaspace_core::DEFAULT_RADIUS)]
    pub radius: f64,

    /// Single-line JSON.
    #[arg(long)]
    pub compact: bool,
}

#[derive(Debug, Serialize)]
struct LayoutReport {
    radius: f64,
    count: usize,
    nearest_pair_distance: Option<f64>,
    positions: Vec<[f64; 3]>,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Explore(args) => run_explore(&args),
        Commands::Layout(args) => run_layout(&args, &mut io::stdout().lock()),
    }
}

pub fn run_layout(args: &LayoutArgs, out: &mut impl Write) -> Result<()> {
    let layout = SphereLayout::new(args.radius)?;
    let count = usize::try_from(args.count)
        .map_err(|_| CliError::invalid("--count does not fit in memory"))?;
    let positions = layout.positions(count);
    let report = LayoutReport {
        radius: layout.radius(),
        count,
        nearest_pair_distance: nearest_pair_distance(&positions),
        positions: positions.iter().map(|p| p.to_array()).collect(),
    };
    if args.compact {
        serde_json::to_writer(&mut *out, &report)?;
    } else {
        serde_json::to_writer_pretty(&mut *out, &report)?;
    }
    writeln!(out)?;
    Ok(())
}

pub fn run_explore(args: &ExploreArgs) -> Result<()> {
    let settings = Settings::resolve(&Overrides::from(args))?;
    let service = Arc::new(HttpExpansionService::new(&settings.service)?);
    let mut explorer = Explorer::new(settings.explorer.clone(), service.clone())?;
    if settings.service.prewarm {
        explorer = explorer.with_prewarm(service.clone());
    }
    info!(
        target: "ideaspace.cli",
        expand_url = service.expand_url(),
        prewarm = settings.service.prewarm,
        "explorer ready"
    );

    let drain_timeout = settings.service.request_timeout() + settings.service.connect_timeout();
    let mut session = Session::new(explorer, io::stdout().lock(), drain_timeout);
    if !start_session(&mut session, args.seed.as_deref())? {
        return Ok(());
    }
    let lines = spawn_line_reader(BufReader::new(io::stdin()));
    session.run(&lines)
}

/// Feed `--seed` to the session. Returns `false` if it asked to quit.
fn start_session<W: Write>(session: &mut Session<W>, seed: Option<&str>) -> Result<bool> {
    match seed {
        Some(seed) => session.handle(seed),
        None => Ok(true),
    }
}
