#![deny(unsafe_code)]

//! studentdir CLI: query the directory from the terminal or serve the API.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tokio::sync::broadcast;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use studentdir_config::AppConfig;
use studentdir_core::api::{self, ApiState};
use studentdir_core::query::{self, PageItem, QueryOutcome, QueryParams, SortKey};
use studentdir_core::{Facets, Roster, ShutdownSignal, StudentRecord};

/// studentdir: search, sort and page through a student roster.
#[derive(Parser)]
#[command(name = "studentdir", version, about, long_about = None)]
struct Cli {
    /// Path to configuration file.
    #[arg(short, long, default_value = "studentdir.toml")]
    config: PathBuf,

    /// Roster file, overriding `roster.path` from the config.
    #[arg(short, long)]
    roster: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter, sort and page through the roster.
    Query(QueryArgs),

    /// List the selectable values for every filter.
    Facets {
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Show one student's full profile.
    Show {
        /// Student id.
        id: String,
    },

    /// Serve the read-only HTTP API.
    Serve,

    /// Validate and display configuration.
    Config {
        /// Show the resolved configuration.
        #[arg(long)]
        show: bool,
    },
}

#[derive(Args, Debug, Default)]
struct QueryArgs {
    /// Case-insensitive substring of the name.
    #[arg(long, default_value = "")]
    name: String,

    /// Class year (repeatable).
    #[arg(long = "year")]
    years: Vec<u16>,

    /// Exact major (repeatable).
    #[arg(long = "major")]
    majors: Vec<String>,

    /// Exact minor (repeatable).
    #[arg(long = "minor")]
    minors: Vec<String>,

    /// Exact dorm (repeatable).
    #[arg(long = "dorm")]
    dorms: Vec<String>,

    /// Exact hometown (repeatable).
    #[arg(long = "hometown")]
    hometowns: Vec<String>,

    /// Course substring; every one must match (repeatable).
    #[arg(long = "course")]
    courses: Vec<String>,

    /// Internship company substring (repeatable).
    #[arg(long = "company")]
    companies: Vec<String>,

    /// Club substring (repeatable).
    #[arg(long = "club")]
    clubs: Vec<String>,

    /// Sport substring (repeatable).
    #[arg(long = "sport")]
    sports: Vec<String>,

    /// Career interest substring (repeatable).
    #[arg(long = "interest")]
    interests: Vec<String>,

    /// first_az, first_za, last_az or last_za.
    #[arg(long, default_value_t = SortKey::FirstAz)]
    sort: SortKey,

    /// 1-based page number.
    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Results per page (defaults to the configured page size).
    #[arg(long)]
    per_page: Option<usize>,

    /// Student id to leave out of the results.
    #[arg(long)]
    exclude: Option<String>,

    /// Print JSON instead of text.
    #[arg(long)]
    json: bool,
}

impl QueryArgs {
    fn to_params(&self, config: &AppConfig) -> QueryParams {
        let page_size = self
            .per_page
            .filter(|n| *n > 0)
            .unwrap_or(config.directory.default_page_size)
            .min(config.directory.max_page_size);
        QueryParams {
            name: self.name.clone(),
            class_years: self.years.iter().copied().collect(),
            majors: self.majors.iter().cloned().collect(),
            minors: self.minors.iter().cloned().collect(),
            dorms: self.dorms.iter().cloned().collect(),
            hometowns: self.hometowns.iter().cloned().collect(),
            courses: self.courses.clone(),
            companies: self.companies.clone(),
            clubs: self.clubs.clone(),
            sports: self.sports.clone(),
            interests: self.interests.clone(),
            sort: self.sort,
            page: self.page,
            page_size,
            exclude_id: self.exclude.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_found = cli.config.exists();
    let config = load_config(&cli.config).await?;
    let filter = log_filter(cli.verbose, &config);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    if !config_found {
        info!(path = %cli.config.display(), "Config file not found, using defaults");
    }
    match cli.command {
        Commands::Query(args) => {
            let roster = load_roster(&config, cli.roster.as_deref()).await?;
            cmd_query(&roster, &config, &args)?;
        }
        Commands::Facets { json } => {
            let roster = load_roster(&config, cli.roster.as_deref()).await?;
            cmd_facets(&roster, json)?;
        }
        Commands::Show { id } => {
            let roster = load_roster(&config, cli.roster.as_deref()).await?;
            cmd_show(&roster, &id)?;
        }
        Commands::Serve => {
            let roster = load_roster(&config, cli.roster.as_deref()).await?;
            cmd_serve(roster, config).await?;
        }
        Commands::Config { show } => cmd_config(&cli.config, &config, show)?,
    }

    Ok(())
}

fn cmd_query(roster: &Roster, config: &AppConfig, args: &QueryArgs) -> Result<()> {
    let params = args.to_params(config);
    let outcome = query::run(roster.students(), &params, config.directory.sibling_count);
    if args.json {
        let response = api::QueryResponse::from_outcome(outcome, params.page_size);
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print!("{}", render_outcome(&outcome));
    }
    Ok(())
}

fn cmd_facets(roster: &Roster, json: bool) -> Result<()> {
    let facets = Facets::from_roster(roster.students());
    if json {
        println!("{}", serde_json::to_string_pretty(&facets)?);
        return Ok(());
    }
    let years: Vec<String> = facets.class_years.iter().map(u16::to_string).collect();
    let sections: [(&str, &[String]); 10] = [
        ("Class years", &years),
        ("Majors", &facets.majors),
        ("Minors", &facets.minors),
        ("Dorms", &facets.dorms),
        ("Hometowns", &facets.hometowns),
        ("Courses", &facets.courses),
        ("Companies", &facets.companies),
        ("Clubs", &facets.clubs),
        ("Sports", &facets.sports),
        ("Interests", &facets.interests),
    ];
    for (label, values) in sections {
        println!("{label}: {}", values.join(" | "));
    }
    Ok(())
}

fn cmd_show(roster: &Roster, id: &str) -> Result<()> {
    let student = roster
        .get(id)
        .with_context(|| format!("no student with id {id:?}"))?;
    println!("{}", serde_json::to_string_pretty(student)?);
    Ok(())
}

async fn cmd_serve(roster: Roster, config: AppConfig) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.listen_addr, config.server.listen_port)
        .parse()
        .context("invalid server.listen_addr / listen_port")?;

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let state = Arc::new(ApiState::new(Arc::new(roster), config));
    let server = tokio::spawn(api::serve(addr, state, shutdown_rx));

    tokio::signal::ctrl_c().await?;
    warn!("Ctrl-C received, initiating graceful shutdown");
    let _ = shutdown_tx.send(ShutdownSignal);

    server.await??;
    info!("API server stopped");
    Ok(())
}

fn cmd_config(config_path: &Path, config: &AppConfig, show: bool) -> Result<()> {
    if show {
        let toml_str =
            toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {e}"))?;
        println!("{toml_str}");
    } else {
        println!("Configuration at '{}' is valid.", config_path.display());
    }
    Ok(())
}

/// `-v` flags override `logging.level`.
fn log_filter(verbose: u8, config: &AppConfig) -> &str {
    match verbose {
        0 => &config.logging.level,
        1 => "debug",
        _ => "trace",
    }
}

/// The config at `path`, or defaults when there is no file.
async fn load_config(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    AppConfig::load(path)
        .await
        .with_context(|| format!("loading config from {}", path.display()))
}

async fn load_roster(config: &AppConfig, override_path: Option<&Path>) -> Result<Roster> {
    let path = override_path.unwrap_or_else(|| Path::new(&config.roster.path));
    Roster::load(path)
        .await
        .with_context(|| format!("loading roster from {}", path.display()))
}

/// Plain-text listing: one line per student, then the page controls.
fn render_outcome(outcome: &QueryOutcome<'_>) -> String {
    if outcome.total_matches == 0 {
        return "No students match these filters.\n".to_string();
    }
    let mut out = String::new();
    for student in &outcome.items {
        out.push_str(&render_student_line(student));
        out.push('\n');
    }
    let controls: Vec<String> = outcome
        .window
        .iter()
        .map(|item| match item {
            PageItem::Page(n) if *n == outcome.page => format!("[{n}]"),
            other => other.to_string(),
        })
        .collect();
    out.push_str(&format!(
        "\n{} match(es), page {} of {}: {}\n",
        outcome.total_matches,
        outcome.page,
        outcome.total_pages,
        controls.join(" ")
    ));
    out
}

fn render_student_line(student: &StudentRecord) -> String {
    let mut line = format!(
        "{:<10} {} ({}, {}",
        student.id, student.name, student.class_year, student.major
    );
    if let Some(minor) = &student.minor {
        line.push_str(&format!("; minor {minor}"));
    }
    line.push(')');
    if !student.dorm.is_empty() {
        line.push_str(&format!(" - {}", student.dorm));
    }
    line
}
