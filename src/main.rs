//! Sentiment Dashboard CLI
//!
//! Terminal shell for the feedback analytics service:
//! - Show or watch the sentiment chart for a company
//! - Open shell paths (home, feedback, dashboard)
//! - Submit feedback and reset a company's tallies
//! - List per-company analytics

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};

use sentiment_dashboard::config::{generate_default_config, Config};
use sentiment_dashboard::terminal::{self, LOADING_PLACEHOLDER};
use sentiment_dashboard::{
    chart, telemetry, AnalyticsClient, ChartSpec, CompanyAnalytics, Dashboard, NormalizedFilter,
    Router, Screen, ViewState,
};

#[derive(Parser)]
#[command(name = "sentiment-dashboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Sentiment analytics dashboard for company feedback")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: user config dir, then ./config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Aggregation service URL (overrides config)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Chart width in columns
    #[arg(long, default_value_t = 50, global = true)]
    pub width: usize,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the analytics chart once
    Show {
        /// Company to scope analytics to (empty = global)
        #[arg(short, long)]
        company: Option<String>,
    },

    /// Redraw on every change; each stdin line sets a new company
    ///
    /// `:r` refreshes, `:q` quits.
    Watch {
        /// Initial company
        #[arg(short, long)]
        company: Option<String>,
    },

    /// Open a shell path, e.g. /feedbacksystem/dashboard?company=Acme
    Open {
        path: String,
    },

    /// Submit feedback for classification
    Submit {
        #[arg(short, long)]
        company: String,
        #[arg(short = 'F', long)]
        feedback: String,
    },

    /// Reset a company's analytics to zero
    Reset {
        #[arg(short, long)]
        company: String,
    },

    /// List analytics for every company
    Companies {
        /// Number of top tags to show per company
        #[arg(long, default_value_t = 3)]
        tags: usize,

        /// Only show this company
        #[arg(short, long)]
        company: Option<String>,
    },

    /// List the shell's screens and their paths
    Routes {
        /// Also print a dashboard link scoped to this company
        #[arg(short, long)]
        company: Option<String>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct DashboardOutput<'a> {
    state: &'a ViewState,
    chart: Option<ChartSpec>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = telemetry::with_bootstrap(|| Config::resolve(cli.config.as_deref()))?;
    if let Some(url) = &cli.api_url {
        config.service.base_url = url.clone();
    }
    telemetry::init(&config.logging).context("Failed to initialize logging")?;

    tracing::debug!("Sentiment Dashboard v{}", env!("CARGO_PKG_VERSION"));
    tracing::debug!("Service URL: {}", config.service.normalized_base_url());

    let router = Router::new(&config.dashboard.base_path);

    match &cli.command {
        Commands::Show { company } => {
            let company = company.clone().unwrap_or_else(|| config.dashboard.company.clone());
            show(&cli, &config, company).await?;
        }

        Commands::Watch { company } => {
            let company = company.clone().unwrap_or_else(|| config.dashboard.company.clone());
            watch(&cli, &config, company).await?;
        }

        Commands::Open { path } => {
            let route = router.resolve(path)?;
            tracing::info!(screen = ?route.screen, "Opening screen");

            match route.screen {
                Screen::Home => print_home(&router),
                Screen::Feedback => feedback_screen(&cli, &config).await?,
                Screen::Dashboard => {
                    let company = route
                        .company
                        .unwrap_or_else(|| config.dashboard.company.clone());
                    show(&cli, &config, company).await?;
                }
            }
        }

        Commands::Submit { company, feedback } => {
            let client = connect(&config)?;
            submit(&cli, &client, company, feedback).await?;
        }

        Commands::Reset { company } => {
            let client = connect(&config)?;
            let counts = client
                .reset_company(company)
                .await
                .with_context(|| format!("Failed to reset analytics for {}", company))?;

            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&counts)?),
                OutputFormat::Text => println!(
                    "Analytics for {} have been reset.",
                    NormalizedFilter::new(company)
                ),
            }
        }

        Commands::Companies { tags, company } => {
            let client = connect(&config)?;
            let breakdown = client
                .fetch_breakdown()
                .await
                .context("Failed to fetch company analytics")?;

            if let Some(company) = company {
                let name = NormalizedFilter::new(company);
                let record = breakdown
                    .get(&name)
                    .with_context(|| format!("No analytics recorded for {}", name))?;

                match cli.format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(record)?),
                    OutputFormat::Text => {
                        print_company_header();
                        print_company_row(name.as_str(), record, *tags);
                    }
                }
                return Ok(());
            }

            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&breakdown)?),
                OutputFormat::Text => {
                    print_company_header();
                    for (name, record) in breakdown.iter() {
                        print_company_row(name, record, *tags);
                    }
                    let totals = breakdown.totals();
                    println!(
                        "{:<24} {:>8} {:>8} {:>8}",
                        format!("Total ({} companies)", breakdown.len()),
                        totals.positive,
                        totals.negative,
                        totals.neutral
                    );
                }
            }
        }

        Commands::Routes { company } => {
            for screen in Screen::ALL {
                println!("{:<16} {}", screen.title(), router.href(screen));
            }
            if let Some(company) = company {
                println!("{:<16} {}", company, router.dashboard_href(company));
            }
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            if let Some(path) = output {
                std::fs::write(path, content)
                    .with_context(|| format!("Failed to write {:?}", path))?;
                println!("Config written to {:?}", path);
            } else {
                print!("{}", content);
            }
        }
    }

    Ok(())
}

fn print_company_header() {
    println!(
        "{:<24} {:>8} {:>8} {:>8}  Top tags",
        "Company", "Positive", "Negative", "Neutral"
    );
}

fn print_company_row(name: &str, record: &CompanyAnalytics, tags: usize) {
    let top: Vec<String> = record
        .top_tags(tags)
        .into_iter()
        .map(|(tag, n)| format!("{} ({})", tag, n))
        .collect();
    println!(
        "{:<24} {:>8} {:>8} {:>8}  {}",
        name,
        record.positive,
        record.negative,
        record.neutral,
        top.join(", ")
    );
}

fn connect(config: &Config) -> Result<Arc<AnalyticsClient>> {
    let client = AnalyticsClient::new(config.service.clone())
        .context("Failed to create HTTP client")?;
    Ok(Arc::new(client))
}

/// Mount a dashboard, wait for it to settle and print the chart
async fn show(cli: &Cli, config: &Config, company: String) -> Result<()> {
    let client = connect(config)?;
    let blank = NormalizedFilter::new(&company).is_empty();
    let dashboard = Dashboard::mount(client, company);

    if cli.format == OutputFormat::Text && !blank {
        println!("{}", LOADING_PLACEHOLDER);
    }

    let state = dashboard.settled().await;
    dashboard.shutdown().await;

    print_state(cli, &state)
}

fn print_state(cli: &Cli, state: &ViewState) -> Result<()> {
    match cli.format {
        OutputFormat::Text => print!("{}", terminal::draw_view(state, cli.width)),
        OutputFormat::Json => {
            let output = DashboardOutput {
                state,
                chart: (!state.loading).then(|| chart::render(&state.counts, &state.filter)),
            };
            println!("{}", serde_json::to_string(&output)?);
        }
    }
    Ok(())
}

/// Live dashboard driven by stdin
async fn watch(cli: &Cli, config: &Config, company: String) -> Result<()> {
    let client = connect(config)?;
    let dashboard = Dashboard::mount(client, company);
    let mut updates = dashboard.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let initial = updates.borrow_and_update().clone();
    print_state(cli, &initial)?;

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                print_state(cli, &state)?;
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match line.trim() {
                    ":q" | ":quit" => break,
                    ":r" | ":refresh" => dashboard.refresh()?,
                    _ => dashboard.set_company(line)?,
                }
            }
        }
    }

    dashboard.shutdown().await;
    Ok(())
}

fn print_home(router: &Router) {
    println!("Public Feedback System");
    println!();
    println!("Share feedback about a company, or explore sentiment analytics.");
    println!();
    for screen in [Screen::Feedback, Screen::Dashboard] {
        println!("  {:<16} open {}", screen.title(), router.href(screen));
    }
}

/// Prompt for a company and feedback on stdin, then submit
async fn feedback_screen(cli: &Cli, config: &Config) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let company = prompt(&mut lines, "Company: ").await?;
    let feedback = prompt(&mut lines, "Feedback: ").await?;

    let client = connect(config)?;
    submit(cli, &client, &company, &feedback).await
}

async fn prompt(lines: &mut Lines<BufReader<Stdin>>, label: &str) -> Result<String> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(label.as_bytes()).await?;
    stdout.flush().await?;

    Ok(lines.next_line().await?.unwrap_or_default())
}

async fn submit(cli: &Cli, client: &AnalyticsClient, company: &str, feedback: &str) -> Result<()> {
    let outcome = client
        .submit_feedback(company, feedback)
        .await
        .context("Failed to submit feedback")?;

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
        OutputFormat::Text => {
            println!(
                "Thanks! Feedback for {} classified as {} ({})",
                outcome.company, outcome.sentiment, outcome.tag
            );
            if outcome.alert_sent {
                println!("Negative feedback alert sent to the company admin.");
            }
        }
    }
    Ok(())
}
