use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cmd;
mod context;
mod menu;

use context::AppContext;

#[derive(Parser)]
#[command(name = "fastman", version, about = "Fastman field client")]
struct Cli {
    /// Base URL template, overriding FASTMAN_API_URL_TEMPLATE
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Pin every login to this tenant, overriding FASTMAN_LOCKED_DOMAIN
    #[arg(long, global = true)]
    locked_domain: Option<String>,

    /// Session file, overriding FASTMAN_SESSION_PATH
    #[arg(long, global = true)]
    session: Option<PathBuf>,

    /// Suppress informational output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in to a tenant
    Login,
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Fill and submit a field report
    Report {
        #[arg(value_enum)]
        kind: ReportKind,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    Failure,
    Production,
    Reading,
    Checklist,
    WorkOrder,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they never mix into prompts on stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,fastman_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let mut ctx = AppContext::new(
        cli.quiet,
        cli.api_url,
        cli.locked_domain,
        cli.session,
    )?;

    match cli.command {
        None => menu::run(&mut ctx).await,
        Some(Commands::Login) => cmd::login::run(&mut ctx).await,
        Some(Commands::Logout) => cmd::session::logout(&mut ctx).await,
        Some(Commands::Whoami) => cmd::session::whoami(&mut ctx).await,
        Some(Commands::Report { kind }) => cmd::report::run(&mut ctx, kind).await,
    }
}
