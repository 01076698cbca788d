use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use escrow_release::ReleaseJob;
use escrow_release::config::{DEFAULT_HOLD_DAYS, JobConfig, LookupFailurePolicy, PayoutConfig};
use escrow_release::domain::ports::{NotificationStoreBox, PayoutClientBox, TransactionStoreBox};
use escrow_release::infrastructure::http_payout::HttpPayoutClient;
use escrow_release::infrastructure::json_file::JsonFileStore;
use escrow_release::interfaces::http::serve;
use miette::{IntoDiagnostic, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP trigger for scheduled release runs
    Serve {
        /// Address to listen on
        #[arg(long, env = "ESCROW_BIND", default_value = "127.0.0.1:8080")]
        bind: SocketAddr,

        #[command(flatten)]
        job: JobArgs,
    },
    /// Run one release pass now and print the report as JSON
    Run {
        /// Only list eligible orders; do not call the payout function
        #[arg(long)]
        dry_run: bool,

        #[command(flatten)]
        job: JobArgs,
    },
}

#[derive(Args)]
struct JobArgs {
    /// JSON document snapshot holding `transactions` and `notifications`
    #[arg(long, env = "ESCROW_SNAPSHOT")]
    snapshot: PathBuf,

    /// URL of the escrow payout function
    #[arg(long, env = "ESCROW_PAYOUT_URL")]
    payout_url: String,

    /// Bearer token sent to the payout function
    #[arg(long, env = "ESCROW_PAYOUT_TOKEN", hide_env_values = true)]
    payout_token: Option<String>,

    /// Days funds stay in escrow after delivery (rwi) or creation (digital)
    #[arg(long, env = "ESCROW_HOLD_DAYS", default_value_t = DEFAULT_HOLD_DAYS)]
    hold_days: i64,

    /// Maximum in-flight lookups and payout calls (unbounded when omitted)
    #[arg(long, env = "ESCROW_MAX_CONCURRENCY")]
    max_concurrency: Option<usize>,

    /// Per payout call timeout in seconds
    #[arg(long, env = "ESCROW_CALL_TIMEOUT_SECS", default_value_t = 30)]
    call_timeout_secs: u64,

    /// How to treat a failing dispute lookup
    #[arg(long, env = "ESCROW_LOOKUP_FAILURES", value_enum, default_value_t = LookupFailurePolicy::Abort)]
    lookup_failures: LookupFailurePolicy,
}

async fn build_job(args: JobArgs) -> Result<ReleaseJob> {
    let config = JobConfig::from_parts(
        args.hold_days,
        args.max_concurrency,
        args.call_timeout_secs,
        args.lookup_failures,
    )
    .into_diagnostic()?;

    let store = JsonFileStore::open(&args.snapshot).await.into_diagnostic()?;
    info!("Using document snapshot {}", store.path().display());

    let transactions: TransactionStoreBox = Box::new(store.clone());
    let notifications: NotificationStoreBox = Box::new(store);
    let payout: PayoutClientBox = Box::new(
        HttpPayoutClient::new(PayoutConfig {
            url: args.payout_url,
            api_token: args.payout_token,
        })
        .into_diagnostic()?,
    );

    Ok(ReleaseJob::new(transactions, notifications, payout, config))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the JSON report
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("escrow_release=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { bind, job } => {
            let job = build_job(job).await?;
            let listener = TcpListener::bind(bind).await.into_diagnostic()?;
            serve(listener, Arc::new(job)).await.into_diagnostic()?;
        }
        Command::Run { dry_run, job } => {
            let job = build_job(job).await?;
            let output = if dry_run {
                let pending = job.preview_at(Utc::now()).await.into_diagnostic()?;
                serde_json::to_string_pretty(&pending)
            } else {
                let report = job.run().await.into_diagnostic()?;
                serde_json::to_string_pretty(&report)
            }
            .into_diagnostic()?;
            println!("{}", output);
        }
    }

    Ok(())
}
