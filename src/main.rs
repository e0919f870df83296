mod config;
mod error;
mod report;
mod stripe;
mod tracking;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;

#[derive(Parser)]
#[command(name = "outreach")]
#[command(about = "Outreach utilities: Stripe revenue snapshots and tracked HTML email rendering")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Aggregate recent Stripe charges into a revenue snapshot
    Revenue {
        /// Lookback window in days
        #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..))]
        days: u32,

        /// If set, only count charges matching this amount (USD). Example: 249
        #[arg(long = "amount-usd", default_value_t = 0)]
        amount_usd: i64,
    },

    /// Render a plain-text body as a minimal HTML email with an optional tracking pixel
    PreviewEmail {
        /// Email body text (reads stdin when omitted)
        #[arg(long)]
        body: Option<String>,

        /// Lead identifier for message-ID derivation; no pixel without it
        #[arg(long)]
        lead_id: Option<String>,

        /// Sequence step within the outreach cadence
        #[arg(long, default_value_t = 1)]
        step: u32,

        /// Pixel endpoint URL (overrides TRACKING_PIXEL_ENDPOINT)
        #[arg(long)]
        pixel_endpoint: Option<String>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Revenue { days, amount_usd } => run_revenue(days, amount_usd),
        Command::PreviewEmail {
            body,
            lead_id,
            step,
            pixel_endpoint,
        } => run_preview_email(body, lead_id, step, pixel_endpoint),
    }
}

fn run_revenue(days: u32, amount_usd: i64) -> Result<()> {
    // Credential check happens before any network activity.
    let api_key = config::resolve_api_key()?;
    let client = stripe::StripeClient::new(&api_key, config::resolve_api_base())?;

    let cutoff = (chrono::Utc::now() - chrono::Duration::days(i64::from(days))).timestamp();
    log::info!("Aggregating charges created since epoch {cutoff} ({days} day window)");

    let summary = report::aggregate_charges(client.charges_since(cutoff), days, amount_usd)?;
    print!("{}", summary.render());
    Ok(())
}

fn run_preview_email(
    body: Option<String>,
    lead_id: Option<String>,
    step: u32,
    pixel_endpoint: Option<String>,
) -> Result<()> {
    let text_body = match body {
        Some(b) => b,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read email body from stdin")?;
            buf
        }
    };

    let tracking_config = tracking::TrackingConfig {
        pixel_endpoint: pixel_endpoint.or_else(config::resolve_pixel_endpoint),
    };

    let pixel_url = lead_id.and_then(|lead| {
        // Millisecond timestamp as the nonce gives per-send uniqueness while
        // keeping the derivation itself pure.
        let nonce = u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0);
        let message_id = tracking::generate_message_id(&lead, step, nonce);
        log::info!("Derived message ID {message_id} for lead {lead} step {step}");
        tracking::tracking_pixel_url(&tracking_config, &message_id)
    });

    print!("{}", tracking::wrap_html_email(&text_body, pixel_url.as_deref()));
    Ok(())
}
