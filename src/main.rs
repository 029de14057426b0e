//! # Check a forward factor setup
//! calendar-screener forward --front-dte 30 --front-iv 40 --back-dte 60 --back-iv 30
//!
//! # Run the earnings calendar checklist
//! calendar-screener earnings --ticker NVDA --volume 2.0 --front-iv 50 --back-iv 15 \
//!     --expected-move 8 --historical-move 2 --spread-cost 1.25 --bid-ask 0.10
//!
//! # Read field values from a JSON form, emit JSON
//! calendar-screener earnings --input form.json --json
//!
//! # Show the effective configuration
//! calendar-screener --config config/default.toml config

use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};

use calendar_screener::data::fields;
use calendar_screener::report;
use calendar_screener::{
    EarningsInput, EarningsSetupEngine, FormSnapshot, ForwardFactorEngine, ForwardFactorInput,
    ScreenerConfig,
};

#[derive(Parser)]
#[command(name = "calendar-screener")]
#[command(about = "Forward factor and earnings calendar setup screener")]
#[command(version)]
struct Cli {
    /// Path to configuration file (TOML, or JSON by extension)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct OutputArgs {
    /// JSON form with field values. Flags given on the command line win.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute forward volatility and the forward factor signal
    Forward {
        /// Front month days to expiration
        #[arg(long, allow_hyphen_values = true)]
        front_dte: Option<String>,

        /// Front month implied volatility (%)
        #[arg(long, allow_hyphen_values = true)]
        front_iv: Option<String>,

        /// Back month days to expiration
        #[arg(long, allow_hyphen_values = true)]
        back_dte: Option<String>,

        /// Back month implied volatility (%)
        #[arg(long, allow_hyphen_values = true)]
        back_iv: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Score an earnings calendar spread against the six-point checklist
    Earnings {
        #[arg(long)]
        ticker: Option<String>,

        /// Average daily volume (millions of shares)
        #[arg(long, allow_hyphen_values = true)]
        volume: Option<String>,

        /// Front month implied volatility (%)
        #[arg(long, allow_hyphen_values = true)]
        front_iv: Option<String>,

        /// Back month implied volatility (%)
        #[arg(long, allow_hyphen_values = true)]
        back_iv: Option<String>,

        /// Expected move priced by options (%)
        #[arg(long, allow_hyphen_values = true)]
        expected_move: Option<String>,

        /// Average historical earnings move (%)
        #[arg(long, allow_hyphen_values = true)]
        historical_move: Option<String>,

        /// Net debit of the calendar spread ($)
        #[arg(long, allow_hyphen_values = true)]
        spread_cost: Option<String>,

        /// Combined bid-ask width of both legs ($)
        #[arg(long, allow_hyphen_values = true)]
        bid_ask: Option<String>,

        /// Underlying is a biotech name
        #[arg(long)]
        biotech: bool,

        /// Underlying is a meme stock
        #[arg(long)]
        meme: bool,

        /// Underlying gapped more than 15% on a recent report
        #[arg(long)]
        recent_gap: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Print the effective configuration as TOML
    Config,
}

/// Load the optional JSON form and overlay the command-line form on top.
fn build_form(input: Option<&Path>, overrides: FormSnapshot) -> Result<FormSnapshot> {
    let mut form = match input {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read form {}", path.display()))?;
            FormSnapshot::from_json(&content)
                .with_context(|| format!("Invalid form {}", path.display()))?
        }
        None => FormSnapshot::new(),
    };

    // Flags only ever add to what the form file checked
    form.merge(overrides);
    Ok(form)
}

/// Snapshot of the values given as flags.
fn cli_form(values: Vec<(&str, Option<String>)>, checked: &[(&str, bool)]) -> FormSnapshot {
    let mut form = FormSnapshot::new();
    for (field, value) in values {
        if let Some(value) = value {
            form.set_value(field, value);
        }
    }
    for (field, is_checked) in checked {
        form.set_checked(field, *is_checked);
    }
    form
}

fn cmd_forward(config: &ScreenerConfig, form: &FormSnapshot, json: bool) -> Result<()> {
    let engine = ForwardFactorEngine::new(config.forward.clone());
    let input = ForwardFactorInput::from_form(form).context("Cannot read forward factor inputs")?;
    debug!(?input, "forward factor input");

    let result = engine
        .calculate(&input)
        .context("Forward factor calculation failed")?;

    info!(
        signal = ?result.signal,
        tradeable = result.signal.is_tradeable(),
        "Forward factor {:.2}%",
        result.forward_factor_pct
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        let color = std::io::stdout().is_terminal();
        println!("{}", report::render_forward(&result, color));
    }

    Ok(())
}

fn cmd_earnings(config: &ScreenerConfig, form: &FormSnapshot, json: bool) -> Result<()> {
    let engine = EarningsSetupEngine::new(config.earnings.clone());
    let input = EarningsInput::from_form(form).context("Cannot read earnings inputs")?;
    debug!(?input, "earnings input");

    let result = engine
        .evaluate(&input)
        .context("Earnings setup evaluation failed")?;

    info!("{}", result.summary());

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        let color = std::io::stdout().is_terminal();
        println!("{}", report::render_earnings(&result, color));
    }

    Ok(())
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("calendar_screener=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ScreenerConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ScreenerConfig::default(),
    };

    match cli.command {
        Commands::Forward {
            front_dte,
            front_iv,
            back_dte,
            back_iv,
            output,
        } => {
            let overrides = cli_form(
                vec![
                    (fields::FRONT_DTE, front_dte),
                    (fields::FRONT_IV, front_iv),
                    (fields::BACK_DTE, back_dte),
                    (fields::BACK_IV, back_iv),
                ],
                &[],
            );
            let form = build_form(output.input.as_deref(), overrides)?;
            cmd_forward(&config, &form, output.json)?;
        }
        Commands::Earnings {
            ticker,
            volume,
            front_iv,
            back_iv,
            expected_move,
            historical_move,
            spread_cost,
            bid_ask,
            biotech,
            meme,
            recent_gap,
            output,
        } => {
            let overrides = cli_form(
                vec![
                    (fields::TICKER, ticker),
                    (fields::VOLUME, volume),
                    (fields::FRONT_IV, front_iv),
                    (fields::BACK_IV, back_iv),
                    (fields::EXPECTED_MOVE, expected_move),
                    (fields::HISTORICAL_MOVE, historical_move),
                    (fields::SPREAD_COST, spread_cost),
                    (fields::BID_ASK, bid_ask),
                ],
                &[
                    (fields::IS_BIOTECH, biotech),
                    (fields::IS_MEME, meme),
                    (fields::RECENT_GAP, recent_gap),
                ],
            );
            let form = build_form(output.input.as_deref(), overrides)?;
            cmd_earnings(&config, &form, output.json)?;
        }
        Commands::Config => {
            print!("{}", config.to_toml_string()?);
        }
    }

    Ok(())
}
