use clap::{Parser, Subcommand};
use common::decimal::{HeadlessDecimal, Rounding};
use decimal_calc::{evaluate_tokens, rescale_literal, CalcConfig, Evaluation};
use dotenv::dotenv;
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Fixed-point decimal calculator
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Set the log level
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// Commands
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate `VALUE (OP VALUE)*`, e.g. `100@15 mul 2 div 3`
    Eval {
        /// Values and operators; pass `--` first when a value such as
        /// `-1.5@4` is not a plain negative number
        #[arg(required = true, num_args = 1.., allow_negative_numbers = true)]
        tokens: Vec<String>,

        /// Fractional digits of the result
        #[arg(short, long)]
        precision: Option<u32>,

        /// Rounding mode: toward-zero, half-away-from-zero or half-even
        #[arg(short, long)]
        rounding: Option<Rounding>,

        /// Print JSON
        #[arg(short, long)]
        json: bool,
    },
    /// Rescale a single value
    Rescale {
        /// The value, e.g. `12.345` or `12345@3`
        #[arg(allow_negative_numbers = true)]
        value: String,

        /// Fractional digits of the result
        #[arg(short, long)]
        precision: Option<u32>,

        /// Rounding mode: toward-zero, half-away-from-zero or half-even
        #[arg(short, long)]
        rounding: Option<Rounding>,

        /// Print JSON
        #[arg(short, long)]
        json: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv().ok();

    // Parse command line arguments
    let cli = Cli::parse();

    // Logs go to stderr so results can be piped
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::registry()
        .with(log_filter(rust_log.as_deref(), &cli.log_level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let (result, config) = match cli.command {
        Commands::Eval { tokens, precision, rounding, json } => {
            let config = CalcConfig::from_env().with_overrides(precision, rounding, json);
            debug!("Evaluating with {:?}", config);
            (evaluate_tokens(&tokens, &config), config)
        }
        Commands::Rescale { value, precision, rounding, json } => {
            let config = CalcConfig::from_env().with_overrides(precision, rounding, json);
            debug!("Rescaling with {:?}", config);
            (rescale_literal(&value, &config), config)
        }
    };

    match result {
        Ok(value) => print_result(&value, &config)?,
        Err(err) => {
            error!("Calculation failed: {}", err);
            return Err(err.into());
        }
    }

    Ok(())
}

/// `RUST_LOG` directives when set and valid, otherwise `--log-level` for the
/// workspace crates
fn log_filter(rust_log: Option<&str>, log_level: &str) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| {
            EnvFilter::new(format!(
                "decimal_calc={level},formula_engine={level},common={level}",
                level = log_level
            ))
        })
}

fn print_result(value: &HeadlessDecimal, config: &CalcConfig) -> Result<(), Box<dyn std::error::Error>> {
    if config.json_output {
        println!("{}", serde_json::to_string(&Evaluation::from(value))?);
    } else {
        println!("{}", value);
    }
    Ok(())
}
