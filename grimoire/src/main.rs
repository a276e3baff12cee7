//! Grimoire: study vocabulary through tarot readings.
//!
//! Runs a line-oriented session on stdin/stdout:
//!
//! ```bash
//! cargo run -p grimoire -- --book ember --seed 42
//! ```

mod headless;

use grimoire_core::{ClaudeOracle, GrimoireId, SessionConfig};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "grimoire=info,grimoire_core=info";

/// Options read from the command line.
#[derive(Debug, Default)]
struct Args {
    book: Option<GrimoireId>,
    seed: Option<u64>,
    model: Option<String>,
    help: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let raw: Vec<String> = std::env::args().collect();
    let args = match parse_args(&raw) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("Error: {message}");
            print_help();
            std::process::exit(2);
        }
    };

    if args.help {
        print_help();
        return Ok(());
    }

    let mut config = SessionConfig::new();
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if let Some(model) = args.model {
        config = config.with_model(model);
    }

    let oracle = ClaudeOracle::from_env().with_config(config.oracle_config());
    if !oracle.has_credential() {
        eprintln!("Warning: ANTHROPIC_API_KEY is not set; the oracle will stay silent.");
        eprintln!("Set it in a .env file or with: export ANTHROPIC_API_KEY=your_key_here");
    }

    headless::run_headless(config, oracle, args.book).await?;
    Ok(())
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut parsed = Args::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--book" => {
                let value = args.get(i + 1).ok_or("--book needs a grimoire name")?;
                parsed.book = Some(
                    GrimoireId::parse(value).ok_or_else(|| format!("unknown grimoire '{value}'"))?,
                );
                i += 1;
            }
            "--seed" => {
                let value = args.get(i + 1).ok_or("--seed needs a number")?;
                parsed.seed = Some(
                    value
                        .parse()
                        .map_err(|_| format!("invalid seed '{value}'"))?,
                );
                i += 1;
            }
            "--model" => {
                let value = args.get(i + 1).ok_or("--model needs a model name")?;
                parsed.model = Some(value.clone());
                i += 1;
            }
            "--help" | "-h" => parsed.help = true,
            other => return Err(format!("unexpected argument '{other}'")),
        }
        i += 1;
    }

    Ok(parsed)
}

fn print_help() {
    println!("Grimoire - tarot vocabulary study");
    println!();
    println!("USAGE:");
    println!("    grimoire [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --book <NAME>     Open a grimoire right away");
    println!("    --seed <N>        Seed the shuffle for a repeatable session");
    println!("    --model <MODEL>   Claude model for the oracle");
    println!("    -h, --help        Show this help");
    println!();
    println!("GRIMOIRES:");
    for id in GrimoireId::ALL {
        println!("    {:<12} {}", id.slug(), id);
    }
    println!();
    println!("ENVIRONMENT:");
    println!("    ANTHROPIC_API_KEY   Required for the oracle (may be set in .env)");
    println!("    RUST_LOG            Log filter (default: {DEFAULT_LOG_FILTER})");
}
