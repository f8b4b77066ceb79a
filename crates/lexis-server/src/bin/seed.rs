//! lexis-seed - load a JSON word list into the configured store.
//!
//! Usage: `lexis-seed <words.json> [--keep-existing]`

use std::path::PathBuf;
use std::process::ExitCode;

use lexis_core::{seed_from_file, LexisConfig};
use lexis_server::open_store;
use tracing::{error, info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

struct Args {
    file: PathBuf,
    keep_existing: bool,
}

fn parse_args() -> Option<Args> {
    let mut file = None;
    let mut keep_existing = false;

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--keep-existing" => keep_existing = true,
            _ if arg.starts_with("--") => return None,
            _ if file.is_none() => file = Some(PathBuf::from(arg)),
            _ => return None,
        }
    }

    file.map(|file| Args {
        file,
        keep_existing,
    })
}

async fn run(args: Args) -> Result<bool, Box<dyn std::error::Error>> {
    let mut config = match std::env::var("LEXIS_CONFIG") {
        Ok(path) => LexisConfig::from_file(path)?,
        Err(_) => LexisConfig::default(),
    };
    config.apply_env();
    if args.keep_existing {
        config.seed.clean_first = false;
    }
    config.validate()?;

    let store = open_store(&config)?;

    info!(file = %args.file.display(), "Starting word seeding");
    let stats = seed_from_file(store.as_ref(), &args.file, &config.seed).await?;

    info!(
        total = stats.total,
        inserted = stats.inserted,
        skipped = stats.skipped,
        duplicates = stats.duplicates.len(),
        "Seeding completed"
    );
    for err in &stats.errors {
        warn!(error = %err, "Seeding error");
    }

    Ok(stats.is_success())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    let Some(args) = parse_args() else {
        eprintln!("Usage: lexis-seed <words.json> [--keep-existing]");
        return ExitCode::from(2);
    };

    match run(args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!(error = %e, "Seeding failed");
            ExitCode::FAILURE
        }
    }
}
