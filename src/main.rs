//! makepub - declarative EPUB builder

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use makepub::{Config, Error, build_to_path};

#[derive(Parser)]
#[command(name = "makepub")]
#[command(version, about = "Build EPUB books from a declarative content tree", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an EPUB book
    Build {
        /// Config path, default is makepub.{yaml,json}
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output file path, default {title}.epub
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Create a starter config file
    Init {
        /// Template language
        #[arg(short, long, default_value = "en", value_parser = ["en", "zh"])]
        lang: String,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .without_time()
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Build { config, output } => cmd_build(config.as_deref(), output.as_deref()),
        Commands::Init { lang } => cmd_init(&lang),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn cmd_build(config_path: Option<&Path>, output: Option<&Path>) -> Result<(), Error> {
    let config_path = resolve_config_path(config_path)?;
    println!("Using config {}", config_path.display());

    let config = Config::load(&config_path)?;
    let output = match output {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(config.default_output()),
    };

    build_to_path(&config, &output)?;
    println!("Wrote {}", output.display());
    Ok(())
}

fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf, Error> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(Error::Config(format!(
                "config file {} not found",
                path.display()
            )));
        }
        return Ok(path.to_path_buf());
    }

    for candidate in ["makepub.yaml", "makepub.json"] {
        let path = Path::new(candidate);
        if path.exists() {
            return Ok(path.to_path_buf());
        }
    }

    Err(Error::Config(
        "no config file found (expected makepub.yaml or makepub.json)".to_string(),
    ))
}

fn cmd_init(lang: &str) -> Result<(), Error> {
    let path = makepub::init::scaffold(Path::new("."), lang)?;
    println!("Created {}", path.display());
    Ok(())
}
