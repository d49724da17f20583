use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use docgen::{config::Config, extraction, generation::TextGenerator, logging};

#[derive(Parser)]
#[command(
    name = "docgen-cli",
    about = "Run the docgen extraction and generation adapters from the shell"
)]
struct Cli {
    /// Log adapter activity to stderr.
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the plain text of one or more PDF or DOCX files.
    Extract {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Send a prompt to Gemini and print the reply.
    Generate {
        /// Model id; defaults to `DEFAULT_MODEL` or gemini-1.5-flash.
        #[arg(long)]
        model: Option<String>,
        prompt: String,
    },
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();
    logging::init_cli_tracing(cli.verbose);
    match cli.command {
        Command::Extract { paths } => extract(&paths),
        Command::Generate { model, prompt } => generate(&prompt, model.as_deref()),
    }
}

fn extract(paths: &[PathBuf]) -> Result<()> {
    let mut empty = 0;
    for path in paths {
        println!("--- {} ---", path.display());
        match extraction::extract(path) {
            Ok(text) => println!("{text}"),
            Err(err) => {
                empty += 1;
                println!("(no text: {err})");
            }
        }
    }
    if empty > 0 {
        bail!("{empty} of {} file(s) produced no text", paths.len());
    }
    Ok(())
}

fn generate(prompt: &str, model: Option<&str>) -> Result<()> {
    let config = Config::from_env().context("failed to load configuration")?;
    let generator = TextGenerator::new(config.generation_settings())?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    match runtime.block_on(generator.generate(prompt, model)) {
        Ok(text) => {
            println!("{text}");
            Ok(())
        }
        Err(err) => bail!("{} ({err})", err.user_message()),
    }
}
