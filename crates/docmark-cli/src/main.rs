use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use docmark_config::Config;
use docmark_engine::{
    ConversionResult, Converter, DocsClient, EditBuilder, EnvToken, FileSnapshotStore,
    ListPresets, MarkerScanner, Request, plan_conversion, rewrite_text,
};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "docmark")]
#[command(about = "Turn Markdown markers into Google Docs formatting", long_about = None)]
struct Args {
    /// Config file (default: ~/.config/docmark/config.toml)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert the Markdown markers of a Google Doc
    Convert {
        /// URL of the document
        url: String,
    },
    /// Restore a Google Doc to its state before the last conversion
    Undo {
        /// URL of the document
        url: String,
    },
    /// Answer one `{"action": ...}` message read from stdin
    Message {
        /// URL of the document the message is about
        url: String,
    },
    /// Rewrite marker text to plain text (stdin when no file is given)
    Rewrite { file: Option<PathBuf> },
    /// Show the requests a conversion would send, without contacting Google Docs
    Scan {
        file: Option<PathBuf>,

        /// Print the converted text instead of the requests
        #[arg(long)]
        text: bool,
    },
}

type DocsConverter = Converter<DocsClient, FileSnapshotStore, EnvToken>;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    match run(Args::parse()).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<ExitCode> {
    let config = load_config(args.config.as_deref())?;

    match args.command {
        Commands::Convert { url } => Ok(report(docs_converter(&config)?.convert(&url).await)),
        Commands::Undo { url } => Ok(report(docs_converter(&config)?.undo(&url).await)),
        Commands::Message { url } => {
            let input = read_input(None)?;
            let request: Request =
                serde_json::from_str(&input).context("Invalid message on stdin")?;
            let result = docs_converter(&config)?.handle(request, &url).await;
            println!("{}", serde_json::to_string(&result)?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Rewrite { file } => {
            let input = read_input(file.as_deref())?;
            if input.trim().is_empty() {
                bail!("No text to convert");
            }
            let rewrite = rewrite_text(&input);
            if rewrite.counts.is_empty() {
                eprintln!("No Markdown markers found");
                return Ok(ExitCode::FAILURE);
            }
            log::info!(
                "Rewrote {} headings, {} lists, {} bold",
                rewrite.counts.headings,
                rewrite.counts.lists,
                rewrite.counts.bold
            );
            print!("{}", rewrite.text);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Scan { file, text } => {
            let input = read_input(file.as_deref())?;
            let plan = plan_conversion(&MarkerScanner::default(), &builder(&config), &input)?;
            if text {
                print!("{}", plan.text);
            } else {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load_from_path(path)?
            .with_context(|| format!("Config file not found: {}", path.display()))?,
        None => Config::load()?.unwrap_or_default(),
    };
    Ok(config)
}

fn builder(config: &Config) -> EditBuilder {
    EditBuilder::new(ListPresets {
        bullet: config.presets.bullet.clone(),
        numbered: config.presets.numbered.clone(),
    })
}

fn docs_converter(config: &Config) -> Result<DocsConverter> {
    let client = DocsClient::new(&config.api_base_url, config.request_timeout())?;
    let store = FileSnapshotStore::new(config.snapshot_dir());
    let credentials = EnvToken::new(&config.access_token_env);
    Ok(Converter::new(client, store, credentials).with_builder(builder(config)))
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
        }
        None => {
            let mut input = String::new();
            io::stdin().read_to_string(&mut input)?;
            Ok(input)
        }
    }
}

fn report(result: ConversionResult) -> ExitCode {
    if result.success {
        println!("{}", result.message);
        ExitCode::SUCCESS
    } else {
        eprintln!("{}", result.message);
        ExitCode::FAILURE
    }
}
