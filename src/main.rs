use anyhow::{anyhow, Context};
use clap::{Args, Parser, Subcommand};
use htmlconvert::{ChromeEngine, ConversionRequest, Converter, EngineConfig, Substitutions, TextEncoding};
use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "htmlconvert", version, about = "Render templated HTML to an image or PDF")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the HTML after placeholder substitution
    Text(SourceArgs),
    /// Print a base64 PNG screenshot of the page
    Image(RenderArgs),
    /// Print a base64 A4 PDF of the page
    Pdf(RenderArgs),
}

#[derive(Args)]
struct SourceArgs {
    /// HTML source file
    source: PathBuf,

    /// Text encoding of the source file
    #[arg(short, long, default_value = "utf-8")]
    encoding: TextEncoding,

    /// JSON object with placeholder values
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Placeholder value, applied after --data
    #[arg(short, long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    set: Vec<(String, String)>,
}

#[derive(Args)]
struct RenderArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Also write the raw artifact to this path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON file with engine settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the engine timeout
    #[arg(long)]
    timeout_ms: Option<u64>,
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))
}

fn build_request(args: &SourceArgs) -> anyhow::Result<ConversionRequest> {
    let mut subs = Substitutions::new();
    if let Some(path) = &args.data {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading substitution data {}", path.display()))?;
        subs.extend_from(Substitutions::from_json_str(&json)?);
    }
    for (k, v) in &args.set {
        subs.insert(k.as_str(), v.as_str());
    }

    Ok(ConversionRequest::new(args.source.clone())
        .with_encoding(args.encoding)
        .with_substitutions(subs))
}

fn load_engine_config(args: &RenderArgs) -> anyhow::Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading engine config {}", path.display()))?;
            serde_json::from_str(&json).with_context(|| format!("parsing engine config {}", path.display()))?
        }
        None => EngineConfig::default(),
    };
    if let Some(timeout_ms) = args.timeout_ms {
        config.timeout_ms = timeout_ms;
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto)
        .map_err(|e| anyhow!("failed to initialise logging: {}", e))?;

    let output = match &cli.command {
        Command::Text(args) => {
            let converter = Converter::new(build_request(args)?, ChromeEngine::default());
            converter.resolve_text()?
        }
        Command::Image(args) => {
            let engine = ChromeEngine::new(load_engine_config(args)?);
            let converter = Converter::new(build_request(&args.source)?, engine);
            converter.to_image(args.output.as_deref())?
        }
        Command::Pdf(args) => {
            let engine = ChromeEngine::new(load_engine_config(args)?);
            let converter = Converter::new(build_request(&args.source)?, engine);
            converter.to_pdf(args.output.as_deref())?
        }
    };

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", output)?;
    stdout.flush()?;
    Ok(())
}
