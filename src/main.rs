use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::info;

use quotecard::text::{format_quote_text, Directive};
use quotecard::{CardConfig, Messages, OutputFormat, QuoteCard};

#[derive(Parser)]
#[command(name = "quotecard", version, about = "Render chat messages into quote card images")]
struct Cli {
    /// Configuration file (TOML); defaults are used when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Format a single text with entities and print the HTML fragment
    Format {
        text: String,
        /// JSON array of {"offset","length","type"} objects
        #[arg(short, long)]
        entities: Option<String>,
    },
    /// Print the HTML document for a messages JSON file ("-" for stdin)
    Html { input: PathBuf },
    /// Render a messages JSON file ("-" for stdin) into an image
    Render {
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// Override the configured output format (webp, png, jpeg)
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },
    /// Serve POST /generate
    #[cfg(feature = "server")]
    Serve {
        #[arg(short, long)]
        port: Option<u16>,
    },
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
    }
}

fn read_messages(path: &Path) -> anyhow::Result<Messages> {
    let data = read_input(path)?;
    serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))
}

fn init_logging(level: &str) {
    env_logger::Builder::new()
        .parse_filters(&level.to_ascii_lowercase())
        .parse_default_env()
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => CardConfig::load(path)?,
        None => CardConfig::default(),
    };
    init_logging(&config.logging.level);

    match cli.command {
        Cmd::Format { text, entities } => {
            let directives: Vec<Directive> = match entities {
                Some(json) => serde_json::from_str(&json).context("parsing --entities")?,
                None => Vec::new(),
            };
            println!("{}", format_quote_text(&text, &directives)?);
        }
        Cmd::Html { input } => {
            let messages = read_messages(&input)?;
            let card = QuoteCard::from_config(config)?;
            io::stdout().write_all(card.render_html(&messages)?.as_bytes())?;
        }
        Cmd::Render {
            input,
            output,
            format,
        } => {
            if let Some(format) = format {
                config.render.format = format;
            }
            let messages = read_messages(&input)?;
            let card = QuoteCard::from_config(config)?;
            let image = card.render_image(&messages)?;
            std::fs::write(&output, &image.data)
                .with_context(|| format!("writing {}", output.display()))?;
            info!("wrote {}", output.display());
        }
        #[cfg(feature = "server")]
        Cmd::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            let addr = config.server.addr();
            let card = std::sync::Arc::new(QuoteCard::from_config(config)?);
            quotecard::server::start(card, &addr)?.join();
        }
    }

    Ok(())
}
