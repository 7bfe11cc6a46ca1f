use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use portfolio_chat::{
    ChatConfig, ChatSession, FrameReader, InboundFrame, KnowledgeBase, Section, SectionNavigator,
    StreamDemux, StreamUpdate, TracingScroller, chunked, drive_stream,
};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info, warn};

#[derive(Parser)]
#[command(name = "portfolio-chat")]
#[command(version = "0.1")]
#[command(about = "Drive the portfolio chat assistant from the terminal")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(short, long, value_enum, global = true, default_value = "text")]
    format: OutputFormat,

    /// Path to a chat.toml configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a question and stream the canned answer
    Ask {
        /// The question
        #[arg(required = true)]
        query: Vec<String>,

        /// Characters per streamed chunk
        #[arg(long, default_value = "7")]
        chunk_size: usize,
    },

    /// Replay a recorded reply stream (JSONL, one frame per line)
    Replay {
        /// Recording file
        file: PathBuf,

        /// Query the recording answers
        #[arg(long, default_value = "replay")]
        query: String,
    },

    /// Run text through the marker demultiplexer
    Parse {
        /// Text to parse
        text: String,

        /// Split the text into chunks of this many characters
        #[arg(long)]
        split: Option<usize>,
    },

    /// List the sections the assistant can navigate to
    Sections,
}

#[derive(Serialize)]
struct TurnReport<'a> {
    query: &'a str,
    reply: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    section: Option<Section>,
}

#[derive(Serialize)]
struct ParseReport {
    visible: String,
    sections: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_directive = if cli.debug {
        "portfolio_chat=debug"
    } else {
        "portfolio_chat=info"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config = ChatConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    debug!(?config, "configuration loaded");

    match cli.command {
        Commands::Ask { query, chunk_size } => {
            let query = query.join(" ");
            let payload = KnowledgeBase::default().respond(&query, config.marker);
            let mut frames = chunked(&payload, chunk_size)
                .into_iter()
                .map(InboundFrame::chunk)
                .collect::<Vec<_>>();
            frames.push(InboundFrame::end());
            let frames = frames
                .iter()
                .map(serde_json::to_string)
                .collect::<std::result::Result<Vec<_>, _>>()?;

            run_turn(config, &query, frames, cli.format).await
        }
        Commands::Replay { file, query } => {
            let frames = FrameReader::read_raw(&file)
                .with_context(|| format!("Failed to read recording {}", file.display()))?;
            info!(frames = frames.len(), "replaying {}", file.display());
            run_turn(config, &query, frames, cli.format).await
        }
        Commands::Parse { text, split } => {
            let mut demux = StreamDemux::new(config.marker);
            let chunks = match split {
                Some(size) => chunked(&text, size),
                None => vec![text],
            };

            let mut report = ParseReport {
                visible: String::new(),
                sections: Vec::new(),
            };
            for chunk in &chunks {
                let out = demux.process_chunk(chunk);
                report.visible.push_str(&out.visible);
                report.sections.extend(out.sections);
            }
            let tail = demux.finish();
            report.visible.push_str(&tail.visible);
            report.sections.extend(tail.sections);

            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                OutputFormat::Text => {
                    println!("{}", report.visible);
                    for section in &report.sections {
                        println!("section: {}", section);
                    }
                }
            }
            Ok(())
        }
        Commands::Sections => {
            match cli.format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&Section::ALL)?)
                }
                OutputFormat::Text => {
                    for section in Section::ALL {
                        println!("{:<12} #{}", section.label(), section.anchor());
                    }
                }
            }
            Ok(())
        }
    }
}

async fn run_turn(
    config: ChatConfig,
    query: &str,
    frames: Vec<String>,
    format: OutputFormat,
) -> Result<()> {
    let navigator = SectionNavigator::new(TracingScroller, config.timings);
    let mut session = ChatSession::new(config);
    let outbound = session
        .send(query)
        .context("Query is empty, nothing to send")?;
    debug!(history = outbound.history.len(), "sending query");

    let mut stdout = std::io::stdout();
    let print_update = |update: &StreamUpdate| {
        if format == OutputFormat::Text {
            print!("{}", update.appended);
            if let Err(e) = stdout.flush() {
                warn!("failed to flush stdout: {}", e);
            }
        }
    };

    let navigations = drive_stream(
        &mut session,
        &navigator,
        futures::stream::iter(frames),
        print_update,
    )
    .await;
    for task in navigations {
        task.await.context("Navigation task failed")?;
    }

    let reply = session
        .messages()
        .last()
        .context("Transcript is empty")?;

    match format {
        OutputFormat::Json => {
            let report = TurnReport {
                query: &outbound.query,
                reply: reply.content(),
                section: reply.section_ref(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            println!();
            if let Some(section) = reply.section_ref() {
                println!("Source: {}  (navigate: #{})", section.label(), section.anchor());
            }
        }
    }
    Ok(())
}
