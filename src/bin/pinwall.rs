use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "pinwall", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a local moodboard folder to a PNG.
    Render(RenderArgs),
    /// Fetch a remote moodboard and render it to a PNG.
    Fetch(FetchArgs),
    /// List boards available to an API key (prints JSON).
    Boards(BoardsArgs),
    /// Print the concatenated text content of a local moodboard.
    Text(TextArgs),
    /// Serve the board-listing HTTP API.
    Serve(ServeArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Folder containing a moodboard .json export (plus its images).
    #[arg(long)]
    folder: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct FetchArgs {
    /// Board identifier on the remote API.
    #[arg(long)]
    id: String,

    /// API key for the remote API.
    #[arg(long, env = "PINWALL_API_KEY")]
    api_key: String,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Override the API base URL.
    #[arg(long, default_value = pinwall::DEFAULT_API_BASE)]
    api_base: String,
}

#[derive(Parser, Debug)]
struct BoardsArgs {
    /// API key for the remote API.
    #[arg(long, env = "PINWALL_API_KEY")]
    api_key: String,

    /// Override the API base URL.
    #[arg(long, default_value = pinwall::DEFAULT_API_BASE)]
    api_base: String,
}

#[derive(Parser, Debug)]
struct TextArgs {
    /// Folder containing a moodboard .json export.
    #[arg(long)]
    folder: PathBuf,
}

#[derive(Parser, Debug)]
struct ServeArgs {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:8787")]
    addr: SocketAddr,

    /// Override the API base URL used for upstream listing calls.
    #[arg(long, default_value = pinwall::DEFAULT_API_BASE)]
    api_base: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Fetch(args) => cmd_fetch(args),
        Command::Boards(args) => cmd_boards(args),
        Command::Text(args) => cmd_text(args),
        Command::Serve(args) => cmd_serve(args),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let board = pinwall::load_local(&args.folder)?;
    let resolver = pinwall::SourceResolver::new();
    write_render(&board, &resolver, &args.out)
}

fn cmd_fetch(args: FetchArgs) -> anyhow::Result<()> {
    let client = pinwall::BoardClient::new(Some(args.api_key)).with_api_base(args.api_base);
    let board = client.load_remote(&args.id)?;
    let resolver = pinwall::SourceResolver::new();
    write_render(&board, &resolver, &args.out)
}

fn write_render(
    board: &pinwall::Moodboard,
    resolver: &pinwall::SourceResolver,
    out: &Path,
) -> anyhow::Result<()> {
    let rendered = pinwall::render(board, resolver);
    for warning in &rendered.warnings {
        tracing::warn!(
            element = %warning.element_id,
            src = %warning.src,
            reason = %warning.reason,
            "element degraded to placeholder"
        );
    }

    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    rendered
        .image
        .save(out)
        .with_context(|| format!("write '{}'", out.display()))?;
    tracing::info!(
        out = %out.display(),
        width = rendered.image.width(),
        height = rendered.image.height(),
        warnings = rendered.warnings.len(),
        "render complete"
    );
    Ok(())
}

fn cmd_boards(args: BoardsArgs) -> anyhow::Result<()> {
    let client = pinwall::BoardClient::new(Some(args.api_key)).with_api_base(args.api_base);
    let boards = client.list_boards()?;
    println!("{}", serde_json::to_string_pretty(&boards)?);
    Ok(())
}

fn cmd_text(args: TextArgs) -> anyhow::Result<()> {
    let board = pinwall::load_local(&args.folder)?;
    println!("{}", pinwall::extract::text(&board));
    Ok(())
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("start tokio runtime")?;
    runtime.block_on(pinwall::serve::serve(
        args.addr,
        pinwall::serve::ApiConfig {
            api_base: args.api_base,
        },
    ))?;
    Ok(())
}
