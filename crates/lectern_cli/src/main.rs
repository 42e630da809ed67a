mod console;

use clap::Parser;
use console::{Console, Reply, HELP};
use lectern_catalog::MemoryCatalog;
use lectern_core::LecternConfig;
use lectern_session::SessionStore;
use lectern_tools::ToolRegistry;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long, default_value = "lectern.toml")]
    config: PathBuf,

    /// Path to the JSON course catalog (overrides config)
    #[arg(long, env = "LECTERN_CATALOG")]
    catalog: Option<PathBuf>,

    /// Exchanges kept per session (overrides config)
    #[arg(long)]
    max_history: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let mut config = LecternConfig::load_or_default(&args.config);
    if let Some(path) = args.catalog {
        config.catalog.path = path;
    }
    if let Some(n) = args.max_history {
        config.session.max_history = n;
    }
    config.validate()?;

    info!("Loading catalog from {}...", config.catalog.path.display());
    let store = Arc::new(MemoryCatalog::load(
        &config.catalog.path,
        config.search.max_results,
    )?);
    let registry = Arc::new(ToolRegistry::with_course_tools(store)?);
    let sessions = Arc::new(SessionStore::new(config.session.max_history));
    info!(
        "{} tool(s) registered, keeping {} exchange(s) per session",
        registry.len(),
        sessions.max_history()
    );

    let mut console = Console::new(registry, sessions).await;
    info!("Started session {}", console.session_id());
    println!("Lectern ready. {HELP}");
    print!("> ");
    io::stdout().flush()?;

    let stdin = io::stdin();
    let mut input = String::new();
    loop {
        input.clear();
        if stdin.read_line(&mut input)? == 0 {
            break;
        }

        match console.handle_line(&input).await {
            Ok(Reply::Quit) => break,
            Ok(Reply::Text(text)) => {
                if !text.is_empty() {
                    println!("{text}\n");
                }
            }
            Err(e) => {
                error!("Turn failed: {}", e);
                println!("[Error]: {e}\n");
            }
        }

        print!("> ");
        io::stdout().flush()?;
    }

    Ok(())
}
