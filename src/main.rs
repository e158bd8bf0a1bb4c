use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::panic;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use vinetop::data::{self, Dataset};
use vinetop::ui::{run_app, App};
use vinetop::view_model::{self, ViewState, REFERENCE_TOKEN};

#[derive(Parser, Debug)]
#[command(name = "vinetop")]
#[command(about = "TUI explorer for Vine Coin and other top token metrics", long_about = None)]
struct Args {
    /// Path or http(s) URL of the token snapshot JSON
    #[arg(short, long, default_value = "top_tokens_with_holders.json")]
    data: String,

    /// Token name the highlight panels anchor on
    #[arg(long, default_value = REFERENCE_TOKEN)]
    focus: String,

    /// Fetch the snapshot and print a summary without starting the TUI
    #[arg(long)]
    check: bool,
}

fn cleanup_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    // One fetch at startup; a failure leaves the view empty, it is never
    // retried.
    let (dataset, load_failed) = match data::fetch_dataset(&args.data).await {
        Ok(ds) => {
            info!(source = %args.data, tokens = ds.tokens.len(), "loaded token snapshot");
            (ds, false)
        }
        Err(e) => {
            error!(source = %args.data, error = %e, "failed to load token snapshot");
            (Dataset::default(), true)
        }
    };

    // Check mode - validate the data source and exit
    if args.check {
        if load_failed {
            eprintln!("❌ Could not load token data from {}", args.data);
            std::process::exit(1);
        }
        println!("✅ Loaded {} tokens from {}", dataset.tokens.len(), args.data);
        if let Some(ref updated) = dataset.last_updated {
            println!("Snapshot last updated: {}", updated);
        }
        let state = ViewState::default();
        let rows = view_model::displayed(&dataset.tokens, &state);
        println!("Top tokens by holders (cap filter active):");
        for (i, token) in rows.iter().take(10).enumerate() {
            println!(
                "  {:>3}. {} ({}) - {} holders",
                i + 1,
                token.name,
                token.symbol,
                data::format_count(token.holders)
            );
        }
        return Ok(());
    }

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        cleanup_terminal();
        original_hook(panic_info);
    }));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app and run
    let app = App::new(dataset, args.focus, load_failed);
    let res = run_app(&mut terminal, app);

    // Restore terminal
    cleanup_terminal();
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
