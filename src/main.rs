// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use std::env;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Use library instead of local modules
use care_finder::{compose_view, Config, ResultView, SearchController};

fn main() -> Result<()> {
    init_logging();

    let config = Config::from_env().context("Failed to load configuration")?;
    let args: Vec<String> = env::args().collect();

    if args.len() > 1 && args[1] == "search" {
        // One-shot search mode: care-finder search <term> [specialty]
        let term = args.get(2).map(String::as_str).unwrap_or("");
        let specialty = args.get(3).map(String::as_str).unwrap_or("");
        run_search(&config, term, specialty)?;
    } else {
        // UI mode (default)
        run_ui_mode(&config)?;
    }

    Ok(())
}

/// Logs go to stderr, and only when RUST_LOG is set, so the TUI's
/// alternate screen stays clean by default.
fn init_logging() {
    if env::var_os("RUST_LOG").is_none() {
        return;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,care_finder=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run_search(config: &Config, term: &str, specialty: &str) -> Result<()> {
    let catalog = config.load_catalog()?;

    let mut controller = SearchController::mount(&catalog);
    controller.set_search_term(term);
    controller.set_specialty_filter(specialty);
    controller.submit_search();

    match compose_view(&controller) {
        ResultView::Populated { heading, cards } => {
            println!("{}", heading);
            println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
            for card in cards {
                println!(
                    "{}  ({})  {} {}  {}",
                    card.name,
                    card.specialty,
                    "★".repeat(card.filled_stars as usize),
                    card.rating_label,
                    card.distance_label,
                );
                println!("   {}", card.location);
                println!("   {}", card.availability_label);
                if !card.visible_slots.is_empty() {
                    println!("   Next available: {}", card.visible_slots.join(", "));
                }
            }
        }
        ResultView::Empty { heading, title, hint } => {
            println!("{}", heading);
            println!("{}", title);
            println!("{}", hint);
        }
        ResultView::Unavailable { message, .. } => {
            eprintln!("❌ {}", message);
            std::process::exit(1);
        }
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &Config) -> Result<()> {
    let catalog = config.load_catalog()?;
    tracing::info!(providers = catalog.len(), "Starting care finder UI");

    let mut app = ui::App::new(Box::new(catalog));
    ui::run_ui(&mut app)?;

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &Config) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the API: cargo run --bin care-finder-server --features server");
    std::process::exit(1);
}
