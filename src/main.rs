//! dspreview - interactive terminal preview of a design-system page.
//!
//! # Usage
//!
//! ```bash
//! dspreview demos/preview.json
//! dspreview --theme light --no-sidebar demos/preview.json
//! dspreview --debug-log dspreview.log demos/preview.json
//! dspreview --search-cards ".token-card, .icon-card" demos/preview.json
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use dspreview::app::App;
use dspreview::config::{
    ConfigFlags, ThemeMode, clear_config_flags, default_store_path, global_config_path,
    load_config_flags, local_override_path, parse_flag_tokens, save_config_flags,
};
use dspreview::page::Selector;

/// Interactive terminal preview of a design-system page
#[derive(Parser, Debug)]
#[command(name = "dspreview", version, about, long_about = None)]
struct Cli {
    /// Page description (JSON) to preview
    #[arg(value_name = "PAGE")]
    page: PathBuf,

    /// Start in this theme; `auto` uses the stored preference
    #[arg(long, value_enum, default_value = "auto")]
    theme: ThemeMode,

    /// Rows below the scroll position used to pick the active section
    #[arg(long, value_name = "ROWS")]
    lookahead: Option<usize>,

    /// Hide the section sidebar
    #[arg(long)]
    no_sidebar: bool,

    /// Preference file (theme and language)
    #[arg(long, value_name = "PATH")]
    store: Option<PathBuf>,

    /// Write debug logs to a file
    #[arg(long, value_name = "PATH")]
    debug_log: Option<PathBuf>,

    /// Cards the page search filters, as a comma-separated selector list
    #[arg(long, value_name = "SELECTORS")]
    search_cards: Option<String>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

fn init_logging(debug_log: Option<&Path>) -> Result<()> {
    match debug_log {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create debug log {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
                )
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
                )
                .init();
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    init_logging(effective.debug_log.as_deref())?;
    tracing::debug!(?effective, "effective flags");

    if !cli.page.exists() {
        anyhow::bail!("Page not found: {}", cli.page.display());
    }

    let search_cards = effective
        .search_cards
        .as_deref()
        .map(Selector::parse_list)
        .transpose()
        .context("Invalid --search-cards")?;

    let store = effective.store.clone().unwrap_or_else(default_store_path);
    let mut app = App::new(cli.page)
        .with_store(Some(store))
        .with_theme(effective.theme.and_then(ThemeMode::forced))
        .with_lookahead(effective.lookahead)
        .with_sidebar_visible(!effective.no_sidebar)
        .with_search_cards(search_cards)
        .with_config_paths(
            Some(global_path),
            local_path.exists().then_some(local_path),
        );

    app.run().context("Application error")
}
