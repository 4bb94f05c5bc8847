//! ctxsearch command-line front end
//!
//! Builds the context menu for a provider file and simulates clicks on it.
//!
//! Usage:
//!   ctxsearch --providers engines.json menu
//!   ctxsearch --providers engines.json search --key cs-0 --selection "rust"

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use ctxsearch_cli::{format_menu, load_config, load_providers, Session};
use ctxsearch_engine::{order, ClickEvent};
use ctxsearch_types::{NavigationMode, NavigationPreference};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ctxsearch")]
#[command(about = "Context menu search: build the menu and resolve clicks")]
struct Args {
    /// Provider store contents (JSON object of id -> provider)
    #[arg(short, long)]
    providers: Option<PathBuf>,

    /// Default providers imported when the store is empty
    #[arg(short, long)]
    defaults: Option<PathBuf>,

    /// Engine config (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the ordered provider ids
    Order,
    /// Print the context menu
    Menu,
    /// Click a menu item and print the resulting navigation
    Search {
        /// Menu item key, e.g. cs-0
        #[arg(short, long)]
        key: String,

        /// Selection carried by the click
        #[arg(short, long)]
        selection: Option<String>,

        /// Position of the originating tab
        #[arg(short, long, default_value = "0")]
        tab: u32,

        /// Where results open
        #[arg(short, long, value_enum, default_value = "new-tab")]
        mode: Mode,

        /// Give the new tab or window focus
        #[arg(short, long)]
        active: bool,

        /// Page URL reported by the content script
        #[arg(long)]
        page_url: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Mode {
    SameTab,
    NewTab,
    NewWindow,
}

impl From<Mode> for NavigationMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::SameTab => NavigationMode::SameTab,
            Mode::NewTab => NavigationMode::NewTab,
            Mode::NewWindow => NavigationMode::NewWindow,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config = load_config(args.config.as_deref())?;
    let providers = load_providers(args.providers.as_deref())?;
    debug!("Loaded {} providers", providers.len());

    match args.command {
        Command::Order => {
            for id in order(&providers).iter() {
                println!("{id}");
            }
        }
        Command::Menu => {
            let session = Session::start(
                config,
                providers,
                NavigationPreference::default(),
                args.defaults.as_deref(),
            )
            .await;
            for notification in session.notifications().await {
                info!("Notification: {}", notification.message);
            }
            print!("{}", format_menu(&session.menu.items().await));
        }
        Command::Search {
            key,
            selection,
            tab,
            mode,
            active,
            page_url,
        } => {
            let preference = NavigationPreference::new(mode.into(), active);
            let session =
                Session::start(config, providers, preference, args.defaults.as_deref()).await;
            let click = ClickEvent {
                item_key: key,
                selection_text: selection,
                origin_tab_position: tab,
            };
            let report = session.click(click, page_url).await;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
