use anyhow::{Context, Result};
use bindays_council::{CouncilClient, DEFAULT_API_BASE};
use bindays_format::{format_display_address, format_postcode, normalize_postcode};
use bindays_model::{FavouriteAddress, SUGGESTED_REMINDER_HOURS};
use bindays_store::PreferenceStore;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;

mod render;

#[derive(Parser)]
#[command(name = "bindays")]
#[command(about = "Bin collection dates and reminders for your address")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_HASH"), ")"))]
struct Cli {
    /// Log level: error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "warn", value_enum)]
    log_level: LogLevel,

    /// Use UTC timestamps instead of local time
    #[arg(long, global = true)]
    utc: bool,

    /// Base URL of the collections API
    #[arg(long, global = true, env = "BINDAYS_API_BASE", default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Preferences file (selected address, favourites, reminder settings)
    #[arg(long, global = true, env = "BINDAYS_STORE", default_value = "bindays.json")]
    store: PathBuf,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "BINDAYS_TIMEOUT_SECS", default_value_t = 15)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Subcommand)]
enum Commands {
    /// List the addresses registered at a postcode
    Lookup {
        /// Postcode, any case and spacing (e.g. "tr108jt")
        postcode: String,
    },

    /// Choose the address to show collections for
    Select {
        postcode: String,

        /// UPRN of the address
        #[arg(long, conflicts_with = "index", required_unless_present = "index")]
        uprn: Option<String>,

        /// Position in the `lookup` listing, starting at 1
        #[arg(long)]
        index: Option<usize>,
    },

    /// Show upcoming collections for the selected address
    Dashboard,

    /// Saved addresses
    Favourites {
        #[command(subcommand)]
        action: Option<FavouritesAction>,
    },

    /// Show or change reminder settings
    Settings {
        /// Hour of the day (0-23) to be reminded, the day before collection
        #[arg(long)]
        hour: Option<u8>,

        #[arg(long, conflicts_with = "disable")]
        enable: bool,

        #[arg(long)]
        disable: bool,
    },

    /// Format an address string for display, offline
    Format {
        text: String,

        /// Postcode the address was found under
        #[arg(short, long)]
        postcode: Option<String>,
    },
}

#[derive(Subcommand)]
enum FavouritesAction {
    /// List saved addresses
    List,
    /// Make a saved address the selected one
    Use { uprn: String },
    /// Forget a saved address
    Remove { uprn: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep HTTP internals quiet at debug/trace
    let level = match cli.log_level {
        LogLevel::Error => "error",
        LogLevel::Warn  => "warn",
        LogLevel::Info  => "info",
        LogLevel::Debug => "debug,hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn",
        LogLevel::Trace => "trace,hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // Timestamp format: 2026-02-14 19:44:09.123 -08:00
    let time_format = "%Y-%m-%d %H:%M:%S%.3f %:z";

    // Logs go to stderr so stdout stays clean for the screens
    if cli.utc {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_timer(tracing_subscriber::fmt::time::ChronoUtc::new(time_format.to_string()))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_timer(tracing_subscriber::fmt::time::ChronoLocal::new(time_format.to_string()))
            .init();
    }

    let timeout = Duration::from_secs(cli.timeout_secs);

    match cli.command {
        Commands::Lookup { postcode } => {
            let client = CouncilClient::new(&cli.api_base, timeout)?;
            let addresses = client
                .lookup_addresses(&postcode)
                .await
                .context("Address lookup failed, check the postcode and try again")?;
            print!("{}", render::address_list(&postcode, &addresses));
        }
        Commands::Select {
            postcode,
            uprn,
            index,
        } => {
            let mut store = open_store(&cli.store).await?;
            let client = CouncilClient::new(&cli.api_base, timeout)?;
            let addresses = client
                .lookup_addresses(&postcode)
                .await
                .context("Address lookup failed, check the postcode and try again")?;

            let raw = match (uprn, index) {
                (Some(uprn), _) => addresses
                    .iter()
                    .find(|a| a.uprn == uprn.trim())
                    .with_context(|| {
                        format!("No address with UPRN {uprn} at {}", format_postcode(&postcode))
                    })?,
                (None, Some(n)) => n
                    .checked_sub(1)
                    .and_then(|i| addresses.get(i))
                    .with_context(|| {
                        format!(
                            "No address number {n} at {} ({} found)",
                            format_postcode(&postcode),
                            addresses.len()
                        )
                    })?,
                (None, None) => anyhow::bail!("Pass --uprn or --index"),
            };

            // Store the postcode the user searched under, not whatever the
            // address text happens to contain
            let address = FavouriteAddress::from_raw(raw, &normalize_postcode(&postcode));
            let label = render::address_label(&address);
            store.select_address(address)?;
            println!("Selected: {label}");
        }
        Commands::Dashboard => {
            let mut store = open_store(&cli.store).await?;
            let state = store.state()?.clone();
            let Some(address) = state.selected_address.clone() else {
                println!("No address selected.");
                println!("Find yours with: bindays lookup <POSTCODE>");
                println!("Then choose it with: bindays select <POSTCODE> --index <N>");
                return Ok(());
            };

            if !address.is_complete() {
                store.clear_selection()?;
                anyhow::bail!(
                    "Selected address information is incomplete. Please re-select your address."
                );
            }

            let client = CouncilClient::new(&cli.api_base, timeout)?;
            let schedule = client
                .lookup_schedule(&address.uprn, &address.postcode)
                .await
                .context("Could not load collection dates, run the dashboard again to retry")?;

            let today = chrono::Local::now().date_naive();
            print!("{}", render::dashboard(&address, &schedule, today, &state));
        }
        Commands::Favourites { action } => {
            let mut store = open_store(&cli.store).await?;
            match action.unwrap_or(FavouritesAction::List) {
                FavouritesAction::List => {
                    print!("{}", render::favourites(store.state()?));
                }
                FavouritesAction::Use { uprn } => {
                    let favourite = store
                        .state()?
                        .favourite(uprn.trim())
                        .cloned()
                        .with_context(|| format!("No favourite with UPRN {uprn}"))?;
                    let label = render::address_label(&favourite);
                    store.select_address(favourite)?;
                    println!("Selected: {label}");
                }
                FavouritesAction::Remove { uprn } => {
                    if store.remove_favourite(uprn.trim())? {
                        println!("Removed {uprn}");
                    } else {
                        anyhow::bail!("No favourite with UPRN {uprn}");
                    }
                }
            }
        }
        Commands::Settings {
            hour,
            enable,
            disable,
        } => {
            let mut store = open_store(&cli.store).await?;
            if let Some(hour) = hour {
                if !SUGGESTED_REMINDER_HOURS.contains(&hour) {
                    tracing::warn!(
                        hour,
                        "Reminder hour is outside {:02}:00-{:02}:00",
                        SUGGESTED_REMINDER_HOURS.start(),
                        SUGGESTED_REMINDER_HOURS.end()
                    );
                }
                store.set_notification_hour(hour)?;
            }
            if enable || disable {
                store.set_notifications_enabled(enable)?;
            }
            print!("{}", render::settings(store.state()?));
        }
        Commands::Format { text, postcode } => {
            println!("{}", format_display_address(Some(&text), postcode.as_deref()));
        }
    }

    Ok(())
}

async fn open_store(path: &Path) -> Result<PreferenceStore> {
    let mut store = PreferenceStore::new(path);
    let issues = store
        .load()
        .await
        .with_context(|| format!("Failed to load preferences from {}", path.display()))?;
    if !issues.is_empty() {
        eprintln!(
            "Some saved preferences were unreadable and have been reset ({} issue(s)).",
            issues.len()
        );
    }
    Ok(store)
}
