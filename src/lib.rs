pub mod clients;
pub mod config;
pub mod constants;
pub mod db;
pub mod domain;
pub mod entities;
pub mod models;
pub mod services;
pub mod state;

use anyhow::Context;
pub use config::Config;
use domain::QuoteId;
use models::quote::QuoteRecord;
use state::SharedState;
use tokio::signal;
use tracing_subscriber::EnvFilter;

pub async fn run() -> anyhow::Result<()> {
    let config = Config::load()?;
    config.validate()?;

    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let fmt_layer = tracing_subscriber::fmt::layer();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_help();
        return Ok(());
    }

    match args[1].as_str() {
        "refresh" | "r" => cmd_refresh(&config).await,

        "search" | "s" => {
            if args.len() < 3 {
                println!("Usage: quotarr search <character name>");
                println!("Example: quotarr search \"Homer\"");
                return Ok(());
            }
            let name = args[2..].join(" ");
            cmd_search(&config, &name).await
        }

        "list" | "ls" | "l" => cmd_list(&config).await,

        "favorites" | "favs" => cmd_favorites(&config).await,

        "fav" | "f" => {
            if args.len() < 3 {
                println!("Usage: quotarr fav <quote_id>");
                println!("Use 'quotarr list' to see IDs");
                return Ok(());
            }
            cmd_toggle_favorite(&config, &args[2]).await
        }

        "clear" => cmd_clear(&config).await,

        "watch" | "w" => cmd_watch(&config).await,

        "login" => {
            if args.len() < 4 {
                println!("Usage: quotarr login <email> <password>");
                return Ok(());
            }
            cmd_login(&config, &args[2], &args[3]).await
        }

        "register" => {
            if args.len() < 4 {
                println!("Usage: quotarr register <email> <password> [display name]");
                return Ok(());
            }
            let display_name = args.get(4).map(String::as_str);
            cmd_register(&config, &args[2], &args[3], display_name).await
        }

        "logout" => cmd_logout(&config).await,

        "whoami" => cmd_whoami(&config).await,

        "recover" => {
            if args.len() < 3 {
                println!("Usage: quotarr recover <email>");
                return Ok(());
            }
            cmd_recover(&config, &args[2]).await
        }

        "init" | "--init" => {
            Config::create_default_if_missing()?;
            println!("✓ Config file created. Edit config.toml and run again.");
            Ok(())
        }

        "help" | "-h" | "--help" => {
            print_help();
            Ok(())
        }

        _ => {
            println!("Unknown command: {}", args[1]);
            println!();
            print_help();
            Ok(())
        }
    }
}

fn print_help() {
    println!("Quotarr - Character Quote Cache Manager");
    println!("Fetches character quotes, caches them locally, tracks favorites");
    println!();
    println!("USAGE:");
    println!("  quotarr <COMMAND> [OPTIONS]");
    println!();
    println!("CACHE COMMANDS:");
    println!("  refresh           Fetch a fresh batch and replace the cache");
    println!("  search <name>     Fetch quotes for one character and replace the cache");
    println!("  list, ls          List all cached quotes");
    println!("  favorites         List favorite quotes");
    println!("  fav <id>          Toggle the favorite flag on a cached quote");
    println!("  clear             Drop every cached quote");
    println!("  watch             Print cache snapshots as they change (Ctrl+C to stop)");
    println!();
    println!("ACCOUNT COMMANDS:");
    println!("  login <email> <password>");
    println!("  register <email> <password> [display name]");
    println!("  logout");
    println!("  whoami            Show the signed-in user, if any");
    println!("  recover <email>   Send a password-recovery email");
    println!();
    println!("OTHER:");
    println!("  init              Create default config file");
    println!("  help              Show this help message");
    println!();
    println!("EXAMPLES:");
    println!("  quotarr refresh                 # Cache a fresh batch of quotes");
    println!("  quotarr search \"Homer\"          # Cache quotes for one character");
    println!("  quotarr fav 3                   # Mark quote 3 as a favorite");
    println!("  quotarr favorites               # Show favorites");
    println!();
    println!("CONFIG:");
    println!("  Edit config.toml to configure the quote API, auth provider, etc.");
}

fn print_quote(record: &QuoteRecord) {
    let marker = if record.is_favorite { "★" } else { "☆" };
    println!("{} [{}] {}", marker, record.id, record.character_name);
    println!("    \"{}\"", record.quote_text);
}

async fn cmd_refresh(config: &Config) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;

    println!("Refreshing quote cache...");
    match state.quote_service.refresh().await {
        Ok(count) => {
            println!("✓ Cached {} quotes", count);
        }
        Err(e) => {
            println!("⚠ Refresh failed: {}", e);
            println!("  Previously cached quotes were kept.");
        }
    }

    Ok(())
}

async fn cmd_search(config: &Config, name: &str) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;

    println!("Searching quotes for: {}", name);
    match state.quote_service.search(name).await {
        Ok(0) => {
            println!("No quotes found for '{}'. Cache is now empty.", name);
        }
        Ok(count) => {
            println!("✓ Cached {} quotes for '{}'", count, name);
        }
        Err(e) => {
            println!("⚠ Search failed: {}", e);
            println!("  Previously cached quotes were kept.");
        }
    }

    Ok(())
}

async fn cmd_list(config: &Config) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;
    let quotes = state.quote_service.list_quotes().await?;

    if quotes.is_empty() {
        println!("The quote cache is empty.");
        println!();
        println!("Fill it with: quotarr refresh");
        return Ok(());
    }

    println!("Cached Quotes ({} total)", quotes.len());
    println!("{:-<70}", "");

    for quote in &quotes {
        print_quote(quote);
    }

    println!();
    println!("Legend: ★ Favorite | ☆ Not favorite");

    Ok(())
}

async fn cmd_favorites(config: &Config) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;
    let favorites = state.quote_service.list_favorites().await?;

    if favorites.is_empty() {
        println!("No favorites yet.");
        println!();
        println!("Mark one with: quotarr fav <id>");
        return Ok(());
    }

    println!("Favorite Quotes ({} total)", favorites.len());
    println!("{:-<70}", "");

    for quote in &favorites {
        print_quote(quote);
    }

    Ok(())
}

async fn cmd_toggle_favorite(config: &Config, id_str: &str) -> anyhow::Result<()> {
    let id: i32 = match id_str.parse() {
        Ok(id) => id,
        Err(_) => {
            println!("Invalid quote ID: {}", id_str);
            println!("Use 'quotarr list' to see quote IDs.");
            return Ok(());
        }
    };

    let state = SharedState::new(config.clone()).await?;

    match state.quote_service.toggle_favorite(QuoteId::new(id)).await {
        Ok(record) => {
            let verb = if record.is_favorite {
                "Marked as favorite"
            } else {
                "Removed favorite mark from"
            };
            println!("✓ {}: [{}] {}", verb, record.id, record.character_name);
        }
        Err(e) => {
            println!("⚠ {}", e);
        }
    }

    Ok(())
}

async fn cmd_clear(config: &Config) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;
    let removed = state.store.clear_quotes().await?;
    println!("✓ Removed {} cached quotes", removed);
    Ok(())
}

async fn cmd_watch(config: &Config) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;
    let mut rx = state.quote_service.watch_quotes();

    let print_snapshot = |quotes: &[QuoteRecord]| {
        println!("{:-<70}", "");
        println!("Cache snapshot: {} quotes", quotes.len());
        for quote in quotes {
            print_quote(quote);
        }
    };

    print_snapshot(&rx.borrow().clone());
    println!();
    println!("Watching for cache changes. Press Ctrl+C to stop.");

    loop {
        tokio::select! {
            _ = signal::ctrl_c() => {
                println!();
                println!("Stopped watching.");
                break;
            }
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = rx.borrow_and_update().clone();
                print_snapshot(&snapshot);
            }
        }
    }

    Ok(())
}

fn auth_disabled(config: &Config) -> bool {
    if config.auth.enabled {
        return false;
    }
    println!("Auth is disabled in config.toml ([auth] enabled = false).");
    true
}

async fn cmd_login(config: &Config, email: &str, password: &str) -> anyhow::Result<()> {
    if auth_disabled(config) {
        return Ok(());
    }

    let state = SharedState::new(config.clone()).await?;

    match state.auth_service.sign_in(email, password).await {
        Ok(user) => {
            println!("✓ Signed in as {} ({})", user.label(), user.email);
        }
        Err(e) => {
            println!("⚠ Sign-in failed: {}", e);
        }
    }

    Ok(())
}

async fn cmd_register(
    config: &Config,
    email: &str,
    password: &str,
    display_name: Option<&str>,
) -> anyhow::Result<()> {
    if auth_disabled(config) {
        return Ok(());
    }

    let state = SharedState::new(config.clone()).await?;

    match state
        .auth_service
        .sign_up(email, password, display_name)
        .await
    {
        Ok(user) => {
            println!("✓ Registered {} ({})", user.label(), user.email);
        }
        Err(e) => {
            println!("⚠ Registration failed: {}", e);
        }
    }

    Ok(())
}

async fn cmd_logout(config: &Config) -> anyhow::Result<()> {
    if auth_disabled(config) {
        return Ok(());
    }

    let state = SharedState::new(config.clone()).await?;
    state
        .auth_service
        .sign_out()
        .await
        .context("Sign-out failed")?;
    println!("✓ Signed out");
    Ok(())
}

async fn cmd_whoami(config: &Config) -> anyhow::Result<()> {
    if auth_disabled(config) {
        return Ok(());
    }

    let state = SharedState::new(config.clone()).await?;

    match state.auth_service.current_user().await {
        Ok(Some(user)) => {
            println!("Signed in as {} ({})", user.label(), user.email);
        }
        Ok(None) => {
            println!("Not signed in.");
        }
        Err(e) => {
            println!("⚠ Could not check session: {}", e);
        }
    }

    Ok(())
}

async fn cmd_recover(config: &Config, email: &str) -> anyhow::Result<()> {
    if auth_disabled(config) {
        return Ok(());
    }

    let state = SharedState::new(config.clone()).await?;

    match state.auth_service.reset_password(email).await {
        Ok(()) => {
            println!("✓ Recovery email requested for {}", email);
        }
        Err(e) => {
            println!("⚠ Recovery request failed: {}", e);
        }
    }

    Ok(())
}
