//! LinguaNote CLI - command-line access to a personal English-learning
//! notebook.
//!
//! Thin front end over the `linguanote` library: login/logout, session
//! status, vocabulary lookup, and the daily dashboard.

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use linguanote::api::{ApiClient, ApiError};
use linguanote::auth::{FileStorage, SessionManager, SessionState, TokenStore};
use linguanote::config::Config;
use linguanote::models::vocabulary;
use linguanote::utils::{redact_token, truncate};

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn print_usage() {
    eprintln!("Usage: linguanote [COMMAND]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  dashboard      Show learning dashboard (default)");
    eprintln!("  vocab [QUERY]  List vocabulary, optionally filtered");
    eprintln!("  phrase         Show the phrase of the day");
    eprintln!("  login          Log in and store the session");
    eprintln!("  logout         Log out and purge stored credentials");
    eprintln!("  status         Report session and token store health");
    eprintln!("  clear-tokens   Force-clean the token store");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();
    info!("LinguaNote CLI starting");

    let config = Config::load().unwrap_or_default();
    let store = Arc::new(TokenStore::new(Box::new(FileStorage::new(
        config.data_dir()?,
    ))));
    let api = ApiClient::new(config.base_url(), store.clone())?;
    let mut session = SessionManager::new(api.clone(), store.clone());

    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(String::as_str).unwrap_or("dashboard");

    let result = match command {
        "dashboard" => dashboard(&api, &mut session).await,
        "vocab" => vocab(&api, &mut session, args.get(2).map(String::as_str)).await,
        "phrase" => phrase(&api).await,
        "login" => login(&mut session, config).await,
        "logout" => logout(&mut session).await,
        "status" => status(&store, &mut session).await,
        "clear-tokens" => {
            store.force_clear();
            println!("Token store cleared.");
            Ok(())
        }
        _ => {
            print_usage();
            Ok(())
        }
    };

    // A 401 anywhere means the stored session is gone; say so plainly
    // instead of dumping an error chain.
    if let Err(ref e) = result {
        if e.downcast_ref::<ApiError>()
            .map(ApiError::is_unauthorized)
            .unwrap_or(false)
        {
            session.invalidate();
            eprintln!("Session expired - please run 'linguanote login'.");
            return Ok(());
        }
    }

    result
}

/// Bootstrap the session and require a logged-in user
async fn require_login(session: &mut SessionManager) -> Result<()> {
    session.bootstrap().await;
    if !session.is_authenticated() {
        anyhow::bail!("Not logged in. Run 'linguanote login' first.");
    }
    Ok(())
}

async fn dashboard(api: &ApiClient, session: &mut SessionManager) -> Result<()> {
    require_login(session).await?;
    if let Some(user) = session.current_user() {
        println!("Welcome back, {}!\n", user.display_name());
    }

    let (summary, stats, daily) = api.fetch_dashboard_overview().await?;

    println!("Vocabulary:    {} words ({} learned, {} favorites)",
        stats.total, stats.learned, stats.favorites);
    println!("Flashcards:    {} due", summary.flashcards_due);
    println!("Streak:        {} days", summary.streak_days);
    println!("Achievements:  {} unlocked", summary.achievements_unlocked);
    println!();
    println!("Phrase of the day: {}", daily.phrase);
    if let Some(translation) = daily.translation {
        println!("                   {}", translation);
    }
    Ok(())
}

async fn vocab(api: &ApiClient, session: &mut SessionManager, query: Option<&str>) -> Result<()> {
    require_login(session).await?;

    let mut entries = api.fetch_vocabulary().await?;
    let query = query.unwrap_or("");
    entries.retain(|e| e.matches_query(query));
    vocabulary::sort_by_word(&mut entries);

    if entries.is_empty() {
        println!("No vocabulary entries match.");
        return Ok(());
    }

    for entry in &entries {
        let marker = if entry.favorite { "*" } else { " " };
        let gloss = entry.translation.as_deref().unwrap_or("-");
        println!("{} {:<24} {}", marker, truncate(&entry.word, 24), truncate(gloss, 40));
    }
    println!("\n{} entries", entries.len());
    Ok(())
}

async fn phrase(api: &ApiClient) -> Result<()> {
    let daily = api.fetch_daily_phrase().await?;
    println!("{}", daily.phrase);
    if let Some(translation) = daily.translation {
        println!("{}", translation);
    }
    if let Some(explanation) = daily.explanation {
        println!("\n{}", explanation);
    }
    Ok(())
}

async fn login(session: &mut SessionManager, mut config: Config) -> Result<()> {
    println!("=== LinguaNote Login ===\n");

    let username = match config.last_username {
        Some(ref last_user) => {
            print!("Username [{}]: ", last_user);
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;
            let input = input.trim();

            if input.is_empty() {
                last_user.clone()
            } else {
                input.to_string()
            }
        }
        None => {
            print!("Username: ");
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;
            input.trim().to_string()
        }
    };

    if username.is_empty() {
        anyhow::bail!("Username required");
    }

    let password = rpassword::prompt_password("Password: ")?;

    println!("\nAuthenticating...");
    let user = session.login(&username, &password).await?;
    println!("Logged in as {}.", user.display_name());

    config.last_username = Some(username);
    config.save()?;
    Ok(())
}

async fn logout(session: &mut SessionManager) -> Result<()> {
    session.logout().await;
    println!("Logged out.");
    Ok(())
}

/// Debug surface: session state plus a redacted token store report
async fn status(store: &TokenStore, session: &mut SessionManager) -> Result<()> {
    let health = store.health();
    println!("Store status:   {}", health.status);
    println!("Access token:   {}", if health.access_token { "present" } else { "absent" });
    println!("Refresh token:  {}", if health.refresh_token { "present" } else { "absent" });
    println!("Corrupted:      {}", health.corrupted);

    if let Some(token) = store.raw_access_token() {
        println!("Token (redacted): {}", redact_token(&token));
        if let Ok(claims) = linguanote::auth::claims::decode_claims(&token) {
            if let Some(expires) = claims.expires_at() {
                println!("Expires:          {}", expires.format("%Y-%m-%d %H:%M:%S UTC"));
            }
        }
    }

    match session.bootstrap().await {
        SessionState::Authenticated(user) => println!("Session:        logged in as {}", user.display_name()),
        _ => println!("Session:        anonymous"),
    }
    Ok(())
}
