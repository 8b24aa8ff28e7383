//! Backend entry-point: reads configuration from the environment and starts
//! the HTTP server.

use std::env;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use actix_web::web;
use diesel::{Connection, PgConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use url::Url;
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

use outlay::inbound::http::health::HealthState;
use outlay::outbound::billing::CheckoutEndpoint;
use outlay::outbound::persistence::{DbPool, PoolConfig};
use outlay::server::{create_server, ServerConfig};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Bring the schema up to date before the pool starts handing out
/// connections. Runs on a short-lived synchronous connection.
fn run_migrations(database_url: &str) -> std::io::Result<()> {
    let mut conn = PgConnection::establish(database_url)
        .map_err(|e| std::io::Error::other(format!("migration connection failed: {e}")))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| std::io::Error::other(format!("migrations failed: {e}")))?;
    Ok(())
}

/// Read the session signing key, falling back to an ephemeral key only in
/// development builds or when explicitly allowed.
fn session_key() -> std::io::Result<Key> {
    let key_path =
        env::var("SESSION_KEY_FILE").unwrap_or_else(|_| "/var/run/secrets/session_key".into());
    match std::fs::read(&key_path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(e) => {
            let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %key_path, error = %e, "using temporary session key (dev only)");
                Ok(Key::generate())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read session key at {key_path}: {e}"
                )))
            }
        }
    }
}

fn parse_env_url(name: &str) -> std::io::Result<Option<Url>> {
    match env::var(name) {
        Ok(raw) => Url::parse(&raw)
            .map(Some)
            .map_err(|e| std::io::Error::other(format!("invalid {name}: {e}"))),
        Err(_) => Ok(None),
    }
}

/// Assemble the checkout provider configuration when all of its settings are
/// present; partial configuration is rejected rather than half-applied.
fn checkout_config() -> std::io::Result<Option<CheckoutEndpoint>> {
    let Some(endpoint) = parse_env_url("CHECKOUT_URL")? else {
        return Ok(None);
    };
    let secret = env::var("CHECKOUT_SECRET")
        .map_err(|_| std::io::Error::other("CHECKOUT_URL set but CHECKOUT_SECRET missing"))?;
    let price_id = env::var("CHECKOUT_PRICE_ID")
        .map_err(|_| std::io::Error::other("CHECKOUT_URL set but CHECKOUT_PRICE_ID missing"))?;
    let base = env::var("APP_BASE_URL")
        .map_err(|_| std::io::Error::other("CHECKOUT_URL set but APP_BASE_URL missing"))?;
    let base = base.trim_end_matches('/');

    Ok(Some(CheckoutEndpoint {
        endpoint,
        secret,
        price_id,
        success_url: format!("{base}/app/account"),
        cancel_url: format!("{base}/app/dashboard"),
    }))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let key = session_key()?;
    let cookie_secure = env::var("SESSION_COOKIE_SECURE")
        .map(|v| v != "0")
        .unwrap_or(true);

    let bind_addr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8080".into())
        .parse()
        .map_err(|e| std::io::Error::other(format!("invalid BIND_ADDR: {e}")))?;
    let mut config = ServerConfig::new(key, cookie_secure, SameSite::Lax, bind_addr);

    if let Ok(database_url) = env::var("DATABASE_URL") {
        run_migrations(&database_url)?;
        let pool = DbPool::new(PoolConfig::new(database_url))
            .await
            .map_err(|e| std::io::Error::other(format!("database pool: {e}")))?;
        config = config.with_db_pool(pool);
    } else {
        warn!("DATABASE_URL not set; using in-memory fixture storage");
    }

    if let Some(endpoint) = parse_env_url("IDENTITY_VERIFY_URL")? {
        config = config.with_identity_endpoint(endpoint);
    } else {
        warn!("IDENTITY_VERIFY_URL not set; fixture credentials only");
    }

    if let Some(checkout) = checkout_config()? {
        config = config.with_checkout(checkout);
    } else {
        warn!("checkout provider not configured; returning canned sessions");
    }

    if let Ok(raw) = env::var("PROVIDER_TIMEOUT_SECS") {
        let secs: u64 = raw
            .parse()
            .map_err(|e| std::io::Error::other(format!("invalid PROVIDER_TIMEOUT_SECS: {e}")))?;
        config = config.with_provider_timeout(Duration::from_secs(secs));
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await
}
