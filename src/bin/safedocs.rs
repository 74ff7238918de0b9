use safedocs_client::services::auth::LoginOutcome;
use safedocs_client::{ApiConfig, AppState};
use std::env;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Small smoke CLI: signs in with credentials from the environment, prints
/// the confirmed identity, and lists both sides of the sharing queries.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env()?;
    tracing::info!("✅ Configuration loaded (backend: {})", config.base_url);

    let state = AppState::new(&config)?;

    let email = env::var("SAFEDOCS_EMAIL")?;
    let password = env::var("SAFEDOCS_PASSWORD")?;

    match state.auth.login(&email, &password).await {
        Ok(LoginOutcome::Authenticated(user)) => {
            tracing::info!("✅ Signed in as {} ({})", user.email, user.id);
        }
        Ok(LoginOutcome::RequiresEmailConfirmation(_)) => {
            tracing::warn!("📧 Email confirmation pending, no session established");
            return Ok(());
        }
        Err(e) => {
            tracing::error!("❌ Login failed: {}", e);
            return Err(e.into());
        }
    }

    let shared_with_me = state.shares.shared_with_me().await?;
    println!("Shared with me: {} document(s)", shared_with_me.len());
    for item in &shared_with_me {
        println!(
            "  {} ({}, expired: {})",
            item.title,
            item.permission_level.as_str(),
            item.is_expired()
        );
    }

    let my_shared = state.shares.my_shared().await?;
    println!("Shared by me: {} share(s)", my_shared.len());
    for share in &my_shared {
        println!(
            "  {} -> {} (active: {}, expired: {})",
            share.document_id,
            share.shared_with_user_id,
            share.is_active,
            share.is_expired()
        );
    }

    state.auth.logout().await?;
    Ok(())
}
