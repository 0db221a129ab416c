//! # InventoHub RS
//!
//! Inventory and shop management backend.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export JWT_SECRET=...
//! export STRIPE_SECRET_KEY=sk_test_...
//!
//! # Run the server
//! inventohub
//! ```

use hub_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Print banner
    print_banner();

    // Initialize application state
    let state = AppState::new().await?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    match &state.config.data_path {
        Some(path) => info!("Store snapshot: {}", path.display()),
        None => info!("Store: in-memory (no snapshot path configured)"),
    }
    info!(
        "Stripe mode: {}",
        if state.payments.config().is_test_mode() {
            "test"
        } else {
            "live"
        }
    );

    // Create router
    let app = routes::create_router(state);

    // Start server
    info!("🚀 InventoHub starting on http://{}", addr);

    if !is_prod {
        info!("📝 Health: http://{}/health", addr);
        info!("🔑 Tokens: POST http://{}/jwt", addr);
        info!("💳 Payments: POST http://{}/api/create-payment-intent", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
  🛠  InventoHub RS 🛠
  ━━━━━━━━━━━━━━━━━━━━━
  Inventory & shop backend
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
