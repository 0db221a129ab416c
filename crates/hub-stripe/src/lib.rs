//! # hub-stripe
//!
//! Stripe payment-intent adapter for the InventoHub backend.
//!
//! The browser drives the actual card confirmation; the backend's only
//! job is to create an intent for the amount being charged and hand
//! the resulting client secret back.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hub_stripe::PaymentIntents;
//!
//! // Create client from environment (STRIPE_SECRET_KEY)
//! let payments = PaymentIntents::from_env()?;
//!
//! // $149.99 -> 14999 cents
//! let intent = payments.create(14999, "usd").await?;
//!
//! // Relay intent.client_secret to the browser
//! ```

pub mod config;
pub mod intent;

// Re-exports
pub use config::StripeConfig;
pub use intent::{PaymentIntent, PaymentIntents};
