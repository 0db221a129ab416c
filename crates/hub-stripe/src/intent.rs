//! # Stripe Payment Intents
//!
//! Thin client for the Payment Intents API. The backend creates an
//! intent for the cart total and relays the client secret to the
//! browser, which confirms the payment with Stripe directly.

use hub_core::{HubError, HubResult};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

use crate::config::StripeConfig;

/// Stripe Payment Intents client
pub struct PaymentIntents {
    config: StripeConfig,
    client: Client,
}

impl PaymentIntents {
    /// Create a new client
    pub fn new(config: StripeConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Create from environment variables
    pub fn from_env() -> HubResult<Self> {
        let config = StripeConfig::from_env()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &StripeConfig {
        &self.config
    }

    /// Creates a card payment intent. `amount` is in the smallest
    /// currency unit (cents for USD).
    #[instrument(skip(self))]
    pub async fn create(&self, amount: i64, currency: &str) -> HubResult<PaymentIntent> {
        if amount <= 0 {
            return Err(HubError::InvalidRequest(format!(
                "payment amount must be positive, got {amount}"
            )));
        }

        debug!(
            "Creating Stripe payment intent: amount={}, currency={}",
            amount, currency
        );

        let form_params: Vec<(String, String)> = vec![
            ("amount".to_string(), amount.to_string()),
            ("currency".to_string(), currency.to_string()),
            ("payment_method_types[]".to_string(), "card".to_string()),
        ];

        let url = format!("{}/v1/payment_intents", self.config.api_base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .form(&form_params)
            .send()
            .await
            .map_err(|e| HubError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| HubError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            error!("Stripe API error: status={}, body={}", status, body);

            // Parse Stripe error
            if let Ok(error_response) = serde_json::from_str::<StripeErrorResponse>(&body) {
                return Err(HubError::ProviderError {
                    provider: "stripe".to_string(),
                    message: error_response.error.message,
                });
            }

            return Err(HubError::ProviderError {
                provider: "stripe".to_string(),
                message: format!("HTTP {}: {}", status, body),
            });
        }

        let intent: PaymentIntent = serde_json::from_str(&body).map_err(|e| {
            HubError::Serialization(format!("Failed to parse Stripe response: {}", e))
        })?;

        info!(
            "Created Stripe payment intent: id={}, amount={}",
            intent.id, intent.amount
        );

        Ok(intent)
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

/// Payment intent as returned by Stripe
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    param: Option<String>,
}
