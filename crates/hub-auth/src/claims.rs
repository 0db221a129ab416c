//! JWT claims for InventoHub access tokens.

use hub_core::Document;
use serde::{Deserialize, Serialize};

/// Claims carried by an access token.
///
/// A token always names the account email it was issued for. Whatever
/// else the client sent to the token endpoint rides along in `extra`
/// and comes back on verification, but the backend only trusts `email`
/// for identity; role decisions re-read the user document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Account email the token was issued for
    pub email: String,

    /// Issued-at, seconds since the epoch
    pub iat: i64,

    /// Expiration, seconds since the epoch
    pub exp: i64,

    /// Remaining payload fields, preserved verbatim
    #[serde(flatten)]
    pub extra: Document,
}
