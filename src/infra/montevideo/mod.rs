//! Montevideo public transport API (IMM `transportepublico`).
//!
//! [`TokenManager`] owns the OAuth2 client-credentials token and refreshes it
//! when it expires. [`UpstreamClient`] issues bearer-authenticated GETs
//! against the three resources the gateway exposes.

mod client;
mod token;

pub use client::{Resource, UpstreamClient};
pub use token::{AccessToken, EXPIRY_MARGIN_SECS, TokenManager};
