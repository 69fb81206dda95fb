//! Process-wide gateway configuration, read once from the environment.

use anyhow::{Context, Result, bail};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_AUTH_URL: &str =
    "https://mvdapi-auth.montevideo.gub.uy/auth/realms/pci/protocol/openid-connect/token";
pub const DEFAULT_API_BASE_URL: &str = "https://api.montevideo.gub.uy/api/transportepublico";

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// OAuth2 client credentials for the upstream API.
///
/// The `Debug` impl never prints the secret and only shows a redacted
/// form of the client id.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Client id safe for logs: `abcd...wxyz`, or `abcd...****` for short ids.
    pub fn redacted_id(&self) -> String {
        redact(&self.client_id)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.redacted_id())
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Keeps the first and last four characters of `value`.
pub fn redact(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    let prefix: String = chars.iter().take(4).collect();
    let suffix: String = if chars.len() > 8 {
        chars[chars.len() - 4..].iter().collect()
    } else {
        "****".to_string()
    };
    format!("{prefix}...{suffix}")
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// `None` only when running in simulation mode.
    pub credentials: Option<Credentials>,
    pub simulation_mode: bool,
    pub auth_url: String,
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl GatewayConfig {
    /// Reads the configuration from the process environment.
    ///
    /// Call `dotenvy::dotenv()` first if a `.env` file should be honoured.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let simulation_mode = lookup("SIMULATION_MODE")
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let credentials = match (
            non_empty(lookup("MONTEVIDEO_CLIENT_ID")),
            non_empty(lookup("MONTEVIDEO_CLIENT_SECRET")),
        ) {
            (Some(id), Some(secret)) => Some(Credentials::new(id, secret)),
            _ if simulation_mode => None,
            _ => bail!(
                "MONTEVIDEO_CLIENT_ID and MONTEVIDEO_CLIENT_SECRET must be set unless SIMULATION_MODE=true"
            ),
        };

        let request_timeout = seconds(&lookup, "UPSTREAM_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        let connect_timeout = seconds(
            &lookup,
            "UPSTREAM_CONNECT_TIMEOUT_SECS",
            DEFAULT_CONNECT_TIMEOUT_SECS,
        )?;

        Ok(Self {
            credentials,
            simulation_mode,
            auth_url: non_empty(lookup("MONTEVIDEO_AUTH_URL"))
                .unwrap_or_else(|| DEFAULT_AUTH_URL.to_string()),
            api_base_url: non_empty(lookup("MONTEVIDEO_API_BASE_URL"))
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            request_timeout,
            connect_timeout,
        })
    }

    /// Simulation-only configuration, no credentials needed.
    pub fn simulated() -> Self {
        Self {
            credentials: None,
            simulation_mode: true,
            auth_url: DEFAULT_AUTH_URL.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn seconds<F>(lookup: &F, key: &str, default: u64) -> Result<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    let secs = match non_empty(lookup(key)) {
        Some(raw) => raw
            .parse::<u64>()
            .with_context(|| format!("{key} must be a whole number of seconds, got '{raw}'"))?,
        None => default,
    };
    Ok(Duration::from_secs(secs))
}
