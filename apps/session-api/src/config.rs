use im_common::id::DEFAULT_APP_ID;
use im_common::AppId;

/// Session API configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Redis connection string.
    pub redis_url: String,
    /// Port the HTTP server binds to.
    pub port: u16,
    /// Tenant stamped on every validated token. The token table is global,
    /// so one deployment serves exactly one tenant's tokens.
    pub token_app_id: AppId,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        Self {
            redis_url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379/0".to_string()),
            port: parsed_var("PORT").unwrap_or(4003),
            token_app_id: parsed_var("TOKEN_APP_ID").unwrap_or(DEFAULT_APP_ID),
        }
    }
}

fn parsed_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
