use std::time::Duration;

/// Debounce delay used by the what-if simulator when `DEBOUNCE_MS` is unset.
pub const DEFAULT_DEBOUNCE_MS: u64 = 600;

/// Synthetic history rows shown under the live audit row when `AUDIT_FILLER_ROWS` is unset.
pub const DEFAULT_AUDIT_FILLER_ROWS: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub decision_api_base_url: String,
    pub debounce: Duration,
    /// `None` means requests wait for as long as the transport allows.
    pub request_timeout: Option<Duration>,
    pub audit_filler_rows: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            decision_api_base_url: "http://localhost:8000".to_string(),
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            request_timeout: None,
            audit_filler_rows: DEFAULT_AUDIT_FILLER_ROWS,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let config = Self {
            decision_api_base_url: validate_base_url(
                lookup("DECISION_API_BASE_URL")
                    .unwrap_or_else(|| defaults.decision_api_base_url.clone()),
            )?,
            debounce: match lookup("DEBOUNCE_MS") {
                Some(raw) => raw
                    .trim()
                    .parse::<u64>()
                    .map(Duration::from_millis)
                    .map_err(|_| anyhow::anyhow!("DEBOUNCE_MS must be a non-negative integer"))?,
                None => defaults.debounce,
            },
            request_timeout: lookup("REQUEST_TIMEOUT_SECS")
                .filter(|s| !s.trim().is_empty())
                .map(|raw| match raw.trim().parse::<u64>() {
                    Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
                    _ => Err(anyhow::anyhow!(
                        "REQUEST_TIMEOUT_SECS must be a positive number of seconds"
                    )),
                })
                .transpose()?,
            audit_filler_rows: match lookup("AUDIT_FILLER_ROWS") {
                Some(raw) => raw.trim().parse::<usize>().map_err(|_| {
                    anyhow::anyhow!("AUDIT_FILLER_ROWS must be a non-negative integer")
                })?,
                None => defaults.audit_filler_rows,
            },
        };

        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Decision API base URL: {}", config.decision_api_base_url);
        tracing::debug!("Debounce: {:?}", config.debounce);
        match config.request_timeout {
            Some(timeout) => tracing::debug!("Request timeout: {:?}", timeout),
            None => tracing::debug!("Request timeout: none"),
        }

        Ok(config)
    }
}

fn validate_base_url(url: String) -> anyhow::Result<String> {
    if url.trim().is_empty() {
        anyhow::bail!("DECISION_API_BASE_URL cannot be empty");
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        anyhow::bail!("DECISION_API_BASE_URL must start with http:// or https://");
    }
    url::Url::parse(&url)
        .map_err(|e| anyhow::anyhow!("DECISION_API_BASE_URL is not a valid URL: {}", e))?;
    Ok(url.trim_end_matches('/').to_string())
}
