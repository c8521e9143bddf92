use std::str::FromStr;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Console output shape. JSON lines suit log shippers that parse stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("Invalid LOG_FORMAT: {}. Must be 'text' or 'json'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub filter: String,
    pub format: LogFormat,
    /// Loki push endpoint; shipping is off when unset
    pub loki_url: Option<url::Url>,
    pub service_name: String,
    pub environment: String,
}

impl LoggingConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let format = match lookup("LOG_FORMAT") {
            Some(raw) => raw.parse()?,
            None => LogFormat::default(),
        };

        let loki_enabled = lookup("LOKI_ENABLED")
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        let loki_url = match (loki_enabled, lookup("LOKI_URL")) {
            (false, _) => None,
            (true, None) => return Err("LOKI_ENABLED is true but LOKI_URL is not set".to_string()),
            (true, Some(raw)) => Some(
                url::Url::parse(raw.trim()).map_err(|e| format!("Invalid LOKI_URL {}: {}", raw, e))?,
            ),
        };

        Ok(Self {
            filter: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            format,
            loki_url,
            service_name: lookup("SERVICE_NAME").unwrap_or_else(|| "newsagg".to_string()),
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
        })
    }
}

/// Installs the global subscriber: env filter, text or JSON console output, and a Loki
/// layer when configured and the `loki` feature is built in.
pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let text = (config.format == LogFormat::Text).then(fmt::layer);
    let json = (config.format == LogFormat::Json).then(|| fmt::layer().json());

    tracing_subscriber::registry()
        .with(EnvFilter::new(&config.filter))
        .with(text)
        .with(json)
        .with(loki_layer(&config)?)
        .try_init()?;

    tracing::info!(
        service = %config.service_name,
        environment = %config.environment,
        "Logging initialized (filter={}, format={:?}, loki={})",
        config.filter,
        config.format,
        config.loki_url.is_some()
    );
    Ok(())
}

#[cfg(feature = "loki")]
fn loki_layer(
    config: &LoggingConfig,
) -> Result<Option<tracing_loki::Layer>, Box<dyn std::error::Error>> {
    let Some(url) = config.loki_url.clone() else {
        return Ok(None);
    };

    let (layer, task) = tracing_loki::builder()
        .label("service", &config.service_name)?
        .label("environment", &config.environment)?
        .build_url(url)?;
    tokio::spawn(task);
    Ok(Some(layer))
}

#[cfg(not(feature = "loki"))]
fn loki_layer(
    config: &LoggingConfig,
) -> Result<Option<tracing_subscriber::layer::Identity>, Box<dyn std::error::Error>> {
    if config.loki_url.is_some() {
        eprintln!("LOKI_URL is set but this build has no loki feature; skipping Loki");
    }
    Ok(None)
}
