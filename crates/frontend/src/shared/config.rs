use gloo_net::http::Request;
use serde::Deserialize;

use crate::shared::api_utils::origin_url;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub supabase: SupabaseConfig,
    pub ingestion: IngestionConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct IngestionConfig {
    /// Path of the mail-checker function, relative to `supabase.url`
    pub function_path: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct RefreshConfig {
    pub interval_minutes: u32,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_minutes: 120,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct NotificationsConfig {
    pub sound: bool,
    pub push: bool,
    pub sound_url: String,
    pub toast_ms: u32,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            sound: true,
            push: true,
            sound_url: "assets/cash.mp3".to_string(),
            toast_ms: 3000,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DashboardConfig {
    pub recent_sales_limit: u64,
    pub history_page_size: u64,
    pub search_debounce_ms: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            recent_sales_limit: 5,
            history_page_size: 20,
            search_debounce_ms: 500,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn level(&self) -> log::Level {
        self.level.parse().unwrap_or(log::Level::Info)
    }
}

impl Config {
    /// Full URL of the ingestion function
    pub fn ingestion_url(&self) -> String {
        format!(
            "{}/{}",
            self.supabase.url.trim_end_matches('/'),
            self.ingestion.function_path.trim_start_matches('/')
        )
    }

    /// Base URL of the REST endpoint
    pub fn rest_url(&self) -> String {
        format!("{}/rest/v1", self.supabase.url.trim_end_matches('/'))
    }

    /// Timer delay; clamped to what `setInterval` accepts (2^31 - 1 ms),
    /// longer delays make browsers fire immediately
    pub fn refresh_interval_ms(&self) -> u32 {
        let ms = u64::from(self.refresh.interval_minutes.max(1)) * 60 * 1000;
        ms.min(MAX_TIMER_MS) as u32
    }
}

const MAX_TIMER_MS: u64 = i32::MAX as u64;

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[supabase]
url = "https://your-project.supabase.co"
anon_key = "public-anon-key"

[ingestion]
function_path = "/functions/v1/gmail-checker"

[refresh]
interval_minutes = 120

[notifications]
sound = true
push = true
sound_url = "assets/cash.mp3"
toast_ms = 3000

[dashboard]
recent_sales_limit = 5
history_page_size = 20
search_debounce_ms = 500

[logging]
level = "info"
"#;

pub fn default_config() -> anyhow::Result<Config> {
    Ok(toml::from_str(DEFAULT_CONFIG)?)
}

/// Load configuration
///
/// Search order:
/// 1. `config.toml` served next to `index.html`
/// 2. Falls back to embedded default config
pub async fn load_config() -> anyhow::Result<Config> {
    let url = origin_url("config.toml");
    match Request::get(&url).send().await {
        Ok(resp) if resp.ok() => {
            let contents = resp.text().await?;
            match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    log::info!("Loaded config from: {}", url);
                    return Ok(config);
                }
                Err(e) => log::warn!("Invalid config.toml at {}: {}", url, e),
            }
        }
        Ok(resp) => log::warn!("config.toml not found at {} (HTTP {})", url, resp.status()),
        Err(e) => log::warn!("Failed to fetch {}: {}", url, e),
    }

    log::info!("Using default embedded configuration");
    default_config()
}
