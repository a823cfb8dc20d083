use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub scan: ScanSettings,
    #[serde(default)]
    pub runner: RunnerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout; an expired request counts as a transport failure.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    crate::meetings_api::OpenF1Client::DEFAULT_BASE_URL.into()
}

fn default_request_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScanSettings {
    #[serde(default = "default_floor_year")]
    pub floor_year: i32,
    #[serde(default = "default_empty_streak_threshold")]
    pub empty_streak_threshold: u32,
    /// Cancel the whole scan after this many seconds. Unset = no deadline.
    #[serde(default)]
    pub deadline_secs: Option<u64>,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            floor_year: default_floor_year(),
            empty_streak_threshold: default_empty_streak_threshold(),
            deadline_secs: None,
        }
    }
}

fn default_floor_year() -> i32 {
    1950
}

fn default_empty_streak_threshold() -> u32 {
    3
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunnerConfig {
    /// How often the entry point checks the completion signal (and prints "Waiting...").
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

fn default_poll_interval_ms() -> u64 {
    1000
}

const DEFAULT_CONFIG_PATH: &str = "config.toml";

impl AppConfig {
    /// Loads from `CONFIG_FILE`, else `config.toml`. A missing default file yields defaults;
    /// a missing file named by `CONFIG_FILE` is an error.
    pub fn load() -> anyhow::Result<Self> {
        match std::env::var("CONFIG_FILE") {
            Ok(path) => {
                let s = std::fs::read_to_string(&path)
                    .map_err(|e| anyhow::anyhow!("reading {}: {}", path, e))?;
                Self::load_from_str(&s)
            }
            Err(_) => match std::fs::read_to_string(DEFAULT_CONFIG_PATH) {
                Ok(s) => Self::load_from_str(&s),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    let config = Self::default();
                    config.validate()?;
                    Ok(config)
                }
                Err(e) => Err(e.into()),
            },
        }
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.api.base_url.starts_with("http://") || self.api.base_url.starts_with("https://"),
            "api.base_url must be an http(s) URL, got {:?}",
            self.api.base_url
        );
        anyhow::ensure!(
            self.api.request_timeout_secs > 0,
            "api.request_timeout_secs must be > 0, got {}",
            self.api.request_timeout_secs
        );
        anyhow::ensure!(
            self.scan.floor_year > 0,
            "scan.floor_year must be > 0, got {}",
            self.scan.floor_year
        );
        anyhow::ensure!(
            self.scan.empty_streak_threshold > 0,
            "scan.empty_streak_threshold must be > 0, got {}",
            self.scan.empty_streak_threshold
        );
        if let Some(deadline) = self.scan.deadline_secs {
            anyhow::ensure!(
                deadline > 0,
                "scan.deadline_secs must be > 0 when set, got {}",
                deadline
            );
        }
        anyhow::ensure!(
            self.runner.poll_interval_ms > 0,
            "runner.poll_interval_ms must be > 0, got {}",
            self.runner.poll_interval_ms
        );
        Ok(())
    }
}
