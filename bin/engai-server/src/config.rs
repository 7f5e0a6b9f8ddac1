//! Server configuration, loaded from environment variables at startup.

use std::path::PathBuf;
use std::time::Duration;

use engai_core::ModelCatalog;
use engai_core::gemini::DEFAULT_BASE_URL;

/// Runtime configuration for engai-server.
///
/// Built once in `main` and shared read-only through [`AppState`]; request
/// handlers never read the environment themselves. Every field has a
/// default so the server starts without any variables set.
///
/// [`AppState`]: crate::state::AppState
#[derive(Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:5000"`, or `0.0.0.0:$PORT`).
    pub bind_address: String,

    /// Key for the Gemini API. Empty means every model call will fail.
    pub gemini_api_key: String,

    /// Gemini REST root, overridable for proxies and tests.
    pub gemini_base_url: String,

    /// Model behind the `flash` tier.
    pub fast_model: String,

    /// Model behind the `pro` tier.
    pub advanced_model: String,

    /// Whole-call timeout for model requests in seconds; `0` disables it.
    pub request_timeout_secs: u64,

    /// Directory uploads are staged in while a request runs.
    pub upload_dir: PathBuf,

    /// Largest accepted upload, in MiB.
    pub max_upload_mb: usize,

    /// Built UI bundle to serve; `None` serves the API only.
    pub static_dir: Option<PathBuf>,

    /// Comma-separated CORS origin allow-list; `None` allows any origin.
    pub cors_allowed_origins: Option<String>,

    /// Mount Swagger UI at `/swagger-ui`.
    pub enable_swagger: bool,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("gemini_api_key", &if self.gemini_api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("gemini_base_url", &self.gemini_base_url)
            .field("fast_model", &self.fast_model)
            .field("advanced_model", &self.advanced_model)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("upload_dir", &self.upload_dir)
            .field("max_upload_mb", &self.max_upload_mb)
            .field("static_dir", &self.static_dir)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("enable_swagger", &self.enable_swagger)
            .field("log_level", &self.log_level)
            .field("log_json", &self.log_json)
            .finish()
    }
}

/// Read `.env` from the working directory (or the nearest parent that has one)
/// into the process environment. Variables that are already set keep their
/// value. Returns the file that was read, if any.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenv::dotenv().ok()
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let default_bind = match std::env::var("PORT") {
            Ok(port) if !port.trim().is_empty() => format!("0.0.0.0:{}", port.trim()),
            _ => "0.0.0.0:5000".to_owned(),
        };

        Self {
            bind_address: env_or("ENGAI_BIND", &default_bind),
            gemini_api_key: env_or("GEMINI_API_KEY", ""),
            gemini_base_url: env_or("ENGAI_GEMINI_BASE_URL", DEFAULT_BASE_URL),
            fast_model: env_or("ENGAI_FAST_MODEL", "gemini-1.5-flash"),
            advanced_model: env_or("ENGAI_ADVANCED_MODEL", "gemini-1.5-pro"),
            request_timeout_secs: parse_env("ENGAI_REQUEST_TIMEOUT_SECS", 0),
            upload_dir: std::env::var("ENGAI_UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| std::env::temp_dir().join("engai-uploads")),
            max_upload_mb: parse_env("ENGAI_MAX_UPLOAD_MB", 20),
            static_dir: std::env::var("ENGAI_STATIC_DIR").ok().map(PathBuf::from),
            cors_allowed_origins: std::env::var("ENGAI_CORS_ORIGINS").ok(),
            enable_swagger: std::env::var("ENGAI_ENABLE_SWAGGER")
                .map(|v| !(v == "0" || v.eq_ignore_ascii_case("false")))
                .unwrap_or(true),
            log_level: env_or("ENGAI_LOG", "info"),
            log_json: std::env::var("ENGAI_LOG_JSON")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }

    pub fn model_catalog(&self) -> ModelCatalog {
        ModelCatalog::new(&self.fast_model, &self.advanced_model)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
impl Config {
    /// Defaults with uploads staged under `upload_dir`; no environment access.
    pub fn for_tests(upload_dir: PathBuf) -> Self {
        Self {
            bind_address: "127.0.0.1:0".into(),
            gemini_api_key: String::new(),
            gemini_base_url: DEFAULT_BASE_URL.into(),
            fast_model: "gemini-1.5-flash".into(),
            advanced_model: "gemini-1.5-pro".into(),
            request_timeout_secs: 0,
            upload_dir,
            max_upload_mb: 1,
            static_dir: None,
            cors_allowed_origins: None,
            enable_swagger: false,
            log_level: "info".into(),
            log_json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_timeout_means_none() {
        let mut cfg = Config::for_tests(PathBuf::from("/tmp"));
        assert_eq!(cfg.request_timeout(), None);
        cfg.request_timeout_secs = 30;
        assert_eq!(cfg.request_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn catalog_uses_configured_models() {
        let mut cfg = Config::for_tests(PathBuf::from("/tmp"));
        cfg.advanced_model = "gemini-2.0-pro".into();
        assert_eq!(cfg.model_catalog().advanced, "gemini-2.0-pro");
        assert_eq!(cfg.max_upload_bytes(), 1024 * 1024);
    }

    #[test]
    fn huge_upload_limit_saturates() {
        let mut cfg = Config::for_tests(PathBuf::from("/tmp"));
        cfg.max_upload_mb = usize::MAX / 2;
        assert_eq!(cfg.max_upload_bytes(), usize::MAX);
    }

    #[test]
    fn dotenv_file_feeds_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(
            &path,
            "GEMINI_API_KEY=from-dotenv\nENGAI_ADVANCED_MODEL=gemini-dotenv-pro\n",
        )
        .unwrap();
        let preset_key = std::env::var("GEMINI_API_KEY").ok();
        let preset_model = std::env::var("ENGAI_ADVANCED_MODEL").ok();

        dotenv::from_path(&path).unwrap();
        let cfg = Config::from_env();

        // Already-set variables win over the file.
        assert_eq!(cfg.gemini_api_key, preset_key.unwrap_or_else(|| "from-dotenv".into()));
        assert_eq!(
            cfg.advanced_model,
            preset_model.unwrap_or_else(|| "gemini-dotenv-pro".into())
        );
    }

    #[test]
    fn debug_hides_api_key() {
        let mut cfg = Config::for_tests(PathBuf::from("/tmp"));
        cfg.gemini_api_key = "AIza-secret".into();
        assert!(!format!("{cfg:?}").contains("AIza-secret"));
    }
}
