use std::env;
use std::str::FromStr;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_GROQ_MODEL: &str = "llama3-70b-8192";
pub const DEFAULT_BALLOT_BASE_URL: &str = "https://ballotpedia.org";

/// Inline `style` attribute that marks the biography block on a candidate page.
///
/// Coupled to the exact markup Ballotpedia renders; if the site changes this
/// string, description lookups start returning "Description not found".
pub const DEFAULT_DESCRIPTION_STYLE: &str =
    "margin-bottom:10px; padding:5px 10px; background-color:#f9f9f9;";

/// Process-wide configuration, loaded once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub groq_api_key: Option<String>,
    pub groq_base_url: String,
    pub groq_model: String,
    pub ballot_base_url: String,
    pub description_style: String,
    pub timeout_ms: u64,
    pub description_concurrency: usize,
    pub summarize_descriptions: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            groq_api_key: None,
            groq_base_url: DEFAULT_GROQ_BASE_URL.to_string(),
            groq_model: DEFAULT_GROQ_MODEL.to_string(),
            ballot_base_url: DEFAULT_BALLOT_BASE_URL.to_string(),
            description_style: DEFAULT_DESCRIPTION_STYLE.to_string(),
            timeout_ms: 20_000,
            description_concurrency: 4,
            summarize_descriptions: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let groq_api_key = env::var("GROQ_API_KEY")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        Self {
            port: parsed_var("PORT").unwrap_or(defaults.port),
            groq_api_key,
            groq_base_url: env::var("GROQ_BASE_URL").unwrap_or(defaults.groq_base_url),
            groq_model: env::var("GROQ_MODEL").unwrap_or(defaults.groq_model),
            ballot_base_url: env::var("BALLOT_BASE_URL").unwrap_or(defaults.ballot_base_url),
            description_style: env::var("DESCRIPTION_STYLE")
                .unwrap_or(defaults.description_style),
            timeout_ms: parsed_var("REQUEST_TIMEOUT_MS").unwrap_or(defaults.timeout_ms),
            description_concurrency: parsed_var::<usize>("DESCRIPTION_CONCURRENCY")
                .filter(|n| *n > 0)
                .unwrap_or(defaults.description_concurrency),
            summarize_descriptions: env::var("SUMMARIZE_DESCRIPTIONS")
                .map(|value| is_truthy(&value))
                .unwrap_or(defaults.summarize_descriptions),
        }
    }

    pub fn groq_configured(&self) -> bool {
        self.groq_api_key.is_some()
    }
}

fn parsed_var<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|value| value.trim().parse::<T>().ok())
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
