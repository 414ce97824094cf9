use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LLMConfig,
    pub translate: TranslateConfig,
    pub speech: SpeechConfig,
    pub cors: CorsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Chat-completion provider settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LLMConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Request deadline in seconds (accepts "60", "60s", "1m")
    #[serde(deserialize_with = "deserialize_duration_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TranslateConfig {
    pub endpoint: String,
    #[serde(deserialize_with = "deserialize_duration_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    pub endpoint: String,
    #[serde(deserialize_with = "deserialize_duration_secs")]
    pub timeout_secs: u64,
    /// Upper bound on characters sent per TTS request
    pub max_chunk_chars: usize,
    /// Also attach audio to English replies
    pub english_audio: bool,
}

/// Empty `allowed_origins` means any origin is accepted.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

/// A message produced while loading, logged once the subscriber exists
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigNotice {
    Info(String),
    Warn(String),
}

impl ConfigNotice {
    pub fn log(&self) {
        match self {
            Self::Info(message) => tracing::info!("{}", message),
            Self::Warn(message) => tracing::warn!("{}", message),
        }
    }
}

impl Config {
    /// Load configuration with environment variable override support
    ///
    /// Loading order:
    /// 1. Load from the given path, or the first config.toml found
    /// 2. Load `.env` into the process environment (if present)
    /// 3. Override with environment variables (HF_* and APP_*)
    ///
    /// Logging is not installed yet at this point, so what happened is
    /// returned as notices. Callers validate after their own overrides.
    pub fn load(path: Option<&str>) -> Result<(Self, Vec<ConfigNotice>), anyhow::Error> {
        let mut notices = Vec::new();

        let mut config = match path.map(str::to_string).or_else(Self::find_config_file) {
            Some(config_path) => {
                notices.push(ConfigNotice::Info(format!("Loaded configuration from {}", config_path)));
                Self::from_toml(&config_path)?
            },
            None => {
                notices.push(ConfigNotice::Warn(
                    "Configuration file not found, using defaults".to_string(),
                ));
                Config::default()
            },
        };

        if let Ok(env_path) = dotenvy::dotenv() {
            notices.push(ConfigNotice::Info(format!(
                "Loaded environment from {}",
                env_path.display()
            )));
        }

        config.apply_env_overrides(|key| std::env::var(key).ok(), &mut notices);

        Ok((config, notices))
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - HF_API_KEY / APP_LLM_API_KEY: Chat-completion API key
    /// - HF_MODEL / APP_LLM_MODEL: Model identifier
    /// - APP_LLM_API_URL: Chat-completion endpoint
    /// - APP_LLM_TEMPERATURE: Sampling temperature
    /// - APP_LLM_MAX_TOKENS: Reply token budget
    /// - APP_LLM_TIMEOUT_SECS: Chat request deadline (accepts "60s", "2m")
    /// - APP_SERVER_HOST: Server host (default: 0.0.0.0)
    /// - APP_SERVER_PORT: Server port (default: 8000)
    /// - APP_LOG_LEVEL: Logging level (e.g., "info,companion_api=debug")
    /// - APP_CORS_ALLOWED_ORIGINS: Comma separated origin list
    /// - APP_SPEECH_ENGLISH_AUDIO: Attach audio to English replies (true/false)
    fn apply_env_overrides<F>(&mut self, var: F, notices: &mut Vec<ConfigNotice>)
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut info = |message: String| notices.push(ConfigNotice::Info(message));

        for key in ["HF_API_KEY", "APP_LLM_API_KEY"] {
            if let Some(api_key) = var(key) {
                self.llm.api_key = api_key;
                info(format!("Override llm.api_key from env ({})", key));
            }
        }

        for key in ["HF_MODEL", "APP_LLM_MODEL"] {
            if let Some(model) = var(key) {
                self.llm.model = model;
                info(format!("Override llm.model from env ({}): {}", key, self.llm.model));
            }
        }

        if let Some(url) = var("APP_LLM_API_URL") {
            self.llm.api_url = url;
            info(format!("Override llm.api_url from env: {}", self.llm.api_url));
        }

        if let Some(temperature) = var("APP_LLM_TEMPERATURE")
            && let Ok(temperature) = temperature.parse()
        {
            self.llm.temperature = temperature;
            info(format!("Override llm.temperature from env: {}", self.llm.temperature));
        }

        if let Some(max_tokens) = var("APP_LLM_MAX_TOKENS")
            && let Ok(max_tokens) = max_tokens.parse()
        {
            self.llm.max_tokens = max_tokens;
            info(format!("Override llm.max_tokens from env: {}", self.llm.max_tokens));
        }

        let mut timeout_warning = None;
        if let Some(timeout) = var("APP_LLM_TIMEOUT_SECS") {
            match parse_duration_to_secs(&timeout) {
                Ok(val) => {
                    self.llm.timeout_secs = val;
                    info(format!("Override llm.timeout_secs from env: {}", val));
                },
                Err(e) => {
                    timeout_warning = Some(format!(
                        "Invalid APP_LLM_TIMEOUT_SECS '{}': {} (keep {})",
                        timeout, e, self.llm.timeout_secs
                    ))
                },
            }
        }

        if let Some(host) = var("APP_SERVER_HOST") {
            self.server.host = host;
            info(format!("Override server.host from env: {}", self.server.host));
        }

        if let Some(port) = var("APP_SERVER_PORT")
            && let Ok(port) = port.parse()
        {
            self.server.port = port;
            info(format!("Override server.port from env: {}", self.server.port));
        }

        if let Some(level) = var("APP_LOG_LEVEL") {
            self.logging.level = level;
            info(format!("Override logging.level from env: {}", self.logging.level));
        }

        if let Some(origins) = var("APP_CORS_ALLOWED_ORIGINS") {
            self.cors.allowed_origins = split_origins(&origins);
            info(format!(
                "Override cors.allowed_origins from env: {:?}",
                self.cors.allowed_origins
            ));
        }

        if let Some(enabled) = var("APP_SPEECH_ENGLISH_AUDIO")
            && let Ok(val) = enabled.parse()
        {
            self.speech.english_audio = val;
            info(format!("Override speech.english_audio from env: {}", val));
        }

        if let Some(warning) = timeout_warning {
            notices.push(ConfigNotice::Warn(warning));
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.server.port == 0 {
            anyhow::bail!("Server port cannot be 0");
        }

        if self.llm.api_url.trim().is_empty() {
            anyhow::bail!("llm.api_url cannot be empty");
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            anyhow::bail!("llm.temperature must be within [0, 2]");
        }
        if self.llm.max_tokens == 0 {
            anyhow::bail!("llm.max_tokens must be > 0");
        }
        if self.llm.timeout_secs == 0 {
            anyhow::bail!("llm.timeout_secs must be > 0");
        }

        if self.translate.endpoint.trim().is_empty() {
            anyhow::bail!("translate.endpoint cannot be empty");
        }
        if self.translate.timeout_secs == 0 {
            anyhow::bail!("translate.timeout_secs must be > 0");
        }

        if self.speech.endpoint.trim().is_empty() {
            anyhow::bail!("speech.endpoint cannot be empty");
        }
        if self.speech.timeout_secs == 0 {
            anyhow::bail!("speech.timeout_secs must be > 0");
        }
        if self.speech.max_chunk_chars == 0 {
            anyhow::bail!("speech.max_chunk_chars must be > 0");
        }

        Ok(())
    }

    fn find_config_file() -> Option<String> {
        let possible_paths =
            ["conf/config.toml", "config.toml", "./conf/config.toml", "./config.toml"];

        for path in &possible_paths {
            if Path::new(path).exists() {
                return Some(path.to_string());
            }
        }
        None
    }

    fn from_toml(path: &str) -> Result<Self, anyhow::Error> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, anyhow::Error> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 8000 }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            api_url: "https://router.huggingface.co/v1/chat/completions".to_string(),
            api_key: String::new(),
            model: String::new(),
            temperature: 0.9,
            max_tokens: 200,
            timeout_secs: 60,
        }
    }
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://translate.googleapis.com/translate_a/single".to_string(),
            timeout_secs: 10,
        }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://translate.google.com/translate_tts".to_string(),
            timeout_secs: 30,
            max_chunk_chars: 100,
            english_audio: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info,companion_api=debug".to_string(), file: None }
    }
}

// =========================
// Helpers for parsing values
// =========================

fn split_origins(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_duration_to_secs(input: &str) -> Result<u64, String> {
    // Accept plain numbers (treated as seconds)
    if let Ok(val) = input.parse::<u64>() {
        return Ok(val);
    }

    let s = input.trim().to_lowercase();
    let (num_str, unit) = s.split_at(s.chars().take_while(|c| c.is_ascii_digit()).count());
    if num_str.is_empty() || unit.is_empty() {
        return Err("missing number or unit".into());
    }
    let n: u64 = num_str.parse().map_err(|_| "invalid number".to_string())?;
    match unit {
        "s" | "sec" | "secs" | "second" | "seconds" => Ok(n),
        "m" | "min" | "mins" | "minute" | "minutes" => Ok(n * 60),
        "h" | "hr" | "hour" | "hours" => Ok(n * 60 * 60),
        _ => Err(format!("unsupported unit: {}", unit)),
    }
}

// Accepts numeric seconds or human-friendly strings
fn deserialize_duration_secs<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct Visitor;
    impl<'de> serde::de::Visitor<'de> for Visitor {
        type Value = u64;
        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "a number of seconds or a string like '30s', '5m', '1h'")
        }
        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
            Ok(v)
        }
        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            if v >= 0 { Ok(v as u64) } else { Err(E::custom("negative not allowed")) }
        }
        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            parse_duration_to_secs(v).map_err(E::custom)
        }
    }
    deserializer.deserialize_any(Visitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_hosted_router() {
        let config = Config::default();
        assert_eq!(config.llm.api_url, "https://router.huggingface.co/v1/chat/completions");
        assert_eq!(config.llm.max_tokens, 200);
        assert!((config.llm.temperature - 0.9).abs() < f32::EPSILON);
        assert_eq!(config.llm.timeout_secs, 60);
        assert_eq!(config.speech.max_chunk_chars, 100);
        assert!(!config.speech.english_audio);
        assert!(config.cors.allowed_origins.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml_with_human_durations() {
        let config = Config::from_toml_str(
            r#"
            [server]
            port = 9000

            [llm]
            model = "meta-llama/Llama-3.1-8B-Instruct"
            timeout_secs = "2m"

            [speech]
            timeout_secs = 45
            english_audio = true

            [cors]
            allowed_origins = ["http://localhost:5173"]
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.llm.model, "meta-llama/Llama-3.1-8B-Instruct");
        assert_eq!(config.llm.timeout_secs, 120);
        assert_eq!(config.speech.timeout_secs, 45);
        assert!(config.speech.english_audio);
        assert_eq!(config.cors.allowed_origins, vec!["http://localhost:5173"]);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.llm.temperature = 2.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.llm.max_tokens = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.speech.max_chunk_chars = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.translate.endpoint = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_duration_to_secs() {
        assert_eq!(parse_duration_to_secs("30"), Ok(30));
        assert_eq!(parse_duration_to_secs("30s"), Ok(30));
        assert_eq!(parse_duration_to_secs("5m"), Ok(300));
        assert_eq!(parse_duration_to_secs("1h"), Ok(3600));
        assert!(parse_duration_to_secs("5x").is_err());
        assert!(parse_duration_to_secs("s").is_err());
    }

    #[test]
    fn test_env_overrides_are_reported_as_notices() {
        let env: std::collections::HashMap<&str, &str> = [
            ("HF_API_KEY", "hf-secret"),
            ("HF_MODEL", "test/model"),
            ("APP_SERVER_PORT", "9100"),
            ("APP_LLM_TIMEOUT_SECS", "soon"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        let mut notices = Vec::new();
        config.apply_env_overrides(|key| env.get(key).map(|v| v.to_string()), &mut notices);

        assert_eq!(config.llm.api_key, "hf-secret");
        assert_eq!(config.llm.model, "test/model");
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.llm.timeout_secs, 60);

        assert!(notices.contains(&ConfigNotice::Info(
            "Override llm.model from env (HF_MODEL): test/model".to_string()
        )));
        assert!(notices.contains(&ConfigNotice::Info(
            "Override server.port from env: 9100".to_string()
        )));
        assert!(notices.iter().any(|n| matches!(
            n,
            ConfigNotice::Warn(msg) if msg.starts_with("Invalid APP_LLM_TIMEOUT_SECS 'soon'")
        )));
        assert!(
            notices.iter().all(|n| !format!("{:?}", n).contains("hf-secret")),
            "the API key value is never echoed"
        );
    }

    #[test]
    fn test_load_leaves_validation_to_caller() {
        let path = std::env::temp_dir().join(format!("companion-config-{}.toml", std::process::id()));
        fs::write(&path, "[server]\nport = 0\n").unwrap();

        let loaded = Config::load(path.to_str());
        fs::remove_file(&path).unwrap();

        let (config, notices) = loaded.unwrap();
        assert!(config.validate().is_err(), "port 0 is only rejected by validate");
        assert_eq!(
            notices.first(),
            Some(&ConfigNotice::Info(format!("Loaded configuration from {}", path.display())))
        );
    }

    #[test]
    fn test_missing_credentials_still_validate() {
        let config = Config::default();
        assert!(config.llm.api_key.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_split_origins() {
        assert_eq!(
            split_origins("http://a.test, ,http://b.test "),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
        assert!(split_origins("").is_empty());
    }
}
