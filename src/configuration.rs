use config::{Config, File, Map};
use std::path::Path;
use serde_aux::field_attributes::deserialize_number_from_string;
use std::time::Duration;

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Settings {
    pub api: ApiSettings,
    pub display: DisplaySettings,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct ApiSettings {
    pub protocol: String,
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_secs: u64,
}

impl ApiSettings {
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.host, self.port)
    }

    pub fn measurements_url(&self) -> String {
        format!("{}/api/mediciones", self.base_url())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct DisplaySettings {
    /// chrono format string for rendered timestamps.
    pub timestamp_format: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            timestamp_format: "%-d/%-m/%Y, %H:%M:%S".into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Failed to determine the current directory: {0}")]
    CurrentDir(#[from] std::io::Error),
    #[error("Failed to parse APP_ENVIRONMENT: {0}")]
    Environment(String),
    #[error(transparent)]
    Config(#[from] config::ConfigError),
}

pub fn get_configuration() -> Result<Settings, ConfigurationError> {
    let base_path = std::env::current_dir()?;
    load_settings(
        &base_path.join("configuration"),
        std::env::var("APP_ENVIRONMENT").ok(),
        None,
    )
}

/// Layers `<dir>/base`, `<dir>/<environment>` and `APP_*` variables, in
/// that order. `variables` replaces the process environment when given.
pub fn load_settings(
    configuration_directory: &Path,
    environment: Option<String>,
    variables: Option<Map<String, String>>,
) -> Result<Settings, ConfigurationError> {
    let environment: Environment = environment
        .unwrap_or_else(|| "local".into())
        .try_into()
        .map_err(ConfigurationError::Environment)?;

    let config = Config::builder()
        .add_source(File::from(configuration_directory.join("base")).required(true))
        .add_source(File::from(configuration_directory.join(environment.as_str())).required(true))
        .add_source(
            config::Environment::with_prefix("APP")
                .try_parsing(true)
                .separator("_")
                .source(variables),
        )
        .build()?;

    Ok(config.try_deserialize()?)
}

pub enum Environment {
    Local,
    Production,
}
impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}
impl TryFrom<String> for Environment {
    type Error = String;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(port: u16) -> ApiSettings {
        ApiSettings {
            protocol: "http".into(),
            host: "localhost".into(),
            port,
            timeout_secs: 10,
        }
    }

    #[test]
    fn measurements_url_points_at_the_api_route() {
        assert_eq!(
            api(5001).measurements_url(),
            "http://localhost:5001/api/mediciones"
        );
    }

    #[test]
    fn environment_names_are_case_insensitive() {
        let env: Environment = "PRODUCTION".to_string().try_into().unwrap();
        assert_eq!(env.as_str(), "production");
    }

    #[test]
    fn unknown_environment_is_rejected() {
        let err = Environment::try_from("staging".to_string()).err().unwrap();
        assert!(err.contains("staging"));
        assert!(err.contains("`local` or `production`"));
    }

    fn configuration_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("base.yaml"),
            "api:\n  protocol: http\n  host: localhost\n  port: 5001\n  timeout_secs: 10\n\
             display:\n  timestamp_format: \"%d/%m/%Y\"\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("local.yaml"), "api:\n  host: 127.0.0.1\n").unwrap();
        std::fs::write(
            dir.path().join("production.yaml"),
            "api:\n  protocol: https\n  port: 443\n",
        )
        .unwrap();
        dir
    }

    #[test]
    fn environment_defaults_to_local_layer() {
        let dir = configuration_dir();
        let settings = load_settings(dir.path(), None, Some(Map::new())).unwrap();
        assert_eq!(settings.api.base_url(), "http://127.0.0.1:5001");
        assert_eq!(settings.api.timeout_secs, 10);
        assert_eq!(settings.display.timestamp_format, "%d/%m/%Y");
    }

    #[test]
    fn environment_file_overrides_base() {
        let dir = configuration_dir();
        let settings =
            load_settings(dir.path(), Some("production".into()), Some(Map::new())).unwrap();
        assert_eq!(settings.api.base_url(), "https://localhost:443");
    }

    #[test]
    fn app_variables_override_files() {
        let dir = configuration_dir();
        let mut variables = Map::new();
        variables.insert("APP_API_PORT".to_string(), "8080".to_string());
        variables.insert("APP_API_HOST".to_string(), "medidor".to_string());
        let settings =
            load_settings(dir.path(), Some("production".into()), Some(variables)).unwrap();
        assert_eq!(settings.api.base_url(), "https://medidor:8080");
    }

    #[test]
    fn unknown_environment_fails_to_load() {
        let dir = configuration_dir();
        let err = load_settings(dir.path(), Some("staging".into()), Some(Map::new())).unwrap_err();
        assert!(matches!(err, ConfigurationError::Environment(_)));
    }

    #[test]
    fn missing_environment_file_fails_to_load() {
        let dir = configuration_dir();
        std::fs::remove_file(dir.path().join("local.yaml")).unwrap();
        let err = load_settings(dir.path(), None, Some(Map::new())).unwrap_err();
        assert!(matches!(err, ConfigurationError::Config(_)));
    }

    #[test]
    fn port_accepts_numeric_strings() {
        let settings: ApiSettings = serde_json::from_value(serde_json::json!({
            "protocol": "http",
            "host": "localhost",
            "port": "5001",
            "timeout_secs": "3"
        }))
        .unwrap();
        assert_eq!(settings.port, 5001);
        assert_eq!(settings.timeout(), Duration::from_secs(3));
    }
}
