use std::env;
use std::time::Duration;

use orgadmin_core::{BearerToken, ClientError, ClientResult};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
const DEFAULT_POLL_INTERVAL_SECONDS: u64 = 30;

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub api_key: BearerToken,
    pub base_url: String,
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl CliConfig {
    pub fn load() -> ClientResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = BearerToken::new(required_env(&lookup, "ORGADMIN_API_KEY")?.trim())
            .map_err(|_| ClientError::Validation("ORGADMIN_API_KEY must not be empty".to_owned()))?;
        let base_url = lookup("ORGADMIN_BASE_URL")
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();
        let timeout_seconds =
            parse_env_u64(&lookup, "ORGADMIN_TIMEOUT_SECONDS", DEFAULT_TIMEOUT_SECONDS)?;
        let poll_interval_seconds = parse_env_u64(
            &lookup,
            "ORGADMIN_POLL_INTERVAL_SECONDS",
            DEFAULT_POLL_INTERVAL_SECONDS,
        )?;

        if timeout_seconds == 0 {
            return Err(ClientError::Validation(
                "ORGADMIN_TIMEOUT_SECONDS must be greater than zero".to_owned(),
            ));
        }

        if poll_interval_seconds == 0 {
            return Err(ClientError::Validation(
                "ORGADMIN_POLL_INTERVAL_SECONDS must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            api_key,
            base_url,
            timeout: Duration::from_secs(timeout_seconds),
            poll_interval: Duration::from_secs(poll_interval_seconds),
        })
    }
}

fn required_env<F>(lookup: &F, name: &str) -> ClientResult<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name).ok_or_else(|| ClientError::Validation(format!("{name} is required")))
}

fn parse_env_u64<F>(lookup: &F, name: &str, default: u64) -> ClientResult<u64>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) => value.trim().parse::<u64>().map_err(|error| {
            ClientError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use orgadmin_core::ClientError;

    use super::CliConfig;

    fn load(pairs: &[(&str, &str)]) -> Result<CliConfig, ClientError> {
        let values = pairs
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect::<HashMap<_, _>>();
        CliConfig::from_lookup(|name| values.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let config = load(&[("ORGADMIN_API_KEY", "sk-admin-123")]);
        assert!(config.is_ok());
        let config = config.unwrap_or_else(|_| unreachable!());
        assert_eq!(config.api_key.expose(), "sk-admin-123");
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.poll_interval, Duration::from_secs(30));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let config = load(&[
            ("ORGADMIN_API_KEY", "sk-admin-123"),
            ("ORGADMIN_BASE_URL", "http://localhost:8080/v1/"),
            ("ORGADMIN_POLL_INTERVAL_SECONDS", "5"),
        ]);
        assert!(config.is_ok());
        let config = config.unwrap_or_else(|_| unreachable!());
        assert_eq!(config.base_url, "http://localhost:8080/v1");
        assert_eq!(config.poll_interval, Duration::from_secs(5));
    }

    #[test]
    fn missing_or_blank_key_is_rejected() {
        assert!(matches!(load(&[]), Err(ClientError::Validation(_))));
        assert!(matches!(
            load(&[("ORGADMIN_API_KEY", "   ")]),
            Err(ClientError::Validation(_))
        ));
    }

    #[test]
    fn zero_or_garbage_durations_are_rejected() {
        assert!(matches!(
            load(&[
                ("ORGADMIN_API_KEY", "sk-admin-123"),
                ("ORGADMIN_TIMEOUT_SECONDS", "0")
            ]),
            Err(ClientError::Validation(_))
        ));
        assert!(matches!(
            load(&[
                ("ORGADMIN_API_KEY", "sk-admin-123"),
                ("ORGADMIN_POLL_INTERVAL_SECONDS", "soon")
            ]),
            Err(ClientError::Validation(_))
        ));
    }
}
