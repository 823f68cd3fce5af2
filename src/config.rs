use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_BASE: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_FOOTER: &str = "Powered By : @ProBotXUpdate";

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    MissingEnv(&'static str),
    #[error("invalid URL in {0}: {1}")]
    InvalidUrl(&'static str, String),
    #[error("invalid number in {0}: {1}")]
    InvalidNumber(&'static str, String),
}

#[derive(Clone, Debug)]
pub struct Config {
    pub tmdb_api_key: String,
    pub tmdb_api_base: String,
    pub http_timeout: Duration,
    /// `None` when disabled with an empty CAPTION_FOOTER.
    pub caption_footer: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let tmdb_api_key = lookup("TMDB_API_KEY")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingEnv("TMDB_API_KEY"))?;

        let tmdb_api_base = match lookup("TMDB_API_BASE") {
            Some(s) if !s.trim().is_empty() => {
                let s = s.trim();
                let parsed = reqwest::Url::parse(s)
                    .map_err(|_| ConfigError::InvalidUrl("TMDB_API_BASE", s.to_string()))?;
                if !matches!(parsed.scheme(), "http" | "https") {
                    return Err(ConfigError::InvalidUrl("TMDB_API_BASE", s.to_string()));
                }
                s.trim_end_matches('/').to_string()
            }
            _ => DEFAULT_API_BASE.to_string(),
        };

        let http_timeout = match lookup("HTTP_TIMEOUT_SECS") {
            Some(s) => match s.trim().parse::<u64>() {
                Ok(n) if n > 0 => Duration::from_secs(n),
                _ => return Err(ConfigError::InvalidNumber("HTTP_TIMEOUT_SECS", s)),
            },
            None => Duration::from_secs(10),
        };

        let caption_footer = match lookup("CAPTION_FOOTER") {
            Some(s) if s.trim().is_empty() => None,
            Some(s) => Some(s),
            None => Some(DEFAULT_FOOTER.to_string()),
        };

        Ok(Config { tmdb_api_key, tmdb_api_base, http_timeout, caption_footer })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults() {
        let cfg = Config::from_lookup(lookup(&[("TMDB_API_KEY", "k")])).unwrap();
        assert_eq!(cfg.tmdb_api_key, "k");
        assert_eq!(cfg.tmdb_api_base, DEFAULT_API_BASE);
        assert_eq!(cfg.http_timeout, Duration::from_secs(10));
        assert_eq!(cfg.caption_footer.as_deref(), Some(DEFAULT_FOOTER));
    }

    #[test]
    fn parses_all() {
        let cfg = Config::from_lookup(lookup(&[
            ("TMDB_API_KEY", " key "),
            ("TMDB_API_BASE", "http://localhost:9000/3/"),
            ("HTTP_TIMEOUT_SECS", "3"),
            ("CAPTION_FOOTER", ""),
        ]))
        .unwrap();
        assert_eq!(cfg.tmdb_api_key, "key");
        assert_eq!(cfg.tmdb_api_base, "http://localhost:9000/3");
        assert_eq!(cfg.http_timeout, Duration::from_secs(3));
        assert_eq!(cfg.caption_footer, None);
    }

    #[test]
    fn missing_key() {
        let err = Config::from_lookup(lookup(&[("TMDB_API_KEY", "  ")])).unwrap_err();
        assert_eq!(err, ConfigError::MissingEnv("TMDB_API_KEY"));
    }

    #[test]
    fn bad_values() {
        let err = Config::from_lookup(lookup(&[("TMDB_API_KEY", "k"), ("TMDB_API_BASE", "ftp://x")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl("TMDB_API_BASE", _)));

        let err = Config::from_lookup(lookup(&[("TMDB_API_KEY", "k"), ("HTTP_TIMEOUT_SECS", "0")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidNumber("HTTP_TIMEOUT_SECS", "0".to_string()));
    }
}
