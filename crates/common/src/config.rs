use crate::error::{Error, Result};
use faststr::FastStr;
use std::{fmt, net::SocketAddr, time::Duration};

pub const DEFAULT_BASE_URL: &str = "https://api.infomaniak.com/1/ai";
pub const DEFAULT_NAME_PREFIX: &str = "Infomaniak ";
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:19981";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Process-wide settings, read once at startup.
#[derive(Clone)]
pub struct Config {
    pub api_key:         FastStr,
    pub product_id:      i64,
    pub name_prefix:     FastStr,
    pub base_url:        FastStr,
    /// Remote model name sent for every request, bypassing catalog lookup.
    pub pinned_model:    Option<FastStr>,
    pub listen_addr:     SocketAddr,
    pub connect_timeout: Duration,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("product_id", &self.product_id)
            .field("name_prefix", &self.name_prefix)
            .field("base_url", &self.base_url)
            .field("pinned_model", &self.pinned_model)
            .field("listen_addr", &self.listen_addr)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

impl Config {
    pub fn new<K>(api_key: K, product_id: i64) -> Result<Self>
    where
        K: Into<FastStr>,
    {
        let config = Self {
            api_key: api_key.into(),
            product_id,
            name_prefix: FastStr::from_static_str(DEFAULT_NAME_PREFIX),
            base_url: FastStr::from_static_str(DEFAULT_BASE_URL),
            pinned_model: None,
            listen_addr: parse_listen_addr(DEFAULT_LISTEN_ADDR)?,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_base_url<T>(mut self, base_url: T) -> Self
    where
        T: Into<FastStr>,
    {
        self.base_url = trim_base_url(base_url.into());
        self
    }

    pub fn with_name_prefix<T>(mut self, prefix: T) -> Self
    where
        T: Into<FastStr>,
    {
        self.name_prefix = prefix.into();
        self
    }

    pub fn with_pinned_model<T>(mut self, model: T) -> Self
    where
        T: Into<FastStr>,
    {
        self.pinned_model = Some(model.into());
        self
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads every setting through `lookup`; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        };

        let api_key = get("INFOMANIAK_API_KEY")
            .ok_or_else(|| Error::Configuration("INFOMANIAK_API_KEY is not set".into()))?;
        let product_id = get("INFOMANIAK_PRODUCT_ID")
            .ok_or_else(|| Error::Configuration("INFOMANIAK_PRODUCT_ID is not set".into()))?;
        let product_id = product_id.parse::<i64>().map_err(|_| {
            Error::Configuration(format!("INFOMANIAK_PRODUCT_ID is not an integer: {product_id}").into())
        })?;

        let mut config = Self::new(api_key, product_id)?;
        if let Some(base_url) = get("INFOMANIAK_BASE_URL") {
            config = config.with_base_url(base_url);
        }
        // The prefix is taken verbatim so a trailing space survives.
        if let Some(prefix) = lookup("INFOMANIAK_NAME_PREFIX") {
            config = config.with_name_prefix(prefix);
        }
        if let Some(model) = get("INFOMANIAK_MODEL") {
            config = config.with_pinned_model(model);
        }
        if let Some(addr) = get("INFOLAKE_LISTEN_ADDR") {
            config.listen_addr = parse_listen_addr(&addr)?;
        }
        if let Some(secs) = get("INFOLAKE_CONNECT_TIMEOUT") {
            let secs = secs.parse::<u64>().map_err(|_| {
                Error::Configuration(format!("INFOLAKE_CONNECT_TIMEOUT is not a number: {secs}").into())
            })?;
            config.connect_timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    /// Fails when the key is missing or the product id is not positive.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(Error::Configuration("INFOMANIAK_API_KEY is not set".into()));
        }
        if self.product_id <= 0 {
            return Err(Error::Configuration(
                format!("INFOMANIAK_PRODUCT_ID must be positive, got {}", self.product_id).into(),
            ));
        }
        Ok(())
    }

    pub fn models_url(&self) -> String {
        format!("{}/models", self.base_url)
    }

    pub fn chat_completions_url(&self) -> String {
        format!("{}/{}/openai/chat/completions", self.base_url, self.product_id)
    }
}

fn trim_base_url(url: FastStr) -> FastStr {
    if url.ends_with('/') {
        url.trim_end_matches('/').to_owned().into()
    } else {
        url
    }
}

fn parse_listen_addr(addr: &str) -> Result<SocketAddr> {
    addr.parse()
        .map_err(|_| Error::Configuration(format!("invalid listen address: {addr}").into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("INFOMANIAK_API_KEY", "secret"),
            ("INFOMANIAK_PRODUCT_ID", "1234"),
        ]))
        .unwrap();
        assert_eq!(config.product_id, 1234);
        assert_eq!(config.name_prefix.as_str(), DEFAULT_NAME_PREFIX);
        assert_eq!(config.base_url.as_str(), DEFAULT_BASE_URL);
        assert!(config.pinned_model.is_none());
        assert_eq!(config.listen_addr.port(), 19981);
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(
            config.chat_completions_url(),
            "https://api.infomaniak.com/1/ai/1234/openai/chat/completions"
        );
        assert_eq!(config.models_url(), "https://api.infomaniak.com/1/ai/models");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("INFOMANIAK_API_KEY", "secret"),
            ("INFOMANIAK_PRODUCT_ID", "7"),
            ("INFOMANIAK_BASE_URL", "http://localhost:8080/ai//"),
            ("INFOMANIAK_NAME_PREFIX", "IK: "),
            ("INFOMANIAK_MODEL", "mixtral"),
            ("INFOLAKE_LISTEN_ADDR", "127.0.0.1:3000"),
            ("INFOLAKE_CONNECT_TIMEOUT", "3"),
        ]))
        .unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:8080/ai");
        assert_eq!(config.name_prefix.as_str(), "IK: ");
        assert_eq!(config.pinned_model.as_deref(), Some("mixtral"));
        assert_eq!(config.listen_addr.port(), 3000);
        assert_eq!(config.connect_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_missing_key_fails() {
        let err = Config::from_lookup(lookup(&[("INFOMANIAK_PRODUCT_ID", "7")])).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));

        let err = Config::from_lookup(lookup(&[
            ("INFOMANIAK_API_KEY", "   "),
            ("INFOMANIAK_PRODUCT_ID", "7"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("INFOMANIAK_API_KEY"));
    }

    #[test]
    fn test_invalid_product_id_fails() {
        for id in ["0", "-3", "abc"] {
            let err = Config::from_lookup(lookup(&[
                ("INFOMANIAK_API_KEY", "secret"),
                ("INFOMANIAK_PRODUCT_ID", id),
            ]))
            .unwrap_err();
            assert!(
                err.to_string().contains("INFOMANIAK_PRODUCT_ID"),
                "unexpected error for {id}: {err}"
            );
        }
        assert!(Config::new("secret", 0).is_err());
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = Config::new("super-secret", 1).unwrap();
        let printed = format!("{config:?}");
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("<redacted>"));
    }
}
