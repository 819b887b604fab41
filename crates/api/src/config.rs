//! Process configuration read from the environment.

/// Runtime configuration for the API process.
#[derive(Clone)]
pub struct ApiConfig {
    /// Socket address to listen on.
    pub bind_addr: String,

    /// Shared secret used to sign and verify bearer tokens.
    pub jwt_secret: String,
}

impl ApiConfig {
    pub const DEFAULT_BIND_ADDR: &'static str = "0.0.0.0:8080";
    const DEV_JWT_SECRET: &'static str = "dev-secret";

    pub fn new(bind_addr: impl Into<String>, jwt_secret: impl Into<String>) -> Self {
        Self {
            bind_addr: bind_addr.into(),
            jwt_secret: jwt_secret.into(),
        }
    }

    /// Read `BIND_ADDR` and `JWT_SECRET`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| {
                tracing::warn!("JWT_SECRET not set; using insecure dev default");
                Self::DEV_JWT_SECRET.to_string()
            });

        let bind_addr = lookup("BIND_ADDR")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| Self::DEFAULT_BIND_ADDR.to_string());

        Self {
            bind_addr,
            jwt_secret,
        }
    }
}

impl core::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("bind_addr", &self.bind_addr)
            .field("jwt_secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ApiConfig::from_lookup(lookup(&[]));
        assert_eq!(config.bind_addr, ApiConfig::DEFAULT_BIND_ADDR);
        assert_eq!(config.jwt_secret, "dev-secret");
    }

    #[test]
    fn reads_overrides() {
        let config = ApiConfig::from_lookup(lookup(&[
            ("JWT_SECRET", "s3cr3t"),
            ("BIND_ADDR", "127.0.0.1:9000"),
        ]));
        assert_eq!(config.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.jwt_secret, "s3cr3t");
    }

    #[test]
    fn empty_secret_falls_back() {
        let config = ApiConfig::from_lookup(lookup(&[("JWT_SECRET", "")]));
        assert_eq!(config.jwt_secret, "dev-secret");
    }

    #[test]
    fn debug_hides_secret() {
        let config = ApiConfig::new("127.0.0.1:0", "s3cr3t");
        assert!(!format!("{config:?}").contains("s3cr3t"));
    }
}
