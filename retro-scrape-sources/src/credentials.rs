use serde::{Deserialize, Serialize};

/// Credentials for the online sources.
///
/// Values come from a `[screenscraper]` / `[thegamesdb]` config section and
/// can be overridden by environment variables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub dev_id: Option<String>,
    #[serde(default)]
    pub dev_password: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Credentials {
    /// Apply environment variable overrides on top of the configured values.
    pub fn with_env(self) -> Self {
        self.with_lookup(|var| std::env::var(var).ok())
    }

    fn with_lookup(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |var: &str| lookup(var).filter(|v| !v.is_empty());
        self.dev_id = get("SCREENSCRAPER_DEVID").or(self.dev_id);
        self.dev_password = get("SCREENSCRAPER_DEVPASSWORD").or(self.dev_password);
        self.user = get("SCREENSCRAPER_USER").or(self.user);
        self.password = get("SCREENSCRAPER_PASSWORD").or(self.password);
        self.api_key = get("THEGAMESDB_APIKEY").or(self.api_key);
        self
    }

    /// Fill unset fields from `other`.
    pub fn or(self, other: Credentials) -> Self {
        Self {
            dev_id: self.dev_id.or(other.dev_id),
            dev_password: self.dev_password.or(other.dev_password),
            user: self.user.or(other.user),
            password: self.password.or(other.password),
            api_key: self.api_key.or(other.api_key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_config_values() {
        let creds = Credentials {
            user: Some("from-config".into()),
            api_key: Some("config-key".into()),
            ..Default::default()
        }
        .with_lookup(|var| match var {
            "SCREENSCRAPER_USER" => Some("from-env".into()),
            "THEGAMESDB_APIKEY" => Some(String::new()),
            _ => None,
        });
        assert_eq!(creds.user.as_deref(), Some("from-env"));
        // empty variables are ignored
        assert_eq!(creds.api_key.as_deref(), Some("config-key"));
    }

    #[test]
    fn or_fills_gaps_only() {
        let a = Credentials {
            user: Some("a".into()),
            ..Default::default()
        };
        let b = Credentials {
            user: Some("b".into()),
            password: Some("pw".into()),
            ..Default::default()
        };
        let merged = a.or(b);
        assert_eq!(merged.user.as_deref(), Some("a"));
        assert_eq!(merged.password.as_deref(), Some("pw"));
    }
}
