use std::{env, fmt, str::FromStr};

use url::Url;

use crate::error::ConfigError;

/// Endpoint of DynamoDB Local, used by the `local` profile when no override is set.
pub const LOCAL_ENDPOINT: &str = "http://localhost:8000";

/// Region used when `AWS_REGION` is not set.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Named deployment configuration.
///
/// Selected by the environment the function is deployed into, never by code
/// paths that sniff for a "test mode".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Profile {
    /// Real AWS, default credential chain.
    #[default]
    Aws,
    /// An emulator (DynamoDB Local, LocalStack) with static test credentials.
    Local,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Aws => "aws",
            Profile::Local => "local",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Profile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "aws" => Ok(Profile::Aws),
            "local" => Ok(Profile::Local),
            _ => Err(ConfigError::InvalidProfile(s.to_string())),
        }
    }
}

/// Function configuration, resolved once at cold start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Target DynamoDB table.
    pub table_name: String,
    pub profile: Profile,
    pub region: String,
    /// Endpoint override. `None` means the SDK's regional endpoint.
    pub endpoint_url: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `TABLE_NAME` - Target table (required)
    /// - `ITEMSINK_PROFILE` - `aws` or `local` (default: `aws`)
    /// - `AWS_ENDPOINT_URL` - Endpoint override (default: none, `local` uses DynamoDB Local)
    /// - `AWS_REGION` - AWS region (default: "us-east-1")
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Config::from_env`] but reads variables through `lookup`.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let table_name = var("TABLE_NAME").ok_or(ConfigError::MissingVar("TABLE_NAME"))?;

        let profile = match var("ITEMSINK_PROFILE") {
            Some(value) => value.parse()?,
            None => Profile::default(),
        };

        let region = var("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string());

        let endpoint_url = match (var("AWS_ENDPOINT_URL"), profile) {
            (Some(url), _) => Some(validate_endpoint(url)?),
            (None, Profile::Local) => Some(LOCAL_ENDPOINT.to_string()),
            (None, Profile::Aws) => None,
        };

        Ok(Self {
            table_name,
            profile,
            region,
            endpoint_url,
        })
    }

    /// Configuration for an emulator at `endpoint_url`.
    pub fn local(table_name: impl Into<String>, endpoint_url: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            profile: Profile::Local,
            region: DEFAULT_REGION.to_string(),
            endpoint_url: Some(endpoint_url.into()),
        }
    }

    /// Returns a display string for the target environment.
    pub fn target_display(&self) -> String {
        match &self.endpoint_url {
            Some(url) => format!("DynamoDB at {} (profile: {})", url, self.profile),
            None => format!(
                "AWS DynamoDB (region: {}, profile: {})",
                self.region, self.profile
            ),
        }
    }
}

fn validate_endpoint(url: String) -> Result<String, ConfigError> {
    let parsed = Url::parse(&url).map_err(|e| ConfigError::InvalidEndpoint {
        url: url.clone(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ConfigError::InvalidEndpoint {
            reason: format!("unsupported scheme '{}'", scheme),
            url,
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        let map: HashMap<&str, &str> = vars.iter().copied().collect();
        move |key: &str| map.get(key).map(|v| v.to_string())
    }

    #[test]
    fn test_default_values() {
        let config = Config::from_lookup(lookup(&[("TABLE_NAME", "Items")])).unwrap();

        assert_eq!(config.table_name, "Items");
        assert_eq!(config.profile, Profile::Aws);
        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.endpoint_url, None);
    }

    #[test]
    fn test_missing_table_name_is_an_error() {
        assert_eq!(
            Config::from_lookup(lookup(&[])).unwrap_err(),
            ConfigError::MissingVar("TABLE_NAME")
        );
        assert_eq!(
            Config::from_lookup(lookup(&[("TABLE_NAME", "  ")])).unwrap_err(),
            ConfigError::MissingVar("TABLE_NAME")
        );
    }

    #[test]
    fn test_local_profile_defaults_to_dynamodb_local() {
        let config = Config::from_lookup(lookup(&[
            ("TABLE_NAME", "Items"),
            ("ITEMSINK_PROFILE", "local"),
        ]))
        .unwrap();

        assert_eq!(config.profile, Profile::Local);
        assert_eq!(config.endpoint_url.as_deref(), Some(LOCAL_ENDPOINT));
    }

    #[test]
    fn test_endpoint_override_wins_over_profile_default() {
        let config = Config::from_lookup(lookup(&[
            ("TABLE_NAME", "Items"),
            ("ITEMSINK_PROFILE", "LOCAL"),
            ("AWS_ENDPOINT_URL", "http://localstack:4566"),
            ("AWS_REGION", "eu-central-1"),
        ]))
        .unwrap();

        assert_eq!(config.endpoint_url.as_deref(), Some("http://localstack:4566"));
        assert_eq!(config.region, "eu-central-1");
    }

    #[test]
    fn test_invalid_profile() {
        let err = Config::from_lookup(lookup(&[
            ("TABLE_NAME", "Items"),
            ("ITEMSINK_PROFILE", "staging"),
        ]))
        .unwrap_err();

        assert_eq!(err, ConfigError::InvalidProfile("staging".to_string()));
    }

    #[test]
    fn test_invalid_endpoint() {
        let err = Config::from_lookup(lookup(&[
            ("TABLE_NAME", "Items"),
            ("AWS_ENDPOINT_URL", "localhost"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEndpoint { ref url, .. } if url == "localhost"));

        let err = Config::from_lookup(lookup(&[
            ("TABLE_NAME", "Items"),
            ("AWS_ENDPOINT_URL", "ftp://example.com"),
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidEndpoint {
                url: "ftp://example.com".to_string(),
                reason: "unsupported scheme 'ftp'".to_string(),
            }
        );
    }

    #[test]
    fn test_target_display() {
        let local = Config::local("Items", "http://localhost:8000");
        assert_eq!(
            local.target_display(),
            "DynamoDB at http://localhost:8000 (profile: local)"
        );

        let aws = Config::from_lookup(lookup(&[
            ("TABLE_NAME", "Items"),
            ("AWS_REGION", "eu-west-2"),
        ]))
        .unwrap();
        assert_eq!(
            aws.target_display(),
            "AWS DynamoDB (region: eu-west-2, profile: aws)"
        );
    }

    #[test]
    fn test_profile_round_trip_through_str() {
        for profile in [Profile::Aws, Profile::Local] {
            assert_eq!(profile.as_str().parse::<Profile>().unwrap(), profile);
        }
    }
}
