//! Provider configuration: per-call overrides merged over process-wide defaults.
//!
//! [`ProviderConfig`] is the partially supplied shape both the host and the call site hand
//! in. [`ProviderConfig::merge`] combines them with a shallow, per-field "override wins"
//! rule, and [`ProviderConfig::resolve`] turns the merged value into a [`ResolvedConfig`]
//! once every required field is present.

// self
use crate::{_prelude::*, error::ConfigError};

/// Partially supplied provider configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
	/// Base URL of the identity provider (for example `https://cms.example.com/api`).
	pub domain: Option<String>,
}
impl ProviderConfig {
	/// Environment variable prefix used by [`ProviderConfig::from_env`].
	pub const ENV_PREFIX: &'static str = "OAUTH_STRAPI";

	/// Creates a configuration with the given domain.
	pub fn with_domain(domain: impl Into<String>) -> Self {
		Self { domain: Some(domain.into()) }
	}

	/// Reads defaults from `OAUTH_STRAPI_DOMAIN`.
	pub fn from_env() -> Self {
		Self::from_lookup(Self::ENV_PREFIX, |key| std::env::var(key).ok())
	}

	/// Reads defaults through `lookup`, using `{prefix}_DOMAIN` as the domain key.
	pub fn from_lookup<F>(prefix: &str, lookup: F) -> Self
	where
		F: Fn(&str) -> Option<String>,
	{
		Self { domain: lookup(&format!("{prefix}_DOMAIN")) }
	}

	/// Shallow merge: every field set in `overrides` wins over `defaults`.
	///
	/// An override holding an empty string still wins and later resolves as missing.
	pub fn merge(defaults: &Self, overrides: &Self) -> Self {
		Self { domain: overrides.domain.clone().or_else(|| defaults.domain.clone()) }
	}

	/// Validates required fields, naming `provider` in the error when any is absent.
	pub fn resolve(self, provider: &str) -> Result<ResolvedConfig, ConfigError> {
		match self.domain {
			Some(domain) if !domain.is_empty() => Ok(ResolvedConfig { domain }),
			_ => Err(ConfigError::MissingConfiguration {
				provider: provider.to_owned(),
				fields: vec!["domain"],
			}),
		}
	}
}

/// Configuration with every required field present.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedConfig {
	domain: String,
}
impl ResolvedConfig {
	/// Returns the provider domain as configured.
	pub fn domain(&self) -> &str {
		&self.domain
	}

	/// Joins `path` onto the domain as `{domain}{path}` and validates the result.
	pub fn endpoint(&self, path: &str) -> Result<Url, ConfigError> {
		let joined = format!("{}{path}", self.domain.trim_end_matches('/'));

		Url::parse(&joined)
			.map_err(|source| ConfigError::InvalidDomain { domain: self.domain.clone(), source })
	}
}
