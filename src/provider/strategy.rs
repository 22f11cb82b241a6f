//! Provider strategy hooks that describe the credential-exchange wire contract.
//!
//! Implementations locate the provider endpoints and interpret opaque JSON payloads
//! without tying flows to any particular HTTP client.

// crates.io
use serde_json::Value;
// self
use crate::{_prelude::*, provider::ExchangeStage};

/// Strategy hook that lets providers describe their endpoints and payload signals.
///
/// Implementors are required to be `Send + Sync`, and the hooks only see
/// `serde_json::Value` payloads so downstream crates never depend on reqwest-specific
/// structures. Override only what you need; every hook except [`provider`](Self::provider)
/// defaults to the Strapi contract.
pub trait ProviderStrategy: Send + Sync {
	/// Provider label used in error messages, spans, and configuration lookups.
	fn provider(&self) -> &str;

	/// Path (relative to the configured domain) of the given call.
	fn path(&self, stage: ExchangeStage) -> &str {
		match stage {
			ExchangeStage::TokenExchange => "/auth/local",
			ExchangeStage::ProfileFetch => "/users/me",
		}
	}

	/// Returns the rejection reason when the payload signals a provider-side failure.
	///
	/// The default treats a truthy top-level `error` field as a rejection.
	fn rejection_reason(&self, body: &Value) -> Option<String> {
		let error = body.get("error").filter(|value| is_truthy(value))?;
		let reason = body
			.get("error_description")
			.and_then(Value::as_str)
			.or_else(|| error.as_str())
			.or_else(|| error.get("message").and_then(Value::as_str))
			.unwrap_or("Unknown error");

		Some(reason.to_owned())
	}

	/// Extracts the opaque access token from a successful token-exchange payload.
	fn access_token(&self, body: &Value) -> Option<String> {
		body.get("jwt").and_then(Value::as_str).map(ToOwned::to_owned)
	}
}

/// Default strategy for Strapi's `users-permissions` local provider.
#[derive(Clone, Copy, Debug, Default)]
pub struct StrapiStrategy;
impl Display for StrapiStrategy {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("strapi-strategy")
	}
}
impl ProviderStrategy for StrapiStrategy {
	fn provider(&self) -> &str {
		"strapi"
	}
}

/// Loose truthiness: `null`, `false`, `0`, and `""` count as absent.
pub(crate) fn is_truthy(value: &Value) -> bool {
	match value {
		Value::Null => false,
		Value::Bool(flag) => *flag,
		Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
		Value::String(text) => !text.is_empty(),
		Value::Array(_) | Value::Object(_) => true,
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn strapi_paths_follow_the_local_provider() {
		let strategy = StrapiStrategy;

		assert_eq!(strategy.provider(), "strapi");
		assert_eq!(strategy.path(ExchangeStage::TokenExchange), "/auth/local");
		assert_eq!(strategy.path(ExchangeStage::ProfileFetch), "/users/me");
	}

	#[test]
	fn rejection_reason_reads_strapi_error_objects() {
		let body = json!({
			"data": null,
			"error": {
				"status": 400,
				"name": "ValidationError",
				"message": "Invalid identifier or password",
				"details": {}
			}
		});

		assert_eq!(
			StrapiStrategy.rejection_reason(&body).as_deref(),
			Some("Invalid identifier or password")
		);
	}

	#[test]
	fn rejection_reason_prefers_oauth_style_fields() {
		let described = json!({ "error": "invalid_grant", "error_description": "Bad password" });
		let bare = json!({ "error": "invalid_grant" });
		let opaque = json!({ "error": 42 });

		assert_eq!(StrapiStrategy.rejection_reason(&described).as_deref(), Some("Bad password"));
		assert_eq!(StrapiStrategy.rejection_reason(&bare).as_deref(), Some("invalid_grant"));
		assert_eq!(StrapiStrategy.rejection_reason(&opaque).as_deref(), Some("Unknown error"));
	}

	#[test]
	fn falsy_error_fields_are_not_rejections() {
		for body in [
			json!({ "jwt": "T" }),
			json!({ "jwt": "T", "error": null }),
			json!({ "jwt": "T", "error": false }),
			json!({ "jwt": "T", "error": "" }),
			json!({ "jwt": "T", "error": 0 }),
		] {
			assert_eq!(StrapiStrategy.rejection_reason(&body), None, "{body} should pass.");
		}
	}

	#[test]
	fn access_token_requires_a_string_jwt() {
		assert_eq!(StrapiStrategy.access_token(&json!({ "jwt": "T" })).as_deref(), Some("T"));
		assert_eq!(StrapiStrategy.access_token(&json!({ "jwt": 7 })), None);
		assert_eq!(StrapiStrategy.access_token(&json!({ "user": {} })), None);
	}

	#[test]
	fn custom_strategy_can_move_endpoints() {
		struct VersionedStrategy;
		impl ProviderStrategy for VersionedStrategy {
			fn provider(&self) -> &str {
				"cms"
			}

			fn path(&self, stage: ExchangeStage) -> &str {
				match stage {
					ExchangeStage::TokenExchange => "/v2/login",
					ExchangeStage::ProfileFetch => "/v2/me",
				}
			}
		}

		assert_eq!(VersionedStrategy.path(ExchangeStage::TokenExchange), "/v2/login");
		assert_eq!(VersionedStrategy.access_token(&json!({ "jwt": "T" })).as_deref(), Some("T"));
	}
}
