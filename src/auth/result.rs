//! Normalized authentication result handed to the success outcome.

// std
use std::ops::Deref;
// crates.io
use serde_json::Value;
// self
use crate::{_prelude::*, auth::AccessToken};

/// Provider profile payload, passed through unmodified.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserProfile(Value);
impl UserProfile {
	/// Wraps a raw provider payload.
	pub fn new(value: Value) -> Self {
		Self(value)
	}

	/// Consumes the wrapper, returning the raw payload.
	pub fn into_inner(self) -> Value {
		self.0
	}
}
impl Deref for UserProfile {
	type Target = Value;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

/// Tokens issued during the exchange.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AuthTokens {
	/// Opaque bearer token returned by the provider.
	pub access_token: AccessToken,
}

/// Result of a successful credential exchange.
///
/// Serializes as `{"tokens":{"access_token":"…"},"user":…}` so downstream code never
/// depends on the provider's own response shape.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AuthResult {
	/// Issued tokens.
	pub tokens: AuthTokens,
	/// Authenticated user's profile.
	pub user: UserProfile,
}
impl AuthResult {
	/// Assembles a result from the token and profile calls.
	pub fn new(access_token: AccessToken, user: UserProfile) -> Self {
		Self { tokens: AuthTokens { access_token }, user }
	}
}
