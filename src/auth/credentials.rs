//! Identifier/password credentials read from the inbound request body.

// crates.io
use serde_json::{Map, Value};
// self
use crate::{_prelude::*, auth::Secret, error::RequestError};

/// Credentials forwarded verbatim to the provider's token exchange.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
	/// Username or email the provider resolves.
	pub identifier: String,
	/// Plain password; serialized raw on the wire, redacted everywhere else.
	pub password: Secret,
}
impl Credentials {
	/// Creates credentials from already validated parts.
	pub fn new(identifier: impl Into<String>, password: impl Into<String>) -> Self {
		Self { identifier: identifier.into(), password: Secret::new(password) }
	}

	/// Parses a JSON request body.
	///
	/// Only a JSON object qualifies; an absent body, a non-JSON body, a non-object document,
	/// or a missing/empty/non-string `identifier` or `password` are all the same client
	/// error. Unknown fields are ignored.
	pub fn from_body(body: Option<&[u8]>) -> Result<Self, RequestError> {
		let body = body.ok_or(RequestError::MissingCredentials)?;
		let fields = serde_json::from_slice::<Option<Map<String, Value>>>(body)
			.ok()
			.flatten()
			.ok_or(RequestError::MissingCredentials)?;
		let field = |name: &str| {
			fields
				.get(name)
				.and_then(Value::as_str)
				.filter(|value| !value.is_empty())
				.ok_or(RequestError::MissingCredentials)
		};

		Ok(Self::new(field("identifier")?, field("password")?))
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("identifier", &self.identifier)
			.field("password", &self.password)
			.finish()
	}
}
