//! Broker-level error types shared across flows, providers, and handlers.

// self
use crate::{_prelude::*, provider::ExchangeStage};

/// Broker-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical broker error routed to the integrator's error outcome.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Provider answered with something the broker could not use.
	#[error(transparent)]
	Transient(#[from] TransientError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Provider accepted the call but rejected the credentials or the token.
	#[error("{provider} login failed: {reason}.")]
	Rejected {
		/// Provider label (for example `strapi`).
		provider: String,
		/// Call that produced the rejection.
		stage: ExchangeStage,
		/// Provider-supplied reason string.
		reason: String,
		/// HTTP status code, when the provider answered with a non-2xx status.
		status: Option<u16>,
	},
}
impl Error {
	/// Suggested HTTP status an integrator may render for this error.
	pub fn status_code(&self) -> u16 {
		match self {
			Self::Config(_) => 500,
			Self::Transient(_) => 503,
			Self::Transport(_) => 502,
			Self::Rejected { status: Some(code @ 400..=499), .. } => *code,
			Self::Rejected { .. } => 401,
		}
	}

	/// Returns the exchange stage the failure originated from, when known.
	pub fn stage(&self) -> Option<ExchangeStage> {
		match self {
			Self::Config(_) => None,
			Self::Transient(err) => Some(err.stage()),
			Self::Transport(TransportError::Network { stage, .. }) => Some(*stage),
			Self::Transport(TransportError::Io(_)) => None,
			Self::Rejected { stage, .. } => Some(*stage),
		}
	}
}

/// Configuration and validation failures raised by the broker.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Required provider settings are absent after merging defaults and overrides.
	#[error("Missing {provider} configuration: {}.", .fields.join(", "))]
	MissingConfiguration {
		/// Provider label.
		provider: String,
		/// Names of the missing settings.
		fields: Vec<&'static str>,
	},
	/// Provider domain cannot be joined into a valid endpoint URL.
	#[error("Provider domain `{domain}` does not form a valid URL.")]
	InvalidDomain {
		/// Configured domain value.
		domain: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Outbound JSON payload could not be encoded.
	#[error("Request payload could not be encoded.")]
	RequestEncode(#[from] serde_json::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}

	/// Lists the missing settings when this is a missing-configuration error.
	pub fn missing_fields(&self) -> Option<&[&'static str]> {
		match self {
			Self::MissingConfiguration { fields, .. } => Some(fields),
			_ => None,
		}
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Provider answered, but not in a shape the broker can use.
#[derive(Debug, ThisError)]
pub enum TransientError {
	/// Provider returned a non-2xx status without a recognizable error payload.
	#[error("Provider returned HTTP {status} during {stage}.")]
	UnexpectedStatus {
		/// Call that produced the status.
		stage: ExchangeStage,
		/// HTTP status code.
		status: u16,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Provider responded with malformed JSON that could not be parsed.
	#[error("Provider returned malformed JSON during {stage}.")]
	ResponseParse {
		/// Call that produced the payload.
		stage: ExchangeStage,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Transport reported a timeout.
	#[error("Request timed out during {stage}.")]
	Timeout {
		/// Call that timed out.
		stage: ExchangeStage,
	},
	/// Transport reported a failure the mapper could not classify further.
	#[error("HTTP client error occurred during {stage}: {message}.")]
	Client {
		/// Call that failed.
		stage: ExchangeStage,
		/// Transport-supplied message.
		message: String,
		/// HTTP status recorded before the failure, when available.
		status: Option<u16>,
	},
}
impl TransientError {
	/// Returns the exchange stage tied to the failure.
	pub fn stage(&self) -> ExchangeStage {
		match self {
			Self::UnexpectedStatus { stage, .. }
			| Self::ResponseParse { stage, .. }
			| Self::Timeout { stage }
			| Self::Client { stage, .. } => *stage,
		}
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred during {stage}.")]
	Network {
		/// Call that failed.
		stage: ExchangeStage,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the provider.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(stage: ExchangeStage, src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { stage, source: Box::new(src) }
	}
}

/// Malformed inbound request; answered directly instead of through the error outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ThisError)]
pub enum RequestError {
	/// Body is absent, not JSON, or lacks `identifier`/`password`.
	#[error("Missing identifier or password")]
	MissingCredentials,
}
impl RequestError {
	/// HTTP status to answer with.
	pub const fn status_code(&self) -> u16 {
		400
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn missing_configuration_names_fields() {
		let err = ConfigError::MissingConfiguration { provider: "strapi".into(), fields: vec!["domain"] };

		assert_eq!(err.to_string(), "Missing strapi configuration: domain.");
		assert_eq!(err.missing_fields(), Some(&["domain"][..]));
		assert_eq!(Error::from(err).status_code(), 500);
	}

	#[test]
	fn rejection_status_prefers_provider_client_errors() {
		let rejected = |status| Error::Rejected {
			provider: "strapi".into(),
			stage: ExchangeStage::TokenExchange,
			reason: "Invalid identifier or password".into(),
			status,
		};

		assert_eq!(rejected(None).status_code(), 401);
		assert_eq!(rejected(Some(400)).status_code(), 400);
		assert_eq!(rejected(Some(502)).status_code(), 401);
		assert_eq!(
			rejected(None).to_string(),
			"strapi login failed: Invalid identifier or password."
		);
		assert_eq!(rejected(None).stage(), Some(ExchangeStage::TokenExchange));
	}

	#[test]
	fn request_error_is_a_bad_request() {
		let err = RequestError::MissingCredentials;

		assert_eq!(err.status_code(), 400);
		assert_eq!(err.to_string(), "Missing identifier or password");
	}
}
