//! Server-side identifier/password login against Strapi-style identity providers: exchange
//! credentials for an access token, resolve the user's profile, and hand the integrator exactly
//! one typed outcome.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod error;
pub mod flows;
pub mod handler;
pub mod http;
pub mod obs;
pub mod provider;
pub mod transport;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		config::ProviderConfig,
		flows::Broker,
		http::ReqwestHttpClient,
		provider::{ProviderStrategy, StrapiStrategy},
		transport::{ReqwestTransportErrorMapper, oauth2::http::Request},
	};

	/// Broker type alias used by reqwest-backed integration tests.
	pub type ReqwestTestBroker = Broker<ReqwestHttpClient, ReqwestTransportErrorMapper>;

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs a Strapi [`Broker`] whose default configuration points at `domain`.
	///
	/// Defaults are set explicitly so tests never depend on the process environment.
	pub fn build_reqwest_test_broker(domain: Option<&str>) -> ReqwestTestBroker {
		let strategy: Arc<dyn ProviderStrategy> = Arc::new(StrapiStrategy);
		let mapper = Arc::new(ReqwestTransportErrorMapper);
		let defaults = ProviderConfig { domain: domain.map(ToOwned::to_owned) };

		Broker::with_http_client(strategy, test_reqwest_http_client(), mapper)
			.with_defaults(defaults)
	}

	/// Builds a JSON login request carrying `body`.
	pub fn login_request(body: &str) -> Request<Vec<u8>> {
		Request::builder()
			.method("POST")
			.uri("/auth/strapi")
			.header("content-type", "application/json")
			.body(body.as_bytes().to_vec())
			.expect("Failed to build login request.")
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
