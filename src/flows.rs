//! High-level flow orchestrators powered by the provider facade.

mod local;

// self
use crate::{
	_prelude::*,
	config::{ProviderConfig, ResolvedConfig},
	error::ConfigError,
	http::ProviderHttpClient,
	provider::ProviderStrategy,
	transport::TransportErrorMapper,
};
#[cfg(feature = "reqwest")]
use crate::{http::ReqwestHttpClient, provider::StrapiStrategy, transport::ReqwestTransportErrorMapper};

#[cfg(feature = "reqwest")]
/// Broker specialized for the crate's default reqwest transport stack.
pub type ReqwestBroker = Broker<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Coordinates credential exchanges against a single identity provider.
///
/// The broker owns the HTTP client, transport error mapper, provider strategy, and the
/// process-wide default configuration. It is immutable after construction, so one
/// instance can serve any number of concurrent requests; every call merges its own
/// overrides over [`Broker::defaults`] without touching shared state.
#[derive(Clone)]
pub struct Broker<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// HTTP client wrapper used for every outbound provider request.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before surfacing them to callers.
	pub transport_mapper: Arc<M>,
	/// Strategy describing the provider's endpoints and payload signals.
	pub strategy: Arc<dyn ProviderStrategy>,
	/// Process-wide defaults that per-call overrides are merged over.
	pub defaults: ProviderConfig,
}
impl<C, M> Broker<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a broker that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		strategy: Arc<dyn ProviderStrategy>,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			transport_mapper: mapper.into(),
			strategy,
			defaults: ProviderConfig::default(),
		}
	}

	/// Sets or replaces the process-wide default configuration.
	pub fn with_defaults(mut self, defaults: ProviderConfig) -> Self {
		self.defaults = defaults;

		self
	}

	/// Merges `overrides` over the defaults and checks every required field.
	pub fn resolve_config(&self, overrides: &ProviderConfig) -> Result<ResolvedConfig, ConfigError> {
		ProviderConfig::merge(&self.defaults, overrides).resolve(self.strategy.provider())
	}
}
#[cfg(feature = "reqwest")]
impl Broker<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a Strapi broker on the default reqwest transport.
	///
	/// Defaults are read from `OAUTH_STRAPI_DOMAIN`; use [`Broker::with_defaults`] to
	/// replace them.
	pub fn new() -> Self {
		Self::with_http_client(
			Arc::new(StrapiStrategy),
			ReqwestHttpClient::default(),
			Arc::new(ReqwestTransportErrorMapper),
		)
		.with_defaults(ProviderConfig::from_env())
	}
}
#[cfg(feature = "reqwest")]
impl Default for Broker<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	fn default() -> Self {
		Self::new()
	}
}
impl<C, M> Debug for Broker<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Broker")
			.field("provider", &self.strategy.provider())
			.field("defaults", &self.defaults)
			.finish()
	}
}
