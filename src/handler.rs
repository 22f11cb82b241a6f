//! Request handler that turns an inbound login request into exactly one outcome.
//!
//! [`LocalAuthHandler::handle`] resolves configuration, validates the body, runs the
//! credential exchange, and reports through the integrator's [`OutcomeHandler`]:
//!
//! - full success invokes [`OutcomeHandler::on_success`];
//! - missing configuration and every provider/transport failure invoke
//!   [`OutcomeHandler::on_error`];
//! - a malformed body returns [`RequestError`] directly and neither hook runs.

// crates.io
use oauth2::http::Request;
// self
use crate::{
	_prelude::*,
	auth::{AuthResult, Credentials},
	config::ProviderConfig,
	error::RequestError,
	flows::Broker,
	http::ProviderHttpClient,
	transport::TransportErrorMapper,
};

/// Boxed future returned by outcome hooks.
pub type OutcomeFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a + Send>>;

/// Inbound request exposing its raw body.
pub trait InboundRequest {
	/// Returns the request body, or `None` when the request carried none.
	fn payload(&self) -> Option<&[u8]>;
}
impl<B> InboundRequest for Request<B>
where
	B: AsRef<[u8]>,
{
	fn payload(&self) -> Option<&[u8]> {
		let body = self.body().as_ref();

		(!body.is_empty()).then_some(body)
	}
}

/// Integrator hooks that render the response for each outcome.
///
/// Both hooks receive the original request back so they can read headers, build
/// redirects, or attach sessions. Each invocation of [`LocalAuthHandler::handle`] calls at
/// most one hook, exactly once.
pub trait OutcomeHandler<Req>: Send + Sync {
	/// Response type produced by both hooks.
	type Response;

	/// Called with the normalized result after both provider calls succeeded.
	fn on_success(&self, request: Req, result: AuthResult) -> OutcomeFuture<'_, Self::Response>;

	/// Called with the failure for missing configuration and every provider-side error.
	fn on_error(&self, request: Req, error: Error) -> OutcomeFuture<'_, Self::Response>;
}

impl<Req, T> OutcomeHandler<Req> for Arc<T>
where
	T: ?Sized + OutcomeHandler<Req>,
{
	type Response = T::Response;

	fn on_success(&self, request: Req, result: AuthResult) -> OutcomeFuture<'_, Self::Response> {
		self.as_ref().on_success(request, result)
	}

	fn on_error(&self, request: Req, error: Error) -> OutcomeFuture<'_, Self::Response> {
		self.as_ref().on_error(request, error)
	}
}

/// Adapts a pair of async closures into an [`OutcomeHandler`].
#[derive(Clone)]
pub struct Callbacks<S, E> {
	on_success: S,
	on_error: E,
}
impl<S, E> Callbacks<S, E> {
	/// Wraps the success and error closures.
	pub fn new(on_success: S, on_error: E) -> Self {
		Self { on_success, on_error }
	}
}
impl<S, E> Debug for Callbacks<S, E> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("Callbacks(..)")
	}
}
impl<Req, S, E, SF, EF, R> OutcomeHandler<Req> for Callbacks<S, E>
where
	S: Send + Sync + Fn(Req, AuthResult) -> SF,
	E: Send + Sync + Fn(Req, Error) -> EF,
	SF: 'static + Send + Future<Output = R>,
	EF: 'static + Send + Future<Output = R>,
{
	type Response = R;

	fn on_success(&self, request: Req, result: AuthResult) -> OutcomeFuture<'_, R> {
		Box::pin((self.on_success)(request, result))
	}

	fn on_error(&self, request: Req, error: Error) -> OutcomeFuture<'_, R> {
		Box::pin((self.on_error)(request, error))
	}
}

/// Identifier/password login handler bound to one broker and one outcome handler.
///
/// The handler carries the call-site configuration override; the broker carries the
/// process-wide defaults. Both are read-only, so a single handler serves concurrent
/// requests.
pub struct LocalAuthHandler<C, M, H>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	broker: Broker<C, M>,
	config: ProviderConfig,
	outcome: H,
}
impl<C, M, H> LocalAuthHandler<C, M, H>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a handler relying solely on the broker's default configuration.
	pub fn new(broker: Broker<C, M>, outcome: H) -> Self {
		Self { broker, config: ProviderConfig::default(), outcome }
	}

	/// Sets the call-site configuration merged over the broker defaults.
	pub fn with_config(mut self, config: ProviderConfig) -> Self {
		self.config = config;

		self
	}

	/// Returns the underlying broker.
	pub fn broker(&self) -> &Broker<C, M> {
		&self.broker
	}

	/// Handles one login request.
	///
	/// Returns `Err` only for malformed bodies; every other path resolves to the
	/// response produced by one of the outcome hooks.
	pub async fn handle<Req>(
		&self,
		request: Req,
	) -> Result<<H as OutcomeHandler<Req>>::Response, RequestError>
	where
		Req: InboundRequest,
		H: OutcomeHandler<Req>,
	{
		let config = match self.broker.resolve_config(&self.config) {
			Ok(config) => config,
			Err(err) => {
				#[cfg(feature = "tracing")]
				tracing::warn!(
					provider = self.broker.strategy.provider(),
					error = %err,
					"provider configuration is incomplete"
				);

				return Ok(self.outcome.on_error(request, err.into()).await);
			},
		};
		let credentials = Credentials::from_body(request.payload())?;
		let response = match self.broker.exchange_credentials(&config, credentials).await {
			Ok(result) => self.outcome.on_success(request, result).await,
			Err(err) => self.outcome.on_error(request, err).await,
		};

		Ok(response)
	}
}
impl<C, M, H> Debug for LocalAuthHandler<C, M, H>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LocalAuthHandler")
			.field("broker", &self.broker)
			.field("config", &self.config)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn empty_bodies_read_as_absent() {
		let empty = Request::new(Vec::<u8>::new());
		let filled = Request::new(b"{}".to_vec());

		assert_eq!(empty.payload(), None);
		assert_eq!(filled.payload(), Some(&b"{}"[..]));
	}

	#[tokio::test]
	async fn callbacks_route_each_outcome() {
		let callbacks = Callbacks::new(
			|request: u8, result: AuthResult| async move {
				format!("{request}:{}", result.tokens.access_token.expose())
			},
			|request: u8, error: Error| async move { format!("{request}:{}", error.status_code()) },
		);
		let success = callbacks
			.on_success(
				1_u8,
				AuthResult::new(
					crate::auth::Secret::new("T"),
					crate::auth::UserProfile::new(serde_json::Value::Null),
				),
			)
			.await;
		let failure = callbacks
			.on_error(
				2_u8,
				crate::error::ConfigError::MissingConfiguration {
					provider: "strapi".into(),
					fields: vec!["domain"],
				}
				.into(),
			)
			.await;

		assert_eq!(success, "1:T");
		assert_eq!(failure, "2:500");
	}
}
