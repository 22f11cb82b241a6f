//! Provider call facade and transport error mapping.
//!
//! [`ProviderFacade`] performs the two outbound calls of a credential exchange over any
//! [`ProviderHttpClient`], reading only the payload signals [`ProviderStrategy`] names.
//! Transport failures are classified by a [`TransportErrorMapper`] so custom clients can
//! decide how their own error types surface.

pub use oauth2;

// crates.io
use oauth2::{
	AsyncHttpClient, HttpClientError, HttpRequest,
	http::{
		Method, Request,
		header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
	},
};
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, Credentials, UserProfile},
	error::{ConfigError, TransientError, TransportError},
	http::{ProviderHttpClient, ResponseMetadata, ResponseMetadataSlot},
	provider::{ExchangeStage, ProviderStrategy},
};

const APPLICATION_JSON: &str = "application/json";

/// Maps HTTP transport failures into broker [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport into a broker error.
	fn map_transport_error(
		&self,
		stage: ExchangeStage,
		metadata: Option<&ResponseMetadata>,
		error: HttpClientError<E>,
	) -> Error;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		stage: ExchangeStage,
		meta: Option<&ResponseMetadata>,
		err: HttpClientError<ReqwestError>,
	) -> Error {
		match err {
			HttpClientError::Reqwest(inner) => map_reqwest_error(stage, *inner),
			HttpClientError::Http(inner) => ConfigError::from(inner).into(),
			HttpClientError::Io(inner) => TransportError::Io(inner).into(),
			HttpClientError::Other(message) => map_client_error(stage, meta, message),
			_ => map_client_error(stage, meta, "unrecognized client failure"),
		}
	}
}

/// Client failures keep whatever status the handle recorded before failing (for example
/// a body read that broke after the headers arrived).
#[cfg(feature = "reqwest")]
fn map_client_error(
	stage: ExchangeStage,
	meta: Option<&ResponseMetadata>,
	message: impl Into<String>,
) -> Error {
	TransientError::Client { stage, message: message.into(), status: meta.and_then(|m| m.status) }
		.into()
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(stage: ExchangeStage, err: ReqwestError) -> Error {
	if err.is_builder() {
		return ConfigError::from(err).into();
	}
	if err.is_timeout() {
		return TransientError::Timeout { stage }.into();
	}

	TransportError::network(stage, err).into()
}

/// Decoded provider answer; `body` is `None` when the payload was empty.
struct ProviderResponse {
	status: u16,
	success: bool,
	body: Option<Value>,
	retry_after: Option<Duration>,
}

/// Borrowed view over the broker parts needed to talk to the provider.
pub(crate) struct ProviderFacade<'a, C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	http_client: &'a C,
	error_mapper: &'a M,
	strategy: &'a dyn ProviderStrategy,
}
impl<'a, C, M> ProviderFacade<'a, C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	pub(crate) fn new(
		http_client: &'a C,
		error_mapper: &'a M,
		strategy: &'a dyn ProviderStrategy,
	) -> Self {
		Self { http_client, error_mapper, strategy }
	}

	/// `POST {domain}/auth/local`, returning the issued access token.
	pub(crate) async fn exchange_credentials(
		&self,
		endpoint: &Url,
		credentials: &Credentials,
	) -> Result<AccessToken> {
		const STAGE: ExchangeStage = ExchangeStage::TokenExchange;

		let payload = serde_json::to_vec(credentials).map_err(ConfigError::from)?;
		let request = Request::builder()
			.method(Method::POST)
			.uri(endpoint.as_str())
			.header(CONTENT_TYPE, APPLICATION_JSON)
			.header(ACCEPT, APPLICATION_JSON)
			.body(payload)
			.map_err(ConfigError::from)?;
		let response = self.dispatch(STAGE, request).await?;

		self.ensure_not_rejected(STAGE, &response)?;

		let body = response
			.body
			.filter(|value| !value.is_null())
			.ok_or_else(|| self.rejected(STAGE, "Token endpoint returned an empty response", None))?;
		let token = self.strategy.access_token(&body).ok_or_else(|| {
			self.rejected(STAGE, "Token endpoint response did not include an access token", None)
		})?;

		Ok(AccessToken::new(token))
	}

	/// `GET {domain}/users/me` authorized with the freshly issued bearer token.
	pub(crate) async fn fetch_profile(
		&self,
		endpoint: &Url,
		access_token: &AccessToken,
	) -> Result<UserProfile> {
		const STAGE: ExchangeStage = ExchangeStage::ProfileFetch;

		let request = Request::builder()
			.method(Method::GET)
			.uri(endpoint.as_str())
			.header(AUTHORIZATION, format!("Bearer {}", access_token.expose()))
			.header(ACCEPT, APPLICATION_JSON)
			.body(Vec::new())
			.map_err(ConfigError::from)?;
		let response = self.dispatch(STAGE, request).await?;

		// A 2xx profile is opaque: keys such as `error` belong to the user record.
		if !response.success {
			self.ensure_not_rejected(STAGE, &response)?;
		}

		Ok(UserProfile::new(response.body.unwrap_or(Value::Null)))
	}

	async fn dispatch(&self, stage: ExchangeStage, request: HttpRequest) -> Result<ProviderResponse> {
		let meta = ResponseMetadataSlot::default();
		let handle = self.http_client.with_metadata(meta.clone());
		let response = handle.call(request).await.map_err(|err| {
			self.error_mapper.map_transport_error(stage, meta.take().as_ref(), err)
		})?;
		let retry_after = meta.take().and_then(|value| value.retry_after);
		let status = response.status();
		let success = status.is_success();
		let body = match decode_body(response.body()) {
			Ok(body) => body,
			// Non-2xx error pages are often HTML; the status alone classifies them.
			Err(_) if !success => None,
			Err(source) =>
				return Err(TransientError::ResponseParse {
					stage,
					source,
					status: Some(status.as_u16()),
				}
				.into()),
		};

		Ok(ProviderResponse { status: status.as_u16(), success, body, retry_after })
	}

	fn ensure_not_rejected(&self, stage: ExchangeStage, response: &ProviderResponse) -> Result<()> {
		let status = (!response.success).then_some(response.status);

		if let Some(reason) =
			response.body.as_ref().and_then(|body| self.strategy.rejection_reason(body))
		{
			return Err(self.rejected(stage, reason, status));
		}
		if let Some(status) = status {
			return Err(TransientError::UnexpectedStatus {
				stage,
				status,
				retry_after: response.retry_after,
			}
			.into());
		}

		Ok(())
	}

	fn rejected(&self, stage: ExchangeStage, reason: impl Into<String>, status: Option<u16>) -> Error {
		let reason = reason.into();

		#[cfg(feature = "tracing")]
		tracing::warn!(
			provider = self.strategy.provider(),
			%stage,
			?status,
			%reason,
			"provider rejected the exchange"
		);

		Error::Rejected { provider: self.strategy.provider().to_owned(), stage, reason, status }
	}
}

fn decode_body(
	bytes: &[u8],
) -> Result<Option<Value>, serde_path_to_error::Error<serde_json::Error>> {
	if bytes.iter().all(u8::is_ascii_whitespace) {
		return Ok(None);
	}

	let mut deserializer = serde_json::Deserializer::from_slice(bytes);

	serde_path_to_error::deserialize(&mut deserializer).map(Some)
}
