// std
use std::collections::VecDeque;
// crates.io
use serde_json::json;
// self
use credential_broker::{
	_preludet::*,
	auth::Credentials,
	config::ProviderConfig,
	error::{ConfigError, Error, Result, TransientError, TransportError},
	flows::Broker,
	http::{ProviderHttpClient, ResponseMetadata, ResponseMetadataSlot},
	provider::{ExchangeStage, ProviderStrategy, StrapiStrategy},
	transport::{
		TransportErrorMapper,
		oauth2::{
			AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse,
			http::{Method, StatusCode},
		},
	},
};

const DOMAIN: &str = "https://cms.example.com";

#[derive(Debug)]
enum FakeTransportError {
	Throttled,
}
impl Display for FakeTransportError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Throttled => write!(f, "Transport throttled."),
		}
	}
}
impl StdError for FakeTransportError {}

#[derive(Clone, Debug)]
struct RecordedRequest {
	method: Method,
	uri: String,
	authorization: Option<String>,
	body: Vec<u8>,
}

/// Scripted reply: an HTTP status + body, or a transport failure with metadata.
enum Reply {
	Json(u16, serde_json::Value),
	Throttled(Duration),
}

#[derive(Clone, Default)]
struct FakeHttpClient {
	replies: Arc<Mutex<VecDeque<Reply>>>,
	requests: Arc<Mutex<Vec<RecordedRequest>>>,
}
impl FakeHttpClient {
	fn scripted(replies: impl IntoIterator<Item = Reply>) -> Self {
		Self { replies: Arc::new(Mutex::new(replies.into_iter().collect())), ..Default::default() }
	}

	fn recorded(&self) -> Vec<RecordedRequest> {
		self.requests.lock().clone()
	}
}
impl ProviderHttpClient for FakeHttpClient {
	type Handle = FakeHttpHandle;
	type TransportError = FakeTransportError;

	fn with_metadata(&self, slot: ResponseMetadataSlot) -> Self::Handle {
		FakeHttpHandle { slot, client: self.clone() }
	}
}

struct FakeHttpHandle {
	slot: ResponseMetadataSlot,
	client: FakeHttpClient,
}
impl<'a> AsyncHttpClient<'a> for FakeHttpHandle {
	type Error = HttpClientError<FakeTransportError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'a + Send + Sync>>;

	fn call(&'a self, request: HttpRequest) -> Self::Future {
		let slot = self.slot.clone();
		let client = self.client.clone();

		Box::pin(async move {
			assert!(
				slot.take().is_none(),
				"ResponseMetadataSlot must be clear before dispatching a request."
			);

			client.requests.lock().push(RecordedRequest {
				method: request.method().clone(),
				uri: request.uri().to_string(),
				authorization: request
					.headers()
					.get("authorization")
					.and_then(|value| value.to_str().ok())
					.map(ToOwned::to_owned),
				body: request.body().clone(),
			});

			let reply = client.replies.lock().pop_front().expect("Fake transport ran out of replies.");

			match reply {
				Reply::Json(status, body) => {
					slot.store(ResponseMetadata { status: Some(status), retry_after: None });

					let mut response = HttpResponse::new(
						serde_json::to_vec(&body).expect("Scripted body should serialize."),
					);

					*response.status_mut() =
						StatusCode::from_u16(status).expect("Scripted status should be valid.");

					Ok(response)
				},
				Reply::Throttled(retry_after) => {
					slot.store(ResponseMetadata { status: Some(429), retry_after: Some(retry_after) });

					Err(HttpClientError::Reqwest(Box::new(FakeTransportError::Throttled)))
				},
			}
		})
	}
}

#[derive(Clone, Default)]
struct RecordingTransportErrorMapper {
	seen: Arc<Mutex<Vec<(ExchangeStage, Option<ResponseMetadata>)>>>,
}
impl RecordingTransportErrorMapper {
	fn recorded(&self) -> Vec<(ExchangeStage, Option<ResponseMetadata>)> {
		self.seen.lock().clone()
	}
}
impl TransportErrorMapper<FakeTransportError> for RecordingTransportErrorMapper {
	fn map_transport_error(
		&self,
		stage: ExchangeStage,
		meta: Option<&ResponseMetadata>,
		err: HttpClientError<FakeTransportError>,
	) -> Error {
		self.seen.lock().push((stage, meta.cloned()));

		match err {
			HttpClientError::Reqwest(inner) => TransportError::network(stage, *inner).into(),
			HttpClientError::Http(inner) => ConfigError::from(inner).into(),
			HttpClientError::Io(inner) => TransportError::Io(inner).into(),
			HttpClientError::Other(message) =>
				TransientError::Client { stage, message, status: meta.and_then(|m| m.status) }.into(),
			other => TransientError::Client {
				stage,
				message: format!("{other:?}"),
				status: meta.and_then(|m| m.status),
			}
			.into(),
		}
	}
}

fn build_broker(
	http_client: FakeHttpClient,
	mapper: RecordingTransportErrorMapper,
) -> Broker<FakeHttpClient, RecordingTransportErrorMapper> {
	let strategy: Arc<dyn ProviderStrategy> = Arc::new(StrapiStrategy);

	Broker::with_http_client(strategy, http_client, mapper)
		.with_defaults(ProviderConfig::with_domain(DOMAIN))
}

#[tokio::test]
async fn fake_transport_sees_sequential_calls_with_bearer_token() {
	let http_client = FakeHttpClient::scripted([
		Reply::Json(200, json!({ "jwt": "T" })),
		Reply::Json(200, json!({ "id": 1, "name": "x" })),
	]);
	let broker = build_broker(http_client.clone(), RecordingTransportErrorMapper::default());
	let result = broker
		.authenticate(&ProviderConfig::default(), Credentials::new("ada", "hunter2"))
		.await
		.expect("Scripted exchange should succeed.");
	let requests = http_client.recorded();

	assert_eq!(result.tokens.access_token.expose(), "T");
	assert_eq!(requests.len(), 2);
	assert_eq!(requests[0].method, Method::POST);
	assert_eq!(requests[0].uri, "https://cms.example.com/auth/local");
	assert_eq!(requests[0].authorization, None);
	assert_eq!(
		serde_json::from_slice::<serde_json::Value>(&requests[0].body)
			.expect("Token request body should be JSON."),
		json!({ "identifier": "ada", "password": "hunter2" })
	);
	assert_eq!(requests[1].method, Method::GET);
	assert_eq!(requests[1].uri, "https://cms.example.com/users/me");
	assert_eq!(requests[1].authorization.as_deref(), Some("Bearer T"));
	assert!(requests[1].body.is_empty());
}

#[tokio::test]
async fn fake_mapper_captures_stage_and_metadata() {
	let http_client = FakeHttpClient::scripted([Reply::Throttled(Duration::seconds(30))]);
	let mapper = RecordingTransportErrorMapper::default();
	let broker = build_broker(http_client.clone(), mapper.clone());
	let err = broker
		.authenticate(&ProviderConfig::default(), Credentials::new("ada", "hunter2"))
		.await
		.expect_err("Throttled transports must fail the exchange.");

	assert!(matches!(
		err,
		Error::Transport(TransportError::Network { stage: ExchangeStage::TokenExchange, .. })
	));
	assert_eq!(http_client.recorded().len(), 1, "Profile fetch must never be issued.");

	let observed = mapper.recorded();

	assert_eq!(observed.len(), 1, "Mapper must record a single failure.");

	let (stage, meta) = observed.first().cloned().expect("Mapper should record the failure.");
	let meta = meta.expect("Response metadata should be recorded.");

	assert_eq!(stage, ExchangeStage::TokenExchange);
	assert_eq!(meta.status, Some(429));
	assert_eq!(meta.retry_after, Some(Duration::seconds(30)));
}

#[tokio::test]
async fn profile_transport_failure_is_tagged_with_its_stage() {
	let http_client = FakeHttpClient::scripted([
		Reply::Json(200, json!({ "jwt": "T" })),
		Reply::Throttled(Duration::seconds(5)),
	]);
	let mapper = RecordingTransportErrorMapper::default();
	let broker = build_broker(http_client.clone(), mapper.clone());
	let err = broker
		.authenticate(&ProviderConfig::default(), Credentials::new("ada", "hunter2"))
		.await
		.expect_err("Profile transport failures must fail the exchange.");

	assert_eq!(err.stage(), Some(ExchangeStage::ProfileFetch));
	assert_eq!(err.status_code(), 502);
	assert_eq!(http_client.recorded().len(), 2);
	assert_eq!(mapper.recorded()[0].0, ExchangeStage::ProfileFetch);
}
