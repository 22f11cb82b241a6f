//! Demonstrates the identifier/password login handler against a mocked Strapi instance, with
//! closure callbacks rendering the success and error outcomes.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
// self
use credential_broker::{
	auth::AuthResult,
	config::ProviderConfig,
	error::Error,
	flows::ReqwestBroker,
	handler::{Callbacks, LocalAuthHandler},
	http::ReqwestHttpClient,
	provider::StrapiStrategy,
	reqwest::Client,
	transport::{
		ReqwestTransportErrorMapper,
		oauth2::http::{Request, StatusCode},
	},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/auth/local")
				.json_body(json!({ "identifier": "ada@example.com", "password": "hunter2" }));
			then.status(200).json_body(json!({ "jwt": "demo-jwt", "user": { "id": 1 } }));
		})
		.await;
	let profile_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/users/me").header("authorization", "Bearer demo-jwt");
			then.status(200).json_body(json!({ "id": 1, "username": "ada" }));
		})
		.await;
	let http_client = ReqwestHttpClient::with_client(
		Client::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()?,
	);
	let broker = ReqwestBroker::with_http_client(
		std::sync::Arc::new(StrapiStrategy),
		http_client,
		ReqwestTransportErrorMapper,
	);
	let outcome = Callbacks::new(
		|_: Request<Vec<u8>>, result: AuthResult| async move {
			(StatusCode::OK, format!("Welcome {}.", result.user["username"]))
		},
		|_: Request<Vec<u8>>, error: Error| async move {
			let status = StatusCode::from_u16(error.status_code())
				.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

			(status, error.to_string())
		},
	);
	let handler = LocalAuthHandler::new(broker, outcome)
		.with_config(ProviderConfig::with_domain(server.base_url()));
	let request = Request::builder()
		.method("POST")
		.uri("/auth/strapi")
		.header("content-type", "application/json")
		.body(br#"{"identifier":"ada@example.com","password":"hunter2"}"#.to_vec())?;
	let (status, body) = handler.handle(request).await?;

	println!("Login responded with {status}: {body}");

	token_mock.assert_async().await;
	profile_mock.assert_async().await;

	Ok(())
}
