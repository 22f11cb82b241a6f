//! Identifier/password exchange: token call, then profile call.
//!
//! [`Broker::exchange_credentials`] issues `POST {domain}/auth/local` and, only when that
//! yields an access token, `GET {domain}/users/me` with the token as a bearer credential.
//! The calls are strictly sequential and nothing is cached between invocations.

// self
use crate::{
	_prelude::*,
	auth::{AuthResult, Credentials},
	config::{ProviderConfig, ResolvedConfig},
	flows::Broker,
	http::ProviderHttpClient,
	obs::{self, FlowOutcome, FlowSpan},
	provider::ExchangeStage,
	transport::{ProviderFacade, TransportErrorMapper},
};

impl<C, M> Broker<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Resolves configuration from `overrides`, then performs the full exchange.
	pub async fn authenticate(
		&self,
		overrides: &ProviderConfig,
		credentials: Credentials,
	) -> Result<AuthResult> {
		let config = self.resolve_config(overrides)?;

		self.exchange_credentials(&config, credentials).await
	}

	/// Exchanges credentials for an access token and resolves the user's profile.
	pub async fn exchange_credentials(
		&self,
		config: &ResolvedConfig,
		credentials: Credentials,
	) -> Result<AuthResult> {
		let provider = self.strategy.provider();
		let span = FlowSpan::new(provider, "exchange_credentials");
		let stages = span.clone();

		obs::record_flow_outcome(provider, FlowOutcome::Attempt);

		let result: Result<AuthResult> = span
			.instrument(async move {
				let token_endpoint =
					config.endpoint(self.strategy.path(ExchangeStage::TokenExchange))?;
				let profile_endpoint =
					config.endpoint(self.strategy.path(ExchangeStage::ProfileFetch))?;
				let facade = ProviderFacade::new(
					self.http_client.as_ref(),
					self.transport_mapper.as_ref(),
					self.strategy.as_ref(),
				);

				stages.enter_stage(ExchangeStage::TokenExchange);

				let access_token = facade.exchange_credentials(&token_endpoint, &credentials).await?;

				#[cfg(feature = "tracing")]
				tracing::debug!("access token issued, fetching profile");

				stages.enter_stage(ExchangeStage::ProfileFetch);

				let user = facade.fetch_profile(&profile_endpoint, &access_token).await?;

				Ok(AuthResult::new(access_token, user))
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(provider, FlowOutcome::Success),
			Err(err) => {
				obs::record_flow_outcome(provider, FlowOutcome::Failure);
				obs::record_stage_failure(provider, err.stage());
			},
		}

		result
	}
}
