//! Labels for the two provider calls, carried by errors, spans, and rejection logs.

// self
use crate::_prelude::*;

/// Outbound calls performed during a credential exchange, in protocol order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExchangeStage {
	/// `POST {domain}/auth/local` trading credentials for an access token.
	TokenExchange,
	/// `GET {domain}/users/me` resolving the authenticated profile.
	ProfileFetch,
}
impl ExchangeStage {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ExchangeStage::TokenExchange => "token_exchange",
			ExchangeStage::ProfileFetch => "profile_fetch",
		}
	}
}
impl Display for ExchangeStage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
