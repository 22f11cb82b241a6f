//! Optional observability helpers for credential exchanges.
//!
//! # Feature Flags
//!
//! - `tracing`: each exchange runs in a `credential_broker.flow` span carrying `provider`,
//!   `operation`, and the `stage` of the provider call in flight; rejections and incomplete
//!   configuration are logged as warnings.
//! - `metrics`: `credential_broker_flow_total{provider, outcome}` counts attempts, successes,
//!   and failures; `credential_broker_stage_failure_total{provider, stage}` tells token-call
//!   failures from profile-call failures.

mod metrics;
mod tracing;

pub use self::metrics::*;
pub use self::tracing::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded for each exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a broker helper.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
