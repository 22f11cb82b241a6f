// self
use crate::{obs::FlowOutcome, provider::ExchangeStage};

/// Counts one exchange attempt, success, or failure for `provider`.
///
/// Emits `credential_broker_flow_total{provider, outcome}` when the `metrics` feature is on.
pub fn record_flow_outcome(provider: &str, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"credential_broker_flow_total",
			"provider" => provider.to_owned(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	let _ = (provider, outcome);
}

/// Counts a failed exchange against the provider call that caused it.
///
/// Emits `credential_broker_stage_failure_total{provider, stage}`; failures raised before any
/// call (configuration problems) are labeled `stage="none"`.
pub fn record_stage_failure(provider: &str, stage: Option<ExchangeStage>) {
	let stage = stage.map_or("none", ExchangeStage::as_str);

	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"credential_broker_stage_failure_total",
			"provider" => provider.to_owned(),
			"stage" => stage
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	let _ = (provider, stage);
}
