//! Provider-facing wire contract (stages) and strategies (behavior).
//!
//! `stage` names the two outbound calls of a credential exchange so errors, spans, and
//! metrics can tell them apart. `strategy` defines [`ProviderStrategy`], an
//! HTTP-client-agnostic hook used by flows to locate the provider endpoints and read the
//! few fields the protocol inspects (`jwt`, `error`) out of otherwise opaque payloads.

pub mod stage;
pub mod strategy;

pub use stage::*;
pub use strategy::*;
