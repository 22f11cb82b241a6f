//! Auth-domain models: inbound credentials, redacted secrets, and the normalized result.

pub mod credentials;
pub mod result;
pub mod secret;

pub use credentials::*;
pub use result::*;
pub use secret::*;
