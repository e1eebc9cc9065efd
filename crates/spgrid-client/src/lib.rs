//! SPGRID Client - the single multiplexed procedure endpoint
//!
//! Every grid operation is a POST of the same JSON envelope:
//!
//! ```text
//! { "Name": <procedure>, "Parameters": { "@kind": <1..6>, ...extra } }
//! ```
//!
//! [`RemoteProcedureClient::call`] never fails loudly: transport faults and
//! non-JSON bodies are logged and surface as `None`, which callers treat as
//! "operation failed". [`RemoteProcedureClient::try_call`] exposes the
//! underlying [`ClientError`] for callers that want it.

mod client;
mod error;
mod transport;

pub use client::{ProcedureEnvelope, ProcedureParams, RemoteProcedureClient};
pub use error::{ClientError, ClientResult};
pub use transport::{HttpTransport, ProcedureTransport};
