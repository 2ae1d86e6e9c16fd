// src/probe/mod.rs
mod endpoint;
mod executor;
mod outcome;

pub use endpoint::Endpoint;
pub use executor::{HttpProbe, Probe};
pub use outcome::{excerpt, ProbeOutcome, ProbeStatus};

pub(crate) use outcome::serialize_secs;
