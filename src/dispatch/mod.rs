// src/dispatch/mod.rs
mod backend_set;
mod dispatcher;
mod round_robin;

pub use backend_set::BackendSet;
pub use dispatcher::{Dispatcher, RunResult};
pub use round_robin::RoundRobinCycle;

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Backend set is empty; nothing to dispatch to")]
    EmptyBackendSet,
}
