// src/dispatch/backend_set.rs
use crate::dispatch::DispatchError;
use std::ops::Deref;

/// Ordered, non-empty list of backend identities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendSet {
    ids: Vec<String>,
}

impl BackendSet {
    pub fn new<I, S>(ids: I) -> Result<Self, DispatchError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids: Vec<String> = ids.into_iter().map(Into::into).collect();
        if ids.is_empty() {
            return Err(DispatchError::EmptyBackendSet);
        }
        Ok(Self { ids })
    }

    pub fn as_slice(&self) -> &[String] {
        &self.ids
    }
}

impl Deref for BackendSet {
    type Target = [String];

    fn deref(&self) -> &[String] {
        &self.ids
    }
}
