// src/probe/outcome.rs
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Classification of one probe.
///
/// `Success` means a response came back, whatever its status code. Only
/// transport-level problems are `Failure`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProbeStatus {
    Success { code: u16 },
    Failure { message: String },
}

impl ProbeStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, ProbeStatus::Success { .. })
    }

    pub fn code(&self) -> Option<u16> {
        match self {
            ProbeStatus::Success { code } => Some(*code),
            ProbeStatus::Failure { .. } => None,
        }
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeStatus::Success { code } => write!(f, "{}", code),
            ProbeStatus::Failure { .. } => f.write_str("Error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeOutcome {
    pub target: String,
    pub status: ProbeStatus,
    pub body_excerpt: String,
    #[serde(rename = "latency_secs", serialize_with = "serialize_secs")]
    pub latency: Duration,
}

impl ProbeOutcome {
    pub fn success(target: impl Into<String>, code: u16, body: &str, limit: usize, latency: Duration) -> Self {
        Self {
            target: target.into(),
            status: ProbeStatus::Success { code },
            body_excerpt: excerpt(body, limit),
            latency,
        }
    }

    pub fn failure(target: impl Into<String>, message: impl Into<String>, latency: Duration) -> Self {
        let message = message.into();
        Self {
            target: target.into(),
            body_excerpt: message.clone(),
            status: ProbeStatus::Failure { message },
            latency,
        }
    }
}

/// First `limit` characters of `body`.
pub fn excerpt(body: &str, limit: usize) -> String {
    body.chars().take(limit).collect()
}

pub(crate) fn serialize_secs<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_f64(duration.as_secs_f64())
}
