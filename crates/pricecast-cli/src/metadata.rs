use std::fmt::{Display, Formatter};

use pricecast_core::{EnvelopeMeta, ProviderId, ValidationError};
use uuid::Uuid;

/// Request identifier (UUID v4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for RequestId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// W3C-style 16-byte hex trace id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TraceId(String);

impl TraceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TraceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-invocation metadata, turned into [`EnvelopeMeta`] once the command
/// finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub request_id: RequestId,
    pub trace_id: TraceId,
    pub source_chain: Vec<ProviderId>,
    pub latency_ms: u64,
    pub warnings: Vec<String>,
}

impl Metadata {
    pub fn new(source_chain: Vec<ProviderId>, latency_ms: u64) -> Result<Self, ValidationError> {
        if source_chain.is_empty() {
            return Err(ValidationError::EmptySourceChain);
        }

        Ok(Self {
            request_id: RequestId::new_v4(),
            trace_id: TraceId::new(),
            source_chain,
            latency_ms,
            warnings: Vec::new(),
        })
    }

    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn into_envelope_meta(self) -> Result<EnvelopeMeta, ValidationError> {
        let mut meta = EnvelopeMeta::new(
            self.request_id.to_string(),
            self.source_chain,
            self.latency_ms,
        )?
        .with_trace_id(self.trace_id.to_string())?;

        for warning in self.warnings {
            meta.push_warning(warning);
        }

        Ok(meta)
    }
}
