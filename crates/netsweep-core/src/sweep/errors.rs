use std::fmt;

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::errors::NetsweepError;
use crate::provider::errors::ProviderError;
use crate::resources::types::ResourceKind;

/// Provider call that changes state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOp {
    Delete,
    Disassociate,
    DeleteRoute,
}

impl fmt::Display for MutationOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MutationOp::Delete => write!(f, "delete"),
            MutationOp::Disassociate => write!(f, "disassociate"),
            MutationOp::DeleteRoute => write!(f, "delete route"),
        }
    }
}

/// Failures a sweep recovers from. None of them aborts the sweep.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SweepError {
    #[error("Failed to describe {kind} resources in '{scope}': {source}")]
    QueryFailed {
        kind: ResourceKind,
        scope: String,
        #[source]
        source: ProviderError,
    },

    #[error("Failed to {operation} {kind} '{id}': {source}")]
    MutationFailed {
        kind: ResourceKind,
        id: String,
        operation: MutationOp,
        #[source]
        source: ProviderError,
    },

    #[error("Timed out after {waited_secs}s waiting for {} {kind} deletion(s)", .pending.len())]
    WaitTimedOut {
        kind: ResourceKind,
        pending: Vec<String>,
        waited_secs: u64,
    },
}

impl NetsweepError for SweepError {
    fn error_code(&self) -> &'static str {
        match self {
            SweepError::QueryFailed { .. } => "SWEEP_QUERY_FAILED",
            SweepError::MutationFailed { .. } => "SWEEP_MUTATION_FAILED",
            SweepError::WaitTimedOut { .. } => "SWEEP_WAIT_TIMED_OUT",
        }
    }
}

impl Serialize for SweepError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SweepError", 2)?;
        state.serialize_field("code", self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}
