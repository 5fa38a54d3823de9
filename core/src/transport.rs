//! The seam between the core and whatever performs the network exchange.
//!
//! # Design
//! The core never opens sockets, negotiates TLS or follows redirects. A host
//! implements [`Transport`] on top of its HTTP primitive of choice; the core
//! only classifies the result as "failed" or "produced data". Closures with
//! the right signature are transports too, which keeps tests free of I/O.

use thiserror::Error;

use crate::http::{RequestContext, TransportOutcome};

/// A failed exchange, with the transport's own diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportFailure {
    pub message: String,
}

impl TransportFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Performs one HTTP exchange described by a rendered [`RequestContext`].
pub trait Transport {
    fn execute(&self, context: RequestContext<'_>) -> Result<TransportOutcome, TransportFailure>;
}

impl<F> Transport for F
where
    F: Fn(RequestContext<'_>) -> Result<TransportOutcome, TransportFailure>,
{
    fn execute(&self, context: RequestContext<'_>) -> Result<TransportOutcome, TransportFailure> {
        self(context)
    }
}
