//! Operation trait - the unit of work a fan-out call applies to each request
//!
//! Defines the abstract interface between the engine and concrete I/O.

use crate::ContractError;

/// Asynchronous per-request operation
///
/// Applied independently to each request of a batch. Implementations must not
/// rely on the order in which sibling requests execute.
#[trait_variant::make(Operation: Send)]
pub trait LocalOperation {
    /// Unit of work consumed by the operation
    type Request: Send + Sync + 'static;

    /// Value produced on success
    type Output: Send + 'static;

    /// Execute the operation for one request
    ///
    /// # Errors
    /// Returns the per-request error; the engine captures it as a
    /// `Failure` outcome rather than aborting the batch.
    async fn apply(&self, request: &Self::Request) -> Result<Self::Output, ContractError>;
}
