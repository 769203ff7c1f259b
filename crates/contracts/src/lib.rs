//! # Contracts
//!
//! Frozen interface contracts (ICD), defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Batch Model
//! - A batch is one fan-out call: an ordered sequence of requests, a
//!   concurrency budget, and an optional deadline covering the whole call
//! - Request identity is the input index; outcomes keep the input order

mod batch;
mod error;
mod fetch;
mod operation;
mod outcome;
mod plan;

pub use batch::*;
pub use error::*;
pub use fetch::*;
pub use operation::{LocalOperation, Operation};
pub use outcome::*;
pub use plan::*;
