//! Durable job record storage.
//!
//! The pipeline and the API only ever talk to the [`JobStore`] trait;
//! the backing store is an injected collaborator. [`MemoryJobStore`] is
//! the in-process implementation used by the single-binary deployment
//! and by tests.
//!
//! The status transition invariant is enforced here, at the store
//! boundary: a job moves out of `processing` exactly once, and never
//! out of a terminal state.

pub mod error;
pub mod job_store;
pub mod memory;

pub use error::{StoreError, StoreResult};
pub use job_store::JobStore;
pub use memory::MemoryJobStore;
