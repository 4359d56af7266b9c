//! Backend abstraction for data-movement kernels.
//!
//! The operations module validates arguments and allocates outputs; a backend
//! only fills a pre-shaped destination.
//!
//! # Backends
//!
//! - `GenericBackend`: naive index-mapping loops (always available)

mod broadcast;
mod generic;
mod permutation;

pub use broadcast::BroadcastBackend;
pub use generic::GenericBackend;
pub use permutation::PermutationBackend;
