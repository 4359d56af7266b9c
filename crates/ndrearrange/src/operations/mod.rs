//! Tensor operations.
//!
//! ```text
//! Level 1: pattern API (rearrange, Pattern::apply)
//!     → build a RearrangePlan
//!     → reshape / permutedims / broadcast
//!
//! Level 2: movement API (permutedims, broadcast)
//!     → validate, allocate output
//!     → dispatch to backend
//!
//! Level 3: backend implementation (GenericBackend)
//! ```

mod broadcast;
mod permutedims;
mod rearrange;

pub use broadcast::broadcast;
pub use permutedims::{is_identity, permutedims, permutedims_into};
pub use rearrange::{RearrangePlan, rearrange};
