//! Core types shared across the resident proxy crates
//!
//! - **Correlation types**: RequestId, TraceId, RequestContext
//! - **Sensitive data**: `Sensitive<T>` marker and VID masking
//! - **Schema constants**: canonical log fields and error metadata keys

pub mod correlation;
pub mod schema;
pub mod sensitive;

pub use correlation::{RequestContext, RequestId, TraceId};
pub use sensitive::{mask, Sensitive};
