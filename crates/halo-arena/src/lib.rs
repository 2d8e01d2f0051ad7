//! Block-local field storage for Halo.
//!
//! # Layout
//!
//! ```text
//! FieldState
//! ├── vc: Array4          (var × k × j × i, ghosts included)
//! └── vs: Option<FaceField>
//!     └── Array3 × dims   (BX1s, BX2s, BX3s; +1 along own axis)
//! ScratchRegion           (reused double-buffer for boundary passes)
//! ```
//!
//! Nothing here knows about boundaries; the arrays are plain dense
//! storage indexed in axis order.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod array;
pub mod scratch;
pub mod state;

pub use array::{flat_offset, unflatten, Array3, Array4};
pub use scratch::ScratchRegion;
pub use state::{staged_shape, FaceField, FieldState};
