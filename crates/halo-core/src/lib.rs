//! Core types for the Halo boundary layer.
//!
//! This crate defines the identifiers every other Halo crate speaks in
//! ([`Dir`], [`Side`], [`Staging`]), the [`Physics`] capability with the
//! [`VarLayout`] it resolves to, and the [`BoundaryError`] taxonomy.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod physics;

pub use error::{BoundaryError, HookKind};
pub use id::{Dir, Index3, Side, Staging};
pub use physics::{Physics, VarLayout};
