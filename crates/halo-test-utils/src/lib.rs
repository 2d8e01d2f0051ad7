//! Test utilities and mock types for Halo development.
//!
//! Provides block and field fixtures ([`fixtures`]) and a
//! [`RecordingExchange`] that stands in for a real rank exchange.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::sync::{Arc, Mutex};

use halo_arena::FieldState;
use halo_boundary::{pack_slab, unpack_slab, HaloExchange};
use halo_core::{BoundaryError, Dir, Side};
use halo_grid::BlockGeometry;

/// Shared, ordered record of events seen by mocks and hooks.
#[derive(Clone, Debug, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// Mock [`HaloExchange`] that records every call.
///
/// In loopback mode the block acts as its own neighbour on both sides,
/// so the exchanged ghosts equal a periodic fill of the block.
pub struct RecordingExchange {
    pub log: EventLog,
    pub loopback: bool,
}

impl RecordingExchange {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            loopback: false,
        }
    }

    pub fn loopback(log: EventLog) -> Self {
        Self {
            log,
            loopback: true,
        }
    }
}

impl HaloExchange for RecordingExchange {
    fn exchange_axis(
        &mut self,
        dir: Dir,
        block: &BlockGeometry,
        state: &mut FieldState,
    ) -> Result<(), BoundaryError> {
        self.log.push(format!("exchange {dir}"));
        if self.loopback {
            let mut to_right = Vec::new();
            let mut to_left = Vec::new();
            pack_slab(block, state, dir, Side::Right, &mut to_right);
            pack_slab(block, state, dir, Side::Left, &mut to_left);
            unpack_slab(block, state, dir, Side::Left, &to_right)?;
            unpack_slab(block, state, dir, Side::Right, &to_left)?;
        }
        Ok(())
    }
}
