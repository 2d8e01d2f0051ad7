//! In-process ghost exchange between the blocks of a decomposed grid.
//!
//! [`ChannelMesh`] wires one bounded channel per directed link of a
//! [`CartTopology`] and hands each rank a [`ChannelExchange`] endpoint.
//! Each rank runs its own [`Boundary`](halo_boundary::Boundary), usually
//! on its own thread; the endpoints implement
//! [`HaloExchange`], so the boundary driver calls them for every
//! decomposed direction.
//!
//! An exchange sends both slabs of a direction before receiving either,
//! so two ranks exchanging with each other never wait on one another.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

use std::fmt;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

use halo_arena::FieldState;
use halo_boundary::{pack_slab, unpack_slab, HaloExchange};
use halo_core::{BoundaryError, Dir, Side};
use halo_grid::{BlockGeometry, CartTopology};

/// How long a receive waits before the peer is declared lost.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// ── Errors ─────────────────────────────────────────────────────────

/// Errors from a channel exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExchangeError {
    /// The neighbour's endpoint was dropped.
    Disconnected {
        /// Rank that was lost.
        peer: usize,
    },
    /// The neighbour did not send within the timeout.
    Timeout {
        /// Rank that was waited on.
        peer: usize,
        /// How long the receive waited.
        waited: Duration,
    },
}

impl fmt::Display for ExchangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected { peer } => write!(f, "rank {peer} disconnected"),
            Self::Timeout { peer, waited } => {
                write!(f, "no slab from rank {peer} after {waited:?}")
            }
        }
    }
}

impl std::error::Error for ExchangeError {}

impl ExchangeError {
    fn into_boundary(self, dir: Dir) -> BoundaryError {
        BoundaryError::Exchange {
            dir,
            reason: self.to_string(),
        }
    }
}

// ── Endpoint ───────────────────────────────────────────────────────

struct Link {
    peer: usize,
    tx: Sender<Vec<f64>>,
    rx: Receiver<Vec<f64>>,
}

/// One rank's end of a [`ChannelMesh`].
pub struct ChannelExchange {
    rank: usize,
    links: [[Option<Link>; 2]; 3],
    timeout: Duration,
}

impl ChannelExchange {
    /// Rank this endpoint belongs to.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Neighbour across `side` of `dir`, if this rank exchanges there.
    pub fn peer(&self, dir: Dir, side: Side) -> Option<usize> {
        self.link(dir, side).map(|l| l.peer)
    }

    /// Set how long a receive waits for a neighbour.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn link(&self, dir: Dir, side: Side) -> Option<&Link> {
        self.links[dir.index()][side.offset()].as_ref()
    }
}

impl HaloExchange for ChannelExchange {
    fn exchange_axis(
        &mut self,
        dir: Dir,
        block: &BlockGeometry,
        state: &mut FieldState,
    ) -> Result<(), BoundaryError> {
        for side in Side::BOTH {
            if let Some(link) = self.link(dir, side) {
                let mut slab = Vec::new();
                pack_slab(block, state, dir, side, &mut slab);
                log::trace!(
                    "rank {} -> {}: {dir} {side}, {} values",
                    self.rank,
                    link.peer,
                    slab.len()
                );
                link.tx
                    .send(slab)
                    .map_err(|_| ExchangeError::Disconnected { peer: link.peer }.into_boundary(dir))?;
            }
        }
        for side in Side::BOTH {
            if let Some(link) = self.link(dir, side) {
                let slab = link.rx.recv_timeout(self.timeout).map_err(|e| {
                    let err = match e {
                        RecvTimeoutError::Timeout => ExchangeError::Timeout {
                            peer: link.peer,
                            waited: self.timeout,
                        },
                        RecvTimeoutError::Disconnected => {
                            ExchangeError::Disconnected { peer: link.peer }
                        }
                    };
                    err.into_boundary(dir)
                })?;
                unpack_slab(block, state, dir, side, &slab)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ChannelExchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let peers: Vec<(Dir, Side, usize)> = Dir::ALL
            .into_iter()
            .flat_map(|d| Side::BOTH.into_iter().map(move |s| (d, s)))
            .filter_map(|(d, s)| Some((d, s, self.peer(d, s)?)))
            .collect();
        f.debug_struct("ChannelExchange")
            .field("rank", &self.rank)
            .field("peers", &peers)
            .field("timeout", &self.timeout)
            .finish()
    }
}

// ── Mesh ───────────────────────────────────────────────────────────

/// Channels connecting every rank of a topology to its neighbours.
pub struct ChannelMesh {
    endpoints: Vec<Option<ChannelExchange>>,
}

impl ChannelMesh {
    /// Wire every decomposed axis of `topology`.
    pub fn new(topology: CartTopology) -> Self {
        let size = topology.size();
        let mut endpoints: Vec<ChannelExchange> = (0..size)
            .map(|rank| ChannelExchange {
                rank,
                links: Default::default(),
                timeout: DEFAULT_TIMEOUT,
            })
            .collect();

        // A slab sent across `side` of `rank` arrives through the opposite
        // side of the neighbour.
        let mut receivers: Vec<[[Option<Receiver<Vec<f64>>>; 2]; 3]> =
            (0..size).map(|_| Default::default()).collect();
        let mut senders: Vec<[[Option<(usize, Sender<Vec<f64>>)>; 2]; 3]> =
            (0..size).map(|_| Default::default()).collect();
        for rank in 0..size {
            for (dir, side, peer) in topology.neighbours(rank) {
                let (tx, rx) = crossbeam_channel::bounded(1);
                senders[rank][dir.index()][side.offset()] = Some((peer, tx));
                receivers[peer][dir.index()][side.opposite().offset()] = Some(rx);
            }
        }

        for (rank, endpoint) in endpoints.iter_mut().enumerate() {
            for dir in Dir::ALL {
                for side in Side::BOTH {
                    let (d, s) = (dir.index(), side.offset());
                    if let (Some((peer, tx)), Some(rx)) =
                        (senders[rank][d][s].take(), receivers[rank][d][s].take())
                    {
                        endpoint.links[d][s] = Some(Link { peer, tx, rx });
                    }
                }
            }
        }
        log::debug!(
            "channel mesh: {} ranks, procs {:?}",
            size,
            topology.procs()
        );

        Self {
            endpoints: endpoints.into_iter().map(Some).collect(),
        }
    }

    /// Number of ranks.
    pub fn size(&self) -> usize {
        self.endpoints.len()
    }

    /// Take the endpoint of `rank`. Each endpoint can be taken once.
    pub fn take(&mut self, rank: usize) -> Option<ChannelExchange> {
        self.endpoints.get_mut(rank)?.take()
    }

    /// Every endpoint not yet taken, in rank order.
    pub fn into_endpoints(self) -> Vec<ChannelExchange> {
        self.endpoints.into_iter().flatten().collect()
    }
}
