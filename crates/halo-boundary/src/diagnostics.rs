//! Non-finite value diagnostics.

use halo_arena::FieldState;
use halo_core::{Dir, Index3, Staging, VarLayout};
use halo_grid::BlockGeometry;

use crate::window::IndexWindow;

/// Locations reported in detail before the scan only counts.
pub const MAX_REPORTED: usize = 10;

/// One NaN found by [`check_nan`].
#[derive(Clone, Debug, PartialEq)]
pub struct NanLocation {
    /// Variable or face component name.
    pub var: String,
    /// Global cell index (ghosts excluded, decomposition offset applied).
    pub global: Index3,
    /// Physical position. For face components the coordinate along the
    /// component's direction is the face position.
    pub position: [f64; 3],
}

/// Result of a NaN scan.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NanReport {
    /// Total NaN values found.
    pub count: usize,
    /// The first [`MAX_REPORTED`] of them.
    pub locations: Vec<NanLocation>,
}

impl NanReport {
    /// No NaN was found.
    pub fn is_clean(&self) -> bool {
        self.count == 0
    }

    fn record(&mut self, rank: usize, location: impl FnOnce() -> NanLocation) {
        self.count += 1;
        if self.locations.len() < MAX_REPORTED {
            let location = location();
            log::error!(
                "[rank {rank}] NaN in {} at global {:?}, x = {:?}",
                location.var,
                location.global,
                location.position
            );
            self.locations.push(location);
        }
    }
}

fn global_index(block: &BlockGeometry, p: Index3) -> Index3 {
    let mut g = [0; 3];
    for d in Dir::ALL {
        let ax = block.axis(d);
        g[d.index()] = p[d.index()] - ax.beg() + ax.offset;
    }
    g
}

/// Scan the interior of every array for NaN.
///
/// The first [`MAX_REPORTED`] hits are logged at error level with
/// `rank` in the message; the rest are only counted.
pub fn check_nan(
    block: &BlockGeometry,
    layout: &VarLayout,
    state: &FieldState,
    rank: usize,
) -> NanReport {
    let mut report = NanReport::default();

    let window = IndexWindow::interior(block, Staging::Cell);
    for n in 0..state.vc.nvar() {
        window.for_each(|p| {
            if state.vc[(n, p)].is_nan() {
                report.record(rank, || NanLocation {
                    var: layout.name(n).unwrap_or("?").to_string(),
                    global: global_index(block, p),
                    position: block.position(p),
                });
            }
        });
    }

    if let Some(vs) = state.vs.as_ref() {
        for (d, b) in vs.iter() {
            let window = IndexWindow::interior(block, Staging::Face(d));
            window.for_each(|p| {
                if b[p].is_nan() {
                    report.record(rank, || {
                        let mut position = [0.0; 3];
                        for a in Dir::ALL {
                            let ax = block.axis(a);
                            position[a.index()] = if a == d {
                                ax.face(p[a.index()])
                            } else {
                                ax.x[p[a.index()]]
                            };
                        }
                        NanLocation {
                            var: VarLayout::face_name(d).to_string(),
                            global: global_index(block, p),
                            position,
                        }
                    });
                }
            });
        }
    }

    if report.count > MAX_REPORTED {
        log::error!(
            "[rank {rank}] {} further NaN values not shown",
            report.count - MAX_REPORTED
        );
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use halo_core::Physics;
    use halo_grid::{AxisSpec, Geometry, Grid};

    fn block() -> BlockGeometry {
        Grid::builder(Geometry::Cartesian, 2)
            .axis(Dir::X1, AxisSpec::new(0.0, 1.0, 4))
            .axis(Dir::X2, AxisSpec::new(0.0, 1.0, 4))
            .build()
            .unwrap()
            .single_block()
            .unwrap()
    }

    #[test]
    fn clean_state_reports_nothing() {
        let block = block();
        let layout = Physics::mhd(2).layout().unwrap();
        let state = FieldState::zeros(block.shape(), &layout);
        assert!(check_nan(&block, &layout, &state, 0).is_clean());
    }

    #[test]
    fn ghost_nans_are_ignored() {
        let block = block();
        let layout = Physics::hydro(2).layout().unwrap();
        let mut state = FieldState::zeros(block.shape(), &layout);
        state.vc[(0, [0, 0, 0])] = f64::NAN;
        assert!(check_nan(&block, &layout, &state, 0).is_clean());
    }

    #[test]
    fn interior_nans_are_located() {
        let block = block();
        let layout = Physics::mhd(2).layout().unwrap();
        let mut state = FieldState::zeros(block.shape(), &layout);
        let vx2 = layout.vx(Dir::X2).unwrap();
        state.vc[(vx2, [3, 2, 0])] = f64::NAN;
        if let Some(b) = state.vs.as_mut().and_then(|vs| vs.comp_mut(Dir::X1)) {
            b[[6, 2, 0]] = f64::NAN;
        }
        let report = check_nan(&block, &layout, &state, 3);
        assert_eq!(report.count, 2);
        assert_eq!(report.locations[0].var, "VX2");
        assert_eq!(report.locations[0].global, [1, 0, 0]);
        assert!((report.locations[0].position[0] - 0.375).abs() < 1e-14);
        assert_eq!(report.locations[1].var, "BX1s");
        assert_eq!(report.locations[1].global, [4, 0, 0]);
        assert!((report.locations[1].position[0] - 1.0).abs() < 1e-14);
    }

    #[test]
    fn only_the_first_few_are_kept() {
        let block = block();
        let layout = Physics::hydro(2).layout().unwrap();
        let mut state = FieldState::zeros(block.shape(), &layout);
        state.vc.fill(f64::NAN);
        let report = check_nan(&block, &layout, &state, 0);
        assert_eq!(report.count, 16 * layout.nvar());
        assert_eq!(report.locations.len(), MAX_REPORTED);
    }
}
