//! Shearing-box boundary: periodic in X1 with a time-dependent shift
//! along X2.
//!
//! The ghost layers beyond each X1 face belong to a frame that slides
//! past the interior at speed `S·Lx`. After time `t` their content is the
//! periodic image shifted by `dL = (±S·Lx·t) mod Ly`. The shift is split
//! into a whole number of cells `m` and a fraction `eps ∈ [-0.5, 0.5)`;
//! the whole part is an index rotation and the fraction is a
//! conservative, Van Leer limited flux remap.
//!
//! Every remap writes into scratch and is copied back in a second pass:
//! with wrap-around, the stencil of one ghost cell can include cells that
//! another ghost cell writes.

use halo_arena::{flat_offset, FieldState, ScratchRegion};
use halo_core::{BoundaryError, Dir, Index3, Side, Staging, VarLayout};
use halo_grid::BlockGeometry;

use crate::config::check_shearing_box;
use crate::fill::enforce_periodic;
use crate::window::IndexWindow;

/// Decomposition of the shearing displacement on one side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShearShift {
    /// Whole-cell part of the displacement.
    pub m: i64,
    /// Fractional remainder in cells, in `[-0.5, 0.5)`.
    pub eps: f64,
    /// Background shear velocity `±S·Lx` added to `VX2` in the ghosts.
    pub velocity: f64,
}

impl ShearShift {
    /// Shift for the `side` ghosts at time `t`, with `ny` cells across
    /// a cross-stream length `ly`.
    pub fn new(shear_rate: f64, lx: f64, ly: f64, ny: usize, side: Side, t: f64) -> Self {
        let sign = match side {
            Side::Left => -1.0,
            Side::Right => 1.0,
        };
        let velocity = sign * shear_rate * lx;
        let dl = (velocity * t) % ly;
        let dy = ly / ny as f64;
        let cells = dl / dy;
        let m = (cells + 0.5).floor();
        Self {
            m: m as i64,
            eps: cells - m,
            velocity,
        }
    }

    /// Interior cross-stream index whose content lands on `j`.
    pub fn origin(&self, j: usize, beg: usize, ny: usize) -> usize {
        wrap(j as i64 - self.m, beg, ny)
    }
}

/// Interior index congruent to `j` modulo `ny`.
#[inline]
fn wrap(j: i64, beg: usize, ny: usize) -> usize {
    beg + (j - beg as i64).rem_euclid(ny as i64) as usize
}

/// Van Leer limited slope from the left and right differences.
///
/// Zero when the differences disagree in sign (or either vanishes),
/// otherwise their harmonic mean `2·dqm·dqp / (dqm + dqp)`.
pub fn van_leer(dqm: f64, dqp: f64) -> f64 {
    if dqp * dqm > 0.0 {
        2.0 * dqp * dqm / (dqp + dqm)
    } else {
        0.0
    }
}

/// Remapped value from the five-cell stencil `[V(jo-2), …, V(jo+2)]`.
pub fn remap_stencil(v: [f64; 5], eps: f64) -> f64 {
    let (fl, fr) = if eps >= 0.0 {
        let dqm = v[1] - v[0];
        let dqp = v[2] - v[1];
        let fl = v[1] + 0.5 * van_leer(dqm, dqp) * (1.0 - eps);
        let dqm = dqp;
        let dqp = v[3] - v[2];
        let fr = v[2] + 0.5 * van_leer(dqm, dqp) * (1.0 - eps);
        (fl, fr)
    } else {
        let dqm = v[2] - v[1];
        let dqp = v[3] - v[2];
        let fl = v[2] - 0.5 * van_leer(dqm, dqp) * (1.0 + eps);
        let dqm = dqp;
        let dqp = v[4] - v[3];
        let fr = v[3] - 0.5 * van_leer(dqm, dqp) * (1.0 + eps);
        (fl, fr)
    };
    v[2] - eps * (fr - fl)
}

/// Remap `window` of `data` by `shift` along X2, adding `offset` on copy-back.
fn remap_array(
    data: &mut [f64],
    shape: Index3,
    window: &IndexWindow,
    scratch: &mut ScratchRegion,
    shift: ShearShift,
    (beg, ny): (usize, usize),
    offset: f64,
) {
    let buf = scratch.slab(window.len());
    {
        let src: &[f64] = data;
        window.gather(buf, |p| {
            let jo = shift.origin(p[1], beg, ny) as i64;
            let at = |o: i64| src[flat_offset(shape, [p[0], wrap(jo + o, beg, ny), p[2]])];
            remap_stencil([at(-2), at(-1), at(0), at(1), at(2)], shift.eps)
        });
    }
    window.scatter_map(data, shape, buf, |v| v + offset);
}

/// Enforce the shearing-box boundary on one side of X1 at time `t`.
pub fn enforce_shearing_box(
    block: &BlockGeometry,
    layout: &VarLayout,
    state: &mut FieldState,
    scratch: &mut ScratchRegion,
    side: Side,
    t: f64,
    shear_rate: f64,
) -> Result<(), BoundaryError> {
    check_shearing_box(block, Dir::X1)?;
    if !block.is_decomposed(Dir::X1) {
        enforce_periodic(block, state, scratch, Dir::X1, side);
    }

    let ay = block.axis(Dir::X2);
    let ny = ay.cells;
    let shift = ShearShift::new(
        shear_rate,
        block.axis(Dir::X1).length(),
        ay.length(),
        ny,
        side,
        t,
    );
    log::trace!(
        "shearing box {side}: t={t} m={} eps={:.6} v={}",
        shift.m,
        shift.eps,
        shift.velocity
    );

    let shape = block.shape();
    let window = IndexWindow::ghost(block, Dir::X1, side, Staging::Cell);
    let vx2 = layout.vx(Dir::X2);
    for n in 0..state.vc.nvar() {
        let offset = if Some(n) == vx2 { shift.velocity } else { 0.0 };
        remap_array(
            state.vc.var_mut(n),
            shape,
            &window,
            scratch,
            shift,
            (ay.beg(), ny),
            offset,
        );
    }

    if let Some(vs) = state.vs.as_mut() {
        for comp in Dir::active(block.dims()).filter(|&c| c != Dir::X1) {
            let window = IndexWindow::ghost(block, Dir::X1, side, Staging::Face(comp));
            if let Some(b) = vs.comp_mut(comp) {
                let shape = b.shape();
                remap_array(
                    b.as_mut_slice(),
                    shape,
                    &window,
                    scratch,
                    shift,
                    (ay.beg(), ny),
                    0.0,
                );
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn van_leer_limits_extrema() {
        assert_eq!(van_leer(1.0, -1.0), 0.0);
        assert_eq!(van_leer(0.0, 2.0), 0.0);
        assert_eq!(van_leer(1.0, 1.0), 1.0);
        assert!((van_leer(1.0, 3.0) - 1.5).abs() < 1e-15);
        assert!((van_leer(-2.0, -6.0) + 3.0).abs() < 1e-15);
    }

    #[test]
    fn zero_eps_is_a_pure_shift() {
        let v = [1.0, -4.0, 7.0, 2.5, 100.0];
        assert_eq!(remap_stencil(v, 0.0), 7.0);
    }

    #[test]
    fn shift_decomposition() {
        // Half a cell to the right with eight cells across a unit box.
        let s = ShearShift::new(1.0, 1.0, 1.0, 8, Side::Right, 1.0 / 16.0);
        assert_eq!(s.m, 1);
        assert_eq!(s.eps, -0.5);
        assert_eq!(s.velocity, 1.0);
        let s = ShearShift::new(1.0, 1.0, 1.0, 8, Side::Left, 1.0 / 16.0);
        assert_eq!(s.m, 0);
        assert_eq!(s.eps, -0.5);
        assert_eq!(s.velocity, -1.0);
    }

    #[test]
    fn origin_wraps_large_shifts() {
        let s = ShearShift {
            m: 19,
            eps: 0.0,
            velocity: 0.0,
        };
        // interior 2..10, 19 ≡ 3 (mod 8)
        assert_eq!(s.origin(2, 2, 8), 7);
        assert_eq!(s.origin(5, 2, 8), 2);
        let s = ShearShift { m: -9, ..s };
        assert_eq!(s.origin(9, 2, 8), 2);
    }

    proptest! {
        #[test]
        fn eps_stays_in_half_open_unit(rate in -3.0f64..3.0, t in 0.0f64..50.0, ny in 1usize..64) {
            for side in Side::BOTH {
                let s = ShearShift::new(rate, 1.0, 2.0, ny, side, t);
                prop_assert!(s.eps >= -0.5 - 1e-12 && s.eps < 0.5 + 1e-12);
            }
        }

        #[test]
        fn constants_are_preserved(c in -1e3f64..1e3, eps in -0.5f64..0.5) {
            prop_assert_eq!(remap_stencil([c; 5], eps), c);
        }

        #[test]
        fn remap_stays_within_stencil_bounds(v in proptest::array::uniform5(-10.0f64..10.0), eps in -0.5f64..0.5) {
            let r = remap_stencil(v, eps);
            let lo = v.iter().cloned().fold(f64::INFINITY, f64::min);
            let hi = v.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(r >= lo - 1e-9 && r <= hi + 1e-9);
        }
    }
}
