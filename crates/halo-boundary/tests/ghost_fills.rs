//! Integration test: ghost values produced by the local fills, checked
//! against independently computed images of the interior.

use halo_arena::FieldState;
use halo_boundary::{Boundary, BoundaryConfig, IndexWindow};
use halo_core::{Dir, Index3, Physics, Staging};
use halo_grid::{AxisSpec, BlockGeometry, BoundaryType, Geometry};
use halo_test_utils::fixtures::{
    all_finite, block, fill_random, max_block_divergence, poison_ghosts, solenoidal_field,
};

fn wrapped(beg: usize, cells: usize, g: usize) -> usize {
    beg + (g as i64 - beg as i64).rem_euclid(cells as i64) as usize
}

#[test]
fn periodic_ghosts_equal_the_wrapped_interior() {
    // Ghost layers thicker than the interior along X1.
    let block = block(
        Geometry::Cartesian,
        &[
            AxisSpec::new(0.0, 1.0, 2).ghosts(3),
            AxisSpec::new(0.0, 1.0, 3).ghosts(1),
        ],
    );
    let layout = Physics::hydro(2).layout().unwrap();
    let mut state = FieldState::zeros(block.shape(), &layout);
    fill_random(&block, &mut state, 5);
    let interior = state.clone();

    let mut boundary = Boundary::new(block, layout.clone(), &BoundaryConfig::default()).unwrap();
    boundary.set_boundaries(&mut state, 0.0).unwrap();

    let block = boundary.block();
    let (a1, a2) = (block.axis(Dir::X1), block.axis(Dir::X2));
    IndexWindow::full(block, Staging::Cell).for_each(|p| {
        let q: Index3 = [
            wrapped(a1.beg(), a1.cells, p[0]),
            wrapped(a2.beg(), a2.cells, p[1]),
            0,
        ];
        for n in 0..layout.nvar() {
            assert_eq!(state.vc[(n, p)], interior.vc[(n, q)], "var {n} at {p:?}");
        }
    });
}

#[test]
fn reflective_ghosts_mirror_with_normal_velocity_flipped() {
    let block = block(
        Geometry::Cartesian,
        &[
            AxisSpec::new(0.0, 1.0, 6).bounds(BoundaryType::Reflective, BoundaryType::Reflective),
            AxisSpec::new(0.0, 1.0, 4),
        ],
    );
    let layout = Physics::hydro(2).layout().unwrap();
    let mut state = FieldState::zeros(block.shape(), &layout);
    fill_random(&block, &mut state, 8);

    let mut boundary = Boundary::new(block, layout.clone(), &BoundaryConfig::default()).unwrap();
    boundary.set_boundaries(&mut state, 0.0).unwrap();

    let block = boundary.block();
    let ax = block.axis(Dir::X1);
    let vx1 = layout.vx(Dir::X1).unwrap();
    for (g, b) in [(0, ax.beg()), (1, ax.beg()), (ax.end(), ax.end()), (ax.end() + 1, ax.end())] {
        let mirror = 2 * b - g - 1;
        for j in 0..block.shape()[1] {
            for n in 0..layout.nvar() {
                let sign = if n == vx1 { -1.0 } else { 1.0 };
                assert_eq!(state.vc[(n, [g, j, 0])], sign * state.vc[(n, [mirror, j, 0])]);
            }
        }
    }
}

#[test]
fn outflow_copies_the_boundary_cell_and_clamps_inflow() {
    let block = block(
        Geometry::Cartesian,
        &[AxisSpec::new(0.0, 1.0, 4).bounds(BoundaryType::Outflow, BoundaryType::Outflow)],
    );
    let layout = Physics::hydro(1).layout().unwrap();
    let vx = layout.vx(Dir::X1).unwrap();
    let prs = layout.prs().unwrap();
    let mut state = FieldState::zeros(block.shape(), &layout);
    // Flow leaves through the left face and enters through the right.
    state.vc[(vx, [2, 0, 0])] = -0.25;
    state.vc[(vx, [5, 0, 0])] = -0.75;
    state.vc[(prs, [5, 0, 0])] = 2.0;

    let mut boundary = Boundary::new(block, layout, &BoundaryConfig::default()).unwrap();
    boundary.set_boundaries(&mut state, 0.0).unwrap();

    assert_eq!(state.vc[(vx, [0, 0, 0])], -0.25);
    assert_eq!(state.vc[(vx, [1, 0, 0])], -0.25);
    assert_eq!(state.vc[(vx, [6, 0, 0])], 0.0);
    assert_eq!(state.vc[(vx, [7, 0, 0])], 0.0);
    assert_eq!(state.vc[(prs, [7, 0, 0])], 2.0);
}

#[test]
fn every_ghost_is_written_in_three_dimensions() {
    let block = block(
        Geometry::Cartesian,
        &[
            AxisSpec::new(0.0, 1.0, 4).bounds(BoundaryType::Outflow, BoundaryType::Reflective),
            AxisSpec::new(0.0, 1.0, 3).bounds(BoundaryType::Reflective, BoundaryType::Outflow),
            AxisSpec::new(0.0, 1.0, 5).bounds(BoundaryType::Outflow, BoundaryType::Outflow),
        ],
    );
    let layout = Physics::mhd(3).layout().unwrap();
    let mut state = FieldState::zeros(block.shape(), &layout);
    fill_random(&block, &mut state, 21);
    if let Some(vs) = state.vs.as_mut() {
        solenoidal_field(&block, vs, 21);
    }
    poison_ghosts(&block, &mut state);

    let mut boundary = Boundary::new(block, layout, &BoundaryConfig::default()).unwrap();
    boundary.set_boundaries(&mut state, 0.0).unwrap();

    assert!(all_finite(&state));
    let vs = state.vs.as_ref().unwrap();
    assert!(max_block_divergence(boundary.block(), vs) < 1e-10);
}

fn mhd_enforced(block: BlockGeometry, seed: u64) -> (Boundary, FieldState) {
    let layout = Physics::mhd(2).layout().unwrap();
    let mut state = FieldState::zeros(block.shape(), &layout);
    fill_random(&block, &mut state, seed);
    if let Some(vs) = state.vs.as_mut() {
        solenoidal_field(&block, vs, seed);
    }
    poison_ghosts(&block, &mut state);
    let mut boundary = Boundary::new(block, layout, &BoundaryConfig::default()).unwrap();
    boundary.set_boundaries(&mut state, 0.0).unwrap();
    (boundary, state)
}

#[test]
fn tangential_faces_flip_at_a_wall_and_copy_at_an_outflow() {
    let block = block(
        Geometry::Cartesian,
        &[
            AxisSpec::new(0.0, 1.0, 6).bounds(BoundaryType::Reflective, BoundaryType::Outflow),
            AxisSpec::new(0.0, 1.0, 4),
        ],
    );
    let (boundary, state) = mhd_enforced(block, 41);
    let ax = boundary.block().axis(Dir::X1);
    let b2 = state.vs.as_ref().unwrap().comp(Dir::X2).unwrap();
    let iref = ax.end() - 1;
    for j in 0..b2.shape()[1] {
        for g in 0..ax.beg() {
            let mirror = 2 * ax.beg() - g - 1;
            assert_eq!(b2[[g, j, 0]], -b2[[mirror, j, 0]], "wall ghost [{g}, {j}]");
        }
        for g in ax.end()..ax.total {
            assert_eq!(b2[[g, j, 0]], b2[[iref, j, 0]], "outflow ghost [{g}, {j}]");
        }
    }
}

#[test]
fn walls_across_x2_flip_the_x1_faces() {
    let block = block(
        Geometry::Cartesian,
        &[
            AxisSpec::new(0.0, 1.0, 4),
            AxisSpec::new(0.0, 1.0, 5).bounds(BoundaryType::Reflective, BoundaryType::Reflective),
        ],
    );
    let (boundary, state) = mhd_enforced(block, 42);
    let ax = boundary.block().axis(Dir::X2);
    let b1 = state.vs.as_ref().unwrap().comp(Dir::X1).unwrap();
    for i in 0..b1.shape()[0] {
        for (g, b) in [(0, ax.beg()), (1, ax.beg()), (ax.end(), ax.end()), (ax.end() + 1, ax.end())] {
            let mirror = 2 * b - g - 1;
            assert_eq!(b1[[i, g, 0]], -b1[[i, mirror, 0]], "ghost [{i}, {g}]");
        }
    }
}
