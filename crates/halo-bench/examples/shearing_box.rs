//! Shearing-box ghost fills over one orbit.
//!
//! Demonstrates: build profile → Boundary → set_boundaries at increasing
//! times → inspect the sheared ghosts → NaN scan.
//!
//! Run with `RUST_LOG=debug` to see each direction being enforced.

use halo_bench::{init_state, shearing_box_profile};
use halo_boundary::{check_nan, ShearShift};
use halo_core::{Dir, Side};

fn main() {
    env_logger::init();
    println!("=== Halo Shearing Box Example ===\n");

    let profile = shearing_box_profile(32).unwrap();
    let mut boundary = profile.boundary().unwrap();
    let mut state = init_state(&profile);

    let block = boundary.block().clone();
    let (ax, ay) = (block.axis(Dir::X1), block.axis(Dir::X2));
    let (lx, ly) = (ax.length(), ay.length());
    let rho = profile.layout.index_of("RHO").unwrap();
    let vx2 = profile.layout.vx(Dir::X2).unwrap();
    let row = ay.beg() + ay.cells / 2;

    // One shear period: the boundaries slip past each other by Ly.
    let period = ly / (1.5 * lx);
    for step in 0..=8 {
        let t = period * step as f64 / 8.0;
        boundary.set_boundaries(&mut state, t).unwrap();

        let shift = ShearShift::new(1.5, lx, ly, ay.cells, Side::Right, t);
        let ghost = [ax.end(), row, 0];
        println!(
            "t={t:7.4}  shift={:4} cells {:+.3}  right ghost rho={:.5} vx2={:+.4}",
            shift.m,
            shift.eps,
            state.vc[(rho, ghost)],
            state.vc[(vx2, ghost)],
        );
    }

    let report = check_nan(&block, &profile.layout, &state, 0);
    println!(
        "\nNaN scan: {}",
        if report.is_clean() {
            "clean".to_string()
        } else {
            format!("{} bad values", report.count)
        }
    );
}
