//! Physics capability and the cell-centered variable layout it implies.
//!
//! The solver's compile-time switches (magnetic field on/off, number of
//! dimensions, number of vector components) are resolved once into a
//! [`Physics`] value. [`VarLayout`] turns that into concrete variable
//! indices and names, so boundary kernels never branch on the model
//! inside an element loop.

use indexmap::IndexMap;

use crate::error::BoundaryError;
use crate::id::Dir;

/// What the solver models.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Physics {
    /// Number of active spatial dimensions (1, 2 or 3).
    pub dims: usize,
    /// Number of vector components carried (`dims..=3`).
    pub components: usize,
    /// Whether a magnetic field is evolved.
    pub mhd: bool,
    /// Whether an energy equation (pressure variable) is evolved.
    pub energy: bool,
}

impl Physics {
    /// Hydrodynamics with an energy equation and `dims` vector components.
    pub fn hydro(dims: usize) -> Self {
        Self {
            dims,
            components: dims,
            mhd: false,
            energy: true,
        }
    }

    /// MHD with an energy equation and three vector components.
    pub fn mhd(dims: usize) -> Self {
        Self {
            dims,
            components: 3,
            mhd: true,
            energy: true,
        }
    }

    /// Override the number of vector components.
    pub fn with_components(mut self, components: usize) -> Self {
        self.components = components;
        self
    }

    /// Toggle the energy equation.
    pub fn with_energy(mut self, energy: bool) -> Self {
        self.energy = energy;
        self
    }

    /// Check structural consistency.
    pub fn validate(&self) -> Result<(), BoundaryError> {
        if !(1..=3).contains(&self.dims) {
            return Err(BoundaryError::InvalidPhysics {
                reason: format!("dims must be 1, 2 or 3, got {}", self.dims),
            });
        }
        if self.components < self.dims || self.components > 3 {
            return Err(BoundaryError::InvalidPhysics {
                reason: format!(
                    "components must lie in {}..=3, got {}",
                    self.dims, self.components
                ),
            });
        }
        Ok(())
    }

    /// Resolve the variable layout.
    pub fn layout(&self) -> Result<VarLayout, BoundaryError> {
        VarLayout::new(*self)
    }
}

/// Indices and names of the cell-centered variables.
///
/// The ordering is `RHO`, `VX1..VXc`, then `BX1..BXc` when a magnetic
/// field is evolved, then `PRS` when an energy equation is evolved.
#[derive(Clone, Debug, PartialEq)]
pub struct VarLayout {
    physics: Physics,
    names: IndexMap<String, usize>,
}

impl VarLayout {
    /// Density index.
    pub const RHO: usize = 0;

    /// Build the layout for `physics`.
    pub fn new(physics: Physics) -> Result<Self, BoundaryError> {
        physics.validate()?;
        let mut names = IndexMap::new();
        names.insert("RHO".to_string(), Self::RHO);
        for c in 0..physics.components {
            names.insert(format!("VX{}", c + 1), 1 + c);
        }
        if physics.mhd {
            for c in 0..physics.components {
                names.insert(format!("BX{}", c + 1), 1 + physics.components + c);
            }
        }
        if physics.energy {
            let n = names.len();
            names.insert("PRS".to_string(), n);
        }
        Ok(Self { physics, names })
    }

    /// The capability this layout was built from.
    pub fn physics(&self) -> &Physics {
        &self.physics
    }

    /// Number of active dimensions.
    pub fn dims(&self) -> usize {
        self.physics.dims
    }

    /// Whether face-centered magnetic fields exist.
    pub fn mhd(&self) -> bool {
        self.physics.mhd
    }

    /// Number of cell-centered variables.
    pub fn nvar(&self) -> usize {
        self.names.len()
    }

    /// Velocity component along `dir`, if carried.
    pub fn vx(&self, dir: Dir) -> Option<usize> {
        (dir.index() < self.physics.components).then(|| 1 + dir.index())
    }

    /// Cell-centered magnetic component along `dir`, if carried.
    pub fn bx(&self, dir: Dir) -> Option<usize> {
        (self.physics.mhd && dir.index() < self.physics.components)
            .then(|| 1 + self.physics.components + dir.index())
    }

    /// Pressure index, if an energy equation is evolved.
    pub fn prs(&self) -> Option<usize> {
        self.index_of("PRS")
    }

    /// Name of variable `n`.
    pub fn name(&self, n: usize) -> Option<&str> {
        self.names.get_index(n).map(|(name, _)| name.as_str())
    }

    /// Index of the variable called `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.get(name).copied()
    }

    /// Number of face-centered components (one per active dimension, MHD only).
    pub fn face_components(&self) -> usize {
        if self.physics.mhd {
            self.physics.dims
        } else {
            0
        }
    }

    /// Name of the face-centered component normal to `dir`.
    pub fn face_name(dir: Dir) -> &'static str {
        match dir {
            Dir::X1 => "BX1s",
            Dir::X2 => "BX2s",
            Dir::X3 => "BX3s",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn hydro_layout_has_no_field() {
        let layout = Physics::hydro(2).layout().unwrap();
        assert_eq!(layout.nvar(), 4);
        assert_eq!(layout.vx(Dir::X2), Some(2));
        assert_eq!(layout.vx(Dir::X3), None);
        assert_eq!(layout.bx(Dir::X1), None);
        assert_eq!(layout.prs(), Some(3));
        assert_eq!(layout.face_components(), 0);
    }

    #[test]
    fn mhd_layout_orders_variables() {
        let layout = Physics::mhd(3).layout().unwrap();
        let names: Vec<&str> = (0..layout.nvar()).filter_map(|n| layout.name(n)).collect();
        assert_eq!(
            names,
            vec!["RHO", "VX1", "VX2", "VX3", "BX1", "BX2", "BX3", "PRS"]
        );
        assert_eq!(layout.bx(Dir::X1), Some(4));
        assert_eq!(layout.index_of("BX3"), Some(6));
        assert_eq!(layout.face_components(), 3);
    }

    #[test]
    fn isothermal_mhd_in_two_dimensions() {
        let layout = Physics::mhd(2).with_energy(false).layout().unwrap();
        assert_eq!(layout.nvar(), 7);
        assert_eq!(layout.prs(), None);
        assert_eq!(layout.face_components(), 2);
    }

    #[test]
    fn rejects_bad_capabilities() {
        assert!(Physics::hydro(0).validate().is_err());
        assert!(Physics::hydro(4).validate().is_err());
        assert!(Physics::hydro(3).with_components(2).validate().is_err());
    }

    proptest! {
        #[test]
        fn names_and_indices_agree(dims in 1usize..=3, extra in 0usize..=2, mhd in any::<bool>(), energy in any::<bool>()) {
            let physics = Physics {
                dims,
                components: (dims + extra).min(3),
                mhd,
                energy,
            };
            let layout = physics.layout().unwrap();
            for n in 0..layout.nvar() {
                let name = layout.name(n).unwrap();
                prop_assert_eq!(layout.index_of(name), Some(n));
            }
            for d in Dir::ALL {
                let (vx, bx) = (format!("VX{}", d.index() + 1), format!("BX{}", d.index() + 1));
                if let Some(n) = layout.vx(d) {
                    prop_assert_eq!(layout.name(n), Some(vx.as_str()));
                }
                if let Some(n) = layout.bx(d) {
                    prop_assert_eq!(layout.name(n), Some(bx.as_str()));
                }
            }
        }
    }
}
