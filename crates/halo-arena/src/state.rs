//! The block-local field state: cell-centered variables plus the
//! staggered magnetic field.

use smallvec::SmallVec;

use halo_core::{BoundaryError, Dir, Index3, Staging, VarLayout};

use crate::array::{Array3, Array4};

/// Shape of a quantity with the given staging on a block whose
/// cell-centered shape is `cells`.
pub fn staged_shape(cells: Index3, staging: Staging) -> Index3 {
    let mut shape = cells;
    if let Staging::Face(d) = staging {
        shape[d.index()] += 1;
    }
    shape
}

/// Face-centered magnetic field: one array per active direction, each one
/// element longer along its own axis.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceField {
    comps: SmallVec<[Array3; 3]>,
}

impl FaceField {
    /// Zero field with `dims` components on a block of cell shape `cells`.
    pub fn zeros(cells: Index3, dims: usize) -> Self {
        let comps = Dir::active(dims)
            .map(|d| Array3::zeros(staged_shape(cells, Staging::Face(d))))
            .collect();
        Self { comps }
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.comps.len()
    }

    /// Whether there are no components.
    pub fn is_empty(&self) -> bool {
        self.comps.is_empty()
    }

    /// Component normal to `dir`.
    pub fn comp(&self, dir: Dir) -> Option<&Array3> {
        self.comps.get(dir.index())
    }

    /// Mutable component normal to `dir`.
    pub fn comp_mut(&mut self, dir: Dir) -> Option<&mut Array3> {
        self.comps.get_mut(dir.index())
    }

    /// Components in direction order.
    pub fn iter(&self) -> impl Iterator<Item = (Dir, &Array3)> {
        Dir::ALL.into_iter().zip(self.comps.iter())
    }
}

/// Everything boundary enforcement reads and writes on one block.
///
/// `vc` is indexed `vc[(var, [i, j, k])]`. `vs` exists only when the
/// physics evolves a magnetic field.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldState {
    /// Cell-centered variables, ghosts included.
    pub vc: Array4,
    /// Face-centered magnetic field, ghosts included.
    pub vs: Option<FaceField>,
}

impl FieldState {
    /// Zero state for a block of cell shape `cells`.
    pub fn zeros(cells: Index3, layout: &VarLayout) -> Self {
        let vs = layout
            .mhd()
            .then(|| FaceField::zeros(cells, layout.dims()));
        Self {
            vc: Array4::zeros(layout.nvar(), cells),
            vs,
        }
    }

    /// Check that every array matches a block of cell shape `cells`.
    pub fn check_shape(&self, cells: Index3, layout: &VarLayout) -> Result<(), BoundaryError> {
        if self.vc.shape() != cells {
            return Err(BoundaryError::ShapeMismatch {
                what: "Vc".to_string(),
                expected: cells,
                found: self.vc.shape(),
            });
        }
        if self.vc.nvar() != layout.nvar() {
            return Err(BoundaryError::ShapeMismatch {
                what: format!("Vc variable count {}", self.vc.nvar()),
                expected: [layout.nvar(), 0, 0],
                found: [self.vc.nvar(), 0, 0],
            });
        }
        match (&self.vs, layout.mhd()) {
            (Some(vs), true) => {
                for d in Dir::active(layout.dims()) {
                    let expected = staged_shape(cells, Staging::Face(d));
                    let found = vs.comp(d).map(Array3::shape).unwrap_or([0; 3]);
                    if found != expected {
                        return Err(BoundaryError::ShapeMismatch {
                            what: VarLayout::face_name(d).to_string(),
                            expected,
                            found,
                        });
                    }
                }
                Ok(())
            }
            (None, false) => Ok(()),
            (None, true) => Err(BoundaryError::InvalidPhysics {
                reason: "magnetic field evolved but state carries no face field".to_string(),
            }),
            (Some(_), false) => Err(BoundaryError::InvalidPhysics {
                reason: "state carries a face field but physics has no magnetic field".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use halo_core::Physics;

    #[test]
    fn face_components_are_staggered() {
        let vs = FaceField::zeros([6, 5, 4], 3);
        assert_eq!(vs.comp(Dir::X1).unwrap().shape(), [7, 5, 4]);
        assert_eq!(vs.comp(Dir::X2).unwrap().shape(), [6, 6, 4]);
        assert_eq!(vs.comp(Dir::X3).unwrap().shape(), [6, 5, 5]);
    }

    #[test]
    fn two_dimensional_field_has_two_components() {
        let vs = FaceField::zeros([6, 5, 1], 2);
        assert_eq!(vs.len(), 2);
        assert!(vs.comp(Dir::X3).is_none());
    }

    #[test]
    fn zeros_matches_layout() {
        let layout = Physics::mhd(2).layout().unwrap();
        let state = FieldState::zeros([8, 8, 1], &layout);
        assert_eq!(state.vc.nvar(), layout.nvar());
        assert!(state.check_shape([8, 8, 1], &layout).is_ok());
        assert!(matches!(
            state.check_shape([8, 9, 1], &layout),
            Err(BoundaryError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn hydro_state_has_no_face_field() {
        let layout = Physics::hydro(1).layout().unwrap();
        let state = FieldState::zeros([10, 1, 1], &layout);
        assert!(state.vs.is_none());
        let mhd = Physics::mhd(1).layout().unwrap();
        assert!(state.check_shape([10, 1, 1], &mhd).is_err());
    }
}
