use crate::Result;
use crate::errors::MeshError;
use serde::{Deserialize, Serialize};

/// The output of an external panel solver, indexed like the panel arena it was computed on.
/// Source strengths are not needed to integrate loads and are not carried.
/// Triangle solutions carry three pressure coefficients per panel, one per vertex, stored at
/// `3·index + vertex`.  Quad and vortex lattice solutions carry one value per panel.
///
/// The arrays are never modified once the solution has been created.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PanelSolution {
    cp: Vec<f64>,
    gamma: Vec<f64>,
}

impl PanelSolution {
    pub fn new(cp: Vec<f64>, gamma: Vec<f64>) -> Self {
        Self { cp, gamma }
    }

    /// A solution holding only pressure coefficients
    pub fn from_cp(cp: Vec<f64>) -> Self {
        Self::new(cp, Vec::new())
    }

    /// A vortex lattice solution holding only circulations
    pub fn from_gamma(gamma: Vec<f64>) -> Self {
        Self::new(Vec::new(), gamma)
    }

    pub fn cp(&self) -> &[f64] {
        &self.cp
    }

    pub fn gamma(&self) -> &[f64] {
        &self.gamma
    }

    /// Checks that the pressure coefficients cover every vertex of a triangle arena with
    /// `panel_count` panels.
    pub fn check_tri(&self, panel_count: usize) -> Result<()> {
        check_len(self.cp.len(), 3 * panel_count)
    }

    /// Checks that the solution covers a quad arena with `panel_count` panels, through the
    /// circulations for a vortex lattice and through the pressure coefficients otherwise.
    pub fn check_quad(&self, panel_count: usize, vlm: bool) -> Result<()> {
        if vlm {
            check_len(self.gamma.len(), panel_count)
        } else {
            check_len(self.cp.len(), panel_count)
        }
    }
}

fn check_len(found: usize, expected: usize) -> Result<()> {
    if found < expected {
        Err(Box::new(MeshError::SolutionMismatch { expected, found }))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_arrays_are_rejected() {
        let s = PanelSolution::from_cp(vec![-1.0; 9]);
        assert!(s.check_tri(3).is_ok());
        let e = s.check_tri(4).unwrap_err();
        assert_eq!(
            e.downcast_ref::<MeshError>(),
            Some(&MeshError::SolutionMismatch { expected: 12, found: 9 })
        );
        assert!(s.check_quad(9, false).is_ok());
        assert!(s.check_quad(1, true).is_err());
    }

    #[test]
    fn mixed_solution_is_checked_by_method() {
        let s = PanelSolution::new(vec![-0.5; 4], vec![1.0; 6]);
        assert_eq!(s.cp().len(), 4);
        assert_eq!(s.gamma().len(), 6);
        assert!(s.check_quad(6, true).is_ok());
        let e = s.check_quad(6, false).unwrap_err();
        assert_eq!(
            e.downcast_ref::<MeshError>(),
            Some(&MeshError::SolutionMismatch { expected: 6, found: 4 })
        );
    }
}
