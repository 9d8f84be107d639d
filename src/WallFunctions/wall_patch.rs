//! # Wall Patch
//!
//! Boundary-condition level view of the Spalding wall function. A `WallPatch` owns the
//! per-face near-wall fields of one wall and the current wall turbulent viscosity.
//! All face results are computed from the stored nut first; the nut field is replaced
//! only afterwards in one assignment, so no face ever reads a value that was already
//! updated in the same evaluation.
use crate::WallFunctions::spalding::{
    FaceResult, FaceSample, calc_turbulent_viscosity_batch, calc_y_plus_batch,
    solve_friction_velocity_batch,
};
use crate::WallFunctions::wall_function_error::WallFunctionError;
use crate::settings::WallFunctionSettings;
use log::{debug, info, warn};
use nalgebra::DVector;
use prettytable::{Table, row};
use serde::{Deserialize, Serialize};

#[allow(non_snake_case)]
#[derive(Debug, Clone)]
pub struct WallPatch {
    pub name: String,
    /// wall distance of the first cell centre [m]
    pub y: DVector<f64>,
    /// kinematic viscosity at the wall [m²/s]
    pub nu: DVector<f64>,
    /// |snGrad U| at the wall [1/s]
    pub magGradU: DVector<f64>,
    /// |U_p - U_w| [m/s]
    pub magUp: DVector<f64>,
    /// current wall turbulent viscosity [m²/s]
    pub nut: DVector<f64>,
}

/// What happened to the faces of a patch during `update_coeffs`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PatchUpdateSummary {
    pub recomputed: usize,
    pub carried_forward: usize,
    /// faces that hit the iteration cap with the error still above tolerance
    pub not_converged: usize,
    pub max_relative_error: f64,
    pub max_iterations: u32,
}

#[allow(non_snake_case)]
impl WallPatch {
    /// Builds a patch from per-face columns. Without `nut` the wall viscosity starts at zero.
    pub fn new(
        name: &str,
        y: Vec<f64>,
        nu: Vec<f64>,
        magGradU: Vec<f64>,
        magUp: Vec<f64>,
        nut: Option<Vec<f64>>,
    ) -> Result<Self, WallFunctionError> {
        let n = y.len();
        let nut = nut.unwrap_or_else(|| vec![0.0; n]);
        for (field, column) in [
            ("nu", &nu),
            ("magGradU", &magGradU),
            ("magUp", &magUp),
            ("nut", &nut),
        ] {
            if column.len() != n {
                return Err(WallFunctionError::LengthMismatch {
                    patch: name.to_string(),
                    field: field.to_string(),
                    expected: n,
                    found: column.len(),
                });
            }
        }
        for (field, column, strictly_positive) in [
            ("y", &y, true),
            ("nu", &nu, true),
            ("magGradU", &magGradU, false),
            ("magUp", &magUp, false),
            ("nut", &nut, false),
        ] {
            if let Some((face, value)) = column.iter().enumerate().find(|(_, v)| {
                !v.is_finite() || **v < 0.0 || (strictly_positive && **v == 0.0)
            }) {
                return Err(WallFunctionError::InvalidFaceData {
                    patch: name.to_string(),
                    field: field.to_string(),
                    face,
                    value: *value,
                });
            }
        }
        debug!("wall patch '{}' created with {} faces", name, n);
        Ok(Self {
            name: name.to_string(),
            y: DVector::from_vec(y),
            nu: DVector::from_vec(nu),
            magGradU: DVector::from_vec(magGradU),
            magUp: DVector::from_vec(magUp),
            nut: DVector::from_vec(nut),
        })
    }

    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// per-face inputs of the kernel, seeded with the stored nut
    pub fn samples(&self) -> Vec<FaceSample> {
        (0..self.len())
            .map(|facei| {
                FaceSample::new(
                    self.magGradU[facei],
                    self.magUp[facei],
                    self.y[facei],
                    self.nu[facei],
                )
                .with_previous_nut(self.nut[facei])
            })
            .collect()
    }

    /// Wall viscosity of every face. The stored nut is not modified.
    pub fn calc_nut(&self, settings: &WallFunctionSettings) -> Vec<FaceResult> {
        calc_turbulent_viscosity_batch(&self.samples(), &settings.solver_params())
    }

    /// friction velocity and last relative error per face with an explicit iteration cap
    pub fn calc_u_tau(
        &self,
        settings: &WallFunctionSettings,
        max_iter: u32,
    ) -> (DVector<f64>, DVector<f64>) {
        let solved =
            solve_friction_velocity_batch(&self.samples(), &settings.solver_params(), max_iter);
        let u_tau = DVector::from_iterator(solved.len(), solved.iter().map(|s| s.u_tau));
        let err = DVector::from_iterator(solved.len(), solved.iter().map(|s| s.relative_error));
        (u_tau, err)
    }

    pub fn y_plus(&self, settings: &WallFunctionSettings) -> DVector<f64> {
        DVector::from_vec(calc_y_plus_batch(
            &self.samples(),
            &settings.solver_params(),
        ))
    }

    /// Evaluates the wall function and stores the resolved nut of every face.
    pub fn update_coeffs(&mut self, settings: &WallFunctionSettings) -> PatchUpdateSummary {
        let results = self.calc_nut(settings);
        let summary = summarize(&results, settings);
        self.nut = DVector::from_iterator(results.len(), results.iter().map(|r| r.turbulent_viscosity));

        info!(
            "patch '{}': {} faces recomputed, {} carried forward, max error {:e} after {} iterations",
            self.name,
            summary.recomputed,
            summary.carried_forward,
            summary.max_relative_error,
            summary.max_iterations
        );
        if summary.not_converged > 0 {
            warn!(
                "patch '{}': {} faces reached maxIter = {} without meeting tolerance {:e}",
                self.name, summary.not_converged, settings.max_iter, settings.tolerance
            );
        }
        summary
    }

    pub fn pretty_print(&self, settings: &WallFunctionSettings) {
        let results = self.calc_nut(settings);
        let y_plus = self.y_plus(settings);
        let mut table = Table::new();
        table.add_row(row!["Face", "y", "u_tau", "y+", "nut", "error", "iter", "nut source"]);
        for (facei, result) in results.iter().enumerate() {
            let source = if result.update.is_carried_forward() {
                "previous"
            } else {
                "recomputed"
            };
            table.add_row(row![
                facei,
                format!("{:.4e}", self.y[facei]),
                format!("{:.6e}", result.friction_velocity),
                format!("{:.4}", y_plus[facei]),
                format!("{:.6e}", result.turbulent_viscosity),
                format!("{:.2e}", result.relative_error),
                result.iterations_used,
                source
            ]);
        }
        println!("Wall patch: {}", self.name);
        table.printstd();
    }
}

fn summarize(results: &[FaceResult], settings: &WallFunctionSettings) -> PatchUpdateSummary {
    let mut summary = PatchUpdateSummary::default();
    for result in results {
        if result.update.is_carried_forward() {
            summary.carried_forward += 1;
        } else {
            summary.recomputed += 1;
        }
        if result.iterations_used >= settings.max_iter && result.relative_error > settings.tolerance
        {
            summary.not_converged += 1;
        }
        summary.max_relative_error = summary.max_relative_error.max(result.relative_error);
        summary.max_iterations = summary.max_iterations.max(result.iterations_used);
    }
    summary
}
