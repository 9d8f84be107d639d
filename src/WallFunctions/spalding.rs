//! # Spalding Wall Function Module
//!
//! ## Aim
//! Near-wall turbulent viscosity from the Spalding law of the wall. A single smooth
//! profile covers the viscous sublayer, the buffer layer and the log-law region:
//! ```text
//! y+ = U+ + 1/E * ( exp(κU+) - 1 - κU+ - (κU+)^2/2 - (κU+)^3/6 )
//! ```
//! so there is no switching between regimes. For every wall face the profile is inverted
//! for the friction velocity u_tau with Newton's method, and the wall turbulent viscosity
//! follows as `nut = u_tau^2 / |grad U| - nu`.
//!
//! ## Main Data Structures and Logic
//! - `FaceSample`: near-wall flow quantities of one boundary face
//! - `SolverParams`: law-of-the-wall constants and Newton controls
//! - `FrictionVelocity`: result of the Newton inversion (u_tau, last relative error, steps)
//! - `NutUpdate`: recomputed or carried-forward wall viscosity of a face
//! - `FaceResult`: everything the boundary condition needs for one face
//!
//! ## Key Functions
//! - `solve_friction_velocity()`: Newton inversion of the Spalding profile
//! - `calc_turbulent_viscosity()`: wall nut with the converged-face short-circuit
//! - `calc_y_plus()`: dimensionless wall distance
//! - `*_batch()` / `*_seq()`: order-preserving maps over a whole patch
//!
//! ## Usage
//! ```rust, ignore
//! let params = SolverParams::default();
//! let sample = FaceSample::new(1000.0, 1.0, 1e-3, 1e-5);
//! let face = calc_turbulent_viscosity(&sample, &params);
//! let y_plus = calc_y_plus(&sample, &params);
//! ```
//!
//! ## Interesting Features
//! - divisions are guarded by an additive ROOTVSMALL instead of branches on exact zero,
//!   so the kernel stays smooth for differentiation
//! - κU+ is capped at 50 before `exp` is taken
//! - non-convergence is not an error: the last Newton estimate is returned and
//!   `iterations_used == max_iter` tells the caller about it

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// square root of the "very small" scale 1e-300
pub const ROOTVSMALL: f64 = 1.0e-150;
/// built-in tolerance; any other value switches the converged-face short-circuit on
pub const DEFAULT_TOLERANCE: f64 = 1.0e-14;
pub const DEFAULT_MAX_ITER: u32 = 1000;
/// von Karman constant
pub const DEFAULT_KAPPA: f64 = 0.41;
/// log-law intercept constant
pub const DEFAULT_E: f64 = 9.8;
/// upper bound of κU+ inside the exponential
pub const KUU_MAX: f64 = 50.0;

/// Near-wall quantities of one boundary face
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceSample {
    /// magnitude of the wall-normal velocity gradient |snGrad U| [1/s]
    pub grad_u_mag: f64,
    /// magnitude of the slip velocity between the first cell and the wall |U_p - U_w| [m/s]
    pub slip_vel_mag: f64,
    /// distance from the face to the first cell centre [m]
    pub wall_distance: f64,
    /// kinematic viscosity [m²/s]
    pub nu: f64,
    /// wall turbulent viscosity kept by the caller from the previous evaluation [m²/s]
    pub previous_nut: Option<f64>,
}

impl FaceSample {
    pub fn new(grad_u_mag: f64, slip_vel_mag: f64, wall_distance: f64, nu: f64) -> Self {
        Self {
            grad_u_mag,
            slip_vel_mag,
            wall_distance,
            nu,
            previous_nut: None,
        }
    }

    pub fn with_previous_nut(mut self, nut: f64) -> Self {
        self.previous_nut = Some(nut);
        self
    }

    /// Newton seed: u_tau = sqrt((nut + nu)|grad U|)
    pub fn seed_u_tau(&self) -> f64 {
        let nut_guess = self.previous_nut.unwrap_or(0.0);
        ((nut_guess + self.nu) * self.grad_u_mag).sqrt()
    }
}

/// Law-of-the-wall constants and Newton controls
#[allow(non_snake_case)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverParams {
    pub kappa: f64,
    pub E: f64,
    pub tolerance: f64,
    pub max_iter: u32,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            kappa: DEFAULT_KAPPA,
            E: DEFAULT_E,
            tolerance: DEFAULT_TOLERANCE,
            max_iter: DEFAULT_MAX_ITER,
        }
    }
}

impl SolverParams {
    /// true when the user changed the tolerance, which enables the short-circuit in
    /// `calc_turbulent_viscosity`
    pub fn custom_tolerance(&self) -> bool {
        self.tolerance != DEFAULT_TOLERANCE
    }
}

/// Result of the Newton inversion for one face
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrictionVelocity {
    pub u_tau: f64,
    /// |ut_old - ut_new| / ut_old of the last Newton step, 0 when no step was taken
    pub relative_error: f64,
    /// Newton steps actually performed
    pub iterations: u32,
}

/// Wall turbulent viscosity of one face: either freshly computed or the caller's previous
/// value carried forward because the face already satisfied the tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NutUpdate {
    Recomputed(f64),
    CarriedForward { previous: f64, recomputed: f64 },
}

impl NutUpdate {
    /// value to be stored in the nut field
    pub fn value(&self) -> f64 {
        match self {
            NutUpdate::Recomputed(nut) => *nut,
            NutUpdate::CarriedForward { previous, .. } => *previous,
        }
    }

    pub fn recomputed(&self) -> f64 {
        match self {
            NutUpdate::Recomputed(nut) => *nut,
            NutUpdate::CarriedForward { recomputed, .. } => *recomputed,
        }
    }

    pub fn is_carried_forward(&self) -> bool {
        matches!(self, NutUpdate::CarriedForward { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceResult {
    pub friction_velocity: f64,
    /// resolved wall viscosity, equal to `update.value()`
    pub turbulent_viscosity: f64,
    pub relative_error: f64,
    pub iterations_used: u32,
    pub update: NutUpdate,
}

/// κU+ = κ|U|/u_tau capped at KUU_MAX
pub fn kappa_u_plus(kappa: f64, slip_vel_mag: f64, ut: f64) -> f64 {
    (kappa * slip_vel_mag / ut).min(KUU_MAX)
}

/// Spalding residual f(ut) and the Newton denominator df for the current estimate.
/// The sign convention makes `ut + f/df` the Newton update.
#[allow(non_snake_case)]
pub fn spalding_residual(ut: f64, sample: &FaceSample, params: &SolverParams) -> (f64, f64) {
    let (y, nu, magUp) = (sample.wall_distance, sample.nu, sample.slip_vel_mag);
    let kUu = kappa_u_plus(params.kappa, magUp, ut);
    let fkUu = kUu.exp() - 1.0 - kUu * (1.0 + 0.5 * kUu);

    let f = -ut * y / nu + magUp / ut + 1.0 / params.E * (fkUu - 1.0 / 6.0 * kUu * kUu * kUu);
    let df = y / nu + magUp / (ut * ut) + 1.0 / params.E * kUu * fkUu / ut;
    (f, df)
}

/// Inverts the Spalding profile for the friction velocity of one face.
///
/// `max_iter` may differ from `params.max_iter`: the converged-face check runs a single step.
/// At least one Newton step is performed whenever the seed exceeds ROOTVSMALL.
pub fn solve_friction_velocity(
    sample: &FaceSample,
    params: &SolverParams,
    max_iter: u32,
) -> FrictionVelocity {
    let mut ut = sample.seed_u_tau();
    if ut.is_nan() || ut <= ROOTVSMALL {
        return FrictionVelocity {
            u_tau: 0.0,
            relative_error: 0.0,
            iterations: 0,
        };
    }

    let mut err;
    let mut iterations: u32 = 0;
    loop {
        let (f, df) = spalding_residual(ut, sample, params);
        let ut_new = ut + f / df;
        err = ((ut - ut_new) / ut).abs();
        ut = ut_new;
        iterations += 1;

        if !(ut > ROOTVSMALL && err > params.tolerance && iterations < max_iter) {
            break;
        }
    }

    FrictionVelocity {
        u_tau: ut.max(0.0),
        relative_error: err,
        iterations,
    }
}

/// nut = max(0, u_tau^2 / (|grad U| + ROOTVSMALL) - nu)
pub fn nut_from_u_tau(u_tau: f64, sample: &FaceSample) -> f64 {
    (u_tau * u_tau / (sample.grad_u_mag + ROOTVSMALL) - sample.nu).max(0.0)
}

/// Wall turbulent viscosity of one face.
///
/// With a non-default tolerance a single Newton step is taken from the stored nut; if that
/// step already changes u_tau by less than the tolerance, the stored value is carried
/// forward instead of the recomputed one. Only the one-step error decides, not the error
/// of the converged solve.
pub fn calc_turbulent_viscosity(sample: &FaceSample, params: &SolverParams) -> FaceResult {
    let solved = solve_friction_velocity(sample, params, params.max_iter);
    let recomputed = nut_from_u_tau(solved.u_tau, sample);

    let mut update = NutUpdate::Recomputed(recomputed);
    if params.custom_tolerance() {
        if let Some(previous) = sample.previous_nut {
            let one_step = solve_friction_velocity(sample, params, 1);
            if one_step.relative_error < params.tolerance {
                update = NutUpdate::CarriedForward {
                    previous,
                    recomputed,
                };
            }
        }
    }

    FaceResult {
        friction_velocity: solved.u_tau,
        turbulent_viscosity: update.value(),
        relative_error: solved.relative_error,
        iterations_used: solved.iterations,
        update,
    }
}

/// y+ = y u_tau / nu
pub fn calc_y_plus(sample: &FaceSample, params: &SolverParams) -> f64 {
    sample.wall_distance * solve_friction_velocity(sample, params, params.max_iter).u_tau
        / sample.nu
}

/// Faces are independent, so the patch is mapped in parallel; output order follows input order.
pub fn calc_turbulent_viscosity_batch(
    samples: &[FaceSample],
    params: &SolverParams,
) -> Vec<FaceResult> {
    samples
        .par_iter()
        .map(|sample| calc_turbulent_viscosity(sample, params))
        .collect()
}

pub fn calc_turbulent_viscosity_seq(
    samples: &[FaceSample],
    params: &SolverParams,
) -> Vec<FaceResult> {
    samples
        .iter()
        .map(|sample| calc_turbulent_viscosity(sample, params))
        .collect()
}

pub fn solve_friction_velocity_batch(
    samples: &[FaceSample],
    params: &SolverParams,
    max_iter: u32,
) -> Vec<FrictionVelocity> {
    samples
        .par_iter()
        .map(|sample| solve_friction_velocity(sample, params, max_iter))
        .collect()
}

pub fn calc_y_plus_batch(samples: &[FaceSample], params: &SolverParams) -> Vec<f64> {
    samples
        .par_iter()
        .map(|sample| calc_y_plus(sample, params))
        .collect()
}
