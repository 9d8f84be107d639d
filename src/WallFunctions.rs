/// Spalding law of the wall: Newton inversion for the friction velocity, wall turbulent
/// viscosity with the converged-face short-circuit, y+ and parallel patch maps.
/// ```
/// use WallLaw::WallFunctions::spalding::{FaceSample, SolverParams, calc_turbulent_viscosity};
/// let params = SolverParams::default();
/// let sample = FaceSample::new(1000.0, 1.0, 1e-3, 1e-5);
/// let face = calc_turbulent_viscosity(&sample, &params);
/// assert!(face.friction_velocity > 0.0);
/// assert!(face.turbulent_viscosity >= 0.0);
/// assert!(face.iterations_used < 50);
/// ```
pub mod spalding;
/// per-patch fields of the wall function boundary condition
pub mod wall_patch;
/// wall alphat for the steady incompressible thermal solver
pub mod thermal_coupling;
pub mod wall_function_error;
