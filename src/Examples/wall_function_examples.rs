use crate::WallFunctions::spalding::{
    FaceSample, SolverParams, calc_turbulent_viscosity, calc_y_plus, solve_friction_velocity,
};
use crate::WallFunctions::thermal_coupling::{
    BoundaryCorrection, ThermalProperties, ThermalWallState,
};
use crate::WallFunctions::wall_patch::WallPatch;
use crate::settings::WallFunctionSettings;
use prettytable::{Table, row};

pub fn wall_function_examples(task: usize) {
    match task {
        0 => {
            // single face: y = 1 mm, nu = 1e-5, |U| = 1 m/s, |grad U| = 1000 1/s
            let params = SolverParams::default();
            let sample = FaceSample::new(1000.0, 1.0, 1e-3, 1e-5);
            let solved = solve_friction_velocity(&sample, &params, params.max_iter);
            let face = calc_turbulent_viscosity(&sample, &params);
            println!(
                "u_tau = {:.8e}, error = {:e}, iterations = {}",
                solved.u_tau, solved.relative_error, solved.iterations
            );
            println!(
                "nut = {:.6e}, y+ = {:.4}",
                face.turbulent_viscosity,
                calc_y_plus(&sample, &params)
            );
        }
        1 => {
            // sweep of the first cell height through sublayer, buffer and log region
            let params = SolverParams::default();
            let mut table = Table::new();
            table.add_row(row!["y", "u_tau", "y+", "nut/nu", "iter"]);
            for y in [1e-5, 1e-4, 5e-4, 1e-3, 5e-3, 1e-2, 5e-2] {
                // |U| from a 1/7th power profile of a 1 m/s bulk flow in a 0.1 m half channel
                let mag_up = (y / 0.1_f64).powf(1.0 / 7.0);
                let sample = FaceSample::new(mag_up / y, mag_up, y, 1e-5);
                let face = calc_turbulent_viscosity(&sample, &params);
                table.add_row(row![
                    format!("{:e}", y),
                    format!("{:.5e}", face.friction_velocity),
                    format!("{:.3}", calc_y_plus(&sample, &params)),
                    format!("{:.4}", face.turbulent_viscosity / 1e-5),
                    face.iterations_used
                ]);
            }
            table.printstd();
        }
        2 => {
            // second evaluation with a user tolerance keeps the faces that are already converged
            let mut patch = WallPatch::new(
                "lowerWall",
                vec![1e-4, 1e-3, 5e-3],
                vec![1e-5; 3],
                vec![5000.0, 1000.0, 150.0],
                vec![0.4, 1.0, 1.2],
                None,
            )
            .expect("valid patch");
            let strict = WallFunctionSettings::default();
            patch.update_coeffs(&strict);
            let relaxed = WallFunctionSettings {
                tolerance: 1e-6,
                ..strict
            };
            let summary = patch.update_coeffs(&relaxed);
            println!("{:?}", summary);
            println!("entries to write: {:?}", relaxed.write_entries());
            patch.pretty_print(&relaxed);
        }
        3 => {
            // heated wall: alphat = nut/Prt after boundary correction
            let patch = WallPatch::new(
                "heatedWall",
                vec![1e-3, 2e-3, 4e-3],
                vec![1.5e-5; 3],
                vec![800.0, 500.0, 300.0],
                vec![1.0, 1.3, 1.5],
                None,
            )
            .expect("valid patch");
            let properties = ThermalProperties::new(0.71, 0.85).expect("valid Prandtl numbers");
            let mut state = ThermalWallState::new(patch, WallFunctionSettings::default(), properties)
                .expect("valid thermal wall");
            state.correct_boundary_conditions();
            state.update_intermediate_variables();
            println!("alphat: {:?}", state.alphat.as_slice());
            println!("alphaEff: {:?}", state.alpha_eff().as_slice());
        }
        _ => {
            println!("No such example: {}", task);
        }
    }
}
