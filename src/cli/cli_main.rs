use super::cli_examples::examples_menu;
use crate::Utils::load_from_file::{WallCase, load_case_from_file, save_results};
use crate::WallFunctions::thermal_coupling::{BoundaryCorrection, ThermalWallState};
use crate::WallFunctions::wall_function_error::WallFunctionError;
use log::{error, info};
use std::io::{self, Write};

pub fn run_interactive_menu() {
    loop {
        show_main_menu();
        let choice = get_user_input();

        match choice.trim() {
            "1" => {
                print!("\x1b[36mCase file: \x1b[0m");
                flush();
                let file_name = get_user_input();
                print!("\x1b[36mResults file (empty to skip): \x1b[0m");
                flush();
                let output = get_user_input();
                let output = output.trim();
                let output = if output.is_empty() { None } else { Some(output) };
                if let Err(e) = solve_case_file(file_name.trim(), output) {
                    error!("{}", e);
                }
            }
            "2" => examples_menu(),
            "0" => {
                println!("Goodbye!");
                break;
            }
            _ => println!("Invalid choice. Please try again."),
        }
    }
}

/// Loads a case, evaluates the wall function once and prints the per-face table.
pub fn solve_case_file(file_name: &str, output: Option<&str>) -> Result<(), WallFunctionError> {
    let WallCase {
        settings,
        mut patch,
        thermal,
    } = load_case_from_file(file_name)?;

    let results = patch.calc_nut(&settings);
    patch.pretty_print(&settings);
    if let Some(output) = output {
        save_results(output, &patch, &settings, &results)?;
    }

    match thermal {
        Some(properties) => {
            let mut state = ThermalWallState::new(patch, settings, properties)?;
            state.correct_boundary_conditions();
            state.update_intermediate_variables();
            info!("alphaEff: {:?}", state.alpha_eff().as_slice());
        }
        None => {
            patch.update_coeffs(&settings);
        }
    }
    Ok(())
}

fn show_main_menu() {
    println!("\x1b[34m\n WallLaw: Spalding wall function for near-wall turbulent viscosity \n\x1b[0m");
    println!("\x1b[33m1. Solve case file\x1b[0m");
    println!("\x1b[33m2. Examples\x1b[0m");
    println!("\x1b[33m0. Exit\x1b[0m");
    print!("\x1b[36mEnter your choice: \x1b[0m");
    flush();
}

fn flush() {
    let _ = io::stdout().flush();
}

pub(crate) fn get_user_input() -> String {
    let mut input = String::new();
    if let Err(e) = io::stdin().read_line(&mut input) {
        error!("Failed to read input: {}", e);
    }
    input
}
