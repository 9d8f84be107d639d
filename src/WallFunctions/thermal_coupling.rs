//! # Thermal wall coupling
//!
//! ## Aim
//! A steady incompressible solver with an energy equation evaluates its state residuals
//! after every boundary condition has been corrected and every intermediate variable
//! refreshed. On a wall governed by the Spalding function the intermediate variable is
//! the turbulent thermal diffusivity
//! ```text
//! alphat = nut / Prt
//! ```
//! and the effective diffusivity entering the temperature residual is `nu/Pr + alphat`.
//!
//! ## Main Data Structures and Logic
//! - `BoundaryCorrection`: the two hooks a residual evaluator calls before assembling residuals
//! - `ThermalProperties`: laminar and turbulent Prandtl numbers
//! - `ThermalWallState`: wall patch + wall function settings + alphat on the wall faces
use crate::WallFunctions::wall_function_error::WallFunctionError;
use crate::WallFunctions::wall_patch::{PatchUpdateSummary, WallPatch};
use crate::settings::WallFunctionSettings;
use log::info;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

/// Hooks called by a residual evaluator before the residuals are assembled
pub trait BoundaryCorrection {
    /// update the boundary values of the states
    fn correct_boundary_conditions(&mut self) -> PatchUpdateSummary;
    /// update quantities derived from the states that the residuals depend on
    fn update_intermediate_variables(&mut self);
}

#[allow(non_snake_case)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThermalProperties {
    /// laminar Prandtl number
    pub Pr: f64,
    /// turbulent Prandtl number
    pub Prt: f64,
}

impl ThermalProperties {
    #[allow(non_snake_case)]
    pub fn new(Pr: f64, Prt: f64) -> Result<Self, WallFunctionError> {
        for (name, value) in [("Pr", Pr), ("Prt", Prt)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(WallFunctionError::InvalidThermalProperty {
                    name: name.to_string(),
                    value,
                });
            }
        }
        Ok(Self { Pr, Prt })
    }
}

#[derive(Debug, Clone)]
pub struct ThermalWallState {
    pub patch: WallPatch,
    pub settings: WallFunctionSettings,
    pub properties: ThermalProperties,
    /// turbulent thermal diffusivity on the wall faces [m²/s]
    pub alphat: DVector<f64>,
}

impl ThermalWallState {
    pub fn new(
        patch: WallPatch,
        settings: WallFunctionSettings,
        properties: ThermalProperties,
    ) -> Result<Self, WallFunctionError> {
        settings.validate()?;
        // revalidates values that may have been built without ThermalProperties::new
        let properties = ThermalProperties::new(properties.Pr, properties.Prt)?;
        let alphat = &patch.nut / properties.Prt;
        Ok(Self {
            patch,
            settings,
            properties,
            alphat,
        })
    }

    /// nu/Pr + alphat per wall face
    pub fn alpha_eff(&self) -> DVector<f64> {
        &self.patch.nu / self.properties.Pr + &self.alphat
    }
}

impl BoundaryCorrection for ThermalWallState {
    fn correct_boundary_conditions(&mut self) -> PatchUpdateSummary {
        self.patch.update_coeffs(&self.settings)
    }

    fn update_intermediate_variables(&mut self) {
        self.alphat = &self.patch.nut / self.properties.Prt;
        info!(
            "patch '{}': alphat updated, max {:e}",
            self.patch.name,
            self.alphat.max()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn heated_wall() -> ThermalWallState {
        let patch = WallPatch::new(
            "heatedWall",
            vec![1e-3, 2e-3],
            vec![1.5e-5, 1.5e-5],
            vec![800.0, 500.0],
            vec![1.0, 1.3],
            None,
        )
        .unwrap();
        ThermalWallState::new(
            patch,
            WallFunctionSettings::default(),
            ThermalProperties::new(0.71, 0.85).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_invalid_prandtl_numbers() {
        assert!(ThermalProperties::new(0.71, 0.0).is_err());
        assert!(matches!(
            ThermalProperties::new(-9999.0, 0.85),
            Err(WallFunctionError::InvalidThermalProperty { name, .. }) if name == "Pr"
        ));
    }

    #[test]
    fn test_alphat_follows_nut() {
        let mut state = heated_wall();
        assert!(state.alphat.iter().all(|a| *a == 0.0));

        state.correct_boundary_conditions();
        state.update_intermediate_variables();
        for facei in 0..state.patch.len() {
            assert_relative_eq!(
                state.alphat[facei],
                state.patch.nut[facei] / 0.85,
                epsilon = 1e-15
            );
            assert!(state.alphat[facei] >= 0.0);
        }
    }

    #[test]
    fn test_alpha_eff() {
        let mut state = heated_wall();
        state.correct_boundary_conditions();
        state.update_intermediate_variables();
        let alpha_eff = state.alpha_eff();
        for facei in 0..state.patch.len() {
            assert_relative_eq!(
                alpha_eff[facei],
                1.5e-5 / 0.71 + state.alphat[facei],
                epsilon = 1e-15
            );
        }
    }
}
