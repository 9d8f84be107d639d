use crate::WallFunctions::spalding::FaceResult;
use crate::WallFunctions::thermal_coupling::ThermalProperties;
use crate::WallFunctions::wall_function_error::WallFunctionError;
use crate::WallFunctions::wall_patch::WallPatch;
use crate::settings::WallFunctionSettings;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// one wall face as written in a case file
#[allow(non_snake_case)]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceRecord {
    pub y: f64,
    pub nu: f64,
    pub magGradU: f64,
    pub magUp: f64,
    #[serde(default)]
    pub nut: Option<f64>,
}

/// case file layout
/// ```json
/// {
///   "patch": "lowerWall",
///   "wallFunction": { "tolerance": 1e-8 },
///   "faces": [ { "y": 1e-3, "nu": 1e-5, "magGradU": 1000.0, "magUp": 1.0, "nut": 0.0 } ],
///   "thermal": { "Pr": 0.71, "Prt": 0.85 }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseFile {
    pub patch: String,
    #[serde(rename = "wallFunction", default)]
    pub wall_function: WallFunctionSettings,
    pub faces: Vec<FaceRecord>,
    #[serde(default)]
    pub thermal: Option<ThermalProperties>,
}

#[derive(Debug, Clone)]
pub struct WallCase {
    pub settings: WallFunctionSettings,
    pub patch: WallPatch,
    pub thermal: Option<ThermalProperties>,
}

pub struct LoadData {
    pub file_name: String,
}

impl LoadData {
    pub fn new(file_name: String) -> Self {
        LoadData { file_name }
    }
    pub fn load_case(&self) -> Result<WallCase, WallFunctionError> {
        load_case_from_file(&self.file_name)
    }
}

impl CaseFile {
    pub fn into_case(self, file_name: &str) -> Result<WallCase, WallFunctionError> {
        if self.faces.is_empty() {
            warn!("Case '{}' has no faces on patch '{}'", file_name, self.patch);
            return Err(WallFunctionError::EmptyCase(file_name.to_string()));
        }
        self.wall_function.validate()?;
        let thermal = match self.thermal {
            Some(p) => Some(ThermalProperties::new(p.Pr, p.Prt)?),
            None => None,
        };

        let unseeded = self.faces.iter().filter(|f| f.nut.is_none()).count();
        if unseeded > 0 {
            warn!(
                "{} of {} faces on patch '{}' have no stored nut, seeding with laminar viscosity only",
                unseeded,
                self.faces.len(),
                self.patch
            );
        }

        let faces = &self.faces;
        let patch = WallPatch::new(
            &self.patch,
            column(faces, |f| f.y),
            column(faces, |f| f.nu),
            column(faces, |f| f.magGradU),
            column(faces, |f| f.magUp),
            Some(column(faces, |f| f.nut.unwrap_or(0.0))),
        )?;
        Ok(WallCase {
            settings: self.wall_function,
            patch,
            thermal,
        })
    }
}

fn column(faces: &[FaceRecord], get: impl Fn(&FaceRecord) -> f64) -> Vec<f64> {
    faces.iter().map(get).collect()
}

/// Reads a JSON case file with one wall patch.
pub fn load_case_from_file(file_name: &str) -> Result<WallCase, WallFunctionError> {
    let path = Path::new(file_name);
    let file = File::open(path).map_err(|e| {
        error!("Failed to open case file '{}': {}", file_name, e);
        e
    })?;
    let case: CaseFile = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        error!(
            "Error parsing case file '{}' at line {}, column {}: {}",
            file_name,
            e.line(),
            e.column(),
            e
        );
        e
    })?;
    let case = case.into_case(file_name)?;
    info!(
        "Loaded wall patch '{}' with {} faces from '{}'",
        case.patch.name,
        case.patch.len(),
        file_name
    );
    Ok(case)
}

#[allow(non_snake_case)]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceOutput {
    pub face: usize,
    pub uTau: f64,
    pub yPlus: f64,
    pub nut: f64,
    pub error: f64,
    pub iterations: u32,
    pub carried_forward: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchOutput {
    pub patch: String,
    /// non-default wall function entries only
    #[serde(rename = "wallFunction")]
    pub wall_function: serde_json::Map<String, serde_json::Value>,
    pub faces: Vec<FaceOutput>,
}

/// Writes per-face wall function results as JSON.
pub fn save_results(
    file_name: &str,
    patch: &WallPatch,
    settings: &WallFunctionSettings,
    results: &[FaceResult],
) -> Result<(), WallFunctionError> {
    let y_plus = patch.y_plus(settings);
    let faces = results
        .iter()
        .enumerate()
        .map(|(face, r)| FaceOutput {
            face,
            uTau: r.friction_velocity,
            yPlus: y_plus[face],
            nut: r.turbulent_viscosity,
            error: r.relative_error,
            iterations: r.iterations_used,
            carried_forward: r.update.is_carried_forward(),
        })
        .collect();
    let output = PatchOutput {
        patch: patch.name.clone(),
        wall_function: settings.write_entries(),
        faces,
    };
    let file = File::create(file_name)?;
    serde_json::to_writer_pretty(BufWriter::new(file), &output)?;
    info!("Saved results of patch '{}' to '{}'", patch.name, file_name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CASE: &str = r#"{
        "patch": "lowerWall",
        "wallFunction": { "tolerance": 1e-8, "maxIter": 200 },
        "faces": [
            { "y": 1e-3, "nu": 1e-5, "magGradU": 1000.0, "magUp": 1.0, "nut": 0.0 },
            { "y": 5e-3, "nu": 1e-5, "magGradU": 150.0, "magUp": 1.2 }
        ],
        "thermal": { "Pr": 0.71, "Prt": 0.85 }
    }"#;

    fn write_case(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_case() {
        let file = write_case(CASE);
        let loader = LoadData::new(file.path().to_str().unwrap().to_string());
        let case = loader.load_case().unwrap();
        assert_eq!(case.patch.name, "lowerWall");
        assert_eq!(case.patch.len(), 2);
        assert_eq!(case.settings.max_iter, 200);
        assert_eq!(case.settings.tolerance, 1e-8);
        assert_eq!(case.settings.kappa, 0.41);
        assert_eq!(case.patch.nut[1], 0.0);
        let thermal = case.thermal.unwrap();
        assert_eq!(thermal.Prt, 0.85);
    }

    #[test]
    fn test_missing_wall_function_entry_uses_defaults() {
        let file = write_case(
            r#"{"patch": "w", "faces": [{"y": 1e-3, "nu": 1e-5, "magGradU": 10.0, "magUp": 0.1}]}"#,
        );
        let case = load_case_from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(case.settings, WallFunctionSettings::default());
        assert!(case.thermal.is_none());
    }

    #[test]
    fn test_empty_and_broken_cases() {
        let file = write_case(r#"{"patch": "w", "faces": []}"#);
        let result = load_case_from_file(file.path().to_str().unwrap());
        assert!(matches!(result, Err(WallFunctionError::EmptyCase(_))));

        let file = write_case(r#"{"patch": "w", "faces": [ {"y": 1e-3 "#);
        let result = load_case_from_file(file.path().to_str().unwrap());
        assert!(matches!(result, Err(WallFunctionError::Serde(_))));

        let result = load_case_from_file("no_such_case_file.json");
        assert!(matches!(result, Err(WallFunctionError::Io(_))));
    }

    #[test]
    fn test_save_results() {
        let file = write_case(CASE);
        let mut case = load_case_from_file(file.path().to_str().unwrap()).unwrap();
        let results = case.patch.calc_nut(&case.settings);
        case.patch.update_coeffs(&case.settings);

        let out = NamedTempFile::new().unwrap();
        let out_name = out.path().to_str().unwrap();
        save_results(out_name, &case.patch, &case.settings, &results).unwrap();

        let text = std::fs::read_to_string(out_name).unwrap();
        let saved: PatchOutput = serde_json::from_str(&text).unwrap();
        assert_eq!(saved.patch, "lowerWall");
        assert_eq!(saved.faces.len(), 2);
        assert_eq!(saved.wall_function.len(), 2);
        assert!(saved.faces.iter().all(|f| f.nut >= 0.0 && f.uTau > 0.0));
    }
}
