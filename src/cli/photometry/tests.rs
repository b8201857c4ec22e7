// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::io::Write;

use approx::{assert_abs_diff_eq, assert_relative_eq};
use indoc::indoc;
use tempfile::{tempdir, Builder};

use super::*;

fn get_args() -> PhotometryArgs {
    PhotometryArgs {
        calibration: CalibrationArgs {
            photflam: Some(1.4715e-19),
            photplam: Some(8039.1),
            vega_zp: Some(24.67),
            fits: None,
        },
        aperture: ApertureArgs {
            ap_corr_small: Some(0.9),
            ap_corr_inf: Some(0.915),
            ..Default::default()
        },
        fluxes: Some(vec![5.2393, 7.2935, 3.2355, 4.9368]),
        ..Default::default()
    }
}

#[test]
fn test_merge_with_arg_file() {
    let mut arg_file = Builder::new().suffix(".toml").tempfile().unwrap();
    write!(
        arg_file,
        "{}",
        indoc! {r#"
            fluxes = [5.2393, 7.2935]

            [calibration]
            photflam = 1.4715e-19
            photplam = 8039.1
            vega_zp = 24.67

            [aperture]
            ap_corr_small = 0.9
            ap_corr_inf = 0.915
        "#}
    )
    .unwrap();
    arg_file.flush().unwrap();

    let args = PhotometryArgs {
        args_file: Some(arg_file.path().to_path_buf()),
        fluxes: Some(vec![1.0]),
        aperture: ApertureArgs {
            ap_corr_inf: Some(0.8),
            ..Default::default()
        },
        ..Default::default()
    };
    let result = args.merge();
    assert!(result.is_ok(), "{}", result.unwrap_err());
    let merged = result.unwrap();
    assert!(merged.args_file.is_none());
    // CLI arguments take precedence.
    assert_eq!(merged.fluxes, Some(vec![1.0]));
    assert_eq!(merged.aperture.ap_corr_inf, Some(0.8));
    // Values from the file may not be bit-for-bit what was written.
    assert_abs_diff_eq!(merged.aperture.ap_corr_small.unwrap(), 0.9);
    assert_relative_eq!(
        merged.calibration.photflam.unwrap(),
        1.4715e-19,
        max_relative = 1e-12
    );
    assert_abs_diff_eq!(merged.calibration.vega_zp.unwrap(), 24.67);
}

#[test]
fn test_cli_measurements_replace_file_fluxes() {
    let dir = tempdir().unwrap();
    let arg_file = dir.path().join("args.toml");
    std::fs::write(&arg_file, "fluxes = [5.2393, 7.2935]\n").unwrap();
    let measurements = dir.path().join("counts.txt");
    std::fs::write(&measurements, "3.2355\n").unwrap();

    let mut args = get_args();
    args.fluxes = None;
    args.args_file = Some(arg_file.clone());
    args.measurements = Some(measurements);
    let merged = args.merge().unwrap();
    assert!(merged.fluxes.is_none());
    let params = merged.parse().unwrap();
    assert_eq!(params.measurements.fluxes(), [3.2355]);

    // And the other way around.
    std::fs::write(&arg_file, "measurements = \"counts.txt\"\n").unwrap();
    let mut args = get_args();
    args.args_file = Some(arg_file);
    let merged = args.merge().unwrap();
    assert!(merged.measurements.is_none());
    let params = merged.parse().unwrap();
    assert_eq!(params.measurements.len(), 4);
}

#[test]
fn test_bad_arg_file_extension() {
    let arg_file = Builder::new().suffix(".ini").tempfile().unwrap();
    let result = PhotometryArgs {
        args_file: Some(arg_file.path().to_path_buf()),
        ..Default::default()
    }
    .merge();
    assert!(matches!(result, Err(PhotzptError::ArgFile(_))));
}

#[test]
fn test_parse() {
    let result = get_args().parse();
    assert!(result.is_ok(), "{}", result.as_ref().err().unwrap());
    let params = result.unwrap();
    assert_eq!(params.measurements.len(), 4);
    assert_abs_diff_eq!(params.aperture_corrections.total(), 0.9 * 0.915);
    assert_abs_diff_eq!(params.zeropoints.st, 25.980599, epsilon = 1e-6);
    assert!(params.outputs.is_empty());
}

#[test]
fn test_parse_needs_both_aperture_corrections() {
    let mut args = get_args();
    args.aperture.ap_corr_inf = None;
    let result = args.parse();
    match result {
        Err(PhotzptError::ApertureCorrection(s)) => {
            assert!(s.contains("medium-to-infinite"), "{s}")
        }
        Err(e) => panic!("Unexpected error: {e}"),
        Ok(_) => panic!("Expected an error"),
    }
}

#[test]
fn test_parse_measurement_sources() {
    let mut args = get_args();
    args.fluxes = None;
    assert!(matches!(args.parse(), Err(PhotzptError::Measurements(_))));

    let mut args = get_args();
    args.fluxes = Some(vec![]);
    assert!(matches!(args.parse(), Err(PhotzptError::Measurements(_))));

    let mut file = Builder::new().suffix(".txt").tempfile().unwrap();
    writeln!(file, "5.2393 7.2935").unwrap();
    file.flush().unwrap();
    let mut args = get_args();
    args.measurements = Some(file.path().to_path_buf());
    assert!(matches!(args.clone().parse(), Err(PhotzptError::Measurements(_))));

    args.fluxes = None;
    let params = args.parse().unwrap();
    assert_eq!(params.measurements.fluxes(), [5.2393, 7.2935]);
}

#[test]
fn test_parse_outputs() {
    let dir = tempdir().unwrap();
    let mut args = get_args();
    args.outputs = Some(vec![dir.path().join("results.csv")]);
    assert!(matches!(args.parse(), Err(PhotzptError::Generic(_))));

    let mut args = get_args();
    args.outputs = Some(vec![
        dir.path().join("results.txt"),
        dir.path().join("results.JSON"),
    ]);
    let params = args.parse().unwrap();
    assert_eq!(params.outputs.len(), 2);
    assert_eq!(params.outputs[0].1, ResultsOutputType::Txt);
    assert_eq!(params.outputs[1].1, ResultsOutputType::Json);
}

#[test]
fn test_run_writes_outputs() {
    let dir = tempdir().unwrap();
    let json = dir.path().join("results.json");
    let mut args = get_args();
    args.outputs = Some(vec![json.clone()]);
    let result = args.run(false);
    assert!(result.is_ok(), "{}", result.unwrap_err());

    let contents = std::fs::read_to_string(&json).unwrap();
    let table: serde_json::Value = serde_json::from_str(&contents).unwrap();
    let rows = table["results"].as_array().unwrap();
    assert_eq!(rows.len(), 4);
    assert_abs_diff_eq!(
        rows[2]["st_mag"].as_f64().unwrap(),
        24.494905,
        epsilon = 1e-6
    );
}

#[test]
fn test_dry_run_writes_nothing() {
    let dir = tempdir().unwrap();
    let json = dir.path().join("results.json");
    let mut args = get_args();
    args.outputs = Some(vec![json.clone()]);
    args.run(true).unwrap();
    assert!(!json.exists());
}

#[test]
fn test_run_rejects_bad_flux() {
    let mut args = get_args();
    args.fluxes = Some(vec![5.2393, -1.0]);
    let result = args.run(false);
    assert!(matches!(result, Err(PhotzptError::Photometry(_))));
}
