// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use approx::assert_abs_diff_eq;
use fitsio::FitsFile;
use tempfile::tempdir;

use crate::{get_cmd_output, make_file_in_dir, photzpt, WFC3_TABLE};

const CALIBRATION_ARGS: [&str; 6] = [
    "--photflam",
    "1.4715e-19",
    "--photplam",
    "8039.1",
    "--vega-zp",
    "24.67",
];

const APERTURE_ARGS: [&str; 4] = ["--ap-corr-small", "0.9", "--ap-corr-inf", "0.915"];

#[test]
fn test_photometry_to_stdout() {
    let cmd = photzpt()
        .arg("photometry")
        .args(CALIBRATION_ARGS)
        .args(APERTURE_ARGS)
        .args(["--fluxes", "5.2393", "7.2935"])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    let (stdout, _) = get_cmd_output(cmd);
    assert!(
        stdout.contains("# Zeropoints: VegaMag 24.670000, STMag 25.980599, ABMag 25.146562"),
        "{stdout}"
    );
    // Aperture-corrected count rates and magnitudes.
    assert!(stdout.contains("6.362234"), "{stdout}");
    assert!(stdout.contains("22.660976"), "{stdout}");
    assert!(stdout.contains("8.856709"), "{stdout}");
    assert!(stdout.contains("23.612418"), "{stdout}");
}

#[test]
fn test_photometry_to_json() {
    let dir = tempdir().unwrap();
    let json = dir.path().join("results.json");
    let cmd = photzpt()
        .arg("phot")
        .args(CALIBRATION_ARGS)
        .args(APERTURE_ARGS)
        .args(["-o", json.to_str().unwrap()])
        .args(["--fluxes", "5.2393", "7.2935", "3.2355"])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));

    let contents = std::fs::read_to_string(&json).unwrap();
    let table: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_abs_diff_eq!(
        table["zeropoints"]["st"].as_f64().unwrap(),
        25.980599,
        epsilon = 1e-6
    );
    let rows = table["results"].as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_abs_diff_eq!(
        rows[0]["corrected_flux"].as_f64().unwrap(),
        6.362234,
        epsilon = 1e-6
    );
    assert_abs_diff_eq!(
        rows[0]["ab_mag"].as_f64().unwrap(),
        23.137538,
        epsilon = 1e-6
    );
    assert_abs_diff_eq!(
        rows[2]["st_mag"].as_f64().unwrap(),
        24.494905,
        epsilon = 1e-6
    );
}

#[test]
fn test_photometry_from_table() {
    let dir = tempdir().unwrap();
    let table = make_file_in_dir("wfc3.toml", dir.path(), WFC3_TABLE);
    let cmd = photzpt()
        .args([
            "photometry",
            "--table",
            table.to_str().unwrap(),
            "--obsmode",
            "wfc3,uvis2,f814w,mjd#55008,aper#0.2",
            "--medium-aperture",
            "0.5",
            "--fluxes",
            "5.2393",
        ])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    let (stdout, _) = get_cmd_output(cmd);
    // The small-to-medium correction is the ratio of the reference count rates.
    assert!(
        stdout.contains("# Aperture corrections: 0.915585 (small to medium), 0.915000 (medium to infinite)"),
        "{stdout}"
    );
    assert!(stdout.contains("24.670000"), "{stdout}");
}

#[test]
fn test_photometry_from_fits() {
    let dir = tempdir().unwrap();
    let fits = dir.path().join("image.fits");
    {
        let mut fptr = FitsFile::create(&fits).open().unwrap();
        let hdu = fptr.primary_hdu().unwrap();
        hdu.write_key(&mut fptr, "PHOTFLAM", 1.4715e-19).unwrap();
        hdu.write_key(&mut fptr, "PHOTPLAM", 8039.1).unwrap();
        hdu.write_key(&mut fptr, "PHOTMODE", "WFC3 UVIS2 F814W MJD#55008.0000")
            .unwrap();
    }

    let cmd = photzpt()
        .args(["photometry", "--fits", fits.to_str().unwrap()])
        .args(["--vega-zp", "24.67"])
        .args(APERTURE_ARGS)
        .args(["--fluxes", "5.2393"])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("# obsmode: wfc3,uvis2,f814w"), "{stdout}");
    assert!(stdout.contains("23.971575"), "{stdout}");
}

#[test]
fn test_photometry_measurements_file() {
    let dir = tempdir().unwrap();
    let measurements = make_file_in_dir(
        "counts.txt",
        dir.path(),
        "# count rates\n5.2393, 7.2935\n3.2355\n",
    );
    let cmd = photzpt()
        .arg("photometry")
        .args(CALIBRATION_ARGS)
        .args(APERTURE_ARGS)
        .args(["--measurements", measurements.to_str().unwrap()])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("24.494905"), "{stdout}");
}

#[test]
fn test_photometry_rejects_negative_flux() {
    let dir = tempdir().unwrap();
    let measurements = make_file_in_dir("counts.txt", dir.path(), "5.2393\n-1.0\n");
    let cmd = photzpt()
        .arg("photometry")
        .args(CALIBRATION_ARGS)
        .args(APERTURE_ARGS)
        .args(["--measurements", measurements.to_str().unwrap()])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("positive"), "{stderr}");
}

#[test]
fn test_photometry_needs_aperture_corrections() {
    let cmd = photzpt()
        .arg("photometry")
        .args(CALIBRATION_ARGS)
        .args(["--ap-corr-small", "0.9", "--fluxes", "5.2393"])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("medium-to-infinite"), "{stderr}");
}

#[test]
fn test_photometry_dry_run() {
    let dir = tempdir().unwrap();
    let json = dir.path().join("results.json");
    let cmd = photzpt()
        .args(["photometry", "--dry-run"])
        .args(CALIBRATION_ARGS)
        .args(APERTURE_ARGS)
        .args(["-o", json.to_str().unwrap()])
        .args(["--fluxes", "5.2393"])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    assert!(!json.exists());
}
