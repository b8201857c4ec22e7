// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use indoc::indoc;
use tempfile::tempdir;

use crate::{get_cmd_output, make_file_in_dir, photzpt, WFC3_TABLE};

#[test]
fn test_zeropoints_from_explicit_constants() {
    let cmd = photzpt()
        .args([
            "zeropoints",
            "--photflam",
            "1e-18",
            "--photplam",
            "5500",
            "--vega-zp",
            "23",
        ])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("stmag"), "{stdout}");
    assert!(stdout.contains("23.900000"), "{stdout}");
    assert!(stdout.contains("23.890187"), "{stdout}");
    assert!(stdout.contains("23.000000"), "{stdout}");
}

#[test]
fn test_zeropoints_from_table() {
    let dir = tempdir().unwrap();
    let table = make_file_in_dir("wfc3.toml", dir.path(), WFC3_TABLE);
    let cmd = photzpt()
        .args([
            "zp",
            "--table",
            table.to_str().unwrap(),
            "--obsmode",
            "wfc3,uvis2,f814w,mjd#55008",
        ])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("25.980599"), "{stdout}");
    assert!(stdout.contains("25.146562"), "{stdout}");
    assert!(stdout.contains("24.670000"), "{stdout}");
    // The obsmode's epoch is shown as a UTC date.
    assert!(stdout.contains("Epoch: 2009-06-26"), "{stdout}");
}

#[test]
fn test_zeropoints_converts_magnitudes() {
    // A 23.9 STMag source has a count rate of 1 count/s.
    let cmd = photzpt()
        .args([
            "zeropoints",
            "--photflam",
            "1e-18",
            "--photplam",
            "5500",
            "--vega-zp",
            "23",
            "--system",
            "STMAG",
            "--magnitudes",
            "23.9",
        ])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("1.000000"), "{stdout}");
}

#[test]
fn test_zeropoints_unknown_system() {
    let cmd = photzpt()
        .args([
            "zeropoints",
            "--photflam",
            "1e-18",
            "--photplam",
            "5500",
            "--vega-zp",
            "23",
            "--system",
            "johnson",
        ])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("johnson"), "{stderr}");
}

#[test]
fn test_zeropoints_missing_calibration() {
    let cmd = photzpt()
        .args(["zeropoints", "--photplam", "5500", "--vega-zp", "23"])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("--photflam"), "{stderr}");
}

#[test]
fn test_zeropoints_zero_photflam() {
    let cmd = photzpt()
        .args([
            "zeropoints",
            "--photflam",
            "0",
            "--photplam",
            "5500",
            "--vega-zp",
            "23",
        ])
        .ok();
    assert!(cmd.is_err());
}

#[test]
fn test_zeropoints_arg_file_and_save_toml() {
    let dir = tempdir().unwrap();
    let args_file = make_file_in_dir(
        "args.toml",
        dir.path(),
        indoc! {r#"
            [calibration]
            photflam = 1e-18
            photplam = 5500.0
            vega_zp = 23.0
        "#},
    );
    let saved = dir.path().join("saved.toml");
    let cmd = photzpt()
        .args([
            "zeropoints",
            args_file.to_str().unwrap(),
            "--save-toml",
            saved.to_str().unwrap(),
        ])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("23.900000"), "{stdout}");

    // The saved arguments reproduce the run.
    let contents = std::fs::read_to_string(&saved).unwrap();
    assert!(contents.contains("photflam"), "{contents}");
    let cmd = photzpt()
        .args(["zeropoints", saved.to_str().unwrap()])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
}
