// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Integration tests.
//!
//! Some help for laying out these tests was taken from:
//! https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html

mod photometry;
mod zeropoints;

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::str::from_utf8;

use assert_cmd::{output::OutputError, Command};
use indoc::indoc;

fn photzpt() -> Command {
    Command::cargo_bin("photzpt").unwrap()
}

fn get_cmd_output(result: Result<Output, OutputError>) -> (String, String) {
    let output = match result {
        Ok(o) => o,
        Err(o) => o.as_output().unwrap().clone(),
    };
    (
        from_utf8(&output.stdout).unwrap().to_string(),
        from_utf8(&output.stderr).unwrap().to_string(),
    )
}

fn make_file_in_dir<T: AsRef<Path>, U: AsRef<Path>>(
    filename: T,
    dir: U,
    contents: &str,
) -> PathBuf {
    let path = dir.as_ref().join(filename);
    let mut f = File::create(&path).expect("couldn't make file");
    f.write_all(contents.as_bytes()).unwrap();
    path
}

/// A calibration table for WFC3/UVIS2 F814W. The aperture-free entry carries
/// the VegaMag zeropoint; the 0.2" and 0.5" entries carry count rates of a
/// reference spectrum for deriving the small-to-medium aperture correction.
const WFC3_TABLE: &str = indoc! {r#"
    [[entries]]
    obsmode = "wfc3,uvis2,f814w,mjd#55008"
    photflam = 1.4715e-19
    photplam = 8039.1
    vegamag = 24.67

    [[entries]]
    obsmode = "wfc3,uvis2,f814w,mjd#55008,aper#0.2"
    photflam = 1.4715e-19
    photplam = 8039.1
    count_rate = 0.8113

    [[entries]]
    obsmode = "wfc3,uvis2,f814w,mjd#55008,aper#0.5"
    photflam = 1.4715e-19
    photplam = 8039.1
    count_rate = 0.8861

    [[aperture_corrections]]
    obsmode = "wfc3,uvis2,f814w"
    radius = 0.5
    factor = 0.915
"#};
