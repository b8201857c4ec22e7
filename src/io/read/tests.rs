// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::{io::Write, path::Path};

use approx::assert_relative_eq;
use fitsio::{
    hdu::FitsHdu,
    images::{ImageDescription, ImageType},
    FitsFile,
};
use indoc::indoc;
use tempfile::{tempdir, Builder};

use super::*;
use crate::error::PhotometryError;

enum Key {
    Float(&'static str, f64),
    Str(&'static str, &'static str),
}

fn write_keys(fptr: &mut FitsFile, hdu: &FitsHdu, keys: &[Key]) {
    for key in keys {
        match *key {
            Key::Float(k, v) => hdu.write_key(fptr, k, v).unwrap(),
            Key::Str(k, v) => hdu.write_key(fptr, k, v).unwrap(),
        }
    }
}

/// Write a FITS file with an empty primary HDU and a small "SCI" image
/// extension, putting the given keys in the primary HDU and extension.
fn write_fits(file: &Path, primary_keys: &[Key], sci_keys: &[Key]) {
    let mut fptr = FitsFile::create(file).open().unwrap();
    let hdu = fptr.primary_hdu().unwrap();
    write_keys(&mut fptr, &hdu, primary_keys);

    let image_description = ImageDescription {
        data_type: ImageType::Double,
        dimensions: &[2, 2],
    };
    let hdu = fptr.create_image("SCI", &image_description).unwrap();
    write_keys(&mut fptr, &hdu, sci_keys);
}

#[test]
fn test_read_fits_calibration_from_primary_hdu() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("image.fits");
    write_fits(
        &file,
        &[
            Key::Float("PHOTFLAM", 1.4715e-19),
            Key::Float("PHOTPLAM", 8039.1),
            Key::Str("PHOTMODE", "WFC3 UVIS2 F814W MJD#55008.0000"),
        ],
        &[],
    );

    let result = read_fits_calibration(&file);
    assert!(result.is_ok(), "{}", result.unwrap_err());
    let cal = result.unwrap();
    assert_relative_eq!(cal.photflam(), 1.4715e-19, max_relative = 1e-12);
    assert_relative_eq!(cal.photplam(), 8039.1, max_relative = 1e-12);
    let obsmode = cal.obsmode().unwrap();
    assert_eq!(obsmode.components(), ["wfc3", "uvis2", "f814w"]);
    assert_eq!(obsmode.mjd(), Some(55008.0));
}

#[test]
fn test_read_fits_calibration_from_sci_extension() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("image.fits");
    write_fits(
        &file,
        &[Key::Float("PHOTPLAM", 8039.1)],
        &[Key::Float("PHOTFLAM", 1.4715e-19), Key::Float("PHOTPLAM", 1.0)],
    );

    let cal = read_fits_calibration(&file).unwrap();
    assert_relative_eq!(cal.photflam(), 1.4715e-19, max_relative = 1e-12);
    // The primary HDU takes precedence.
    assert_relative_eq!(cal.photplam(), 8039.1, max_relative = 1e-12);
    assert!(cal.obsmode().is_none());
}

#[test]
fn test_read_fits_calibration_missing_key() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("image.fits");
    write_fits(&file, &[Key::Float("PHOTFLAM", 1.4715e-19)], &[]);

    let result = read_fits_calibration(&file);
    assert!(matches!(
        result,
        Err(FitsError::MissingKey {
            key: "PHOTPLAM",
            ..
        })
    ));
}

#[test]
fn test_read_fits_calibration_zero_photflam() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("image.fits");
    write_fits(&file, &[Key::Float("PHOTFLAM", 0.0), Key::Float("PHOTPLAM", 8039.1)], &[]);

    let result = read_fits_calibration(&file);
    assert!(matches!(
        result,
        Err(FitsError::Calibration(PhotometryError::MissingCalibration(
            "PHOTFLAM"
        )))
    ));
}

#[test]
fn test_read_fits_calibration_unparsable_value() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("image.fits");
    write_fits(&file, &[Key::Str("PHOTFLAM", "lots"), Key::Float("PHOTPLAM", 8039.1)], &[]);

    let result = read_fits_calibration(&file);
    assert!(matches!(
        result,
        Err(FitsError::Parse {
            key: "PHOTFLAM",
            ..
        })
    ));
}

#[test]
fn test_read_fits_calibration_ignores_bad_photmode() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("image.fits");
    write_fits(
        &file,
        &[
            Key::Float("PHOTFLAM", 1.4715e-19),
            Key::Float("PHOTPLAM", 8039.1),
            Key::Str("PHOTMODE", "WFC3 UVIS2 F814W CONT#1e-14"),
        ],
        &[],
    );

    let cal = read_fits_calibration(&file).unwrap();
    assert!(cal.obsmode().is_none());
}

#[test]
fn test_read_fits_calibration_missing_file() {
    let result = read_fits_calibration(Path::new("/does/not/exist.fits"));
    assert!(matches!(result, Err(FitsError::Open { .. })));
}

#[test]
fn test_parse_measurements() {
    let text = indoc! {"
        # flux [counts/s]
        5.2393
        7.2935, 3.2355  # two on one line
        4.9368

    "};
    let result = parse_measurements(text);
    assert!(result.is_ok(), "{}", result.unwrap_err());
    assert_eq!(
        result.unwrap().fluxes(),
        [5.2393, 7.2935, 3.2355, 4.9368]
    );
}

#[test]
fn test_parse_measurements_keeps_bad_fluxes() {
    // Negative fluxes are rejected during calibration, not parsing.
    let measurements = parse_measurements("1.0 -2.0 0").unwrap();
    assert_eq!(measurements.fluxes(), [1.0, -2.0, 0.0]);
}

#[test]
fn test_parse_bad_measurements() {
    let result = parse_measurements("1.0\n2.0\nthree\n");
    assert!(matches!(
        result,
        Err(MeasurementReadError::BadValue { line: 3, .. })
    ));

    let result = parse_measurements("# nothing here\n\n");
    assert!(matches!(result, Err(MeasurementReadError::Empty(_))));
}

#[test]
fn test_read_measurements_files() {
    let mut txt = Builder::new().suffix(".txt").tempfile().unwrap();
    writeln!(txt, "1.5\n2.5").unwrap();
    txt.flush().unwrap();
    let measurements = read_measurements(txt.path()).unwrap();
    assert_eq!(measurements.fluxes(), [1.5, 2.5]);

    let mut json = Builder::new().suffix(".json").tempfile().unwrap();
    write!(json, "[1.5, 2.5, 3.5]").unwrap();
    json.flush().unwrap();
    let measurements = read_measurements(json.path()).unwrap();
    assert_eq!(measurements.fluxes(), [1.5, 2.5, 3.5]);

    let mut empty = Builder::new().suffix(".json").tempfile().unwrap();
    write!(empty, "[]").unwrap();
    empty.flush().unwrap();
    let result = read_measurements(empty.path());
    assert!(matches!(result, Err(MeasurementReadError::Empty(_))));
}
