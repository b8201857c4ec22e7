// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Reading calibration constants from the headers of calibrated images.

use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use fitsio::{hdu::FitsHdu, FitsFile};
use log::{debug, trace};
use thiserror::Error;

use crate::{
    calibration::{CalibrationConstants, Obsmode},
    cli::Warn,
    error::PhotometryError,
};

/// Calibrated images usually carry their photometric keywords in either the
/// primary header or the first (science) extension.
const CALIBRATION_HDUS: [usize; 2] = [0, 1];

/// Open a fits file.
#[track_caller]
fn fits_open(file: &Path) -> Result<FitsFile, FitsError> {
    FitsFile::open(file).map_err(|e| {
        let caller = std::panic::Location::caller();
        FitsError::Open {
            fits_error: Box::new(e),
            fits_filename: file.to_path_buf(),
            source_file: caller.file(),
            source_line: caller.line(),
            source_column: caller.column(),
        }
    })
}

/// Given a FITS file pointer, a HDU that belongs to it, and a keyword that may
/// or may not exist, pull out the value of the keyword, parsing it into the
/// desired type.
#[track_caller]
fn fits_get_optional_key<T: FromStr>(
    fits_fptr: &mut FitsFile,
    hdu: &FitsHdu,
    keyword: &'static str,
) -> Result<Option<T>, FitsError> {
    let unparsed_value: String = match hdu.read_key(fits_fptr, keyword) {
        Ok(value) => value,
        // Key doesn't exist.
        Err(fitsio::errors::Error::Fits(fe)) if fe.status == 202 || fe.status == 204 => {
            return Ok(None)
        }
        Err(e) => {
            let caller = std::panic::Location::caller();
            return Err(FitsError::Fitsio {
                fits_error: Box::new(e),
                fits_filename: fits_fptr.file_path().to_path_buf(),
                hdu_num: hdu.number,
                source_file: caller.file(),
                source_line: caller.line(),
                source_column: caller.column(),
            });
        }
    };

    match unparsed_value.trim().parse() {
        Ok(value) => Ok(Some(value)),
        Err(_) => Err(FitsError::Parse {
            key: keyword,
            value: unparsed_value,
            fits_filename: fits_fptr.file_path().to_path_buf(),
            hdu_num: hdu.number,
        }),
    }
}

/// Read PHOTFLAM and PHOTPLAM (and, if available, PHOTMODE) from a FITS file.
/// The first HDU carrying each keyword is used.
pub(crate) fn read_fits_calibration(file: &Path) -> Result<CalibrationConstants, FitsError> {
    debug!("Reading calibration keywords from {}", file.display());
    let mut fptr = fits_open(file)?;

    let mut photflam: Option<f64> = None;
    let mut photplam: Option<f64> = None;
    let mut photmode: Option<String> = None;
    for hdu_num in CALIBRATION_HDUS {
        let hdu = match fptr.hdu(hdu_num) {
            Ok(hdu) => hdu,
            // Only the primary HDU is guaranteed to exist.
            Err(_) if hdu_num > 0 => {
                trace!("{} has no HDU {hdu_num}", file.display());
                break;
            }
            Err(e) => {
                return Err(FitsError::Fitsio {
                    fits_error: Box::new(e),
                    fits_filename: file.to_path_buf(),
                    hdu_num,
                    source_file: file!(),
                    source_line: line!(),
                    source_column: column!(),
                })
            }
        };

        if photflam.is_none() {
            photflam = fits_get_optional_key(&mut fptr, &hdu, "PHOTFLAM")?;
        }
        if photplam.is_none() {
            photplam = fits_get_optional_key(&mut fptr, &hdu, "PHOTPLAM")?;
        }
        if photmode.is_none() {
            photmode = fits_get_optional_key(&mut fptr, &hdu, "PHOTMODE")?;
        }
        if photflam.is_some() && photplam.is_some() && photmode.is_some() {
            break;
        }
    }

    let missing = |key| FitsError::MissingKey {
        key,
        fits_filename: file.to_path_buf(),
    };
    let photflam = photflam.ok_or_else(|| missing("PHOTFLAM"))?;
    let photplam = photplam.ok_or_else(|| missing("PHOTPLAM"))?;
    debug!("PHOTFLAM: {photflam:e}, PHOTPLAM: {photplam}");
    let cal = CalibrationConstants::new(photflam, photplam)?;

    let cal = match photmode.map(|p| (Obsmode::from_str(&p), p)) {
        Some((Ok(obsmode), _)) => {
            debug!("PHOTMODE: {obsmode}");
            cal.with_obsmode(obsmode)
        }
        Some((Err(e), p)) => {
            format!(
                "Couldn't use PHOTMODE '{p}' from {}; calibration consistency won't be checked: {e}",
                file.display()
            )
            .warn();
            cal
        }
        None => cal,
    };

    Ok(cal)
}

#[derive(Error, Debug)]
pub enum FitsError {
    /// Error when opening a fits file.
    #[error(
        "{source_file}:{source_line}:{source_column}: Couldn't open {fits_filename}: {fits_error}"
    )]
    Open {
        fits_error: Box<fitsio::errors::Error>,
        fits_filename: PathBuf,
        source_file: &'static str,
        source_line: u32,
        source_column: u32,
    },

    /// Error describing a key that couldn't be found in any of the searched
    /// HDUs.
    #[error("{fits_filename}: Couldn't find key {key} in HDUs {CALIBRATION_HDUS:?}")]
    MissingKey {
        key: &'static str,
        fits_filename: PathBuf,
    },

    /// A generic error associated with the fitsio crate.
    #[error(
        "{source_file}:{source_line}:{source_column}: {fits_filename} HDU {hdu_num}: {fits_error}"
    )]
    Fitsio {
        fits_error: Box<fitsio::errors::Error>,
        fits_filename: PathBuf,
        hdu_num: usize,
        source_file: &'static str,
        source_line: u32,
        source_column: u32,
    },

    /// An error associated with parsing a string into another type.
    #[error("{fits_filename} HDU {hdu_num}: Couldn't parse the value '{value}' of {key}")]
    Parse {
        key: &'static str,
        value: String,
        fits_filename: PathBuf,
        hdu_num: usize,
    },

    #[error("{0}")]
    Calibration(#[from] PhotometryError),
}
