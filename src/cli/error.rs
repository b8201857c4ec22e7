// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all photzpt-related errors. This should be the *only* error
//! enum that is publicly visible from the binary's point of view.

use thiserror::Error;

use super::{
    common::CalibrationArgsError, photometry::PhotometryArgsError,
    zeropoints::ZeropointsArgsError,
};
use crate::{
    calibration::ObsmodeParseError,
    error::PhotometryError,
    io::{
        read::{FitsError, MeasurementReadError},
        write::{FileWriteError, ResultsWriteError},
    },
    params::PhotometryRunError,
    synphot::{CalibrationTableError, SynphotError},
};

const CALIBRATION_HINT: &str = "PHOTFLAM and PHOTPLAM can be given with --photflam and --photplam, read from a calibrated image with --fits, or looked up with --table and --obsmode.";

/// The *only* publicly visible error from photzpt. Each error message should
/// include a hint, unless it's "generic".
#[derive(Error, Debug)]
pub enum PhotzptError {
    /// Calibration constants or zeropoints are missing or unusable.
    #[error("{0}\n\n{CALIBRATION_HINT}")]
    Calibration(String),

    /// Inputs were derived for different instrument configurations.
    #[error("{0}\n\nAll calibration inputs must describe the same instrument, detector, filter and epoch; only the aperture may differ.")]
    ConfigMismatch(String),

    /// A value can't be converted, e.g. a non-positive flux.
    #[error("{0}\n\nMagnitudes are only defined for positive, finite count rates.")]
    Photometry(String),

    /// An error related to aperture corrections.
    #[error("{0}\n\nAperture corrections can be given directly (--ap-corr-small, --ap-corr-inf), derived from count rates (--count-rates), or looked up with --table, --obsmode and --medium-aperture.")]
    ApertureCorrection(String),

    /// An unsupported magnitude system.
    #[error("{0}\n\nMagnitude systems are named with --system; VegaMag zeropoints need a calibration table or --vega-zp.")]
    MagnitudeSystem(String),

    /// An error related to calibration tables.
    #[error("{0}\n\nCalibration tables list [[entries]] (obsmode, photflam, photplam, and optionally vegamag and count_rate) and [[aperture_corrections]] (obsmode, radius, factor).")]
    CalibrationTable(String),

    /// An error related to obsmode strings.
    #[error("{0}\n\nObsmodes are comma-separated components and parameters, e.g. 'wfc3,uvis2,f814w,mjd#55008,aper#0.2'.")]
    Obsmode(String),

    /// An error related to measurements.
    #[error("{0}\n\nMeasurements are count rates [counts/s] in the small aperture, given with --fluxes or --measurements.")]
    Measurements(String),

    /// An error related to argument files.
    #[error("{0}\n\nArgument files are TOML or JSON files with the same names as the command-line arguments.")]
    ArgFile(String),

    /// A cfitsio error. Because these are usually quite spartan, some
    /// suggestions are provided here.
    #[error("cfitsio error: {0}\n\nIf you don't know what this means, try turning up verbosity (-v or -vv).")]
    Cfitsio(String),

    /// A generic error that can't be clarified further, e.g. IO errors.
    #[error("{0}")]
    Generic(String),
}

// When changing the error propagation below, ensure `Self::from(e)` uses the
// correct `e`!

impl From<PhotometryError> for PhotzptError {
    fn from(e: PhotometryError) -> Self {
        let s = e.to_string();
        match e {
            PhotometryError::Domain { .. } => Self::Photometry(s),
            PhotometryError::MissingCalibration(_) => Self::Calibration(s),
            PhotometryError::ConfigMismatch { .. } => Self::ConfigMismatch(s),
        }
    }
}

impl From<ObsmodeParseError> for PhotzptError {
    fn from(e: ObsmodeParseError) -> Self {
        Self::Obsmode(e.to_string())
    }
}

impl From<SynphotError> for PhotzptError {
    fn from(e: SynphotError) -> Self {
        match e {
            SynphotError::UnknownObsmode(_) => Self::CalibrationTable(e.to_string()),
            SynphotError::MissingValue { what, .. } => {
                if what.contains("aperture") || what == "count rate" {
                    Self::ApertureCorrection(e.to_string())
                } else {
                    Self::CalibrationTable(e.to_string())
                }
            }
            SynphotError::Photometry(e) => Self::from(e),
        }
    }
}

impl From<CalibrationTableError> for PhotzptError {
    fn from(e: CalibrationTableError) -> Self {
        match e {
            CalibrationTableError::IO(e) => Self::from(e),
            _ => Self::CalibrationTable(e.to_string()),
        }
    }
}

impl From<FitsError> for PhotzptError {
    fn from(e: FitsError) -> Self {
        let s = e.to_string();
        match e {
            FitsError::Open { .. } | FitsError::Fitsio { .. } => Self::Cfitsio(s),
            FitsError::MissingKey { .. } | FitsError::Parse { .. } => Self::Calibration(s),
            FitsError::Calibration(e) => Self::from(e),
        }
    }
}

impl From<MeasurementReadError> for PhotzptError {
    fn from(e: MeasurementReadError) -> Self {
        match e {
            MeasurementReadError::IO(e) => Self::from(e),
            _ => Self::Measurements(e.to_string()),
        }
    }
}

impl From<FileWriteError> for PhotzptError {
    fn from(e: FileWriteError) -> Self {
        Self::Generic(e.to_string())
    }
}

impl From<ResultsWriteError> for PhotzptError {
    fn from(e: ResultsWriteError) -> Self {
        Self::Generic(e.to_string())
    }
}

impl From<PhotometryRunError> for PhotzptError {
    fn from(e: PhotometryRunError) -> Self {
        match e {
            PhotometryRunError::Photometry(e) => Self::from(e),
            PhotometryRunError::Write(e) => Self::from(e),
            PhotometryRunError::IO(e) => Self::from(e),
        }
    }
}

// Binary sub-command errors.

impl From<CalibrationArgsError> for PhotzptError {
    fn from(e: CalibrationArgsError) -> Self {
        let s = e.to_string();
        match e {
            CalibrationArgsError::IncompleteConstants
            | CalibrationArgsError::NoCalibration
            | CalibrationArgsError::NoVegaZeropoint => Self::Calibration(s),
            CalibrationArgsError::BadCountRates(_)
            | CalibrationArgsError::NoApertureCorrection(_) => Self::ApertureCorrection(s),
        }
    }
}

impl From<ZeropointsArgsError> for PhotzptError {
    fn from(e: ZeropointsArgsError) -> Self {
        let s = e.to_string();
        match e {
            ZeropointsArgsError::UnknownSystem(_) => Self::MagnitudeSystem(s),
        }
    }
}

impl From<PhotometryArgsError> for PhotzptError {
    fn from(e: PhotometryArgsError) -> Self {
        let s = e.to_string();
        match e {
            PhotometryArgsError::NoMeasurements | PhotometryArgsError::TwoMeasurementSources => {
                Self::Measurements(s)
            }
            PhotometryArgsError::OutputFileExtension(_) => Self::Generic(s),
        }
    }
}

impl From<std::io::Error> for PhotzptError {
    fn from(e: std::io::Error) -> Self {
        Self::Generic(e.to_string())
    }
}
