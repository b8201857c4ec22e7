// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Instrument calibration constants, and the observation modes they belong
//! to.

mod obsmode;

pub use obsmode::{Obsmode, ObsmodeParseError};

use log::trace;

use crate::{
    constants::SPEED_OF_LIGHT_ANGSTROM,
    error::{check_calibration, PhotometryError},
};

/// The constants that convert count rates into physical flux densities for a
/// single instrument configuration (filter, detector, epoch).
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationConstants {
    /// Inverse sensitivity \[erg/s/cm²/Å per count/s\]
    photflam: f64,

    /// Pivot wavelength of the bandpass \[Å\]
    photplam: f64,

    /// The configuration these constants were derived for, if known.
    obsmode: Option<Obsmode>,
}

impl CalibrationConstants {
    /// Validate and bundle calibration constants. Zero values are treated as
    /// missing calibration; negative or non-finite values are domain errors.
    pub fn new(photflam: f64, photplam: f64) -> Result<CalibrationConstants, PhotometryError> {
        let photflam = check_calibration("PHOTFLAM", photflam)?;
        let photplam = check_calibration("PHOTPLAM", photplam)?;
        Ok(CalibrationConstants {
            photflam,
            photplam,
            obsmode: None,
        })
    }

    pub fn with_obsmode(self, obsmode: Obsmode) -> CalibrationConstants {
        CalibrationConstants {
            obsmode: Some(obsmode),
            ..self
        }
    }

    pub fn photflam(&self) -> f64 {
        self.photflam
    }

    pub fn photplam(&self) -> f64 {
        self.photplam
    }

    pub fn obsmode(&self) -> Option<&Obsmode> {
        self.obsmode.as_ref()
    }

    /// Convert a count rate \[counts/s\] into f_lambda \[erg/s/cm²/Å\].
    pub fn flam(&self, count_rate: f64) -> f64 {
        count_rate * self.photflam
    }

    /// Convert a count rate \[counts/s\] into f_nu \[erg/s/cm²/Hz\].
    pub fn fnu(&self, count_rate: f64) -> f64 {
        self.flam(count_rate) * self.photplam * self.photplam / SPEED_OF_LIGHT_ANGSTROM
    }

    /// Check that something derived for `other` may be combined with these
    /// constants. Nothing can be checked if either side has no obsmode; in
    /// that case consistency is the caller's responsibility.
    pub fn check_configuration(&self, other: Option<&Obsmode>) -> Result<(), PhotometryError> {
        match (self.obsmode.as_ref(), other) {
            (Some(expected), Some(got)) => {
                if expected.same_configuration(got) {
                    Ok(())
                } else {
                    Err(PhotometryError::ConfigMismatch {
                        expected: Box::new(expected.clone()),
                        got: Box::new(got.clone()),
                    })
                }
            }
            _ => {
                trace!("Not enough obsmode information to check calibration consistency");
                Ok(())
            }
        }
    }
}
