// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors from the photometric calculations themselves.

use thiserror::Error;

use crate::calibration::Obsmode;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhotometryError {
    /// A value that is passed to a logarithm (or used to divide a flux) must
    /// be positive and finite.
    #[error("{quantity} must be positive and finite, but got {value}")]
    Domain { quantity: &'static str, value: f64 },

    /// A required calibration value was absent or zero.
    #[error("Missing calibration: {0}")]
    MissingCalibration(&'static str),

    /// Two calibration values were derived for different instrument
    /// configurations.
    #[error("Calibration for '{expected}' was combined with calibration for '{got}'")]
    ConfigMismatch {
        expected: Box<Obsmode>,
        got: Box<Obsmode>,
    },
}

/// Like [`check_positive`], but a value of exactly zero is treated as an
/// absent calibration value rather than a bad one.
pub(crate) fn check_calibration(quantity: &'static str, value: f64) -> Result<f64, PhotometryError> {
    if value == 0.0 {
        return Err(PhotometryError::MissingCalibration(quantity));
    }
    check_positive(quantity, value)
}

/// Ensure that `value` may be used in a logarithm.
pub(crate) fn check_positive(quantity: &'static str, value: f64) -> Result<f64, PhotometryError> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(PhotometryError::Domain { quantity, value })
    }
}
