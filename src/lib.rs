// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Photometric zeropoints (VegaMag, STMag, ABMag) and aperture-corrected
magnitudes from instrument calibration constants.
 */

pub mod aperture;
pub mod calibration;
mod cli;
pub mod constants;
mod error;
pub(crate) mod io;
pub mod magnitude;
mod params;
pub mod photometry;
pub mod synphot;
pub mod zeropoint;

// Re-exports.
pub use aperture::{ApertureCorrection, ApertureCorrectionChain, CorrectedFlux};
pub use calibration::{CalibrationConstants, Obsmode, ObsmodeParseError};
pub use cli::{Photzpt, PhotzptError};
pub use error::PhotometryError;
pub use magnitude::{flux_from_magnitude, magnitude, MagnitudeSystem, PhotometryResult};
pub use photometry::{calibrate_measurements, MeasurementSet};
pub use synphot::{CalibrationTable, EffstimUnit, SynphotError, SyntheticPhotometry};
pub use zeropoint::{ab_zeropoint, st_zeropoint, ZeropointSet};
