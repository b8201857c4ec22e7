// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Conversion of aperture-corrected count rates into flux densities and
//! magnitudes.


use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{
    calibration::CalibrationConstants,
    constants::MAG_SCALE,
    error::{check_positive, PhotometryError},
    zeropoint::ZeropointSet,
};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString, IntoStaticStr, Serialize,
    Deserialize,
)]
pub enum MagnitudeSystem {
    #[strum(serialize = "vegamag")]
    #[serde(rename = "vegamag")]
    Vega,

    #[strum(serialize = "stmag")]
    #[serde(rename = "stmag")]
    St,

    #[strum(serialize = "abmag")]
    #[serde(rename = "abmag")]
    Ab,
}

/// -2.5 log10(flux). Count rates of zero or less have no magnitude.
pub fn instrumental_magnitude(flux: f64) -> Result<f64, PhotometryError> {
    let flux = check_positive("Aperture-corrected flux", flux)?;
    Ok(-MAG_SCALE * flux.log10())
}

/// The magnitude of a source with count rate `flux` \[counts/s\] given the
/// zeropoint of a magnitude system.
pub fn magnitude(flux: f64, zeropoint: f64) -> Result<f64, PhotometryError> {
    Ok(instrumental_magnitude(flux)? + zeropoint)
}

/// The count rate \[counts/s\] of a source with magnitude `mag`; the inverse
/// of [`magnitude`].
pub fn flux_from_magnitude(mag: f64, zeropoint: f64) -> f64 {
    10_f64.powf((zeropoint - mag) / MAG_SCALE)
}

/// Calibrated photometry of a single source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhotometryResult {
    /// The count rate measured in the small aperture \[counts/s\]
    pub measured_flux: f64,

    /// The count rate after correcting to an infinite aperture \[counts/s\]
    pub corrected_flux: f64,

    /// \[erg/s/cm²/Å\]
    pub f_lambda: f64,

    /// \[erg/s/cm²/Hz\]
    pub f_nu: f64,

    pub st_mag: f64,
    pub ab_mag: f64,
    pub vega_mag: f64,
}

impl PhotometryResult {
    /// `corrected_flux` must already be corrected to an infinite aperture, and
    /// the zeropoints must belong to the same calibration as `cal`.
    pub fn new(
        measured_flux: f64,
        corrected_flux: f64,
        cal: &CalibrationConstants,
        zeropoints: &ZeropointSet,
    ) -> Result<PhotometryResult, PhotometryError> {
        let inst_mag = instrumental_magnitude(corrected_flux)?;
        Ok(PhotometryResult {
            measured_flux,
            corrected_flux,
            f_lambda: cal.flam(corrected_flux),
            f_nu: cal.fnu(corrected_flux),
            st_mag: inst_mag + zeropoints.st,
            ab_mag: inst_mag + zeropoints.ab,
            vega_mag: inst_mag + zeropoints.vega,
        })
    }

    pub fn mag(&self, system: MagnitudeSystem) -> f64 {
        match system {
            MagnitudeSystem::Vega => self.vega_mag,
            MagnitudeSystem::St => self.st_mag,
            MagnitudeSystem::Ab => self.ab_mag,
        }
    }
}
