// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Photometric zeropoints, i.e. the magnitude of a source producing 1 count/s
//! in a given magnitude system.


use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    calibration::{CalibrationConstants, Obsmode},
    constants::{AB_MAG_OFFSET, MAG_SCALE, ST_MAG_OFFSET},
    error::{check_positive, PhotometryError},
    magnitude::MagnitudeSystem,
    synphot::{EffstimUnit, SynphotError, SyntheticPhotometry},
};

/// STMag zeropoint from PHOTFLAM \[erg/s/cm²/Å per count/s\].
pub fn st_zeropoint(photflam: f64) -> Result<f64, PhotometryError> {
    let photflam = check_positive("PHOTFLAM", photflam)?;
    Ok(-MAG_SCALE * photflam.log10() - ST_MAG_OFFSET)
}

/// ABMag zeropoint from PHOTFLAM \[erg/s/cm²/Å per count/s\] and PHOTPLAM
/// \[Å\].
pub fn ab_zeropoint(photflam: f64, photplam: f64) -> Result<f64, PhotometryError> {
    let photflam = check_positive("PHOTFLAM", photflam)?;
    let photplam = check_positive("PHOTPLAM", photplam)?;
    Ok(-MAG_SCALE * photflam.log10() - 5.0 * photplam.log10() - AB_MAG_OFFSET)
}

/// Zeropoints in all supported magnitude systems for one instrument
/// configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZeropointSet {
    pub vega: f64,
    pub st: f64,
    pub ab: f64,
}

impl ZeropointSet {
    /// The STMag and ABMag zeropoints follow from the calibration constants.
    /// There is no closed form for VegaMag; it must come from a synthetic
    /// observation of Vega in the same bandpass.
    pub fn new(cal: &CalibrationConstants, vega: f64) -> Result<ZeropointSet, PhotometryError> {
        if !vega.is_finite() {
            return Err(PhotometryError::Domain {
                quantity: "VegaMag zeropoint",
                value: vega,
            });
        }

        Ok(ZeropointSet {
            vega,
            st: st_zeropoint(cal.photflam())?,
            ab: ab_zeropoint(cal.photflam(), cal.photplam())?,
        })
    }

    /// Get all zeropoints for `obsmode` from a synthetic-photometry engine.
    pub fn from_synphot<S: SyntheticPhotometry + ?Sized>(
        engine: &S,
        obsmode: &Obsmode,
    ) -> Result<ZeropointSet, SynphotError> {
        let cal = CalibrationConstants::from_synphot(engine, obsmode)?;
        let vega = engine.effstim(obsmode, EffstimUnit::VegaMag)?;
        debug!("VegaMag zeropoint for '{obsmode}': {vega}");
        Ok(ZeropointSet::new(&cal, vega)?)
    }

    pub fn get(&self, system: MagnitudeSystem) -> f64 {
        match system {
            MagnitudeSystem::Vega => self.vega,
            MagnitudeSystem::St => self.st,
            MagnitudeSystem::Ab => self.ab,
        }
    }
}
