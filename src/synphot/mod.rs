// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The interface to a synthetic-photometry engine.
//!
//! Spectral modelling is not done here. An engine observes a reference
//! spectrum normalised to 1 count/s in the bandpass described by an
//! [`Obsmode`], and reports derived quantities. Because the source produces 1
//! count/s, its effective stimulus in "flam" is PHOTFLAM, and in a magnitude
//! unit it is the zeropoint of that system.

mod table;

pub(crate) use table::CALIBRATION_TABLE_TYPES_COMMA_SEPARATED;
pub use table::{
    ApertureCorrectionEntry, CalibrationTable, CalibrationTableEntry, CalibrationTableError,
};

use log::debug;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};
use thiserror::Error;

use crate::{
    calibration::{CalibrationConstants, Obsmode},
    error::PhotometryError,
};

/// Units of effective stimulus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString, IntoStaticStr)]
pub enum EffstimUnit {
    /// erg/s/cm²/Å
    #[strum(serialize = "flam")]
    Flam,

    #[strum(serialize = "vegamag")]
    VegaMag,

    #[strum(serialize = "stmag")]
    StMag,

    #[strum(serialize = "abmag")]
    AbMag,
}

pub trait SyntheticPhotometry {
    /// The effective stimulus of the reference source in `unit`.
    fn effstim(&self, obsmode: &Obsmode, unit: EffstimUnit) -> Result<f64, SynphotError>;

    /// The pivot wavelength of the bandpass \[Å\].
    fn pivot_wavelength(&self, obsmode: &Obsmode) -> Result<f64, SynphotError>;

    /// The count rate of the reference source \[counts/s\] when observed
    /// through `obsmode`. Only aperture-limited obsmodes differ from 1.
    fn count_rate(&self, obsmode: &Obsmode) -> Result<f64, SynphotError>;
}

impl CalibrationConstants {
    /// Derive PHOTFLAM and PHOTPLAM for `obsmode` with a synthetic-photometry
    /// engine.
    pub fn from_synphot<S: SyntheticPhotometry + ?Sized>(
        engine: &S,
        obsmode: &Obsmode,
    ) -> Result<CalibrationConstants, SynphotError> {
        let photflam = engine.effstim(obsmode, EffstimUnit::Flam)?;
        let photplam = engine.pivot_wavelength(obsmode)?;
        debug!("'{obsmode}': PHOTFLAM = {photflam:e}, PHOTPLAM = {photplam}");
        Ok(CalibrationConstants::new(photflam, photplam)?.with_obsmode(obsmode.clone()))
    }
}

#[derive(Error, Debug)]
pub enum SynphotError {
    #[error("No calibration is available for obsmode '{0}'")]
    UnknownObsmode(String),

    #[error("The calibration for obsmode '{obsmode}' doesn't include a {what}")]
    MissingValue { obsmode: String, what: &'static str },

    #[error(transparent)]
    Photometry(#[from] PhotometryError),
}
