// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Aperture corrections.
//!
//! Photometry of point sources is measured in a small aperture to limit
//! noise, and then corrected to the flux that would have been measured in an
//! infinite aperture. This is done in two steps: small to medium radius
//! (usually derived from synthetic photometry or bright isolated stars), then
//! medium to infinite radius (usually from a published encircled-energy
//! table).
//!
//! Correction factors must be derived for the same filter, detector and epoch
//! as the measurements they are applied to. This is only checked when the
//! corrections carry an [`Obsmode`].


use log::debug;

use crate::{
    calibration::Obsmode,
    error::{check_calibration, PhotometryError},
    synphot::{SynphotError, SyntheticPhotometry},
};

/// The fraction of a point source's counts in a larger aperture that fall
/// within a smaller aperture.
#[derive(Debug, Clone, PartialEq)]
pub struct ApertureCorrection {
    factor: f64,

    /// The configuration (including the smaller aperture) that this
    /// correction was derived for, if known.
    obsmode: Option<Obsmode>,
}

impl ApertureCorrection {
    /// A zero factor indicates missing calibration; negative and non-finite
    /// factors are rejected.
    pub fn new(factor: f64) -> Result<ApertureCorrection, PhotometryError> {
        Ok(ApertureCorrection {
            factor: check_calibration("Aperture correction", factor)?,
            obsmode: None,
        })
    }

    /// The correction from the ratio of count rates of the same source
    /// through a smaller and larger aperture.
    pub fn from_count_rates(
        small: f64,
        large: f64,
    ) -> Result<ApertureCorrection, PhotometryError> {
        let small = check_calibration("Small-aperture count rate", small)?;
        let large = check_calibration("Large-aperture count rate", large)?;
        ApertureCorrection::new(small / large)
    }

    /// Derive a correction by observing the same reference spectrum through
    /// two aperture-scaled bandpasses. Both obsmodes must carry an aperture.
    pub fn from_synphot<S: SyntheticPhotometry + ?Sized>(
        engine: &S,
        small: &Obsmode,
        large: &Obsmode,
    ) -> Result<ApertureCorrection, SynphotError> {
        for obsmode in [small, large] {
            if obsmode.aperture().is_none() {
                return Err(SynphotError::MissingValue {
                    obsmode: obsmode.to_string(),
                    what: "aperture radius",
                });
            }
        }
        if !small.same_configuration(large) {
            return Err(PhotometryError::ConfigMismatch {
                expected: Box::new(small.clone()),
                got: Box::new(large.clone()),
            }
            .into());
        }

        let small_rate = engine.count_rate(small)?;
        let large_rate = engine.count_rate(large)?;
        debug!("Count rates: {small_rate} ('{small}'), {large_rate} ('{large}')");
        Ok(ApertureCorrection::from_count_rates(small_rate, large_rate)?.with_obsmode(small.clone()))
    }

    pub fn with_obsmode(self, obsmode: Obsmode) -> ApertureCorrection {
        ApertureCorrection {
            obsmode: Some(obsmode),
            ..self
        }
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn obsmode(&self) -> Option<&Obsmode> {
        self.obsmode.as_ref()
    }
}

/// Count rates after each step of an [`ApertureCorrectionChain`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrectedFlux {
    /// \[counts/s\]
    pub medium: f64,

    /// \[counts/s\]
    pub infinite: f64,
}

/// Small-to-medium and medium-to-infinite aperture corrections.
#[derive(Debug, Clone, PartialEq)]
pub struct ApertureCorrectionChain {
    small_to_medium: ApertureCorrection,
    medium_to_infinite: ApertureCorrection,
}

impl ApertureCorrectionChain {
    pub fn new(
        small_to_medium: ApertureCorrection,
        medium_to_infinite: ApertureCorrection,
    ) -> Result<ApertureCorrectionChain, PhotometryError> {
        if let (Some(a), Some(b)) = (small_to_medium.obsmode(), medium_to_infinite.obsmode()) {
            if !a.same_configuration(b) {
                return Err(PhotometryError::ConfigMismatch {
                    expected: Box::new(a.clone()),
                    got: Box::new(b.clone()),
                });
            }
        }

        Ok(ApertureCorrectionChain {
            small_to_medium,
            medium_to_infinite,
        })
    }

    /// Chain two raw factors without any configuration information.
    pub fn from_factors(c1: f64, c2: f64) -> Result<ApertureCorrectionChain, PhotometryError> {
        ApertureCorrectionChain::new(ApertureCorrection::new(c1)?, ApertureCorrection::new(c2)?)
    }

    pub fn small_to_medium(&self) -> &ApertureCorrection {
        &self.small_to_medium
    }

    pub fn medium_to_infinite(&self) -> &ApertureCorrection {
        &self.medium_to_infinite
    }

    /// The single factor relating the small aperture to an infinite one.
    pub fn total(&self) -> f64 {
        self.small_to_medium.factor * self.medium_to_infinite.factor
    }

    /// The configuration of whichever correction knows it.
    pub fn obsmode(&self) -> Option<&Obsmode> {
        self.small_to_medium
            .obsmode()
            .or_else(|| self.medium_to_infinite.obsmode())
    }

    /// Correct a count rate measured in the small aperture.
    pub fn apply(&self, flux_raw: f64) -> CorrectedFlux {
        let medium = flux_raw / self.small_to_medium.factor;
        let infinite = medium / self.medium_to_infinite.factor;
        CorrectedFlux { medium, infinite }
    }
}
