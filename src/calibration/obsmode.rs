// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Observation-mode strings, e.g. "wfc3,uvis2,f814w,mjd#55008,aper#0.2" or
//! "WFC3 UVIS2 F814W MJD#55008".
//!
//! Plain comma-separated tokens name the optical components (instrument,
//! detector, filter). Tokens of the form `key#value` are parameters; only the
//! epoch (`mjd`) and the aperture radius (`aper`, arcsec) are understood.

use std::{fmt::Display, str::FromStr};

use hifitime::Epoch;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{APERTURE_RADIUS_TOLERANCE, MJD_TOLERANCE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Obsmode {
    /// Lower-case component names, in the order they were given.
    components: Vec<String>,

    /// The epoch of the calibration \[MJD\].
    mjd: Option<f64>,

    /// The radius of the aperture used for photometry \[arcsec\].
    aperture: Option<f64>,
}

impl Obsmode {
    pub fn components(&self) -> &[String] {
        &self.components
    }

    /// The filter is conventionally the last component.
    pub fn filter(&self) -> &str {
        // Parsing guarantees at least one component.
        &self.components[self.components.len() - 1]
    }

    pub fn mjd(&self) -> Option<f64> {
        self.mjd
    }

    pub fn epoch(&self) -> Option<Epoch> {
        self.mjd.map(Epoch::from_mjd_utc)
    }

    pub fn aperture(&self) -> Option<f64> {
        self.aperture
    }

    /// Get a copy of this obsmode with a different aperture radius \[arcsec\].
    pub fn with_aperture(&self, radius: f64) -> Obsmode {
        Obsmode {
            aperture: Some(radius),
            ..self.clone()
        }
    }

    pub fn without_aperture(&self) -> Obsmode {
        Obsmode {
            aperture: None,
            ..self.clone()
        }
    }

    /// Do these obsmodes describe the same filter, detector and epoch? The
    /// aperture is not considered; aperture corrections exist precisely to
    /// relate different apertures of the same configuration.
    ///
    /// An epoch that is missing on either side is not considered a mismatch.
    pub fn same_configuration(&self, other: &Obsmode) -> bool {
        if self.components != other.components {
            return false;
        }
        match (self.mjd, other.mjd) {
            (Some(a), Some(b)) => (a - b).abs() < MJD_TOLERANCE,
            _ => true,
        }
    }

    /// Like [`PartialEq`], but aperture radii and epochs are compared with a
    /// tolerance. Use this for lookups.
    pub fn matches(&self, other: &Obsmode) -> bool {
        let apertures_match = match (self.aperture, other.aperture) {
            (Some(a), Some(b)) => (a - b).abs() < APERTURE_RADIUS_TOLERANCE,
            (None, None) => true,
            _ => false,
        };
        let mjds_match = match (self.mjd, other.mjd) {
            (Some(a), Some(b)) => (a - b).abs() < MJD_TOLERANCE,
            (None, None) => true,
            _ => false,
        };
        self.components == other.components && mjds_match && apertures_match
    }
}

impl FromStr for Obsmode {
    type Err = ObsmodeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut components = vec![];
        let mut mjd = None;
        let mut aperture = None;

        // FITS headers (PHOTMODE) separate tokens with spaces rather than
        // commas.
        let tokens: Vec<&str> = if s.contains(',') {
            s.split(',').collect()
        } else {
            s.split_whitespace().collect()
        };
        if tokens.is_empty() {
            return Err(ObsmodeParseError::EmptyToken(s.to_string()));
        }

        for token in tokens {
            let token = token.trim().to_lowercase();
            if token.is_empty() {
                return Err(ObsmodeParseError::EmptyToken(s.to_string()));
            }

            match token.split_once('#') {
                Some((key, value)) => {
                    let key = key.trim();
                    let parsed: f64 =
                        value
                            .trim()
                            .parse()
                            .map_err(|_| ObsmodeParseError::BadParameterValue {
                                key: key.to_string(),
                                value: value.trim().to_string(),
                            })?;
                    let slot = match key {
                        "mjd" => &mut mjd,
                        "aper" => &mut aperture,
                        _ => return Err(ObsmodeParseError::UnknownParameter(key.to_string())),
                    };
                    // Radii must be positive; no parameter may be NaN or
                    // infinite.
                    if !parsed.is_finite() || (key == "aper" && parsed <= 0.0) {
                        return Err(ObsmodeParseError::BadParameterValue {
                            key: key.to_string(),
                            value: value.trim().to_string(),
                        });
                    }
                    if slot.replace(parsed).is_some() {
                        return Err(ObsmodeParseError::DuplicateParameter(key.to_string()));
                    }
                }

                None => {
                    if !token.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                        return Err(ObsmodeParseError::BadComponent(token));
                    }
                    components.push(token);
                }
            }
        }

        if components.is_empty() {
            return Err(ObsmodeParseError::NoComponents(s.to_string()));
        }

        Ok(Obsmode {
            components,
            mjd,
            aperture,
        })
    }
}

impl Display for Obsmode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.components.join(","))?;
        if let Some(mjd) = self.mjd {
            write!(f, ",mjd#{mjd}")?;
        }
        if let Some(aperture) = self.aperture {
            write!(f, ",aper#{aperture}")?;
        }
        Ok(())
    }
}

impl TryFrom<String> for Obsmode {
    type Error = ObsmodeParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Obsmode::from_str(&s)
    }
}

impl From<Obsmode> for String {
    fn from(o: Obsmode) -> String {
        o.to_string()
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ObsmodeParseError {
    #[error("Obsmode '{0}' contains an empty token")]
    EmptyToken(String),

    #[error("Obsmode '{0}' doesn't name any components")]
    NoComponents(String),

    #[error("Obsmode component '{0}' contains invalid characters")]
    BadComponent(String),

    #[error("Obsmode parameter '{0}' is not recognised; supported parameters are 'mjd' and 'aper'")]
    UnknownParameter(String),

    #[error("Obsmode parameter '{0}' was specified more than once")]
    DuplicateParameter(String),

    #[error("The value '{value}' of obsmode parameter '{key}' isn't a usable number")]
    BadParameterValue { key: String, value: String },
}
