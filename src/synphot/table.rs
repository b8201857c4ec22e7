// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A "synthetic-photometry engine" that only knows precomputed values, e.g.
//! the published zeropoint and encircled-energy tables of an instrument.

use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
    str::FromStr,
};

use itertools::Itertools;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

use super::{EffstimUnit, SynphotError, SyntheticPhotometry};
use crate::{
    aperture::ApertureCorrection,
    calibration::{CalibrationConstants, Obsmode},
    constants::APERTURE_RADIUS_TOLERANCE,
    error::{check_calibration, PhotometryError},
    zeropoint::{ab_zeropoint, st_zeropoint},
};

lazy_static::lazy_static! {
    pub(crate) static ref CALIBRATION_TABLE_TYPES_COMMA_SEPARATED: String =
        CalibrationTableType::iter().join(", ");
}

#[derive(Debug, Display, EnumIter, EnumString)]
enum CalibrationTableType {
    #[strum(serialize = "toml")]
    Toml,

    #[strum(serialize = "json")]
    Json,

    #[strum(to_string = "yaml", serialize = "yml")]
    Yaml,
}

/// Calibration of a single obsmode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationTableEntry {
    pub obsmode: Obsmode,

    /// \[erg/s/cm²/Å per count/s\]
    pub photflam: f64,

    /// \[Å\]
    pub photplam: f64,

    /// The VegaMag zeropoint.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vegamag: Option<f64>,

    /// The count rate of a source normalised to 1 count/s in the aperture-free
    /// bandpass, i.e. the encircled energy of the obsmode's aperture.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count_rate: Option<f64>,
}

/// A published correction from an aperture of `radius` \[arcsec\] to an
/// infinite aperture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApertureCorrectionEntry {
    pub obsmode: Obsmode,
    pub radius: f64,
    pub factor: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalibrationTable {
    #[serde(default)]
    pub entries: Vec<CalibrationTableEntry>,

    #[serde(default)]
    pub aperture_corrections: Vec<ApertureCorrectionEntry>,
}

impl CalibrationTable {
    /// Read a calibration table from a TOML, JSON or YAML file. The format is
    /// determined by the file extension.
    pub fn read_file<P: AsRef<Path>>(file: P) -> Result<CalibrationTable, CalibrationTableError> {
        let file = file.as_ref();
        debug!("Attempting to read calibration table {}", file.display());

        let table_type = file
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .and_then(|e| CalibrationTableType::from_str(&e).ok())
            .ok_or_else(|| CalibrationTableError::UnknownType(file.to_path_buf()))?;

        let mut contents = String::new();
        File::open(file)?.read_to_string(&mut contents)?;
        let table: CalibrationTable = match table_type {
            CalibrationTableType::Toml => toml::from_str(&contents)?,
            CalibrationTableType::Json => serde_json::from_str(&contents)?,
            CalibrationTableType::Yaml => serde_yaml::from_str(&contents)?,
        };
        table.validate()?;
        debug!(
            "Read {} calibration entries and {} aperture corrections",
            table.entries.len(),
            table.aperture_corrections.len()
        );

        Ok(table)
    }

    /// Ensure that every value in the table is usable, and that no obsmode
    /// appears twice.
    pub fn validate(&self) -> Result<(), CalibrationTableError> {
        for (i, entry) in self.entries.iter().enumerate() {
            let invalid = |e| CalibrationTableError::InvalidEntry {
                obsmode: entry.obsmode.to_string(),
                err: e,
            };
            CalibrationConstants::new(entry.photflam, entry.photplam).map_err(invalid)?;
            if let Some(vegamag) = entry.vegamag {
                if !vegamag.is_finite() {
                    return Err(invalid(PhotometryError::Domain {
                        quantity: "VegaMag zeropoint",
                        value: vegamag,
                    }));
                }
            }
            if let Some(count_rate) = entry.count_rate {
                check_calibration("Count rate", count_rate).map_err(invalid)?;
            }

            if self.entries[..i]
                .iter()
                .any(|other| other.obsmode.matches(&entry.obsmode))
            {
                return Err(CalibrationTableError::Duplicate(entry.obsmode.to_string()));
            }
        }

        for entry in &self.aperture_corrections {
            ApertureCorrection::new(entry.factor).map_err(|e| CalibrationTableError::InvalidEntry {
                obsmode: entry.obsmode.to_string(),
                err: e,
            })?;
        }

        Ok(())
    }

    /// Find the entry for exactly this obsmode.
    fn exact_entry(&self, obsmode: &Obsmode) -> Option<&CalibrationTableEntry> {
        self.entries.iter().find(|e| e.obsmode.matches(obsmode))
    }

    /// Find the entry for this obsmode. If the obsmode has an aperture but
    /// there's no aperture-specific entry, the aperture-free entry is used;
    /// PHOTFLAM and PHOTPLAM describe the infinite-aperture bandpass either
    /// way.
    pub fn entry(&self, obsmode: &Obsmode) -> Result<&CalibrationTableEntry, SynphotError> {
        self.exact_entry(obsmode)
            .or_else(|| {
                obsmode.aperture().and_then(|_| {
                    trace!("No entry for '{obsmode}'; trying without the aperture");
                    self.exact_entry(&obsmode.without_aperture())
                })
            })
            .ok_or_else(|| SynphotError::UnknownObsmode(obsmode.to_string()))
    }

    /// Look up the published correction from the aperture of `obsmode` to an
    /// infinite aperture.
    pub fn infinite_aperture_correction(
        &self,
        obsmode: &Obsmode,
    ) -> Result<ApertureCorrection, SynphotError> {
        let radius = obsmode
            .aperture()
            .ok_or_else(|| SynphotError::MissingValue {
                obsmode: obsmode.to_string(),
                what: "aperture radius",
            })?;

        let entry = self
            .aperture_corrections
            .iter()
            .find(|e| {
                e.obsmode.same_configuration(obsmode)
                    && (e.radius - radius).abs() < APERTURE_RADIUS_TOLERANCE
            })
            .ok_or_else(|| SynphotError::MissingValue {
                obsmode: obsmode.to_string(),
                what: "published aperture correction",
            })?;
        trace!(
            "Aperture correction for '{obsmode}' from '{}': {}",
            entry.obsmode,
            entry.factor
        );

        Ok(ApertureCorrection::new(entry.factor)?.with_obsmode(obsmode.clone()))
    }
}

impl SyntheticPhotometry for CalibrationTable {
    fn effstim(&self, obsmode: &Obsmode, unit: EffstimUnit) -> Result<f64, SynphotError> {
        let entry = self.entry(obsmode)?;
        let value = match unit {
            EffstimUnit::Flam => entry.photflam,
            EffstimUnit::StMag => st_zeropoint(entry.photflam)?,
            EffstimUnit::AbMag => ab_zeropoint(entry.photflam, entry.photplam)?,
            EffstimUnit::VegaMag => entry.vegamag.ok_or_else(|| SynphotError::MissingValue {
                obsmode: obsmode.to_string(),
                what: "VegaMag zeropoint",
            })?,
        };
        Ok(value)
    }

    fn pivot_wavelength(&self, obsmode: &Obsmode) -> Result<f64, SynphotError> {
        Ok(self.entry(obsmode)?.photplam)
    }

    fn count_rate(&self, obsmode: &Obsmode) -> Result<f64, SynphotError> {
        let entry = self
            .exact_entry(obsmode)
            .ok_or_else(|| SynphotError::UnknownObsmode(obsmode.to_string()))?;
        match (entry.count_rate, obsmode.aperture()) {
            (Some(count_rate), _) => Ok(count_rate),
            // The reference source is normalised in the aperture-free
            // bandpass.
            (None, None) => Ok(1.0),
            (None, Some(_)) => Err(SynphotError::MissingValue {
                obsmode: obsmode.to_string(),
                what: "count rate",
            }),
        }
    }
}

#[derive(Error, Debug)]
pub enum CalibrationTableError {
    #[error("Calibration table '{}' doesn't have a recognised file extension! Valid extensions are: {}", .0.display(), *CALIBRATION_TABLE_TYPES_COMMA_SEPARATED)]
    UnknownType(PathBuf),

    #[error("Calibration table entry for '{obsmode}' is invalid: {err}")]
    InvalidEntry {
        obsmode: String,
        err: PhotometryError,
    },

    #[error("Obsmode '{0}' appears more than once in the calibration table")]
    Duplicate(String),

    #[error("Couldn't decode toml structure: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Couldn't decode json structure: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Couldn't decode yaml structure: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
