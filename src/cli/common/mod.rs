// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Common arguments for command-line interfaces. Here, we abstract many aspects
//! of `photzpt`, e.g. the `zeropoints` and `photometry` subcommands both need
//! calibration constants, so the same calibration arguments are shared between
//! them.

mod printers;

pub(super) use printers::InfoPrinter;
pub(crate) use printers::{display_warnings, Warn};

use std::{path::PathBuf, str::FromStr};

use clap::Parser;
use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use super::PhotzptError;
use crate::{
    aperture::ApertureCorrection,
    calibration::{CalibrationConstants, Obsmode},
    io::read::read_fits_calibration,
    synphot::{
        CalibrationTable, EffstimUnit, SyntheticPhotometry, CALIBRATION_TABLE_TYPES_COMMA_SEPARATED,
    },
    zeropoint::ZeropointSet,
};

lazy_static::lazy_static! {
    pub(super) static ref ARG_FILE_TYPES_COMMA_SEPARATED: String = ArgFileTypes::iter().join(", ");

    pub(super) static ref ARG_FILE_HELP: String =
        format!("All arguments may be specified in a file. Any CLI arguments override arguments set in the file. Supported formats: {}", *ARG_FILE_TYPES_COMMA_SEPARATED);

    static ref TABLE_HELP: String =
        format!("A table of precomputed synthetic photometry (PHOTFLAM, PHOTPLAM, VegaMag zeropoints, count rates and aperture corrections per obsmode). Supported formats: {}", *CALIBRATION_TABLE_TYPES_COMMA_SEPARATED);
}

#[derive(Debug, Display, EnumIter, EnumString)]
pub(super) enum ArgFileTypes {
    #[strum(serialize = "toml")]
    Toml,
    #[strum(serialize = "json")]
    Json,
}

macro_rules! unpack_arg_file {
    ($arg_file:expr) => ({
        use std::{fs::File, io::Read, str::FromStr};

        use crate::cli::common::{ArgFileTypes, ARG_FILE_TYPES_COMMA_SEPARATED};

        debug!("Attempting to parse argument file {}", $arg_file.display());

        let mut contents = String::new();
        let arg_file_type = $arg_file
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .and_then(|e| ArgFileTypes::from_str(&e).ok());

        match arg_file_type {
            Some(ArgFileTypes::Toml) => {
                debug!("Parsing toml file...");
                let mut fh = File::open(&$arg_file)?;
                fh.read_to_string(&mut contents)?;
                match toml::from_str(&contents) {
                    Ok(p) => p,
                    Err(err) => {
                        return Err(PhotzptError::ArgFile(format!(
                            "Couldn't decode toml structure from {:?}:\n{err}",
                            $arg_file
                        )))
                    }
                }
            }
            Some(ArgFileTypes::Json) => {
                debug!("Parsing json file...");
                let mut fh = File::open(&$arg_file)?;
                fh.read_to_string(&mut contents)?;
                match serde_json::from_str(&contents) {
                    Ok(p) => p,
                    Err(err) => {
                        return Err(PhotzptError::ArgFile(format!(
                            "Couldn't decode json structure from {:?}:\n{err}",
                            $arg_file
                        )))
                    }
                }
            }

            _ => {
                return Err(PhotzptError::ArgFile(format!(
                    "Argument file '{:?}' doesn't have a recognised file extension! Valid extensions are: {}", $arg_file, *ARG_FILE_TYPES_COMMA_SEPARATED)
                ))
            }
        }
    });
}

/// Arguments naming a synthetic-photometry source and the instrument
/// configuration to look up in it.
#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct SynphotArgs {
    #[clap(short, long, help = TABLE_HELP.as_str(), help_heading = "CALIBRATION")]
    pub(super) table: Option<PathBuf>,

    /// The instrument configuration, e.g. "wfc3,uvis2,f814w,mjd#55008". An
    /// "aper#" parameter is the radius of the small aperture [arcsec]. If
    /// not given, the PHOTMODE of a FITS image is used.
    #[clap(long, help_heading = "CALIBRATION")]
    pub(super) obsmode: Option<String>,
}

pub(super) struct SynphotParams {
    pub(super) table: Option<CalibrationTable>,
    pub(super) obsmode: Option<Obsmode>,
}

impl SynphotArgs {
    pub(super) fn merge(self, other: Self) -> Self {
        SynphotArgs {
            table: self.table.or(other.table),
            obsmode: self.obsmode.or(other.obsmode),
        }
    }

    pub(super) fn parse(self) -> Result<SynphotParams, PhotzptError> {
        let obsmode = self.obsmode.as_deref().map(Obsmode::from_str).transpose()?;
        let table = match self.table {
            Some(file) => {
                let table = CalibrationTable::read_file(&file)?;
                debug!(
                    "Read {} entries and {} aperture corrections from {}",
                    table.entries.len(),
                    table.aperture_corrections.len(),
                    file.display()
                );
                Some(table)
            }
            None => None,
        };
        Ok(SynphotParams { table, obsmode })
    }
}

/// Arguments for PHOTFLAM, PHOTPLAM and the VegaMag zeropoint.
#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct CalibrationArgs {
    /// The inverse sensitivity [erg/s/cm^2/Å per count/s]. Must be given with
    /// --photplam. Overrides any FITS image or calibration table.
    #[clap(long, allow_hyphen_values = true, help_heading = "CALIBRATION")]
    pub(super) photflam: Option<f64>,

    /// The pivot wavelength of the bandpass [Å]. Must be given with
    /// --photflam.
    #[clap(long, allow_hyphen_values = true, help_heading = "CALIBRATION")]
    pub(super) photplam: Option<f64>,

    /// The VegaMag zeropoint, i.e. the magnitude of Vega observed with the same
    /// configuration. If not given, it is looked up in the calibration table.
    #[clap(long = "vega-zp", allow_hyphen_values = true, help_heading = "CALIBRATION")]
    pub(super) vega_zp: Option<f64>,

    /// A calibrated FITS image; PHOTFLAM, PHOTPLAM and PHOTMODE are read from
    /// its headers.
    #[clap(long, help_heading = "CALIBRATION")]
    pub(super) fits: Option<PathBuf>,
}

pub(super) struct CalibrationParams {
    pub(super) cal: CalibrationConstants,
    pub(super) zeropoints: ZeropointSet,
}

impl CalibrationArgs {
    /// Explicit constants and a FITS image are alternatives; if `self`
    /// specifies either, `other`'s alternative is dropped.
    pub(super) fn merge(self, other: Self) -> Self {
        let (photflam, photplam, fits) = if self.fits.is_some() {
            (self.photflam, self.photplam, self.fits)
        } else if self.photflam.is_some() || self.photplam.is_some() {
            (
                self.photflam.or(other.photflam),
                self.photplam.or(other.photplam),
                None,
            )
        } else {
            (other.photflam, other.photplam, other.fits)
        };

        CalibrationArgs {
            photflam,
            photplam,
            vega_zp: self.vega_zp.or(other.vega_zp),
            fits,
        }
    }

    /// Get calibration constants and zeropoints. Explicit constants take
    /// precedence over a FITS image, which takes precedence over a calibration
    /// table.
    pub(super) fn parse(self, synphot: &SynphotParams) -> Result<CalibrationParams, PhotzptError> {
        let CalibrationArgs {
            photflam,
            photplam,
            vega_zp,
            fits,
        } = self;

        let (cal, source) = match (photflam, photplam, &fits, &synphot.table, &synphot.obsmode) {
            (Some(photflam), Some(photplam), _, _, _) => {
                if fits.is_some() {
                    "Ignoring the FITS image; PHOTFLAM and PHOTPLAM were given explicitly".warn();
                }
                let cal = CalibrationConstants::new(photflam, photplam)?;
                let cal = match &synphot.obsmode {
                    Some(o) => cal.with_obsmode(o.clone()),
                    None => cal,
                };
                (cal, "the command line".to_string())
            }

            (Some(_), None, _, _, _) | (None, Some(_), _, _, _) => {
                return Err(CalibrationArgsError::IncompleteConstants.into())
            }

            (None, None, Some(fits), _, _) => {
                let cal = read_fits_calibration(fits)?;
                let cal = match (&synphot.obsmode, cal.obsmode().is_some()) {
                    (Some(o), true) => {
                        cal.check_configuration(Some(o))?;
                        cal
                    }
                    (Some(o), false) => cal.with_obsmode(o.clone()),
                    (None, _) => cal,
                };
                (cal, fits.display().to_string())
            }

            // Zeropoints describe an infinite aperture.
            (None, None, None, Some(table), Some(obsmode)) => (
                CalibrationConstants::from_synphot(table, &obsmode.without_aperture())?,
                "the calibration table".to_string(),
            ),

            (None, None, None, _, _) => return Err(CalibrationArgsError::NoCalibration.into()),
        };

        let vega = match vega_zp {
            Some(vega) => vega,
            None => {
                // The obsmode of a FITS image can be used for lookups.
                let obsmode = synphot.obsmode.as_ref().or_else(|| cal.obsmode());
                match (&synphot.table, obsmode) {
                    (Some(table), Some(obsmode)) => {
                        table.effstim(&obsmode.without_aperture(), EffstimUnit::VegaMag)?
                    }
                    _ => return Err(CalibrationArgsError::NoVegaZeropoint.into()),
                }
            }
        };
        let zeropoints = ZeropointSet::new(&cal, vega)?;

        let mut printer = InfoPrinter::new("Calibration".into());
        let mut block = vec![format!("From {source}").into()];
        if let Some(obsmode) = cal.obsmode() {
            block.push(format!("Obsmode: {obsmode}").into());
            if let Some(epoch) = obsmode.epoch() {
                block.push(format!("Epoch: {epoch} (MJD {})", epoch.to_mjd_utc_days()).into());
            }
        }
        printer.push_block(block);
        printer.push_block(vec![
            format!("PHOTFLAM: {:e} erg/s/cm²/Å", cal.photflam()).into(),
            format!("PHOTPLAM: {} Å", cal.photplam()).into(),
        ]);
        printer.display();

        Ok(CalibrationParams { cal, zeropoints })
    }
}

/// Arguments for the small-to-medium and medium-to-infinite aperture
/// corrections.
#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct ApertureArgs {
    /// The fraction of the medium aperture's counts within the small aperture.
    #[clap(long, allow_hyphen_values = true, help_heading = "APERTURE CORRECTIONS")]
    pub(super) ap_corr_small: Option<f64>,

    /// The fraction of the total counts within the medium aperture.
    #[clap(long, allow_hyphen_values = true, help_heading = "APERTURE CORRECTIONS")]
    pub(super) ap_corr_inf: Option<f64>,

    /// Simulated count rates of the same source in the small and medium
    /// apertures [counts/s]; their ratio is the small-aperture correction.
    #[clap(
        long,
        number_of_values = 2,
        allow_hyphen_values = true,
        value_names = &["SMALL", "MEDIUM"],
        help_heading = "APERTURE CORRECTIONS"
    )]
    pub(super) count_rates: Option<Vec<f64>>,

    /// The radius of the small aperture [arcsec]. Defaults to the "aper#"
    /// parameter of the obsmode.
    #[clap(long, help_heading = "APERTURE CORRECTIONS")]
    pub(super) small_aperture: Option<f64>,

    /// The radius of the medium aperture [arcsec]. Corrections for this radius
    /// are looked up in the calibration table.
    #[clap(long, help_heading = "APERTURE CORRECTIONS")]
    pub(super) medium_aperture: Option<f64>,
}

/// Whatever aperture corrections could be derived from the arguments.
#[derive(Debug, Default)]
pub(super) struct ApertureParams {
    pub(super) small_to_medium: Option<ApertureCorrection>,
    pub(super) medium_to_infinite: Option<ApertureCorrection>,
}

impl ApertureArgs {
    /// An explicit small-aperture correction and count rates are
    /// alternatives; if `self` specifies either, `other`'s are dropped.
    pub(super) fn merge(self, other: Self) -> Self {
        let (ap_corr_small, count_rates) =
            if self.ap_corr_small.is_some() || self.count_rates.is_some() {
                (self.ap_corr_small, self.count_rates)
            } else {
                (other.ap_corr_small, other.count_rates)
            };

        ApertureArgs {
            ap_corr_small,
            ap_corr_inf: self.ap_corr_inf.or(other.ap_corr_inf),
            count_rates,
            small_aperture: self.small_aperture.or(other.small_aperture),
            medium_aperture: self.medium_aperture.or(other.medium_aperture),
        }
    }

    /// Derive the aperture corrections. `obsmode` is used for lookups in the
    /// calibration table.
    pub(super) fn parse(
        self,
        table: Option<&CalibrationTable>,
        obsmode: Option<&Obsmode>,
    ) -> Result<ApertureParams, PhotzptError> {
        let ApertureArgs {
            ap_corr_small,
            ap_corr_inf,
            count_rates,
            small_aperture,
            medium_aperture,
        } = self;

        let small_aperture = small_aperture.or_else(|| obsmode.and_then(|o| o.aperture()));

        let small_to_medium = match (ap_corr_small, count_rates) {
            (Some(c1), count_rates) => {
                if count_rates.is_some() {
                    "Ignoring count rates; the small-aperture correction was given explicitly"
                        .warn();
                }
                Some(ApertureCorrection::new(c1)?)
            }

            (None, Some(count_rates)) => match count_rates.as_slice() {
                [small, large] => Some(ApertureCorrection::from_count_rates(*small, *large)?),
                _ => return Err(CalibrationArgsError::BadCountRates(count_rates.len()).into()),
            },

            (None, None) => match (table, obsmode, small_aperture, medium_aperture) {
                (Some(table), Some(obsmode), Some(small), Some(medium)) => {
                    Some(ApertureCorrection::from_synphot(
                        table,
                        &obsmode.with_aperture(small),
                        &obsmode.with_aperture(medium),
                    )?)
                }
                _ => None,
            },
        };

        let medium_to_infinite = match (ap_corr_inf, table, obsmode, medium_aperture) {
            (Some(c2), _, _, _) => Some(ApertureCorrection::new(c2)?),
            (None, Some(table), Some(obsmode), Some(medium)) => {
                Some(table.infinite_aperture_correction(&obsmode.with_aperture(medium))?)
            }
            _ => None,
        };

        Ok(ApertureParams {
            small_to_medium,
            medium_to_infinite,
        })
    }
}

#[derive(thiserror::Error, Debug)]
pub(super) enum CalibrationArgsError {
    #[error("PHOTFLAM and PHOTPLAM must be given together")]
    IncompleteConstants,

    #[error("No calibration constants were given")]
    NoCalibration,

    #[error("No VegaMag zeropoint was given, and it couldn't be looked up without a calibration table and obsmode")]
    NoVegaZeropoint,

    #[error("Expected two count rates (small and medium apertures), but got {0}")]
    BadCountRates(usize),

    #[error("No {0} was given or could be derived")]
    NoApertureCorrection(&'static str),
}
