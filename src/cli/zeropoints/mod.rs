// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.


use std::{path::PathBuf, str::FromStr};

use clap::Parser;
use itertools::Itertools;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use super::common::{display_warnings, CalibrationArgs, SynphotArgs, ARG_FILE_HELP};
use crate::{magnitude::MagnitudeSystem, params::ZeropointsParams, PhotzptError};

lazy_static::lazy_static! {
    static ref SYSTEM_HELP: String =
        format!("The magnitude system of --magnitudes. Default: {}. Supported systems: {}", MagnitudeSystem::Vega, MagnitudeSystem::iter().join(", "));
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct ZeropointsArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    #[clap(flatten)]
    #[serde(default)]
    pub(super) synphot: SynphotArgs,

    #[clap(flatten)]
    #[serde(default)]
    pub(super) calibration: CalibrationArgs,

    /// Magnitudes to convert into count rates [counts/s] with the zeropoints.
    #[clap(long, multiple_values(true), allow_hyphen_values = true)]
    pub(super) magnitudes: Option<Vec<f64>>,

    #[clap(long, help = SYSTEM_HELP.as_str())]
    pub(super) system: Option<String>,
}

impl ZeropointsArgs {
    /// Both command-line and file arguments overlap in terms of what is
    /// available; this function consolidates everything that was specified into
    /// a single struct. Where applicable, it will prefer CLI parameters over
    /// those in the file.
    pub(super) fn merge(self) -> Result<ZeropointsArgs, PhotzptError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            let ZeropointsArgs {
                args_file: _,
                synphot,
                calibration,
                magnitudes,
                system,
            } = unpack_arg_file!(arg_file);

            Ok(ZeropointsArgs {
                args_file: None,
                synphot: cli_args.synphot.merge(synphot),
                calibration: cli_args.calibration.merge(calibration),
                magnitudes: cli_args.magnitudes.or(magnitudes),
                system: cli_args.system.or(system),
            })
        } else {
            Ok(cli_args)
        }
    }

    fn parse(self) -> Result<ZeropointsParams, PhotzptError> {
        debug!("{:#?}", self);

        let Self {
            args_file: _,
            synphot,
            calibration,
            magnitudes,
            system,
        } = self;

        let system = match system {
            Some(s) => MagnitudeSystem::from_str(&s.to_lowercase())
                .map_err(|_| ZeropointsArgsError::UnknownSystem(s))?,
            None => MagnitudeSystem::Vega,
        };

        let synphot = synphot.parse()?;
        let calibration = calibration.parse(&synphot)?;

        display_warnings();

        Ok(ZeropointsParams {
            cal: calibration.cal,
            zeropoints: calibration.zeropoints,
            magnitudes: magnitudes.unwrap_or_default(),
            system,
        })
    }

    pub(super) fn run(self, dry_run: bool) -> Result<(), PhotzptError> {
        debug!("Converting arguments into parameters");
        trace!("{:#?}", self);
        let params = self.parse()?;

        if dry_run {
            info!("Dry run -- exiting now.");
            return Ok(());
        }

        params.run();
        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub(super) enum ZeropointsArgsError {
    #[error("Magnitude system '{}' is not supported; supported systems are: {}", .0, MagnitudeSystem::iter().join(", "))]
    UnknownSystem(String),
}
