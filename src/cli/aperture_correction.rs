// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use clap::Parser;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use super::common::{
    display_warnings, ApertureArgs, CalibrationArgsError, SynphotArgs, ARG_FILE_HELP,
};
use crate::{params::ApertureCorrectionParams, PhotzptError};

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct ApertureCorrectionArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    #[clap(flatten)]
    #[serde(default)]
    pub(super) synphot: SynphotArgs,

    #[clap(flatten)]
    #[serde(default)]
    pub(super) aperture: ApertureArgs,
}

impl ApertureCorrectionArgs {
    /// Both command-line and file arguments overlap in terms of what is
    /// available; this function consolidates everything that was specified into
    /// a single struct. Where applicable, it will prefer CLI parameters over
    /// those in the file.
    pub(super) fn merge(self) -> Result<ApertureCorrectionArgs, PhotzptError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            let ApertureCorrectionArgs {
                args_file: _,
                synphot,
                aperture,
            } = unpack_arg_file!(arg_file);

            Ok(ApertureCorrectionArgs {
                args_file: None,
                synphot: cli_args.synphot.merge(synphot),
                aperture: cli_args.aperture.merge(aperture),
            })
        } else {
            Ok(cli_args)
        }
    }

    fn parse(self) -> Result<ApertureCorrectionParams, PhotzptError> {
        debug!("{:#?}", self);

        let Self {
            args_file: _,
            synphot,
            aperture,
        } = self;

        let synphot = synphot.parse()?;
        let aperture = aperture.parse(synphot.table.as_ref(), synphot.obsmode.as_ref())?;
        if aperture.small_to_medium.is_none() && aperture.medium_to_infinite.is_none() {
            return Err(
                CalibrationArgsError::NoApertureCorrection("aperture correction").into(),
            );
        }

        display_warnings();

        Ok(ApertureCorrectionParams {
            small_to_medium: aperture.small_to_medium,
            medium_to_infinite: aperture.medium_to_infinite,
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
