// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

#[cfg(test)]
mod tests;

use std::{path::PathBuf, str::FromStr};

use clap::Parser;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use super::common::{
    display_warnings, ApertureArgs, CalibrationArgs, CalibrationArgsError, InfoPrinter,
    SynphotArgs, ARG_FILE_HELP,
};
use crate::{
    aperture::ApertureCorrectionChain,
    io::{
        read::read_measurements,
        write::{can_write_to_file, ResultsOutputType, RESULTS_OUTPUT_EXTENSIONS},
    },
    params::PhotometryParams,
    photometry::MeasurementSet,
    PhotzptError,
};

lazy_static::lazy_static! {
    static ref OUTPUTS_HELP: String =
        format!("Paths to the output results tables. If not given, results are printed. Supported formats: {}", *RESULTS_OUTPUT_EXTENSIONS);
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct PhotometryArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    #[clap(flatten)]
    #[serde(default)]
    pub(super) synphot: SynphotArgs,

    #[clap(flatten)]
    #[serde(default)]
    pub(super) calibration: CalibrationArgs,

    #[clap(flatten)]
    #[serde(default)]
    pub(super) aperture: ApertureArgs,

    /// Count rates measured in the small aperture [counts/s].
    #[clap(
        short,
        long,
        multiple_values(true),
        allow_hyphen_values = true,
        help_heading = "MEASUREMENTS"
    )]
    pub(super) fluxes: Option<Vec<f64>>,

    /// A file of count rates measured in the small aperture [counts/s]. Text
    /// files have whitespace- or comma-separated values ('#' starts a
    /// comment); JSON files have an array.
    #[clap(short, long, help_heading = "MEASUREMENTS")]
    pub(super) measurements: Option<PathBuf>,

    #[clap(
        short = 'o',
        long,
        multiple_values(true),
        help = OUTPUTS_HELP.as_str(),
        help_heading = "OUTPUT FILES"
    )]
    pub(super) outputs: Option<Vec<PathBuf>>,
}

impl PhotometryArgs {
    /// Both command-line and file arguments overlap in terms of what is
    /// available; this function consolidates everything that was specified into
    /// a single struct. Where applicable, it will prefer CLI parameters over
    /// those in the file.
    ///
    /// This function should only ever merge arguments, and not try to make
    /// sense of them.
    pub(super) fn merge(self) -> Result<PhotometryArgs, PhotzptError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            // Read in the file arguments. Ensure all of the file args are
            // accounted for by pattern matching.
            let PhotometryArgs {
                args_file: _,
                synphot,
                calibration,
                aperture,
                fluxes,
                measurements,
                outputs,
            } = unpack_arg_file!(arg_file);

            // Count rates and a measurements file are alternatives; whichever
            // the CLI gives replaces both from the file.
            let (fluxes, measurements) =
                if cli_args.fluxes.is_some() || cli_args.measurements.is_some() {
                    (cli_args.fluxes, cli_args.measurements)
                } else {
                    (fluxes, measurements)
                };

            // Merge all the arguments, preferring the CLI args when available.
            Ok(PhotometryArgs {
                args_file: None,
                synphot: cli_args.synphot.merge(synphot),
                calibration: cli_args.calibration.merge(calibration),
                aperture: cli_args.aperture.merge(aperture),
                fluxes,
                measurements,
                outputs: cli_args.outputs.or(outputs),
            })
        } else {
            Ok(cli_args)
        }
    }

    fn parse(self) -> Result<PhotometryParams, PhotzptError> {
        debug!("{:#?}", self);

        let Self {
            args_file: _,
            synphot,
            calibration,
            aperture,
            fluxes,
            measurements,
            outputs,
        } = self;

        let synphot = synphot.parse()?;
        let calibration = calibration.parse(&synphot)?;

        let obsmode = synphot.obsmode.as_ref().or_else(|| calibration.cal.obsmode());
        let aperture = aperture.parse(synphot.table.as_ref(), obsmode)?;
        let c1 = aperture.small_to_medium.ok_or(CalibrationArgsError::NoApertureCorrection(
            "small-to-medium aperture correction",
        ))?;
        let c2 = aperture
            .medium_to_infinite
            .ok_or(CalibrationArgsError::NoApertureCorrection(
                "medium-to-infinite aperture correction",
            ))?;
        let aperture_corrections = ApertureCorrectionChain::new(c1, c2)?;

        let measurements = match (fluxes, measurements) {
            (Some(_), Some(_)) => return Err(PhotometryArgsError::TwoMeasurementSources.into()),
            (Some(fluxes), None) => {
                MeasurementSet::from_vec(fluxes).ok_or(PhotometryArgsError::NoMeasurements)?
            }
            (None, Some(file)) => read_measurements(&file)?,
            (None, None) => return Err(PhotometryArgsError::NoMeasurements.into()),
        };

        let mut output_files = vec![];
        for file in outputs.unwrap_or_default() {
            let output_type = file
                .extension()
                .and_then(|os_str| os_str.to_str())
                .and_then(|s| ResultsOutputType::from_str(&s.to_lowercase()).ok())
                .ok_or_else(|| PhotometryArgsError::OutputFileExtension(file.clone()))?;
            can_write_to_file(&file)?;
            output_files.push((file, output_type));
        }

        let mut printer = InfoPrinter::new("Photometry".into());
        printer.push_block(vec![
            format!(
                "Aperture corrections: {:.6} (small to medium), {:.6} (medium to infinite)",
                aperture_corrections.small_to_medium().factor(),
                aperture_corrections.medium_to_infinite().factor()
            )
            .into(),
            format!("Total: {:.6}", aperture_corrections.total()).into(),
        ]);
        printer.push_line(format!("{} measurements", measurements.len()).into());
        if !output_files.is_empty() {
            printer.push_block(
                output_files
                    .iter()
                    .map(|(file, _)| format!("Writing to {}", file.display()).into())
                    .collect(),
            );
        }
        printer.display();

        display_warnings();

        Ok(PhotometryParams {
            cal: calibration.cal,
            zeropoints: calibration.zeropoints,
            aperture_corrections,
            measurements,
            outputs: output_files,
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

        params.run()?;
        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub(super) enum PhotometryArgsError {
    #[error("No measurements were given")]
    NoMeasurements,

    #[error("Measurements were given both as count rates (--fluxes) and as a file (--measurements); only one may be used")]
    TwoMeasurementSources,

    #[error("Output file '{}' doesn't have a recognised file extension! Valid extensions are: {}", .0.display(), *RESULTS_OUTPUT_EXTENSIONS)]
    OutputFileExtension(PathBuf),
}
