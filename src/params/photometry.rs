// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use log::info;
use thiserror::Error;

use crate::{
    aperture::ApertureCorrectionChain,
    calibration::CalibrationConstants,
    error::PhotometryError,
    io::write::{write_results, write_results_txt, ResultsOutputType, ResultsWriteError},
    photometry::{calibrate_measurements, MeasurementSet},
    zeropoint::ZeropointSet,
};

pub(crate) struct PhotometryParams {
    pub(crate) cal: CalibrationConstants,
    pub(crate) zeropoints: ZeropointSet,
    pub(crate) aperture_corrections: ApertureCorrectionChain,
    pub(crate) measurements: MeasurementSet,

    /// If empty, results are printed to stdout.
    pub(crate) outputs: Vec<(PathBuf, ResultsOutputType)>,
}

impl PhotometryParams {
    pub(crate) fn run(&self) -> Result<(), PhotometryRunError> {
        let Self {
            cal,
            zeropoints,
            aperture_corrections,
            measurements,
            outputs,
        } = self;

        let results =
            calibrate_measurements(measurements, cal, zeropoints, aperture_corrections)?;
        info!("Calibrated {} measurements", results.len());

        if outputs.is_empty() {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            write_results_txt(&mut lock, cal, zeropoints, aperture_corrections, &results)?;
        }
        for (file, output_type) in outputs {
            write_results(
                file,
                *output_type,
                cal,
                zeropoints,
                aperture_corrections,
                &results,
            )?;
            info!("Wrote {}", file.display());
        }

        Ok(())
    }
}

#[derive(Error, Debug)]
pub(crate) enum PhotometryRunError {
    #[error(transparent)]
    Photometry(#[from] PhotometryError),

    #[error(transparent)]
    Write(#[from] ResultsWriteError),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
