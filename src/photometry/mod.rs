// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Calibrated photometry of many sources at once.


use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use vec1::Vec1;

use crate::{
    aperture::ApertureCorrectionChain, calibration::CalibrationConstants, error::PhotometryError,
    magnitude::PhotometryResult, zeropoint::ZeropointSet,
};

/// Count rates \[counts/s\] of point sources, all measured in the same small
/// aperture. There is always at least one measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeasurementSet(Vec1<f64>);

impl MeasurementSet {
    pub fn new(fluxes: Vec1<f64>) -> MeasurementSet {
        MeasurementSet(fluxes)
    }

    /// Returns `None` if `fluxes` is empty.
    pub fn from_vec(fluxes: Vec<f64>) -> Option<MeasurementSet> {
        Vec1::try_from_vec(fluxes).ok().map(MeasurementSet)
    }

    pub fn fluxes(&self) -> &[f64] {
        self.0.as_slice()
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Aperture-correct and calibrate every measurement. Results are in the same
/// order as the measurements.
///
/// If the calibration constants and aperture corrections both know their
/// obsmodes, they must describe the same configuration. If any measurement
/// can't be calibrated (e.g. it isn't positive), the error for the first such
/// measurement is returned.
pub fn calibrate_measurements(
    measurements: &MeasurementSet,
    cal: &CalibrationConstants,
    zeropoints: &ZeropointSet,
    aperture_corrections: &ApertureCorrectionChain,
) -> Result<Vec<PhotometryResult>, PhotometryError> {
    cal.check_configuration(aperture_corrections.obsmode())?;
    debug!(
        "Calibrating {} measurements with a total aperture correction of {}",
        measurements.len(),
        aperture_corrections.total()
    );

    // Collecting into a `Result` straight from rayon would return an
    // arbitrary error; collect everything and pick the first error instead.
    let results: Vec<Result<PhotometryResult, PhotometryError>> = measurements
        .fluxes()
        .par_iter()
        .map(|&measured_flux| {
            let corrected = aperture_corrections.apply(measured_flux);
            PhotometryResult::new(measured_flux, corrected.infinite, cal, zeropoints)
        })
        .collect();
    results.into_iter().collect()
}
