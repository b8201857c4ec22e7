// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code for reading calibration constants and measurements.

mod fits;
mod measurements;
#[cfg(test)]
mod tests;

pub(crate) use fits::{read_fits_calibration, FitsError};
pub(crate) use measurements::{parse_measurements, read_measurements, MeasurementReadError};
