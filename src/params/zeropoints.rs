// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use log::info;
use strum::IntoEnumIterator;

use crate::{
    calibration::CalibrationConstants,
    magnitude::{flux_from_magnitude, MagnitudeSystem},
    zeropoint::ZeropointSet,
};

pub(crate) struct ZeropointsParams {
    pub(crate) cal: CalibrationConstants,
    pub(crate) zeropoints: ZeropointSet,

    /// Magnitudes to convert back into count rates, and their system.
    pub(crate) magnitudes: Vec<f64>,
    pub(crate) system: MagnitudeSystem,
}

impl ZeropointsParams {
    pub(crate) fn run(&self) {
        let Self {
            cal,
            zeropoints,
            magnitudes,
            system,
        } = self;

        match cal.obsmode() {
            Some(obsmode) => info!("Zeropoints for {obsmode}:"),
            None => info!("Zeropoints:"),
        }
        for s in MagnitudeSystem::iter() {
            info!("{s:>8}: {:.6}", zeropoints.get(s));
        }

        if !magnitudes.is_empty() {
            let zp = zeropoints.get(*system);
            info!("");
            info!("Count rates [counts/s]:");
            for &mag in magnitudes {
                let flux = flux_from_magnitude(mag, zp);
                info!("{mag:>10.4} {system} -> {flux:.6} ({:e} erg/s/cm²/Å)", cal.flam(flux));
            }
        }
    }
}
