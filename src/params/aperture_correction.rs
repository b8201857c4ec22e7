// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use log::info;

use crate::aperture::ApertureCorrection;

/// At least one of these is always present.
pub(crate) struct ApertureCorrectionParams {
    pub(crate) small_to_medium: Option<ApertureCorrection>,
    pub(crate) medium_to_infinite: Option<ApertureCorrection>,
}

impl ApertureCorrectionParams {
    pub(crate) fn run(&self) {
        let describe = |c: &ApertureCorrection| match c.obsmode() {
            Some(obsmode) => format!("{:.6} ({obsmode})", c.factor()),
            None => format!("{:.6}", c.factor()),
        };

        if let Some(c1) = &self.small_to_medium {
            info!("Small to medium aperture:    {}", describe(c1));
        }
        if let Some(c2) = &self.medium_to_infinite {
            info!("Medium to infinite aperture: {}", describe(c2));
        }
        if let (Some(c1), Some(c2)) = (&self.small_to_medium, &self.medium_to_infinite) {
            info!("Total:                       {:.6}", c1.factor() * c2.factor());
        }
    }
}
