// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Parameters for each of the `photzpt` subcommands.
//!
//! The code here is kind of "mirroring" the code within the `cli` module; the
//! idea is that `cli` is unparsed, user-facing code, whereas parameters have
//! been parsed and are ready to be used directly.

mod aperture_correction;
mod photometry;
mod zeropoints;

pub(crate) use aperture_correction::ApertureCorrectionParams;
pub(crate) use photometry::{PhotometryParams, PhotometryRunError};
pub(crate) use zeropoints::ZeropointsParams;
