// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.

All constants *must* be double precision. Fluxes and zeropoints span many
orders of magnitude, and single precision loses millimag accuracy quickly.
 */

/// The factor relating a flux ratio to a magnitude difference, i.e.
/// m = -2.5 log10(F).
pub const MAG_SCALE: f64 = 2.5;

/// STMag offset. A source with a flat f_lambda of 3.63e-9 erg/s/cm²/Å has
/// STMag 0, i.e. STMag = -2.5 log10(f_lambda) - 21.10.
pub const ST_MAG_OFFSET: f64 = 21.10;

/// ABMag offset once f_lambda has been expressed in terms of PHOTFLAM and
/// PHOTPLAM [Å]. Derived from the 3631 Jy AB reference and the speed of light
/// in Å/s.
pub const AB_MAG_OFFSET: f64 = 2.408;

/// ABMag of a source with f_nu = 1 erg/s/cm²/Hz is -48.60.
pub const AB_MAG_FNU_OFFSET: f64 = 48.60;

/// Speed of light in vacuum \[Å/s\]
pub const SPEED_OF_LIGHT_ANGSTROM: f64 = 2.99792458e18;

/// Aperture radii within this many arcsec are considered the same.
pub const APERTURE_RADIUS_TOLERANCE: f64 = 1e-6;

/// Obsmode epochs within this many days are considered the same.
pub const MJD_TOLERANCE: f64 = 1e-6;
