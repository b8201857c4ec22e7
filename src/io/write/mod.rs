// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to handle writing out calibrated photometry.

mod error;
pub(crate) use error::{FileWriteError, ResultsWriteError};

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use itertools::Itertools;
use log::{debug, trace};
use serde::Serialize;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::{
    aperture::ApertureCorrectionChain, calibration::CalibrationConstants, cli::Warn,
    magnitude::PhotometryResult, zeropoint::ZeropointSet,
};

#[derive(Debug, Display, EnumIter, EnumString, Clone, Copy, PartialEq, Eq)]
/// All write-supported results formats.
pub(crate) enum ResultsOutputType {
    #[strum(serialize = "txt")]
    Txt,
    #[strum(serialize = "json")]
    Json,
}

lazy_static::lazy_static! {
    pub(crate) static ref RESULTS_OUTPUT_EXTENSIONS: String = ResultsOutputType::iter().join(", ");
}

/// Everything needed to reproduce a set of calibrated results.
#[derive(Debug, Serialize)]
struct ResultsTable<'a> {
    obsmode: Option<String>,
    photflam: f64,
    photplam: f64,
    zeropoints: &'a ZeropointSet,
    aperture_corrections: ApertureCorrectionSummary,
    results: &'a [PhotometryResult],
}

#[derive(Debug, Serialize)]
struct ApertureCorrectionSummary {
    small_to_medium: f64,
    medium_to_infinite: f64,
    total: f64,
}

/// Write calibrated photometry to `file` in the given format.
pub(crate) fn write_results(
    file: &Path,
    output_type: ResultsOutputType,
    cal: &CalibrationConstants,
    zeropoints: &ZeropointSet,
    aperture_corrections: &ApertureCorrectionChain,
    results: &[PhotometryResult],
) -> Result<(), ResultsWriteError> {
    debug!(
        "Writing {} results to {} ({output_type})",
        results.len(),
        file.display()
    );
    let mut writer = BufWriter::new(File::create(file)?);
    match output_type {
        ResultsOutputType::Txt => {
            write_results_txt(&mut writer, cal, zeropoints, aperture_corrections, results)?
        }

        ResultsOutputType::Json => {
            let table = ResultsTable {
                obsmode: cal.obsmode().map(|o| o.to_string()),
                photflam: cal.photflam(),
                photplam: cal.photplam(),
                zeropoints,
                aperture_corrections: ApertureCorrectionSummary {
                    small_to_medium: aperture_corrections.small_to_medium().factor(),
                    medium_to_infinite: aperture_corrections.medium_to_infinite().factor(),
                    total: aperture_corrections.total(),
                },
                results,
            };
            serde_json::to_writer_pretty(&mut writer, &table)?;
            writeln!(writer)?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Write calibrated photometry as a fixed-width text table. The calibration
/// used is described in a '#'-commented header.
pub(crate) fn write_results_txt<W: Write>(
    writer: &mut W,
    cal: &CalibrationConstants,
    zeropoints: &ZeropointSet,
    aperture_corrections: &ApertureCorrectionChain,
    results: &[PhotometryResult],
) -> std::io::Result<()> {
    if let Some(obsmode) = cal.obsmode() {
        writeln!(writer, "# obsmode: {obsmode}")?;
    }
    writeln!(writer, "# PHOTFLAM: {:e} erg/s/cm^2/A", cal.photflam())?;
    writeln!(writer, "# PHOTPLAM: {} A", cal.photplam())?;
    writeln!(
        writer,
        "# Zeropoints: VegaMag {:.6}, STMag {:.6}, ABMag {:.6}",
        zeropoints.vega, zeropoints.st, zeropoints.ab
    )?;
    writeln!(
        writer,
        "# Aperture corrections: {:.6} (small to medium), {:.6} (medium to infinite)",
        aperture_corrections.small_to_medium().factor(),
        aperture_corrections.medium_to_infinite().factor()
    )?;
    writeln!(
        writer,
        "#{:>13} {:>14} {:>14} {:>14} {:>10} {:>10} {:>10}",
        "flux", "flux_inf", "f_lambda", "f_nu", "stmag", "abmag", "vegamag"
    )?;
    for r in results {
        writeln!(
            writer,
            "{:>14.6} {:>14.6} {:>14.6e} {:>14.6e} {:>10.6} {:>10.6} {:>10.6}",
            r.measured_flux,
            r.corrected_flux,
            r.f_lambda,
            r.f_nu,
            r.st_mag,
            r.ab_mag,
            r.vega_mag
        )?;
    }
    Ok(())
}

/// Check if we are able to write to a file path. If we aren't able to write to
/// the file, it's either because the directory containing the file doesn't
/// exist, or there's another issue (probably bad permissions). In the former
/// case, create the parent directories, otherwise return an error.
/// Additionally, if the file exists, emit a warning that it will be
/// overwritten.
///
/// With this approach, we avoid doing a whole run only to be unable to write
/// to a file at the end.
pub(crate) fn can_write_to_file(file: &Path) -> Result<(), FileWriteError> {
    trace!("Testing whether we can write to {}", file.display());

    let file_exists = file.exists();
    match std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(file)
        .map_err(|e| e.kind())
    {
        Ok(_) => {
            // Don't leave an empty file behind.
            if !file_exists {
                std::fs::remove_file(file)?;
            }
        }

        Err(std::io::ErrorKind::NotFound) => {
            if let Some(p) = file.parent() {
                match std::fs::DirBuilder::new()
                    .recursive(true)
                    .create(p)
                    .map_err(|e| e.kind())
                {
                    Ok(()) => (),
                    Err(std::io::ErrorKind::PermissionDenied) => {
                        return Err(FileWriteError::NewDirectory(p.to_path_buf()))
                    }
                    Err(e) => return Err(FileWriteError::IO(e.into())),
                }
            }
        }

        Err(std::io::ErrorKind::PermissionDenied) => {
            return Err(FileWriteError::FileNotWritable {
                file: file.display().to_string(),
            })
        }

        Err(e) => return Err(FileWriteError::IO(e.into())),
    }

    if file_exists {
        format!("Will overwrite the existing file '{}'", file.display()).warn();
    }
    Ok(())
}
