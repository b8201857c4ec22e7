// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Reading raw measured fluxes.
//!
//! Text files hold one or more fluxes per line, separated by whitespace or
//! commas; anything after a '#' is a comment. JSON files hold an array of
//! numbers.

use std::{
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
};

use log::debug;
use thiserror::Error;

use crate::photometry::MeasurementSet;

pub(crate) fn read_measurements(file: &Path) -> Result<MeasurementSet, MeasurementReadError> {
    debug!("Reading measurements from {}", file.display());
    let is_json = file
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let mut reader = BufReader::new(File::open(file)?);
    let measurements = if is_json {
        let fluxes: Vec<f64> = serde_json::from_reader(reader)?;
        MeasurementSet::from_vec(fluxes)
            .ok_or_else(|| MeasurementReadError::Empty(file.to_path_buf()))?
    } else {
        let mut contents = String::new();
        reader.read_to_string(&mut contents)?;
        match parse_measurements(&contents) {
            Err(MeasurementReadError::Empty(_)) => {
                return Err(MeasurementReadError::Empty(file.to_path_buf()))
            }
            r => r?,
        }
    };
    debug!("Read {} measurements", measurements.len());
    Ok(measurements)
}

/// Parse the text form of measurements. Values are not validated here; bad
/// fluxes are reported when they're calibrated.
pub(crate) fn parse_measurements(s: &str) -> Result<MeasurementSet, MeasurementReadError> {
    let mut fluxes = vec![];
    for (i_line, line) in s.lines().enumerate() {
        let line = match line.split_once('#') {
            Some((data, _comment)) => data,
            None => line,
        };
        for token in line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
        {
            let flux = token
                .parse()
                .map_err(|_| MeasurementReadError::BadValue {
                    line: i_line + 1,
                    value: token.to_string(),
                })?;
            fluxes.push(flux);
        }
    }

    MeasurementSet::from_vec(fluxes).ok_or_else(|| MeasurementReadError::Empty(PathBuf::new()))
}

#[derive(Error, Debug)]
pub enum MeasurementReadError {
    #[error("Line {line}: Couldn't parse '{value}' as a flux")]
    BadValue { line: usize, value: String },

    #[error("No measurements were found in '{0}'")]
    Empty(PathBuf),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
}
