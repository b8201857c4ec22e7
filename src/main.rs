// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The photzpt binary.

use clap::Parser;

use photzpt::Photzpt;

fn main() {
    // Returning a Result from main would print the Debug form of the error.
    if let Err(e) = Photzpt::parse().run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
