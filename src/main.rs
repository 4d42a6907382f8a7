/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use clap::Parser;
use kingme::{init_logging, Cli, Engine};

fn main() {
    let cli = Cli::parse();

    let _logger = match init_logging(&cli.log_level) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("{e:#}");
            std::process::exit(1);
        }
    };

    let result = Engine::new(cli).and_then(|mut engine| engine.run());

    if let Err(e) = result {
        log::error!("{} encountered an error: {e:#}", env!("CARGO_PKG_NAME"));
        std::process::exit(1);
    }
}
