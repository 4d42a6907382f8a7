/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use anyhow::{Context, Result};
use flexi_logger::{Logger, LoggerHandle};

/// Starts logging to stderr, filtered by `RUST_LOG` if it is set and by `filter` otherwise.
///
/// Stdout is left to the engine's replies. The returned handle must be kept alive for as long as logging is needed.
pub fn init_logging(filter: &str) -> Result<LoggerHandle> {
    Logger::try_with_env_or_str(filter)
        .with_context(|| format!("Invalid log filter {filter:?}"))?
        .log_to_stderr()
        .format(flexi_logger::colored_default_format)
        .start()
        .context("Failed to start the logger")
}
