// SPDX-License-Identifier: GPL-3.0-or-later

mod boundary;
mod error;
mod handle;
mod settings;

pub use boundary::{path_to_cstring, to_cstring};
pub use error::{Error, Result, Status};
pub use handle::{Foreign, ForeignHandle, Liveness};
pub use settings::{config, configure, init_logging, Config, LIVENESS_CHECKS_VAR, LOG_VAR};
