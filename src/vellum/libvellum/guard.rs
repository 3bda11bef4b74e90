// SPDX-License-Identifier: GPL-3.0-or-later
use crate::{vl_status_t, VL_STATUS_INTERNAL_ERROR};
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::error;

// Unwinding out of an extern "C" function aborts the host, so every entry
// point that does real work runs behind this.
pub(crate) fn status_guard<F>(name: &str, func: F) -> vl_status_t
where
    F: FnOnce() -> vl_status_t,
{
    match catch_unwind(AssertUnwindSafe(func)) {
        Ok(status) => status,
        Err(_) => {
            error!("Panic inside {name}");
            VL_STATUS_INTERNAL_ERROR
        }
    }
}

pub(crate) fn status_from_io(err: &std::io::Error, fallback: vl_status_t) -> vl_status_t {
    match err.kind() {
        std::io::ErrorKind::NotFound if fallback == crate::VL_STATUS_READ_ERROR => {
            crate::VL_STATUS_FILE_NOT_FOUND
        }
        std::io::ErrorKind::OutOfMemory => crate::VL_STATUS_NO_MEMORY,
        _ => fallback,
    }
}
