// SPDX-License-Identifier: GPL-3.0-or-later
//! Thread-safe wrappers around the vellum drawing library.
//!
//! Every wrapper owns one library reference, which is dropped either by an
//! explicit `release` or when the wrapper goes out of scope, whichever comes
//! first. Operations on a released wrapper fail with `Error::NullHandle`
//! instead of touching freed memory.
use std::ffi::CStr;

pub(crate) use libvellum::*;

pub mod common;
pub mod engine;

pub use common::{
    config, configure, Config, Error, Foreign, ForeignHandle, Liveness, Result, Status,
};
pub use engine::{
    ColorStop, Context, Extend, FillRule, Filter, Format, LineCap, LineJoin, Matrix, Pattern,
    PatternKind, Surface, Transform,
};

/// Sets up logging for applications that don't install their own
/// subscriber and loads the configuration from the environment.
pub fn init() {
    common::init_logging();
    let config = config();
    tracing::debug!("vellum {} initialized with {config:?}", library_version());
}

/// Version of the drawing library.
pub fn library_version() -> String {
    unsafe { CStr::from_ptr(vl_version_string()) }
        .to_str()
        .unwrap_or_default()
        .to_owned()
}

/// Library description of a raw status code.
pub fn status_message(status: Status) -> String {
    unsafe { CStr::from_ptr(vl_status_to_string(status.into())) }
        .to_str()
        .unwrap_or_default()
        .to_owned()
}
