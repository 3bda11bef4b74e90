// SPDX-License-Identifier: GPL-3.0-or-later
//! Reference-counted 2D drawing library with a C calling convention.
//!
//! Every object is handed out as an opaque pointer that owns one reference.
//! Objects are released with the matching `*_destroy` function once the last
//! reference is gone. Creation functions never return null for surfaces,
//! contexts and patterns: on failure they return an object in an error state,
//! which must be checked with the matching `*_status` function and destroyed
//! like any other object.
#![allow(non_camel_case_types)]
#![allow(clippy::missing_safety_doc)]

mod context;
mod guard;
mod matrix;
mod pattern;
mod raster;
mod surface;

pub use context::*;
pub use matrix::*;
pub use pattern::*;
pub use surface::*;

use std::ffi::{c_char, c_int};

pub type vl_status_t = c_int;

pub const VL_STATUS_SUCCESS: vl_status_t = 0;
pub const VL_STATUS_NO_MEMORY: vl_status_t = 1;
pub const VL_STATUS_INVALID_RESTORE: vl_status_t = 2;
pub const VL_STATUS_NO_CURRENT_POINT: vl_status_t = 3;
pub const VL_STATUS_INVALID_MATRIX: vl_status_t = 4;
pub const VL_STATUS_INVALID_STATUS: vl_status_t = 5;
pub const VL_STATUS_NULL_POINTER: vl_status_t = 6;
pub const VL_STATUS_INVALID_STRING: vl_status_t = 7;
pub const VL_STATUS_READ_ERROR: vl_status_t = 8;
pub const VL_STATUS_WRITE_ERROR: vl_status_t = 9;
pub const VL_STATUS_SURFACE_FINISHED: vl_status_t = 10;
pub const VL_STATUS_SURFACE_TYPE_MISMATCH: vl_status_t = 11;
pub const VL_STATUS_PATTERN_TYPE_MISMATCH: vl_status_t = 12;
pub const VL_STATUS_INVALID_CONTENT: vl_status_t = 13;
pub const VL_STATUS_INVALID_FORMAT: vl_status_t = 14;
pub const VL_STATUS_FILE_NOT_FOUND: vl_status_t = 15;
pub const VL_STATUS_INVALID_INDEX: vl_status_t = 16;
pub const VL_STATUS_INVALID_STRIDE: vl_status_t = 17;
pub const VL_STATUS_INVALID_SIZE: vl_status_t = 18;
pub const VL_STATUS_INTERNAL_ERROR: vl_status_t = 19;

pub type vl_format_t = c_int;

pub const VL_FORMAT_INVALID: vl_format_t = -1;
pub const VL_FORMAT_ARGB32: vl_format_t = 0;
pub const VL_FORMAT_RGB24: vl_format_t = 1;
pub const VL_FORMAT_A8: vl_format_t = 2;

pub type vl_pattern_type_t = c_int;

pub const VL_PATTERN_TYPE_SOLID: vl_pattern_type_t = 0;
pub const VL_PATTERN_TYPE_SURFACE: vl_pattern_type_t = 1;
pub const VL_PATTERN_TYPE_LINEAR: vl_pattern_type_t = 2;
pub const VL_PATTERN_TYPE_RADIAL: vl_pattern_type_t = 3;

pub type vl_extend_t = c_int;

pub const VL_EXTEND_NONE: vl_extend_t = 0;
pub const VL_EXTEND_REPEAT: vl_extend_t = 1;
pub const VL_EXTEND_REFLECT: vl_extend_t = 2;
pub const VL_EXTEND_PAD: vl_extend_t = 3;

pub type vl_filter_t = c_int;

pub const VL_FILTER_FAST: vl_filter_t = 0;
pub const VL_FILTER_GOOD: vl_filter_t = 1;
pub const VL_FILTER_BEST: vl_filter_t = 2;
pub const VL_FILTER_NEAREST: vl_filter_t = 3;
pub const VL_FILTER_BILINEAR: vl_filter_t = 4;

pub type vl_line_cap_t = c_int;

pub const VL_LINE_CAP_BUTT: vl_line_cap_t = 0;
pub const VL_LINE_CAP_ROUND: vl_line_cap_t = 1;
pub const VL_LINE_CAP_SQUARE: vl_line_cap_t = 2;

pub type vl_line_join_t = c_int;

pub const VL_LINE_JOIN_MITER: vl_line_join_t = 0;
pub const VL_LINE_JOIN_ROUND: vl_line_join_t = 1;
pub const VL_LINE_JOIN_BEVEL: vl_line_join_t = 2;

pub type vl_fill_rule_t = c_int;

pub const VL_FILL_RULE_WINDING: vl_fill_rule_t = 0;
pub const VL_FILL_RULE_EVEN_ODD: vl_fill_rule_t = 1;

/// Largest width or height an image surface may have.
pub const VL_MAX_IMAGE_SIZE: c_int = 32767;

/// Returns a static, NUL-terminated description of a status code.
#[no_mangle]
pub extern "C" fn vl_status_to_string(status: vl_status_t) -> *const c_char {
    let message: &'static [u8] = match status {
        VL_STATUS_SUCCESS => b"no error has occurred\0",
        VL_STATUS_NO_MEMORY => b"out of memory\0",
        VL_STATUS_INVALID_RESTORE => b"vl_restore() without matching vl_save()\0",
        VL_STATUS_NO_CURRENT_POINT => b"no current point defined\0",
        VL_STATUS_INVALID_MATRIX => b"invalid matrix (not invertible)\0",
        VL_STATUS_INVALID_STATUS => b"invalid value for an input vl_status_t\0",
        VL_STATUS_NULL_POINTER => b"NULL pointer\0",
        VL_STATUS_INVALID_STRING => b"input string not valid UTF-8\0",
        VL_STATUS_READ_ERROR => b"error while reading from input stream\0",
        VL_STATUS_WRITE_ERROR => b"error while writing to output stream\0",
        VL_STATUS_SURFACE_FINISHED => b"the target surface has been finished\0",
        VL_STATUS_SURFACE_TYPE_MISMATCH => {
            b"the surface type is not appropriate for the operation\0"
        }
        VL_STATUS_PATTERN_TYPE_MISMATCH => {
            b"the pattern type is not appropriate for the operation\0"
        }
        VL_STATUS_INVALID_CONTENT => b"invalid value for an input vl_content_t\0",
        VL_STATUS_INVALID_FORMAT => b"invalid value for an input vl_format_t\0",
        VL_STATUS_FILE_NOT_FOUND => b"file not found\0",
        VL_STATUS_INVALID_INDEX => b"invalid index passed to getter\0",
        VL_STATUS_INVALID_STRIDE => b"invalid value for stride\0",
        VL_STATUS_INVALID_SIZE => b"invalid value for size\0",
        VL_STATUS_INTERNAL_ERROR => b"internal error in the drawing library\0",
        _ => b"<unknown error status>\0",
    };
    message.as_ptr().cast()
}

/// Returns the library version as a static, NUL-terminated string.
#[no_mangle]
pub extern "C" fn vl_version_string() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr().cast()
}
