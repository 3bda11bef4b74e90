// SPDX-License-Identifier: GPL-3.0-or-later
use crate::vl_status_t;
use num_enum::{FromPrimitive, IntoPrimitive};
use std::fmt::Display;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("operation on a released handle")]
    NullHandle,
    #[error("drawing library error: {0}")]
    Status(Status),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("matrix is not invertible")]
    NotInvertible,
}

impl Error {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// The foreign status carried by this error, if any.
    pub fn status(&self) -> Option<Status> {
        match self {
            Self::Status(status) => Some(*status),
            _ => None,
        }
    }
}

impl From<Status> for Error {
    fn from(status: Status) -> Self {
        Self::Status(status)
    }
}

/// Non-success status codes reported by the drawing library.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, FromPrimitive, IntoPrimitive)]
#[repr(i32)]
pub enum Status {
    NoMemory = 1,
    InvalidRestore = 2,
    NoCurrentPoint = 3,
    InvalidMatrix = 4,
    InvalidStatus = 5,
    NullPointer = 6,
    InvalidString = 7,
    ReadError = 8,
    WriteError = 9,
    SurfaceFinished = 10,
    SurfaceTypeMismatch = 11,
    PatternTypeMismatch = 12,
    InvalidContent = 13,
    InvalidFormat = 14,
    FileNotFound = 15,
    InvalidIndex = 16,
    InvalidStride = 17,
    InvalidSize = 18,
    InternalError = 19,
    #[num_enum(catch_all)]
    Unknown(i32),
}

impl Status {
    /// Turns a raw status code into a result. Zero is success.
    pub fn check(code: vl_status_t) -> Result<()> {
        if code == crate::VL_STATUS_SUCCESS {
            Ok(())
        } else {
            Err(Error::Status(Self::from_primitive(code)))
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::NoMemory => "out of memory",
            Self::InvalidRestore => "restore without matching save",
            Self::NoCurrentPoint => "no current point defined",
            Self::InvalidMatrix => "invalid matrix (not invertible)",
            Self::InvalidStatus => "invalid status value",
            Self::NullPointer => "null pointer",
            Self::InvalidString => "input string not valid UTF-8",
            Self::ReadError => "error while reading from input",
            Self::WriteError => "error while writing to output",
            Self::SurfaceFinished => "the target surface has been finished",
            Self::SurfaceTypeMismatch => "surface type not appropriate for the operation",
            Self::PatternTypeMismatch => "pattern type not appropriate for the operation",
            Self::InvalidContent => "invalid content value",
            Self::InvalidFormat => "invalid pixel format",
            Self::FileNotFound => "file not found",
            Self::InvalidIndex => "invalid index",
            Self::InvalidStride => "invalid stride",
            Self::InvalidSize => "invalid size",
            Self::InternalError => "internal error in the drawing library",
            Self::Unknown(_) => "unknown error status",
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown(code) => write!(f, "{} ({code})", self.message()),
            _ => f.write_str(self.message()),
        }
    }
}
