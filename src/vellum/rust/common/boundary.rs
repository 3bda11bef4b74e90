// SPDX-License-Identifier: GPL-3.0-or-later
use crate::{Error, Result};
use std::{ffi::CString, path::Path};
use tracing::warn;

/// Converts a string for the drawing library. An embedded NUL ends the
/// string there, the rest is dropped.
pub fn to_cstring(s: &str) -> CString {
    match CString::new(s) {
        Ok(cstring) => cstring,
        Err(nul) => {
            let np = nul.nul_position();
            warn!("Truncating string with embedded NUL at position {np}");
            let mut v = nul.into_vec();
            v.truncate(np);
            CString::new(v).unwrap_or_default()
        }
    }
}

/// Converts a file path for the drawing library. Empty and non-UTF-8 paths
/// are rejected before they get there.
pub fn path_to_cstring(path: &Path) -> Result<CString> {
    let s = path
        .to_str()
        .ok_or_else(|| Error::invalid_argument(format!("path {path:?} is not valid UTF-8")))?;
    if s.is_empty() {
        return Err(Error::invalid_argument("empty path"));
    }
    Ok(to_cstring(s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncates_at_nul() {
        assert_eq!(to_cstring("out.png").as_bytes(), b"out.png");
        assert_eq!(to_cstring("out.png\0.txt").as_bytes(), b"out.png");
        assert_eq!(to_cstring("\0").as_bytes(), b"");
    }

    #[test]
    fn test_empty_path() {
        assert!(matches!(
            path_to_cstring(Path::new("")),
            Err(Error::InvalidArgument(_))
        ));
    }
}
