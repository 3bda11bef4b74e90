// SPDX-License-Identifier: GPL-3.0-or-later
use crate::{
    vl_extend_t, vl_fill_rule_t, vl_filter_t, vl_format_t, vl_line_cap_t, vl_line_join_t,
    vl_matrix_t, vl_pattern_type_t, VL_EXTEND_NONE, VL_EXTEND_PAD, VL_EXTEND_REFLECT,
    VL_EXTEND_REPEAT, VL_FILL_RULE_EVEN_ODD, VL_FILL_RULE_WINDING, VL_FILTER_BEST,
    VL_FILTER_BILINEAR, VL_FILTER_FAST, VL_FILTER_GOOD, VL_FILTER_NEAREST, VL_FORMAT_A8,
    VL_FORMAT_ARGB32, VL_FORMAT_RGB24, VL_LINE_CAP_BUTT, VL_LINE_CAP_ROUND, VL_LINE_CAP_SQUARE,
    VL_LINE_JOIN_BEVEL, VL_LINE_JOIN_MITER, VL_LINE_JOIN_ROUND, VL_PATTERN_TYPE_LINEAR,
    VL_PATTERN_TYPE_RADIAL, VL_PATTERN_TYPE_SOLID, VL_PATTERN_TYPE_SURFACE,
};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::{fmt::Display, str::FromStr};

/// Pixel format of an image surface. Color channels are premultiplied.
#[derive(Copy, Clone, Eq, PartialEq, Debug, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
pub enum Format {
    Argb32 = VL_FORMAT_ARGB32,
    Rgb24 = VL_FORMAT_RGB24,
    A8 = VL_FORMAT_A8,
}

impl Format {
    pub fn to_raw(self) -> vl_format_t {
        self.into()
    }
}

impl Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Argb32 => "argb32",
                Self::Rgb24 => "rgb24",
                Self::A8 => "a8",
            }
        )
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "argb32" => Ok(Self::Argb32),
            "rgb24" => Ok(Self::Rgb24),
            "a8" => Ok(Self::A8),
            _ => Err(format!(
                "invalid format '{s}', should be one of 'argb32', 'rgb24' or 'a8'"
            )),
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
pub enum PatternKind {
    Solid = VL_PATTERN_TYPE_SOLID,
    Surface = VL_PATTERN_TYPE_SURFACE,
    Linear = VL_PATTERN_TYPE_LINEAR,
    Radial = VL_PATTERN_TYPE_RADIAL,
}

impl PatternKind {
    pub(crate) fn from_raw(raw: vl_pattern_type_t) -> Self {
        Self::try_from(raw).unwrap_or(Self::Solid)
    }

    pub fn is_gradient(self) -> bool {
        matches!(self, Self::Linear | Self::Radial)
    }
}

/// How a pattern is sampled outside its natural area.
#[derive(Copy, Clone, Eq, PartialEq, Debug, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
pub enum Extend {
    None = VL_EXTEND_NONE,
    Repeat = VL_EXTEND_REPEAT,
    Reflect = VL_EXTEND_REFLECT,
    Pad = VL_EXTEND_PAD,
}

impl Extend {
    pub(crate) fn from_raw(raw: vl_extend_t) -> Self {
        Self::try_from(raw).unwrap_or(Self::None)
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
pub enum Filter {
    Fast = VL_FILTER_FAST,
    Good = VL_FILTER_GOOD,
    Best = VL_FILTER_BEST,
    Nearest = VL_FILTER_NEAREST,
    Bilinear = VL_FILTER_BILINEAR,
}

impl Filter {
    pub(crate) fn from_raw(raw: vl_filter_t) -> Self {
        Self::try_from(raw).unwrap_or(Self::Good)
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
pub enum LineCap {
    Butt = VL_LINE_CAP_BUTT,
    Round = VL_LINE_CAP_ROUND,
    Square = VL_LINE_CAP_SQUARE,
}

impl LineCap {
    pub(crate) fn from_raw(raw: vl_line_cap_t) -> Self {
        Self::try_from(raw).unwrap_or(Self::Butt)
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
pub enum LineJoin {
    Miter = VL_LINE_JOIN_MITER,
    Round = VL_LINE_JOIN_ROUND,
    Bevel = VL_LINE_JOIN_BEVEL,
}

impl LineJoin {
    pub(crate) fn from_raw(raw: vl_line_join_t) -> Self {
        Self::try_from(raw).unwrap_or(Self::Miter)
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
pub enum FillRule {
    Winding = VL_FILL_RULE_WINDING,
    EvenOdd = VL_FILL_RULE_EVEN_ODD,
}

impl FillRule {
    pub(crate) fn from_raw(raw: vl_fill_rule_t) -> Self {
        Self::try_from(raw).unwrap_or(Self::Winding)
    }
}

/// Affine matrix coefficients. A point `(x, y)` maps to
/// `(xx * x + xy * y + x0, yx * x + yy * y + y0)`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Matrix {
    pub xx: f64,
    pub yx: f64,
    pub xy: f64,
    pub yy: f64,
    pub x0: f64,
    pub y0: f64,
}

impl Matrix {
    pub const IDENTITY: Self = Self {
        xx: 1.0,
        yx: 0.0,
        xy: 0.0,
        yy: 1.0,
        x0: 0.0,
        y0: 0.0,
    };
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<vl_matrix_t> for Matrix {
    fn from(m: vl_matrix_t) -> Self {
        Self {
            xx: m.xx,
            yx: m.yx,
            xy: m.xy,
            yy: m.yy,
            x0: m.x0,
            y0: m.y0,
        }
    }
}

impl From<Matrix> for vl_matrix_t {
    fn from(m: Matrix) -> Self {
        vl_matrix_t::new(m.xx, m.yx, m.xy, m.yy, m.x0, m.y0)
    }
}

/// Gradient color stop as stored, not premultiplied.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ColorStop {
    pub offset: f64,
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_round_trips_through_str() {
        for format in [Format::Argb32, Format::Rgb24, Format::A8] {
            assert_eq!(format.to_string().parse::<Format>(), Ok(format));
        }
        assert!("bgra".parse::<Format>().is_err());
    }

    #[test]
    fn test_unknown_raw_values_fall_back() {
        assert_eq!(LineCap::from_raw(42), LineCap::Butt);
        assert_eq!(Extend::from_raw(-1), Extend::None);
        assert_eq!(
            PatternKind::from_raw(VL_PATTERN_TYPE_RADIAL),
            PatternKind::Radial
        );
    }
}
