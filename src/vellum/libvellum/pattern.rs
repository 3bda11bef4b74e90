// SPDX-License-Identifier: GPL-3.0-or-later
use crate::{
    surface::{Rgba, SurfaceRef},
    vl_extend_t, vl_filter_t, vl_matrix_t, vl_pattern_type_t, vl_status_t, vl_surface_t,
    VL_EXTEND_NONE, VL_EXTEND_PAD, VL_FILTER_GOOD, VL_PATTERN_TYPE_LINEAR,
    VL_PATTERN_TYPE_RADIAL, VL_PATTERN_TYPE_SOLID, VL_PATTERN_TYPE_SURFACE,
    VL_STATUS_INVALID_INDEX, VL_STATUS_INVALID_MATRIX, VL_STATUS_INVALID_SIZE,
    VL_STATUS_NULL_POINTER, VL_STATUS_PATTERN_TYPE_MISMATCH, VL_STATUS_SUCCESS,
};
use std::{
    ffi::{c_int, c_uint},
    sync::atomic::{AtomicUsize, Ordering},
};

/// Gradient color stop. The color is not premultiplied.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct ColorStop {
    pub offset: f64,
    pub color: Rgba,
}

#[derive(Clone)]
pub(crate) enum Paint {
    /// Not premultiplied.
    Solid(Rgba),
    Surface(SurfaceRef),
    Linear {
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        stops: Vec<ColorStop>,
    },
    Radial {
        cx0: f64,
        cy0: f64,
        r0: f64,
        cx1: f64,
        cy1: f64,
        r1: f64,
        stops: Vec<ColorStop>,
    },
}

impl Paint {
    pub(crate) fn pattern_type(&self) -> vl_pattern_type_t {
        match self {
            Self::Solid(_) => VL_PATTERN_TYPE_SOLID,
            Self::Surface(_) => VL_PATTERN_TYPE_SURFACE,
            Self::Linear { .. } => VL_PATTERN_TYPE_LINEAR,
            Self::Radial { .. } => VL_PATTERN_TYPE_RADIAL,
        }
    }

    fn stops(&self) -> Option<&Vec<ColorStop>> {
        match self {
            Self::Linear { stops, .. } | Self::Radial { stops, .. } => Some(stops),
            _ => None,
        }
    }

    fn stops_mut(&mut self) -> Option<&mut Vec<ColorStop>> {
        match self {
            Self::Linear { stops, .. } | Self::Radial { stops, .. } => Some(stops),
            _ => None,
        }
    }
}

pub struct vl_pattern_t {
    refcount: AtomicUsize,
    status: vl_status_t,
    pub(crate) paint: Paint,
    pub(crate) matrix: vl_matrix_t,
    pub(crate) extend: vl_extend_t,
    pub(crate) filter: vl_filter_t,
}

impl vl_pattern_t {
    fn create(paint: Paint) -> *mut Self {
        let extend = match paint {
            Paint::Surface(_) => VL_EXTEND_NONE,
            _ => VL_EXTEND_PAD,
        };
        Box::into_raw(Box::new(Self {
            refcount: AtomicUsize::new(1),
            status: VL_STATUS_SUCCESS,
            paint,
            matrix: vl_matrix_t::IDENTITY,
            extend,
            filter: VL_FILTER_GOOD,
        }))
    }

    fn new_error(status: vl_status_t) -> *mut Self {
        let pattern = Self::create(Paint::Solid([0.0, 0.0, 0.0, 1.0]));
        unsafe { (*pattern).status = status };
        pattern
    }

    pub(crate) fn status(&self) -> vl_status_t {
        self.status
    }

    fn set_error(&mut self, status: vl_status_t) {
        if self.status == VL_STATUS_SUCCESS {
            self.status = status;
        }
    }
}

fn clamp_color(r: f64, g: f64, b: f64, a: f64) -> Rgba {
    [
        r.clamp(0.0, 1.0),
        g.clamp(0.0, 1.0),
        b.clamp(0.0, 1.0),
        a.clamp(0.0, 1.0),
    ]
}

#[no_mangle]
pub extern "C" fn vl_pattern_create_rgb(red: f64, green: f64, blue: f64) -> *mut vl_pattern_t {
    vl_pattern_create_rgba(red, green, blue, 1.0)
}

#[no_mangle]
pub extern "C" fn vl_pattern_create_rgba(
    red: f64,
    green: f64,
    blue: f64,
    alpha: f64,
) -> *mut vl_pattern_t {
    vl_pattern_t::create(Paint::Solid(clamp_color(red, green, blue, alpha)))
}

/// Creates a linear gradient along the line from `(x0, y0)` to `(x1, y1)`.
#[no_mangle]
pub extern "C" fn vl_pattern_create_linear(
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
) -> *mut vl_pattern_t {
    vl_pattern_t::create(Paint::Linear {
        x0,
        y0,
        x1,
        y1,
        stops: Vec::new(),
    })
}

/// Creates a radial gradient between two circles. Radii must not be negative.
#[no_mangle]
pub extern "C" fn vl_pattern_create_radial(
    cx0: f64,
    cy0: f64,
    radius0: f64,
    cx1: f64,
    cy1: f64,
    radius1: f64,
) -> *mut vl_pattern_t {
    if radius0 < 0.0 || radius1 < 0.0 {
        return vl_pattern_t::new_error(VL_STATUS_INVALID_SIZE);
    }
    vl_pattern_t::create(Paint::Radial {
        cx0,
        cy0,
        r0: radius0,
        cx1,
        cy1,
        r1: radius1,
        stops: Vec::new(),
    })
}

/// Creates a pattern that samples from `surface`. The pattern takes its own
/// reference to the surface.
#[no_mangle]
pub unsafe extern "C" fn vl_pattern_create_for_surface(
    surface: *mut vl_surface_t,
) -> *mut vl_pattern_t {
    let Some(surface) = (unsafe { SurfaceRef::new_inc(surface) }) else {
        return vl_pattern_t::new_error(VL_STATUS_NULL_POINTER);
    };
    let status = surface.status();
    if status != VL_STATUS_SUCCESS {
        return vl_pattern_t::new_error(status);
    }
    vl_pattern_t::create(Paint::Surface(surface))
}

#[no_mangle]
pub unsafe extern "C" fn vl_pattern_reference(pattern: *mut vl_pattern_t) -> *mut vl_pattern_t {
    if let Some(p) = unsafe { pattern.as_ref() } {
        p.refcount.fetch_add(1, Ordering::Relaxed);
    }
    pattern
}

#[no_mangle]
pub unsafe extern "C" fn vl_pattern_destroy(pattern: *mut vl_pattern_t) {
    let Some(p) = (unsafe { pattern.as_ref() }) else {
        return;
    };
    if p.refcount.fetch_sub(1, Ordering::AcqRel) == 1 {
        drop(unsafe { Box::from_raw(pattern) });
    }
}

#[no_mangle]
pub unsafe extern "C" fn vl_pattern_get_reference_count(pattern: *mut vl_pattern_t) -> c_uint {
    unsafe { pattern.as_ref() }.map_or(0, |p| p.refcount.load(Ordering::Acquire) as c_uint)
}

#[no_mangle]
pub unsafe extern "C" fn vl_pattern_status(pattern: *mut vl_pattern_t) -> vl_status_t {
    unsafe { pattern.as_ref() }.map_or(VL_STATUS_NULL_POINTER, vl_pattern_t::status)
}

#[no_mangle]
pub unsafe extern "C" fn vl_pattern_get_type(pattern: *mut vl_pattern_t) -> vl_pattern_type_t {
    unsafe { pattern.as_ref() }.map_or(VL_PATTERN_TYPE_SOLID, |p| p.paint.pattern_type())
}

#[no_mangle]
pub unsafe extern "C" fn vl_pattern_add_color_stop_rgb(
    pattern: *mut vl_pattern_t,
    offset: f64,
    red: f64,
    green: f64,
    blue: f64,
) {
    unsafe { vl_pattern_add_color_stop_rgba(pattern, offset, red, green, blue, 1.0) }
}

/// Appends a color stop. Stops keep their insertion order; offsets are
/// clamped to `[0, 1]`. On a non-gradient pattern this puts the pattern into
/// the `VL_STATUS_PATTERN_TYPE_MISMATCH` error state.
#[no_mangle]
pub unsafe extern "C" fn vl_pattern_add_color_stop_rgba(
    pattern: *mut vl_pattern_t,
    offset: f64,
    red: f64,
    green: f64,
    blue: f64,
    alpha: f64,
) {
    let Some(p) = (unsafe { pattern.as_mut() }) else {
        return;
    };
    if p.status != VL_STATUS_SUCCESS {
        return;
    }
    match p.paint.stops_mut() {
        Some(stops) => stops.push(ColorStop {
            offset: offset.clamp(0.0, 1.0),
            color: clamp_color(red, green, blue, alpha),
        }),
        None => p.set_error(VL_STATUS_PATTERN_TYPE_MISMATCH),
    }
}

#[no_mangle]
pub unsafe extern "C" fn vl_pattern_get_color_stop_count(
    pattern: *mut vl_pattern_t,
    count: *mut c_int,
) -> vl_status_t {
    let Some(p) = (unsafe { pattern.as_ref() }) else {
        return VL_STATUS_NULL_POINTER;
    };
    match p.paint.stops() {
        Some(stops) => {
            if let Some(count) = unsafe { count.as_mut() } {
                *count = stops.len() as c_int;
            }
            VL_STATUS_SUCCESS
        }
        None => VL_STATUS_PATTERN_TYPE_MISMATCH,
    }
}

/// Reads the stop at `index` in insertion order. Any out parameter may be
/// null.
#[no_mangle]
pub unsafe extern "C" fn vl_pattern_get_color_stop_rgba(
    pattern: *mut vl_pattern_t,
    index: c_int,
    offset: *mut f64,
    red: *mut f64,
    green: *mut f64,
    blue: *mut f64,
    alpha: *mut f64,
) -> vl_status_t {
    let Some(p) = (unsafe { pattern.as_ref() }) else {
        return VL_STATUS_NULL_POINTER;
    };
    let Some(stops) = p.paint.stops() else {
        return VL_STATUS_PATTERN_TYPE_MISMATCH;
    };
    let Some(stop) = usize::try_from(index).ok().and_then(|i| stops.get(i)) else {
        return VL_STATUS_INVALID_INDEX;
    };
    unsafe {
        write_out(offset, stop.offset);
        write_out(red, stop.color[0]);
        write_out(green, stop.color[1]);
        write_out(blue, stop.color[2]);
        write_out(alpha, stop.color[3]);
    }
    VL_STATUS_SUCCESS
}

#[no_mangle]
pub unsafe extern "C" fn vl_pattern_get_rgba(
    pattern: *mut vl_pattern_t,
    red: *mut f64,
    green: *mut f64,
    blue: *mut f64,
    alpha: *mut f64,
) -> vl_status_t {
    let Some(p) = (unsafe { pattern.as_ref() }) else {
        return VL_STATUS_NULL_POINTER;
    };
    let Paint::Solid([r, g, b, a]) = p.paint else {
        return VL_STATUS_PATTERN_TYPE_MISMATCH;
    };
    unsafe {
        write_out(red, r);
        write_out(green, g);
        write_out(blue, b);
        write_out(alpha, a);
    }
    VL_STATUS_SUCCESS
}

#[no_mangle]
pub unsafe extern "C" fn vl_pattern_get_linear_points(
    pattern: *mut vl_pattern_t,
    x0: *mut f64,
    y0: *mut f64,
    x1: *mut f64,
    y1: *mut f64,
) -> vl_status_t {
    let Some(p) = (unsafe { pattern.as_ref() }) else {
        return VL_STATUS_NULL_POINTER;
    };
    let Paint::Linear {
        x0: lx0,
        y0: ly0,
        x1: lx1,
        y1: ly1,
        ..
    } = p.paint
    else {
        return VL_STATUS_PATTERN_TYPE_MISMATCH;
    };
    unsafe {
        write_out(x0, lx0);
        write_out(y0, ly0);
        write_out(x1, lx1);
        write_out(y1, ly1);
    }
    VL_STATUS_SUCCESS
}

#[no_mangle]
pub unsafe extern "C" fn vl_pattern_get_radial_circles(
    pattern: *mut vl_pattern_t,
    cx0: *mut f64,
    cy0: *mut f64,
    r0: *mut f64,
    cx1: *mut f64,
    cy1: *mut f64,
    r1: *mut f64,
) -> vl_status_t {
    let Some(p) = (unsafe { pattern.as_ref() }) else {
        return VL_STATUS_NULL_POINTER;
    };
    let Paint::Radial {
        cx0: rcx0,
        cy0: rcy0,
        r0: rr0,
        cx1: rcx1,
        cy1: rcy1,
        r1: rr1,
        ..
    } = p.paint
    else {
        return VL_STATUS_PATTERN_TYPE_MISMATCH;
    };
    unsafe {
        write_out(cx0, rcx0);
        write_out(cy0, rcy0);
        write_out(r0, rr0);
        write_out(cx1, rcx1);
        write_out(cy1, rcy1);
        write_out(r1, rr1);
    }
    VL_STATUS_SUCCESS
}

/// Sets the user-space to pattern-space matrix. A singular matrix is
/// rejected with `VL_STATUS_INVALID_MATRIX` and leaves the pattern unchanged.
#[no_mangle]
pub unsafe extern "C" fn vl_pattern_set_matrix(
    pattern: *mut vl_pattern_t,
    matrix: *const vl_matrix_t,
) -> vl_status_t {
    let (Some(p), Some(m)) = (unsafe { pattern.as_mut() }, unsafe { matrix.as_ref() }) else {
        return VL_STATUS_NULL_POINTER;
    };
    if !m.is_invertible() {
        return VL_STATUS_INVALID_MATRIX;
    }
    p.matrix = *m;
    VL_STATUS_SUCCESS
}

#[no_mangle]
pub unsafe extern "C" fn vl_pattern_get_matrix(
    pattern: *mut vl_pattern_t,
    matrix: *mut vl_matrix_t,
) {
    if let (Some(p), Some(m)) = (unsafe { pattern.as_ref() }, unsafe { matrix.as_mut() }) {
        *m = p.matrix;
    }
}

#[no_mangle]
pub unsafe extern "C" fn vl_pattern_set_extend(pattern: *mut vl_pattern_t, extend: vl_extend_t) {
    if let Some(p) = unsafe { pattern.as_mut() } {
        p.extend = extend;
    }
}

#[no_mangle]
pub unsafe extern "C" fn vl_pattern_get_extend(pattern: *mut vl_pattern_t) -> vl_extend_t {
    unsafe { pattern.as_ref() }.map_or(VL_EXTEND_NONE, |p| p.extend)
}

#[no_mangle]
pub unsafe extern "C" fn vl_pattern_set_filter(pattern: *mut vl_pattern_t, filter: vl_filter_t) {
    if let Some(p) = unsafe { pattern.as_mut() } {
        p.filter = filter;
    }
}

#[no_mangle]
pub unsafe extern "C" fn vl_pattern_get_filter(pattern: *mut vl_pattern_t) -> vl_filter_t {
    unsafe { pattern.as_ref() }.map_or(VL_FILTER_GOOD, |p| p.filter)
}

unsafe fn write_out(dst: *mut f64, value: f64) {
    if let Some(dst) = unsafe { dst.as_mut() } {
        *dst = value;
    }
}
