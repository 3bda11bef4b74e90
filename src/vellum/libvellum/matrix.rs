// SPDX-License-Identifier: GPL-3.0-or-later
use crate::{vl_status_t, VL_STATUS_INVALID_MATRIX, VL_STATUS_NULL_POINTER, VL_STATUS_SUCCESS};

/// Affine transformation. A point `(x, y)` maps to
/// `(xx * x + xy * y + x0, yx * x + yy * y + y0)`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct vl_matrix_t {
    pub xx: f64,
    pub yx: f64,
    pub xy: f64,
    pub yy: f64,
    pub x0: f64,
    pub y0: f64,
}

impl Default for vl_matrix_t {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl vl_matrix_t {
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    pub const fn new(xx: f64, yx: f64, xy: f64, yy: f64, x0: f64, y0: f64) -> Self {
        Self {
            xx,
            yx,
            xy,
            yy,
            x0,
            y0,
        }
    }

    pub const fn translation(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    pub const fn scaling(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    pub fn rotation(radians: f64) -> Self {
        let (s, c) = radians.sin_cos();
        Self::new(c, s, -s, c, 0.0, 0.0)
    }

    /// Product that applies `a` first, then `b`.
    pub fn multiply(a: &Self, b: &Self) -> Self {
        Self {
            xx: a.xx * b.xx + a.yx * b.xy,
            yx: a.xx * b.yx + a.yx * b.yy,
            xy: a.xy * b.xx + a.yy * b.xy,
            yy: a.xy * b.yx + a.yy * b.yy,
            x0: a.x0 * b.xx + a.y0 * b.xy + b.x0,
            y0: a.x0 * b.yx + a.y0 * b.yy + b.y0,
        }
    }

    pub fn determinant(&self) -> f64 {
        self.xx * self.yy - self.yx * self.xy
    }

    pub fn is_invertible(&self) -> bool {
        let det = self.determinant();
        det != 0.0 && det.is_finite()
    }

    pub fn inverse(&self) -> Option<Self> {
        if !self.is_invertible() {
            return None;
        }
        let det = self.determinant();
        Some(Self {
            xx: self.yy / det,
            yx: -self.yx / det,
            xy: -self.xy / det,
            yy: self.xx / det,
            x0: (self.xy * self.y0 - self.yy * self.x0) / det,
            y0: (self.yx * self.x0 - self.xx * self.y0) / det,
        })
    }

    pub fn transform_distance(&self, dx: f64, dy: f64) -> (f64, f64) {
        (self.xx * dx + self.xy * dy, self.yx * dx + self.yy * dy)
    }

    pub fn transform_point(&self, x: f64, y: f64) -> (f64, f64) {
        let (dx, dy) = self.transform_distance(x, y);
        (dx + self.x0, dy + self.y0)
    }

    /// Average scale factor, used to turn user-space lengths into device
    /// lengths.
    pub(crate) fn scale_factor(&self) -> f64 {
        self.determinant().abs().sqrt()
    }
}

/// Allocates an identity matrix. Returns null on allocation failure.
#[no_mangle]
pub extern "C" fn vl_matrix_create() -> *mut vl_matrix_t {
    Box::into_raw(Box::new(vl_matrix_t::IDENTITY))
}

#[no_mangle]
pub unsafe extern "C" fn vl_matrix_destroy(matrix: *mut vl_matrix_t) {
    if !matrix.is_null() {
        drop(unsafe { Box::from_raw(matrix) });
    }
}

#[no_mangle]
pub unsafe extern "C" fn vl_matrix_init(
    matrix: *mut vl_matrix_t,
    xx: f64,
    yx: f64,
    xy: f64,
    yy: f64,
    x0: f64,
    y0: f64,
) {
    if let Some(m) = unsafe { matrix.as_mut() } {
        *m = vl_matrix_t::new(xx, yx, xy, yy, x0, y0);
    }
}

#[no_mangle]
pub unsafe extern "C" fn vl_matrix_init_identity(matrix: *mut vl_matrix_t) {
    if let Some(m) = unsafe { matrix.as_mut() } {
        *m = vl_matrix_t::IDENTITY;
    }
}

#[no_mangle]
pub unsafe extern "C" fn vl_matrix_init_translate(matrix: *mut vl_matrix_t, tx: f64, ty: f64) {
    if let Some(m) = unsafe { matrix.as_mut() } {
        *m = vl_matrix_t::translation(tx, ty);
    }
}

#[no_mangle]
pub unsafe extern "C" fn vl_matrix_init_scale(matrix: *mut vl_matrix_t, sx: f64, sy: f64) {
    if let Some(m) = unsafe { matrix.as_mut() } {
        *m = vl_matrix_t::scaling(sx, sy);
    }
}

#[no_mangle]
pub unsafe extern "C" fn vl_matrix_init_rotate(matrix: *mut vl_matrix_t, radians: f64) {
    if let Some(m) = unsafe { matrix.as_mut() } {
        *m = vl_matrix_t::rotation(radians);
    }
}

/// Sets `result` to the transformation that applies `a` first, then `b`.
/// `result` may alias either operand.
#[no_mangle]
pub unsafe extern "C" fn vl_matrix_multiply(
    result: *mut vl_matrix_t,
    a: *const vl_matrix_t,
    b: *const vl_matrix_t,
) {
    let (a, b) = match unsafe { (a.as_ref(), b.as_ref()) } {
        (Some(a), Some(b)) => (*a, *b),
        _ => return,
    };
    if let Some(r) = unsafe { result.as_mut() } {
        *r = vl_matrix_t::multiply(&a, &b);
    }
}

/// Applies a translation before the existing transformation.
#[no_mangle]
pub unsafe extern "C" fn vl_matrix_translate(matrix: *mut vl_matrix_t, tx: f64, ty: f64) {
    if let Some(m) = unsafe { matrix.as_mut() } {
        *m = vl_matrix_t::multiply(&vl_matrix_t::translation(tx, ty), m);
    }
}

/// Applies a scale before the existing transformation.
#[no_mangle]
pub unsafe extern "C" fn vl_matrix_scale(matrix: *mut vl_matrix_t, sx: f64, sy: f64) {
    if let Some(m) = unsafe { matrix.as_mut() } {
        *m = vl_matrix_t::multiply(&vl_matrix_t::scaling(sx, sy), m);
    }
}

/// Applies a rotation before the existing transformation.
#[no_mangle]
pub unsafe extern "C" fn vl_matrix_rotate(matrix: *mut vl_matrix_t, radians: f64) {
    if let Some(m) = unsafe { matrix.as_mut() } {
        *m = vl_matrix_t::multiply(&vl_matrix_t::rotation(radians), m);
    }
}

/// Inverts in place. A singular matrix is left unchanged and
/// `VL_STATUS_INVALID_MATRIX` is returned.
#[no_mangle]
pub unsafe extern "C" fn vl_matrix_invert(matrix: *mut vl_matrix_t) -> vl_status_t {
    let Some(m) = (unsafe { matrix.as_mut() }) else {
        return VL_STATUS_NULL_POINTER;
    };
    match m.inverse() {
        Some(inverse) => {
            *m = inverse;
            VL_STATUS_SUCCESS
        }
        None => VL_STATUS_INVALID_MATRIX,
    }
}

#[no_mangle]
pub unsafe extern "C" fn vl_matrix_transform_point(
    matrix: *const vl_matrix_t,
    x: *mut f64,
    y: *mut f64,
) {
    if let (Some(m), Some(x), Some(y)) = unsafe { (matrix.as_ref(), x.as_mut(), y.as_mut()) } {
        (*x, *y) = m.transform_point(*x, *y);
    }
}

#[no_mangle]
pub unsafe extern "C" fn vl_matrix_transform_distance(
    matrix: *const vl_matrix_t,
    dx: *mut f64,
    dy: *mut f64,
) {
    if let (Some(m), Some(dx), Some(dy)) = unsafe { (matrix.as_ref(), dx.as_mut(), dy.as_mut()) }
    {
        (*dx, *dy) = m.transform_distance(*dx, *dy);
    }
}
