// SPDX-License-Identifier: GPL-3.0-or-later
use super::Matrix;
use crate::{
    vl_matrix_create, vl_matrix_destroy, vl_matrix_invert, vl_matrix_multiply, vl_matrix_rotate,
    vl_matrix_scale, vl_matrix_t, vl_matrix_transform_distance, vl_matrix_transform_point,
    vl_matrix_translate, Error, Foreign, ForeignHandle, Result, VL_STATUS_SUCCESS,
};

pub struct ForeignTransform;

impl Foreign for ForeignTransform {
    type Raw = vl_matrix_t;

    const NAME: &'static str = "transform";
    const LOCK_RANK: u8 = 3;

    unsafe fn destroy(raw: *mut vl_matrix_t) {
        unsafe { vl_matrix_destroy(raw) }
    }
}

/// Affine transformation stored in a library allocation.
pub struct Transform {
    handle: ForeignHandle<ForeignTransform>,
}

impl Transform {
    pub fn new(xx: f64, yx: f64, xy: f64, yy: f64, x0: f64, y0: f64) -> Result<Self> {
        Self::from_matrix(Matrix {
            xx,
            yx,
            xy,
            yy,
            x0,
            y0,
        })
    }

    pub fn identity() -> Result<Self> {
        Self::from_matrix(Matrix::IDENTITY)
    }

    pub fn translation(tx: f64, ty: f64) -> Result<Self> {
        Self::from_raw_matrix(vl_matrix_t::translation(tx, ty))
    }

    pub fn scaling(sx: f64, sy: f64) -> Result<Self> {
        Self::from_raw_matrix(vl_matrix_t::scaling(sx, sy))
    }

    pub fn rotation(radians: f64) -> Result<Self> {
        Self::from_raw_matrix(vl_matrix_t::rotation(radians))
    }

    pub fn from_matrix(matrix: Matrix) -> Result<Self> {
        Self::from_raw_matrix(matrix.into())
    }

    pub(crate) fn from_raw_matrix(matrix: vl_matrix_t) -> Result<Self> {
        let handle = unsafe { ForeignHandle::from_raw(vl_matrix_create())? };
        handle.with_write(|m| unsafe { *m = matrix })?;
        Ok(Self { handle })
    }

    pub(crate) fn handle(&self) -> &ForeignHandle<ForeignTransform> {
        &self.handle
    }

    pub fn matrix(&self) -> Result<Matrix> {
        self.handle.with_read(|m| Matrix::from(unsafe { *m }))
    }

    pub fn set_matrix(&self, matrix: Matrix) -> Result<()> {
        self.handle.with_write(|m| unsafe { *m = matrix.into() })
    }

    /// Translates before the existing transformation.
    pub fn translate(&self, tx: f64, ty: f64) -> Result<()> {
        self.handle
            .with_write(|m| unsafe { vl_matrix_translate(m, tx, ty) })
    }

    /// Scales before the existing transformation.
    pub fn scale(&self, sx: f64, sy: f64) -> Result<()> {
        self.handle
            .with_write(|m| unsafe { vl_matrix_scale(m, sx, sy) })
    }

    /// Rotates before the existing transformation.
    pub fn rotate(&self, radians: f64) -> Result<()> {
        self.handle
            .with_write(|m| unsafe { vl_matrix_rotate(m, radians) })
    }

    /// New transformation that applies `self` first, then `other`.
    pub fn multiply(&self, other: &Transform) -> Result<Transform> {
        let product = self.handle.with_read_pair(&other.handle, |a, b| {
            let mut product = vl_matrix_t::IDENTITY;
            unsafe { vl_matrix_multiply(&mut product, a, b) };
            product
        })?;
        Self::from_raw_matrix(product)
    }

    /// Replaces `self` with the transformation that applies `self` first,
    /// then `other`. `other` may be `self`.
    pub fn multiply_assign(&self, other: &Transform) -> Result<()> {
        self.handle
            .with_write_and_read(&other.handle, |a, b| unsafe { vl_matrix_multiply(a, a, b) })
    }

    /// Inverts in place. A singular matrix is left as it was.
    pub fn invert(&self) -> Result<()> {
        let status = self.handle.with_write(|m| unsafe { vl_matrix_invert(m) })?;
        if status == VL_STATUS_SUCCESS {
            Ok(())
        } else {
            Err(Error::NotInvertible)
        }
    }

    pub fn inverse(&self) -> Result<Transform> {
        let inverse = self
            .handle
            .with_read(|m| unsafe { (*m).inverse() })?
            .ok_or(Error::NotInvertible)?;
        Self::from_raw_matrix(inverse)
    }

    pub fn transform_point(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        self.handle.with_read(|m| {
            let (mut x, mut y) = (x, y);
            unsafe { vl_matrix_transform_point(m, &mut x, &mut y) };
            (x, y)
        })
    }

    /// Like `transform_point`, but ignores the translation.
    pub fn transform_distance(&self, dx: f64, dy: f64) -> Result<(f64, f64)> {
        self.handle.with_read(|m| {
            let (mut dx, mut dy) = (dx, dy);
            unsafe { vl_matrix_transform_distance(m, &mut dx, &mut dy) };
            (dx, dy)
        })
    }

    pub fn release(&self) {
        self.handle.release();
    }

    pub fn is_released(&self) -> bool {
        self.handle.is_released()
    }
}
