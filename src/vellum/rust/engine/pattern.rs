// SPDX-License-Identifier: GPL-3.0-or-later
use super::{ColorStop, Extend, Filter, PatternKind, Surface, Transform};
use crate::{
    config, vl_matrix_t, vl_pattern_add_color_stop_rgba, vl_pattern_create_for_surface,
    vl_pattern_create_linear, vl_pattern_create_radial, vl_pattern_create_rgba,
    vl_pattern_destroy, vl_pattern_get_color_stop_count, vl_pattern_get_color_stop_rgba,
    vl_pattern_get_extend, vl_pattern_get_filter, vl_pattern_get_linear_points,
    vl_pattern_get_matrix, vl_pattern_get_radial_circles, vl_pattern_get_rgba,
    vl_pattern_get_type, vl_pattern_set_extend, vl_pattern_set_filter, vl_pattern_set_matrix,
    vl_pattern_status, vl_pattern_t, Error, Foreign, ForeignHandle, Liveness, Result, Status,
};
use std::ffi::c_int;
use tracing::warn;

pub struct ForeignPattern;

impl Foreign for ForeignPattern {
    type Raw = vl_pattern_t;

    const NAME: &'static str = "pattern";
    const LOCK_RANK: u8 = 1;

    unsafe fn destroy(raw: *mut vl_pattern_t) {
        unsafe { vl_pattern_destroy(raw) }
    }
}

/// Paint source: a solid color, a gradient or a surface.
pub struct Pattern {
    handle: ForeignHandle<ForeignPattern>,
    kind: PatternKind,
    source: Option<Liveness>,
}

impl Pattern {
    pub fn rgb(red: f64, green: f64, blue: f64) -> Result<Self> {
        Self::rgba(red, green, blue, 1.0)
    }

    /// Solid color. Components are clamped to `0..=1`.
    pub fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Result<Self> {
        Self::adopt(vl_pattern_create_rgba(red, green, blue, alpha), None)
    }

    pub fn linear(x0: f64, y0: f64, x1: f64, y1: f64) -> Result<Self> {
        Self::adopt(vl_pattern_create_linear(x0, y0, x1, y1), None)
    }

    /// Gradient between two circles. Negative radii fail with
    /// `Status::InvalidSize`.
    pub fn radial(cx0: f64, cy0: f64, r0: f64, cx1: f64, cy1: f64, r1: f64) -> Result<Self> {
        Self::adopt(vl_pattern_create_radial(cx0, cy0, r0, cx1, cy1, r1), None)
    }

    /// Pattern sampling from `surface`. The surface wrapper is not owned by
    /// the pattern and should stay open while the pattern is used.
    pub fn for_surface(surface: &Surface) -> Result<Self> {
        let raw = surface
            .handle()
            .with_read(|s| unsafe { vl_pattern_create_for_surface(s) })?;
        Self::adopt(raw, Some(surface.liveness()))
    }

    fn adopt(raw: *mut vl_pattern_t, source: Option<Liveness>) -> Result<Self> {
        let handle =
            unsafe { ForeignHandle::<ForeignPattern>::adopt(raw, |p| vl_pattern_status(p))? };
        let kind = handle.with_read(|p| PatternKind::from_raw(unsafe { vl_pattern_get_type(p) }))?;
        Ok(Self {
            handle,
            kind,
            source,
        })
    }

    pub(crate) fn handle(&self) -> &ForeignHandle<ForeignPattern> {
        &self.handle
    }

    pub fn kind(&self) -> PatternKind {
        self.kind
    }

    pub fn status(&self) -> Result<()> {
        Status::check(self.handle.with_read(|p| unsafe { vl_pattern_status(p) })?)
    }

    /// Whether the surface this pattern samples from has been released by its
    /// wrapper. Always false for other kinds of patterns.
    pub fn source_released(&self) -> bool {
        self.source.as_ref().map_or(false, Liveness::is_released)
    }

    pub(crate) fn check_source(&self) {
        if self.source_released() && config().liveness_checks {
            warn!("Using a surface pattern whose surface has been released");
        }
    }

    fn require_gradient(&self) -> Result<()> {
        if self.kind.is_gradient() {
            Ok(())
        } else {
            Err(Error::Status(Status::PatternTypeMismatch))
        }
    }

    pub fn add_color_stop_rgb(&self, offset: f64, red: f64, green: f64, blue: f64) -> Result<()> {
        self.add_color_stop_rgba(offset, red, green, blue, 1.0)
    }

    /// Appends a color stop. Stops keep the order they were added in, also
    /// when several share an offset.
    pub fn add_color_stop_rgba(
        &self,
        offset: f64,
        red: f64,
        green: f64,
        blue: f64,
        alpha: f64,
    ) -> Result<()> {
        self.require_gradient()?;
        let status = self.handle.with_write(|p| unsafe {
            vl_pattern_add_color_stop_rgba(p, offset, red, green, blue, alpha);
            vl_pattern_status(p)
        })?;
        Status::check(status)
    }

    pub fn color_stop_count(&self) -> Result<usize> {
        self.require_gradient()?;
        let (status, count) = self.handle.with_read(|p| {
            let mut count: c_int = 0;
            let status = unsafe { vl_pattern_get_color_stop_count(p, &mut count) };
            (status, count)
        })?;
        Status::check(status)?;
        Ok(count as usize)
    }

    pub fn color_stop_rgba(&self, index: usize) -> Result<ColorStop> {
        self.require_gradient()?;
        self.handle.with_read(|p| {
            let mut count: c_int = 0;
            Status::check(unsafe { vl_pattern_get_color_stop_count(p, &mut count) })?;
            if index >= count as usize {
                return Err(Error::invalid_argument(format!(
                    "color stop index {index} out of range for {count} stops"
                )));
            }
            let mut stop = ColorStop {
                offset: 0.0,
                red: 0.0,
                green: 0.0,
                blue: 0.0,
                alpha: 0.0,
            };
            Status::check(unsafe {
                vl_pattern_get_color_stop_rgba(
                    p,
                    index as c_int,
                    &mut stop.offset,
                    &mut stop.red,
                    &mut stop.green,
                    &mut stop.blue,
                    &mut stop.alpha,
                )
            })?;
            Ok(stop)
        })?
    }

    /// Color of a solid pattern, not premultiplied.
    pub fn solid_rgba(&self) -> Result<(f64, f64, f64, f64)> {
        let (status, rgba) = self.handle.with_read(|p| {
            let (mut r, mut g, mut b, mut a) = (0.0, 0.0, 0.0, 0.0);
            let status = unsafe { vl_pattern_get_rgba(p, &mut r, &mut g, &mut b, &mut a) };
            (status, (r, g, b, a))
        })?;
        Status::check(status)?;
        Ok(rgba)
    }

    /// Start and end point of a linear gradient.
    pub fn linear_points(&self) -> Result<((f64, f64), (f64, f64))> {
        let (status, points) = self.handle.with_read(|p| {
            let (mut x0, mut y0, mut x1, mut y1) = (0.0, 0.0, 0.0, 0.0);
            let status =
                unsafe { vl_pattern_get_linear_points(p, &mut x0, &mut y0, &mut x1, &mut y1) };
            (status, ((x0, y0), (x1, y1)))
        })?;
        Status::check(status)?;
        Ok(points)
    }

    /// Start and end circle of a radial gradient, each as `(cx, cy, r)`.
    pub fn radial_circles(&self) -> Result<((f64, f64, f64), (f64, f64, f64))> {
        let (status, circles) = self.handle.with_read(|p| {
            let mut c = [0.0; 6];
            let [cx0, cy0, r0, cx1, cy1, r1] = &mut c;
            let status = unsafe { vl_pattern_get_radial_circles(p, cx0, cy0, r0, cx1, cy1, r1) };
            (status, ((c[0], c[1], c[2]), (c[3], c[4], c[5])))
        })?;
        Status::check(status)?;
        Ok(circles)
    }

    /// Sets the user space to pattern space matrix. A singular matrix fails
    /// with `Status::InvalidMatrix` and leaves the pattern unchanged.
    pub fn set_matrix(&self, transform: &Transform) -> Result<()> {
        let status = self
            .handle
            .with_write_and_read(transform.handle(), |p, m| unsafe {
                vl_pattern_set_matrix(p, m)
            })?;
        Status::check(status)
    }

    pub fn matrix(&self) -> Result<Transform> {
        let matrix = self.handle.with_read(|p| {
            let mut matrix = vl_matrix_t::IDENTITY;
            unsafe { vl_pattern_get_matrix(p, &mut matrix) };
            matrix
        })?;
        Transform::from_raw_matrix(matrix)
    }

    pub fn set_extend(&self, extend: Extend) -> Result<()> {
        self.handle
            .with_write(|p| unsafe { vl_pattern_set_extend(p, extend.into()) })
    }

    pub fn extend(&self) -> Result<Extend> {
        self.handle
            .with_read(|p| Extend::from_raw(unsafe { vl_pattern_get_extend(p) }))
    }

    pub fn set_filter(&self, filter: Filter) -> Result<()> {
        self.handle
            .with_write(|p| unsafe { vl_pattern_set_filter(p, filter.into()) })
    }

    pub fn filter(&self) -> Result<Filter> {
        self.handle
            .with_read(|p| Filter::from_raw(unsafe { vl_pattern_get_filter(p) }))
    }

    pub fn release(&self) {
        self.handle.release();
    }

    pub fn is_released(&self) -> bool {
        self.handle.is_released()
    }
}
