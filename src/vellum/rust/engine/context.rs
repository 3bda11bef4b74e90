// SPDX-License-Identifier: GPL-3.0-or-later
use super::{FillRule, LineCap, LineJoin, Pattern, Surface, Transform};
use crate::{
    config, vl_arc, vl_arc_negative, vl_close_path, vl_create, vl_curve_to, vl_destroy,
    vl_device_to_user, vl_fill, vl_fill_preserve, vl_get_current_point, vl_get_fill_rule,
    vl_get_line_cap, vl_get_line_join, vl_get_line_width, vl_get_matrix, vl_has_current_point,
    vl_identity_matrix, vl_line_to, vl_matrix_t, vl_move_to, vl_new_path, vl_paint,
    vl_paint_with_alpha, vl_rectangle, vl_rel_line_to, vl_rel_move_to, vl_restore, vl_rotate,
    vl_save, vl_scale, vl_set_fill_rule, vl_set_line_cap, vl_set_line_join, vl_set_line_width,
    vl_set_matrix, vl_set_source, vl_set_source_rgba, vl_set_source_surface, vl_status,
    vl_stroke, vl_stroke_preserve, vl_t, vl_transform, vl_translate, vl_user_to_device, Error,
    Foreign, ForeignHandle, Liveness, Result, Status,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{trace, warn};

pub struct ForeignContext;

impl Foreign for ForeignContext {
    type Raw = vl_t;

    const NAME: &'static str = "context";
    const LOCK_RANK: u8 = 0;

    unsafe fn destroy(raw: *mut vl_t) {
        unsafe { vl_destroy(raw) }
    }
}

/// Drawing state bound to one target surface.
///
/// Drawing calls don't return errors. The first failure is kept by the
/// context and reported by `status`, and every drawing call after it does
/// nothing. Drawing through a released context does nothing either.
///
/// The target `Surface` is not owned by the context and should stay open as
/// long as the context draws into it. The library keeps the pixels alive
/// regardless, `target_released` tells whether the wrapper is gone.
pub struct Context {
    handle: ForeignHandle<ForeignContext>,
    target: Liveness,
    save_depth: AtomicUsize,
}

impl Context {
    pub fn new(target: &Surface) -> Result<Self> {
        let raw = target.handle().with_read(|s| unsafe { vl_create(s) })?;
        let handle = unsafe { ForeignHandle::<ForeignContext>::adopt(raw, |cr| vl_status(cr))? };
        Ok(Self {
            handle,
            target: target.liveness(),
            save_depth: AtomicUsize::new(0),
        })
    }

    /// The deferred drawing status. Fails with `Error::NullHandle` after
    /// release.
    pub fn status(&self) -> Result<()> {
        Status::check(self.handle.with_read(|cr| unsafe { vl_status(cr) })?)
    }

    pub fn target_released(&self) -> bool {
        self.target.is_released()
    }

    fn check_target(&self) {
        if config().liveness_checks && self.target.is_released() {
            warn!("Drawing into a context whose target surface has been released");
        }
    }

    fn draw<F>(&self, func: F)
    where
        F: FnOnce(*mut vl_t),
    {
        self.check_target();
        if let Err(err) = self.handle.with_write(func) {
            trace!("Ignoring drawing call: {err}");
        }
    }

    /// A released operand is passed on as null, so the context records
    /// `Status::NullPointer`.
    fn draw_with<O, F>(&self, operand: &ForeignHandle<O>, func: F)
    where
        O: Foreign,
        F: FnOnce(*mut vl_t, *mut O::Raw),
    {
        self.check_target();
        if let Err(err) = self.handle.with_write_and_nullable(operand, func) {
            trace!("Ignoring drawing call: {err}");
        }
    }

    pub fn save(&self) -> Result<()> {
        self.handle.with_write(|cr| {
            unsafe { vl_save(cr) };
            self.save_depth.fetch_add(1, Ordering::Relaxed);
        })
    }

    /// Restores the state from the matching `save`. Without one this fails
    /// with `Error::InvalidArgument` and the context stays usable.
    pub fn restore(&self) -> Result<()> {
        self.handle.with_write(|cr| {
            if self.save_depth.load(Ordering::Relaxed) == 0 {
                return Err(Error::invalid_argument("restore without matching save"));
            }
            unsafe { vl_restore(cr) };
            self.save_depth.fetch_sub(1, Ordering::Relaxed);
            Ok(())
        })?
    }

    pub fn save_depth(&self) -> usize {
        self.save_depth.load(Ordering::Relaxed)
    }

    /// Uses a copy of `pattern` as the source. Changing the pattern later has
    /// no effect on this context.
    pub fn set_source(&self, pattern: &Pattern) {
        pattern.check_source();
        self.draw_with(pattern.handle(), |cr, p| unsafe { vl_set_source(cr, p) })
    }

    pub fn set_source_rgb(&self, red: f64, green: f64, blue: f64) {
        self.set_source_rgba(red, green, blue, 1.0)
    }

    pub fn set_source_rgba(&self, red: f64, green: f64, blue: f64, alpha: f64) {
        self.draw(|cr| unsafe { vl_set_source_rgba(cr, red, green, blue, alpha) })
    }

    /// Uses `surface` as the source with its origin at user space `(x, y)`.
    pub fn set_source_surface(&self, surface: &Surface, x: f64, y: f64) {
        self.draw_with(surface.handle(), |cr, s| unsafe {
            vl_set_source_surface(cr, s, x, y)
        })
    }

    pub fn set_line_width(&self, width: f64) {
        self.draw(|cr| unsafe { vl_set_line_width(cr, width) })
    }

    pub fn line_width(&self) -> Result<f64> {
        self.handle.with_read(|cr| unsafe { vl_get_line_width(cr) })
    }

    pub fn set_line_cap(&self, cap: LineCap) {
        self.draw(|cr| unsafe { vl_set_line_cap(cr, cap.into()) })
    }

    pub fn line_cap(&self) -> Result<LineCap> {
        self.handle
            .with_read(|cr| LineCap::from_raw(unsafe { vl_get_line_cap(cr) }))
    }

    pub fn set_line_join(&self, join: LineJoin) {
        self.draw(|cr| unsafe { vl_set_line_join(cr, join.into()) })
    }

    pub fn line_join(&self) -> Result<LineJoin> {
        self.handle
            .with_read(|cr| LineJoin::from_raw(unsafe { vl_get_line_join(cr) }))
    }

    pub fn set_fill_rule(&self, fill_rule: FillRule) {
        self.draw(|cr| unsafe { vl_set_fill_rule(cr, fill_rule.into()) })
    }

    pub fn fill_rule(&self) -> Result<FillRule> {
        self.handle
            .with_read(|cr| FillRule::from_raw(unsafe { vl_get_fill_rule(cr) }))
    }

    pub fn translate(&self, tx: f64, ty: f64) {
        self.draw(|cr| unsafe { vl_translate(cr, tx, ty) })
    }

    pub fn scale(&self, sx: f64, sy: f64) {
        self.draw(|cr| unsafe { vl_scale(cr, sx, sy) })
    }

    pub fn rotate(&self, radians: f64) {
        self.draw(|cr| unsafe { vl_rotate(cr, radians) })
    }

    /// Applies `transform` before the current transformation.
    pub fn transform(&self, transform: &Transform) {
        self.draw_with(transform.handle(), |cr, m| unsafe { vl_transform(cr, m) })
    }

    pub fn set_matrix(&self, transform: &Transform) {
        self.draw_with(transform.handle(), |cr, m| unsafe { vl_set_matrix(cr, m) })
    }

    /// Copy of the current user space to device space transformation.
    pub fn matrix(&self) -> Result<Transform> {
        let matrix = self.handle.with_read(|cr| {
            let mut matrix = vl_matrix_t::IDENTITY;
            unsafe { vl_get_matrix(cr, &mut matrix) };
            matrix
        })?;
        Transform::from_raw_matrix(matrix)
    }

    pub fn identity_matrix(&self) {
        self.draw(|cr| unsafe { vl_identity_matrix(cr) })
    }

    pub fn user_to_device(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        self.handle.with_read(|cr| {
            let (mut x, mut y) = (x, y);
            unsafe { vl_user_to_device(cr, &mut x, &mut y) };
            (x, y)
        })
    }

    pub fn device_to_user(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        self.handle.with_read(|cr| {
            let (mut x, mut y) = (x, y);
            unsafe { vl_device_to_user(cr, &mut x, &mut y) };
            (x, y)
        })
    }

    pub fn new_path(&self) {
        self.draw(|cr| unsafe { vl_new_path(cr) })
    }

    pub fn move_to(&self, x: f64, y: f64) {
        self.draw(|cr| unsafe { vl_move_to(cr, x, y) })
    }

    /// Adds a line to `(x, y)`, or moves there if there is no current point.
    pub fn line_to(&self, x: f64, y: f64) {
        self.draw(|cr| unsafe { vl_line_to(cr, x, y) })
    }

    pub fn curve_to(&self, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64) {
        self.draw(|cr| unsafe { vl_curve_to(cr, x1, y1, x2, y2, x3, y3) })
    }

    /// Fails with `Status::NoCurrentPoint` into the context status if there is
    /// no current point.
    pub fn rel_move_to(&self, dx: f64, dy: f64) {
        self.draw(|cr| unsafe { vl_rel_move_to(cr, dx, dy) })
    }

    pub fn rel_line_to(&self, dx: f64, dy: f64) {
        self.draw(|cr| unsafe { vl_rel_line_to(cr, dx, dy) })
    }

    pub fn rectangle(&self, x: f64, y: f64, width: f64, height: f64) {
        self.draw(|cr| unsafe { vl_rectangle(cr, x, y, width, height) })
    }

    pub fn arc(&self, xc: f64, yc: f64, radius: f64, angle1: f64, angle2: f64) {
        self.draw(|cr| unsafe { vl_arc(cr, xc, yc, radius, angle1, angle2) })
    }

    pub fn arc_negative(&self, xc: f64, yc: f64, radius: f64, angle1: f64, angle2: f64) {
        self.draw(|cr| unsafe { vl_arc_negative(cr, xc, yc, radius, angle1, angle2) })
    }

    pub fn close_path(&self) {
        self.draw(|cr| unsafe { vl_close_path(cr) })
    }

    pub fn has_current_point(&self) -> Result<bool> {
        self.handle
            .with_read(|cr| unsafe { vl_has_current_point(cr) })
    }

    /// Current point in user space, if there is one.
    pub fn current_point(&self) -> Result<Option<(f64, f64)>> {
        self.handle.with_read(|cr| unsafe {
            if vl_has_current_point(cr) {
                let (mut x, mut y) = (0.0, 0.0);
                vl_get_current_point(cr, &mut x, &mut y);
                Some((x, y))
            } else {
                None
            }
        })
    }

    pub fn fill(&self) {
        self.draw(|cr| unsafe { vl_fill(cr) })
    }

    pub fn fill_preserve(&self) {
        self.draw(|cr| unsafe { vl_fill_preserve(cr) })
    }

    pub fn stroke(&self) {
        self.draw(|cr| unsafe { vl_stroke(cr) })
    }

    pub fn stroke_preserve(&self) {
        self.draw(|cr| unsafe { vl_stroke_preserve(cr) })
    }

    pub fn paint(&self) {
        self.draw(|cr| unsafe { vl_paint(cr) })
    }

    pub fn paint_with_alpha(&self, alpha: f64) {
        self.draw(|cr| unsafe { vl_paint_with_alpha(cr, alpha) })
    }

    pub fn release(&self) {
        self.handle.release();
    }

    pub fn is_released(&self) -> bool {
        self.handle.is_released()
    }
}
