// SPDX-License-Identifier: GPL-3.0-or-later
use crate::{
    pattern::Paint,
    raster::{self, Point, Shader, Subpath},
    surface::SurfaceRef,
    vl_extend_t, vl_fill_rule_t, vl_line_cap_t, vl_line_join_t, vl_matrix_t, vl_pattern_t,
    vl_status_t, vl_surface_t, VL_EXTEND_NONE, VL_EXTEND_PAD, VL_FILL_RULE_EVEN_ODD,
    VL_FILL_RULE_WINDING, VL_LINE_CAP_BUTT, VL_LINE_CAP_SQUARE, VL_LINE_JOIN_BEVEL,
    VL_LINE_JOIN_MITER, VL_STATUS_INTERNAL_ERROR, VL_STATUS_INVALID_MATRIX,
    VL_STATUS_INVALID_RESTORE, VL_STATUS_NO_CURRENT_POINT, VL_STATUS_NULL_POINTER,
    VL_STATUS_SUCCESS, VL_STATUS_SURFACE_FINISHED,
};
use std::{
    ffi::c_uint,
    f64::consts::PI,
    panic::{catch_unwind, AssertUnwindSafe},
    sync::atomic::{AtomicUsize, Ordering},
};
use tracing::error;

#[derive(Clone)]
struct GState {
    source: Paint,
    // Device space to pattern space, fixed when the source is set.
    source_matrix: vl_matrix_t,
    source_extend: vl_extend_t,
    line_width: f64,
    line_cap: vl_line_cap_t,
    line_join: vl_line_join_t,
    fill_rule: vl_fill_rule_t,
    ctm: vl_matrix_t,
}

impl Default for GState {
    fn default() -> Self {
        Self {
            source: Paint::Solid([0.0, 0.0, 0.0, 1.0]),
            source_matrix: vl_matrix_t::IDENTITY,
            source_extend: VL_EXTEND_PAD,
            line_width: 2.0,
            line_cap: VL_LINE_CAP_BUTT,
            line_join: VL_LINE_JOIN_MITER,
            fill_rule: VL_FILL_RULE_WINDING,
            ctm: vl_matrix_t::IDENTITY,
        }
    }
}

impl GState {
    fn ctm_inverse(&self) -> vl_matrix_t {
        self.ctm.inverse().unwrap_or(vl_matrix_t::IDENTITY)
    }
}

/// Drawing context. All drawing errors are sticky: the first one is kept in
/// the context status and turns every later drawing call into a no-op.
pub struct vl_t {
    refcount: AtomicUsize,
    status: vl_status_t,
    target: Option<SurfaceRef>,
    gstate: GState,
    stack: Vec<GState>,
    path: Vec<Subpath>,
    // Device space.
    current_point: Option<Point>,
}

impl vl_t {
    fn create(target: Option<SurfaceRef>, status: vl_status_t) -> *mut Self {
        Box::into_raw(Box::new(Self {
            refcount: AtomicUsize::new(1),
            status,
            target,
            gstate: GState::default(),
            stack: Vec::new(),
            path: Vec::new(),
            current_point: None,
        }))
    }

    fn set_error(&mut self, status: vl_status_t) {
        if self.status == VL_STATUS_SUCCESS {
            self.status = status;
        }
    }

    fn to_device(&self, x: f64, y: f64) -> Point {
        self.gstate.ctm.transform_point(x, y)
    }

    fn to_user(&self, point: Point) -> Point {
        self.gstate.ctm_inverse().transform_point(point.0, point.1)
    }

    fn set_ctm(&mut self, ctm: vl_matrix_t) {
        if ctm.is_invertible() {
            self.gstate.ctm = ctm;
        } else {
            self.set_error(VL_STATUS_INVALID_MATRIX);
        }
    }

    fn set_source_paint(&mut self, paint: Paint, matrix: vl_matrix_t, extend: vl_extend_t) {
        let device_to_pattern = vl_matrix_t::multiply(&self.gstate.ctm_inverse(), &matrix);
        self.gstate.source = paint;
        self.gstate.source_matrix = device_to_pattern;
        self.gstate.source_extend = extend;
    }

    fn move_to_device(&mut self, point: Point) {
        match self.path.last_mut() {
            Some(last) if last.points.len() == 1 && !last.closed => last.points[0] = point,
            _ => self.path.push(Subpath {
                points: vec![point],
                closed: false,
            }),
        }
        self.current_point = Some(point);
    }

    fn line_to_device(&mut self, point: Point) {
        if self.current_point.is_none() {
            self.move_to_device(point);
            return;
        }
        self.open_subpath().points.push(point);
        self.current_point = Some(point);
    }

    // After close_path the current point is the start of the closed subpath;
    // drawing on from there begins a new subpath.
    fn open_subpath(&mut self) -> &mut Subpath {
        let reopen = match self.path.last() {
            Some(last) => last.closed,
            None => true,
        };
        if reopen {
            let start = self.current_point.unwrap_or_default();
            self.path.push(Subpath {
                points: vec![start],
                closed: false,
            });
        }
        let last = self.path.len() - 1;
        &mut self.path[last]
    }

    fn close_path(&mut self) {
        if let Some(last) = self.path.last_mut() {
            if !last.closed {
                last.closed = true;
                self.current_point = last.points.first().copied();
            }
        }
    }

    fn fill_contours(&self) -> Vec<Vec<Point>> {
        self.path
            .iter()
            .filter(|subpath| subpath.points.len() > 2)
            .map(|subpath| subpath.points.clone())
            .collect()
    }

    fn stroke_contours(&self) -> Vec<Vec<Point>> {
        let half_width = self.gstate.line_width / 2.0 * self.gstate.ctm.scale_factor();
        raster::stroke_contours(&self.path, half_width)
    }

    /// Composites the current source through the given contours, or over the
    /// whole target when there are none.
    fn composite(
        &mut self,
        contours: Option<&[Vec<Point>]>,
        fill_rule: vl_fill_rule_t,
        alpha: f64,
    ) {
        let Some(target) = self.target.clone() else {
            return;
        };
        if target.is_finished() {
            self.set_error(VL_STATUS_SURFACE_FINISHED);
            return;
        }
        let shader = Shader::new(
            &self.gstate.source,
            self.gstate.source_matrix,
            self.gstate.source_extend,
        );
        let width = target.width() as usize;
        let height = target.height() as usize;
        let mut pixels = target.lock_pixels();
        let mut plot = |x: usize, y: usize| {
            let mut src = shader.color_at(x as f64 + 0.5, y as f64 + 0.5);
            for channel in src.iter_mut() {
                *channel *= alpha;
            }
            let dst = target.load(&pixels, x, y);
            target.store(&mut pixels, x, y, raster::over(dst, src));
        };
        match contours {
            Some(contours) => raster::for_each_covered(contours, fill_rule, width, height, plot),
            None => {
                for y in 0..height {
                    for x in 0..width {
                        plot(x, y);
                    }
                }
            }
        }
    }
}

/// Runs a drawing operation unless the context is already in an error state.
/// A panic is reported as `VL_STATUS_INTERNAL_ERROR` on the context.
unsafe fn with_context<F>(cr: *mut vl_t, name: &str, func: F)
where
    F: FnOnce(&mut vl_t),
{
    let Some(cr) = (unsafe { cr.as_mut() }) else {
        return;
    };
    if cr.status != VL_STATUS_SUCCESS {
        return;
    }
    if catch_unwind(AssertUnwindSafe(|| func(cr))).is_err() {
        error!("Panic inside {name}");
        cr.set_error(VL_STATUS_INTERNAL_ERROR);
    }
}

/// Creates a context drawing into `target`. The context takes its own
/// reference to the target surface.
#[no_mangle]
pub unsafe extern "C" fn vl_create(target: *mut vl_surface_t) -> *mut vl_t {
    let Some(target) = (unsafe { SurfaceRef::new_inc(target) }) else {
        return vl_t::create(None, VL_STATUS_NULL_POINTER);
    };
    let status = target.status();
    if status != VL_STATUS_SUCCESS {
        return vl_t::create(None, status);
    }
    if target.is_finished() {
        return vl_t::create(None, VL_STATUS_SURFACE_FINISHED);
    }
    vl_t::create(Some(target), VL_STATUS_SUCCESS)
}

#[no_mangle]
pub unsafe extern "C" fn vl_reference(cr: *mut vl_t) -> *mut vl_t {
    if let Some(c) = unsafe { cr.as_ref() } {
        c.refcount.fetch_add(1, Ordering::Relaxed);
    }
    cr
}

#[no_mangle]
pub unsafe extern "C" fn vl_destroy(cr: *mut vl_t) {
    let Some(c) = (unsafe { cr.as_ref() }) else {
        return;
    };
    if c.refcount.fetch_sub(1, Ordering::AcqRel) == 1 {
        drop(unsafe { Box::from_raw(cr) });
    }
}

#[no_mangle]
pub unsafe extern "C" fn vl_get_reference_count(cr: *mut vl_t) -> c_uint {
    unsafe { cr.as_ref() }.map_or(0, |c| c.refcount.load(Ordering::Acquire) as c_uint)
}

/// The first error recorded by a drawing call, or `VL_STATUS_SUCCESS`.
#[no_mangle]
pub unsafe extern "C" fn vl_status(cr: *mut vl_t) -> vl_status_t {
    unsafe { cr.as_ref() }.map_or(VL_STATUS_NULL_POINTER, |c| c.status)
}

#[no_mangle]
pub unsafe extern "C" fn vl_save(cr: *mut vl_t) {
    unsafe {
        with_context(cr, "vl_save", |c| {
            let gstate = c.gstate.clone();
            c.stack.push(gstate);
        })
    }
}

#[no_mangle]
pub unsafe extern "C" fn vl_restore(cr: *mut vl_t) {
    unsafe {
        with_context(cr, "vl_restore", |c| match c.stack.pop() {
            Some(gstate) => c.gstate = gstate,
            None => c.set_error(VL_STATUS_INVALID_RESTORE),
        })
    }
}

/// Uses `pattern` as the source. The pattern is copied together with the
/// current transformation, so later changes to either do not affect it.
#[no_mangle]
pub unsafe extern "C" fn vl_set_source(cr: *mut vl_t, pattern: *mut vl_pattern_t) {
    let pattern = unsafe { pattern.as_ref() };
    unsafe {
        with_context(cr, "vl_set_source", |c| {
            let Some(p) = pattern else {
                c.set_error(VL_STATUS_NULL_POINTER);
                return;
            };
            if p.status() != VL_STATUS_SUCCESS {
                c.set_error(p.status());
                return;
            }
            c.set_source_paint(p.paint.clone(), p.matrix, p.extend);
        })
    }
}

#[no_mangle]
pub unsafe extern "C" fn vl_set_source_rgb(cr: *mut vl_t, red: f64, green: f64, blue: f64) {
    unsafe { vl_set_source_rgba(cr, red, green, blue, 1.0) }
}

#[no_mangle]
pub unsafe extern "C" fn vl_set_source_rgba(
    cr: *mut vl_t,
    red: f64,
    green: f64,
    blue: f64,
    alpha: f64,
) {
    unsafe {
        with_context(cr, "vl_set_source_rgba", |c| {
            let color = [
                red.clamp(0.0, 1.0),
                green.clamp(0.0, 1.0),
                blue.clamp(0.0, 1.0),
                alpha.clamp(0.0, 1.0),
            ];
            c.set_source_paint(Paint::Solid(color), vl_matrix_t::IDENTITY, VL_EXTEND_PAD);
        })
    }
}

/// Uses `surface` as the source, with its origin at user-space `(x, y)`.
#[no_mangle]
pub unsafe extern "C" fn vl_set_source_surface(
    cr: *mut vl_t,
    surface: *mut vl_surface_t,
    x: f64,
    y: f64,
) {
    unsafe {
        with_context(cr, "vl_set_source_surface", |c| {
            let Some(surface) = SurfaceRef::new_inc(surface) else {
                c.set_error(VL_STATUS_NULL_POINTER);
                return;
            };
            let status = surface.status();
            if status != VL_STATUS_SUCCESS {
                c.set_error(status);
                return;
            }
            c.set_source_paint(
                Paint::Surface(surface),
                vl_matrix_t::translation(-x, -y),
                VL_EXTEND_NONE,
            );
        })
    }
}

#[no_mangle]
pub unsafe extern "C" fn vl_set_line_width(cr: *mut vl_t, width: f64) {
    unsafe { with_context(cr, "vl_set_line_width", |c| c.gstate.line_width = width.max(0.0)) }
}

#[no_mangle]
pub unsafe extern "C" fn vl_get_line_width(cr: *mut vl_t) -> f64 {
    unsafe { cr.as_ref() }.map_or(0.0, |c| c.gstate.line_width)
}

#[no_mangle]
pub unsafe extern "C" fn vl_set_line_cap(cr: *mut vl_t, cap: vl_line_cap_t) {
    if (VL_LINE_CAP_BUTT..=VL_LINE_CAP_SQUARE).contains(&cap) {
        unsafe { with_context(cr, "vl_set_line_cap", |c| c.gstate.line_cap = cap) }
    }
}

#[no_mangle]
pub unsafe extern "C" fn vl_get_line_cap(cr: *mut vl_t) -> vl_line_cap_t {
    unsafe { cr.as_ref() }.map_or(VL_LINE_CAP_BUTT, |c| c.gstate.line_cap)
}

#[no_mangle]
pub unsafe extern "C" fn vl_set_line_join(cr: *mut vl_t, join: vl_line_join_t) {
    if (VL_LINE_JOIN_MITER..=VL_LINE_JOIN_BEVEL).contains(&join) {
        unsafe { with_context(cr, "vl_set_line_join", |c| c.gstate.line_join = join) }
    }
}

#[no_mangle]
pub unsafe extern "C" fn vl_get_line_join(cr: *mut vl_t) -> vl_line_join_t {
    unsafe { cr.as_ref() }.map_or(VL_LINE_JOIN_MITER, |c| c.gstate.line_join)
}

#[no_mangle]
pub unsafe extern "C" fn vl_set_fill_rule(cr: *mut vl_t, fill_rule: vl_fill_rule_t) {
    if (VL_FILL_RULE_WINDING..=VL_FILL_RULE_EVEN_ODD).contains(&fill_rule) {
        unsafe { with_context(cr, "vl_set_fill_rule", |c| c.gstate.fill_rule = fill_rule) }
    }
}

#[no_mangle]
pub unsafe extern "C" fn vl_get_fill_rule(cr: *mut vl_t) -> vl_fill_rule_t {
    unsafe { cr.as_ref() }.map_or(VL_FILL_RULE_WINDING, |c| c.gstate.fill_rule)
}

#[no_mangle]
pub unsafe extern "C" fn vl_translate(cr: *mut vl_t, tx: f64, ty: f64) {
    unsafe {
        with_context(cr, "vl_translate", |c| {
            c.set_ctm(vl_matrix_t::multiply(&vl_matrix_t::translation(tx, ty), &c.gstate.ctm))
        })
    }
}

#[no_mangle]
pub unsafe extern "C" fn vl_scale(cr: *mut vl_t, sx: f64, sy: f64) {
    unsafe {
        with_context(cr, "vl_scale", |c| {
            c.set_ctm(vl_matrix_t::multiply(&vl_matrix_t::scaling(sx, sy), &c.gstate.ctm))
        })
    }
}

#[no_mangle]
pub unsafe extern "C" fn vl_rotate(cr: *mut vl_t, radians: f64) {
    unsafe {
        with_context(cr, "vl_rotate", |c| {
            c.set_ctm(vl_matrix_t::multiply(&vl_matrix_t::rotation(radians), &c.gstate.ctm))
        })
    }
}

/// Applies `matrix` before the current transformation.
#[no_mangle]
pub unsafe extern "C" fn vl_transform(cr: *mut vl_t, matrix: *const vl_matrix_t) {
    let matrix = unsafe { matrix.as_ref() }.copied();
    unsafe {
        with_context(cr, "vl_transform", |c| match matrix {
            Some(m) => c.set_ctm(vl_matrix_t::multiply(&m, &c.gstate.ctm)),
            None => c.set_error(VL_STATUS_NULL_POINTER),
        })
    }
}

#[no_mangle]
pub unsafe extern "C" fn vl_set_matrix(cr: *mut vl_t, matrix: *const vl_matrix_t) {
    let matrix = unsafe { matrix.as_ref() }.copied();
    unsafe {
        with_context(cr, "vl_set_matrix", |c| match matrix {
            Some(m) => c.set_ctm(m),
            None => c.set_error(VL_STATUS_NULL_POINTER),
        })
    }
}

#[no_mangle]
pub unsafe extern "C" fn vl_get_matrix(cr: *mut vl_t, matrix: *mut vl_matrix_t) {
    if let (Some(c), Some(m)) = (unsafe { cr.as_ref() }, unsafe { matrix.as_mut() }) {
        *m = c.gstate.ctm;
    }
}

#[no_mangle]
pub unsafe extern "C" fn vl_identity_matrix(cr: *mut vl_t) {
    unsafe { with_context(cr, "vl_identity_matrix", |c| c.gstate.ctm = vl_matrix_t::IDENTITY) }
}

#[no_mangle]
pub unsafe extern "C" fn vl_user_to_device(cr: *mut vl_t, x: *mut f64, y: *mut f64) {
    if let (Some(c), Some(x), Some(y)) = unsafe { (cr.as_ref(), x.as_mut(), y.as_mut()) } {
        (*x, *y) = c.to_device(*x, *y);
    }
}

#[no_mangle]
pub unsafe extern "C" fn vl_device_to_user(cr: *mut vl_t, x: *mut f64, y: *mut f64) {
    if let (Some(c), Some(x), Some(y)) = unsafe { (cr.as_ref(), x.as_mut(), y.as_mut()) } {
        (*x, *y) = c.to_user((*x, *y));
    }
}

#[no_mangle]
pub unsafe extern "C" fn vl_new_path(cr: *mut vl_t) {
    unsafe {
        with_context(cr, "vl_new_path", |c| {
            c.path.clear();
            c.current_point = None;
        })
    }
}

#[no_mangle]
pub unsafe extern "C" fn vl_move_to(cr: *mut vl_t, x: f64, y: f64) {
    unsafe {
        with_context(cr, "vl_move_to", |c| {
            let point = c.to_device(x, y);
            c.move_to_device(point);
        })
    }
}

/// Adds a line to `(x, y)`. Without a current point this acts like
/// `vl_move_to`.
#[no_mangle]
pub unsafe extern "C" fn vl_line_to(cr: *mut vl_t, x: f64, y: f64) {
    unsafe {
        with_context(cr, "vl_line_to", |c| {
            let point = c.to_device(x, y);
            c.line_to_device(point);
        })
    }
}

#[no_mangle]
pub unsafe extern "C" fn vl_curve_to(
    cr: *mut vl_t,
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    x3: f64,
    y3: f64,
) {
    unsafe {
        with_context(cr, "vl_curve_to", |c| {
            let p1 = c.to_device(x1, y1);
            let p2 = c.to_device(x2, y2);
            let p3 = c.to_device(x3, y3);
            let p0 = match c.current_point {
                Some(p0) => p0,
                None => {
                    c.move_to_device(p1);
                    p1
                }
            };
            let subpath = c.open_subpath();
            raster::flatten_curve(&mut subpath.points, p0, p1, p2, p3);
            c.current_point = Some(p3);
        })
    }
}

#[no_mangle]
pub unsafe extern "C" fn vl_rel_move_to(cr: *mut vl_t, dx: f64, dy: f64) {
    unsafe {
        with_context(cr, "vl_rel_move_to", |c| {
            let Some((x, y)) = c.current_point else {
                c.set_error(VL_STATUS_NO_CURRENT_POINT);
                return;
            };
            let (dx, dy) = c.gstate.ctm.transform_distance(dx, dy);
            c.move_to_device((x + dx, y + dy));
        })
    }
}

#[no_mangle]
pub unsafe extern "C" fn vl_rel_line_to(cr: *mut vl_t, dx: f64, dy: f64) {
    unsafe {
        with_context(cr, "vl_rel_line_to", |c| {
            let Some((x, y)) = c.current_point else {
                c.set_error(VL_STATUS_NO_CURRENT_POINT);
                return;
            };
            let (dx, dy) = c.gstate.ctm.transform_distance(dx, dy);
            c.line_to_device((x + dx, y + dy));
        })
    }
}

#[no_mangle]
pub unsafe extern "C" fn vl_rectangle(cr: *mut vl_t, x: f64, y: f64, width: f64, height: f64) {
    unsafe {
        with_context(cr, "vl_rectangle", |c| {
            let p = c.to_device(x, y);
            c.move_to_device(p);
            for (px, py) in [(x + width, y), (x + width, y + height), (x, y + height)] {
                let p = c.to_device(px, py);
                c.line_to_device(p);
            }
            c.close_path();
        })
    }
}

unsafe fn add_arc(cr: *mut vl_t, name: &str, xc: f64, yc: f64, radius: f64, a1: f64, a2: f64) {
    unsafe {
        with_context(cr, name, |c| {
            let mut points = raster::arc_points(xc, yc, radius, a1, a2);
            if let Some((x, y)) = points.next() {
                let p = c.to_device(x, y);
                c.line_to_device(p);
            }
            for (x, y) in points {
                let p = c.to_device(x, y);
                c.line_to_device(p);
            }
        })
    }
}

/// Adds a circular arc in the direction of increasing angles. A line from
/// the current point to the start of the arc is added first.
#[no_mangle]
pub unsafe extern "C" fn vl_arc(
    cr: *mut vl_t,
    xc: f64,
    yc: f64,
    radius: f64,
    angle1: f64,
    mut angle2: f64,
) {
    if angle2.is_finite() && angle1.is_finite() {
        while angle2 < angle1 {
            angle2 += 2.0 * PI;
        }
    }
    unsafe { add_arc(cr, "vl_arc", xc, yc, radius, angle1, angle2) }
}

/// Adds a circular arc in the direction of decreasing angles.
#[no_mangle]
pub unsafe extern "C" fn vl_arc_negative(
    cr: *mut vl_t,
    xc: f64,
    yc: f64,
    radius: f64,
    angle1: f64,
    mut angle2: f64,
) {
    if angle2.is_finite() && angle1.is_finite() {
        while angle2 > angle1 {
            angle2 -= 2.0 * PI;
        }
    }
    unsafe { add_arc(cr, "vl_arc_negative", xc, yc, radius, angle1, angle2) }
}

#[no_mangle]
pub unsafe extern "C" fn vl_close_path(cr: *mut vl_t) {
    unsafe { with_context(cr, "vl_close_path", vl_t::close_path) }
}

#[no_mangle]
pub unsafe extern "C" fn vl_has_current_point(cr: *mut vl_t) -> bool {
    unsafe { cr.as_ref() }.map_or(false, |c| c.current_point.is_some())
}

/// Current point in user space, or `(0, 0)` if there is none.
#[no_mangle]
pub unsafe extern "C" fn vl_get_current_point(cr: *mut vl_t, x: *mut f64, y: *mut f64) {
    let Some(c) = (unsafe { cr.as_ref() }) else {
        return;
    };
    let (ux, uy) = c.current_point.map_or((0.0, 0.0), |p| c.to_user(p));
    unsafe {
        if let Some(x) = x.as_mut() {
            *x = ux;
        }
        if let Some(y) = y.as_mut() {
            *y = uy;
        }
    }
}

unsafe fn fill(cr: *mut vl_t, name: &str, preserve: bool) {
    unsafe {
        with_context(cr, name, |c| {
            let contours = c.fill_contours();
            let fill_rule = c.gstate.fill_rule;
            c.composite(Some(contours.as_slice()), fill_rule, 1.0);
            if !preserve {
                c.path.clear();
                c.current_point = None;
            }
        })
    }
}

unsafe fn stroke(cr: *mut vl_t, name: &str, preserve: bool) {
    unsafe {
        with_context(cr, name, |c| {
            let contours = c.stroke_contours();
            c.composite(Some(contours.as_slice()), VL_FILL_RULE_WINDING, 1.0);
            if !preserve {
                c.path.clear();
                c.current_point = None;
            }
        })
    }
}

#[no_mangle]
pub unsafe extern "C" fn vl_fill(cr: *mut vl_t) {
    unsafe { fill(cr, "vl_fill", false) }
}

#[no_mangle]
pub unsafe extern "C" fn vl_fill_preserve(cr: *mut vl_t) {
    unsafe { fill(cr, "vl_fill_preserve", true) }
}

#[no_mangle]
pub unsafe extern "C" fn vl_stroke(cr: *mut vl_t) {
    unsafe { stroke(cr, "vl_stroke", false) }
}

#[no_mangle]
pub unsafe extern "C" fn vl_stroke_preserve(cr: *mut vl_t) {
    unsafe { stroke(cr, "vl_stroke_preserve", true) }
}

#[no_mangle]
pub unsafe extern "C" fn vl_paint(cr: *mut vl_t) {
    unsafe { vl_paint_with_alpha(cr, 1.0) }
}

#[no_mangle]
pub unsafe extern "C" fn vl_paint_with_alpha(cr: *mut vl_t, alpha: f64) {
    let alpha = alpha.clamp(0.0, 1.0);
    unsafe {
        with_context(cr, "vl_paint_with_alpha", |c| {
            c.composite(None, VL_FILL_RULE_WINDING, alpha)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        vl_image_surface_create, vl_surface_destroy, vl_surface_get_reference_count,
        VL_FORMAT_ARGB32,
    };

    #[test]
    fn test_context_holds_target_reference() {
        unsafe {
            let surface = vl_image_surface_create(VL_FORMAT_ARGB32, 4, 4);
            let cr = vl_create(surface);
            assert_eq!(vl_surface_get_reference_count(surface), 2);
            vl_destroy(cr);
            assert_eq!(vl_surface_get_reference_count(surface), 1);
            vl_surface_destroy(surface);
        }
    }

    #[test]
    fn test_restore_without_save_is_sticky() {
        unsafe {
            let surface = vl_image_surface_create(VL_FORMAT_ARGB32, 4, 4);
            let cr = vl_create(surface);
            vl_restore(cr);
            assert_eq!(vl_status(cr), VL_STATUS_INVALID_RESTORE);
            vl_set_line_width(cr, 7.0);
            assert_eq!(vl_get_line_width(cr), 2.0);
            vl_destroy(cr);
            vl_surface_destroy(surface);
        }
    }
}
