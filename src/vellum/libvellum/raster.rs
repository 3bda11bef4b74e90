// SPDX-License-Identifier: GPL-3.0-or-later
//! Minimal software rasterizer: flattened polygons, scanline coverage at
//! pixel centers, no antialiasing.
use crate::{
    pattern::{ColorStop, Paint},
    surface::{Rgba, SurfaceRef},
    vl_extend_t, vl_fill_rule_t, vl_matrix_t, VL_EXTEND_NONE, VL_EXTEND_PAD, VL_EXTEND_REFLECT,
    VL_EXTEND_REPEAT, VL_FILL_RULE_EVEN_ODD,
};
use std::f64::consts::PI;

pub(crate) type Point = (f64, f64);

const CURVE_SEGMENTS: usize = 16;

#[derive(Clone, Debug, Default)]
pub(crate) struct Subpath {
    pub points: Vec<Point>,
    pub closed: bool,
}

pub(crate) fn flatten_curve(out: &mut Vec<Point>, p0: Point, p1: Point, p2: Point, p3: Point) {
    for i in 1..=CURVE_SEGMENTS {
        let t = i as f64 / CURVE_SEGMENTS as f64;
        let mt = 1.0 - t;
        let a = mt * mt * mt;
        let b = 3.0 * mt * mt * t;
        let c = 3.0 * mt * t * t;
        let d = t * t * t;
        out.push((
            a * p0.0 + b * p1.0 + c * p2.0 + d * p3.0,
            a * p0.1 + b * p1.1 + c * p2.1 + d * p3.1,
        ));
    }
}

/// Points along an arc in user space, from `angle1` to `angle2`.
pub(crate) fn arc_points(
    xc: f64,
    yc: f64,
    radius: f64,
    angle1: f64,
    angle2: f64,
) -> impl Iterator<Item = Point> {
    let sweep = angle2 - angle1;
    let segments = ((sweep.abs() / (PI / 16.0)).ceil() as usize).clamp(1, 1024);
    (0..=segments).map(move |i| {
        let angle = angle1 + sweep * i as f64 / segments as f64;
        (xc + radius * angle.cos(), yc + radius * angle.sin())
    })
}

fn signed_area(contour: &[Point]) -> f64 {
    let mut area = 0.0;
    for (i, a) in contour.iter().enumerate() {
        let b = contour[(i + 1) % contour.len()];
        area += a.0 * b.1 - b.0 * a.1;
    }
    area / 2.0
}

fn push_oriented(contours: &mut Vec<Vec<Point>>, mut contour: Vec<Point>) {
    if signed_area(&contour) < 0.0 {
        contour.reverse();
    }
    contours.push(contour);
}

/// Turns stroked subpaths into contours to be filled with the winding rule.
/// Every contour is oriented the same way, so overlaps never cancel out.
/// Segments end flat, caps and joins are not drawn.
pub(crate) fn stroke_contours(subpaths: &[Subpath], half_width: f64) -> Vec<Vec<Point>> {
    let mut contours = Vec::new();
    if half_width <= 0.0 {
        return contours;
    }
    for subpath in subpaths {
        let mut points = subpath.points.clone();
        if subpath.closed {
            if let Some(&first) = points.first() {
                points.push(first);
            }
        }
        for pair in points.windows(2) {
            let (p, q) = (pair[0], pair[1]);
            let (dx, dy) = (q.0 - p.0, q.1 - p.1);
            let len = (dx * dx + dy * dy).sqrt();
            if len == 0.0 {
                continue;
            }
            let (nx, ny) = (-dy / len * half_width, dx / len * half_width);
            push_oriented(
                &mut contours,
                vec![
                    (p.0 + nx, p.1 + ny),
                    (q.0 + nx, q.1 + ny),
                    (q.0 - nx, q.1 - ny),
                    (p.0 - nx, p.1 - ny),
                ],
            );
        }
    }
    contours
}

/// Calls `plot` for every pixel whose center lies inside the contours.
pub(crate) fn for_each_covered<F>(
    contours: &[Vec<Point>],
    fill_rule: vl_fill_rule_t,
    width: usize,
    height: usize,
    mut plot: F,
) where
    F: FnMut(usize, usize),
{
    let mut crossings: Vec<(f64, i32)> = Vec::new();
    for y in 0..height {
        let yc = y as f64 + 0.5;
        crossings.clear();
        for contour in contours {
            for (i, &a) in contour.iter().enumerate() {
                let b = contour[(i + 1) % contour.len()];
                if a.1 == b.1 {
                    continue;
                }
                let (lo, hi) = if a.1 < b.1 { (a.1, b.1) } else { (b.1, a.1) };
                if yc < lo || yc >= hi {
                    continue;
                }
                let x = a.0 + (yc - a.1) * (b.0 - a.0) / (b.1 - a.1);
                crossings.push((x, if b.1 > a.1 { 1 } else { -1 }));
            }
        }
        crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut winding = 0;
        for pair in crossings.windows(2) {
            winding += pair[0].1;
            let inside = if fill_rule == VL_FILL_RULE_EVEN_ODD {
                winding % 2 != 0
            } else {
                winding != 0
            };
            if !inside {
                continue;
            }
            let from = (pair[0].0 - 0.5).ceil().max(0.0) as usize;
            let to = ((pair[1].0 - 0.5).ceil().max(0.0) as usize).min(width);
            for x in from..to {
                plot(x, y);
            }
        }
    }
}

pub(crate) fn premultiply([r, g, b, a]: Rgba) -> Rgba {
    [r * a, g * a, b * a, a]
}

/// Porter-Duff OVER on premultiplied colors.
pub(crate) fn over(dst: Rgba, src: Rgba) -> Rgba {
    let k = 1.0 - src[3];
    [
        src[0] + dst[0] * k,
        src[1] + dst[1] * k,
        src[2] + dst[2] * k,
        src[3] + dst[3] * k,
    ]
}

enum ShaderKind {
    Solid(Rgba),
    Linear {
        x0: f64,
        y0: f64,
        dx: f64,
        dy: f64,
        stops: Vec<ColorStop>,
    },
    Radial {
        cx0: f64,
        cy0: f64,
        r0: f64,
        cdx: f64,
        cdy: f64,
        dr: f64,
        stops: Vec<ColorStop>,
    },
    Surface {
        surface: SurfaceRef,
        pixels: Vec<u8>,
    },
}

/// A paint source resolved against device space.
pub(crate) struct Shader {
    kind: ShaderKind,
    device_to_pattern: vl_matrix_t,
    extend: vl_extend_t,
}

impl Shader {
    /// Surface sources are copied here, so drawing a surface onto itself
    /// reads the state from before the operation.
    pub(crate) fn new(paint: &Paint, device_to_pattern: vl_matrix_t, extend: vl_extend_t) -> Self {
        let sorted = |stops: &[ColorStop]| {
            let mut stops = stops.to_vec();
            stops.sort_by(|a, b| a.offset.total_cmp(&b.offset));
            stops
        };
        let kind = match paint {
            Paint::Solid(color) => ShaderKind::Solid(premultiply(*color)),
            Paint::Linear {
                x0,
                y0,
                x1,
                y1,
                stops,
            } => ShaderKind::Linear {
                x0: *x0,
                y0: *y0,
                dx: x1 - x0,
                dy: y1 - y0,
                stops: sorted(stops.as_slice()),
            },
            Paint::Radial {
                cx0,
                cy0,
                r0,
                cx1,
                cy1,
                r1,
                stops,
            } => ShaderKind::Radial {
                cx0: *cx0,
                cy0: *cy0,
                r0: *r0,
                cdx: cx1 - cx0,
                cdy: cy1 - cy0,
                dr: r1 - r0,
                stops: sorted(stops.as_slice()),
            },
            Paint::Surface(surface) => ShaderKind::Surface {
                surface: surface.clone(),
                pixels: surface.lock_pixels().clone(),
            },
        };
        Self {
            kind,
            device_to_pattern,
            extend,
        }
    }

    /// Premultiplied color at a device-space position.
    pub(crate) fn color_at(&self, x: f64, y: f64) -> Rgba {
        const CLEAR: Rgba = [0.0; 4];
        let (px, py) = self.device_to_pattern.transform_point(x, y);
        match &self.kind {
            ShaderKind::Solid(color) => *color,
            ShaderKind::Linear {
                x0,
                y0,
                dx,
                dy,
                stops,
            } => {
                let len2 = dx * dx + dy * dy;
                if len2 == 0.0 {
                    return CLEAR;
                }
                let t = ((px - x0) * dx + (py - y0) * dy) / len2;
                self.gradient(stops, t)
            }
            ShaderKind::Radial {
                cx0,
                cy0,
                r0,
                cdx,
                cdy,
                dr,
                stops,
            } => match radial_parameter(px - cx0, py - cy0, *r0, *cdx, *cdy, *dr) {
                Some(t) => self.gradient(stops, t),
                None => CLEAR,
            },
            ShaderKind::Surface { surface, pixels } => {
                let w = surface.width() as i64;
                let h = surface.height() as i64;
                let sx = extend_index(px.floor() as i64, w, self.extend);
                let sy = extend_index(py.floor() as i64, h, self.extend);
                match (sx, sy) {
                    (Some(sx), Some(sy)) => surface.load(pixels, sx, sy),
                    _ => CLEAR,
                }
            }
        }
    }

    fn gradient(&self, stops: &[ColorStop], t: f64) -> Rgba {
        let Some(t) = extend_parameter(t, self.extend) else {
            return [0.0; 4];
        };
        let (first, last) = match (stops.first(), stops.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return [0.0; 4],
        };
        if t <= first.offset {
            return premultiply(first.color);
        }
        if t >= last.offset {
            return premultiply(last.color);
        }
        for pair in stops.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if t >= a.offset && t <= b.offset {
                let span = b.offset - a.offset;
                let f = if span > 0.0 { (t - a.offset) / span } else { 0.0 };
                let mut color = [0.0; 4];
                for (c, (ca, cb)) in color.iter_mut().zip(a.color.iter().zip(b.color.iter())) {
                    *c = ca + (cb - ca) * f;
                }
                return premultiply(color);
            }
        }
        premultiply(last.color)
    }
}

/// Solves for the largest `t` whose interpolated circle passes through the
/// point `(px, py)` (relative to the first center) with a non-negative radius.
fn radial_parameter(px: f64, py: f64, r0: f64, cdx: f64, cdy: f64, dr: f64) -> Option<f64> {
    let a = cdx * cdx + cdy * cdy - dr * dr;
    let b = px * cdx + py * cdy + r0 * dr;
    let c = px * px + py * py - r0 * r0;
    if a.abs() < 1e-12 {
        if b.abs() < 1e-12 {
            return None;
        }
        let t = c / (2.0 * b);
        return (r0 + t * dr >= 0.0).then_some(t);
    }
    let discriminant = b * b - a * c;
    if discriminant < 0.0 {
        return None;
    }
    let root = discriminant.sqrt();
    let (t1, t2) = ((b + root) / a, (b - root) / a);
    let (hi, lo) = if t1 >= t2 { (t1, t2) } else { (t2, t1) };
    if r0 + hi * dr >= 0.0 {
        Some(hi)
    } else if r0 + lo * dr >= 0.0 {
        Some(lo)
    } else {
        None
    }
}

fn extend_parameter(t: f64, extend: vl_extend_t) -> Option<f64> {
    match extend {
        VL_EXTEND_NONE => (0.0..=1.0).contains(&t).then_some(t),
        VL_EXTEND_REPEAT => Some(t - t.floor()),
        VL_EXTEND_REFLECT => {
            let m = t.rem_euclid(2.0);
            Some(if m > 1.0 { 2.0 - m } else { m })
        }
        VL_EXTEND_PAD => Some(t.clamp(0.0, 1.0)),
        _ => Some(t.clamp(0.0, 1.0)),
    }
}

fn extend_index(i: i64, len: i64, extend: vl_extend_t) -> Option<usize> {
    if len <= 0 {
        return None;
    }
    let index = match extend {
        VL_EXTEND_REPEAT => i.rem_euclid(len),
        VL_EXTEND_REFLECT => {
            let m = i.rem_euclid(2 * len);
            if m >= len {
                2 * len - 1 - m
            } else {
                m
            }
        }
        VL_EXTEND_PAD => i.clamp(0, len - 1),
        _ if (0..len).contains(&i) => i,
        _ => return None,
    };
    Some(index as usize)
}
