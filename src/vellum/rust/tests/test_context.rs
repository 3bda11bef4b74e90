// SPDX-License-Identifier: GPL-3.0-or-later
use std::f64::consts::PI;
use vellum::{
    Context, Error, FillRule, Format, LineCap, LineJoin, Pattern, Status, Surface, Transform,
};

const RED: u32 = 0xffff0000;
const GREEN: u32 = 0xff00ff00;
const CLEAR: u32 = 0;

fn pixel(surface: &Surface, x: usize, y: usize) -> u32 {
    let data = surface.data().unwrap();
    let offset = y * surface.stride() + x * 4;
    u32::from_ne_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

fn channels(value: u32) -> [u32; 4] {
    [value >> 24, (value >> 16) & 0xff, (value >> 8) & 0xff, value & 0xff]
}

fn setup() -> (Surface, Context) {
    let surface = Surface::new(Format::Argb32, 10, 10).unwrap();
    let context = Context::new(&surface).unwrap();
    (surface, context)
}

#[test]
fn test_fill_rectangle() {
    let (surface, context) = setup();
    context.set_source_rgb(1.0, 0.0, 0.0);
    context.rectangle(2.0, 2.0, 4.0, 4.0);
    context.fill();
    assert_eq!(context.status(), Ok(()));
    assert!(!context.has_current_point().unwrap());

    assert_eq!(pixel(&surface, 3, 3), RED);
    assert_eq!(pixel(&surface, 2, 5), RED);
    assert_eq!(pixel(&surface, 0, 0), CLEAR);
    assert_eq!(pixel(&surface, 8, 8), CLEAR);

    context.release();
    context.release();
    surface.release();
    surface.release();
}

#[test]
fn test_fill_whole_surface() {
    let (surface, context) = setup();
    context.set_source_rgb(1.0, 0.0, 0.0);
    context.rectangle(0.0, 0.0, 10.0, 10.0);
    context.fill();
    assert_eq!(context.status(), Ok(()));
    for y in 0..10 {
        for x in 0..10 {
            assert_eq!(pixel(&surface, x, y), RED, "pixel ({x}, {y})");
        }
    }
}

#[test]
fn test_state_stack() {
    let (_surface, context) = setup();
    context.set_line_width(5.0);
    context.save().unwrap();
    context.set_line_width(10.0);
    context.set_line_cap(LineCap::Round);
    assert_eq!(context.save_depth(), 1);
    assert_eq!(context.line_width().unwrap(), 10.0);
    context.restore().unwrap();
    assert_eq!(context.line_width().unwrap(), 5.0);
    assert_eq!(context.line_cap().unwrap(), LineCap::Butt);
    assert_eq!(context.save_depth(), 0);

    assert!(matches!(context.restore(), Err(Error::InvalidArgument(_))));
    // The unbalanced restore never reached the library.
    assert_eq!(context.status(), Ok(()));
}

#[test]
fn test_nested_save_restore() {
    let (_surface, context) = setup();
    for depth in 1..=20 {
        context.set_line_width(depth as f64);
        context.save().unwrap();
    }
    assert_eq!(context.save_depth(), 20);
    for depth in (1..=20).rev() {
        context.restore().unwrap();
        assert_eq!(context.line_width().unwrap(), depth as f64);
    }
    assert_eq!(context.status(), Ok(()));
}

#[test]
fn test_attributes() {
    let (_surface, context) = setup();
    assert_eq!(context.line_width().unwrap(), 2.0);
    assert_eq!(context.line_join().unwrap(), LineJoin::Miter);
    assert_eq!(context.fill_rule().unwrap(), FillRule::Winding);

    context.set_line_width(-3.0);
    assert_eq!(context.line_width().unwrap(), 0.0);
    context.set_line_join(LineJoin::Bevel);
    context.set_fill_rule(FillRule::EvenOdd);
    assert_eq!(context.line_join().unwrap(), LineJoin::Bevel);
    assert_eq!(context.fill_rule().unwrap(), FillRule::EvenOdd);
}

#[test]
fn test_current_point_is_in_user_space() {
    let (_surface, context) = setup();
    assert_eq!(context.current_point().unwrap(), None);
    context.translate(10.0, 10.0);
    context.move_to(1.0, 2.0);
    assert_eq!(context.current_point().unwrap(), Some((1.0, 2.0)));
    assert_eq!(context.user_to_device(1.0, 2.0).unwrap(), (11.0, 12.0));
    assert_eq!(context.device_to_user(11.0, 12.0).unwrap(), (1.0, 2.0));

    context.rel_line_to(2.0, 0.0);
    assert_eq!(context.current_point().unwrap(), Some((3.0, 2.0)));
    context.new_path();
    assert!(!context.has_current_point().unwrap());

    context.line_to(4.0, 4.0);
    assert_eq!(context.current_point().unwrap(), Some((4.0, 4.0)));
}

#[test]
fn test_error_is_sticky() {
    let (surface, context) = setup();
    context.rel_line_to(1.0, 1.0);
    assert_eq!(context.status(), Err(Error::Status(Status::NoCurrentPoint)));

    context.set_source_rgb(1.0, 0.0, 0.0);
    context.paint();
    assert_eq!(context.status(), Err(Error::Status(Status::NoCurrentPoint)));
    assert_eq!(pixel(&surface, 5, 5), CLEAR);
}

#[test]
fn test_singular_matrix_sets_status() {
    let (_surface, context) = setup();
    let singular = Transform::scaling(0.0, 0.0).unwrap();
    context.set_matrix(&singular);
    assert_eq!(context.status(), Err(Error::Status(Status::InvalidMatrix)));
}

#[test]
fn test_transformed_fill() {
    let (surface, context) = setup();
    let transform = Transform::translation(5.0, 5.0).unwrap();
    context.transform(&transform);
    context.set_source_rgb(0.0, 1.0, 0.0);
    context.rectangle(0.0, 0.0, 2.0, 2.0);
    context.fill();
    assert_eq!(pixel(&surface, 5, 5), GREEN);
    assert_eq!(pixel(&surface, 1, 1), CLEAR);

    let matrix = context.matrix().unwrap().matrix().unwrap();
    assert_eq!((matrix.x0, matrix.y0), (5.0, 5.0));
    context.identity_matrix();
    assert_eq!(context.user_to_device(1.0, 1.0).unwrap(), (1.0, 1.0));
}

#[test]
fn test_stroke() {
    let (surface, context) = setup();
    context.set_source_rgb(1.0, 0.0, 0.0);
    context.set_line_width(2.0);
    context.move_to(0.0, 5.0);
    context.line_to(10.0, 5.0);
    context.stroke_preserve();
    assert!(context.has_current_point().unwrap());
    context.stroke();
    assert!(!context.has_current_point().unwrap());
    assert_eq!(context.status(), Ok(()));

    assert_eq!(pixel(&surface, 5, 4), RED);
    assert_eq!(pixel(&surface, 5, 5), RED);
    assert_eq!(pixel(&surface, 5, 2), CLEAR);
    assert_eq!(pixel(&surface, 5, 8), CLEAR);
}

#[test]
fn test_arc_fill() {
    let (surface, context) = setup();
    context.set_source_rgb(0.0, 1.0, 0.0);
    context.arc(5.0, 5.0, 3.0, 0.0, 2.0 * PI);
    assert!(context.has_current_point().unwrap());
    context.close_path();
    context.fill();
    assert_eq!(pixel(&surface, 5, 5), GREEN);
    assert_eq!(pixel(&surface, 0, 0), CLEAR);
}

#[test]
fn test_even_odd_fill() {
    let (surface, context) = setup();
    context.set_source_rgb(1.0, 0.0, 0.0);
    context.set_fill_rule(FillRule::EvenOdd);
    context.rectangle(0.0, 0.0, 10.0, 10.0);
    context.rectangle(3.0, 3.0, 4.0, 4.0);
    context.fill_preserve();
    assert!(context.has_current_point().unwrap());
    assert_eq!(pixel(&surface, 1, 1), RED);
    assert_eq!(pixel(&surface, 5, 5), CLEAR);
}

#[test]
fn test_paint_with_alpha() {
    let (surface, context) = setup();
    context.set_source_rgb(1.0, 0.0, 0.0);
    context.paint_with_alpha(0.5);
    assert_eq!(channels(pixel(&surface, 4, 4)), [0x80, 0x80, 0, 0]);
}

#[test]
fn test_source_pattern_is_copied() {
    let (surface, context) = setup();
    let pattern = Pattern::rgb(0.0, 1.0, 0.0).unwrap();
    context.set_source(&pattern);
    pattern.release();
    context.paint();
    assert_eq!(context.status(), Ok(()));
    assert_eq!(pixel(&surface, 9, 9), GREEN);
}

#[test]
fn test_linear_gradient_source() {
    let (surface, context) = setup();
    let gradient = Pattern::linear(0.0, 0.0, 10.0, 0.0).unwrap();
    gradient.add_color_stop_rgb(0.0, 1.0, 0.0, 0.0).unwrap();
    gradient.add_color_stop_rgb(1.0, 0.0, 0.0, 1.0).unwrap();
    context.set_source(&gradient);
    context.paint();

    let [a, r, _, b] = channels(pixel(&surface, 0, 5));
    assert_eq!(a, 0xff);
    assert!(r > b);
    let [a, r, _, b] = channels(pixel(&surface, 9, 5));
    assert_eq!(a, 0xff);
    assert!(b > r);
}

#[test]
fn test_surface_source() {
    let source = Surface::new(Format::Argb32, 4, 4).unwrap();
    let source_context = Context::new(&source).unwrap();
    source_context.set_source_rgb(0.0, 1.0, 0.0);
    source_context.paint();
    source_context.release();

    let (surface, context) = setup();
    context.set_source_surface(&source, 2.0, 2.0);
    context.paint();
    assert_eq!(context.status(), Ok(()));
    assert_eq!(pixel(&surface, 3, 3), GREEN);
    assert_eq!(pixel(&surface, 5, 5), GREEN);
    assert_eq!(pixel(&surface, 1, 1), CLEAR);
    assert_eq!(pixel(&surface, 7, 7), CLEAR);
}

#[test]
fn test_finished_target() {
    let (surface, context) = setup();
    surface.finish().unwrap();
    context.paint();
    assert_eq!(
        context.status(),
        Err(Error::Status(Status::SurfaceFinished))
    );
    assert!(matches!(
        Context::new(&surface),
        Err(Error::Status(Status::SurfaceFinished))
    ));
}

#[test]
fn test_released_pattern_source_sets_status() {
    let (surface, context) = setup();
    context.set_source_rgb(1.0, 0.0, 0.0);
    let green = Pattern::rgb(0.0, 1.0, 0.0).unwrap();
    green.release();

    context.set_source(&green);
    assert_eq!(context.status(), Err(Error::Status(Status::NullPointer)));
    context.paint();
    assert_eq!(pixel(&surface, 5, 5), CLEAR);
}

#[test]
fn test_released_surface_source_sets_status() {
    let (surface, context) = setup();
    let source = Surface::new(Format::Argb32, 4, 4).unwrap();
    source.release();

    context.set_source_surface(&source, 0.0, 0.0);
    assert_eq!(context.status(), Err(Error::Status(Status::NullPointer)));
    context.paint();
    assert_eq!(pixel(&surface, 1, 1), CLEAR);
}

#[test]
fn test_released_transform_sets_status() {
    let (_surface, context) = setup();
    let scaling = Transform::scaling(2.0, 2.0).unwrap();
    scaling.release();
    context.transform(&scaling);
    assert_eq!(context.status(), Err(Error::Status(Status::NullPointer)));

    let (_surface, context) = setup();
    context.set_matrix(&scaling);
    assert_eq!(context.status(), Err(Error::Status(Status::NullPointer)));
    assert_eq!(context.user_to_device(1.0, 1.0).unwrap(), (1.0, 1.0));
}
