// SPDX-License-Identifier: GPL-3.0-or-later
use vellum::{
    Context, Error, Extend, FillRule, Filter, Format, LineCap, LineJoin, Matrix, Pattern,
    PatternKind, Surface, Transform,
};

#[test]
fn test_release_is_idempotent() {
    let surface = Surface::new(Format::Argb32, 4, 4).unwrap();
    let context = Context::new(&surface).unwrap();
    let pattern = Pattern::linear(0.0, 0.0, 4.0, 0.0).unwrap();
    let transform = Transform::identity().unwrap();

    for _ in 0..3 {
        context.release();
        pattern.release();
        transform.release();
        surface.release();
    }

    assert!(context.is_released());
    assert!(pattern.is_released());
    assert!(transform.is_released());
    assert!(surface.is_released());
}

#[test]
fn test_surface_operations_after_release() {
    let surface = Surface::new(Format::Rgb24, 3, 2).unwrap();
    surface.release();

    assert_eq!(surface.status(), Err(Error::NullHandle));
    assert_eq!(surface.flush(), Err(Error::NullHandle));
    assert_eq!(surface.mark_dirty(), Err(Error::NullHandle));
    assert_eq!(
        surface.mark_dirty_rectangle(0, 0, 1, 1),
        Err(Error::NullHandle)
    );
    assert_eq!(surface.finish(), Err(Error::NullHandle));
    assert_eq!(surface.data(), Err(Error::NullHandle));
    assert_eq!(surface.reference_count(), Err(Error::NullHandle));
    assert_eq!(surface.write_to_png("unused.png"), Err(Error::NullHandle));
    assert!(Context::new(&surface).is_err());
    assert!(Pattern::for_surface(&surface).is_err());

    // Cached metadata survives the release.
    assert_eq!(surface.format(), Format::Rgb24);
    assert_eq!(surface.width(), 3);
    assert_eq!(surface.height(), 2);
    assert_eq!(surface.stride(), 12);
}

#[test]
fn test_context_operations_after_release() {
    let surface = Surface::new(Format::Argb32, 4, 4).unwrap();
    let context = Context::new(&surface).unwrap();
    let pattern = Pattern::rgb(1.0, 0.0, 0.0).unwrap();
    let transform = Transform::scaling(2.0, 2.0).unwrap();
    context.release();

    context.set_source(&pattern);
    context.set_source_rgb(0.0, 1.0, 0.0);
    context.set_source_rgba(0.0, 1.0, 0.0, 0.5);
    context.set_source_surface(&surface, 0.0, 0.0);
    context.set_line_width(3.0);
    context.set_line_cap(LineCap::Round);
    context.set_line_join(LineJoin::Bevel);
    context.set_fill_rule(FillRule::EvenOdd);
    context.translate(1.0, 1.0);
    context.scale(2.0, 2.0);
    context.rotate(1.0);
    context.transform(&transform);
    context.set_matrix(&transform);
    context.identity_matrix();
    context.new_path();
    context.move_to(0.0, 0.0);
    context.line_to(1.0, 1.0);
    context.curve_to(1.0, 2.0, 2.0, 3.0, 3.0, 3.0);
    context.rel_move_to(1.0, 0.0);
    context.rel_line_to(0.0, 1.0);
    context.rectangle(0.0, 0.0, 2.0, 2.0);
    context.arc(2.0, 2.0, 1.0, 0.0, 1.0);
    context.arc_negative(2.0, 2.0, 1.0, 1.0, 0.0);
    context.close_path();
    context.fill();
    context.fill_preserve();
    context.stroke();
    context.stroke_preserve();
    context.paint();
    context.paint_with_alpha(0.5);

    assert_eq!(context.status(), Err(Error::NullHandle));
    assert_eq!(context.save(), Err(Error::NullHandle));
    assert_eq!(context.restore(), Err(Error::NullHandle));
    assert_eq!(context.save_depth(), 0);
    assert_eq!(context.line_width(), Err(Error::NullHandle));
    assert_eq!(context.line_cap(), Err(Error::NullHandle));
    assert_eq!(context.line_join(), Err(Error::NullHandle));
    assert_eq!(context.fill_rule(), Err(Error::NullHandle));
    assert_eq!(context.has_current_point(), Err(Error::NullHandle));
    assert_eq!(context.current_point(), Err(Error::NullHandle));
    assert_eq!(context.user_to_device(1.0, 1.0), Err(Error::NullHandle));
    assert_eq!(context.device_to_user(1.0, 1.0), Err(Error::NullHandle));
    assert!(matches!(context.matrix(), Err(Error::NullHandle)));
    assert!(!context.target_released());

    // The surface and operands are untouched by anything above.
    assert!(surface.data().unwrap().iter().all(|&b| b == 0));
    assert_eq!(surface.reference_count().unwrap(), 1);
    assert_eq!(pattern.status(), Ok(()));
    assert_eq!(transform.matrix().unwrap().xx, 2.0);
}

#[test]
fn test_pattern_operations_after_release() {
    let pattern = Pattern::radial(0.0, 0.0, 1.0, 0.0, 0.0, 2.0).unwrap();
    let transform = Transform::identity().unwrap();
    pattern.release();

    assert_eq!(pattern.kind(), PatternKind::Radial);
    assert_eq!(pattern.status(), Err(Error::NullHandle));
    assert_eq!(
        pattern.add_color_stop_rgb(0.0, 1.0, 1.0, 1.0),
        Err(Error::NullHandle)
    );
    assert_eq!(
        pattern.add_color_stop_rgba(0.0, 1.0, 1.0, 1.0, 0.5),
        Err(Error::NullHandle)
    );
    assert_eq!(pattern.color_stop_count(), Err(Error::NullHandle));
    assert_eq!(pattern.color_stop_rgba(0), Err(Error::NullHandle));
    assert_eq!(pattern.solid_rgba(), Err(Error::NullHandle));
    assert_eq!(pattern.linear_points(), Err(Error::NullHandle));
    assert_eq!(pattern.radial_circles(), Err(Error::NullHandle));
    assert_eq!(pattern.set_matrix(&transform), Err(Error::NullHandle));
    assert!(matches!(pattern.matrix(), Err(Error::NullHandle)));
    assert_eq!(pattern.set_extend(Extend::Repeat), Err(Error::NullHandle));
    assert_eq!(pattern.extend(), Err(Error::NullHandle));
    assert_eq!(pattern.set_filter(Filter::Nearest), Err(Error::NullHandle));
    assert_eq!(pattern.filter(), Err(Error::NullHandle));
    assert!(!pattern.source_released());

    assert_eq!(transform.matrix(), Ok(Matrix::IDENTITY));
}

#[test]
fn test_transform_operations_after_release() {
    let transform = Transform::translation(1.0, 2.0).unwrap();
    let other = Transform::identity().unwrap();
    transform.release();

    assert_eq!(transform.matrix(), Err(Error::NullHandle));
    assert_eq!(
        transform.set_matrix(Matrix::IDENTITY),
        Err(Error::NullHandle)
    );
    assert_eq!(transform.translate(1.0, 1.0), Err(Error::NullHandle));
    assert_eq!(transform.scale(2.0, 2.0), Err(Error::NullHandle));
    assert_eq!(transform.rotate(1.0), Err(Error::NullHandle));
    assert_eq!(transform.invert(), Err(Error::NullHandle));
    assert!(matches!(transform.inverse(), Err(Error::NullHandle)));
    assert_eq!(transform.transform_point(1.0, 1.0), Err(Error::NullHandle));
    assert_eq!(
        transform.transform_distance(1.0, 1.0),
        Err(Error::NullHandle)
    );
    assert!(matches!(transform.multiply(&other), Err(Error::NullHandle)));
    assert!(matches!(other.multiply(&transform), Err(Error::NullHandle)));
    assert_eq!(transform.multiply_assign(&other), Err(Error::NullHandle));
    assert_eq!(other.multiply_assign(&transform), Err(Error::NullHandle));

    assert_eq!(other.matrix(), Ok(Matrix::IDENTITY));
}

#[test]
fn test_drop_after_release_does_not_destroy_twice() {
    let surface = Surface::new(Format::Argb32, 2, 2).unwrap();
    assert_eq!(surface.reference_count().unwrap(), 1);

    let context = Context::new(&surface).unwrap();
    let pattern = Pattern::for_surface(&surface).unwrap();
    assert_eq!(surface.reference_count().unwrap(), 3);

    context.release();
    assert_eq!(surface.reference_count().unwrap(), 2);
    drop(context);
    assert_eq!(surface.reference_count().unwrap(), 2);

    drop(pattern);
    assert_eq!(surface.reference_count().unwrap(), 1);
}

#[test]
fn test_released_target_is_reported() {
    let surface = Surface::new(Format::Argb32, 2, 2).unwrap();
    let context = Context::new(&surface).unwrap();
    let pattern = Pattern::for_surface(&surface).unwrap();
    assert!(!context.target_released());
    assert!(!pattern.source_released());

    surface.release();
    assert!(context.target_released());
    assert!(pattern.source_released());

    // The library still holds the pixels, so drawing stays safe.
    context.set_source_rgb(1.0, 1.0, 1.0);
    context.paint();
    assert_eq!(context.status(), Ok(()));
}

#[test]
fn test_failed_construction() {
    assert!(matches!(
        Surface::new(Format::Argb32, 40000, 1),
        Err(Error::Status(vellum::Status::InvalidSize))
    ));
    assert!(matches!(
        Pattern::radial(0.0, 0.0, -1.0, 0.0, 0.0, 1.0),
        Err(Error::Status(vellum::Status::InvalidSize))
    ));
}
