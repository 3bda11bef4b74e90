// SPDX-License-Identifier: GPL-3.0-or-later
use std::f64::consts::FRAC_PI_2;
use vellum::{Error, Matrix, Transform};

fn assert_close((x, y): (f64, f64), (ex, ey): (f64, f64)) {
    assert!(
        (x - ex).abs() < 1e-9 && (y - ey).abs() < 1e-9,
        "({x}, {y}) != ({ex}, {ey})"
    );
}

#[test]
fn test_identity() {
    let identity = Transform::identity().unwrap();
    assert_eq!(identity.matrix().unwrap(), Matrix::IDENTITY);
    assert_eq!(identity.transform_point(3.5, -2.0).unwrap(), (3.5, -2.0));
    assert_eq!(identity.transform_point(10.0, 20.0).unwrap(), (10.0, 20.0));
}

#[test]
fn test_translate_and_scale() {
    let translation = Transform::translation(10.0, 20.0).unwrap();
    assert_eq!(translation.transform_point(1.0, 2.0).unwrap(), (11.0, 22.0));
    assert_eq!(
        translation.transform_distance(1.0, 2.0).unwrap(),
        (1.0, 2.0)
    );

    let scaling = Transform::scaling(2.0, 3.0).unwrap();
    assert_eq!(scaling.transform_point(1.0, 1.0).unwrap(), (2.0, 3.0));
    assert_eq!(scaling.transform_distance(1.0, 1.0).unwrap(), (2.0, 3.0));
}

#[test]
fn test_in_place_operations_apply_first() {
    let transform = Transform::translation(10.0, 0.0).unwrap();
    transform.scale(2.0, 2.0).unwrap();
    // Scale happens before the existing translation.
    assert_eq!(transform.transform_point(1.0, 1.0).unwrap(), (12.0, 2.0));

    let transform = Transform::identity().unwrap();
    transform.rotate(FRAC_PI_2).unwrap();
    transform.translate(1.0, 0.0).unwrap();
    assert_close(transform.transform_point(0.0, 0.0).unwrap(), (0.0, 1.0));
}

#[test]
fn test_inverse() {
    let scaling = Transform::scaling(4.0, 0.5).unwrap();
    let inverse = scaling.inverse().unwrap();
    assert_eq!(inverse.transform_point(4.0, 0.5).unwrap(), (1.0, 1.0));

    scaling.invert().unwrap();
    assert_eq!(scaling.matrix().unwrap(), inverse.matrix().unwrap());

    let inverse = Transform::scaling(2.0, 3.0).unwrap().inverse().unwrap();
    assert_close(inverse.transform_point(1.0, 1.0).unwrap(), (0.5, 1.0 / 3.0));
}

#[test]
fn test_singular_inverse() {
    let singular = Transform::new(1.0, 2.0, 2.0, 4.0, 0.0, 0.0).unwrap();
    assert!(matches!(singular.inverse(), Err(Error::NotInvertible)));
    assert_eq!(singular.invert(), Err(Error::NotInvertible));
    assert_eq!(
        singular.matrix().unwrap(),
        Matrix {
            xx: 1.0,
            yx: 2.0,
            xy: 2.0,
            yy: 4.0,
            x0: 0.0,
            y0: 0.0,
        }
    );

    let zero = Transform::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0).unwrap();
    assert!(matches!(zero.inverse(), Err(Error::NotInvertible)));
    assert_eq!(zero.invert(), Err(Error::NotInvertible));

    let degenerate = Transform::scaling(f64::INFINITY, 1.0).unwrap();
    assert_eq!(degenerate.invert(), Err(Error::NotInvertible));
}

#[test]
fn test_composition_order() {
    let scale = Transform::scaling(2.0, 2.0).unwrap();
    let translate = Transform::translation(10.0, 0.0).unwrap();

    let scale_then_translate = scale.multiply(&translate).unwrap();
    assert_eq!(
        scale_then_translate.transform_point(1.0, 1.0).unwrap(),
        (12.0, 2.0)
    );

    let translate_then_scale = translate.multiply(&scale).unwrap();
    assert_eq!(
        translate_then_scale.transform_point(1.0, 1.0).unwrap(),
        (22.0, 2.0)
    );

    scale.multiply_assign(&translate).unwrap();
    assert_eq!(
        scale.matrix().unwrap(),
        scale_then_translate.matrix().unwrap()
    );
}

#[test]
fn test_multiply_with_itself() {
    let transform = Transform::scaling(3.0, 3.0).unwrap();
    let squared = transform.multiply(&transform).unwrap();
    assert_eq!(squared.transform_distance(1.0, 1.0).unwrap(), (9.0, 9.0));
    transform.multiply_assign(&transform).unwrap();
    assert_eq!(transform.matrix().unwrap(), squared.matrix().unwrap());
}
