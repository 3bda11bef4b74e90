// SPDX-License-Identifier: GPL-3.0-or-later
use std::{sync::Arc, thread};
use vellum::{Context, Error, Format, Pattern, Surface, Transform};

const READERS: usize = 4;
const WRITERS: usize = 4;
const ROUNDS: usize = 200;

#[test]
fn test_pattern_readers_writers_and_release() {
    let pattern = Arc::new(Pattern::linear(0.0, 0.0, 100.0, 0.0).unwrap());
    let mut threads = Vec::new();

    for i in 0..WRITERS {
        let pattern = Arc::clone(&pattern);
        threads.push(thread::spawn(move || {
            for j in 0..ROUNDS {
                let offset = (i * ROUNDS + j) as f64 / (WRITERS * ROUNDS) as f64;
                match pattern.add_color_stop_rgb(offset, 1.0, 0.0, 0.0) {
                    Ok(()) | Err(Error::NullHandle) => (),
                    Err(err) => panic!("unexpected error {err}"),
                }
            }
        }));
    }

    for _ in 0..READERS {
        let pattern = Arc::clone(&pattern);
        threads.push(thread::spawn(move || {
            for _ in 0..ROUNDS {
                match pattern.color_stop_count() {
                    Ok(count) => {
                        if count > 0 {
                            let last = pattern.color_stop_rgba(count - 1);
                            assert!(matches!(last, Ok(_) | Err(Error::NullHandle)));
                        }
                    }
                    Err(Error::NullHandle) => (),
                    Err(err) => panic!("unexpected error {err}"),
                }
            }
        }));
    }

    let releaser = Arc::clone(&pattern);
    threads.push(thread::spawn(move || {
        thread::yield_now();
        releaser.release();
        releaser.release();
    }));

    for thread in threads {
        thread.join().unwrap();
    }
    assert!(pattern.is_released());
    assert_eq!(pattern.color_stop_count(), Err(Error::NullHandle));
}

#[test]
fn test_shared_context_serializes_drawing() {
    let surface = Arc::new(Surface::new(Format::Argb32, 32, 32).unwrap());
    let context = Arc::new(Context::new(&surface).unwrap());
    // Saved states are shared between threads, so all of them use one source.
    context.set_source_rgb(0.0, 0.0, 1.0);
    let threads: Vec<_> = (0..WRITERS)
        .map(|i| {
            let context = Arc::clone(&context);
            thread::spawn(move || {
                for _ in 0..ROUNDS / 10 {
                    context.save().unwrap();
                    context.set_source_rgb(0.0, 0.0, 1.0);
                    context.rectangle(i as f64 * 8.0, 0.0, 8.0, 32.0);
                    context.fill();
                    context.restore().unwrap();
                }
            })
        })
        .collect();

    let reader = {
        let surface = Arc::clone(&surface);
        thread::spawn(move || {
            for _ in 0..ROUNDS / 10 {
                let data = surface.data().unwrap();
                assert_eq!(data.len(), surface.stride() * 32);
            }
        })
    };

    for thread in threads {
        thread.join().unwrap();
    }
    reader.join().unwrap();

    assert_eq!(context.status(), Ok(()));
    assert_eq!(context.save_depth(), 0);
    let data = surface.data().unwrap();
    for px in data.chunks_exact(4) {
        assert_eq!(u32::from_ne_bytes([px[0], px[1], px[2], px[3]]), 0xff0000ff);
    }
}

#[test]
fn test_cross_object_locking_in_both_directions() {
    let a = Arc::new(Transform::scaling(2.0, 2.0).unwrap());
    let b = Arc::new(Transform::translation(1.0, 1.0).unwrap());
    let threads: Vec<_> = (0..WRITERS)
        .map(|i| {
            let (a, b) = (Arc::clone(&a), Arc::clone(&b));
            thread::spawn(move || {
                for _ in 0..ROUNDS {
                    let (first, second) = if i % 2 == 0 { (&a, &b) } else { (&b, &a) };
                    first.multiply(second).unwrap();
                    first.set_matrix(second.matrix().unwrap()).unwrap();
                }
            })
        })
        .collect();
    for thread in threads {
        thread.join().unwrap();
    }
}

#[test]
fn test_pattern_used_while_surface_is_drawn() {
    let source = Arc::new(Surface::new(Format::Argb32, 8, 8).unwrap());
    let pattern = Arc::new(Pattern::for_surface(&source).unwrap());
    let painter = {
        let source = Arc::clone(&source);
        thread::spawn(move || {
            let context = Context::new(&source).unwrap();
            for _ in 0..ROUNDS / 10 {
                context.set_source_rgb(0.0, 1.0, 0.0);
                context.paint();
            }
            context.status()
        })
    };
    let users: Vec<_> = (0..READERS)
        .map(|_| {
            let pattern = Arc::clone(&pattern);
            thread::spawn(move || {
                let target = Surface::new(Format::Argb32, 8, 8).unwrap();
                let context = Context::new(&target).unwrap();
                for _ in 0..ROUNDS / 10 {
                    context.set_source(&pattern);
                    context.paint();
                }
                context.status()
            })
        })
        .collect();

    assert_eq!(painter.join().unwrap(), Ok(()));
    for user in users {
        assert_eq!(user.join().unwrap(), Ok(()));
    }
}
