// SPDX-License-Identifier: GPL-3.0-or-later
use anyhow::Result;
use std::fs;
use vellum::{Context, Error, Format, Status, Surface};

#[test]
fn test_metadata() {
    let surface = Surface::new(Format::Argb32, 7, 3).unwrap();
    assert_eq!(surface.format(), Format::Argb32);
    assert_eq!((surface.width(), surface.height()), (7, 3));
    assert_eq!(surface.stride(), 28);
    assert_eq!(surface.data().unwrap().len(), 28 * 3);
    assert_eq!(surface.status(), Ok(()));

    let mask = Surface::new(Format::A8, 5, 2).unwrap();
    assert_eq!(mask.stride(), 8);
}

#[test]
fn test_invalid_size() {
    assert!(matches!(
        Surface::new(Format::A8, 32768, 1),
        Err(Error::Status(Status::InvalidSize))
    ));
    assert!(Surface::new(Format::A8, 32767, 1).is_ok());
}

#[test]
fn test_mark_dirty_rectangle() {
    let surface = Surface::new(Format::Rgb24, 4, 4).unwrap();
    surface.flush().unwrap();
    surface.mark_dirty_rectangle(1, 1, 2, 2).unwrap();
    assert!(matches!(
        surface.mark_dirty_rectangle(0, 0, -1, 2),
        Err(Error::InvalidArgument(_))
    ));
    assert_eq!(surface.status(), Ok(()));
}

#[test]
fn test_png_round_trip() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("square.png");

    let surface = Surface::new(Format::Argb32, 10, 10)?;
    let context = Context::new(&surface)?;
    context.set_source_rgb(1.0, 0.0, 0.0);
    context.rectangle(2.0, 2.0, 4.0, 4.0);
    context.fill();
    context.status()?;
    surface.write_to_png(&path)?;

    let loaded = Surface::from_png(&path)?;
    assert_eq!(loaded.format(), Format::Argb32);
    assert_eq!((loaded.width(), loaded.height()), (10, 10));
    assert_eq!(loaded.data()?, surface.data()?);
    Ok(())
}

#[test]
fn test_write_to_empty_path() {
    let surface = Surface::new(Format::Argb32, 1, 1).unwrap();
    assert!(matches!(
        surface.write_to_png(""),
        Err(Error::InvalidArgument(_))
    ));
}

#[test]
fn test_write_to_missing_directory() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("does").join("not").join("exist.png");
    let surface = Surface::new(Format::Argb32, 1, 1)?;
    assert_eq!(
        surface.write_to_png(&path),
        Err(Error::Status(Status::WriteError))
    );
    assert!(!path.exists());
    Ok(())
}

#[test]
fn test_path_with_nul_is_truncated() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let truncated = dir.path().join("out.png");
    let requested = format!("{}\0ignored.png", truncated.display());

    let surface = Surface::new(Format::Rgb24, 2, 2)?;
    surface.write_to_png(&requested)?;
    assert!(truncated.exists());
    assert_eq!(fs::read_dir(dir.path())?.count(), 1);
    Ok(())
}

#[test]
fn test_write_finished_surface() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let surface = Surface::new(Format::Argb32, 1, 1)?;
    surface.finish()?;
    assert_eq!(
        surface.write_to_png(dir.path().join("finished.png")),
        Err(Error::Status(Status::SurfaceFinished))
    );
    Ok(())
}

#[test]
fn test_load_missing_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    assert!(matches!(
        Surface::from_png(dir.path().join("missing.png")),
        Err(Error::Status(Status::FileNotFound))
    ));
    Ok(())
}

#[test]
fn test_load_garbage() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("garbage.png");
    fs::write(&path, b"this is not an image")?;
    assert!(matches!(
        Surface::from_png(&path),
        Err(Error::Status(Status::ReadError))
    ));
    Ok(())
}
