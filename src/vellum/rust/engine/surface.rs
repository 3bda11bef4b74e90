// SPDX-License-Identifier: GPL-3.0-or-later
use super::Format;
use crate::{
    common::path_to_cstring, vl_image_surface_copy_data, vl_image_surface_create,
    vl_image_surface_create_from_png, vl_image_surface_get_format, vl_image_surface_get_height,
    vl_image_surface_get_stride, vl_image_surface_get_width, vl_surface_destroy,
    vl_surface_finish, vl_surface_flush, vl_surface_get_reference_count, vl_surface_mark_dirty,
    vl_surface_mark_dirty_rectangle, vl_surface_status, vl_surface_t, vl_surface_write_to_png,
    Error, Foreign, ForeignHandle, Liveness, Result, Status, VL_MAX_IMAGE_SIZE,
};
use std::path::Path;
use tracing::warn;

pub struct ForeignSurface;

impl Foreign for ForeignSurface {
    type Raw = vl_surface_t;

    const NAME: &'static str = "surface";
    const LOCK_RANK: u8 = 2;

    unsafe fn destroy(raw: *mut vl_surface_t) {
        unsafe { vl_surface_destroy(raw) }
    }
}

/// Image surface in memory, the target of drawing.
pub struct Surface {
    handle: ForeignHandle<ForeignSurface>,
    format: Format,
    width: u32,
    height: u32,
    stride: usize,
}

impl Surface {
    pub fn new(format: Format, width: u32, height: u32) -> Result<Self> {
        let max = VL_MAX_IMAGE_SIZE as u32;
        if width > max || height > max {
            return Err(Error::Status(Status::InvalidSize));
        }
        let raw = vl_image_surface_create(format.to_raw(), width as i32, height as i32);
        Self::adopt(raw)
    }

    /// Loads a PNG file into a new ARGB32 surface.
    pub fn from_png(path: impl AsRef<Path>) -> Result<Self> {
        let cpath = path_to_cstring(path.as_ref())?;
        let raw = unsafe { vl_image_surface_create_from_png(cpath.as_ptr()) };
        Self::adopt(raw)
    }

    fn adopt(raw: *mut vl_surface_t) -> Result<Self> {
        let handle =
            unsafe { ForeignHandle::<ForeignSurface>::adopt(raw, |s| vl_surface_status(s))? };
        let (format, width, height, stride) = handle.with_read(|s| unsafe {
            (
                vl_image_surface_get_format(s),
                vl_image_surface_get_width(s),
                vl_image_surface_get_height(s),
                vl_image_surface_get_stride(s),
            )
        })?;
        Ok(Self {
            handle,
            format: Format::try_from(format).map_err(|_| Error::Status(Status::InvalidFormat))?,
            width: width as u32,
            height: height as u32,
            stride: stride as usize,
        })
    }

    pub(crate) fn handle(&self) -> &ForeignHandle<ForeignSurface> {
        &self.handle
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row of pixel data.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn status(&self) -> Result<()> {
        Status::check(self.handle.with_read(|s| unsafe { vl_surface_status(s) })?)
    }

    /// Number of references the library holds, including contexts and
    /// patterns using this surface.
    pub fn reference_count(&self) -> Result<u32> {
        self.handle
            .with_read(|s| unsafe { vl_surface_get_reference_count(s) })
    }

    pub fn flush(&self) -> Result<()> {
        self.handle.with_write(|s| unsafe { vl_surface_flush(s) })
    }

    pub fn mark_dirty(&self) -> Result<()> {
        self.handle
            .with_write(|s| unsafe { vl_surface_mark_dirty(s) })
    }

    pub fn mark_dirty_rectangle(&self, x: i32, y: i32, width: i32, height: i32) -> Result<()> {
        if width < 0 || height < 0 {
            return Err(Error::invalid_argument(format!(
                "negative dirty rectangle size {width}x{height}"
            )));
        }
        self.handle
            .with_write(|s| unsafe { vl_surface_mark_dirty_rectangle(s, x, y, width, height) })
    }

    /// Finishes the surface. Drawing into it afterwards fails with
    /// `Status::SurfaceFinished`.
    pub fn finish(&self) -> Result<()> {
        self.handle.with_write(|s| unsafe { vl_surface_finish(s) })
    }

    pub fn write_to_png(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let cpath = path_to_cstring(path)?;
        let status = self
            .handle
            .with_read(|s| unsafe { vl_surface_write_to_png(s, cpath.as_ptr()) })?;
        Status::check(status).map_err(|err| {
            warn!("Writing surface to {path:?} failed: {err}");
            err
        })
    }

    /// Copy of the pixel data, `stride * height` bytes.
    pub fn data(&self) -> Result<Vec<u8>> {
        let mut data = vec![0u8; self.stride * self.height as usize];
        let status = self.handle.with_read(|s| unsafe {
            vl_image_surface_copy_data(s, data.as_mut_ptr(), data.len())
        })?;
        Status::check(status)?;
        Ok(data)
    }

    pub fn release(&self) {
        self.handle.release();
    }

    pub fn is_released(&self) -> bool {
        self.handle.is_released()
    }

    pub(crate) fn liveness(&self) -> Liveness {
        self.handle.liveness()
    }
}
