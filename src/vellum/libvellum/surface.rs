// SPDX-License-Identifier: GPL-3.0-or-later
use crate::{
    guard::{status_from_io, status_guard},
    vl_format_t, vl_status_t, VL_FORMAT_A8, VL_FORMAT_ARGB32, VL_FORMAT_INVALID,
    VL_FORMAT_RGB24, VL_MAX_IMAGE_SIZE, VL_STATUS_INVALID_FORMAT, VL_STATUS_INVALID_SIZE,
    VL_STATUS_INVALID_STRING, VL_STATUS_NO_MEMORY, VL_STATUS_NULL_POINTER,
    VL_STATUS_READ_ERROR, VL_STATUS_SUCCESS, VL_STATUS_SURFACE_FINISHED,
    VL_STATUS_WRITE_ERROR,
};
use image::{ColorType, ImageError, ImageFormat, ImageReader};
use parking_lot::{Mutex, MutexGuard};
use std::{
    ffi::{c_char, c_int, c_uint, CStr},
    ptr::{self, NonNull},
    sync::atomic::{AtomicBool, AtomicI32, AtomicUsize, Ordering},
};
use tracing::{debug, warn};

/// Premultiplied RGBA, each channel in `[0, 1]`.
pub(crate) type Rgba = [f64; 4];

pub struct vl_surface_t {
    refcount: AtomicUsize,
    status: AtomicI32,
    finished: AtomicBool,
    format: vl_format_t,
    width: c_int,
    height: c_int,
    stride: c_int,
    pixels: Mutex<Vec<u8>>,
}

impl vl_surface_t {
    fn new_error(status: vl_status_t) -> *mut Self {
        Box::into_raw(Box::new(Self {
            refcount: AtomicUsize::new(1),
            status: AtomicI32::new(status),
            finished: AtomicBool::new(false),
            format: VL_FORMAT_INVALID,
            width: 0,
            height: 0,
            stride: 0,
            pixels: Mutex::new(Vec::new()),
        }))
    }

    fn new_image(format: vl_format_t, width: c_int, height: c_int) -> *mut Self {
        if !format_valid(format) {
            return Self::new_error(VL_STATUS_INVALID_FORMAT);
        }
        if !(0..=VL_MAX_IMAGE_SIZE).contains(&width) || !(0..=VL_MAX_IMAGE_SIZE).contains(&height)
        {
            return Self::new_error(VL_STATUS_INVALID_SIZE);
        }
        let stride = stride_for_width(format, width);
        let len = stride as usize * height as usize;
        let mut pixels = Vec::new();
        if pixels.try_reserve_exact(len).is_err() {
            return Self::new_error(VL_STATUS_NO_MEMORY);
        }
        pixels.resize(len, 0);
        Box::into_raw(Box::new(Self {
            refcount: AtomicUsize::new(1),
            status: AtomicI32::new(VL_STATUS_SUCCESS),
            finished: AtomicBool::new(false),
            format,
            width,
            height,
            stride,
            pixels: Mutex::new(pixels),
        }))
    }

    pub(crate) fn status(&self) -> vl_status_t {
        self.status.load(Ordering::Acquire)
    }

    fn set_error(&self, status: vl_status_t) {
        let _ = self.status.compare_exchange(
            VL_STATUS_SUCCESS,
            status,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }

    pub(crate) fn width(&self) -> c_int {
        self.width
    }

    pub(crate) fn height(&self) -> c_int {
        self.height
    }

    pub(crate) fn stride(&self) -> usize {
        self.stride as usize
    }

    pub(crate) fn lock_pixels(&self) -> MutexGuard<'_, Vec<u8>> {
        self.pixels.lock()
    }

    pub(crate) fn load(&self, pixels: &[u8], x: usize, y: usize) -> Rgba {
        load_pixel(self.format, pixels, y * self.stride() + pixel_offset(self.format, x))
    }

    pub(crate) fn store(&self, pixels: &mut [u8], x: usize, y: usize, color: Rgba) {
        let offset = y * self.stride() + pixel_offset(self.format, x);
        store_pixel(self.format, pixels, offset, color)
    }
}

/// Owned reference to a surface, held by contexts and patterns that draw
/// into or sample from it.
pub(crate) struct SurfaceRef {
    surface: NonNull<vl_surface_t>,
}

// The reference count is atomic and the pixels sit behind a mutex.
unsafe impl Send for SurfaceRef {}
unsafe impl Sync for SurfaceRef {}

impl SurfaceRef {
    /// Takes a new reference. Returns `None` for null.
    pub(crate) unsafe fn new_inc(surface: *mut vl_surface_t) -> Option<Self> {
        let surface = NonNull::new(unsafe { vl_surface_reference(surface) })?;
        Some(Self { surface })
    }

    pub(crate) fn as_ptr(&self) -> *mut vl_surface_t {
        self.surface.as_ptr()
    }
}

impl std::ops::Deref for SurfaceRef {
    type Target = vl_surface_t;

    fn deref(&self) -> &Self::Target {
        unsafe { self.surface.as_ref() }
    }
}

impl Clone for SurfaceRef {
    fn clone(&self) -> Self {
        unsafe { vl_surface_reference(self.as_ptr()) };
        Self {
            surface: self.surface,
        }
    }
}

impl Drop for SurfaceRef {
    fn drop(&mut self) {
        unsafe { vl_surface_destroy(self.as_ptr()) }
    }
}

fn format_valid(format: vl_format_t) -> bool {
    matches!(format, VL_FORMAT_ARGB32 | VL_FORMAT_RGB24 | VL_FORMAT_A8)
}

fn stride_for_width(format: vl_format_t, width: c_int) -> c_int {
    match format {
        VL_FORMAT_A8 => (width + 3) & !3,
        _ => width * 4,
    }
}

fn pixel_offset(format: vl_format_t, x: usize) -> usize {
    match format {
        VL_FORMAT_A8 => x,
        _ => x * 4,
    }
}

fn to_channel(value: f64) -> u32 {
    (value.clamp(0.0, 1.0) * 255.0 + 0.5) as u32
}

fn load_pixel(format: vl_format_t, pixels: &[u8], offset: usize) -> Rgba {
    match format {
        VL_FORMAT_A8 => [0.0, 0.0, 0.0, f64::from(pixels[offset]) / 255.0],
        _ => {
            let mut bytes = [0_u8; 4];
            bytes.copy_from_slice(&pixels[offset..offset + 4]);
            let value = u32::from_ne_bytes(bytes);
            let channel = |shift: u32| f64::from((value >> shift) & 0xff) / 255.0;
            let alpha = if format == VL_FORMAT_RGB24 {
                1.0
            } else {
                channel(24)
            };
            [channel(16), channel(8), channel(0), alpha]
        }
    }
}

fn store_pixel(format: vl_format_t, pixels: &mut [u8], offset: usize, color: Rgba) {
    match format {
        VL_FORMAT_A8 => pixels[offset] = to_channel(color[3]) as u8,
        _ => {
            let alpha = if format == VL_FORMAT_RGB24 {
                0xff
            } else {
                to_channel(color[3])
            };
            let value = (alpha << 24)
                | (to_channel(color[0]) << 16)
                | (to_channel(color[1]) << 8)
                | to_channel(color[2]);
            pixels[offset..offset + 4].copy_from_slice(&value.to_ne_bytes());
        }
    }
}

unsafe fn path_from_c<'a>(filename: *const c_char) -> Result<&'a str, vl_status_t> {
    if filename.is_null() {
        return Err(VL_STATUS_NULL_POINTER);
    }
    unsafe { CStr::from_ptr(filename) }
        .to_str()
        .map_err(|_| VL_STATUS_INVALID_STRING)
}

fn status_from_image_error(err: &ImageError, fallback: vl_status_t) -> vl_status_t {
    match err {
        ImageError::IoError(e) => status_from_io(e, fallback),
        _ => fallback,
    }
}

#[no_mangle]
pub extern "C" fn vl_image_surface_create(
    format: vl_format_t,
    width: c_int,
    height: c_int,
) -> *mut vl_surface_t {
    vl_surface_t::new_image(format, width, height)
}

/// Loads a PNG file into a new ARGB32 surface.
#[no_mangle]
pub unsafe extern "C" fn vl_image_surface_create_from_png(
    filename: *const c_char,
) -> *mut vl_surface_t {
    let path = match unsafe { path_from_c(filename) } {
        Ok(path) => path,
        Err(status) => return vl_surface_t::new_error(status),
    };

    let decoded = ImageReader::open(path)
        .map_err(ImageError::IoError)
        .and_then(|reader| reader.with_guessed_format().map_err(ImageError::IoError))
        .and_then(|reader| reader.decode());
    let img = match decoded {
        Ok(img) => img.to_rgba8(),
        Err(e) => {
            warn!("Error reading PNG from '{path}': {e}");
            return vl_surface_t::new_error(status_from_image_error(&e, VL_STATUS_READ_ERROR));
        }
    };

    let (width, height) = match (c_int::try_from(img.width()), c_int::try_from(img.height())) {
        (Ok(w), Ok(h)) => (w, h),
        _ => return vl_surface_t::new_error(VL_STATUS_INVALID_SIZE),
    };
    let surface = vl_surface_t::new_image(VL_FORMAT_ARGB32, width, height);
    let s = unsafe { &*surface };
    if s.status() != VL_STATUS_SUCCESS {
        return surface;
    }
    {
        let mut pixels = s.lock_pixels();
        for (x, y, px) in img.enumerate_pixels() {
            let alpha = f64::from(px[3]) / 255.0;
            let color = [
                f64::from(px[0]) / 255.0 * alpha,
                f64::from(px[1]) / 255.0 * alpha,
                f64::from(px[2]) / 255.0 * alpha,
                alpha,
            ];
            s.store(&mut pixels, x as usize, y as usize, color);
        }
    }
    debug!("Loaded {width}x{height} surface from '{path}'");
    surface
}

#[no_mangle]
pub unsafe extern "C" fn vl_surface_reference(surface: *mut vl_surface_t) -> *mut vl_surface_t {
    if let Some(s) = unsafe { surface.as_ref() } {
        s.refcount.fetch_add(1, Ordering::Relaxed);
    }
    surface
}

#[no_mangle]
pub unsafe extern "C" fn vl_surface_destroy(surface: *mut vl_surface_t) {
    let Some(s) = (unsafe { surface.as_ref() }) else {
        return;
    };
    if s.refcount.fetch_sub(1, Ordering::AcqRel) == 1 {
        drop(unsafe { Box::from_raw(surface) });
    }
}

#[no_mangle]
pub unsafe extern "C" fn vl_surface_get_reference_count(surface: *mut vl_surface_t) -> c_uint {
    unsafe { surface.as_ref() }.map_or(0, |s| s.refcount.load(Ordering::Acquire) as c_uint)
}

#[no_mangle]
pub unsafe extern "C" fn vl_surface_status(surface: *mut vl_surface_t) -> vl_status_t {
    unsafe { surface.as_ref() }.map_or(VL_STATUS_NULL_POINTER, vl_surface_t::status)
}

/// Completes pending drawing. Image surfaces draw immediately, so this only
/// synchronizes with concurrent drawing into the surface.
#[no_mangle]
pub unsafe extern "C" fn vl_surface_flush(surface: *mut vl_surface_t) {
    if let Some(s) = unsafe { surface.as_ref() } {
        drop(s.lock_pixels());
    }
}

#[no_mangle]
pub unsafe extern "C" fn vl_surface_mark_dirty(surface: *mut vl_surface_t) {
    if let Some(s) = unsafe { surface.as_ref() } {
        unsafe { vl_surface_mark_dirty_rectangle(surface, 0, 0, s.width, s.height) }
    }
}

#[no_mangle]
pub unsafe extern "C" fn vl_surface_mark_dirty_rectangle(
    surface: *mut vl_surface_t,
    _x: c_int,
    _y: c_int,
    _width: c_int,
    _height: c_int,
) {
    let Some(s) = (unsafe { surface.as_ref() }) else {
        return;
    };
    if s.status() != VL_STATUS_SUCCESS {
        return;
    }
    if s.is_finished() {
        s.set_error(VL_STATUS_SURFACE_FINISHED);
    }
}

/// Finishes the surface. Further drawing into it fails with
/// `VL_STATUS_SURFACE_FINISHED`.
#[no_mangle]
pub unsafe extern "C" fn vl_surface_finish(surface: *mut vl_surface_t) {
    if let Some(s) = unsafe { surface.as_ref() } {
        let _pixels = s.lock_pixels();
        s.finished.store(true, Ordering::Release);
    }
}

#[no_mangle]
pub unsafe extern "C" fn vl_image_surface_get_format(surface: *mut vl_surface_t) -> vl_format_t {
    unsafe { surface.as_ref() }.map_or(VL_FORMAT_INVALID, |s| s.format)
}

#[no_mangle]
pub unsafe extern "C" fn vl_image_surface_get_width(surface: *mut vl_surface_t) -> c_int {
    unsafe { surface.as_ref() }.map_or(0, |s| s.width)
}

#[no_mangle]
pub unsafe extern "C" fn vl_image_surface_get_height(surface: *mut vl_surface_t) -> c_int {
    unsafe { surface.as_ref() }.map_or(0, |s| s.height)
}

#[no_mangle]
pub unsafe extern "C" fn vl_image_surface_get_stride(surface: *mut vl_surface_t) -> c_int {
    unsafe { surface.as_ref() }.map_or(0, |s| s.stride)
}

/// Copies `stride * height` bytes of pixel data into `dst`.
#[no_mangle]
pub unsafe extern "C" fn vl_image_surface_copy_data(
    surface: *mut vl_surface_t,
    dst: *mut u8,
    len: usize,
) -> vl_status_t {
    let Some(s) = (unsafe { surface.as_ref() }) else {
        return VL_STATUS_NULL_POINTER;
    };
    if dst.is_null() {
        return VL_STATUS_NULL_POINTER;
    }
    let status = s.status();
    if status != VL_STATUS_SUCCESS {
        return status;
    }
    let pixels = s.lock_pixels();
    if len < pixels.len() {
        return VL_STATUS_INVALID_SIZE;
    }
    unsafe { ptr::copy_nonoverlapping(pixels.as_ptr(), dst, pixels.len()) };
    VL_STATUS_SUCCESS
}

/// Encodes the surface contents as PNG into `filename`.
#[no_mangle]
pub unsafe extern "C" fn vl_surface_write_to_png(
    surface: *mut vl_surface_t,
    filename: *const c_char,
) -> vl_status_t {
    let Some(s) = (unsafe { surface.as_ref() }) else {
        return VL_STATUS_NULL_POINTER;
    };
    let path = match unsafe { path_from_c(filename) } {
        Ok(path) => path,
        Err(status) => return status,
    };
    status_guard("vl_surface_write_to_png", || write_png(s, path))
}

fn write_png(s: &vl_surface_t, path: &str) -> vl_status_t {
    let status = s.status();
    if status != VL_STATUS_SUCCESS {
        return status;
    }
    if s.is_finished() {
        return VL_STATUS_SURFACE_FINISHED;
    }
    if s.width == 0 || s.height == 0 {
        return VL_STATUS_INVALID_SIZE;
    }

    let (width, height) = (s.width as usize, s.height as usize);
    let (color_type, channels) = match s.format {
        VL_FORMAT_ARGB32 => (ColorType::Rgba8, 4),
        VL_FORMAT_RGB24 => (ColorType::Rgb8, 3),
        _ => (ColorType::L8, 1),
    };
    let mut buffer = Vec::with_capacity(width * height * channels);
    {
        let pixels = s.lock_pixels();
        for y in 0..height {
            for x in 0..width {
                let [r, g, b, a] = s.load(&pixels, x, y);
                let unpremultiply = |c: f64| if a > 0.0 { c / a } else { 0.0 };
                match channels {
                    4 => buffer.extend([
                        to_channel(unpremultiply(r)) as u8,
                        to_channel(unpremultiply(g)) as u8,
                        to_channel(unpremultiply(b)) as u8,
                        to_channel(a) as u8,
                    ]),
                    3 => buffer.extend([
                        to_channel(r) as u8,
                        to_channel(g) as u8,
                        to_channel(b) as u8,
                    ]),
                    _ => buffer.push(to_channel(a) as u8),
                }
            }
        }
    }

    match image::save_buffer_with_format(
        path,
        &buffer,
        width as u32,
        height as u32,
        color_type,
        ImageFormat::Png,
    ) {
        Ok(()) => {
            debug!("Wrote {width}x{height} PNG to '{path}'");
            VL_STATUS_SUCCESS
        }
        Err(e) => {
            warn!("Error writing PNG to '{path}': {e}");
            status_from_image_error(&e, VL_STATUS_WRITE_ERROR)
        }
    }
}
