//! Bitmap buffers, reference-counted handles, and allocation.
//!
//! A [`Bitmap`] is a plain RGBA8 pixel buffer. Postprocessors never hand
//! bitmaps around directly; they exchange [`BitmapRef`] handles, which are
//! reference-counted owners with explicit close semantics. The underlying
//! bitmap is freed exactly when the last owning handle is released.
//!
//! New bitmaps enter reference-counted management through a
//! [`BitmapAllocator`], which is passed through a postprocessor chain
//! unmodified. Keeping allocation behind one capability makes it possible
//! to instrument creation and release (the leak-freedom tests do exactly
//! that with a tracking allocator).

use std::sync::Arc;

use crate::postprocessor::PostprocessError;

/// Bytes per RGBA8 pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Upper bound on bitmap width and height accepted by the stock allocator.
///
/// Matches common GPU texture limits; anything larger is almost certainly
/// a corrupted dimension rather than a real image.
pub const MAX_BITMAP_DIMENSION: u32 = 16_384;

/// A decoded bitmap with RGBA pixel data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGBA pixel data in row-major order (4 bytes per pixel).
    /// Length should be width * height * 4.
    pub pixels: Vec<u8>,
}

impl Bitmap {
    /// Create a zero-filled (transparent black) bitmap of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u8; width as usize * height as usize * BYTES_PER_PIXEL],
        }
    }

    /// Create a bitmap from the given dimensions and pixel data.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * BYTES_PER_PIXEL,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a bitmap from an `image::RgbaImage`.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let pixels = img.into_raw();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Convert to an `image::RgbaImage` for further processing.
    ///
    /// Returns `None` if the pixel buffer length does not match the
    /// dimensions.
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// Size of the pixel buffer in bytes.
    pub fn byte_size(&self) -> usize {
        self.pixels.len()
    }

    /// Check if this is an empty/invalid bitmap.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }

    /// Whether the pixel buffer length matches the dimensions.
    pub fn is_consistent(&self) -> bool {
        self.pixels.len() == self.width as usize * self.height as usize * BYTES_PER_PIXEL
    }
}

/// A reference-counted owning handle to an immutable [`Bitmap`].
///
/// Cloning produces a second independent owning reference (refcount +1);
/// every clone must be released, either explicitly with [`close`] or
/// implicitly by dropping. The underlying bitmap is freed when the last
/// owner releases.
///
/// Dropping doubles as the guaranteed-release path: a handle that goes out
/// of scope mid-error is released without any caller cooperation, so code
/// that propagates failures with `?` never leaks an in-flight bitmap.
///
/// [`close`]: BitmapRef::close
#[derive(Debug, Clone)]
pub struct BitmapRef {
    inner: Option<Arc<Bitmap>>,
}

impl BitmapRef {
    /// Wrap a bitmap into its first owning handle.
    pub fn new(bitmap: Bitmap) -> Self {
        Self {
            inner: Some(Arc::new(bitmap)),
        }
    }

    /// Read access to the underlying bitmap, or `None` once closed.
    pub fn get(&self) -> Option<&Bitmap> {
        self.inner.as_deref()
    }

    /// Release this handle's ownership.
    ///
    /// Idempotent: closing an already-closed handle is a no-op and never
    /// double-decrements the reference count. Other clones of the same
    /// handle stay valid.
    pub fn close(&mut self) {
        self.inner = None;
    }

    /// Whether this handle still owns a bitmap.
    pub fn is_valid(&self) -> bool {
        self.inner.is_some()
    }

    /// Number of live owning handles to the underlying bitmap, or 0 once
    /// this handle is closed. Diagnostic; used by the leak-freedom tests.
    pub fn ref_count(&self) -> usize {
        self.inner.as_ref().map_or(0, Arc::strong_count)
    }

    /// Whether two handles own the same underlying bitmap.
    ///
    /// Closed handles compare equal to nothing, including other closed
    /// handles.
    pub fn ptr_eq(&self, other: &BitmapRef) -> bool {
        match (&self.inner, &other.inner) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Capability for admitting new bitmaps into reference-counted management.
///
/// Postprocessors build their output pixels and then hand the finished
/// bitmap to the allocator, which validates it and returns the first owning
/// handle. The allocator is borrowed for the duration of a `process` call
/// and never retained.
pub trait BitmapAllocator: Send + Sync {
    /// Take ownership of a finished bitmap and return an owning handle.
    ///
    /// # Errors
    ///
    /// Returns [`PostprocessError::AllocationFailed`] or
    /// [`PostprocessError::InvalidBitmap`] if the bitmap is rejected.
    fn create_bitmap(&self, bitmap: Bitmap) -> Result<BitmapRef, PostprocessError>;
}

/// Stock in-memory allocator.
///
/// Rejects empty bitmaps, buffers whose length does not match their
/// dimensions, and dimensions above [`MAX_BITMAP_DIMENSION`].
#[derive(Debug, Clone, Copy, Default)]
pub struct HeapBitmapAllocator;

impl HeapBitmapAllocator {
    /// Create a new heap allocator.
    pub fn new() -> Self {
        Self
    }
}

impl BitmapAllocator for HeapBitmapAllocator {
    fn create_bitmap(&self, bitmap: Bitmap) -> Result<BitmapRef, PostprocessError> {
        if bitmap.is_empty() || bitmap.width > MAX_BITMAP_DIMENSION || bitmap.height > MAX_BITMAP_DIMENSION
        {
            return Err(PostprocessError::AllocationFailed {
                width: bitmap.width,
                height: bitmap.height,
            });
        }
        if !bitmap.is_consistent() {
            return Err(PostprocessError::InvalidBitmap(format!(
                "pixel buffer length {} does not match {}x{} dimensions",
                bitmap.byte_size(),
                bitmap.width,
                bitmap.height
            )));
        }
        Ok(BitmapRef::new(bitmap))
    }
}
