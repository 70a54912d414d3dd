//! Immutable, shared textures compared by identity.

use std::fmt;
use std::sync::Arc;

use crate::pixels::PixelBuffer;
use crate::types::Rgba;

/// Handle to an immutable block of pixels.
///
/// Cloning is cheap (reference count bump). Two handles are equal only when they
/// point at the same allocation; identical pixel content in separate textures
/// still compares unequal. The grid diff relies on this to detect changed cells
/// in O(1) without looking at pixels.
#[derive(Clone)]
pub struct Texture {
    pixels: Arc<PixelBuffer>,
}

impl Texture {
    pub fn new(pixels: PixelBuffer) -> Self {
        Self {
            pixels: Arc::new(pixels),
        }
    }

    /// A `width x height` texture of one color.
    pub fn solid(width: u32, height: u32, color: Rgba) -> Self {
        Self::new(PixelBuffer::filled(width, height, color))
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    /// Identity comparison; same as `==`.
    pub fn same(&self, other: &Texture) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }

    /// Stable address-derived id, useful in logs.
    pub fn id(&self) -> usize {
        Arc::as_ptr(&self.pixels) as usize
    }
}

impl PartialEq for Texture {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl Eq for Texture {}

impl fmt::Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Texture(#{:x} {}x{})",
            self.id(),
            self.width(),
            self.height()
        )
    }
}

/// Identity comparison for optional cell contents.
#[inline]
pub(crate) fn same_slot(a: &Option<Texture>, b: &Option<Texture>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.same(b),
        (None, None) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_pixels_are_still_distinct_textures() {
        let a = Texture::solid(4, 4, Rgba::rgb(9, 9, 9));
        let b = Texture::solid(4, 4, Rgba::rgb(9, 9, 9));
        assert_eq!(a.pixels(), b.pixels());
        assert_ne!(a, b);
    }

    #[test]
    fn clones_share_identity() {
        let a = Texture::solid(2, 2, Rgba::rgb(1, 1, 1));
        let b = a.clone();
        assert_eq!(a, b);
        assert_eq!(a.id(), b.id());
    }

    #[test]
    fn optional_slots_compare_by_identity() {
        let a = Texture::solid(1, 1, Rgba::rgb(1, 1, 1));
        assert!(same_slot(&None, &None));
        assert!(same_slot(&Some(a.clone()), &Some(a.clone())));
        assert!(!same_slot(&Some(a), &None));
    }
}
