//! Image rotation for product cards.

/// Which of a product's images is showing.
///
/// Moves wrap around in both directions. An empty image list pins the
/// index at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Carousel {
    len: usize,
    index: usize,
}

impl Carousel {
    /// Start at `index`, clamped into range.
    #[must_use]
    pub fn new(len: usize, index: usize) -> Self {
        Self {
            len,
            index: index.min(len.saturating_sub(1)),
        }
    }

    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Only worth drawing arrows with more than one image.
    #[must_use]
    pub const fn has_controls(&self) -> bool {
        self.len > 1
    }

    /// Index of the following image.
    #[must_use]
    pub const fn next(&self) -> usize {
        if self.len == 0 {
            0
        } else {
            (self.index + 1) % self.len
        }
    }

    /// Index of the preceding image.
    #[must_use]
    pub const fn prev(&self) -> usize {
        if self.len == 0 {
            0
        } else {
            (self.index + self.len - 1) % self.len
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_wraps() {
        let c = Carousel::new(3, 2);
        assert_eq!(c.next(), 0);
        assert_eq!(Carousel::new(3, 0).next(), 1);
    }

    #[test]
    fn test_prev_wraps() {
        let c = Carousel::new(3, 0);
        assert_eq!(c.prev(), 2);
        assert_eq!(Carousel::new(3, 2).prev(), 1);
    }

    #[test]
    fn test_out_of_range_start_is_clamped() {
        assert_eq!(Carousel::new(2, 9).index(), 1);
    }

    #[test]
    fn test_single_image_has_no_controls() {
        let c = Carousel::new(1, 0);
        assert!(!c.has_controls());
        assert_eq!(c.next(), 0);
        assert_eq!(c.prev(), 0);
    }

    #[test]
    fn test_empty() {
        let c = Carousel::new(0, 5);
        assert!(c.is_empty());
        assert_eq!(c.index(), 0);
        assert_eq!(c.next(), 0);
    }
}
