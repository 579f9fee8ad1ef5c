// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Alpha-mask hit testing.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Point;

/// A coverage mask sampled with nearest-neighbour lookup.
///
/// The mask is stretched over the whole widget: normalized `(0, 0)` is the
/// top-left texel and `(1, 1)` the bottom-right corner. A point hits when the
/// sampled alpha is at least `threshold`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlphaMask {
    width: u32,
    height: u32,
    alpha: Vec<u8>,
    /// Minimum alpha that counts as a hit.
    pub threshold: u8,
}

impl AlphaMask {
    /// Create a mask from row-major alpha values.
    ///
    /// Returns `None` when `alpha` does not hold exactly `width * height` values
    /// or when either dimension is zero.
    pub fn new(width: u32, height: u32, alpha: Vec<u8>, threshold: u8) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        let expected = usize::try_from(u64::from(width) * u64::from(height)).ok()?;
        if alpha.len() != expected {
            return None;
        }
        Some(Self {
            width,
            height,
            alpha,
            threshold,
        })
    }

    /// Mask dimensions in texels.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Sample the alpha value under a normalized point, or `None` outside `0..1`.
    pub fn sample(&self, pt: Point) -> Option<u8> {
        if !(0.0..1.0).contains(&pt.x) || !(0.0..1.0).contains(&pt.y) {
            return None;
        }
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "Coordinates are checked to lie in 0..1 before scaling."
        )]
        let (x, y) = (
            (pt.x * f64::from(self.width)).floor() as usize,
            (pt.y * f64::from(self.height)).floor() as usize,
        );
        let row = self.width as usize;
        self.alpha.get(y * row + x).copied()
    }

    /// Returns `true` if the normalized point lands on a texel at or above the threshold.
    pub fn contains(&self, pt: Point) -> bool {
        self.sample(pt).is_some_and(|a| a >= self.threshold)
    }
}
