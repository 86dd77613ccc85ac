//! Rectangular regions for binary space partitioning
//!
//! A region is the area a BSP node is responsible for. Leaves hold exactly one
//! room; inner nodes are cut in two along one axis.

use serde::{Deserialize, Serialize};
use strum::Display;

/// Which way a region is cut
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum SplitAxis {
    /// Cut along a row: top and bottom halves
    Horizontal,
    /// Cut along a column: left and right halves
    Vertical,
}

/// A rectangle of cells, `x`/`y` is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Last column inside the region
    pub const fn right(&self) -> i32 {
        self.x + self.width - 1
    }

    /// Last row inside the region
    pub const fn bottom(&self) -> i32 {
        self.y + self.height - 1
    }

    /// Whether a region of at least `min_width` x `min_height` fits
    pub const fn fits(&self, min_width: i32, min_height: i32) -> bool {
        self.width >= min_width && self.height >= min_height
    }

    /// Axes along which both halves can still hold `min_width` x `min_height`
    pub fn feasible_splits(&self, min_width: i32, min_height: i32) -> Vec<SplitAxis> {
        let mut axes = Vec::with_capacity(2);
        if self.height >= 2 * min_height {
            axes.push(SplitAxis::Horizontal);
        }
        if self.width >= 2 * min_width {
            axes.push(SplitAxis::Vertical);
        }
        axes
    }

    /// Cut at `offset` cells from the top (horizontal) or left (vertical) edge
    pub const fn split(&self, axis: SplitAxis, offset: i32) -> (Region, Region) {
        match axis {
            SplitAxis::Horizontal => (
                Region::new(self.x, self.y, self.width, offset),
                Region::new(self.x, self.y + offset, self.width, self.height - offset),
            ),
            SplitAxis::Vertical => (
                Region::new(self.x, self.y, offset, self.height),
                Region::new(self.x + offset, self.y, self.width - offset, self.height),
            ),
        }
    }

    /// Length of the region along the cut direction
    pub const fn extent(&self, axis: SplitAxis) -> i32 {
        match axis {
            SplitAxis::Horizontal => self.height,
            SplitAxis::Vertical => self.width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        let r = Region::new(2, 3, 5, 4);
        assert_eq!(r.right(), 6);
        assert_eq!(r.bottom(), 6);
        assert!(r.fits(5, 4));
        assert!(!r.fits(6, 4));
    }

    #[test]
    fn test_feasible_splits() {
        let r = Region::new(0, 0, 30, 11);
        assert_eq!(r.feasible_splits(6, 6), vec![SplitAxis::Vertical]);
        assert_eq!(r.feasible_splits(6, 5), vec![SplitAxis::Horizontal, SplitAxis::Vertical]);
        assert!(Region::new(0, 0, 11, 11).feasible_splits(6, 6).is_empty());
    }

    #[test]
    fn test_split_partitions_region() {
        let r = Region::new(1, 1, 20, 14);
        let (top, bottom) = r.split(SplitAxis::Horizontal, 6);
        assert_eq!(top, Region::new(1, 1, 20, 6));
        assert_eq!(bottom, Region::new(1, 7, 20, 8));
        assert_eq!(top.height + bottom.height, r.height);

        let (left, right) = r.split(SplitAxis::Vertical, 9);
        assert_eq!(left.right() + 1, right.x);
        assert_eq!((left.x, right.right()), (r.x, r.right()));
    }
}
