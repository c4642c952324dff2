//! Pure region geometry.
//!
//! # Responsibility
//! - Derive edges of rectangles and disks from center and size.
//! - Answer containment and overlap questions between regions.
//!
//! # Invariants
//! - All arithmetic is exact `Decimal`; no binary floating point.
//! - Every comparison is inclusive: touching edges wrap and collide.
//! - Distances are compared squared, never through a square root.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Edges of an axis-aligned region. `top` is the smaller y value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub left: Decimal,
    pub right: Decimal,
    pub top: Decimal,
    pub bottom: Decimal,
}

/// Axis-aligned rectangle given by center and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub center_x: Decimal,
    pub center_y: Decimal,
    pub width: Decimal,
    pub height: Decimal,
}

/// Disk given by center and radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disk {
    pub center_x: Decimal,
    pub center_y: Decimal,
    pub radius: Decimal,
}

impl Rect {
    pub fn new(center_x: Decimal, center_y: Decimal, width: Decimal, height: Decimal) -> Self {
        Self {
            center_x,
            center_y,
            width,
            height,
        }
    }

    pub fn bounds(&self) -> Bounds {
        let half_width = self.width / Decimal::TWO;
        let half_height = self.height / Decimal::TWO;
        Bounds {
            left: self.center_x - half_width,
            right: self.center_x + half_width,
            top: self.center_y - half_height,
            bottom: self.center_y + half_height,
        }
    }

    /// Returns whether `disk` lies fully inside this rectangle.
    pub fn wraps(&self, disk: &Disk) -> bool {
        let frame = self.bounds();
        let circle = disk.bounds();
        circle.left >= frame.left
            && circle.right <= frame.right
            && circle.top >= frame.top
            && circle.bottom <= frame.bottom
    }

    /// Separating-axis test; shared edges count as a collision.
    pub fn overlaps(&self, other: &Rect) -> bool {
        let a = self.bounds();
        let b = other.bounds();
        a.right >= b.left && a.left <= b.right && a.bottom >= b.top && a.top <= b.bottom
    }
}

impl Disk {
    pub fn new(center_x: Decimal, center_y: Decimal, radius: Decimal) -> Self {
        Self {
            center_x,
            center_y,
            radius,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds {
            left: self.center_x - self.radius,
            right: self.center_x + self.radius,
            top: self.center_y - self.radius,
            bottom: self.center_y + self.radius,
        }
    }

    /// Squared euclidean distance between the two centers.
    pub fn center_distance_squared(&self, other: &Disk) -> Decimal {
        let dx = self.center_x - other.center_x;
        let dy = self.center_y - other.center_y;
        dx * dx + dy * dy
    }

    /// External tangency counts as overlap.
    pub fn overlaps(&self, other: &Disk) -> bool {
        let reach = self.radius + other.radius;
        self.center_distance_squared(other) <= reach * reach
    }

    /// Area-filter predicate: the center of `self` lies within
    /// `|area.radius - self.radius|` of the area center.
    pub fn lies_within(&self, area: &Disk) -> bool {
        let slack = area.radius - self.radius;
        self.center_distance_squared(area) <= slack * slack
    }
}

#[cfg(test)]
mod tests {
    use super::{Disk, Rect};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn rect(cx: Decimal, cy: Decimal, w: Decimal, h: Decimal) -> Rect {
        Rect::new(cx, cy, w, h)
    }

    fn disk(cx: Decimal, cy: Decimal, r: Decimal) -> Disk {
        Disk::new(cx, cy, r)
    }

    #[test]
    fn rect_bounds_use_half_extents() {
        let bounds = rect(dec!(50), dec!(50), dec!(20), dec!(40)).bounds();
        assert_eq!(bounds.left, dec!(40));
        assert_eq!(bounds.right, dec!(60));
        assert_eq!(bounds.top, dec!(30));
        assert_eq!(bounds.bottom, dec!(70));
    }

    #[test]
    fn rect_bounds_stay_exact_for_odd_sizes() {
        let bounds = rect(dec!(0.1), dec!(0.2), dec!(0.3), dec!(0.0001)).bounds();
        assert_eq!(bounds.left, dec!(-0.05));
        assert_eq!(bounds.right, dec!(0.25));
        assert_eq!(bounds.top, dec!(0.19995));
        assert_eq!(bounds.bottom, dec!(0.20005));
    }

    #[test]
    fn disk_bounds_use_radius() {
        let bounds = disk(dec!(10), dec!(20), dec!(5)).bounds();
        assert_eq!(bounds.left, dec!(5));
        assert_eq!(bounds.right, dec!(15));
        assert_eq!(bounds.top, dec!(15));
        assert_eq!(bounds.bottom, dec!(25));
    }

    #[test]
    fn wraps_is_inclusive_of_touching_edges() {
        let frame = rect(dec!(0), dec!(0), dec!(100), dec!(100));
        assert!(frame.wraps(&disk(dec!(0), dec!(0), dec!(50))));
        assert!(frame.wraps(&disk(dec!(40), dec!(-40), dec!(10))));
        assert!(!frame.wraps(&disk(dec!(40.0001), dec!(0), dec!(10))));
    }

    #[test]
    fn wraps_rejects_each_escaping_edge() {
        let frame = rect(dec!(0), dec!(0), dec!(100), dec!(100));
        assert!(!frame.wraps(&disk(dec!(-45), dec!(0), dec!(10))));
        assert!(!frame.wraps(&disk(dec!(45), dec!(0), dec!(10))));
        assert!(!frame.wraps(&disk(dec!(0), dec!(-45), dec!(10))));
        assert!(!frame.wraps(&disk(dec!(0), dec!(45), dec!(10))));
        assert!(!frame.wraps(&disk(dec!(105), dec!(0), dec!(1))));
    }

    #[test]
    fn frames_touching_on_any_edge_collide() {
        let base = rect(dec!(50), dec!(50), dec!(20), dec!(20));
        assert!(base.overlaps(&rect(dec!(70), dec!(50), dec!(20), dec!(20))));
        assert!(base.overlaps(&rect(dec!(30), dec!(50), dec!(20), dec!(20))));
        assert!(base.overlaps(&rect(dec!(50), dec!(70), dec!(20), dec!(20))));
        assert!(base.overlaps(&rect(dec!(50), dec!(30), dec!(20), dec!(20))));
        assert!(base.overlaps(&rect(dec!(70), dec!(70), dec!(20), dec!(20))));
    }

    #[test]
    fn frames_separated_on_one_axis_do_not_collide() {
        let base = rect(dec!(50), dec!(50), dec!(20), dec!(20));
        assert!(!base.overlaps(&rect(dec!(71), dec!(50), dec!(20), dec!(20))));
        assert!(!base.overlaps(&rect(dec!(50), dec!(29.9999), dec!(20), dec!(20))));
        assert!(!base.overlaps(&rect(dec!(55), dec!(100), dec!(20), dec!(20))));
    }

    #[test]
    fn frame_overlap_is_symmetric() {
        let a = rect(dec!(0), dec!(0), dec!(100), dec!(100));
        let b = rect(dec!(1), dec!(1), dec!(100), dec!(100));
        let c = rect(dec!(500), dec!(0), dec!(10), dec!(10));
        assert_eq!(a.overlaps(&b), b.overlaps(&a));
        assert_eq!(a.overlaps(&c), c.overlaps(&a));
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn tangent_disks_overlap() {
        let a = disk(dec!(0), dec!(0), dec!(3));
        assert!(a.overlaps(&disk(dec!(5), dec!(0), dec!(2))));
        assert!(a.overlaps(&disk(dec!(3), dec!(4), dec!(2))));
        assert!(!a.overlaps(&disk(dec!(3), dec!(4), dec!(1.9999))));
    }

    #[test]
    fn nested_disks_overlap() {
        let outer = disk(dec!(0), dec!(0), dec!(10));
        let inner = disk(dec!(1), dec!(1), dec!(1));
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn lies_within_matches_area_filter_examples() {
        let area = disk(dec!(0), dec!(0), dec!(5));
        assert!(disk(dec!(0), dec!(0), dec!(5)).lies_within(&area));
        assert!(disk(dec!(1), dec!(1), dec!(2)).lies_within(&area));
        assert!(!disk(dec!(10), dec!(10), dec!(1)).lies_within(&area));
        assert!(!disk(dec!(4), dec!(0), dec!(2)).lies_within(&area));
    }
}
