//! Axis-aligned bounding boxes.

use glam::Vec3;

/// Axis-aligned bounding box in model space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point. `None` for an empty iterator.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vec3>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self::new(first, first), |mut bounds, p| {
            bounds.include(p);
            bounds
        }))
    }

    /// Grow the box to contain `point`.
    pub fn include(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_points_tracks_extremes() {
        let bounds = BoundingBox::from_points([
            Vec3::new(1.0, -2.0, 3.0),
            Vec3::new(-1.0, 4.0, 0.5),
            Vec3::new(0.0, 0.0, 7.0),
        ])
        .expect("non-empty");
        assert_eq!(bounds.min, Vec3::new(-1.0, -2.0, 0.5));
        assert_eq!(bounds.max, Vec3::new(1.0, 4.0, 7.0));
        assert_eq!(bounds.center(), Vec3::new(0.0, 1.0, 3.75));
    }

    #[test]
    fn from_points_empty_is_none() {
        assert!(BoundingBox::from_points(std::iter::empty()).is_none());
    }
}
