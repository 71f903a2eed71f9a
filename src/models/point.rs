//! Planar node coordinates.

/// A node location in the plane.
///
/// Distances follow the TSPLIB `EUC_2D` convention: the Euclidean distance
/// rounded to the nearest integer.
///
/// # Examples
///
/// ```
/// use u_tsp::models::Point;
///
/// let a = Point::new(0.0, 0.0);
/// let b = Point::new(3.0, 4.0);
/// assert_eq!(a.distance_to(&b), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// Rounded Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> i64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        ((dx * dx + dy * dy).sqrt() + 0.5) as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_rounds_to_nearest() {
        let a = Point::new(0.0, 0.0);
        assert_eq!(a.distance_to(&Point::new(1.0, 1.0)), 1); // 1.414
        assert_eq!(a.distance_to(&Point::new(1.5, 1.5)), 2); // 2.121
        assert_eq!(a.distance_to(&Point::new(0.0, 2.5)), 3);
    }

    #[test]
    fn test_distance_symmetric() {
        let a = Point::new(2.0, 7.0);
        let b = Point::new(-4.0, 1.0);
        assert_eq!(a.distance_to(&b), b.distance_to(&a));
        assert_eq!(a.distance_to(&a), 0);
    }
}
