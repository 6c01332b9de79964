use crate::core::models::graph::MoleculeGraph;
use nalgebra::{Point3, Rotation3, Vector2, Vector3};

/// Axis-aligned bounding box of a set of points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl BoundingBox {
    /// Bounding box of `points`, or `None` if there are no points.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3<f64>>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        Some(iter.fold(
            BoundingBox {
                min: first,
                max: first,
            },
            |bb, p| BoundingBox {
                min: bb.min.inf(p),
                max: bb.max.sup(p),
            },
        ))
    }

    /// Bounding box of every atom in `graph`, or `None` for an empty graph.
    pub fn of_graph(graph: &MoleculeGraph) -> Option<Self> {
        Self::from_points(graph.atoms().iter().map(|a| &a.position))
    }

    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    pub fn extents(&self) -> Vector3<f64> {
        self.max - self.min
    }

    pub fn max_extent(&self) -> f64 {
        self.extents().max()
    }
}

/// Viewer rotation: yaw about the Y axis first, then pitch about the X axis.
pub fn view_rotation(pitch_degrees: f64, yaw_degrees: f64) -> Rotation3<f64> {
    let yaw = Rotation3::from_axis_angle(&Vector3::y_axis(), yaw_degrees.to_radians());
    let pitch = Rotation3::from_axis_angle(&Vector3::x_axis(), pitch_degrees.to_radians());
    pitch * yaw
}

/// Unit vector perpendicular to the 2D segment `from -> to`, rotated a quarter turn
/// counter-clockwise. Degenerate segments fall back to the horizontal axis.
pub fn perpendicular_2d(from: &Vector2<f64>, to: &Vector2<f64>) -> Vector2<f64> {
    let d = to - from;
    let len = d.norm();
    if len < 1e-9 {
        return Vector2::x();
    }
    Vector2::new(-d.y / len, d.x / len)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn bounding_box_of_points() {
        let points = [
            Point3::new(1.0, -2.0, 0.0),
            Point3::new(-1.0, 4.0, 2.0),
            Point3::new(0.0, 0.0, -6.0),
        ];
        let bb = BoundingBox::from_points(&points).unwrap();
        assert_eq!(bb.min, Point3::new(-1.0, -2.0, -6.0));
        assert_eq!(bb.max, Point3::new(1.0, 4.0, 2.0));
        assert_eq!(bb.center(), Point3::new(0.0, 1.0, -2.0));
        assert_eq!(bb.max_extent(), 8.0);
    }

    #[test]
    fn bounding_box_of_nothing_is_none() {
        assert!(BoundingBox::from_points(&[]).is_none());
        assert!(BoundingBox::of_graph(&MoleculeGraph::new()).is_none());
    }

    #[test]
    fn view_rotation_applies_yaw_before_pitch() {
        // Yaw 90 sends +X to -Z; pitch 90 then sends -Z to +Y.
        let p = view_rotation(90.0, 90.0) * Point3::new(1.0, 0.0, 0.0);
        assert!((p - Point3::new(0.0, 1.0, 0.0)).norm() < EPS);

        // The opposite order would leave +X untouched by the pitch.
        let q = view_rotation(0.0, 90.0) * Point3::new(1.0, 0.0, 0.0);
        assert!((q - Point3::new(0.0, 0.0, -1.0)).norm() < EPS);
    }

    #[test]
    fn zero_rotation_is_identity() {
        let p = Point3::new(0.3, -0.7, 1.1);
        assert!((view_rotation(0.0, 0.0) * p - p).norm() < EPS);
    }

    #[test]
    fn perpendicular_is_unit_and_orthogonal() {
        let a = Vector2::new(1.0, 1.0);
        let b = Vector2::new(4.0, 5.0);
        let n = perpendicular_2d(&a, &b);
        assert!((n.norm() - 1.0).abs() < EPS);
        assert!(n.dot(&(b - a)).abs() < EPS);
        assert_eq!(perpendicular_2d(&a, &a), Vector2::x());
    }
}
