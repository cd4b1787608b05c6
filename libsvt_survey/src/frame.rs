use nalgebra::{Matrix3, Vector3};

use super::error::GeometryError;
use super::vector::{make_basis, Plane, Point3};

/// A local coordinate frame expressed in some parent frame.
///
/// The rows of `axes` are the unit vectors u, v, w of the local frame written in parent
/// coordinates, so `axes * (p - origin)` takes a parent point into the local frame and
/// `axes.transpose()` goes the other way.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub origin: Point3,
    pub axes: Matrix3<f64>,
}

impl Default for Frame {
    fn default() -> Self {
        Self::identity()
    }
}

impl Frame {
    pub fn new(origin: Point3, axes: Matrix3<f64>) -> Self {
        Self { origin, axes }
    }

    pub fn identity() -> Self {
        Self {
            origin: Point3::zeros(),
            axes: Matrix3::identity(),
        }
    }

    /// Frame at `origin` with axes from [`make_basis`]
    pub fn from_vectors(origin: Point3, primary: &Vector3<f64>, secondary: &Vector3<f64>) -> Self {
        Self {
            origin,
            axes: make_basis(primary, secondary),
        }
    }

    /// Frame with w along `normal` and u along the part of `in_plane` orthogonal to it;
    /// v closes the right-handed triple.
    pub fn from_normal(origin: Point3, normal: &Vector3<f64>, in_plane: &Vector3<f64>) -> Self {
        let m = make_basis(normal, in_plane);
        Self {
            origin,
            axes: Matrix3::from_rows(&[
                m.row(1).into_owned(),
                m.row(2).into_owned(),
                m.row(0).into_owned(),
            ]),
        }
    }

    /// Frame of a two-point feature (pin pair, wire) seated on a plane.
    ///
    /// Both points are projected onto the plane; the origin is the projected `start`,
    /// u runs from `start` to `end` and v is the plane normal.
    pub fn on_plane(start: &Point3, end: &Point3, plane: &Plane) -> Self {
        let origin = plane.project(start);
        let direction = plane.project(end) - origin;
        Self::from_vectors(origin, &direction, &plane.normal)
    }

    pub fn u(&self) -> Vector3<f64> {
        self.axes.row(0).transpose()
    }

    pub fn v(&self) -> Vector3<f64> {
        self.axes.row(1).transpose()
    }

    pub fn w(&self) -> Vector3<f64> {
        self.axes.row(2).transpose()
    }

    /// Parent coordinates -> local coordinates
    pub fn to_local(&self, point: &Point3) -> Point3 {
        self.axes * (point - self.origin)
    }

    /// Local coordinates -> parent coordinates
    pub fn to_parent(&self, point: &Point3) -> Point3 {
        self.origin + self.axes.transpose() * point
    }

    /// Rotate a direction into the local frame; directions are never translated
    pub fn direction_to_local(&self, direction: &Vector3<f64>) -> Vector3<f64> {
        self.axes * direction
    }

    pub fn direction_to_parent(&self, direction: &Vector3<f64>) -> Vector3<f64> {
        self.axes.transpose() * direction
    }

    /// Express this frame in the local coordinates of `other`.
    ///
    /// Both frames must be written in the same parent frame.
    pub fn relative_to(&self, other: &Frame) -> Frame {
        Frame {
            origin: other.to_local(&self.origin),
            axes: self.axes * other.axes.transpose(),
        }
    }

    /// Express this frame, written in the local coordinates of `parent`, in the frame
    /// `parent` itself is written in.
    pub fn express_in(&self, parent: &Frame) -> Frame {
        Frame {
            origin: parent.to_parent(&self.origin),
            axes: self.axes * parent.axes,
        }
    }

    /// Multiply each axis by the matching sign.
    ///
    /// Used for as-built orientation conventions; the result is left-handed whenever an
    /// odd number of signs is negative.
    pub fn with_axis_signs(&self, signs: [f64; 3]) -> Frame {
        let mut axes = self.axes;
        for (idx, sign) in signs.iter().enumerate() {
            let scaled = axes.row(idx) * *sign;
            axes.set_row(idx, &scaled);
        }
        Frame {
            origin: self.origin,
            axes,
        }
    }

    pub fn is_orthonormal(&self, tolerance: f64) -> bool {
        (self.axes * self.axes.transpose() - Matrix3::identity())
            .iter()
            .all(|x| x.abs() <= tolerance)
    }
}

/// Anything that can build a local frame from its surveyed features
pub trait FrameHolder {
    fn get_basis(&self) -> Result<Frame, GeometryError>;

    fn get_origin(&self) -> Result<Point3, GeometryError> {
        Ok(self.get_basis()?.origin)
    }
}

impl FrameHolder for Frame {
    fn get_basis(&self) -> Result<Frame, GeometryError> {
        Ok(*self)
    }
}
