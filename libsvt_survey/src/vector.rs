use nalgebra::{Matrix3, Vector3};

/// A coordinate in some implicit reference frame
pub type Point3 = Vector3<f64>;

/// A plane through `origin` with unit `normal`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Plane {
    pub origin: Point3,
    pub normal: Vector3<f64>,
}

impl Plane {
    pub fn new(origin: Point3, normal: Vector3<f64>) -> Self {
        Self { origin, normal }
    }

    /// Orthogonal projection of `point` onto this plane
    pub fn project(&self, point: &Point3) -> Point3 {
        project_to_plane(point, &self.origin, &self.normal)
    }
}

/// Scale a vector to unit length.
///
/// A zero vector is returned unchanged.
pub fn normalize(v: &Vector3<f64>) -> Vector3<f64> {
    let norm = v.norm();
    if norm == 0.0 {
        *v
    } else {
        v / norm
    }
}

/// Unit vector from an (azimuth, elevation) pair in radians.
///
/// Negative elevations are folded into the upper half space by rotating the azimuth by
/// pi and negating the elevation, so the returned vector never has a negative z
/// component. Layer sign conventions downstream rely on this asymmetry.
pub fn normal_vector(azimuth: f64, elevation: f64) -> Vector3<f64> {
    let (az, el) = if elevation < 0.0 {
        (azimuth + std::f64::consts::PI, -elevation)
    } else {
        (azimuth, elevation)
    };
    Vector3::new(el.cos() * az.cos(), el.cos() * az.sin(), el.sin())
}

/// Component of `b` orthogonal to `a` (one Gram-Schmidt step).
///
/// If `a` is zero, `b` is returned unchanged.
pub fn orthogonalize(a: &Vector3<f64>, b: &Vector3<f64>) -> Vector3<f64> {
    let aa = a.dot(a);
    if aa == 0.0 {
        *b
    } else {
        b - a * (a.dot(b) / aa)
    }
}

/// Build an orthonormal right-handed basis whose rows are
/// `[primary, secondary orthogonalized against primary, their cross product]`.
///
/// Parallel or zero inputs produce zero rows instead of an error. Stub fixtures with
/// unset geometry depend on this, but it will also hide bad survey data.
pub fn make_basis(primary: &Vector3<f64>, secondary: &Vector3<f64>) -> Matrix3<f64> {
    let u = normalize(primary);
    let v = normalize(&orthogonalize(&u, secondary));
    let w = u.cross(&v);
    Matrix3::from_rows(&[u.transpose(), v.transpose(), w.transpose()])
}

/// Orthogonal projection of `point` onto the plane through `origin` with `normal`
pub fn project_to_plane(point: &Point3, origin: &Point3, normal: &Vector3<f64>) -> Point3 {
    let n = normalize(normal);
    point - n * (point - origin).dot(&n)
}

/// Midpoint of two points
pub fn midpoint(a: &Point3, b: &Point3) -> Point3 {
    (a + b) * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_normalize() {
        let v = normalize(&Vector3::new(3.0, -4.0, 12.0));
        assert_abs_diff_eq!(v.norm(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(v, Vector3::new(3.0, -4.0, 12.0) / 13.0, epsilon = 1e-12);
        assert_eq!(normalize(&Vector3::zeros()), Vector3::zeros());
    }

    #[test]
    fn test_normal_vector_folding() {
        for (az, el) in [(0.3, 0.2), (-1.2, -0.7), (2.5, 1.1), (0.0, -PI / 2.0)] {
            let a = normal_vector(az, el);
            let b = normal_vector(az + PI, -el);
            assert_abs_diff_eq!(a, b, epsilon = 1e-12);
            assert_abs_diff_eq!(a.norm(), 1.0, epsilon = 1e-12);
            assert!(a.z >= 0.0);
        }
        assert_abs_diff_eq!(normal_vector(0.0, 0.0), Vector3::x(), epsilon = 1e-12);
        assert_abs_diff_eq!(normal_vector(0.0, PI / 2.0), Vector3::z(), epsilon = 1e-12);
    }

    #[test]
    fn test_orthogonalize() {
        let a = Vector3::new(1.0, 1.0, 0.0);
        let b = Vector3::new(2.0, 0.0, 5.0);
        let c = orthogonalize(&a, &b);
        assert_abs_diff_eq!(a.dot(&c), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(c, Vector3::new(1.0, -1.0, 5.0), epsilon = 1e-12);
        assert_eq!(orthogonalize(&Vector3::zeros(), &b), b);
    }

    #[test]
    fn test_make_basis_orthonormal() {
        let inputs = [
            (Vector3::new(1.0, 2.0, 3.0), Vector3::new(-2.0, 0.5, 1.0)),
            (Vector3::new(0.0, 0.0, 7.0), Vector3::new(1.0, 1.0, 1.0)),
            (Vector3::new(-4.0, 1.0, 0.1), Vector3::new(0.0, 3.0, -2.0)),
        ];
        for (a, b) in inputs {
            let m = make_basis(&a, &b);
            let (u, v, w) = (m.row(0), m.row(1), m.row(2));
            assert_abs_diff_eq!(u.norm(), 1.0, epsilon = 1e-12);
            assert_abs_diff_eq!(v.norm(), 1.0, epsilon = 1e-12);
            assert_abs_diff_eq!(w.norm(), 1.0, epsilon = 1e-12);
            assert_abs_diff_eq!(u.dot(&v), 0.0, epsilon = 1e-12);
            assert_abs_diff_eq!(v.dot(&w), 0.0, epsilon = 1e-12);
            assert_abs_diff_eq!(u.dot(&w), 0.0, epsilon = 1e-12);
            assert_abs_diff_eq!(m.determinant(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_make_basis_degenerate() {
        let m = make_basis(&Vector3::zeros(), &Vector3::zeros());
        assert_eq!(m, Matrix3::zeros());

        let parallel = make_basis(&Vector3::new(2.0, 0.0, 0.0), &Vector3::new(5.0, 0.0, 0.0));
        assert_abs_diff_eq!(parallel.row(0).transpose(), Vector3::x(), epsilon = 1e-12);
        assert_eq!(parallel.row(1).transpose(), Vector3::zeros());
        assert_eq!(parallel.row(2).transpose(), Vector3::zeros());
    }

    #[test]
    fn test_project_to_plane() {
        let p = project_to_plane(
            &Vector3::new(4.0, 1.0, 2.0),
            &Vector3::new(10.0, -3.0, 0.5),
            &Vector3::new(0.0, 0.0, 3.0),
        );
        assert_abs_diff_eq!(p, Vector3::new(4.0, 1.0, 0.5), epsilon = 1e-12);
    }
}
