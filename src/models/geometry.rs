use serde::{Deserialize, Serialize};

/// A 2D affine transform in SVG `matrix(a, b, c, d, e, f)` order.
///
/// Formula:
/// x' = a * x + c * y + e;
/// y' = b * x + d * y + f;
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformMatrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl TransformMatrix {
    pub const IDENTITY: TransformMatrix = TransformMatrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn translation(tx: f64, ty: f64) -> Self {
        TransformMatrix {
            e: tx,
            f: ty,
            ..Self::IDENTITY
        }
    }

    /// Rotation by `degrees` around the origin (clockwise on a y-down canvas,
    /// the SVG `rotate()` convention).
    pub fn rotation(degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        TransformMatrix {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        }
    }

    /// Returns `self · other`, i.e. `other` is applied first.
    pub fn then_apply_to(&self, other: &TransformMatrix) -> TransformMatrix {
        TransformMatrix {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    pub fn map_point(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }
}

impl Default for TransformMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Canonical placement of a boxed element after its transform was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeometryResult {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Rotation in degrees, written as `rotate(..)`.
    pub rotation: f64,
    /// Offset written as `translate(..)` after the rotation.
    pub translate_x: f64,
    pub translate_y: f64,
}

/// The coordinate rectangle shared by every page of a document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}
