//! Model transform: translate, scale, rotate.
//!
//! `Transform` is `Copy` and `Default` (identity).  Rotation and scale act
//! on object-local coordinates before translation; normals are only
//! rotated.
//!
//! # Example
//! ```rust,ignore
//! use facet_core::Transform;
//! use glam::{Quat, Vec3};
//!
//! let t = Transform::from_translation(Vec3::new(0.0, 0.5, 0.0))
//!     .with_uniform_scale(2.0)
//!     .with_rotation(Quat::from_rotation_y(0.3));
//! let world = t.apply_point(Vec3::X);
//! ```

use glam::{Mat4, Quat, Vec3};

use crate::vertex::Vertex;

/// Object-to-world transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// World-space offset applied last.
    pub translate: Vec3,
    /// Per-axis scale.  Only uniform scale keeps normals correct.
    pub scale: Vec3,
    /// Orientation as a unit quaternion.
    pub rotate: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// No translation, no rotation, scale 1.
    pub const IDENTITY: Self = Self {
        translate: Vec3::ZERO,
        scale: Vec3::ONE,
        rotate: Quat::IDENTITY,
    };

    pub fn new(translate: Vec3, scale: Vec3, rotate: Quat) -> Self {
        Self {
            translate,
            scale,
            rotate,
        }
    }

    /// Pure translation.
    pub fn from_translation(translate: Vec3) -> Self {
        Self {
            translate,
            ..Self::IDENTITY
        }
    }

    /// Translation followed by a rotation about the local origin.
    pub fn from_translation_rotation(translate: Vec3, rotate: Quat) -> Self {
        Self {
            translate,
            rotate,
            ..Self::IDENTITY
        }
    }

    pub fn with_uniform_scale(mut self, s: f32) -> Self {
        self.scale = Vec3::splat(s);
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_rotation(mut self, rotate: Quat) -> Self {
        self.rotate = rotate;
        self
    }

    /// `rotate(p) * scale + translate`.
    #[inline]
    pub fn apply_point(&self, p: Vec3) -> Vec3 {
        (self.rotate * p) * self.scale + self.translate
    }

    /// Normals ignore scale and translation.
    #[inline]
    pub fn apply_normal(&self, n: Vec3) -> Vec3 {
        self.rotate * n
    }

    /// Maps an object-local vertex into world space.  Colour passes through.
    pub fn apply(&self, v: &Vertex) -> Vertex {
        Vertex::new(
            self.apply_point(v.position()),
            self.apply_normal(v.normal()),
            v.color(),
        )
    }

    /// The equivalent model matrix, `T * S * R`.
    ///
    /// Scale is applied after rotation here (matching `apply_point`), which
    /// differs from glam's TRS helper.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_translation(self.translate)
            * Mat4::from_scale(self.scale)
            * Mat4::from_quat(self.rotate)
    }
}
