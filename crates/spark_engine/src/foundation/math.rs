//! Math utilities and types
//!
//! Thin aliases over `nalgebra` plus the TRS value type used by the
//! transform hierarchy.

pub use nalgebra::{Matrix3, Matrix4, Quaternion, Rotation3, Unit, UnitQuaternion, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Quaternion type for rotations
pub type Quat = UnitQuaternion<f32>;

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Convert to a transformation matrix
    ///
    /// Composition order is translation × rotation × scale. Shear is not
    /// representable.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Decompose a transformation matrix into position, rotation and scale
    ///
    /// Scale comes from the lengths of the first three columns, rotation from
    /// the 3x3 block divided by that scale, position from the last column.
    /// A zero scale axis divides by zero and yields non-finite rotation
    /// components; the extraction is closed-form so it still terminates.
    pub fn from_matrix(matrix: &Mat4) -> Self {
        let position = Vec3::new(matrix.m14, matrix.m24, matrix.m34);
        let scale = scale_of(matrix);

        let rotation_matrix = Mat3::new(
            matrix.m11 / scale.x, matrix.m12 / scale.y, matrix.m13 / scale.z,
            matrix.m21 / scale.x, matrix.m22 / scale.y, matrix.m23 / scale.z,
            matrix.m31 / scale.x, matrix.m32 / scale.y, matrix.m33 / scale.z,
        );
        let rotation = Quat::from_rotation_matrix(&Rotation3::from_matrix_unchecked(rotation_matrix));

        Self {
            position,
            rotation,
            scale,
        }
    }
}

/// Translation column of a transformation matrix
pub fn translation_of(matrix: &Mat4) -> Vec3 {
    Vec3::new(matrix.m14, matrix.m24, matrix.m34)
}

/// Per-axis scale of a transformation matrix (column lengths)
pub fn scale_of(matrix: &Mat4) -> Vec3 {
    Vec3::new(
        Vec3::new(matrix.m11, matrix.m21, matrix.m31).magnitude(),
        Vec3::new(matrix.m12, matrix.m22, matrix.m32).magnitude(),
        Vec3::new(matrix.m13, matrix.m23, matrix.m33).magnitude(),
    )
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::{constants, Quat, Vec3};

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }

    /// Euler angles of a rotation in degrees (roll, pitch, yaw)
    pub fn euler_degrees(rotation: &Quat) -> Vec3 {
        let (roll, pitch, yaw) = rotation.euler_angles();
        Vec3::new(rad_to_deg(roll), rad_to_deg(pitch), rad_to_deg(yaw))
    }

    /// Rotation from Euler angles in degrees (roll, pitch, yaw)
    pub fn from_euler_degrees(degrees: Vec3) -> Quat {
        Quat::from_euler_angles(
            deg_to_rad(degrees.x),
            deg_to_rad(degrees.y),
            deg_to_rad(degrees.z),
        )
    }
}
