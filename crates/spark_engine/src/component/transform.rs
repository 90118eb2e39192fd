//! Transform component
//!
//! Every entity carries exactly one `TransformComponent`. It stores the local
//! position, rotation and scale and caches the world matrix behind a dirty
//! flag. The cache lives in `Cell`s so it can be refreshed through a shared
//! reference to the scene; recomputation walks up the parent chain only, and
//! descendants stay dirty until they are queried themselves.
//!
//! Mutation goes through the scene (or an [`EntityMut`](crate::entity::EntityMut))
//! because a change has to invalidate the whole descendant subtree.

use std::cell::Cell;

use crate::entity::EntityId;
use crate::foundation::math::{utils, Mat4, Quat, Transform, Vec3};
use crate::scene::Scene;
use crate::ui::Ui;

/// Local TRS state plus the lazily computed world matrix
#[derive(Debug, Clone)]
pub struct TransformComponent {
    position: Vec3,
    rotation: Quat,
    scale: Vec3,
    world_matrix: Cell<Mat4>,
    dirty: Cell<bool>,
}

crate::impl_component!(TransformComponent);

impl Default for TransformComponent {
    fn default() -> Self {
        Self::from_local(Transform::identity())
    }
}

impl TransformComponent {
    /// Create a dirty transform with the given local state
    pub fn from_local(local: Transform) -> Self {
        Self {
            position: local.position,
            rotation: local.rotation,
            scale: local.scale,
            world_matrix: Cell::new(Mat4::identity()),
            dirty: Cell::new(true),
        }
    }

    /// Local position
    pub fn local_position(&self) -> Vec3 {
        self.position
    }

    /// Local rotation
    pub fn local_rotation(&self) -> Quat {
        self.rotation
    }

    /// Local scale
    pub fn local_scale(&self) -> Vec3 {
        self.scale
    }

    /// Local state as a value
    pub fn local(&self) -> Transform {
        Transform {
            position: self.position,
            rotation: self.rotation,
            scale: self.scale,
        }
    }

    /// Local matrix, composed translation × rotation × scale
    pub fn local_matrix(&self) -> Mat4 {
        self.local().to_matrix()
    }

    /// Whether the cached world matrix is stale
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Cached world matrix, if it is still valid
    pub(crate) fn cached_world_matrix(&self) -> Option<Mat4> {
        (!self.dirty.get()).then(|| self.world_matrix.get())
    }

    /// Compose with the parent's world matrix, cache the result and clear the flag
    pub(crate) fn refresh_world_matrix(&self, parent_world: &Mat4) -> Mat4 {
        let world = parent_world * self.local_matrix();
        self.world_matrix.set(world);
        self.dirty.set(false);
        world
    }

    pub(crate) fn mark_dirty(&self) {
        self.dirty.set(true);
    }

    /// Returns `false` when the value is unchanged
    pub(crate) fn set_position(&mut self, position: Vec3) -> bool {
        if self.position == position {
            return false;
        }
        self.position = position;
        true
    }

    /// Returns `false` when the value is unchanged
    pub(crate) fn set_rotation(&mut self, rotation: Quat) -> bool {
        if self.rotation == rotation {
            return false;
        }
        self.rotation = rotation;
        true
    }

    /// Returns `false` when the value is unchanged
    pub(crate) fn set_scale(&mut self, scale: Vec3) -> bool {
        if self.scale == scale {
            return false;
        }
        self.scale = scale;
        true
    }

    pub(crate) fn set_local(&mut self, local: Transform) {
        self.position = local.position;
        self.rotation = local.rotation;
        self.scale = local.scale;
        self.mark_dirty();
    }
}

/// Inspector step sizes and limits
const POSITION_SPEED: f32 = 0.1;
const ROTATION_SPEED: f32 = 1.0;
const SCALE_SPEED: f32 = 0.01;
const SCALE_RANGE: (f32, f32) = (0.01, 100.0);

fn to_array(v: Vec3) -> [f32; 3] {
    [v.x, v.y, v.z]
}

fn from_array(a: [f32; 3]) -> Vec3 {
    Vec3::new(a[0], a[1], a[2])
}

/// Draw the built-in "Transform" inspector section for an entity
///
/// Edits go through the scene's setters so descendants are invalidated.
pub fn render_transform_section(scene: &mut Scene, id: EntityId, ui: &mut dyn Ui) {
    let Some(local) = scene.transform(id).map(TransformComponent::local) else {
        return;
    };

    if !ui.collapsing_header("Transform") {
        return;
    }

    let mut position = to_array(local.position);
    if ui.drag_float3("Position", &mut position, POSITION_SPEED, None) {
        scene.set_local_position(id, from_array(position));
    }

    let mut rotation = to_array(utils::euler_degrees(&local.rotation));
    if ui.drag_float3("Rotation", &mut rotation, ROTATION_SPEED, None) {
        scene.set_local_rotation(id, utils::from_euler_degrees(from_array(rotation)));
    }

    let mut scale = to_array(local.scale);
    if ui.drag_float3("Scale", &mut scale, SCALE_SPEED, Some(SCALE_RANGE)) {
        let clamped = scale.map(|s| s.clamp(SCALE_RANGE.0, SCALE_RANGE.1));
        scene.set_local_scale(id, from_array(clamped));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_new_transform_is_dirty_identity() {
        let transform = TransformComponent::default();
        assert!(transform.is_dirty());
        assert_eq!(transform.cached_world_matrix(), None);
        assert_eq!(transform.local_matrix(), Mat4::identity());
    }

    #[test]
    fn test_refresh_caches_and_clears_flag() {
        let transform = TransformComponent::from_local(Transform::from_position(Vec3::new(1.0, 0.0, 0.0)));
        let parent = Mat4::new_translation(&Vec3::new(0.0, 2.0, 0.0));

        let world = transform.refresh_world_matrix(&parent);

        assert!(!transform.is_dirty());
        assert_eq!(transform.cached_world_matrix(), Some(world));
        assert_relative_eq!(world.m14, 1.0);
        assert_relative_eq!(world.m24, 2.0);
    }

    #[test]
    fn test_setters_report_changes() {
        let mut transform = TransformComponent::default();
        assert!(!transform.set_position(Vec3::zeros()));
        assert!(transform.set_position(Vec3::new(0.0, 0.0, 1.0)));
        assert!(!transform.set_scale(Vec3::new(1.0, 1.0, 1.0)));
        assert!(transform.set_rotation(Quat::from_axis_angle(&Vec3::z_axis(), 0.5)));
    }
}
