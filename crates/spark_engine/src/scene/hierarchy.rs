//! Parent/child relationships and the transform hierarchy
//!
//! World matrices are cached per entity and recomputed lazily: a query walks
//! up to the first clean ancestor, never down. Any local change marks the
//! entity and its entire subtree dirty so no stale matrix can be read.

use crate::entity::EntityId;
use crate::foundation::math::{scale_of, translation_of, Mat4, Quat, Transform, Vec3};

use super::{Scene, SceneError};

impl Scene {
    /// Parent of an entity, `None` for roots and unknown ids
    pub fn parent(&self, id: EntityId) -> Option<EntityId> {
        self.entities.get(id)?.parent
    }

    /// Direct children of an entity in insertion order
    pub fn children(&self, id: EntityId) -> &[EntityId] {
        self.entities.get(id).map_or(&[][..], |node| node.children.as_slice())
    }

    /// Whether `child` is a direct child of `parent`
    ///
    /// Grandchildren do not count; see [`Scene::is_descendant`].
    pub fn is_child(&self, parent: EntityId, child: EntityId) -> bool {
        self.entities
            .get(parent)
            .is_some_and(|node| node.children.contains(&child))
    }

    /// Whether `candidate` lies anywhere below `ancestor`
    pub fn is_descendant(&self, ancestor: EntityId, candidate: EntityId) -> bool {
        let mut current = self.parent(candidate);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Move an entity under `new_parent`, or to the scene roots for `None`
    ///
    /// With a parent and `keep_world_transform`, the local position is chosen
    /// so the world position stays put (rotation and scale are not
    /// compensated); without it the local position is reset to zero. Becoming
    /// a root bakes the full world transform into the local one.
    ///
    /// Must not be called on an entity whose subtree is being dispatched.
    pub fn set_parent(
        &mut self,
        id: EntityId,
        new_parent: Option<EntityId>,
        keep_world_transform: bool,
    ) -> Result<(), SceneError> {
        if let Err(error) = self.check_reparent(id, new_parent) {
            log::warn!("Rejected reparent: {error}");
            return Err(error);
        }

        match new_parent {
            Some(parent) => {
                let local_position = if keep_world_transform {
                    self.world_position(id).unwrap_or_else(Vec3::zeros)
                        - self.world_position(parent).unwrap_or_else(Vec3::zeros)
                } else {
                    Vec3::zeros()
                };
                if let Some(node) = self.entities.get_mut(id) {
                    node.transform.set_position(local_position);
                }
            }
            None => {
                let world = self.world_matrix(id).map(|m| Transform::from_matrix(&m));
                if let (Some(world), Some(node)) = (world, self.entities.get_mut(id)) {
                    node.transform.set_local(world);
                }
            }
        }

        self.detach(id);
        self.attach(id, new_parent);
        self.mark_subtree_dirty(id);

        log::debug!("Scene '{}': reparented {id:?} under {new_parent:?}", self.name);
        Ok(())
    }

    fn check_reparent(&self, id: EntityId, new_parent: Option<EntityId>) -> Result<(), SceneError> {
        let node = self.entities.get(id).ok_or(SceneError::NoSuchEntity(id))?;
        if node.parent == new_parent {
            return Err(SceneError::AlreadyParented(id));
        }

        if let Some(parent) = new_parent {
            if parent == id {
                return Err(SceneError::SelfParent(id));
            }
            if !self.entities.contains_key(parent) {
                return Err(SceneError::NoSuchEntity(parent));
            }
            if self.is_descendant(id, parent) {
                return Err(SceneError::WouldCreateCycle { child: id, parent });
            }
        }
        Ok(())
    }

    /// Release an entity from its owner (parent or root list) without destroying it
    pub(crate) fn detach(&mut self, id: EntityId) {
        let parent = self.entities.get_mut(id).and_then(|node| node.parent.take());
        match parent {
            Some(parent) => {
                if let Some(node) = self.entities.get_mut(parent) {
                    node.children.retain(|child| *child != id);
                }
            }
            None => self.roots.retain(|root| *root != id),
        }
    }

    /// Hand a detached entity to its new owner
    pub(crate) fn attach(&mut self, id: EntityId, parent: Option<EntityId>) {
        let parent = parent.filter(|parent| self.entities.contains_key(*parent));
        match parent.and_then(|parent| self.entities.get_mut(parent)) {
            Some(node) => node.children.push(id),
            None => self.roots.push(id),
        }
        if let Some(node) = self.entities.get_mut(id) {
            node.parent = parent;
        }
    }

    /// Mark an entity and every descendant dirty
    ///
    /// Descendants that are already dirty are not descended into: a dirty
    /// transform never has a clean descendant. The entity itself is always
    /// walked, since callers may have flagged it before its subtree.
    pub(crate) fn mark_subtree_dirty(&self, id: EntityId) {
        let Some(node) = self.entities.get(id) else {
            return;
        };
        node.transform.mark_dirty();

        let mut stack = node.children.clone();
        while let Some(id) = stack.pop() {
            if let Some(node) = self.entities.get(id) {
                if node.transform.is_dirty() {
                    continue;
                }
                node.transform.mark_dirty();
                stack.extend_from_slice(&node.children);
            }
        }
    }

    /// Set an entity's local position
    ///
    /// Returns `false` for unknown entities and unchanged values; otherwise
    /// the entity and its whole subtree are marked dirty.
    pub fn set_local_position(&mut self, id: EntityId, position: Vec3) -> bool {
        let changed = self
            .entities
            .get_mut(id)
            .is_some_and(|node| node.transform.set_position(position));
        if changed {
            self.mark_subtree_dirty(id);
        }
        changed
    }

    /// Set an entity's local rotation, marking the subtree dirty on change
    pub fn set_local_rotation(&mut self, id: EntityId, rotation: Quat) -> bool {
        let changed = self
            .entities
            .get_mut(id)
            .is_some_and(|node| node.transform.set_rotation(rotation));
        if changed {
            self.mark_subtree_dirty(id);
        }
        changed
    }

    /// Set an entity's local scale, marking the subtree dirty on change
    pub fn set_local_scale(&mut self, id: EntityId, scale: Vec3) -> bool {
        let changed = self
            .entities
            .get_mut(id)
            .is_some_and(|node| node.transform.set_scale(scale));
        if changed {
            self.mark_subtree_dirty(id);
        }
        changed
    }

    /// World matrix of an entity, recomputed through its ancestors if stale
    pub fn world_matrix(&self, id: EntityId) -> Option<Mat4> {
        let node = self.entities.get(id)?;
        if let Some(world) = node.transform.cached_world_matrix() {
            return Some(world);
        }

        let parent_world = node
            .parent
            .and_then(|parent| self.world_matrix(parent))
            .unwrap_or_else(Mat4::identity);
        Some(node.transform.refresh_world_matrix(&parent_world))
    }

    /// World position (translation column of the world matrix)
    pub fn world_position(&self, id: EntityId) -> Option<Vec3> {
        self.world_matrix(id).map(|m| translation_of(&m))
    }

    /// World rotation (scale-normalised rotation block of the world matrix)
    pub fn world_rotation(&self, id: EntityId) -> Option<Quat> {
        self.world_matrix(id).map(|m| Transform::from_matrix(&m).rotation)
    }

    /// World scale (column lengths of the world matrix)
    pub fn world_scale(&self, id: EntityId) -> Option<Vec3> {
        self.world_matrix(id).map(|m| scale_of(&m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::constants::PI;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn test_child_world_position_adds_parent() {
        let mut scene = Scene::new("test");
        let parent = scene.emplace_entity("parent");
        let child = scene.emplace_child(parent, "child").unwrap();
        scene.set_local_position(parent, Vec3::new(1.0, 2.0, 3.0));
        scene.set_local_position(child, Vec3::new(10.0, 0.0, 0.0));

        assert_relative_eq!(
            scene.world_position(child).unwrap(),
            Vec3::new(11.0, 2.0, 3.0),
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_query_leaves_descendants_dirty() {
        let mut scene = Scene::new("test");
        let a = scene.emplace_entity("a");
        let b = scene.emplace_child(a, "b").unwrap();
        let c = scene.emplace_child(b, "c").unwrap();

        scene.world_matrix(b);

        assert!(!scene.transform(a).unwrap().is_dirty());
        assert!(!scene.transform(b).unwrap().is_dirty());
        assert!(scene.transform(c).unwrap().is_dirty());
    }

    #[test]
    fn test_change_dirties_entire_subtree() {
        let mut scene = Scene::new("test");
        let a = scene.emplace_entity("a");
        let b = scene.emplace_child(a, "b").unwrap();
        let c = scene.emplace_child(b, "c").unwrap();
        scene.world_matrix(c);

        scene.set_local_scale(a, Vec3::new(2.0, 2.0, 2.0));

        assert!(scene.transform(b).unwrap().is_dirty());
        assert!(scene.transform(c).unwrap().is_dirty());
    }

    #[test]
    fn test_repeated_changes_stop_at_dirty_descendants() {
        let mut scene = Scene::new("test");
        let a = scene.emplace_entity("a");
        let b = scene.emplace_child(a, "b").unwrap();
        let c = scene.emplace_child(b, "c").unwrap();
        scene.world_matrix(c);

        scene.set_local_position(a, Vec3::new(1.0, 0.0, 0.0));
        scene.set_local_position(a, Vec3::new(2.0, 0.0, 0.0));
        scene.set_local_position(b, Vec3::new(0.0, 3.0, 0.0));

        assert!(scene.transform(c).unwrap().is_dirty());
        assert_relative_eq!(scene.world_position(c).unwrap(), Vec3::new(2.0, 3.0, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_already_dirty_entity_still_dirties_clean_children() {
        let mut scene = Scene::new("test");
        let a = scene.emplace_entity("a");
        let b = scene.emplace_child(a, "b").unwrap();
        let c = scene.emplace_child(b, "c").unwrap();
        scene.set_local_position(a, Vec3::new(4.0, 0.0, 0.0));
        scene.set_local_position(c, Vec3::new(0.0, 1.0, 0.0));
        scene.world_matrix(c);

        // Becoming a root flags `b` before its subtree is walked
        scene.set_parent(b, None, true).unwrap();
        assert!(scene.transform(c).unwrap().is_dirty());

        scene.world_matrix(c);
        scene.set_local_position(b, Vec3::new(-1.0, 0.0, 0.0));
        assert_relative_eq!(scene.world_position(c).unwrap(), Vec3::new(-1.0, 1.0, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_unchanged_value_is_a_no_op() {
        let mut scene = Scene::new("test");
        let a = scene.emplace_entity("a");
        scene.world_matrix(a);

        assert!(!scene.set_local_position(a, Vec3::zeros()));
        assert!(!scene.transform(a).unwrap().is_dirty());
    }

    #[test]
    fn test_rotation_change_invalidates_children() {
        let mut scene = Scene::new("test");
        let parent = scene.emplace_entity("parent");
        let child = scene.emplace_child(parent, "child").unwrap();
        scene.set_local_position(child, Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(scene.world_position(child).unwrap(), Vec3::new(1.0, 0.0, 0.0), epsilon = EPSILON);

        scene.set_local_rotation(parent, Quat::from_axis_angle(&Vec3::z_axis(), PI / 2.0));

        assert_relative_eq!(scene.world_position(child).unwrap(), Vec3::new(0.0, 1.0, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_is_child_is_shallow_and_is_descendant_is_deep() {
        let mut scene = Scene::new("test");
        let a = scene.emplace_entity("a");
        let b = scene.emplace_child(a, "b").unwrap();
        let c = scene.emplace_child(b, "c").unwrap();

        assert!(scene.is_child(a, b));
        assert!(!scene.is_child(a, c));
        assert!(scene.is_descendant(a, c));
        assert!(!scene.is_descendant(c, a));
        assert!(!scene.is_descendant(a, a));
    }

    #[test]
    fn test_reparent_rejections_leave_tree_untouched() {
        let mut scene = Scene::new("test");
        let a = scene.emplace_entity("a");
        let b = scene.emplace_child(a, "b").unwrap();
        let c = scene.emplace_child(b, "c").unwrap();

        assert_eq!(scene.set_parent(a, Some(a), true), Err(SceneError::SelfParent(a)));
        assert_eq!(
            scene.set_parent(a, Some(c), true),
            Err(SceneError::WouldCreateCycle { child: a, parent: c })
        );
        assert_eq!(scene.set_parent(b, Some(a), true), Err(SceneError::AlreadyParented(b)));
        assert_eq!(scene.set_parent(a, None, true), Err(SceneError::AlreadyParented(a)));

        assert_eq!(scene.roots(), &[a]);
        assert_eq!(scene.children(a), &[b]);
        assert_eq!(scene.children(b), &[c]);
    }

    #[test]
    fn test_reparent_without_keep_zeroes_position() {
        let mut scene = Scene::new("test");
        let a = scene.emplace_entity("a");
        let b = scene.emplace_entity("b");
        scene.set_local_position(a, Vec3::new(3.0, 0.0, 0.0));
        scene.set_local_position(b, Vec3::new(7.0, 0.0, 0.0));

        scene.set_parent(b, Some(a), false).unwrap();

        assert_eq!(scene.transform(b).unwrap().local_position(), Vec3::zeros());
        assert_relative_eq!(scene.world_position(b).unwrap(), Vec3::new(3.0, 0.0, 0.0), epsilon = EPSILON);
        assert_eq!(scene.roots(), &[a]);
        assert_eq!(scene.parent(b), Some(a));
    }

    #[test]
    fn test_becoming_root_bakes_world_transform() {
        let mut scene = Scene::new("test");
        let a = scene.emplace_entity("a");
        let b = scene.emplace_child(a, "b").unwrap();
        scene.set_local_scale(a, Vec3::new(2.0, 2.0, 2.0));
        scene.set_local_position(b, Vec3::new(1.0, 0.0, 0.0));

        scene.set_parent(b, None, true).unwrap();

        let transform = scene.transform(b).unwrap();
        assert_relative_eq!(transform.local_position(), Vec3::new(2.0, 0.0, 0.0), epsilon = EPSILON);
        assert_relative_eq!(transform.local_scale(), Vec3::new(2.0, 2.0, 2.0), epsilon = EPSILON);
        assert_eq!(scene.parent(b), None);
        assert_eq!(scene.roots(), &[a, b]);
    }
}
