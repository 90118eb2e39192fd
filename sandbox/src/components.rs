//! Demo components, one per lifecycle capability

use nalgebra::UnitQuaternion;
use spark_engine::impl_component;
use spark_engine::prelude::*;

/// Logs a greeting the first time its entity is initialized
pub struct Greeter {
    pub greeting: String,
}

impl Initializable for Greeter {
    fn init(&mut self, entity: &mut EntityMut<'_>) {
        log::info!("{} from '{}'", self.greeting, entity.name());
    }
}

impl_component!(Greeter => init);

/// Rotates its entity around the local Z axis
pub struct Spinner {
    pub degrees_per_second: f32,
}

impl Updatable for Spinner {
    fn update(&mut self, entity: &mut EntityMut<'_>, delta_time: f32) {
        let step = UnitQuaternion::from_euler_angles(0.0, 0.0, utils::deg_to_rad(self.degrees_per_second * delta_time));
        if let Some(rotation) = entity.transform().map(|t| t.local_rotation() * step) {
            entity.set_local_rotation(rotation);
        }
    }
}

impl_component!(Spinner => update);

/// Flags its entity for deletion once `remaining` seconds have elapsed
pub struct Lifetime {
    pub remaining: f32,
}

impl Updatable for Lifetime {
    fn update(&mut self, entity: &mut EntityMut<'_>, delta_time: f32) {
        if entity.is_to_be_deleted() {
            return;
        }
        self.remaining -= delta_time;
        if self.remaining <= 0.0 {
            log::info!("'{}' expired", entity.name());
            entity.delete();
        }
    }
}

impl_component!(Lifetime => update);

/// Filled square drawn at the entity's world position
pub struct Marker {
    pub color: Color,
    pub size: f32,
}

impl Renderable for Marker {
    fn render(&mut self, entity: &mut EntityMut<'_>, canvas: &mut dyn Canvas) {
        let position = entity.world_position();
        canvas.set_draw_color(self.color);
        canvas.fill_rect(Rect::centered(position.x, position.y, self.size, self.size));
    }
}

impl_component!(Marker => render);

/// Prints the entity's name and world position in the debug overlay
pub struct DebugLabel;

impl DebugRenderable for DebugLabel {
    fn render_debug_overlay(&mut self, entity: &mut EntityMut<'_>, ui: &mut dyn Ui) {
        let position = entity.world_position();
        ui.text(&format!(
            "{}: ({:.1}, {:.1}, {:.1})",
            entity.name(),
            position.x,
            position.y,
            position.z
        ));
    }
}

impl_component!(DebugLabel => debug_overlay);

/// Inspector button shifting the entity along X
pub struct Nudge {
    pub step: f32,
}

impl InspectorRenderable for Nudge {
    fn render_inspector(&mut self, entity: &mut EntityMut<'_>, ui: &mut dyn Ui) {
        if ui.button(&format!("Add {} to Position", self.step)) {
            let position = entity.transform().map_or_else(Vec3::zeros, TransformComponent::local_position);
            entity.set_local_position(position + Vec3::new(self.step, 0.0, 0.0));
        }
    }
}

impl_component!(Nudge => inspector);
