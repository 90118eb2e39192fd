//! Components and their lifecycle capabilities
//!
//! A component is a unit of behaviour attached to exactly one entity. It may
//! adopt any subset of five capabilities (init, update, render, debug overlay,
//! inspector). Adoption is declared explicitly by overriding the matching
//! accessor on [`Component`], usually through [`impl_component!`]. The entity
//! probes the accessors once, when the component is added, and caches the
//! resulting [`Capabilities`] set for dispatch.
//!
//! ```
//! use spark_engine::prelude::*;
//!
//! struct Spin {
//!     degrees_per_second: f32,
//! }
//!
//! impl Updatable for Spin {
//!     fn update(&mut self, entity: &mut EntityMut<'_>, delta_time: f32) {
//!         let step = utils::from_euler_degrees(Vec3::new(0.0, 0.0, self.degrees_per_second * delta_time));
//!         let rotation = entity.transform().map(|t| t.local_rotation() * step);
//!         if let Some(rotation) = rotation {
//!             entity.set_local_rotation(rotation);
//!         }
//!     }
//! }
//!
//! spark_engine::impl_component!(Spin => update);
//! ```

pub mod transform;

use std::any::Any;

use bitflags::bitflags;

use crate::entity::EntityMut;
use crate::render::Canvas;
use crate::ui::Ui;

pub use transform::TransformComponent;

/// Called exactly once per component, before its first update
pub trait Initializable {
    /// Initialize the component
    fn init(&mut self, entity: &mut EntityMut<'_>);
}

/// Called once per frame while the owning entity is live
pub trait Updatable {
    /// Advance the component by `delta_time` seconds
    fn update(&mut self, entity: &mut EntityMut<'_>, delta_time: f32);
}

/// Draws onto the frame's canvas
pub trait Renderable {
    /// Render the component
    fn render(&mut self, entity: &mut EntityMut<'_>, canvas: &mut dyn Canvas);
}

/// Draws a per-frame debug overlay through the immediate-mode UI
pub trait DebugRenderable {
    /// Render the debug overlay
    fn render_debug_overlay(&mut self, entity: &mut EntityMut<'_>, ui: &mut dyn Ui);
}

/// Draws an editor section when its entity is selected in the inspector
pub trait InspectorRenderable {
    /// Render the inspector section
    fn render_inspector(&mut self, entity: &mut EntityMut<'_>, ui: &mut dyn Ui);
}

bitflags! {
    /// Set of lifecycle capabilities a component exposes
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u8 {
        /// [`Initializable`]
        const INIT = 1 << 0;
        /// [`Updatable`]
        const UPDATE = 1 << 1;
        /// [`Renderable`]
        const RENDER = 1 << 2;
        /// [`DebugRenderable`]
        const DEBUG_OVERLAY = 1 << 3;
        /// [`InspectorRenderable`]
        const INSPECTOR = 1 << 4;
    }
}

impl Capabilities {
    /// Probe a component's accessors and collect the capabilities it declares
    pub fn probe(component: &mut dyn Component) -> Self {
        let mut capabilities = Self::empty();
        capabilities.set(Self::INIT, component.as_initializable().is_some());
        capabilities.set(Self::UPDATE, component.as_updatable().is_some());
        capabilities.set(Self::RENDER, component.as_renderable().is_some());
        capabilities.set(Self::DEBUG_OVERLAY, component.as_debug_renderable().is_some());
        capabilities.set(Self::INSPECTOR, component.as_inspector_renderable().is_some());
        capabilities
    }
}

/// Base trait for everything that can be attached to an entity
///
/// At most one instance per concrete type lives on an entity. The
/// capability accessors default to `None`; override the ones the component
/// implements, or let [`impl_component!`] generate them.
pub trait Component: Any {
    /// Upcast for type-safe downcasting
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for type-safe downcasting
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Init capability
    fn as_initializable(&mut self) -> Option<&mut dyn Initializable> {
        None
    }

    /// Update capability
    fn as_updatable(&mut self) -> Option<&mut dyn Updatable> {
        None
    }

    /// Render capability
    fn as_renderable(&mut self) -> Option<&mut dyn Renderable> {
        None
    }

    /// Debug overlay capability
    fn as_debug_renderable(&mut self) -> Option<&mut dyn DebugRenderable> {
        None
    }

    /// Inspector capability
    fn as_inspector_renderable(&mut self) -> Option<&mut dyn InspectorRenderable> {
        None
    }

    /// Type name used in diagnostics
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Implement [`Component`] for a type, declaring its capabilities
///
/// Capabilities are listed after `=>` using the names `init`, `update`,
/// `render`, `debug_overlay` and `inspector`; each one requires the type to
/// implement the matching trait.
///
/// ```ignore
/// impl_component!(Marker);
/// impl_component!(Spinner => init, update, render);
/// ```
#[macro_export]
macro_rules! impl_component {
    (@cap init) => {
        fn as_initializable(
            &mut self,
        ) -> ::core::option::Option<&mut dyn $crate::component::Initializable> {
            ::core::option::Option::Some(self)
        }
    };
    (@cap update) => {
        fn as_updatable(&mut self) -> ::core::option::Option<&mut dyn $crate::component::Updatable> {
            ::core::option::Option::Some(self)
        }
    };
    (@cap render) => {
        fn as_renderable(&mut self) -> ::core::option::Option<&mut dyn $crate::component::Renderable> {
            ::core::option::Option::Some(self)
        }
    };
    (@cap debug_overlay) => {
        fn as_debug_renderable(
            &mut self,
        ) -> ::core::option::Option<&mut dyn $crate::component::DebugRenderable> {
            ::core::option::Option::Some(self)
        }
    };
    (@cap inspector) => {
        fn as_inspector_renderable(
            &mut self,
        ) -> ::core::option::Option<&mut dyn $crate::component::InspectorRenderable> {
            ::core::option::Option::Some(self)
        }
    };
    ($ty:ty $(=> $($cap:ident),+ $(,)?)?) => {
        impl $crate::component::Component for $ty {
            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }

            $($($crate::impl_component!(@cap $cap);)+)?
        }
    };
}
