//! UI System Module
//!
//! Immediate-mode UI boundary. The runtime describes widgets through the
//! [`Ui`] trait and leaves drawing and input to the backend.
//!
//! - [`Ui`]: widget calls used by debug overlays and inspectors
//! - [`panels`]: scene-graph outline and entity inspector built on top of it

pub mod panels;

use bitflags::bitflags;

pub use panels::{EditorPanels, InspectorPanel, SceneGraphPanel};

bitflags! {
    /// Presentation flags for [`Ui::tree_node`]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TreeNodeFlags: u8 {
        /// The node has no children and shows no expand arrow
        const LEAF = 1 << 0;
        /// The node is highlighted as selected
        const SELECTED = 1 << 1;
    }
}

/// Result of drawing a tree node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TreeNodeResponse {
    /// The node is expanded; the caller must draw its children and call [`Ui::tree_pop`]
    pub open: bool,
    /// The node label was clicked this frame
    pub clicked: bool,
}

/// Immediate-mode UI backend
///
/// Methods returning `bool` report user interaction during this frame.
pub trait Ui {
    /// Open a window; widgets go into it until [`Ui::end_window`]
    fn begin_window(&mut self, title: &str);

    /// Close the window opened by the last [`Ui::begin_window`]
    fn end_window(&mut self);

    /// Plain text line
    fn text(&mut self, text: &str);

    /// Horizontal separator
    fn separator(&mut self);

    /// Collapsible section header, returns whether it is expanded
    fn collapsing_header(&mut self, label: &str) -> bool;

    /// Draggable editor for three floats, returns whether `values` changed
    ///
    /// `range` limits the values when given.
    fn drag_float3(&mut self, label: &str, values: &mut [f32; 3], speed: f32, range: Option<(f32, f32)>) -> bool;

    /// Push button, returns whether it was pressed
    fn button(&mut self, label: &str) -> bool;

    /// Tree node identified by `id`
    fn tree_node(&mut self, id: u64, label: &str, flags: TreeNodeFlags) -> TreeNodeResponse;

    /// Close an open tree node
    fn tree_pop(&mut self);
}
