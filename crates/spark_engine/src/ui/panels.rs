//! Editor panels
//!
//! The scene-graph panel draws the current scene as a tree and tracks the
//! selected entity; the inspector panel draws that entity's inspector.

use slotmap::Key;

use crate::entity::EntityId;
use crate::scene::{Scene, SceneManager};

use super::{TreeNodeFlags, Ui};

/// Outline of the scene hierarchy with single selection
#[derive(Debug, Default)]
pub struct SceneGraphPanel {
    selected: Option<EntityId>,
}

impl SceneGraphPanel {
    /// Window title
    pub const TITLE: &'static str = "SceneGraph";

    /// Create a panel with nothing selected
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently selected entity
    pub fn selected(&self) -> Option<EntityId> {
        self.selected
    }

    /// Select an entity, or clear the selection
    pub fn select(&mut self, id: Option<EntityId>) {
        self.selected = id;
    }

    /// Draw the hierarchy of `scene`; clicking a node selects it
    pub fn render(&mut self, scene: &Scene, ui: &mut dyn Ui) {
        if self.selected.is_some_and(|id| !scene.contains(id)) {
            self.selected = None;
        }

        ui.begin_window(Self::TITLE);
        ui.text("Hierarchy:");
        ui.separator();
        for root in scene.roots() {
            self.render_node(scene, *root, ui);
        }
        ui.end_window();
    }

    fn render_node(&mut self, scene: &Scene, id: EntityId, ui: &mut dyn Ui) {
        let Some(entity) = scene.entity(id) else {
            return;
        };

        let mut flags = TreeNodeFlags::empty();
        flags.set(TreeNodeFlags::LEAF, entity.children().is_empty());
        flags.set(TreeNodeFlags::SELECTED, self.selected == Some(id));

        let response = ui.tree_node(id.data().as_ffi(), entity.name(), flags);
        if response.clicked {
            self.selected = Some(id);
        }
        if response.open {
            for child in entity.children() {
                self.render_node(scene, *child, ui);
            }
            ui.tree_pop();
        }
    }
}

/// Inspector for the selected entity
#[derive(Debug, Default)]
pub struct InspectorPanel;

impl InspectorPanel {
    /// Window title
    pub const TITLE: &'static str = "Inspector Panel";

    /// Draw the inspector of `selected`, or a placeholder
    pub fn render(scene: &mut Scene, selected: Option<EntityId>, ui: &mut dyn Ui) {
        ui.begin_window(Self::TITLE);
        match selected.filter(|id| scene.contains(*id)) {
            Some(id) => {
                ui.text("Inspector:");
                ui.separator();
                scene.render_inspector(id, ui);
            }
            None => ui.text("No entity selected"),
        }
        ui.end_window();
    }
}

/// Scene-graph and inspector panels sharing one selection
#[derive(Debug, Default)]
pub struct EditorPanels {
    scene_graph: SceneGraphPanel,
}

impl EditorPanels {
    /// Create the panels with nothing selected
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently selected entity
    pub fn selected(&self) -> Option<EntityId> {
        self.scene_graph.selected()
    }

    /// Select an entity, or clear the selection
    pub fn select(&mut self, id: Option<EntityId>) {
        self.scene_graph.select(id);
    }

    /// Draw both panels for the current scene
    pub fn render(&mut self, scenes: &mut SceneManager, ui: &mut dyn Ui) {
        self.scene_graph.render(scenes.current_scene(), ui);
        InspectorPanel::render(scenes.current_scene_mut(), self.scene_graph.selected(), ui);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::TreeNodeResponse;

    /// Records widget calls; clicks the node whose label matches `click`
    #[derive(Default)]
    struct ScriptedUi {
        lines: Vec<String>,
        click: Option<String>,
    }

    impl Ui for ScriptedUi {
        fn begin_window(&mut self, title: &str) {
            self.lines.push(format!("window {title}"));
        }
        fn end_window(&mut self) {
            self.lines.push("end".to_string());
        }
        fn text(&mut self, text: &str) {
            self.lines.push(format!("text {text}"));
        }
        fn separator(&mut self) {}
        fn collapsing_header(&mut self, label: &str) -> bool {
            self.lines.push(format!("header {label}"));
            false
        }
        fn drag_float3(&mut self, _label: &str, _values: &mut [f32; 3], _speed: f32, _range: Option<(f32, f32)>) -> bool {
            false
        }
        fn button(&mut self, _label: &str) -> bool {
            false
        }
        fn tree_node(&mut self, _id: u64, label: &str, flags: TreeNodeFlags) -> TreeNodeResponse {
            let leaf = if flags.contains(TreeNodeFlags::LEAF) { " leaf" } else { "" };
            let selected = if flags.contains(TreeNodeFlags::SELECTED) { " selected" } else { "" };
            self.lines.push(format!("node {label}{leaf}{selected}"));
            TreeNodeResponse {
                open: true,
                clicked: self.click.as_deref() == Some(label),
            }
        }
        fn tree_pop(&mut self) {
            self.lines.push("pop".to_string());
        }
    }

    #[test]
    fn test_scene_graph_outline_and_selection() {
        let mut scene = Scene::new("test");
        let hello = scene.emplace_entity("Hello");
        scene.emplace_child(hello, "World").unwrap();

        let mut panel = SceneGraphPanel::new();
        let mut ui = ScriptedUi {
            click: Some("Hello".to_string()),
            ..ScriptedUi::default()
        };
        panel.render(&scene, &mut ui);

        assert_eq!(panel.selected(), Some(hello));
        assert_eq!(
            ui.lines,
            vec![
                "window SceneGraph",
                "text Hierarchy:",
                "node Hello",
                "node World leaf",
                "pop",
                "pop",
                "end",
            ]
        );
    }

    #[test]
    fn test_stale_selection_is_cleared() {
        let mut scene = Scene::new("test");
        let id = scene.emplace_entity("gone");
        let mut panel = SceneGraphPanel::new();
        panel.select(Some(id));
        scene.remove_entity(id);

        panel.render(&scene, &mut ScriptedUi::default());

        assert_eq!(panel.selected(), None);
    }

    #[test]
    fn test_inspector_placeholder_and_selected_entity() {
        let mut scene = Scene::new("test");
        let id = scene.emplace_entity("Hello");

        let mut ui = ScriptedUi::default();
        InspectorPanel::render(&mut scene, None, &mut ui);
        assert!(ui.lines.contains(&"text No entity selected".to_string()));

        let mut ui = ScriptedUi::default();
        InspectorPanel::render(&mut scene, Some(id), &mut ui);
        assert_eq!(
            ui.lines,
            vec![
                "window Inspector Panel",
                "text Inspector:",
                "text Hello",
                "header Transform",
                "end",
            ]
        );
    }
}
