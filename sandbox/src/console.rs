//! Headless canvas and UI backends that report through the logger

use spark_engine::prelude::*;

/// Canvas that counts draw calls and logs a summary on present
#[derive(Debug, Default)]
pub struct ConsoleCanvas {
    color: Color,
    draw_calls: u32,
    frames: u64,
}

impl ConsoleCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames presented so far
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Canvas for ConsoleCanvas {
    fn set_draw_color(&mut self, color: Color) {
        self.color = color;
    }

    fn clear(&mut self) {
        self.draw_calls = 0;
    }

    fn present(&mut self) {
        self.frames += 1;
        log::debug!("frame {}: {} draw calls", self.frames, self.draw_calls);
    }

    fn draw_point(&mut self, x: f32, y: f32) {
        self.draw_calls += 1;
        log::trace!("point ({x}, {y}) {:?}", self.color);
    }

    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.draw_calls += 1;
        log::trace!("line ({x1}, {y1}) -> ({x2}, {y2}) {:?}", self.color);
    }

    fn draw_rect(&mut self, rect: Rect) {
        self.draw_calls += 1;
        log::trace!("rect {rect:?} {:?}", self.color);
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.draw_calls += 1;
        log::trace!("filled rect {rect:?} {:?}", self.color);
    }
}

/// Immediate-mode UI that logs every widget at debug level
///
/// Headers and tree nodes are always open. A button whose label matches
/// `press` reports a click once.
#[derive(Debug, Default)]
pub struct ConsoleUi {
    depth: usize,
    press: Option<String>,
}

impl ConsoleUi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Click the next button labelled `label`
    pub fn press_button(&mut self, label: &str) {
        self.press = Some(label.to_string());
    }

    fn line(&self, text: &str) {
        log::debug!("{:indent$}{text}", "", indent = self.depth * 2);
    }
}

impl Ui for ConsoleUi {
    fn begin_window(&mut self, title: &str) {
        self.line(&format!("[{title}]"));
        self.depth += 1;
    }

    fn end_window(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn text(&mut self, text: &str) {
        self.line(text);
    }

    fn separator(&mut self) {
        self.line("----");
    }

    fn collapsing_header(&mut self, label: &str) -> bool {
        self.line(&format!("v {label}"));
        true
    }

    fn drag_float3(&mut self, label: &str, values: &mut [f32; 3], _speed: f32, _range: Option<(f32, f32)>) -> bool {
        self.line(&format!("{label}: [{:.2}, {:.2}, {:.2}]", values[0], values[1], values[2]));
        false
    }

    fn button(&mut self, label: &str) -> bool {
        let pressed = self.press.as_deref() == Some(label);
        if pressed {
            self.press = None;
        }
        self.line(&format!("({label}){}", if pressed { " *" } else { "" }));
        pressed
    }

    fn tree_node(&mut self, _id: u64, label: &str, flags: TreeNodeFlags) -> TreeNodeResponse {
        let marker = if flags.contains(TreeNodeFlags::SELECTED) { ">" } else { "-" };
        self.line(&format!("{marker} {label}"));
        let open = !flags.contains(TreeNodeFlags::LEAF);
        if open {
            self.depth += 1;
        }
        TreeNodeResponse { open, clicked: false }
    }

    fn tree_pop(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}
