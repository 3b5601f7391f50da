//! Floating Preview Surface
//!
//! Presentation state of the preview window. Visibility lives in the
//! [`PreviewStore`]; the surface tracks its mode and an in-progress drag, and
//! writes the dragged position back to the store.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::store::PreviewStore;
use crate::core::{Point2D, Size2D};

/// Footprint of the minimized preview
pub const MINIMIZED_SIZE: Size2D = Size2D {
    width: 320.0,
    height: 200.0,
};

/// Presentation mode
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SurfaceMode {
    #[default]
    Minimized,
    Windowed,
    Fullscreen,
}

/// Keys the surface reacts to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceKey {
    Escape,
    Other,
}

/// Visible area the surface lives in
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Keeps a box of `size` at `position` fully inside `viewport` where possible
pub fn clamp_position(position: Point2D, size: Size2D, viewport: Viewport) -> Point2D {
    let max_x = (viewport.width - size.width).max(0.0);
    let max_y = (viewport.height - size.height).max(0.0);
    let clamp = |v: f64, max: f64| if v.is_finite() { v.clamp(0.0, max) } else { 0.0 };
    Point2D::new(clamp(position.x, max_x), clamp(position.y, max_y))
}

#[derive(Clone, Copy, Debug)]
struct DragOrigin {
    pointer: Point2D,
    position: Point2D,
}

/// Minimized / windowed / fullscreen preview
#[derive(Debug)]
pub struct FloatingPreview {
    mode: SurfaceMode,
    viewport: Viewport,
    drag: Option<DragOrigin>,
}

impl FloatingPreview {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            mode: SurfaceMode::Minimized,
            viewport,
            drag: None,
        }
    }

    pub fn mode(&self) -> SurfaceMode {
        self.mode
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Returns true if the store says the preview is open
    pub fn is_visible(&self, store: &PreviewStore) -> bool {
        store.is_open()
    }

    // =========================================================================
    // Mode Transitions
    // =========================================================================

    pub fn expand(&mut self) {
        self.drag = None;
        self.mode = SurfaceMode::Windowed;
    }

    pub fn minimize(&mut self) {
        self.mode = SurfaceMode::Minimized;
    }

    /// Fullscreen returns to windowed; any other mode enters fullscreen
    pub fn toggle_fullscreen(&mut self) {
        self.drag = None;
        self.mode = match self.mode {
            SurfaceMode::Fullscreen => SurfaceMode::Windowed,
            _ => SurfaceMode::Fullscreen,
        };
    }

    /// Returns true if the key was consumed
    pub fn handle_key(&mut self, key: SurfaceKey) -> bool {
        match (key, self.mode) {
            (SurfaceKey::Escape, SurfaceMode::Fullscreen) => {
                self.mode = SurfaceMode::Windowed;
                true
            }
            _ => false,
        }
    }

    /// Closes the preview from any mode
    pub fn close(&mut self, store: &mut PreviewStore) {
        self.drag = None;
        self.mode = SurfaceMode::Minimized;
        if store.is_open() {
            store.toggle_preview();
        }
    }

    // =========================================================================
    // Dragging
    // =========================================================================

    /// Starts a drag; only the visible minimized surface can be dragged
    pub fn begin_drag(&mut self, pointer: Point2D, store: &PreviewStore) -> bool {
        if self.mode != SurfaceMode::Minimized || !store.is_open() {
            debug!("begin_drag ignored in {:?} mode", self.mode);
            return false;
        }
        self.drag = Some(DragOrigin {
            pointer,
            position: store.state().position,
        });
        true
    }

    /// Moves the surface with the pointer and returns the clamped position
    pub fn drag_to(&mut self, pointer: Point2D, store: &mut PreviewStore) -> Option<Point2D> {
        let origin = self.drag?;
        let proposed = Point2D::new(
            origin.position.x + (pointer.x - origin.pointer.x),
            origin.position.y + (pointer.y - origin.pointer.y),
        );
        let clamped = clamp_position(proposed, MINIMIZED_SIZE, self.viewport);
        store.set_preview_position(clamped);
        Some(clamped)
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    /// Resizes the viewport and pulls the stored position back inside it
    pub fn set_viewport(&mut self, viewport: Viewport, store: &mut PreviewStore) {
        self.viewport = viewport;
        let clamped = clamp_position(store.state().position, MINIMIZED_SIZE, viewport);
        store.set_preview_position(clamped);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::settings::PreviewSettings;

    fn open_store() -> PreviewStore {
        let mut store = PreviewStore::new(&PreviewSettings::default());
        store.open();
        store
    }

    fn surface() -> FloatingPreview {
        FloatingPreview::new(Viewport::new(1280.0, 800.0))
    }

    #[test]
    fn test_mode_transitions() {
        let mut surface = surface();
        assert_eq!(surface.mode(), SurfaceMode::Minimized);

        surface.expand();
        assert_eq!(surface.mode(), SurfaceMode::Windowed);
        surface.toggle_fullscreen();
        assert_eq!(surface.mode(), SurfaceMode::Fullscreen);
        surface.toggle_fullscreen();
        assert_eq!(surface.mode(), SurfaceMode::Windowed);
        surface.minimize();
        assert_eq!(surface.mode(), SurfaceMode::Minimized);
    }

    #[test]
    fn test_escape_only_leaves_fullscreen() {
        let mut surface = surface();
        assert!(!surface.handle_key(SurfaceKey::Escape));

        surface.toggle_fullscreen();
        assert!(!surface.handle_key(SurfaceKey::Other));
        assert!(surface.handle_key(SurfaceKey::Escape));
        assert_eq!(surface.mode(), SurfaceMode::Windowed);
    }

    #[test]
    fn test_close_from_every_mode() {
        for setup in [
            (|_: &mut FloatingPreview| {}) as fn(&mut FloatingPreview),
            |s| s.expand(),
            |s| s.toggle_fullscreen(),
        ] {
            let mut store = open_store();
            let mut surface = surface();
            setup(&mut surface);

            surface.close(&mut store);
            assert!(!store.is_open());
            assert!(!surface.is_visible(&store));
        }
    }

    #[test]
    fn test_drag_only_when_minimized() {
        let mut store = open_store();
        let mut surface = surface();
        surface.expand();
        assert!(!surface.begin_drag(Point2D::new(0.0, 0.0), &store));

        surface.minimize();
        assert!(surface.begin_drag(Point2D::new(30.0, 30.0), &store));
        let moved = surface.drag_to(Point2D::new(130.0, 80.0), &mut store).unwrap();
        assert_eq!(moved, Point2D::new(120.0, 70.0));
        assert_eq!(store.state().position, moved);

        surface.end_drag();
        assert!(surface.drag_to(Point2D::new(500.0, 500.0), &mut store).is_none());
    }

    #[test]
    fn test_drag_is_clamped_to_viewport() {
        let mut store = open_store();
        let mut surface = surface();
        surface.begin_drag(Point2D::new(0.0, 0.0), &store);

        let far = surface.drag_to(Point2D::new(5000.0, -5000.0), &mut store).unwrap();
        assert_eq!(far, Point2D::new(1280.0 - MINIMIZED_SIZE.width, 0.0));
    }

    #[test]
    fn test_shrinking_viewport_reclamps_position() {
        let mut store = open_store();
        store.set_preview_position(Point2D::new(1000.0, 700.0));
        let mut surface = surface();

        surface.set_viewport(Viewport::new(800.0, 600.0), &mut store);
        assert_eq!(store.state().position, Point2D::new(480.0, 400.0));
    }

    #[test]
    fn test_closed_preview_cannot_be_dragged() {
        let store = PreviewStore::new(&PreviewSettings::default());
        let mut surface = surface();
        assert!(!surface.begin_drag(Point2D::new(0.0, 0.0), &store));
    }
}
