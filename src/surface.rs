use crate::geometry::Point;
use crate::hand::HandEstimate;

/// Drawing commands the game loop issues; implementations never report back
pub trait RenderSurface {
    /// Refresh the camera layer. The terminal has no video, so the tracked
    /// hands stand in for it.
    fn draw_camera_frame(&mut self, hands: &HandEstimate);
    fn draw_target(&mut self, at: Point, size: f64);
    fn clear_overlay(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawnTarget {
    pub at: Point,
    pub size: f64,
}

/// Retained overlay state, read back by the ratatui playfield each frame
#[derive(Debug, Clone, Default)]
pub struct Overlay {
    pub target: Option<DrawnTarget>,
    pub hands: HandEstimate,
    pub frames: u64,
}

impl RenderSurface for Overlay {
    fn draw_camera_frame(&mut self, hands: &HandEstimate) {
        self.hands = *hands;
        self.frames += 1;
    }

    fn draw_target(&mut self, at: Point, size: f64) {
        self.target = Some(DrawnTarget { at, size });
    }

    fn clear_overlay(&mut self) {
        self.target = None;
    }
}

/// Surface for headless runs; drops every command
#[derive(Debug, Default)]
pub struct NullSurface;

impl RenderSurface for NullSurface {
    fn draw_camera_frame(&mut self, _hands: &HandEstimate) {}
    fn draw_target(&mut self, _at: Point, _size: f64) {}
    fn clear_overlay(&mut self) {}
}
