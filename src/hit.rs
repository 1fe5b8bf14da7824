use tracing::info;

use crate::geometry::Point;
use crate::hand::{HandEstimate, Side};
use crate::score::ScoreTracker;
use crate::target::Target;

/// A hand reached the visible target this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitEvent {
    pub side: Side,
    pub hand: Point,
    pub target_center: Point,
    pub score: u32,
    pub at_ms: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct HitDetector {
    touch_margin: f64,
}

impl HitDetector {
    pub fn new(touch_margin: f64) -> Self {
        Self { touch_margin }
    }

    /// Axis-aligned proximity test against the target's center
    pub fn touches(&self, hand: Point, center: Point) -> bool {
        (hand.x - center.x).abs() < self.touch_margin
            && (hand.y - center.y).abs() < self.touch_margin
    }

    /// Check left then right; the first hand in reach scores and hides the
    /// target, so at most one hit lands per frame.
    pub fn detect(
        &self,
        hands: &HandEstimate,
        target: &mut Target,
        score: &mut ScoreTracker,
        now_ms: u64,
    ) -> Option<HitEvent> {
        let center = target.center()?;
        let (side, hand) = hands
            .hands()
            .into_iter()
            .find_map(|(side, hand)| hand.filter(|h| self.touches(*h, center)).map(|h| (side, h)))?;

        let new_score = score.add_hit();
        target.hide();
        info!(%side, score = new_score, "hit");

        Some(HitEvent {
            side,
            hand,
            target_center: center,
            score: new_score,
            at_ms: now_ms,
        })
    }
}
