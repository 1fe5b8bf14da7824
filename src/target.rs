use rand::Rng;
use tracing::debug;

use crate::config::SpawnZone;
use crate::geometry::Point;

/// What the overlay needs to do after a spawner tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderAction {
    None,
    Show(Point),
    Hide,
}

/// The single target; hidden targets have no position
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub position: Option<Point>,
    pub shown_at_ms: u64,
    pub display_size: f64,
}

impl Target {
    pub fn hidden(display_size: f64) -> Self {
        Self {
            position: None,
            shown_at_ms: 0,
            display_size,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.position.is_some()
    }

    pub fn center(&self) -> Option<Point> {
        let half = self.display_size / 2.0;
        self.position.map(|p| Point::new(p.x + half, p.y + half))
    }

    pub fn hide(&mut self) {
        self.position = None;
    }
}

/// Drives the target through hidden -> visible -> hidden
#[derive(Debug)]
pub struct TargetSpawner<R: Rng> {
    zone: SpawnZone,
    visible_ms: u64,
    rng: R,
}

impl<R: Rng> TargetSpawner<R> {
    pub fn new(zone: SpawnZone, visible_ms: u64, rng: R) -> Self {
        Self {
            zone,
            visible_ms,
            rng,
        }
    }

    pub fn tick(&mut self, target: &mut Target, now_ms: u64) -> RenderAction {
        match target.position {
            None => {
                let at = self.random_position();
                target.position = Some(at);
                target.shown_at_ms = now_ms;
                debug!(x = at.x, y = at.y, "target shown");
                RenderAction::Show(at)
            }
            Some(_) if now_ms.saturating_sub(target.shown_at_ms) >= self.visible_ms => {
                target.hide();
                debug!("target timed out");
                RenderAction::Hide
            }
            Some(_) => RenderAction::None,
        }
    }

    /// Uniform integer position inside the spawn bounds, resampled until it
    /// lands outside the exclusion zone.
    pub fn random_position(&mut self) -> Point {
        let b = self.zone.bounds;
        let (x_lo, x_hi) = (b.min_x.ceil() as i64, b.max_x.floor() as i64);
        let (y_lo, y_hi) = (b.min_y.ceil() as i64, b.max_y.floor() as i64);
        loop {
            let p = Point::new(
                self.rng.gen_range(x_lo..x_hi) as f64,
                self.rng.gen_range(y_lo..y_hi) as f64,
            );
            if !self.zone.exclusion.contains_open(p) {
                return p;
            }
        }
    }
}
