use rand::Rng;
use tracing::info;

use crate::audio::AudioCue;
use crate::config::GameConfig;
use crate::hand::{HandEstimate, HandEstimator};
use crate::hit::{HitDetector, HitEvent};
use crate::pose::{FeedStatus, PoseSlot};
use crate::score::ScoreTracker;
use crate::session::SessionTimer;
use crate::surface::RenderSurface;
use crate::target::{RenderAction, Target, TargetSpawner};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum LoopState {
    AwaitingResources,
    Running,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// Pose model or target sprite still loading; nothing happened
    Waiting,
    Frame {
        action: RenderAction,
        hit: Option<HitEvent>,
    },
    Stopped,
}

impl StepOutcome {
    pub fn reschedule(&self) -> bool {
        !matches!(self, StepOutcome::Stopped)
    }
}

/// Owns the session state and advances it one frame per `step`; once time is
/// up it stops for good and asks not to be rescheduled.
pub struct Game<R: Rng> {
    timer: SessionTimer,
    spawner: TargetSpawner<R>,
    estimator: HandEstimator,
    detector: HitDetector,
    score: ScoreTracker,
    target: Target,
    pose: PoseSlot,
    sprite_ready: bool,
    state: LoopState,
    remaining_secs: f64,
    last_hands: HandEstimate,
}

impl<R: Rng> Game<R> {
    pub fn new(config: &GameConfig, pose: PoseSlot, rng: R, start_ms: u64) -> Self {
        info!(
            session_ms = config.session_ms,
            visible_ms = config.target.visible_ms,
            "session created"
        );
        Self {
            timer: SessionTimer::new(start_ms, config.session_ms),
            spawner: TargetSpawner::new(config.spawn, config.target.visible_ms, rng),
            estimator: HandEstimator::new(
                config.play_area.width,
                config.pose_model.min_confidence,
            ),
            detector: HitDetector::new(config.target.touch_margin),
            score: ScoreTracker::new(config.target.points_per_hit),
            target: Target::hidden(config.target.display_size),
            pose,
            sprite_ready: false,
            state: LoopState::AwaitingResources,
            remaining_secs: config.session_ms as f64 / 1000.0,
            last_hands: HandEstimate::default(),
        }
    }

    pub fn mark_sprite_ready(&mut self) {
        self.sprite_ready = true;
    }

    fn resources_ready(&self) -> bool {
        self.sprite_ready && self.pose.is_ready()
    }

    pub fn step<S, A>(&mut self, now_ms: u64, surface: &mut S, cue: &mut A) -> StepOutcome
    where
        S: RenderSurface + ?Sized,
        A: AudioCue + ?Sized,
    {
        if self.state == LoopState::Stopped {
            return StepOutcome::Stopped;
        }
        if !self.resources_ready() {
            return StepOutcome::Waiting;
        }
        if self.state == LoopState::AwaitingResources {
            info!("pose model and sprite ready, game running");
            self.state = LoopState::Running;
        }

        self.remaining_secs = self.timer.remaining_seconds(now_ms);
        if !self.timer.in_progress() {
            self.state = LoopState::Stopped;
            info!(
                score = self.score.score(),
                hits = self.score.hits(),
                "session over"
            );
            return StepOutcome::Stopped;
        }

        let hands = self
            .pose
            .latest()
            .map(|snap| self.estimator.estimate(&snap))
            .unwrap_or_default();
        self.last_hands = hands;
        surface.draw_camera_frame(&hands);

        let hit = self
            .detector
            .detect(&hands, &mut self.target, &mut self.score, now_ms);
        if hit.is_some() {
            cue.play();
            surface.clear_overlay();
        }

        let action = self.spawner.tick(&mut self.target, now_ms);
        match action {
            RenderAction::Show(at) => surface.draw_target(at, self.target.display_size),
            RenderAction::Hide => surface.clear_overlay(),
            RenderAction::None => {}
        }

        StepOutcome::Frame { action, hit }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state != LoopState::Stopped
    }

    /// Remaining time as of the last step, for the timer display
    pub fn remaining_secs(&self) -> f64 {
        self.remaining_secs
    }

    pub fn score(&self) -> u32 {
        self.score.score()
    }

    pub fn hits(&self) -> u32 {
        self.score.hits()
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn last_hands(&self) -> HandEstimate {
        self.last_hands
    }

    pub fn feed_status(&self) -> FeedStatus {
        self.pose.status()
    }
}
