use anyhow::{bail, Context};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::geometry::Rect;

/// Dimensions of the play area in camera pixels
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlayArea {
    pub width: f64,
    pub height: f64,
}

impl Default for PlayArea {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 750.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TargetConfig {
    /// Edge length of the drawn target in play-area pixels
    pub display_size: f64,
    /// Optional text file holding the target sprite; built-in sprite otherwise
    pub sprite_path: Option<PathBuf>,
    pub visible_ms: u64,
    pub touch_margin: f64,
    pub points_per_hit: u32,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            display_size: 120.0,
            sprite_path: None,
            visible_ms: 2000,
            touch_margin: 100.0,
            points_per_hit: 10,
        }
    }
}

/// Where targets may appear, and the band in the middle where they may not
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpawnZone {
    /// Half-open bounds for the target's top-left corner
    pub bounds: Rect,
    /// Open rectangle that positions are never drawn from
    pub exclusion: Rect,
}

impl Default for SpawnZone {
    fn default() -> Self {
        Self {
            bounds: Rect::new(10.0, 10.0, 860.0, 620.0),
            exclusion: Rect::new(300.0, 0.0, 600.0, 750.0),
        }
    }
}

/// Tuning handed to the external pose estimator at startup
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PoseModelOptions {
    pub multiplier: f64,
    pub quant_bytes: u8,
    pub input_resolution: u32,
    pub min_confidence: f64,
}

impl Default for PoseModelOptions {
    fn default() -> Self {
        Self {
            multiplier: 0.5,
            quant_bytes: 4,
            input_resolution: 193,
            min_confidence: 0.5,
        }
    }
}

impl PoseModelOptions {
    /// Command-line arguments understood by the estimator process
    pub fn to_args(&self) -> Vec<String> {
        vec![
            "--multiplier".to_string(),
            self.multiplier.to_string(),
            "--quant-bytes".to_string(),
            self.quant_bytes.to_string(),
            "--input-resolution".to_string(),
            self.input_resolution.to_string(),
            "--single-pose".to_string(),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub play_area: PlayArea,
    pub target: TargetConfig,
    pub spawn: SpawnZone,
    pub pose_model: PoseModelOptions,
    pub session_ms: u64,
    pub tick_ms: u64,
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            play_area: PlayArea::default(),
            target: TargetConfig::default(),
            spawn: SpawnZone::default(),
            pose_model: PoseModelOptions::default(),
            session_ms: 60_000,
            tick_ms: 16,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Reject configurations the game loop cannot run with.
    ///
    /// Spawning resamples until it draws a position outside the exclusion
    /// zone, so a zone that swallows the whole spawn area would never return.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.session_ms == 0 {
            bail!("session duration must be greater than zero");
        }
        if self.target.visible_ms == 0 {
            bail!("target visible duration must be greater than zero");
        }
        if self.tick_ms == 0 {
            bail!("tick interval must be greater than zero");
        }
        if self.play_area.width <= 0.0 || self.play_area.height <= 0.0 {
            bail!(
                "play area must be non-empty, got {}x{}",
                self.play_area.width,
                self.play_area.height
            );
        }
        if self.target.touch_margin <= 0.0 {
            bail!("touch margin must be positive");
        }
        let bounds = &self.spawn.bounds;
        if bounds.max_x.floor() <= bounds.min_x.ceil() || bounds.max_y.floor() <= bounds.min_y.ceil()
        {
            bail!("spawn bounds are empty: {:?}", bounds);
        }
        let excl = &self.spawn.exclusion;
        let x_trapped = lattice_within(bounds.min_x, bounds.max_x, excl.min_x, excl.max_x);
        let y_trapped = lattice_within(bounds.min_y, bounds.max_y, excl.min_y, excl.max_y);
        if x_trapped && y_trapped {
            bail!(
                "exclusion zone {:?} leaves no room inside spawn bounds {:?}",
                self.spawn.exclusion,
                bounds
            );
        }
        Ok(())
    }
}

/// Whether every integer in `[ceil(lo), floor(hi))` lies strictly inside
/// `(open_lo, open_hi)`. Spawn positions are drawn from that integer range.
fn lattice_within(lo: f64, hi: f64, open_lo: f64, open_hi: f64) -> bool {
    let first = lo.ceil();
    let last = hi.floor() - 1.0;
    first > open_lo && last < open_hi
}

pub trait ConfigStore {
    fn load(&self) -> GameConfig;
    fn save(&self, cfg: &GameConfig) -> anyhow::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "swat") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("swat_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> GameConfig {
        match fs::read(&self.path) {
            Ok(bytes) => match serde_json::from_slice::<GameConfig>(&bytes) {
                Ok(cfg) => cfg,
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "ignoring unreadable config");
                    GameConfig::default()
                }
            },
            Err(_) => GameConfig::default(),
        }
    }

    fn save(&self, cfg: &GameConfig) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating config dir {}", parent.display()))?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
            .with_context(|| format!("writing config to {}", self.path.display()))
    }
}
