use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::PoseModelOptions;
use crate::geometry::Point;
use crate::pose::{BodyPart, FeedStatus, Keypoint, Pose, PoseSlot, PoseSnapshot};

/// Anything that can publish pose snapshots into a slot
pub trait PoseSource: Send + 'static {
    fn run(self: Box<Self>, slot: PoseSlot);
}

/// Spawn a pose source on its own thread
pub fn spawn_pose_source<P: PoseSource>(source: P, slot: &PoseSlot) -> JoinHandle<()> {
    let slot = slot.clone();
    thread::spawn(move || Box::new(source).run(slot))
}

/// Publish one snapshot per JSON line until the reader runs dry.
///
/// The slot is marked ready by the first snapshot that parses, so a feed
/// counts as live only once the model behind it has produced output.
/// Returns the number of snapshots published. Unparseable lines are skipped.
pub fn pump_json_lines<R: BufRead>(reader: R, slot: &PoseSlot, pace: Option<Duration>) -> usize {
    let mut published = 0;
    for (lineno, line) in reader.lines().enumerate() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                warn!(error = %e, "pose feed read failed");
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match PoseSnapshot::from_json(line) {
            Ok(snapshot) => {
                slot.publish(snapshot);
                if !slot.is_ready() {
                    slot.mark_ready();
                }
                published += 1;
            }
            Err(e) => debug!(line = lineno + 1, error = %e, "skipping bad pose line"),
        }
        if let Some(pace) = pace {
            thread::sleep(pace);
        }
    }
    published
}

/// Runs an external pose estimator and reads PoseNet JSON from its stdout.
///
/// The estimator is asked for continuous single-subject detection and gets
/// the model tuning flags appended to its command line.
#[derive(Debug, Clone)]
pub struct CommandPoseSource {
    pub command: String,
    pub options: PoseModelOptions,
}

impl CommandPoseSource {
    pub fn new(command: impl Into<String>, options: PoseModelOptions) -> Self {
        Self {
            command: command.into(),
            options,
        }
    }
}

impl PoseSource for CommandPoseSource {
    fn run(self: Box<Self>, slot: PoseSlot) {
        let mut parts = self.command.split_whitespace();
        let Some(program) = parts.next() else {
            slot.set_status(FeedStatus::Unavailable("empty pose command".into()));
            return;
        };
        let child = Command::new(program)
            .args(parts)
            .args(self.options.to_args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn();
        let mut child = match child {
            Ok(c) => c,
            Err(e) => {
                warn!(command = %self.command, error = %e, "pose estimator failed to start");
                slot.set_status(FeedStatus::Unavailable(e.to_string()));
                return;
            }
        };
        let Some(stdout) = child.stdout.take() else {
            slot.set_status(FeedStatus::Unavailable("estimator has no stdout".into()));
            return;
        };

        info!(command = %self.command, "pose estimator started, waiting for first pose");
        let published = pump_json_lines(BufReader::new(stdout), &slot, None);

        match child.wait() {
            Ok(status) if status.success() => {
                info!(published, "pose estimator finished");
                slot.set_status(FeedStatus::Ended);
            }
            Ok(status) => {
                warn!(%status, published, "pose estimator exited");
                slot.set_status(FeedStatus::Unavailable(format!("estimator exited: {status}")));
            }
            Err(e) => slot.set_status(FeedStatus::Unavailable(e.to_string())),
        }
    }
}

/// Replays a recorded JSON-lines pose file at a fixed cadence
#[derive(Debug, Clone)]
pub struct FilePoseSource {
    pub path: PathBuf,
    pub interval: Duration,
}

impl FilePoseSource {
    pub fn new(path: impl Into<PathBuf>, interval: Duration) -> Self {
        Self {
            path: path.into(),
            interval,
        }
    }
}

impl PoseSource for FilePoseSource {
    fn run(self: Box<Self>, slot: PoseSlot) {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "cannot open pose file");
                slot.set_status(FeedStatus::Unavailable(e.to_string()));
                return;
            }
        };
        slot.mark_ready();
        let published = pump_json_lines(BufReader::new(file), &slot, Some(self.interval));
        info!(published, "pose replay finished");
        slot.set_status(FeedStatus::Ended);
    }
}

/// Stands in for the camera when no estimator is attached: the pointer
/// position becomes a right arm whose extrapolated hand sits under it.
#[derive(Debug, Clone)]
pub struct PointerPoseSource {
    slot: PoseSlot,
    frame_width: f64,
}

// Forearm pointing straight down; the hand ends up a quarter of it above the wrist.
const SIM_FOREARM: f64 = 80.0;

impl PointerPoseSource {
    pub fn new(slot: &PoseSlot, frame_width: f64) -> Self {
        slot.mark_ready();
        Self {
            slot: slot.clone(),
            frame_width,
        }
    }

    /// Raw, unmirrored keypoints for a hand at `at`
    pub fn snapshot_for(&self, at: Point) -> PoseSnapshot {
        let wrist_y = at.y + SIM_FOREARM / 4.0;
        let raw_x = self.frame_width - at.x;
        PoseSnapshot::new(vec![Pose {
            keypoints: vec![
                Keypoint::new(BodyPart::RightWrist, raw_x, wrist_y, 1.0),
                Keypoint::new(BodyPart::RightElbow, raw_x, wrist_y + SIM_FOREARM, 1.0),
            ],
        }])
    }

    pub fn move_to(&self, at: Point) {
        self.slot.publish(self.snapshot_for(at));
    }

    /// Pointer left the playfield
    pub fn lift(&self) {
        self.slot.publish(PoseSnapshot::default());
    }
}
