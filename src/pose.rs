use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Named anatomical landmark. Parts the game does not use are kept as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum BodyPart {
    LeftWrist,
    RightWrist,
    LeftElbow,
    RightElbow,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub part: BodyPart,
    pub score: f64,
    pub position: Position,
}

impl Keypoint {
    pub fn new(part: BodyPart, x: f64, y: f64, score: f64) -> Self {
        Self {
            part,
            score,
            position: Position { x, y },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub keypoints: Vec<Keypoint>,
}

/// ml5/PoseNet `{"pose": {...}}` entries, or bare `{"keypoints": [...]}`
#[derive(Deserialize)]
#[serde(untagged)]
enum WirePose {
    Wrapped { pose: Pose },
    Bare(Pose),
}

/// Every pose the estimator reported for one camera frame
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PoseSnapshot {
    pub poses: Vec<Pose>,
}

impl PoseSnapshot {
    pub fn new(poses: Vec<Pose>) -> Self {
        Self { poses }
    }

    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        let wire: Vec<WirePose> = serde_json::from_str(s)?;
        let poses = wire
            .into_iter()
            .map(|w| match w {
                WirePose::Wrapped { pose } => pose,
                WirePose::Bare(pose) => pose,
            })
            .collect();
        Ok(Self { poses })
    }

    pub fn is_empty(&self) -> bool {
        self.poses.iter().all(|p| p.keypoints.is_empty())
    }
}

/// Health of the external camera + pose estimator pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedStatus {
    Connecting,
    Live,
    Unavailable(String),
    Ended,
}

impl fmt::Display for FeedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedStatus::Connecting => write!(f, "connecting to pose feed"),
            FeedStatus::Live => write!(f, "tracking"),
            FeedStatus::Unavailable(reason) => write!(f, "awaiting camera: {reason}"),
            FeedStatus::Ended => write!(f, "pose feed ended"),
        }
    }
}

#[derive(Debug)]
struct SlotInner {
    latest: Mutex<Option<Arc<PoseSnapshot>>>,
    status: Mutex<FeedStatus>,
    ready: AtomicBool,
}

/// Single-slot "latest snapshot wins" cell shared by one producer and the
/// game loop. Publishing replaces the previous snapshot wholesale; anything
/// the reader never saw is dropped.
#[derive(Debug, Clone)]
pub struct PoseSlot {
    inner: Arc<SlotInner>,
}

impl Default for PoseSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl PoseSlot {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SlotInner {
                latest: Mutex::new(None),
                status: Mutex::new(FeedStatus::Connecting),
                ready: AtomicBool::new(false),
            }),
        }
    }

    pub fn publish(&self, snapshot: PoseSnapshot) {
        let snapshot = Arc::new(snapshot);
        *lock(&self.inner.latest) = Some(snapshot);
    }

    pub fn latest(&self) -> Option<Arc<PoseSnapshot>> {
        lock(&self.inner.latest).clone()
    }

    /// One-shot signal that the estimator has loaded and detection started
    pub fn mark_ready(&self) {
        self.inner.ready.store(true, Ordering::Release);
        self.set_status(FeedStatus::Live);
    }

    pub fn is_ready(&self) -> bool {
        self.inner.ready.load(Ordering::Acquire)
    }

    pub fn set_status(&self, status: FeedStatus) {
        *lock(&self.inner.status) = status;
    }

    pub fn status(&self) -> FeedStatus {
        lock(&self.inner.status).clone()
    }
}

// A poisoned slot still holds a whole snapshot, so keep reading it.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn parses_wrapped_posenet_json() {
        let json = r#"[{"pose":{"score":0.8,"keypoints":[
            {"part":"leftWrist","score":0.9,"position":{"x":10.0,"y":20.0}},
            {"part":"nose","score":0.99,"position":{"x":1.0,"y":2.0}}
        ]},"skeleton":[]}]"#;
        let snap = PoseSnapshot::from_json(json).unwrap();
        assert_eq!(snap.poses.len(), 1);
        let kps = &snap.poses[0].keypoints;
        assert_eq!(kps[0], Keypoint::new(BodyPart::LeftWrist, 10.0, 20.0, 0.9));
        assert_eq!(kps[1].part, BodyPart::Other);
    }

    #[test]
    fn parses_bare_pose_list() {
        let json = r#"[{"keypoints":[{"part":"rightElbow","score":0.7,"position":{"x":3,"y":4}}]}]"#;
        let snap = PoseSnapshot::from_json(json).unwrap();
        assert_eq!(snap.poses[0].keypoints[0].part, BodyPart::RightElbow);
        assert_eq!(snap.poses[0].keypoints[0].position, Position { x: 3.0, y: 4.0 });
    }

    #[test]
    fn empty_list_is_empty_snapshot() {
        let snap = PoseSnapshot::from_json("[]").unwrap();
        assert!(snap.is_empty());
    }

    #[test]
    fn rejects_non_list() {
        assert!(PoseSnapshot::from_json(r#"{"pose":{}}"#).is_err());
    }

    #[test]
    fn body_part_display_matches_wire_name() {
        assert_eq!(BodyPart::LeftWrist.to_string(), "leftWrist");
        assert_eq!(BodyPart::RightElbow.to_string(), "rightElbow");
    }

    #[test]
    fn slot_keeps_only_latest() {
        let slot = PoseSlot::new();
        assert!(slot.latest().is_none());
        slot.publish(PoseSnapshot::new(vec![Pose::default()]));
        slot.publish(PoseSnapshot::new(vec![Pose::default(), Pose::default()]));
        assert_eq!(slot.latest().unwrap().poses.len(), 2);
    }

    #[test]
    fn slot_ready_and_status() {
        let slot = PoseSlot::new();
        assert!(!slot.is_ready());
        assert_eq!(slot.status(), FeedStatus::Connecting);
        slot.mark_ready();
        assert!(slot.is_ready());
        assert_eq!(slot.status(), FeedStatus::Live);
        slot.set_status(FeedStatus::Unavailable("no camera".into()));
        assert_eq!(slot.status().to_string(), "awaiting camera: no camera");
    }

    #[test]
    fn slot_handoff_across_threads() {
        let slot = PoseSlot::new();
        let producer = slot.clone();
        let handle = thread::spawn(move || {
            for i in 0..100 {
                producer.publish(PoseSnapshot::new(vec![Pose {
                    keypoints: vec![Keypoint::new(BodyPart::LeftWrist, i as f64, 0.0, 1.0)],
                }]));
            }
            producer.mark_ready();
        });
        handle.join().unwrap();
        assert!(slot.is_ready());
        let latest = slot.latest().unwrap();
        assert_eq!(latest.poses[0].keypoints[0].position.x, 99.0);
    }
}
