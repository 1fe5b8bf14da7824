use crate::geometry::Point;
use crate::pose::{BodyPart, PoseSnapshot};

/// Per-frame hand positions; `None` when the arm was not tracked
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HandEstimate {
    pub left: Option<Point>,
    pub right: Option<Point>,
}

impl HandEstimate {
    /// Hands in evaluation order, left first
    pub fn hands(&self) -> [(Side, Option<Point>); 2] {
        [(Side::Left, self.left), (Side::Right, self.right)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy)]
pub struct HandEstimator {
    frame_width: f64,
    min_confidence: f64,
}

#[derive(Debug, Default)]
struct Arm {
    wrist: Option<Point>,
    elbow: Option<Point>,
}

impl Arm {
    fn hand(&self) -> Option<Point> {
        Some(extrapolate_hand(self.wrist?, self.elbow?))
    }
}

impl HandEstimator {
    pub fn new(frame_width: f64, min_confidence: f64) -> Self {
        Self {
            frame_width,
            min_confidence,
        }
    }

    /// Estimate both hands from the latest snapshot.
    ///
    /// Keypoints are scanned across every pose in order and the last one above
    /// the confidence threshold wins for each joint, even if an earlier
    /// detection scored higher. The camera image is mirrored, so x is flipped
    /// against the frame width.
    pub fn estimate(&self, snapshot: &PoseSnapshot) -> HandEstimate {
        let mut left = Arm::default();
        let mut right = Arm::default();

        for kp in snapshot.poses.iter().flat_map(|p| p.keypoints.iter()) {
            if kp.score <= self.min_confidence {
                continue;
            }
            let mirrored = Point::new(self.frame_width - kp.position.x, kp.position.y);
            match kp.part {
                BodyPart::LeftWrist => left.wrist = Some(mirrored),
                BodyPart::LeftElbow => left.elbow = Some(mirrored),
                BodyPart::RightWrist => right.wrist = Some(mirrored),
                BodyPart::RightElbow => right.elbow = Some(mirrored),
                BodyPart::Other => {}
            }
        }

        HandEstimate {
            left: left.hand(),
            right: right.hand(),
        }
    }
}

/// Estimators track the wrist, not the fingertips: extend the forearm a
/// quarter of its length past the wrist, `(5·wrist − elbow) / 4`
pub fn extrapolate_hand(wrist: Point, elbow: Point) -> Point {
    Point::new(
        (5.0 * wrist.x - elbow.x) / 4.0,
        (5.0 * wrist.y - elbow.y) / 4.0,
    )
}
