//! Choreography of the submission pipeline.
//!
//! Each motion is a keyframed timeline over a [`Presentation`] pose. The submission pipeline only
//! needs a motion's duration and end pose; hosts that animate can sample intermediate poses.

use std::time::Duration;

use crate::animation::ease::Ease;
use crate::form::view::Presentation;
use crate::foundation::core::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionKind {
    /// Shake toward the submit control and settle back.
    Reject,
    /// Squash, then collapse the form into the submit control.
    Morph,
    /// Undo a partial or complete morph.
    RevertMorph,
    /// Submit control travels to the centre and grows.
    Success,
    /// Submit control travels back to its resting place.
    Return,
    /// Form grows back out of a point.
    Reappear,
}

/// Which pose a motion drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionTarget {
    Container,
    SubmitControl,
}

impl MotionKind {
    pub fn target(self) -> MotionTarget {
        match self {
            Self::Success | Self::Return => MotionTarget::SubmitControl,
            Self::Reject | Self::Morph | Self::RevertMorph | Self::Reappear => {
                MotionTarget::Container
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PoseKey {
    /// Offset from motion start, in milliseconds.
    pub at_ms: u64,
    pub pose: Presentation,
    /// Easing applied toward the next key.
    pub ease: Ease,
}

/// A built motion. Keys are sorted by `at_ms` and the first key is at `0`.
#[derive(Clone, Debug, PartialEq)]
pub struct Motion {
    pub kind: MotionKind,
    keys: Vec<PoseKey>,
}

impl Motion {
    /// Build `kind` starting from `from`. `toward` is the vector from the container centre to the
    /// submit control.
    pub fn build(kind: MotionKind, from: Presentation, toward: Vec2) -> Self {
        let key = |at_ms: u64, pose: Presentation, ease: Ease| PoseKey { at_ms, pose, ease };
        let rest = Presentation::IDENTITY;

        let keys = match kind {
            MotionKind::Reject => {
                let lean = Presentation {
                    translate: toward * 0.15,
                    rotation_deg: -2.0,
                    ..rest
                };
                let wiggle = Presentation {
                    translate: lean.translate + Vec2::new(5.0, 0.0),
                    rotation_deg: 2.0,
                    ..lean
                };
                vec![
                    key(0, from, Ease::OutCubic),
                    key(200, lean, Ease::Linear),
                    key(300, wiggle, Ease::Linear),
                    key(400, lean, Ease::Linear),
                    key(500, wiggle, Ease::Linear),
                    key(600, lean, Ease::OutElastic),
                    key(1_000, rest, Ease::Linear),
                ]
            }
            MotionKind::Morph => {
                let squash = Presentation {
                    translate: from.translate + Vec2::new(0.0, 20.0),
                    scale: Vec2::new(1.05, 0.95),
                    ..from
                };
                let collapsed = Presentation {
                    translate: toward,
                    scale: Vec2::new(0.05, 0.05),
                    rotation_deg: 45.0,
                    opacity: 0.0,
                    blur: 10.0,
                };
                vec![
                    key(0, from, Ease::InOutCubic),
                    key(200, squash, Ease::InExpo),
                    key(800, collapsed, Ease::Linear),
                ]
            }
            MotionKind::RevertMorph => {
                vec![key(0, from, Ease::OutCubic), key(500, rest, Ease::Linear)]
            }
            MotionKind::Success => {
                let centred = Presentation {
                    translate: -toward,
                    scale: Vec2::new(1.2, 1.2),
                    ..rest
                };
                vec![
                    key(0, from, Ease::OutElastic),
                    key(800, centred, Ease::Linear),
                ]
            }
            MotionKind::Return => {
                vec![key(0, from, Ease::InOutCubic), key(600, rest, Ease::Linear)]
            }
            MotionKind::Reappear => {
                let seed = Presentation {
                    translate: Vec2::new(0.0, 50.0),
                    scale: Vec2::new(0.05, 0.05),
                    opacity: 0.0,
                    ..rest
                };
                vec![key(0, seed, Ease::OutBack), key(800, rest, Ease::Linear)]
            }
        };

        Self { kind, keys }
    }

    pub fn target(&self) -> MotionTarget {
        self.kind.target()
    }

    pub fn keys(&self) -> &[PoseKey] {
        &self.keys
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.keys.last().map_or(0, |k| k.at_ms))
    }

    pub fn start_pose(&self) -> Presentation {
        self.keys.first().map_or(Presentation::IDENTITY, |k| k.pose)
    }

    pub fn end_pose(&self) -> Presentation {
        self.keys.last().map_or(Presentation::IDENTITY, |k| k.pose)
    }

    /// Pose `elapsed_ms` after the motion started. Times past the end hold the end pose.
    pub fn sample(&self, elapsed_ms: u64) -> Presentation {
        let idx = self.keys.partition_point(|k| k.at_ms <= elapsed_ms);
        if idx == 0 {
            return self.start_pose();
        }
        if idx >= self.keys.len() {
            return self.end_pose();
        }

        let a = &self.keys[idx - 1];
        let b = &self.keys[idx];
        let span = b.at_ms.saturating_sub(a.at_ms);
        if span == 0 {
            return a.pose;
        }
        let t = (elapsed_ms - a.at_ms) as f64 / span as f64;
        a.pose.lerp_unclamped(b.pose, a.ease.apply(t))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/motion.rs"]
mod tests;
