//! Runtime configuration.
//!
//! Every section has defaults matching the reference deployment, so an empty JSON object is a
//! valid config file. Timing values are tunable rather than normative.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::foundation::core::Color;
use crate::foundation::error::{SigformError, SigformResult};

/// Environment variable overriding [`UploadConfig::endpoint`].
pub const ENV_UPLOAD_URL: &str = "SIGFORM_UPLOAD_URL";
/// Environment variable overriding [`CaptureConfig::font_dir`].
pub const ENV_FONT_DIR: &str = "SIGFORM_FONT_DIR";

/// Top-level configuration for a form session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SigformConfig {
    /// Phase durations of the submission pipeline.
    pub timing: TimingConfig,
    /// Vibration patterns.
    pub haptics: HapticsConfig,
    /// Ink brush parameters.
    pub brush: BrushConfig,
    /// Flatten-for-capture rendering parameters.
    pub capture: CaptureConfig,
    /// Upload boundary parameters.
    pub upload: UploadConfig,
    /// User-visible strings.
    pub labels: LabelsConfig,
}

/// Phase durations, in milliseconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// How long the rejection flash lasts before the form is submittable again.
    pub reject_hold_ms: u64,
    /// How long the success indicator stays up before the form resets.
    pub success_hold_ms: u64,
    /// Duration of the reappear motion that ends the `Resetting` phase.
    pub reappear_ms: u64,
    /// Delay after mount before the deferred-layout rescale runs.
    pub mount_settle_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            reject_hold_ms: 1_000,
            success_hold_ms: 3_500,
            reappear_ms: 800,
            mount_settle_ms: 100,
        }
    }
}

impl TimingConfig {
    pub fn reject_hold(&self) -> Duration {
        Duration::from_millis(self.reject_hold_ms)
    }

    pub fn success_hold(&self) -> Duration {
        Duration::from_millis(self.success_hold_ms)
    }

    pub fn reappear(&self) -> Duration {
        Duration::from_millis(self.reappear_ms)
    }

    pub fn mount_settle(&self) -> Duration {
        Duration::from_millis(self.mount_settle_ms)
    }
}

/// Vibration patterns as alternating on/off durations in milliseconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HapticsConfig {
    pub tap: Vec<u32>,
    pub success: Vec<u32>,
    pub error: Vec<u32>,
}

impl Default for HapticsConfig {
    fn default() -> Self {
        Self {
            tap: vec![10],
            success: vec![50, 100, 50],
            error: vec![50, 50, 50],
        }
    }
}

impl HapticsConfig {
    pub fn pattern(&self, kind: crate::submit::feedback::HapticPattern) -> &[u32] {
        use crate::submit::feedback::HapticPattern;
        match kind {
            HapticPattern::Tap => &self.tap,
            HapticPattern::Success => &self.success,
            HapticPattern::Error => &self.error,
        }
    }
}

/// Velocity-sensitive brush used to turn stroke points into ink.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushConfig {
    /// Smallest brush radius, logical px.
    pub min_width: f64,
    /// Largest brush radius, logical px.
    pub max_width: f64,
    pub color: Color,
    /// Points closer than this to the previous kept point are dropped.
    pub min_distance: f64,
    /// Weight of the newest velocity sample in the smoothed velocity, `0..=1`.
    pub velocity_filter_weight: f64,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            min_width: 1.0,
            max_width: 4.0,
            color: Color::rgb(0x1e, 0x29, 0x3b),
            min_distance: 5.0,
            velocity_filter_weight: 0.7,
        }
    }
}

impl BrushConfig {
    /// Radius of a single-point segment.
    pub fn dot_radius(&self) -> f64 {
        (self.min_width + self.max_width) / 2.0
    }
}

/// Parameters of the disposable capture copy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Width the capture copy is pinned to, logical px.
    pub canonical_width: f64,
    /// Output pixels per logical px.
    pub scale: f64,
    pub background: Color,
    pub border_color: Color,
    pub border_width: f64,
    pub font_family: String,
    pub text_color: Color,
    pub label_color: Color,
    pub rule_color: Color,
    /// Height of each signature box, logical px.
    pub signature_height: f64,
    /// Extra directory scanned for `.ttf`/`.otf`/`.ttc` files.
    pub font_dir: Option<PathBuf>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            canonical_width: 800.0,
            scale: 2.0,
            background: Color::WHITE,
            border_color: Color::BLACK,
            border_width: 2.0,
            font_family: "Arial".to_owned(),
            text_color: Color::BLACK,
            label_color: Color::rgb(0x47, 0x55, 0x69),
            rule_color: Color::rgb(0x33, 0x33, 0x33),
            signature_height: 160.0,
            font_dir: None,
        }
    }
}

/// Upload boundary parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub endpoint: String,
    pub timeout_ms: u64,
    /// Requests with a larger JSON body are refused before sending.
    pub max_payload_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3000/api/upload".to_owned(),
            timeout_ms: 30_000,
            max_payload_bytes: 15 * 1024 * 1024,
        }
    }
}

impl UploadConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// User-visible strings: document labels, affordance captions and notification texts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelsConfig {
    pub heading: String,
    pub subject_name: String,
    pub subject_id: String,
    pub counter_signer_name: String,
    pub primary_signature: String,
    pub witness_signature: String,
    pub date: String,
    pub submit: String,
    pub busy: String,
    pub success: String,
    pub eraser: String,
    pub clear: String,
    pub reject_title: String,
    pub error_title: String,
    pub error_message: String,
    pub ready_title: String,
    pub ready_message: String,
}

impl Default for LabelsConfig {
    fn default() -> Self {
        Self {
            heading: "Signature Confirmation".to_owned(),
            subject_name: "Student Name".to_owned(),
            subject_id: "Student ID".to_owned(),
            counter_signer_name: "Parent / Guardian Name".to_owned(),
            primary_signature: "Student Signature".to_owned(),
            witness_signature: "Parent / Guardian Signature".to_owned(),
            date: "Date".to_owned(),
            submit: "Submit Document".to_owned(),
            busy: "Processing...".to_owned(),
            success: "Success!".to_owned(),
            eraser: "Eraser".to_owned(),
            clear: "Clear".to_owned(),
            reject_title: "Check Fields".to_owned(),
            error_title: "Error".to_owned(),
            error_message: "Upload failed.".to_owned(),
            ready_title: "Ready".to_owned(),
            ready_message: "Form reset for next student.".to_owned(),
        }
    }
}

impl SigformConfig {
    /// Read a JSON config file and validate it.
    pub fn from_path(path: &Path) -> SigformResult<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("open config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_reader(std::io::BufReader::new(file))
            .map_err(|e| SigformError::serde(format!("config '{}': {e}", path.display())))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Apply `SIGFORM_*` environment overrides.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(ENV_UPLOAD_URL) {
            let url = url.trim();
            if !url.is_empty() {
                self.upload.endpoint = url.to_owned();
            }
        }
        if let Ok(dir) = std::env::var(ENV_FONT_DIR) {
            if !dir.trim().is_empty() {
                self.capture.font_dir = Some(PathBuf::from(dir));
            }
        }
        self
    }

    pub fn validate(&self) -> SigformResult<()> {
        let b = &self.brush;
        if !b.min_width.is_finite() || b.min_width <= 0.0 {
            return Err(SigformError::config("brush.min_width must be finite and > 0"));
        }
        if !b.max_width.is_finite() || b.max_width < b.min_width {
            return Err(SigformError::config(
                "brush.max_width must be finite and >= brush.min_width",
            ));
        }
        if !b.min_distance.is_finite() || b.min_distance < 0.0 {
            return Err(SigformError::config("brush.min_distance must be finite and >= 0"));
        }
        if !(0.0..=1.0).contains(&b.velocity_filter_weight) {
            return Err(SigformError::config(
                "brush.velocity_filter_weight must be within 0..=1",
            ));
        }

        let c = &self.capture;
        if !c.canonical_width.is_finite() || c.canonical_width < 100.0 {
            return Err(SigformError::config(
                "capture.canonical_width must be finite and >= 100",
            ));
        }
        if !c.scale.is_finite() || c.scale <= 0.0 || c.scale > 8.0 {
            return Err(SigformError::config("capture.scale must be within (0, 8]"));
        }
        if !c.signature_height.is_finite() || c.signature_height <= 0.0 {
            return Err(SigformError::config(
                "capture.signature_height must be finite and > 0",
            ));
        }
        if !c.border_width.is_finite() || c.border_width < 0.0 {
            return Err(SigformError::config("capture.border_width must be finite and >= 0"));
        }

        if self.upload.endpoint.trim().is_empty() {
            return Err(SigformError::config("upload.endpoint must be non-empty"));
        }
        if self.upload.max_payload_bytes == 0 {
            return Err(SigformError::config("upload.max_payload_bytes must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config/config.rs"]
mod tests;
