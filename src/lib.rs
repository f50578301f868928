//! Sigform is a two-signature form capture engine.
//!
//! A form holds three text fields and two freehand ink pads (the subject and a counter-signer).
//! On submit the form is validated, flattened into a single still image and uploaded, with a
//! choreographed success or failure sequence around it.
//!
//! # Pipeline overview
//!
//! 1. **Capture ink**: pointer samples become logical [`InkSegment`]s on an [`InkSurface`],
//!    rasterized at the pad's physical density.
//! 2. **Validate**: [`FormModel::validate`] requires every field and both signatures.
//! 3. **Rasterize**: [`DocumentRasterizer`] lays out a static copy of the form, renders it through
//!    `resvg` and composites each pad's ink into its box, yielding a PNG data URL.
//! 4. **Upload**: an [`UploadClient`] posts the image and the identifying fields.
//!
//! [`SubmissionController`] drives 2-4 as a single-flight state machine; [`FormSession`] wires
//! input events to it.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Ink is logical**: strokes are the source of truth; every raster is derived from them.
//! - **Capture never mutates the live form**: snapshots render a copy.
//! - **Host effects go through traits**: time ([`Clock`]), haptics/motion/toasts
//!   ([`FeedbackSink`]) and transport ([`UploadClient`]) are injected.
#![forbid(unsafe_code)]

mod animation {
    pub mod ease;
    pub mod motion;
}
mod config;
mod form {
    pub mod model;
    pub mod view;
}
mod foundation {
    pub mod core;
    pub mod error;
    pub mod math;
}
mod ink {
    pub mod raster;
    pub mod stroke;
    pub mod surface;
}
mod render {
    pub mod composite;
    pub mod document;
    pub mod rasterizer;
}
mod session;
mod submit {
    pub mod clock;
    pub mod controller;
    pub mod feedback;
    pub mod phases;
    pub mod state;
}
mod upload {
    pub mod client;
}

pub use animation::ease::Ease;
pub use animation::motion::{Motion, MotionKind, MotionTarget, PoseKey};
pub use config::{
    BrushConfig, CaptureConfig, ENV_FONT_DIR, ENV_UPLOAD_URL, HapticsConfig, LabelsConfig,
    SigformConfig, TimingConfig, UploadConfig,
};
pub use form::model::{FieldId, FormFields, FormModel, ValidationError};
pub use form::view::{
    CaptureElement, Control, DEFAULT_SUBMIT_OFFSET, Element, FormContext, FormView, Presentation,
    SharedForm, SubmitAffordance, lock_form,
};
pub use foundation::core::{
    Affine, Color, MAX_RASTER_DIM, PixelSize, Point, Rect, SurfaceSize, Vec2,
};
pub use foundation::error::{SigformError, SigformResult};
pub use ink::stroke::{InkMode, InkSegment, Stamp, StrokePoint, point_radii, stamps};
pub use ink::surface::{InkSurface, RasterBuffer, SignerRole};
pub use render::composite::{
    PremulRgba8, blit_over, dest_out, dest_out_in_place, over, over_in_place,
    unpremultiply_in_place,
};
pub use render::document::{DocumentLayout, SignatureSlot, layout_document};
pub use render::rasterizer::{DocumentRasterizer, PNG_DATA_URL_PREFIX, Snapshot, SnapshotRenderer};
pub use session::{FormSession, InputEvent, PointerKind, PointerSample};
pub use submit::clock::{Clock, TokioClock, VirtualClock, format_date_stamp};
pub use submit::controller::{Services, SubmissionController, SubmitOutcome};
pub use submit::feedback::{
    FanOut, FeedbackEvent, FeedbackSink, HapticPattern, InMemoryFeedback, TracingFeedback,
};
pub use submit::phases::{PhasePlan, TimedPhase};
pub use submit::state::{SubmissionEvent, SubmissionState, transition};
pub use upload::client::{
    HttpUploadClient, TransmissionError, UploadAck, UploadClient, UploadRequest,
};
