use crate::config::BrushConfig;
use crate::foundation::core::{Affine, PixelSize, SurfaceSize};
use crate::foundation::error::SigformResult;
use crate::ink::raster::rasterize_segments;
use crate::ink::stroke::{InkMode, InkSegment, StrokePoint};

/// Which signer an [`InkSurface`] belongs to.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SignerRole {
    /// The subject signing the document.
    Primary,
    /// The counter-signer.
    Witness,
}

impl SignerRole {
    pub const ALL: [SignerRole; 2] = [SignerRole::Primary, SignerRole::Witness];

    /// Resolve a role from a host-side control name. Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "primary" | "student" => Some(Self::Primary),
            "witness" | "parent" => Some(Self::Witness),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Witness => "witness",
        }
    }
}

/// Physical backing store of a surface: premultiplied RGBA8 at `size`, drawn at `scale`
/// physical pixels per logical pixel.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterBuffer {
    pub size: PixelSize,
    pub scale: f64,
    pub data: Vec<u8>,
}

/// Freehand capture surface for one signer.
///
/// Strokes are stored in logical coordinates and are the only source of truth; the raster is
/// derived from them and can be rebuilt at any size without loss.
#[derive(Clone, Debug)]
pub struct InkSurface {
    role: SignerRole,
    brush: BrushConfig,
    segments: Vec<InkSegment>,
    open: Option<InkSegment>,
    erasing: bool,
    layout: Option<SurfaceSize>,
    raster: Option<RasterBuffer>,
    dirty: bool,
}

impl InkSurface {
    pub fn new(role: SignerRole, brush: BrushConfig) -> Self {
        Self {
            role,
            brush,
            segments: Vec::new(),
            open: None,
            erasing: false,
            layout: None,
            raster: None,
            dirty: false,
        }
    }

    pub fn role(&self) -> SignerRole {
        self.role
    }

    pub fn brush(&self) -> &BrushConfig {
        &self.brush
    }

    pub fn is_erasing(&self) -> bool {
        self.erasing
    }

    /// Last layout passed to [`InkSurface::rescale`].
    pub fn layout(&self) -> Option<SurfaceSize> {
        self.layout
    }

    /// Physical-to-logical scale currently applied (1 before the first rescale).
    pub fn scale(&self) -> f64 {
        self.raster.as_ref().map_or(1.0, |r| r.scale)
    }

    /// Committed segments, in recording order.
    pub fn segments(&self) -> &[InkSegment] {
        &self.segments
    }

    /// Committed segments plus the one currently being drawn.
    pub fn all_segments(&self) -> impl Iterator<Item = &InkSegment> {
        self.segments.iter().chain(self.open.iter())
    }

    /// True between pointer-down and pointer-up.
    pub fn is_drawing(&self) -> bool {
        self.open.is_some()
    }

    pub fn begin_segment(&mut self) {
        self.end_segment();
        let mode = if self.erasing {
            InkMode::Erase
        } else {
            InkMode::Draw
        };
        self.open = Some(InkSegment::new(mode));
    }

    /// Close the open segment. Empty segments are discarded.
    pub fn end_segment(&mut self) {
        if let Some(seg) = self.open.take() {
            if !seg.is_empty() {
                self.segments.push(seg);
            }
        }
    }

    /// Record a pointer sample. In erase mode the sample extends an erase segment, which removes
    /// ink under the brush when replayed. Returns whether the point was kept.
    pub fn capture(&mut self, point: StrokePoint) -> bool {
        if self.open.is_none() {
            self.begin_segment();
        }
        let min_distance = self.brush.min_distance;
        let kept = self
            .open
            .as_mut()
            .is_some_and(|seg| seg.push_filtered(point, min_distance));
        if kept {
            self.dirty = true;
        }
        kept
    }

    /// Set (`Some`) or flip (`None`) erase mode and return the new state. An open segment is
    /// closed so a segment never mixes modes.
    pub fn toggle_erase(&mut self, force: Option<bool>) -> bool {
        let next = force.unwrap_or(!self.erasing);
        if next != self.erasing {
            let was_open = self.open.is_some();
            self.end_segment();
            self.erasing = next;
            if was_open {
                self.begin_segment();
            }
        }
        self.erasing
    }

    /// True iff no draw segment holds any point. Erasing never makes a surface non-empty, and
    /// erasing all visible ink does not make it empty either.
    pub fn is_empty(&self) -> bool {
        !self.all_segments().any(InkSegment::is_ink)
    }

    /// Drop every segment. Erase mode is kept.
    pub fn clear(&mut self) {
        self.segments.clear();
        self.open = None;
        if let Some(r) = self.raster.as_mut() {
            r.data.fill(0);
        }
        self.dirty = false;
    }

    /// Resize the backing store to `size` and replay every stroke at the new density.
    ///
    /// Returns `false` without redrawing when the physical size and scale are unchanged.
    pub fn rescale(&mut self, size: SurfaceSize) -> bool {
        let physical = size.physical();
        let scale = size.scale();
        self.layout = Some(size);

        if let Some(r) = &self.raster {
            if r.size == physical && r.scale == scale {
                return false;
            }
        }

        self.raster = Some(RasterBuffer {
            size: physical,
            scale,
            data: vec![0u8; physical.byte_len()],
        });
        self.dirty = true;
        tracing::debug!(
            role = self.role.as_str(),
            width = physical.width,
            height = physical.height,
            scale,
            segments = self.segments.len(),
            "ink surface rescaled"
        );
        self.redraw();
        true
    }

    /// Current backing store, redrawn first if strokes changed since the last call. `None`
    /// until the surface has been laid out.
    pub fn raster(&mut self) -> Option<&RasterBuffer> {
        if self.dirty {
            self.redraw();
        }
        self.raster.as_ref()
    }

    /// Render the strokes into a fresh buffer of `size`, mapping logical coordinates through
    /// `transform`.
    pub fn rasterize(&self, size: PixelSize, transform: Affine) -> SigformResult<Vec<u8>> {
        let segments: Vec<InkSegment> = self.all_segments().cloned().collect();
        rasterize_segments(&segments, &self.brush, size, transform)
    }

    /// Replace the strokes with previously exported data.
    pub fn load_segments(&mut self, segments: Vec<InkSegment>) {
        self.open = None;
        self.segments = segments.into_iter().filter(|s| !s.is_empty()).collect();
        self.dirty = true;
    }

    fn redraw(&mut self) {
        let Some((size, scale)) = self.raster.as_ref().map(|r| (r.size, r.scale)) else {
            self.dirty = false;
            return;
        };
        match self.rasterize(size, Affine::scale(scale)) {
            Ok(data) => {
                if let Some(r) = self.raster.as_mut() {
                    r.data = data;
                }
            }
            Err(err) => {
                tracing::warn!(role = self.role.as_str(), %err, "ink redraw failed");
            }
        }
        self.dirty = false;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ink/surface.rs"]
mod tests;
