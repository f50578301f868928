use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;
use base64::Engine as _;
use chrono::NaiveDate;

use crate::config::CaptureConfig;
use crate::foundation::core::{Affine, PixelSize, Rect};
use crate::foundation::error::{SigformError, SigformResult};
use crate::form::model::FormFields;
use crate::form::view::FormContext;
use crate::ink::surface::InkSurface;
use crate::render::composite::{blit_over, unpremultiply_in_place};
use crate::render::document::{DocumentLayout, layout_document};
use crate::submit::clock::format_date_stamp;

/// Prefix of every encoded snapshot.
pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// One flattened still of the form, produced fresh for every submit attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    /// `data:image/png;base64,...`
    pub image: String,
    pub size: PixelSize,
    /// Field values at capture time.
    pub fields: FormFields,
}

impl Snapshot {
    /// Decode the PNG bytes back out of the data URL.
    pub fn png_bytes(&self) -> SigformResult<Vec<u8>> {
        let b64 = self
            .image
            .strip_prefix(PNG_DATA_URL_PREFIX)
            .ok_or_else(|| SigformError::render("snapshot is not a png data url"))?;
        base64::engine::general_purpose::STANDARD
            .decode(b64)
            .map_err(|e| SigformError::render(format!("snapshot base64: {e}")))
    }
}

/// Produces the still image handed to the upload boundary.
pub trait SnapshotRenderer: Send + Sync {
    fn snapshot(&self, form: &FormContext, date: NaiveDate) -> SigformResult<Snapshot>;
}

/// Renders a disposable, non-interactive copy of a [`FormContext`] into a PNG.
///
/// Text goes through `usvg`/`resvg` with the system font database plus
/// [`CaptureConfig::font_dir`]; a missing font degrades text but never fails the snapshot.
#[derive(Clone)]
pub struct DocumentRasterizer {
    capture: CaptureConfig,
    fontdb: Arc<usvg::fontdb::Database>,
}

impl std::fmt::Debug for DocumentRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentRasterizer")
            .field("capture", &self.capture)
            .field("faces", &self.fontdb.len())
            .finish()
    }
}

impl DocumentRasterizer {
    pub fn new(capture: CaptureConfig) -> Self {
        let fontdb = build_fontdb(capture.font_dir.as_deref());
        tracing::debug!(faces = fontdb.len(), "font database ready");
        Self { capture, fontdb }
    }

    pub fn capture(&self) -> &CaptureConfig {
        &self.capture
    }

    /// Flatten and encode the form. The live form is only read.
    #[tracing::instrument(skip_all, fields(date = %date))]
    pub fn snapshot(&self, form: &FormContext, date: NaiveDate) -> SigformResult<Snapshot> {
        let (size, mut rgba) = self.render_premul(form, date)?;
        unpremultiply_in_place(&mut rgba);

        let img = image::RgbaImage::from_raw(size.width, size.height, rgba)
            .ok_or_else(|| SigformError::render("snapshot buffer does not match its size"))?;
        let mut png = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .context("encode snapshot png")?;

        let encoded = base64::engine::general_purpose::STANDARD.encode(&png);
        tracing::debug!(
            width = size.width,
            height = size.height,
            png_bytes = png.len(),
            "snapshot encoded"
        );
        Ok(Snapshot {
            image: format!("{PNG_DATA_URL_PREFIX}{encoded}"),
            size,
            fields: form.model.fields().clone(),
        })
    }

    /// Render to premultiplied RGBA8 at the capture scale.
    pub fn render_premul(
        &self,
        form: &FormContext,
        date: NaiveDate,
    ) -> SigformResult<(PixelSize, Vec<u8>)> {
        let elements = form.view.flatten_for_capture(form.model.fields());
        let layout = layout_document(&elements, &self.capture, &format_date_stamp(date));

        let scale = self.capture.scale;
        let size = PixelSize::new(
            to_px(layout.width * scale)?,
            to_px(layout.height * scale)?,
        )?;
        let mut rgba = self.render_svg(&layout, size)?;

        for slot in &layout.slots {
            composite_ink(
                &mut rgba,
                size,
                form.model.surface(slot.role),
                slot.rect,
                scale,
            )?;
        }
        Ok((size, rgba))
    }

    fn render_svg(&self, layout: &DocumentLayout, size: PixelSize) -> SigformResult<Vec<u8>> {
        let opts = usvg::Options {
            fontdb: self.fontdb.clone(),
            font_resolver: make_font_resolver(self.capture.font_family.clone()),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(&layout.svg, &opts)
            .map_err(|e| SigformError::render(format!("document svg: {e}")))?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width, size.height)
            .ok_or_else(|| SigformError::render("failed to allocate document pixmap"))?;
        let sx = size.width as f32 / tree.size().width();
        let sy = size.height as f32 / tree.size().height();
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::from_scale(sx, sy),
            &mut pixmap.as_mut(),
        );
        Ok(pixmap.take())
    }
}

impl SnapshotRenderer for DocumentRasterizer {
    fn snapshot(&self, form: &FormContext, date: NaiveDate) -> SigformResult<Snapshot> {
        DocumentRasterizer::snapshot(self, form, date)
    }
}

/// Draw `surface`'s strokes into `slot`. Strokes keep their aspect ratio and are scaled down to
/// fit when the live pad was laid out larger than the slot.
fn composite_ink(
    dst: &mut [u8],
    dst_size: PixelSize,
    surface: &InkSurface,
    slot: Rect,
    scale: f64,
) -> SigformResult<()> {
    if surface.all_segments().next().is_none() {
        return Ok(());
    }

    let fit = surface
        .layout()
        .filter(|l| l.width > 0.0 && l.height > 0.0)
        .map_or(1.0, |l| {
            (slot.width() / l.width).min(slot.height() / l.height)
        })
        .min(1.0);

    let x = (slot.x0 * scale).round();
    let y = (slot.y0 * scale).round();
    let ink_size = PixelSize::new(
        to_px(slot.width() * scale)?,
        to_px(slot.height() * scale)?,
    )?;
    let ink = surface.rasterize(ink_size, Affine::scale(scale * fit))?;
    blit_over(dst, dst_size, &ink, ink_size, x as i64, y as i64)
}

fn to_px(v: f64) -> SigformResult<u32> {
    if !v.is_finite() || v < 1.0 {
        return Err(SigformError::render(format!("invalid raster extent {v}")));
    }
    Ok(v.ceil().min(f64::from(u32::MAX)) as u32)
}

fn build_fontdb(font_dir: Option<&Path>) -> Arc<usvg::fontdb::Database> {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    if let Some(dir) = font_dir {
        load_font_dir(&mut db, dir);
    }
    Arc::new(db)
}

fn load_font_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let entries = match std::fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(err) => {
            tracing::warn!(dir = %dir.display(), %err, "font dir unreadable");
            return;
        }
    };
    for path in entries.flatten().map(|e| e.path()) {
        let is_font = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| matches!(ext.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc"));
        if is_font && path.is_file() {
            if let Err(err) = db.load_font_file(&path) {
                tracing::warn!(path = %path.display(), %err, "font skipped");
            }
        }
    }
}

/// Prefer the requested families, then `preferred`, then generic families, then any face.
fn make_font_resolver(preferred: String) -> usvg::FontResolver<'static> {
    usvg::FontResolver {
        select_font: Box::new(move |font, fontdb| {
            let mut families: Vec<usvg::fontdb::Family<'_>> =
                font.families().iter().map(generic_family).collect();
            if !preferred.is_empty() {
                families.push(usvg::fontdb::Family::Name(&preferred));
            }
            families.extend([
                usvg::fontdb::Family::SansSerif,
                usvg::fontdb::Family::Serif,
                usvg::fontdb::Family::Monospace,
            ]);

            let query = usvg::fontdb::Query {
                families: &families,
                weight: usvg::fontdb::Weight(font.weight()),
                stretch: font_stretch(font.stretch()),
                style: font_style(font.style()),
            };
            fontdb
                .query(&query)
                .or_else(|| fontdb.faces().next().map(|f| f.id))
        }),
        select_fallback: usvg::FontResolver::default_fallback_selector(),
    }
}

fn generic_family(family: &usvg::FontFamily) -> usvg::fontdb::Family<'_> {
    use usvg::fontdb::Family;
    match family {
        usvg::FontFamily::Serif => Family::Serif,
        usvg::FontFamily::SansSerif => Family::SansSerif,
        usvg::FontFamily::Cursive => Family::Cursive,
        usvg::FontFamily::Fantasy => Family::Fantasy,
        usvg::FontFamily::Monospace => Family::Monospace,
        usvg::FontFamily::Named(name) => Family::Name(name),
    }
}

fn font_style(style: usvg::FontStyle) -> usvg::fontdb::Style {
    match style {
        usvg::FontStyle::Normal => usvg::fontdb::Style::Normal,
        usvg::FontStyle::Italic => usvg::fontdb::Style::Italic,
        usvg::FontStyle::Oblique => usvg::fontdb::Style::Oblique,
    }
}

fn font_stretch(stretch: usvg::FontStretch) -> usvg::fontdb::Stretch {
    use usvg::FontStretch as S;
    use usvg::fontdb::Stretch as D;
    match stretch {
        S::UltraCondensed => D::UltraCondensed,
        S::ExtraCondensed => D::ExtraCondensed,
        S::Condensed => D::Condensed,
        S::SemiCondensed => D::SemiCondensed,
        S::Normal => D::Normal,
        S::SemiExpanded => D::SemiExpanded,
        S::Expanded => D::Expanded,
        S::ExtraExpanded => D::ExtraExpanded,
        S::UltraExpanded => D::UltraExpanded,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/rasterizer.rs"]
mod tests;
