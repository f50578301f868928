use vello_cpu::kurbo::Shape as _;

use crate::config::BrushConfig;
use crate::foundation::core::{Affine, PixelSize, Point};
use crate::foundation::error::{SigformError, SigformResult};
use crate::ink::stroke::{InkMode, InkSegment, Stamp, stamps};
use crate::render::composite::{dest_out_in_place, over_in_place};

const CIRCLE_TOLERANCE: f64 = 0.1;

/// Replay `segments` into a premultiplied RGBA8 buffer of `size`.
///
/// `transform` maps logical stroke coordinates to buffer pixels. Consecutive segments that share
/// a mode are rasterized together; draw runs are composited source-over, erase runs
/// destination-out, in recording order.
pub(crate) fn rasterize_segments(
    segments: &[InkSegment],
    brush: &BrushConfig,
    size: PixelSize,
    transform: Affine,
) -> SigformResult<Vec<u8>> {
    let w: u16 = size
        .width
        .try_into()
        .map_err(|_| SigformError::render("ink raster width exceeds u16"))?;
    let h: u16 = size
        .height
        .try_into()
        .map_err(|_| SigformError::render("ink raster height exceeds u16"))?;

    let mut out = vec![0u8; size.byte_len()];
    let mut ctx: Option<vello_cpu::RenderContext> = None;

    for run in segments
        .chunk_by(|a, b| a.mode == b.mode)
        .filter(|run| run.iter().any(|s| !s.is_empty()))
    {
        let ctx = ctx.get_or_insert_with(|| vello_cpu::RenderContext::new(w, h));
        ctx.reset();
        ctx.set_transform(affine_to_cpu(transform));

        let mode = run[0].mode;
        let paint = match mode {
            InkMode::Draw => brush.color,
            // Only coverage matters for destination-out.
            InkMode::Erase => crate::foundation::core::Color::WHITE,
        };
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            paint.r, paint.g, paint.b, paint.a,
        ));

        for segment in run {
            for stamp in stamps(segment, brush) {
                if let Some(path) = stamp_path(&stamp) {
                    ctx.fill_path(&path);
                }
            }
        }

        let mut layer = vello_cpu::Pixmap::new(w, h);
        ctx.flush();
        ctx.render_to_pixmap(&mut layer);

        match mode {
            InkMode::Draw => over_in_place(&mut out, layer.data_as_u8_slice(), 1.0)?,
            InkMode::Erase => dest_out_in_place(&mut out, layer.data_as_u8_slice())?,
        }
    }

    Ok(out)
}

fn stamp_path(stamp: &Stamp) -> Option<vello_cpu::kurbo::BezPath> {
    match *stamp {
        Stamp::Disc { center, radius } => {
            if !(radius > 0.0) {
                return None;
            }
            Some(vello_cpu::kurbo::Circle::new(point_to_cpu(center), radius).to_path(CIRCLE_TOLERANCE))
        }
        Stamp::Bridge { .. } => {
            let corners = stamp.bridge_corners()?;
            let mut p = vello_cpu::kurbo::BezPath::new();
            p.move_to(point_to_cpu(corners[0]));
            for c in &corners[1..] {
                p.line_to(point_to_cpu(*c));
            }
            p.close_path();
            Some(p)
        }
    }
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

#[cfg(test)]
#[path = "../../tests/unit/ink/raster.rs"]
mod tests;
