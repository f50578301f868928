use crate::foundation::core::PixelSize;
use crate::foundation::error::{SigformError, SigformResult};
use crate::foundation::math::mul_div255_u8;

pub type PremulRgba8 = [u8; 4];

/// Porter-Duff source-over.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Porter-Duff destination-out: keeps `dst` where `src` is transparent, removes it where
/// `src` is opaque. Colour of `src` is ignored.
pub fn dest_out(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    if src[3] == 0 {
        return dst;
    }
    let keep = 255u16 - u16::from(src[3]);
    [
        mul_div255_u8(u16::from(dst[0]), keep),
        mul_div255_u8(u16::from(dst[1]), keep),
        mul_div255_u8(u16::from(dst[2]), keep),
        mul_div255_u8(u16::from(dst[3]), keep),
    ]
}

pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> SigformResult<()> {
    check_equal_len(dst, src, "over_in_place")?;
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

pub fn dest_out_in_place(dst: &mut [u8], src: &[u8]) -> SigformResult<()> {
    check_equal_len(dst, src, "dest_out_in_place")?;
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = dest_out([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Composite `src` over `dst` with `src`'s top-left corner at `(x, y)` in `dst`. Pixels that
/// fall outside `dst` are dropped.
pub fn blit_over(
    dst: &mut [u8],
    dst_size: PixelSize,
    src: &[u8],
    src_size: PixelSize,
    x: i64,
    y: i64,
) -> SigformResult<()> {
    if dst.len() != dst_size.byte_len() || src.len() != src_size.byte_len() {
        return Err(SigformError::render(
            "blit_over buffer lengths do not match their sizes",
        ));
    }

    let dw = i64::from(dst_size.width);
    let dh = i64::from(dst_size.height);
    let sw = i64::from(src_size.width);
    let sh = i64::from(src_size.height);

    let x0 = x.max(0);
    let x1 = (x + sw).min(dw);
    if x0 >= x1 {
        return Ok(());
    }

    for sy in 0..sh {
        let dy = y + sy;
        if dy < 0 || dy >= dh {
            continue;
        }
        let src_row = (sy * sw + (x0 - x)) as usize * 4;
        let dst_row = (dy * dw + x0) as usize * 4;
        let n = (x1 - x0) as usize * 4;
        let s = &src[src_row..src_row + n];
        let d = &mut dst[dst_row..dst_row + n];
        for (dp, sp) in d.chunks_exact_mut(4).zip(s.chunks_exact(4)) {
            let out = over(
                [dp[0], dp[1], dp[2], dp[3]],
                [sp[0], sp[1], sp[2], sp[3]],
                1.0,
            );
            dp.copy_from_slice(&out);
        }
    }
    Ok(())
}

/// Convert premultiplied RGBA8 to straight alpha, as image encoders expect.
pub fn unpremultiply_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        if a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

fn check_equal_len(dst: &[u8], src: &[u8], what: &str) -> SigformResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(SigformError::render(format!(
            "{what} expects equal-length rgba8 buffers"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
