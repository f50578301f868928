use super::*;

#[test]
fn over_opacity_0_is_noop() {
    let dst = [1, 2, 3, 4];
    let src = [200, 200, 200, 200];
    assert_eq!(over(dst, src, 0.0), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over(dst, src, 1.0), src);
}

#[test]
fn over_dst_transparent_returns_src() {
    let dst = [0, 0, 0, 0];
    let src = [100, 110, 120, 200];
    assert_eq!(over(dst, src, 1.0), src);
}

#[test]
fn dest_out_opaque_src_clears_dst() {
    assert_eq!(dest_out([30, 41, 59, 255], [255, 255, 255, 255]), [0, 0, 0, 0]);
}

#[test]
fn dest_out_transparent_src_keeps_dst() {
    let dst = [30, 41, 59, 255];
    assert_eq!(dest_out(dst, [0, 0, 0, 0]), dst);
}

#[test]
fn dest_out_partial_coverage_scales_dst() {
    let out = dest_out([0, 0, 0, 255], [0, 0, 0, 128]);
    assert_eq!(out[3], 127);
}

#[test]
fn in_place_variants_reject_mismatched_lengths() {
    let mut dst = vec![0u8; 8];
    assert!(over_in_place(&mut dst, &[0u8; 4], 1.0).is_err());
    assert!(dest_out_in_place(&mut dst, &[0u8; 12]).is_err());
}

#[test]
fn blit_over_clips_to_destination() {
    let dst_size = PixelSize {
        width: 3,
        height: 2,
    };
    let mut dst = vec![0u8; dst_size.byte_len()];
    let src_size = PixelSize {
        width: 2,
        height: 2,
    };
    let src = [9u8, 9, 9, 255].repeat(4);

    blit_over(&mut dst, dst_size, &src, src_size, 2, 1).unwrap();

    // Only pixel (2, 1) is covered.
    let covered: Vec<usize> = dst
        .chunks_exact(4)
        .enumerate()
        .filter(|(_, px)| px[3] != 0)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(covered, vec![5]);

    blit_over(&mut dst, dst_size, &src, src_size, -5, -5).unwrap();
    assert_eq!(dst.chunks_exact(4).filter(|px| px[3] != 0).count(), 1);
}

#[test]
fn unpremultiply_restores_straight_color() {
    let mut px = vec![64u8, 0, 0, 128, 5, 5, 5, 0];
    unpremultiply_in_place(&mut px);
    assert_eq!(&px[..4], &[128, 0, 0, 128]);
    assert_eq!(&px[4..], &[0, 0, 0, 0]);
}
