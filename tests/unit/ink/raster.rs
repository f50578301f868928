use super::*;
use crate::ink::stroke::StrokePoint;

fn line(mode: InkMode, y: f64) -> InkSegment {
    let mut seg = InkSegment::new(mode);
    for i in 0..8 {
        seg.points
            .push(StrokePoint::new(4.0 + i as f64 * 6.0, y, i * 40));
    }
    seg
}

fn alpha_at(buf: &[u8], size: PixelSize, x: u32, y: u32) -> u8 {
    buf[((y * size.width + x) * 4 + 3) as usize]
}

fn size() -> PixelSize {
    PixelSize::new(64, 32).unwrap()
}

#[test]
fn empty_input_yields_transparent_buffer() {
    let buf =
        rasterize_segments(&[], &BrushConfig::default(), size(), Affine::IDENTITY).unwrap();
    assert_eq!(buf.len(), size().byte_len());
    assert!(buf.iter().all(|&b| b == 0));
}

#[test]
fn draw_segment_leaves_ink_along_its_path() {
    let buf = rasterize_segments(
        &[line(InkMode::Draw, 16.0)],
        &BrushConfig::default(),
        size(),
        Affine::IDENTITY,
    )
    .unwrap();
    assert_eq!(alpha_at(&buf, size(), 20, 16), 255);
    assert_eq!(alpha_at(&buf, size(), 20, 2), 0);
}

#[test]
fn erase_segment_removes_ink_underneath() {
    let segments = [line(InkMode::Draw, 16.0), line(InkMode::Erase, 16.0)];
    let buf = rasterize_segments(&segments, &BrushConfig::default(), size(), Affine::IDENTITY)
        .unwrap();
    assert_eq!(alpha_at(&buf, size(), 20, 16), 0);
}

#[test]
fn ink_drawn_after_erase_is_visible_again() {
    let segments = [
        line(InkMode::Draw, 16.0),
        line(InkMode::Erase, 16.0),
        line(InkMode::Draw, 16.0),
    ];
    let buf = rasterize_segments(&segments, &BrushConfig::default(), size(), Affine::IDENTITY)
        .unwrap();
    assert_eq!(alpha_at(&buf, size(), 20, 16), 255);
}

#[test]
fn erase_only_leaves_surface_blank() {
    let buf = rasterize_segments(
        &[line(InkMode::Erase, 16.0)],
        &BrushConfig::default(),
        size(),
        Affine::IDENTITY,
    )
    .unwrap();
    assert!(buf.iter().all(|&b| b == 0));
}

#[test]
fn transform_scales_logical_coordinates() {
    let big = PixelSize::new(128, 64).unwrap();
    let buf = rasterize_segments(
        &[line(InkMode::Draw, 16.0)],
        &BrushConfig::default(),
        big,
        Affine::scale(2.0),
    )
    .unwrap();
    assert_eq!(alpha_at(&buf, big, 40, 32), 255);
    assert_eq!(alpha_at(&buf, big, 40, 16), 0);
}
