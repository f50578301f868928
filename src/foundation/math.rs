pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Exponential smoothing step used for pointer velocity filtering.
pub(crate) fn smooth(weight: f64, sample: f64, previous: f64) -> f64 {
    let w = weight.clamp(0.0, 1.0);
    w * sample + (1.0 - w) * previous
}
