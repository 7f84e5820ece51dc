/// Wrap an angle in degrees into `[0, 360)`.
///
/// Non-finite input maps to `0.0`.
pub fn normalize_degrees(deg: f64) -> f64 {
    if !deg.is_finite() {
        return 0.0;
    }
    let r = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs.
    if r >= 360.0 { 0.0 } else { r }
}

/// Clamp an opacity into `[0, 1]`; non-finite values become fully opaque.
pub fn unit_opacity(v: f32) -> f32 {
    if v.is_finite() { v.clamp(0.0, 1.0) } else { 1.0 }
}

/// Scale an 8-bit alpha by a unit factor, rounding to nearest.
pub fn scale_alpha(alpha: u8, factor: f32) -> u8 {
    let v = (f32::from(alpha) * unit_opacity(factor)).round();
    v.clamp(0.0, 255.0) as u8
}

/// `round(x * y / 255)` for 8-bit channel math.
pub fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
