use crate::foundation::error::{OverlayError, OverlayResult};
use crate::foundation::math::mul_div255;

/// One premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Porter-Duff "over" on premultiplied pixels.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    match src[3] {
        0 => dst,
        255 => src,
        sa => {
            let inv = 255 - u16::from(sa);
            std::array::from_fn(|i| src[i].saturating_add(mul_div255(u16::from(dst[i]), inv)))
        }
    }
}

/// Composite a same-sized premultiplied buffer over `dst`.
pub fn over_in_place(dst: &mut [u8], src: &[u8]) -> OverlayResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(OverlayError::render(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Replace `dst` with `color` weighted by coverage: `color * c + dst * (1 - c)`.
///
/// Full coverage writes `color` exactly, whatever was underneath.
pub fn copy_with_coverage(dst: PremulRgba8, color: PremulRgba8, coverage: u8) -> PremulRgba8 {
    match coverage {
        0 => dst,
        255 => color,
        c => {
            let (c, inv) = (u16::from(c), 255 - u16::from(c));
            std::array::from_fn(|i| {
                mul_div255(u16::from(color[i]), c)
                    .saturating_add(mul_div255(u16::from(dst[i]), inv))
            })
        }
    }
}

/// Placement of a small raster inside a larger one.
#[derive(Clone, Copy, Debug)]
pub struct BlitParams {
    /// Destination width in pixels.
    pub dst_width: u32,
    /// Destination height in pixels.
    pub dst_height: u32,
    /// Source width in pixels.
    pub src_width: u32,
    /// Source height in pixels.
    pub src_height: u32,
    /// Destination x of the source's top-left pixel; may be negative.
    pub x: i64,
    /// Destination y of the source's top-left pixel; may be negative.
    pub y: i64,
}

/// Composite `src` over `dst` at an offset, clipping whatever falls outside `dst`.
pub fn blit_over(dst: &mut [u8], src: &[u8], params: BlitParams) -> OverlayResult<()> {
    blit_with(dst, src, params, over)
}

/// Stamp `color` into `dst` through the alpha channel of `coverage`, clipping like
/// [`blit_over`]. Covered pixels are replaced rather than blended with what is below.
pub fn blit_coverage(
    dst: &mut [u8],
    coverage: &[u8],
    color: PremulRgba8,
    params: BlitParams,
) -> OverlayResult<()> {
    blit_with(dst, coverage, params, |d, s| copy_with_coverage(d, color, s[3]))
}

fn blit_with(
    dst: &mut [u8],
    src: &[u8],
    params: BlitParams,
    op: impl Fn(PremulRgba8, PremulRgba8) -> PremulRgba8,
) -> OverlayResult<()> {
    let BlitParams {
        dst_width,
        dst_height,
        src_width,
        src_height,
        x,
        y,
    } = params;

    let dst_len = (dst_width as usize)
        .checked_mul(dst_height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| OverlayError::render("blit destination size overflow"))?;
    let src_len = (src_width as usize)
        .checked_mul(src_height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| OverlayError::render("blit source size overflow"))?;
    if dst.len() != dst_len || src.len() != src_len {
        return Err(OverlayError::render(
            "blit expects buffers matching width*height*4",
        ));
    }

    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + i64::from(src_width)).min(i64::from(dst_width));
    let y1 = (y + i64::from(src_height)).min(i64::from(dst_height));
    if x0 >= x1 || y0 >= y1 {
        return Ok(());
    }

    for dy in y0..y1 {
        let sy = (dy - y) as usize;
        for dx in x0..x1 {
            let sx = (dx - x) as usize;
            let si = (sy * src_width as usize + sx) * 4;
            let di = (dy as usize * dst_width as usize + dx as usize) * 4;
            let s = [src[si], src[si + 1], src[si + 2], src[si + 3]];
            let d = [dst[di], dst[di + 1], dst[di + 2], dst[di + 3]];
            dst[di..di + 4].copy_from_slice(&op(d, s));
        }
    }
    Ok(())
}

/// Straight → premultiplied alpha, in place.
pub fn premultiply_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = mul_div255(u16::from(px[0]), a);
        px[1] = mul_div255(u16::from(px[1]), a);
        px[2] = mul_div255(u16::from(px[2]), a);
    }
}

/// Premultiplied → straight alpha, in place.
pub fn unpremultiply_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
