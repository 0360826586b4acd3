//! Pure channel recombination operations.
//!
//! Every operation takes decoded images and returns a new image; loading,
//! saving, and the per-group skip policy live in [`crate::pipeline`]. All
//! source-channel reads go through [`Image::get`], so grayscale inputs feed
//! their sole channel wherever a red/green/blue channel is asked for.

use thiserror::Error;

use crate::image::{Channel, Image};

/// Constant fill for the `_ORS` blue channel: round(0.3 * 255).
pub const ORS_BLUE_FILL: u8 = 77;

/// NCE alpha gate for `_S` output, in normalized [0, 1] units.
pub const S_ALPHA_THRESHOLD: f32 = 0.1;

/// Errors from recombination operations.
#[derive(Debug, Error)]
pub enum RecombineError {
    #[error("dimension mismatch: expected {expected_width}x{expected_height}, got {actual_width}x{actual_height}")]
    DimensionMismatch {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },
}

fn check_dimensions(reference: &Image, other: &Image) -> Result<(), RecombineError> {
    if reference.same_dimensions(other) {
        Ok(())
    } else {
        Err(RecombineError::DimensionMismatch {
            expected_width: reference.width(),
            expected_height: reference.height(),
            actual_width: other.width(),
            actual_height: other.height(),
        })
    }
}

/// Copy `src`'s red channel (sole channel for grayscale) into one channel of
/// `dst`. Both images must already have matching dimensions.
fn copy_red_into(dst: &mut Image, dst_channel: Channel, src: &Image) {
    for y in 0..dst.height() {
        for x in 0..dst.width() {
            // Red always resolves on 1/3/4-channel sources.
            let v = src.get(x, y, Channel::Red).unwrap_or(0);
            dst.set(x, y, dst_channel, v);
        }
    }
}

/// Merge an alpha mask into a diffuse map: `_D` + `_A` -> `_DA`.
///
/// D is upgraded to 4 channels (opaque alpha) if needed, then A's red channel
/// replaces D's alpha channel. The `_DAO` variant is the same rule with an
/// `_AO` input.
pub fn merge_da(d: &Image, a: &Image) -> Result<Image, RecombineError> {
    check_dimensions(d, a)?;
    let mut out = d.clone();
    out.ensure_rgba(255);
    copy_red_into(&mut out, Channel::Alpha, a);
    Ok(out)
}

/// Pack roughness and specular into a normal map: `_N` + `_R` + `_S` -> `_NRS`.
///
/// N is upgraded to 4 channels (opaque alpha) if needed; R's red channel
/// replaces N's blue channel and S's red channel replaces N's alpha channel.
/// The alpha overwrite applies even when N arrived with meaningful 4-channel
/// alpha.
pub fn merge_nrs(n: &Image, r: &Image, s: &Image) -> Result<Image, RecombineError> {
    check_dimensions(n, r)?;
    check_dimensions(n, s)?;
    let mut out = n.clone();
    out.ensure_rgba(255);
    copy_red_into(&mut out, Channel::Blue, r);
    copy_red_into(&mut out, Channel::Alpha, s);
    Ok(out)
}

/// Reduced `_NRS` for Trunk groups: `_N` + `_R` -> `_NR`.
///
/// Writes only the blue channel; N's original alpha is left untouched (after
/// the 4-channel upgrade when N had none).
pub fn merge_nr(n: &Image, r: &Image) -> Result<Image, RecombineError> {
    check_dimensions(n, r)?;
    let mut out = n.clone();
    out.ensure_rgba(255);
    copy_red_into(&mut out, Channel::Blue, r);
    Ok(out)
}

/// Merge a packed-PBR mask into a color map: `_C` + `_MRA` -> `_DM`.
///
/// C is upgraded to 4 channels (opaque alpha) if needed, then MRA's red
/// channel replaces C's alpha channel.
pub fn merge_dm(c: &Image, mra: &Image) -> Result<Image, RecombineError> {
    check_dimensions(c, mra)?;
    let mut out = c.clone();
    out.ensure_rgba(255);
    copy_red_into(&mut out, Channel::Alpha, mra);
    Ok(out)
}

/// Build the `_ORS` texture from scratch: R = MRA blue, G = MRA green,
/// B = constant [`ORS_BLUE_FILL`], A = C's alpha if present else 255.
pub fn make_ors(c: &Image, mra: &Image) -> Result<Image, RecombineError> {
    check_dimensions(c, mra)?;
    let (width, height) = (c.width(), c.height());
    let mut data = Vec::with_capacity(width as usize * height as usize * 4);

    for y in 0..height {
        for x in 0..width {
            let r = mra.get(x, y, Channel::Blue).unwrap_or(0);
            let g = mra.get(x, y, Channel::Green).unwrap_or(0);
            let a = c.get(x, y, Channel::Alpha).unwrap_or(255);
            data.extend_from_slice(&[r, g, ORS_BLUE_FILL, a]);
        }
    }

    // Length is pixels * 4 by construction.
    Ok(Image::from_raw(width, height, 4, data).expect("constructed buffer"))
}

/// Reconstruct a normal map from a packed `_NCE` texture: `_NCE` -> `_N`.
///
/// R and G copy NCE's R and G; B is the Z component of the unit normal
/// derived from X/Y. Over-unit-length inputs clamp Z to zero rather than
/// propagating NaN. Output is 3-channel.
pub fn make_n(nce: &Image) -> Image {
    let (width, height) = (nce.width(), nce.height());
    let mut data = Vec::with_capacity(width as usize * height as usize * 3);

    for y in 0..height {
        for x in 0..width {
            let r = nce.get(x, y, Channel::Red).unwrap_or(0);
            let g = nce.get(x, y, Channel::Green).unwrap_or(0);
            data.extend_from_slice(&[r, g, reconstruct_z(r, g)]);
        }
    }

    Image::from_raw(width, height, 3, data).expect("constructed buffer")
}

/// Derive the blue (Z) sample of a unit normal from its red (X) and green
/// (Y) samples: normalize to [-1, 1], apply the unit-length constraint, map
/// back to [0, 255].
pub fn reconstruct_z(r: u8, g: u8) -> u8 {
    let rn = r as f32 / 127.5 - 1.0;
    let gn = g as f32 / 127.5 - 1.0;
    let bn = (1.0 - rn * rn - gn * gn).max(0.0).sqrt();
    ((bn + 1.0) * 127.5).round().clamp(0.0, 255.0) as u8
}

/// Build the `_S` texture from an `_NCE` input, or decline.
///
/// Returns `None` when NCE has no alpha channel or its maximum alpha value
/// does not exceed [`S_ALPHA_THRESHOLD`] (treated as pure black, no file
/// wanted). Otherwise the output is 3-channel, all black except blue = NCE's
/// alpha verbatim.
pub fn make_s(nce: &Image) -> Option<Image> {
    let max_alpha = nce.max_alpha()?;
    if max_alpha as f32 / 255.0 <= S_ALPHA_THRESHOLD {
        return None;
    }

    let (width, height) = (nce.width(), nce.height());
    let mut data = Vec::with_capacity(width as usize * height as usize * 3);
    for y in 0..height {
        for x in 0..width {
            let a = nce.get(x, y, Channel::Alpha).unwrap_or(0);
            data.extend_from_slice(&[0, 0, a]);
        }
    }
    Some(Image::from_raw(width, height, 3, data).expect("constructed buffer"))
}

/// Per-pixel alpha reading for a UniqueMask input: the alpha channel when
/// present, the mean of the channels for a 3-channel mask, the sole channel
/// for grayscale.
fn mask_alpha(mask: &Image, x: u32, y: u32) -> u8 {
    match mask.channels() {
        4 => mask.get(x, y, Channel::Alpha).unwrap_or(255),
        3 => {
            let r = mask.get(x, y, Channel::Red).unwrap_or(0) as u16;
            let g = mask.get(x, y, Channel::Green).unwrap_or(0) as u16;
            let b = mask.get(x, y, Channel::Blue).unwrap_or(0) as u16;
            ((r + g + b) / 3) as u8
        }
        _ => mask.get(x, y, Channel::Red).unwrap_or(255),
    }
}

/// Build the `_SpecialMask` texture: R = NCE blue, G/B/A from the UniqueMask
/// when present. A missing mask degrades to G = 0, B = 0, A = 255.
///
/// The caller is responsible for dropping a mask whose dimensions do not
/// match NCE before calling.
pub fn make_special_mask(nce: &Image, mask: Option<&Image>) -> Image {
    let (width, height) = (nce.width(), nce.height());
    let mut data = Vec::with_capacity(width as usize * height as usize * 4);

    for y in 0..height {
        for x in 0..width {
            let r = nce.get(x, y, Channel::Blue).unwrap_or(0);
            let (g, b, a) = match mask {
                Some(m) => (
                    m.get(x, y, Channel::Red).unwrap_or(0),
                    m.get(x, y, Channel::Blue).unwrap_or(0),
                    mask_alpha(m, x, y),
                ),
                None => (0, 0, 255),
            };
            data.extend_from_slice(&[r, g, b, a]);
        }
    }

    Image::from_raw(width, height, 4, data).expect("constructed buffer")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn gradient(width: u32, height: u32, channels: u8, step: u8) -> Image {
        let mut data = Vec::new();
        for i in 0..(width as usize * height as usize * channels as usize) {
            data.push(((i as u32 * step as u32) % 256) as u8);
        }
        Image::from_raw(width, height, channels, data).unwrap()
    }

    #[test]
    fn test_merge_da_copies_alpha_and_keeps_rgb() {
        let d = gradient(4, 4, 3, 7);
        let a = gradient(4, 4, 4, 11);
        let out = merge_da(&d, &a).unwrap();

        assert_eq!(out.channels(), 4);
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(out.get(x, y, Channel::Red), d.get(x, y, Channel::Red));
                assert_eq!(out.get(x, y, Channel::Green), d.get(x, y, Channel::Green));
                assert_eq!(out.get(x, y, Channel::Blue), d.get(x, y, Channel::Blue));
                assert_eq!(out.get(x, y, Channel::Alpha), a.get(x, y, Channel::Red));
            }
        }
    }

    #[test]
    fn test_merge_da_grayscale_alpha_source() {
        let d = Image::new(2, 2, 4, 100).unwrap();
        let a = Image::from_raw(2, 2, 1, vec![5, 6, 7, 8]).unwrap();
        let out = merge_da(&d, &a).unwrap();
        assert_eq!(out.get(0, 0, Channel::Alpha), Some(5));
        assert_eq!(out.get(1, 1, Channel::Alpha), Some(8));
    }

    #[test]
    fn test_merge_da_rejects_mismatched_dimensions() {
        let d = Image::new(4, 4, 3, 0).unwrap();
        let a = Image::new(2, 2, 3, 0).unwrap();
        assert!(matches!(
            merge_da(&d, &a),
            Err(RecombineError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_merge_nrs_overwrites_blue_and_alpha() {
        let n = gradient(4, 4, 4, 3);
        let r = gradient(4, 4, 3, 5);
        let s = gradient(4, 4, 1, 9);
        let out = merge_nrs(&n, &r, &s).unwrap();

        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(out.get(x, y, Channel::Red), n.get(x, y, Channel::Red));
                assert_eq!(out.get(x, y, Channel::Green), n.get(x, y, Channel::Green));
                assert_eq!(out.get(x, y, Channel::Blue), r.get(x, y, Channel::Red));
                assert_eq!(out.get(x, y, Channel::Alpha), s.get(x, y, Channel::Red));
            }
        }
    }

    #[test]
    fn test_merge_nr_preserves_alpha() {
        let mut n = Image::new(2, 2, 4, 50).unwrap();
        n.set(0, 0, Channel::Alpha, 123);
        let r = Image::new(2, 2, 3, 200).unwrap();
        let out = merge_nr(&n, &r).unwrap();
        assert_eq!(out.get(0, 0, Channel::Blue), Some(200));
        assert_eq!(out.get(0, 0, Channel::Alpha), Some(123));
        assert_eq!(out.get(1, 1, Channel::Alpha), Some(50));
    }

    #[test]
    fn test_merge_dm_defaults_alpha_opaque_before_overwrite() {
        let c = Image::new(2, 2, 3, 10).unwrap();
        let mra = Image::new(2, 2, 3, 42).unwrap();
        let out = merge_dm(&c, &mra).unwrap();
        assert_eq!(out.channels(), 4);
        assert_eq!(out.get(0, 0, Channel::Alpha), Some(42));
    }

    #[test]
    fn test_make_ors_channel_layout() {
        let mut mra = Image::new(2, 2, 3, 0).unwrap();
        mra.set(0, 0, Channel::Blue, 90);
        mra.set(0, 0, Channel::Green, 60);
        let c = Image::new(2, 2, 3, 0).unwrap();

        let out = make_ors(&c, &mra).unwrap();
        assert_eq!(out.get(0, 0, Channel::Red), Some(90));
        assert_eq!(out.get(0, 0, Channel::Green), Some(60));
        assert_eq!(out.get(0, 0, Channel::Blue), Some(ORS_BLUE_FILL));
        // C has no alpha, so A defaults to 255.
        assert_eq!(out.get(0, 0, Channel::Alpha), Some(255));
    }

    #[test]
    fn test_make_ors_uses_c_alpha_when_present() {
        let mut c = Image::new(1, 1, 4, 0).unwrap();
        c.set(0, 0, Channel::Alpha, 33);
        let mra = Image::new(1, 1, 3, 0).unwrap();
        let out = make_ors(&c, &mra).unwrap();
        assert_eq!(out.get(0, 0, Channel::Alpha), Some(33));
    }

    #[test]
    fn test_reconstruct_z_flat_normal() {
        // Flat normal (128, 128) maps to X = Y = 0.0039..., Z ~= 1.
        assert_eq!(reconstruct_z(128, 128), 255);
        // Neutral (127.5 is not representable; 127 sits just below zero).
        assert!(reconstruct_z(127, 127) >= 254);
    }

    #[test]
    fn test_reconstruct_z_clamps_degenerate_inputs() {
        // (255, 255) maps to X = Y = 1.0, over unit length; Z clamps to 0,
        // which writes back as 0.5 in channel units.
        assert_eq!(reconstruct_z(255, 255), 128);
        assert_eq!(reconstruct_z(0, 0), 128);
    }

    #[test]
    fn test_make_n_is_idempotent_on_own_output() {
        let nce = gradient(8, 8, 4, 13);
        let n = make_n(&nce);
        assert_eq!(n.channels(), 3);
        for y in 0..8 {
            for x in 0..8 {
                let r = n.get(x, y, Channel::Red).unwrap();
                let g = n.get(x, y, Channel::Green).unwrap();
                assert_eq!(n.get(x, y, Channel::Blue), Some(reconstruct_z(r, g)));
            }
        }
        let again = make_n(&n);
        assert_eq!(again, n);
    }

    #[test]
    fn test_make_s_gate_below_threshold() {
        // Uniform alpha 20/255 ~= 0.078 stays under the 0.1 gate.
        let nce = Image::from_raw(1, 1, 4, vec![0, 0, 0, 20]).unwrap();
        assert_eq!(make_s(&nce), None);
    }

    #[test]
    fn test_make_s_gate_above_threshold() {
        let mut nce = Image::new(2, 1, 4, 0).unwrap();
        nce.set(0, 0, Channel::Alpha, 200);
        nce.set(1, 0, Channel::Alpha, 10);

        let s = make_s(&nce).expect("200/255 exceeds the gate");
        assert_eq!(s.channels(), 3);
        assert_eq!(s.get(0, 0, Channel::Red), Some(0));
        assert_eq!(s.get(0, 0, Channel::Green), Some(0));
        assert_eq!(s.get(0, 0, Channel::Blue), Some(200));
        assert_eq!(s.get(1, 0, Channel::Blue), Some(10));
    }

    #[test]
    fn test_make_s_requires_alpha_channel() {
        let nce = Image::new(2, 2, 3, 255).unwrap();
        assert_eq!(make_s(&nce), None);
    }

    #[test]
    fn test_special_mask_without_mask_uses_defaults() {
        let mut nce = Image::new(1, 1, 4, 0).unwrap();
        nce.set(0, 0, Channel::Blue, 77);
        let out = make_special_mask(&nce, None);
        assert_eq!(out.get(0, 0, Channel::Red), Some(77));
        assert_eq!(out.get(0, 0, Channel::Green), Some(0));
        assert_eq!(out.get(0, 0, Channel::Blue), Some(0));
        assert_eq!(out.get(0, 0, Channel::Alpha), Some(255));
    }

    #[test]
    fn test_special_mask_with_rgba_mask() {
        let nce = Image::new(1, 1, 4, 10).unwrap();
        let mask = Image::from_raw(1, 1, 4, vec![1, 2, 3, 4]).unwrap();
        let out = make_special_mask(&nce, Some(&mask));
        assert_eq!(out.get(0, 0, Channel::Red), Some(10));
        assert_eq!(out.get(0, 0, Channel::Green), Some(1));
        assert_eq!(out.get(0, 0, Channel::Blue), Some(3));
        assert_eq!(out.get(0, 0, Channel::Alpha), Some(4));
    }

    #[test]
    fn test_special_mask_rgb_mask_alpha_is_channel_mean() {
        let nce = Image::new(1, 1, 4, 0).unwrap();
        let mask = Image::from_raw(1, 1, 3, vec![30, 60, 90]).unwrap();
        let out = make_special_mask(&nce, Some(&mask));
        assert_eq!(out.get(0, 0, Channel::Alpha), Some(60));
    }

    #[test]
    fn test_special_mask_gray_mask() {
        let nce = Image::new(1, 1, 4, 0).unwrap();
        let mask = Image::from_raw(1, 1, 1, vec![99]).unwrap();
        let out = make_special_mask(&nce, Some(&mask));
        assert_eq!(out.get(0, 0, Channel::Green), Some(99));
        assert_eq!(out.get(0, 0, Channel::Blue), Some(99));
        assert_eq!(out.get(0, 0, Channel::Alpha), Some(99));
    }
}
