// Copyright 2019 Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

// Permission is hereby granted, free of charge, to any person obtaining a copy of this
// software and associated documentation files (the "Software"), to deal in the Software
// without restriction, including without limitation the rights to use, copy, modify,
// merge, publish, distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED,
// INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A
// PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT
// HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE
// SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
use crate::convert_image::common::*;

/// Numeric policy of the BT.601 studio swing transform.
///
/// Each function maps an 8-bit `(r, g, b)` triple to one 8-bit sample.
/// Conversions always run [`FixedPoint`]; [`FloatingPoint`] is the reference it is
/// measured against, the two never differ by more than one level.
pub trait Precision {
    /// Luma sample
    fn to_y(r: u8, g: u8, b: u8) -> u8;
    /// Blue difference chroma sample
    fn to_u(r: u8, g: u8, b: u8) -> u8;
    /// Red difference chroma sample
    fn to_v(r: u8, g: u8, b: u8) -> u8;
}

/// Fixed point transform with 8 fractional bits.
///
/// ```text
/// y = (( 66 * r + 129 * g +  25 * b + 128) >> 8) + 16
/// u = ((-38 * r -  74 * g + 112 * b + 128) >> 8) + 128
/// v = ((112 * r -  94 * g -  18 * b + 128) >> 8) + 128
/// ```
///
/// Results are not clamped: y is always in [16, 235], u and v in [16, 240].
pub struct FixedPoint;

/// Double precision transform, clamped to [0, 255] and rounded to nearest.
///
/// The factors are derived from `Kr = 0.299`, `Kb = 0.114`, with luma scaled
/// to 219 levels and chroma to 224 levels.
pub struct FloatingPoint;

/// Perform affine transformation y = Ax + b, where:
/// - A = (ax, ay, az)
/// - x = (x, y, z)
/// - b = bw
fn affine_transform(x: i32, y: i32, z: i32, ax: i32, ay: i32, az: i32, bw: i32) -> i32 {
    (ax * x) + (ay * y) + (az * z) + bw
}

/// Converts fixed point number to int
fn fix_to_i32(fix: i32, frac_bits: i32) -> i32 {
    fix >> frac_bits
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_u8(x: i32) -> u8 {
    debug_assert!((0..=255).contains(&x));
    x as u8
}

fn saturate(x: i32) -> u8 {
    to_u8(x.clamp(0, 255))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_to_u8(x: f64) -> u8 {
    x.clamp(0.0, 255.0).round() as u8
}

impl Precision for FixedPoint {
    #[inline(always)]
    fn to_y(r: u8, g: u8, b: u8) -> u8 {
        let (r, g, b) = (i32::from(r), i32::from(g), i32::from(b));
        to_u8(
            fix_to_i32(
                affine_transform(r, g, b, XR_601, XG_601, XB_601, FIX8_HALF),
                FIX8,
            ) + Y_MIN,
        )
    }

    #[inline(always)]
    fn to_u(r: u8, g: u8, b: u8) -> u8 {
        let (r, g, b) = (i32::from(r), i32::from(g), i32::from(b));
        to_u8(
            fix_to_i32(
                affine_transform(r, g, b, YR_601, YG_601, YB_601, FIX8_HALF),
                FIX8,
            ) + C_HALF,
        )
    }

    #[inline(always)]
    fn to_v(r: u8, g: u8, b: u8) -> u8 {
        let (r, g, b) = (i32::from(r), i32::from(g), i32::from(b));
        to_u8(
            fix_to_i32(
                affine_transform(r, g, b, ZR_601, ZG_601, ZB_601, FIX8_HALF),
                FIX8,
            ) + C_HALF,
        )
    }
}

impl Precision for FloatingPoint {
    fn to_y(r: u8, g: u8, b: u8) -> u8 {
        round_to_u8(
            XR_601_F * f64::from(r)
                + XG_601_F * f64::from(g)
                + XB_601_F * f64::from(b)
                + f64::from(Y_MIN),
        )
    }

    fn to_u(r: u8, g: u8, b: u8) -> u8 {
        round_to_u8(
            YR_601_F * f64::from(r)
                + YG_601_F * f64::from(g)
                + YB_601_F * f64::from(b)
                + f64::from(C_HALF),
        )
    }

    fn to_v(r: u8, g: u8, b: u8) -> u8 {
        round_to_u8(
            ZR_601_F * f64::from(r)
                + ZG_601_F * f64::from(g)
                + ZB_601_F * f64::from(b)
                + f64::from(C_HALF),
        )
    }
}

/// Inverse of [`FixedPoint`], saturating to [0, 255]:
///
/// ```text
/// r = (298 * (y - 16) + 409 * (v - 128) + 128) >> 8
/// g = (298 * (y - 16) - 100 * (u - 128) - 208 * (v - 128) + 128) >> 8
/// b = (298 * (y - 16) + 516 * (u - 128) + 128) >> 8
/// ```
///
/// # Examples
/// ```
/// use yuv420_convert::{yuv_to_rgb, FixedPoint, Precision};
///
/// let (y, u, v) = (
///     FixedPoint::to_y(128, 128, 128),
///     FixedPoint::to_u(128, 128, 128),
///     FixedPoint::to_v(128, 128, 128),
/// );
/// assert_eq!(yuv_to_rgb(y, u, v), (128, 128, 128));
/// ```
pub fn yuv_to_rgb(y: u8, u: u8, v: u8) -> (u8, u8, u8) {
    let sy = XXYM_601 * (i32::from(y) - Y_MIN);
    let cb = i32::from(u) - C_HALF;
    let cr = i32::from(v) - C_HALF;

    (
        saturate(fix_to_i32(sy + RCRM_601 * cr + FIX8_HALF, FIX8)),
        saturate(fix_to_i32(
            sy - GCBM_601 * cb - GCRM_601 * cr + FIX8_HALF,
            FIX8,
        )),
        saturate(fix_to_i32(sy + BCBM_601 * cb + FIX8_HALF, FIX8)),
    )
}
