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
use crate::color_space::{yuv_to_rgb, FixedPoint, Precision};
use crate::convert_image::common::*;

/// Deinterleave one packed pixel, returning (r, g, b)
///
/// pixel: b g r [a]
#[inline(always)]
fn unpack_bgrx(pixel: &[u8]) -> (u8, u8, u8) {
    (pixel[2], pixel[1], pixel[0])
}

/// Interleave (r, g, b) into one packed pixel
/// Fourth component, if any, is set to DEFAULT_ALPHA
#[inline(always)]
fn pack_bgrx<const DEPTH: usize>(pixel: &mut [u8], (r, g, b): (u8, u8, u8)) {
    pixel[0] = b;
    pixel[1] = g;
    pixel[2] = r;
    if DEPTH == 4 {
        pixel[3] = DEFAULT_ALPHA;
    }
}

#[inline(always)]
pub fn row_to_y<const DEPTH: usize>(src: &[u8], y: &mut [u8], width: usize) {
    for (pixel, luma) in src.chunks_exact(DEPTH).zip(&mut y[..width]) {
        let (r, g, b) = unpack_bgrx(pixel);
        *luma = FixedPoint::to_y(r, g, b);
    }
}

/// Chroma is point sampled from the even pixel of each pair.
#[inline(always)]
pub fn row_to_yuv<const DEPTH: usize>(
    src: &[u8],
    y: &mut [u8],
    u: &mut [u8],
    v: &mut [u8],
    width: usize,
) {
    debug_assert_eq!(width % 2, 0);

    let chroma = u.iter_mut().zip(v.iter_mut());
    let pairs = src
        .chunks_exact(2 * DEPTH)
        .zip(y[..width].chunks_exact_mut(2))
        .zip(chroma);

    for ((pixels, luma), (cb, cr)) in pairs {
        let (r, g, b) = unpack_bgrx(&pixels[..DEPTH]);
        luma[0] = FixedPoint::to_y(r, g, b);
        *cb = FixedPoint::to_u(r, g, b);
        *cr = FixedPoint::to_v(r, g, b);

        let (r, g, b) = unpack_bgrx(&pixels[DEPTH..]);
        luma[1] = FixedPoint::to_y(r, g, b);
    }
}

pub fn bgr_row_to_y(src: &[u8], y: &mut [u8], width: usize) {
    row_to_y::<3>(src, y, width);
}

pub fn bgra_row_to_y(src: &[u8], y: &mut [u8], width: usize) {
    row_to_y::<4>(src, y, width);
}

pub fn bgr_row_to_yuv(src: &[u8], y: &mut [u8], u: &mut [u8], v: &mut [u8], width: usize) {
    row_to_yuv::<3>(src, y, u, v, width);
}

pub fn bgra_row_to_yuv(src: &[u8], y: &mut [u8], u: &mut [u8], v: &mut [u8], width: usize) {
    row_to_yuv::<4>(src, y, u, v, width);
}

/// Upsample an i420 image to packed pixels, nearest chroma.
///
/// Planes have been validated against width, height and strides by the caller.
pub fn i420_to_bgrx<const DEPTH: usize>(
    width: usize,
    height: usize,
    src_strides: (usize, usize, usize),
    src_buffers: (&[u8], &[u8], &[u8]),
    dst_stride: usize,
    dst_buffer: &mut [u8],
) {
    let (y_stride, u_stride, v_stride) = src_strides;
    let (y_plane, u_plane, v_plane) = src_buffers;
    let cw = width / 2;

    for line in 0..height {
        let y_row = &y_plane[wg_index(0, line, 1, y_stride)..][..width];
        let u_row = &u_plane[wg_index(0, line / 2, 1, u_stride)..][..cw];
        let v_row = &v_plane[wg_index(0, line / 2, 1, v_stride)..][..cw];
        let dst_row = &mut dst_buffer[wg_index(0, line, DEPTH, dst_stride)..][..DEPTH * width];

        for (x, pixel) in dst_row.chunks_exact_mut(DEPTH).enumerate() {
            pack_bgrx::<DEPTH>(pixel, yuv_to_rgb(y_row[x], u_row[x / 2], v_row[x / 2]));
        }
    }
}
