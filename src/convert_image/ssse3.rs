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
use crate::convert_image::lanes::*;
use crate::convert_image::x86;

#[cfg(target_arch = "x86")]
use core::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

use core::ptr::{read_unaligned as loadu, write_unaligned as storeu};

const BLOCK_PIXELS: usize = 16;
const CHUNK_PIXELS: usize = 4;
const CHUNK_BYTES: usize = 16;

/// Byte offset of the last chunk of a block.
///
/// For bgr the fourth chunk would end 4 bytes past the block, so it is loaded
/// earlier and its unpack pattern shifted to match.
const fn tail_offset(depth: usize) -> usize {
    BLOCK_PIXELS * depth - CHUNK_BYTES
}

const fn tail_base(depth: usize) -> usize {
    3 * CHUNK_PIXELS * depth - tail_offset(depth)
}

/// Unpack selectors per depth: low half, high half, high half of the last chunk
const fn block_patterns(depth: usize) -> [Pattern3; 3] {
    [
        unpack_pattern(depth, 0, false),
        unpack_pattern(depth, 0, true),
        unpack_pattern(depth, tail_base(depth), true),
    ]
}

const BGR_PATTERNS: [Pattern3; 3] = block_patterns(3);
const BGRA_PATTERNS: [Pattern3; 3] = block_patterns(4);

// Luma: high byte of each lane, first group to the low 8 bytes, second to the high 8
const Y_REPACK: [Pattern; 2] = [repack_pattern(1, 2, 8, 0), repack_pattern(1, 2, 8, 8)];

// Chroma: low byte of even lanes (even pixels), 4 bytes per group
const UV_REPACK: [Pattern; 2] = [repack_pattern(0, 4, 4, 0), repack_pattern(0, 4, 4, 4)];

/// Registers shared by every block of a row
struct Kernel {
    lo: Vec3,
    hi: Vec3,
    tail: Vec3,
    y_weights: Vec3,
    u_weights: Vec3,
    v_weights: Vec3,
    y_repack: Vec2,
    uv_repack: Vec2,
    round: __m128i,
    y_min: __m128i,
    c_half: __m128i,
}

impl Kernel {
    #[inline(always)]
    unsafe fn new<const DEPTH: usize>() -> Self {
        let patterns = if DEPTH == 4 {
            &BGRA_PATTERNS
        } else {
            &BGR_PATTERNS
        };

        Self {
            lo: Vec3::from_patterns(&patterns[0]),
            hi: Vec3::from_patterns(&patterns[1]),
            tail: Vec3::from_patterns(&patterns[2]),
            y_weights: Vec3::splat(
                i32_to_i16(XB_601),
                i32_to_i16(XG_601),
                i32_to_i16(XR_601),
            ),
            u_weights: Vec3::splat(
                i32_to_i16(YB_601),
                i32_to_i16(YG_601),
                i32_to_i16(YR_601),
            ),
            v_weights: Vec3::splat(
                i32_to_i16(ZB_601),
                i32_to_i16(ZG_601),
                i32_to_i16(ZR_601),
            ),
            y_repack: Vec2::from_patterns(&Y_REPACK[0], &Y_REPACK[1]),
            uv_repack: Vec2::from_patterns(&UV_REPACK[0], &UV_REPACK[1]),
            round: _mm_set1_epi16(i32_to_i16(FIX8_HALF)),
            y_min: _mm_set1_epi8(i32_to_i8(Y_MIN)),
            c_half: _mm_set1_epi16(i32_to_i16(C_HALF)),
        }
    }
}

/// Deinterleave 16 packed pixels into two groups of 8
#[inline(always)]
unsafe fn unpack_block<const DEPTH: usize>(src: *const u8, kernel: &Kernel) -> (Vec3, Vec3) {
    let chunk0: __m128i = loadu(src.cast());
    let chunk1: __m128i = loadu(src.add(CHUNK_PIXELS * DEPTH).cast());
    let chunk2: __m128i = loadu(src.add(2 * CHUNK_PIXELS * DEPTH).cast());
    let chunk3: __m128i = loadu(src.add(tail_offset(DEPTH)).cast());

    (
        Vec3::unpack(chunk0, &kernel.lo).merge(Vec3::unpack(chunk1, &kernel.hi)),
        Vec3::unpack(chunk2, &kernel.lo).merge(Vec3::unpack(chunk3, &kernel.tail)),
    )
}

/// 16 luma samples.
///
/// The weighted sum plus rounding is at most 56228, so it is exact as an unsigned
/// 16-bit lane and its high byte is the sum shifted right by 8.
#[inline(always)]
unsafe fn luma(pixels: (Vec3, Vec3), kernel: &Kernel) -> __m128i {
    let sum = Vec3::sum_pair(
        pixels.0.mullo(&kernel.y_weights),
        pixels.1.mullo(&kernel.y_weights),
    )
    .add(kernel.round);

    _mm_add_epi8(sum.repack(&kernel.y_repack).combine(), kernel.y_min)
}

/// 8 chroma samples in the low half, taken from the even pixels.
///
/// The weighted sum plus rounding lies in [-28432, 28688] and fits a signed lane.
#[inline(always)]
unsafe fn chroma(pixels: (Vec3, Vec3), weights: &Vec3, kernel: &Kernel) -> __m128i {
    Vec3::sum_pair(pixels.0.mullo(weights), pixels.1.mullo(weights))
        .add(kernel.round)
        .shift_right::<FIX8>()
        .add(kernel.c_half)
        .repack(&kernel.uv_repack)
        .combine()
}

#[inline(always)]
unsafe fn block_to_y<const DEPTH: usize>(src: *const u8, y: *mut u8, kernel: &Kernel) {
    let pixels = unpack_block::<DEPTH>(src, kernel);
    storeu(y.cast::<__m128i>(), luma(pixels, kernel));
}

#[inline(always)]
unsafe fn block_to_yuv<const DEPTH: usize>(
    src: *const u8,
    y: *mut u8,
    u: *mut u8,
    v: *mut u8,
    kernel: &Kernel,
) {
    let pixels = unpack_block::<DEPTH>(src, kernel);
    storeu(y.cast::<__m128i>(), luma(pixels, kernel));
    _mm_storel_epi64(u.cast(), chroma(pixels, &kernel.u_weights, kernel));
    _mm_storel_epi64(v.cast(), chroma(pixels, &kernel.v_weights, kernel));
}

#[target_feature(enable = "ssse3")]
unsafe fn row_to_y_ssse3<const DEPTH: usize>(width: usize, src: *const u8, y: *mut u8) {
    let kernel = Kernel::new::<DEPTH>();

    for block in 0..width / BLOCK_PIXELS {
        block_to_y::<DEPTH>(
            src.add(block * BLOCK_PIXELS * DEPTH),
            y.add(block * BLOCK_PIXELS),
            &kernel,
        );
    }
}

#[target_feature(enable = "ssse3")]
unsafe fn row_to_yuv_ssse3<const DEPTH: usize>(
    width: usize,
    src: *const u8,
    y: *mut u8,
    u: *mut u8,
    v: *mut u8,
) {
    let kernel = Kernel::new::<DEPTH>();

    for block in 0..width / BLOCK_PIXELS {
        block_to_yuv::<DEPTH>(
            src.add(block * BLOCK_PIXELS * DEPTH),
            y.add(block * BLOCK_PIXELS),
            u.add(block * BLOCK_PIXELS / 2),
            v.add(block * BLOCK_PIXELS / 2),
            &kernel,
        );
    }
}

// Only bound in the dispatch table when the cpu reports ssse3.
#[inline(always)]
fn row_to_y<const DEPTH: usize>(src: &[u8], y: &mut [u8], width: usize) {
    // Process vector part and scalar one
    let vector_part = lower_multiple_of_pot(width, BLOCK_PIXELS);
    let scalar_part = width - vector_part;
    if vector_part > 0 {
        let (src, y) = (&src[..DEPTH * vector_part], &mut y[..vector_part]);
        unsafe {
            row_to_y_ssse3::<DEPTH>(vector_part, src.as_ptr(), y.as_mut_ptr());
        }
    }

    if scalar_part > 0 {
        x86::row_to_y::<DEPTH>(
            &src[DEPTH * vector_part..],
            &mut y[vector_part..],
            scalar_part,
        );
    }
}

#[inline(always)]
fn row_to_yuv<const DEPTH: usize>(
    src: &[u8],
    y: &mut [u8],
    u: &mut [u8],
    v: &mut [u8],
    width: usize,
) {
    let vector_part = lower_multiple_of_pot(width, BLOCK_PIXELS);
    let scalar_part = width - vector_part;
    if vector_part > 0 {
        let cw = vector_part / 2;
        let (src, y, u, v) = (
            &src[..DEPTH * vector_part],
            &mut y[..vector_part],
            &mut u[..cw],
            &mut v[..cw],
        );
        unsafe {
            row_to_yuv_ssse3::<DEPTH>(
                vector_part,
                src.as_ptr(),
                y.as_mut_ptr(),
                u.as_mut_ptr(),
                v.as_mut_ptr(),
            );
        }
    }

    if scalar_part > 0 {
        let cw = vector_part / 2;
        x86::row_to_yuv::<DEPTH>(
            &src[DEPTH * vector_part..],
            &mut y[vector_part..],
            &mut u[cw..],
            &mut v[cw..],
            scalar_part,
        );
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
