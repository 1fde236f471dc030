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

pub const FIX8: i32 = 8;
pub const FIX8_HALF: i32 = 1 << (FIX8 - 1);

// Coefficient table for 601 (studio swing), Q8
pub const XR_601: i32 = 66;
pub const XG_601: i32 = 129;
pub const XB_601: i32 = 25;
pub const YR_601: i32 = -38;
pub const YG_601: i32 = -74;
pub const YB_601: i32 = 112;
pub const ZR_601: i32 = 112;
pub const ZG_601: i32 = -94;
pub const ZB_601: i32 = -18;

pub const XXYM_601: i32 = 298;
pub const RCRM_601: i32 = 409;
pub const GCRM_601: i32 = 208;
pub const GCBM_601: i32 = 100;
pub const BCBM_601: i32 = 516;

// Floating point factors the Q8 table is rounded from
pub const KR_601: f64 = 0.299;
pub const KB_601: f64 = 0.114;
pub const KG_601: f64 = 1.0 - KR_601 - KB_601;
pub const Y_SCALE: f64 = 219.0 / 255.0;
pub const C_SCALE: f64 = 224.0 / 255.0;

pub const XR_601_F: f64 = KR_601 * Y_SCALE;
pub const XG_601_F: f64 = KG_601 * Y_SCALE;
pub const XB_601_F: f64 = KB_601 * Y_SCALE;
pub const YR_601_F: f64 = -KR_601 / (2.0 * (1.0 - KB_601)) * C_SCALE;
pub const YG_601_F: f64 = -KG_601 / (2.0 * (1.0 - KB_601)) * C_SCALE;
pub const YB_601_F: f64 = 0.5 * C_SCALE;
pub const ZR_601_F: f64 = 0.5 * C_SCALE;
pub const ZG_601_F: f64 = -KG_601 / (2.0 * (1.0 - KR_601)) * C_SCALE;
pub const ZB_601_F: f64 = -KB_601 / (2.0 * (1.0 - KR_601)) * C_SCALE;

// Other defines
pub const Y_MIN: i32 = 16;
pub const C_HALF: i32 = 128;
pub const DEFAULT_ALPHA: u8 = 255;

pub fn wg_index(x: usize, y: usize, w: usize, h: usize) -> usize {
    (h * y) + (x * w)
}

pub const fn lower_multiple_of_pot(x: usize, p: usize) -> usize {
    x & !(p - 1)
}

pub fn compute_stride(stride: usize, packed_stride: usize) -> usize {
    if stride == 0 {
        packed_stride
    } else {
        stride
    }
}

/// True if a plane of `last_line + 1` rows, each `row_bytes` long and `stride` bytes
/// apart, does not fit in `len` bytes (or its extent overflows).
pub fn out_of_bounds(len: usize, stride: usize, last_line: usize, row_bytes: usize) -> bool {
    stride
        .checked_mul(last_line)
        .and_then(|extent| extent.checked_add(row_bytes))
        .map_or(true, |extent| extent > len)
}

pub const fn i32_to_i16(x: i32) -> i16 {
    let val = (x & 0xFFFF) as u32;
    val as i16
}

pub const fn i32_to_i8(x: i32) -> i8 {
    let val = (x & 0xFF) as u8;
    val as i8
}
