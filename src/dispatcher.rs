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
use crate::convert_image::common::{compute_stride, out_of_bounds, wg_index};
use crate::pixel_format::PixelFormat;
use crate::{ConversionMode, ErrorKind};

const SOURCE_PIXEL_FORMAT_COUNT: usize = 2;
const MODE_COUNT: usize = 2;

pub const TABLE_SIZE: usize = SOURCE_PIXEL_FORMAT_COUNT * MODE_COUNT;

/// Packed formats come first, so any other format maps past the end of the table.
pub const fn get_index(pixel_format: PixelFormat, mode: ConversionMode) -> usize {
    (pixel_format as usize) * MODE_COUNT + (mode as usize)
}

pub type RowToY = fn(&[u8], &mut [u8], usize);
pub type RowToYuv = fn(&[u8], &mut [u8], &mut [u8], &mut [u8], usize);

/// Row functions bound for one (pixel format, mode) pair
#[derive(Copy, Clone)]
pub struct RowConverters {
    pub to_y: RowToY,
    pub to_yuv: RowToYuv,
}

/// Location of the packed source rows.
///
/// With a negative stride the first image row is the last one in memory.
struct SourceRows {
    stride: usize,
    last_line: usize,
    bottom_up: bool,
}

impl SourceRows {
    fn offset(&self, line: usize) -> usize {
        if self.bottom_up {
            (self.last_line - line) * self.stride
        } else {
            line * self.stride
        }
    }
}

/// Checks a plane of `rows` lines of `row_bytes` bytes, `stride` bytes apart, fits in
/// `len` bytes.
pub fn check_plane(
    len: usize,
    stride: usize,
    rows: usize,
    row_bytes: usize,
) -> Result<(), ErrorKind> {
    if rows == 0 || row_bytes == 0 {
        return Ok(());
    }

    if stride < row_bytes {
        return Err(ErrorKind::InvalidValue);
    }

    if out_of_bounds(len, stride, rows - 1, row_bytes) {
        return Err(ErrorKind::NotEnoughData);
    }

    Ok(())
}

/// Converts a packed image to i420, two rows at a time.
///
/// The first row of each pair produces luma and chroma, the second one luma only.
/// Width and height are even.
pub fn rgb_to_i420(
    converters: RowConverters,
    width: u32,
    height: u32,
    depth: usize,
    src_stride: isize,
    src_buffers: &[&[u8]],
    dst_strides: &[usize],
    dst_buffers: &mut [&mut [u8]],
) -> Result<(), ErrorKind> {
    let (Some(src_plane), [y_stride, u_stride, v_stride, ..], [y_plane, u_plane, v_plane, ..]) =
        (src_buffers.first(), dst_strides, dst_buffers)
    else {
        return Err(ErrorKind::NotEnoughData);
    };

    let w = width as usize;
    let h = height as usize;
    let cw = w / 2;
    let ch = h / 2;
    let rgb_stride = depth.checked_mul(w).ok_or(ErrorKind::NotEnoughData)?;

    let rows = SourceRows {
        stride: compute_stride(src_stride.unsigned_abs(), rgb_stride),
        last_line: h.saturating_sub(1),
        bottom_up: src_stride < 0,
    };
    let y_stride = compute_stride(*y_stride, w);
    let u_stride = compute_stride(*u_stride, cw);
    let v_stride = compute_stride(*v_stride, cw);

    // Ensure there is sufficient data in the buffers according
    // to the image dimensions and computed strides
    check_plane(src_plane.len(), rows.stride, h, rgb_stride)?;
    check_plane(y_plane.len(), y_stride, h, w)?;
    check_plane(u_plane.len(), u_stride, ch, cw)?;
    check_plane(v_plane.len(), v_stride, ch, cw)?;

    if w == 0 {
        return Ok(());
    }

    for y in 0..ch {
        let line = 2 * y;

        (converters.to_yuv)(
            &src_plane[rows.offset(line)..][..rgb_stride],
            &mut y_plane[wg_index(0, line, 1, y_stride)..][..w],
            &mut u_plane[wg_index(0, y, 1, u_stride)..][..cw],
            &mut v_plane[wg_index(0, y, 1, v_stride)..][..cw],
            w,
        );

        (converters.to_y)(
            &src_plane[rows.offset(line + 1)..][..rgb_stride],
            &mut y_plane[wg_index(0, line + 1, 1, y_stride)..][..w],
            w,
        );
    }

    Ok(())
}
