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
use core::fmt;

pub const MAX_NUMBER_OF_PLANES: usize = 3;

/// An enumeration of supported pixel formats.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(C)]
pub enum PixelFormat {
    /// Reverse RGB with alpha channel last. Alpha is ignored on input.
    ///
    /// 32 bits per pixel
    Bgra,
    /// Reverse RGB packed into 24 bits without padding.
    ///
    /// 24 bits per pixel
    Bgr,
    /// YUV with one luma plane Y then U chroma plane and last the V chroma plane.
    /// The two chroma planes are sub-sampled in both the horizontal and vertical dimensions
    /// by a factor of 2.
    ///
    /// 12 bits per pixel
    I420,
}

impl PixelFormat {
    pub(crate) const fn depth(pixel_format: PixelFormat) -> usize {
        match pixel_format {
            PixelFormat::Bgra => 4,
            PixelFormat::Bgr => 3,
            PixelFormat::I420 => 0,
        }
    }

    pub(crate) const fn planes(pixel_format: PixelFormat) -> usize {
        match pixel_format {
            PixelFormat::Bgra | PixelFormat::Bgr => 1,
            PixelFormat::I420 => 3,
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PixelFormat::Bgra => write!(f, "bgra"),
            PixelFormat::Bgr => write!(f, "bgr"),
            PixelFormat::I420 => write!(f, "i420"),
        }
    }
}

impl TryFrom<i32> for PixelFormat {
    type Error = ();

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PixelFormat::Bgra),
            1 => Ok(PixelFormat::Bgr),
            2 => Ok(PixelFormat::I420),
            _ => Err(()),
        }
    }
}

/// If a plane stride is assigned to this constant, the plane will be assumed to contain packed data
pub const STRIDE_AUTO: usize = 0;

pub const DEFAULT_STRIDES: [usize; MAX_NUMBER_OF_PLANES] = [STRIDE_AUTO; MAX_NUMBER_OF_PLANES];

/// Images are processed by pairs of rows and pairs of columns
pub fn is_compatible(width: u32, height: u32) -> bool {
    (width & 1) == 0 && (height & 1) == 0
}

pub fn get_buffers_size(
    pixel_format: PixelFormat,
    width: u32,
    height: u32,
    strides: &[usize],
    buffers_size: &mut [usize],
) -> bool {
    let num_planes = PixelFormat::planes(pixel_format);
    if strides.len() < num_planes || buffers_size.len() < num_planes {
        return false;
    }

    let width = width as usize;
    let height = height as usize;
    let main_default_stride = match pixel_format {
        PixelFormat::Bgra | PixelFormat::Bgr => PixelFormat::depth(pixel_format) * width,
        PixelFormat::I420 => width,
    };
    let main_stride = if strides[0] == STRIDE_AUTO {
        main_default_stride
    } else {
        strides[0]
    };

    let Some(main_size) = main_stride.checked_mul(height) else {
        return false;
    };
    buffers_size[0] = main_size;

    if pixel_format == PixelFormat::I420 {
        let chroma_default_stride = width / 2;
        let chroma_planes = buffers_size[1..num_planes]
            .iter_mut()
            .zip(&strides[1..num_planes]);
        for (buffer_size, &stride) in chroma_planes {
            let stride = if stride == STRIDE_AUTO {
                chroma_default_stride
            } else {
                stride
            };

            let Some(size) = stride.checked_mul(height / 2) else {
                return false;
            };
            *buffer_size = size;
        }
    }

    true
}
