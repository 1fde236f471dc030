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
#![warn(missing_docs)]
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
#![deny(unstable_features)]
#![deny(unused_import_braces)]
#![deny(
    clippy::complexity,
    clippy::correctness,
    clippy::perf,
    clippy::style,
    clippy::pedantic
)]
#![allow(
    clippy::too_many_arguments, // API design
    clippy::missing_safety_doc, // Until we add them...
    clippy::similar_names, // This requires effort to ensure
    // Lane helpers must be inlined into the functions enabling the target feature
    clippy::inline_always,
    // Yield false positives
    clippy::must_use_candidate,
)]

//! yuv420-convert is a library to convert packed BGR and BGRA images to planar
//! YUV 4:2:0 (I420).
//!
//! | Source pixel format  | Destination pixel formats  |
//! | -------------------- | -------------------------- |
//! | BGR                  | I420                       |
//! | BGRA                 | I420                       |
//! | I420                 | BGR, BGRA                  |
//!
//! The color model is ycbcr, ITU-R Recommendation BT.601, standard range
//! (luma in 16-235, chroma in 16-240).
//!
//! Every conversion to I420 can run in two modes: the reference scalar rows, or
//! rows processed 16 pixels at a time with SSSE3. Both produce identical bytes.
//!
//! # Examples
//!
//! Convert an image from bgra to i420:
//! ```
//! use yuv420_convert as yc;
//! use yc::{convert_bgra_to_yuv420, ConversionMode};
//! use std::error;
//!
//! fn convert() -> Result<(), Box<dyn error::Error>> {
//!     const WIDTH: usize = 640;
//!     const HEIGHT: usize = 480;
//!
//!     let src_data = vec![0u8; 4 * WIDTH * HEIGHT];
//!     let mut y_data = vec![0u8; WIDTH * HEIGHT];
//!     let mut u_data = vec![0u8; WIDTH * HEIGHT / 4];
//!     let mut v_data = vec![0u8; WIDTH * HEIGHT / 4];
//!
//!     convert_bgra_to_yuv420(
//!         WIDTH as u32,
//!         HEIGHT as u32,
//!         None,
//!         &[&src_data[..]],
//!         None,
//!         &mut [&mut y_data[..], &mut u_data[..], &mut v_data[..]],
//!         ConversionMode::Vectorized,
//!     )?;
//!
//!     Ok(())
//! }
//! # convert().unwrap();
//! ```
//!
//! Convert a bottom-up bgr image, whose first row is the last one in memory, with
//! padded rows:
//! ```
//! use yuv420_convert as yc;
//! use yc::{convert_bgr_to_yuv420, get_buffers_size, ConversionMode, PixelFormat};
//! use std::error;
//!
//! fn convert() -> Result<(), Box<dyn error::Error>> {
//!     const WIDTH: u32 = 642;
//!     const HEIGHT: u32 = 480;
//!     const BGR_STRIDE: usize = 4 * (((3 * (WIDTH as usize)) + 3) / 4);
//!
//!     let src_sizes = &mut [0usize; 1];
//!     get_buffers_size(WIDTH, HEIGHT, PixelFormat::Bgr, Some(&[BGR_STRIDE]), src_sizes)?;
//!     let src_data = vec![0u8; src_sizes[0]];
//!
//!     let dst_sizes = &mut [0usize; 3];
//!     get_buffers_size(WIDTH, HEIGHT, PixelFormat::I420, None, dst_sizes)?;
//!     let mut y_data = vec![0u8; dst_sizes[0]];
//!     let mut u_data = vec![0u8; dst_sizes[1]];
//!     let mut v_data = vec![0u8; dst_sizes[2]];
//!
//!     convert_bgr_to_yuv420(
//!         WIDTH,
//!         HEIGHT,
//!         Some(&[-(BGR_STRIDE as isize)]),
//!         &[&src_data[..]],
//!         None,
//!         &mut [&mut y_data[..], &mut u_data[..], &mut v_data[..]],
//!         ConversionMode::PlainScalar,
//!     )?;
//!
//!     Ok(())
//! }
//! # convert().unwrap();
//! ```
mod color_space;
mod convert_image;
mod cpu_info;
mod dispatcher;
mod pixel_format;

use cpu_info::{CpuManufacturer, InstructionSet};
use dispatcher::RowConverters;
use paste::paste;
use std::error;
use std::fmt;
use std::sync::OnceLock;
use tracing::{debug, warn};

pub use color_space::{yuv_to_rgb, FixedPoint, FloatingPoint, Precision};
pub use pixel_format::{PixelFormat, STRIDE_AUTO};

/// An enumeration of errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub enum ErrorKind {
    /// One or more parameters have invalid values for the called function
    InvalidValue,
    /// The combination of parameters is unsupported for the called function
    InvalidOperation,
    /// Not enough data was provided to the called function. Typically, provided
    /// arrays are not correctly sized
    NotEnoughData,
}

#[cfg(not(tarpaulin_include))]
impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ErrorKind::InvalidValue => write!(
                f,
                "One or more parameters have not legal values for the command"
            ),
            ErrorKind::InvalidOperation => write!(
                f,
                "The combination of parameters is not legal for the command"
            ),
            ErrorKind::NotEnoughData => write!(f, "Not enough data provided"),
        }
    }
}

#[cfg(not(tarpaulin_include))]
impl error::Error for ErrorKind {}

/// Selects the row functions a conversion to I420 runs.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[repr(C)]
pub enum ConversionMode {
    /// Reference rows, one pixel at a time
    #[default]
    PlainScalar,
    /// Rows processed 16 pixels at a time with SSSE3, the remainder with the
    /// reference rows.
    ///
    /// On cpus without SSSE3 the reference rows are used. The output is the same
    /// in both cases.
    Vectorized,
}

impl TryFrom<i32> for ConversionMode {
    type Error = ();

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ConversionMode::PlainScalar),
            1 => Ok(ConversionMode::Vectorized),
            _ => Err(()),
        }
    }
}

macro_rules! rgb_to_i420 {
    ($conv:expr, $set:ident, $src_pf:ident, $mode:ident) => {
        paste! {
            $conv[dispatcher::get_index(PixelFormat::$src_pf, ConversionMode::$mode)] =
                Some(RowConverters {
                    to_y: convert_image::$set::[<$src_pf:lower _row_to_y>],
                    to_yuv: convert_image::$set::[<$src_pf:lower _row_to_yuv>],
                })
        }
    };
}

macro_rules! set_dispatch_table {
    ($conv:expr, $mode:ident, $set:ident) => {
        rgb_to_i420!($conv, $set, Bgra, $mode);
        rgb_to_i420!($conv, $set, Bgr, $mode);
    };
}

type DispatchTable = [Option<RowConverters>; dispatcher::TABLE_SIZE];

struct Context {
    manufacturer: CpuManufacturer,
    set: InstructionSet,
    converters: DispatchTable,
}

impl Context {
    pub fn global() -> &'static Context {
        static INSTANCE: OnceLock<Context> = OnceLock::new();
        INSTANCE.get_or_init(Context::new)
    }

    pub fn new() -> Self {
        let (manufacturer, set) = cpu_info::get();
        let mut context = Context {
            manufacturer,
            set,
            converters: [None; dispatcher::TABLE_SIZE],
        };

        set_dispatch_table!(context.converters, PlainScalar, x86);

        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        match context.set {
            InstructionSet::X86 => {
                warn!("ssse3 not available, vectorized conversions run scalar rows");
                set_dispatch_table!(context.converters, Vectorized, x86);
            }
            InstructionSet::Ssse3 => {
                set_dispatch_table!(context.converters, Vectorized, ssse3);
            }
        }

        // Default for every other architecture
        #[cfg(all(not(target_arch = "x86"), not(target_arch = "x86_64")))]
        {
            warn!("ssse3 not available, vectorized conversions run scalar rows");
            set_dispatch_table!(context.converters, Vectorized, x86);
        }

        debug!(
            manufacturer = ?context.manufacturer,
            instruction_set = ?context.set,
            "conversion context initialized"
        );

        context
    }
}

/// Returns a description of the algorithms that are best for the running cpu and
/// available instruction sets
///
/// # Examples
/// ```
/// use yuv420_convert as yc;
/// println!("{}", yc::describe_acceleration());
/// // => {cpu-manufacturer:Intel,instruction-set:Ssse3}
/// ```
pub fn describe_acceleration() -> String {
    let state = Context::global();

    format!(
        "{{cpu-manufacturer:{:?},instruction-set:{:?}}}",
        state.manufacturer, state.set
    )
}

/// Compute number of bytes required to store an image given its format, dimensions
/// and optionally its strides
///
/// # Arguments
/// * `width` - Width of the image in pixels
/// * `height` - Height of the image in pixels
/// * `pixel_format` - Pixel format of the image
/// * `strides` - An array of distances in bytes between starts of consecutive lines
///               in each image planes
/// * `buffers_size` - An array describing the minimum number of bytes required in each
///                    image planes
///
/// # Examples
/// ```
/// use yuv420_convert as yc;
/// use yc::{get_buffers_size, PixelFormat, STRIDE_AUTO};
/// use std::error;
///
/// fn compute_size() -> Result<(), Box<dyn error::Error>> {
///     const WIDTH: u32 = 640;
///     const HEIGHT: u32 = 480;
///     const Y_STRIDE: usize = (WIDTH as usize) + 64;
///
///     let strides: &[usize] = &[Y_STRIDE, STRIDE_AUTO, STRIDE_AUTO];
///     let sizes: &mut [usize] = &mut [0usize; 3];
///     get_buffers_size(WIDTH, HEIGHT, PixelFormat::I420, Some(strides), sizes)?;
///     assert_eq!(sizes, &[Y_STRIDE * 480, 320 * 240, 320 * 240]);
///
///     Ok(())
/// }
/// # compute_size().unwrap();
/// ```
///
/// # Errors
///
/// * [`InvalidValue`] if the pixel format is I420 and `width` or `height` are odd
///
/// * [`NotEnoughData`] if the strides array is not `None` and its length is less than the
///   number of planes of the pixel format
///
/// * [`NotEnoughData`] if the buffers size array length is less than the number of
///   planes of the pixel format, or if a plane size overflows
///
/// [`InvalidValue`]: ./enum.ErrorKind.html#variant.InvalidValue
/// [`NotEnoughData`]: ./enum.ErrorKind.html#variant.NotEnoughData
pub fn get_buffers_size(
    width: u32,
    height: u32,
    pixel_format: PixelFormat,
    strides: Option<&[usize]>,
    buffers_size: &mut [usize],
) -> Result<(), ErrorKind> {
    if pixel_format == PixelFormat::I420 && !pixel_format::is_compatible(width, height) {
        return Err(ErrorKind::InvalidValue);
    }

    if pixel_format::get_buffers_size(
        pixel_format,
        width,
        height,
        strides.unwrap_or(&pixel_format::DEFAULT_STRIDES),
        buffers_size,
    ) {
        Ok(())
    } else {
        Err(ErrorKind::NotEnoughData)
    }
}

/// Converts a packed image of the given pixel format to I420.
///
/// Arguments and errors are the ones of [`convert_bgr_to_yuv420`].
///
/// # Errors
///
/// * [`InvalidOperation`] if `src_pixel_format` is not a packed format
///
/// [`convert_bgr_to_yuv420`]: ./fn.convert_bgr_to_yuv420.html
/// [`InvalidOperation`]: ./enum.ErrorKind.html#variant.InvalidOperation
pub fn convert_to_yuv420(
    src_pixel_format: PixelFormat,
    width: u32,
    height: u32,
    src_strides: Option<&[isize]>,
    src_buffers: &[&[u8]],
    dst_strides: Option<&[usize]>,
    dst_buffers: &mut [&mut [u8]],
    mode: ConversionMode,
) -> Result<(), ErrorKind> {
    if !pixel_format::is_compatible(width, height) {
        return Err(ErrorKind::InvalidValue);
    }

    let src_stride = match src_strides {
        None => 0,
        Some(strides) => *strides.first().ok_or(ErrorKind::NotEnoughData)?,
    };

    let converters = Context::global()
        .converters
        .get(dispatcher::get_index(src_pixel_format, mode))
        .copied()
        .flatten()
        .ok_or(ErrorKind::InvalidOperation)?;

    dispatcher::rgb_to_i420(
        converters,
        width,
        height,
        PixelFormat::depth(src_pixel_format),
        src_stride,
        src_buffers,
        dst_strides.unwrap_or(&pixel_format::DEFAULT_STRIDES),
        dst_buffers,
    )
}

/// Converts a BGR image to I420
///
/// # Arguments
/// * `width` - Width of the image to convert in pixels
/// * `height` - Height of the image to convert in pixels
/// * `src_strides` - An array holding the distance in bytes between starts of consecutive
///                   source lines. A negative stride addresses a bottom-up image: the
///                   source buffer starts at the last image line, the first image line
///                   is the last one in the buffer
/// * `src_buffers` - An array holding the source buffer
/// * `dst_strides` - An array of distances in bytes between starts of consecutive lines
///                   in the y, u and v planes
/// * `dst_buffers` - The y, u and v planes
/// * `mode` - Whether to run the reference rows or the vectorized ones
///
/// # Errors
///
/// * [`InvalidValue`] if `width` or `height` are odd
///
/// * [`InvalidValue`] if a stride, when not [`STRIDE_AUTO`], is smaller than one line
///   of its plane
///
/// * [`NotEnoughData`] if the source stride array is not `None` and it is empty, or the
///   destination stride array is not `None` and holds less than three strides
///
/// * [`NotEnoughData`] if one or more source/destination buffers does not provide enough data.
///   You can compute the buffers' size using [`get_buffers_size`]
///
/// # Algorithm
/// Conversion from linear RGB model to ycbcr color model, with 4:2:0 downsampling.
/// Chroma is sampled from the even pixels of the even lines.
///
/// ```text
/// y = (( 66 * r + 129 * g +  25 * b + 128) >> 8) + 16
/// u = ((-38 * r -  74 * g + 112 * b + 128) >> 8) + 128
/// v = ((112 * r -  94 * g -  18 * b + 128) >> 8) + 128
/// ```
///
/// [`InvalidValue`]: ./enum.ErrorKind.html#variant.InvalidValue
/// [`NotEnoughData`]: ./enum.ErrorKind.html#variant.NotEnoughData
/// [`get_buffers_size`]: ./fn.get_buffers_size.html
/// [`STRIDE_AUTO`]: ./constant.STRIDE_AUTO.html
pub fn convert_bgr_to_yuv420(
    width: u32,
    height: u32,
    src_strides: Option<&[isize]>,
    src_buffers: &[&[u8]],
    dst_strides: Option<&[usize]>,
    dst_buffers: &mut [&mut [u8]],
    mode: ConversionMode,
) -> Result<(), ErrorKind> {
    convert_to_yuv420(
        PixelFormat::Bgr,
        width,
        height,
        src_strides,
        src_buffers,
        dst_strides,
        dst_buffers,
        mode,
    )
}

/// Converts a BGRA image to I420. The alpha channel is ignored.
///
/// Arguments, errors and algorithm are the ones of [`convert_bgr_to_yuv420`].
///
/// [`convert_bgr_to_yuv420`]: ./fn.convert_bgr_to_yuv420.html
pub fn convert_bgra_to_yuv420(
    width: u32,
    height: u32,
    src_strides: Option<&[isize]>,
    src_buffers: &[&[u8]],
    dst_strides: Option<&[usize]>,
    dst_buffers: &mut [&mut [u8]],
    mode: ConversionMode,
) -> Result<(), ErrorKind> {
    convert_to_yuv420(
        PixelFormat::Bgra,
        width,
        height,
        src_strides,
        src_buffers,
        dst_strides,
        dst_buffers,
        mode,
    )
}

/// Same as [`convert_bgr_to_yuv420`], running the reference rows.
///
/// [`convert_bgr_to_yuv420`]: ./fn.convert_bgr_to_yuv420.html
pub fn bgr_to_yuv420(
    width: u32,
    height: u32,
    src_strides: Option<&[isize]>,
    src_buffers: &[&[u8]],
    dst_strides: Option<&[usize]>,
    dst_buffers: &mut [&mut [u8]],
) -> Result<(), ErrorKind> {
    convert_bgr_to_yuv420(
        width,
        height,
        src_strides,
        src_buffers,
        dst_strides,
        dst_buffers,
        ConversionMode::PlainScalar,
    )
}

/// Same as [`convert_bgra_to_yuv420`], running the reference rows.
///
/// [`convert_bgra_to_yuv420`]: ./fn.convert_bgra_to_yuv420.html
pub fn bgra_to_yuv420(
    width: u32,
    height: u32,
    src_strides: Option<&[isize]>,
    src_buffers: &[&[u8]],
    dst_strides: Option<&[usize]>,
    dst_buffers: &mut [&mut [u8]],
) -> Result<(), ErrorKind> {
    convert_bgra_to_yuv420(
        width,
        height,
        src_strides,
        src_buffers,
        dst_strides,
        dst_buffers,
        ConversionMode::PlainScalar,
    )
}

/// Converts an I420 image to the given packed pixel format.
///
/// Arguments and errors are the ones of [`convert_yuv420_to_bgra`].
///
/// # Errors
///
/// * [`InvalidOperation`] if `dst_pixel_format` is not a packed format
///
/// [`convert_yuv420_to_bgra`]: ./fn.convert_yuv420_to_bgra.html
/// [`InvalidOperation`]: ./enum.ErrorKind.html#variant.InvalidOperation
pub fn convert_from_yuv420(
    dst_pixel_format: PixelFormat,
    width: u32,
    height: u32,
    src_strides: Option<&[usize]>,
    src_buffers: &[&[u8]],
    dst_strides: Option<&[usize]>,
    dst_buffers: &mut [&mut [u8]],
) -> Result<(), ErrorKind> {
    if !pixel_format::is_compatible(width, height) {
        return Err(ErrorKind::InvalidValue);
    }

    let src_strides = src_strides.unwrap_or(&pixel_format::DEFAULT_STRIDES);
    let dst_strides = dst_strides.unwrap_or(&pixel_format::DEFAULT_STRIDES);
    let ([y_stride, u_stride, v_stride, ..], [y_plane, u_plane, v_plane, ..]) =
        (src_strides, src_buffers)
    else {
        return Err(ErrorKind::NotEnoughData);
    };
    let (Some(&dst_stride), Some(dst_buffer)) = (dst_strides.first(), dst_buffers.first_mut())
    else {
        return Err(ErrorKind::NotEnoughData);
    };

    if dst_pixel_format == PixelFormat::I420 {
        return Err(ErrorKind::InvalidOperation);
    }

    let w = width as usize;
    let h = height as usize;
    let cw = w / 2;
    let ch = h / 2;
    let rgb_stride = PixelFormat::depth(dst_pixel_format)
        .checked_mul(w)
        .ok_or(ErrorKind::NotEnoughData)?;

    let src_strides = (
        convert_image::common::compute_stride(*y_stride, w),
        convert_image::common::compute_stride(*u_stride, cw),
        convert_image::common::compute_stride(*v_stride, cw),
    );
    let dst_stride = convert_image::common::compute_stride(dst_stride, rgb_stride);

    dispatcher::check_plane(y_plane.len(), src_strides.0, h, w)?;
    dispatcher::check_plane(u_plane.len(), src_strides.1, ch, cw)?;
    dispatcher::check_plane(v_plane.len(), src_strides.2, ch, cw)?;
    dispatcher::check_plane(dst_buffer.len(), dst_stride, h, rgb_stride)?;

    if w == 0 || h == 0 {
        return Ok(());
    }

    let src_buffers = (*y_plane, *u_plane, *v_plane);
    match dst_pixel_format {
        PixelFormat::Bgra => convert_image::x86::i420_to_bgrx::<4>(
            w,
            h,
            src_strides,
            src_buffers,
            dst_stride,
            dst_buffer,
        ),
        PixelFormat::Bgr => convert_image::x86::i420_to_bgrx::<3>(
            w,
            h,
            src_strides,
            src_buffers,
            dst_stride,
            dst_buffer,
        ),
        PixelFormat::I420 => return Err(ErrorKind::InvalidOperation),
    }

    Ok(())
}

/// Converts an I420 image to BGRA, alpha is set to 255.
///
/// Each chroma sample is replicated to the 2x2 pixels it covers, then the inverse
/// of the forward transform is applied and saturated to 0-255, see [`yuv_to_rgb`].
///
/// # Errors
///
/// * [`InvalidValue`] if `width` or `height` are odd, or a stride, when not
///   [`STRIDE_AUTO`], is smaller than one line of its plane
///
/// * [`NotEnoughData`] if less than three source planes (or strides), no destination
///   plane (or stride), or too small buffers are provided
///
/// [`yuv_to_rgb`]: ./fn.yuv_to_rgb.html
/// [`InvalidValue`]: ./enum.ErrorKind.html#variant.InvalidValue
/// [`NotEnoughData`]: ./enum.ErrorKind.html#variant.NotEnoughData
/// [`STRIDE_AUTO`]: ./constant.STRIDE_AUTO.html
pub fn convert_yuv420_to_bgra(
    width: u32,
    height: u32,
    src_strides: Option<&[usize]>,
    src_buffers: &[&[u8]],
    dst_strides: Option<&[usize]>,
    dst_buffers: &mut [&mut [u8]],
) -> Result<(), ErrorKind> {
    convert_from_yuv420(
        PixelFormat::Bgra,
        width,
        height,
        src_strides,
        src_buffers,
        dst_strides,
        dst_buffers,
    )
}

/// Converts an I420 image to BGR.
///
/// Behaves as [`convert_yuv420_to_bgra`], with 3 bytes per destination pixel.
///
/// [`convert_yuv420_to_bgra`]: ./fn.convert_yuv420_to_bgra.html
pub fn convert_yuv420_to_bgr(
    width: u32,
    height: u32,
    src_strides: Option<&[usize]>,
    src_buffers: &[&[u8]],
    dst_strides: Option<&[usize]>,
    dst_buffers: &mut [&mut [u8]],
) -> Result<(), ErrorKind> {
    convert_from_yuv420(
        PixelFormat::Bgr,
        width,
        height,
        src_strides,
        src_buffers,
        dst_strides,
        dst_buffers,
    )
}

#[doc(hidden)]
#[cfg(not(tarpaulin_include))]
pub mod c_api {
    #![allow(clippy::wildcard_imports)]
    use super::*; // We are importing everything
    use convert_image::common::compute_stride;
    use pixel_format::MAX_NUMBER_OF_PLANES;
    use std::ffi::CString;
    use std::os::raw::c_char;
    use std::ptr;
    use std::slice;

    #[repr(C)]
    pub enum Result {
        Ok,
        Err,
    }

    unsafe fn set_error(error: *mut ErrorKind, value: ErrorKind) -> self::Result {
        if !error.is_null() {
            *error = value;
        }

        self::Result::Err
    }

    /// Bytes spanned by `rows` lines of `row_bytes` bytes, `stride` bytes apart
    fn plane_extent(
        stride: usize,
        rows: usize,
        row_bytes: usize,
    ) -> core::result::Result<usize, ErrorKind> {
        if rows == 0 || row_bytes == 0 {
            return Ok(0);
        }

        if stride < row_bytes {
            return Err(ErrorKind::InvalidValue);
        }

        stride
            .checked_mul(rows - 1)
            .and_then(|x| x.checked_add(row_bytes))
            .filter(|&x| isize::try_from(x).is_ok())
            .ok_or(ErrorKind::NotEnoughData)
    }

    unsafe fn plane<'a>(buffer: *const u8, len: usize) -> &'a [u8] {
        if len == 0 {
            &[]
        } else {
            slice::from_raw_parts(buffer, len)
        }
    }

    unsafe fn plane_mut<'a>(buffer: *mut u8, len: usize) -> &'a mut [u8] {
        if len == 0 {
            &mut []
        } else {
            slice::from_raw_parts_mut(buffer, len)
        }
    }

    #[no_mangle]
    pub extern "C" fn yuv420_describe_acceleration() -> *mut c_char {
        let acc = describe_acceleration();
        if let Ok(s) = CString::new(acc) {
            s.into_raw()
        } else {
            let p: *const c_char = ptr::null();
            p.cast_mut()
        }
    }

    #[no_mangle]
    pub unsafe extern "C" fn yuv420_unref_string(string: *mut c_char) {
        if !string.is_null() {
            let _unused = CString::from_raw(string);
        }
    }

    #[no_mangle]
    pub unsafe extern "C" fn yuv420_get_buffers_size(
        width: u32,
        height: u32,
        pixel_format: i32,
        strides: *const usize,
        buffers_size: *mut usize,
        error: *mut ErrorKind,
    ) -> self::Result {
        // Protect from C null pointers
        if buffers_size.is_null() {
            return set_error(error, ErrorKind::InvalidValue);
        }

        // C enums are untrusted in the sense you can cast any value to an enum type
        let Ok(pixel_format) = PixelFormat::try_from(pixel_format) else {
            return set_error(error, ErrorKind::InvalidValue);
        };

        // We assume there is enough data in the arrays
        // If the assumption will not hold undefined behaviour occurs (like in C)
        let num_planes = PixelFormat::planes(pixel_format);

        // Convert nullable type to Option
        let strides = if strides.is_null() {
            None
        } else {
            Some(slice::from_raw_parts(strides, num_planes))
        };

        let buffers_size = slice::from_raw_parts_mut(buffers_size, num_planes);
        match get_buffers_size(width, height, pixel_format, strides, buffers_size) {
            Ok(()) => self::Result::Ok,
            Err(error_kind) => set_error(error, error_kind),
        }
    }

    unsafe fn convert_packed(
        src_pixel_format: PixelFormat,
        width: u32,
        height: u32,
        src_stride: isize,
        src_buffer: *const u8,
        dst_strides: *const usize,
        dst_buffers: *const *mut u8,
        mode: i32,
        error: *mut ErrorKind,
    ) -> self::Result {
        // Protect from C null pointers
        if src_buffer.is_null() || dst_buffers.is_null() {
            return set_error(error, ErrorKind::InvalidValue);
        }

        let Ok(mode) = ConversionMode::try_from(mode) else {
            return set_error(error, ErrorKind::InvalidValue);
        };

        if !pixel_format::is_compatible(width, height) {
            return set_error(error, ErrorKind::InvalidValue);
        }

        let dst_strides = if dst_strides.is_null() {
            pixel_format::DEFAULT_STRIDES
        } else {
            let mut strides = [0usize; MAX_NUMBER_OF_PLANES];
            strides.copy_from_slice(slice::from_raw_parts(dst_strides, MAX_NUMBER_OF_PLANES));
            strides
        };

        let w = width as usize;
        let h = height as usize;
        let cw = w / 2;
        let ch = h / 2;
        let Some(rgb_stride) = PixelFormat::depth(src_pixel_format).checked_mul(w) else {
            return set_error(error, ErrorKind::NotEnoughData);
        };
        let stride = compute_stride(src_stride.unsigned_abs(), rgb_stride);

        let extents = (
            plane_extent(stride, h, rgb_stride),
            plane_extent(compute_stride(dst_strides[0], w), h, w),
            plane_extent(compute_stride(dst_strides[1], cw), ch, cw),
            plane_extent(compute_stride(dst_strides[2], cw), ch, cw),
        );
        let (src_len, y_len, u_len, v_len) = match extents {
            (Ok(s), Ok(y), Ok(u), Ok(v)) => (s, y, u, v),
            (Err(e), ..) | (_, Err(e), ..) | (_, _, Err(e), _) | (.., Err(e)) => {
                return set_error(error, e);
            }
        };

        // The first image row is the last one in memory for bottom-up images
        let src_start = if src_stride < 0 && h > 0 {
            src_buffer.sub((h - 1) * stride)
        } else {
            src_buffer
        };

        let dst_buffers = slice::from_raw_parts(dst_buffers, MAX_NUMBER_OF_PLANES);
        if dst_buffers.iter().any(|x| x.is_null()) {
            return set_error(error, ErrorKind::InvalidValue);
        }

        let src_buffers = [plane(src_start, src_len)];
        let dst_buffers = &mut [
            plane_mut(dst_buffers[0], y_len),
            plane_mut(dst_buffers[1], u_len),
            plane_mut(dst_buffers[2], v_len),
        ];

        match super::convert_to_yuv420(
            src_pixel_format,
            width,
            height,
            Some(&[src_stride]),
            &src_buffers,
            Some(&dst_strides),
            dst_buffers,
            mode,
        ) {
            Ok(()) => self::Result::Ok,
            Err(error_kind) => set_error(error, error_kind),
        }
    }

    #[no_mangle]
    pub unsafe extern "C" fn yuv420_convert_bgr(
        width: u32,
        height: u32,
        src_stride: isize,
        src_buffer: *const u8,
        dst_strides: *const usize,
        dst_buffers: *const *mut u8,
        mode: i32,
        error: *mut ErrorKind,
    ) -> self::Result {
        convert_packed(
            PixelFormat::Bgr,
            width,
            height,
            src_stride,
            src_buffer,
            dst_strides,
            dst_buffers,
            mode,
            error,
        )
    }

    #[no_mangle]
    pub unsafe extern "C" fn yuv420_convert_bgra(
        width: u32,
        height: u32,
        src_stride: isize,
        src_buffer: *const u8,
        dst_strides: *const usize,
        dst_buffers: *const *mut u8,
        mode: i32,
        error: *mut ErrorKind,
    ) -> self::Result {
        convert_packed(
            PixelFormat::Bgra,
            width,
            height,
            src_stride,
            src_buffer,
            dst_strides,
            dst_buffers,
            mode,
            error,
        )
    }
}
