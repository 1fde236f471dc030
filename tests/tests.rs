#![warn(unused)]
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
#![deny(unsafe_code)]
#![deny(unstable_features)]
#![deny(unused_import_braces)]
#![deny(
    clippy::complexity,
    clippy::correctness,
    clippy::perf,
    clippy::style,
    clippy::pedantic
)]
#![allow(clippy::too_many_lines)] // This requires effort to handle

#[cfg(target_arch = "wasm32")]
use wasm_bindgen_test::wasm_bindgen_test as test;

use std::ffi::CStr;
use std::ptr;

use yc::c_api;
use yc::{
    describe_acceleration, get_buffers_size, ConversionMode, ErrorKind, PixelFormat, STRIDE_AUTO,
};

use itertools::iproduct;
use rand::Rng;
use yuv420_convert as yc;

const PIXEL_FORMATS: &[PixelFormat; 3] = &[PixelFormat::Bgra, PixelFormat::Bgr, PixelFormat::I420];

fn check_err(result: ErrorKind, err: ErrorKind) {
    assert_eq!(result as u32, err as u32);
}

#[test]
fn bootstrap() {
    println!("{}", describe_acceleration());
}

#[test]
fn acceleration_description() {
    let description = describe_acceleration();
    assert_eq!(description, describe_acceleration());

    let fields = description
        .strip_prefix('{')
        .and_then(|x| x.strip_suffix('}'))
        .unwrap();
    let (manufacturer, set) = fields.split_once(',').unwrap();

    let manufacturer = manufacturer.strip_prefix("cpu-manufacturer:").unwrap();
    assert!(["Unknown", "Intel", "Amd"].contains(&manufacturer));

    let set = set.strip_prefix("instruction-set:").unwrap();
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    assert!(["X86", "Ssse3"].contains(&set));
    #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
    assert_eq!(set, "X86");
}

#[test]
fn buffers_size() {
    const WIDTH: u32 = 4098;
    const HEIGHT: u32 = 258;
    const W: usize = WIDTH as usize;
    const H: usize = HEIGHT as usize;
    let buffers_size = &mut [0_usize; 3];

    for (pixel_format, pad) in iproduct!(PIXEL_FORMATS, [0_usize, 3]) {
        let (packed, planes) = match pixel_format {
            PixelFormat::Bgra => (vec![4 * W], 1),
            PixelFormat::Bgr => (vec![3 * W], 1),
            PixelFormat::I420 => (vec![W, W / 2, W / 2], 3),
        };
        let rows = [H, H / 2, H / 2];

        let strides: Vec<usize> = packed.iter().map(|x| x + pad).collect();
        let strides = if pad == 0 {
            None
        } else {
            Some(&strides[..])
        };

        buffers_size.fill(0);
        assert!(get_buffers_size(WIDTH, HEIGHT, *pixel_format, strides, buffers_size).is_ok());

        for ((&size, stride), rows) in buffers_size[..planes].iter().zip(&packed).zip(rows) {
            assert_eq!(size, (stride + pad) * rows);
        }
        assert!(buffers_size[planes..].iter().all(|&x| x == 0));
    }

    // Chroma planes are a quarter of the luma plane
    assert!(get_buffers_size(WIDTH, HEIGHT, PixelFormat::I420, None, buffers_size).is_ok());
    assert_eq!(buffers_size[1], buffers_size[0] / 4);
    assert_eq!(buffers_size[2], buffers_size[0] / 4);

    // Only the luma stride is set
    let strides = &[W + 64, STRIDE_AUTO, STRIDE_AUTO];
    assert!(
        get_buffers_size(WIDTH, HEIGHT, PixelFormat::I420, Some(strides), buffers_size).is_ok()
    );
    assert_eq!(buffers_size, &[(W + 64) * H, (W / 2) * (H / 2), (W / 2) * (H / 2)]);

    // Empty images
    assert!(get_buffers_size(0, 0, PixelFormat::I420, None, buffers_size).is_ok());
    assert_eq!(buffers_size, &[0, 0, 0]);

    // Packed images can have odd sizes
    assert!(get_buffers_size(3, 3, PixelFormat::Bgr, None, buffers_size).is_ok());
    assert_eq!(buffers_size[0], 27);
}

#[test]
fn legacy_functions() {
    const WIDTH: usize = 34;
    const HEIGHT: usize = 4;

    let mut rng = rand::thread_rng();
    let src: Vec<u8> = (0..4 * WIDTH * HEIGHT).map(|_| rng.gen::<u8>()).collect();

    let convert = |legacy: bool, depth: usize| {
        let mut y = vec![0u8; WIDTH * HEIGHT];
        let mut u = vec![0u8; WIDTH * HEIGHT / 4];
        let mut v = vec![0u8; WIDTH * HEIGHT / 4];
        let src_buffers = &[&src[..depth * WIDTH * HEIGHT]];
        let dst_buffers = &mut [&mut y[..], &mut u[..], &mut v[..]];

        let result = match (legacy, depth) {
            (true, 4) => yc::bgra_to_yuv420(34, 4, None, src_buffers, None, dst_buffers),
            (true, _) => yc::bgr_to_yuv420(34, 4, None, src_buffers, None, dst_buffers),
            (false, 4) => yc::convert_bgra_to_yuv420(
                34,
                4,
                None,
                src_buffers,
                None,
                dst_buffers,
                ConversionMode::default(),
            ),
            (false, _) => yc::convert_bgr_to_yuv420(
                34,
                4,
                None,
                src_buffers,
                None,
                dst_buffers,
                ConversionMode::default(),
            ),
        };
        assert!(result.is_ok());

        (y, u, v)
    };

    assert_eq!(convert(true, 4), convert(false, 4));
    assert_eq!(convert(true, 3), convert(false, 3));
}

#[test]
fn error_kind() {
    let error: Box<dyn std::error::Error> = Box::new(ErrorKind::NotEnoughData);
    assert_eq!(error.to_string(), "Not enough data provided");
    assert!(!ErrorKind::InvalidValue.to_string().is_empty());
    assert!(!ErrorKind::InvalidOperation.to_string().is_empty());
}

#[test]
#[allow(unsafe_code)]
fn c_describe_acceleration() {
    let description = c_api::yuv420_describe_acceleration();
    assert!(!description.is_null());

    unsafe {
        let text = CStr::from_ptr(description).to_str().unwrap().to_owned();
        assert_eq!(text, describe_acceleration());

        c_api::yuv420_unref_string(description);
        c_api::yuv420_unref_string(ptr::null_mut());
    }
}

#[test]
#[allow(unsafe_code)]
fn c_get_buffers_size() {
    const WIDTH: u32 = 640;
    const HEIGHT: u32 = 480;

    let mut sizes = [0_usize; 3];
    let mut error = ErrorKind::InvalidOperation;

    unsafe {
        assert!(matches!(
            c_api::yuv420_get_buffers_size(
                WIDTH,
                HEIGHT,
                PixelFormat::I420 as i32,
                ptr::null(),
                sizes.as_mut_ptr(),
                &mut error,
            ),
            c_api::Result::Ok
        ));
        assert_eq!(sizes, [640 * 480, 320 * 240, 320 * 240]);

        let strides = [4 * 640 + 16];
        assert!(matches!(
            c_api::yuv420_get_buffers_size(
                WIDTH,
                HEIGHT,
                PixelFormat::Bgra as i32,
                strides.as_ptr(),
                sizes.as_mut_ptr(),
                &mut error,
            ),
            c_api::Result::Ok
        ));
        assert_eq!(sizes[0], (4 * 640 + 16) * 480);

        assert!(matches!(
            c_api::yuv420_get_buffers_size(
                WIDTH,
                HEIGHT,
                3,
                ptr::null(),
                sizes.as_mut_ptr(),
                &mut error,
            ),
            c_api::Result::Err
        ));
        check_err(error, ErrorKind::InvalidValue);

        error = ErrorKind::InvalidOperation;
        assert!(matches!(
            c_api::yuv420_get_buffers_size(
                WIDTH,
                HEIGHT,
                PixelFormat::Bgr as i32,
                ptr::null(),
                ptr::null_mut(),
                &mut error,
            ),
            c_api::Result::Err
        ));
        check_err(error, ErrorKind::InvalidValue);

        error = ErrorKind::InvalidOperation;
        assert!(matches!(
            c_api::yuv420_get_buffers_size(
                WIDTH - 1,
                HEIGHT,
                PixelFormat::I420 as i32,
                ptr::null(),
                sizes.as_mut_ptr(),
                &mut error,
            ),
            c_api::Result::Err
        ));
        check_err(error, ErrorKind::InvalidValue);

        // A null error pointer is allowed
        assert!(matches!(
            c_api::yuv420_get_buffers_size(
                WIDTH,
                HEIGHT,
                -1,
                ptr::null(),
                sizes.as_mut_ptr(),
                ptr::null_mut(),
            ),
            c_api::Result::Err
        ));
    }
}

#[test]
#[allow(unsafe_code)]
fn c_convert() {
    const WIDTH: usize = 50;
    const HEIGHT: usize = 6;
    const PAD: usize = 6;

    let mut rng = rand::thread_rng();

    for (depth, &mode, bottom_up) in iproduct!(
        [3_usize, 4],
        &[ConversionMode::PlainScalar, ConversionMode::Vectorized],
        [false, true]
    ) {
        let stride = depth * WIDTH + PAD;
        let src: Vec<u8> = (0..stride * HEIGHT).map(|_| rng.gen::<u8>()).collect();

        let mut y = vec![0u8; WIDTH * HEIGHT];
        let mut u = vec![0u8; WIDTH * HEIGHT / 4];
        let mut v = vec![0u8; WIDTH * HEIGHT / 4];
        let src_stride = isize::try_from(stride).unwrap();
        let src_stride = if bottom_up { -src_stride } else { src_stride };
        assert!(yc::convert_to_yuv420(
            if depth == 4 {
                PixelFormat::Bgra
            } else {
                PixelFormat::Bgr
            },
            50,
            6,
            Some(&[src_stride]),
            &[&src[..]],
            None,
            &mut [&mut y[..], &mut u[..], &mut v[..]],
            mode,
        )
        .is_ok());

        let mut c_y = vec![0u8; WIDTH * HEIGHT];
        let mut c_u = vec![0u8; WIDTH * HEIGHT / 4];
        let mut c_v = vec![0u8; WIDTH * HEIGHT / 4];
        let dst_buffers = [c_y.as_mut_ptr(), c_u.as_mut_ptr(), c_v.as_mut_ptr()];
        let mut error = ErrorKind::InvalidOperation;

        // C callers point at the first image row
        let first_row = if bottom_up {
            src[(HEIGHT - 1) * stride..].as_ptr()
        } else {
            src.as_ptr()
        };

        unsafe {
            let result = if depth == 4 {
                c_api::yuv420_convert_bgra(
                    50,
                    6,
                    src_stride,
                    first_row,
                    ptr::null(),
                    dst_buffers.as_ptr(),
                    mode as i32,
                    &mut error,
                )
            } else {
                c_api::yuv420_convert_bgr(
                    50,
                    6,
                    src_stride,
                    first_row,
                    ptr::null(),
                    dst_buffers.as_ptr(),
                    mode as i32,
                    &mut error,
                )
            };
            assert!(matches!(result, c_api::Result::Ok));
        }

        assert_eq!((y, u, v), (c_y, c_u, c_v));
    }
}

#[test]
#[allow(unsafe_code)]
fn c_convert_errors() {
    const WIDTH: usize = 16;
    const HEIGHT: usize = 2;

    let src = vec![0u8; 3 * WIDTH * HEIGHT];
    let mut y = vec![0u8; WIDTH * HEIGHT];
    let mut u = vec![0u8; WIDTH * HEIGHT / 4];
    let mut v = vec![0u8; WIDTH * HEIGHT / 4];
    let dst_buffers = [y.as_mut_ptr(), u.as_mut_ptr(), v.as_mut_ptr()];
    let null_buffers = [y.as_mut_ptr(), ptr::null_mut(), v.as_mut_ptr()];

    let cases: [(u32, isize, *const u8, *const *mut u8, i32, ErrorKind); 6] = [
        (16, 0, ptr::null(), dst_buffers.as_ptr(), 0, ErrorKind::InvalidValue),
        (16, 0, src.as_ptr(), ptr::null(), 0, ErrorKind::InvalidValue),
        (16, 0, src.as_ptr(), null_buffers.as_ptr(), 0, ErrorKind::InvalidValue),
        (16, 0, src.as_ptr(), dst_buffers.as_ptr(), 2, ErrorKind::InvalidValue),
        (15, 0, src.as_ptr(), dst_buffers.as_ptr(), 1, ErrorKind::InvalidValue),
        (16, 47, src.as_ptr(), dst_buffers.as_ptr(), 1, ErrorKind::InvalidValue),
    ];

    for (width, stride, src_buffer, dst_buffers, mode, expected) in cases {
        let mut error = ErrorKind::NotEnoughData;
        unsafe {
            assert!(matches!(
                c_api::yuv420_convert_bgr(
                    width,
                    2,
                    stride,
                    src_buffer,
                    ptr::null(),
                    dst_buffers,
                    mode,
                    &mut error,
                ),
                c_api::Result::Err
            ));
        }
        check_err(error, expected);
    }

    let mut error = ErrorKind::InvalidValue;
    unsafe {
        assert!(matches!(
            c_api::yuv420_convert_bgr(
                16,
                4,
                isize::MAX,
                src.as_ptr(),
                ptr::null(),
                dst_buffers.as_ptr(),
                0,
                &mut error,
            ),
            c_api::Result::Err
        ));
    }
    check_err(error, ErrorKind::NotEnoughData);
}
