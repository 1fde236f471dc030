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

use yc::{ConversionMode, ErrorKind, PixelFormat, STRIDE_AUTO};

use itertools::iproduct;
use yuv420_convert as yc;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen_test::wasm_bindgen_test as test;

const WIDTH: u32 = 32;
const HEIGHT: u32 = 4;
const W: usize = WIDTH as usize;
const H: usize = HEIGHT as usize;
const PACKED_FORMATS: &[PixelFormat; 2] = &[PixelFormat::Bgra, PixelFormat::Bgr];
const MODES: &[ConversionMode; 2] = &[ConversionMode::PlainScalar, ConversionMode::Vectorized];

fn get_depth(pixel_format: PixelFormat) -> usize {
    match pixel_format {
        PixelFormat::Bgra => 4,
        _ => 3,
    }
}

fn check_err(result: Result<(), ErrorKind>, err: ErrorKind) {
    assert_eq!(result, Err(err));
}

struct Planes {
    src: Vec<u8>,
    y: Vec<u8>,
    u: Vec<u8>,
    v: Vec<u8>,
}

impl Planes {
    fn new(src_len: usize, y_len: usize, uv_len: usize) -> Self {
        Planes {
            src: vec![0u8; src_len],
            y: vec![0u8; y_len],
            u: vec![0u8; uv_len],
            v: vec![0u8; uv_len],
        }
    }

    fn packed(pixel_format: PixelFormat) -> Self {
        Planes::new(get_depth(pixel_format) * W * H, W * H, W * H / 4)
    }

    fn convert(
        &mut self,
        pixel_format: PixelFormat,
        width: u32,
        height: u32,
        src_strides: Option<&[isize]>,
        dst_strides: Option<&[usize]>,
        mode: ConversionMode,
    ) -> Result<(), ErrorKind> {
        yc::convert_to_yuv420(
            pixel_format,
            width,
            height,
            src_strides,
            &[&self.src[..]],
            dst_strides,
            &mut [&mut self.y[..], &mut self.u[..], &mut self.v[..]],
            mode,
        )
    }
}

#[test]
fn odd_dimensions() {
    for (&pixel_format, &mode) in iproduct!(PACKED_FORMATS, MODES) {
        let mut planes = Planes::packed(pixel_format);

        check_err(
            planes.convert(pixel_format, WIDTH - 1, HEIGHT, None, None, mode),
            ErrorKind::InvalidValue,
        );
        check_err(
            planes.convert(pixel_format, WIDTH, HEIGHT - 1, None, None, mode),
            ErrorKind::InvalidValue,
        );
        check_err(
            planes.convert(pixel_format, 1, 1, None, None, mode),
            ErrorKind::InvalidValue,
        );
    }

    let y = vec![0u8; W * H];
    let uv = vec![0u8; W * H / 4];
    let mut dst = vec![0u8; 4 * W * H];
    check_err(
        yc::convert_yuv420_to_bgra(
            WIDTH - 1,
            HEIGHT,
            None,
            &[&y[..], &uv[..], &uv[..]],
            None,
            &mut [&mut dst[..]],
        ),
        ErrorKind::InvalidValue,
    );
}

#[test]
fn missing_planes() {
    for (&pixel_format, &mode) in iproduct!(PACKED_FORMATS, MODES) {
        let mut planes = Planes::packed(pixel_format);

        check_err(
            planes.convert(pixel_format, WIDTH, HEIGHT, Some(&[]), None, mode),
            ErrorKind::NotEnoughData,
        );
        check_err(
            planes.convert(
                pixel_format,
                WIDTH,
                HEIGHT,
                None,
                Some(&[STRIDE_AUTO, STRIDE_AUTO]),
                mode,
            ),
            ErrorKind::NotEnoughData,
        );
        check_err(
            yc::convert_to_yuv420(
                pixel_format,
                WIDTH,
                HEIGHT,
                None,
                &[],
                None,
                &mut [&mut planes.y[..], &mut planes.u[..], &mut planes.v[..]],
                mode,
            ),
            ErrorKind::NotEnoughData,
        );
        check_err(
            yc::convert_to_yuv420(
                pixel_format,
                WIDTH,
                HEIGHT,
                None,
                &[&planes.src[..]],
                None,
                &mut [&mut planes.y[..], &mut planes.u[..]],
                mode,
            ),
            ErrorKind::NotEnoughData,
        );
    }

    let y = vec![0u8; W * H];
    let uv = vec![0u8; W * H / 4];
    let mut dst = vec![0u8; 3 * W * H];
    check_err(
        yc::convert_yuv420_to_bgr(
            WIDTH,
            HEIGHT,
            None,
            &[&y[..], &uv[..]],
            None,
            &mut [&mut dst[..]],
        ),
        ErrorKind::NotEnoughData,
    );
    check_err(
        yc::convert_yuv420_to_bgr(
            WIDTH,
            HEIGHT,
            None,
            &[&y[..], &uv[..], &uv[..]],
            None,
            &mut [],
        ),
        ErrorKind::NotEnoughData,
    );
}

#[test]
fn short_strides() {
    for (&pixel_format, &mode) in iproduct!(PACKED_FORMATS, MODES) {
        let mut planes = Planes::packed(pixel_format);
        let row = isize::try_from(get_depth(pixel_format) * W).unwrap();

        check_err(
            planes.convert(pixel_format, WIDTH, HEIGHT, Some(&[row - 1]), None, mode),
            ErrorKind::InvalidValue,
        );
        check_err(
            planes.convert(pixel_format, WIDTH, HEIGHT, Some(&[1 - row]), None, mode),
            ErrorKind::InvalidValue,
        );
        check_err(
            planes.convert(
                pixel_format,
                WIDTH,
                HEIGHT,
                None,
                Some(&[W - 1, STRIDE_AUTO, STRIDE_AUTO]),
                mode,
            ),
            ErrorKind::InvalidValue,
        );
        check_err(
            planes.convert(
                pixel_format,
                WIDTH,
                HEIGHT,
                None,
                Some(&[STRIDE_AUTO, STRIDE_AUTO, W / 2 - 1]),
                mode,
            ),
            ErrorKind::InvalidValue,
        );
    }

    let y = vec![0u8; W * H];
    let uv = vec![0u8; W * H / 4];
    let mut dst = vec![0u8; 4 * W * H];
    check_err(
        yc::convert_yuv420_to_bgra(
            WIDTH,
            HEIGHT,
            Some(&[STRIDE_AUTO, W / 2 - 1, STRIDE_AUTO]),
            &[&y[..], &uv[..], &uv[..]],
            None,
            &mut [&mut dst[..]],
        ),
        ErrorKind::InvalidValue,
    );
    check_err(
        yc::convert_yuv420_to_bgra(
            WIDTH,
            HEIGHT,
            None,
            &[&y[..], &uv[..], &uv[..]],
            Some(&[4 * W - 1]),
            &mut [&mut dst[..]],
        ),
        ErrorKind::InvalidValue,
    );
}

#[test]
fn small_buffers() {
    for (&pixel_format, &mode) in iproduct!(PACKED_FORMATS, MODES) {
        let depth = get_depth(pixel_format);
        let src_len = depth * W * H;
        let cases = [
            (src_len - 1, W * H, W * H / 4),
            (src_len, W * H - 1, W * H / 4),
            (src_len, W * H, W * H / 4 - 1),
        ];

        for (src, y, uv) in cases {
            let mut planes = Planes::new(src, y, uv);
            check_err(
                planes.convert(pixel_format, WIDTH, HEIGHT, None, None, mode),
                ErrorKind::NotEnoughData,
            );
        }

        // The last row of a padded plane does not need its padding
        let stride = depth * W + 5;
        let mut planes = Planes::new(stride * (H - 1) + depth * W, W * H, W * H / 4);
        let src_stride = isize::try_from(stride).unwrap();
        assert!(planes
            .convert(pixel_format, WIDTH, HEIGHT, Some(&[src_stride]), None, mode)
            .is_ok());
        assert!(planes
            .convert(pixel_format, WIDTH, HEIGHT, Some(&[-src_stride]), None, mode)
            .is_ok());

        planes.src.pop();
        check_err(
            planes.convert(pixel_format, WIDTH, HEIGHT, Some(&[-src_stride]), None, mode),
            ErrorKind::NotEnoughData,
        );
    }

    let y = vec![0u8; W * H];
    let uv = vec![0u8; W * H / 4];
    let mut dst = vec![0u8; 4 * W * H - 1];
    check_err(
        yc::convert_yuv420_to_bgra(
            WIDTH,
            HEIGHT,
            None,
            &[&y[..], &uv[..], &uv[..]],
            None,
            &mut [&mut dst[..]],
        ),
        ErrorKind::NotEnoughData,
    );
    check_err(
        yc::convert_yuv420_to_bgra(
            WIDTH,
            HEIGHT,
            None,
            &[&y[..W * H - 1], &uv[..], &uv[..]],
            None,
            &mut [&mut dst[..]],
        ),
        ErrorKind::NotEnoughData,
    );
}

#[test]
fn overflow() {
    const HUGE: u32 = u32::MAX - 1;

    for (&pixel_format, &mode) in iproduct!(PACKED_FORMATS, MODES) {
        let mut planes = Planes::packed(pixel_format);

        check_err(
            planes.convert(pixel_format, HUGE, HUGE, None, None, mode),
            ErrorKind::NotEnoughData,
        );
        check_err(
            planes.convert(
                pixel_format,
                WIDTH,
                HEIGHT,
                Some(&[isize::MAX]),
                None,
                mode,
            ),
            ErrorKind::NotEnoughData,
        );
        check_err(
            planes.convert(
                pixel_format,
                WIDTH,
                HEIGHT,
                Some(&[isize::MIN]),
                None,
                mode,
            ),
            ErrorKind::NotEnoughData,
        );
    }
}

#[test]
fn unsupported_formats() {
    for &mode in MODES {
        let mut planes = Planes::packed(PixelFormat::Bgra);

        check_err(
            planes.convert(PixelFormat::I420, WIDTH, HEIGHT, None, None, mode),
            ErrorKind::InvalidOperation,
        );
    }

    let y = vec![0u8; W * H];
    let uv = vec![0u8; W * H / 4];
    let mut dst = vec![0u8; 4 * W * H];
    check_err(
        yc::convert_from_yuv420(
            PixelFormat::I420,
            WIDTH,
            HEIGHT,
            None,
            &[&y[..], &uv[..], &uv[..]],
            None,
            &mut [&mut dst[..]],
        ),
        ErrorKind::InvalidOperation,
    );
}

#[test]
fn buffers_size() {
    let sizes = &mut [0usize; 3];

    check_err(
        yc::get_buffers_size(WIDTH - 1, HEIGHT, PixelFormat::I420, None, sizes),
        ErrorKind::InvalidValue,
    );
    check_err(
        yc::get_buffers_size(WIDTH, HEIGHT, PixelFormat::I420, None, &mut sizes[..2]),
        ErrorKind::NotEnoughData,
    );
    check_err(
        yc::get_buffers_size(
            WIDTH,
            HEIGHT,
            PixelFormat::I420,
            Some(&[STRIDE_AUTO]),
            sizes,
        ),
        ErrorKind::NotEnoughData,
    );
    check_err(
        yc::get_buffers_size(WIDTH, HEIGHT, PixelFormat::Bgra, None, &mut []),
        ErrorKind::NotEnoughData,
    );
    check_err(
        yc::get_buffers_size(
            WIDTH,
            HEIGHT,
            PixelFormat::Bgr,
            Some(&[usize::MAX]),
            sizes,
        ),
        ErrorKind::NotEnoughData,
    );
}
