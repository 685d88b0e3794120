//! Runs in its own process so no other test can have initialized the library

use ezk_color_primitives::{ColorSpace, ErrorKind, ImageFormat, PixelFormat};

#[test]
fn convert_before_initialize() {
    let _ = env_logger::builder().is_test(true).try_init();

    assert_eq!(ezk_color_primitives::describe_acceleration(), None);
    assert_eq!(
        ezk_color_primitives::context().err(),
        Some(ErrorKind::NotInitialized)
    );

    let bgra = ImageFormat::new(PixelFormat::BGRA, ColorSpace::LRGB, 1);
    let nv12 = ImageFormat::new(PixelFormat::NV12, ColorSpace::BT601, 2);

    // Sizing buffers works without initialization
    let mut sizes = [0; 2];
    ezk_color_primitives::get_buffers_size(4, 4, &nv12, None, &mut sizes).unwrap();
    assert_eq!(sizes, [16, 8]);

    let src = [128u8; 64];
    let mut y = [0xAAu8; 16];
    let mut uv = [0xAAu8; 8];

    let result = ezk_color_primitives::convert_image(
        4,
        4,
        &bgra,
        None,
        &[&src],
        &nv12,
        None,
        &mut [&mut y, &mut uv],
    );

    assert_eq!(result, Err(ErrorKind::NotInitialized));
    assert!(y.iter().chain(&uv).all(|&b| b == 0xAA));

    ezk_color_primitives::initialize();

    ezk_color_primitives::convert_image(
        4,
        4,
        &bgra,
        None,
        &[&src],
        &nv12,
        None,
        &mut [&mut y, &mut uv],
    )
    .unwrap();

    assert_eq!(y, [126; 16]);
    assert_eq!(uv, [128; 8]);
}
