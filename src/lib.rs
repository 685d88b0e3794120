#![allow(clippy::missing_safety_doc)]

//! Convert images between packed RGB, 10-bit packed RGB and planar YCbCr pixel formats
//!
//! Conversions run on caller owned buffers and never allocate. The kernel variant (generic, SSE2,
//! AVX2 or NEON) is picked once by a [`Context`].
//!
//! ```
//! use ezk_color_primitives::{ColorSpace, ImageFormat, PixelFormat};
//!
//! ezk_color_primitives::initialize();
//!
//! let (width, height) = (640, 480);
//!
//! let src_format = ImageFormat::new(PixelFormat::BGRA, ColorSpace::LRGB, 1);
//! let dst_format = ImageFormat::new(PixelFormat::NV12, ColorSpace::BT601, 2);
//!
//! let mut sizes = [0; 2];
//! ezk_color_primitives::get_buffers_size(width, height, &dst_format, None, &mut sizes).unwrap();
//!
//! let src = vec![0u8; 640 * 480 * 4];
//! let mut y = vec![0u8; sizes[0]];
//! let mut uv = vec![0u8; sizes[1]];
//!
//! ezk_color_primitives::convert_image(
//!     width,
//!     height,
//!     &src_format,
//!     None,
//!     &[&src],
//!     &dst_format,
//!     None,
//!     &mut [&mut y, &mut uv],
//! )
//! .unwrap();
//! ```

use std::sync::OnceLock;

pub use color::ColorSpace;
pub use context::Context;
pub use dispatch::{Conversion, ConversionFamily, is_conversion_supported, resolve};
pub use error::ErrorKind;
pub use image_format::{ImageFormat, STRIDE_AUTO};
pub use pixel_format::PixelFormat;
pub use vector::{CpuManufacturer, InstructionSet};

#[cfg(feature = "c-api")]
pub mod c_api;
mod color;
mod context;
mod dispatch;
mod error;
mod formats;
mod image_format;
#[cfg(feature = "multi-thread")]
mod multi_thread;
mod pixel_format;
mod plane_decs;
mod planes;
mod vector;

mod arch {
    #[cfg(target_arch = "x86")]
    pub use std::arch::x86::*;
    #[cfg(target_arch = "x86_64")]
    pub use std::arch::x86_64::*;

    #[cfg(target_arch = "aarch64")]
    pub use std::arch::aarch64::*;
}

static CONTEXT: OnceLock<Context> = OnceLock::new();

/// Select the kernel variant for this process, must be called before [`convert_image`]
///
/// Calling it again has no effect.
pub fn initialize() {
    let mut created = false;

    CONTEXT.get_or_init(|| {
        created = true;
        Context::new()
    });

    if !created {
        log::trace!("Already initialized");
    }
}

/// The context created by [`initialize`]
pub fn context() -> Result<&'static Context, ErrorKind> {
    CONTEXT.get().ok_or(ErrorKind::NotInitialized)
}

/// Description of the selected acceleration, `None` if [`initialize`] was never called
///
/// See [`Context::describe`].
pub fn describe_acceleration() -> Option<String> {
    CONTEXT.get().map(Context::describe)
}

/// Compute the size in bytes of every buffer of an image, see [`ImageFormat::buffers_size`]
pub fn get_buffers_size(
    width: u32,
    height: u32,
    format: &ImageFormat,
    strides: Option<&[usize]>,
    buffers_size: &mut [usize],
) -> Result<(), ErrorKind> {
    format.buffers_size(width as usize, height as usize, strides, buffers_size)
}

/// Convert an image using the context created by [`initialize`], see [`Context::convert_image`]
#[allow(clippy::too_many_arguments)]
pub fn convert_image(
    width: u32,
    height: u32,
    src_format: &ImageFormat,
    src_strides: Option<&[usize]>,
    src_buffers: &[&[u8]],
    dst_format: &ImageFormat,
    dst_strides: Option<&[usize]>,
    dst_buffers: &mut [&mut [u8]],
) -> Result<(), ErrorKind> {
    context()?.convert_image(
        width,
        height,
        src_format,
        src_strides,
        src_buffers,
        dst_format,
        dst_strides,
        dst_buffers,
    )
}

/// Convert an image on multiple threads using the context created by [`initialize`],
/// see [`Context::convert_image_multi_thread`]
#[cfg(feature = "multi-thread")]
#[allow(clippy::too_many_arguments)]
pub fn convert_image_multi_thread(
    width: u32,
    height: u32,
    src_format: &ImageFormat,
    src_strides: Option<&[usize]>,
    src_buffers: &[&[u8]],
    dst_format: &ImageFormat,
    dst_strides: Option<&[usize]>,
    dst_buffers: &mut [&mut [u8]],
) -> Result<(), ErrorKind> {
    context()?.convert_image_multi_thread(
        width,
        height,
        src_format,
        src_strides,
        src_buffers,
        dst_format,
        dst_strides,
        dst_buffers,
    )
}
