//! Unmangled C functions, every one of them mirrors a function of the crate root

use crate::{ErrorKind, ImageFormat, dispatch, planes::MAX_PLANES};
use std::{
    ffi::{CString, c_char},
    ptr, slice,
};

/// Outcome of a fallible C function, details are written to the optional error out-parameter
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcpResult {
    Ok,
    Err,
}

/// [`ImageFormat`] with raw enum values as passed through the C ABI
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EcpImageFormat {
    pub pixel_format: u32,
    pub color_space: u32,
    pub num_planes: u32,
}

impl TryFrom<EcpImageFormat> for ImageFormat {
    type Error = ErrorKind;

    fn try_from(format: EcpImageFormat) -> Result<Self, Self::Error> {
        Ok(ImageFormat {
            pixel_format: format.pixel_format.try_into()?,
            color_space: format.color_space.try_into()?,
            num_planes: format.num_planes,
        })
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn ecp_initialize() {
    crate::initialize();
}

/// Returns a string which must be released with [`ecp_unref_string`], or NULL if not initialized
#[unsafe(no_mangle)]
pub extern "C" fn ecp_describe_acceleration() -> *mut c_char {
    crate::describe_acceleration()
        .and_then(|description| CString::new(description).ok())
        .map_or(ptr::null_mut(), CString::into_raw)
}

/// # Safety
///
/// `string` must be NULL or a pointer returned by [`ecp_describe_acceleration`] which was not
/// released yet
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ecp_unref_string(string: *mut c_char) {
    if !string.is_null() {
        drop(unsafe { CString::from_raw(string) });
    }
}

/// # Safety
///
/// - `format` must be NULL or point to a valid [`EcpImageFormat`]
/// - `strides` must be NULL or point to `format.num_planes` values
/// - `buffers_size` must be NULL or point to `format.num_planes` writable values
/// - `error` must be NULL or writable
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ecp_get_buffers_size(
    width: u32,
    height: u32,
    format: *const EcpImageFormat,
    strides: *const usize,
    buffers_size: *mut usize,
    error: *mut ErrorKind,
) -> EcpResult {
    let result = unsafe { get_buffers_size(width, height, format, strides, buffers_size) };

    unsafe { finish(result, error) }
}

/// # Safety
///
/// - `src_format` and `dst_format` must be NULL or point to a valid [`EcpImageFormat`]
/// - strides must be NULL or point to `num_planes` values of their format
/// - buffer arrays must be NULL or point to `num_planes` pointers of their format, each pointing
///   to at least as many bytes as [`ecp_get_buffers_size`] reports for the plane
/// - source and destination buffers must not overlap
/// - `error` must be NULL or writable
#[unsafe(no_mangle)]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn ecp_convert_image(
    width: u32,
    height: u32,
    src_format: *const EcpImageFormat,
    src_strides: *const usize,
    src_buffers: *const *const u8,
    dst_format: *const EcpImageFormat,
    dst_strides: *const usize,
    dst_buffers: *const *mut u8,
    error: *mut ErrorKind,
) -> EcpResult {
    let result = unsafe {
        convert_image(
            width,
            height,
            src_format,
            src_strides,
            src_buffers,
            dst_format,
            dst_strides,
            dst_buffers,
        )
    };

    unsafe { finish(result, error) }
}

unsafe fn finish(result: Result<(), ErrorKind>, error: *mut ErrorKind) -> EcpResult {
    match result {
        Ok(()) => EcpResult::Ok,
        Err(e) => {
            if !error.is_null() {
                unsafe { error.write(e) };
            }

            EcpResult::Err
        }
    }
}

unsafe fn read_format(format: *const EcpImageFormat) -> Result<ImageFormat, ErrorKind> {
    let format = unsafe { format.as_ref() }.ok_or(ErrorKind::InvalidValue)?;

    ImageFormat::try_from(*format)
}

/// `format` must be validated so `num_planes` is a legal plane count
unsafe fn read_strides<'a>(strides: *const usize, format: &ImageFormat) -> Option<&'a [usize]> {
    if strides.is_null() {
        None
    } else {
        Some(unsafe { slice::from_raw_parts(strides, format.num_planes as usize) })
    }
}

unsafe fn get_buffers_size(
    width: u32,
    height: u32,
    format: *const EcpImageFormat,
    strides: *const usize,
    buffers_size: *mut usize,
) -> Result<(), ErrorKind> {
    let format = unsafe { read_format(format) }?;
    format.validate(width as usize, height as usize)?;

    if buffers_size.is_null() {
        return Err(ErrorKind::InvalidValue);
    }

    let strides = unsafe { read_strides(strides, &format) };
    let out = unsafe { slice::from_raw_parts_mut(buffers_size, format.num_planes as usize) };

    format.buffers_size(width as usize, height as usize, strides, out)
}

#[allow(clippy::too_many_arguments)]
unsafe fn convert_image(
    width: u32,
    height: u32,
    src_format: *const EcpImageFormat,
    src_strides: *const usize,
    src_buffers: *const *const u8,
    dst_format: *const EcpImageFormat,
    dst_strides: *const usize,
    dst_buffers: *const *mut u8,
) -> Result<(), ErrorKind> {
    let context = crate::context()?;

    let src_format = unsafe { read_format(src_format) }?;
    let dst_format = unsafe { read_format(dst_format) }?;

    src_format.validate(width as usize, height as usize)?;
    dst_format.validate(width as usize, height as usize)?;

    if !dispatch::is_conversion_supported(src_format.pixel_format, dst_format.pixel_format) {
        return Err(ErrorKind::InvalidOperation);
    }

    if src_buffers.is_null() || dst_buffers.is_null() {
        return Err(ErrorKind::InvalidValue);
    }

    let src_strides = unsafe { read_strides(src_strides, &src_format) };
    let dst_strides = unsafe { read_strides(dst_strides, &dst_format) };

    let src_count = src_format.num_planes as usize;
    let dst_count = dst_format.num_planes as usize;

    let mut src_sizes = [0; MAX_PLANES];
    let mut dst_sizes = [0; MAX_PLANES];

    src_format.buffers_size(width as usize, height as usize, src_strides, &mut src_sizes)?;
    dst_format.buffers_size(width as usize, height as usize, dst_strides, &mut dst_sizes)?;

    let src_ptrs = unsafe { slice::from_raw_parts(src_buffers, src_count) };
    let dst_ptrs = unsafe { slice::from_raw_parts(dst_buffers, dst_count) };

    if src_ptrs.iter().any(|p| p.is_null()) || dst_ptrs.iter().any(|p| p.is_null()) {
        return Err(ErrorKind::InvalidValue);
    }

    let mut src: [&[u8]; MAX_PLANES] = [&[]; MAX_PLANES];
    let mut dst: [&mut [u8]; MAX_PLANES] = Default::default();

    for ((src, &ptr), &size) in src.iter_mut().zip(src_ptrs).zip(&src_sizes) {
        *src = unsafe { slice::from_raw_parts(ptr, size) };
    }

    for ((dst, &ptr), &size) in dst.iter_mut().zip(dst_ptrs).zip(&dst_sizes) {
        *dst = unsafe { slice::from_raw_parts_mut(ptr, size) };
    }

    context.convert_image(
        width,
        height,
        &src_format,
        src_strides,
        &src[..src_count],
        &dst_format,
        dst_strides,
        &mut dst[..dst_count],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ColorSpace, PixelFormat};
    use std::ffi::CStr;

    fn raw(format: PixelFormat, color_space: ColorSpace, num_planes: u32) -> EcpImageFormat {
        EcpImageFormat {
            pixel_format: format as u32,
            color_space: color_space as u32,
            num_planes,
        }
    }

    #[test]
    fn describe_and_release() {
        ecp_initialize();

        let description = ecp_describe_acceleration();
        assert!(!description.is_null());

        let text = unsafe { CStr::from_ptr(description) }.to_str().unwrap().to_owned();
        assert!(text.starts_with("{cpu-manufacturer:"));

        unsafe {
            ecp_unref_string(description);
            ecp_unref_string(ptr::null_mut());
        }
    }

    #[test]
    fn buffers_size() {
        let format = raw(PixelFormat::I420, ColorSpace::BT709, 3);
        let mut sizes = [0usize; 3];
        let mut error = ErrorKind::NotInitialized;

        let result = unsafe {
            ecp_get_buffers_size(640, 480, &format, ptr::null(), sizes.as_mut_ptr(), &mut error)
        };

        assert_eq!(result, EcpResult::Ok);
        assert_eq!(sizes, [640 * 480, 320 * 240, 320 * 240]);

        let bad = EcpImageFormat {
            pixel_format: 99,
            ..format
        };

        let result = unsafe {
            ecp_get_buffers_size(640, 480, &bad, ptr::null(), sizes.as_mut_ptr(), &mut error)
        };

        assert_eq!(result, EcpResult::Err);
        assert_eq!(error, ErrorKind::InvalidValue);

        let result = unsafe {
            ecp_get_buffers_size(640, 480, ptr::null(), ptr::null(), sizes.as_mut_ptr(), &mut error)
        };

        assert_eq!(result, EcpResult::Err);
        assert_eq!(error, ErrorKind::InvalidValue);
    }

    #[test]
    fn convert() {
        ecp_initialize();

        let src_format = raw(PixelFormat::BGRA, ColorSpace::LRGB, 1);
        let dst_format = raw(PixelFormat::NV12, ColorSpace::BT601, 2);

        let src = [128u8, 128, 128, 255].repeat(4);
        let mut y = [0u8; 4];
        let mut uv = [0u8; 2];

        let src_buffers = [src.as_ptr()];
        let dst_buffers = [y.as_mut_ptr(), uv.as_mut_ptr()];

        let result = unsafe {
            ecp_convert_image(
                2,
                2,
                &src_format,
                ptr::null(),
                src_buffers.as_ptr(),
                &dst_format,
                ptr::null(),
                dst_buffers.as_ptr(),
                ptr::null_mut(),
            )
        };

        assert_eq!(result, EcpResult::Ok);
        assert_eq!(y, [126; 4]);
        assert_eq!(uv, [128, 128]);

        let mut error = ErrorKind::NotInitialized;
        let unsupported = raw(PixelFormat::I422, ColorSpace::BT601, 3);

        let result = unsafe {
            ecp_convert_image(
                2,
                2,
                &src_format,
                ptr::null(),
                src_buffers.as_ptr(),
                &unsupported,
                ptr::null(),
                dst_buffers.as_ptr(),
                &mut error,
            )
        };

        assert_eq!(result, EcpResult::Err);
        assert_eq!(error, ErrorKind::InvalidOperation);
    }
}
