use crate::{
    ErrorKind, PixelFormat,
    formats::{
        Interleaved, Job, Kernel, Planar,
        packed::{Argb, Bgr, Bgra, Bgra30, Rgb, Rgba30},
        rgb_to_yuv, shuffle, yuv_to_rgb, yuv10_to_rgb,
    },
};
use std::fmt;

/// Kind of transform applied by a [`Conversion`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversionFamily {
    /// Packed RGB to YCbCr, using the forward matrix of the destination color space
    RgbToYcbcr,

    /// 8-bit YCbCr to packed RGB, using the inverse matrix of the source color space
    YcbcrToRgb,

    /// 10-bit YCbCr to 8-bit or 10-bit packed RGB, using the source's 10-bit inverse matrix
    Ycbcr10ToRgb,

    /// Channel reordering between packed RGB formats
    Reorder,
}

/// Conversion routine for a pair of pixel formats, see [`resolve`]
#[derive(Clone, Copy)]
pub struct Conversion {
    family: ConversionFamily,
    kernel: Kernel,
}

impl Conversion {
    pub fn family(&self) -> ConversionFamily {
        self.family
    }

    pub(crate) fn run(&self, job: Job<'_>) -> Result<(), ErrorKind> {
        (self.kernel)(job)
    }
}

impl fmt::Debug for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Conversion")
            .field("family", &self.family)
            .finish_non_exhaustive()
    }
}

fn entry(family: ConversionFamily, kernel: Kernel) -> Option<Conversion> {
    Some(Conversion { family, kernel })
}

/// Look up the conversion routine from `src` to `dst`
///
/// Only the pixel formats select the routine, color spaces are parameters of the routine.
/// Returns `None` if the pair is not supported.
pub fn resolve(src: PixelFormat, dst: PixelFormat) -> Option<Conversion> {
    use ConversionFamily::*;
    use PixelFormat::*;

    match src {
        ARGB => match dst {
            I420 => entry(RgbToYcbcr, rgb_to_yuv::to_420::<Argb, Planar>),
            I444 => entry(RgbToYcbcr, rgb_to_yuv::to_444::<Argb>),
            NV12 => entry(RgbToYcbcr, rgb_to_yuv::to_420::<Argb, Interleaved>),
            _ => None,
        },
        BGR => match dst {
            I420 => entry(RgbToYcbcr, rgb_to_yuv::to_420::<Bgr, Planar>),
            I444 => entry(RgbToYcbcr, rgb_to_yuv::to_444::<Bgr>),
            NV12 => entry(RgbToYcbcr, rgb_to_yuv::to_420::<Bgr, Interleaved>),
            _ => None,
        },
        BGRA => match dst {
            I420 => entry(RgbToYcbcr, rgb_to_yuv::to_420::<Bgra, Planar>),
            I444 => entry(RgbToYcbcr, rgb_to_yuv::to_444::<Bgra>),
            NV12 => entry(RgbToYcbcr, rgb_to_yuv::to_420::<Bgra, Interleaved>),
            RGB => entry(Reorder, shuffle::shuffle::<Bgra, Rgb>),
            _ => None,
        },
        RGB => match dst {
            BGRA => entry(Reorder, shuffle::shuffle::<Rgb, Bgra>),
            _ => None,
        },
        I420 => match dst {
            BGRA => entry(YcbcrToRgb, yuv_to_rgb::from_420::<Planar, Bgra>),
            _ => None,
        },
        I444 => match dst {
            BGRA => entry(YcbcrToRgb, yuv_to_rgb::from_444::<Bgra>),
            _ => None,
        },
        NV12 => match dst {
            BGRA => entry(YcbcrToRgb, yuv_to_rgb::from_420::<Interleaved, Bgra>),
            _ => None,
        },
        P010 => match dst {
            BGRA => entry(Ycbcr10ToRgb, yuv10_to_rgb::from_p010::<Bgra>),
            BGRA30 => entry(Ycbcr10ToRgb, yuv10_to_rgb::from_p010::<Bgra30>),
            RGBA30 => entry(Ycbcr10ToRgb, yuv10_to_rgb::from_p010::<Rgba30>),
            _ => None,
        },
        P410 => match dst {
            BGRA => entry(Ycbcr10ToRgb, yuv10_to_rgb::from_p410::<Bgra>),
            BGRA30 => entry(Ycbcr10ToRgb, yuv10_to_rgb::from_p410::<Bgra30>),
            RGBA30 => entry(Ycbcr10ToRgb, yuv10_to_rgb::from_p410::<Rgba30>),
            _ => None,
        },
        RGBA | BGRA30 | RGBA30 | I422 => None,
    }
}

/// Returns true if [`resolve`] has a routine for the pair
pub fn is_conversion_supported(src: PixelFormat, dst: PixelFormat) -> bool {
    resolve(src, dst).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_pairs() {
        use PixelFormat::*;

        let expected = [
            (ARGB, I420),
            (ARGB, I444),
            (ARGB, NV12),
            (BGR, I420),
            (BGR, I444),
            (BGR, NV12),
            (BGRA, I420),
            (BGRA, I444),
            (BGRA, NV12),
            (BGRA, RGB),
            (I420, BGRA),
            (I444, BGRA),
            (NV12, BGRA),
            (P010, BGRA),
            (P010, BGRA30),
            (P010, RGBA30),
            (P410, BGRA),
            (P410, BGRA30),
            (P410, RGBA30),
            (RGB, BGRA),
        ];

        for src in PixelFormat::variants() {
            for dst in PixelFormat::variants() {
                assert_eq!(
                    is_conversion_supported(src, dst),
                    expected.contains(&(src, dst)),
                    "{src:?} -> {dst:?}"
                );
            }
        }
    }

    #[test]
    fn families() {
        use PixelFormat::*;

        let family = |src, dst| resolve(src, dst).map(|c| c.family());

        assert_eq!(family(BGRA, NV12), Some(ConversionFamily::RgbToYcbcr));
        assert_eq!(family(NV12, BGRA), Some(ConversionFamily::YcbcrToRgb));
        assert_eq!(family(P010, RGBA30), Some(ConversionFamily::Ycbcr10ToRgb));
        assert_eq!(family(RGB, BGRA), Some(ConversionFamily::Reorder));
        assert_eq!(family(I420, RGB), None);
    }
}
