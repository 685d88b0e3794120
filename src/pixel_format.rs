use crate::{ColorSpace, ErrorKind, plane_decs::*};

/// Supported pixel formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(C)]
pub enum PixelFormat {
    /// Single ARGB interleaved plane, 8 bits per sample
    ARGB,

    /// Single BGRA interleaved plane, 8 bits per sample
    BGRA,

    /// Single BGR interleaved plane, 8 bits per sample
    BGR,

    /// Single RGBA interleaved plane, 8 bits per sample
    RGBA,

    /// Single RGB interleaved plane, 8 bits per sample
    RGB,

    /// Single plane of little endian u32, B in bits 0..10, G in 10..20, R in 20..30, A in 30..32
    BGRA30,

    /// Single plane of little endian u32, R in bits 0..10, G in 10..20, B in 20..30, A in 30..32
    RGBA30,

    /// Y, U and V planes, 4:4:4 sub sampling, 8 bits per sample
    I444,

    /// Y, U and V planes, 4:2:2 sub sampling, 8 bits per sample
    I422,

    /// Y, U and V planes, 4:2:0 sub sampling, 8 bits per sample
    I420,

    /// Y and interleaved UV planes, 4:2:0 sub sampling, 8 bits per sample
    NV12,

    /// Y, U and V planes of little endian u16, 4:4:4 sub sampling, low 10 bits significant
    P410,

    /// Y, U and V planes of little endian u16, 4:2:0 sub sampling, low 10 bits significant
    P010,
}

impl PixelFormat {
    pub fn variants() -> impl IntoIterator<Item = Self> {
        use PixelFormat::*;

        [
            ARGB, BGRA, BGR, RGBA, RGB, BGRA30, RGBA30, I444, I422, I420, NV12, P410, P010,
        ]
    }

    /// Returns true for the single plane RGB family formats
    pub fn is_packed(self) -> bool {
        use PixelFormat::*;

        match self {
            ARGB | BGRA | BGR | RGBA | RGB | BGRA30 | RGBA30 => true,
            I444 | I422 | I420 | NV12 | P410 | P010 => false,
        }
    }

    pub fn has_alpha(self) -> bool {
        use PixelFormat::*;

        match self {
            ARGB | BGRA | RGBA | BGRA30 | RGBA30 => true,
            BGR | RGB | I444 | I422 | I420 | NV12 | P410 | P010 => false,
        }
    }

    pub fn bits_per_component(self) -> usize {
        use PixelFormat::*;

        match self {
            ARGB | BGRA | BGR | RGBA | RGB | I444 | I422 | I420 | NV12 => 8,
            BGRA30 | RGBA30 | P410 | P010 => 10,
        }
    }

    /// Value written into the alpha channel by every conversion, `None` if the format has no alpha
    pub fn max_alpha(self) -> Option<u32> {
        use PixelFormat::*;

        match self {
            ARGB | BGRA | RGBA => Some(255),
            BGRA30 | RGBA30 => Some(3),
            BGR | RGB | I444 | I422 | I420 | NV12 | P410 | P010 => None,
        }
    }

    /// Number of logical planes of the format
    pub fn plane_count(self) -> usize {
        self.plane_desc().len()
    }

    /// Number of caller buffers the format may be split across
    ///
    /// A single buffer always works, the logical planes then follow each other in plane order.
    pub fn legal_plane_counts(self) -> &'static [u32] {
        use PixelFormat::*;

        match self {
            ARGB | BGRA | BGR | RGBA | RGB | BGRA30 | RGBA30 => &[1],
            I444 | I422 | I420 | P410 | P010 => &[1, 3],
            NV12 => &[1, 2],
        }
    }

    /// Chroma subsampling factors (horizontal, vertical)
    pub fn subsampling(self) -> (usize, usize) {
        self.plane_desc().last().map_or((1, 1), |chroma| {
            (chroma.width_op.alignment(), chroma.height_op.alignment())
        })
    }

    /// Returns true if the format can be paired with the given color space
    pub fn is_compatible(self, color_space: ColorSpace) -> bool {
        if self.is_packed() {
            color_space == ColorSpace::LRGB
        } else {
            color_space.is_ycbcr()
        }
    }

    pub(crate) fn plane_desc(self) -> &'static [PlaneDesc] {
        use PixelFormat::*;

        match self {
            ARGB | BGRA | RGBA => &RGBA_PLANES,
            BGR | RGB => &RGB_PLANES,
            BGRA30 | RGBA30 => &RGBA30_PLANES,
            I444 => &I444_PLANES,
            I422 => &I422_PLANES,
            I420 => &I420_PLANES,
            NV12 => &NV12_PLANES,
            P410 => &P410_PLANES,
            P010 => &P010_PLANES,
        }
    }
}

impl TryFrom<u32> for PixelFormat {
    type Error = ErrorKind;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        PixelFormat::variants()
            .into_iter()
            .nth(value as usize)
            .ok_or(ErrorKind::InvalidValue)
    }
}
