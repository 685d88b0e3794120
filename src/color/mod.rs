pub(crate) mod matrix;

pub(crate) use matrix::{Forward, Inverse};

/// Color model of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(C)]
pub enum ColorSpace {
    /// Gamma-corrected RGB, the only model RGB family pixel formats can be paired with
    LRGB,

    /// YCbCr, Rec. ITU-R BT.601 (standard video system), studio range
    BT601,

    /// YCbCr, Rec. ITU-R BT.709 (CSC systems), studio range
    BT709,
}

impl ColorSpace {
    pub fn variants() -> impl IntoIterator<Item = Self> {
        [ColorSpace::LRGB, ColorSpace::BT601, ColorSpace::BT709]
    }

    /// Returns true for the YCbCr color models
    pub fn is_ycbcr(self) -> bool {
        match self {
            ColorSpace::LRGB => false,
            ColorSpace::BT601 | ColorSpace::BT709 => true,
        }
    }

    /// Luma weights (Kr, Kb) of the YCbCr model, Kg is `1 - Kr - Kb`
    fn luma_weights(self) -> Option<(f64, f64)> {
        match self {
            ColorSpace::LRGB => None,
            ColorSpace::BT601 => Some((0.299, 0.114)),
            ColorSpace::BT709 => Some((0.2126, 0.0722)),
        }
    }

    /// RGB -> YCbCr matrix for 8-bit studio range, rows are Y, Cb, Cr and columns R, G, B
    ///
    /// The additive bias is 16 for Y and 128 for Cb and Cr. Returns `None` for
    /// [`ColorSpace::LRGB`].
    pub fn forward_matrix(self) -> Option<[[f64; 3]; 3]> {
        let (kr, kb) = self.luma_weights()?;
        let kg = 1.0 - kr - kb;

        let y_scale = 219.0 / 255.0;
        let c_scale = 224.0 / 255.0;

        Some([
            [kr * y_scale, kg * y_scale, kb * y_scale],
            [
                -kr / (2.0 * (1.0 - kb)) * c_scale,
                -kg / (2.0 * (1.0 - kb)) * c_scale,
                0.5 * c_scale,
            ],
            [
                0.5 * c_scale,
                -kg / (2.0 * (1.0 - kr)) * c_scale,
                -kb / (2.0 * (1.0 - kr)) * c_scale,
            ],
        ])
    }

    /// YCbCr -> RGB matrix for 8-bit studio range
    ///
    /// Rows are R, G, B and columns Y - 16, Cb - 128, Cr - 128.
    ///
    /// Returns `None` for [`ColorSpace::LRGB`].
    pub fn inverse_matrix(self) -> Option<[[f64; 3]; 3]> {
        let (kr, kb) = self.luma_weights()?;
        let kg = 1.0 - kr - kb;

        let y_scale = 255.0 / 219.0;
        let c_scale = 255.0 / 224.0;

        Some([
            [y_scale, 0.0, 2.0 * (1.0 - kr) * c_scale],
            [
                y_scale,
                -2.0 * (1.0 - kb) * kb / kg * c_scale,
                -2.0 * (1.0 - kr) * kr / kg * c_scale,
            ],
            [y_scale, 2.0 * (1.0 - kb) * c_scale, 0.0],
        ])
    }

    pub(crate) fn forward(self) -> Option<&'static Forward> {
        match self {
            ColorSpace::LRGB => None,
            ColorSpace::BT601 => Some(&matrix::BT601_FORWARD),
            ColorSpace::BT709 => Some(&matrix::BT709_FORWARD),
        }
    }

    pub(crate) fn inverse(self) -> Option<&'static Inverse> {
        match self {
            ColorSpace::LRGB => None,
            ColorSpace::BT601 => Some(&matrix::BT601_INVERSE),
            ColorSpace::BT709 => Some(&matrix::BT709_INVERSE),
        }
    }

    pub(crate) fn inverse_10bit(self) -> Option<&'static Inverse> {
        match self {
            ColorSpace::LRGB => None,
            ColorSpace::BT601 => Some(&matrix::BT601_INVERSE_10BIT),
            ColorSpace::BT709 => Some(&matrix::BT709_INVERSE_10BIT),
        }
    }
}

impl TryFrom<u32> for ColorSpace {
    type Error = crate::ErrorKind;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ColorSpace::LRGB),
            1 => Ok(ColorSpace::BT601),
            2 => Ok(ColorSpace::BT709),
            _ => Err(crate::ErrorKind::InvalidValue),
        }
    }
}
