use crate::{ColorSpace, ErrorKind, PixelFormat, planes::MAX_PLANES};

/// Stride value which asks for the tightly packed stride of a plane
pub const STRIDE_AUTO: usize = 0;

/// Pixel format, color space and number of caller buffers of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageFormat {
    pub pixel_format: PixelFormat,
    pub color_space: ColorSpace,

    /// Number of buffers the image is stored in, see [`PixelFormat::legal_plane_counts`]
    pub num_planes: u32,
}

impl ImageFormat {
    pub fn new(pixel_format: PixelFormat, color_space: ColorSpace, num_planes: u32) -> Self {
        Self {
            pixel_format,
            color_space,
            num_planes,
        }
    }

    /// Check that format, color space, plane count and dimensions are legal together
    pub fn validate(&self, width: usize, height: usize) -> Result<(), ErrorKind> {
        if !self.pixel_format.is_compatible(self.color_space) {
            return Err(ErrorKind::InvalidValue);
        }

        if !self
            .pixel_format
            .legal_plane_counts()
            .contains(&self.num_planes)
        {
            return Err(ErrorKind::InvalidValue);
        }

        let (h, v) = self.pixel_format.subsampling();

        if width == 0 || height == 0 || width % h != 0 || height % v != 0 {
            return Err(ErrorKind::InvalidValue);
        }

        Ok(())
    }

    /// Compute the minimum size in bytes of every buffer of an image
    ///
    /// Strides equal to [`STRIDE_AUTO`] or a missing `strides` slice are replaced with the tightly
    /// packed stride of the plane. `out` receives one entry per buffer, for a single buffer that is
    /// the sum of all logical planes.
    pub fn buffers_size(
        &self,
        width: usize,
        height: usize,
        strides: Option<&[usize]>,
        out: &mut [usize],
    ) -> Result<(), ErrorKind> {
        let layout = Layout::new(self, width, height, strides)?;

        let out = out
            .get_mut(..layout.num_buffers)
            .ok_or(ErrorKind::NotEnoughData)?;

        if layout.num_buffers == 1 {
            out[0] = layout.total_size()?;
        } else {
            for (out, plane) in out.iter_mut().zip(layout.planes()) {
                *out = plane.size()?;
            }
        }

        Ok(())
    }
}

/// Geometry of one logical plane
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct PlaneLayout {
    pub(crate) stride: usize,
    pub(crate) rows: usize,

    /// Bytes of a row that belong to the image, the rest of the stride is padding
    pub(crate) row_bytes: usize,
}

impl PlaneLayout {
    pub(crate) fn size(&self) -> Result<usize, ErrorKind> {
        self.stride
            .checked_mul(self.rows)
            .ok_or(ErrorKind::InvalidValue)
    }
}

/// Validated geometry of every logical plane of an image
#[derive(Debug, Clone, Copy)]
pub(crate) struct Layout {
    planes: [PlaneLayout; MAX_PLANES],
    len: usize,
    pub(crate) num_buffers: usize,
}

impl Layout {
    pub(crate) fn new(
        format: &ImageFormat,
        width: usize,
        height: usize,
        strides: Option<&[usize]>,
    ) -> Result<Self, ErrorKind> {
        format.validate(width, height)?;

        let num_buffers = format.num_planes as usize;

        if let Some(strides) = strides {
            if strides.len() < num_buffers {
                return Err(ErrorKind::NotEnoughData);
            }
        }

        let desc = format.pixel_format.plane_desc();
        let mut planes = [PlaneLayout::default(); MAX_PLANES];

        for (i, (desc, plane)) in desc.iter().zip(&mut planes).enumerate() {
            let row_bytes = desc.packed_stride(width).ok_or(ErrorKind::InvalidValue)?;

            let stride = match strides.and_then(|strides| strides.get(i)) {
                Some(&stride) if stride != STRIDE_AUTO => stride,
                _ => row_bytes,
            };

            *plane = PlaneLayout {
                stride,
                rows: desc.rows(height),
                row_bytes,
            };
        }

        Ok(Self {
            planes,
            len: desc.len(),
            num_buffers,
        })
    }

    pub(crate) fn planes(&self) -> &[PlaneLayout] {
        &self.planes[..self.len]
    }

    pub(crate) fn total_size(&self) -> Result<usize, ErrorKind> {
        self.planes().iter().try_fold(0usize, |acc, plane| {
            let size = plane.size()?;
            acc.checked_add(size).ok_or(ErrorKind::InvalidValue)
        })
    }

    /// Explicit strides must at least fit one row of the plane
    pub(crate) fn check_strides(&self) -> Result<(), ErrorKind> {
        if self
            .planes()
            .iter()
            .any(|plane| plane.stride < plane.row_bytes)
        {
            return Err(ErrorKind::InvalidValue);
        }

        Ok(())
    }
}
