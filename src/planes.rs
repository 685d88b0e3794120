use crate::{
    ErrorKind,
    image_format::{Layout, PlaneLayout},
};

/// Maximum number of logical planes of any pixel format
pub(crate) const MAX_PLANES: usize = 3;

/// Read only view of a logical plane, holding exactly `stride * rows` bytes
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct PlaneRef<'a> {
    data: &'a [u8],
    stride: usize,
    rows: usize,
    row_bytes: usize,
}

impl<'a> PlaneRef<'a> {
    /// Image bytes of row `y`, without padding
    #[inline(always)]
    pub(crate) fn row(&self, y: usize) -> &'a [u8] {
        let start = y * self.stride;
        &self.data[start..start + self.row_bytes]
    }

    pub(crate) fn rows(&self) -> usize {
        self.rows
    }

    /// Split into rows `..at` and `at..`
    pub(crate) fn split_rows(self, at: usize) -> (Self, Self) {
        let (head, tail) = self.data.split_at(at * self.stride);

        (
            Self {
                data: head,
                rows: at,
                ..self
            },
            Self {
                data: tail,
                rows: self.rows - at,
                ..self
            },
        )
    }
}

/// Mutable view of a logical plane, holding exactly `stride * rows` bytes
#[derive(Debug, Default)]
pub(crate) struct PlaneMut<'a> {
    data: &'a mut [u8],
    stride: usize,
    rows: usize,
    row_bytes: usize,
}

impl<'a> PlaneMut<'a> {
    /// Image bytes of row `y`, without padding
    #[inline(always)]
    pub(crate) fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let start = y * self.stride;
        &mut self.data[start..start + self.row_bytes]
    }

    /// Image bytes of rows `y` and `y + 1`
    #[inline(always)]
    pub(crate) fn rows_mut2(&mut self, y: usize) -> (&mut [u8], &mut [u8]) {
        let start = y * self.stride;
        let (first, second) = self.data[start..].split_at_mut(self.stride);

        (&mut first[..self.row_bytes], &mut second[..self.row_bytes])
    }

    pub(crate) fn rows(&self) -> usize {
        self.rows
    }

    /// Split into rows `..at` and `at..`
    pub(crate) fn split_rows(self, at: usize) -> (Self, Self) {
        let Self {
            data,
            stride,
            rows,
            row_bytes,
        } = self;

        let (head, tail) = data.split_at_mut(at * stride);

        (
            Self {
                data: head,
                stride,
                rows: at,
                row_bytes,
            },
            Self {
                data: tail,
                stride,
                rows: rows - at,
                row_bytes,
            },
        )
    }
}

/// Turn the caller's buffers into one view per logical plane
pub(crate) fn read_planes<'a>(
    layout: &Layout,
    buffers: &[&'a [u8]],
) -> Result<[PlaneRef<'a>; MAX_PLANES], ErrorKind> {
    let planes = split_planes(layout, buffers.iter().copied())?;

    Ok(planes.map(|(data, plane)| PlaneRef {
        data,
        stride: plane.stride,
        rows: plane.rows,
        row_bytes: plane.row_bytes,
    }))
}

/// Turn the caller's buffers into one mutable view per logical plane
pub(crate) fn read_planes_mut<'a>(
    layout: &Layout,
    buffers: &'a mut [&mut [u8]],
) -> Result<[PlaneMut<'a>; MAX_PLANES], ErrorKind> {
    let planes = split_planes(layout, buffers.iter_mut().map(|buffer| &mut **buffer))?;

    Ok(planes.map(|(data, plane)| PlaneMut {
        data,
        stride: plane.stride,
        rows: plane.rows,
        row_bytes: plane.row_bytes,
    }))
}

fn split_planes<S: AnySlice>(
    layout: &Layout,
    mut buffers: impl Iterator<Item = S>,
) -> Result<[(S, PlaneLayout); MAX_PLANES], ErrorKind> {
    layout.check_strides()?;

    let mut out: [(S, PlaneLayout); MAX_PLANES] = Default::default();

    if layout.num_buffers == 1 {
        // All logical planes follow each other in a single buffer
        let mut buf = buffers.next().ok_or(ErrorKind::NotEnoughData)?;

        if buf.slice_len() < layout.total_size()? {
            return Err(ErrorKind::NotEnoughData);
        }

        for (plane, out) in layout.planes().iter().zip(&mut out) {
            let (head, tail) = buf.slice_split_at(plane.size()?);

            *out = (head, *plane);
            buf = tail;
        }
    } else {
        for (plane, out) in layout.planes().iter().zip(&mut out) {
            let buf = buffers.next().ok_or(ErrorKind::NotEnoughData)?;
            let size = plane.size()?;

            if buf.slice_len() < size {
                return Err(ErrorKind::NotEnoughData);
            }

            let (head, _) = buf.slice_split_at(size);
            *out = (head, *plane);
        }
    }

    Ok(out)
}

/// Helper trait implemented on &[u8] and &mut [u8]
trait AnySlice: Default + Sized {
    fn slice_len(&self) -> usize;
    fn slice_split_at(self, at: usize) -> (Self, Self);
}

impl AnySlice for &[u8] {
    fn slice_len(&self) -> usize {
        self.len()
    }

    fn slice_split_at(self, at: usize) -> (Self, Self) {
        self.split_at(at)
    }
}

impl AnySlice for &mut [u8] {
    fn slice_len(&self) -> usize {
        self.len()
    }

    fn slice_split_at(self, at: usize) -> (Self, Self) {
        self.split_at_mut(at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ColorSpace, ImageFormat, PixelFormat};

    fn layout(
        format: ImageFormat,
        width: usize,
        height: usize,
        strides: Option<&[usize]>,
    ) -> Layout {
        Layout::new(&format, width, height, strides).unwrap()
    }

    #[test]
    fn rows_skip_padding() {
        let bgra = ImageFormat::new(PixelFormat::BGRA, ColorSpace::LRGB, 1);
        let layout = layout(bgra, 2, 2, Some(&[10]));

        let buf: Vec<u8> = (0..20).collect();
        let [plane, _, _] = read_planes(&layout, &[&buf]).unwrap();

        assert_eq!(plane.row(0), [0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(plane.row(1), [10, 11, 12, 13, 14, 15, 16, 17]);
    }

    #[test]
    fn single_buffer_is_split() {
        let i420 = ImageFormat::new(PixelFormat::I420, ColorSpace::BT601, 1);
        let layout = layout(i420, 4, 2, None);

        let buf: Vec<u8> = (0..12).collect();
        let [y, u, v] = read_planes(&layout, &[&buf]).unwrap();

        assert_eq!(y.row(1), [4, 5, 6, 7]);
        assert_eq!(u.row(0), [8, 9]);
        assert_eq!(v.row(0), [10, 11]);
    }

    #[test]
    fn too_small() {
        let nv12 = ImageFormat::new(PixelFormat::NV12, ColorSpace::BT601, 2);
        let layout = layout(nv12, 4, 2, None);

        let y = [0u8; 8];
        let uv = [0u8; 3];

        assert!(matches!(
            read_planes(&layout, &[&y, &uv]),
            Err(ErrorKind::NotEnoughData)
        ));
        assert!(matches!(
            read_planes(&layout, &[&y]),
            Err(ErrorKind::NotEnoughData)
        ));

        let single = ImageFormat::new(PixelFormat::NV12, ColorSpace::BT601, 1);
        let layout = Layout::new(&single, 4, 2, None).unwrap();
        let buf = [0u8; 11];

        assert!(matches!(
            read_planes(&layout, &[&buf]),
            Err(ErrorKind::NotEnoughData)
        ));
    }

    #[test]
    fn split_bands() {
        let i420 = ImageFormat::new(PixelFormat::I420, ColorSpace::BT601, 3);
        let layout = layout(i420, 2, 4, None);

        let mut luma = vec![0u8; 8];
        let mut cb = vec![0u8; 2];
        let mut cr = vec![0u8; 2];

        {
            let mut buffers = [luma.as_mut_slice(), cb.as_mut_slice(), cr.as_mut_slice()];
            let [y, u, _] = read_planes_mut(&layout, &mut buffers).unwrap();

            let (mut top, mut bottom) = y.split_rows(2);
            assert_eq!(top.rows(), 2);
            assert_eq!(bottom.rows(), 2);

            top.row_mut(1).fill(1);
            bottom.row_mut(0).fill(2);

            let (u_top, u_bottom) = u.split_rows(1);
            assert_eq!((u_top.rows(), u_bottom.rows()), (1, 1));
        }

        assert_eq!(luma, [0, 0, 1, 1, 2, 2, 0, 0]);
    }
}
