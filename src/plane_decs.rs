/// Description of a logical plane, used for bounds checks, stride calculation and buffer sizes.
///
/// Not used by the kernels themselves, they only see the resulting plane views.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PlaneDesc {
    /// Samples per row and number of rows, in relation to the image width and height
    pub(crate) width_op: Op,
    pub(crate) height_op: Op,

    /// Bytes of one sample, a whole pixel for packed formats and a U/V pair for NV12
    pub(crate) bytes_per_sample: usize,
}

impl PlaneDesc {
    /// Row size of a tightly packed plane, `None` on overflow
    pub(crate) fn packed_stride(&self, width: usize) -> Option<usize> {
        self.width_op.op(width).checked_mul(self.bytes_per_sample)
    }

    /// Number of rows in the plane
    pub(crate) fn rows(&self, height: usize) -> usize {
        self.height_op.op(height)
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Op {
    Div(usize),
    Identity,
}

impl Op {
    pub(crate) fn op(self, lhs: usize) -> usize {
        match self {
            Op::Div(rhs) => lhs / rhs,
            Op::Identity => lhs,
        }
    }

    /// The factor a dimension must be a multiple of
    pub(crate) fn alignment(self) -> usize {
        match self {
            Op::Div(rhs) => rhs,
            Op::Identity => 1,
        }
    }
}

const fn plane(width_op: Op, height_op: Op, bytes_per_sample: usize) -> PlaneDesc {
    PlaneDesc {
        width_op,
        height_op,
        bytes_per_sample,
    }
}

pub(crate) const I420_PLANES: [PlaneDesc; 3] = [
    plane(Op::Identity, Op::Identity, 1),
    plane(Op::Div(2), Op::Div(2), 1),
    plane(Op::Div(2), Op::Div(2), 1),
];

pub(crate) const I422_PLANES: [PlaneDesc; 3] = [
    plane(Op::Identity, Op::Identity, 1),
    plane(Op::Div(2), Op::Identity, 1),
    plane(Op::Div(2), Op::Identity, 1),
];

pub(crate) const I444_PLANES: [PlaneDesc; 3] = [
    plane(Op::Identity, Op::Identity, 1),
    plane(Op::Identity, Op::Identity, 1),
    plane(Op::Identity, Op::Identity, 1),
];

/// Interleaved UV plane, every sample is a U and V byte pair covering a 2x2 block
pub(crate) const NV12_PLANES: [PlaneDesc; 2] = [
    plane(Op::Identity, Op::Identity, 1),
    plane(Op::Div(2), Op::Div(2), 2),
];

pub(crate) const P010_PLANES: [PlaneDesc; 3] = [
    plane(Op::Identity, Op::Identity, 2),
    plane(Op::Div(2), Op::Div(2), 2),
    plane(Op::Div(2), Op::Div(2), 2),
];

pub(crate) const P410_PLANES: [PlaneDesc; 3] = [
    plane(Op::Identity, Op::Identity, 2),
    plane(Op::Identity, Op::Identity, 2),
    plane(Op::Identity, Op::Identity, 2),
];

pub(crate) const RGBA_PLANES: [PlaneDesc; 1] = [plane(Op::Identity, Op::Identity, 4)];

pub(crate) const RGB_PLANES: [PlaneDesc; 1] = [plane(Op::Identity, Op::Identity, 3)];

pub(crate) const RGBA30_PLANES: [PlaneDesc; 1] = [plane(Op::Identity, Op::Identity, 4)];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nv12_uv_pairs_fill_a_luma_row() {
        let [luma, uv] = NV12_PLANES;

        assert_eq!(uv.width_op.alignment(), 2);
        assert_eq!(uv.height_op.alignment(), 2);
        assert_eq!(uv.packed_stride(640), luma.packed_stride(640));
        assert_eq!(uv.rows(480), 240);
    }

    #[test]
    fn packed_stride_overflow() {
        let [rgba] = RGBA_PLANES;

        assert_eq!(rgba.packed_stride(5), Some(20));
        assert_eq!(rgba.packed_stride(usize::MAX / 2), None);
    }
}
