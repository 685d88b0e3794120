use crate::{
    ErrorKind, ImageFormat,
    planes::{MAX_PLANES, PlaneMut, PlaneRef},
    vector::{InstructionSet, Vector},
};

pub(crate) mod packed;
pub(crate) mod rgb_to_yuv;
pub(crate) mod shuffle;
pub(crate) mod yuv10_to_rgb;
pub(crate) mod yuv_to_rgb;

/// Conversion kernel entry point, only called with validated formats and bounds checked planes
pub(crate) type Kernel = fn(Job<'_>) -> Result<(), ErrorKind>;

/// Everything a kernel needs to convert an image (or a band of rows of it)
#[derive(Debug)]
pub(crate) struct Job<'a> {
    pub(crate) set: InstructionSet,
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) src_format: ImageFormat,
    pub(crate) dst_format: ImageFormat,
    pub(crate) src: [PlaneRef<'a>; MAX_PLANES],
    pub(crate) dst: [PlaneMut<'a>; MAX_PLANES],
}

impl Job<'_> {
    /// Split into jobs converting rows `..at` and `at..`
    ///
    /// `at` must be a multiple of the vertical subsampling of both formats.
    #[cfg(feature = "multi-thread")]
    pub(crate) fn split_rows(self, at: usize) -> (Self, Self) {
        let Job {
            set,
            width,
            height,
            src_format,
            dst_format,
            src,
            dst,
        } = self;

        // Rows of a (possibly subsampled) plane at luma row `at`
        let plane_at = |rows: usize| if rows == 0 { 0 } else { at / (height / rows) };

        let mut src_head = [PlaneRef::default(); MAX_PLANES];
        let mut src_tail = [PlaneRef::default(); MAX_PLANES];

        for (i, plane) in src.into_iter().enumerate() {
            (src_head[i], src_tail[i]) = plane.split_rows(plane_at(plane.rows()));
        }

        let mut dst_head: [PlaneMut<'_>; MAX_PLANES] = Default::default();
        let mut dst_tail: [PlaneMut<'_>; MAX_PLANES] = Default::default();

        for (i, plane) in dst.into_iter().enumerate() {
            let at = plane_at(plane.rows());
            (dst_head[i], dst_tail[i]) = plane.split_rows(at);
        }

        (
            Job {
                set,
                width,
                height: at,
                src_format,
                dst_format,
                src: src_head,
                dst: dst_head,
            },
            Job {
                set,
                width,
                height: height - at,
                src_format,
                dst_format,
                src: src_tail,
                dst: dst_tail,
            },
        )
    }
}

/// Arrangement of the two chroma planes of a YCbCr format
pub(crate) trait ChromaLayout {
    /// Read `V::LEN` Cb and Cr samples starting at chroma column `x` of chroma row `y`
    unsafe fn load<V: Vector>(planes: &[PlaneRef<'_>; MAX_PLANES], x: usize, y: usize) -> (V, V);

    /// Write `V::LEN` Cb and Cr samples starting at chroma column `x` of chroma row `y`
    unsafe fn store<V: Vector>(
        planes: &mut [PlaneMut<'_>; MAX_PLANES],
        x: usize,
        y: usize,
        cb: V,
        cr: V,
    );
}

/// Separate U and V planes (I420, I444)
pub(crate) struct Planar;

/// One plane of interleaved U and V samples (NV12)
pub(crate) struct Interleaved;

impl ChromaLayout for Planar {
    #[inline(always)]
    unsafe fn load<V: Vector>(planes: &[PlaneRef<'_>; MAX_PLANES], x: usize, y: usize) -> (V, V) {
        let u = &planes[1].row(y)[x..x + V::LEN];
        let v = &planes[2].row(y)[x..x + V::LEN];

        unsafe { (V::load_u8(u.as_ptr()), V::load_u8(v.as_ptr())) }
    }

    #[inline(always)]
    unsafe fn store<V: Vector>(
        planes: &mut [PlaneMut<'_>; MAX_PLANES],
        x: usize,
        y: usize,
        cb: V,
        cr: V,
    ) {
        let [_, u, v] = planes;

        let u = &mut u.row_mut(y)[x..x + V::LEN];
        unsafe { cb.store_u8(u.as_mut_ptr()) };

        let v = &mut v.row_mut(y)[x..x + V::LEN];
        unsafe { cr.store_u8(v.as_mut_ptr()) };
    }
}

impl ChromaLayout for Interleaved {
    #[inline(always)]
    unsafe fn load<V: Vector>(planes: &[PlaneRef<'_>; MAX_PLANES], x: usize, y: usize) -> (V, V) {
        let uv = &planes[1].row(y)[x * 2..(x + V::LEN) * 2];

        unsafe {
            let pairs = V::load_u16(uv.as_ptr());

            (pairs.vand(V::splat(0xFF)), pairs.vsra(8))
        }
    }

    #[inline(always)]
    unsafe fn store<V: Vector>(
        planes: &mut [PlaneMut<'_>; MAX_PLANES],
        x: usize,
        y: usize,
        cb: V,
        cr: V,
    ) {
        let uv = &mut planes[1].row_mut(y)[x * 2..(x + V::LEN) * 2];
        let (head, tail) = uv.split_at_mut(V::LEN);

        unsafe {
            let (lo, hi) = cb.zip(cr);

            lo.store_u8(head.as_mut_ptr());
            hi.store_u8(tail.as_mut_ptr());
        }
    }
}
