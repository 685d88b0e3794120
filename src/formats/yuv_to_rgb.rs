//! 8-bit YCbCr to packed RGB, chroma is replicated to every pixel of its block

use super::{ChromaLayout, Job, Planar, packed::RgbWrite};
use crate::{
    ErrorKind,
    color::Inverse,
    planes::{MAX_PLANES, PlaneMut, PlaneRef},
    vector::{Vector, Visitor, execute},
};
use std::marker::PhantomData;

pub(crate) fn from_420<C: ChromaLayout, D: RgbWrite>(job: Job<'_>) -> Result<(), ErrorKind> {
    let inverse = job
        .src_format
        .color_space
        .inverse()
        .ok_or(ErrorKind::InvalidValue)?;

    let visitor = Yuv420ToRgb::<C, D> {
        src: job.src,
        dst: job.dst,
        inverse,
        _m: PhantomData,
    };

    execute(job.set, job.width, job.height, visitor);

    Ok(())
}

pub(crate) fn from_444<D: RgbWrite>(job: Job<'_>) -> Result<(), ErrorKind> {
    let inverse = job
        .src_format
        .color_space
        .inverse()
        .ok_or(ErrorKind::InvalidValue)?;

    let [dst, _, _] = job.dst;

    let visitor = Yuv444ToRgb::<D> {
        src: job.src,
        dst,
        inverse,
        _m: PhantomData,
    };

    execute(job.set, job.width, job.height, visitor);

    Ok(())
}

struct Yuv420ToRgb<'a, C, D> {
    src: [PlaneRef<'a>; MAX_PLANES],
    dst: [PlaneMut<'a>; MAX_PLANES],
    inverse: &'static Inverse,
    _m: PhantomData<fn() -> (C, D)>,
}

impl<C: ChromaLayout, D: RgbWrite> Visitor for Yuv420ToRgb<'_, C, D> {
    const BLOCK_WIDTH: usize = 2;
    const BLOCK_HEIGHT: usize = 2;

    #[inline(always)]
    unsafe fn visit<V: Vector>(&mut self, x: usize, y: usize) {
        let depth = D::DEPTH;
        let pixels = V::LEN * 2;

        let y0 = &self.src[0].row(y)[x..x + pixels];
        let y1 = &self.src[0].row(y + 1)[x..x + pixels];

        let (d0, d1) = self.dst[0].rows_mut2(y);
        let d0 = &mut d0[x * depth..(x + pixels) * depth];
        let d1 = &mut d1[x * depth..(x + pixels) * depth];

        unsafe {
            let (cb, cr) = C::load::<V>(&self.src, x / 2, y / 2);

            // Every chroma sample covers two horizontally adjacent pixels
            let (cb_left, cb_right) = cb.zip(cb);
            let (cr_left, cr_right) = cr.zip(cr);

            for (i, (cb, cr)) in [(cb_left, cr_left), (cb_right, cr_right)]
                .into_iter()
                .enumerate()
            {
                let offset = i * V::LEN;

                let top = V::load_u8(y0[offset..].as_ptr());
                let bottom = V::load_u8(y1[offset..].as_ptr());

                D::store(&mut d0[offset * depth..], self.inverse.rgb8(top, cb, cr));
                D::store(&mut d1[offset * depth..], self.inverse.rgb8(bottom, cb, cr));
            }
        }
    }
}

struct Yuv444ToRgb<'a, D> {
    src: [PlaneRef<'a>; MAX_PLANES],
    dst: PlaneMut<'a>,
    inverse: &'static Inverse,
    _m: PhantomData<fn() -> D>,
}

impl<D: RgbWrite> Visitor for Yuv444ToRgb<'_, D> {
    const BLOCK_WIDTH: usize = 1;
    const BLOCK_HEIGHT: usize = 1;

    #[inline(always)]
    unsafe fn visit<V: Vector>(&mut self, x: usize, y: usize) {
        let depth = D::DEPTH;

        let luma = &self.src[0].row(y)[x..x + V::LEN];
        let dst = &mut self.dst.row_mut(y)[x * depth..(x + V::LEN) * depth];

        unsafe {
            let (cb, cr) = Planar::load::<V>(&self.src, x, y);
            let luma = V::load_u8(luma.as_ptr());

            D::store(dst, self.inverse.rgb8(luma, cb, cr));
        }
    }
}
