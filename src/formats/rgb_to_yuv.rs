//! Packed 8-bit RGB to 8-bit YCbCr
//!
//! 4:2:0 chroma is computed from the sum of the R, G and B values of each 2x2 block.

use super::{ChromaLayout, Job, Planar, packed::PackedLayout};
use crate::{
    ErrorKind,
    color::Forward,
    planes::{MAX_PLANES, PlaneMut, PlaneRef},
    vector::{Vector, Visitor, execute},
};
use std::marker::PhantomData;

pub(crate) fn to_420<P: PackedLayout, C: ChromaLayout>(job: Job<'_>) -> Result<(), ErrorKind> {
    let forward = job
        .dst_format
        .color_space
        .forward()
        .ok_or(ErrorKind::InvalidValue)?;

    let visitor = RgbToYuv420::<P, C> {
        src: job.src[0],
        dst: job.dst,
        forward,
        _m: PhantomData,
    };

    execute(job.set, job.width, job.height, visitor);

    Ok(())
}

pub(crate) fn to_444<P: PackedLayout>(job: Job<'_>) -> Result<(), ErrorKind> {
    let forward = job
        .dst_format
        .color_space
        .forward()
        .ok_or(ErrorKind::InvalidValue)?;

    let visitor = RgbToYuv444::<P> {
        src: job.src[0],
        dst: job.dst,
        forward,
        _m: PhantomData,
    };

    execute(job.set, job.width, job.height, visitor);

    Ok(())
}

struct RgbToYuv420<'a, P, C> {
    src: PlaneRef<'a>,
    dst: [PlaneMut<'a>; MAX_PLANES],
    forward: &'static Forward,
    _m: PhantomData<fn() -> (P, C)>,
}

impl<P: PackedLayout, C: ChromaLayout> Visitor for RgbToYuv420<'_, P, C> {
    const BLOCK_WIDTH: usize = 2;
    const BLOCK_HEIGHT: usize = 2;

    #[inline(always)]
    unsafe fn visit<V: Vector>(&mut self, x: usize, y: usize) {
        let depth = P::DEPTH;
        let pixels = V::LEN * 2;

        let src0 = &self.src.row(y)[x * depth..(x + pixels) * depth];
        let src1 = &self.src.row(y + 1)[x * depth..(x + pixels) * depth];

        let (y0, y1) = self.dst[0].rows_mut2(y);
        let y0 = &mut y0[x..x + pixels];
        let y1 = &mut y1[x..x + pixels];

        unsafe {
            let top = [P::load::<V>(src0), P::load::<V>(&src0[V::LEN * depth..])];
            let bottom = [P::load::<V>(src1), P::load::<V>(&src1[V::LEN * depth..])];

            for (i, rgb) in top.into_iter().enumerate() {
                self.forward.luma(rgb).store_u8(y0[i * V::LEN..].as_mut_ptr());
            }

            for (i, rgb) in bottom.into_iter().enumerate() {
                self.forward.luma(rgb).store_u8(y1[i * V::LEN..].as_mut_ptr());
            }

            // Sum every 2x2 block, unzip separates the left and right pixel of each pair
            let sum: [V; 3] = std::array::from_fn(|c| {
                let (top_left, top_right) = top[0][c].unzip(top[1][c]);
                let (bottom_left, bottom_right) = bottom[0][c].unzip(bottom[1][c]);

                top_left
                    .vadd(top_right)
                    .vadd(bottom_left)
                    .vadd(bottom_right)
            });

            let (cb, cr) = self.forward.chroma(sum, 2);

            C::store(&mut self.dst, x / 2, y / 2, cb, cr);
        }
    }
}

struct RgbToYuv444<'a, P> {
    src: PlaneRef<'a>,
    dst: [PlaneMut<'a>; MAX_PLANES],
    forward: &'static Forward,
    _m: PhantomData<fn() -> P>,
}

impl<P: PackedLayout> Visitor for RgbToYuv444<'_, P> {
    const BLOCK_WIDTH: usize = 1;
    const BLOCK_HEIGHT: usize = 1;

    #[inline(always)]
    unsafe fn visit<V: Vector>(&mut self, x: usize, y: usize) {
        let depth = P::DEPTH;
        let src = &self.src.row(y)[x * depth..(x + V::LEN) * depth];
        let luma = &mut self.dst[0].row_mut(y)[x..x + V::LEN];

        unsafe {
            let rgb = P::load::<V>(src);

            self.forward.luma(rgb).store_u8(luma.as_mut_ptr());

            let (cb, cr) = self.forward.chroma(rgb, 0);
            Planar::store(&mut self.dst, x, y, cb, cr);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ColorSpace, ImageFormat, PixelFormat,
        formats::{Interleaved, packed::Bgra},
        image_format::Layout,
        planes::{read_planes, read_planes_mut},
    };

    fn run(
        kernel: crate::formats::Kernel,
        dst_format: ImageFormat,
        width: usize,
        height: usize,
        bgra: &[u8],
    ) -> Vec<Vec<u8>> {
        let src_format = ImageFormat::new(PixelFormat::BGRA, ColorSpace::LRGB, 1);

        let mut sizes = vec![0; dst_format.num_planes as usize];
        dst_format
            .buffers_size(width, height, None, &mut sizes)
            .unwrap();

        let mut out: Vec<Vec<u8>> = sizes.iter().map(|&size| vec![0; size]).collect();

        let src_layout = Layout::new(&src_format, width, height, None).unwrap();
        let dst_layout = Layout::new(&dst_format, width, height, None).unwrap();

        {
            let mut buffers: Vec<&mut [u8]> = out.iter_mut().map(|b| b.as_mut_slice()).collect();

            let job = Job {
                set: crate::InstructionSet::Generic,
                width,
                height,
                src_format,
                dst_format,
                src: read_planes(&src_layout, &[bgra]).unwrap(),
                dst: read_planes_mut(&dst_layout, &mut buffers).unwrap(),
            };

            kernel(job).unwrap();
        }

        out
    }

    #[test]
    fn gray_i420() {
        let bgra = [128, 128, 128, 255].repeat(4);
        let format = ImageFormat::new(PixelFormat::I420, ColorSpace::BT601, 3);

        let out = run(to_420::<Bgra, Planar>, format, 2, 2, &bgra);

        assert_eq!(out, [vec![126; 4], vec![128], vec![128]]);
    }

    #[test]
    fn red_i444() {
        let bgra = [0, 0, 255, 255];
        let format = ImageFormat::new(PixelFormat::I444, ColorSpace::BT601, 3);

        let out = run(to_444::<Bgra>, format, 1, 1, &bgra);

        assert_eq!(out, [vec![81], vec![90], vec![240]]);
    }

    #[test]
    fn nv12_chroma_is_block_average() {
        // Left block: two black and two white pixels, right block: all white
        #[rustfmt::skip]
        let bgra = [
            0, 0, 0, 255,       255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255, 255,
            255, 255, 255, 255, 0, 0, 0, 255,       255, 255, 255, 255, 255, 255, 255, 255,
        ];
        let format = ImageFormat::new(PixelFormat::NV12, ColorSpace::BT709, 2);

        let out = run(to_420::<Bgra, Interleaved>, format, 4, 2, &bgra);

        assert_eq!(out[0], [16, 235, 235, 235, 235, 16, 235, 235]);
        assert_eq!(out[1], [128, 128, 128, 128]);
    }
}
