//! Channel reordering between 8-bit packed formats

use super::{
    Job,
    packed::{PackedLayout, RgbWrite},
};
use crate::{
    ErrorKind,
    planes::{PlaneMut, PlaneRef},
    vector::{Vector, Visitor, execute},
};
use std::marker::PhantomData;

pub(crate) fn shuffle<S: PackedLayout, D: RgbWrite>(job: Job<'_>) -> Result<(), ErrorKind> {
    let [dst, _, _] = job.dst;

    let visitor = Shuffle::<S, D> {
        src: job.src[0],
        dst,
        _m: PhantomData,
    };

    execute(job.set, job.width, job.height, visitor);

    Ok(())
}

struct Shuffle<'a, S, D> {
    src: PlaneRef<'a>,
    dst: PlaneMut<'a>,
    _m: PhantomData<fn() -> (S, D)>,
}

impl<S: PackedLayout, D: RgbWrite> Visitor for Shuffle<'_, S, D> {
    const BLOCK_WIDTH: usize = 1;
    const BLOCK_HEIGHT: usize = 1;

    #[inline(always)]
    unsafe fn visit<V: Vector>(&mut self, x: usize, y: usize) {
        let src = &self.src.row(y)[x * S::DEPTH..(x + V::LEN) * S::DEPTH];
        let dst = &mut self.dst.row_mut(y)[x * D::DEPTH..(x + V::LEN) * D::DEPTH];

        unsafe { D::store(dst, S::load::<V>(src)) };
    }
}

#[cfg(test)]
mod tests {
    use crate::{ColorSpace, Context, ImageFormat, InstructionSet, PixelFormat};

    #[test]
    fn rgb_bgra_roundtrip() {
        let context = Context::with_instruction_set(InstructionSet::Generic).unwrap();

        let rgb = ImageFormat::new(PixelFormat::RGB, ColorSpace::LRGB, 1);
        let bgra = ImageFormat::new(PixelFormat::BGRA, ColorSpace::LRGB, 1);

        let src = [1, 2, 3, 4, 5, 6, 7, 8, 9];
        let mut dst = [0u8; 12];

        context
            .convert_image(3, 1, &rgb, None, &[&src], &bgra, None, &mut [&mut dst])
            .unwrap();

        assert_eq!(dst, [3, 2, 1, 255, 6, 5, 4, 255, 9, 8, 7, 255]);

        // Alpha is dropped on the way back
        dst[3] = 0;
        let mut back = [0u8; 9];

        context
            .convert_image(3, 1, &bgra, None, &[&dst], &rgb, None, &mut [&mut back])
            .unwrap();

        assert_eq!(back, src);
    }
}
