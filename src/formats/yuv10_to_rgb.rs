//! 10-bit YCbCr (u16 little endian samples) to 8-bit or 10-bit packed RGB

use super::{Job, packed::RgbWrite};
use crate::{
    ErrorKind,
    color::Inverse,
    planes::{MAX_PLANES, PlaneMut, PlaneRef},
    vector::{Vector, Visitor, execute},
};
use std::marker::PhantomData;

pub(crate) fn from_p010<D: RgbWrite>(job: Job<'_>) -> Result<(), ErrorKind> {
    let inverse = job
        .src_format
        .color_space
        .inverse_10bit()
        .ok_or(ErrorKind::InvalidValue)?;

    let [dst, _, _] = job.dst;

    let visitor = P010ToRgb::<D> {
        src: job.src,
        dst,
        inverse,
        _m: PhantomData,
    };

    execute(job.set, job.width, job.height, visitor);

    Ok(())
}

pub(crate) fn from_p410<D: RgbWrite>(job: Job<'_>) -> Result<(), ErrorKind> {
    let inverse = job
        .src_format
        .color_space
        .inverse_10bit()
        .ok_or(ErrorKind::InvalidValue)?;

    let [dst, _, _] = job.dst;

    let visitor = P410ToRgb::<D> {
        src: job.src,
        dst,
        inverse,
        _m: PhantomData,
    };

    execute(job.set, job.width, job.height, visitor);

    Ok(())
}

struct P010ToRgb<'a, D> {
    src: [PlaneRef<'a>; MAX_PLANES],
    dst: PlaneMut<'a>,
    inverse: &'static Inverse,
    _m: PhantomData<fn() -> D>,
}

impl<D: RgbWrite> Visitor for P010ToRgb<'_, D> {
    const BLOCK_WIDTH: usize = 2;
    const BLOCK_HEIGHT: usize = 2;

    #[inline(always)]
    unsafe fn visit<V: Vector>(&mut self, x: usize, y: usize) {
        let depth = D::DEPTH;
        let pixels = V::LEN * 2;

        let [luma, u, v] = &self.src;

        let y0 = &luma.row(y)[x * 2..(x + pixels) * 2];
        let y1 = &luma.row(y + 1)[x * 2..(x + pixels) * 2];
        let u = &u.row(y / 2)[x..x + pixels];
        let v = &v.row(y / 2)[x..x + pixels];

        let (d0, d1) = self.dst.rows_mut2(y);
        let d0 = &mut d0[x * depth..(x + pixels) * depth];
        let d1 = &mut d1[x * depth..(x + pixels) * depth];

        unsafe {
            let cb = V::load_u16(u.as_ptr());
            let cr = V::load_u16(v.as_ptr());

            let (cb_left, cb_right) = cb.zip(cb);
            let (cr_left, cr_right) = cr.zip(cr);

            for (i, (cb, cr)) in [(cb_left, cr_left), (cb_right, cr_right)]
                .into_iter()
                .enumerate()
            {
                let offset = i * V::LEN;

                let top = V::load_u16(y0[offset * 2..].as_ptr());
                let bottom = V::load_u16(y1[offset * 2..].as_ptr());

                let top = self.inverse.rgb10(top, cb, cr, D::BITS);
                let bottom = self.inverse.rgb10(bottom, cb, cr, D::BITS);

                D::store(&mut d0[offset * depth..], top);
                D::store(&mut d1[offset * depth..], bottom);
            }
        }
    }
}

struct P410ToRgb<'a, D> {
    src: [PlaneRef<'a>; MAX_PLANES],
    dst: PlaneMut<'a>,
    inverse: &'static Inverse,
    _m: PhantomData<fn() -> D>,
}

impl<D: RgbWrite> Visitor for P410ToRgb<'_, D> {
    const BLOCK_WIDTH: usize = 1;
    const BLOCK_HEIGHT: usize = 1;

    #[inline(always)]
    unsafe fn visit<V: Vector>(&mut self, x: usize, y: usize) {
        let depth = D::DEPTH;

        let [luma, u, v] = self.src.map(|plane| &plane.row(y)[x * 2..(x + V::LEN) * 2]);
        let dst = &mut self.dst.row_mut(y)[x * depth..(x + V::LEN) * depth];

        unsafe {
            let [luma, cb, cr] = [luma, u, v].map(|samples| V::load_u16(samples.as_ptr()));

            D::store(dst, self.inverse.rgb10(luma, cb, cr, D::BITS));
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{ColorSpace, Context, ImageFormat, InstructionSet, PixelFormat};

    fn samples(values: &[u16]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    fn convert(
        src: ImageFormat,
        dst: PixelFormat,
        width: u32,
        height: u32,
        planes: &[&[u8]],
    ) -> Vec<u8> {
        let context = Context::with_instruction_set(InstructionSet::Generic).unwrap();
        let dst = ImageFormat::new(dst, ColorSpace::LRGB, 1);

        let mut out = vec![0; width as usize * height as usize * 4];

        context
            .convert_image(
                width,
                height,
                &src,
                None,
                planes,
                &dst,
                None,
                &mut [out.as_mut_slice()],
            )
            .unwrap();

        out
    }

    #[test]
    fn p410_white_to_every_destination() {
        let format = ImageFormat::new(PixelFormat::P410, ColorSpace::BT709, 3);

        let y = samples(&[940]);
        let c = samples(&[512]);

        let bgra = convert(format, PixelFormat::BGRA, 1, 1, &[&y, &c, &c]);
        assert_eq!(bgra, [255, 255, 255, 255]);

        let bgra30 = convert(format, PixelFormat::BGRA30, 1, 1, &[&y, &c, &c]);
        assert_eq!(u32::from_le_bytes(bgra30.try_into().unwrap()), u32::MAX);

        let rgba30 = convert(format, PixelFormat::RGBA30, 1, 1, &[&y, &c, &c]);
        assert_eq!(u32::from_le_bytes(rgba30.try_into().unwrap()), u32::MAX);
    }

    #[test]
    fn p010_gray_ignores_upper_bits() {
        let format = ImageFormat::new(PixelFormat::P010, ColorSpace::BT601, 3);

        let y = samples(&[502, 502 | 0xFC00, 64, 64 | 0x8000]);
        let c = samples(&[512 | 0x4000]);

        let out = convert(format, PixelFormat::RGBA30, 2, 2, &[&y, &c, &c]);
        let px: Vec<u32> = out
            .chunks_exact(4)
            .map(|px| u32::from_le_bytes([px[0], px[1], px[2], px[3]]))
            .collect();

        let gray = 511 | (511 << 10) | (511 << 20) | (3 << 30);
        let black = 3 << 30;

        assert_eq!(px, [gray, gray, black, black]);
    }

    #[test]
    fn p010_to_bgra() {
        let format = ImageFormat::new(PixelFormat::P010, ColorSpace::BT709, 1);

        // Y plane, then U and V planes in the same buffer
        let buf = samples(&[502, 502, 940, 940, 512, 512]);

        let out = convert(format, PixelFormat::BGRA, 2, 2, &[&buf]);

        assert_eq!(
            out,
            [128, 128, 128, 255, 128, 128, 128, 255, 255, 255, 255, 255, 255, 255, 255, 255]
        );
    }
}
