//! Byte layouts of the packed RGB family formats

use crate::vector::{MAX_LEN, Vector};

/// Channel offsets of an 8-bit packed format
pub(crate) trait PackedLayout {
    /// Bytes per pixel
    const DEPTH: usize;

    const R: usize;
    const G: usize;
    const B: usize;
    const A: Option<usize>;

    /// Read the R, G and B channels of `V::LEN` pixels at the start of `px`
    #[inline(always)]
    unsafe fn load<V: Vector>(px: &[u8]) -> [V; 3] {
        let px = &px[..V::LEN * Self::DEPTH];

        unsafe {
            let words = if Self::DEPTH == 4 {
                V::load_u32(px.as_ptr())
            } else {
                let mut tmp = [0u8; MAX_LEN * 4];

                for (slot, px) in tmp.chunks_exact_mut(4).zip(px.chunks_exact(Self::DEPTH)) {
                    slot[..Self::DEPTH].copy_from_slice(px);
                }

                V::load_u32(tmp.as_ptr())
            };

            let mask = V::splat(0xFF);

            [Self::R, Self::G, Self::B].map(|offset| words.vsra(offset as u32 * 8).vand(mask))
        }
    }
}

pub(crate) struct Argb;
pub(crate) struct Bgra;
pub(crate) struct Bgr;
pub(crate) struct Rgb;

impl PackedLayout for Argb {
    const DEPTH: usize = 4;
    const R: usize = 1;
    const G: usize = 2;
    const B: usize = 3;
    const A: Option<usize> = Some(0);
}

impl PackedLayout for Bgra {
    const DEPTH: usize = 4;
    const R: usize = 2;
    const G: usize = 1;
    const B: usize = 0;
    const A: Option<usize> = Some(3);
}

impl PackedLayout for Bgr {
    const DEPTH: usize = 3;
    const R: usize = 2;
    const G: usize = 1;
    const B: usize = 0;
    const A: Option<usize> = None;
}

impl PackedLayout for Rgb {
    const DEPTH: usize = 3;
    const R: usize = 0;
    const G: usize = 1;
    const B: usize = 2;
    const A: Option<usize> = None;
}

/// Destination of kernels producing RGB pixels
pub(crate) trait RgbWrite {
    /// Bytes per pixel
    const DEPTH: usize;

    /// Significant bits of every channel passed to `store`
    const BITS: u32;

    /// Store `V::LEN` pixels at the start of `px`, alpha is set to its maximum
    ///
    /// Channels must be in `0..1 << BITS`.
    unsafe fn store<V: Vector>(px: &mut [u8], rgb: [V; 3]);
}

/// Write packed 32-bit pixels, formats with fewer bytes per pixel keep the low bytes of each
#[inline(always)]
unsafe fn store_words<V: Vector>(px: &mut [u8], depth: usize, words: V) {
    let px = &mut px[..V::LEN * depth];

    if depth == 4 {
        unsafe { words.store_u32(px.as_mut_ptr()) };
        return;
    }

    let mut tmp = [0u8; MAX_LEN * 4];
    unsafe { words.store_u32(tmp.as_mut_ptr()) };

    for (px, slot) in px.chunks_exact_mut(depth).zip(tmp.chunks_exact(4)) {
        px.copy_from_slice(&slot[..depth]);
    }
}

impl<P: PackedLayout> RgbWrite for P {
    const DEPTH: usize = <P as PackedLayout>::DEPTH;
    const BITS: u32 = 8;

    #[inline(always)]
    unsafe fn store<V: Vector>(px: &mut [u8], [r, g, b]: [V; 3]) {
        unsafe {
            let mut words = r
                .vsll(P::R as u32 * 8)
                .vor(g.vsll(P::G as u32 * 8))
                .vor(b.vsll(P::B as u32 * 8));

            if let Some(a) = P::A {
                words = words.vor(V::splat(0xFF).vsll(a as u32 * 8));
            }

            store_words(px, <P as PackedLayout>::DEPTH, words);
        }
    }
}

pub(crate) struct Bgra30;
pub(crate) struct Rgba30;

#[inline(always)]
unsafe fn store30<V: Vector>(px: &mut [u8], low: V, mid: V, high: V) {
    unsafe {
        let words = low
            .vor(mid.vsll(10))
            .vor(high.vsll(20))
            .vor(V::splat(0b11).vsll(30));

        store_words(px, 4, words);
    }
}

impl RgbWrite for Bgra30 {
    const DEPTH: usize = 4;
    const BITS: u32 = 10;

    #[inline(always)]
    unsafe fn store<V: Vector>(px: &mut [u8], [r, g, b]: [V; 3]) {
        unsafe { store30(px, b, g, r) };
    }
}

impl RgbWrite for Rgba30 {
    const DEPTH: usize = 4;
    const BITS: u32 = 10;

    #[inline(always)]
    unsafe fn store<V: Vector>(px: &mut [u8], [r, g, b]: [V; 3]) {
        unsafe { store30(px, r, g, b) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read<P: PackedLayout>(px: &[u8]) -> [i32; 3] {
        unsafe { P::load::<i32>(px) }
    }

    fn write<D: RgbWrite>(px: &mut [u8], rgb: [i32; 3]) {
        unsafe { D::store::<i32>(px, rgb) }
    }

    #[test]
    fn channel_offsets() {
        let px = [10, 20, 30, 40];

        assert_eq!(read::<Argb>(&px), [20, 30, 40]);
        assert_eq!(read::<Bgra>(&px), [30, 20, 10]);
        assert_eq!(read::<Bgr>(&px), [30, 20, 10]);
        assert_eq!(read::<Rgb>(&px), [10, 20, 30]);

        // High channels must not sign extend
        assert_eq!(read::<Argb>(&[0, 0, 0, 200]), [0, 0, 200]);
    }

    #[test]
    fn write_synthesizes_alpha() {
        let mut px = [0u8; 4];
        write::<Bgra>(&mut px, [1, 2, 3]);
        assert_eq!(px, [3, 2, 1, 255]);

        let mut px = [0u8; 4];
        write::<Argb>(&mut px, [1, 2, 3]);
        assert_eq!(px, [255, 1, 2, 3]);

        let mut px = [7u8; 4];
        write::<Rgb>(&mut px, [1, 2, 3]);
        assert_eq!(px, [1, 2, 3, 7]);
    }

    #[test]
    fn write_30bit() {
        let mut px = [0u8; 4];
        write::<Bgra30>(&mut px, [1023, 0, 1]);
        assert_eq!(u32::from_le_bytes(px), 1 | (1023 << 20) | (3 << 30));

        write::<Rgba30>(&mut px, [1023, 512, 1]);
        assert_eq!(
            u32::from_le_bytes(px),
            1023 | (512 << 10) | (1 << 20) | (3 << 30)
        );
    }
}
