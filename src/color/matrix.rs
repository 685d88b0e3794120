//! Fixed point coefficients used by the conversion kernels
//!
//! All coefficients carry 16 fractional bits. They are derived from the luma weights of each
//! standard in studio range and rounded so that every chroma row sums to exactly zero.

use crate::vector::Vector;

/// RGB -> YCbCr coefficients, columns are R, G, B
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Forward {
    pub(crate) y: [i32; 3],
    pub(crate) cb: [i32; 3],
    pub(crate) cr: [i32; 3],
}

/// YCbCr -> RGB coefficients
///
/// `G` subtracts `gcr` and `gcb`, every other term is added.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Inverse {
    pub(crate) ym: i32,
    pub(crate) rcr: i32,
    pub(crate) gcr: i32,
    pub(crate) gcb: i32,
    pub(crate) bcb: i32,
}

pub(crate) const SHIFT: u32 = 16;
pub(crate) const ROUND: i32 = 1 << (SHIFT - 1);

pub(crate) const BT601_FORWARD: Forward = Forward {
    y: [16829, 33039, 6416],
    cb: [-9714, -19071, 28785],
    cr: [28784, -24103, -4681],
};

pub(crate) const BT709_FORWARD: Forward = Forward {
    y: [11966, 40254, 4064],
    cb: [-6596, -22189, 28785],
    cr: [28784, -26145, -2639],
};

pub(crate) const BT601_INVERSE: Inverse = Inverse {
    ym: 76309,
    rcr: 104597,
    gcr: 53279,
    gcb: 25675,
    bcb: 132201,
};

pub(crate) const BT709_INVERSE: Inverse = Inverse {
    ym: 76309,
    rcr: 117489,
    gcr: 34925,
    gcb: 13975,
    bcb: 138438,
};

/// 10-bit studio range (Y 64..940, C 64..960) to 10-bit full range
pub(crate) const BT601_INVERSE_10BIT: Inverse = Inverse {
    ym: 76533,
    rcr: 104905,
    gcr: 53435,
    gcb: 25750,
    bcb: 132590,
};

pub(crate) const BT709_INVERSE_10BIT: Inverse = Inverse {
    ym: 76533,
    rcr: 117835,
    gcr: 35027,
    gcb: 14017,
    bcb: 138846,
};

impl Forward {
    #[inline(always)]
    pub(crate) unsafe fn luma<V: Vector>(&self, [r, g, b]: [V; 3]) -> V {
        let [wr, wg, wb] = self.y;

        unsafe {
            r.vmuli(wr)
                .vadd(g.vmuli(wg))
                .vadd(b.vmuli(wb))
                .vaddi((16 << SHIFT) + ROUND)
                .vsra(SHIFT)
                .vclamp(255)
        }
    }

    /// Chroma of the sum of `1 << sum_bits` pixels
    #[inline(always)]
    pub(crate) unsafe fn chroma<V: Vector>(&self, [r, g, b]: [V; 3], sum_bits: u32) -> (V, V) {
        let shift = SHIFT + sum_bits;
        let bias = (128 << shift) + (1 << (shift - 1));

        let [cbr, cbg, cbb] = self.cb;
        let [crr, crg, crb] = self.cr;

        unsafe {
            let cb = r.vmuli(cbr).vadd(g.vmuli(cbg)).vadd(b.vmuli(cbb));
            let cr = r.vmuli(crr).vadd(g.vmuli(crg)).vadd(b.vmuli(crb));

            (
                cb.vaddi(bias).vsra(shift).vclamp(255),
                cr.vaddi(bias).vsra(shift).vclamp(255),
            )
        }
    }
}

impl Inverse {
    /// Returns (R, G, B) shifted right by `shift` and clamped to `0..=max`
    ///
    /// `y`, `cb`, `cr` must already have their offsets removed.
    #[inline(always)]
    pub(crate) unsafe fn rgb<V: Vector>(
        &self,
        y: V,
        cb: V,
        cr: V,
        shift: u32,
        max: i32,
    ) -> [V; 3] {
        let round = 1 << (shift - 1);

        unsafe {
            let y = y.vmuli(self.ym).vaddi(round);

            let r = y.vadd(cr.vmuli(self.rcr));
            let g = y.vsub(cr.vmuli(self.gcr)).vsub(cb.vmuli(self.gcb));
            let b = y.vadd(cb.vmuli(self.bcb));

            [r, g, b].map(|c| c.vsra(shift).vclamp(max))
        }
    }

    /// Convert 8-bit samples to 8-bit RGB
    #[inline(always)]
    pub(crate) unsafe fn rgb8<V: Vector>(&self, y: V, cb: V, cr: V) -> [V; 3] {
        unsafe { self.rgb(y.vaddi(-16), cb.vaddi(-128), cr.vaddi(-128), SHIFT, 255) }
    }

    /// Convert 10-bit samples, `out_bits` must be 8 or 10
    ///
    /// Bits above the lowest ten are ignored.
    #[inline(always)]
    pub(crate) unsafe fn rgb10<V: Vector>(&self, y: V, cb: V, cr: V, out_bits: u32) -> [V; 3] {
        let shift = SHIFT + (10 - out_bits);
        let max = (1 << out_bits) - 1;

        unsafe {
            let mask = V::splat(0x3FF);

            self.rgb(
                y.vand(mask).vaddi(-64),
                cb.vand(mask).vaddi(-512),
                cr.vand(mask).vaddi(-512),
                shift,
                max,
            )
        }
    }
}
