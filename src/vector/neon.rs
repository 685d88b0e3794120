#![allow(unsafe_op_in_unsafe_fn)]

use super::Vector;
use crate::arch::*;

unsafe impl Vector for int32x4_t {
    const LEN: usize = 4;

    #[inline(always)]
    unsafe fn splat(v: i32) -> Self {
        vdupq_n_s32(v)
    }

    #[inline(always)]
    unsafe fn vadd(self, other: Self) -> Self {
        vaddq_s32(self, other)
    }

    #[inline(always)]
    unsafe fn vsub(self, other: Self) -> Self {
        vsubq_s32(self, other)
    }

    #[inline(always)]
    unsafe fn vmul(self, other: Self) -> Self {
        vmulq_s32(self, other)
    }

    #[inline(always)]
    unsafe fn vand(self, other: Self) -> Self {
        vandq_s32(self, other)
    }

    #[inline(always)]
    unsafe fn vor(self, other: Self) -> Self {
        vorrq_s32(self, other)
    }

    #[inline(always)]
    unsafe fn vsra(self, n: u32) -> Self {
        // Negative shift counts shift right, arithmetic for signed lanes
        vshlq_s32(self, vdupq_n_s32(-(n as i32)))
    }

    #[inline(always)]
    unsafe fn vsll(self, n: u32) -> Self {
        vshlq_s32(self, vdupq_n_s32(n as i32))
    }

    #[inline(always)]
    unsafe fn vclamp(self, max: i32) -> Self {
        vminq_s32(vmaxq_s32(self, vdupq_n_s32(0)), vdupq_n_s32(max))
    }

    #[inline(always)]
    unsafe fn zip(self, other: Self) -> (Self, Self) {
        (vzip1q_s32(self, other), vzip2q_s32(self, other))
    }

    #[inline(always)]
    unsafe fn unzip(self, other: Self) -> (Self, Self) {
        (vuzp1q_s32(self, other), vuzp2q_s32(self, other))
    }

    #[inline(always)]
    unsafe fn load_u8(ptr: *const u8) -> Self {
        let v = vreinterpret_u8_u32(vdup_n_u32(ptr.cast::<u32>().read_unaligned()));
        let v = vget_low_u16(vmovl_u8(v));

        vreinterpretq_s32_u32(vmovl_u16(v))
    }

    #[inline(always)]
    unsafe fn load_u16(ptr: *const u8) -> Self {
        let v = vreinterpret_u16_u8(vld1_u8(ptr));

        vreinterpretq_s32_u32(vmovl_u16(v))
    }

    #[inline(always)]
    unsafe fn load_u32(ptr: *const u8) -> Self {
        vreinterpretq_s32_u8(vld1q_u8(ptr))
    }

    #[inline(always)]
    unsafe fn store_u8(self, ptr: *mut u8) {
        let v = vqmovn_s32(self);
        let v = vqmovun_s16(vcombine_s16(v, v));

        ptr.cast::<u32>()
            .write_unaligned(vget_lane_u32::<0>(vreinterpret_u32_u8(v)))
    }

    #[inline(always)]
    unsafe fn store_u32(self, ptr: *mut u8) {
        vst1q_u8(ptr, vreinterpretq_u8_s32(self))
    }
}
