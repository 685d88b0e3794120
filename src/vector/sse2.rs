#![allow(unsafe_op_in_unsafe_fn)]

use super::Vector;
use crate::arch::*;

unsafe impl Vector for __m128i {
    const LEN: usize = 4;

    #[inline(always)]
    unsafe fn splat(v: i32) -> Self {
        _mm_set1_epi32(v)
    }

    #[inline(always)]
    unsafe fn vadd(self, other: Self) -> Self {
        _mm_add_epi32(self, other)
    }

    #[inline(always)]
    unsafe fn vsub(self, other: Self) -> Self {
        _mm_sub_epi32(self, other)
    }

    #[inline(always)]
    unsafe fn vmul(self, other: Self) -> Self {
        // No 32-bit low multiply before SSE4.1, multiply even and odd lanes to 64-bit and
        // gather the low halves
        let even = _mm_mul_epu32(self, other);
        let odd = _mm_mul_epu32(_mm_srli_epi64(self, 32), _mm_srli_epi64(other, 32));

        _mm_unpacklo_epi32(
            _mm_shuffle_epi32(even, 0b00_00_10_00),
            _mm_shuffle_epi32(odd, 0b00_00_10_00),
        )
    }

    #[inline(always)]
    unsafe fn vand(self, other: Self) -> Self {
        _mm_and_si128(self, other)
    }

    #[inline(always)]
    unsafe fn vor(self, other: Self) -> Self {
        _mm_or_si128(self, other)
    }

    #[inline(always)]
    unsafe fn vsra(self, n: u32) -> Self {
        _mm_sra_epi32(self, _mm_cvtsi32_si128(n as i32))
    }

    #[inline(always)]
    unsafe fn vsll(self, n: u32) -> Self {
        _mm_sll_epi32(self, _mm_cvtsi32_si128(n as i32))
    }

    #[inline(always)]
    unsafe fn vclamp(self, max: i32) -> Self {
        let max = _mm_set1_epi32(max);

        let positive = _mm_and_si128(self, _mm_cmpgt_epi32(self, _mm_setzero_si128()));
        let over = _mm_cmpgt_epi32(positive, max);

        _mm_or_si128(_mm_and_si128(over, max), _mm_andnot_si128(over, positive))
    }

    #[inline(always)]
    unsafe fn zip(self, other: Self) -> (Self, Self) {
        (
            _mm_unpacklo_epi32(self, other),
            _mm_unpackhi_epi32(self, other),
        )
    }

    #[inline(always)]
    unsafe fn unzip(self, other: Self) -> (Self, Self) {
        let a = _mm_castsi128_ps(self);
        let b = _mm_castsi128_ps(other);

        (
            _mm_castps_si128(_mm_shuffle_ps(a, b, 0b10_00_10_00)),
            _mm_castps_si128(_mm_shuffle_ps(a, b, 0b11_01_11_01)),
        )
    }

    #[inline(always)]
    unsafe fn load_u8(ptr: *const u8) -> Self {
        let zero = _mm_setzero_si128();
        let v = _mm_cvtsi32_si128(ptr.cast::<i32>().read_unaligned());

        _mm_unpacklo_epi16(_mm_unpacklo_epi8(v, zero), zero)
    }

    #[inline(always)]
    unsafe fn load_u16(ptr: *const u8) -> Self {
        let v = _mm_loadl_epi64(ptr.cast());

        _mm_unpacklo_epi16(v, _mm_setzero_si128())
    }

    #[inline(always)]
    unsafe fn load_u32(ptr: *const u8) -> Self {
        _mm_loadu_si128(ptr.cast())
    }

    #[inline(always)]
    unsafe fn store_u8(self, ptr: *mut u8) {
        let v = _mm_packs_epi32(self, self);
        let v = _mm_packus_epi16(v, v);

        ptr.cast::<i32>().write_unaligned(_mm_cvtsi128_si32(v))
    }

    #[inline(always)]
    unsafe fn store_u32(self, ptr: *mut u8) {
        _mm_storeu_si128(ptr.cast(), self)
    }
}
