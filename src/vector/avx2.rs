#![allow(unsafe_op_in_unsafe_fn)]

use super::Vector;
use crate::arch::*;

unsafe impl Vector for __m256i {
    const LEN: usize = 8;

    #[inline(always)]
    unsafe fn splat(v: i32) -> Self {
        _mm256_set1_epi32(v)
    }

    #[inline(always)]
    unsafe fn vadd(self, other: Self) -> Self {
        _mm256_add_epi32(self, other)
    }

    #[inline(always)]
    unsafe fn vsub(self, other: Self) -> Self {
        _mm256_sub_epi32(self, other)
    }

    #[inline(always)]
    unsafe fn vmul(self, other: Self) -> Self {
        _mm256_mullo_epi32(self, other)
    }

    #[inline(always)]
    unsafe fn vand(self, other: Self) -> Self {
        _mm256_and_si256(self, other)
    }

    #[inline(always)]
    unsafe fn vor(self, other: Self) -> Self {
        _mm256_or_si256(self, other)
    }

    #[inline(always)]
    unsafe fn vsra(self, n: u32) -> Self {
        _mm256_sra_epi32(self, _mm_cvtsi32_si128(n as i32))
    }

    #[inline(always)]
    unsafe fn vsll(self, n: u32) -> Self {
        _mm256_sll_epi32(self, _mm_cvtsi32_si128(n as i32))
    }

    #[inline(always)]
    unsafe fn vclamp(self, max: i32) -> Self {
        _mm256_min_epi32(
            _mm256_max_epi32(self, _mm256_setzero_si256()),
            _mm256_set1_epi32(max),
        )
    }

    #[inline(always)]
    unsafe fn zip(self, other: Self) -> (Self, Self) {
        let lo = _mm256_unpacklo_epi32(self, other);
        let hi = _mm256_unpackhi_epi32(self, other);

        (
            _mm256_permute2x128_si256(lo, hi, 0b10_00_00),
            _mm256_permute2x128_si256(lo, hi, 0b11_00_01),
        )
    }

    #[inline(always)]
    unsafe fn unzip(self, other: Self) -> (Self, Self) {
        let a = _mm256_castsi256_ps(self);
        let b = _mm256_castsi256_ps(other);

        let lo = _mm256_castps_si256(_mm256_shuffle_ps(a, b, 0b10_00_10_00));
        let hi = _mm256_castps_si256(_mm256_shuffle_ps(a, b, 0b11_01_11_01));

        (
            _mm256_permute4x64_epi64(lo, 0b11_01_10_00),
            _mm256_permute4x64_epi64(hi, 0b11_01_10_00),
        )
    }

    #[inline(always)]
    unsafe fn load_u8(ptr: *const u8) -> Self {
        _mm256_cvtepu8_epi32(_mm_loadl_epi64(ptr.cast()))
    }

    #[inline(always)]
    unsafe fn load_u16(ptr: *const u8) -> Self {
        _mm256_cvtepu16_epi32(_mm_loadu_si128(ptr.cast()))
    }

    #[inline(always)]
    unsafe fn load_u32(ptr: *const u8) -> Self {
        _mm256_loadu_si256(ptr.cast())
    }

    #[inline(always)]
    unsafe fn store_u8(self, ptr: *mut u8) {
        // Packing works per 128-bit lane, bytes 0..4 and 16..20 hold the result
        let v = _mm256_packs_epi32(self, self);
        let v = _mm256_packus_epi16(v, v);
        let v = _mm256_permutevar8x32_epi32(v, _mm256_setr_epi32(0, 4, 0, 0, 0, 0, 0, 0));

        _mm_storel_epi64(ptr.cast(), _mm256_castsi256_si128(v))
    }

    #[inline(always)]
    unsafe fn store_u32(self, ptr: *mut u8) {
        _mm256_storeu_si256(ptr.cast(), self)
    }
}
