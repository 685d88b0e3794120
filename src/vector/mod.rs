#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub(crate) mod avx2;
pub(crate) mod cpu;
#[cfg(target_arch = "aarch64")]
pub(crate) mod neon;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub(crate) mod sse2;

pub use cpu::{CpuManufacturer, InstructionSet};

#[cfg(target_arch = "aarch64")]
use crate::arch::int32x4_t;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
use crate::arch::{__m128i, __m256i};

/// Lane count of the widest vector
pub(crate) const MAX_LEN: usize = 8;

/// Abstraction over integer SIMD vectors of `i32` lanes and the operations the kernels need
///
/// Every implementation must compute exactly what the `i32` implementation computes for each
/// lane, so every instruction set produces the same bytes.
pub(crate) unsafe trait Vector: Copy + 'static {
    /// How many i32 lanes this vector holds
    const LEN: usize;

    /// Set all lanes to the given value
    unsafe fn splat(v: i32) -> Self;

    unsafe fn vadd(self, other: Self) -> Self;
    #[inline(always)]
    unsafe fn vaddi(self, other: i32) -> Self {
        unsafe { self.vadd(Self::splat(other)) }
    }

    unsafe fn vsub(self, other: Self) -> Self;

    /// Multiply lanes, keeping the low 32 bits of every product
    unsafe fn vmul(self, other: Self) -> Self;
    #[inline(always)]
    unsafe fn vmuli(self, other: i32) -> Self {
        unsafe { self.vmul(Self::splat(other)) }
    }

    unsafe fn vand(self, other: Self) -> Self;
    unsafe fn vor(self, other: Self) -> Self;

    /// Arithmetic shift right of every lane
    unsafe fn vsra(self, n: u32) -> Self;

    /// Shift left of every lane
    unsafe fn vsll(self, n: u32) -> Self;

    /// Clamp every lane to `0..=max`
    unsafe fn vclamp(self, max: i32) -> Self;

    /// Interleave self and other
    ///
    /// Given [a0, a1, a2, a3] and [b0, b1, b2, b3]
    ///
    /// Return [a0, b0, a1, b1] and [a2, b2, a3, b3]
    unsafe fn zip(self, other: Self) -> (Self, Self);

    /// Given [a0, a1, a2, a3] and [b0, b1, b2, b3]
    ///
    /// Return [a0, a2, b0, b2] and [a1, a3, b1, b3]
    unsafe fn unzip(self, other: Self) -> (Self, Self);

    /// Load LEN bytes, zero extended
    ///
    /// # Safety
    ///
    /// Pointer must be valid to read Self::LEN bytes
    unsafe fn load_u8(ptr: *const u8) -> Self;

    /// Load LEN little endian u16, zero extended
    ///
    /// # Safety
    ///
    /// Pointer must be valid to read Self::LEN * 2 bytes
    unsafe fn load_u16(ptr: *const u8) -> Self;

    /// Load LEN little endian u32
    ///
    /// # Safety
    ///
    /// Pointer must be valid to read Self::LEN * 4 bytes
    unsafe fn load_u32(ptr: *const u8) -> Self;

    /// Store the low byte of every lane, lanes must be in `0..=255`
    ///
    /// # Safety
    ///
    /// Pointer must be valid to write Self::LEN bytes
    unsafe fn store_u8(self, ptr: *mut u8);

    /// Store every lane as little endian u32
    ///
    /// # Safety
    ///
    /// Pointer must be valid to write Self::LEN * 4 bytes
    unsafe fn store_u32(self, ptr: *mut u8);
}

unsafe impl Vector for i32 {
    const LEN: usize = 1;

    #[inline(always)]
    unsafe fn splat(v: i32) -> Self {
        v
    }

    #[inline(always)]
    unsafe fn vadd(self, other: Self) -> Self {
        self.wrapping_add(other)
    }

    #[inline(always)]
    unsafe fn vsub(self, other: Self) -> Self {
        self.wrapping_sub(other)
    }

    #[inline(always)]
    unsafe fn vmul(self, other: Self) -> Self {
        self.wrapping_mul(other)
    }

    #[inline(always)]
    unsafe fn vand(self, other: Self) -> Self {
        self & other
    }

    #[inline(always)]
    unsafe fn vor(self, other: Self) -> Self {
        self | other
    }

    #[inline(always)]
    unsafe fn vsra(self, n: u32) -> Self {
        self >> n
    }

    #[inline(always)]
    unsafe fn vsll(self, n: u32) -> Self {
        self.wrapping_shl(n)
    }

    #[inline(always)]
    unsafe fn vclamp(self, max: i32) -> Self {
        self.clamp(0, max)
    }

    #[inline(always)]
    unsafe fn zip(self, other: Self) -> (Self, Self) {
        (self, other)
    }

    #[inline(always)]
    unsafe fn unzip(self, other: Self) -> (Self, Self) {
        (self, other)
    }

    #[inline(always)]
    unsafe fn load_u8(ptr: *const u8) -> Self {
        i32::from(unsafe { ptr.read() })
    }

    #[inline(always)]
    unsafe fn load_u16(ptr: *const u8) -> Self {
        let bytes = unsafe { ptr.cast::<[u8; 2]>().read_unaligned() };
        i32::from(u16::from_le_bytes(bytes))
    }

    #[inline(always)]
    unsafe fn load_u32(ptr: *const u8) -> Self {
        i32::from_le_bytes(unsafe { ptr.cast::<[u8; 4]>().read_unaligned() })
    }

    #[inline(always)]
    unsafe fn store_u8(self, ptr: *mut u8) {
        unsafe { ptr.write(self as u8) }
    }

    #[inline(always)]
    unsafe fn store_u32(self, ptr: *mut u8) {
        unsafe { ptr.cast::<[u8; 4]>().write_unaligned(self.to_le_bytes()) }
    }
}

/// Conversion kernel walking an image in blocks of pixels
pub(crate) trait Visitor {
    const BLOCK_WIDTH: usize;
    const BLOCK_HEIGHT: usize;

    /// Convert `V::LEN` horizontally adjacent blocks starting at pixel `(x, y)`
    ///
    /// # Safety
    ///
    /// The host must support the instruction set `V` is implemented with
    unsafe fn visit<V: Vector>(&mut self, x: usize, y: usize);
}

/// Run the visitor over a `width` x `height` image using kernels compiled for `set`
///
/// `set` must be supported by the host, see [`InstructionSet::is_supported`].
#[inline(never)]
pub(crate) fn execute<R: Visitor>(set: InstructionSet, width: usize, height: usize, visitor: R) {
    debug_assert_eq!(width % R::BLOCK_WIDTH, 0);
    debug_assert_eq!(height % R::BLOCK_HEIGHT, 0);

    match set {
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        InstructionSet::Avx2 => {
            #[target_feature(enable = "avx2")]
            unsafe fn call<R: Visitor>(width: usize, height: usize, visitor: R) {
                unsafe { visit_impl::<__m256i, R>(width, height, visitor) };
            }

            // Safety: Contexts only hold instruction sets that passed a feature check
            unsafe { call(width, height, visitor) }
        }
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        InstructionSet::Sse2 => {
            #[target_feature(enable = "sse2")]
            unsafe fn call<R: Visitor>(width: usize, height: usize, visitor: R) {
                unsafe { visit_impl::<__m128i, R>(width, height, visitor) };
            }

            // Safety: Contexts only hold instruction sets that passed a feature check
            unsafe { call(width, height, visitor) }
        }
        #[cfg(target_arch = "aarch64")]
        InstructionSet::Neon => {
            #[target_feature(enable = "neon")]
            unsafe fn call<R: Visitor>(width: usize, height: usize, visitor: R) {
                unsafe { visit_impl::<int32x4_t, R>(width, height, visitor) };
            }

            // Safety: Contexts only hold instruction sets that passed a feature check
            unsafe { call(width, height, visitor) }
        }
        // Safety: The i32 vector needs no target features
        _ => unsafe { visit_impl::<i32, R>(width, height, visitor) },
    }
}

#[inline(always)]
unsafe fn visit_impl<V: Vector, R: Visitor>(width: usize, height: usize, mut visitor: R) {
    let step = V::LEN * R::BLOCK_WIDTH;

    // How many pixels cannot be vectorized since they don't fit the vector (per row)
    let non_vectored_pixels_per_row = width % step;
    let vectored_pixels_per_row = width - non_vectored_pixels_per_row;

    for y in (0..height).step_by(R::BLOCK_HEIGHT) {
        for x in (0..vectored_pixels_per_row).step_by(step) {
            unsafe { visitor.visit::<V>(x, y) };
        }

        // Process remaining pixels that couldn't be vectorized
        for x in (vectored_pixels_per_row..width).step_by(R::BLOCK_WIDTH) {
            unsafe { visitor.visit::<i32>(x, y) };
        }
    }
}
