use std::fmt;

/// Vendor of the CPU the process runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CpuManufacturer {
    Intel,
    Amd,
    Unknown,
}

impl CpuManufacturer {
    pub fn detect() -> Self {
        #[cfg(target_arch = "x86_64")]
        {
            use crate::arch::__cpuid;

            // Safety: cpuid is always available on x86_64
            #[allow(unused_unsafe)]
            let leaf = unsafe { __cpuid(0) };

            let mut vendor = [0u8; 12];
            vendor[..4].copy_from_slice(&leaf.ebx.to_le_bytes());
            vendor[4..8].copy_from_slice(&leaf.edx.to_le_bytes());
            vendor[8..].copy_from_slice(&leaf.ecx.to_le_bytes());

            match &vendor {
                b"GenuineIntel" => CpuManufacturer::Intel,
                b"AuthenticAMD" => CpuManufacturer::Amd,
                _ => CpuManufacturer::Unknown,
            }
        }

        #[cfg(not(target_arch = "x86_64"))]
        CpuManufacturer::Unknown
    }
}

impl fmt::Display for CpuManufacturer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CpuManufacturer::Intel => f.write_str("Intel"),
            CpuManufacturer::Amd => f.write_str("AMD"),
            CpuManufacturer::Unknown => f.write_str("Unknown"),
        }
    }
}

/// Kernel variant family used for conversions
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InstructionSet {
    /// Portable code, no target features enabled
    Generic,
    Sse2,
    Avx2,
    Neon,
}

impl InstructionSet {
    pub fn variants() -> impl IntoIterator<Item = Self> {
        [
            InstructionSet::Generic,
            InstructionSet::Sse2,
            InstructionSet::Avx2,
            InstructionSet::Neon,
        ]
    }

    /// Best instruction set the host supports
    pub fn detect() -> Self {
        [
            InstructionSet::Avx2,
            InstructionSet::Neon,
            InstructionSet::Sse2,
        ]
        .into_iter()
        .find(|set| set.is_supported())
        .unwrap_or(InstructionSet::Generic)
    }

    /// Returns true if the host can run kernels compiled for this instruction set
    pub fn is_supported(self) -> bool {
        match self {
            InstructionSet::Generic => true,
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            InstructionSet::Sse2 => is_x86_feature_detected!("sse2"),
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            InstructionSet::Avx2 => is_x86_feature_detected!("avx2"),
            #[cfg(target_arch = "aarch64")]
            InstructionSet::Neon => std::arch::is_aarch64_feature_detected!("neon"),
            _ => false,
        }
    }
}

impl fmt::Display for InstructionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstructionSet::Generic => f.write_str("Generic"),
            InstructionSet::Sse2 => f.write_str("Sse2"),
            InstructionSet::Avx2 => f.write_str("Avx2"),
            InstructionSet::Neon => f.write_str("Neon"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detected_set_is_supported() {
        let set = InstructionSet::detect();

        assert!(set.is_supported());
        assert!(InstructionSet::Generic.is_supported());
    }

    #[test]
    fn foreign_sets_unsupported() {
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        assert!(!InstructionSet::Neon.is_supported());

        #[cfg(target_arch = "aarch64")]
        {
            assert!(!InstructionSet::Avx2.is_supported());
            assert!(!InstructionSet::Sse2.is_supported());
        }
    }

    #[test]
    fn display() {
        assert_eq!(InstructionSet::Avx2.to_string(), "Avx2");
        assert_eq!(CpuManufacturer::Intel.to_string(), "Intel");
        assert_eq!(CpuManufacturer::Amd.to_string(), "AMD");
    }
}
