//! CPU capability detection.
//!
//! Features are probed once, on first use, and never change afterwards. With
//! the `std` feature the probe happens at runtime; without it, only the target
//! features enabled at compile time are considered. The `force-soft` feature
//! reports no capabilities at all, which routes every operation to the
//! portable backend.

/// Hardware AES capabilities of the running CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CpuFeatures {
    /// x86-64 AES-NI (`aes`).
    pub has_aes_ni: bool,
    /// AArch64 NEON with the AES crypto extension.
    pub has_arm_crypto: bool,
    /// x86-64 vector AES (`vaes`).
    pub has_vaes: bool,
    /// x86-64 AVX2.
    pub has_avx2: bool,
    /// x86-64 AVX-512 Foundation.
    pub has_avx512: bool,
}

impl CpuFeatures {
    /// Whether single-block AES instructions are available.
    #[inline]
    pub const fn use_hardware_acceleration(&self) -> bool {
        self.has_aes_ni || self.has_arm_crypto
    }

    /// Whether multi-block vector AES instructions are available.
    #[inline]
    pub const fn use_vector_acceleration(&self) -> bool {
        self.has_vaes && (self.has_avx2 || self.has_avx512)
    }

    /// VAES on 256-bit registers (two blocks per instruction).
    #[inline]
    pub(crate) const fn lanes2_vector(&self) -> bool {
        self.has_vaes && self.has_avx2
    }

    /// VAES on 512-bit registers (four blocks per instruction).
    #[inline]
    pub(crate) const fn lanes4_vector(&self) -> bool {
        self.has_vaes && self.has_avx2 && self.has_avx512
    }

    /// Number of blocks worth processing together on this CPU.
    ///
    /// Returns 4 with 512-bit VAES or ARM Crypto, 2 with 256-bit VAES or plain
    /// AES-NI, and 1 without hardware support.
    pub const fn optimal_parallel_blocks(&self) -> usize {
        if self.lanes4_vector() {
            4
        } else if self.lanes2_vector() {
            2
        } else if self.has_arm_crypto {
            4
        } else if self.has_aes_ni {
            2
        } else {
            1
        }
    }

    /// Probes the running CPU.
    #[cfg(all(feature = "std", not(feature = "force-soft")))]
    pub fn detect() -> Self {
        #[allow(unused_mut)]
        let mut features = Self::default();

        #[cfg(target_arch = "x86_64")]
        {
            features.has_aes_ni = std::arch::is_x86_feature_detected!("aes")
                && std::arch::is_x86_feature_detected!("sse2");
            features.has_avx2 = std::arch::is_x86_feature_detected!("avx2");
            features.has_avx512 = std::arch::is_x86_feature_detected!("avx512f");
            features.has_vaes = std::arch::is_x86_feature_detected!("vaes");
        }

        #[cfg(target_arch = "aarch64")]
        {
            features.has_arm_crypto = std::arch::is_aarch64_feature_detected!("neon")
                && std::arch::is_aarch64_feature_detected!("aes");
        }

        features
    }

    /// Probes the running CPU. Always empty with `force-soft`.
    #[cfg(all(feature = "std", feature = "force-soft"))]
    pub fn detect() -> Self {
        Self::default()
    }

    /// Capabilities enabled at compile time through `target_feature`.
    pub const fn compile_time() -> Self {
        if cfg!(feature = "force-soft") {
            return Self {
                has_aes_ni: false,
                has_arm_crypto: false,
                has_vaes: false,
                has_avx2: false,
                has_avx512: false,
            };
        }
        Self {
            has_aes_ni: cfg!(all(target_arch = "x86_64", target_feature = "aes")),
            has_arm_crypto: cfg!(all(
                target_arch = "aarch64",
                target_feature = "neon",
                target_feature = "aes"
            )),
            has_vaes: cfg!(all(target_arch = "x86_64", target_feature = "vaes")),
            has_avx2: cfg!(all(target_arch = "x86_64", target_feature = "avx2")),
            has_avx512: cfg!(all(target_arch = "x86_64", target_feature = "avx512f")),
        }
    }
}

#[cfg(feature = "std")]
#[cold]
fn init_cpu_features() -> CpuFeatures {
    let features = CpuFeatures::detect();
    log::debug!(
        "aes-rounds: aes_ni={} arm_crypto={} vaes={} avx2={} avx512={} parallel_blocks={}",
        features.has_aes_ni,
        features.has_arm_crypto,
        features.has_vaes,
        features.has_avx2,
        features.has_avx512,
        features.optimal_parallel_blocks(),
    );
    features
}

/// Detected capabilities, probed on the first call.
#[cfg(feature = "std")]
#[inline]
pub fn cpu_features() -> &'static CpuFeatures {
    static CPU_FEATURES: std::sync::OnceLock<CpuFeatures> = std::sync::OnceLock::new();
    CPU_FEATURES.get_or_init(init_cpu_features)
}

/// Capabilities enabled at compile time.
#[cfg(not(feature = "std"))]
#[inline]
pub fn cpu_features() -> &'static CpuFeatures {
    static CPU_FEATURES: CpuFeatures = CpuFeatures::compile_time();
    &CPU_FEATURES
}

/// Shorthand for `cpu_features().use_hardware_acceleration()`.
#[inline]
pub fn use_hardware_acceleration() -> bool {
    cpu_features().use_hardware_acceleration()
}

/// Shorthand for `cpu_features().use_vector_acceleration()`.
#[inline]
pub fn use_vector_acceleration() -> bool {
    cpu_features().use_vector_acceleration()
}

/// Shorthand for `cpu_features().optimal_parallel_blocks()`.
#[inline]
pub fn optimal_parallel_blocks() -> usize {
    cpu_features().optimal_parallel_blocks()
}

/// Name of the backend the dispatched operations use, e.g. `"aes-ni+vaes256"`.
pub fn backend_name() -> &'static str {
    crate::intrinsics::Engine::current().name()
}
