//! Host and target platform description.
use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Operating system family a dependency is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lowercase")]
pub enum Os {
    /// Windows.
    Win,
    /// Linux.
    Linux,
    /// macOS.
    Mac,
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Win => write!(f, "win"),
            Self::Linux => write!(f, "linux"),
            Self::Mac => write!(f, "mac"),
        }
    }
}

impl Os {
    /// The operating system this binary was compiled for.
    #[must_use]
    pub const fn detect() -> Self {
        if cfg!(target_os = "windows") {
            Self::Win
        } else if cfg!(target_os = "macos") {
            Self::Mac
        } else {
            // Other Unix-likes consume the Linux artifacts.
            Self::Linux
        }
    }
}

/// CPU architecture a dependency is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lowercase")]
pub enum Arch {
    /// 32-bit x86.
    X86,
    /// 64-bit x86.
    X64,
    /// 64-bit ARM.
    Arm64,
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X86 => write!(f, "x86"),
            Self::X64 => write!(f, "x64"),
            Self::Arm64 => write!(f, "arm64"),
        }
    }
}

impl Arch {
    /// The architecture this binary was compiled for.
    #[must_use]
    pub const fn detect() -> Self {
        if cfg!(target_arch = "x86") {
            Self::X86
        } else if cfg!(target_arch = "aarch64") {
            Self::Arm64
        } else {
            Self::X64
        }
    }
}

/// Resolved host and target platform for one run.
///
/// Manifest entries may restrict themselves to particular target or host
/// platforms; everything else in the engine is platform-agnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Platform ezdeps runs on.
    pub host_platform: Os,
    /// Architecture ezdeps runs on.
    pub host_arch: Arch,
    /// Platform the fetched dependencies are for.
    pub target_platform: Os,
    /// Architecture the fetched dependencies are for.
    pub target_arch: Arch,
}

impl PlatformConfig {
    /// Use the running host for both host and target.
    #[must_use]
    pub const fn detect() -> Self {
        Self {
            host_platform: Os::detect(),
            host_arch: Arch::detect(),
            target_platform: Os::detect(),
            target_arch: Arch::detect(),
        }
    }
}

impl fmt::Display for PlatformConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "host {}-{}, target {}-{}",
            self.host_platform, self.host_arch, self.target_platform, self.target_arch
        )
    }
}
