//! Operating system and WSL detection.
use std::fmt;

/// Kernel version file consulted for WSL detection.
const PROC_VERSION: &str = "/proc/version";

/// Marker that WSL kernels embed in their version string.
const WSL_MARKER: &str = "microsoft";

/// Detected operating system family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    /// Linux (including WSL).
    Linux,
    /// macOS.
    Darwin,
    /// Anything else; package installation is unsupported here.
    Other,
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linux => write!(f, "linux"),
            Self::Darwin => write!(f, "darwin"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Platform information for the current system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    /// Operating system family.
    pub os: Os,
    /// Whether the Linux kernel is running under WSL.
    pub is_wsl: bool,
}

impl Platform {
    /// Detect the current platform.
    #[must_use]
    pub fn detect() -> Self {
        let os = Self::detect_os();
        Self {
            os,
            is_wsl: os == Os::Linux && Self::detect_wsl(),
        }
    }

    /// Create a platform with explicit values (for testing).
    #[must_use]
    pub const fn new(os: Os, is_wsl: bool) -> Self {
        Self { os, is_wsl }
    }

    /// Whether this is a Linux system.
    #[must_use]
    pub fn is_linux(&self) -> bool {
        self.os == Os::Linux
    }

    /// Whether this is a macOS system.
    #[must_use]
    pub fn is_darwin(&self) -> bool {
        self.os == Os::Darwin
    }

    const fn detect_os() -> Os {
        if cfg!(target_os = "linux") {
            Os::Linux
        } else if cfg!(target_os = "macos") {
            Os::Darwin
        } else {
            Os::Other
        }
    }

    fn detect_wsl() -> bool {
        std::fs::read_to_string(PROC_VERSION).is_ok_and(|v| version_indicates_wsl(&v))
    }
}

/// Return `true` if a kernel version string carries the WSL marker.
#[must_use]
pub fn version_indicates_wsl(version: &str) -> bool {
    version.to_lowercase().contains(WSL_MARKER)
}
