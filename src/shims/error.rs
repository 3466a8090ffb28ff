use libc::c_int;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShimError {
    #[error("Cannot map {len} bytes: out of memory")]
    OutOfMemory { len: usize },

    #[error("Cannot map a zero-length region")]
    InvalidLength,

    #[error("Protection {prot:#x} unsupported: blocks are always read-write")]
    ProtectionUnsupported { prot: c_int },

    #[error("Wall clock unavailable")]
    Clock,

    #[error("Unknown protection policy {value}")]
    UnknownPolicy { value: c_int },
}

impl ShimError {
    /// `errno` value reported by the C entry points
    pub fn errno(&self) -> c_int {
        match self {
            ShimError::OutOfMemory { .. } => libc::ENOMEM,
            ShimError::InvalidLength => libc::EINVAL,
            ShimError::ProtectionUnsupported { .. } => libc::EACCES,
            ShimError::Clock => libc::EFAULT,
            ShimError::UnknownPolicy { .. } => libc::EINVAL,
        }
    }
}
