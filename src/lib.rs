// Public API exports
pub mod launch;
pub mod manifest;
pub mod raw;
pub mod shims;

#[cfg(feature = "jni")]
pub mod ffi;
#[cfg(feature = "jni")]
pub mod jvm;

// Re-export main types for convenience
pub use launch::{
    ConfigError, LaunchConfig, LaunchError, ResolvedLaunch, VmError, VmOptions, VmProvider,
    VmSession, launch, run, run_jar,
};
pub use manifest::{JarArchive, ManifestError, detect_main_class, scan_main_class};
pub use raw::{RawLaunchConfig, run_jar_raw, run_raw};
pub use shims::{ProtectPolicy, ShimError};

#[cfg(feature = "jni")]
pub use jvm::JniProvider;
