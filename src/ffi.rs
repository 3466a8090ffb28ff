//! C entry points declared in `include/jarshim.h`

use crate::jvm::JniProvider;
use crate::raw::{RawLaunchConfig, run_jar_raw, run_raw};
use std::ffi::{c_char, c_int};

/// Launch with a full configuration. Returns 0, or -1 on any failure.
///
/// # Safety
/// See [`LaunchConfig::from_raw`](crate::LaunchConfig::from_raw).
#[no_mangle]
pub unsafe extern "C" fn jarshim_run(config: *const RawLaunchConfig) -> c_int {
    run_raw(&JniProvider, config)
}

/// Launch a jar, taking the entry class from its manifest
///
/// # Safety
/// `jar_path` must be null or NUL-terminated, and `argv` must hold `argc`
/// strings when non-null.
#[no_mangle]
pub unsafe extern "C" fn jarshim_run_jar(
    jar_path: *const c_char,
    argc: c_int,
    argv: *const *const c_char,
) -> c_int {
    run_jar_raw(&JniProvider, jar_path, argc, argv)
}
