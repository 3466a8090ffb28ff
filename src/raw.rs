//! C-shaped launch configuration for embedders linking the static library

use crate::launch::{EXIT_FAILURE, LaunchConfig, VmProvider, run};
use log::warn;
use std::ffi::{CStr, c_char, c_int};

/// Launch configuration as laid out in `include/jarshim.h`
///
/// All pointers may be null. Strings are NUL-terminated and only borrowed
/// for the duration of the call.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawLaunchConfig {
    /// Entry class; may be null when `jar_path` is set
    pub main_class: *const c_char,
    /// Jar whose manifest names the entry class
    pub jar_path: *const c_char,
    /// Class path, `.` when null; replaced by `jar_path` when that is set
    pub class_path: *const c_char,
    /// Arguments forwarded to the guest `main`
    pub app_argv: *const *const c_char,
    pub app_argc: c_int,
    /// Additional `-X`/`-D` VM options
    pub extra_vm_options: *const *const c_char,
    pub extra_vm_option_count: usize,
}

impl Default for RawLaunchConfig {
    fn default() -> Self {
        Self {
            main_class: std::ptr::null(),
            jar_path: std::ptr::null(),
            class_path: std::ptr::null(),
            app_argv: std::ptr::null(),
            app_argc: 0,
            extra_vm_options: std::ptr::null(),
            extra_vm_option_count: 0,
        }
    }
}

unsafe fn opt_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        None
    } else {
        Some(CStr::from_ptr(ptr).to_string_lossy().into_owned())
    }
}

/// Copy `len` strings out of a C array; a null array reads as empty and a
/// null element as `""`
unsafe fn string_list(list: *const *const c_char, len: usize) -> Vec<String> {
    if list.is_null() {
        return Vec::new();
    }

    std::slice::from_raw_parts(list, len)
        .iter()
        .map(|&item| opt_string(item).unwrap_or_default())
        .collect()
}

fn arg_count(argc: c_int, argv: *const *const c_char) -> usize {
    if argv.is_null() || argc <= 0 {
        0
    } else {
        argc as usize
    }
}

impl LaunchConfig {
    /// Copy a C configuration into an owned one
    ///
    /// # Safety
    /// Every non-null pointer must reference a NUL-terminated string, and
    /// the argument and option arrays must hold at least as many elements as
    /// their counts claim.
    pub unsafe fn from_raw(raw: &RawLaunchConfig) -> Self {
        Self {
            main_class: opt_string(raw.main_class),
            jar_path: opt_string(raw.jar_path),
            class_path: opt_string(raw.class_path),
            args: string_list(raw.app_argv, arg_count(raw.app_argc, raw.app_argv)),
            vm_options: string_list(raw.extra_vm_options, raw.extra_vm_option_count),
        }
    }
}

/// [`run`] over a C configuration; a null configuration fails with -1
///
/// # Safety
/// `config` must be null or point at a valid [`RawLaunchConfig`], see
/// [`LaunchConfig::from_raw`].
pub unsafe fn run_raw<P: VmProvider>(provider: &P, config: *const RawLaunchConfig) -> c_int {
    match config.as_ref() {
        Some(raw) => run(provider, &LaunchConfig::from_raw(raw)),
        None => {
            warn!("launch called without a configuration");
            EXIT_FAILURE
        }
    }
}

/// Launch a jar given C-style `argc`/`argv`
///
/// # Safety
/// Same requirements as [`LaunchConfig::from_raw`].
pub unsafe fn run_jar_raw<P: VmProvider>(
    provider: &P,
    jar_path: *const c_char,
    argc: c_int,
    argv: *const *const c_char,
) -> c_int {
    let config = RawLaunchConfig {
        jar_path,
        app_argc: argc,
        app_argv: argv,
        ..RawLaunchConfig::default()
    };
    run_raw(provider, &config)
}
