//! C ABI versions of the polyfills, linked in place of the missing libc
//! symbols

use super::{
    ProtectPolicy, ShimError, map_anonymous, protect, set_protect_policy, sleep_for, unmap,
    wall_clock, yield_now,
};
use libc::{c_int, c_void, clockid_t, off_t, size_t, timespec};
use std::ptr::NonNull;
use std::time::Duration;

/// `MAP_FAILED`
const MAP_FAILED: *mut c_void = !0usize as *mut c_void;

const NANOS_PER_SEC: i64 = 1_000_000_000;

#[cfg(any(target_os = "linux", target_os = "emscripten"))]
unsafe fn errno_location() -> *mut c_int {
    libc::__errno_location()
}

#[cfg(any(target_os = "macos", target_os = "ios"))]
unsafe fn errno_location() -> *mut c_int {
    libc::__error()
}

// newlib and bionic
#[cfg(not(any(
    target_os = "linux",
    target_os = "emscripten",
    target_os = "macos",
    target_os = "ios"
)))]
unsafe fn errno_location() -> *mut c_int {
    extern "C" {
        fn __errno() -> *mut c_int;
    }
    __errno()
}

fn fail(err: ShimError) -> c_int {
    unsafe {
        *errno_location() = err.errno();
    }
    -1
}

#[no_mangle]
pub unsafe extern "C" fn mmap(
    _addr: *mut c_void,
    length: size_t,
    _prot: c_int,
    _flags: c_int,
    _fd: c_int,
    _offset: off_t,
) -> *mut c_void {
    match map_anonymous(length) {
        Ok(ptr) => ptr.as_ptr().cast(),
        Err(err) => {
            fail(err);
            MAP_FAILED
        }
    }
}

#[no_mangle]
pub unsafe extern "C" fn munmap(addr: *mut c_void, _length: size_t) -> c_int {
    if let Some(ptr) = NonNull::new(addr.cast::<u8>()) {
        unmap(ptr);
    }
    0
}

#[no_mangle]
pub unsafe extern "C" fn mprotect(_addr: *mut c_void, _len: size_t, prot: c_int) -> c_int {
    match protect(prot) {
        Ok(()) => 0,
        Err(err) => fail(err),
    }
}

/// Choose how `mprotect` answers anything but read-write: 0 ignores it,
/// 1 fails it with `EACCES`
#[no_mangle]
pub extern "C" fn jarshim_set_protect_policy(policy: c_int) -> c_int {
    match ProtectPolicy::try_from(policy) {
        Ok(policy) => {
            set_protect_policy(policy);
            0
        }
        Err(err) => fail(err),
    }
}

#[no_mangle]
pub extern "C" fn sched_yield() -> c_int {
    yield_now();
    0
}

/// Every clock id reads the wall clock
#[no_mangle]
pub unsafe extern "C" fn clock_gettime(_clk_id: clockid_t, tp: *mut timespec) -> c_int {
    let Some(tp) = tp.as_mut() else {
        return fail(ShimError::Clock);
    };

    match wall_clock() {
        Ok(now) => {
            tp.tv_sec = now.as_secs() as _;
            tp.tv_nsec = now.subsec_nanos() as _;
            0
        }
        Err(err) => fail(err),
    }
}

/// Sleeps the whole request; `rmtp` is never written
#[no_mangle]
pub unsafe extern "C" fn nanosleep(rqtp: *const timespec, _rmtp: *mut timespec) -> c_int {
    let Some(request) = rqtp.as_ref() else {
        return fail(ShimError::InvalidLength);
    };

    let nanos = request.tv_nsec as i64;
    if request.tv_sec < 0 || !(0..NANOS_PER_SEC).contains(&nanos) {
        return fail(ShimError::InvalidLength);
    }

    sleep_for(Duration::new(request.tv_sec as u64, nanos as u32));
    0
}
