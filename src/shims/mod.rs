//! Stand-ins for the POSIX memory, scheduling and clock calls the handheld
//! libc lacks
//!
//! The functions here are the safe(ish) Rust core. With the `export-shims`
//! feature, or when building for the Vita, [`exports`] publishes them under
//! their C names for the VM to link against.

mod error;

#[cfg(any(feature = "export-shims", target_os = "vita"))]
pub mod exports;


pub use error::ShimError;

use libc::c_int;
use std::ptr::NonNull;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

pub const PROT_NONE: c_int = 0x0;
pub const PROT_READ: c_int = 0x1;
pub const PROT_WRITE: c_int = 0x2;
pub const PROT_EXEC: c_int = 0x4;

/// Longest single `usleep`; some libcs reject a full second or more
const MAX_USLEEP: u64 = 999_999;

/// Allocate a zeroed, read-write block standing in for an anonymous mapping
///
/// Protection, flags, descriptor and offset of a real `mmap` have no
/// counterpart: the block is never file-backed.
pub fn map_anonymous(len: usize) -> Result<NonNull<u8>, ShimError> {
    if len == 0 {
        return Err(ShimError::InvalidLength);
    }

    let ptr = unsafe { libc::calloc(1, len) } as *mut u8;
    NonNull::new(ptr).ok_or(ShimError::OutOfMemory { len })
}

/// Release a block from [`map_anonymous`]
///
/// # Safety
/// `ptr` must come from [`map_anonymous`] and not have been released yet.
pub unsafe fn unmap(ptr: NonNull<u8>) {
    libc::free(ptr.as_ptr().cast());
}

/// What a protection change does when the block cannot honor it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ProtectPolicy {
    /// Report success and leave the block read-write
    Ignore = 0,
    /// Fail anything other than read-write
    Reject = 1,
}

impl TryFrom<c_int> for ProtectPolicy {
    type Error = ShimError;

    fn try_from(value: c_int) -> Result<Self, ShimError> {
        match value {
            0 => Ok(ProtectPolicy::Ignore),
            1 => Ok(ProtectPolicy::Reject),
            _ => Err(ShimError::UnknownPolicy { value }),
        }
    }
}

static PROTECT_POLICY: AtomicU8 = AtomicU8::new(ProtectPolicy::Ignore as u8);

/// Policy used by the exported `mprotect`
pub fn protect_policy() -> ProtectPolicy {
    match PROTECT_POLICY.load(Ordering::Relaxed) {
        1 => ProtectPolicy::Reject,
        _ => ProtectPolicy::Ignore,
    }
}

pub fn set_protect_policy(policy: ProtectPolicy) {
    PROTECT_POLICY.store(policy as u8, Ordering::Relaxed);
}

/// Change protection under the current [`protect_policy`]
pub fn protect(prot: c_int) -> Result<(), ShimError> {
    protect_with(protect_policy(), prot)
}

/// Blocks are always read-write; `Ignore` pretends any request worked
pub fn protect_with(policy: ProtectPolicy, prot: c_int) -> Result<(), ShimError> {
    match policy {
        ProtectPolicy::Ignore => Ok(()),
        ProtectPolicy::Reject if prot == PROT_READ | PROT_WRITE => Ok(()),
        ProtectPolicy::Reject => Err(ShimError::ProtectionUnsupported { prot }),
    }
}

#[cfg(target_os = "vita")]
extern "C" {
    fn sceKernelDelayThread(delay: u32) -> c_int;
}

/// Give up the CPU briefly
pub fn yield_now() {
    #[cfg(target_os = "vita")]
    unsafe {
        sceKernelDelayThread(0);
    }

    #[cfg(not(target_os = "vita"))]
    unsafe {
        libc::usleep(0);
    }
}

/// Time since the Unix epoch, read from the wall clock
///
/// This backs the emulated `CLOCK_MONOTONIC` too, so it is not monotonic:
/// it moves whenever the system clock is adjusted.
pub fn wall_clock() -> Result<Duration, ShimError> {
    let mut tv: libc::timeval = unsafe { std::mem::zeroed() };

    if unsafe { libc::gettimeofday(&mut tv, std::ptr::null_mut()) } != 0 {
        return Err(ShimError::Clock);
    }

    let secs = u64::try_from(tv.tv_sec).map_err(|_| ShimError::Clock)?;
    let micros = u32::try_from(tv.tv_usec).map_err(|_| ShimError::Clock)?;
    Ok(Duration::new(secs, micros * 1_000))
}

/// Whole microseconds in `duration`; sub-microsecond remainders are dropped
///
/// Saturates at `u64::MAX`, which [`sleep_for`] treats as forever in practice.
pub fn to_micros(duration: Duration) -> u64 {
    duration
        .as_secs()
        .saturating_mul(1_000_000)
        .saturating_add(u64::from(duration.subsec_nanos() / 1_000))
}

/// Block for `duration`, at microsecond resolution
pub fn sleep_for(duration: Duration) {
    let mut remaining = to_micros(duration);
    while remaining > 0 {
        let slice = remaining.min(MAX_USLEEP);
        unsafe {
            libc::usleep(slice as _);
        }
        remaining -= slice;
    }
}
