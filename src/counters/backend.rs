// uarch-bench - Free and Open Source Software Statement
//
// This project, uarch-bench, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/counters/backend.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file defines the seam between a CounterSet and the kernel counter
// facility, and the perf_event_open implementation used in production.
//
// Tree Location:
// - src/counters/backend.rs (counter backend trait + perf_event_open backend)
// - Depends on: libc, log

use crate::counters::event::CounterDescriptor;
use crate::counters::sample::{SAMPLE_BYTES, Sample};
use log::debug;
use std::io;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd, RawFd};

const LOG_TARGET: &str = "uarch_bench::counters::perf";

/// Operations a CounterSet needs from the counter facility.
///
/// `Resource` owns one open counter and releases it when dropped. Group
/// operations are always issued on the leader and apply to every sibling
/// opened against it.
pub trait CounterBackend {
    type Resource;

    /// Open a counter. `leader` is `None` for the first counter of a set and
    /// the group leader for every later one.
    fn open(
        &self,
        descriptor: &CounterDescriptor,
        leader: Option<&Self::Resource>,
    ) -> io::Result<Self::Resource>;

    fn reset_group(&self, leader: &Self::Resource) -> io::Result<()>;

    fn enable_group(&self, leader: &Self::Resource) -> io::Result<()>;

    fn disable_group(&self, leader: &Self::Resource) -> io::Result<()>;

    /// Read one sample into `sample`, returning the number of bytes the
    /// facility produced. Anything short of [`SAMPLE_BYTES`] is a short read.
    fn read_sample(&self, resource: &Self::Resource, sample: &mut Sample) -> io::Result<usize>;
}

/// perf_event_attr structure (fields up to config3).
#[repr(C)]
#[derive(Debug, Default)]
struct PerfEventAttr {
    type_: u32,
    size: u32,
    config: u64,
    sample_period: u64,
    sample_type: u64,
    read_format: u64,
    flags: u64,
    wakeup_events: u32,
    bp_type: u32,
    config1: u64,
    config2: u64,
    branch_sample_type: u64,
    sample_regs_user: u64,
    sample_stack_user: u32,
    clockid: i32,
    sample_regs_intr: u64,
    aux_watermark: u32,
    sample_max_stack: u16,
    __reserved_2: u16,
    aux_sample_size: u32,
    __reserved_3: u32,
    sig_data: u64,
    config3: u64,
}

const FLAG_DISABLED: u64 = 1 << 0;
const FLAG_INHERIT: u64 = 1 << 1;
const PERF_FORMAT_TOTAL_TIME_ENABLED: u64 = 1 << 0;
const PERF_FORMAT_TOTAL_TIME_RUNNING: u64 = 1 << 1;
const PERF_FLAG_FD_CLOEXEC: libc::c_ulong = 1 << 3;
const PERF_EVENT_IOC_ENABLE: libc::c_ulong = 0x2400;
const PERF_EVENT_IOC_DISABLE: libc::c_ulong = 0x2401;
const PERF_EVENT_IOC_RESET: libc::c_ulong = 0x2403;
const PERF_IOC_FLAG_GROUP: libc::c_ulong = 1;

/// One open perf counter. Closed on drop.
#[derive(Debug)]
pub struct PerfCounterFd {
    fd: OwnedFd,
}

impl AsRawFd for PerfCounterFd {
    fn as_raw_fd(&self) -> RawFd {
        self.fd.as_raw_fd()
    }
}

/// Counts for the calling thread (and threads it spawns) on any CPU,
/// user and kernel mode included.
#[derive(Debug, Default, Clone, Copy)]
pub struct PerfBackend;

impl PerfBackend {
    pub fn new() -> Self {
        Self
    }

    fn attr_for(descriptor: &CounterDescriptor) -> PerfEventAttr {
        PerfEventAttr {
            type_: descriptor.encoding.kind,
            size: std::mem::size_of::<PerfEventAttr>() as u32,
            config: descriptor.encoding.config,
            read_format: PERF_FORMAT_TOTAL_TIME_ENABLED | PERF_FORMAT_TOTAL_TIME_RUNNING,
            flags: FLAG_DISABLED | FLAG_INHERIT,
            ..PerfEventAttr::default()
        }
    }

    fn group_ioctl(leader: &PerfCounterFd, request: libc::c_ulong) -> io::Result<()> {
        // SAFETY: ioctl on an fd we own, with a plain integer argument
        let ret = unsafe { libc::ioctl(leader.as_raw_fd(), request as _, PERF_IOC_FLAG_GROUP) };
        if ret < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

impl CounterBackend for PerfBackend {
    type Resource = PerfCounterFd;

    fn open(
        &self,
        descriptor: &CounterDescriptor,
        leader: Option<&PerfCounterFd>,
    ) -> io::Result<PerfCounterFd> {
        let mut attr = Self::attr_for(descriptor);
        let group_fd = leader.map_or(-1, |l| l.as_raw_fd());

        // SAFETY: perf_event_open with a valid, fully initialised attr pointer
        let ret = unsafe {
            libc::syscall(
                libc::SYS_perf_event_open,
                &mut attr as *mut PerfEventAttr,
                0 as libc::pid_t, // pid = calling thread
                -1 as libc::c_int, // cpu = any
                group_fd as libc::c_int,
                PERF_FLAG_FD_CLOEXEC,
            )
        };
        if ret < 0 {
            return Err(io::Error::last_os_error());
        }

        // SAFETY: the syscall returned a fresh descriptor that nothing else owns
        let fd = unsafe { OwnedFd::from_raw_fd(ret as RawFd) };
        debug!(target: LOG_TARGET,
            "Opened {} (type {}, config {:#x}) as fd {} in group {}",
            descriptor.name, descriptor.encoding.kind, descriptor.encoding.config,
            fd.as_raw_fd(), group_fd
        );
        Ok(PerfCounterFd { fd })
    }

    fn reset_group(&self, leader: &PerfCounterFd) -> io::Result<()> {
        Self::group_ioctl(leader, PERF_EVENT_IOC_RESET)
    }

    fn enable_group(&self, leader: &PerfCounterFd) -> io::Result<()> {
        Self::group_ioctl(leader, PERF_EVENT_IOC_ENABLE)
    }

    fn disable_group(&self, leader: &PerfCounterFd) -> io::Result<()> {
        Self::group_ioctl(leader, PERF_EVENT_IOC_DISABLE)
    }

    fn read_sample(&self, resource: &PerfCounterFd, sample: &mut Sample) -> io::Result<usize> {
        // SAFETY: `Sample` is repr(C) with exactly SAMPLE_BYTES of u64 words
        let n = unsafe {
            libc::read(
                resource.as_raw_fd(),
                sample as *mut Sample as *mut libc::c_void,
                SAMPLE_BYTES,
            )
        };
        if n < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(n as usize)
    }
}
