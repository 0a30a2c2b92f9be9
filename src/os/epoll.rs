// src/os/epoll.rs

//! Thin wrapper around `epoll` using raw `libc` FFI calls. The event loop
//! uses it to sleep until input arrives or the blink timeout expires.

use anyhow::{Context, Result};
use log::{debug, trace, warn};
use std::io;
use std::os::unix::io::RawFd;

const EPOLL_CREATE_CLOEXEC: libc::c_int = libc::O_CLOEXEC;
const MAX_EVENTS_BUFFER_SIZE: usize = 4;

/// The registration token carried back by each ready event.
pub fn epoll_event_token(event: &libc::epoll_event) -> u64 {
    event.u64
}

#[derive(Debug)]
pub struct EventMonitor {
    epoll_fd: RawFd,
    event_buffer: [libc::epoll_event; MAX_EVENTS_BUFFER_SIZE],
}

impl EventMonitor {
    pub fn new() -> Result<Self> {
        let epoll_fd = unsafe { libc::epoll_create1(EPOLL_CREATE_CLOEXEC) };
        if epoll_fd == -1 {
            return Err(io::Error::last_os_error())
                .context("Failed to create epoll instance (epoll_create1)");
        }
        debug!("EventMonitor created with epoll_fd: {}", epoll_fd);
        Ok(Self {
            epoll_fd,
            event_buffer: [unsafe { std::mem::zeroed() }; MAX_EVENTS_BUFFER_SIZE],
        })
    }

    /// Registers `fd` for readability. `token` comes back in the events
    /// that fire for this fd.
    pub fn add(&self, fd: RawFd, token: u64) -> Result<()> {
        let mut event = libc::epoll_event {
            events: libc::EPOLLIN as u32,
            u64: token,
        };
        if unsafe { libc::epoll_ctl(self.epoll_fd, libc::EPOLL_CTL_ADD, fd, &mut event) } == -1 {
            return Err(io::Error::last_os_error())
                .with_context(|| format!("Failed to add fd {} to epoll (token: {})", fd, token));
        }
        trace!(
            "Added fd {} to epoll_fd {} with token {}",
            fd,
            self.epoll_fd,
            token
        );
        Ok(())
    }

    /// Waits for registered fds to turn readable. A negative timeout blocks
    /// until something fires; `EINTR` surfaces as an empty slice so the
    /// caller just loops again.
    pub fn events(&mut self, timeout_ms: i32) -> Result<&[libc::epoll_event]> {
        let num_events = unsafe {
            libc::epoll_wait(
                self.epoll_fd,
                self.event_buffer.as_mut_ptr(),
                MAX_EVENTS_BUFFER_SIZE as libc::c_int,
                timeout_ms,
            )
        };

        if num_events == -1 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                trace!("EventMonitor: epoll_wait interrupted (EINTR), returning empty slice.");
                return Ok(&self.event_buffer[0..0]);
            }
            return Err(err).context("epoll_wait failed in EventMonitor");
        }

        trace!(
            "EventMonitor: epoll_wait on fd {} returned {} events",
            self.epoll_fd,
            num_events
        );
        Ok(&self.event_buffer[0..num_events as usize])
    }
}

impl Drop for EventMonitor {
    fn drop(&mut self) {
        if unsafe { libc::close(self.epoll_fd) } == -1 {
            warn!(
                "Failed to close epoll_fd {} in EventMonitor::drop: {}",
                self.epoll_fd,
                io::Error::last_os_error()
            );
        } else {
            debug!("Closed epoll_fd {} in EventMonitor::drop", self.epoll_fd);
        }
    }
}
