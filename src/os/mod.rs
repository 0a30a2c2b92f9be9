// src/os/mod.rs

//! OS-level plumbing that is not specific to any one backend.

pub mod epoll;
