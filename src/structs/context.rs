// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # Launch Context Module
//!
//! Execution resource handed through the dispatcher to every kernel.
//!
//! The dispatcher only forwards it by reference. Kernels may read the
//! parallelism settings; nothing in this crate mutates a context.

/// Device a context is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Device {
    #[default]
    Cpu,
    /// Accelerator by ordinal.
    Accelerator(u32),
}

/// Default element count at which elementwise kernels go parallel.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 32_768;

/// # LaunchContext
///
/// Caller-owned execution context.
///
/// ### Properties
/// - `device`: Device affinity of the call.
/// - `stream`: Queue/stream ordinal on that device.
/// - `parallel_threshold`: Element count from which elementwise kernels
///   split work across the `rayon` pool (`parallel_proc` feature).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchContext {
    device: Device,
    stream: usize,
    parallel_threshold: usize,
}

impl LaunchContext {
    /// CPU context on stream 0.
    pub fn new() -> Self {
        LaunchContext {
            device: Device::Cpu,
            stream: 0,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    pub fn with_device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    pub fn with_stream(mut self, stream: usize) -> Self {
        self.stream = stream;
        self
    }

    /// `usize::MAX` keeps every kernel on the calling thread.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    #[inline]
    pub fn device(&self) -> Device {
        self.device
    }

    #[inline]
    pub fn stream(&self) -> usize {
        self.stream
    }

    #[inline]
    pub fn parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    /// Whether a kernel over `len` elements should split its work.
    #[inline]
    pub fn go_parallel(&self, len: usize) -> bool {
        cfg!(feature = "parallel_proc") && len >= self.parallel_threshold
    }
}

impl Default for LaunchContext {
    fn default() -> Self {
        Self::new()
    }
}
