//! Error types
//!
//! Only construction and configuration can fail. Per-frame rendering problems
//! are logged and swallowed by the web layer so decoration never breaks a page.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FxError {
    /// A schedule whose delays are not strictly increasing
    #[error("timeline entry {index} at {delay_ms}ms does not follow previous entry at {previous_ms}ms")]
    Timeline {
        index: usize,
        delay_ms: u32,
        previous_ms: u32,
    },

    /// Host-supplied configuration could not be parsed
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("could not create render surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("could not open GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    /// Canvas has no usable surface format
    #[error("render surface reports no supported formats")]
    NoSurfaceFormat,
}

pub type Result<T> = std::result::Result<T, FxError>;
