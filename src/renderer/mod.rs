//! WebGPU rendering module
//!
//! Tessellates a field `DrawList` into flat-colored triangles and draws them
//! on a transparent canvas. Surface failures are counted by `SurfaceHealth`;
//! after a streak of them the web layer drops the renderer and the field keeps
//! simulating undrawn.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use vertex::Vertex;

use crate::consts::MAX_SURFACE_FAILURES;

/// What to do after a failed frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceAction {
    /// Reconfigure the surface and try again next frame
    Reconfigure,
    /// Skip this frame
    Skip,
    /// Give up on rendering
    Disable,
}

/// Consecutive render failure counter
#[derive(Debug, Clone, Default)]
pub struct SurfaceHealth {
    failures: u32,
}

impl SurfaceHealth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self) {
        if self.failures > 0 {
            log::info!("Render surface recovered after {} failures", self.failures);
        }
        self.failures = 0;
    }

    pub fn record_failure(&mut self, error: &wgpu::SurfaceError) -> SurfaceAction {
        self.failures += 1;
        if self.failures == 1 {
            log::warn!("Render error: {:?}", error);
        }
        if self.failures >= MAX_SURFACE_FAILURES {
            log::warn!("Rendering disabled after {} consecutive failures", self.failures);
            return SurfaceAction::Disable;
        }
        match error {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceAction::Reconfigure,
            _ => SurfaceAction::Skip,
        }
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lost_surface_reconfigures_then_gives_up() {
        let mut health = SurfaceHealth::new();
        assert_eq!(health.record_failure(&wgpu::SurfaceError::Lost), SurfaceAction::Reconfigure);
        assert_eq!(health.record_failure(&wgpu::SurfaceError::Timeout), SurfaceAction::Skip);
        assert_eq!(health.record_failure(&wgpu::SurfaceError::Outdated), SurfaceAction::Disable);
    }

    #[test]
    fn test_success_resets_streak() {
        let mut health = SurfaceHealth::new();
        health.record_failure(&wgpu::SurfaceError::Lost);
        health.record_failure(&wgpu::SurfaceError::Lost);
        health.record_success();
        assert_eq!(health.failures(), 0);
        assert_eq!(health.record_failure(&wgpu::SurfaceError::Lost), SurfaceAction::Reconfigure);
    }
}
