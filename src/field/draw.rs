//! Frame composition
//!
//! Turns a simulated field into an ordered list of draw commands: clear,
//! particle dots, link lines, then overlays. The renderer consumes the list;
//! tests inspect it directly.

use glam::Vec2;

use super::links::find_links;
use super::overlay::{OVERLAY_POINT_RADIUS, overlay_alpha};
use super::state::FieldState;
use crate::consts::{LINK_WIDTH, PARTICLE_ALPHA};

pub type Rgba = [f32; 4];

pub mod colors {
    use super::Rgba;

    pub const PARTICLE: Rgba = [1.0, 1.0, 1.0, super::PARTICLE_ALPHA];
    pub const LINK: Rgba = [1.0, 1.0, 1.0, 1.0];
    pub const OVERLAY: Rgba = [1.0, 1.0, 1.0, 1.0];
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCmd {
    /// Wipe the previous frame
    Clear,
    Circle {
        center: Vec2,
        radius: f32,
        color: Rgba,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Rgba,
    },
}

#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub cmds: Vec<DrawCmd>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.cmds.clear();
    }

    pub fn push(&mut self, cmd: DrawCmd) {
        self.cmds.push(cmd);
    }

    pub fn len(&self) -> usize {
        self.cmds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    pub fn circles(&self) -> impl Iterator<Item = &DrawCmd> {
        self.cmds.iter().filter(|c| matches!(c, DrawCmd::Circle { .. }))
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCmd> {
        self.cmds.iter().filter(|c| matches!(c, DrawCmd::Line { .. }))
    }
}

fn with_alpha(color: Rgba, alpha: f32) -> Rgba {
    [color[0], color[1], color[2], color[3] * alpha]
}

/// Rebuild `list` for the current field state
pub fn compose(state: &FieldState, list: &mut DrawList) {
    list.reset();
    list.push(DrawCmd::Clear);
    if state.viewport.is_empty() {
        return;
    }

    for particle in &state.particles {
        list.push(DrawCmd::Circle {
            center: particle.pos,
            radius: particle.radius,
            color: colors::PARTICLE,
        });
    }

    for link in find_links(&state.particles, state.connection_threshold()) {
        list.push(DrawCmd::Line {
            from: state.particles[link.a].pos,
            to: state.particles[link.b].pos,
            width: LINK_WIDTH,
            color: with_alpha(colors::LINK, link.opacity),
        });
    }

    if state.config.overlays.is_empty() {
        return;
    }
    let alpha = overlay_alpha(state.time_secs);
    for constellation in &state.config.overlays {
        for (from, to) in constellation.segments(state.viewport) {
            list.push(DrawCmd::Line {
                from,
                to,
                width: LINK_WIDTH,
                color: with_alpha(colors::OVERLAY, alpha),
            });
        }
        for center in constellation.points_px(state.viewport) {
            list.push(DrawCmd::Circle {
                center,
                radius: OVERLAY_POINT_RADIUS,
                color: with_alpha(colors::OVERLAY, alpha * 2.0),
            });
        }
    }
}
