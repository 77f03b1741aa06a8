//! Fixed-step field simulation
//!
//! One step: move every particle, bounce at the walls, then apply the pointer
//! repulsion nudge. The nudge is positional and recomputed every step from the
//! current pointer, so it only lasts while the pointer is held nearby. While
//! it is held, drift never carries a particle inside the radius closer to the
//! pointer, so every such particle ends the step strictly farther out.

use super::state::FieldState;
use crate::consts::SIM_DT;

/// Advance the field by one fixed step
pub fn tick(state: &mut FieldState) {
    let bounds = state.viewport.size();
    let pointer = state.pointer;
    let repel = state.config.pointer_interaction && pointer.active;

    state.time_secs += SIM_DT;

    for particle in &mut state.particles {
        let before = particle.pos;
        particle.step(bounds);

        if repel {
            if let Some(outward) = pointer.outward(before) {
                let inward = (particle.pos - before).dot(outward).min(0.0);
                particle.pos -= outward * inward;
            }
            particle.pos += pointer.repulsion(particle.pos);
            particle.clamp_to(bounds);
        }
    }
}

/// Run `steps` fixed steps
pub fn advance(state: &mut FieldState, steps: u32) {
    for _ in 0..steps {
        tick(state);
    }
}
