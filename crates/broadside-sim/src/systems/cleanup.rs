//! Cleanup system: expires transient effect entities.
//!
//! Uses the engine's pre-allocated buffer to avoid per-tick allocation.

use hecs::{Entity, World};

use broadside_core::components::Effect;

/// Decay effect lifetimes and despawn the expired ones.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>, dt: f64) {
    despawn_buffer.clear();

    for (entity, effect) in world.query_mut::<&mut Effect>() {
        effect.ttl_secs -= dt;
        if effect.ttl_secs <= 0.0 {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
