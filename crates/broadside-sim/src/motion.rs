//! Motion scheduler, the in-process stand-in for the host's animation
//! interpolation service.
//!
//! Entities get point-to-point or arced tweens with an easing curve, paced
//! either by a fixed duration or by travel speed. Each un-cancelled motion
//! fires its completion tag exactly once; cancelled motions never do.
//! Motions whose entity has been despawned are dropped silently.

use glam::DVec3;
use hecs::{Entity, World};

use broadside_core::components::Rotation;
use broadside_core::types::Position;

/// Easing curve applied to motion progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    /// Decelerating quadratic, used for the ships' approach run.
    EaseOutQuad,
    /// Overshoot-and-settle curve used for cannonball arcs.
    Spring,
}

/// How a motion's duration is determined.
#[derive(Debug, Clone, Copy)]
pub enum Pacing {
    /// Fixed duration in seconds.
    Duration(f64),
    /// Duration derived from path length at this speed (m/s).
    Speed(f64),
}

/// Completion tags delivered back to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionDone {
    /// A ship reached its stop point.
    Arrival,
    /// A sinking ship finished its descent.
    SinkComplete,
    /// A returning cannonball reached its endpoint without striking
    /// its source ship.
    ReturnMissed,
}

/// The path a motion follows.
#[derive(Debug, Clone)]
pub enum MotionPath {
    /// Straight line, or a quadratic arc through `via` when present.
    Translate {
        from: Position,
        via: Option<Position>,
        to: Position,
    },
    /// Component-wise euler rotation tween.
    Rotate { from: Rotation, to: Rotation },
}

/// A motion request, the whole boundary contract in one struct.
#[derive(Debug, Clone)]
pub struct MotionRequest {
    pub path: MotionPath,
    pub easing: Easing,
    pub pacing: Pacing,
    pub on_complete: Option<MotionDone>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MotionKind {
    Translate,
    Rotate,
}

#[derive(Debug)]
struct ActiveMotion {
    entity: Entity,
    kind: MotionKind,
    path: MotionPath,
    easing: Easing,
    duration_secs: f64,
    elapsed_secs: f64,
    on_complete: Option<MotionDone>,
}

/// Owns every active tween. An entity can hold at most one translate and
/// one rotate at a time; a new request of the same kind replaces the old
/// one without firing its completion.
#[derive(Debug, Default)]
pub struct MotionScheduler {
    motions: Vec<ActiveMotion>,
}

impl MotionScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a motion for `entity`, replacing any active motion of the
    /// same kind.
    pub fn request(&mut self, entity: Entity, request: MotionRequest) {
        let kind = match request.path {
            MotionPath::Translate { .. } => MotionKind::Translate,
            MotionPath::Rotate { .. } => MotionKind::Rotate,
        };
        self.motions
            .retain(|m| !(m.entity == entity && m.kind == kind));

        let duration_secs = match request.pacing {
            Pacing::Duration(secs) => secs,
            Pacing::Speed(speed) => path_length(&request.path) / speed.max(1e-9),
        };

        self.motions.push(ActiveMotion {
            entity,
            kind,
            path: request.path,
            easing: request.easing,
            duration_secs,
            elapsed_secs: 0.0,
            on_complete: request.on_complete,
        });
    }

    /// Drop all of `entity`'s motions. None of them will complete.
    pub fn cancel(&mut self, entity: Entity) {
        self.motions.retain(|m| m.entity != entity);
    }

    /// Number of motions currently active for `entity`.
    pub fn active_count(&self, entity: Entity) -> usize {
        self.motions.iter().filter(|m| m.entity == entity).count()
    }

    /// Advance every motion by `dt`, writing positions and rotations into
    /// the world. Returns the completions that fired this tick.
    pub fn tick(&mut self, world: &mut World, dt: f64) -> Vec<(Entity, MotionDone)> {
        let mut completed = Vec::new();

        self.motions.retain_mut(|m| {
            if !world.contains(m.entity) {
                return false;
            }

            m.elapsed_secs += dt;
            let t = if m.duration_secs <= 0.0 {
                1.0
            } else {
                (m.elapsed_secs / m.duration_secs).min(1.0)
            };

            if t >= 1.0 {
                // Snap to the exact endpoint before completing.
                apply(world, m.entity, &m.path, 1.0);
                if let Some(tag) = m.on_complete {
                    completed.push((m.entity, tag));
                }
                return false;
            }

            apply(world, m.entity, &m.path, ease(m.easing, t));
            true
        });

        completed
    }
}

/// Write the sampled path value for progress `s` into the world.
/// Missing components are ignored (the entity may have been stripped).
fn apply(world: &mut World, entity: Entity, path: &MotionPath, s: f64) {
    match path {
        MotionPath::Translate { from, via, to } => {
            let p = sample_path(from, via.as_ref(), to, s);
            if let Ok(mut pos) = world.get::<&mut Position>(entity) {
                *pos = p;
            }
        }
        MotionPath::Rotate { from, to } => {
            if let Ok(mut rot) = world.get::<&mut Rotation>(entity) {
                rot.x = from.x + (to.x - from.x) * s;
                rot.y = from.y + (to.y - from.y) * s;
                rot.z = from.z + (to.z - from.z) * s;
            }
        }
    }
}

/// Sample the translate path at progress `s`. With a via point the path is
/// the quadratic bezier constrained to pass through it at s = 0.5; spring
/// easing may push `s` past 1, which extrapolates smoothly.
pub fn sample_path(from: &Position, via: Option<&Position>, to: &Position, s: f64) -> Position {
    let a = dvec(from);
    let b = dvec(to);
    let p = match via {
        None => a.lerp(b, s),
        Some(v) => {
            let control = 2.0 * dvec(v) - 0.5 * (a + b);
            let u = 1.0 - s;
            u * u * a + 2.0 * u * s * control + s * s * b
        }
    };
    Position::new(p.x, p.y, p.z)
}

/// Approximate path length in meters (or radians for rotations).
fn path_length(path: &MotionPath) -> f64 {
    match path {
        MotionPath::Translate { from, via, to } => match via {
            None => dvec(from).distance(dvec(to)),
            Some(_) => {
                const SEGMENTS: usize = 16;
                let mut total = 0.0;
                let mut prev = *from;
                for i in 1..=SEGMENTS {
                    let s = i as f64 / SEGMENTS as f64;
                    let next = sample_path(from, via.as_ref(), to, s);
                    total += dvec(&prev).distance(dvec(&next));
                    prev = next;
                }
                total
            }
        },
        MotionPath::Rotate { from, to } => {
            DVec3::new(to.x - from.x, to.y - from.y, to.z - from.z).length()
        }
    }
}

/// Apply the easing curve to normalized progress `t` in [0, 1].
pub fn ease(easing: Easing, t: f64) -> f64 {
    match easing {
        Easing::Linear => t,
        Easing::EaseOutQuad => t * (2.0 - t),
        Easing::Spring => spring(t),
    }
}

/// Spring curve: overshoots the target and settles back. Gives the
/// cannonball arcs their lob-and-drop feel.
fn spring(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    ((t * std::f64::consts::PI * (0.2 + 2.5 * t * t * t)).sin() * (1.0 - t).powf(2.2) + t)
        * (1.0 + 1.2 * (1.0 - t))
}

fn dvec(p: &Position) -> DVec3 {
    DVec3::new(p.x, p.y, p.z)
}
