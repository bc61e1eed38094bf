//! Procedural motion - closed-form animation of decorative objects.
//!
//! Every animated object derives its pose from `(elapsed time, its own fixed
//! parameters)` alone, so the scene can be restarted or replayed from any
//! elapsed time. The single exception is [`Spin`]: cumulative rotation is
//! integrated from per-tick deltas and is the only per-object history.
//!
//! # Variants
//!
//! ```text
//! Floater      y = rest.y + A·sin(t·speed + φ)              (+ optional spin)
//! Orbiter      θ = θ0 + t·speed;  (x, z) = c + r·(cos θ, sin θ)
//! Pulsar       s = base ± A·sin(t·f + φ)                    (+ optional bob)
//! CascadeWave  y = rest.y + A·sin(t·rate − N·offset);  yaw = t·ω (shared)
//! ```

use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use showfloor_env::EntityId;
use std::collections::HashMap;

use crate::clock::sanitize;

/// Position, rotation and scale of a renderable entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vector3<f64>,
    pub rotation: UnitQuaternion<f64>,
    pub scale: Vector3<f64>,
}

impl Transform {
    /// An unrotated, unit-scale transform at `position`.
    pub fn at(position: Vector3<f64>) -> Self {
        Self {
            position,
            rotation: UnitQuaternion::identity(),
            scale: Vector3::repeat(1.0),
        }
    }

    pub fn with_scale(mut self, scale: Vector3<f64>) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_uniform_scale(self, scale: f64) -> Self {
        self.with_scale(Vector3::repeat(scale))
    }

    /// Sets the rotation from Euler angles in degrees (x, y, z).
    pub fn with_euler_degrees(mut self, x: f64, y: f64, z: f64) -> Self {
        self.rotation =
            UnitQuaternion::from_euler_angles(x.to_radians(), y.to_radians(), z.to_radians());
        self
    }
}

/// A sine oscillator: `amplitude · sin(t · rate + phase)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wave {
    pub amplitude: f64,
    pub rate: f64,
    pub phase: f64,
}

impl Wave {
    pub fn new(amplitude: f64, rate: f64, phase: f64) -> Self {
        Self {
            amplitude,
            rate,
            phase,
        }
    }

    /// A wave that is always zero.
    pub fn flat() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    #[inline]
    pub fn sample(&self, t: f64) -> f64 {
        self.amplitude * (t * self.rate + self.phase).sin()
    }
}

/// How a [`Motion::Pulsar`] applies its pulse to the rest scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PulseMode {
    /// Uniform scale `base + pulse` on all three axes.
    Uniform { base: f64 },

    /// Rest scale multiplied by `1 + pulse` (keeps the aspect ratio).
    Relative,
}

/// The closed-form part of an object's animation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Motion {
    /// Vertical bob around the rest height.
    Floater { bob: Wave },

    /// Planar circle around `center`, with an optional shared vertical bob.
    Orbiter {
        center: Vector3<f64>,
        radius: f64,
        speed: f64,
        start_angle: f64,
        y_offset: f64,
        bob: Wave,
    },

    /// Scale pulse, optionally combined with a vertical bob.
    Pulsar {
        pulse: Wave,
        mode: PulseMode,
        bob: Option<Wave>,
    },

    /// Member `index` of a stack; the wave reaches deeper members later.
    CascadeWave {
        index: u32,
        wave: Wave,
        wave_offset: f64,
        yaw_deg_per_sec: f64,
    },
}

impl Motion {
    /// Evaluates the pose at elapsed time `t`.
    ///
    /// Pure: the result depends only on `rest`, `t` and the variant's
    /// parameters.
    pub fn evaluate(&self, rest: &Transform, t: f64) -> Transform {
        let mut pose = *rest;
        match *self {
            Motion::Floater { bob } => {
                pose.position.y = rest.position.y + bob.sample(t);
            }
            Motion::Orbiter {
                center,
                radius,
                speed,
                start_angle,
                y_offset,
                bob,
            } => {
                let angle = start_angle + t * speed;
                pose.position = Vector3::new(
                    center.x + angle.cos() * radius,
                    center.y + y_offset + bob.sample(t),
                    center.z + angle.sin() * radius,
                );
            }
            Motion::Pulsar { pulse, mode, bob } => {
                if let Some(bob) = bob {
                    pose.position.y = rest.position.y + bob.sample(t);
                }
                let p = pulse.sample(t);
                pose.scale = match mode {
                    PulseMode::Uniform { base } => Vector3::repeat(base + p),
                    PulseMode::Relative => rest.scale * (1.0 + p),
                };
            }
            Motion::CascadeWave {
                index,
                wave,
                wave_offset,
                yaw_deg_per_sec,
            } => {
                let lag = index as f64 * wave_offset;
                pose.position.y = rest.position.y + wave.amplitude * (t * wave.rate - lag).sin();
                let yaw = (t * yaw_deg_per_sec).to_radians();
                pose.rotation =
                    UnitQuaternion::from_axis_angle(&Vector3::y_axis(), yaw) * rest.rotation;
            }
        }
        pose
    }
}

/// Cumulative yaw, integrated from tick deltas.
///
/// This is history: two tick sequences with the same total duration can
/// only disagree here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spin {
    pub deg_per_sec: f64,
    pub accumulated_deg: f64,
}

impl Spin {
    pub fn new(deg_per_sec: f64) -> Self {
        Self {
            deg_per_sec,
            accumulated_deg: 0.0,
        }
    }

    pub fn advance(&mut self, dt: f64) {
        self.accumulated_deg = (self.accumulated_deg + sanitize(dt) * self.deg_per_sec) % 360.0;
    }

    /// World-space yaw applied on top of the evaluated rotation.
    pub fn rotation(&self) -> UnitQuaternion<f64> {
        UnitQuaternion::from_axis_angle(&Vector3::y_axis(), self.accumulated_deg.to_radians())
    }
}

/// A decorative object registered with the motion set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimatedObject {
    /// Host entity this object drives
    pub id: EntityId,

    /// Short role label ("cube", "sparkle", ...), used in exports and logs
    pub role: String,

    /// Pose at scene construction
    pub rest: Transform,

    /// Closed-form animation
    pub motion: Motion,

    /// Cumulative rotation, if this object spins
    pub spin: Option<Spin>,

    /// Pose after the latest update
    current: Transform,
}

impl AnimatedObject {
    pub fn new(id: EntityId, role: impl Into<String>, rest: Transform, motion: Motion) -> Self {
        Self {
            id,
            role: role.into(),
            rest,
            motion,
            spin: None,
            current: rest,
        }
    }

    pub fn with_spin(mut self, deg_per_sec: f64) -> Self {
        self.spin = Some(Spin::new(deg_per_sec));
        self
    }

    /// Pose after the latest update.
    pub fn transform(&self) -> &Transform {
        &self.current
    }

    /// Closed-form pose at `t`, without spin history.
    pub fn pose_at(&self, t: f64) -> Transform {
        self.motion.evaluate(&self.rest, t)
    }

    fn update(&mut self, t: f64, dt: f64) {
        let mut pose = self.pose_at(t);
        if let Some(spin) = self.spin.as_mut() {
            spin.advance(dt);
            pose.rotation = spin.rotation() * pose.rotation;
        }
        self.current = pose;
    }
}

/// Registry of every animated decoration in the scene.
///
/// Objects are registered once at scene construction and never removed.
#[derive(Debug, Clone, Default)]
pub struct MotionSet {
    objects: Vec<AnimatedObject>,
    index: HashMap<EntityId, usize>,
}

impl MotionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an object and returns its entity id.
    ///
    /// Re-registering an id replaces the previous descriptor in place.
    pub fn register(&mut self, object: AnimatedObject) -> EntityId {
        let id = object.id;
        match self.index.get(&id) {
            Some(&slot) => self.objects[slot] = object,
            None => {
                self.index.insert(id, self.objects.len());
                self.objects.push(object);
            }
        }
        id
    }

    /// Recomputes every pose for elapsed time `t`; `dt` feeds spin only.
    pub fn update(&mut self, t: f64, dt: f64) {
        for object in &mut self.objects {
            object.update(t, dt);
        }
    }

    pub fn get(&self, id: &EntityId) -> Option<&AnimatedObject> {
        self.index.get(id).map(|&slot| &self.objects[slot])
    }

    pub fn transform(&self, id: &EntityId) -> Option<&Transform> {
        self.get(id).map(AnimatedObject::transform)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnimatedObject> {
        self.objects.iter()
    }

    /// Objects with the given role, in registration order.
    pub fn by_role<'a>(&'a self, role: &'a str) -> impl Iterator<Item = &'a AnimatedObject> + 'a {
        self.objects.iter().filter(move |o| o.role == role)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
