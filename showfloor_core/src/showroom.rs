//! The fixed decorative set of the showroom scene.
//!
//! Numeric ranges here are decoration constants. Each object draws its
//! parameters once, at construction, from a seeded RNG; afterwards its
//! motion depends only on elapsed time.

use nalgebra::Vector3;
use rand::Rng;
use showfloor_env::EntityId;
use std::f64::consts::TAU;

use crate::motion::{AnimatedObject, Motion, MotionSet, PulseMode, Transform, Wave};

/// Corner cubes (x, z).
const CUBE_POSITIONS: [(f64, f64); 4] = [(3.0, 3.0), (13.0, 3.0), (3.0, 13.0), (13.0, 13.0)];

/// Glow orbs (x, y, z).
const ORB_POSITIONS: [(f64, f64, f64); 3] = [(5.0, 4.0, 5.0), (11.0, 3.5, 11.0), (4.0, 5.0, 12.0)];

const SPARKLE_COUNT: u32 = 6;
const DISC_COUNT: u32 = 5;
const DISC_TOP_OFFSET: f64 = -0.5;
const DISC_SPACING: f64 = 0.25;

/// Bob shared by the hologram text, its glow and the sparkles.
pub const HOLOGRAM_BOB: Wave = Wave {
    amplitude: 0.15,
    rate: 2.0,
    phase: 0.0,
};

/// Role labels used for the registered objects.
pub mod roles {
    pub const CUBE: &str = "cube";
    pub const HOLOGRAM_TEXT: &str = "hologram_text";
    pub const TEXT_GLOW: &str = "text_glow";
    pub const SPARKLE: &str = "sparkle";
    pub const DISC: &str = "disc";
    pub const ORB: &str = "orb";
}

/// Builds the showroom decoration around `hologram_center`.
///
/// Entity ids are derived from `id_base` so repeated builds with the same
/// inputs produce the same ids.
pub fn build<R: Rng + ?Sized>(
    rng: &mut R,
    hologram_center: Vector3<f64>,
    id_base: u64,
) -> MotionSet {
    let mut set = MotionSet::new();
    let mut next_id = id_base;
    let mut id = || {
        let id = EntityId::from_seed(next_id);
        next_id += 1;
        id
    };

    for (x, z) in CUBE_POSITIONS {
        let base_y = rng.gen_range(2.0..4.0);
        let bob = Wave::new(0.5, rng.gen_range(0.5..1.0), rng.gen_range(0.0..TAU));
        let rest = Transform::at(Vector3::new(x, base_y, z))
            .with_uniform_scale(0.4)
            .with_euler_degrees(45.0, 45.0, 0.0);
        let spin = rng.gen_range(20.0..60.0);
        set.register(
            AnimatedObject::new(id(), roles::CUBE, rest, Motion::Floater { bob }).with_spin(spin),
        );
    }

    set.register(AnimatedObject::new(
        id(),
        roles::HOLOGRAM_TEXT,
        Transform::at(hologram_center),
        Motion::Floater { bob: HOLOGRAM_BOB },
    ));

    set.register(AnimatedObject::new(
        id(),
        roles::TEXT_GLOW,
        Transform::at(hologram_center).with_scale(Vector3::new(3.0, 0.8, 0.05)),
        Motion::Pulsar {
            pulse: Wave::new(0.1, 3.0, 0.0),
            mode: PulseMode::Relative,
            bob: Some(HOLOGRAM_BOB),
        },
    ));

    for i in 0..SPARKLE_COUNT {
        let motion = Motion::Orbiter {
            center: hologram_center,
            radius: rng.gen_range(1.2..1.5),
            speed: rng.gen_range(0.8..1.2),
            start_angle: i as f64 / SPARKLE_COUNT as f64 * TAU,
            y_offset: rng.gen_range(-0.2..0.2),
            bob: HOLOGRAM_BOB,
        };
        let rest = Transform::at(hologram_center).with_uniform_scale(0.08);
        set.register(AnimatedObject::new(id(), roles::SPARKLE, rest, motion));
    }

    for i in 0..DISC_COUNT {
        let y = hologram_center.y + DISC_TOP_OFFSET - i as f64 * DISC_SPACING;
        let width = 1.5 - i as f64 * 0.25;
        let rest = Transform::at(Vector3::new(hologram_center.x, y, hologram_center.z))
            .with_scale(Vector3::new(width, 0.02, width));
        let motion = Motion::CascadeWave {
            index: i,
            wave: HOLOGRAM_BOB,
            wave_offset: 0.4,
            yaw_deg_per_sec: 20.0,
        };
        set.register(AnimatedObject::new(id(), roles::DISC, rest, motion));
    }

    for (i, (x, y, z)) in ORB_POSITIONS.into_iter().enumerate() {
        let speed = rng.gen_range(1.5..2.0);
        let phase = i as f64 * 2.0;
        let motion = Motion::Pulsar {
            pulse: Wave::new(0.05, speed * 2.0, phase),
            mode: PulseMode::Uniform { base: 0.12 },
            bob: Some(Wave::new(0.3, speed, phase)),
        };
        let rest = Transform::at(Vector3::new(x, y, z)).with_uniform_scale(0.15);
        set.register(AnimatedObject::new(id(), roles::ORB, rest, motion));
    }

    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn showroom(seed: u64) -> MotionSet {
        build(&mut ChaCha8Rng::seed_from_u64(seed), Vector3::new(8.0, 1.8, 8.0), 100)
    }

    #[test]
    fn test_showroom_inventory() {
        let set = showroom(42);
        assert_eq!(set.by_role(roles::CUBE).count(), 4);
        assert_eq!(set.by_role(roles::HOLOGRAM_TEXT).count(), 1);
        assert_eq!(set.by_role(roles::TEXT_GLOW).count(), 1);
        assert_eq!(set.by_role(roles::SPARKLE).count(), 6);
        assert_eq!(set.by_role(roles::DISC).count(), 5);
        assert_eq!(set.by_role(roles::ORB).count(), 3);
        assert_eq!(set.len(), 20);
    }

    #[test]
    fn test_only_cubes_spin() {
        let set = showroom(42);
        for object in set.iter() {
            assert_eq!(object.spin.is_some(), object.role == roles::CUBE, "{}", object.role);
        }
    }

    #[test]
    fn test_parameters_within_ranges() {
        let set = showroom(7);
        for cube in set.by_role(roles::CUBE) {
            assert!((2.0..4.0).contains(&cube.rest.position.y));
            let Motion::Floater { bob } = cube.motion else {
                panic!("cube must float");
            };
            assert_eq!(bob.amplitude, 0.5);
            assert!((0.5..1.0).contains(&bob.rate));
            let spin = cube.spin.unwrap().deg_per_sec;
            assert!((20.0..60.0).contains(&spin));
        }
        for sparkle in set.by_role(roles::SPARKLE) {
            let Motion::Orbiter { radius, y_offset, .. } = sparkle.motion else {
                panic!("sparkle must orbit");
            };
            assert!((1.2..1.5).contains(&radius));
            assert!((-0.2..0.2).contains(&y_offset));
        }
    }

    #[test]
    fn test_discs_stack_downwards_and_shrink() {
        let set = showroom(1);
        let discs: Vec<_> = set.by_role(roles::DISC).collect();
        assert_relative_eq!(discs[0].rest.position.y, 1.3, epsilon = 1e-12);
        for pair in discs.windows(2) {
            assert!(pair[1].rest.position.y < pair[0].rest.position.y);
            assert!(pair[1].rest.scale.x < pair[0].rest.scale.x);
        }
    }

    #[test]
    fn test_same_seed_same_showroom() {
        let a = showroom(99);
        let b = showroom(99);
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.id, y.id);
            assert_eq!(x.motion, y.motion);
        }
        let c = showroom(100);
        assert!(a.iter().zip(c.iter()).any(|(x, y)| x.motion != y.motion));
    }
}
