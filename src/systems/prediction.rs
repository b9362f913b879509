//! Velocity prediction and force forwarding for avian3d bodies.

use avian3d::prelude::*;
use bevy::log::warn_once;
use bevy::prelude::*;

use crate::components::{AccumulatedForce, PredictVelocity, PredictedVelocity};
use crate::error::PredictionError;
use crate::prediction::try_predict_velocity;
use crate::resources::PredictionConfig;
use crate::types::{BodySnapshot, PredictionParams};

/// Write [`PredictedVelocity`] for every body marked with [`PredictVelocity`].
///
/// Runs in `FixedUpdate`, before avian steps in `FixedPostUpdate`. Reads:
/// - the linear velocity and the acceleration accumulated through [`Forces`]
///   (this includes forwarded [`AccumulatedForce`] and respects `LockedAxes`)
/// - avian's persistent `ConstantForce`, which avian adds inside the step
/// - `GravityScale`: zero opts out of gravity, other values scale it
/// - `LinearDamping` as the drag coefficient
///
/// Static and kinematic bodies are not integrated by avian, and neither are
/// sleeping bodies with nothing applied to them, so their prediction is their
/// current velocity. Dynamic bodies with an invalid mass keep their previous
/// prediction.
pub fn predict_velocities(
    time: Res<Time<Fixed>>,
    config: Res<PredictionConfig>,
    gravity: Option<Res<Gravity>>,
    mut bodies: Query<
        (
            Entity,
            Forces,
            &ComputedMass,
            Option<&RigidBody>,
            Option<&ConstantForce>,
            Option<&GravityScale>,
            Option<&LinearDamping>,
            Has<Sleeping>,
            &mut PredictedVelocity,
        ),
        With<PredictVelocity>,
    >,
) {
    if !config.enabled {
        return;
    }

    let dt = time.timestep().as_secs_f32();
    let gravity = gravity.map(|g| g.0).unwrap_or(Gravity::default().0);

    bodies.par_iter_mut().for_each(
        |(entity, forces, mass, body, constant, scale, damping, sleeping, mut predicted)| {
            let acceleration = forces.accumulated_linear_acceleration();
            let velocity = forces.linear_velocity();

            let idle = sleeping && acceleration == Vec3::ZERO;
            if idle || body.is_some_and(|body| !body.is_dynamic()) {
                predicted.0 = velocity;
                return;
            }

            let scale = scale.map_or(1.0, |s| s.0);
            let mass = mass.value();
            let snapshot = BodySnapshot {
                mass,
                velocity,
                accumulated_force: acceleration * mass + constant.map_or(Vec3::ZERO, |c| c.0),
                use_gravity: scale != 0.0,
                drag: damping.map_or(0.0, |d| d.0),
            };
            let params = PredictionParams {
                gravity: gravity * scale,
                fixed_timestep: dt,
                apply_drag: config.apply_drag,
            };

            match try_predict_velocity(&snapshot, &params) {
                Ok(next) => predicted.0 = next,
                Err(err @ (PredictionError::NonPositiveMass(_) | PredictionError::NonFiniteMass(_))) => {
                    warn_once!("skipping velocity prediction for {}: {}", entity, err);
                }
                Err(err) => {
                    warn_once!("velocity prediction disabled this step: {}", err);
                }
            }
        },
    );
}

/// Hand [`AccumulatedForce`] to avian through [`RigidBodyForces::apply_force`], then clear it.
///
/// Runs before [`predict_velocities`] so the prediction sees the forces added
/// this step. The buffer is cleared every step, including when
/// `apply_accumulated_forces` is off or the body has no integration data yet;
/// in those cases the force is dropped.
pub fn forward_accumulated_forces(
    config: Res<PredictionConfig>,
    mut bodies: Query<(&mut AccumulatedForce, Option<&RigidBody>, Option<Forces>)>,
) {
    for (mut force, body, forces) in bodies.iter_mut() {
        let total = force.total();
        if total == Vec3::ZERO {
            continue;
        }

        let dynamic = body.is_none_or(|body| body.is_dynamic());
        if config.apply_accumulated_forces && dynamic {
            if let Some(mut forces) = forces {
                forces.apply_force(total);
            }
        }

        force.clear();
    }
}
