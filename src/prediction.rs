//! Velocity prediction for the upcoming fixed physics step.
//!
//! Reproduces the semi-implicit Euler order used by PhysX-style engines:
//! forces and gravity are integrated into velocity first, then linear drag
//! scales the result. Collision response and friction are not modelled, so
//! the prediction only holds for bodies that do not touch anything this step.

use bevy::prelude::*;

use crate::error::{PredictionError, Result};
use crate::types::{PredictionParams, RigidBodyView};

/// Multiplier applied to velocity by linear drag over one step.
///
/// `clamp(1 - drag * dt, 0, 1)`: a step long enough to fully damp the body
/// stops it instead of reversing it.
///
/// # Example
/// ```
/// use bevy_step_hooks::prediction::drag_multiplier;
///
/// assert!((drag_multiplier(5.0, 0.02) - 0.9).abs() < 1e-6);
/// assert_eq!(drag_multiplier(100.0, 0.02), 0.0);
/// ```
pub fn drag_multiplier(drag: f32, dt: f32) -> f32 {
    (1.0 - drag * dt).clamp(0.0, 1.0)
}

/// Predict the linear velocity a body will have after the next physics step.
///
/// `v' = (v + F/m * dt + [g * dt]) * [clamp(1 - drag * dt, 0, 1)]`, where the
/// gravity term is present only when the body opts into gravity and the drag
/// factor only when `params.apply_drag` is set.
///
/// Mass is not validated. A zero mass yields non-finite components; use
/// [`try_predict_velocity`] when the input is not trusted.
///
/// # Arguments
/// * `body` - Read-only body state
/// * `params` - Gravity, fixed timestep and drag toggle
///
/// # Returns
/// The predicted velocity in m/s
pub fn predict_velocity(body: &impl RigidBodyView, params: &PredictionParams) -> Vec3 {
    let dt = params.fixed_timestep;

    let mut velocity = body.velocity() + body.accumulated_force() / body.mass() * dt;

    if body.use_gravity() {
        velocity += params.gravity * dt;
    }

    if params.apply_drag {
        velocity *= drag_multiplier(body.drag(), dt);
    }

    velocity
}

/// Checked variant of [`predict_velocity`].
///
/// Rejects non-positive or non-finite mass and an invalid timestep instead of
/// producing NaN or infinite components.
pub fn try_predict_velocity(body: &impl RigidBodyView, params: &PredictionParams) -> Result<Vec3> {
    let mass = body.mass();
    if !mass.is_finite() {
        return Err(PredictionError::NonFiniteMass(mass));
    }
    if mass <= 0.0 {
        return Err(PredictionError::NonPositiveMass(mass));
    }

    let dt = params.fixed_timestep;
    if !dt.is_finite() || dt < 0.0 {
        return Err(PredictionError::InvalidTimestep(dt));
    }

    Ok(predict_velocity(body, params))
}

/// Predict the position after the next step.
///
/// Semi-implicit Euler moves the body with the already-updated velocity.
pub fn predict_position(
    position: Vec3,
    body: &impl RigidBodyView,
    params: &PredictionParams,
) -> Vec3 {
    position + predict_velocity(body, params) * params.fixed_timestep
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BodySnapshot;

    const DT: f32 = 0.02;

    fn assert_close(actual: Vec3, expected: Vec3) {
        assert!(
            actual.abs_diff_eq(expected, 1e-5),
            "expected {expected:?}, got {actual:?}"
        );
    }

    fn earth_params() -> PredictionParams {
        PredictionParams::new(Vec3::new(0.0, -9.81, 0.0), DT)
    }

    #[test]
    fn test_force_only() {
        let body = BodySnapshot::new(1.0).with_force(Vec3::new(10.0, 0.0, 0.0));
        let params = earth_params().with_drag(false);

        assert_close(predict_velocity(&body, &params), Vec3::new(0.2, 0.0, 0.0));
    }

    #[test]
    fn test_force_scales_with_inverse_mass() {
        let body = BodySnapshot::new(4.0)
            .with_velocity(Vec3::new(1.0, 2.0, 3.0))
            .with_force(Vec3::new(0.0, 0.0, 20.0));
        let params = earth_params().with_drag(false);

        // v + F/m*dt = (1, 2, 3 + 5 * 0.02)
        assert_close(predict_velocity(&body, &params), Vec3::new(1.0, 2.0, 3.1));
    }

    #[test]
    fn test_drag_scales_result() {
        let body = BodySnapshot::new(1.0)
            .with_force(Vec3::new(10.0, 0.0, 0.0))
            .with_drag(5.0);
        let params = earth_params();

        assert_close(predict_velocity(&body, &params), Vec3::new(0.18, 0.0, 0.0));
    }

    #[test]
    fn test_drag_ignored_when_disabled() {
        let body = BodySnapshot::new(1.0)
            .with_force(Vec3::new(10.0, 0.0, 0.0))
            .with_drag(5.0);
        let params = earth_params().with_drag(false);

        assert_close(predict_velocity(&body, &params), Vec3::new(0.2, 0.0, 0.0));
    }

    #[test]
    fn test_gravity_only_when_opted_in() {
        let params = earth_params().with_drag(false);
        let falling = BodySnapshot::new(1.0).with_gravity(true);
        let floating = BodySnapshot::new(1.0);

        assert_close(
            predict_velocity(&falling, &params),
            Vec3::new(0.0, -9.81 * DT, 0.0),
        );
        assert_close(predict_velocity(&floating, &params), Vec3::ZERO);
    }

    #[test]
    fn test_drag_applies_after_gravity() {
        let body = BodySnapshot::new(1.0)
            .with_velocity(Vec3::new(0.0, 1.0, 0.0))
            .with_gravity(true)
            .with_drag(5.0);
        let params = earth_params();

        let expected = (Vec3::new(0.0, 1.0, 0.0) + params.gravity * DT) * 0.9;
        assert_close(predict_velocity(&body, &params), expected);
    }

    #[test]
    fn test_excessive_drag_stops_body() {
        let body = BodySnapshot::new(1.0)
            .with_velocity(Vec3::new(30.0, -4.0, 2.0))
            .with_drag(60.0);
        let params = earth_params();

        assert_eq!(predict_velocity(&body, &params), Vec3::ZERO);

        let body = body.with_drag(500.0);
        assert_eq!(predict_velocity(&body, &params), Vec3::ZERO);
    }

    #[test]
    fn test_negative_drag_does_not_amplify() {
        assert_eq!(drag_multiplier(-3.0, DT), 1.0);
    }

    #[test]
    fn test_zero_timestep_keeps_velocity() {
        let body = BodySnapshot::new(1.0)
            .with_velocity(Vec3::new(5.0, 0.0, 0.0))
            .with_force(Vec3::splat(100.0))
            .with_gravity(true)
            .with_drag(10.0);
        let params = PredictionParams::new(Vec3::new(0.0, -9.81, 0.0), 0.0);

        assert_eq!(predict_velocity(&body, &params), Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn test_checked_rejects_bad_mass() {
        let params = earth_params();

        assert_eq!(
            try_predict_velocity(&BodySnapshot::new(0.0), &params),
            Err(PredictionError::NonPositiveMass(0.0))
        );
        assert_eq!(
            try_predict_velocity(&BodySnapshot::new(-1.0), &params),
            Err(PredictionError::NonPositiveMass(-1.0))
        );
        assert!(matches!(
            try_predict_velocity(&BodySnapshot::new(f32::INFINITY), &params),
            Err(PredictionError::NonFiniteMass(_))
        ));
        assert!(matches!(
            try_predict_velocity(&BodySnapshot::new(f32::NAN), &params),
            Err(PredictionError::NonFiniteMass(_))
        ));
    }

    #[test]
    fn test_checked_rejects_bad_timestep() {
        let body = BodySnapshot::new(1.0);

        let params = PredictionParams::new(Vec3::ZERO, -0.02);
        assert_eq!(
            try_predict_velocity(&body, &params),
            Err(PredictionError::InvalidTimestep(-0.02))
        );

        let params = PredictionParams::new(Vec3::ZERO, f32::NAN);
        assert!(try_predict_velocity(&body, &params).is_err());
    }

    #[test]
    fn test_checked_matches_unchecked() {
        let body = BodySnapshot::new(2.5)
            .with_velocity(Vec3::new(3.0, 1.0, -2.0))
            .with_force(Vec3::new(-5.0, 12.0, 0.5))
            .with_gravity(true)
            .with_drag(0.3);
        let params = earth_params();

        assert_eq!(
            try_predict_velocity(&body, &params),
            Ok(predict_velocity(&body, &params))
        );
    }

    #[test]
    fn test_position_uses_predicted_velocity() {
        let body = BodySnapshot::new(1.0).with_force(Vec3::new(10.0, 0.0, 0.0));
        let params = earth_params().with_drag(false);

        let next = predict_position(Vec3::new(1.0, 0.0, 0.0), &body, &params);
        // 1.0 + 0.2 * 0.02
        assert_close(next, Vec3::new(1.004, 0.0, 0.0));
    }
}
