use bevy::prelude::*;

use crate::components::PredictedVelocity;
use crate::resources::PredictionConfig;

/// Draw debug gizmos for predicted velocities.
///
/// One arrow per body, covering `debug_scale` seconds of travel.
pub fn draw_prediction_debug(
    mut gizmos: Gizmos,
    query: Query<(&GlobalTransform, &PredictedVelocity)>,
    config: Res<PredictionConfig>,
) {
    if !config.debug_draw {
        return;
    }

    for (transform, predicted) in query.iter() {
        let start = transform.translation();
        let end = start + predicted.0 * config.debug_scale;
        gizmos.arrow(start, end, Color::srgb(0.0, 1.0, 0.0));
    }
}
