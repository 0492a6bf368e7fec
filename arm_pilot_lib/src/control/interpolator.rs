//! Straight-line joint-space interpolation.
//!
//! Trajectories are linear in joint space with a fixed waypoint count per
//! operation class. No smoothing, no velocity or acceleration limits, no
//! collision checking.

/// One joint configuration, applied during a single simulation tick.
pub type JointConfiguration = Vec<f64>;

/// Sample a straight line from `start` to `target` with `steps` waypoints.
///
/// Sampling is endpoint-inclusive: for `steps >= 2` the first waypoint
/// equals `start` and the last lands exactly on `target`. A step count of
/// 0 or 1 collapses to a single jump onto the target.
pub fn interpolate(start: &[f64], target: &[f64], steps: usize) -> Vec<JointConfiguration> {
    debug_assert_eq!(start.len(), target.len());

    if steps <= 1 {
        return vec![target.to_vec()];
    }

    let denom = (steps - 1) as f64;
    (0..steps)
        .map(|i| {
            if i + 1 == steps {
                // Land exactly on the target, no floating-point residue.
                return target.to_vec();
            }
            let frac = i as f64 / denom;
            start
                .iter()
                .zip(target)
                .map(|(s, t)| s + frac * (t - s))
                .collect()
        })
        .collect()
}

/// Scalar variant used for gripper apertures.
pub fn interpolate_scalar(start: f64, target: f64, steps: usize) -> Vec<f64> {
    interpolate(&[start], &[target], steps)
        .into_iter()
        .map(|config| config[0])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn max_component_error(a: &[f64], b: &[f64]) -> f64 {
        a.iter()
            .zip(b)
            .map(|(x, y)| (x - y).abs())
            .fold(0.0, f64::max)
    }

    #[test]
    fn test_length_and_endpoints() {
        let start = vec![0.0, -0.5, 1.2];
        let target = vec![1.0, 0.5, -0.3];

        for steps in [2, 3, 10, 100] {
            let segment = interpolate(&start, &target, steps);
            assert_eq!(segment.len(), steps);
            assert_eq!(segment[0], start);
            assert_eq!(segment[steps - 1], target);
        }
    }

    #[test]
    fn test_single_step_jumps_to_target() {
        let segment = interpolate(&[0.0, 0.0], &[1.0, 2.0], 1);
        assert_eq!(segment, vec![vec![1.0, 2.0]]);
    }

    #[test]
    fn test_zero_steps_guarded() {
        let segment = interpolate(&[0.0], &[1.0], 0);
        assert_eq!(segment, vec![vec![1.0]]);
    }

    #[test]
    fn test_intermediate_waypoints_are_linear() {
        let segment = interpolate(&[0.0, 10.0], &[1.0, 20.0], 5);
        assert!(max_component_error(&segment[2], &[0.5, 15.0]) < 1e-12);
    }

    #[test]
    fn test_round_trip_returns_to_start() {
        let a = vec![0.1, -1.3, 2.7, 0.0];
        let b = vec![-0.8, 0.4, 1.1, 3.0];

        let there = interpolate(&a, &b, 50);
        let back = interpolate(there.last().unwrap(), &a, 50);
        assert!(max_component_error(back.last().unwrap(), &a) < 1e-9);
    }

    #[test]
    fn test_same_start_and_target_is_constant() {
        let config = vec![0.3, 0.7];
        let segment = interpolate(&config, &config, 10);
        for waypoint in &segment {
            assert_eq!(*waypoint, config);
        }
    }

    #[test]
    fn test_scalar_matches_vector_form() {
        let apertures = interpolate_scalar(0.05, 0.0, 4);
        assert_eq!(apertures.len(), 4);
        assert_eq!(apertures[0], 0.05);
        assert_eq!(apertures[3], 0.0);
    }
}
