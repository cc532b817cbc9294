//! Geometric primitives for rod-like particles

use crate::simulation::states::NVec3;

/// Below this value of `1 - (u1 . u2)^2` two rods are treated as parallel
const PARALLEL_TOLERANCE: f64 = 1.0e-12;

/// Shortest distance between two segments of length `length`.
///
/// The first segment is centred at the origin and runs along `u1`, the
/// second is centred at `r` and runs along `u2`. Both axes must be unit
/// vectors. The closest points are found on the infinite lines first and
/// then clamped to the segment ends (Vega & Lago).
pub fn spherocylinder_distance(r: &NVec3, u1: &NVec3, u2: &NVec3, length: f64) -> f64 {
    let half = 0.5 * length;
    let r_u1 = r.dot(u1);
    let r_u2 = r.dot(u2);
    let u1_u2 = u1.dot(u2);
    let cc = 1.0 - u1_u2 * u1_u2;

    // lambda: offset along u1 on the first rod, mu: offset along u2 on the second
    let (lambda, mu) = if cc < PARALLEL_TOLERANCE {
        // any pair with lambda - mu = r.u1 is optimal, pick the symmetric one
        (clamp_abs(0.5 * r_u1, half), clamp_abs(-0.5 * r_u2, half))
    } else {
        let lambda = (r_u1 - u1_u2 * r_u2) / cc;
        let mu = (-r_u2 + u1_u2 * r_u1) / cc;

        if lambda.abs() <= half && mu.abs() <= half {
            (lambda, mu)
        } else if lambda.abs() - half > mu.abs() - half {
            let lambda = clamp_abs(lambda, half);
            (lambda, clamp_abs(lambda * u1_u2 - r_u2, half))
        } else {
            let mu = clamp_abs(mu, half);
            (clamp_abs(mu * u1_u2 + r_u1, half), mu)
        }
    };

    (r - lambda * u1 + mu * u2).norm()
}

/// Angle between two axes ignoring their sense, in `[0, pi/2]`
pub fn axis_angle(u1: &NVec3, u2: &NVec3) -> f64 {
    clamp_unit(u1.dot(u2).abs()).acos()
}

/// Clamp a cosine into `[-1, 1]` so `acos` never sees round-off overshoot
pub fn clamp_unit(x: f64) -> f64 {
    x.clamp(-1.0, 1.0)
}

/// Keep `|x| <= limit`, preserving the sign of `x`
fn clamp_abs(x: f64, limit: f64) -> f64 {
    if x.abs() > limit { limit.copysign(x) } else { x }
}

/// Brute-force reference: sample both segments on a fine grid
#[cfg(test)]
fn sampled_distance(r: &NVec3, u1: &NVec3, u2: &NVec3, length: f64) -> f64 {
    let steps = 400;
    let mut best = f64::INFINITY;
    for a in 0..=steps {
        let lambda = length * (a as f64 / steps as f64 - 0.5);
        for b in 0..=steps {
            let mu = length * (b as f64 / steps as f64 - 0.5);
            best = best.min((r + mu * u2 - lambda * u1).norm());
        }
    }
    best
}
