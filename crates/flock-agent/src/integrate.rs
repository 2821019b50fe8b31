//! Kinematic integration: apply a steering force under a max-speed clamp.

use flock_core::{FlockError, FlockResult, Vec3, clamp_length_to};

/// Advance one agent by `dt` seconds under `force`.
///
/// 1. `velocity += force * dt`
/// 2. clamp `|velocity|` to `max_speed` (direction preserved)
/// 3. `position += velocity * dt`
///
/// Deterministic; no hidden state.  A non-finite or non-positive `dt` is
/// rejected with [`FlockError::InvalidTimestep`] and leaves both vectors
/// untouched.
#[inline]
pub fn integrate(
    position:  &mut Vec3,
    velocity:  &mut Vec3,
    force:     Vec3,
    dt:        f32,
    max_speed: f32,
) -> FlockResult<()> {
    if !(dt.is_finite() && dt > 0.0) {
        return Err(FlockError::InvalidTimestep(dt));
    }

    let mut v = *velocity + force * dt;
    if v.length_squared() > max_speed * max_speed {
        v = clamp_length_to(v, max_speed);
    }
    // A non-finite force must not poison the agent: keep the old velocity.
    if !v.is_finite() {
        v = clamp_length_to(*velocity, max_speed);
    }

    *velocity = v;
    *position += v * dt;
    Ok(())
}
