use rand::Rng;

use super::WheelError;

/// Picks the winning segment index for a wheel of `count` segments.
///
/// A `forced` index inside `[0, count)` wins outright, which keeps demos and
/// test harnesses reproducible. Anything else (negative, too large, absent)
/// falls back to a uniform draw from `rng`.
pub fn select_winner<R: Rng + ?Sized>(
    count: usize,
    forced: Option<i64>,
    rng: &mut R,
) -> Result<usize, WheelError> {
    if count == 0 {
        return Err(WheelError::EmptySegmentSet);
    }

    if let Some(index) = forced.and_then(|d| usize::try_from(d).ok()) {
        if index < count {
            return Ok(index);
        }
    }

    Ok(rng.gen_range(0..count))
}
