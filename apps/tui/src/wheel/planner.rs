use super::WheelError;

/// Where the pointer sits: the top of the wheel, with 0° pointing right and
/// angles growing clockwise.
pub const POINTER_ANGLE: f64 = 270.0;

pub const FULL_TURN: f64 = 360.0;

/// Midpoint of segment `index` in the wheel's own, unrotated frame.
pub fn segment_center(index: usize, count: usize) -> f64 {
    let angle_per_item = FULL_TURN / count as f64;
    angle_per_item.mul_add(index as f64, angle_per_item / 2.0)
}

/// Computes the absolute rotation a spin has to end on so that the winning
/// segment's centre rests under the pointer, after at least `min_spins` full
/// forward turns from `current_rotation`.
///
/// The result satisfies `end >= current_rotation + 360 * min_spins` and
/// `end mod 360 == (270 - center) mod 360`.
pub fn plan_end_rotation(
    winner: usize,
    count: usize,
    current_rotation: f64,
    min_spins: u32,
) -> Result<f64, WheelError> {
    if count == 0 {
        return Err(WheelError::EmptySegmentSet);
    }
    if winner >= count {
        return Err(WheelError::WinnerOutOfRange { winner, count });
    }
    if !current_rotation.is_finite() {
        return Err(WheelError::InvalidRotation(current_rotation));
    }

    let threshold = FULL_TURN.mul_add(f64::from(min_spins), current_rotation);
    let base = POINTER_ANGLE - segment_center(winner, count);

    let turns = ((threshold - base) / FULL_TURN).ceil().max(0.0);
    let mut end = FULL_TURN.mul_add(turns, base);
    while end < threshold {
        end += FULL_TURN;
    }

    Ok(end)
}

/// Index of the segment under the pointer once the wheel has turned by `rotation`.
pub fn segment_under_pointer(rotation: f64, count: usize) -> Option<usize> {
    if count == 0 || !rotation.is_finite() {
        return None;
    }

    let angle_per_item = FULL_TURN / count as f64;
    let local = (POINTER_ANGLE - rotation).rem_euclid(FULL_TURN);
    let index = (local / angle_per_item).floor() as usize;
    Some(index.min(count - 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn assert_close(actual: f64, expected: f64) {
        let diff = (actual - expected).abs();
        assert!(diff < 1e-6, "expected {expected}, got {actual}, diff {diff}");
    }

    fn angular_distance(a: f64, b: f64) -> f64 {
        let diff = (a - b).rem_euclid(FULL_TURN);
        diff.min(FULL_TURN - diff)
    }

    #[test]
    fn eight_segments_first_spin() {
        assert_close(segment_center(4, 8), 202.5);
        let end = plan_end_rotation(4, 8, 0.0, 5).unwrap();
        assert_close(end, 1867.5);
    }

    #[test]
    fn second_spin_keeps_going_forward() {
        let end = plan_end_rotation(0, 8, 1867.5, 5).unwrap();
        assert!(end >= 3667.5);
        assert_close(end.rem_euclid(FULL_TURN), 247.5);
        assert_close(end, 3847.5);
    }

    #[test]
    fn single_segment_wheel_resolves() {
        assert_close(segment_center(0, 1), 180.0);
        let end = plan_end_rotation(0, 1, 0.0, 5).unwrap();
        assert_close(end, 1890.0);
    }

    #[test]
    fn exact_threshold_is_accepted() {
        // base = 270 - 22.5 = 247.5; with current = 247.5 - 1800 the base itself meets the threshold.
        let end = plan_end_rotation(0, 8, 247.5 - 1800.0, 5).unwrap();
        assert_close(end, 247.5);
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        assert_eq!(
            plan_end_rotation(0, 0, 0.0, 5),
            Err(WheelError::EmptySegmentSet)
        );
        assert_eq!(
            plan_end_rotation(8, 8, 0.0, 5),
            Err(WheelError::WinnerOutOfRange { winner: 8, count: 8 })
        );
        assert!(matches!(
            plan_end_rotation(0, 8, f64::NAN, 5),
            Err(WheelError::InvalidRotation(_))
        ));
    }

    #[test]
    fn pointer_lookup_inverts_planning() {
        let end = plan_end_rotation(4, 8, 0.0, 5).unwrap();
        assert_eq!(segment_under_pointer(end, 8), Some(4));
        assert_eq!(segment_under_pointer(0.0, 8), Some(6));
        assert_eq!(segment_under_pointer(0.0, 0), None);
    }

    proptest! {
        #[test]
        fn end_rotation_moves_forward_and_aligns(
            count in 1_usize..48,
            pick: usize,
            current in 0.0_f64..1.0e6,
            min_spins in 1_u32..12,
        ) {
            let winner = pick % count;
            let end = plan_end_rotation(winner, count, current, min_spins).unwrap();
            let threshold = current + FULL_TURN * f64::from(min_spins);

            prop_assert!(end >= threshold);
            prop_assert!(end < threshold + FULL_TURN + 1e-6);

            let target = POINTER_ANGLE - segment_center(winner, count);
            prop_assert!(angular_distance(end, target) < 1e-6);
            prop_assert_eq!(segment_under_pointer(end, count), Some(winner));
        }
    }
}
