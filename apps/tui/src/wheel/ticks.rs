/// Turns the continuous rotation stream of one spin into discrete
/// "segment boundary crossed" events.
///
/// The detector is forward-only. A reading that goes backwards never
/// un-ticks; the boundary it had reached stays reached until `reset`.
#[derive(Debug, Clone, PartialEq)]
pub struct TickDetector {
    angle_per_item: f64,
    last_boundary: Option<i64>,
}

impl TickDetector {
    pub const fn new(angle_per_item: f64) -> Self {
        Self {
            angle_per_item,
            last_boundary: None,
        }
    }

    /// A detector that treats the boundary `angle` already rests on as ticked,
    /// so only boundaries crossed afterwards produce events.
    pub fn starting_at(angle_per_item: f64, angle: f64) -> Self {
        let mut detector = Self::new(angle_per_item);
        detector.last_boundary = Some(detector.boundary_index(angle));
        detector
    }

    pub fn boundary_index(&self, angle: f64) -> i64 {
        (angle / self.angle_per_item).floor() as i64
    }

    /// Feeds one reading. Returns the new boundary index when this reading
    /// crossed into it, `None` otherwise. Skipped frames collapse into a
    /// single event for the furthest boundary reached.
    pub fn observe(&mut self, angle: f64) -> Option<i64> {
        if !angle.is_finite() {
            return None;
        }

        let index = self.boundary_index(angle);
        if self.last_boundary.is_some_and(|last| index <= last) {
            return None;
        }

        self.last_boundary = Some(index);
        Some(index)
    }

    pub fn reset(&mut self) {
        self.last_boundary = None;
    }

    pub const fn last_boundary(&self) -> Option<i64> {
        self.last_boundary
    }

    pub const fn angle_per_item(&self) -> f64 {
        self.angle_per_item
    }
}
