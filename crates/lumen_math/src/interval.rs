/// A closed range of scalar values, used for the per-axis extent of a box.
///
/// The empty interval is `[+inf, -inf]`, so growing it by any value yields
/// exactly that value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Returns the size of the interval (max - min).
    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    /// Midpoint of the interval.
    pub fn center(&self) -> f32 {
        (self.min + self.max) * 0.5
    }

    /// True when min > max.
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Returns true if x is within the interval [min, max] (inclusive).
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// Clamps x to be within the interval [min, max].
    pub fn clamp(&self, x: f32) -> f32 {
        x.max(self.min).min(self.max)
    }

    /// Grow the interval so that it contains `x`.
    pub fn include(&mut self, x: f32) {
        self.min = self.min.min(x);
        self.max = self.max.max(x);
    }

    /// Creates an interval that surrounds two other intervals.
    pub fn surrounding(a: &Interval, b: &Interval) -> Interval {
        Interval::new(a.min.min(b.min), a.max.max(b.max))
    }

    /// An empty interval (min > max, contains nothing).
    pub const EMPTY: Interval = Interval {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    };

    /// A universe interval (contains everything).
    pub const UNIVERSE: Interval = Interval {
        min: f32::NEG_INFINITY,
        max: f32::INFINITY,
    };
}

impl Default for Interval {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_size_and_center() {
        let interval = Interval::new(-2.0, 6.0);
        assert_eq!(interval.size(), 8.0);
        assert_eq!(interval.center(), 2.0);
    }

    #[test]
    fn test_interval_contains_is_inclusive() {
        let interval = Interval::new(0.0, 10.0);
        assert!(interval.contains(0.0));
        assert!(interval.contains(10.0));
        assert!(!interval.contains(-0.1));
        assert!(!interval.contains(10.1));
    }

    #[test]
    fn test_interval_clamp() {
        let interval = Interval::new(0.0, 1.0);
        assert_eq!(interval.clamp(-5.0), 0.0);
        assert_eq!(interval.clamp(0.25), 0.25);
        assert_eq!(interval.clamp(3.0), 1.0);
    }

    #[test]
    fn test_empty_interval_grows_to_single_value() {
        let mut interval = Interval::EMPTY;
        assert!(interval.is_empty());
        assert!(!interval.contains(0.0));

        interval.include(3.0);
        assert_eq!(interval, Interval::new(3.0, 3.0));
        assert!(!interval.is_empty());

        interval.include(-1.0);
        assert_eq!(interval, Interval::new(-1.0, 3.0));
    }

    #[test]
    fn test_surrounding_with_empty_is_identity() {
        let a = Interval::new(1.0, 5.0);
        assert_eq!(Interval::surrounding(&a, &Interval::EMPTY), a);
        assert_eq!(Interval::surrounding(&Interval::EMPTY, &a), a);
    }

    #[test]
    fn test_universe_contains_everything() {
        assert!(Interval::UNIVERSE.contains(1e30));
        assert!(Interval::UNIVERSE.contains(-1e30));
        assert_eq!(Interval::UNIVERSE.size(), f32::INFINITY);
    }
}
