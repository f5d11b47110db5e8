//! Session statistics over emitted distances

/// Count, extremes and mean of the samples sent so far
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStats {
    count: u64,
    sum: f64,
    min: Option<f64>,
    max: Option<f64>,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, distance: f64) {
        self.count += 1;
        self.sum += distance;
        self.min = Some(self.min.map_or(distance, |m| m.min(distance)));
        self.max = Some(self.max.map_or(distance, |m| m.max(distance)));
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn min(&self) -> Option<f64> {
        self.min
    }

    pub fn max(&self) -> Option<f64> {
        self.max
    }

    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let stats = SessionStats::new();
        assert_eq!(stats.count(), 0);
        assert_eq!(stats.mean(), None);
        assert_eq!(stats.min(), None);
    }

    #[test]
    fn test_min_max_mean() {
        let mut stats = SessionStats::new();
        for d in [150.0, 120.0, 180.0, 130.0] {
            stats.push(d);
        }
        assert_eq!(stats.count(), 4);
        assert_eq!(stats.min(), Some(120.0));
        assert_eq!(stats.max(), Some(180.0));
        assert_eq!(stats.mean(), Some(145.0));
    }
}
