//! Random walk distance generator
//!
//! Each sample is drawn around the previous one, so the stream looks like a
//! slowly moving target instead of independent noise.

use crate::config::SimConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Carried state of the walk
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorState {
    /// Center of the next draw; the last emitted distance
    pub base_distance: f64,
    /// Sequence number of the next sample, starting at 0
    pub sequence: u64,
}

/// One generated reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub sequence: u64,
    /// `base + noise + trend` before clamping
    pub raw: f64,
    /// Clamped distance in cm
    pub distance: f64,
}

/// Seeded distance generator
pub struct Generator {
    rng: StdRng,
    state: GeneratorState,
    min_distance: f64,
    max_distance: f64,
    noise_amplitude: f64,
    trend_amplitude: f64,
}

impl Generator {
    /// Create a generator from config, seeding from entropy if no seed is set
    pub fn new(config: &SimConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        log::info!("Generator seed: {}", seed);
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    /// Create a generator driven by the given RNG
    pub fn with_rng(config: &SimConfig, rng: StdRng) -> Self {
        Self {
            rng,
            state: GeneratorState {
                base_distance: config.initial_distance,
                sequence: 0,
            },
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            noise_amplitude: config.noise_amplitude,
            trend_amplitude: config.trend_amplitude,
        }
    }

    /// Draw the next sample without committing it
    ///
    /// Only the final sum is clamped; noise and trend are never bounded
    /// individually.
    pub fn draw(&mut self) -> Sample {
        let noise = self
            .rng
            .gen_range(-self.noise_amplitude..=self.noise_amplitude);
        let trend = 2.0 * self.trend_amplitude * (self.rng.gen::<f64>() - 0.5);
        let raw = self.state.base_distance + noise + trend;

        Sample {
            sequence: self.state.sequence,
            raw,
            distance: raw.clamp(self.min_distance, self.max_distance),
        }
    }

    /// Commit an emitted sample: it becomes the new base
    pub fn advance(&mut self, sample: &Sample) {
        self.state.base_distance = sample.distance;
        self.state.sequence += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> Generator {
        Generator::with_rng(&SimConfig::default(), StdRng::seed_from_u64(seed))
    }

    impl Generator {
        fn next_sample(&mut self) -> Sample {
            let sample = self.draw();
            self.advance(&sample);
            sample
        }
    }

    #[test]
    fn test_initial_state() {
        let generator = seeded(1);
        assert_eq!(
            generator.state,
            GeneratorState {
                base_distance: 150.0,
                sequence: 0
            }
        );
    }

    #[test]
    fn test_range_invariant() {
        let mut generator = seeded(42);
        for _ in 0..20_000 {
            let sample = generator.next_sample();
            assert!(
                (10.0..=400.0).contains(&sample.distance),
                "distance {} out of range",
                sample.distance
            );
        }
    }

    #[test]
    fn test_step_bound() {
        let mut generator = seeded(7);
        for _ in 0..20_000 {
            let base = generator.state.base_distance;
            let sample = generator.next_sample();
            assert!((sample.raw - base).abs() <= 35.0);
        }
    }

    #[test]
    fn test_sequence_is_gapless() {
        let mut generator = seeded(3);
        for expected in 0..100 {
            assert_eq!(generator.next_sample().sequence, expected);
        }
        assert_eq!(generator.state.sequence, 100);
    }

    #[test]
    fn test_draw_does_not_commit() {
        let mut generator = seeded(9);
        let first = generator.draw();
        assert_eq!(generator.state.sequence, 0);
        assert_eq!(generator.state.base_distance, 150.0);

        generator.advance(&first);
        assert_eq!(generator.state.base_distance, first.distance);
        assert_eq!(generator.state.sequence, 1);
    }

    #[test]
    fn test_clamps_at_lower_bound() {
        let config = SimConfig {
            initial_distance: 10.0,
            noise_amplitude: 0.0,
            trend_amplitude: 0.0,
            ..SimConfig::default()
        };
        let mut generator = Generator::with_rng(&config, StdRng::seed_from_u64(0));
        assert_eq!(generator.next_sample().distance, 10.0);

        let config = SimConfig {
            initial_distance: 10.0,
            noise_amplitude: 20.0,
            ..SimConfig::default()
        };
        let mut generator = Generator::with_rng(&config, StdRng::seed_from_u64(11));
        for _ in 0..1000 {
            let sample = generator.next_sample();
            if sample.raw < 10.0 {
                assert_eq!(sample.distance, 10.0);
            }
        }
    }

    #[test]
    fn test_widest_accepted_envelope() {
        let config = SimConfig::parse(
            "noise_amplitude = 20.0\ntrend_amplitude = 15.0\ninitial_distance = 400.0",
        )
        .unwrap();
        let mut generator = Generator::with_rng(&config, StdRng::seed_from_u64(21));
        for _ in 0..5000 {
            let base = generator.state.base_distance;
            let sample = generator.next_sample();
            assert!((sample.raw - base).abs() <= 35.0);
            assert!((10.0..=400.0).contains(&sample.distance));
        }
        assert!(SimConfig::parse("noise_amplitude = 1e308").is_err());
    }

    #[test]
    fn test_same_seed_same_walk() {
        let mut a = seeded(99);
        let mut b = seeded(99);
        for _ in 0..50 {
            assert_eq!(a.next_sample(), b.next_sample());
        }
    }
}
