//! Synthetic reading generator.
//!
//! Every numeric field is drawn uniformly from the multiples of its
//! resolution inside a closed range, so `0.0` and the upper bound are both
//! reachable and no value carries more decimals than its field allows.

use chrono::{SubsecRound, Utc};
use rand::Rng;

use crate::types::NewReading;

/// Sensors are labelled `sensor-1` … `sensor-{SENSOR_COUNT}`.
pub const SENSOR_COUNT: u32 = 10;

/// Closed range and decimal resolution of one measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRange {
    pub min: f64,
    pub max: f64,
    /// Number of decimal places kept (1 → 0.1 steps, 2 → 0.01 steps).
    pub decimals: u32,
}

impl FieldRange {
    pub const fn new(min: f64, max: f64, decimals: u32) -> Self {
        Self { min, max, decimals }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Draw one value. Sampling happens on the integer grid so the result is
    /// the closest `f64` to an exact decimal.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let scale = self.scale();
        let lo = (self.min * scale).round() as i64;
        let hi = (self.max * scale).round() as i64;
        rng.gen_range(lo..=hi) as f64 / scale
    }

    fn scale(&self) -> f64 {
        10f64.powi(self.decimals as i32)
    }
}

pub const PM25: FieldRange = FieldRange::new(0.0, 500.0, 1);
pub const PM10: FieldRange = FieldRange::new(0.0, 500.0, 1);
pub const CO: FieldRange = FieldRange::new(0.0, 50.0, 2);
pub const NO2: FieldRange = FieldRange::new(0.0, 200.0, 2);
pub const O3: FieldRange = FieldRange::new(0.0, 300.0, 2);
pub const SO2: FieldRange = FieldRange::new(0.0, 100.0, 2);
pub const TEMPERATURE: FieldRange = FieldRange::new(-10.0, 45.0, 1);
pub const HUMIDITY: FieldRange = FieldRange::new(0.0, 100.0, 1);

/// Generate one reading with the thread-local RNG.
pub fn generate() -> NewReading {
    generate_with(&mut rand::thread_rng())
}

/// Generate one reading from `rng`. Cannot fail.
pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> NewReading {
    NewReading {
        sensor_id: format!("sensor-{}", rng.gen_range(1..=SENSOR_COUNT)),
        // Both stores keep whole seconds; truncating here keeps the in-memory
        // copy identical to what gets read back.
        timestamp: Utc::now().trunc_subsecs(0),
        pm25: PM25.sample(rng),
        pm10: PM10.sample(rng),
        co: CO.sample(rng),
        no2: NO2.sample(rng),
        o3: O3.sample(rng),
        so2: SO2.sample(rng),
        temperature: TEMPERATURE.sample(rng),
        humidity: HUMIDITY.sample(rng),
    }
}
