use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A freshly generated reading that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewReading {
    /// Sensor label, `sensor-1` … `sensor-10`.
    pub sensor_id: String,
    /// Generation time, whole seconds.
    pub timestamp: DateTime<Utc>,
    /// Fine particulate matter, µg/m³.
    pub pm25: f64,
    /// Coarse particulate matter, µg/m³.
    pub pm10: f64,
    /// Carbon monoxide, ppm.
    pub co: f64,
    /// Nitrogen dioxide, ppb.
    pub no2: f64,
    /// Ozone, ppb.
    pub o3: f64,
    /// Sulphur dioxide, ppb.
    pub so2: f64,
    /// Air temperature, °C.
    pub temperature: f64,
    /// Relative humidity, %.
    pub humidity: f64,
}

impl NewReading {
    /// Attach the row id assigned by the primary store.
    pub fn with_id(self, id: i64) -> SensorReading {
        SensorReading {
            id,
            sensor_id: self.sensor_id,
            timestamp: self.timestamp,
            pm25: self.pm25,
            pm10: self.pm10,
            co: self.co,
            no2: self.no2,
            o3: self.o3,
            so2: self.so2,
            temperature: self.temperature,
            humidity: self.humidity,
        }
    }
}

/// A stored reading. `id` is the primary store's row id and the key the
/// secondary store mirrors on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub id: i64,
    pub sensor_id: String,
    pub timestamp: DateTime<Utc>,
    pub pm25: f64,
    pub pm10: f64,
    pub co: f64,
    pub no2: f64,
    pub o3: f64,
    pub so2: f64,
    pub temperature: f64,
    pub humidity: f64,
}
