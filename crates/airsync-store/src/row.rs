use airsync_core::SensorReading;
use chrono::NaiveDateTime;

/// Column list shared by every SELECT/INSERT on `air_sensors`.
pub(crate) const COLUMNS: &str =
    "id, sensor_id, timestamp, pm25, pm10, co, no2, o3, so2, temperature, humidity";

/// Raw row as both backends return it. Timestamps are stored without a zone
/// and always hold UTC.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ReadingRow {
    pub id: i64,
    pub sensor_id: String,
    pub timestamp: NaiveDateTime,
    pub pm25: f64,
    pub pm10: f64,
    pub co: f64,
    pub no2: f64,
    pub o3: f64,
    pub so2: f64,
    pub temperature: f64,
    pub humidity: f64,
}

impl From<ReadingRow> for SensorReading {
    fn from(row: ReadingRow) -> Self {
        SensorReading {
            id: row.id,
            sensor_id: row.sensor_id,
            timestamp: row.timestamp.and_utc(),
            pm25: row.pm25,
            pm10: row.pm10,
            co: row.co,
            no2: row.no2,
            o3: row.o3,
            so2: row.so2,
            temperature: row.temperature,
            humidity: row.humidity,
        }
    }
}
