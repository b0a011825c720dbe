use crate::error::MetricsError;
use crate::source::SnapshotSource;
use aag_core::Reading;
use parking_lot::Mutex;
use prometheus::{Encoder, Gauge, Registry, TextEncoder};
use tracing::debug;

/// Gauges of the exporter, registered once at startup.
///
/// The registry is private to the exporter, so a scrape only ever
/// contains `aag_*` series.
pub struct AagMetrics {
    registry: Registry,
    collect_lock: Mutex<()>,
    clouds_safe: Gauge,
    wind_safe: Gauge,
    rain_safe: Gauge,
    light_safe: Gauge,
    humidity_safe: Gauge,
    pressure_safe: Gauge,
    safe: Gauge,
    switch: Gauge,
    cloud_temperature: Gauge,
    temperature: Gauge,
    wind: Gauge,
    gust: Gauge,
    rain: Gauge,
    light: Gauge,
    humidity: Gauge,
    dew_point: Gauge,
    abs_pressure: Gauge,
    rel_pressure: Gauge,
    raw_infrared: Gauge,
}

fn register_gauge(registry: &Registry, name: &str, help: &str) -> Result<Gauge, MetricsError> {
    let gauge = Gauge::new(name, help)?;
    registry.register(Box::new(gauge.clone()))?;
    Ok(gauge)
}

fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

impl AagMetrics {
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();
        let gauge = |name: &str, help: &str| register_gauge(&registry, name, help);

        let clouds_safe = gauge("aag_clouds_safe", "1 when clouds are safe.")?;
        let wind_safe = gauge("aag_wind_safe", "1 when wind is safe.")?;
        let rain_safe = gauge("aag_rain_safe", "1 when rain is safe.")?;
        let light_safe = gauge("aag_light_safe", "1 when light is safe.")?;
        let humidity_safe = gauge("aag_humidity_safe", "1 when humidity is safe.")?;
        let pressure_safe = gauge("aag_pressure_safe", "1 when pressure is safe.")?;
        let safe = gauge("aag_safe", "1 when all sensors are safe.")?;
        let switch = gauge("aag_switch", "1 when the relay is closed.")?;
        let cloud_temperature =
            gauge("aag_cloud_temperature", "Cloud temperature in degrees C.")?;
        let temperature = gauge("aag_temperature", "Air temperature in degrees C.")?;
        let wind = gauge("aag_wind", "Wind speed in km/h.")?;
        let gust = gauge("aag_gust", "Wind gust speed in km/h.")?;
        let rain = gauge("aag_rain", "Rain in arbitrary units.")?;
        let light = gauge("aag_light", "Light in arbitrary units.")?;
        let humidity = gauge("aag_humidity", "Relative humidity 0 to 100 percent.")?;
        let dew_point = gauge("aag_dewpoint", "Dew point in degrees C.")?;
        let abs_pressure = gauge("aag_abs_pressure", "Absolute pressure in mbar.")?;
        let rel_pressure = gauge("aag_rel_pressure", "Relative pressure in mbar.")?;
        let raw_infrared = gauge("aag_rawir", "Raw infrared in arbitrary units.")?;

        Ok(AagMetrics {
            registry,
            collect_lock: Mutex::new(()),
            clouds_safe,
            wind_safe,
            rain_safe,
            light_safe,
            humidity_safe,
            pressure_safe,
            safe,
            switch,
            cloud_temperature,
            temperature,
            wind,
            gust,
            rain,
            light,
            humidity,
            dew_point,
            abs_pressure,
            rel_pressure,
            raw_infrared,
        })
    }

    /// Writes every field of `reading` into its gauge
    pub fn publish(&self, reading: &Reading) {
        self.clouds_safe.set(flag(reading.clouds_safe));
        self.wind_safe.set(flag(reading.wind_safe));
        self.rain_safe.set(flag(reading.rain_safe));
        self.light_safe.set(flag(reading.light_safe));
        self.humidity_safe.set(flag(reading.humidity_safe));
        self.pressure_safe.set(flag(reading.pressure_safe));
        self.safe.set(flag(reading.safe));
        self.switch.set(flag(reading.switch_closed));
        self.cloud_temperature.set(reading.cloud_temperature);
        self.temperature.set(reading.temperature);
        self.wind.set(reading.wind);
        self.gust.set(reading.gust);
        self.rain.set(f64::from(reading.rain));
        self.light.set(f64::from(reading.light));
        self.humidity.set(reading.humidity);
        self.dew_point.set(reading.dew_point);
        self.abs_pressure.set(reading.absolute_pressure);
        self.rel_pressure.set(reading.relative_pressure);
        self.raw_infrared.set(reading.raw_infrared);
    }

    /// Runs one collection cycle and returns the text exposition.
    ///
    /// A failed read returns before any gauge is written. Cycles are
    /// serialized, so one export never mixes two readings.
    pub fn collect(&self, source: &SnapshotSource) -> Result<String, MetricsError> {
        let _cycle = self.collect_lock.lock();

        let reading = source.read_reading()?;
        self.publish(&reading);
        debug!(timestamp = %reading.timestamp, "Published reading");

        self.encode()
    }

    fn encode(&self) -> Result<String, MetricsError> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
