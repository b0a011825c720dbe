use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One decoded snapshot of the cloud watcher.
///
/// All fields come from a single read of a single snapshot file,
/// nothing is defaulted or carried over from an earlier reading.
/// The serialized names are the stable output names of the JSON api,
/// they are unrelated to the keys of the snapshot file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    pub timestamp: DateTime<Utc>,
    pub cloud_watcher_info: String,
    pub sky_light_detector_data: String,
    pub cloud_temperature: f64,
    pub clouds_safe: bool,
    pub temperature: f64,
    pub wind: f64,
    pub wind_safe: bool,
    pub gust: f64,
    pub rain: i32,
    pub rain_safe: bool,
    pub light: i32,
    pub light_safe: bool,
    pub switch_closed: bool,
    pub safe: bool,
    pub humidity: f64,
    pub humidity_safe: bool,
    pub dew_point: f64,
    pub absolute_pressure: f64,
    pub relative_pressure: f64,
    pub pressure_safe: bool,
    pub raw_infrared: f64,
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;

    fn reading() -> Reading {
        Reading {
            timestamp: Utc.with_ymd_and_hms(2024, 3, 7, 13, 45, 2).unwrap(),
            cloud_watcher_info: "CloudWatcher 5.89".to_owned(),
            sky_light_detector_data: String::new(),
            cloud_temperature: -15.27,
            clouds_safe: true,
            temperature: 12.5,
            wind: 4.0,
            wind_safe: true,
            gust: 6.0,
            rain: 3024,
            rain_safe: true,
            light: 2712,
            light_safe: false,
            switch_closed: true,
            safe: false,
            humidity: 61.0,
            humidity_safe: true,
            dew_point: 5.2,
            absolute_pressure: 1013.2,
            relative_pressure: 1021.7,
            pressure_safe: true,
            raw_infrared: -13.9,
        }
    }

    #[test]
    fn test_output_names() {
        let value = serde_json::to_value(reading()).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(22, object.len());
        assert_eq!("2024-03-07T13:45:02Z", object["timestamp"]);
        assert_eq!("CloudWatcher 5.89", object["cloudWatcherInfo"]);
        assert_eq!("", object["skyLightDetectorData"]);
        assert_eq!(-15.27, object["cloudTemperature"]);
        assert_eq!(true, object["switchClosed"]);
        assert_eq!(3024, object["rain"]);
        assert_eq!(1021.7, object["relativePressure"]);
        assert_eq!(-13.9, object["rawInfrared"]);
    }

    #[test]
    fn test_output_is_readable_again() {
        let expected = reading();
        let json = serde_json::to_string(&expected).unwrap();

        let actual: Reading = serde_json::from_str(&json).unwrap();

        assert_eq!(expected, actual);
    }
}
