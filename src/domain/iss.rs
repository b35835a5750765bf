// ISS position domain model
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::PanelError;

const PROVIDER: &str = "ISS position";

/// Wire shape of the position service. Coordinates arrive as strings.
#[derive(Debug, Clone, Deserialize)]
pub struct IssNowResponse {
    pub iss_position: RawPosition,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPosition {
    pub latitude: String,
    pub longitude: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IssPosition {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: i64,
}

impl TryFrom<IssNowResponse> for IssPosition {
    type Error = PanelError;

    fn try_from(raw: IssNowResponse) -> Result<Self, Self::Error> {
        let latitude = parse_coordinate(&raw.iss_position.latitude, "latitude", 90.0)?;
        let longitude = parse_coordinate(&raw.iss_position.longitude, "longitude", 180.0)?;
        Ok(Self {
            latitude,
            longitude,
            timestamp: raw.timestamp,
        })
    }
}

fn parse_coordinate(raw: &str, field: &str, limit: f64) -> Result<f64, PanelError> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| PanelError::parse(PROVIDER, format!("{} is not a number", field)))?;
    if !value.is_finite() || value.abs() > limit {
        return Err(PanelError::parse(
            PROVIDER,
            format!("{} {} is out of range", field, value),
        ));
    }
    Ok(value)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

/// "51.5074° N", "0.1278° W"
pub fn format_coordinate(value: f64, axis: Axis) -> String {
    let direction = match (axis, value >= 0.0) {
        (Axis::Latitude, true) => 'N',
        (Axis::Latitude, false) => 'S',
        (Axis::Longitude, true) => 'E',
        (Axis::Longitude, false) => 'W',
    };
    format!("{:.4}° {}", value.abs(), direction)
}

/// Position on an equirectangular ground-track map, both axes in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GroundTrackPoint {
    pub x_percent: f64,
    pub y_percent: f64,
}

impl IssPosition {
    pub fn ground_track(&self) -> GroundTrackPoint {
        GroundTrackPoint {
            x_percent: (self.longitude + 180.0) / 360.0 * 100.0,
            y_percent: (90.0 - self.latitude) / 180.0 * 100.0,
        }
    }

    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }
}

/// Static orbital facts shown next to the live position.
pub const ORBITAL_FACTS: [(&str, &str); 4] = [
    ("Altitude", "~408 km"),
    ("Velocity", "27,600 km/h"),
    ("Orbital Period", "93 min"),
    ("Inclination", "51.6°"),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(lat: &str, lon: &str) -> IssNowResponse {
        IssNowResponse {
            iss_position: RawPosition {
                latitude: lat.to_string(),
                longitude: lon.to_string(),
            },
            timestamp: 1_700_000_000,
        }
    }

    #[test]
    fn test_parse_string_coordinates() {
        let json = r#"{"message": "success", "timestamp": 1700000000,
            "iss_position": {"latitude": "-12.3456", "longitude": "145.0001"}}"#;
        let response: IssNowResponse = serde_json::from_str(json).unwrap();
        let position = IssPosition::try_from(response).unwrap();
        assert_eq!(position.latitude, -12.3456);
        assert_eq!(position.longitude, 145.0001);
        assert_eq!(
            position.observed_at().unwrap().to_rfc3339(),
            "2023-11-14T22:13:20+00:00"
        );
    }

    #[test]
    fn test_rejects_garbled_coordinates() {
        let err = IssPosition::try_from(raw("north", "10")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "malformed ISS position payload: latitude is not a number"
        );
        assert!(IssPosition::try_from(raw("10", "181")).is_err());
    }

    #[test]
    fn test_format_coordinate() {
        assert_eq!(format_coordinate(51.50741, Axis::Latitude), "51.5074° N");
        assert_eq!(format_coordinate(-0.1278, Axis::Longitude), "0.1278° W");
        assert_eq!(format_coordinate(-33.0, Axis::Latitude), "33.0000° S");
        assert_eq!(format_coordinate(0.0, Axis::Longitude), "0.0000° E");
    }

    #[test]
    fn test_ground_track_projection() {
        let centre = IssPosition {
            latitude: 0.0,
            longitude: 0.0,
            timestamp: 0,
        };
        assert_eq!(
            centre.ground_track(),
            GroundTrackPoint {
                x_percent: 50.0,
                y_percent: 50.0
            }
        );

        let corner = IssPosition {
            latitude: 90.0,
            longitude: -180.0,
            timestamp: 0,
        };
        assert_eq!(corner.ground_track().x_percent, 0.0);
        assert_eq!(corner.ground_track().y_percent, 0.0);
    }
}
