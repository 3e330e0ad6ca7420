use crate::io::Properties;
use serde_json::Value;
use std::fmt;

/// Compass direction of a labelled line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub fn letter(&self) -> &'static str {
        match self {
            Direction::North => "N",
            Direction::South => "S",
            Direction::East => "E",
            Direction::West => "W",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.letter())
    }
}

/// Attributes of one graticule line.
#[derive(Debug, Clone, PartialEq)]
pub struct GraticuleLabel {
    /// Contour value rounded to whole degrees
    pub degrees: i64,
    /// Unset on the 0 line
    pub direction: Option<Direction>,
    pub display: String,
    /// Signed contour value
    pub value: f64,
    pub scalerank: Option<i64>,
}

impl GraticuleLabel {
    fn with_directions(value: f64, positive: Direction, negative: Direction) -> GraticuleLabel {
        let degrees = value.round() as i64;
        let (direction, display) = match degrees {
            0 => (None, "0".to_string()),
            d if d > 0 => (Some(positive), format!("{} {}", d, positive)),
            d => (Some(negative), format!("{} {}", -d, negative)),
        };
        GraticuleLabel {
            degrees,
            direction,
            display,
            value,
            scalerank: None,
        }
    }

    /// Label of a QD latitude line, north for positive values.
    pub fn latitude(value: f64) -> GraticuleLabel {
        GraticuleLabel::with_directions(value, Direction::North, Direction::South)
    }

    /// Label of a QD longitude line, west for positive values.
    pub fn longitude(value: f64) -> GraticuleLabel {
        GraticuleLabel::with_directions(value, Direction::West, Direction::East)
    }

    /// Label of the 0 and 180 meridians, which are both displayed as 0.
    pub fn meridian(value: f64) -> GraticuleLabel {
        GraticuleLabel {
            degrees: 0,
            direction: None,
            display: "0".to_string(),
            value,
            scalerank: None,
        }
    }

    /// Feature properties, with the contour value stored under `field_name`.
    pub fn to_properties(&self, field_name: &str) -> Properties {
        let mut properties = Properties::new();
        properties.insert("degrees".to_string(), Value::from(self.degrees));
        properties.insert(
            "direction".to_string(),
            self.direction
                .map_or(Value::Null, |d| Value::from(d.letter())),
        );
        properties.insert("display".to_string(), Value::from(self.display.as_str()));
        properties.insert(field_name.to_string(), Value::from(self.value));
        properties.insert(
            "scalerank".to_string(),
            self.scalerank.map_or(Value::Null, Value::from),
        );
        properties
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_has_no_direction() {
        for label in [GraticuleLabel::latitude(0.0), GraticuleLabel::longitude(-0.3)] {
            assert_eq!(label.degrees, 0);
            assert_eq!(label.direction, None);
            assert_eq!(label.display, "0");
        }
    }

    #[test]
    fn longitude_directions() {
        let west = GraticuleLabel::longitude(45.0);
        assert_eq!(west.direction, Some(Direction::West));
        assert_eq!(west.display, "45 W");
        let east = GraticuleLabel::longitude(-45.0);
        assert_eq!(east.degrees, -45);
        assert_eq!(east.direction, Some(Direction::East));
        assert_eq!(east.display, "45 E");
    }

    #[test]
    fn latitude_directions() {
        assert_eq!(GraticuleLabel::latitude(59.6).display, "60 N");
        assert_eq!(GraticuleLabel::latitude(-30.0).display, "30 S");
    }

    #[test]
    fn meridians_display_zero() {
        let label = GraticuleLabel::meridian(180.0);
        assert_eq!(label.degrees, 0);
        assert_eq!(label.display, "0");
        assert_eq!(label.value, 180.0);
    }

    #[test]
    fn properties_follow_schema_order() {
        let properties = GraticuleLabel::longitude(-90.0).to_properties("dd");
        let keys: Vec<&str> = properties.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["degrees", "direction", "display", "dd", "scalerank"]);
        assert_eq!(properties["degrees"], Value::from(-90));
        assert_eq!(properties["direction"], Value::from("E"));
        assert_eq!(properties["dd"], Value::from(-90.0));
        assert_eq!(properties["scalerank"], Value::Null);
    }
}
