//! Finished measurement records and their units.

use std::fmt;

use constants::units::{
    METERS_PER_KILOMETER, MIN_AREA_VERTICES, MIN_DISTANCE_VERTICES, SQUARE_METERS_PER_HECTARE,
};
use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// What a shape measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementKind {
    Distance,
    Area,
}

impl MeasurementKind {
    /// Confirmed vertices required before the shape may finish.
    pub fn min_vertices(self) -> usize {
        match self {
            Self::Distance => MIN_DISTANCE_VERTICES,
            Self::Area => MIN_AREA_VERTICES,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Distance => "distance",
            Self::Area => "area",
        }
    }
}

impl fmt::Display for MeasurementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementUnit {
    Meters,
    Kilometers,
    SquareMeters,
    Hectares,
}

impl MeasurementUnit {
    /// Short symbol used in labels.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Meters => "m",
            Self::Kilometers => "km",
            Self::SquareMeters => "m²",
            Self::Hectares => "ha",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Meters => "meters",
            Self::Kilometers => "kilometers",
            Self::SquareMeters => "square_meters",
            Self::Hectares => "hectares",
        }
    }
}

/// A metric value after unit auto-scaling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledValue {
    pub value: f64,
    pub unit: MeasurementUnit,
}

impl ScaledValue {
    /// Metres below one kilometre stay in metres, everything else is
    /// reported in kilometres.
    pub fn from_length(meters: f64) -> Self {
        if meters < METERS_PER_KILOMETER {
            Self {
                value: meters,
                unit: MeasurementUnit::Meters,
            }
        } else {
            Self {
                value: meters / METERS_PER_KILOMETER,
                unit: MeasurementUnit::Kilometers,
            }
        }
    }

    /// Square metres below one hectare stay in square metres, everything
    /// else is reported in hectares.
    pub fn from_area(square_meters: f64) -> Self {
        if square_meters < SQUARE_METERS_PER_HECTARE {
            Self {
                value: square_meters,
                unit: MeasurementUnit::SquareMeters,
            }
        } else {
            Self {
                value: square_meters / SQUARE_METERS_PER_HECTARE,
                unit: MeasurementUnit::Hectares,
            }
        }
    }

    pub fn from_metric(kind: MeasurementKind, si_value: f64) -> Self {
        match kind {
            MeasurementKind::Distance => Self::from_length(si_value),
            MeasurementKind::Area => Self::from_area(si_value),
        }
    }

    /// Two-decimal display string, `"0"` for an empty measurement.
    pub fn label(&self) -> String {
        if self.value == 0.0 {
            return "0".to_string();
        }
        format!("{:.2} {}", self.value, self.unit.symbol())
    }
}

/// GeoJSON geometry of a finished shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    LineString(Vec<[f64; 2]>),
    Polygon(Vec<Vec<[f64; 2]>>),
}

impl Geometry {
    /// Build the geometry for a shape from its confirmed vertices. Area rings
    /// are closed by repeating the first vertex.
    pub fn from_vertices(kind: MeasurementKind, vertices: &[GeoPoint]) -> Self {
        let coordinates: Vec<[f64; 2]> = vertices.iter().map(GeoPoint::lon_lat).collect();
        match kind {
            MeasurementKind::Distance => Self::LineString(coordinates),
            MeasurementKind::Area => {
                let mut ring = coordinates;
                if let Some(first) = ring.first().copied() {
                    if ring.last() != Some(&first) || ring.len() == 1 {
                        ring.push(first);
                    }
                }
                Self::Polygon(vec![ring])
            }
        }
    }
}

/// A completed measurement, handed to the receiver exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    #[serde(rename = "measurement_type")]
    pub kind: MeasurementKind,
    pub value: f64,
    pub unit: MeasurementUnit,
    pub geometry: Geometry,
}

impl Measurement {
    /// Scale a raw metric (metres or square metres) and attach the geometry.
    pub fn new(kind: MeasurementKind, si_value: f64, vertices: &[GeoPoint]) -> Self {
        let scaled = ScaledValue::from_metric(kind, si_value);
        Self {
            kind,
            value: scaled.value,
            unit: scaled.unit,
            geometry: Geometry::from_vertices(kind, vertices),
        }
    }

    pub fn scaled(&self) -> ScaledValue {
        ScaledValue {
            value: self.value,
            unit: self.unit,
        }
    }

    pub fn label(&self) -> String {
        self.scaled().label()
    }

    pub fn to_payload(&self, name: impl Into<String>) -> MeasurementPayload {
        MeasurementPayload {
            name: name.into(),
            measurement: self.clone(),
        }
    }
}

/// Body the frontend posts to the backend when saving a measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementPayload {
    pub name: String,
    #[serde(flatten)]
    pub measurement: Measurement,
}
