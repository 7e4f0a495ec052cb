//! GeoJSON FeatureCollection to records

use geojson::{GeoJson, Value};
use icpe_core::{GeoPoint, Record};

use crate::DataError;

/// Records parsed from a FeatureCollection, in file order
#[derive(Debug)]
pub struct ParsedFeatures {
    pub records: Vec<Record>,
    /// Features without a usable Point geometry
    pub skipped: usize,
}

/// Parse a FeatureCollection document
///
/// Features whose geometry is not a finite `[longitude, latitude]` point are
/// skipped and counted; missing properties yield a record without attributes.
pub fn parse_feature_collection(text: &str) -> Result<ParsedFeatures, DataError> {
    let geojson: GeoJson = text.parse()?;

    let collection = match geojson {
        GeoJson::FeatureCollection(collection) => collection,
        GeoJson::Feature(_) => return Err(DataError::NotFeatureCollection("Feature")),
        GeoJson::Geometry(_) => return Err(DataError::NotFeatureCollection("Geometry")),
    };

    let mut records = Vec::with_capacity(collection.features.len());
    let mut skipped = 0;

    for feature in &collection.features {
        let Some(point) = feature.geometry.as_ref().and_then(|g| point_of(&g.value)) else {
            skipped += 1;
            continue;
        };

        let record = match &feature.properties {
            Some(properties) => Record::from_properties(point, properties),
            None => Record::new(point),
        };
        records.push(record);
    }

    Ok(ParsedFeatures { records, skipped })
}

fn point_of(value: &Value) -> Option<GeoPoint> {
    match value {
        Value::Point(position) if position.len() >= 2 => {
            let (lon, lat) = (position[0], position[1]);
            (lon.is_finite() && lat.is_finite()).then(|| GeoPoint::new(lat, lon))
        }
        _ => None,
    }
}
