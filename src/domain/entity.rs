use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::geometry::{Point, PointSequence};
use crate::path::extract_points;

/// Label used in diagnostics for entities without a usable `class`
pub const UNKNOWN_LABEL: &str = "???";

const CLASS: &str = "class";
const PATHS: &str = "paths";
const PATH_D: &str = "d";
const CENTER: &str = "center";
const NAMES: &str = "names";

/// A dataset record, typically one country
///
/// The record is kept as its raw JSON object so every field, known or not,
/// survives a run with its original value and position. Derived fields are
/// written in place when already present and appended otherwise. Reads are
/// lenient: a field of an unexpected type is treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entity(Map<String, Value>);

impl Entity {
    /// Build a record with a string `class` and one path per description
    pub fn new(class: &str, paths: &[&str]) -> Self {
        let mut fields = Map::new();
        fields.insert(CLASS.to_string(), Value::from(class));
        fields.insert(
            PATHS.to_string(),
            paths.iter().map(|d| json!({ (PATH_D): d })).collect(),
        );
        Self(fields)
    }

    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Identifying value, usually a country name string
    pub fn class(&self) -> Option<&Value> {
        self.0.get(CLASS)
    }

    pub fn label(&self) -> Cow<'_, str> {
        match self.class() {
            Some(Value::String(s)) => Cow::Borrowed(s.as_str()),
            None | Some(Value::Null) => Cow::Borrowed(UNKNOWN_LABEL),
            Some(other) => Cow::Owned(other.to_string()),
        }
    }

    fn path_values(&self) -> &[Value] {
        match self.0.get(PATHS) {
            Some(Value::Array(paths)) => paths,
            _ => &[],
        }
    }

    /// False when `paths` is missing, empty or not a list
    pub fn has_paths(&self) -> bool {
        !self.path_values().is_empty()
    }

    /// Parse every path description into a point sequence
    ///
    /// A path without a string `d` yields an empty sequence.
    pub fn point_sequences(&self) -> Vec<PointSequence> {
        self.path_values()
            .iter()
            .map(|path| {
                path.get(PATH_D)
                    .and_then(Value::as_str)
                    .map(extract_points)
                    .unwrap_or_default()
            })
            .collect()
    }

    pub fn center(&self) -> Option<Point> {
        self.0
            .get(CENTER)
            .and_then(|v| Point::deserialize(v).ok())
    }

    pub fn set_center(&mut self, center: Point) {
        self.0
            .insert(CENTER.to_string(), json!({ "x": center.x, "y": center.y }));
    }

    pub fn names(&self) -> Option<&Value> {
        self.0.get(NAMES)
    }

    pub fn set_names(&mut self, names: Vec<Value>) {
        self.0.insert(NAMES.to_string(), Value::Array(names));
    }
}
