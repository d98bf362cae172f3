//! Structured level data produced from a parsed chart.
//!
//! The JSON shape follows the Sonolus level data file: a background music
//! offset and a flat list of entities, each tagged with an archetype and a
//! list of named values or references to other named entities.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A fully parsed, playable level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct LevelData {
    /// Offset of the background music, in seconds.
    pub bgm_offset: f64,
    /// Entities in spawn order.
    pub entities: Vec<LevelDataEntity>,
}

impl LevelData {
    /// Creates empty level data with the given music offset.
    pub fn new(bgm_offset: f64) -> Self {
        Self {
            bgm_offset,
            entities: Vec::new(),
        }
    }

    /// Appends an entity.
    pub fn push(&mut self, entity: LevelDataEntity) {
        self.entities.push(entity);
    }

    /// Returns an iterator over entities of the given archetype.
    pub fn archetype<'a>(
        &'a self,
        archetype: &'a str,
    ) -> impl Iterator<Item = &'a LevelDataEntity> + 'a {
        self.entities
            .iter()
            .filter(move |entity| entity.archetype == archetype)
    }

    /// Finds an entity by name.
    pub fn find(&self, name: &str) -> Option<&LevelDataEntity> {
        self.entities
            .iter()
            .find(|entity| entity.name.as_deref() == Some(name))
    }
}

/// A single entity in the level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct LevelDataEntity {
    /// Name other entities use to reference this one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Archetype the engine spawns for this entity.
    pub archetype: String,
    /// Named data values.
    #[serde(default)]
    pub data: Vec<LevelDataValue>,
}

impl LevelDataEntity {
    /// Creates an anonymous entity with no data.
    pub fn new(archetype: impl Into<String>) -> Self {
        Self {
            name: None,
            archetype: archetype.into(),
            data: Vec::new(),
        }
    }

    /// Sets the entity name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Appends a numeric value.
    pub fn with_value(mut self, name: impl Into<String>, value: f64) -> Self {
        self.data.push(LevelDataValue::Value {
            name: name.into(),
            value,
        });
        self
    }

    /// Appends a reference to another named entity.
    pub fn with_ref(mut self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.data.push(LevelDataValue::Ref {
            name: name.into(),
            reference: target.into(),
        });
        self
    }

    /// Returns the numeric value stored under `name`.
    pub fn value(&self, name: &str) -> Option<f64> {
        self.data.iter().find_map(|item| match item {
            LevelDataValue::Value { name: n, value } if n == name => Some(*value),
            _ => None,
        })
    }

    /// Returns the entity name referenced under `name`.
    pub fn reference(&self, name: &str) -> Option<&str> {
        self.data.iter().find_map(|item| match item {
            LevelDataValue::Ref { name: n, reference } if n == name => Some(reference.as_str()),
            _ => None,
        })
    }
}

/// A named entity value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(untagged)]
pub enum LevelDataValue {
    /// Plain numeric value.
    Value { name: String, value: f64 },
    /// Reference to another entity by name.
    Ref {
        name: String,
        #[serde(rename = "ref")]
        reference: String,
    },
}
