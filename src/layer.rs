use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{Point, Region};

/// Kinds of primitives a layer can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerType {
    Pen,
    Arrow,
    Blur,
    Mosaic,
}

/// A freehand stroke
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub points: Vec<Point>,
    pub color: String,
    pub width: f32,
}

impl Path {
    pub fn new(start: Point, color: impl Into<String>, width: f32) -> Self {
        Self {
            points: vec![start],
            color: color.into(),
            width,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Arrow {
    pub id: Uuid,
    pub start: Point,
    pub end: Point,
    pub color: String,
    pub width: f32,
    pub head_size: f32,
}

/// A region an effect was applied to, with the effect's strength
/// (blur radius or mosaic block size)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectRegion {
    pub id: Uuid,
    pub region: Region,
    pub strength: f32,
}

impl EffectRegion {
    pub fn new(region: Region, strength: f32) -> Self {
        Self {
            id: Uuid::new_v4(),
            region,
            strength,
        }
    }
}

/// Layer payload; the variant is the layer's type tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum LayerData {
    Pen { paths: Vec<Path> },
    Arrow { arrows: Vec<Arrow> },
    Blur { regions: Vec<EffectRegion> },
    Mosaic { regions: Vec<EffectRegion> },
}

impl LayerData {
    pub fn empty(layer_type: LayerType) -> Self {
        match layer_type {
            LayerType::Pen => LayerData::Pen { paths: Vec::new() },
            LayerType::Arrow => LayerData::Arrow { arrows: Vec::new() },
            LayerType::Blur => LayerData::Blur { regions: Vec::new() },
            LayerType::Mosaic => LayerData::Mosaic { regions: Vec::new() },
        }
    }

    pub fn layer_type(&self) -> LayerType {
        match self {
            LayerData::Pen { .. } => LayerType::Pen,
            LayerData::Arrow { .. } => LayerType::Arrow,
            LayerData::Blur { .. } => LayerType::Blur,
            LayerData::Mosaic { .. } => LayerType::Mosaic,
        }
    }

    /// Number of primitives recorded in this payload
    pub fn len(&self) -> usize {
        match self {
            LayerData::Pen { paths } => paths.len(),
            LayerData::Arrow { arrows } => arrows.len(),
            LayerData::Blur { regions } | LayerData::Mosaic { regions } => regions.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A committed, typed collection of primitives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: Uuid,
    pub data: LayerData,
    pub visible: bool,
    pub locked: bool,
}

impl Layer {
    pub fn new(layer_type: LayerType) -> Self {
        Self {
            id: Uuid::new_v4(),
            data: LayerData::empty(layer_type),
            visible: true,
            locked: false,
        }
    }

    pub fn layer_type(&self) -> LayerType {
        self.data.layer_type()
    }

    /// Adds a path; returns false if this is not a pen layer
    pub fn add_path(&mut self, path: Path) -> bool {
        match &mut self.data {
            LayerData::Pen { paths } => {
                paths.push(path);
                true
            }
            _ => false,
        }
    }

    /// Adds an arrow; returns false if this is not an arrow layer
    pub fn add_arrow(&mut self, arrow: Arrow) -> bool {
        match &mut self.data {
            LayerData::Arrow { arrows } => {
                arrows.push(arrow);
                true
            }
            _ => false,
        }
    }

    /// Adds an effect region; returns false if this is not a blur or mosaic layer
    pub fn add_region(&mut self, region: EffectRegion) -> bool {
        match &mut self.data {
            LayerData::Blur { regions } | LayerData::Mosaic { regions } => {
                regions.push(region);
                true
            }
            _ => false,
        }
    }
}
