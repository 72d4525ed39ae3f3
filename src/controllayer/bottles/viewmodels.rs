use serde::{Deserialize, Serialize};

use crate::controllayer::validation::{FieldKind, FieldSpec, ViewModel};
use crate::datalayer::CRUD::helper::object_id::ObjectId;
use crate::datalayer::CRUD::types::{BottlePatch, NewBottle};

/// Body of `POST /api/v1/bottle`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddBottle {
    pub name: String,
    pub brand: String,
    pub capacity: f64,
}

impl ViewModel for AddBottle {
    const SCHEMA: &'static [FieldSpec] = &[
        FieldSpec::required("name", FieldKind::String),
        FieldSpec::required("brand", FieldKind::String),
        FieldSpec::required("capacity", FieldKind::Number),
    ];
}

impl From<AddBottle> for NewBottle {
    fn from(model: AddBottle) -> Self {
        NewBottle {
            name: model.name,
            brand: model.brand,
            capacity: model.capacity,
        }
    }
}

/// Body of `PUT /api/v1/bottle`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateBottle {
    pub bottle_id: ObjectId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub capacity: Option<f64>,
}

impl ViewModel for UpdateBottle {
    const SCHEMA: &'static [FieldSpec] = &[
        FieldSpec::required("bottle_id", FieldKind::ObjectId),
        FieldSpec::optional("name", FieldKind::String),
        FieldSpec::optional("brand", FieldKind::String),
        FieldSpec::optional("capacity", FieldKind::Number),
    ];
}

impl UpdateBottle {
    /// Only the supplied fields end up in the patch
    pub fn patch(&self) -> BottlePatch {
        BottlePatch {
            name: self.name.clone(),
            brand: self.brand.clone(),
            capacity: self.capacity,
        }
    }
}

/// Body of `DELETE /api/v1/bottle` and path of `GET /api/v1/bottle/:bottle_id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BottleIdentifier {
    pub bottle_id: ObjectId,
}

impl ViewModel for BottleIdentifier {
    const SCHEMA: &'static [FieldSpec] = &[FieldSpec::required("bottle_id", FieldKind::ObjectId)];
}
