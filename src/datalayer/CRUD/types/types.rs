use sea_query::Iden;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::datalayer::CRUD::helper::object_id::ObjectId;
use crate::errors::DbError;

pub mod DBTables {
    pub const BOTTLES: &str = "bottles";
}

/// Column identifiers for the bottles collection
#[derive(Iden, Clone, Copy)]
pub enum Bottles {
    Table,
    Id,
    Name,
    Brand,
    Capacity,
}

/// A stored bottle record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bottle {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub brand: String,
    pub capacity: f64,
}

/// Fields of a bottle before storage assigns an identifier
#[derive(Debug, Clone, PartialEq)]
pub struct NewBottle {
    pub name: String,
    pub brand: String,
    pub capacity: f64,
}

impl NewBottle {
    pub fn with_id(self, id: ObjectId) -> Bottle {
        Bottle {
            id,
            name: self.name,
            brand: self.brand,
            capacity: self.capacity,
        }
    }
}

/// Partial update: only `Some` fields are written
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BottlePatch {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub capacity: Option<f64>,
}

impl BottlePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.brand.is_none() && self.capacity.is_none()
    }

    /// Apply the patch in place, returning whether any stored value changed
    pub fn apply_to(&self, bottle: &mut Bottle) -> bool {
        let mut changed = false;

        if let Some(name) = &self.name {
            if bottle.name != *name {
                bottle.name = name.clone();
                changed = true;
            }
        }
        if let Some(brand) = &self.brand {
            if bottle.brand != *brand {
                bottle.brand = brand.clone();
                changed = true;
            }
        }
        if let Some(capacity) = self.capacity {
            if bottle.capacity != capacity {
                bottle.capacity = capacity;
                changed = true;
            }
        }

        changed
    }
}

/// Outcome of `update_one`; only records whose values changed are counted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateResult {
    pub modified_count: u64,
}

/// Outcome of `delete_one`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteResult {
    pub deleted_count: u64,
}

/// Row shape of the bottles table
#[derive(Debug, Clone, FromRow)]
pub struct BottleRow {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub capacity: f64,
}

impl TryFrom<BottleRow> for Bottle {
    type Error = DbError;

    fn try_from(row: BottleRow) -> Result<Self, Self::Error> {
        let id = ObjectId::parse_str(row.id.trim())
            .map_err(|e| DbError::DecodeError(e.to_string()))?;

        Ok(Bottle {
            id,
            name: row.name,
            brand: row.brand,
            capacity: row.capacity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Bottle {
        NewBottle {
            name: "Gin".to_string(),
            brand: "X".to_string(),
            capacity: 5.0,
        }
        .with_id(ObjectId::new())
    }

    #[test]
    fn test_bottle_serializes_with_underscore_id() {
        let bottle = sample();
        let json = serde_json::to_value(&bottle).unwrap();
        assert_eq!(json["_id"], bottle.id.to_string());
        assert_eq!(json["name"], "Gin");
        assert_eq!(json["brand"], "X");
        assert_eq!(json["capacity"], 5.0);
    }

    #[test]
    fn test_patch_with_same_values_reports_no_change() {
        let mut bottle = sample();
        let patch = BottlePatch {
            name: Some("Gin".to_string()),
            brand: None,
            capacity: Some(5.0),
        };
        assert!(!patch.apply_to(&mut bottle));
    }

    #[test]
    fn test_patch_only_touches_supplied_fields() {
        let mut bottle = sample();
        let patch = BottlePatch {
            capacity: Some(7.5),
            ..Default::default()
        };
        assert!(patch.apply_to(&mut bottle));
        assert_eq!(bottle.capacity, 7.5);
        assert_eq!(bottle.name, "Gin");
        assert_eq!(bottle.brand, "X");
    }

    #[test]
    fn test_row_with_bad_id_fails_decode() {
        let row = BottleRow {
            id: "not-an-id".to_string(),
            name: "Gin".to_string(),
            brand: "X".to_string(),
            capacity: 1.0,
        };
        assert!(matches!(Bottle::try_from(row), Err(DbError::DecodeError(_))));
    }
}
