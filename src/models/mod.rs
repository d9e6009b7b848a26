//! Domain models and request types
//!
//! These are the structs the repository layer hands to callers, kept
//! separate from the SeaORM entity models so the persistence shape can
//! evolve without touching the public surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{clubs, stadiums};

/// A football club, the owning side of the club/stadium relationship
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Club {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A stadium, always returned with its owning club populated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stadium {
    pub id: Uuid,
    pub name: String,
    pub capacity: i32,
    pub club: Club,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClubCreateRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClubUpdateRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StadiumCreateRequest {
    pub name: String,
    pub capacity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StadiumUpdateRequest {
    pub name: String,
    pub capacity: i32,
}

impl From<clubs::Model> for Club {
    fn from(model: clubs::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl Stadium {
    /// Combine a stadium row with its owning club row into the domain shape
    pub fn from_models(stadium: stadiums::Model, club: clubs::Model) -> Self {
        Self {
            id: stadium.id,
            name: stadium.name,
            capacity: stadium.capacity,
            club: Club::from(club),
            created_at: stadium.created_at,
            updated_at: stadium.updated_at,
        }
    }
}
