//! Fixture records for running the in-memory store locally.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{NewDestination, NewVoucher, User};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid seed file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
pub struct SeedUser {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub points: i64,
    #[serde(default)]
    pub is_admin: bool,
    pub latitude: f64,
    pub longitude: f64,
}

impl SeedUser {
    pub fn into_user(self, now: DateTime<Utc>) -> User {
        User {
            id: self.id,
            username: self.username,
            email: self.email,
            points: self.points.max(0),
            is_admin: self.is_admin,
            latitude: self.latitude,
            longitude: self.longitude,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SeedDestination {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(flatten)]
    pub destination: NewDestination,
}

#[derive(Debug, Deserialize)]
pub struct SeedVoucher {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(flatten)]
    pub voucher: NewVoucher,
}

/// Contents of a `SEED_FILE`. Every section is optional; ids are generated
/// when omitted.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Seed {
    pub users: Vec<SeedUser>,
    pub destinations: Vec<SeedDestination>,
    pub vouchers: Vec<SeedVoucher>,
}

impl Seed {
    pub fn from_json(raw: &str) -> Result<Self, SeedError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub async fn from_path(path: &Path) -> Result<Self, SeedError> {
        let raw = tokio::fs::read_to_string(path).await?;
        Self::from_json(&raw)
    }
}
