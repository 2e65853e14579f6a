use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::booking::emissions::Coordinates;

/// A bookable tourism attraction ("wisata").
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Destination {
    pub id: Uuid,
    pub title: String,
    pub location: String,
    pub city: String,
    pub unit_price: i64,
    pub available_tickets: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Destination {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewDestination {
    pub title: String,
    pub location: String,
    pub city: String,
    pub unit_price: i64,
    pub available_tickets: i32,
    pub latitude: f64,
    pub longitude: f64,
}

impl NewDestination {
    pub fn into_destination(self, id: Uuid, now: DateTime<Utc>) -> Destination {
        Destination {
            id,
            title: self.title,
            location: self.location,
            city: self.city,
            unit_price: self.unit_price,
            available_tickets: self.available_tickets,
            latitude: self.latitude,
            longitude: self.longitude,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial admin edit; `None` fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DestinationUpdate {
    pub title: Option<String>,
    pub location: Option<String>,
    pub city: Option<String>,
    pub unit_price: Option<i64>,
    pub available_tickets: Option<i32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl DestinationUpdate {
    pub fn apply_to(&self, destination: &mut Destination, now: DateTime<Utc>) {
        if let Some(title) = &self.title {
            destination.title = title.clone();
        }
        if let Some(location) = &self.location {
            destination.location = location.clone();
        }
        if let Some(city) = &self.city {
            destination.city = city.clone();
        }
        if let Some(unit_price) = self.unit_price {
            destination.unit_price = unit_price;
        }
        if let Some(available_tickets) = self.available_tickets {
            destination.available_tickets = available_tickets;
        }
        if let Some(latitude) = self.latitude {
            destination.latitude = latitude;
        }
        if let Some(longitude) = self.longitude {
            destination.longitude = longitude;
        }
        destination.updated_at = now;
    }
}
