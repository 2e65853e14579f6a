//! Admin-managed destinations: pricing, inventory and location.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Destination, DestinationUpdate, NewDestination};

const TITLE_LEN: (usize, usize) = (8, 100);
const LOCATION_LEN: (usize, usize) = (8, 200);
const CITY_LEN: (usize, usize) = (4, 30);

#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("{field} must be between {min} and {max} characters")]
    Length {
        field: &'static str,
        min: usize,
        max: usize,
    },

    #[error("unit_price must be greater than 0")]
    UnitPrice,

    #[error("available_tickets must be greater than 0")]
    AvailableTickets,

    #[error("latitude must be between -90 and 90 and longitude between -180 and 180")]
    Coordinates,

    #[error("at least one field must be provided")]
    EmptyUpdate,
}

fn checked_text(
    field: &'static str,
    value: &str,
    (min, max): (usize, usize),
) -> Result<String, CatalogError> {
    let value = value.trim();
    let len = value.chars().count();
    if len < min || len > max {
        return Err(CatalogError::Length { field, min, max });
    }
    Ok(value.to_string())
}

fn check_unit_price(unit_price: i64) -> Result<(), CatalogError> {
    if unit_price <= 0 {
        return Err(CatalogError::UnitPrice);
    }
    Ok(())
}

fn check_available_tickets(available_tickets: i32) -> Result<(), CatalogError> {
    if available_tickets <= 0 {
        return Err(CatalogError::AvailableTickets);
    }
    Ok(())
}

fn check_latitude(latitude: f64) -> Result<(), CatalogError> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(CatalogError::Coordinates);
    }
    Ok(())
}

fn check_longitude(longitude: f64) -> Result<(), CatalogError> {
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(CatalogError::Coordinates);
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDestinationRequest {
    pub title: String,
    pub location: String,
    pub city: String,
    pub unit_price: i64,
    pub available_tickets: i32,
    pub latitude: f64,
    pub longitude: f64,
}

impl CreateDestinationRequest {
    pub fn validate(&self) -> Result<NewDestination, CatalogError> {
        let title = checked_text("title", &self.title, TITLE_LEN)?;
        let location = checked_text("location", &self.location, LOCATION_LEN)?;
        let city = checked_text("city", &self.city, CITY_LEN)?;
        check_unit_price(self.unit_price)?;
        check_available_tickets(self.available_tickets)?;
        check_latitude(self.latitude)?;
        check_longitude(self.longitude)?;

        Ok(NewDestination {
            title,
            location,
            city,
            unit_price: self.unit_price,
            available_tickets: self.available_tickets,
            latitude: self.latitude,
            longitude: self.longitude,
        })
    }
}

/// Admin edit; omitted fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDestinationRequest {
    pub title: Option<String>,
    pub location: Option<String>,
    pub city: Option<String>,
    pub unit_price: Option<i64>,
    pub available_tickets: Option<i32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl UpdateDestinationRequest {
    pub fn validate(&self) -> Result<DestinationUpdate, CatalogError> {
        let update = DestinationUpdate {
            title: self
                .title
                .as_deref()
                .map(|v| checked_text("title", v, TITLE_LEN))
                .transpose()?,
            location: self
                .location
                .as_deref()
                .map(|v| checked_text("location", v, LOCATION_LEN))
                .transpose()?,
            city: self
                .city
                .as_deref()
                .map(|v| checked_text("city", v, CITY_LEN))
                .transpose()?,
            unit_price: self.unit_price,
            available_tickets: self.available_tickets,
            latitude: self.latitude,
            longitude: self.longitude,
        };
        update.unit_price.map(check_unit_price).transpose()?;
        update
            .available_tickets
            .map(check_available_tickets)
            .transpose()?;
        update.latitude.map(check_latitude).transpose()?;
        update.longitude.map(check_longitude).transpose()?;

        if update == DestinationUpdate::default() {
            return Err(CatalogError::EmptyUpdate);
        }
        Ok(update)
    }
}

/// Destination as shown on its detail page.
#[derive(Debug, Clone, Serialize)]
pub struct DestinationDetail {
    #[serde(flatten)]
    pub destination: Destination,
    /// Grams of CO2 across all paid tickets to this destination.
    pub total_carbon_footprint: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateDestinationRequest {
        CreateDestinationRequest {
            title: "  Candi Prambanan  ".into(),
            location: "Jl. Raya Solo - Yogyakarta No.16".into(),
            city: "Sleman".into(),
            unit_price: 50_000,
            available_tickets: 120,
            latitude: -7.752,
            longitude: 110.491,
        }
    }

    #[test]
    fn test_valid_create_is_trimmed() {
        let destination = request().validate().unwrap();
        assert_eq!(destination.title, "Candi Prambanan");
        assert_eq!(destination.unit_price, 50_000);
        assert_eq!(destination.available_tickets, 120);
    }

    #[test]
    fn test_create_bounds() {
        let mut req = request();
        req.title = "Candi".into();
        assert_eq!(
            req.validate(),
            Err(CatalogError::Length {
                field: "title",
                min: 8,
                max: 100
            })
        );

        let mut req = request();
        req.unit_price = 0;
        assert_eq!(req.validate(), Err(CatalogError::UnitPrice));

        let mut req = request();
        req.available_tickets = -3;
        assert_eq!(req.validate(), Err(CatalogError::AvailableTickets));

        let mut req = request();
        req.longitude = 181.0;
        assert_eq!(req.validate(), Err(CatalogError::Coordinates));
    }

    #[test]
    fn test_update_checks_only_given_fields() {
        let update = UpdateDestinationRequest {
            unit_price: Some(75_000),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(update.unit_price, Some(75_000));
        assert!(update.title.is_none());

        let bad = UpdateDestinationRequest {
            city: Some("Bly".into()),
            ..Default::default()
        };
        assert!(matches!(
            bad.validate(),
            Err(CatalogError::Length { field: "city", .. })
        ));

        let bad = UpdateDestinationRequest {
            available_tickets: Some(0),
            ..Default::default()
        };
        assert_eq!(bad.validate(), Err(CatalogError::AvailableTickets));
    }

    #[test]
    fn test_empty_update_is_rejected() {
        assert_eq!(
            UpdateDestinationRequest::default().validate(),
            Err(CatalogError::EmptyUpdate)
        );
    }
}
