use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

pub type BusinessId = i64;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Business {
    pub id: BusinessId,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub address: String,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_ratings_total: Option<u64>,
}

impl Business {
    pub fn has_email(&self) -> bool {
        !self.email.trim().is_empty()
    }

    /// `City, Country` with missing parts left out.
    pub fn location(&self) -> String {
        [self.city.trim(), self.country.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Payload for adding a business to the shared directory.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NewBusiness {
    pub name: String,
    pub category: String,
    pub country: String,
    pub city: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub phone: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub website: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub address: String,
}

/// Category slugs accepted by the backend directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessCategory {
    Restaurant,
    Club,
    RealEstate,
    TravelAgency,
    Medical,
    TechnicalStudio,
    Dentist,
    Physiotherapist,
    PrivateSchool,
    BeautyCenter,
    Artisan,
    Other,
}

impl BusinessCategory {
    pub const ALL: [Self; 12] = [
        Self::Restaurant,
        Self::Club,
        Self::RealEstate,
        Self::TravelAgency,
        Self::Medical,
        Self::TechnicalStudio,
        Self::Dentist,
        Self::Physiotherapist,
        Self::PrivateSchool,
        Self::BeautyCenter,
        Self::Artisan,
        Self::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Restaurant => "restaurant",
            Self::Club => "club",
            Self::RealEstate => "real_estate",
            Self::TravelAgency => "travel_agency",
            Self::Medical => "medical",
            Self::TechnicalStudio => "technical_studio",
            Self::Dentist => "dentist",
            Self::Physiotherapist => "physiotherapist",
            Self::PrivateSchool => "private_school",
            Self::BeautyCenter => "beauty_center",
            Self::Artisan => "artisan",
            Self::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Restaurant => "Restaurant",
            Self::Club => "Club",
            Self::RealEstate => "Agenzia Immobiliare",
            Self::TravelAgency => "Agenzia Viaggi",
            Self::Medical => "Studio Medico",
            Self::TechnicalStudio => "Studio Tecnico",
            Self::Dentist => "Dentista",
            Self::Physiotherapist => "Fisioterapista",
            Self::PrivateSchool => "Scuola Privata",
            Self::BeautyCenter => "Centro Estetico",
            Self::Artisan => "Artigiano",
            Self::Other => "Altro",
        }
    }
}

impl Display for BusinessCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BusinessCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_tolerates_missing_optional_fields() {
        let json = r#"{"id": 7, "name": "Trattoria", "category": "restaurant", "city": "Pisa"}"#;
        let business: Business = serde_json::from_str(json).expect("parse business");
        assert!(!business.has_email());
        assert_eq!(business.location(), "Pisa");
        assert!(business.created_at.is_none());
    }

    #[test]
    fn category_slugs_parse_back() {
        for category in BusinessCategory::ALL {
            assert_eq!(category.as_str().parse::<BusinessCategory>(), Ok(category));
        }
        assert!("bakery".parse::<BusinessCategory>().is_err());
    }
}
