//! Data models for the advert catalog

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Maximum title length in Unicode code points
pub const MAX_TITLE_CHARS: usize = 200;

/// Maximum description length in Unicode code points
pub const MAX_DESCRIPTION_CHARS: usize = 1000;

/// Maximum number of photo links per advert
pub const MAX_PHOTOS: usize = 3;

/// An advert as returned to clients
///
/// Fields that were not selected (or are empty) are left out of the JSON
/// rather than sent as zero values. The id is never serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Advert {
    #[serde(skip)]
    pub id: i64,

    #[serde(skip_serializing_if = "is_blank")]
    pub title: Option<String>,

    #[serde(rename = "ad_description", skip_serializing_if = "is_blank")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "is_zero")]
    pub price: Option<i64>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub photos: Vec<String>,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

fn is_zero(value: &Option<i64>) -> bool {
    value.map_or(true, |price| price == 0)
}

impl Advert {
    /// Keep only the first photo link
    pub fn truncate_photos(&mut self) {
        self.photos.truncate(1);
    }
}

/// Create advert request body
///
/// Missing fields default to empty values; unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateAdvert {
    pub title: String,
    pub ad_description: String,
    pub price: i64,
    pub photos: Vec<String>,
}

impl CreateAdvert {
    /// Validate the create advert request
    pub fn validate(&self) -> Result<(), String> {
        if self.ad_description.chars().count() > MAX_DESCRIPTION_CHARS {
            return Err(format!(
                "description shouldn't be more than {MAX_DESCRIPTION_CHARS} characters"
            ));
        }
        if self.title.chars().count() > MAX_TITLE_CHARS {
            return Err(format!(
                "title shouldn't be more than {MAX_TITLE_CHARS} characters"
            ));
        }
        if self.photos.len() > MAX_PHOTOS {
            return Err(format!("shouldn't be more than {MAX_PHOTOS} photo links"));
        }
        Ok(())
    }
}

/// Create advert response
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub message: String,
    pub id: i64,
}

impl CreatedResponse {
    pub fn new(id: i64) -> Self {
        Self {
            message: "Success! Added new advert".to_string(),
            id,
        }
    }
}

/// A selectable advert attribute
///
/// The wire name doubles as the column name, so only these four values
/// ever reach a SQL select list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdvertField {
    Title,
    Description,
    Price,
    Photos,
}

impl AdvertField {
    pub const ALL: [AdvertField; 4] = [
        AdvertField::Title,
        AdvertField::Description,
        AdvertField::Price,
        AdvertField::Photos,
    ];

    /// Selection used when the client asks for no particular fields
    pub const DEFAULT: [AdvertField; 3] =
        [AdvertField::Title, AdvertField::Price, AdvertField::Photos];

    /// `fields`, or [`Self::DEFAULT`] when nothing was selected
    pub fn or_default(fields: &[AdvertField]) -> &[AdvertField] {
        if fields.is_empty() {
            &Self::DEFAULT
        } else {
            fields
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "ad_description",
            Self::Price => "price",
            Self::Photos => "photos",
        }
    }

    /// Comma-separated list of all field names, for error messages
    pub fn available() -> String {
        Self::ALL
            .iter()
            .map(AdvertField::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for AdvertField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdvertField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| {
                Error::BadRequest(format!(
                    "there is no field like '{}'; available fields: {}",
                    s,
                    Self::available()
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(title: &str, description: &str, photos: usize) -> CreateAdvert {
        CreateAdvert {
            title: title.to_string(),
            ad_description: description.to_string(),
            price: 15,
            photos: vec![String::new(); photos],
        }
    }

    #[test]
    fn test_title_limit_is_inclusive() {
        assert!(request(&"a".repeat(200), "red & white", 0).validate().is_ok());
        assert!(request(&"a".repeat(201), "red & white", 0).validate().is_err());
    }

    #[test]
    fn test_limits_count_code_points_not_bytes() {
        // 200 two-byte characters is still within the limit
        assert!(request(&"я".repeat(200), "", 0).validate().is_ok());
        assert!(request("IPhone", &"ж".repeat(1000), 0).validate().is_ok());
        assert!(request("IPhone", &"ж".repeat(1001), 0).validate().is_err());
    }

    #[test]
    fn test_photo_limit() {
        assert!(request("IPhone", "", 3).validate().is_ok());
        let err = request("IPhone", "", 4).validate().unwrap_err();
        assert!(err.contains("3 photo links"));
    }

    #[test]
    fn test_create_body_defaults_missing_fields() {
        let body: CreateAdvert = serde_json::from_str(r#"{"title": "IPhone"}"#).unwrap();
        assert_eq!(body.title, "IPhone");
        assert_eq!(body.price, 0);
        assert!(body.photos.is_empty());
    }

    #[test]
    fn test_advert_omits_empty_fields() {
        let advert = Advert {
            id: 7,
            title: Some("IPhone".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&advert).unwrap();
        assert_eq!(json, serde_json::json!({ "title": "IPhone" }));
    }

    #[test]
    fn test_advert_omits_blank_title_and_zero_price() {
        let advert = Advert {
            title: Some(String::new()),
            description: Some(String::new()),
            price: Some(0),
            photos: vec!["https://img/1.jpg".to_string()],
            ..Default::default()
        };
        let json = serde_json::to_value(&advert).unwrap();
        assert_eq!(json, serde_json::json!({ "photos": ["https://img/1.jpg"] }));
    }

    #[test]
    fn test_advert_description_wire_name() {
        let advert = Advert {
            description: Some("red & white".to_string()),
            price: Some(15),
            ..Default::default()
        };
        let json = serde_json::to_value(&advert).unwrap();
        assert_eq!(json["ad_description"], "red & white");
        assert_eq!(json["price"], 15);
    }

    #[test]
    fn test_truncate_photos() {
        let mut advert = Advert {
            photos: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            ..Default::default()
        };
        advert.truncate_photos();
        assert_eq!(advert.photos, vec!["a".to_string()]);
    }

    #[test]
    fn test_field_from_str() {
        assert_eq!("ad_description".parse::<AdvertField>().unwrap(), AdvertField::Description);
        let err = "name".parse::<AdvertField>().unwrap_err();
        assert!(err.to_string().contains("'name'"));
        assert!(err.to_string().contains("title,ad_description,price,photos"));
    }
}
