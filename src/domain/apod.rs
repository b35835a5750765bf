// Astronomy picture of the day
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Unrecognised media types keep the provider's wording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MediaType {
    Image,
    Video,
    Other(String),
}

impl MediaType {
    /// The media type with its first letter capitalised.
    pub fn label(&self) -> String {
        match self {
            MediaType::Image => "Image".to_string(),
            MediaType::Video => "Video".to_string(),
            MediaType::Other(raw) => {
                let mut chars = raw.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        }
    }
}

impl From<String> for MediaType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "image" => MediaType::Image,
            "video" => MediaType::Video,
            _ => MediaType::Other(raw),
        }
    }
}

impl From<MediaType> for String {
    fn from(media: MediaType) -> Self {
        match media {
            MediaType::Image => "image".to_string(),
            MediaType::Video => "video".to_string(),
            MediaType::Other(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApodEntry {
    pub date: NaiveDate,
    pub title: String,
    pub explanation: String,
    pub url: String,
    #[serde(default)]
    pub hdurl: Option<String>,
    pub media_type: MediaType,
    #[serde(default)]
    pub copyright: Option<String>,
}

impl ApodEntry {
    /// "Monday, January 1, 2024"
    pub fn long_date(&self) -> String {
        self.date.format("%A, %B %-d, %Y").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_entry() {
        let json = r#"{
            "date": "2024-01-01",
            "title": "Orion",
            "explanation": "A nebula.",
            "url": "https://apod.nasa.gov/orion.jpg",
            "media_type": "image",
            "service_version": "v1"
        }"#;
        let entry: ApodEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.media_type, MediaType::Image);
        assert!(entry.hdurl.is_none());
        assert!(entry.copyright.is_none());
        assert_eq!(entry.long_date(), "Monday, January 1, 2024");
    }

    #[test]
    fn test_unknown_media_type_keeps_provider_wording() {
        let json = r#"{
            "date": "2024-01-02", "title": "t", "explanation": "e",
            "url": "u", "media_type": "interactive"
        }"#;
        let entry: ApodEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.media_type, MediaType::Other("interactive".to_string()));
        assert_eq!(entry.media_type.label(), "Interactive");

        let back = serde_json::to_value(&entry).unwrap();
        assert_eq!(back["media_type"], "interactive");
    }

    #[test]
    fn test_media_type_labels() {
        assert_eq!(MediaType::Image.label(), "Image");
        assert_eq!(MediaType::Video.label(), "Video");
        assert_eq!(MediaType::from("gif".to_string()).label(), "Gif");
        assert_eq!(MediaType::from(String::new()).label(), "");
    }
}
