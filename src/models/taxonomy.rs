//! Closed classification enumerations shared by the catalog records.
//!
//! Every enum serializes as its kebab-case name; that name is also what the
//! query string, the upload form and the SQLite columns carry.

use serde::de::value::{Error as ValueError, StrDeserializer};
use serde::de::{DeserializeOwned, IntoDeserializer};
use serde::{Deserialize, Serialize};

/// Parse an enumerated value from its serialized name. Non-string scalars
/// such as `true` fall back to their JSON literal.
pub fn parse_name<T: DeserializeOwned>(raw: &str) -> Result<T, String> {
    let trimmed = raw.trim();
    let de: StrDeserializer<'_, ValueError> = trimmed.into_deserializer();
    T::deserialize(de).or_else(|e| serde_json::from_str(trimmed).map_err(|_| e.to_string()))
}

/// Serialized name of an enumerated value.
pub fn name_of<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => s,
        Ok(other) => other.to_string(),
        Err(_) => String::new(),
    }
}

/// Document kind of a resource file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceType {
    Pdf,
    Word,
    Video,
    Audio,
}

impl ResourceType {
    /// Guess the document kind from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(ResourceType::Pdf),
            "doc" | "docx" | "odt" | "rtf" => Some(ResourceType::Word),
            "mp4" | "mov" | "webm" | "avi" | "mkv" => Some(ResourceType::Video),
            "mp3" | "wav" | "m4a" | "ogg" | "flac" => Some(ResourceType::Audio),
            _ => None,
        }
    }

    /// Guess the document kind from a file name.
    pub fn from_file_name(name: &str) -> Option<Self> {
        std::path::Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Guidelines,
    Toolkit,
    Research,
    CaseStudy,
    Policy,
    TrainingMaterial,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Guidelines => "Guidelines",
            Category::Toolkit => "Toolkit",
            Category::Research => "Research",
            Category::CaseStudy => "Case Study",
            Category::Policy => "Policy",
            Category::TrainingMaterial => "Training Material",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Sector {
    Wash,
    Education,
    Health,
    Livelihoods,
    Protection,
    General,
}

impl Sector {
    pub fn label(&self) -> &'static str {
        match self {
            Sector::Wash => "WASH",
            Sector::Education => "Education",
            Sector::Health => "Health",
            Sector::Livelihoods => "Livelihoods",
            Sector::Protection => "Protection",
            Sector::General => "General",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Language {
    En,
    Fr,
    Es,
    Ar,
    Sw,
}

impl Language {
    pub fn label(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Fr => "French",
            Language::Es => "Spanish",
            Language::Ar => "Arabic",
            Language::Sw => "Swahili",
        }
    }
}

/// Editorial state of a resource in the content console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PublishStatus {
    Draft,
    #[default]
    Published,
    Archived,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_name_round_trips_kebab_case() {
        assert_eq!(parse_name::<Category>("case-study"), Ok(Category::CaseStudy));
        assert_eq!(parse_name::<Sector>(" wash "), Ok(Sector::Wash));
        assert_eq!(name_of(&Category::TrainingMaterial), "training-material");
        assert!(parse_name::<Language>("klingon").is_err());
    }

    #[test]
    fn test_parse_name_accepts_flags() {
        assert_eq!(parse_name::<bool>("true"), Ok(true));
        assert_eq!(parse_name::<bool>(" false"), Ok(false));
        assert!(parse_name::<bool>("yes").is_err());
    }

    #[test]
    fn test_type_from_file_name() {
        assert_eq!(
            ResourceType::from_file_name("report.PDF"),
            Some(ResourceType::Pdf)
        );
        assert_eq!(
            ResourceType::from_file_name("notes.docx"),
            Some(ResourceType::Word)
        );
        assert_eq!(
            ResourceType::from_file_name("lesson.mp3"),
            Some(ResourceType::Audio)
        );
        assert_eq!(ResourceType::from_file_name("archive.zip"), None);
        assert_eq!(ResourceType::from_file_name("no-extension"), None);
    }
}
