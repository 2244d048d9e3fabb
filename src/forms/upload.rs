//! Upload form validation.

use serde::de::DeserializeOwned;

use super::{finish, required_text};
use crate::errors::{AppError, FieldErrors};
use crate::models::{
    parse_name, Category, Language, NewResource, PublishStatus, ResourceType, Sector,
    UploadResourceRequest,
};

pub const MAX_TITLE_CHARS: usize = 200;
pub const MAX_DESCRIPTION_CHARS: usize = 2000;

/// Validate upload metadata and assign the stored file key.
///
/// Required: title, description, category and a named file. The document
/// type falls back to the file extension, the sector to `general` and the
/// language list to English.
pub fn validate_upload(request: &UploadResourceRequest) -> Result<NewResource, AppError> {
    let mut errors = FieldErrors::new();

    let title = required_text(
        &mut errors,
        "title",
        request.title.as_deref(),
        "Title is required",
    );
    if let Some(title) = &title {
        if title.chars().count() > MAX_TITLE_CHARS {
            errors.insert(
                "title".to_string(),
                format!("Title must be at most {} characters", MAX_TITLE_CHARS),
            );
        }
    }

    let description = required_text(
        &mut errors,
        "description",
        request.description.as_deref(),
        "Description is required",
    );
    if let Some(description) = &description {
        if description.chars().count() > MAX_DESCRIPTION_CHARS {
            errors.insert(
                "description".to_string(),
                format!(
                    "Description must be at most {} characters",
                    MAX_DESCRIPTION_CHARS
                ),
            );
        }
    }

    let category = required_text(
        &mut errors,
        "category",
        request.category.as_deref(),
        "Category is required",
    )
    .and_then(|raw| enum_field::<Category>(&mut errors, "category", &raw));

    let file_name = required_text(
        &mut errors,
        "file",
        request.file_name.as_deref(),
        "A file is required",
    );
    if request.file_size == Some(0) {
        errors.insert("file".to_string(), "The selected file is empty".to_string());
    }

    let resource_type = match request.resource_type.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => enum_field::<ResourceType>(&mut errors, "type", raw),
        _ => match file_name.as_deref() {
            Some(name) => {
                let inferred = ResourceType::from_file_name(name);
                if inferred.is_none() {
                    errors.insert(
                        "type".to_string(),
                        format!("Cannot infer a document type from '{}'", name),
                    );
                }
                inferred
            }
            None => None,
        },
    };

    let sector = optional_enum::<Sector>(&mut errors, "sector", request.sector.as_deref())
        .unwrap_or(Sector::General);

    let status = optional_enum::<PublishStatus>(&mut errors, "status", request.status.as_deref())
        .unwrap_or_default();

    let language = languages(&mut errors, request.language.as_deref());

    let tags = normalize_tags(request.tags.as_deref().unwrap_or_default());

    finish(errors, || {
        Some(NewResource {
            title: title?,
            description: description?,
            resource_type: resource_type?,
            category: category?,
            sector,
            language,
            tags,
            featured: request.featured.unwrap_or(false),
            is_public: request.is_public.unwrap_or(true),
            status,
            file_name: file_name?,
            file_size: request.file_size,
            file_key: uuid::Uuid::new_v4().to_string(),
        })
    })
}

fn enum_field<T: DeserializeOwned>(errors: &mut FieldErrors, field: &str, raw: &str) -> Option<T> {
    match parse_name(raw) {
        Ok(value) => Some(value),
        Err(_) => {
            errors.insert(field.to_string(), format!("Unknown {} '{}'", field, raw.trim()));
            None
        }
    }
}

fn optional_enum<T: DeserializeOwned>(
    errors: &mut FieldErrors,
    field: &str,
    raw: Option<&str>,
) -> Option<T> {
    match raw.map(str::trim) {
        Some(raw) if !raw.is_empty() => enum_field(errors, field, raw),
        _ => None,
    }
}

/// Parsed, de-duplicated language list; English when none was chosen.
fn languages(errors: &mut FieldErrors, raw: Option<&[String]>) -> Vec<Language> {
    let mut parsed: Vec<Language> = Vec::new();
    for value in raw.unwrap_or_default() {
        if value.trim().is_empty() {
            continue;
        }
        if let Some(language) = enum_field::<Language>(errors, "language", value) {
            if !parsed.contains(&language) {
                parsed.push(language);
            }
        }
    }
    if parsed.is_empty() {
        parsed.push(Language::En);
    }
    parsed
}

fn normalize_tags(raw: &[String]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}
