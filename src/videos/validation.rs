//! Request body validation.
//!
//! Bodies are checked as raw JSON so that a missing key, an explicit `null`
//! and a value of the wrong type can each be told apart.
//!
//! # Modes
//! - `basic`: presence checks only, any failure collapses into one error
//! - `typed`: per-field type checks, one error per offending field
//! - `strict`: `typed` plus length limits and required update fields

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::videos::model::{iso8601, NewVideo, Resolution, VideoUpdate};

pub const TITLE_MAX_LEN: usize = 40;
pub const AUTHOR_MAX_LEN: usize = 20;
pub const MAX_AGE_RESTRICTION: u64 = 18;

/// How thoroughly request bodies are checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    #[default]
    Basic,
    Typed,
    Strict,
}

/// One entry of the `errorsMessages` response list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub message: String,
    pub field: String,
}

impl FieldError {
    pub fn new(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: field.into(),
        }
    }

    /// The single error `basic` mode reports.
    pub fn invalid_input() -> Self {
        Self::new("Invalid input", "title/author/availableResolutions")
    }
}

impl ValidationMode {
    fn report<I>(self, errors: I) -> Vec<FieldError>
    where
        I: IntoIterator<Item = Option<FieldError>>,
    {
        match self {
            ValidationMode::Basic => vec![FieldError::invalid_input()],
            _ => errors.into_iter().flatten().collect(),
        }
    }

    fn requires_update_fields(self) -> bool {
        self == ValidationMode::Strict
    }
}

/// Validate a create body.
pub fn validate_create(mode: ValidationMode, body: &Value) -> Result<NewVideo, Vec<FieldError>> {
    let title = text_field(mode, body, "title", TITLE_MAX_LEN);
    let author = text_field(mode, body, "author", AUTHOR_MAX_LEN);
    let resolutions = resolutions_field(mode, body);

    match (title, author, resolutions) {
        (Ok(title), Ok(author), Ok(available_resolutions)) => Ok(NewVideo {
            title,
            author,
            available_resolutions,
        }),
        (title, author, resolutions) => Err(mode.report([
            title.err(),
            author.err(),
            resolutions.err(),
        ])),
    }
}

/// Validate an update body.
pub fn validate_update(mode: ValidationMode, body: &Value) -> Result<VideoUpdate, Vec<FieldError>> {
    let title = text_field(mode, body, "title", TITLE_MAX_LEN);
    let author = text_field(mode, body, "author", AUTHOR_MAX_LEN);
    let resolutions = resolutions_field(mode, body);
    let can_be_downloaded = download_flag_field(mode, body);
    let min_age_restriction = age_restriction_field(mode, body);
    let publication_date = publication_date_field(mode, body);

    match (
        title,
        author,
        resolutions,
        can_be_downloaded,
        min_age_restriction,
        publication_date,
    ) {
        (
            Ok(title),
            Ok(author),
            Ok(available_resolutions),
            Ok(can_be_downloaded),
            Ok(min_age_restriction),
            Ok(publication_date),
        ) => Ok(VideoUpdate {
            title,
            author,
            available_resolutions,
            can_be_downloaded,
            min_age_restriction,
            publication_date,
        }),
        (a, b, c, d, e, f) => Err(mode.report([a.err(), b.err(), c.err(), d.err(), e.err(), f.err()])),
    }
}

fn required(field: &str) -> FieldError {
    FieldError::new(format!("{} is required", field), field)
}

fn text_field(
    mode: ValidationMode,
    body: &Value,
    field: &str,
    max_len: usize,
) -> Result<String, FieldError> {
    let text = match body.get(field) {
        None | Some(Value::Null) => return Err(required(field)),
        Some(Value::String(s)) => s,
        Some(_) => return Err(FieldError::new(format!("{} must be a string", field), field)),
    };

    let blank = match mode {
        ValidationMode::Basic => text.is_empty(),
        _ => text.trim().is_empty(),
    };
    if blank {
        return Err(FieldError::new(format!("{} must not be empty", field), field));
    }

    if mode == ValidationMode::Strict && text.chars().count() > max_len {
        return Err(FieldError::new(
            format!("{} must be at most {} characters", field, max_len),
            field,
        ));
    }

    Ok(text.clone())
}

fn resolutions_field(mode: ValidationMode, body: &Value) -> Result<Vec<Resolution>, FieldError> {
    const FIELD: &str = "availableResolutions";

    let items = match body.get(FIELD) {
        None | Some(Value::Null) => return Err(required(FIELD)),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(FieldError::new(format!("{} must be an array", FIELD), FIELD)),
    };

    let mut resolutions = Vec::with_capacity(items.len());
    for item in items {
        let parsed = item.as_str().and_then(|s| s.parse::<Resolution>().ok());
        match parsed {
            Some(resolution) => resolutions.push(resolution),
            None => {
                return Err(FieldError::new(
                    format!("{} contains an unknown resolution: {}", FIELD, item),
                    FIELD,
                ))
            }
        }
    }

    if mode == ValidationMode::Strict && resolutions.is_empty() {
        return Err(FieldError::new(
            format!("{} must contain at least one resolution", FIELD),
            FIELD,
        ));
    }

    Ok(resolutions)
}

fn download_flag_field(mode: ValidationMode, body: &Value) -> Result<Option<bool>, FieldError> {
    const FIELD: &str = "canBeDownloaded";

    match body.get(FIELD) {
        None if mode.requires_update_fields() => Err(required(FIELD)),
        None => Ok(None),
        Some(Value::Bool(flag)) => Ok(Some(*flag)),
        Some(_) if mode == ValidationMode::Basic => Ok(None),
        Some(_) => Err(FieldError::new(format!("{} must be a boolean", FIELD), FIELD)),
    }
}

fn age_restriction_field(
    mode: ValidationMode,
    body: &Value,
) -> Result<Option<Option<u8>>, FieldError> {
    const FIELD: &str = "minAgeRestriction";

    let value = match body.get(FIELD) {
        None if mode.requires_update_fields() => return Err(required(FIELD)),
        None => return Ok(None),
        Some(value) => value,
    };

    if value.is_null() {
        return Ok(Some(None));
    }

    let age = value
        .as_u64()
        .filter(|age| *age <= MAX_AGE_RESTRICTION)
        .and_then(|age| u8::try_from(age).ok());
    match age {
        Some(age) => Ok(Some(Some(age))),
        None if mode == ValidationMode::Basic => Ok(None),
        None => Err(FieldError::new(
            format!(
                "{} must be null or an integer between 0 and {}",
                FIELD, MAX_AGE_RESTRICTION
            ),
            FIELD,
        )),
    }
}

fn publication_date_field(
    mode: ValidationMode,
    body: &Value,
) -> Result<Option<DateTime<Utc>>, FieldError> {
    const FIELD: &str = "publicationDate";

    let parsed = match body.get(FIELD) {
        None if mode.requires_update_fields() => return Err(required(FIELD)),
        None => return Ok(None),
        Some(value) => value.as_str().and_then(iso8601::parse),
    };

    match parsed {
        Some(date) => Ok(Some(date)),
        None if mode == ValidationMode::Basic => Ok(None),
        None => Err(FieldError::new(
            format!("{} must be an ISO-8601 date-time string", FIELD),
            FIELD,
        )),
    }
}
