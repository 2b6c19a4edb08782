//! Payload field validation.
//!
//! Each entity checks its fields in a fixed order and stops at the first
//! failure, so the caller always learns about the earliest missing field.

use std::fmt;

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use courtside_core::{Conference, ConferenceError, Price, PriceError};

/// A payload field, named as it appears in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Label,
    ImageUrl,
    Value,
    Price,
    Description,
    Images,
    BillboardId,
    ColorId,
    CategoryId,
    SizeId,
    TeamId,
    PrimaryColorId,
    SecondaryColorId,
    Conference,
}

impl Field {
    /// Human-readable field name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Label => "Label",
            Self::ImageUrl => "Image url",
            Self::Value => "Value",
            Self::Price => "Price",
            Self::Description => "Description",
            Self::Images => "Images",
            Self::BillboardId => "Billboard id",
            Self::ColorId => "Color id",
            Self::CategoryId => "Category id",
            Self::SizeId => "Size id",
            Self::TeamId => "Team id",
            Self::PrimaryColorId => "Primary color id",
            Self::SecondaryColorId => "Secondary color id",
            Self::Conference => "Conference",
        }
    }

    const fn is_plural(self) -> bool {
        matches!(self, Self::Images)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why a payload was rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The field is absent, empty, or zero.
    #[error("{0} {verb} required", verb = if .0.is_plural() { "are" } else { "is" })]
    Required(Field),

    /// The field is present but unacceptable.
    #[error("{field} {reason}")]
    Invalid {
        /// Offending field.
        field: Field,
        /// Sentence fragment completing "<Field> ...".
        reason: &'static str,
    },
}

impl ValidationError {
    /// The referenced entity exists in another store (or not at all).
    #[must_use]
    pub const fn foreign_reference(field: Field) -> Self {
        Self::Invalid {
            field,
            reason: "does not belong to this store",
        }
    }
}

/// A non-blank string.
///
/// # Errors
///
/// Returns `ValidationError::Required` if the value is absent or blank.
pub fn required_text(value: Option<String>, field: Field) -> Result<String, ValidationError> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(ValidationError::Required(field)),
    }
}

/// A non-blank entity id.
///
/// # Errors
///
/// Returns `ValidationError::Required` if absent or blank, and
/// `ValidationError::Invalid` if the value is not a UUID.
pub fn required_id<T: From<Uuid>>(value: Option<String>, field: Field) -> Result<T, ValidationError> {
    let raw = required_text(value, field)?;
    courtside_core::parse_id(raw.trim()).map_err(|_| ValidationError::Invalid {
        field,
        reason: "is not a valid id",
    })
}

/// A strictly positive price. Zero is treated as absent.
///
/// # Errors
///
/// Returns `ValidationError::Required` for absent prices and prices that
/// round to zero cents, and `ValidationError::Invalid` for negative or
/// oversized ones.
pub fn required_price(value: Option<Decimal>) -> Result<Price, ValidationError> {
    let amount = value.ok_or(ValidationError::Required(Field::Price))?;
    Price::new(amount).map_err(|e| match e {
        PriceError::Zero => ValidationError::Required(Field::Price),
        PriceError::Negative => ValidationError::Invalid {
            field: Field::Price,
            reason: "must be greater than zero",
        },
        PriceError::TooLarge => ValidationError::Invalid {
            field: Field::Price,
            reason: "must be less than 10000000000",
        },
    })
}

/// A non-empty list of non-blank image URLs.
///
/// # Errors
///
/// Returns `ValidationError::Required(Images)` for an absent or empty list and
/// `ValidationError::Required(ImageUrl)` if any URL is blank.
pub fn required_image_urls(value: Option<Vec<Option<String>>>) -> Result<Vec<String>, ValidationError> {
    let urls = value
        .filter(|urls| !urls.is_empty())
        .ok_or(ValidationError::Required(Field::Images))?;
    urls.into_iter()
        .map(|url| required_text(url, Field::ImageUrl))
        .collect()
}

/// A four-character conference name.
///
/// # Errors
///
/// Returns `ValidationError::Required` if absent or blank and
/// `ValidationError::Invalid` for any other length.
pub fn required_conference(value: Option<String>) -> Result<Conference, ValidationError> {
    let raw = required_text(value, Field::Conference)?;
    Conference::parse(&raw).map_err(|_: ConferenceError| ValidationError::Invalid {
        field: Field::Conference,
        reason: "must be exactly 4 characters",
    })
}
