//! Client-side validation for citizen tips.
//!
//! Nothing in here touches the network: a tip that fails these checks is
//! never submitted.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::model::{NewInformation, Photo};

pub const MIN_OBSERVATION_CHARS: usize = 10;
pub const MAX_PHOTOS: usize = 5;
pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\([0-9]{2}\) [0-9]{4,5}-[0-9]{4}$").expect("valid phone regex"));

/// Tip form fields that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TipField {
    Observations,
    ContactPhone,
}

impl fmt::Display for TipField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Observations => f.write_str("observacoes"),
            Self::ContactPhone => f.write_str("telefoneContato"),
        }
    }
}

/// A single field-level failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: TipField,
    pub message: String,
}

/// Every field-level failure found in one validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", join_messages(.errors))]
pub struct ValidationErrors {
    pub errors: Vec<ValidationError>,
}

impl ValidationErrors {
    /// Message for `field`, if it failed.
    pub fn message_for(&self, field: TipField) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Raw tip input as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TipDraft {
    pub person_id: u64,
    pub observations: String,
    pub sighting_location: String,
    pub contact_phone: String,
    pub photos: Vec<Photo>,
}

/// Whether `phone` is in the strict `(NN) NNNNN-NNNN` / `(NN) NNNN-NNNN` form.
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

/// Validate a draft and produce the tip to submit.
///
/// Text fields are trimmed; blank optional fields become `None`.
pub fn validate_tip(draft: &TipDraft) -> Result<NewInformation, ValidationErrors> {
    let mut errors = Vec::new();

    let observations = draft.observations.trim();
    if observations.chars().count() < MIN_OBSERVATION_CHARS {
        errors.push(ValidationError {
            field: TipField::Observations,
            message: format!(
                "As observações são obrigatórias e devem ter pelo menos {MIN_OBSERVATION_CHARS} caracteres"
            ),
        });
    }

    let phone = draft.contact_phone.trim();
    if !phone.is_empty() && !is_valid_phone(phone) {
        errors.push(ValidationError {
            field: TipField::ContactPhone,
            message: "Formato do telefone inválido".to_string(),
        });
    }

    if !errors.is_empty() {
        return Err(ValidationErrors { errors });
    }

    let location = draft.sighting_location.trim();
    Ok(NewInformation {
        person_id: draft.person_id,
        observations: observations.to_string(),
        sighting_location: (!location.is_empty()).then(|| location.to_string()),
        contact_phone: (!phone.is_empty()).then(|| phone.to_string()),
        photos: draft.photos.clone(),
    })
}

/// Why a photo was not attached.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhotoRejection {
    #[error("{file_name} não é um arquivo de imagem válido")]
    NotAnImage { file_name: String },

    #[error("{file_name} é muito grande. Máximo 5MB por arquivo.")]
    TooLarge { file_name: String, size: usize },

    #[error("Máximo de 5 fotos permitidas")]
    LimitExceeded { attempted: usize, current: usize },
}

/// Result of adding one batch of files.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PhotoBatchOutcome {
    /// Number of photos attached from this batch.
    pub accepted: usize,
    pub rejected: Vec<PhotoRejection>,
}

/// The photos attached to a tip being composed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhotoSet {
    photos: Vec<Photo>,
}

impl PhotoSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a batch of files.
    ///
    /// Each non-image or oversized file is rejected on its own. If the
    /// remaining valid files would push the set past [`MAX_PHOTOS`], the
    /// whole batch is refused and nothing is attached.
    pub fn add_batch(&mut self, files: Vec<Photo>) -> PhotoBatchOutcome {
        let mut rejected = Vec::new();
        let mut valid = Vec::with_capacity(files.len());

        for file in files {
            if !file.mime_type.starts_with("image/") {
                rejected.push(PhotoRejection::NotAnImage {
                    file_name: file.file_name,
                });
            } else if file.size() > MAX_PHOTO_BYTES {
                rejected.push(PhotoRejection::TooLarge {
                    size: file.size(),
                    file_name: file.file_name,
                });
            } else {
                valid.push(file);
            }
        }

        if valid.len() + self.photos.len() > MAX_PHOTOS {
            rejected.push(PhotoRejection::LimitExceeded {
                attempted: valid.len(),
                current: self.photos.len(),
            });
            return PhotoBatchOutcome {
                accepted: 0,
                rejected,
            };
        }

        let accepted = valid.len();
        self.photos.extend(valid);
        PhotoBatchOutcome { accepted, rejected }
    }

    /// Detach the photo at `index`; out-of-range indices are ignored.
    pub fn remove(&mut self, index: usize) -> Option<Photo> {
        (index < self.photos.len()).then(|| self.photos.remove(index))
    }

    pub fn clear(&mut self) {
        self.photos.clear();
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    pub fn as_slice(&self) -> &[Photo] {
        &self.photos
    }
}
