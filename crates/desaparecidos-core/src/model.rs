//! Canonical missing-persons model shared by the client, the controllers and the view.
//!
//! Field names on the Rust side are English; the serialized form keeps the
//! registry's Portuguese vocabulary so that canonical records can round-trip
//! through deployments that already speak it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Case status as exposed to the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// Still missing.
    Desaparecida,
    /// Located.
    Localizada,
}

impl Status {
    /// Canonical wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Desaparecida => "DESAPARECIDA",
            Self::Localizada => "LOCALIZADA",
        }
    }

    /// Value expected by the upstream filter endpoint.
    pub fn upstream_filter(&self) -> &'static str {
        match self {
            Self::Desaparecida => "DESAPARECIDO",
            Self::Localizada => "LOCALIZADO",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Desaparecida => "Desaparecida",
            Self::Localizada => "Localizada",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sex filter accepted by the upstream registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sex {
    Masculino,
    Feminino,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Masculino => "MASCULINO",
            Self::Feminino => "FEMININO",
        }
    }
}

/// A single missing-person record in canonical form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: u64,
    #[serde(rename = "nome")]
    pub given_name: String,
    /// Empty when the upstream does not split the name.
    #[serde(rename = "sobrenome", default)]
    pub family_name: String,
    #[serde(rename = "idade", default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(rename = "foto", default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    /// ISO 8601 date or timestamp string.
    #[serde(rename = "dataDesaparecimento")]
    pub disappeared_at: String,
    #[serde(rename = "localDesaparecimento", default)]
    pub disappearance_location: String,
    /// Never empty once produced by the adapter.
    #[serde(rename = "descricao")]
    pub description: String,
    pub status: Status,
    #[serde(rename = "observacoes", default, skip_serializing_if = "Option::is_none")]
    pub observations: Option<String>,
    #[serde(rename = "telefoneContato", default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

impl Person {
    /// Given and family name joined, without a trailing space when the
    /// family name is empty.
    pub fn full_name(&self) -> String {
        if self.family_name.is_empty() {
            self.given_name.clone()
        } else {
            format!("{} {}", self.given_name, self.family_name)
        }
    }
}

/// Filter criteria, independent of the pagination cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilter {
    pub name: Option<String>,
    pub status: Option<Status>,
    pub location: Option<String>,
    pub sex: Option<Sex>,
    pub min_age: Option<u32>,
    pub max_age: Option<u32>,
}

impl SearchFilter {
    /// True when at least one criterion would narrow the listing.
    ///
    /// Blank strings do not count.
    pub fn is_active(&self) -> bool {
        non_blank(&self.name).is_some()
            || self.status.is_some()
            || non_blank(&self.location).is_some()
            || self.sex.is_some()
            || self.min_age.is_some()
            || self.max_age.is_some()
    }

    /// Trimmed name criterion, if any.
    pub fn name(&self) -> Option<&str> {
        non_blank(&self.name)
    }

    /// Trimmed location criterion, if any.
    pub fn location(&self) -> Option<&str> {
        non_blank(&self.location)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// A listing query: pagination cursor plus filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonSearch {
    /// 0-based.
    pub page: u32,
    /// Always greater than zero.
    pub size: u32,
    #[serde(flatten)]
    pub filter: SearchFilter,
}

impl Default for PersonSearch {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            filter: SearchFilter::default(),
        }
    }
}

impl PersonSearch {
    /// Create a query for `page` with `size` elements per page.
    ///
    /// A zero `size` is raised to 1.
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size: size.max(1),
            filter: SearchFilter::default(),
        }
    }

    /// Replace the filter; the page index always goes back to 0.
    pub fn with_filter(&self, filter: SearchFilter) -> Self {
        Self {
            page: 0,
            size: self.size,
            filter,
        }
    }

    /// Move to `page`, keeping the filter untouched.
    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page,
            size: self.size,
            filter: self.filter.clone(),
        }
    }

    pub fn has_filters(&self) -> bool {
        self.filter.is_active()
    }
}

/// One page of results in canonical form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonResponse {
    /// Upstream order, never re-sorted.
    pub content: Vec<Person>,
    pub total_elements: u64,
    pub total_pages: u32,
    pub size: u32,
    /// Current 0-based page index.
    pub number: u32,
    pub first: bool,
    pub last: bool,
}

impl PersonResponse {
    /// Wrap an unpaginated list as a single, complete page.
    pub fn single_page(content: Vec<Person>, query: &PersonSearch) -> Self {
        Self {
            total_elements: content.len() as u64,
            total_pages: 1,
            size: query.size,
            number: query.page,
            first: true,
            last: true,
            content,
        }
    }
}

/// Registry-wide counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    /// Always `missing + located`.
    pub total: u64,
    #[serde(rename = "desaparecidas")]
    pub missing: u64,
    #[serde(rename = "localizadas")]
    pub located: u64,
}

impl Statistics {
    pub fn new(missing: u64, located: u64) -> Self {
        Self {
            total: missing.saturating_add(located),
            missing,
            located,
        }
    }
}

/// A photo attached to a tip, held in memory while the tip is composed.
#[derive(Clone, PartialEq, Eq)]
pub struct Photo {
    pub file_name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl Photo {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Size in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

impl fmt::Debug for Photo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Photo")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.data.len())
            .finish()
    }
}

/// A validated tip, ready to be submitted.
///
/// Only produced by [`crate::tip::validate_tip`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInformation {
    pub person_id: u64,
    /// Trimmed, at least 10 characters.
    pub observations: String,
    pub sighting_location: Option<String>,
    /// `(NN) NNNNN-NNNN` or `(NN) NNNN-NNNN`.
    pub contact_phone: Option<String>,
    /// At most 5 images of at most 5 MB each.
    pub photos: Vec<Photo>,
}
