//! Upstream response shapes and their conversion to the canonical model.
//!
//! The registry answers listings in one of two shapes: a bare JSON array
//! (the filtered endpoint) or a paginated envelope (the default listing).
//! Each record is either an open-case record carrying a nested latest
//! occurrence, or a resource that is already canonical. Both unions are
//! resolved once, at deserialization time, and converted by one function
//! per variant.

use serde::Deserialize;
use tracing::debug;

use crate::model::{Person, PersonResponse, PersonSearch, Statistics, Status};

/// An open case as published by the registry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenCaseRecord {
    pub id: u64,
    pub nome: String,
    #[serde(default)]
    pub idade: Option<u32>,
    #[serde(default)]
    pub sexo: Option<String>,
    #[serde(default)]
    pub vivo: Option<bool>,
    #[serde(default)]
    pub url_foto: Option<String>,
    pub ultima_ocorrencia: LatestOccurrence,
}

/// The most recent occurrence attached to an open case.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestOccurrence {
    pub dt_desaparecimento: String,
    #[serde(default)]
    pub data_localizacao: Option<String>,
    #[serde(default)]
    pub encontrado_vivo: Option<bool>,
    #[serde(default)]
    pub local_desaparecimento_concat: Option<String>,
    #[serde(rename = "ocorrenciaEntrevDesapDTO", default)]
    pub interview: Option<Interview>,
    #[serde(default)]
    pub oco_id: Option<u64>,
}

impl LatestOccurrence {
    /// The located date, when present and non-empty.
    pub fn located_at(&self) -> Option<&str> {
        self.data_localizacao.as_deref().filter(|d| !d.is_empty())
    }
}

/// Interview notes taken when the disappearance was reported.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interview {
    #[serde(default)]
    pub informacao: Option<String>,
    #[serde(default)]
    pub vestimentas_desaparecido: Option<String>,
}

/// One upstream record, in whichever shape the deployment uses.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum UpstreamRecord {
    OpenCase(Box<OpenCaseRecord>),
    Canonical(Box<Person>),
}

/// Paginated envelope returned by the default listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    #[serde(default)]
    pub content: Vec<UpstreamRecord>,
    pub total_elements: u64,
    pub total_pages: u32,
    pub number: u32,
    pub size: u32,
    pub first: bool,
    pub last: bool,
}

/// A listing response, in whichever shape the endpoint uses.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum UpstreamListing {
    Bare(Vec<UpstreamRecord>),
    Envelope(Envelope),
}

/// Registry counters as published upstream.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamStatistics {
    pub quant_pessoas_desaparecidas: u64,
    pub quant_pessoas_encontradas: u64,
}

impl From<UpstreamStatistics> for Statistics {
    fn from(raw: UpstreamStatistics) -> Self {
        Statistics::new(raw.quant_pessoas_desaparecidas, raw.quant_pessoas_encontradas)
    }
}

impl From<UpstreamRecord> for Person {
    fn from(record: UpstreamRecord) -> Self {
        match record {
            UpstreamRecord::OpenCase(open) => adapt_open_case(*open),
            UpstreamRecord::Canonical(person) => *person,
        }
    }
}

impl UpstreamListing {
    /// Convert to a canonical page.
    ///
    /// A bare array becomes a single complete page; when `query` carries a
    /// location filter, only records whose location contains it are kept,
    /// since the filtered endpoint cannot narrow by location itself. An
    /// envelope keeps its pagination metadata unchanged.
    pub fn into_response(self, query: &PersonSearch) -> PersonResponse {
        match self {
            Self::Bare(records) => {
                let mut content: Vec<Person> = records.into_iter().map(Person::from).collect();
                if let Some(location) = query.filter.location() {
                    let needle = location.to_lowercase();
                    let before = content.len();
                    content.retain(|p| p.disappearance_location.to_lowercase().contains(&needle));
                    debug!(location, before, after = content.len(), "location filter applied");
                }
                PersonResponse::single_page(content, query)
            }
            Self::Envelope(envelope) => PersonResponse {
                content: envelope.content.into_iter().map(Person::from).collect(),
                total_elements: envelope.total_elements,
                total_pages: envelope.total_pages,
                size: envelope.size,
                number: envelope.number,
                first: envelope.first,
                last: envelope.last,
            },
        }
    }
}

/// Map an open-case record to the canonical model.
///
/// Status is derived one way only: a located date means `LOCALIZADA`,
/// its absence means `DESAPARECIDA`.
pub fn adapt_open_case(record: OpenCaseRecord) -> Person {
    let occurrence = record.ultima_ocorrencia;
    let located_at = occurrence.located_at().map(str::to_string);

    let interview = occurrence.interview.unwrap_or_default();
    let information = non_empty(interview.informacao);
    let clothing = non_empty(interview.vestimentas_desaparecido);

    let description = information
        .clone()
        .or(clothing)
        .unwrap_or_else(|| synthesize_description(record.idade, record.sexo.as_deref()));

    let status = if located_at.is_some() {
        Status::Localizada
    } else {
        Status::Desaparecida
    };
    let updated_at = located_at.unwrap_or_else(|| occurrence.dt_desaparecimento.clone());

    Person {
        id: record.id,
        given_name: record.nome,
        family_name: String::new(),
        age: record.idade,
        photo_url: non_empty(record.url_foto),
        created_at: occurrence.dt_desaparecimento.clone(),
        disappeared_at: occurrence.dt_desaparecimento,
        disappearance_location: occurrence.local_desaparecimento_concat.unwrap_or_default(),
        description,
        status,
        observations: information,
        contact_phone: None,
        updated_at,
    }
}

/// Fallback description built from age and sex.
pub fn synthesize_description(age: Option<u32>, sex: Option<&str>) -> String {
    let sex = sex
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
        .unwrap_or_else(|| "não informado".to_string());
    match age {
        Some(age) => format!("Pessoa de {age} anos, sexo {sex}."),
        None => format!("Pessoa de idade não informada, sexo {sex}."),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
