//! HTTP client for the missing-persons registry.

use desaparecidos_core::{
    NewInformation, Person, PersonResponse, PersonSearch, Statistics, UpstreamListing,
    UpstreamRecord, UpstreamStatistics,
};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::params;

/// How tips are encoded on the wire. Fixed per deployment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TipTransport {
    /// `POST` with query parameters and no body.
    #[default]
    QueryParams,
    /// `POST` with a `multipart/form-data` body including photos.
    Multipart,
}

impl TipTransport {
    /// Whether the contact phone and photos reach the registry. Query
    /// parameters carry only the observations and the sighting location.
    pub fn carries_contact_details(&self) -> bool {
        matches!(self, Self::Multipart)
    }
}

/// Registry client. Each call makes a single attempt; failures come back as
/// [`ApiError`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    config: ClientConfig,
    tip_transport: TipTransport,
}

impl ApiClient {
    /// Build a client for `config`.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::from_transport(&e, config.timeout))?;
        Ok(Self {
            client,
            config,
            tip_transport: TipTransport::default(),
        })
    }

    pub fn with_tip_transport(mut self, transport: TipTransport) -> Self {
        self.tip_transport = transport;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn tip_transport(&self) -> TipTransport {
        self.tip_transport
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Fetch one page of persons.
    ///
    /// Uses the filtered endpoint when `query` has any filter set, the
    /// default listing otherwise.
    pub async fn search_persons(&self, query: &PersonSearch) -> Result<PersonResponse, ApiError> {
        let url = self.url(params::listing_path(query));
        let query_params = params::listing_params(query);

        info!(url = %url, page = query.page, size = query.size, "searching persons");
        let body = self
            .send(self.client.get(&url).query(&query_params))
            .await?;
        let listing: UpstreamListing = decode(&body)?;
        let response = listing.into_response(query);
        info!(
            count = response.content.len(),
            total = response.total_elements,
            "search complete"
        );
        Ok(response)
    }

    /// Fetch a single person by identifier.
    pub async fn get_person_by_id(&self, id: u64) -> Result<Person, ApiError> {
        let url = self.url(&params::person_path(id));

        info!(url = %url, id, "fetching person");
        let body = self.send(self.client.get(&url)).await?;
        let record: UpstreamRecord = decode(&body)?;
        Ok(Person::from(record))
    }

    /// Post a validated tip. Success carries no content.
    pub async fn submit_tip(&self, tip: &NewInformation) -> Result<(), ApiError> {
        let request = match self.tip_transport {
            TipTransport::QueryParams => {
                let url = self.url(params::TIP_QUERY_PATH);
                let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
                info!(url = %url, person_id = tip.person_id, "submitting tip");
                self.client
                    .post(&url)
                    .query(&params::tip_query_params(tip, &today))
            }
            TipTransport::Multipart => {
                let url = self.url(params::TIP_MULTIPART_PATH);
                info!(
                    url = %url,
                    person_id = tip.person_id,
                    photos = tip.photos.len(),
                    "submitting tip"
                );
                self.client.post(&url).multipart(self.tip_form(tip)?)
            }
        };

        self.send(request).await?;
        info!(person_id = tip.person_id, "tip accepted");
        Ok(())
    }

    fn tip_form(&self, tip: &NewInformation) -> Result<Form, ApiError> {
        let mut form = Form::new()
            .text("pessoaId", tip.person_id.to_string())
            .text("observacoes", tip.observations.clone());
        if let Some(location) = &tip.sighting_location {
            form = form.text("localizacaoAvistada", location.clone());
        }
        if let Some(phone) = &tip.contact_phone {
            form = form.text("telefoneContato", phone.clone());
        }
        for photo in &tip.photos {
            let part = Part::bytes(photo.data.clone())
                .file_name(photo.file_name.clone())
                .mime_str(&photo.mime_type)
                .map_err(|e| ApiError::from_transport(&e, self.config.timeout))?;
            form = form.part("fotos", part);
        }
        Ok(form)
    }

    /// Fetch registry counters; `total` is computed locally.
    pub async fn get_statistics(&self) -> Result<Statistics, ApiError> {
        let url = self.url(params::STATISTICS_PATH);

        info!(url = %url, "fetching statistics");
        let body = self.send(self.client.get(&url)).await?;
        let raw: UpstreamStatistics = decode(&body)?;
        Ok(Statistics::from(raw))
    }

    /// Send `request` and return the body of a 2xx response.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Vec<u8>, ApiError> {
        let timeout = self.config.timeout;
        let resp = request.send().await.map_err(|e| {
            let err = ApiError::from_transport(&e, timeout);
            warn!(status = err.status, kind = ?err.kind, error = %err.message, "request failed");
            err
        })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.bytes().await.unwrap_or_default();
            let err = ApiError::from_upstream(status.as_u16(), &body);
            warn!(status = err.status, error = %err.message, "upstream returned an error");
            return Err(err);
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| ApiError::from_transport(&e, timeout))?;
        Ok(body.to_vec())
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
        let err = ApiError::from_decode(&e);
        warn!(error = %err.message, "could not decode response");
        err
    })
}
