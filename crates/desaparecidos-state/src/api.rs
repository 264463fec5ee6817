//! The seam between controllers and the registry client.

use async_trait::async_trait;
use desaparecidos_client::{ApiClient, ApiError};
use desaparecidos_core::{NewInformation, Person, PersonResponse, PersonSearch, Statistics};

/// Registry operations the controllers depend on.
///
/// Implemented by [`ApiClient`]; tests substitute scripted fakes.
#[async_trait]
pub trait PersonsApi: Send + Sync {
    async fn search_persons(&self, query: &PersonSearch) -> Result<PersonResponse, ApiError>;

    async fn get_person_by_id(&self, id: u64) -> Result<Person, ApiError>;

    async fn submit_tip(&self, tip: &NewInformation) -> Result<(), ApiError>;

    async fn get_statistics(&self) -> Result<Statistics, ApiError>;
}

#[async_trait]
impl PersonsApi for ApiClient {
    async fn search_persons(&self, query: &PersonSearch) -> Result<PersonResponse, ApiError> {
        ApiClient::search_persons(self, query).await
    }

    async fn get_person_by_id(&self, id: u64) -> Result<Person, ApiError> {
        ApiClient::get_person_by_id(self, id).await
    }

    async fn submit_tip(&self, tip: &NewInformation) -> Result<(), ApiError> {
        ApiClient::submit_tip(self, tip).await
    }

    async fn get_statistics(&self) -> Result<Statistics, ApiError> {
        ApiClient::get_statistics(self).await
    }
}
