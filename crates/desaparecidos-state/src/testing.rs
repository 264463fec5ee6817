//! Scripted fakes shared by the controller tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use desaparecidos_client::{ApiError, ErrorKind};
use desaparecidos_core::{
    NewInformation, Person, PersonResponse, PersonSearch, Statistics, Status,
};

use crate::api::PersonsApi;
use crate::notice::{Notice, Notifier};

#[derive(Default)]
pub(crate) struct FakeApi {
    searches: Mutex<VecDeque<Result<PersonResponse, ApiError>>>,
    persons: Mutex<VecDeque<Result<Person, ApiError>>>,
    tips: Mutex<VecDeque<Result<(), ApiError>>>,
    pub search_calls: Mutex<Vec<PersonSearch>>,
    pub person_calls: Mutex<Vec<u64>>,
    pub tip_calls: Mutex<Vec<NewInformation>>,
}

impl FakeApi {
    pub fn push_search(&self, result: Result<PersonResponse, ApiError>) {
        self.searches.lock().unwrap().push_back(result);
    }

    pub fn push_person(&self, result: Result<Person, ApiError>) {
        self.persons.lock().unwrap().push_back(result);
    }

    pub fn push_tip(&self, result: Result<(), ApiError>) {
        self.tips.lock().unwrap().push_back(result);
    }

    pub fn search_calls(&self) -> Vec<PersonSearch> {
        self.search_calls.lock().unwrap().clone()
    }

    pub fn person_calls(&self) -> Vec<u64> {
        self.person_calls.lock().unwrap().clone()
    }

    pub fn tip_calls(&self) -> Vec<NewInformation> {
        self.tip_calls.lock().unwrap().clone()
    }
}

fn unscripted() -> ApiError {
    api_error("no scripted response", 500)
}

#[async_trait]
impl PersonsApi for FakeApi {
    async fn search_persons(&self, query: &PersonSearch) -> Result<PersonResponse, ApiError> {
        self.search_calls.lock().unwrap().push(query.clone());
        self.searches
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unscripted()))
    }

    async fn get_person_by_id(&self, id: u64) -> Result<Person, ApiError> {
        self.person_calls.lock().unwrap().push(id);
        self.persons
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unscripted()))
    }

    async fn submit_tip(&self, tip: &NewInformation) -> Result<(), ApiError> {
        self.tip_calls.lock().unwrap().push(tip.clone());
        self.tips
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unscripted()))
    }

    async fn get_statistics(&self) -> Result<Statistics, ApiError> {
        Ok(Statistics::new(0, 0))
    }
}

#[derive(Default)]
pub(crate) struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

pub(crate) fn api_error(message: &str, status: u16) -> ApiError {
    ApiError {
        message: message.to_string(),
        status,
        kind: ErrorKind::Upstream,
    }
}

pub(crate) fn person(id: u64) -> Person {
    Person {
        id,
        given_name: format!("Pessoa {id}"),
        family_name: String::new(),
        age: Some(30),
        photo_url: None,
        disappeared_at: "2024-01-01".into(),
        disappearance_location: "Cuiabá/MT".into(),
        description: "Pessoa de 30 anos, sexo feminino.".into(),
        status: Status::Desaparecida,
        observations: None,
        contact_phone: None,
        created_at: "2024-01-01".into(),
        updated_at: "2024-01-01".into(),
    }
}

pub(crate) fn page(ids: &[u64], number: u32, total_pages: u32) -> PersonResponse {
    PersonResponse {
        content: ids.iter().copied().map(person).collect(),
        total_elements: u64::from(total_pages) * 10,
        total_pages,
        size: 10,
        number,
        first: number == 0,
        last: number + 1 >= total_pages,
    }
}
