//! Tip submission flow: form state, validation gate and submission.

use std::sync::Arc;

use desaparecidos_client::ApiError;
use desaparecidos_core::format::mask_phone;
use desaparecidos_core::{
    Photo, PhotoBatchOutcome, PhotoSet, TipDraft, ValidationErrors, validate_tip,
};
use thiserror::Error;
use tracing::{info, warn};

use crate::api::PersonsApi;
use crate::notice::{Notice, Notifier};

pub const SUCCESS_MESSAGE: &str = "Informações enviadas com sucesso! Obrigado pela colaboração.";
pub const FAILURE_MESSAGE: &str = "Erro ao enviar informações. Tente novamente.";

#[derive(Error, Debug)]
pub enum TipError {
    /// Rejected before any request was made.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// A tip being composed for one case.
pub struct TipForm {
    person_id: u64,
    notifier: Arc<dyn Notifier>,
    observations: String,
    sighting_location: String,
    contact_phone: String,
    photos: PhotoSet,
    field_errors: Option<ValidationErrors>,
}

impl TipForm {
    pub fn new(person_id: u64, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            person_id,
            notifier,
            observations: String::new(),
            sighting_location: String::new(),
            contact_phone: String::new(),
            photos: PhotoSet::new(),
            field_errors: None,
        }
    }

    pub fn person_id(&self) -> u64 {
        self.person_id
    }

    pub fn observations(&self) -> &str {
        &self.observations
    }

    pub fn sighting_location(&self) -> &str {
        &self.sighting_location
    }

    pub fn contact_phone(&self) -> &str {
        &self.contact_phone
    }

    pub fn photos(&self) -> &PhotoSet {
        &self.photos
    }

    /// Errors from the last failed validation.
    pub fn field_errors(&self) -> Option<&ValidationErrors> {
        self.field_errors.as_ref()
    }

    pub fn set_observations(&mut self, text: impl Into<String>) {
        self.observations = text.into();
    }

    pub fn set_sighting_location(&mut self, text: impl Into<String>) {
        self.sighting_location = text.into();
    }

    /// Store phone input, masked as it is typed.
    pub fn set_phone_input(&mut self, raw: &str) {
        self.contact_phone = mask_phone(raw);
    }

    /// Attach a batch of files. Every rejection is reported as a notice.
    pub fn add_photos(&mut self, files: Vec<Photo>) -> PhotoBatchOutcome {
        let outcome = self.photos.add_batch(files);
        for rejection in &outcome.rejected {
            self.notifier.notify(Notice::error(rejection.to_string()));
        }
        outcome
    }

    pub fn remove_photo(&mut self, index: usize) -> Option<Photo> {
        self.photos.remove(index)
    }

    /// Clear every field and release attached photos.
    pub fn reset(&mut self) {
        self.observations.clear();
        self.sighting_location.clear();
        self.contact_phone.clear();
        self.photos.clear();
        self.field_errors = None;
    }

    fn draft(&self) -> TipDraft {
        TipDraft {
            person_id: self.person_id,
            observations: self.observations.clone(),
            sighting_location: self.sighting_location.clone(),
            contact_phone: self.contact_phone.clone(),
            photos: self.photos.as_slice().to_vec(),
        }
    }

    /// Validate and submit.
    ///
    /// On success the form is cleared; on failure, or when the returned
    /// future is dropped before completing, every field is kept so the
    /// user can retry.
    pub async fn submit<A: PersonsApi + ?Sized>(&mut self, api: &A) -> Result<(), TipError> {
        let tip = match validate_tip(&self.draft()) {
            Ok(tip) => tip,
            Err(errors) => {
                self.field_errors = Some(errors.clone());
                return Err(errors.into());
            }
        };
        self.field_errors = None;

        match api.submit_tip(&tip).await {
            Ok(()) => {
                info!(person_id = self.person_id, "tip submitted");
                self.notifier.notify(Notice::success(SUCCESS_MESSAGE));
                self.reset();
                Ok(())
            }
            Err(err) => {
                warn!(person_id = self.person_id, error = %err.message, "tip submission failed");
                let message = if err.message.is_empty() {
                    FAILURE_MESSAGE.to_string()
                } else {
                    err.message.clone()
                };
                self.notifier.notify(Notice::error(message));
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notice::NoticeLevel;
    use crate::testing::{FakeApi, RecordingNotifier, api_error};
    use desaparecidos_core::tip::{MAX_PHOTO_BYTES, TipField};

    fn form() -> (TipForm, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        (TipForm::new(42, notifier.clone()), notifier)
    }

    fn image(name: &str) -> Photo {
        Photo::new(name, "image/png", vec![1; 64])
    }

    #[tokio::test]
    async fn short_observations_never_reach_network() {
        let api = FakeApi::default();
        let (mut f, notifier) = form();
        f.set_observations("curto");

        let err = f.submit(&api).await.unwrap_err();
        assert!(matches!(err, TipError::Validation(_)));
        assert!(api.tip_calls().is_empty());
        assert!(
            f.field_errors()
                .and_then(|e| e.message_for(TipField::Observations))
                .is_some()
        );
        assert!(notifier.notices().is_empty());
    }

    #[tokio::test]
    async fn bad_phone_never_reaches_network() {
        let api = FakeApi::default();
        let (mut f, _) = form();
        f.set_observations("Vista perto do terminal");
        f.contact_phone = "659999999".into();

        let err = f.submit(&api).await.unwrap_err();
        match err {
            TipError::Validation(errors) => {
                assert!(errors.message_for(TipField::ContactPhone).is_some())
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(api.tip_calls().is_empty());
    }

    #[tokio::test]
    async fn success_clears_form_and_notifies() {
        let api = FakeApi::default();
        api.push_tip(Ok(()));
        let (mut f, notifier) = form();
        f.set_observations("  Vista perto do terminal  ");
        f.set_sighting_location("Terminal André Maggi");
        f.set_phone_input("65999999999");
        f.add_photos(vec![image("a.png")]);

        f.submit(&api).await.unwrap();

        let sent = api.tip_calls();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].person_id, 42);
        assert_eq!(sent[0].observations, "Vista perto do terminal");
        assert_eq!(sent[0].contact_phone.as_deref(), Some("(65) 99999-9999"));
        assert_eq!(sent[0].photos.len(), 1);

        assert!(f.observations().is_empty());
        assert!(f.sighting_location().is_empty());
        assert!(f.contact_phone().is_empty());
        assert!(f.photos().is_empty());
        assert_eq!(notifier.notices(), vec![Notice::success(SUCCESS_MESSAGE)]);
    }

    #[tokio::test]
    async fn failure_keeps_form_for_retry() {
        let api = FakeApi::default();
        api.push_tip(Err(api_error("Serviço indisponível", 503)));
        api.push_tip(Ok(()));
        let (mut f, notifier) = form();
        f.set_observations("Vista perto do terminal");
        f.add_photos(vec![image("a.png"), image("b.png")]);

        let err = f.submit(&api).await.unwrap_err();
        assert!(matches!(err, TipError::Api(ref e) if e.status == 503));
        assert_eq!(f.observations(), "Vista perto do terminal");
        assert_eq!(f.photos().len(), 2);
        assert_eq!(notifier.notices()[0].level, NoticeLevel::Error);
        assert_eq!(notifier.notices()[0].message, "Serviço indisponível");

        f.submit(&api).await.unwrap();
        assert_eq!(api.tip_calls().len(), 2);
        assert!(f.photos().is_empty());
    }

    struct StalledApi;

    #[async_trait::async_trait]
    impl PersonsApi for StalledApi {
        async fn search_persons(
            &self,
            _: &desaparecidos_core::PersonSearch,
        ) -> Result<desaparecidos_core::PersonResponse, ApiError> {
            std::future::pending().await
        }

        async fn get_person_by_id(&self, _: u64) -> Result<desaparecidos_core::Person, ApiError> {
            std::future::pending().await
        }

        async fn submit_tip(&self, _: &desaparecidos_core::NewInformation) -> Result<(), ApiError> {
            std::future::pending().await
        }

        async fn get_statistics(&self) -> Result<desaparecidos_core::Statistics, ApiError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn abandoned_submit_allows_retry() {
        let (mut f, notifier) = form();
        f.set_observations("Vista perto do terminal");
        f.add_photos(vec![image("a.png")]);

        let abandoned =
            tokio::time::timeout(std::time::Duration::from_millis(20), f.submit(&StalledApi)).await;
        assert!(abandoned.is_err());
        assert_eq!(f.observations(), "Vista perto do terminal");
        assert_eq!(f.photos().len(), 1);

        let api = FakeApi::default();
        api.push_tip(Ok(()));
        f.submit(&api).await.unwrap();
        assert_eq!(api.tip_calls().len(), 1);
        assert_eq!(notifier.notices(), vec![Notice::success(SUCCESS_MESSAGE)]);
    }

    #[tokio::test]
    async fn empty_upstream_message_gets_generic_notice() {
        let api = FakeApi::default();
        api.push_tip(Err(api_error("", 500)));
        let (mut f, notifier) = form();
        f.set_observations("Vista perto do terminal");

        let _ = f.submit(&api).await;
        assert_eq!(notifier.notices()[0].message, FAILURE_MESSAGE);
    }

    #[test]
    fn phone_masked_as_typed() {
        let (mut f, _) = form();
        f.set_phone_input("659");
        assert_eq!(f.contact_phone(), "(65) 9");
        f.set_phone_input("6533334444");
        assert_eq!(f.contact_phone(), "(65) 3333-4444");
    }

    #[test]
    fn rejected_photos_each_notified() {
        let (mut f, notifier) = form();
        let big = Photo::new("grande.png", "image/png", vec![0; MAX_PHOTO_BYTES + 1]);
        let doc = Photo::new("bo.txt", "text/plain", vec![0; 8]);
        let outcome = f.add_photos(vec![image("a.png"), big, doc, image("b.png")]);

        assert_eq!(outcome.accepted, 2);
        assert_eq!(f.photos().len(), 2);
        let messages: Vec<String> = notifier.notices().into_iter().map(|n| n.message).collect();
        assert_eq!(
            messages,
            vec![
                "grande.png é muito grande. Máximo 5MB por arquivo.".to_string(),
                "bo.txt não é um arquivo de imagem válido".to_string(),
            ]
        );
    }

    #[test]
    fn over_limit_batch_notified_once() {
        let (mut f, notifier) = form();
        let outcome = f.add_photos((0..6).map(|i| image(&format!("{i}.png"))).collect());
        assert_eq!(outcome.accepted, 0);
        assert!(f.photos().is_empty());
        assert_eq!(notifier.notices().len(), 1);
        assert_eq!(notifier.notices()[0].message, "Máximo de 5 fotos permitidas");
    }

    #[test]
    fn reset_releases_photos() {
        let (mut f, _) = form();
        f.set_observations("algo escrito aqui");
        f.add_photos(vec![image("a.png")]);
        f.reset();
        assert!(f.photos().is_empty());
        assert!(f.observations().is_empty());
    }

    #[test]
    fn remove_photo_by_index() {
        let (mut f, _) = form();
        f.add_photos(vec![image("a.png"), image("b.png")]);
        assert_eq!(f.remove_photo(1).map(|p| p.file_name), Some("b.png".into()));
        assert_eq!(f.photos().len(), 1);
    }
}
