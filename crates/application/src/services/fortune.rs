//! Tarot, coffee-cup and horoscope readings.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use fortuna_domain::{
    ApiRequest, CoffeeReading, CoffeeReadingRequest, Horoscope, HoroscopePeriod, TarotReading,
    TarotReadingRequest, TarotSpread, ZodiacSign,
};

use crate::client::AuthenticatedHttpClient;
use crate::error::{ApiError, ApiResult};
use crate::ports::HttpTransport;

const TAROT_PATH: &str = "/tarot/readings";
const COFFEE_PATH: &str = "/coffee/readings";

/// Most photos the coffee endpoint accepts in one reading.
pub const MAX_COFFEE_PHOTOS: usize = 3;

/// Reading requests; all interpretation happens on the backend.
pub struct FortuneService<T> {
    client: Arc<AuthenticatedHttpClient<T>>,
}

impl<T: HttpTransport> FortuneService<T> {
    /// Creates the service.
    #[must_use]
    pub const fn new(client: Arc<AuthenticatedHttpClient<T>>) -> Self {
        Self { client }
    }

    /// Asks for a tarot reading.
    ///
    /// # Errors
    /// `InvalidRequest` for an empty question; any error of the client.
    pub async fn tarot_reading(&self, question: &str, spread: TarotSpread) -> ApiResult<TarotReading> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ApiError::InvalidRequest("question is empty".to_string()));
        }
        let body = TarotReadingRequest {
            question: question.to_string(),
            spread,
        };
        self.client.post_json(TAROT_PATH, &body).await
    }

    /// Sends cup photos for a coffee-grounds reading.
    ///
    /// # Errors
    /// `InvalidRequest` when there are no photos or too many; any error of
    /// the client.
    pub async fn coffee_reading(
        &self,
        photos: &[Vec<u8>],
        note: Option<String>,
    ) -> ApiResult<CoffeeReading> {
        if photos.is_empty() || photos.len() > MAX_COFFEE_PHOTOS {
            return Err(ApiError::InvalidRequest(format!(
                "expected 1 to {MAX_COFFEE_PHOTOS} photos, got {}",
                photos.len()
            )));
        }
        let body = CoffeeReadingRequest {
            images: photos.iter().map(|p| STANDARD.encode(p)).collect(),
            note,
        };
        self.client.post_json(COFFEE_PATH, &body).await
    }

    /// Fetches the horoscope for a sign and period.
    ///
    /// # Errors
    /// Any error of the client.
    pub async fn horoscope(&self, sign: ZodiacSign, period: HoroscopePeriod) -> ApiResult<Horoscope> {
        let request =
            ApiRequest::get(format!("/horoscope/{sign}")).with_query("period", period.as_str());
        self.client.fetch(request).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use fortuna_domain::Credentials;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::auth::{MemoryTokenStore, SessionManager};
    use crate::testing::FakeBackend;

    fn service() -> (Arc<FakeBackend>, FortuneService<Arc<FakeBackend>>) {
        let backend = Arc::new(FakeBackend::new("access-1"));
        let client = AuthenticatedHttpClient::new(
            Arc::clone(&backend),
            Arc::new(MemoryTokenStore::with_credentials(Credentials::new(
                "access-1",
                "refresh-1",
            ))),
            Arc::new(SessionManager::new()),
        );
        (backend, FortuneService::new(Arc::new(client)))
    }

    #[tokio::test]
    async fn test_horoscope_request_shape() {
        let (backend, fortune) = service();
        backend.set_fixture(
            "/horoscope/leo",
            json!({"sign": "leo", "period": "weekly", "date": "2026-10-19", "text": "Roar."}),
        );

        let horoscope = fortune
            .horoscope(ZodiacSign::Leo, HoroscopePeriod::Weekly)
            .await
            .unwrap();

        assert_eq!(horoscope.text, "Roar.");
        let sent = backend.requests("/horoscope/leo");
        assert_eq!(sent[0].query, vec![("period".to_string(), "weekly".to_string())]);
    }

    #[tokio::test]
    async fn test_coffee_photos_are_base64_encoded() {
        let (backend, fortune) = service();
        backend.set_fixture(
            "/coffee/readings",
            json!({"id": "c1", "text": "A bird: news is coming.", "symbols": ["bird"],
                   "createdAt": "2026-10-19T08:00:00Z"}),
        );

        let reading = fortune
            .coffee_reading(&[b"cup".to_vec()], Some("morning cup".to_string()))
            .await
            .unwrap();

        assert_eq!(reading.symbols, vec!["bird".to_string()]);
        let body = backend.requests("/coffee/readings")[0].body.clone().unwrap();
        assert_eq!(body["images"], json!(["Y3Vw"]));
        assert_eq!(body["note"], "morning cup");
    }

    #[tokio::test]
    async fn test_coffee_reading_requires_photos() {
        let (backend, fortune) = service();

        let error = fortune.coffee_reading(&[], None).await.unwrap_err();

        assert!(matches!(error, ApiError::InvalidRequest(_)));
        assert!(backend.requests("/coffee/readings").is_empty());
    }

    #[tokio::test]
    async fn test_empty_tarot_question_is_rejected() {
        let (_backend, fortune) = service();

        let error = fortune.tarot_reading("   ", TarotSpread::Single).await.unwrap_err();

        assert!(matches!(error, ApiError::InvalidRequest(_)));
    }
}
