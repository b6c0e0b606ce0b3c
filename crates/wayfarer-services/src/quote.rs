use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;
use wayfarer_core::models::{CreateQuoteRequest, Quote, QuoteStatus};
use wayfarer_core::AppError;
use wayfarer_db::{DocumentStore, Filter, FindOptions, Repository};

#[derive(Clone)]
pub struct QuoteService {
    quotes: Repository<Quote>,
}

impl QuoteService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            quotes: Repository::new(store),
        }
    }

    #[tracing::instrument(skip(self, req), fields(db.table = "quotes", db.operation = "insert"))]
    pub async fn create(&self, req: CreateQuoteRequest) -> Result<Quote, AppError> {
        req.validate()?;
        let quote = Quote::new(req);
        self.quotes.insert(&quote).await?;
        tracing::info!(quote_id = %quote.id, destination = %quote.destination, "Quote requested");
        Ok(quote)
    }

    pub async fn list(&self) -> Result<Vec<Quote>, AppError> {
        self.quotes
            .find_with(&Filter::new(), FindOptions::newest_first())
            .await
    }

    pub async fn get(&self, id: Uuid) -> Result<Quote, AppError> {
        self.quotes
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("Quote", id))
    }

    #[tracing::instrument(skip(self), fields(db.table = "quotes", db.operation = "update"))]
    pub async fn update_status(&self, id: Uuid, status: QuoteStatus) -> Result<Quote, AppError> {
        let mut quote = self.get(id).await?;
        quote.status = status;
        quote.updated_at = chrono::Utc::now();
        if !self.quotes.replace(&quote).await? {
            return Err(AppError::not_found("Quote", id));
        }
        Ok(quote)
    }

    #[tracing::instrument(skip(self), fields(db.table = "quotes", db.operation = "delete"))]
    pub async fn delete(&self, id: Uuid) -> Result<Quote, AppError> {
        self.quotes
            .delete(id)
            .await?
            .ok_or_else(|| AppError::not_found("Quote", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Fixture;

    fn request(destination: &str) -> CreateQuoteRequest {
        CreateQuoteRequest {
            email: "meera@example.com".to_string(),
            phone: "9876543210".to_string(),
            destination: destination.to_string(),
            start_date: "2026-12-01".to_string(),
            duration: "5 days".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_quotes_listed_newest_first_and_completed() {
        let fx = Fixture::new().await;
        let service = &fx.services.quotes;
        service.create(request("Ladakh")).await.unwrap();
        let latest = service.create(request("Sikkim")).await.unwrap();
        assert_eq!(latest.status, QuoteStatus::Pending);

        let quotes = service.list().await.unwrap();
        assert_eq!(quotes[0].destination, "Sikkim");

        let done = service
            .update_status(latest.id, QuoteStatus::Completed)
            .await
            .unwrap();
        assert_eq!(done.status, QuoteStatus::Completed);
        assert_eq!(
            service.get(latest.id).await.unwrap().status,
            QuoteStatus::Completed
        );
    }

    #[tokio::test]
    async fn test_invalid_email_rejected() {
        let fx = Fixture::new().await;
        let mut bad = request("Ladakh");
        bad.email = "not-an-email".to_string();
        assert!(matches!(
            fx.services.quotes.create(bad).await,
            Err(AppError::InvalidInput(_))
        ));
    }
}
