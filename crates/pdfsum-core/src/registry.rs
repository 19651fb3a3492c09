//! Lazily initialized model handles.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::InferenceConfig;
use crate::hf::HuggingFaceModel;
use crate::model::{ModelError, ModelId, SummarizationModel};

/// Builds the handle for a model the first time it is requested.
pub type ModelFactory =
    Arc<dyn Fn(ModelId) -> Result<Arc<dyn SummarizationModel>, ModelError> + Send + Sync>;

/// Owns one handle per [`ModelId`], created on first use and reused by
/// every later request.
///
/// A failed initialization leaves the slot empty, so the next request
/// tries again.
pub struct ModelRegistry {
    factory: ModelFactory,
    slots: HashMap<ModelId, OnceCell<Arc<dyn SummarizationModel>>>,
}

impl ModelRegistry {
    pub fn new(factory: ModelFactory) -> Self {
        let slots = ModelId::ALL
            .into_iter()
            .map(|id| (id, OnceCell::new()))
            .collect();
        Self { factory, slots }
    }

    /// Registry backed by the Hugging Face inference API, sharing one HTTP client.
    pub fn hugging_face(config: InferenceConfig, client: reqwest::Client) -> Self {
        Self::new(Arc::new(move |id| {
            tracing::info!(model = id.repo_id(), endpoint = %config.endpoint, "initializing model handle");
            let model: Arc<dyn SummarizationModel> =
                Arc::new(HuggingFaceModel::new(id, &config, client.clone()));
            Ok(model)
        }))
    }

    /// Registry that serves the same model for every id (tests, offline demos).
    pub fn fixed(model: Arc<dyn SummarizationModel>) -> Self {
        Self::new(Arc::new(move |_| Ok(model.clone())))
    }

    /// Get the handle for `id`, initializing it if this is the first request.
    pub async fn get(&self, id: ModelId) -> Result<Arc<dyn SummarizationModel>, ModelError> {
        let slot = self.slots.get(&id).ok_or_else(|| ModelError::Unavailable {
            model: id.repo_id().to_string(),
            message: "not registered".into(),
        })?;
        slot.get_or_try_init(|| async { (self.factory)(id) })
            .await
            .cloned()
    }

    /// Whether the handle for `id` has been created.
    pub fn is_loaded(&self, id: ModelId) -> bool {
        self.slots.get(&id).is_some_and(|slot| slot.initialized())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockModel, MockResponse};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_registry(builds: Arc<AtomicUsize>) -> ModelRegistry {
        ModelRegistry::new(Arc::new(move |id| {
            builds.fetch_add(1, Ordering::SeqCst);
            let model: Arc<dyn SummarizationModel> = Arc::new(MockModel::new(
                id.repo_id(),
                MockResponse::Summary("ok".into()),
            ));
            Ok(model)
        }))
    }

    #[tokio::test]
    async fn handles_are_created_once_per_model() {
        let builds = Arc::new(AtomicUsize::new(0));
        let registry = counting_registry(builds.clone());

        assert!(!registry.is_loaded(ModelId::T5Small));
        let a = registry.get(ModelId::T5Small).await.unwrap();
        let b = registry.get(ModelId::T5Small).await.unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert!(registry.is_loaded(ModelId::T5Small));
        assert!(!registry.is_loaded(ModelId::BartLargeCnn));

        let c = registry.get(ModelId::BartLargeCnn).await.unwrap();
        assert_eq!(c.name(), "facebook/bart-large-cnn");
        assert_eq!(builds.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_init_is_retried() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();
        let registry = ModelRegistry::new(Arc::new(move |id| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err(ModelError::Unavailable {
                    model: id.repo_id().into(),
                    message: "cold start".into(),
                });
            }
            let model: Arc<dyn SummarizationModel> =
                Arc::new(MockModel::new(id.repo_id(), MockResponse::Lead(3)));
            Ok(model)
        }));

        assert!(registry.get(ModelId::T5Small).await.is_err());
        assert!(!registry.is_loaded(ModelId::T5Small));
        assert!(registry.get(ModelId::T5Small).await.is_ok());
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }
}
