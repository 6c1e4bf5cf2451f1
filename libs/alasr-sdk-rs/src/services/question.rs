use std::sync::Arc;
use std::time::Duration;

use alasr_types::{normalize_object, Question, QuestionStatistics};
use futures::FutureExt;
use tracing::{info, instrument, warn};

use super::{decode_list, segment, MasjidService};
use crate::cache::ListCache;
use crate::client::ApiClient;
use crate::error::PortalError;

/// Pause between per-masjid requests when aggregating questions.
const AGGREGATION_PAUSE: Duration = Duration::from_millis(200);

#[derive(Clone)]
pub struct QuestionService {
    api: Arc<ApiClient>,
    masajids: MasjidService,
    cache: Arc<ListCache<Question>>,
}

impl QuestionService {
    pub fn new(api: Arc<ApiClient>, masajids: MasjidService, freshness: Duration) -> Self {
        Self {
            api,
            masajids,
            cache: Arc::new(ListCache::new("questions", freshness)),
        }
    }

    /// All questions across masajids.
    ///
    /// Backends without `GET /questions` are handled by collecting the questions of
    /// every masjid one at a time.
    #[instrument(skip(self))]
    pub async fn get_all(&self, use_cache: bool) -> Result<Arc<Vec<Question>>, PortalError> {
        let api = Arc::clone(&self.api);
        let masajids = self.masajids.clone();
        self.cache
            .get_or_fetch(use_cache, move || {
                async move {
                    match api.get("/questions").await {
                        Ok(body) => decode_list("questions", body),
                        Err(e) if e.is_not_found() => {
                            info!("No global questions endpoint, collecting per masjid");
                            collect_per_masjid(&api, &masajids).await
                        }
                        Err(e) => Err(e),
                    }
                }
                .boxed()
            })
            .await
    }

    pub async fn by_masjid(&self, masjid_id: &str) -> Result<Vec<Question>, PortalError> {
        questions_of(&self.api, masjid_id).await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Question, PortalError> {
        let body = self.api.get(&format!("/questions/{}", segment(id))).await?;
        Ok(normalize_object(body)?)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), PortalError> {
        let result = self.api.delete(&format!("/questions/{}", segment(id))).await;
        self.cache.invalidate();
        result?;
        info!(question_id = %id, "Question deleted");
        Ok(())
    }

    pub async fn masjid_statistics(&self, masjid_id: &str) -> Result<QuestionStatistics, PortalError> {
        let body = self
            .api
            .get(&format!("/questions/masjid/{}/statistics", segment(masjid_id)))
            .await?;
        Ok(normalize_object(body)?)
    }

    pub fn clear_cache(&self) {
        self.cache.invalidate();
    }
}

async fn questions_of(api: &ApiClient, masjid_id: &str) -> Result<Vec<Question>, PortalError> {
    let body = api
        .get(&format!("/questions/masjid/{}", segment(masjid_id)))
        .await?;
    decode_list("questions", body)
}

async fn collect_per_masjid(
    api: &ApiClient,
    masajids: &MasjidService,
) -> Result<Vec<Question>, PortalError> {
    let masajids = masajids.get_all(true).await?;
    let mut questions = Vec::new();

    for (index, masjid) in masajids.iter().enumerate() {
        if index > 0 {
            tokio::time::sleep(AGGREGATION_PAUSE).await;
        }

        match questions_of(api, &masjid.id).await {
            Ok(found) => questions.extend(found),
            Err(e) => warn!(masjid_id = %masjid.id, error = %e, "Skipping masjid questions"),
        }
    }

    info!(count = questions.len(), masajids = masajids.len(), "Questions collected");
    Ok(questions)
}
