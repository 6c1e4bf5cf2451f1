use std::sync::Arc;
use std::time::Duration;

use alasr_types::{
    normalize_members, normalize_object, AddMember, AddMemberRequest, CreateMasjid, Masjid,
    MasjidMember, MasjidStatistics, UpdateMasjid,
};
use futures::FutureExt;
use tracing::{info, instrument};

use super::{decode_list, segment};
use crate::cache::ListCache;
use crate::client::ApiClient;
use crate::error::PortalError;

#[derive(Clone)]
pub struct MasjidService {
    api: Arc<ApiClient>,
    cache: Arc<ListCache<Masjid>>,
}

impl MasjidService {
    pub fn new(api: Arc<ApiClient>, freshness: Duration) -> Self {
        Self {
            api,
            cache: Arc::new(ListCache::new("masajids", freshness)),
        }
    }

    /// All masajids, from the cache when `use_cache` and the snapshot is fresh.
    #[instrument(skip(self))]
    pub async fn get_all(&self, use_cache: bool) -> Result<Arc<Vec<Masjid>>, PortalError> {
        let api = Arc::clone(&self.api);
        self.cache
            .get_or_fetch(use_cache, move || {
                async move {
                    let body = api.get("/masajids").await?;
                    decode_list("masajids", body)
                }
                .boxed()
            })
            .await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Masjid, PortalError> {
        let body = self.api.get(&format!("/masajids/{}", segment(id))).await?;
        Ok(normalize_object(body)?)
    }

    #[instrument(skip(self, masjid), fields(name = %masjid.name))]
    pub async fn create(&self, masjid: &CreateMasjid) -> Result<Masjid, PortalError> {
        let result = self.api.post_json("/masajids", masjid).await;
        self.cache.invalidate();
        let created: Masjid = normalize_object(result?)?;
        info!(masjid_id = %created.id, "Masjid created");
        Ok(created)
    }

    #[instrument(skip(self, changes))]
    pub async fn update(&self, id: &str, changes: &UpdateMasjid) -> Result<Masjid, PortalError> {
        let result = self
            .api
            .put_json(&format!("/masajids/{}", segment(id)), changes)
            .await;
        self.cache.invalidate();
        Ok(normalize_object(result?)?)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), PortalError> {
        let result = self.api.delete(&format!("/masajids/{}", segment(id))).await;
        self.cache.invalidate();
        result?;
        info!(masjid_id = %id, "Masjid deleted");
        Ok(())
    }

    pub async fn statistics(&self, id: &str) -> Result<MasjidStatistics, PortalError> {
        let body = self
            .api
            .get(&format!("/masajids/{}/statistics", segment(id)))
            .await?;
        Ok(normalize_object(body)?)
    }

    /// Members of a masjid. A backend without the members endpoint yields an empty list.
    #[instrument(skip(self))]
    pub async fn members(&self, id: &str) -> Result<Vec<MasjidMember>, PortalError> {
        match self.api.get(&format!("/masajids/{}/members", segment(id))).await {
            Ok(body) => Ok(normalize_members(body)),
            Err(e) if e.is_not_found() => {
                info!(masjid_id = %id, "Members endpoint not available, returning empty list");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self, member), fields(user_id = %member.user_id, role = %member.role))]
    pub async fn add_member(&self, masjid_id: &str, member: &AddMember) -> Result<(), PortalError> {
        let request = AddMemberRequest::from(member);
        self.api
            .post_json(&format!("/masajids/{}/users", segment(masjid_id)), &request)
            .await?;
        info!("Member added");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn remove_member(&self, masjid_id: &str, user_id: &str) -> Result<(), PortalError> {
        self.api
            .delete(&format!(
                "/masajids/{}/users/{}",
                segment(masjid_id),
                segment(user_id)
            ))
            .await?;
        info!("Member removed");
        Ok(())
    }

    pub fn clear_cache(&self) {
        self.cache.invalidate();
    }
}
