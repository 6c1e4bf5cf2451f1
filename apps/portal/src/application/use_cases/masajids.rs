use std::sync::Arc;

use tracing::{info, instrument, warn};

use alasr_types::{AddMember, CreateMasjid, Masjid, MasjidMember, MasjidStatistics, UpdateMasjid};

use crate::app_error::{AppError, AppResult};
use crate::application::ports::{MasjidGateway, UserGateway};
use crate::application::state::PortalState;
use crate::application::validators::{is_present, matches_term};

// ============================================================================
// Use Cases
// ============================================================================

#[derive(Clone)]
pub struct MasajidsUseCases {
    masajids: Arc<dyn MasjidGateway>,
    users: Arc<dyn UserGateway>,
}

impl MasajidsUseCases {
    pub fn new(masajids: Arc<dyn MasjidGateway>, users: Arc<dyn UserGateway>) -> Self {
        Self { masajids, users }
    }

    // ========================================================================
    // Listing
    // ========================================================================

    /// Load the masjid list, bypassing the cache.
    #[instrument(skip(self, state))]
    pub async fn load(&self, state: &mut PortalState) -> AppResult<()> {
        state.masajids.set_loading(true);
        match self.masajids.list(false).await {
            Ok(items) => {
                info!(count = items.len(), "Masajids loaded");
                state.masajids.set_items(items);
                Ok(())
            }
            Err(e) => {
                state.masajids.set_error(e.user_message());
                Err(e)
            }
        }
    }

    /// Users for the member form. Cached; failures leave the current list alone.
    #[instrument(skip(self, state))]
    pub async fn load_users_for_forms(&self, state: &mut PortalState) {
        match self.users.list(true).await {
            Ok(users) => state.users.set_items(users),
            Err(e) => warn!(error = %e, "Failed to load users for member form"),
        }
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> AppResult<Masjid> {
        self.masajids.get(id).await
    }

    #[instrument(skip(self))]
    pub async fn statistics(&self, id: &str) -> AppResult<MasjidStatistics> {
        self.masajids.statistics(id).await
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Create a masjid, or update the one with `id`, then reload the list.
    #[instrument(skip(self, state, form), fields(name = %form.name))]
    pub async fn save(
        &self,
        state: &mut PortalState,
        id: Option<&str>,
        form: CreateMasjid,
    ) -> AppResult<Masjid> {
        if !is_present(&form.name) {
            return Err(AppError::InvalidInput("Masjid name is required".into()));
        }

        let saved = match id {
            Some(id) => {
                let updated = self.masajids.update(id, &update_from_form(form)).await?;
                state.masajids.update(updated.clone());
                info!(masjid_id = %updated.id, "Masjid updated");
                updated
            }
            None => {
                let created = self.masajids.create(&form).await?;
                state.masajids.add(created.clone());
                info!(masjid_id = %created.id, "Masjid created");
                created
            }
        };

        self.reload_after_mutation(state).await;
        Ok(saved)
    }

    /// Delete a masjid. It leaves the local list immediately.
    #[instrument(skip(self, state))]
    pub async fn delete(&self, state: &mut PortalState, id: &str) -> AppResult<()> {
        self.masajids.delete(id).await?;
        state.masajids.remove(id);
        info!(masjid_id = %id, "Masjid deleted");

        self.reload_after_mutation(state).await;
        Ok(())
    }

    async fn reload_after_mutation(&self, state: &mut PortalState) {
        match self.masajids.list(false).await {
            Ok(items) => state.masajids.set_items(items),
            Err(e) => warn!(error = %e, "Reload after mutation failed, keeping local list"),
        }
    }

    // ========================================================================
    // Members
    // ========================================================================

    #[instrument(skip(self))]
    pub async fn members(&self, masjid_id: &str) -> AppResult<Vec<MasjidMember>> {
        self.masajids.members(masjid_id).await
    }

    /// Add a member and return the refreshed member list.
    #[instrument(skip(self, member), fields(user_id = %member.user_id))]
    pub async fn add_member(
        &self,
        masjid_id: &str,
        member: &AddMember,
    ) -> AppResult<Vec<MasjidMember>> {
        if !is_present(&member.user_id) {
            return Err(AppError::InvalidInput("Please select a user".into()));
        }
        if member.permissions.is_empty() {
            return Err(AppError::InvalidInput(
                "Please select at least one permission".into(),
            ));
        }

        self.masajids.add_member(masjid_id, member).await?;
        info!(role = %member.role, "Member added");
        self.masajids.members(masjid_id).await
    }

    /// Remove a member and return the refreshed member list.
    #[instrument(skip(self))]
    pub async fn remove_member(
        &self,
        masjid_id: &str,
        user_id: &str,
    ) -> AppResult<Vec<MasjidMember>> {
        self.masajids.remove_member(masjid_id, user_id).await?;
        info!("Member removed");
        self.masajids.members(masjid_id).await
    }
}

/// Masajids whose name or city contains `term`, ignoring case.
pub fn filter_masajids<'a>(masajids: &'a [Masjid], term: &str) -> Vec<&'a Masjid> {
    masajids
        .iter()
        .filter(|m| {
            matches_term(&m.name, term)
                || m.city.as_deref().is_some_and(|city| matches_term(city, term))
        })
        .collect()
}

fn update_from_form(form: CreateMasjid) -> UpdateMasjid {
    UpdateMasjid {
        name: Some(form.name),
        location: form.location,
        address: form.address,
        city: form.city,
        state: form.state,
        country: form.country,
        postal_code: form.postal_code,
        contact_email: form.contact_email,
        contact_phone: form.contact_phone,
    }
}
