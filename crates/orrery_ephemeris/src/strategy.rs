//! Provider registry and per-body selection order.

use std::collections::{BTreeSet, HashMap};

use indexmap::IndexMap;
use orrery_error::{ErrorCode, Result, SpaceTimeError, validate_body_id};
use serde_json::json;
use tracing::{debug, info};

use crate::provider::{EphemerisProvider, validate_provider};

/// Owns every registered provider and decides which one answers a query.
///
/// Selection walks the body's priority list first, then every provider in
/// registration order. The first one that supports the body and covers the
/// JD wins.
#[derive(Default)]
pub struct EphemerisStrategy {
    providers: IndexMap<String, Box<dyn EphemerisProvider>>,
    priorities: HashMap<String, Vec<String>>,
}

impl EphemerisStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a provider. Fails `INVALID_CONFIGURATION` when the provider's
    /// declared shape is malformed or its id is already taken.
    pub fn register_provider(&mut self, provider: Box<dyn EphemerisProvider>) -> Result<()> {
        validate_provider(provider.as_ref())?;
        let id = provider.provider_id().to_owned();
        if self.providers.contains_key(&id) {
            return Err(SpaceTimeError::invalid_configuration(format!(
                "provider '{id}' is already registered"
            ))
            .with_details(json!({ "providerId": id })));
        }
        info!(
            provider_id = %id,
            bodies = provider.supported_bodies().len(),
            "registered ephemeris provider"
        );
        self.providers.insert(id, provider);
        Ok(())
    }

    /// Replace the selection order for `body_id`. Every id must already be
    /// registered.
    pub fn set_provider_priority(&mut self, body_id: &str, provider_ids: &[String]) -> Result<()> {
        validate_body_id(body_id)?;
        if let Some(unknown) = provider_ids.iter().find(|id| !self.providers.contains_key(*id)) {
            return Err(SpaceTimeError::invalid_configuration(format!(
                "priority for '{body_id}' names unregistered provider '{unknown}'"
            ))
            .with_details(json!({ "bodyId": body_id, "providerId": unknown })));
        }
        debug!(body_id, order = ?provider_ids, "provider priority set");
        self.priorities
            .insert(body_id.to_owned(), provider_ids.to_vec());
        Ok(())
    }

    pub fn priority(&self, body_id: &str) -> Option<&[String]> {
        self.priorities.get(body_id).map(Vec::as_slice)
    }

    /// First provider able to serve `body_id` at `julian_date`.
    pub fn select_provider(&self, body_id: &str, julian_date: f64) -> Result<&dyn EphemerisProvider> {
        let prioritized = self
            .priorities
            .get(body_id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.providers.get(id));
        let fallback = self.providers.values();

        prioritized
            .chain(fallback)
            .find(|p| p.can_serve(body_id, julian_date))
            .map(|p| p.as_ref())
            .ok_or_else(|| {
                SpaceTimeError::new(
                    ErrorCode::ProviderUnavailable,
                    format!("no provider serves '{body_id}' at JD {julian_date}"),
                )
                .with_details(json!({ "bodyId": body_id, "julianDate": julian_date }))
            })
    }

    pub fn provider(&self, provider_id: &str) -> Option<&dyn EphemerisProvider> {
        self.providers.get(provider_id).map(|p| p.as_ref())
    }

    /// Registration order.
    pub fn provider_ids(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Union of every provider's supported bodies.
    pub fn available_bodies(&self) -> BTreeSet<String> {
        self.providers
            .values()
            .flat_map(|p| p.supported_bodies().iter().cloned())
            .collect()
    }
}

impl std::fmt::Debug for EphemerisStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EphemerisStrategy")
            .field("providers", &self.providers.keys().collect::<Vec<_>>())
            .field("priorities", &self.priorities)
            .finish()
    }
}
