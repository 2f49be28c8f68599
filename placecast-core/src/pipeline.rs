use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::{
    Config,
    error::LookupError,
    forecast::{ForecastProvider, forecaster_from_config},
    geocode::{Geocoder, GeocoderId, QualityPolicy, geocoder_from_config},
    model::{ForecastBundle, GeoResult},
};

/// Lifecycle of one submitted query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Resolving,
    ResolvedError,
    ResolvedOk,
}

/// What the UI renders: latest query, its geocoding result, its forecast.
/// Written only by [`Pipeline::submit`]; readers take snapshots.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub query: String,
    pub geo: Option<GeoResult>,
    pub forecast: Option<ForecastBundle>,
    pub phase: Phase,
    pub error: Option<LookupError>,
}

/// How a call to [`Pipeline::submit`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Empty query: no request went out, state is untouched.
    Ignored,
    /// A newer query was submitted while this one was in flight; its results
    /// were discarded without touching state.
    Stale,
    /// This query ran to completion and committed the given phase.
    Done(Phase),
}

/// The geocode-then-forecast pipeline and its view state.
///
/// Strictly sequential: the forecast request never starts before a reliable
/// geocoding result exists. Every submission takes a ticket from a
/// monotonically increasing counter; commits are skipped when the ticket is
/// no longer the latest, so a slow in-flight lookup can never overwrite the
/// state of a newer query. The underlying I/O is not cancelled, only its
/// result dropped.
pub struct Pipeline {
    geocoder: Box<dyn Geocoder>,
    policy: Box<dyn QualityPolicy>,
    forecaster: Box<dyn ForecastProvider>,
    state: Mutex<ViewState>,
    seq: AtomicU64,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline").finish_non_exhaustive()
    }
}

impl Pipeline {
    pub fn new(
        geocoder: Box<dyn Geocoder>,
        policy: Box<dyn QualityPolicy>,
        forecaster: Box<dyn ForecastProvider>,
    ) -> Self {
        Self {
            geocoder,
            policy,
            forecaster,
            state: Mutex::new(ViewState::default()),
            seq: AtomicU64::new(0),
        }
    }

    /// Wire up the configured geocoder (plus its quality policy) and the
    /// forecast provider. Missing keys fail here, before any lookup.
    pub fn from_config(id: GeocoderId, config: &Config) -> Result<Self, LookupError> {
        let (geocoder, policy) = geocoder_from_config(id, config)?;
        let forecaster = forecaster_from_config(config)?;
        Ok(Self::new(geocoder, policy, forecaster))
    }

    /// Clone of the current view state.
    pub fn snapshot(&self) -> ViewState {
        self.state.lock().clone()
    }

    /// Run one query through geocode → quality check → forecast.
    pub async fn submit(&self, query: &str) -> SubmitOutcome {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return SubmitOutcome::Ignored;
        }

        // Ticket for this submission; only the latest may commit.
        let ticket = self.seq.fetch_add(1, Ordering::SeqCst) + 1;

        {
            let mut state = self.state.lock();
            if ticket != self.seq.load(Ordering::SeqCst) {
                return SubmitOutcome::Stale;
            }
            state.query = trimmed.to_owned();
            state.geo = None;
            state.forecast = None;
            state.error = None;
            state.phase = Phase::Resolving;
        }

        let geo = match self.geocoder.resolve(trimmed).await {
            Ok(geo) => geo,
            Err(err) => return self.commit_error(ticket, None, err),
        };

        if !self.policy.is_reliable(&geo.quality) {
            tracing::debug!(query = trimmed, "geocoding quality judged unreliable");
            return self.commit_error(ticket, Some(geo), LookupError::NotFound);
        }

        let bundle = match self.forecaster.fetch(geo.coordinates).await {
            Ok(bundle) => bundle,
            Err(err) => return self.commit_error(ticket, Some(geo), err),
        };

        let mut state = self.state.lock();
        if ticket != self.seq.load(Ordering::SeqCst) {
            return SubmitOutcome::Stale;
        }
        state.geo = Some(geo);
        state.forecast = Some(bundle);
        state.phase = Phase::ResolvedOk;
        SubmitOutcome::Done(Phase::ResolvedOk)
    }

    fn commit_error(
        &self,
        ticket: u64,
        geo: Option<GeoResult>,
        err: LookupError,
    ) -> SubmitOutcome {
        let mut state = self.state.lock();
        if ticket != self.seq.load(Ordering::SeqCst) {
            return SubmitOutcome::Stale;
        }
        state.geo = geo;
        state.forecast = None;
        state.error = Some(err);
        state.phase = Phase::ResolvedError;
        SubmitOutcome::Done(Phase::ResolvedError)
    }
}
