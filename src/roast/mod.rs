//! # Roast Pipeline
//!
//! Turns a bundle of possibly failing upstream answers into one roast:
//!
//! ```text
//! fetch (fan-out) → classify (bulk 403?) → normalize → classify (no data?)
//!                 → build prompt → generate (fallback on failure) → summarize
//! ```
//!
//! Each request walks the [`Stage`]s once; any stage may end the request with
//! a [`RoastError`] and nothing is retried. Encoding the result for the
//! redirect happens at the HTTP boundary, see [`transport`].

pub mod classify;
pub mod generate;
pub mod normalize;
pub mod prompt;
pub mod transport;

use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    error::RoastError,
    spotify::fetch::{DEFAULT_REQUESTS, Fetched, SpotifyFetcher, UpstreamRequest},
    types::{ListeningProfile, RoastResult, Service},
};
use classify::ForbiddenRatio;
use generate::TextGenerator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    ExchangingCredential,
    FetchingUpstream,
    Classifying,
    BuildingPrompt,
    Generating,
    Transporting,
    Done,
}

pub fn enter(stage: Stage) {
    debug!(?stage, "roast stage");
}

pub struct RoastPipeline {
    fetcher: SpotifyFetcher,
    generator: Arc<dyn TextGenerator>,
    requests: Vec<UpstreamRequest>,
    forbidden_ratio: ForbiddenRatio,
}

impl RoastPipeline {
    pub fn new(fetcher: SpotifyFetcher, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            fetcher,
            generator,
            requests: DEFAULT_REQUESTS.to_vec(),
            forbidden_ratio: ForbiddenRatio::default(),
        }
    }

    pub fn with_requests(mut self, requests: Vec<UpstreamRequest>) -> Self {
        self.requests = requests;
        self
    }

    pub fn with_forbidden_ratio(mut self, ratio: ForbiddenRatio) -> Self {
        self.forbidden_ratio = ratio;
        self
    }

    /// Runs the whole Spotify pipeline with an already exchanged token.
    pub async fn roast_spotify(&self, access_token: &str) -> Result<RoastResult, RoastError> {
        enter(Stage::FetchingUpstream);
        let fetched = self.fetcher.fetch_all(access_token, &self.requests).await;

        let profile = self.classify(&fetched)?;
        classify::check_data(&profile)?;
        self.roast_checked(Service::Spotify, profile).await
    }

    /// Bulk-forbidden check followed by normalization.
    pub fn classify(&self, fetched: &[Fetched]) -> Result<ListeningProfile, RoastError> {
        enter(Stage::Classifying);
        classify::check_authorization(fetched, self.forbidden_ratio)?;
        Ok(normalize::profile_from_outcomes(fetched))
    }

    /// Zero-data check, prompt, generation and summary for a normalized
    /// profile that did not come from the fan-out.
    pub async fn roast_profile(
        &self,
        service: Service,
        profile: ListeningProfile,
    ) -> Result<RoastResult, RoastError> {
        enter(Stage::Classifying);
        classify::check_data(&profile)?;
        self.roast_checked(service, profile).await
    }

    async fn roast_checked(
        &self,
        service: Service,
        profile: ListeningProfile,
    ) -> Result<RoastResult, RoastError> {
        info!(
            %service,
            records = profile.total_records(),
            "Roasting listening profile"
        );

        enter(Stage::BuildingPrompt);
        let prompt = prompt::build_prompt(service, &profile);

        enter(Stage::Generating);
        let (roast, degraded) = generate::generate_roast(self.generator.as_ref(), &prompt).await;
        if degraded {
            info!("Serving fallback roast");
        }

        Ok(RoastResult {
            roast,
            summary: transport::summarize(service, &profile),
        })
    }
}
