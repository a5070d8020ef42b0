use tracing::{info, warn};

use crate::{error::RoastError, spotify::fetch::Fetched, types::ListeningProfile};

/// Share of forbidden answers at which the whole fan-out counts as denied.
///
/// Expressed as a ratio of the issued requests so that it keeps its meaning
/// when the request set changes. The default is one half, 5 of 10 calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForbiddenRatio {
    numerator: usize,
    denominator: usize,
}

impl ForbiddenRatio {
    pub const MAJORITY: Self = Self {
        numerator: 1,
        denominator: 2,
    };

    /// Returns `None` for a zero numerator or denominator, or a ratio above
    /// one. A zero ratio would deny every fan-out.
    pub const fn new(numerator: usize, denominator: usize) -> Option<Self> {
        if numerator == 0 || denominator == 0 || numerator > denominator {
            return None;
        }
        Some(Self {
            numerator,
            denominator,
        })
    }

    pub fn is_met(&self, forbidden: usize, issued: usize) -> bool {
        issued > 0 && forbidden * self.denominator >= issued * self.numerator
    }
}

impl Default for ForbiddenRatio {
    fn default() -> Self {
        Self::MAJORITY
    }
}

/// First tier: aborts when enough upstream calls were answered with 403,
/// which is how Spotify answers accounts that are not allowlisted for the app.
pub fn check_authorization(fetched: &[Fetched], ratio: ForbiddenRatio) -> Result<(), RoastError> {
    let issued = fetched.len();
    let forbidden = fetched.iter().filter(|f| f.outcome.is_forbidden()).count();

    if ratio.is_met(forbidden, issued) {
        warn!("{} of {} upstream requests were forbidden", forbidden, issued);
        return Err(RoastError::UpstreamAuthorizationDenied { forbidden, issued });
    }

    if forbidden > 0 {
        info!(
            "{} of {} upstream requests were forbidden, continuing with partial data",
            forbidden, issued
        );
    }
    Ok(())
}

/// Second tier: aborts when nothing survived normalization.
pub fn check_data(profile: &ListeningProfile) -> Result<(), RoastError> {
    if profile.total_records() == 0 {
        return Err(RoastError::InsufficientData);
    }
    Ok(())
}
