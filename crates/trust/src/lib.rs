//! Trust scoring for WelcomeHub user profiles
//!
//! This crate turns a submitted profile into a trust score and a badge tier:
//! - Profile input and submission validation
//! - Weighted completeness scoring
//! - Badge assignment from score thresholds
//!
//! Scoring is pure and never fails. Absent fields simply do not contribute.

mod error;
mod profile;
mod score;

use serde::{Deserialize, Serialize};

pub use error::TrustError;
pub use profile::{Certification, DocumentRef, ProfileInput};
pub use score::{evaluate, Badge, TrustScore, TrustScoreEvaluator};

/// Result type for trust operations
pub type Result<T> = std::result::Result<T, TrustError>;

/// Trust scoring configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrustScoreConfig {
    /// Points for a non-empty name
    pub name_weight: u64,
    /// Points for a non-empty email
    pub email_weight: u64,
    /// Points for a non-empty phone number
    pub phone_weight: u64,
    /// Points for an attached verification document
    pub verification_document_weight: u64,
    /// Points per certification. The total is not capped.
    pub certification_weight: u64,
    /// Badge thresholds, highest first. The first threshold the score reaches wins.
    pub badge_thresholds: Vec<(Badge, u64)>,
}

impl Default for TrustScoreConfig {
    fn default() -> Self {
        Self {
            name_weight: 10,
            email_weight: 20,
            phone_weight: 20,
            verification_document_weight: 50,
            certification_weight: 10,
            badge_thresholds: vec![(Badge::Gold, 100), (Badge::Silver, 70), (Badge::Bronze, 40)],
        }
    }
}

impl TrustScoreConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that thresholds are listed highest first with each badge at most once
    pub fn validate(&self) -> Result<()> {
        for pair in self.badge_thresholds.windows(2) {
            let (higher_badge, higher) = pair[0];
            let (lower_badge, lower) = pair[1];
            if higher < lower || higher_badge <= lower_badge {
                return Err(TrustError::ConfigError(format!(
                    "badge thresholds must descend: {higher_badge}={higher} listed before {lower_badge}={lower}"
                )));
            }
        }
        Ok(())
    }
}
