use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::{ProfileInput, TrustError, TrustScoreConfig};

/// Badge tier derived from a trust score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Badge {
    Bronze,
    Silver,
    Gold,
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Badge::Bronze => "Bronze",
            Badge::Silver => "Silver",
            Badge::Gold => "Gold",
        };
        write!(f, "{value}")
    }
}

impl FromStr for Badge {
    type Err = TrustError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "bronze" => Ok(Badge::Bronze),
            "silver" => Ok(Badge::Silver),
            "gold" => Ok(Badge::Gold),
            _ => Err(TrustError::InvalidBadge(value.to_string())),
        }
    }
}

/// Trust score with the badges it earned
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustScore {
    /// The calculated score
    pub score: u64,
    /// Empty, or exactly one badge
    pub badges: BTreeSet<Badge>,
}

impl TrustScore {
    /// The best badge earned, if any
    pub fn highest_badge(&self) -> Option<Badge> {
        self.badges.iter().next_back().copied()
    }

    pub fn has_badge(&self, badge: Badge) -> bool {
        self.badges.contains(&badge)
    }
}

impl fmt::Display for TrustScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.highest_badge() {
            Some(badge) => write!(f, "{} ({badge})", self.score),
            None => write!(f, "{}", self.score),
        }
    }
}

/// Computes trust scores from profile input
#[derive(Debug, Clone, Default)]
pub struct TrustScoreEvaluator {
    config: TrustScoreConfig,
}

impl TrustScoreEvaluator {
    /// Create an evaluator with a validated configuration
    pub fn new(config: TrustScoreConfig) -> crate::Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TrustScoreConfig {
        &self.config
    }

    /// Score a profile and assign its badges
    pub fn evaluate(&self, profile: &ProfileInput) -> TrustScore {
        let score = self.calculate_score(profile);
        let badges = self.assign_badges(score);
        debug!(score, ?badges, "evaluated trust score");
        TrustScore { score, badges }
    }

    /// Sum the weights of every filled-in field
    pub fn calculate_score(&self, profile: &ProfileInput) -> u64 {
        let config = &self.config;
        let mut score: u64 = 0;

        if is_filled(profile.name.as_deref()) {
            score = score.saturating_add(config.name_weight);
        }
        if is_filled(profile.email.as_deref()) {
            score = score.saturating_add(config.email_weight);
        }
        if is_filled(profile.phone.as_deref()) {
            score = score.saturating_add(config.phone_weight);
        }
        if profile.verification_document.is_some() {
            score = score.saturating_add(config.verification_document_weight);
        }
        if !profile.certifications.is_empty() {
            let count = u64::try_from(profile.certifications.len()).unwrap_or(u64::MAX);
            score = score.saturating_add(count.saturating_mul(config.certification_weight));
        }

        score
    }

    /// Pick the first badge whose threshold the score reaches
    pub fn assign_badges(&self, score: u64) -> BTreeSet<Badge> {
        self.config
            .badge_thresholds
            .iter()
            .find(|(_, threshold)| score >= *threshold)
            .map(|(badge, _)| *badge)
            .into_iter()
            .collect()
    }
}

/// Score a profile with the default weights and thresholds
pub fn evaluate(profile: &ProfileInput) -> TrustScore {
    TrustScoreEvaluator::default().evaluate(profile)
}

fn is_filled(value: Option<&str>) -> bool {
    value.map_or(false, |v| !v.is_empty())
}
