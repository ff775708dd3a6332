use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for registered evaluators (invite-gated users).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EvaluatorId(pub String);

/// Identifier wrapper for assessed profiles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProfileId(pub String);

/// Identifier wrapper for stored assessments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssessmentId(pub String);

impl fmt::Display for EvaluatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for AssessmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Career level an evaluator declared at onboarding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeniorityTier {
    Junior,
    #[default]
    Mid,
    Senior,
    Lead,
    Staff,
}

impl SeniorityTier {
    pub const ALL: [SeniorityTier; 5] = [
        SeniorityTier::Junior,
        SeniorityTier::Mid,
        SeniorityTier::Senior,
        SeniorityTier::Lead,
        SeniorityTier::Staff,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            SeniorityTier::Junior => "Junior",
            SeniorityTier::Mid => "Mid",
            SeniorityTier::Senior => "Senior",
            SeniorityTier::Lead => "Lead",
            SeniorityTier::Staff => "Staff",
        }
    }

    /// Exact match on the canonical label, surrounding whitespace included. Anything
    /// else is not a tier.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tier| tier.label() == raw)
    }
}

impl fmt::Display for SeniorityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The six axes every assessment scores, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Competency {
    Communication,
    Resilience,
    Collaboration,
    Ownership,
    Commitment,
    Pragmatism,
}

impl Competency {
    pub const ALL: [Competency; 6] = [
        Competency::Communication,
        Competency::Resilience,
        Competency::Collaboration,
        Competency::Ownership,
        Competency::Commitment,
        Competency::Pragmatism,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Competency::Communication => "Communication",
            Competency::Resilience => "Resilience",
            Competency::Collaboration => "Collaboration",
            Competency::Ownership => "Ownership",
            Competency::Commitment => "Commitment",
            Competency::Pragmatism => "Pragmatism",
        }
    }

    /// Column name used by the record store and CSV exports.
    pub const fn field_name(self) -> &'static str {
        match self {
            Competency::Communication => "comm_score",
            Competency::Resilience => "resilience_score",
            Competency::Collaboration => "collab_score",
            Competency::Ownership => "ownership_score",
            Competency::Commitment => "commitment_score",
            Competency::Pragmatism => "pragmatism_score",
        }
    }
}

impl fmt::Display for Competency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Validated 1..=5 scores for one evaluator's judgment of one profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetencyScores {
    #[serde(rename = "comm_score")]
    pub communication: u8,
    #[serde(rename = "resilience_score")]
    pub resilience: u8,
    #[serde(rename = "collab_score")]
    pub collaboration: u8,
    #[serde(rename = "ownership_score")]
    pub ownership: u8,
    #[serde(rename = "commitment_score")]
    pub commitment: u8,
    #[serde(rename = "pragmatism_score")]
    pub pragmatism: u8,
}

impl CompetencyScores {
    /// Same score on every axis.
    pub const fn uniform(score: u8) -> Self {
        Self {
            communication: score,
            resilience: score,
            collaboration: score,
            ownership: score,
            commitment: score,
            pragmatism: score,
        }
    }

    pub const fn get(&self, competency: Competency) -> u8 {
        match competency {
            Competency::Communication => self.communication,
            Competency::Resilience => self.resilience,
            Competency::Collaboration => self.collaboration,
            Competency::Ownership => self.ownership,
            Competency::Commitment => self.commitment,
            Competency::Pragmatism => self.pragmatism,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Competency, u8)> + '_ {
        Competency::ALL
            .into_iter()
            .map(move |competency| (competency, self.get(competency)))
    }
}

/// Unvalidated scores as they arrive from an evaluator. Missing fields stay `None`
/// so intake can report them instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCompetencyScores {
    #[serde(rename = "comm_score", default)]
    pub communication: Option<i64>,
    #[serde(rename = "resilience_score", default)]
    pub resilience: Option<i64>,
    #[serde(rename = "collab_score", default)]
    pub collaboration: Option<i64>,
    #[serde(rename = "ownership_score", default)]
    pub ownership: Option<i64>,
    #[serde(rename = "commitment_score", default)]
    pub commitment: Option<i64>,
    #[serde(rename = "pragmatism_score", default)]
    pub pragmatism: Option<i64>,
}

impl RawCompetencyScores {
    pub const fn get(&self, competency: Competency) -> Option<i64> {
        match competency {
            Competency::Communication => self.communication,
            Competency::Resilience => self.resilience,
            Competency::Collaboration => self.collaboration,
            Competency::Ownership => self.ownership,
            Competency::Commitment => self.commitment,
            Competency::Pragmatism => self.pragmatism,
        }
    }

    pub fn set(&mut self, competency: Competency, value: Option<i64>) {
        let slot = match competency {
            Competency::Communication => &mut self.communication,
            Competency::Resilience => &mut self.resilience,
            Competency::Collaboration => &mut self.collaboration,
            Competency::Ownership => &mut self.ownership,
            Competency::Commitment => &mut self.commitment,
            Competency::Pragmatism => &mut self.pragmatism,
        };
        *slot = value;
    }
}

impl From<CompetencyScores> for RawCompetencyScores {
    fn from(scores: CompetencyScores) -> Self {
        let mut raw = Self::default();
        for (competency, score) in scores.iter() {
            raw.set(competency, Some(i64::from(score)));
        }
        raw
    }
}

/// Evaluator as established by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluator {
    pub id: EvaluatorId,
    pub seniority: SeniorityTier,
}

/// Inbound request to assess a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentSubmission {
    pub target_profile_id: ProfileId,
    #[serde(flatten)]
    pub scores: RawCompetencyScores,
}

/// Immutable record of one evaluator's judgment of one profile.
///
/// `weight_applied` is a snapshot of the evaluator's seniority weight at submission time
/// and never follows later seniority changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub id: AssessmentId,
    pub evaluator_id: EvaluatorId,
    pub target_profile_id: ProfileId,
    #[serde(flatten)]
    pub scores: CompetencyScores,
    pub weight_applied: f64,
    pub created_at: DateTime<Utc>,
}

/// Projection of an assessment carrying only what aggregation reads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedScores {
    #[serde(flatten)]
    pub scores: CompetencyScores,
    pub weight_applied: f64,
}

impl From<&Assessment> for WeightedScores {
    fn from(assessment: &Assessment) -> Self {
        Self {
            scores: assessment.scores,
            weight_applied: assessment.weight_applied,
        }
    }
}

/// Assessed professional, keyed by a LinkedIn profile URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub linkedin_url: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub average_score: f64,
    pub total_assessments: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to register a profile that has not been assessed yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProfile {
    pub full_name: String,
    pub linkedin_url: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Cached aggregate fields stored on a profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileStats {
    pub average_score: f64,
    pub total_assessments: u32,
}

/// Coarse rating band for an overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Excellent,
    Good,
    Fair,
    Low,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 4.0 {
            ScoreBand::Excellent
        } else if score >= 3.0 {
            ScoreBand::Good
        } else if score >= 2.0 {
            ScoreBand::Fair
        } else {
            ScoreBand::Low
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "excellent",
            ScoreBand::Good => "good",
            ScoreBand::Fair => "fair",
            ScoreBand::Low => "low",
        }
    }
}
