use chrono::Utc;

use super::domain::{NewProfile, Profile, ProfileId, ProfileStats};
use super::intake::ValidationError;

pub const LINKEDIN_PROFILE_PREFIX: &str = "https://www.linkedin.com/in/";

/// Accepts a full URL or a bare handle; handles are expanded onto the LinkedIn prefix.
pub fn normalize_linkedin_url(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField {
            field: "linkedin_url",
        });
    }

    if trimmed.to_ascii_lowercase().starts_with("http") {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("{LINKEDIN_PROFILE_PREFIX}{trimmed}"))
    }
}

/// Key used for lookups so casing differences do not create duplicate profiles.
pub fn lookup_key(raw: &str) -> Result<String, ValidationError> {
    normalize_linkedin_url(raw).map(|url| url.to_lowercase())
}

pub(crate) fn profile_from_request(request: NewProfile) -> Result<Profile, ValidationError> {
    let full_name = request.full_name.trim().to_string();
    if full_name.is_empty() {
        return Err(ValidationError::EmptyField { field: "full_name" });
    }

    let linkedin_url = normalize_linkedin_url(&request.linkedin_url)?;
    let avatar_url = request
        .avatar_url
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty());
    let now = Utc::now();

    Ok(Profile {
        id: ProfileId("pending".to_string()),
        linkedin_url,
        full_name,
        avatar_url,
        average_score: 0.0,
        total_assessments: 0,
        created_at: now,
        updated_at: now,
    })
}

impl Profile {
    /// URL with the LinkedIn profile prefix stripped.
    pub fn handle(&self) -> &str {
        self.linkedin_url
            .strip_prefix(LINKEDIN_PROFILE_PREFIX)
            .unwrap_or(&self.linkedin_url)
    }

    /// Store `stats` as the cached score unless they describe fewer assessments than
    /// are already cached. Assessments are insert-only, so a smaller count is a snapshot
    /// taken before a concurrent insert and is dropped. Returns whether anything changed.
    pub fn apply_stats(&mut self, stats: ProfileStats) -> bool {
        if stats.total_assessments < self.total_assessments {
            return false;
        }
        self.average_score = stats.average_score;
        self.total_assessments = stats.total_assessments;
        self.updated_at = Utc::now();
        true
    }

    pub fn initials(&self) -> String {
        self.full_name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }
}
