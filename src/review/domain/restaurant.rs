//! Restaurant aggregate and its review lifecycle.

use super::{
    EvidenceImages, EvidenceUrl, GeoPoint, ParseStatusError, RestaurantId, ReviewDomainError,
    WorkerId,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Review lifecycle state of a restaurant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    /// No worker has claimed the restaurant.
    NotStarted,
    /// Exactly one worker holds an open task for the restaurant.
    Pending,
    /// Evidence has been recorded. Terminal unless an admin resets it.
    Completed,
}

impl ReviewStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ReviewStatus {
    type Error = ParseStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "not_started" => Ok(Self::NotStarted),
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseStatusError(value.to_owned())),
        }
    }
}

/// Display-only contact details of a restaurant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantProfile {
    name: String,
    phone: String,
    address: String,
}

impl RestaurantProfile {
    /// Creates a profile, trimming every field.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewDomainError::EmptyProfileField`] for the first field
    /// that is empty after trimming.
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        address: impl Into<String>,
    ) -> Result<Self, ReviewDomainError> {
        Ok(Self {
            name: required_field("name", name)?,
            phone: required_field("phone", phone)?,
            address: required_field("address", address)?,
        })
    }

    /// Returns the restaurant name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the contact phone number.
    #[must_use]
    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Returns the street address.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }
}

fn required_field(
    field: &'static str,
    value: impl Into<String>,
) -> Result<String, ReviewDomainError> {
    let raw: String = value.into();
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ReviewDomainError::EmptyProfileField(field));
    }
    Ok(trimmed.to_owned())
}

/// Restaurant aggregate root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    id: RestaurantId,
    profile: RestaurantProfile,
    location: GeoPoint,
    review_status: ReviewStatus,
    evidence: Option<EvidenceImages>,
    review_history: Vec<EvidenceUrl>,
    reviewed_by: Option<WorkerId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted restaurant.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedRestaurantData {
    /// Persisted identifier.
    pub id: RestaurantId,
    /// Persisted contact details.
    pub profile: RestaurantProfile,
    /// Persisted location.
    pub location: GeoPoint,
    /// Persisted review status.
    pub review_status: ReviewStatus,
    /// Persisted evidence images, if any.
    pub evidence: Option<EvidenceImages>,
    /// Every evidence URL recorded so far.
    pub review_history: Vec<EvidenceUrl>,
    /// Persisted reviewer, if any.
    pub reviewed_by: Option<WorkerId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Restaurant {
    /// Registers a new, unclaimed restaurant.
    #[must_use]
    pub fn register(profile: RestaurantProfile, location: GeoPoint, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: RestaurantId::new(),
            profile,
            location,
            review_status: ReviewStatus::NotStarted,
            evidence: None,
            review_history: Vec::new(),
            reviewed_by: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a restaurant from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewDomainError::InconsistentRecord`] when the stored
    /// status disagrees with the stored evidence and reviewer.
    pub fn from_persisted(data: PersistedRestaurantData) -> Result<Self, ReviewDomainError> {
        let has_review = data.evidence.is_some() && data.reviewed_by.is_some();
        let has_any_review = data.evidence.is_some() || data.reviewed_by.is_some();
        let consistent = match data.review_status {
            ReviewStatus::Completed => has_review,
            ReviewStatus::NotStarted | ReviewStatus::Pending => !has_any_review,
        };
        if !consistent {
            return Err(ReviewDomainError::InconsistentRecord {
                entity: "restaurant",
                reason: format!(
                    "restaurant {} is {} but evidence/reviewer presence is {}/{}",
                    data.id,
                    data.review_status,
                    data.evidence.is_some(),
                    data.reviewed_by.is_some()
                ),
            });
        }

        Ok(Self {
            id: data.id,
            profile: data.profile,
            location: data.location,
            review_status: data.review_status,
            evidence: data.evidence,
            review_history: data.review_history,
            reviewed_by: data.reviewed_by,
            created_at: data.created_at,
            updated_at: data.updated_at,
        })
    }

    /// Returns the restaurant identifier.
    #[must_use]
    pub const fn id(&self) -> RestaurantId {
        self.id
    }

    /// Returns the contact details.
    #[must_use]
    pub const fn profile(&self) -> &RestaurantProfile {
        &self.profile
    }

    /// Returns the restaurant location.
    #[must_use]
    pub const fn location(&self) -> GeoPoint {
        self.location
    }

    /// Returns the review status.
    #[must_use]
    pub const fn review_status(&self) -> ReviewStatus {
        self.review_status
    }

    /// Returns the current evidence, present only once completed.
    #[must_use]
    pub const fn evidence(&self) -> Option<&EvidenceImages> {
        self.evidence.as_ref()
    }

    /// Returns every evidence URL ever recorded for this restaurant.
    #[must_use]
    pub fn review_history(&self) -> &[EvidenceUrl] {
        &self.review_history
    }

    /// Returns the worker who completed the review, if any.
    #[must_use]
    pub const fn reviewed_by(&self) -> Option<WorkerId> {
        self.reviewed_by
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns `true` when a worker may claim the restaurant.
    #[must_use]
    pub fn is_claimable(&self) -> bool {
        self.review_status == ReviewStatus::NotStarted
    }

    /// Returns the display summary used in task listings.
    #[must_use]
    pub fn summary(&self) -> RestaurantSummary {
        RestaurantSummary {
            id: self.id,
            name: self.profile.name.clone(),
            phone: self.profile.phone.clone(),
            address: self.profile.address.clone(),
            location: self.location,
        }
    }

    /// Moves an unclaimed restaurant to `pending`.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewDomainError::NotClaimable`] unless the restaurant is
    /// `not_started`.
    pub fn mark_claimed(&mut self, clock: &impl Clock) -> Result<(), ReviewDomainError> {
        self.claim_at(clock.utc())
    }

    /// Claim transition stamped with an explicit time, for adapters applying
    /// the conditional update themselves.
    pub(crate) fn claim_at(&mut self, at: DateTime<Utc>) -> Result<(), ReviewDomainError> {
        if !self.is_claimable() {
            return Err(ReviewDomainError::NotClaimable {
                restaurant_id: self.id,
                status: self.review_status,
            });
        }
        self.review_status = ReviewStatus::Pending;
        self.updated_at = at;
        Ok(())
    }

    /// Completes the review with `images` captured by `reviewer`.
    ///
    /// Returns `Ok(false)` without changes when the restaurant is already
    /// completed with the same images and reviewer, which makes replays of a
    /// submission harmless.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewDomainError::EvidenceRejected`] when the restaurant is
    /// `not_started`, or completed with different evidence.
    pub fn record_evidence(
        &mut self,
        images: EvidenceImages,
        reviewer: WorkerId,
        clock: &impl Clock,
    ) -> Result<bool, ReviewDomainError> {
        self.record_evidence_at(images, reviewer, clock.utc())
    }

    /// Evidence transition stamped with an explicit time, for adapters that
    /// complete a task and its restaurant in one atomic step.
    pub(crate) fn record_evidence_at(
        &mut self,
        images: EvidenceImages,
        reviewer: WorkerId,
        at: DateTime<Utc>,
    ) -> Result<bool, ReviewDomainError> {
        match self.review_status {
            ReviewStatus::Pending => {
                self.review_history.extend(images.iter().cloned());
                self.evidence = Some(images);
                self.reviewed_by = Some(reviewer);
                self.review_status = ReviewStatus::Completed;
                self.updated_at = at;
                Ok(true)
            }
            ReviewStatus::Completed
                if self.reviewed_by == Some(reviewer) && self.evidence.as_ref() == Some(&images) =>
            {
                Ok(false)
            }
            ReviewStatus::Completed | ReviewStatus::NotStarted => {
                Err(ReviewDomainError::EvidenceRejected {
                    restaurant_id: self.id,
                    status: self.review_status,
                })
            }
        }
    }

    /// Applies an administrative status override.
    ///
    /// Only a reset to `not_started` is accepted: it clears the current
    /// evidence and reviewer while keeping the review history. Requesting
    /// the current status is a no-op. Returns `true` when anything changed.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewDomainError::StatusOverrideRejected`] for `pending`
    /// or `completed`, which only claims and submissions may produce.
    pub fn force_status(
        &mut self,
        status: ReviewStatus,
        clock: &impl Clock,
    ) -> Result<bool, ReviewDomainError> {
        self.force_status_at(status, clock.utc())
    }

    pub(crate) fn force_status_at(
        &mut self,
        status: ReviewStatus,
        at: DateTime<Utc>,
    ) -> Result<bool, ReviewDomainError> {
        if status == self.review_status {
            return Ok(false);
        }
        if status != ReviewStatus::NotStarted {
            return Err(ReviewDomainError::StatusOverrideRejected {
                restaurant_id: self.id,
                requested: status,
            });
        }
        self.review_status = ReviewStatus::NotStarted;
        self.evidence = None;
        self.reviewed_by = None;
        self.updated_at = at;
        Ok(true)
    }
}

/// Restaurant fields shown alongside a worker's tasks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestaurantSummary {
    /// Restaurant identifier.
    pub id: RestaurantId,
    /// Restaurant name.
    pub name: String,
    /// Contact phone number.
    pub phone: String,
    /// Street address.
    pub address: String,
    /// Restaurant location.
    pub location: GeoPoint,
}
