//! Photographic review evidence and trusted image-host validation.

use super::ReviewDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three evidence photographs closing out a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceSlot {
    /// Storefront signage or food-safety licence certificate.
    Signage,
    /// Printed or displayed menu.
    Menu,
    /// Promotional banner.
    Banner,
}

impl EvidenceSlot {
    /// All slots in submission order.
    pub const ALL: [Self; 3] = [Self::Signage, Self::Menu, Self::Banner];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Signage => "signage",
            Self::Menu => "menu",
            Self::Banner => "banner",
        }
    }
}

impl fmt::Display for EvidenceSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// URL of an evidence image hosted by the trusted image store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvidenceUrl(String);

impl EvidenceUrl {
    /// Wraps a URL read back from storage without re-validating its host.
    ///
    /// Only adapters reconstructing persisted records should use this; new
    /// evidence goes through [`TrustedImageHost::accept`].
    #[must_use]
    pub fn from_persisted(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the URL as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for EvidenceUrl {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EvidenceUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Prefix of the image store used in production deployments.
pub const DEFAULT_TRUSTED_IMAGE_PREFIX: &str = "https://res.cloudinary.com/";

/// URL prefix of the external image store whose uploads are accepted as
/// evidence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedImageHost {
    prefix: String,
}

impl Default for TrustedImageHost {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_TRUSTED_IMAGE_PREFIX.to_owned(),
        }
    }
}

impl TrustedImageHost {
    /// Creates a trusted host from its URL prefix.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewDomainError::InvalidImageHost`] unless the prefix is
    /// an `https://` URL with a non-empty host part.
    pub fn new(prefix: impl Into<String>) -> Result<Self, ReviewDomainError> {
        let raw = prefix.into();
        let trimmed = raw.trim();
        let has_host = trimmed
            .strip_prefix("https://")
            .is_some_and(|rest| !rest.trim_start_matches('/').is_empty());
        if !has_host || trimmed.chars().any(char::is_whitespace) {
            return Err(ReviewDomainError::InvalidImageHost(raw));
        }
        Ok(Self {
            prefix: trimmed.to_owned(),
        })
    }

    /// Returns the accepted URL prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Accepts `raw` as evidence for `slot` when it is hosted here.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewDomainError::MissingEvidence`] for an absent or blank
    /// value and [`ReviewDomainError::UntrustedImageUrl`] for any URL that
    /// does not start with the trusted prefix.
    pub fn accept(
        &self,
        slot: EvidenceSlot,
        raw: Option<&str>,
    ) -> Result<EvidenceUrl, ReviewDomainError> {
        let url = raw
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(ReviewDomainError::MissingEvidence(slot))?;
        let is_trusted = url.len() > self.prefix.len()
            && url.starts_with(&self.prefix)
            && !url.chars().any(char::is_whitespace);
        if !is_trusted {
            return Err(ReviewDomainError::UntrustedImageUrl {
                slot,
                url: url.to_owned(),
            });
        }
        Ok(EvidenceUrl(url.to_owned()))
    }
}

/// Raw evidence URLs as submitted by a worker, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceSubmission {
    /// Signage photograph URL.
    pub signage: Option<String>,
    /// Menu photograph URL.
    pub menu: Option<String>,
    /// Banner photograph URL.
    pub banner: Option<String>,
}

impl EvidenceSubmission {
    /// Creates a submission with all three URLs supplied.
    #[must_use]
    pub fn new(
        signage: impl Into<String>,
        menu: impl Into<String>,
        banner: impl Into<String>,
    ) -> Self {
        Self {
            signage: Some(signage.into()),
            menu: Some(menu.into()),
            banner: Some(banner.into()),
        }
    }

    fn slot(&self, slot: EvidenceSlot) -> Option<&str> {
        match slot {
            EvidenceSlot::Signage => self.signage.as_deref(),
            EvidenceSlot::Menu => self.menu.as_deref(),
            EvidenceSlot::Banner => self.banner.as_deref(),
        }
    }
}

/// The three validated evidence images of a completed review.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EvidenceImages {
    signage: EvidenceUrl,
    menu: EvidenceUrl,
    banner: EvidenceUrl,
}

impl EvidenceImages {
    /// Validates every slot of `submission` against `host`.
    ///
    /// Slots are checked in [`EvidenceSlot::ALL`] order and the first
    /// failure is reported.
    ///
    /// # Errors
    ///
    /// Returns the error of [`TrustedImageHost::accept`] for the first slot
    /// that is missing or untrusted.
    pub fn validate(
        submission: &EvidenceSubmission,
        host: &TrustedImageHost,
    ) -> Result<Self, ReviewDomainError> {
        let [signage, menu, banner] = EvidenceSlot::ALL;
        Ok(Self {
            signage: host.accept(signage, submission.slot(signage))?,
            menu: host.accept(menu, submission.slot(menu))?,
            banner: host.accept(banner, submission.slot(banner))?,
        })
    }

    /// Reassembles images read back from storage.
    #[must_use]
    pub const fn from_persisted(
        signage: EvidenceUrl,
        menu: EvidenceUrl,
        banner: EvidenceUrl,
    ) -> Self {
        Self {
            signage,
            menu,
            banner,
        }
    }

    /// Returns the signage image.
    #[must_use]
    pub const fn signage(&self) -> &EvidenceUrl {
        &self.signage
    }

    /// Returns the menu image.
    #[must_use]
    pub const fn menu(&self) -> &EvidenceUrl {
        &self.menu
    }

    /// Returns the banner image.
    #[must_use]
    pub const fn banner(&self) -> &EvidenceUrl {
        &self.banner
    }

    /// Returns the image stored in `slot`.
    #[must_use]
    pub const fn get(&self, slot: EvidenceSlot) -> &EvidenceUrl {
        match slot {
            EvidenceSlot::Signage => &self.signage,
            EvidenceSlot::Menu => &self.menu,
            EvidenceSlot::Banner => &self.banner,
        }
    }

    /// Iterates the images in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &EvidenceUrl> {
        EvidenceSlot::ALL.into_iter().map(|slot| self.get(slot))
    }
}
