// Verification orchestrator — claim-or-detect for each submitted social link.
//
// Flow per request:
//   1. Validate tokenMint and every platform key (no store access yet).
//   2. For each platform with a claimable link, attempt insert_if_absent.
//   3. A link owned by a different token is a duplicate; everything else is clean.
//
// Platforms are independent, so their claims run concurrently. The first
// storage error aborts the request; claims that already committed stay.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use super::error::{ValidationError, VerifyError};
use super::normalize::normalize;
use crate::db::models::{ClaimOutcome, Platform, SocialLinkRecord};
use crate::db::RegistryStore;

/// Aggregate verdict for one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    Clean,
    CopyCat,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Clean => "CLEAN",
            VerificationStatus::CopyCat => "COPY_CAT",
        }
    }
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Response body for a verification: the verdict plus, for each duplicate
/// platform, the token that claimed the link first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub status: VerificationStatus,
    pub duplicate_links: BTreeMap<Platform, String>,
}

impl VerificationResult {
    fn from_duplicates(duplicate_links: BTreeMap<Platform, String>) -> Self {
        let status = if duplicate_links.is_empty() {
            VerificationStatus::Clean
        } else {
            VerificationStatus::CopyCat
        };
        Self {
            status,
            duplicate_links,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.status == VerificationStatus::Clean
    }
}

/// Check a token's social links against the registry, claiming any that
/// are not yet recorded.
///
/// `socials` maps platform keys to raw links; `None` or an empty string
/// means the platform was not submitted.
pub async fn verify_socials(
    store: &dyn RegistryStore,
    token_mint: &str,
    socials: &BTreeMap<String, Option<String>>,
) -> Result<VerificationResult, VerifyError> {
    let claims = validate(token_mint, socials)?;
    let now = Utc::now();

    let outcomes = try_join_all(
        claims
            .into_iter()
            .map(|(platform, link)| claim_link(store, token_mint, platform, link, now)),
    )
    .await?;

    let duplicates: BTreeMap<Platform, String> = outcomes.into_iter().flatten().collect();
    let result = VerificationResult::from_duplicates(duplicates);
    info!(
        token_mint,
        status = %result.status,
        duplicates = result.duplicate_links.len(),
        "Verified socials"
    );
    Ok(result)
}

/// Validate the whole request and return the (platform, normalized link)
/// pairs that need a store claim.
fn validate(
    token_mint: &str,
    socials: &BTreeMap<String, Option<String>>,
) -> Result<Vec<(Platform, String)>, ValidationError> {
    if token_mint.trim().is_empty() {
        return Err(ValidationError::MissingTokenMint);
    }

    let mut claims = Vec::with_capacity(socials.len());
    for (key, raw) in socials {
        let platform: Platform = key
            .parse()
            .map_err(|_| ValidationError::UnknownPlatform(key.clone()))?;
        if let Some(link) = raw.as_deref().and_then(normalize) {
            claims.push((platform, link));
        }
    }
    Ok(claims)
}

/// Claim one link. Returns `Some((platform, owner))` when another token
/// already owns it.
async fn claim_link(
    store: &dyn RegistryStore,
    token_mint: &str,
    platform: Platform,
    normalized_link: String,
    now: DateTime<Utc>,
) -> Result<Option<(Platform, String)>, VerifyError> {
    let record = SocialLinkRecord {
        normalized_link,
        platform_type: platform,
        first_seen_at: now,
        first_seen_in_token: token_mint.to_string(),
    };

    let outcome = store.insert_if_absent(&record).await.map_err(|e| {
        error!(
            error = %format!("{e:#}"),
            platform = %platform,
            link = %record.normalized_link,
            "Registry insert failed"
        );
        VerifyError::Storage(e)
    })?;

    match outcome {
        ClaimOutcome::Inserted => {
            info!(token_mint, platform = %platform, link = %record.normalized_link, "Claimed new link");
            Ok(None)
        }
        ClaimOutcome::AlreadyExists(existing) if existing.first_seen_in_token == token_mint => {
            debug!(token_mint, platform = %platform, link = %record.normalized_link, "Link already owned by this token");
            Ok(None)
        }
        ClaimOutcome::AlreadyExists(existing) => {
            warn!(
                token_mint,
                platform = %platform,
                link = %record.normalized_link,
                owner = %existing.first_seen_in_token,
                "Duplicate link"
            );
            Ok(Some((platform, existing.first_seen_in_token)))
        }
    }
}
