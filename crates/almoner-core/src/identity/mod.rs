//! Email-based identity matching over a member directory.
//!
//! Every operation here is advisory. Results describe candidates for a person
//! to confirm; nothing in this module links records on its own, and nothing
//! here can fail.

mod suggest;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use suggest::{MatchReason, MatchSuggestion, suggest_matches};

/// One record of the external member directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Member {
    pub fn normalized_email(&self) -> Option<String> {
        self.email.as_deref().and_then(normalize_email)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    pub email: String,
    pub member_ids: Vec<String>,
}

/// Trims and lowercases an address. Blank input has no email at all.
pub fn normalize_email(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_lowercase())
}

/// First member whose normalized email equals the normalized `email`.
pub fn find_by_email<'a>(members: &'a [Member], email: &str) -> Option<&'a Member> {
    let target = normalize_email(email)?;
    members
        .iter()
        .find(|member| member.normalized_email().as_deref() == Some(target.as_str()))
}

/// Whether any member other than `exclude_id` already uses `email`.
pub fn is_email_taken(members: &[Member], email: &str, exclude_id: Option<&str>) -> bool {
    let Some(target) = normalize_email(email) else {
        return false;
    };
    members.iter().any(|member| {
        exclude_id != Some(member.id.as_str())
            && member.normalized_email().as_deref() == Some(target.as_str())
    })
}

/// Members sharing a normalized email, one group per shared address, ordered
/// by address. Member ids keep directory order inside a group.
pub fn duplicate_groups(members: &[Member]) -> Vec<DuplicateGroup> {
    let mut by_email: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for member in members {
        if let Some(email) = member.normalized_email() {
            by_email.entry(email).or_default().push(member.id.clone());
        }
    }

    by_email
        .into_iter()
        .filter(|(_, member_ids)| member_ids.len() > 1)
        .map(|(email, member_ids)| DuplicateGroup { email, member_ids })
        .collect()
}
