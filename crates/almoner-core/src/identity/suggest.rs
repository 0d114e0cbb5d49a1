use std::collections::BTreeSet;

use serde::Serialize;

use super::{Member, normalize_email};

const EXACT_EMAIL_SCORE: f64 = 1.0;
const EXACT_NAME_SCORE: f64 = 0.9;
const NAME_SUBSTRING_SCORE: f64 = 0.7;
const TOKEN_OVERLAP_CEILING: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchReason {
    ExactEmail,
    ExactName,
    NameSubstring,
    NameTokenOverlap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSuggestion {
    pub member_id: String,
    pub member_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_email: Option<String>,
    pub reason: MatchReason,
    pub score: f64,
}

/// Candidate members for a donor or contact.
///
/// Exact normalized-email matches win outright. Only when there are none does
/// the name fallback run: case-insensitive equality, then substring in either
/// direction, then shared whitespace-separated tokens scored by overlap.
/// Suggestions are sorted by score, highest first, then by member id.
pub fn suggest_matches(
    members: &[Member],
    target_email: Option<&str>,
    target_name: Option<&str>,
) -> Vec<MatchSuggestion> {
    if let Some(email) = target_email.and_then(normalize_email) {
        let exact = members
            .iter()
            .filter(|member| member.normalized_email().as_deref() == Some(email.as_str()))
            .map(|member| suggestion(member, MatchReason::ExactEmail, EXACT_EMAIL_SCORE))
            .collect::<Vec<MatchSuggestion>>();
        if !exact.is_empty() {
            return exact;
        }
    }

    let Some(name) = target_name.map(normalize_name).filter(|name| !name.is_empty()) else {
        return Vec::new();
    };
    let target_tokens = tokens(&name);

    let mut suggestions = members
        .iter()
        .filter_map(|member| {
            let candidate = normalize_name(&member.name);
            if candidate.is_empty() {
                return None;
            }
            if candidate == name {
                return Some(suggestion(member, MatchReason::ExactName, EXACT_NAME_SCORE));
            }
            if candidate.contains(&name) || name.contains(&candidate) {
                return Some(suggestion(
                    member,
                    MatchReason::NameSubstring,
                    NAME_SUBSTRING_SCORE,
                ));
            }
            let candidate_tokens = tokens(&candidate);
            let shared = target_tokens.intersection(&candidate_tokens).count();
            if shared == 0 {
                return None;
            }
            let union = target_tokens.union(&candidate_tokens).count();
            let score = TOKEN_OVERLAP_CEILING * shared as f64 / union as f64;
            Some(suggestion(member, MatchReason::NameTokenOverlap, score))
        })
        .collect::<Vec<MatchSuggestion>>();

    suggestions.sort_by(|left, right| {
        right
            .score
            .total_cmp(&left.score)
            .then_with(|| left.member_id.cmp(&right.member_id))
    });
    suggestions
}

fn suggestion(member: &Member, reason: MatchReason, score: f64) -> MatchSuggestion {
    MatchSuggestion {
        member_id: member.id.clone(),
        member_name: member.name.clone(),
        member_email: member.email.clone(),
        reason,
        score,
    }
}

fn normalize_name(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
        .to_lowercase()
}

fn tokens(name: &str) -> BTreeSet<&str> {
    name.split(' ').filter(|token| !token.is_empty()).collect()
}
