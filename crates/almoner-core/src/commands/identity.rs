use crate::commands::common::load_members;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{IdentityCheckData, IdentityDuplicatesData, IdentitySuggestData};
use crate::identity::{
    Member, duplicate_groups, find_by_email, is_email_taken, normalize_email, suggest_matches,
};
use crate::{CoreError, CoreResult};

#[derive(Debug, Default)]
pub struct IdentityDuplicatesOptions {
    pub members: String,
    pub stdin_override: Option<String>,
}

#[derive(Debug, Default)]
pub struct IdentityCheckOptions {
    pub members: String,
    pub email: String,
    pub exclude_id: Option<String>,
    pub stdin_override: Option<String>,
}

#[derive(Debug, Default)]
pub struct IdentitySuggestOptions {
    pub members: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub stdin_override: Option<String>,
}

pub fn duplicates(members: &str) -> CoreResult<SuccessEnvelope> {
    duplicates_with_options(IdentityDuplicatesOptions {
        members: members.to_string(),
        stdin_override: None,
    })
}

#[doc(hidden)]
pub fn duplicates_with_options(options: IdentityDuplicatesOptions) -> CoreResult<SuccessEnvelope> {
    let directory = load_members(&options.members, options.stdin_override)?;
    let groups = duplicate_groups(&directory.value);
    success(
        "identity duplicates",
        IdentityDuplicatesData {
            members: directory.source,
            member_count: directory.value.len(),
            groups,
        },
    )
}

pub fn check(members: &str, email: &str, exclude_id: Option<&str>) -> CoreResult<SuccessEnvelope> {
    check_with_options(IdentityCheckOptions {
        members: members.to_string(),
        email: email.to_string(),
        exclude_id: exclude_id.map(std::string::ToString::to_string),
        stdin_override: None,
    })
}

#[doc(hidden)]
pub fn check_with_options(options: IdentityCheckOptions) -> CoreResult<SuccessEnvelope> {
    let directory = load_members(&options.members, options.stdin_override)?;
    let taken = is_email_taken(&directory.value, &options.email, options.exclude_id.as_deref());
    let candidates = directory
        .value
        .iter()
        .filter(|member| options.exclude_id.as_deref() != Some(member.id.as_str()))
        .cloned()
        .collect::<Vec<Member>>();
    let matched_member_id = find_by_email(&candidates, &options.email).map(|member| member.id.clone());

    success(
        "identity check",
        IdentityCheckData {
            members: directory.source,
            normalized_email: normalize_email(&options.email),
            email: options.email,
            exclude_id: options.exclude_id,
            taken,
            matched_member_id,
        },
    )
}

pub fn suggest(members: &str, email: Option<&str>, name: Option<&str>) -> CoreResult<SuccessEnvelope> {
    suggest_with_options(IdentitySuggestOptions {
        members: members.to_string(),
        email: email.map(std::string::ToString::to_string),
        name: name.map(std::string::ToString::to_string),
        stdin_override: None,
    })
}

#[doc(hidden)]
pub fn suggest_with_options(options: IdentitySuggestOptions) -> CoreResult<SuccessEnvelope> {
    if options.email.is_none() && options.name.is_none() {
        return Err(CoreError::invalid_argument_for_command(
            "Pass `--email`, `--name`, or both.",
            Some("identity suggest"),
        ));
    }

    let directory = load_members(&options.members, options.stdin_override)?;
    let suggestions = suggest_matches(
        &directory.value,
        options.email.as_deref(),
        options.name.as_deref(),
    );

    success(
        "identity suggest",
        IdentitySuggestData {
            members: directory.source,
            email: options.email,
            name: options.name,
            suggestions,
        },
    )
}
