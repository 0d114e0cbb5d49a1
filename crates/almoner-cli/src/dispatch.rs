use almoner_core::commands;
use almoner_core::{CoreResult, SuccessEnvelope};

use crate::cli::{Cli, Commands, IdentityCommand};

pub fn dispatch(cli: &Cli) -> CoreResult<SuccessEnvelope> {
    match &cli.command {
        Commands::Summary {
            ledger, from, to, ..
        } => {
            let from_value = from.as_ref().map(|value| value.as_str());
            let to_value = to.as_ref().map(|value| value.as_str());
            commands::summary::run(ledger, from_value, to_value)
        }
        Commands::Budget {
            ledger,
            budgets,
            month,
            ..
        } => commands::budget::run(ledger, budgets, month),
        Commands::Donors {
            ledger,
            members,
            today,
            ..
        } => commands::donors::run(
            ledger,
            members.as_deref(),
            today.as_ref().map(|value| value.as_str()),
        ),
        Commands::Ingest {
            path,
            mappings,
            append_to,
            ..
        } => commands::ingest::run(path, mappings.clone(), append_to.clone()),
        Commands::Identity { command } => match command {
            IdentityCommand::Duplicates { members, .. } => commands::identity::duplicates(members),
            IdentityCommand::Check {
                members,
                email,
                exclude_id,
                ..
            } => commands::identity::check(members, email, exclude_id.as_deref()),
            IdentityCommand::Suggest {
                members,
                email,
                name,
                ..
            } => commands::identity::suggest(members, email.as_deref(), name.as_deref()),
        },
    }
}
