use crate::cli::{Commands, IdentityCommand};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OutputMode {
    Text,
    Json,
}

pub fn mode_for_command(command: &Commands) -> OutputMode {
    let json = match command {
        Commands::Summary { json, .. }
        | Commands::Budget { json, .. }
        | Commands::Donors { json, .. }
        | Commands::Ingest { json, .. } => *json,
        Commands::Identity { command } => match command {
            IdentityCommand::Duplicates { json, .. }
            | IdentityCommand::Check { json, .. }
            | IdentityCommand::Suggest { json, .. } => *json,
        },
    };

    if json {
        OutputMode::Json
    } else {
        OutputMode::Text
    }
}

#[cfg(test)]
mod tests {
    use super::{OutputMode, mode_for_command};
    use crate::cli::parse_from;

    #[test]
    fn mode_uses_json_for_top_level_commands_with_json_flag() {
        let cases: [Vec<&str>; 4] = [
            vec!["almoner", "summary", "l.json", "--json"],
            vec![
                "almoner",
                "budget",
                "l.json",
                "--budgets",
                "b.json",
                "--month",
                "2024-03",
                "--json",
            ],
            vec!["almoner", "donors", "l.json", "--json"],
            vec!["almoner", "ingest", "rows.csv", "--json"],
        ];
        for case in cases {
            let parsed = parse_from(case.clone());
            assert!(parsed.is_ok(), "failed to parse: {case:?}");
            if let Ok(cli) = parsed {
                assert_eq!(mode_for_command(&cli.command), OutputMode::Json);
            }
        }
    }

    #[test]
    fn mode_uses_json_for_identity_subcommands_with_json_flag() {
        let parsed = parse_from(["almoner", "identity", "check", "m.json", "a@b.org", "--json"]);
        assert!(parsed.is_ok());
        if let Ok(cli) = parsed {
            assert_eq!(mode_for_command(&cli.command), OutputMode::Json);
        }
    }

    #[test]
    fn mode_uses_text_for_commands_without_json_flag() {
        let summary = parse_from(["almoner", "summary", "l.json"]);
        assert!(summary.is_ok());
        if let Ok(cli) = summary {
            assert_eq!(mode_for_command(&cli.command), OutputMode::Text);
        }

        let duplicates = parse_from(["almoner", "identity", "duplicates", "m.json"]);
        assert!(duplicates.is_ok());
        if let Ok(cli) = duplicates {
            assert_eq!(mode_for_command(&cli.command), OutputMode::Text);
        }
    }
}
