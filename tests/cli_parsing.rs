use clap::Parser;
use voxdesk::cli::commands::agent::AgentCommands;
use voxdesk::cli::{Cli, Commands};
use voxdesk::domain::models::SortField;

fn agent_command(args: &[&str]) -> AgentCommands {
    let cli = Cli::try_parse_from(args.iter().copied()).unwrap();
    match cli.command {
        Commands::Agent(agent) => agent.command,
    }
}

#[test]
fn test_parse_agent_list_defaults() {
    match agent_command(&["voxdesk", "agent", "list"]) {
        AgentCommands::List {
            search,
            sort,
            asc,
            desc,
            page,
            page_size,
        } => {
            assert!(search.is_none());
            assert_eq!(sort, SortField::Created);
            assert!(!asc && !desc);
            assert_eq!(page, 1);
            assert_eq!(page_size, 10);
        }
        other => panic!("Wrong agent command: {other:?}"),
    }
}

#[test]
fn test_parse_agent_list_with_options() {
    match agent_command(&[
        "voxdesk", "agent", "list", "--search", "maria", "--sort", "name", "--desc", "--page", "2",
        "--page-size", "5",
    ]) {
        AgentCommands::List {
            search,
            sort,
            desc,
            page,
            page_size,
            ..
        } => {
            assert_eq!(search.as_deref(), Some("maria"));
            assert_eq!(sort, SortField::Name);
            assert!(desc);
            assert_eq!(page, 2);
            assert_eq!(page_size, 5);
        }
        other => panic!("Wrong agent command: {other:?}"),
    }
}

#[test]
fn test_asc_and_desc_conflict() {
    let result = Cli::try_parse_from(["voxdesk", "agent", "list", "--asc", "--desc"]);
    assert!(result.is_err());
}

#[test]
fn test_invalid_sort_field_rejected() {
    let result = Cli::try_parse_from(["voxdesk", "agent", "list", "--sort", "color"]);
    assert!(result.is_err());
}

#[test]
fn test_parse_agent_update_partial() {
    match agent_command(&["voxdesk", "agent", "update", "agt_1", "--name", "Helpdesk"]) {
        AgentCommands::Update {
            id,
            name,
            language,
            prompt,
            welcome,
        } => {
            assert_eq!(id, "agt_1");
            assert_eq!(name.as_deref(), Some("Helpdesk"));
            assert!(language.is_none() && prompt.is_none() && welcome.is_none());
        }
        other => panic!("Wrong agent command: {other:?}"),
    }
}

#[test]
fn test_global_json_flag_after_subcommand() {
    let cli = Cli::try_parse_from(["voxdesk", "agent", "delete", "agt_1", "--json"]).unwrap();
    assert!(cli.json);
    match cli.command {
        Commands::Agent(agent) => {
            assert!(matches!(agent.command, AgentCommands::Delete { id } if id == "agt_1"));
        }
    }
}

#[test]
fn test_delete_requires_id() {
    assert!(Cli::try_parse_from(["voxdesk", "agent", "delete"]).is_err());
}
