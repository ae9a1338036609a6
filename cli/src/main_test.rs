use super::*;
use leadchat::session::{MemoryStore, remember_session};

// =============================================================
// session_for
// =============================================================

#[test]
fn session_flag_wins_over_saved_token() {
    let store = MemoryStore::new();
    remember_session(&store, &SessionToken::parse("saved").unwrap());
    let token = session_for(Some("flag"), &store).unwrap();
    assert_eq!(token.as_str(), "flag");
}

#[test]
fn empty_session_flag_falls_back_to_saved_token() {
    let store = MemoryStore::new();
    remember_session(&store, &SessionToken::parse("saved").unwrap());
    let token = session_for(Some(""), &store).unwrap();
    assert_eq!(token.as_str(), "saved");
}

#[test]
fn no_flag_and_nothing_saved_means_no_session() {
    assert!(session_for(None, &MemoryStore::new()).is_none());
}

// =============================================================
// argument parsing
// =============================================================

#[test]
fn say_joins_words_into_one_message() {
    let cli = Cli::try_parse_from(["leadchat", "say", "I", "want", "to", "retire"]).unwrap();
    match cli.command {
        Command::Say { text } => assert_eq!(text.join(" "), "I want to retire"),
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn say_requires_text() {
    assert!(Cli::try_parse_from(["leadchat", "say"]).is_err());
}

#[test]
fn explore_preferences_are_optional() {
    let cli = Cli::try_parse_from(["leadchat", "explore"]).unwrap();
    assert!(matches!(cli.command, Command::Explore { preferences: None }));

    let cli = Cli::try_parse_from(["leadchat", "explore", "lower premium"]).unwrap();
    match cli.command {
        Command::Explore { preferences } => assert_eq!(preferences.as_deref(), Some("lower premium")),
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn lead_args_become_a_consenting_form() {
    let cli = Cli::try_parse_from([
        "leadchat",
        "lead",
        "--full-name",
        "Jane Doe",
        "--email",
        "jane@example.com",
        "--dob",
        "1980-04-02",
        "--zip-code",
        "94105",
        "--address",
        "1 Market St",
    ])
    .unwrap();
    let Command::Lead(args) = cli.command else {
        panic!("expected lead command");
    };
    let form = LeadForm::from(args);
    assert!(form.consent);
    assert_eq!(form.phone, "");
    let lead = form.validate().unwrap();
    assert_eq!(lead.full_name, "Jane Doe");
    assert_eq!(lead.gender, None);
}

#[test]
fn no_consent_flag_withholds_consent() {
    let cli = Cli::try_parse_from([
        "leadchat",
        "lead",
        "--full-name",
        "Jane Doe",
        "--email",
        "jane@example.com",
        "--dob",
        "1980-04-02",
        "--zip-code",
        "94105",
        "--address",
        "1 Market St",
        "--no-consent",
    ])
    .unwrap();
    let Command::Lead(args) = cli.command else {
        panic!("expected lead command");
    };
    assert_eq!(LeadForm::from(args).validate(), Err(IntakeError::ConsentRequired));
}
