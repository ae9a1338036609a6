use super::*;

// =============================================================
// parse_line
// =============================================================

#[test]
fn plain_text_is_a_turn() {
    assert_eq!(parse_line("  I want to retire at 60 \n"), Line::Say("I want to retire at 60"));
}

#[test]
fn blank_line_is_ignored() {
    assert_eq!(parse_line("   \n"), Line::Blank);
}

#[test]
fn agree_and_quit_commands() {
    assert_eq!(parse_line("/agree"), Line::Agree);
    assert_eq!(parse_line("/quit"), Line::Quit);
    assert_eq!(parse_line("/exit"), Line::Quit);
    assert_eq!(parse_line("/help"), Line::Help);
}

#[test]
fn explore_takes_optional_preferences() {
    assert_eq!(parse_line("/explore"), Line::Explore(None));
    assert_eq!(parse_line("/explore   "), Line::Explore(None));
    assert_eq!(parse_line("/explore lower premium"), Line::Explore(Some("lower premium")));
}

#[test]
fn unknown_command_is_reported() {
    assert_eq!(parse_line("/delete everything"), Line::Unknown("delete"));
}

// =============================================================
// render
// =============================================================

#[test]
fn render_labels_each_role() {
    assert_eq!(render(&Message::user("hi")), "you> hi");
    assert_eq!(render(&Message::assistant("hello")), "advisor> hello");
    assert_eq!(render(&Message::error("boom")), "error> boom");
}
