use optimaize::context::compose_system_message;
use optimaize::store::models::UserProfile;

fn empty_profile() -> UserProfile {
    UserProfile {
        preferred_language: String::new(),
        communication_style: String::new(),
        ..UserProfile::default()
    }
}

#[test]
fn profile_only_name_yields_name_line_and_no_role_block() {
    let profile = UserProfile {
        name: "Ann".to_string(),
        ..empty_profile()
    };

    let message = compose_system_message(None, None, Some(&profile));

    assert!(message.contains("Name: Ann"));
    assert!(!message.contains("Role Instructions"));
    assert!(!message.contains("Profession:"));
    assert!(!message.contains("Expertise:"));
}

#[test]
fn no_inputs_yield_empty_string() {
    assert_eq!(compose_system_message(None, None, None), "");
    assert_eq!(compose_system_message(Some(""), Some(""), None), "");
}

#[test]
fn all_empty_profile_yields_empty_string() {
    // A present but blank profile must not inject a bare header
    let profile = empty_profile();
    assert_eq!(compose_system_message(None, None, Some(&profile)), "");
}

#[test]
fn sections_appear_in_order() {
    let profile = UserProfile {
        name: "Ann".to_string(),
        profession: "Engineer".to_string(),
        expertise: vec!["Rust".to_string(), "SQL".to_string()],
        interests: vec!["Music".to_string()],
        description: "Likes systems".to_string(),
        ..empty_profile()
    };

    let message = compose_system_message(
        Some("Review this code."),
        Some("You are a strict reviewer."),
        Some(&profile),
    );

    let prompt_pos = message.find("Review this code.").unwrap();
    let role_pos = message.find("Role Instructions:\n").unwrap();
    let profile_pos = message.find("User Profile:\n").unwrap();
    assert!(prompt_pos < role_pos && role_pos < profile_pos);

    assert!(message.contains("Expertise: Rust, SQL"));
    assert!(message.contains("Interests: Music"));
    assert!(message.contains("Description: Likes systems"));
}

#[test]
fn role_without_prompt_keeps_label() {
    let message = compose_system_message(None, Some("Act as a tutor."), None);
    assert!(message.starts_with("Role Instructions:\n"));
    assert!(message.contains("Act as a tutor."));
}
