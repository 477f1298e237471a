use crate::store::models::UserProfile;

/// Builds the single system message injected ahead of the conversation:
/// prompt content first, then a "Role Instructions" block, then a
/// "User Profile" block listing only the non-empty profile fields.
/// Returns the empty string when no context is supplied, in which case
/// no system message is injected at all.
pub fn compose_system_message(
    prompt: Option<&str>,
    role: Option<&str>,
    profile: Option<&UserProfile>,
) -> String {
    let mut out = String::new();

    if let Some(prompt) = prompt {
        if !prompt.is_empty() {
            out.push_str(prompt);
            out.push_str("\n\n");
        }
    }

    if let Some(role) = role {
        if !role.is_empty() {
            out.push_str("Role Instructions:\n");
            out.push_str(role);
            out.push_str("\n\n");
        }
    }

    if let Some(profile) = profile {
        let block = profile_block(profile);
        if !block.is_empty() {
            out.push_str("User Profile:\n");
            out.push_str(&block);
        }
    }

    out
}

fn profile_block(profile: &UserProfile) -> String {
    let mut block = String::new();

    if !profile.name.is_empty() {
        block.push_str(&format!("Name: {}\n", profile.name));
    }
    if !profile.profession.is_empty() {
        block.push_str(&format!("Profession: {}\n", profile.profession));
    }
    if !profile.expertise.is_empty() {
        block.push_str(&format!("Expertise: {}\n", profile.expertise.join(", ")));
    }
    if !profile.interests.is_empty() {
        block.push_str(&format!("Interests: {}\n", profile.interests.join(", ")));
    }
    if !profile.description.is_empty() {
        block.push_str(&format!("Description: {}\n", profile.description));
    }

    block
}
