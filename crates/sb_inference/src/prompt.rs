use sb_core::ChatMessage;

pub const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

pub const DEFAULT_SUMMARY_INSTRUCTION: &str = "Fasse den folgenden Text zusammen:";

/// Single-turn prompt: fixed system message followed by the user input.
pub fn format_chat_prompt(user_input: &str) -> Vec<ChatMessage> {
    vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(user_input)]
}

pub fn summary_prompt(instruction: &str, text: &str) -> Vec<ChatMessage> {
    format_chat_prompt(&format!("{}\n\n{}", instruction, text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sb_core::Role;

    #[test]
    fn test_summary_prompt_embeds_text() {
        let messages = summary_prompt(DEFAULT_SUMMARY_INSTRUCTION, "Der Hund läuft.");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(
            messages[1].content,
            "Fasse den folgenden Text zusammen:\n\nDer Hund läuft."
        );
    }
}
