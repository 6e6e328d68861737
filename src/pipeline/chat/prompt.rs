use crate::models::{Language, Turn};

pub const SYSTEM_PROMPT: &str = "You are a helpful medical assistant who explains lab tests and results clearly. \
Do not give diagnoses. Remind users to consult a doctor.";

/// Outgoing user content: the text plus the language hint, if there is one.
pub fn compose_user_content(user_text: &str, language: Option<Language>) -> String {
    let hint = language.map(|l| l.hint()).unwrap_or("");
    if hint.is_empty() {
        user_text.to_string()
    } else {
        format!("{user_text}\n\n{hint}")
    }
}

/// Full outbound message list: system instruction, prior history, new user turn.
pub fn build_messages(history: &[Turn], user_text: &str, language: Option<Language>) -> Vec<Turn> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(Turn::system(SYSTEM_PROMPT));
    messages.extend(history.iter().cloned());
    messages.push(Turn::user(compose_user_content(user_text, language)));
    messages
}
