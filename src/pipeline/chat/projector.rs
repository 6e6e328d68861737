use super::store::alternates;
use crate::models::{DisplayMessage, Role, Turn};

/// Project history into display entries, pairing turns by position.
///
/// Walks non-system turns two at a time and labels each pair (user, assistant)
/// regardless of the turns' actual roles. A trailing unpaired turn is emitted
/// as a user entry. Two consecutive turns with the same role are therefore
/// mislabeled rather than rejected.
pub fn project(turns: &[Turn]) -> Vec<DisplayMessage> {
    let visible: Vec<&Turn> = turns.iter().filter(|t| t.role() != Role::System).collect();

    if visible.len() != turns.len() {
        tracing::debug!(
            skipped = turns.len() - visible.len(),
            "System turns excluded from display"
        );
    }

    let mut messages = Vec::with_capacity(visible.len());
    for pair in visible.chunks(2) {
        if let Some(user) = pair.first() {
            messages.push(DisplayMessage::user(user.content()));
        }
        if let Some(assistant) = pair.get(1) {
            messages.push(DisplayMessage::assistant(assistant.content()));
        }
    }

    if !alternates(visible.iter().copied()) {
        tracing::warn!(
            turns = visible.len(),
            "History does not alternate user/assistant; display labels follow position"
        );
    }

    messages
}
