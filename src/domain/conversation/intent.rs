//! Free-text shortcuts into the quick-reply table.
//!
//! Questions that clearly ask for the next or the last event are answered
//! from the description directly instead of calling the generation endpoint.

use super::quick_reply::QuickReply;
use once_cell::sync::Lazy;
use regex::Regex;

static EVENT_NOUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:[ée]v[éèe]nements?|events?)\b")
        .expect("valid event pattern")
});

static PAST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:derni[eè]re?|pass[ée]e?|r[ée]cente?|pr[ée]c[ée]dente?|last|past|recent|previous)\b")
        .expect("valid past pattern")
});

static UPCOMING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:prochaine?|futur|futurs|future|[àa] venir|suivante?|next|upcoming|coming)\b")
        .expect("valid upcoming pattern")
});

/// Maps an event question to `LastEvent` or `NextEvent`.
///
/// Needs an event noun plus exactly one direction; ambiguous or unrelated
/// questions return `None` and go to the generation endpoint.
pub fn detect_event_shortcut(text: &str) -> Option<QuickReply> {
    if !EVENT_NOUN.is_match(text) {
        return None;
    }
    match (PAST.is_match(text), UPCOMING.is_match(text)) {
        (true, false) => Some(QuickReply::LastEvent),
        (false, true) => Some(QuickReply::NextEvent),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_event_question_maps_to_last_event() {
        assert_eq!(
            detect_event_shortcut("quel est le dernier évènement"),
            Some(QuickReply::LastEvent)
        );
        assert_eq!(
            detect_event_shortcut("What was your last event?"),
            Some(QuickReply::LastEvent)
        );
    }

    #[test]
    fn upcoming_question_maps_to_next_event() {
        assert_eq!(
            detect_event_shortcut("Quel est le prochain événement ?"),
            Some(QuickReply::NextEvent)
        );
        assert_eq!(
            detect_event_shortcut("Y a-t-il des évènements à venir?"),
            Some(QuickReply::NextEvent)
        );
    }

    #[test]
    fn accent_free_spelling_matches() {
        assert_eq!(
            detect_event_shortcut("prochain evenement"),
            Some(QuickReply::NextEvent)
        );
    }

    #[test]
    fn direction_without_event_noun_is_ignored() {
        assert_eq!(detect_event_shortcut("Quel est votre dernier service?"), None);
    }

    #[test]
    fn other_bookable_things_are_not_events() {
        assert_eq!(detect_event_shortcut("Can I book the next coaching session?"), None);
        assert_eq!(detect_event_shortcut("Quel est le prochain programme?"), None);
        assert_eq!(detect_event_shortcut("What's next on the agenda for my project?"), None);
        assert_eq!(detect_event_shortcut("Will the next cohort eventually open?"), None);
    }

    #[test]
    fn plural_event_nouns_match() {
        assert_eq!(
            detect_event_shortcut("Any upcoming events?"),
            Some(QuickReply::NextEvent)
        );
    }

    #[test]
    fn event_noun_without_direction_is_ignored() {
        assert_eq!(detect_event_shortcut("Parlez-moi de vos événements."), None);
    }

    #[test]
    fn both_directions_are_ambiguous() {
        assert_eq!(
            detect_event_shortcut("le dernier et le prochain évènement"),
            None
        );
    }
}
