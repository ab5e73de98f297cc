//! Quick-reply panel state machine.
//!
//! Exactly one button group is offered at a time.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// The button group currently offered to the visitor.
///
/// - `MainMenu`: services, contact, events, ask a question
/// - `Services`: one button per service emoji
/// - `Contact`: contact methods, including social networks
/// - `ContactSocial`: one button per social network
/// - `Events`: next, last or another event
/// - `FollowUp`: ask another question or go back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Panel {
    #[default]
    MainMenu,
    Services,
    Contact,
    ContactSocial,
    Events,
    FollowUp,
}

impl Panel {
    /// Returns true if a "return" button is offered.
    pub fn can_return(&self) -> bool {
        !matches!(self, Self::MainMenu)
    }
}

impl StateMachine for Panel {
    fn can_transition_to(&self, target: &Self) -> bool {
        use Panel::*;
        matches!(
            (self, target),
            // Main menu opens a category or jumps to free text
            (MainMenu, Services) |
            (MainMenu, Contact) |
            (MainMenu, Events) |
            (MainMenu, FollowUp) |
            // Leaf answers end in follow-up
            (Services, FollowUp) |
            (Contact, ContactSocial) |
            (Contact, FollowUp) |
            (ContactSocial, FollowUp) |
            (Events, FollowUp) |
            (FollowUp, FollowUp) |
            // Return from anywhere but the main menu
            (Services, MainMenu) |
            (Contact, MainMenu) |
            (ContactSocial, MainMenu) |
            (Events, MainMenu) |
            (FollowUp, MainMenu)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use Panel::*;
        match self {
            MainMenu => vec![Services, Contact, Events, FollowUp],
            Services => vec![FollowUp, MainMenu],
            Contact => vec![ContactSocial, FollowUp, MainMenu],
            ContactSocial => vec![FollowUp, MainMenu],
            Events => vec![FollowUp, MainMenu],
            FollowUp => vec![FollowUp, MainMenu],
        }
    }
}
