//! Quick-reply tokens and their dispatch table.
//!
//! A quick reply is a button whose click sends a fixed token instead of free
//! text. Each token maps to canned text (or an accessor call over the
//! description) plus the panel offered next.

use super::panel::Panel;
use crate::domain::description::Description;
use crate::domain::foundation::Timestamp;
use crate::domain::locale::{Language, Phrases};
use chrono_tz::Tz;
use std::fmt;

const SERVICE_PREFIX: &str = "data-service-";
const CONTACT_METHOD_PREFIX: &str = "data-contact-method-";
const SOCIAL_PLATFORM_PREFIX: &str = "data-social-platform-";

/// Contact method that opens the social network list instead of answering.
pub const SOCIALS_METHOD: &str = "socials";

/// A recognized quick-reply token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QuickReply {
    Services,
    Contact,
    Events,
    Team,
    AskQuestion,
    NextEvent,
    LastEvent,
    OtherEvent,
    Return,
    NoThanks,
    YesPlease,
    Service(String),
    ContactMethod(String),
    SocialPlatform(String),
}

impl QuickReply {
    /// Parses a button id; unrecognized tokens yield `None`.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        let fixed = match token {
            "btn-services" => Some(Self::Services),
            "btn-contact" => Some(Self::Contact),
            "btn-events" => Some(Self::Events),
            "btn-team" => Some(Self::Team),
            "btn-ask-question" => Some(Self::AskQuestion),
            "btn-prochain-event" => Some(Self::NextEvent),
            "btn-dernier-event" => Some(Self::LastEvent),
            "btn-other-event" => Some(Self::OtherEvent),
            "btn-return" => Some(Self::Return),
            "btn-no-thanks" => Some(Self::NoThanks),
            "btn-yes-please" => Some(Self::YesPlease),
            _ => None,
        };
        if fixed.is_some() {
            return fixed;
        }

        let suffix = |prefix: &str| {
            token
                .strip_prefix(prefix)
                .map(str::trim)
                .filter(|rest| !rest.is_empty())
                .map(str::to_string)
        };
        if let Some(emoji) = suffix(SERVICE_PREFIX) {
            return Some(Self::Service(emoji));
        }
        if let Some(method) = suffix(CONTACT_METHOD_PREFIX) {
            return Some(Self::ContactMethod(method));
        }
        suffix(SOCIAL_PLATFORM_PREFIX).map(|p| Self::SocialPlatform(p.to_lowercase()))
    }

    /// The button id this reply is sent as.
    pub fn token(&self) -> String {
        match self {
            Self::Services => "btn-services".to_string(),
            Self::Contact => "btn-contact".to_string(),
            Self::Events => "btn-events".to_string(),
            Self::Team => "btn-team".to_string(),
            Self::AskQuestion => "btn-ask-question".to_string(),
            Self::NextEvent => "btn-prochain-event".to_string(),
            Self::LastEvent => "btn-dernier-event".to_string(),
            Self::OtherEvent => "btn-other-event".to_string(),
            Self::Return => "btn-return".to_string(),
            Self::NoThanks => "btn-no-thanks".to_string(),
            Self::YesPlease => "btn-yes-please".to_string(),
            Self::Service(emoji) => format!("{}{}", SERVICE_PREFIX, emoji),
            Self::ContactMethod(method) => format!("{}{}", CONTACT_METHOD_PREFIX, method),
            Self::SocialPlatform(platform) => format!("{}{}", SOCIAL_PLATFORM_PREFIX, platform),
        }
    }

    /// The panel offered after this reply is handled.
    pub fn target_panel(&self) -> Panel {
        match self {
            Self::Services => Panel::Services,
            Self::Contact => Panel::Contact,
            Self::Events => Panel::Events,
            Self::ContactMethod(method) if method == SOCIALS_METHOD => Panel::ContactSocial,
            Self::Return | Self::NoThanks | Self::YesPlease => Panel::MainMenu,
            Self::Team
            | Self::AskQuestion
            | Self::NextEvent
            | Self::LastEvent
            | Self::OtherEvent
            | Self::Service(_)
            | Self::ContactMethod(_)
            | Self::SocialPlatform(_) => Panel::FollowUp,
        }
    }

    /// Whether `panel` shows this button.
    ///
    /// A token sent while another button group is showing is stale or
    /// forged and must not act.
    pub fn offered_on(&self, panel: Panel) -> bool {
        match panel {
            Panel::MainMenu => matches!(
                self,
                Self::Services | Self::Contact | Self::Events | Self::Team | Self::AskQuestion
            ),
            Panel::Services => matches!(self, Self::Service(_) | Self::Return),
            Panel::Contact => matches!(self, Self::ContactMethod(_) | Self::Return),
            Panel::ContactSocial => matches!(self, Self::SocialPlatform(_) | Self::Return),
            Panel::Events => matches!(
                self,
                Self::NextEvent | Self::LastEvent | Self::OtherEvent | Self::AskQuestion | Self::Return
            ),
            Panel::FollowUp => matches!(
                self,
                Self::AskQuestion | Self::YesPlease | Self::NoThanks | Self::Return
            ),
        }
    }

    /// Button caption, recorded as the visitor's turn in the transcript.
    pub fn label(&self, language: Language) -> String {
        let (fr, en) = match self {
            Self::Services => ("Nos services", "Our services"),
            Self::Contact => ("Nous contacter", "Contact us"),
            Self::Events => ("Évènements", "Events"),
            Self::Team => ("Notre équipe", "Our team"),
            Self::AskQuestion => ("Poser la question", "Ask a question"),
            Self::NextEvent => ("Prochain évènement", "Next event"),
            Self::LastEvent => ("Dernier évènement", "Last event"),
            Self::OtherEvent => ("Autre évènement", "Another event"),
            Self::Return => ("Retour", "Back"),
            Self::NoThanks => ("Non merci", "No thanks"),
            Self::YesPlease => ("Oui, s'il vous plaît", "Yes please"),
            Self::Service(emoji) => return emoji.clone(),
            Self::ContactMethod(method) => return contact_method_label(method, language),
            Self::SocialPlatform(platform) => return platform_label(platform),
        };
        match language {
            Language::Fr => fr.to_string(),
            Language::En => en.to_string(),
        }
    }
}

impl fmt::Display for QuickReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token())
    }
}

fn contact_method_label(method: &str, language: Language) -> String {
    let label = match (method, language) {
        ("address", Language::Fr) => "Adresse",
        ("address", Language::En) => "Address",
        ("phone_number", Language::Fr) => "Téléphone",
        ("phone_number", Language::En) => "Phone",
        ("email", Language::Fr) => "Courriel",
        ("email", Language::En) => "Email",
        (SOCIALS_METHOD, Language::Fr) => "Réseaux sociaux",
        (SOCIALS_METHOD, Language::En) => "Social networks",
        (other, _) => other,
    };
    label.to_string()
}

fn platform_label(platform: &str) -> String {
    match platform {
        "facebook" => "Facebook".to_string(),
        "instagram" => "Instagram".to_string(),
        "linkedin" => "LinkedIn".to_string(),
        "youtube" => "YouTube".to_string(),
        other => other.to_string(),
    }
}

/// What a dispatched quick reply produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    /// Bot messages to append, in order.
    pub replies: Vec<String>,
    pub next_panel: Panel,
}

/// Inputs a dispatch may read.
#[derive(Debug, Clone, Copy)]
pub struct DispatchContext<'a> {
    /// `None` while the description is not loaded; lookups then use sentinels.
    pub description: Option<&'a Description>,
    pub phrases: &'a Phrases,
    pub now: Timestamp,
    pub timezone: Tz,
}

/// Resolves a quick reply into bot messages and the next panel.
///
/// Leaf answers are followed by the follow-up question. Transition validity
/// is checked by the caller.
pub fn dispatch(reply: &QuickReply, ctx: &DispatchContext<'_>) -> Dispatch {
    let phrases = ctx.phrases;
    let desc = ctx.description;

    let replies = match reply {
        QuickReply::Services => {
            let services = desc.map(Description::list_services).unwrap_or_default();
            if services.is_empty() {
                vec![phrases.no_services()]
            } else {
                vec![phrases.services_intro(&services)]
            }
        }
        QuickReply::Contact => vec![phrases.contact_prompt()],
        QuickReply::Events => vec![phrases.events_prompt()],
        QuickReply::Team => {
            let team = desc.map(Description::list_team).unwrap_or_default();
            let detail = if team.is_empty() {
                phrases.no_team()
            } else {
                phrases.team_intro(&team)
            };
            vec![detail, phrases.follow_up()]
        }
        QuickReply::AskQuestion => vec![phrases.ask_question()],
        QuickReply::OtherEvent => vec![phrases.other_event()],
        QuickReply::Return => vec![phrases.back_to_menu()],
        QuickReply::NoThanks => vec![phrases.no_thanks()],
        QuickReply::YesPlease => vec![phrases.yes_please()],
        QuickReply::NextEvent => {
            let detail = desc
                .and_then(|d| d.next_upcoming_event(ctx.now, ctx.timezone))
                .map(|e| phrases.next_event(&e.title, &e.display_date()))
                .unwrap_or_else(|| phrases.no_next_event());
            vec![detail, phrases.follow_up()]
        }
        QuickReply::LastEvent => {
            let detail = desc
                .and_then(Description::last_past_event)
                .map(|e| phrases.last_event(&e.title, &e.display_date()))
                .unwrap_or_else(|| phrases.no_last_event());
            vec![detail, phrases.follow_up()]
        }
        QuickReply::Service(emoji) => {
            let detail = desc
                .and_then(|d| d.service_by_emoji(emoji))
                .map(|s| phrases.service_detail(&s.kind, &s.description, &s.price))
                .unwrap_or_else(|| phrases.service_not_found());
            vec![detail, phrases.follow_up()]
        }
        QuickReply::ContactMethod(method) if method == SOCIALS_METHOD => {
            vec![phrases.social_prompt()]
        }
        QuickReply::ContactMethod(method) => {
            let detail = match desc {
                Some(d) if d.has_contact_method(method) => {
                    phrases.contact_detail(&d.contact_info(method, phrases))
                }
                Some(d) => d.contact_info(method, phrases),
                None => phrases.contacts_unavailable(),
            };
            vec![detail, phrases.follow_up()]
        }
        QuickReply::SocialPlatform(platform) => {
            let label = platform_label(platform);
            let detail = desc
                .and_then(|d| d.social_link(platform))
                .map(|link| phrases.social_link(&label, link))
                .unwrap_or_else(|| phrases.social_missing(&label));
            vec![detail, phrases.follow_up()]
        }
    };

    Dispatch {
        replies,
        next_panel: reply.target_panel(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    const DOC: &str = r#"{
        "services": {
            "coaching": {"type": "Coaching", "description": "Séances individuelles", "price": "Gratuit", "emoji": "💼"}
        },
        "about": {"team": [{"name": "Camille", "role": "Directrice"}, {"name": "Sam"}]},
        "contacts": {
            "address": "123 rue Principale",
            "socials": {"LinkedIn": "https://linkedin.com/company/startop"}
        },
        "events": {
            "2024": {"e7": {"title": "Gala", "date": "2024-06-13", "longDate": "13 juin 2024"}},
            "2025": {"e9": {"title": "Forum", "date": "2025-09-20", "longDate": "20 septembre 2025"}}
        },
        "lastEvent": "e7"
    }"#;

    fn phrases() -> Phrases {
        Phrases::new(Language::Fr, "Startop", "StarBot")
    }

    fn run(reply: QuickReply, description: Option<&Description>) -> Dispatch {
        let phrases = phrases();
        let ctx = DispatchContext {
            description,
            phrases: &phrases,
            now: Timestamp::from_datetime(Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap()),
            timezone: chrono_tz::America::New_York,
        };
        dispatch(&reply, &ctx)
    }

    mod parsing {
        use super::*;

        #[test]
        fn parses_fixed_tokens() {
            assert_eq!(QuickReply::parse("btn-services"), Some(QuickReply::Services));
            assert_eq!(QuickReply::parse("btn-dernier-event"), Some(QuickReply::LastEvent));
            assert_eq!(QuickReply::parse(" btn-return "), Some(QuickReply::Return));
        }

        #[test]
        fn parses_parameterized_tokens() {
            assert_eq!(
                QuickReply::parse("data-service-💼"),
                Some(QuickReply::Service("💼".to_string()))
            );
            assert_eq!(
                QuickReply::parse("data-contact-method-phone_number"),
                Some(QuickReply::ContactMethod("phone_number".to_string()))
            );
            assert_eq!(
                QuickReply::parse("data-social-platform-LinkedIn"),
                Some(QuickReply::SocialPlatform("linkedin".to_string()))
            );
        }

        #[test]
        fn rejects_unknown_and_empty_tokens() {
            assert_eq!(QuickReply::parse("btn-launch-rocket"), None);
            assert_eq!(QuickReply::parse("data-service-"), None);
            assert_eq!(QuickReply::parse(""), None);
        }

        #[test]
        fn token_is_parse_inverse_for_fixed_replies() {
            for reply in [
                QuickReply::Events,
                QuickReply::Team,
                QuickReply::NextEvent,
                QuickReply::YesPlease,
            ] {
                assert_eq!(QuickReply::parse(&reply.token()), Some(reply));
            }
        }
    }

    mod panels {
        use super::*;

        #[test]
        fn socials_method_opens_social_list() {
            assert_eq!(
                QuickReply::ContactMethod("socials".into()).target_panel(),
                Panel::ContactSocial
            );
            assert_eq!(
                QuickReply::ContactMethod("address".into()).target_panel(),
                Panel::FollowUp
            );
        }

        #[test]
        fn navigation_returns_to_main_menu() {
            for reply in [QuickReply::Return, QuickReply::NoThanks, QuickReply::YesPlease] {
                assert_eq!(reply.target_panel(), Panel::MainMenu);
            }
        }

        #[test]
        fn each_button_is_offered_only_on_its_panel() {
            use Panel::*;
            let table: Vec<(QuickReply, Vec<Panel>)> = vec![
                (QuickReply::Services, vec![MainMenu]),
                (QuickReply::Contact, vec![MainMenu]),
                (QuickReply::Events, vec![MainMenu]),
                (QuickReply::Team, vec![MainMenu]),
                (QuickReply::AskQuestion, vec![MainMenu, Events, FollowUp]),
                (QuickReply::NextEvent, vec![Events]),
                (QuickReply::LastEvent, vec![Events]),
                (QuickReply::OtherEvent, vec![Events]),
                (QuickReply::Return, vec![Services, Contact, ContactSocial, Events, FollowUp]),
                (QuickReply::NoThanks, vec![FollowUp]),
                (QuickReply::YesPlease, vec![FollowUp]),
                (QuickReply::Service("💼".into()), vec![Services]),
                (QuickReply::ContactMethod("address".into()), vec![Contact]),
                (QuickReply::ContactMethod("socials".into()), vec![Contact]),
                (QuickReply::SocialPlatform("linkedin".into()), vec![ContactSocial]),
            ];
            let all = [MainMenu, Services, Contact, ContactSocial, Events, FollowUp];

            for (reply, offered) in &table {
                for panel in all {
                    assert_eq!(
                        reply.offered_on(panel),
                        offered.contains(&panel),
                        "{} on {:?}",
                        reply,
                        panel
                    );
                }
            }
        }

        #[test]
        fn offered_buttons_lead_to_reachable_panels() {
            use crate::domain::foundation::StateMachine;
            let replies = [
                QuickReply::Services,
                QuickReply::Team,
                QuickReply::AskQuestion,
                QuickReply::OtherEvent,
                QuickReply::Return,
                QuickReply::NoThanks,
                QuickReply::Service("💼".into()),
                QuickReply::ContactMethod("socials".into()),
                QuickReply::SocialPlatform("facebook".into()),
            ];
            for panel in [
                Panel::MainMenu,
                Panel::Services,
                Panel::Contact,
                Panel::ContactSocial,
                Panel::Events,
                Panel::FollowUp,
            ] {
                for reply in replies.iter().filter(|r| r.offered_on(panel)) {
                    assert!(panel.can_transition_to(&reply.target_panel()), "{} on {:?}", reply, panel);
                }
            }
        }
    }

    mod replies {
        use super::*;

        #[test]
        fn services_lists_each_service() {
            let desc = Description::from_json(DOC).unwrap();
            let out = run(QuickReply::Services, Some(&desc));
            assert_eq!(out.replies.len(), 1);
            assert!(out.replies[0].contains("• 💼 Coaching"));
            assert_eq!(out.next_panel, Panel::Services);
        }

        #[test]
        fn services_without_description_uses_sentinel() {
            let out = run(QuickReply::Services, None);
            assert_eq!(out.replies, vec![phrases().no_services()]);
        }

        #[test]
        fn service_detail_is_followed_by_follow_up() {
            let desc = Description::from_json(DOC).unwrap();
            let out = run(QuickReply::Service("💼".into()), Some(&desc));
            assert_eq!(
                out.replies,
                vec![
                    "Coaching:\n\nSéances individuelles\n\nCoût: Gratuit".to_string(),
                    "Puis-je vous aider avec autre chose?".to_string(),
                ]
            );
        }

        #[test]
        fn unknown_service_gets_explicit_reply() {
            let desc = Description::from_json(DOC).unwrap();
            let out = run(QuickReply::Service("🚀".into()), Some(&desc));
            assert_eq!(out.replies[0], phrases().service_not_found());
        }

        #[test]
        fn last_event_uses_template() {
            let desc = Description::from_json(DOC).unwrap();
            let out = run(QuickReply::LastEvent, Some(&desc));
            assert_eq!(out.replies[0], "Le dernier évènement était Gala, le 13 juin 2024.");
            assert_eq!(out.next_panel, Panel::FollowUp);
        }

        #[test]
        fn next_event_uses_template() {
            let desc = Description::from_json(DOC).unwrap();
            let out = run(QuickReply::NextEvent, Some(&desc));
            assert_eq!(out.replies[0], "Le prochain évènement est Forum, le 20 septembre 2025.");
        }

        #[test]
        fn contact_method_wraps_info() {
            let desc = Description::from_json(DOC).unwrap();
            let out = run(QuickReply::ContactMethod("address".into()), Some(&desc));
            assert_eq!(
                out.replies[0],
                "Voici les informations de contact pour : address: 123 rue Principale."
            );
        }

        #[test]
        fn missing_contact_method_reports_unavailable() {
            let desc = Description::from_json(DOC).unwrap();
            let out = run(QuickReply::ContactMethod("phone_number".into()), Some(&desc));
            assert_eq!(out.replies[0], "Méthode de contact non disponible.");
        }

        #[test]
        fn social_link_found_case_insensitively() {
            let desc = Description::from_json(DOC).unwrap();
            let out = run(QuickReply::parse("data-social-platform-linkedin").unwrap(), Some(&desc));
            assert_eq!(
                out.replies[0],
                "Voici le lien pour notre LinkedIn: https://linkedin.com/company/startop."
            );
        }

        #[test]
        fn team_lists_members_then_follow_up() {
            let desc = Description::from_json(DOC).unwrap();
            let out = run(QuickReply::Team, Some(&desc));
            assert_eq!(
                out.replies,
                vec![
                    "Voici notre équipe:\n\n• Camille (Directrice)\n• Sam".to_string(),
                    "Puis-je vous aider avec autre chose?".to_string(),
                ]
            );
            assert_eq!(out.next_panel, Panel::FollowUp);
        }

        #[test]
        fn team_without_members_says_so() {
            let out = run(QuickReply::Team, None);
            assert_eq!(out.replies[0], phrases().no_team());
        }

        #[test]
        fn missing_social_link_gets_explicit_reply() {
            let desc = Description::from_json(DOC).unwrap();
            let out = run(QuickReply::SocialPlatform("youtube".into()), Some(&desc));
            assert_eq!(
                out.replies[0],
                "Je ne trouve pas le lien pour notre YouTube pour le moment."
            );
        }
    }

    #[test]
    fn labels_follow_language() {
        assert_eq!(QuickReply::Services.label(Language::Fr), "Nos services");
        assert_eq!(QuickReply::Services.label(Language::En), "Our services");
        assert_eq!(
            QuickReply::ContactMethod("socials".into()).label(Language::Fr),
            "Réseaux sociaux"
        );
    }
}
