//! Localized canned text.
//!
//! Every fixed string the assistant can say without asking the generation
//! endpoint lives here, in French and English.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

const MONTHS_FR: [&str; 12] = [
    "janvier", "février", "mars", "avril", "mai", "juin", "juillet", "août", "septembre",
    "octobre", "novembre", "décembre",
];

const MONTHS_EN: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

/// Language the assistant speaks by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Fr,
    En,
}

/// Canned-text catalog for one organization and language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phrases {
    language: Language,
    organization: String,
    bot_name: String,
}

impl Phrases {
    pub fn new(
        language: Language,
        organization: impl Into<String>,
        bot_name: impl Into<String>,
    ) -> Self {
        Self {
            language,
            organization: organization.into(),
            bot_name: bot_name.into(),
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn organization(&self) -> &str {
        &self.organization
    }

    pub fn bot_name(&self) -> &str {
        &self.bot_name
    }

    /// Long-form date, e.g. `17 juin 2024` or `June 17, 2024`.
    pub fn long_date(&self, date: NaiveDate) -> String {
        let month = date.month0() as usize;
        match self.language {
            Language::Fr => format!("{} {} {}", date.day(), MONTHS_FR[month], date.year()),
            Language::En => format!("{} {}, {}", MONTHS_EN[month], date.day(), date.year()),
        }
    }

    /// The two messages shown when the widget is first opened.
    pub fn greetings(&self) -> [String; 2] {
        match self.language {
            Language::Fr => [
                format!(
                    "Bienvenue chez {}! Je suis {}, votre assistant virtuel.",
                    self.organization, self.bot_name
                ),
                "Comment puis-je vous aider aujourd'hui?".to_string(),
            ],
            Language::En => [
                format!(
                    "Welcome to {}! I'm {}, your virtual assistant.",
                    self.organization, self.bot_name
                ),
                "How can I help you today?".to_string(),
            ],
        }
    }

    /// Fixed reply for any failed generation.
    pub fn apology(&self) -> String {
        match self.language {
            Language::Fr => {
                "Il y a eu un problème de connexion au chatbot. Veuillez réessayer plus tard."
            }
            Language::En => {
                "There was a problem connecting to the chatbot. Please try again later."
            }
        }
        .to_string()
    }

    pub fn services_intro(&self, services: &[String]) -> String {
        let list = services
            .iter()
            .map(|s| format!("• {}", s))
            .collect::<Vec<_>>()
            .join("\n\n");
        match self.language {
            Language::Fr => format!(
                "Voici nos services:\n\n{}\n\nQuel service souhaitez-vous connaître?",
                list
            ),
            Language::En => format!(
                "Here are our services:\n\n{}\n\nWhich service would you like to know about?",
                list
            ),
        }
    }

    pub fn no_services(&self) -> String {
        match self.language {
            Language::Fr => "Aucun service n'est disponible pour le moment.",
            Language::En => "No services are available at the moment.",
        }
        .to_string()
    }

    pub fn service_detail(&self, kind: &str, description: &str, price: &str) -> String {
        match self.language {
            Language::Fr => format!("{}:\n\n{}\n\nCoût: {}", kind, description, price),
            Language::En => format!("{}:\n\n{}\n\nCost: {}", kind, description, price),
        }
    }

    pub fn service_not_found(&self) -> String {
        match self.language {
            Language::Fr => "Je ne trouve pas ce service pour le moment.",
            Language::En => "I can't find that service right now.",
        }
        .to_string()
    }

    pub fn contact_prompt(&self) -> String {
        match self.language {
            Language::Fr => format!(
                "Il y a plusieurs façons de contacter {}. Laquelle choisissez-vous ?",
                self.organization
            ),
            Language::En => format!(
                "There are several ways to reach {}. Which one would you like?",
                self.organization
            ),
        }
    }

    pub fn contact_detail(&self, info: &str) -> String {
        match self.language {
            Language::Fr => format!("Voici les informations de contact pour : {}.", info),
            Language::En => format!("Here is the contact information: {}.", info),
        }
    }

    pub fn contact_method_unavailable(&self) -> String {
        match self.language {
            Language::Fr => "Méthode de contact non disponible.",
            Language::En => "Contact method not available.",
        }
        .to_string()
    }

    pub fn contacts_unavailable(&self) -> String {
        match self.language {
            Language::Fr => "Les informations de contact ne sont pas disponibles.",
            Language::En => "Contact information is not available.",
        }
        .to_string()
    }

    pub fn social_prompt(&self) -> String {
        match self.language {
            Language::Fr => "Sur quelle plateforme souhaitez-vous nous contacter ?",
            Language::En => "Which platform would you like to reach us on?",
        }
        .to_string()
    }

    pub fn social_link(&self, platform: &str, link: &str) -> String {
        match self.language {
            Language::Fr => format!("Voici le lien pour notre {}: {}.", platform, link),
            Language::En => format!("Here is the link to our {}: {}.", platform, link),
        }
    }

    pub fn social_missing(&self, platform: &str) -> String {
        match self.language {
            Language::Fr => format!(
                "Je ne trouve pas le lien pour notre {} pour le moment.",
                platform
            ),
            Language::En => format!("I can't find the link to our {} right now.", platform),
        }
    }

    pub fn events_prompt(&self) -> String {
        match self.language {
            Language::Fr => "Quel évènement souhaitez-vous connaître ?",
            Language::En => "Which event would you like to know about?",
        }
        .to_string()
    }

    pub fn next_event(&self, title: &str, date: &str) -> String {
        match self.language {
            Language::Fr => format!("Le prochain évènement est {}, le {}.", title, date),
            Language::En => format!("The next event is {}, on {}.", title, date),
        }
    }

    pub fn no_next_event(&self) -> String {
        match self.language {
            Language::Fr => "Pour le moment, nous mettons la touche finale à la programmation de nos prochains évènements. Je vous invite à consulter régulièrement notre site web ou nos réseaux sociaux.",
            Language::En => "We are putting the finishing touches on our upcoming events. Please check our website or social networks regularly for updates.",
        }
        .to_string()
    }

    pub fn last_event(&self, title: &str, date: &str) -> String {
        match self.language {
            Language::Fr => format!("Le dernier évènement était {}, le {}.", title, date),
            Language::En => format!("The last event was {}, on {}.", title, date),
        }
    }

    pub fn no_last_event(&self) -> String {
        match self.language {
            Language::Fr => "Il semble que nous n'ayons pas encore organisé d'évènements. Restez à l'écoute pour les annonces futures!",
            Language::En => "It looks like we haven't held any events yet. Stay tuned for future announcements!",
        }
        .to_string()
    }

    pub fn team_intro(&self, members: &[String]) -> String {
        let list = members
            .iter()
            .map(|m| format!("• {}", m))
            .collect::<Vec<_>>()
            .join("\n");
        match self.language {
            Language::Fr => format!("Voici notre équipe:\n\n{}", list),
            Language::En => format!("Meet our team:\n\n{}", list),
        }
    }

    pub fn no_team(&self) -> String {
        match self.language {
            Language::Fr => format!("Je n'ai pas d'information sur l'équipe de {} pour le moment.", self.organization),
            Language::En => format!("I don't have information about the {} team yet.", self.organization),
        }
    }

    pub fn other_event(&self) -> String {
        match self.language {
            Language::Fr => "Veuillez poser votre question à propos d'un autre évènement.",
            Language::En => "Please ask your question about another event.",
        }
        .to_string()
    }

    pub fn ask_question(&self) -> String {
        match self.language {
            Language::Fr => "Nous sommes heureux de vous aider! Veuillez poser votre question dans le champ de saisie ci-dessous.",
            Language::En => "We're happy to help! Please type your question in the field below.",
        }
        .to_string()
    }

    pub fn follow_up(&self) -> String {
        match self.language {
            Language::Fr => "Puis-je vous aider avec autre chose?",
            Language::En => "Can I help you with anything else?",
        }
        .to_string()
    }

    pub fn back_to_menu(&self) -> String {
        match self.language {
            Language::Fr => "Ok, retournons à la liste principale des options.",
            Language::En => "Ok, let's go back to the main list of options.",
        }
        .to_string()
    }

    pub fn no_thanks(&self) -> String {
        match self.language {
            Language::Fr => "D'accord, si vous avez d'autres questions, n'hésitez pas à demander!",
            Language::En => "Alright, if you have any other questions, feel free to ask!",
        }
        .to_string()
    }

    pub fn yes_please(&self) -> String {
        match self.language {
            Language::Fr => "Que souhaitez-vous savoir d'autre?",
            Language::En => "What else would you like to know?",
        }
        .to_string()
    }
}
