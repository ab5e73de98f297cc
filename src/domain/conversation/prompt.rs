//! Generation request assembly.
//!
//! Builds the ordered turns sent to the text-generation endpoint: grounding
//! description and instructions, an acknowledgement, style exemplars, the
//! prior transcript and finally the new question.

use super::message::{Message, Role};
use crate::domain::description::{escape_for_prompt, Description};
use crate::domain::foundation::Timestamp;
use crate::domain::locale::{Language, Phrases};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Speaker of a generation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Model,
}

/// One turn of a generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTurn {
    pub role: TurnRole,
    pub text: String,
}

impl PromptTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Model,
            text: text.into(),
        }
    }
}

/// A fixed question/answer pair steering tone and format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exemplar {
    pub question: String,
    pub answer: String,
}

/// Assembles generation turns for one organization.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    phrases: Phrases,
    timezone: Tz,
    exemplars_enabled: bool,
}

impl PromptBuilder {
    pub fn new(phrases: Phrases, timezone: Tz) -> Self {
        Self {
            phrases,
            timezone,
            exemplars_enabled: true,
        }
    }

    pub fn with_exemplars(mut self, enabled: bool) -> Self {
        self.exemplars_enabled = enabled;
        self
    }

    /// Builds turns for `input`, given the transcript before it.
    ///
    /// System and error messages are skipped; consecutive turns of the same
    /// role are merged so roles alternate, starting and ending with the user.
    pub fn build(
        &self,
        description: &Description,
        history: &[Message],
        input: &str,
        now: Timestamp,
    ) -> Vec<PromptTurn> {
        let today = self.today(now);
        let mut turns = Vec::with_capacity(history.len() + 6);

        push_merged(&mut turns, PromptTurn::user(self.preamble(description, &today)));
        push_merged(&mut turns, PromptTurn::model(self.acknowledgement(&today)));

        if self.exemplars_enabled {
            for exemplar in self.exemplars(description, &today) {
                push_merged(&mut turns, PromptTurn::user(exemplar.question));
                push_merged(&mut turns, PromptTurn::model(exemplar.answer));
            }
        }

        for message in history.iter().filter(|m| m.role().is_history()) {
            let turn = match message.role() {
                Role::User => PromptTurn::user(escape_for_prompt(message.text())),
                _ => PromptTurn::model(message.text()),
            };
            push_merged(&mut turns, turn);
        }

        push_merged(&mut turns, PromptTurn::user(escape_for_prompt(input)));
        turns
    }

    /// Style exemplars; the last-event pair is only offered when one is known.
    pub fn exemplars(&self, description: &Description, today: &str) -> Vec<Exemplar> {
        let mut exemplars = Vec::new();
        if let Some(event) = description.last_past_event() {
            let question = match self.phrases.language() {
                Language::Fr => "quel est le dernier évènement",
                Language::En => "what was the last event",
            };
            exemplars.push(Exemplar {
                question: question.to_string(),
                answer: self
                    .phrases
                    .last_event(&event.title, &event.display_date()),
            });
        }
        let (question, answer) = match self.phrases.language() {
            Language::Fr => (
                "Quel date sommes-nous ?",
                format!("Aujourd'hui, nous sommes le {}.", today),
            ),
            Language::En => ("What is the date today?", format!("Today is {}.", today)),
        };
        exemplars.push(Exemplar {
            question: question.to_string(),
            answer,
        });
        exemplars
    }

    fn today(&self, now: Timestamp) -> String {
        self.phrases
            .long_date(now.in_zone(self.timezone).date_naive())
    }

    fn acknowledgement(&self, today: &str) -> String {
        let org = self.phrases.organization();
        match self.phrases.language() {
            Language::Fr => format!(
                "Je suis votre aide {org} et je répond à toutes vos questions en lien avec {org}. Aujourd'hui est {today}. Mes réponses sont courtes et simples."
            ),
            Language::En => format!(
                "I am your {org} helper and I answer all your questions about {org}. Today is {today}. My answers are short and simple."
            ),
        }
    }

    fn preamble(&self, description: &Description, today: &str) -> String {
        let org = self.phrases.organization();
        let bot = self.phrases.bot_name();
        let grounding = escape_for_prompt(description.grounding_text());

        let mut text = match self.phrases.language() {
            Language::Fr => format!(
                "Voici la description de {org}: {grounding} \
                 Réponds de manière amicale et invitante. Ajoute des questions de suivi pour maintenir le flux de la conversation. \
                 Date actuelle: {today} (fuseau horaire {tz}). \
                 Tu es {bot}, l'assistant virtuel de {org}. \
                 Ta mission est d'aider les utilisateurs à en savoir plus sur {org}, ses services, ses évènements, son équipe et ses méthodes de contact. \
                 Fournis des réponses concises mais incluant des détails spécifiques (prix des services, dates des évènements, liens, rôles des membres de l'équipe). \
                 Les évènements sont organisés par année dans le champ \"events\"; le dernier évènement passé est identifié par le champ \"lastEvent\". \
                 Si l'utilisateur demande des évènements passés, précise qu'ils ont déjà eu lieu. \
                 Si aucun évènement futur n'est prévu, suggère de consulter régulièrement le site web ou les réseaux sociaux. \
                 Si tu ne comprends pas la question, demande à l'utilisateur de la reformuler. \
                 Langage: si l'utilisateur écrit en français ou mélange le français et l'anglais, réponds en français; s'il écrit en anglais, réponds en anglais.",
                tz = self.timezone.name(),
            ),
            Language::En => format!(
                "Here is the description of {org}: {grounding} \
                 Answer in a friendly and welcoming way. Add follow-up questions to keep the conversation going. \
                 Current date: {today} (time zone {tz}). \
                 You are {bot}, the virtual assistant of {org}. \
                 Your mission is to help users learn more about {org}, its services, events, team and contact methods. \
                 Give concise answers that include specific details (service prices, event dates, links, team member roles). \
                 Events are grouped by year in the \"events\" field; the most recent past event is identified by the \"lastEvent\" field. \
                 If the user asks about past events, mention that they already took place. \
                 If no future event is planned, suggest checking the website or social networks regularly. \
                 If you do not understand the question, ask the user to rephrase it. \
                 Language: if the user writes in English, answer in English; if they write in French, answer in French.",
                tz = self.timezone.name(),
            ),
        };

        let (values_label, team_label) = match self.phrases.language() {
            Language::Fr => ("Valeurs", "Équipe"),
            Language::En => ("Values", "Team"),
        };
        if let Some(about) = description.about() {
            if let Some(mission) = &about.mission {
                text.push_str(&format!(" Mission: {}.", escape_for_prompt(mission)));
            }
            if !about.values.is_empty() {
                let values: Vec<String> = about.values.iter().map(|v| escape_for_prompt(v)).collect();
                text.push_str(&format!(" {}: {}.", values_label, values.join(", ")));
            }
            if !about.team.is_empty() {
                let team: Vec<String> = about
                    .team
                    .iter()
                    .map(|m| format!("{} ({})", escape_for_prompt(&m.name), escape_for_prompt(&m.role)))
                    .collect();
                text.push_str(&format!(" {}: {}.", team_label, team.join(", ")));
            }
        }
        text
    }
}

fn push_merged(turns: &mut Vec<PromptTurn>, turn: PromptTurn) {
    match turns.last_mut() {
        Some(last) if last.role == turn.role => {
            last.text.push('\n');
            last.text.push_str(&turn.text);
        }
        _ => turns.push(turn),
    }
}
