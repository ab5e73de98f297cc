//! Validated description document and its lookup accessors.

use super::keyed::Keyed;
use super::DescriptionError;
use crate::domain::foundation::Timestamp;
use crate::domain::locale::Phrases;
use chrono::{NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// How a description body is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DescriptionFormat {
    #[default]
    Json,
    Text,
}

impl DescriptionFormat {
    /// Infers the format from a file name or URL path; `.txt` and `.md` are text.
    pub fn infer(location: &str) -> Self {
        let path = location.split(['?', '#']).next().unwrap_or(location);
        match Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("txt") | Some("md") => DescriptionFormat::Text,
            _ => DescriptionFormat::Json,
        }
    }
}

/// A service offered by the organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub price: String,
    pub emoji: String,
}

/// A dated (or undated) event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Event {
    pub title: String,
    #[serde(default, deserialize_with = "event_date")]
    pub date: Option<NaiveDateTime>,
    #[serde(default, rename = "longDate")]
    pub long_date: Option<String>,
}

impl Event {
    /// Human-readable date: `longDate` when present, else the ISO date.
    pub fn display_date(&self) -> String {
        match (&self.long_date, &self.date) {
            (Some(long), _) => long.clone(),
            (None, Some(date)) => date.format("%Y-%m-%d").to_string(),
            (None, None) => String::new(),
        }
    }
}

/// An event with its key and, for grouped calendars, its year.
#[derive(Debug, Clone, PartialEq)]
pub struct EventEntry {
    pub id: String,
    pub year: Option<String>,
    pub event: Event,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum EventNode {
    Single(Event),
    Group(Keyed<Event>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct About {
    #[serde(default)]
    pub mission: Option<String>,
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default)]
    pub team: Vec<TeamMember>,
}

/// Contact methods keyed by name, plus social network links.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Contacts {
    #[serde(default, deserialize_with = "lowercase_keys")]
    socials: BTreeMap<String, String>,
    #[serde(flatten)]
    methods: BTreeMap<String, Value>,
}

impl Contacts {
    fn method(&self, name: &str) -> Option<String> {
        match self.methods.get(name)? {
            Value::Null => None,
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DescriptionDocument {
    #[serde(default)]
    about: Option<About>,
    #[serde(default)]
    services: Keyed<Service>,
    #[serde(default)]
    contacts: Option<Contacts>,
    #[serde(default)]
    events: Keyed<EventNode>,
    #[serde(default)]
    last_event: Option<String>,
}

/// An immutable, validated description of the organization.
///
/// Built once per load and shared as an `Arc` snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Description {
    format: DescriptionFormat,
    grounding: String,
    raw: Option<Value>,
    about: Option<About>,
    services: Vec<(String, Service)>,
    contacts: Option<Contacts>,
    events: Vec<EventEntry>,
    last_event_id: Option<String>,
}

impl Description {
    /// Parses a body in the given format.
    pub fn parse(body: &str, format: DescriptionFormat) -> Result<Self, DescriptionError> {
        match format {
            DescriptionFormat::Json => Self::from_json(body),
            DescriptionFormat::Text => Self::from_text(body),
        }
    }

    /// Parses and validates a JSON document.
    pub fn from_json(body: &str) -> Result<Self, DescriptionError> {
        if body.trim().is_empty() {
            return Err(DescriptionError::Empty);
        }
        let raw: Value =
            serde_json::from_str(body).map_err(|e| DescriptionError::Parse(e.to_string()))?;
        if !raw.is_object() {
            return Err(DescriptionError::Schema(
                "top-level value must be an object".to_string(),
            ));
        }
        let doc: DescriptionDocument =
            serde_json::from_str(body).map_err(|e| DescriptionError::Schema(e.to_string()))?;

        let mut events = Vec::new();
        for (id, node) in doc.events.into_inner() {
            match node {
                EventNode::Single(event) => events.push(EventEntry {
                    id,
                    year: None,
                    event,
                }),
                EventNode::Group(group) => {
                    for (event_id, event) in group.into_inner() {
                        events.push(EventEntry {
                            id: event_id,
                            year: Some(id.clone()),
                            event,
                        });
                    }
                }
            }
        }

        let last_event_id = doc.last_event.filter(|id| !id.trim().is_empty());

        Ok(Self {
            format: DescriptionFormat::Json,
            grounding: raw.to_string(),
            raw: Some(raw),
            about: doc.about,
            services: doc.services.into_inner(),
            contacts: doc.contacts,
            events,
            last_event_id,
        })
    }

    /// Wraps a free-form text description. Structured accessors return sentinels.
    pub fn from_text(body: &str) -> Result<Self, DescriptionError> {
        let text = body.trim();
        if text.is_empty() {
            return Err(DescriptionError::Empty);
        }
        Ok(Self {
            format: DescriptionFormat::Text,
            grounding: text.to_string(),
            raw: None,
            about: None,
            services: Vec::new(),
            contacts: None,
            events: Vec::new(),
            last_event_id: None,
        })
    }

    pub fn format(&self) -> DescriptionFormat {
        self.format
    }

    /// The document as embedded into generation requests (unescaped).
    pub fn grounding_text(&self) -> &str {
        &self.grounding
    }

    pub fn raw(&self) -> Option<&Value> {
        self.raw.as_ref()
    }

    pub fn about(&self) -> Option<&About> {
        self.about.as_ref()
    }

    pub fn events(&self) -> &[EventEntry] {
        &self.events
    }

    /// One top-level category of the raw document.
    pub fn category(&self, name: &str) -> Option<&Value> {
        self.raw.as_ref()?.get(name)
    }

    /// Services as `"<emoji> <type>"`, in document order.
    pub fn list_services(&self) -> Vec<String> {
        self.services
            .iter()
            .map(|(_, s)| format!("{} {}", s.emoji, s.kind))
            .collect()
    }

    /// Team members as `"<name> (<role>)"`, or just the name without a role.
    pub fn list_team(&self) -> Vec<String> {
        self.about()
            .map(|about| {
                about
                    .team
                    .iter()
                    .map(|m| match m.role.trim() {
                        "" => m.name.clone(),
                        role => format!("{} ({})", m.name, role),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn service_by_emoji(&self, emoji: &str) -> Option<&Service> {
        let emoji = emoji.trim();
        self.services
            .iter()
            .map(|(_, s)| s)
            .find(|s| s.emoji.trim() == emoji)
    }

    /// Whether the named contact method exists with a non-empty value.
    pub fn has_contact_method(&self, method: &str) -> bool {
        self.contacts
            .as_ref()
            .and_then(|c| c.method(method))
            .is_some()
    }

    /// `"<method>: <value>"`, or a localized "not available" message.
    pub fn contact_info(&self, method: &str, phrases: &Phrases) -> String {
        match &self.contacts {
            None => phrases.contacts_unavailable(),
            Some(contacts) => match contacts.method(method) {
                Some(value) => format!("{}: {}", method, value),
                None => phrases.contact_method_unavailable(),
            },
        }
    }

    /// Case-insensitive social network lookup.
    pub fn social_link(&self, network: &str) -> Option<&str> {
        self.contacts
            .as_ref()?
            .socials
            .get(&network.trim().to_lowercase())
            .map(String::as_str)
            .filter(|link| !link.trim().is_empty())
    }

    /// First event strictly after `now`, comparing wall-clock time in `tz`.
    ///
    /// Events are sorted by date here (stable), so document order only breaks
    /// ties. Undated events never qualify.
    pub fn next_upcoming_event(&self, now: Timestamp, tz: Tz) -> Option<&Event> {
        let now_local = now.in_zone(tz).naive_local();
        let mut dated: Vec<(NaiveDateTime, &Event)> = self
            .events
            .iter()
            .filter_map(|entry| entry.event.date.map(|d| (d, &entry.event)))
            .collect();
        dated.sort_by_key(|(date, _)| *date);
        dated
            .into_iter()
            .find(|(date, _)| *date > now_local)
            .map(|(_, event)| event)
    }

    /// The event stored under `lastEvent`, searched across all year groups.
    pub fn last_past_event(&self) -> Option<&Event> {
        let id = self.last_event_id.as_deref()?;
        self.events
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| &entry.event)
    }
}

/// Parses `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM[:SS]`.
pub fn parse_event_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .ok()
}

fn event_date<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDateTime>, D::Error> {
    let raw: Option<String> = Option::deserialize(d)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_event_date(s)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid event date '{}'", s))),
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    match Value::deserialize(d)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected a string or number, got {}",
            other
        ))),
    }
}

fn lowercase_keys<'de, D: Deserializer<'de>>(d: D) -> Result<BTreeMap<String, String>, D::Error> {
    let map: Option<BTreeMap<String, String>> = Option::deserialize(d)?;
    Ok(map
        .unwrap_or_default()
        .into_iter()
        .map(|(k, v)| (k.to_lowercase(), v))
        .collect())
}
