//! Integration tests for complete chat flows.
//!
//! These tests drive the conversation engine the way the widget does:
//! 1. A session is opened with the greeting
//! 2. Visitors navigate the quick-reply panels
//! 3. Free text is answered by the generator, grounded in the description
//! 4. A refreshed description is picked up by later answers

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use starbot::adapters::ai::MockTextGenerator;
use starbot::adapters::description::FileDescriptionSource;
use starbot::adapters::session::InMemorySessionStore;
use starbot::application::{
    ChatError, ConversationEngine, DescriptionRefresher, DescriptionStore, EngineConfig,
};
use starbot::domain::conversation::{Panel, Role};
use starbot::domain::foundation::SessionId;
use starbot::domain::locale::{Language, Phrases};
use tempfile::NamedTempFile;
use tokio::sync::watch;

// =============================================================================
// Test Infrastructure
// =============================================================================

const DESCRIPTION: &str = r#"{
    "about": {"mission": "Accompagner les entrepreneurs"},
    "services": {
        "coaching": {"type": "Coaching", "description": "Séances individuelles", "price": "Gratuit", "emoji": "💼"},
        "atelier": {"type": "Atelier", "description": "Ateliers de groupe", "price": 25, "emoji": "🌱"}
    },
    "contacts": {
        "address": "123 rue Principale",
        "socials": {"LinkedIn": "https://linkedin.com/company/startop"}
    },
    "events": {
        "e1": {"title": "Gala", "date": "2020-06-13", "longDate": "13 juin 2020"},
        "e2": {"title": "Forum", "date": "2999-09-20", "longDate": "20 septembre 2999"}
    },
    "lastEvent": "e1"
}"#;

fn description_file(body: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(body.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

struct Harness {
    engine: ConversationEngine,
    generator: MockTextGenerator,
    store: Arc<DescriptionStore>,
    _file: NamedTempFile,
}

async fn harness(generator: MockTextGenerator, config: EngineConfig) -> Harness {
    let file = description_file(DESCRIPTION);
    let store = Arc::new(DescriptionStore::new(Arc::new(FileDescriptionSource::new(
        file.path().to_string_lossy().to_string(),
    ))));
    store.load().await.unwrap();

    let engine = ConversationEngine::new(
        Arc::new(generator.clone()),
        store.clone(),
        Arc::new(InMemorySessionStore::new()),
        Phrases::new(Language::Fr, "Startop", "StarBot"),
        chrono_tz::America::New_York,
        config,
    );

    Harness {
        engine,
        generator,
        store,
        _file: file,
    }
}

async fn open(h: &Harness) -> SessionId {
    h.engine.create_session(true).await.unwrap().session_id
}

// =============================================================================
// Quick-reply navigation
// =============================================================================

#[tokio::test]
async fn greeting_then_service_detail_then_back_to_menu() {
    let h = harness(MockTextGenerator::new(), EngineConfig::default()).await;
    let id = open(&h).await;

    let opened = h.engine.snapshot(&id).await.unwrap();
    assert_eq!(opened.transcript.len(), 2);
    assert!(opened.transcript[0].text().contains("Startop"));

    let listing = h.engine.handle_quick_reply(&id, "btn-services").await.unwrap();
    assert_eq!(listing.len(), 1);
    assert!(listing[0].contains("💼 Coaching"));
    assert!(listing[0].contains("🌱 Atelier"));
    assert_eq!(h.engine.snapshot(&id).await.unwrap().panel, Panel::Services);

    let detail = h.engine.handle_quick_reply(&id, "data-service-🌱").await.unwrap();
    assert_eq!(detail.len(), 2);
    assert!(detail[0].contains("Ateliers de groupe"));
    assert!(detail[0].contains("25"));
    assert_eq!(detail[1], h.engine.phrases().follow_up());
    assert_eq!(h.engine.snapshot(&id).await.unwrap().panel, Panel::FollowUp);

    h.engine.handle_quick_reply(&id, "btn-return").await.unwrap();
    let back = h.engine.snapshot(&id).await.unwrap();
    assert_eq!(back.panel, Panel::MainMenu);

    // Generated text was never requested
    assert_eq!(h.generator.call_count(), 0);
}

#[tokio::test]
async fn events_panel_answers_from_the_calendar() {
    let h = harness(MockTextGenerator::new(), EngineConfig::default()).await;
    let id = open(&h).await;

    h.engine.handle_quick_reply(&id, "btn-events").await.unwrap();
    let next = h
        .engine
        .handle_quick_reply(&id, "btn-prochain-event")
        .await
        .unwrap();
    assert!(next[0].contains("Forum"));
    assert!(next[0].contains("20 septembre 2999"));

    h.engine.handle_quick_reply(&id, "btn-return").await.unwrap();
    h.engine.handle_quick_reply(&id, "btn-events").await.unwrap();
    let last = h
        .engine
        .handle_quick_reply(&id, "btn-dernier-event")
        .await
        .unwrap();
    assert!(last[0].contains("Gala"));
}

#[tokio::test]
async fn social_links_are_reached_through_the_contact_panel() {
    let h = harness(MockTextGenerator::new(), EngineConfig::default()).await;
    let id = open(&h).await;

    h.engine.handle_quick_reply(&id, "btn-contact").await.unwrap();
    h.engine
        .handle_quick_reply(&id, "data-contact-method-socials")
        .await
        .unwrap();
    assert_eq!(h.engine.snapshot(&id).await.unwrap().panel, Panel::ContactSocial);

    let link = h
        .engine
        .handle_quick_reply(&id, "data-social-platform-linkedin")
        .await
        .unwrap();
    assert!(link[0].contains("https://linkedin.com/company/startop"));
}

#[tokio::test]
async fn buttons_from_another_panel_are_ignored() {
    let h = harness(MockTextGenerator::new(), EngineConfig::default()).await;
    let id = open(&h).await;

    let replies = h.engine.handle_quick_reply(&id, "btn-return").await.unwrap();
    assert!(replies.is_empty());
    assert_eq!(h.engine.snapshot(&id).await.unwrap().transcript.len(), 2);
}

// =============================================================================
// Free text
// =============================================================================

#[tokio::test]
async fn free_text_is_grounded_in_the_description() {
    let generator = MockTextGenerator::new().with_reply("Nous offrons du coaching gratuit.");
    let h = harness(generator, EngineConfig::default()).await;
    let id = open(&h).await;

    let answer = h
        .engine
        .handle_user_input(&id, "Quels services offrez-vous?")
        .await
        .unwrap();
    assert_eq!(answer, "Nous offrons du coaching gratuit.");

    let calls = h.generator.calls();
    assert_eq!(calls.len(), 1);
    let prompt: String = calls[0]
        .turns
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    assert!(prompt.contains("Accompagner les entrepreneurs"));
    assert!(prompt.contains("Quels services offrez-vous?"));

    let snapshot = h.engine.snapshot(&id).await.unwrap();
    assert_eq!(snapshot.panel, Panel::FollowUp);
    let roles: Vec<Role> = snapshot.transcript.iter().map(|m| m.role()).collect();
    assert_eq!(roles, vec![Role::Bot, Role::Bot, Role::User, Role::Bot]);
}

#[tokio::test]
async fn event_question_takes_the_shortcut_when_enabled() {
    let h = harness(
        MockTextGenerator::new(),
        EngineConfig::default().with_event_shortcuts(true),
    )
    .await;
    let id = open(&h).await;

    let answer = h
        .engine
        .handle_user_input(&id, "C'est quand le prochain événement?")
        .await
        .unwrap();
    assert!(answer.contains("Forum"));
    assert_eq!(h.generator.call_count(), 0);
}

#[tokio::test]
async fn overlong_input_is_rejected_without_side_effects() {
    let h = harness(MockTextGenerator::new(), EngineConfig::default()).await;
    let id = open(&h).await;

    let result = h.engine.handle_user_input(&id, &"a".repeat(251)).await;
    assert!(matches!(result, Err(ChatError::InputTooLong { .. })));
    assert_eq!(h.engine.snapshot(&id).await.unwrap().transcript.len(), 2);
}

// =============================================================================
// Description refresh
// =============================================================================

#[tokio::test]
async fn refreshed_description_is_used_by_later_answers() {
    let h = harness(MockTextGenerator::new(), EngineConfig::default()).await;
    let id = open(&h).await;

    let before = h.engine.handle_quick_reply(&id, "btn-services").await.unwrap();
    assert!(!before[0].contains("Mentorat"));
    h.engine.handle_quick_reply(&id, "btn-return").await.unwrap();

    // Rewrite the backing file, then let the refresher pick it up
    std::fs::write(
        h.store.location(),
        r#"{"services": {"m": {"type": "Mentorat", "emoji": "🧭"}}}"#,
    )
    .unwrap();

    let (tx, rx) = watch::channel(false);
    let task = DescriptionRefresher::new(h.store.clone())
        .with_interval(Duration::from_millis(20))
        .spawn(rx);
    tokio::time::sleep(Duration::from_millis(120)).await;
    tx.send(true).unwrap();
    task.await.unwrap();

    let after = h.engine.handle_quick_reply(&id, "btn-services").await.unwrap();
    assert!(after[0].contains("🧭 Mentorat"));
}
