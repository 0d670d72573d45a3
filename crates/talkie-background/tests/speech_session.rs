//! Integration tests for speech sessions: segment loop, cancellation and
//! lifecycle event ordering.
//!
//! # What is tested
//!
//! - A long text is spoken segment by segment with matched part events
//! - Stopping mid-session emits no further parts and one `AfterSpeaking`
//! - Stopping while idle emits only `StopSpeaking`
//! - Stopping while a segment is being announced keeps the engine silent
//! - Multiple selections are spoken in their resolved languages, in order
//! - An engine failure ends the session and reports the error
//! - The chain keeps running after a failing link

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{EventLog, FakeEngine, FakeTabHost, wait_until};
use talkie_background::{Broadcaster, Chain, Speaker, SpeakerConfig, SpeakerError, SpeakerState};
use talkie_core::{
    EventKind, NoopLanguageDetector, SpeechEvent, TextSelection, Voice, VoiceDescriptor,
};

const LONG_TEXT: &str =
    "The first sentence is here. The second one follows it. And a third closes.";

fn speaker_with(engine: &Arc<FakeEngine>, max_segment_chars: usize) -> (Arc<Speaker>, EventLog) {
    let broadcaster = Arc::new(Broadcaster::new());
    let events = EventLog::attach(&broadcaster);
    (speaker_on(engine, broadcaster, max_segment_chars), events)
}

fn speaker_on(
    engine: &Arc<FakeEngine>,
    broadcaster: Arc<Broadcaster>,
    max_segment_chars: usize,
) -> Arc<Speaker> {
    let speaker = Speaker::new(
        engine.clone(),
        Arc::new(FakeTabHost::new()),
        Arc::new(NoopLanguageDetector),
        broadcaster,
        SpeakerConfig {
            default_language: "en".to_string(),
            max_segment_chars,
        },
    );
    Arc::new(speaker)
}

#[tokio::test]
async fn test_long_text_is_spoken_in_segments() {
    let engine = Arc::new(FakeEngine::new());
    let (speaker, events) = speaker_with(&engine, 30);

    speaker
        .speak_text_in_voice(LONG_TEXT, &VoiceDescriptor::for_language("en"))
        .await
        .unwrap();

    let spoken = engine.spoken_texts();
    assert_eq!(
        spoken,
        vec![
            "The first sentence is here.",
            "The second one follows it.",
            "And a third closes."
        ]
    );

    let kinds = events.kinds();
    assert_eq!(kinds.first(), Some(&EventKind::BeforeSpeaking));
    assert_eq!(kinds.last(), Some(&EventKind::AfterSpeaking));
    assert_eq!(events.count(EventKind::BeforeSpeakingPart), 3);
    assert_eq!(events.count(EventKind::AfterSpeakingPart), 3);
    events.assert_sessions_balanced();

    // Parts are bracketed pairwise.
    let parts: Vec<SpeechEvent> = events
        .events()
        .into_iter()
        .filter(|event| {
            matches!(
                event.kind(),
                EventKind::BeforeSpeakingPart | EventKind::AfterSpeakingPart
            )
        })
        .collect();
    for pair in parts.chunks(2) {
        assert_eq!(pair[0].kind(), EventKind::BeforeSpeakingPart);
        assert_eq!(pair[1].kind(), EventKind::AfterSpeakingPart);
        assert_eq!(pair[0].text_length(), pair[1].text_length());
    }
    assert_eq!(speaker.state(), SpeakerState::Idle);
}

#[tokio::test]
async fn test_stop_mid_session_ends_it_once() {
    let engine = Arc::new(FakeEngine::new().holding());
    let (speaker, events) = speaker_with(&engine, 30);

    let session = {
        let speaker = speaker.clone();
        tokio::spawn(async move {
            speaker
                .speak_text_in_voice(LONG_TEXT, &VoiceDescriptor::for_language("en"))
                .await
        })
    };

    wait_until(|| engine.spoken_count() == 1).await;
    assert!(speaker.is_speaking());
    assert_eq!(speaker.state(), SpeakerState::SpeakingSegments);

    speaker.stop_speaking().await.unwrap();
    tokio_test::assert_ok!(session.await.unwrap());

    assert_eq!(engine.spoken_count(), 1);
    assert_eq!(
        events.kinds(),
        vec![
            EventKind::BeforeSpeaking,
            EventKind::BeforeSpeakingPart,
            EventKind::StopSpeaking,
            EventKind::AfterSpeaking,
        ]
    );
    assert!(!speaker.is_speaking());
    assert_eq!(speaker.state(), SpeakerState::Idle);

    // A second stop finds nothing to end.
    speaker.stop_speaking().await.unwrap();
    assert_eq!(events.count(EventKind::AfterSpeaking), 1);
    assert_eq!(events.count(EventKind::StopSpeaking), 2);
}

#[tokio::test]
async fn test_stop_while_idle_emits_only_stop() {
    let engine = Arc::new(FakeEngine::new());
    let (speaker, events) = speaker_with(&engine, 100);

    speaker.stop_speaking().await.unwrap();

    assert_eq!(events.kinds(), vec![EventKind::StopSpeaking]);
    assert_eq!(engine.stop_count(), 1);
    assert!(engine.spoken_texts().is_empty());
}

#[tokio::test]
async fn test_selections_are_spoken_in_their_languages() {
    let engine = Arc::new(FakeEngine::new().with_voices(vec![
        Voice::new("Thomas", "fr-FR"),
        Voice::new("Samantha", "en-US"),
    ]));
    let (speaker, events) = speaker_with(&engine, 100);

    let selections = vec![
        TextSelection::new("Bonjour").with_html_tag_language("fr"),
        TextSelection::new("Hello"),
    ];

    let languages = speaker
        .resolve_selection_languages(&selections, Some("en-US"))
        .await;
    assert_eq!(languages, vec!["fr", "en-US"]);

    speaker
        .detect_languages_and_speak_all_selections(&selections, Some("en-US"))
        .await
        .unwrap();

    assert_eq!(engine.spoken_texts(), vec!["Bonjour", "Hello"]);
    assert_eq!(engine.spoken_languages(), vec!["fr-FR", "en-US"]);
    assert_eq!(events.count(EventKind::BeforeSpeaking), 2);
    events.assert_sessions_balanced();
}

#[tokio::test]
async fn test_stop_skips_remaining_selections() {
    let engine = Arc::new(FakeEngine::new().holding());
    let (speaker, events) = speaker_with(&engine, 100);

    let session = {
        let speaker = speaker.clone();
        tokio::spawn(async move {
            let selections = vec![TextSelection::new("One."), TextSelection::new("Two.")];
            speaker
                .detect_languages_and_speak_all_selections(&selections, None)
                .await
        })
    };

    wait_until(|| engine.spoken_count() == 1).await;
    speaker.stop_speaking().await.unwrap();
    session.await.unwrap().unwrap();

    assert_eq!(engine.spoken_texts(), vec!["One."]);
    assert_eq!(events.count(EventKind::BeforeSpeaking), 1);
    events.assert_sessions_balanced();
}

#[tokio::test]
async fn test_engine_failure_ends_session_with_error() {
    let engine = Arc::new(FakeEngine::new().failing_on("The second one follows it."));
    let (speaker, events) = speaker_with(&engine, 30);

    let err = speaker
        .speak_text_in_voice(LONG_TEXT, &VoiceDescriptor::for_language("en"))
        .await
        .unwrap_err();

    assert!(matches!(err, SpeakerError::Engine(_)));
    assert_eq!(engine.spoken_count(), 2);
    assert_eq!(events.count(EventKind::AfterSpeakingPart), 1);
    events.assert_sessions_balanced();
}

#[tokio::test]
async fn test_rapid_stops_and_starts_never_overlap() {
    let engine = Arc::new(FakeEngine::new().with_delay(Duration::from_millis(3)));
    let (speaker, events) = speaker_with(&engine, 30);
    let chain = Arc::new(Chain::new());

    for _ in 0..8 {
        speaker.stop_speaking().await.unwrap();
        let speaker = speaker.clone();
        drop(chain.link(move || async move {
            speaker
                .speak_text_in_voice(LONG_TEXT, &VoiceDescriptor::for_language("en"))
                .await
        }));
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    chain.settled().await;

    events.assert_sessions_balanced();
    assert!(events.count(EventKind::BeforeSpeaking) >= 1);
    assert!(!speaker.is_speaking());
}

#[tokio::test]
async fn test_chain_runs_next_link_after_failure() {
    let chain = Chain::new();
    let order = Arc::new(std::sync::Mutex::new(Vec::new()));

    let links: Vec<_> = ["A", "B", "C"]
        .into_iter()
        .map(|name| {
            let order = order.clone();
            chain.link(move || async move {
                tokio::time::sleep(Duration::from_millis(5)).await;
                order.lock().unwrap().push(name);
                if name == "B" {
                    Err(format!("{name} failed"))
                } else {
                    Ok(name)
                }
            })
        })
        .collect();

    let mut results = Vec::new();
    for link in links {
        results.push(link.await.unwrap());
    }

    assert_eq!(*order.lock().unwrap(), vec!["A", "B", "C"]);
    assert_eq!(results[0], Ok("A"));
    assert_eq!(results[1], Err("B failed".to_string()));
    assert_eq!(results[2], Ok("C"));
}

#[tokio::test]
async fn test_stop_while_announcing_segment_keeps_engine_silent() {
    let engine = Arc::new(FakeEngine::new());
    let broadcaster = Arc::new(Broadcaster::new());
    let events = EventLog::attach(&broadcaster);
    broadcaster.register_listening_action(EventKind::BeforeSpeakingPart, |_| async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        Ok(())
    });
    let speaker = speaker_on(&engine, broadcaster, 200);

    let session = {
        let speaker = speaker.clone();
        tokio::spawn(async move {
            speaker
                .speak_text_in_voice("Hello.", &VoiceDescriptor::for_language("en"))
                .await
        })
    };

    wait_until(|| events.count(EventKind::BeforeSpeakingPart) == 1).await;
    speaker.stop_speaking().await.unwrap();
    tokio_test::assert_ok!(session.await.unwrap());

    assert!(engine.spoken_texts().is_empty());
    assert_eq!(events.count(EventKind::AfterSpeakingPart), 0);
    assert_eq!(events.count(EventKind::AfterSpeaking), 1);
    events.assert_sessions_balanced();
}
