//! The engine running on the libSQL store with the JSONL trail attached.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use whys_core::enums::{ErrorClass, SessionStatus};
use whys_core::events::EngineEvent;
use whys_db::WhysDb;
use whys_db::trail::TrailWriter;
use whys_engine::{
    Advance, CausalEngine, GenerationError, GenerationPurpose, GenerationRequest, Generator,
};

/// Serves questions in order and one fixed root-cause reply.
struct Canned {
    questions: Mutex<VecDeque<&'static str>>,
}

impl Canned {
    fn new() -> Self {
        Self {
            questions: Mutex::new(VecDeque::from([
                "Why do nightly exports fail?",
                "What makes the export job run out of memory?",
                "Why does the job load every row at once?",
                "What changed in the export query last month?",
                "Why was streaming removed from the exporter?",
            ])),
        }
    }
}

impl Generator for Canned {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        match request.purpose {
            GenerationPurpose::Question => self
                .questions
                .lock()
                .unwrap()
                .pop_front()
                .map(str::to_string)
                .ok_or_else(|| GenerationError::Transport("out of questions".into())),
            GenerationPurpose::RootCause => Ok(r#"{"summary": "The exporter buffers the full result set because streaming was removed",
                "contributing_factors": ["Export query returns 40 million rows", "Worker memory limit of 2 GB"]}"#
                .to_string()),
        }
    }
}

const ANSWERS: [&str; 5] = [
    "The export worker is killed by the OOM killer",
    "The exporter buffers the whole result set in memory",
    "The query returns 40 million rows after the schema change",
    "Someone removed the cursor-based pagination",
    "A refactor replaced the streaming writer with a Vec",
];

#[tokio::test]
async fn session_survives_reopening_and_trail_records_every_step() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("sessions.db");
    let db_path = db_path.to_str().unwrap();
    let trail_dir = dir.path().join("trail");

    let session_id = {
        let engine = CausalEngine::new(Canned::new(), WhysDb::open_local(db_path).await.unwrap())
            .with_sink(Arc::new(TrailWriter::new(trail_dir.clone()).unwrap()));
        let (session, _) = engine.start("Nightly exports fail").await.unwrap();
        engine.submit_answer(&session.id, ANSWERS[0]).await.unwrap();
        session.id
    };

    // A fresh handle sees the stored answer and continues the session.
    let questions = Canned::new();
    questions.questions.lock().unwrap().pop_front();
    let engine = CausalEngine::new(questions, WhysDb::open_local(db_path).await.unwrap())
        .with_sink(Arc::new(TrailWriter::new(trail_dir.clone()).unwrap()));
    assert_eq!(engine.snapshot(&session_id).await.unwrap().step, 1);

    for answer in &ANSWERS[1..] {
        let (_, advance) = engine.advance(&session_id).await.unwrap();
        assert!(matches!(advance, Advance::Question(_)));
        engine.submit_answer(&session_id, answer).await.unwrap();
    }
    let (_, advance) = engine.advance(&session_id).await.unwrap();
    let Advance::RootCause(result) = advance else {
        panic!("fifth advance should synthesize the root cause, got {advance:?}");
    };
    assert!(result.summary.contains("streaming was removed"));

    let stored = engine.session(&session_id).await.unwrap();
    assert_eq!(stored.status, SessionStatus::Completed);
    assert_eq!(stored.root_cause, Some(result));

    let events = TrailWriter::new(trail_dir).unwrap().read(&session_id).unwrap();
    let kinds: Vec<&str> = events.iter().map(|e| e.event.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            "steered",
            "classified",
            "steered",
            "classified",
            "steered",
            "classified",
            "steered",
            "classified",
            "steered",
            "classified",
            "finalized",
        ]
    );
    assert!(events.iter().all(|e| e.ses == session_id));
    assert!(matches!(events[10].event, EngineEvent::Finalized { used_fallback: false, .. }));
}

#[tokio::test]
async fn expired_session_is_reported_as_expired() {
    let db = WhysDb::open_with_ttl(":memory:", chrono::TimeDelta::zero())
        .await
        .unwrap();
    let engine = CausalEngine::new(Canned::new(), db);
    let (session, _) = engine.start("Nightly exports fail").await.unwrap();

    let err = engine.submit_answer(&session.id, ANSWERS[0]).await.unwrap_err();
    assert_eq!(err.classification(), ErrorClass::Expired);
}

#[tokio::test]
async fn unknown_session_is_not_found() {
    let engine = CausalEngine::new(Canned::new(), WhysDb::open_local(":memory:").await.unwrap());
    let err = engine.snapshot("rca-ffffffff").await.unwrap_err();
    assert_eq!(err.classification(), ErrorClass::NotFound);
}
