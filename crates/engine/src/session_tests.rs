use std::{
    fs,
    sync::{Arc, Mutex},
    time::Duration,
};

use serde_json::json;
use tempfile::{TempDir, tempdir};

use super::*;
use crate::testing::{FakeRunner, env, settings};

const TIMEOUT: Duration = Duration::from_secs(10);

/// Records everything the session does to it.
#[derive(Default, Clone)]
struct RecordingSurface {
    log: Arc<Mutex<Record>>,
    fail_open: bool,
}

#[derive(Default)]
struct Record {
    documents: Vec<String>,
    posts: Vec<RowUpdate>,
    opened: Vec<String>,
    notes: Vec<String>,
}

impl RecordingSurface {
    fn documents(&self) -> Vec<String> {
        self.log.lock().unwrap().documents.clone()
    }

    fn posts(&self) -> Vec<RowUpdate> {
        self.log.lock().unwrap().posts.clone()
    }
}

impl Surface for RecordingSurface {
    fn set_document(&mut self, document: &Markup) -> io::Result<()> {
        self.log.lock().unwrap().documents.push(document.to_string());
        Ok(())
    }

    fn post_message(&mut self, update: &RowUpdate) -> io::Result<()> {
        self.log.lock().unwrap().posts.push(update.clone());
        Ok(())
    }

    fn open_in_editor(&mut self, target: &str) -> io::Result<()> {
        if self.fail_open {
            return Err(io::Error::other("editor gone"));
        }
        self.log.lock().unwrap().opened.push(target.to_owned());
        Ok(())
    }

    fn notify(&mut self, message: &str) -> io::Result<()> {
        self.log.lock().unwrap().notes.push(message.to_owned());
        Ok(())
    }
}

struct Harness {
    _dir: TempDir,
    file: Locator,
    surface: RecordingSurface,
    session: RenderSession<RecordingSurface>,
    events: Receiver<SessionEvent>,
}

fn harness(view: ViewKind, rows: serde_json::Value) -> Harness {
    let dir = tempdir().unwrap();
    let path = dir.path().join("subject.txt");
    fs::write(&path, "hello").unwrap();
    let file = Locator::file(path);

    let env = env(
        settings(&[("propertyRows", rows)]),
        Arc::new(FakeRunner::stat("test-user", "test-group")),
    );
    let surface = RecordingSurface::default();
    let (session, events) = RenderSession::new(env, surface.clone(), view, Some(file.clone()));

    Harness {
        _dir: dir,
        file,
        surface,
        session,
        events,
    }
}

impl Harness {
    fn next(&self) -> SessionEvent {
        self.events.recv_timeout(TIMEOUT).unwrap()
    }

    /// Feed the next `n` events from worker threads back into the session.
    fn pump(&mut self, n: usize) {
        for _ in 0..n {
            let event = self.next();
            let _ = self.session.handle(event);
        }
    }
}

#[test]
fn initial_open_installs_document() {
    let mut h = harness(ViewKind::Command, json!(["name"]));

    let _ = h.session.handle(SessionEvent::Invalidate(Trigger::InitialOpen));
    assert_eq!(h.session.state(), SessionState::Rendering(1));

    h.pump(1);

    assert_eq!(h.session.state(), SessionState::Displayed(1));
    let docs = h.surface.documents();
    assert_eq!(docs.len(), 1);
    assert!(docs[0].contains("subject.txt"));
    assert!(docs[0].contains("data-render-generation=\"1\""));
}

#[cfg(unix)]
#[test]
fn pending_owner_is_posted_once() {
    let mut h = harness(ViewKind::Command, json!(["owner"]));

    let _ = h.session.handle(SessionEvent::Invalidate(Trigger::InitialOpen));
    h.pump(2);

    assert!(h.surface.documents()[0].contains("data-async-id=\"owner-1\""));
    assert_eq!(
        h.surface.posts(),
        vec![RowUpdate {
            render_generation: 1,
            row_kind: "owner".into(),
            async_token: "owner-1".into(),
            value: "test-user (test-group)".into(),
        }]
    );

    // Everything was handed out already.
    h.session.dispatch_pending();
    assert!(h.events.recv_timeout(Duration::from_millis(200)).is_err());
    assert_eq!(h.surface.posts().len(), 1);
}

#[test]
fn only_the_latest_generation_is_installed() {
    let mut h = harness(ViewKind::Command, json!(["name", "owner"]));

    let _ = h.session.handle(SessionEvent::Invalidate(Trigger::InitialOpen));
    let _ = h.session.handle(SessionEvent::Invalidate(Trigger::Visible));
    assert_eq!(h.session.state(), SessionState::Rendering(2));

    // Two renders finish in some order; only the second is installed and only
    // its owner row is posted.
    let mut rendered = 0;
    while rendered < 2 {
        match h.next() {
            event @ SessionEvent::Rendered { .. } => {
                rendered += 1;
                let _ = h.session.handle(event);
            }
            other => {
                let _ = h.session.handle(other);
            }
        }
    }

    let docs = h.surface.documents();
    assert_eq!(docs.len(), 1);
    assert!(docs[0].contains("data-render-generation=\"2\""));

    if cfg!(unix) {
        if h.surface.posts().is_empty() {
            h.pump(1);
        }
        let posts = h.surface.posts();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].render_generation, 2);
    }
}

#[test]
fn stale_row_updates_are_dropped() {
    let mut h = harness(ViewKind::Command, json!(["name"]));
    let _ = h.session.handle(SessionEvent::Invalidate(Trigger::InitialOpen));
    let _ = h.session.handle(SessionEvent::Invalidate(Trigger::ConfigChanged));
    h.pump(2);

    let stale = RowUpdate {
        render_generation: 1,
        row_kind: "owner".into(),
        async_token: "owner-1".into(),
        value: "old".into(),
    };
    let _ = h.session.handle(SessionEvent::RowResolved(stale));
    assert!(h.surface.posts().is_empty());
}

#[test]
fn resolution_failure_shows_message() {
    let mut h = harness(ViewKind::Command, json!(["name"]));
    fs::remove_file(h.file.as_path().unwrap()).unwrap();

    let _ = h.session.handle(SessionEvent::Invalidate(Trigger::InitialOpen));
    h.pump(1);

    let docs = h.surface.documents();
    assert_eq!(docs.len(), 1);
    assert!(docs[0].contains(RENDER_FAILED_MESSAGE));
    assert!(!docs[0].contains("<table"));
    assert_eq!(h.session.state(), SessionState::Displayed(1));
}

#[test]
fn static_view_without_subject_shows_hint() {
    let mut h = harness(ViewKind::Static, json!(["name"]));

    let _ = h.session.handle(SessionEvent::Invalidate(Trigger::SubjectChanged(None)));

    assert_eq!(h.session.state(), SessionState::Displayed(1));
    assert!(h.surface.documents()[0].contains(NO_SUBJECT_MESSAGE));
}

#[test]
fn static_view_follows_saved_documents() {
    let mut h = harness(ViewKind::Static, json!(["name"]));
    let other_path = h.file.as_path().unwrap().with_file_name("other.txt");
    fs::write(&other_path, "x").unwrap();
    let other = Locator::file(other_path);

    let _ = h.session.handle(SessionEvent::Invalidate(Trigger::Saved(other.clone())));
    h.pump(1);

    assert_eq!(h.session.subject(), Some(&other));
    assert!(h.surface.documents()[0].contains("other.txt"));
}

#[test]
fn command_view_ignores_other_saves() {
    let mut h = harness(ViewKind::Command, json!(["name"]));
    let other = Locator::file("/somewhere/else.txt");

    let _ = h.session.handle(SessionEvent::Invalidate(Trigger::Saved(other)));
    let _ = h
        .session
        .handle(SessionEvent::Invalidate(Trigger::SubjectChanged(None)));
    assert_eq!(h.session.generation(), 0);
    assert_eq!(h.session.state(), SessionState::Idle);

    let own = h.file.clone();
    let _ = h.session.handle(SessionEvent::Invalidate(Trigger::Saved(own)));
    assert_eq!(h.session.generation(), 1);
}

#[test]
fn failed_open_requests_become_notifications() {
    let mut h = harness(ViewKind::Command, json!(["name"]));
    h.session.surface.fail_open = true;

    let flow = h.session.handle(SessionEvent::Message(ViewMessage::Open {
        target: "/tmp/a.txt".into(),
    }));
    assert!(flow.is_continue());

    // The fake runner has no answer for the opener either.
    let _ = h.session.handle(SessionEvent::Message(ViewMessage::OpenExternal {
        target: "/tmp".into(),
    }));

    let notes = h.surface.log.lock().unwrap().notes.clone();
    assert_eq!(notes.len(), 2);
    assert!(notes[0].starts_with("Failed to open /tmp/a.txt"));
    assert!(notes[1].starts_with("Failed to open /tmp externally"));
}

#[test]
fn open_requests_reach_the_surface() {
    let mut h = harness(ViewKind::Command, json!(["name"]));

    let _ = h.session.handle(SessionEvent::Message(ViewMessage::Open {
        target: "/tmp/a.txt".into(),
    }));
    let _ = h.session.handle(SessionEvent::Message(ViewMessage::Log {
        data: json!({"copied": "a.txt"}),
    }));

    let record = h.surface.log.lock().unwrap();
    assert_eq!(record.opened, vec!["/tmp/a.txt"]);
    assert!(record.notes.is_empty());
}

#[test]
fn nothing_happens_after_dispose() {
    let mut h = harness(ViewKind::Command, json!(["name"]));

    let _ = h.session.handle(SessionEvent::Invalidate(Trigger::InitialOpen));
    assert!(h.session.handle(SessionEvent::Dispose).is_break());
    assert_eq!(h.session.state(), SessionState::Disposed);

    // The in-flight render still reports back, and is ignored.
    h.pump(1);
    let _ = h.session.handle(SessionEvent::Invalidate(Trigger::Visible));

    assert!(h.surface.documents().is_empty());
    assert_eq!(h.session.generation(), 1);
}

#[test]
fn run_loop_stops_on_dispose() {
    let h = harness(ViewKind::Command, json!(["name"]));
    let sender = h.session.sender();
    let surface = h.surface.clone();

    let worker = thread::spawn(move || h.session.run(h.events));
    sender
        .send(SessionEvent::Invalidate(Trigger::InitialOpen))
        .unwrap();

    let deadline = std::time::Instant::now() + TIMEOUT;
    while surface.documents().is_empty() && std::time::Instant::now() < deadline {
        thread::sleep(Duration::from_millis(10));
    }

    sender.send(SessionEvent::Dispose).unwrap();
    worker.join().unwrap();

    assert_eq!(surface.documents().len(), 1);
}
