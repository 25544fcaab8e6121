use std::{io, mem, ops::ControlFlow, thread};

use crossbeam::channel::{self, Receiver, Sender};
use fileprops_fs::{Locator, open_external};
use fileprops_protocol::{RowUpdate, ViewKind, ViewMessage};
use log::{debug, info, warn};

use crate::{
    env::RenderEnv,
    error::RenderError,
    markup::Markup,
    pending::PendingRowUpdate,
    view::{
        NO_SUBJECT_MESSAGE, RENDER_FAILED_MESSAGE, RenderRequest, ViewContent, assemble,
        message_document,
    },
};

/// The live display a session renders into.
pub trait Surface: Send {
    /// Replace the whole document.
    fn set_document(&mut self, document: &Markup) -> io::Result<()>;

    /// Deliver a late row value to the current document.
    fn post_message(&mut self, update: &RowUpdate) -> io::Result<()>;

    fn open_in_editor(&mut self, target: &str) -> io::Result<()>;

    /// Transient notification, such as a failed open request.
    fn notify(&mut self, message: &str) -> io::Result<()>;
}

/// Why the document has to be rebuilt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    InitialOpen,
    Visible,
    Saved(Locator),
    ConfigChanged,
    /// The active editor switched; only the side view follows it.
    SubjectChanged(Option<Locator>),
}

#[derive(Debug)]
pub enum SessionEvent {
    Invalidate(Trigger),
    /// A render finished on its worker thread.
    Rendered {
        generation: u64,
        outcome: Result<ViewContent, RenderError>,
    },
    /// A pending row value settled.
    RowResolved(RowUpdate),
    Message(ViewMessage),
    Dispose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Rendering(u64),
    Displayed(u64),
    Disposed,
}

/// Drives one surface through repeated renders.
///
/// All state lives on the thread handling events. Renders and row lookups run
/// on worker threads and report back through the session's channel; results
/// tagged with anything but the latest generation are dropped.
pub struct RenderSession<S: Surface> {
    env: RenderEnv,
    surface: S,
    view: ViewKind,
    subject: Option<Locator>,
    generation: u64,
    state: SessionState,
    pending: Vec<PendingRowUpdate>,
    events: Sender<SessionEvent>,
}

impl<S: Surface> RenderSession<S> {
    pub fn new(
        env: RenderEnv,
        surface: S,
        view: ViewKind,
        subject: Option<Locator>,
    ) -> (Self, Receiver<SessionEvent>) {
        let (events, rx) = channel::unbounded();
        let session = Self {
            env,
            surface,
            view,
            subject,
            generation: 0,
            state: SessionState::Idle,
            pending: Vec::new(),
            events,
        };
        (session, rx)
    }

    /// Handle for feeding events from other threads.
    pub fn sender(&self) -> Sender<SessionEvent> {
        self.events.clone()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn subject(&self) -> Option<&Locator> {
        self.subject.as_ref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Process events until the session is disposed. Returns the surface.
    pub fn run(mut self, events: Receiver<SessionEvent>) -> S {
        for event in events.iter() {
            if self.handle(event).is_break() {
                break;
            }
        }
        debug!("session loop finished at generation {}", self.generation);
        self.surface
    }

    pub fn handle(&mut self, event: SessionEvent) -> ControlFlow<()> {
        if self.state == SessionState::Disposed {
            return ControlFlow::Break(());
        }

        match event {
            SessionEvent::Invalidate(trigger) => self.invalidate(trigger),
            SessionEvent::Rendered {
                generation,
                outcome,
            } => self.install(generation, outcome),
            SessionEvent::RowResolved(update) => self.post(update),
            SessionEvent::Message(message) => self.on_message(message),
            SessionEvent::Dispose => {
                self.dispose();
                return ControlFlow::Break(());
            }
        }

        ControlFlow::Continue(())
    }

    fn invalidate(&mut self, trigger: Trigger) {
        debug!("invalidated by {trigger:?} in state {:?}", self.state);

        match trigger {
            Trigger::Saved(saved) => match self.view {
                ViewKind::Static => self.subject = Some(saved),
                ViewKind::Command if self.subject.as_ref() == Some(&saved) => {}
                ViewKind::Command => return,
            },
            Trigger::SubjectChanged(subject) => match self.view {
                ViewKind::Static => self.subject = subject,
                ViewKind::Command => return,
            },
            Trigger::InitialOpen | Trigger::Visible | Trigger::ConfigChanged => {}
        }

        self.start_render();
    }

    fn start_render(&mut self) {
        self.generation += 1;
        let generation = self.generation;

        let subject = self
            .subject
            .clone()
            .filter(|s| self.view == ViewKind::Command || s.is_file());

        let Some(locator) = subject else {
            self.pending.clear();
            self.show(generation, &message_document(&self.env.assets, NO_SUBJECT_MESSAGE));
            return;
        };

        self.state = SessionState::Rendering(generation);

        let env = self.env.clone();
        let events = self.events.clone();
        let request = RenderRequest {
            view: self.view,
            locator,
            generation,
        };
        thread::spawn(move || {
            let outcome = assemble(&env, &request);
            let _ = events.send(SessionEvent::Rendered {
                generation,
                outcome,
            });
        });
    }

    fn install(&mut self, generation: u64, outcome: Result<ViewContent, RenderError>) {
        if generation != self.generation {
            return;
        }

        match outcome {
            Ok(content) => {
                self.pending = content.pending;
                self.show(generation, &content.document);
                self.dispatch_pending();
            }
            Err(err) => {
                warn!("render {generation} failed: {err}");
                self.pending.clear();
                self.show(
                    generation,
                    &message_document(&self.env.assets, RENDER_FAILED_MESSAGE),
                );
            }
        }
    }

    fn show(&mut self, generation: u64, document: &Markup) {
        if let Err(err) = self.surface.set_document(document) {
            warn!("cannot install document {generation}: {err}");
        }
        self.state = SessionState::Displayed(generation);
    }

    /// Wait for every pending value in the background and feed it back as a
    /// [`SessionEvent::RowResolved`]. Each value is taken out of the set, so
    /// calling this again never posts it twice.
    pub fn dispatch_pending(&mut self) {
        for pending in mem::take(&mut self.pending) {
            let events = self.events.clone();
            thread::spawn(move || {
                let _ = events.send(SessionEvent::RowResolved(pending.resolve()));
            });
        }
    }

    fn post(&mut self, update: RowUpdate) {
        if update.render_generation != self.generation {
            return;
        }

        if let Err(err) = self.surface.post_message(&update) {
            warn!("cannot post {} update: {err}", update.async_token);
        }
    }

    fn on_message(&mut self, message: ViewMessage) {
        let failure = match &message {
            ViewMessage::Open { target } => self
                .surface
                .open_in_editor(target)
                .err()
                .map(|err| format!("Failed to open {target}: {err}")),
            ViewMessage::OpenExternal { target } => {
                open_external(&*self.env.processes, self.env.platform, target)
                    .err()
                    .map(|err| format!("Failed to open {target} externally: {err}"))
            }
            ViewMessage::Log { data } => {
                info!("view: {data}");
                None
            }
        };

        if let Some(text) = failure {
            warn!("{text}");
            if let Err(err) = self.surface.notify(&text) {
                warn!("cannot deliver notification: {err}");
            }
        }
    }

    fn dispose(&mut self) {
        debug!("disposing session at generation {}", self.generation);
        self.state = SessionState::Disposed;
        self.pending.clear();
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
