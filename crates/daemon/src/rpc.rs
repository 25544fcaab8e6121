use std::fs;
use std::io;
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::Path;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::thread;

use anyhow::{Context, anyhow, bail};
use crossbeam::channel::Sender;
use fileprops_engine::{Markup, RenderSession, SessionEvent, Surface, Trigger};
use fileprops_fs::{Locator, StaticVirtualFs, VirtualStat};
use fileprops_protocol::codec::{is_disconnect, read_message, write_message};
use fileprops_protocol::{HostStat, RowUpdate, SurfaceCommand, SurfaceEvent, ViewKind};
use fileprops_runtime::Settings;
use log::{debug, error, info, warn};
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::iterator::Signals;
use url::Url;

use crate::state::{DaemonState, SessionParts};

/// RAII guard that ensures the Unix socket file is removed on shutdown,
/// even if we return early or panic.
struct SocketGuard<'a> {
    path: &'a Path,
}

impl<'a> Drop for SocketGuard<'a> {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_file(self.path) {
            if err.kind() != io::ErrorKind::NotFound {
                error!(
                    "Failed to remove Unix socket at {} on shutdown: {err}",
                    self.path.display()
                );
            }
        }
    }
}

pub fn run_rpc_server(state: Arc<DaemonState>) -> anyhow::Result<()> {
    let socket_path = &state.config.socket_path;

    let shutdown = Arc::new(AtomicBool::new(false));

    // Installed before the socket exists so an early signal is not fatal.
    let mut signals =
        Signals::new([SIGINT, SIGTERM]).context("Failed to register signal handlers")?;
    let signal_handle = signals.handle();

    if let Some(dir) = socket_path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create socket directory {}", dir.display()))?;
    }

    // Clean up stale socket if it exists.
    if socket_path.exists() {
        fs::remove_file(socket_path).with_context(|| {
            format!(
                "Failed to remove existing socket at {}",
                socket_path.display()
            )
        })?;
    }

    let listener = UnixListener::bind(socket_path)
        .with_context(|| format!("Failed to bind Unix socket at {}", socket_path.display()))?;

    // Ensure socket is cleaned up on any exit path.
    let _socket_guard = SocketGuard {
        path: socket_path.as_path(),
    };

    // `accept` is restarted after a handled signal, so the watcher wakes it
    // with a connection of its own once the flag is set.
    let watcher = {
        let shutdown = Arc::clone(&shutdown);
        let wake_path = socket_path.clone();
        thread::spawn(move || {
            if let Some(sig) = signals.forever().next() {
                info!("Received signal {sig}; shutting down.");
                shutdown.store(true, Ordering::SeqCst);
                if let Err(err) = UnixStream::connect(&wake_path) {
                    warn!("Failed to wake accept loop: {err}");
                }
            }
        })
    };

    info!("fileprops daemon listening on {}", socket_path.display());

    loop {
        let accepted = listener.accept();

        if shutdown.load(Ordering::SeqCst) {
            info!("Shutdown signal observed; stopping RPC server.");
            break;
        }

        match accepted {
            Ok((stream, _addr)) => {
                let state = state.clone();
                thread::spawn(move || {
                    if let Err(err) = handle_client(stream, &state) {
                        error!("Error while handling client: {err:#}");
                    }
                });
            }
            Err(ref err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => {
                error!("Accept error: {err}");
                continue;
            }
        }
    }

    signal_handle.close();
    if watcher.join().is_err() {
        error!("Signal watcher panicked");
    }

    info!("RPC server shutdown complete.");
    Ok(())
}

/// Surface backed by the client connection. Every call is one framed
/// [`SurfaceCommand`].
pub struct SocketSurface {
    stream: UnixStream,
}

impl SocketSurface {
    fn send(&mut self, command: &SurfaceCommand) -> io::Result<()> {
        write_message(&mut self.stream, command).map_err(io::Error::other)
    }
}

impl Surface for SocketSurface {
    fn set_document(&mut self, document: &Markup) -> io::Result<()> {
        self.send(&SurfaceCommand::SetDocument {
            html: document.to_string(),
        })
    }

    fn post_message(&mut self, update: &RowUpdate) -> io::Result<()> {
        self.send(&SurfaceCommand::Post {
            message: update.clone(),
        })
    }

    fn open_in_editor(&mut self, target: &str) -> io::Result<()> {
        self.send(&SurfaceCommand::OpenInEditor {
            target: target.to_owned(),
        })
    }

    fn notify(&mut self, message: &str) -> io::Result<()> {
        self.send(&SurfaceCommand::Notify {
            message: message.to_owned(),
        })
    }
}

/// One connection is one surface. The first event must be `attach`; the
/// session then runs on its own thread while this one reads host events.
pub fn handle_client(stream: UnixStream, state: &DaemonState) -> anyhow::Result<()> {
    let mut reader = stream
        .try_clone()
        .context("Failed to clone client stream")?;

    let first: SurfaceEvent = read_message(&mut reader).context("Failed to read attach event")?;
    let (view, locator, stat) = match first {
        SurfaceEvent::Attach {
            view,
            locator,
            stat,
        } => (view, locator, stat),
        other => bail!("Expected attach as first event, got {other:?}"),
    };

    let SessionParts {
        env,
        settings,
        virtual_fs,
    } = state.session_parts();
    let mut host = HostContext::new(view, &settings, &virtual_fs);
    let subject = host.locate(locator.as_deref(), stat, true);
    debug!("Attached {} view for {subject:?}", view.as_str());

    let (session, events) = RenderSession::new(env, SocketSurface { stream }, view, subject);
    let sender = session.sender();
    let worker = thread::spawn(move || session.run(events));

    let result = forward_events(&mut reader, &sender, &mut host);

    // Whatever ended the connection, the session is torn down.
    let _ = sender.send(SessionEvent::Dispose);
    worker
        .join()
        .map_err(|_| anyhow!("Session thread panicked"))?;

    result
}

fn forward_events(
    reader: &mut UnixStream,
    sender: &Sender<SessionEvent>,
    host: &mut HostContext<'_>,
) -> anyhow::Result<()> {
    if sender
        .send(SessionEvent::Invalidate(Trigger::InitialOpen))
        .is_err()
    {
        bail!("Session ended before the first render");
    }

    loop {
        let event: SurfaceEvent = match read_message(reader) {
            Ok(event) => event,
            Err(err) if is_disconnect(&err) => {
                debug!("Client disconnected");
                return Ok(());
            }
            Err(err) => return Err(err.context("Failed to read SurfaceEvent")),
        };

        let dispose = matches!(event, SurfaceEvent::Dispose);

        if let Some(event) = host.session_event(event) {
            if sender.send(event).is_err() {
                return Ok(());
            }
        }

        if dispose {
            return Ok(());
        }
    }
}

/// Connection-side view of the host: applies settings changes and keeps the
/// virtual stat of the current subject only.
struct HostContext<'a> {
    view: ViewKind,
    settings: &'a Settings,
    virtual_fs: &'a StaticVirtualFs,
    current: Option<Url>,
}

impl<'a> HostContext<'a> {
    fn new(view: ViewKind, settings: &'a Settings, virtual_fs: &'a StaticVirtualFs) -> Self {
        Self {
            view,
            settings,
            virtual_fs,
            current: None,
        }
    }

    /// Map a host event onto the session.
    fn session_event(&mut self, event: SurfaceEvent) -> Option<SessionEvent> {
        let follows = self.view == ViewKind::Static;

        let event = match event {
            SurfaceEvent::Attach { .. } => {
                warn!("Ignoring repeated attach");
                return None;
            }
            SurfaceEvent::Show { locator, stat } => SessionEvent::Invalidate(
                Trigger::SubjectChanged(self.locate(locator.as_deref(), stat, follows)),
            ),
            SurfaceEvent::Visible => SessionEvent::Invalidate(Trigger::Visible),
            SurfaceEvent::Saved { locator, stat } => {
                let saved = self.locate(Some(&locator), stat, follows)?;
                SessionEvent::Invalidate(Trigger::Saved(saved))
            }
            SurfaceEvent::ConfigChanged { settings: values } => {
                match values {
                    Some(values) => self.settings.replace(values),
                    None => self.settings.reload(),
                }
                SessionEvent::Invalidate(Trigger::ConfigChanged)
            }
            SurfaceEvent::View { message } => SessionEvent::Message(message),
            SurfaceEvent::Dispose => SessionEvent::Dispose,
        };

        Some(event)
    }

    /// Parse a host locator. When it becomes the subject, the previous
    /// subject's stat is evicted; otherwise a stat is only kept as a refresh
    /// of the current subject.
    fn locate(
        &mut self,
        locator: Option<&str>,
        stat: Option<HostStat>,
        becomes_subject: bool,
    ) -> Option<Locator> {
        let parsed = match locator.map(Locator::parse).transpose() {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!("Ignoring subject: {err}");
                return None;
            }
        };

        let url = match &parsed {
            Some(Locator::Virtual(url)) => Some(url),
            _ => None,
        };

        if becomes_subject && self.current.as_ref() != url {
            if let Some(previous) = self.current.take() {
                self.virtual_fs.remove(&previous);
            }
            self.current = url.cloned();
        }

        if let (Some(url), Some(stat)) = (url, stat) {
            if self.current.as_ref() == Some(url) {
                self.virtual_fs.insert(
                    url,
                    VirtualStat {
                        size: stat.size,
                        ctime: stat.ctime,
                        mtime: stat.mtime,
                    },
                );
            }
        }

        parsed
    }
}

#[cfg(test)]
#[path = "rpc_tests.rs"]
mod tests;
