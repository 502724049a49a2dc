//! Live preview server.
//!
//! ```text
//!  browser ──HTTP──▶ request thread ──Command──▶ session loop (EditorSession)
//!     ▲                    │                          │
//!     └──── poll version ──┴──── SurfaceState ◀── HttpSurface::write
//! ```
//!
//! The request thread only reads the latest document and forwards clicks and
//! toolbar actions; all project state lives on the session loop.

mod lifecycle;
mod response;
mod route;
mod surface;

use crate::{
    backend::Backend,
    cli::project_dir::{DiskSource, load_project},
    config::SketchConfig,
    debug,
    embed::serve::{SHELL_HTML, ShellVars},
    log,
    logger::{status_error, status_success},
    preview::{InteractEvent, RenderError},
    schedule::SystemClock,
    session::{EditorSession, SessionOptions},
};
use anyhow::Result;
use crossbeam::channel::{self, Receiver, Sender, select};
use route::{Route, parse_toggle};
use std::{io::Read, path::Path, sync::Arc, thread, time::Duration};
use surface::{HttpSurface, SurfaceState};
use tiny_http::{Request, Server};

/// How often the browser polls the version endpoint.
const POLL_MS: u64 = 500;

/// Upper bound on the session loop's sleep when no timer is pending.
const IDLE_WAIT: Duration = Duration::from_secs(1);

/// Requests from the HTTP thread to the session loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Refresh,
    AutoRefresh(bool),
    /// A click was delivered to the surface listener.
    Interact,
}

/// Read-only context for request handlers.
struct ServeContext {
    state: Arc<SurfaceState>,
    commands: Sender<Command>,
    title: String,
}

/// Serve `dir` until Ctrl+C.
pub fn serve_project(dir: &Path, config: &SketchConfig) -> Result<()> {
    let project = load_project(dir)?;
    let title = project.name.clone();

    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);
    let (shutdown_tx, shutdown_rx) = channel::unbounded::<()>();
    lifecycle::register_server_for_shutdown(Arc::clone(&server), shutdown_tx);

    let state = SurfaceState::new();
    let (commands_tx, commands_rx) = channel::unbounded();

    let mut session = EditorSession::new(
        project,
        HttpSurface::new(Arc::clone(&state)),
        Backend::local(&config.store.dir),
        Arc::new(SystemClock::new()),
        SessionOptions::from_config(config),
    )
    .with_source(Box::new(DiskSource::new(dir)));
    session.mount();

    let context = ServeContext {
        state: Arc::clone(&state),
        commands: commands_tx,
        title,
    };
    let request_thread = {
        let server = Arc::clone(&server);
        thread::spawn(move || run_request_loop(&server, &context))
    };

    log!("serve"; "http://{}", addr);
    run_session(&mut session, &state, &commands_rx, &shutdown_rx);

    session.unmount();
    server.unblock();
    lifecycle::wait_for_shutdown(request_thread);
    Ok(())
}

// ============================================================================
// session loop
// ============================================================================

fn run_session(
    session: &mut EditorSession<HttpSurface>,
    state: &SurfaceState,
    commands: &Receiver<Command>,
    shutdown: &Receiver<()>,
) {
    let mut reported = String::new();
    sync_view(session, state, &mut reported);

    while !crate::core::is_shutdown() {
        let timeout = session.sleep_duration().unwrap_or(IDLE_WAIT).min(IDLE_WAIT);
        select! {
            recv(shutdown) -> _ => break,
            recv(commands) -> command => match command {
                Ok(Command::Refresh) => {
                    session.refresh();
                }
                Ok(Command::AutoRefresh(enabled)) => session.set_auto_refresh(enabled),
                Ok(Command::Interact) => {}
                Err(_) => break,
            },
            default(timeout) => {}
        }

        session.drain_interactions();
        session.drain_channel();
        session.fire_due_timers();
        sync_view(session, state, &mut reported);
    }
}

/// Publish renderer settings and report a new document once.
fn sync_view(session: &EditorSession<HttpSurface>, state: &SurfaceState, reported: &mut String) {
    let renderer = session.renderer();
    state.set_view(renderer.current_entry(), renderer.auto_refresh());

    let version = state.version();
    if version.is_empty() || *reported == version {
        return;
    }
    *reported = version;

    match renderer.last_error() {
        Some(RenderError::Composition(failure)) => status_error("preview failed", &failure.0),
        _ => status_success(&format!(
            "refreshed {}",
            renderer.current_entry().unwrap_or("preview")
        )),
    }
}

// ============================================================================
// request handling
// ============================================================================

fn run_request_loop(server: &Server, context: &ServeContext) {
    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, context) {
            log!("serve"; "request error: {e}");
        }
    }
}

/// Handle a single HTTP request
fn handle_request(mut request: Request, context: &ServeContext) -> Result<()> {
    if crate::core::is_shutdown() {
        return response::respond_unavailable(request);
    }

    match Route::parse(request.method(), request.url()) {
        Route::Shell => {
            let body = SHELL_HTML.render(&ShellVars {
                title: context.title.clone(),
                poll_ms: POLL_MS,
                auto_refresh: context.state.status().auto_refresh,
            });
            response::respond_html(request, &body)
        }
        Route::Version => {
            let body = serde_json::to_string(&context.state.status())?;
            response::respond_json(request, body)
        }
        Route::Document => match context.state.document() {
            Some(document) => response::respond_html(request, &document),
            None => response::respond_unavailable(request),
        },
        Route::Interact => {
            let body = read_body(&mut request)?;
            let Ok(event) = serde_json::from_str::<InteractEvent>(&body) else {
                return response::respond_bad_request(request, "invalid interaction event");
            };
            if !context.state.deliver(event) {
                debug!("preview"; "click arrived with no listener attached");
            }
            let _ = context.commands.send(Command::Interact);
            response::respond_no_content(request)
        }
        Route::Refresh => {
            let _ = context.commands.send(Command::Refresh);
            response::respond_no_content(request)
        }
        Route::AutoRefresh => {
            let body = read_body(&mut request)?;
            let Some(enabled) = parse_toggle(&body) else {
                return response::respond_bad_request(request, "expected true or false");
            };
            let _ = context.commands.send(Command::AutoRefresh(enabled));
            response::respond_no_content(request)
        }
        Route::NotFound => response::respond_not_found(request),
        Route::MethodNotAllowed => response::respond_method_not_allowed(request),
    }
}

fn read_body(request: &mut Request) -> Result<String> {
    let mut body = String::new();
    request.as_reader().take(64 * 1024).read_to_string(&mut body)?;
    Ok(body)
}
