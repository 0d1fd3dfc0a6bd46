use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use agent_chat_core::{update, AppState, Msg, SessionId};
use agent_chat_engine::EngineHandle;
use anyhow::Context;
use chat_logging::{chat_debug, chat_info, chat_warn};

use super::config::{self, ChatConfig};
use super::effects::EffectRunner;
use super::ui;
use super::ui::surface::{HtmlSurface, SurfaceError};

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const QUIT_COMMAND: &str = "/quit";

/// Input from the terminal thread.
#[derive(Debug, Clone, PartialEq, Eq)]
enum HostEvent {
    Ui(Msg),
    /// End of input. With `wait_for_turn` the host lets an in-flight turn finish first.
    CloseRequested { wait_for_turn: bool },
}

pub fn run_app() -> anyhow::Result<()> {
    let config_path = config::config_path();
    let (config, config_error) = match config::load_config(&config_path) {
        Ok(config) => (config, None),
        Err(err) => (ChatConfig::default(), Some(err)),
    };
    chat_logging::initialize(config.log_destination, &config.log_path);
    if let Some(err) = config_error {
        chat_warn!("{}; using defaults", err);
    }

    let session_id = SessionId::generate();
    chat_info!(
        "Starting session sid={} base_url={} snapshot={:?}",
        session_id,
        config.base_url,
        config.snapshot_path
    );

    let engine =
        EngineHandle::new(config.transport_settings()).context("failed to start engine")?;
    let surface = HtmlSurface::new(io::stdout(), Some(config.snapshot_path.clone()));
    let mut host = ChatHost::new(AppState::new(session_id), EffectRunner::new(engine), surface)
        .context("failed to build chat surface")?;

    let (event_tx, event_rx) = mpsc::channel::<HostEvent>();
    spawn_input_reader(event_tx.clone());

    host.dispatch(Msg::Mounted);
    host.render_if_dirty();

    let mut closing: Option<bool> = None;
    loop {
        host.pump_engine();
        match event_rx.recv_timeout(POLL_INTERVAL) {
            Ok(HostEvent::Ui(msg)) => host.dispatch(msg),
            Ok(HostEvent::CloseRequested { wait_for_turn }) => closing = Some(wait_for_turn),
            Err(mpsc::RecvTimeoutError::Timeout) => host.dispatch(Msg::Tick),
            Err(mpsc::RecvTimeoutError::Disconnected) => closing = Some(false),
        }
        host.render_if_dirty();

        match closing {
            Some(true) if host.is_typing() => continue,
            Some(_) => break,
            None => {}
        }
    }

    host.dispatch(Msg::Unmounted);
    host.render_if_dirty();
    chat_info!("Session closed");
    drop(event_tx);
    Ok(())
}

/// Owns the conversation state and routes messages through `update`.
struct ChatHost<W: Write> {
    state: Option<AppState>,
    runner: EffectRunner,
    surface: HtmlSurface<W>,
    last_revision: Option<u64>,
}

impl<W: Write> ChatHost<W> {
    fn new(
        state: AppState,
        runner: EffectRunner,
        mut surface: HtmlSurface<W>,
    ) -> Result<Self, SurfaceError> {
        surface.apply(ui::layout::initial_commands())?;
        Ok(Self {
            state: Some(state),
            runner,
            surface,
            last_revision: None,
        })
    }

    fn dispatch(&mut self, msg: Msg) {
        let Some(state) = self.state.take() else {
            return;
        };
        let (state, effects) = update(state, msg);
        self.state = Some(state);
        self.runner.enqueue(effects);
    }

    fn pump_engine(&mut self) {
        for msg in self.runner.poll() {
            self.dispatch(msg);
        }
    }

    fn render_if_dirty(&mut self) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let view = state.view();
        if !state.consume_dirty() {
            return;
        }
        let commands = ui::render::render(&view, self.last_revision);
        self.last_revision = Some(view.list_revision);

        let result = self
            .surface
            .apply(commands)
            .and_then(|()| self.surface.flush());
        if let Err(err) = result {
            chat_warn!("Surface update failed: {}", err);
        }
    }

    fn is_typing(&self) -> bool {
        self.state.as_ref().is_some_and(AppState::is_typing)
    }
}

fn line_events(line: &str) -> Vec<HostEvent> {
    if line.trim() == QUIT_COMMAND {
        return vec![HostEvent::CloseRequested {
            wait_for_turn: false,
        }];
    }
    vec![
        HostEvent::Ui(Msg::InputChanged(line.to_string())),
        HostEvent::Ui(Msg::SendClicked),
    ]
}

fn spawn_input_reader(event_tx: mpsc::Sender<HostEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    chat_warn!("Failed to read input: {}", err);
                    break;
                }
            };
            for event in line_events(&line) {
                if event_tx.send(event).is_err() {
                    return;
                }
            }
        }
        chat_debug!("Input closed");
        let _ = event_tx.send(HostEvent::CloseRequested {
            wait_for_turn: true,
        });
    });
}
