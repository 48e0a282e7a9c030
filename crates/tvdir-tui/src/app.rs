//! App: the component event loop.
//!
//! - `App` owns the `DataLoader`, every component and `AppState`.
//! - A `tokio::mpsc` channel carries `AppMessage`s in from background tasks
//!   (terminal events, resource loads, player launches). Those tasks never
//!   touch state; results are applied here when they arrive.
//! - Components return `Vec<Action>`; the App dispatches each one.

use std::io;
use std::time::Duration;

use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use tvdir_proto::catalog::{Channel, TextBundle};
use tvdir_proto::config::Config;
use tvdir_proto::loader::{DataLoader, LoadError, LoadState};

use crate::{
    action::Action,
    analytics::{Analytics, ChannelClick},
    app_state::AppState,
    clock::ClockFormat,
    component::Component,
    components::{directory::Directory, footer::Footer, header::Header, ticker::Ticker},
    navigate::{self, Navigator},
    widgets::toast::ToastManager,
};

// ── Internal event bus ────────────────────────────────────────────────────────

pub enum AppMessage {
    Event(Event),
    ChannelsLoaded(Result<Vec<Channel>, LoadError>),
    TextsLoaded(Result<TextBundle, LoadError>),
    NavigationFailed(String),
}

/// Text placed in every panel when the channel list cannot be loaded.
pub fn channel_error_message(err: &LoadError) -> String {
    format!(
        "เกิดข้อผิดพลาดในการโหลดช่อง: {}\nโปรดลองใหม่อีกครั้งในภายหลัง",
        err
    )
}

pub struct App {
    loader: DataLoader,
    state: AppState,
    clock: ClockFormat,

    // ── Components ────────────────────────────────────────────────────────────
    header: Header,
    ticker: Ticker,
    directory: Directory,
    footer: Footer,
    toast: ToastManager,

    analytics: Analytics,
    navigator: Navigator,

    tx: mpsc::Sender<AppMessage>,
    rx: Option<mpsc::Receiver<AppMessage>>,

    /// Last-drawn directory rect, for mouse hit-testing.
    directory_area: Rect,
    should_quit: bool,
}

impl App {
    pub fn new(config: &Config, loader: DataLoader) -> Self {
        let (tx, rx) = mpsc::channel::<AppMessage>(256);
        let clock = ClockFormat::from_config(&config.clock);
        let state = AppState::new(&config.text, clock.now());
        Self {
            loader,
            state,
            clock,
            header: Header::new(),
            ticker: Ticker::new(),
            directory: Directory::new(&config.panels, &config.text),
            footer: Footer::new(),
            toast: ToastManager::new(),
            analytics: Analytics::from_config(&config.analytics),
            navigator: Navigator::from_config(&config.player),
            tx,
            rx: Some(rx),
            directory_area: Rect::default(),
            should_quit: false,
        }
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        let Some(mut rx) = self.rx.take() else {
            anyhow::bail!("app event loop already started");
        };

        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        // ── Background task: keyboard/mouse events ────────────────────────────
        let event_tx = self.tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        // ── Startup loads, independent of each other ──────────────────────────
        self.start_loads();

        // ── Periodic timers ───────────────────────────────────────────────────
        let mut clock_tick = tokio::time::interval(Duration::from_secs(1));
        clock_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // Accordion animation, ticker scroll, toast expiry.
        let mut ui_tick = tokio::time::interval(Duration::from_millis(100));
        ui_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            needs_redraw = false;

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    needs_redraw = self.handle_message(msg);
                    while let Ok(next) = rx.try_recv() {
                        needs_redraw |= self.handle_message(next);
                    }
                }

                _ = clock_tick.tick() => {
                    self.state.clock = self.clock.now();
                    needs_redraw = true;
                }

                _ = ui_tick.tick() => {
                    let mut actions = Vec::new();
                    actions.extend(self.ticker.tick(&self.state));
                    actions.extend(self.directory.tick(&self.state));
                    for action in actions {
                        self.dispatch(action);
                    }
                    self.toast.tick();
                    needs_redraw = true;
                }
            }
        }

        // ── Teardown ──────────────────────────────────────────────────────────
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
        info!("tvdir exiting");
        Ok(())
    }

    /// Issue both resource loads as separate tasks.
    fn start_loads(&mut self) {
        if let Some(load) = self.loader.begin_channels() {
            let tx = self.tx.clone();
            tokio::spawn(async move {
                let _ = tx.send(AppMessage::ChannelsLoaded(load.await)).await;
            });
        }
        if let Some(load) = self.loader.begin_texts() {
            let tx = self.tx.clone();
            tokio::spawn(async move {
                let _ = tx.send(AppMessage::TextsLoaded(load.await)).await;
            });
        }
    }

    /// Apply one message. Returns whether the screen needs a redraw.
    fn handle_message(&mut self, msg: AppMessage) -> bool {
        match msg {
            AppMessage::Event(Event::Key(key)) => {
                if key.kind == KeyEventKind::Release {
                    return false;
                }
                for action in self.handle_key(key) {
                    self.dispatch(action);
                }
                true
            }
            AppMessage::Event(Event::Mouse(mouse)) => {
                for action in self.handle_mouse(mouse) {
                    self.dispatch(action);
                }
                true
            }
            AppMessage::Event(Event::Resize(..)) => true,
            AppMessage::Event(_) => false,
            AppMessage::ChannelsLoaded(result) => {
                self.on_channels_loaded(result);
                true
            }
            AppMessage::TextsLoaded(result) => {
                self.on_texts_loaded(result);
                true
            }
            AppMessage::NavigationFailed(msg) => {
                self.toast.error(msg);
                true
            }
        }
    }

    fn on_channels_loaded(&mut self, result: Result<Vec<Channel>, LoadError>) {
        if let Some(err) = self.loader.finish_channels(result).error() {
            let message = channel_error_message(err);
            self.directory.show_load_error(&message);
        }
        // Panels toggled while the list was in flight finish opening now.
        let mut actions = Vec::new();
        let channels = self.loader.channels().value().map(Vec::as_slice).unwrap_or(&[]);
        for idx in self.directory.opening() {
            actions.extend(self.directory.finish_open(idx, channels));
        }
        for action in actions {
            self.dispatch(action);
        }
    }

    fn on_texts_loaded(&mut self, result: Result<TextBundle, LoadError>) {
        match self.loader.finish_texts(result) {
            LoadState::Loaded(bundle) => self.state.apply_texts(bundle),
            LoadState::Failed { .. } => self.state.apply_text_error(),
            LoadState::Unloaded | LoadState::Loading => {}
        }
    }

    /// Panel `idx` is opening: finish now if the list is resolved, otherwise
    /// start the load (if nobody has) and finish when it arrives.
    fn ensure_channels(&mut self, idx: usize) {
        if self.loader.channels().is_resolved() {
            let channels = self.loader.channels().value().map(Vec::as_slice).unwrap_or(&[]);
            let actions = self.directory.finish_open(idx, channels);
            for action in actions {
                self.dispatch(action);
            }
            return;
        }
        if let Some(load) = self.loader.begin_channels() {
            let tx = self.tx.clone();
            tokio::spawn(async move {
                let _ = tx.send(AppMessage::ChannelsLoaded(load.await)).await;
            });
        }
        debug!("panel {} waiting for the channel list", idx);
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc if key.modifiers == KeyModifiers::NONE => {
                return vec![Action::Quit];
            }
            KeyCode::Char('c') if key.modifiers == KeyModifiers::CONTROL => {
                return vec![Action::Quit];
            }
            _ => {}
        }
        self.directory.handle_key(key, &self.state)
    }

    fn handle_mouse(&mut self, event: MouseEvent) -> Vec<Action> {
        let area = self.directory_area;
        let inside = area.width > 0
            && area.height > 0
            && event.column >= area.x
            && event.column < area.x + area.width
            && event.row >= area.y
            && event.row < area.y + area.height;
        if !inside {
            return Vec::new();
        }
        self.directory.handle_mouse(event, area, &self.state)
    }

    // ── Action dispatcher ─────────────────────────────────────────────────────

    fn dispatch(&mut self, action: Action) {
        match action {
            Action::EnsureChannels(idx) => self.ensure_channels(idx),
            Action::OpenChannel(click) => self.open_channel(click),
            Action::CopyToClipboard(text) => {
                match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text.clone())) {
                    Ok(()) => {
                        let display = if text.chars().count() > 40 {
                            format!("{}…", text.chars().take(40).collect::<String>())
                        } else {
                            text
                        };
                        self.toast.success(format!("copied: {}", display));
                    }
                    Err(e) => {
                        warn!("clipboard error: {}", e);
                        self.toast.error(format!("clipboard error: {}", e));
                    }
                }
            }
            Action::Quit => self.should_quit = true,
        }
    }

    fn open_channel(&mut self, click: ChannelClick) {
        info!("channel click: {} ({})", click.channel_name, click.category);
        self.analytics.track(&click);

        let Some(plan) = self.navigator.plan(&click.link_url) else {
            debug!("no navigation for {:?}", click.channel_name);
            return;
        };
        self.toast.info(format!("opening {}", click.channel_name));
        let tx = self.tx.clone();
        tokio::spawn(async move {
            if let Err(e) = navigate::launch(plan).await {
                error!("navigation failed: {:#}", e);
                let _ = tx.send(AppMessage::NavigationFailed(format!("{:#}", e))).await;
            }
        });
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut ratatui::Frame) {
        use crate::theme::C_BG;
        use ratatui::widgets::Block;

        let area = frame.area();
        frame.render_widget(
            Block::default().style(ratatui::style::Style::default().bg(C_BG)),
            area,
        );

        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(self.header.height()),
                Constraint::Length(self.ticker.height()),
                Constraint::Min(0),
                Constraint::Length(self.footer.height()),
            ])
            .split(area);

        self.header.draw(frame, outer[0], &self.state);
        self.ticker.draw(frame, outer[1], &self.state);

        let body = Rect {
            y: outer[2].y + 1,
            height: outer[2].height.saturating_sub(1),
            ..outer[2]
        };
        self.directory.draw(frame, body, &self.state);
        self.directory_area = body;

        self.footer.draw(frame, outer[3], &self.state);
        self.toast.draw(frame, area);
    }
}
