use galleria::cli::{AppConfig, Args};
use galleria::config::UserConfig;
use galleria::domain::{ClickOutcome, Gallery, MediaItem};
use galleria::download::{self, SavedFile};
use galleria::loader::{PendingTask, SyncLoader};
use galleria::manifest::fetch_manifest;
use galleria::tui::{
    format_file_size, handle_key_event, handle_search_input, handle_viewer_input, render,
    FrameInfo, InputMode, KeyAction, StatusMessage,
};
use galleria::{logging, player, Result};

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, time::Duration};

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let config = AppConfig::try_from(args)?;

    // Logging goes to a file; the guard flushes it on exit
    let log_path = config
        .log_file
        .clone()
        .unwrap_or_else(logging::default_log_path);
    let _log_guard = match logging::init_logging(&log_path) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {}", e);
            None
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        manifest = %config.manifest,
        "galleria starting"
    );

    run_app_with_config(&config)
}

/// Runs the TUI application with configuration
pub fn run_app_with_config(config: &AppConfig) -> Result<()> {
    let user_config = UserConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to load user config, using defaults");
        UserConfig::default()
    });

    let loader = SyncLoader::new()?;
    let source = config.manifest.clone();
    let manifest = loader.spawn(async move { fetch_manifest(&source).await });

    let mut gallery = Gallery::new(config.asset_base.clone());
    gallery.set_source(config.manifest.to_string());
    gallery.set_query(config.query.clone());
    gallery.set_filter(config.filter);
    gallery.set_sort(config.sort);

    // Show welcome on first launch or if --welcome flag is set
    let mode = if config.show_welcome || !user_config.welcome_shown {
        InputMode::Welcome
    } else {
        InputMode::Browsing
    };

    let mut app = App {
        config,
        user_config,
        gallery,
        loader,
        manifest: Some(manifest),
        downloads: Vec::new(),
        mode,
        status: None,
        frame: FrameInfo::default(),
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    tracing::info!("galleria exiting");
    result
}

/// Everything the event loop mutates
struct App<'a> {
    config: &'a AppConfig,
    user_config: UserConfig,
    gallery: Gallery,
    loader: SyncLoader,
    manifest: Option<PendingTask<Vec<MediaItem>>>,
    downloads: Vec<PendingTask<SavedFile>>,
    mode: InputMode,
    status: Option<StatusMessage>,
    /// Hit regions of the last drawn frame
    frame: FrameInfo,
}

/// Main application loop
fn run_loop<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        app.poll_background();

        terminal.draw(|frame| {
            app.frame = render(
                frame,
                &app.gallery,
                &mut app.loader,
                app.mode,
                app.status.as_ref(),
            );
        })?;

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if !app.handle_key(key) {
                        break;
                    }
                }
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }
    }

    Ok(())
}

impl App<'_> {
    /// Collects finished background work
    fn poll_background(&mut self) {
        if let Some(task) = self.manifest.as_mut() {
            if let Some(result) = task.try_take() {
                self.gallery.apply_load(result);
                self.manifest = None;
            }
        }

        let mut finished = Vec::new();
        self.downloads.retain_mut(|task| match task.try_take() {
            Some(result) => {
                finished.push(result);
                false
            }
            None => true,
        });

        for result in finished {
            self.status = Some(match result {
                Ok(saved) => StatusMessage::info(format!(
                    "Saved {} ({})",
                    saved.path.display(),
                    format_file_size(saved.bytes)
                )),
                Err(e) => {
                    tracing::warn!(error = %e, "download failed");
                    StatusMessage::error(e.to_string())
                }
            });
        }
    }

    /// Returns `false` when the application should quit
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match self.mode {
            InputMode::Welcome => {
                self.dismiss_welcome();
                return true;
            }
            InputMode::Help => {
                // Any key closes help
                self.mode = InputMode::Browsing;
                return true;
            }
            InputMode::Searching => {
                match handle_search_input(key) {
                    KeyAction::SearchInput(c) => self.gallery.push_query_char(c),
                    KeyAction::SearchBackspace => self.gallery.pop_query_char(),
                    KeyAction::SearchDone => self.mode = InputMode::Browsing,
                    KeyAction::Quit => return false,
                    _ => {}
                }
                return true;
            }
            InputMode::Browsing => {}
        }

        self.status = None;

        if self.gallery.is_viewer_open() {
            match handle_viewer_input(key) {
                KeyAction::CloseViewer => self.gallery.close_viewer(),
                KeyAction::Download => {
                    if let Some(idx) = self.gallery.viewer_item().map(|item| item.idx) {
                        self.start_download(idx);
                    }
                }
                KeyAction::Play => self.play_open_item(),
                KeyAction::Help => self.mode = InputMode::Help,
                KeyAction::Quit => return false,
                _ => {}
            }
            return true;
        }

        let columns = self.frame.columns.max(1) as isize;
        match handle_key_event(key) {
            KeyAction::Quit => return false,
            KeyAction::Left => self.gallery.move_selection(-1),
            KeyAction::Right => self.gallery.move_selection(1),
            KeyAction::Up => self.gallery.move_selection(-columns),
            KeyAction::Down => self.gallery.move_selection(columns),
            KeyAction::Open => {
                if self.gallery.open_selected() {
                    self.autoplay();
                }
            }
            KeyAction::Download => {
                if let Some(idx) = self.gallery.selected_item().map(|item| item.idx) {
                    self.start_download(idx);
                }
            }
            KeyAction::FocusSearch => self.mode = InputMode::Searching,
            KeyAction::NextFilter => self.gallery.cycle_filter(true),
            KeyAction::PreviousFilter => self.gallery.cycle_filter(false),
            KeyAction::ToggleSort => self.gallery.toggle_sort(),
            KeyAction::Help => self.mode = InputMode::Help,
            _ => {}
        }
        true
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }

        match self.mode {
            InputMode::Welcome => return self.dismiss_welcome(),
            InputMode::Help => {
                self.mode = InputMode::Browsing;
                return;
            }
            InputMode::Searching | InputMode::Browsing => {}
        }

        let target = self.frame.hits.hit(mouse.column, mouse.row);
        let outcome = self.gallery.click(target);
        tracing::debug!(?target, ?outcome, "click");

        if outcome != ClickOutcome::FocusSearch {
            self.mode = InputMode::Browsing;
        }

        match outcome {
            ClickOutcome::OpenViewer(_) => self.autoplay(),
            ClickOutcome::Download(idx) => self.start_download(idx),
            ClickOutcome::FocusSearch => self.mode = InputMode::Searching,
            ClickOutcome::CloseViewer
            | ClickOutcome::CycleFilter
            | ClickOutcome::ToggleSort
            | ClickOutcome::Nothing => {}
        }
    }

    fn dismiss_welcome(&mut self) {
        self.mode = InputMode::Browsing;

        // Mark welcome as shown and persist
        self.user_config.welcome_shown = true;
        if let Err(e) = self.user_config.save() {
            tracing::warn!(error = %e, "failed to save user config");
        }
    }

    fn start_download(&mut self, idx: usize) {
        let Some(item) = self.gallery.item(idx) else {
            return;
        };
        let link = item.download_link();
        let source = self.gallery.resolve(&link.href);
        let dest = download::resolve_download_dir(
            self.config.download_dir.as_deref(),
            self.user_config.download_dir.as_deref(),
        );

        self.status = Some(StatusMessage::info(format!(
            "Downloading {}…",
            download::sanitize_file_name(&link.suggested_name)
        )));
        self.downloads
            .push(self.loader.spawn(download::download(source, link, dest)));
    }

    fn autoplay(&mut self) {
        let enabled = self.config.autoplay && self.user_config.autoplay;
        let autoplays = self
            .gallery
            .viewer_view()
            .is_some_and(|view| view.presentation.autoplays());
        if enabled && autoplays {
            self.play_open_item();
        }
    }

    fn play_open_item(&mut self) {
        let Some(view) = self.gallery.viewer_view() else {
            return;
        };
        let Some(src) = view.presentation.playable_src() else {
            return;
        };

        self.status = Some(match player::play(&self.gallery.resolve(src)) {
            Ok(()) => StatusMessage::info(format!("Playing {}", view.title)),
            Err(e) => {
                tracing::warn!(error = %e, "player launch failed");
                StatusMessage::error(e.to_string())
            }
        });
    }
}
