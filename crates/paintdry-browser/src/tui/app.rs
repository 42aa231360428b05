//! Application state and event loop

use super::input::{InputChange, TextInput};
use super::ui;
use crate::columns::AutosizeOptions;
use crate::config::BrowserConfig;
use crate::fetch::{FetchRequest, FetchResponse, Fetcher};
use crate::nav::{NavigationShell, Section};
use crate::router::parent_path;
use crate::views::{Retarget, View};
use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use paintdry_api::Backend;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Position, Rect},
};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

/// Toast notification state
pub struct Toast {
    pub message: String,
    pub expires_at: Instant,
    pub is_error: bool,
}

impl Toast {
    pub fn new(message: String, duration: Duration) -> Self {
        Self {
            message,
            expires_at: Instant::now() + duration,
            is_error: false,
        }
    }

    pub fn error(message: String, duration: Duration) -> Self {
        Self {
            is_error: true,
            ..Self::new(message, duration)
        }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

const TOAST_DURATION: Duration = Duration::from_secs(3);

/// Screen regions recorded by the last render, for mouse hit-testing
#[derive(Debug, Default, Clone)]
pub struct HitAreas {
    /// One rect per tab, in tab order
    pub tabs: Vec<Rect>,
    /// Data rows of the collection grid (first row at the top)
    pub rows: Option<Rect>,
}

pub struct App {
    pub shell: NavigationShell,
    /// Component mounted for the current route
    pub view: View,
    pub search_input: TextInput,
    pub toast: Option<Toast>,
    pub should_quit: bool,
    pub hits: HitAreas,
    /// When the application started (drives the spinner)
    pub started_at: Instant,
    autosize: AutosizeOptions,
    fetcher: Fetcher,
    response_rx: Receiver<FetchResponse>,
}

impl App {
    pub fn new(backend: Arc<dyn Backend>, autosize: AutosizeOptions, start_path: &str) -> Result<Self> {
        let (fetcher, response_rx) = Fetcher::new(backend);
        let mut app = Self {
            shell: NavigationShell::new(start_path),
            view: View::NotFound(String::new()),
            search_input: TextInput::new(),
            toast: None,
            should_quit: false,
            hits: HitAreas::default(),
            started_at: Instant::now(),
            autosize,
            fetcher,
            response_rx,
        };
        app.remount()?;
        Ok(app)
    }

    /// Replace the mounted view with a fresh one for the current route
    fn remount(&mut self) -> Result<()> {
        let route = self.shell.route();
        log::debug!("mounting {:?}", route);
        self.view.unmount();
        self.view = View::for_route(&route, &self.autosize)?;
        self.search_input.clear();
        if let Some(request) = self.view.mount() {
            self.dispatch(request);
        }
        Ok(())
    }

    /// Bring the mounted view in line with the current route
    fn sync_view(&mut self) -> Result<()> {
        let route = self.shell.route();
        match self.view.retarget(&route) {
            Retarget::Unchanged => Ok(()),
            Retarget::Refetch(request) => {
                self.dispatch(request);
                Ok(())
            }
            Retarget::Replace => self.remount(),
        }
    }

    fn dispatch(&self, request: FetchRequest) {
        log::debug!("request #{} {:?}", request.seq(), request.method);
        self.fetcher.dispatch(request);
    }

    pub fn navigate(&mut self, path: &str) -> Result<()> {
        if self.shell.navigate(path) {
            self.sync_view()?;
        }
        Ok(())
    }

    pub fn select_tab(&mut self, index: usize) -> Result<()> {
        if self.shell.select_tab(index) {
            self.sync_view()?;
        }
        Ok(())
    }

    pub fn back(&mut self) -> Result<()> {
        if self.shell.back() {
            self.sync_view()?;
        }
        Ok(())
    }

    pub fn forward(&mut self) -> Result<()> {
        if self.shell.forward() {
            self.sync_view()?;
        }
        Ok(())
    }

    /// Fetch the current route again
    pub fn reload(&mut self) -> Result<()> {
        self.remount()
    }

    /// Commit every response that has arrived (non-blocking)
    pub fn poll_responses(&mut self) {
        while let Ok(response) = self.response_rx.try_recv() {
            self.commit(response);
        }
    }

    fn commit(&mut self, response: FetchResponse) {
        let seq = response.seq;
        if !self.view.on_response(response) {
            log::debug!("response #{} not committed", seq);
        }
    }

    fn update_toast(&mut self) {
        if self.toast.as_ref().is_some_and(Toast::is_expired) {
            self.toast = None;
        }
    }

    fn activate_row(&mut self, index: Option<usize>) -> Result<()> {
        let View::Collection(table) = &self.view else {
            return Ok(());
        };
        let current = self.shell.current_path().to_string();
        let target = match index {
            Some(index) => table.activate_at(index, &current),
            None => table.activate(&current),
        };
        let ephemeral = match index {
            Some(index) => table.page_rows().get(index),
            None => table.page_rows().get(table.cursor()),
        }
        .is_some_and(|row| row.id.is_ephemeral());

        if let Some(target) = target {
            if ephemeral {
                self.toast = Some(Toast::error(
                    "This row has no id from the backend".to_string(),
                    TOAST_DURATION,
                ));
            }
            self.navigate(&target)?;
        }
        Ok(())
    }

    fn search_changed(&mut self) {
        let term = self.search_input.text.clone();
        if let View::Search(search) = &mut self.view {
            if let Some(request) = search.set_term(&term) {
                self.dispatch(request);
            }
        }
    }

    pub fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => Ok(()),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Keys that work everywhere
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
                self.should_quit = true;
                return Ok(());
            }
            (KeyCode::Tab, _) => {
                let next = (self.shell.active_tab() + 1) % Section::ALL.len();
                return self.select_tab(next);
            }
            (KeyCode::BackTab, _) => {
                let count = Section::ALL.len();
                let prev = (self.shell.active_tab() + count - 1) % count;
                return self.select_tab(prev);
            }
            (KeyCode::F(n), _) if (1..=Section::ALL.len() as u8).contains(&n) => {
                return self.select_tab(n as usize - 1);
            }
            (KeyCode::Left, m) if m.contains(KeyModifiers::ALT) => return self.back(),
            (KeyCode::Right, m) if m.contains(KeyModifiers::ALT) => return self.forward(),
            _ => {}
        }

        match &mut self.view {
            View::Collection(table) => match key.code {
                KeyCode::Up | KeyCode::Char('k') => table.cursor_up(),
                KeyCode::Down | KeyCode::Char('j') => table.cursor_down(),
                KeyCode::PageDown | KeyCode::Right => {
                    table.next_page();
                }
                KeyCode::PageUp | KeyCode::Left => {
                    table.prev_page();
                }
                KeyCode::Enter => return self.activate_row(None),
                KeyCode::Char('r') => return self.reload(),
                KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
                _ => {}
            },
            View::Detail(detail) => match key.code {
                KeyCode::Up | KeyCode::Char('k') => detail.scroll_by(-1),
                KeyCode::Down | KeyCode::Char('j') => detail.scroll_by(1),
                KeyCode::PageUp => detail.scroll_by(-10),
                KeyCode::PageDown => detail.scroll_by(10),
                KeyCode::Esc | KeyCode::Backspace | KeyCode::Left => {
                    let parent = parent_path(self.shell.current_path());
                    return self.navigate(&parent);
                }
                KeyCode::Char('r') => return self.reload(),
                KeyCode::Char('q') => self.should_quit = true,
                _ => {}
            },
            View::Search(search) => match key.code {
                KeyCode::Up => search.scroll_by(-1),
                KeyCode::Down => search.scroll_by(1),
                KeyCode::PageDown => {
                    if let Some(request) = search.next_page() {
                        self.dispatch(request);
                    }
                }
                KeyCode::PageUp => {
                    if let Some(request) = search.prev_page() {
                        self.dispatch(request);
                    }
                }
                KeyCode::Esc => {
                    if self.search_input.clear() {
                        self.search_changed();
                    } else {
                        self.should_quit = true;
                    }
                }
                _ => {
                    if self.search_input.handle_key(key.code, key.modifiers) == InputChange::Edited
                    {
                        self.search_changed();
                    }
                }
            },
            View::NotFound(_) => match key.code {
                KeyCode::Esc | KeyCode::Backspace => return self.back(),
                KeyCode::Char('q') => self.should_quit = true,
                _ => {}
            },
        }
        Ok(())
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Result<()> {
        let position = Position::new(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(index) = self.hits.tabs.iter().position(|r| r.contains(position)) {
                    return self.select_tab(index);
                }
                if let Some(rows) = self.hits.rows.filter(|r| r.contains(position)) {
                    let index = (position.y - rows.y) as usize;
                    return self.activate_row(Some(index));
                }
            }
            MouseEventKind::ScrollDown => self.scroll(1),
            MouseEventKind::ScrollUp => self.scroll(-1),
            _ => {}
        }
        Ok(())
    }

    fn scroll(&mut self, delta: i32) {
        match &mut self.view {
            View::Collection(table) if delta > 0 => table.cursor_down(),
            View::Collection(table) => table.cursor_up(),
            View::Detail(detail) => detail.scroll_by(delta),
            View::Search(search) => search.scroll_by(delta as isize),
            View::NotFound(_) => {}
        }
    }
}

/// Run the interactive browser until the user quits
pub fn run(backend: Arc<dyn Backend>, config: &BrowserConfig, start_path: &str) -> Result<()> {
    let mut app = App::new(backend, config.autosize(), start_path)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = run_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    const FRAME_TIME: Duration = Duration::from_millis(33);

    loop {
        let frame_start = Instant::now();

        // Drain pending input first
        let mut events_processed = 0usize;
        while event::poll(Duration::from_millis(0))? && events_processed < 100 {
            app.handle_event(event::read()?)?;
            events_processed += 1;
            if app.should_quit {
                break;
            }
        }
        if app.should_quit {
            break;
        }

        app.update_toast();
        app.poll_responses();

        terminal.draw(|f| ui::render(f, app))?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_TIME {
            std::thread::sleep(FRAME_TIME - elapsed);
        }
    }

    Ok(())
}

#[cfg(test)]
impl App {
    /// Block until the mounted view stops loading or `timeout` passes
    pub(crate) fn wait_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.view.is_loading() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.response_rx.recv_timeout(remaining) {
                Ok(response) => self.commit(response),
                Err(_) => return false,
            }
        }
        true
    }
}
