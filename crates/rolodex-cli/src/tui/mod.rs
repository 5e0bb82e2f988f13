//! Terminal user interface for rolodex.
//!
//! ## Entry points
//!
//! - [`run_tui`]: full-screen contact list with filtering, add, edit, and
//!   delete.

pub mod command;
pub mod form;
pub mod list;
pub mod worker;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use list::ContactsView;
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use rolodex_core::client::ContactApi;
use rolodex_core::config::ResolvedConfig;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use worker::RequestRunner;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Take over the terminal and run the contact list until the user quits.
pub fn run_tui(api: Arc<dyn ContactApi>, config: &ResolvedConfig) -> Result<()> {
    info!(base_url = %config.base_url, "starting tui");
    let mut view = ContactsView::new(config.vocabulary.clone(), config.confirm_delete);
    let runner = RequestRunner::new(api);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = event_loop(&mut terminal, &mut view, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    info!("tui closed");

    result
}

fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    view: &mut ContactsView,
    runner: &RequestRunner,
) -> Result<()> {
    runner.submit_all(view.start());

    loop {
        terminal.draw(|frame| {
            let area = frame.area();
            view.render(frame, area);
        })?;

        for completion in runner.drain() {
            let follow_ups = view.complete(completion);
            runner.submit_all(follow_ups);
        }

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    let requests = view.handle_key(key);
                    runner.submit_all(requests);
                }
            }
        }

        if view.should_quit() {
            return Ok(());
        }
    }
}
