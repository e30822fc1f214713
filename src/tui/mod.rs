pub mod app;
pub mod event;
pub mod layout;
pub mod text;

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::app::{AppContext, Result};
use crate::domain::SearchState;
use crate::search::{SearchEvent, SearchHandle};

use self::app::TuiApp;
use self::event::{Action, AppEvent, EventHandler};

type Tui = Terminal<CrosstermBackend<Stdout>>;

pub async fn run(ctx: Arc<AppContext>) -> Result<()> {
    let session = ctx.start_session();
    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, &ctx, &session).await;
    session.shutdown();
    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_app(terminal: &mut Tui, ctx: &AppContext, session: &SearchHandle) -> Result<()> {
    let mut tui_app = TuiApp::new();
    let event_handler = EventHandler::new(Duration::from_millis(50));

    loop {
        let state = session.state();
        tui_app.sync(&state);

        terminal.draw(|frame| {
            layout::render(
                frame,
                &mut tui_app,
                &state,
                &ctx.config.colors,
                ctx.probe.as_ref(),
            )
        })?;

        match event_handler.next()? {
            AppEvent::Key(key) => handle_action(Action::from(key), &mut tui_app, &state, session),
            AppEvent::Tick => {}
        }

        if tui_app.should_quit {
            break;
        }

        tokio::task::yield_now().await;
    }

    Ok(())
}

/// Translate a key action into local UI changes and session events.
pub fn handle_action(action: Action, tui_app: &mut TuiApp, state: &SearchState, session: &SearchHandle) {
    tui_app.clear_status();

    // The error dialog is modal.
    if state.error.is_some() {
        match action {
            Action::Select | Action::Back => session.dispatch(SearchEvent::ErrorDismissed),
            Action::Quit => tui_app.should_quit = true,
            _ => {}
        }
        return;
    }

    match action {
        Action::Quit => {
            tui_app.should_quit = true;
        }
        Action::Input(c) => {
            let query = tui_app.push_char(c);
            session.dispatch(SearchEvent::QueryChanged(query));
        }
        Action::Backspace => {
            if let Some(query) = tui_app.pop_char() {
                session.dispatch(SearchEvent::QueryChanged(query));
            }
        }
        Action::ClearQuery => {
            if tui_app.clear_input() {
                session.dispatch(SearchEvent::QueryChanged(String::new()));
            }
        }
        Action::MoveUp => tui_app.move_up(),
        Action::MoveDown => tui_app.move_down(state.results.len()),
        Action::MoveLeft => tui_app.move_left(),
        Action::MoveRight => tui_app.move_right(state.results.len()),
        Action::Select => {
            if let Some(item) = tui_app.highlighted(state) {
                session.dispatch(SearchEvent::UpdateCurrentItem(item.clone()));
                tui_app.detail_open = true;
            }
        }
        Action::Back => {
            if tui_app.detail_open {
                tui_app.detail_open = false;
            } else {
                tui_app.should_quit = true;
            }
        }
        Action::Refresh => {
            session.dispatch(SearchEvent::InitiateSearch(state.query.clone()));
        }
        Action::OpenImage => {
            let item = if tui_app.detail_open {
                state.current_item.as_ref()
            } else {
                tui_app.highlighted(state)
            };
            if let Some(item) = item {
                if let Err(e) = open::that(&item.image_link) {
                    tui_app.set_status(format!("Failed to open image: {}", e));
                }
            }
        }
        Action::None => {}
    }
}
