pub mod app;
mod terminal;
mod views;
mod widgets;

use app::App;
use crossterm::event::{self, Event};
use std::path::PathBuf;
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

pub fn run(path: String) -> anyhow::Result<()> {
    // Open the store before touching the terminal so errors print normally
    let mut app = App::new(&PathBuf::from(path))?;

    terminal::install_panic_hook();
    let mut session = terminal::Session::start()?;

    while !app.should_quit {
        session.terminal.draw(|frame| app.view(frame))?;

        if let Some(ev) = poll_event()? {
            let msg = app.handle_event(ev);
            app.update(msg);
        }
    }

    session.finish()
}

fn poll_event() -> anyhow::Result<Option<Event>> {
    if event::poll(POLL_INTERVAL)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}
