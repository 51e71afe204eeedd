pub mod app;
pub mod event;
pub mod layout;

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::app::{AppContext, Result};
use crate::config::Config;
use crate::poller::{PollOutcome, Poller};

use self::app::TuiApp;
use self::event::{Action, AppEvent, EventHandler};

type Tui = Terminal<CrosstermBackend<Stdout>>;

pub async fn run(ctx: Arc<AppContext>) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, ctx).await;
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

async fn run_app(terminal: &mut Tui, ctx: Arc<AppContext>) -> Result<()> {
    let mut config = ctx.config.clone();
    let mut tui_app = TuiApp::new(config.source(), config.magnitude_range(), ctx.user);
    let mut poller = Poller::new(
        ctx.client.clone(),
        tui_app.source,
        ctx.user,
        ctx.thresholds(),
    );
    let event_handler = EventHandler::new(Duration::from_millis(100));

    let poll_interval = Duration::from_secs(config.poll_interval_secs.max(10));
    // First cycle runs immediately on activation
    let mut next_poll = Instant::now();

    loop {
        terminal.draw(|frame| layout::render(frame, &tui_app))?;

        if Instant::now() >= next_poll {
            tui_app.is_polling = true;
            terminal.draw(|frame| layout::render(frame, &tui_app))?;

            run_poll(&mut tui_app, &mut poller, &ctx).await;

            tui_app.is_polling = false;
            next_poll = Instant::now() + poll_interval;
        }

        match event_handler.next()? {
            AppEvent::Key(key) => {
                let action = Action::from(key);

                if tui_app.show_safety_info {
                    // The overlay swallows everything except its dismissal
                    if matches!(action, Action::Quit | Action::Dismiss | Action::SafetyInfo) {
                        tui_app.show_safety_info = false;
                    }
                    continue;
                }

                match action {
                    Action::Quit => {
                        tui_app.should_quit = true;
                    }
                    Action::MoveUp => {
                        tui_app.move_up();
                    }
                    Action::MoveDown => {
                        tui_app.move_down();
                    }
                    Action::CycleSource => {
                        let source = tui_app.source.next();
                        tui_app.source = source;
                        poller.switch_source(source);
                        config.set_source(source);
                        persist(&config, &mut tui_app);
                        // Poll the new source right away
                        next_poll = Instant::now();
                    }
                    Action::SetRange(range) => {
                        tui_app.magnitude_range = range;
                        tui_app.clamp_selection();
                        config.set_magnitude_range(range);
                        persist(&config, &mut tui_app);
                    }
                    Action::TestAlarm => {
                        tui_app.test_alarm_on = ctx.sink.toggle_test();
                        if !tui_app.test_alarm_on {
                            tui_app.set_status("Test alarm stopped".to_string());
                        }
                    }
                    Action::Refresh => {
                        next_poll = Instant::now();
                    }
                    Action::OpenInBrowser => {
                        open_selected(&mut tui_app);
                    }
                    Action::SafetyInfo => {
                        tui_app.show_safety_info = true;
                    }
                    Action::Dismiss => {
                        tui_app.clear_status();
                    }
                    Action::None => {}
                }
            }
            AppEvent::Tick => {}
        }

        if tui_app.should_quit {
            break;
        }
    }

    Ok(())
}

async fn run_poll(tui_app: &mut TuiApp, poller: &mut Poller, ctx: &AppContext) {
    match poller.poll_cycle(ctx.sink.as_ref()).await {
        Ok(PollOutcome::Events { events, evaluation }) => {
            tui_app.events = events;
            tui_app.emergency = evaluation.emergency;
            tui_app.error = None;
            tui_app.clamp_selection();
        }
        Ok(PollOutcome::Stale) => {}
        Err(e) => {
            // A failed poll clears the view; the poller keeps its snapshot
            tui_app.events.clear();
            tui_app.emergency = false;
            tui_app.error = Some(e.to_string());
            tui_app.clamp_selection();
        }
    }
}

fn open_selected(tui_app: &mut TuiApp) {
    let Some((source, url)) = tui_app
        .selected_event()
        .map(|q| (q.source, q.source.event_url(&q.id)))
    else {
        return;
    };
    match url {
        Some(url) => {
            if let Err(e) = open::that(&url) {
                tui_app.set_status(format!("Failed to open browser: {e}"));
            }
        }
        None => {
            tui_app.set_status(format!("{source} events have no detail page"));
        }
    }
}

fn persist(config: &Config, tui_app: &mut TuiApp) {
    if let Err(e) = config.save() {
        tui_app.set_status(format!("Failed to save preferences: {e}"));
    }
}
