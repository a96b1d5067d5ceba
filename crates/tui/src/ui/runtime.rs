//! Runtime: unified event loop and input routing for the TUI.
//!
//! Responsibilities
//! - Own the terminal lifecycle (enter/leave alternate screen, raw mode).
//! - Drive a single event loop over input, ticks, finished submissions, and
//!   embedded checkout prompts.
//! - Route keys through `MainView` and execute returned `Effect`s.
//!
//! Input comes from a dedicated OS thread that blocks on
//! `crossterm::event::read()` and forwards events over a channel. Ticking is
//! fast (100 ms) only while a request runs, so the spinner animates, and slow
//! (5 s) otherwise.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::{StreamExt, stream::FuturesUnordered};
use ratatui::{Terminal, prelude::*};
use regdesk_engine::{ResumeAction, Submitter};
use tokio::task::JoinHandle;
use tokio::{
    signal,
    sync::mpsc,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::app::{App, Effect, ExecOutcome, Msg};
use crate::checkout::{CheckoutPromptRequest, TuiCheckoutWidget};
use crate::cmd;
use crate::ui::main_view::MainView;

type Tui = Terminal<CrosstermBackend<std::io::Stdout>>;

/// Spawn a dedicated input thread that blocks on terminal input and forwards
/// `crossterm` events over a Tokio channel.
fn spawn_input_thread() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(256);
    std::thread::spawn(move || {
        loop {
            match event::read() {
                Ok(event) => {
                    if sender.blocking_send(event).is_err() {
                        break;
                    }
                }
                Err(error) => {
                    warn!("Failed to read event: {}", error);
                    break;
                }
            }
        }
    });
    receiver
}

/// Put the terminal into raw mode and enter the alternate screen.
fn setup_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

/// Restore terminal settings and leave the alternate screen.
fn cleanup_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn render(terminal: &mut Tui, app: &mut App, main_view: &mut MainView) -> Result<()> {
    terminal.draw(|frame| main_view.render(frame, frame.area(), app))?;
    Ok(())
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

fn handle_input_event(app: &mut App, main_view: &mut MainView, input_event: Event) -> Vec<Effect> {
    match input_event {
        Event::Key(key_event) if key_event.kind == KeyEventKind::Press => main_view.handle_key_events(app, key_event),
        Event::Resize(width, height) => main_view.handle_message(app, Msg::Resize(width, height)),
        _ => Vec::new(),
    }
}

/// Execute effects, queueing background work and feeding immediate outcomes back.
fn process_effects(
    app: &mut App,
    main_view: &mut MainView,
    effects: Vec<Effect>,
    pending_execs: &mut FuturesUnordered<JoinHandle<ExecOutcome>>,
) -> Vec<Effect> {
    if effects.is_empty() {
        return Vec::new();
    }
    let command_batch = cmd::run_from_effects(app, effects);
    if !command_batch.pending.is_empty() {
        if !app.executing {
            app.throbber_idx = 0;
        }
        app.executing = true;
        pending_execs.extend(command_batch.pending);
    }
    command_batch
        .immediate
        .into_iter()
        .flat_map(|outcome| main_view.handle_message(app, Msg::ExecCompleted(Box::new(outcome))))
        .collect()
}

/// Entry point for the TUI runtime: sets up the terminal, runs the event
/// loop, and restores the terminal on exit.
pub async fn run_app(submitter: Submitter, startup: ResumeAction) -> Result<()> {
    let mut input_receiver = spawn_input_thread();
    let (checkout_sender, mut checkout_receiver) = mpsc::channel::<CheckoutPromptRequest>(1);
    let widget = Arc::new(TuiCheckoutWidget::new(checkout_sender));

    let mut app = App::new(submitter, widget);
    let mut main_view = MainView::new();
    let mut pending_execs: FuturesUnordered<JoinHandle<ExecOutcome>> = FuturesUnordered::new();
    let mut effects = app.startup_effects(startup);
    info!(effects = effects.len(), "starting registration wizard");

    let mut terminal = setup_terminal()?;

    let fast_interval = Duration::from_millis(100);
    let idle_interval = Duration::from_millis(5000);
    let mut current_interval = idle_interval;
    let mut ticker = time::interval(current_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let result = loop {
        if !effects.is_empty() {
            let queued = std::mem::take(&mut effects);
            effects = process_effects(&mut app, &mut main_view, queued, &mut pending_execs);
        }
        if app.should_quit {
            break Ok(());
        }
        if let Err(error) = render(&mut terminal, &mut app, &mut main_view) {
            break Err(error);
        }

        let target_interval = if app.executing { fast_interval } else { idle_interval };
        if target_interval != current_interval {
            current_interval = target_interval;
            ticker = time::interval(current_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        }

        tokio::select! {
            maybe_event = input_receiver.recv() => {
                let Some(event) = maybe_event else {
                    break Ok(());
                };
                if let Event::Key(key_event) = &event
                    && is_ctrl_c(key_event)
                {
                    break Ok(());
                }
                effects.extend(handle_input_event(&mut app, &mut main_view, event));
            }

            _ = ticker.tick() => {
                effects.extend(main_view.handle_message(&mut app, Msg::Tick));
            }

            Some(joined) = pending_execs.next(), if !pending_execs.is_empty() => {
                let outcome = joined.unwrap_or_else(|error| ExecOutcome::Log(format!("Execution task failed: {error}")));
                effects.extend(main_view.handle_message(&mut app, Msg::ExecCompleted(Box::new(outcome))));
                app.executing = !pending_execs.is_empty();
                if !app.executing {
                    app.throbber_idx = 0;
                }
            }

            Some(prompt) = checkout_receiver.recv() => {
                debug!("embedded checkout requested");
                effects.extend(main_view.handle_message(&mut app, Msg::CheckoutRequested(prompt)));
            }

            _ = signal::ctrl_c() => { break Ok(()); }
        }
    };

    // Dropping the modal cancels a checkout that is still waiting.
    app.modal = None;
    cleanup_terminal(&mut terminal)?;
    result
}
