use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventKind,
    HandlerResponse, Keybindings, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};
use typedex::action::Action;
use typedex::catalog::load_catalog;
use typedex::config::AppArgs;
use typedex::effect::Effect;
use typedex::logging;
use typedex::reducer::reducer;
use typedex::state::AppState;
use typedex::ui::{TypedexComponentId, TypedexContext, TypedexUi};

#[derive(Parser, Debug)]
#[command(name = "typedex")]
#[command(about = "Pokemon type effectiveness chart")]
struct Args {
    #[command(flatten)]
    app: AppArgs,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();
    logging::init(&args.app.log_file(), args.app.log_level)?;
    let settings = args.app.settings();
    let debug = DebugSession::new(args.debug);

    let state = debug
        .load_state_or_else_async(|| async { Ok::<AppState, io::Error>(AppState::new(settings)) })
        .await
        .map_err(debug_error)?;
    let replay_actions = debug.load_replay_items().map_err(debug_error)?;
    let (middleware, recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions).await;

    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug.save_actions(recorder.as_ref()).map_err(debug_error)?;
    log::logger().flush();
    Ok(())
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(TypedexUi::new()));
    let mut bus: EventBus<AppState, Action, TypedexComponentId, TypedexContext> =
        EventBus::new();
    let keybindings: Keybindings<TypedexContext> = Keybindings::new();

    let ui_chart = Rc::clone(&ui);
    bus.register(TypedexComponentId::Chart, move |event, state| {
        ui_chart
            .borrow_mut()
            .handle_chart_event(&event.kind, state)
    });

    let ui_cards = Rc::clone(&ui);
    bus.register(TypedexComponentId::Cards, move |event, state| {
        ui_cards
            .borrow_mut()
            .handle_cards_event(&event.kind, state)
    });

    let ui_profile = Rc::clone(&ui);
    bus.register(TypedexComponentId::Profile, move |event, state| {
        ui_profile
            .borrow_mut()
            .handle_profile_event(&event.kind, state)
    });

    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(width, height) => {
            HandlerResponse::action(Action::UiTerminalResize(width, height)).with_render()
        }
        EventKind::Key(key) => match key.code {
            crossterm::event::KeyCode::Char('q') => HandlerResponse::action(Action::Quit),
            crossterm::event::KeyCode::Tab => HandlerResponse::action(Action::ViewNext),
            crossterm::event::KeyCode::BackTab => HandlerResponse::action(Action::ViewPrev),
            crossterm::event::KeyCode::Char('r') => HandlerResponse::action(Action::CatalogRetry),
            _ => HandlerResponse::ignored(),
        },
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |_runtime| {},
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            handle_effect,
        )
        .await
}

fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>) {
    match effect {
        Effect::LoadCatalog { loader } => {
            ctx.tasks().spawn(TaskKey::new("catalog"), async move {
                let (source, origin) = loader.build_source();
                match load_catalog(source, origin, loader.timeout).await {
                    Ok(catalog) => Action::CatalogDidLoad(catalog),
                    Err(error) => Action::CatalogDidError(error.to_string()),
                }
            });
        }
    }
}
