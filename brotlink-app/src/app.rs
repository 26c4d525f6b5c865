use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::stream::FuturesUnordered;
use futures_util::{FutureExt, StreamExt};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use brotlink_client::{
    BackendTransport, BenchmarkResult, Dispatcher, HttpTransport, InputBindings, Outcome,
    PointerEvent, RenderResult, TransportError,
};
use brotlink_core::{CoreError, Surface, ViewStateStore};

use crate::input::{parse_command, Command, HELP};
use crate::io_worker::spawn_io_worker;
use crate::preferences::{images_directory, AppPreferences};
use crate::presenter::ConsolePresenter;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A dispatch that has run to completion.
enum Finished {
    Render(Outcome<RenderResult>),
    Benchmark(Outcome<BenchmarkResult>),
}

type Pending<'a> = FuturesUnordered<BoxFuture<'a, Finished>>;

/// Read commands from stdin until `quit` or end of input, keeping any
/// number of dispatches in flight while doing so.
pub(crate) async fn run(mut prefs: AppPreferences) -> Result<(), AppError> {
    let transport = HttpTransport::new(&prefs.transport_config())?;
    info!("Backend at {}", transport.base_url());

    let images = if prefs.save_images {
        let dir = images_directory();
        info!("Saving frames to {}", dir.display());
        Some((dir, spawn_io_worker()?))
    } else {
        None
    };
    let presenter = Arc::new(ConsolePresenter::new(images));
    let dispatcher = Dispatcher::new(transport, presenter).with_timeout(prefs.request_timeout());
    let store = ViewStateStore::new(prefs.initial_view());
    let bindings = InputBindings::new(store, dispatcher);
    let surface = Surface::new(prefs.surface_width, prefs.surface_height)?;

    let mut pending: Pending<'_> = FuturesUnordered::new();
    pending.push(bindings.initial_render().map(Finished::Render).boxed());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut input_open = true;

    loop {
        tokio::select! {
            line = lines.next_line(), if input_open => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        debug!("End of input, waiting for {} dispatch(es)", pending.len());
                        input_open = false;
                        continue;
                    }
                    Err(e) => return Err(e.into()),
                };
                let command = match parse_command(&line) {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(e) => {
                        warn!("{e}");
                        continue;
                    }
                };
                if command == Command::Quit {
                    break;
                }
                execute(command, &bindings, &surface, &mut prefs, &mut pending)?;
            }
            Some(finished) = pending.next(), if !pending.is_empty() => settle(finished),
            else => break,
        }
    }

    if !pending.is_empty() {
        debug!("Abandoning {} dispatch(es)", pending.len());
    }
    Ok(())
}

fn execute<'a, T: BackendTransport>(
    command: Command,
    bindings: &'a InputBindings<T>,
    surface: &Surface,
    prefs: &mut AppPreferences,
    pending: &mut Pending<'a>,
) -> Result<(), AppError> {
    let render = match command {
        Command::IterDrag(v) => {
            println!("iterations: {}", bindings.iter_slider_input(prefs.clamp_iter(v)));
            return Ok(());
        }
        Command::PrecisionDrag(v) => {
            let label = bindings.precision_slider_input(prefs.clamp_precision(v));
            println!("precision: {label}");
            return Ok(());
        }
        Command::Iter(v) => bindings.iter_slider_change(prefs.clamp_iter(v)).boxed(),
        Command::Precision(v) => bindings
            .precision_slider_change(prefs.clamp_precision(v))
            .boxed(),
        Command::Color(scheme) => bindings.color_scheme_change(scheme).boxed(),
        Command::Mode(mode) => bindings.render_mode_change(mode).boxed(),
        Command::Preset(preset) => bindings.preset(preset).boxed(),
        Command::Reset => bindings.reset().boxed(),
        Command::Click { x, y, button } => bindings
            .pointer(PointerEvent {
                x,
                y,
                surface: *surface,
                button,
            })
            .boxed(),
        Command::Key(key) => match bindings.key(key) {
            Some(render) => render.boxed(),
            None => {
                debug!(?key, "Key ignored");
                return Ok(());
            }
        },
        Command::Benchmark => {
            pending.push(bindings.benchmark().map(Finished::Benchmark).boxed());
            return Ok(());
        }
        Command::State => {
            println!("{}", serde_json::to_string_pretty(&bindings.store().get())?);
            return Ok(());
        }
        Command::Save => {
            prefs.remember_controls(&bindings.store().get());
            prefs.save();
            return Ok(());
        }
        Command::Help => {
            println!("{HELP}");
            return Ok(());
        }
        Command::Quit => return Ok(()),
    };
    pending.push(render.map(Finished::Render).boxed());
    Ok(())
}

fn settle(finished: Finished) {
    match finished {
        Finished::Render(Outcome::Superseded) | Finished::Benchmark(Outcome::Superseded) => {
            debug!("Superseded dispatch finished");
        }
        Finished::Render(outcome) => {
            if let Some(result) = outcome.into_result() {
                debug!(mode = %result.mode_used, "View updated");
            }
        }
        Finished::Benchmark(Outcome::Applied(result)) => println!("{}", result.label()),
        Finished::Benchmark(Outcome::Failed(e)) => debug!("Benchmark failed: {e}"),
    }
}
