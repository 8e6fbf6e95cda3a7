// Copyright (c) 2026 glyphfall contributors

mod charset;
mod config;
mod droplet;
mod mask;
mod palette;
mod rain;
mod terminal;
mod viewport;

use std::io::{self, IsTerminal};
use std::sync::mpsc::TryRecvError;
use std::time::{Duration, Instant};

#[cfg(unix)]
use std::thread;

use clap::Parser;
use crossterm::event::{Event, KeyEventKind};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

use crate::charset::CharGen;
use crate::config::{Args, MaskSettings, Settings};
use crate::mask::{MaskError, MaskGrid, Stencil};
use crate::palette::trail_color;
use crate::rain::Rain;
use crate::terminal::{restore_terminal_best_effort, Terminal};

const TARGET_FPS: f64 = 60.0;

// stdout belongs to the animation; logs go to stderr, off by default.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}

// A failed grid clears the stencil rather than leaving stale suppression.
fn install_stencil(
    rain: &mut Rain,
    mask: &MaskSettings,
    result: Result<MaskGrid, MaskError>,
    width: u16,
    height: u16,
) {
    let built = result.and_then(|grid| {
        Stencil::build(
            &grid,
            width,
            height,
            mask.offset_row,
            mask.offset_col,
            mask.inverted,
        )
    });
    match built {
        Ok(stencil) => {
            debug!("mask stencil installed");
            rain.install_stencil(Some(stencil));
        }
        Err(e) => {
            warn!("mask unavailable, raining without it: {}", e);
            rain.install_stencil(None);
        }
    }
}

fn main() -> io::Result<()> {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal_best_effort();
        eprintln!("{}", info);
    }));

    #[cfg(unix)]
    {
        if let Ok(mut signals) = Signals::new([SIGINT, SIGTERM, SIGHUP]) {
            thread::spawn(move || {
                if let Some(sig) = signals.forever().next() {
                    restore_terminal_best_effort();
                    let code = if sig == SIGINT { 0 } else { 128 + sig };
                    std::process::exit(code);
                }
            });
        }
    }

    #[cfg(windows)]
    {
        if let Err(e) = ctrlc::set_handler(|| {
            restore_terminal_best_effort();
            std::process::exit(0);
        }) {
            eprintln!("failed to install Ctrl-C handler: {}", e);
        }
    }

    init_logging();

    let args = Args::parse();
    let settings = match Settings::resolve(args) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    if !io::stdout().is_terminal() {
        eprintln!("stdout is not a terminal");
        std::process::exit(1);
    }

    if settings.print_mask {
        // Settings::resolve rejects --print-mask without a mask path.
        if let Some(m) = &settings.mask {
            let (cols, rows) = crossterm::terminal::size()?;
            match mask::render_grid(&m.path, cols, rows, m.font_ratio) {
                Ok(grid) => print!("{}", mask::printout(&grid, m.offset_row, m.offset_col)),
                Err(e) => {
                    eprintln!("failed to render mask {}: {}", m.path.display(), e);
                    std::process::exit(1);
                }
            }
        }
        return Ok(());
    }

    let mut term = Terminal::new()?;
    let (mut width, mut height) = term.size()?;

    let chargen = CharGen::new(settings.char_range, settings.file_chars.clone());
    let mut rain = Rain::new(
        chargen,
        trail_color(settings.color),
        settings.direction.is_horizontal(),
        StdRng::from_os_rng(),
    );
    rain.resize(width, height);

    let mut mask_rx = settings
        .mask
        .as_ref()
        .map(|m| mask::spawn_render(m.path.clone(), width, height, m.font_ratio));

    debug!(
        width,
        height,
        horizontal = settings.direction.is_horizontal(),
        "rain session started"
    );

    let target_period = Duration::from_secs_f64(1.0 / TARGET_FPS);
    let mut next_frame = Instant::now();
    let mut raining = true;

    while raining {
        let mut pending_resize: Option<(u16, u16)> = None;

        loop {
            while Terminal::poll_event(Duration::from_millis(0))? {
                match Terminal::read_event()? {
                    Event::Resize(nw, nh) => {
                        pending_resize = Some((nw, nh));
                    }
                    Event::Key(k) if k.kind == KeyEventKind::Press => {
                        raining = false;
                    }
                    _ => {}
                }
            }

            if !raining || pending_resize.is_some() {
                break;
            }

            let now = Instant::now();
            if now >= next_frame {
                break;
            }
            let _ = Terminal::poll_event(next_frame - now)?;
        }

        if !raining {
            break;
        }

        if let Some((nw, nh)) = pending_resize {
            width = nw;
            height = nh;
            debug!(width, height, "terminal resized");
            rain.resize(width, height);
            term.clear()?;
            if let Some(m) = &settings.mask {
                mask_rx = Some(mask::spawn_render(m.path.clone(), width, height, m.font_ratio));
            }
        }

        // The stencil goes live on whichever frame the grid arrives.
        if let Some(rx) = mask_rx.take() {
            match rx.try_recv() {
                Ok(result) => {
                    if let Some(m) = &settings.mask {
                        install_stencil(&mut rain, m, result, width, height);
                    }
                }
                Err(TryRecvError::Empty) => mask_rx = Some(rx),
                Err(TryRecvError::Disconnected) => {}
            }
        }

        rain.render_frame(&mut term)?;

        next_frame += target_period;
        let now = Instant::now();
        if now > next_frame {
            next_frame = now;
        }
    }

    debug!("rain session ended");

    Ok(())
}
