//! Typewriter Demo: a console panel fed in bursts, paced by a wall clock.
//!
//! Lines of log-like text arrive at irregular times. Watch the reveal speed
//! up when a burst lands and slow down again when only a few words are left.
//!
//! Press 'q' or Escape to quit. Set `RUST_LOG=typewriter=debug` and redirect
//! stderr to a file to see the scheduler's logs.

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, style::Print};
use std::io::{self, Write};
use std::rc::Rc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use typewriter::{ConsoleConfig, FrameTicker, TerminalSink, TickerActor, TypewriterConsole};

const ROWS: u16 = 8;
const COLS: u16 = 40;

/// (frame to send at, text)
const SCRIPT: &[(u64, &str)] = &[
    (30, "booting typewriter console\n"),
    (90, "checking grid... ok\n"),
    (100, "checking ticker... ok\n"),
    (200, "a long burst arrives all at once and the whole backlog is re-paced to finish inside the same two second window\n"),
    (330, "quiet.\n"),
    (420, "wrap test: abcdefghijklmnopqrstuvwxyz0123456789ABCDEFGHIJ\n"),
    (520, "done. press q to quit\n"),
];

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, Print("Typewriter Demo (q to quit)"))?;

    let result = run(&mut stdout);

    execute!(stdout, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

fn run(stdout: &mut io::Stdout) -> io::Result<()> {
    let ticker = Rc::new(FrameTicker::new());
    let sink = TerminalSink::new(ROWS, COLS, 2, 2);
    let config = ConsoleConfig::new(ROWS, COLS, 2000.0, 10);
    let mut console = TypewriterConsole::initialize(config, sink, ticker.clone())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let clock = TickerActor::spawn(Duration::from_millis(16))?;
    let mut script = SCRIPT.iter().peekable();

    while let Ok(tick) = clock.receiver().recv() {
        while let Some((at, text)) = script.peek() {
            if *at > tick.frame {
                break;
            }
            console
                .append(text)
                .map_err(io::Error::other)?;
            script.next();
        }

        ticker.advance(tick.delta_ms());
        // Catch up on ticks that queued while the last frame was presented
        clock.forward_to(&ticker);

        console
            .with_sink_mut(|sink| sink.present(stdout))
            .map_err(io::Error::other)??;

        if event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press
                    && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
                {
                    break;
                }
            }
        }
    }

    clock.join();
    console
        .with_sink_mut(|sink| sink.restore(stdout))
        .map_err(io::Error::other)??;
    console.release();
    stdout.flush()
}
