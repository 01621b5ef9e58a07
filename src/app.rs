// Copyright (c) 2026 rezky_nightky

use std::io::IsTerminal;
use std::thread;

use crossterm::event::Event;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::config::{Tuning, FRAME_PERIOD, INPUT_POLL_INTERVAL, INPUT_QUEUE_DEPTH};
use crate::error::AppError;
use crate::frame::Frame;
use crate::glyphs::GlyphSet;
use crate::input::{is_quit, CrosstermEvents, InputPump};
use crate::layout::Layout;
use crate::palette::Palette;
use crate::terminal::Terminal;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Initializing,
    Running,
    Draining,
    Terminated,
}

impl Phase {
    fn next(self) -> Self {
        match self {
            Phase::Initializing => Phase::Running,
            Phase::Running => Phase::Draining,
            Phase::Draining | Phase::Terminated => Phase::Terminated,
        }
    }

    fn advance(&mut self) {
        let from = *self;
        *self = from.next();
        debug!(?from, to = ?*self, "phase");
    }
}

/// One animation session as seen by the phase machine.
pub trait Session {
    /// Produces one frame. `Ok(false)` asks to stop.
    fn tick(&mut self) -> Result<bool, AppError>;

    /// Stops the input producer and waits for it.
    fn drain(&mut self);
}

struct Live {
    term: Terminal,
    frame: Frame,
    layout: Layout,
    input: InputPump,
}

impl Session for Live {
    fn tick(&mut self) -> Result<bool, AppError> {
        thread::sleep(FRAME_PERIOD);

        render(&mut self.layout, &mut self.frame, self.term.size()?);
        if self.frame.has_changes() {
            self.term.draw(&mut self.frame)?;
        }

        if quit_requested(|| self.input.try_next()) {
            return Ok(false);
        }
        if self.input.is_finished() {
            return Err(AppError::InputClosed);
        }

        self.layout.update();
        Ok(true)
    }

    fn drain(&mut self) {
        self.input.shutdown();
    }
}

/// Runs the animation until a quit key arrives. The terminal is restored
/// when the session is dropped, after input has been drained.
pub fn run(glyphs: GlyphSet, palette: Palette, rng: StdRng) -> Result<(), AppError> {
    if !std::io::stdout().is_terminal() {
        return Err(AppError::NotATerminal);
    }
    let term = Terminal::new()?;
    let (w, h) = term.size()?;
    let frame = Frame::new(w, h);
    let layout = Layout::new(&frame, glyphs, palette, Tuning::default(), rng);
    let input = InputPump::spawn(CrosstermEvents, INPUT_QUEUE_DEPTH, INPUT_POLL_INTERVAL)
        .map_err(AppError::InputThread)?;
    info!(width = w, height = h, "rain started");

    let mut live = Live {
        term,
        frame,
        layout,
        input,
    };
    let outcome = drive(&mut live);
    drop(live);
    info!("rain stopped");
    outcome
}

/// Steps `session` through the phases until `Terminated`. Every path out of
/// `Running` passes through `Draining`.
pub fn drive<S: Session>(session: &mut S) -> Result<(), AppError> {
    let mut phase = Phase::Initializing;
    let mut outcome = Ok(());
    loop {
        match phase {
            Phase::Initializing => phase.advance(),
            Phase::Running => match session.tick() {
                Ok(true) => {}
                Ok(false) => phase.advance(),
                Err(e) => {
                    outcome = Err(e);
                    phase.advance();
                }
            },
            Phase::Draining => {
                session.drain();
                phase.advance();
            }
            Phase::Terminated => return outcome,
        }
    }
}

/// Sizes the frame to the terminal, resyncs the layout (rebuilding it on a
/// size change) and paints the rain into the frame.
pub fn render(layout: &mut Layout, frame: &mut Frame, (w, h): (u16, u16)) {
    if (frame.width, frame.height) != (w, h) {
        *frame = Frame::new(w, h);
    }
    if layout.sync(frame) {
        info!(width = w, height = h, "terminal resized");
        layout.rebuild();
    }
    layout.draw(frame);
}

/// Drains whatever input is pending. Never waits.
pub fn quit_requested(mut next: impl FnMut() -> Option<Event>) -> bool {
    while let Some(ev) = next() {
        if is_quit(&ev) {
            info!("quit key received");
            return true;
        }
        if let Event::Resize(w, h) = ev {
            debug!(width = w, height = h, "resize event");
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Surface;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use rand::SeedableRng;

    fn layout_for(frame: &Frame) -> Layout {
        Layout::new(
            frame,
            GlyphSet::standard().clone(),
            Palette::default(),
            Tuning::default(),
            StdRng::seed_from_u64(21),
        )
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn phases_run_in_order_and_stop_at_terminated() {
        let mut phase = Phase::Initializing;
        let mut seen = vec![phase];
        for _ in 0..4 {
            phase.advance();
            seen.push(phase);
        }
        assert_eq!(
            seen,
            vec![
                Phase::Initializing,
                Phase::Running,
                Phase::Draining,
                Phase::Terminated,
                Phase::Terminated,
            ]
        );
    }

    /// Runs a fixed number of frames, then stops or fails.
    struct Scripted {
        frames: usize,
        fail: bool,
        ticks: usize,
        drained_after: Option<usize>,
    }

    impl Scripted {
        fn new(frames: usize, fail: bool) -> Self {
            Self {
                frames,
                fail,
                ticks: 0,
                drained_after: None,
            }
        }
    }

    impl Session for Scripted {
        fn tick(&mut self) -> Result<bool, AppError> {
            assert!(self.drained_after.is_none(), "tick after drain");
            self.ticks += 1;
            if self.ticks < self.frames {
                return Ok(true);
            }
            if self.fail {
                return Err(AppError::InputClosed);
            }
            Ok(false)
        }

        fn drain(&mut self) {
            assert!(self.drained_after.is_none(), "drained twice");
            self.drained_after = Some(self.ticks);
        }
    }

    #[test]
    fn drive_ticks_until_quit_then_drains_once() {
        let mut session = Scripted::new(5, false);
        assert!(drive(&mut session).is_ok());
        assert_eq!(session.ticks, 5);
        assert_eq!(session.drained_after, Some(5));
    }

    #[test]
    fn drive_drains_before_reporting_a_frame_error() {
        let mut session = Scripted::new(3, true);
        let err = drive(&mut session).unwrap_err();
        assert!(matches!(err, AppError::InputClosed));
        assert_eq!(session.drained_after, Some(3));
    }

    #[test]
    fn quit_check_drains_until_a_quit_key() {
        let mut events = vec![
            Event::Resize(10, 10),
            key(KeyCode::Char('a')),
            key(KeyCode::Esc),
            key(KeyCode::Char('b')),
        ]
        .into_iter();
        assert!(quit_requested(|| events.next()));
        assert_eq!(events.next(), Some(key(KeyCode::Char('b'))));
    }

    #[test]
    fn quit_check_without_events_returns_immediately() {
        assert!(!quit_requested(|| None));
        let mut events = vec![key(KeyCode::Char('x'))].into_iter();
        assert!(!quit_requested(|| events.next()));
    }

    #[test]
    fn render_follows_terminal_resizes() {
        let mut frame = Frame::new(20, 8);
        let mut layout = layout_for(&frame);

        render(&mut layout, &mut frame, (20, 8));
        assert_eq!(layout.cols.len(), 20);

        render(&mut layout, &mut frame, (33, 12));
        assert_eq!(frame.size(), (33, 12));
        assert_eq!(layout.cols.len(), 33);
        assert_eq!(layout.sparks.len(), 3);
        assert!(frame.is_dirty_all());
    }

    #[test]
    fn redraw_is_stable_and_updates_touch_only_the_rain() {
        let mut frame = Frame::new(40, 20);
        let mut layout = layout_for(&frame);
        render(&mut layout, &mut frame, (40, 20));
        let first: Vec<_> = (0..20)
            .flat_map(|y| (0..40).map(move |x| (x, y)))
            .map(|(x, y)| frame.get(x, y).copied())
            .collect();

        render(&mut layout, &mut frame, (40, 20));
        let second: Vec<_> = (0..20)
            .flat_map(|y| (0..40).map(move |x| (x, y)))
            .map(|(x, y)| frame.get(x, y).copied())
            .collect();
        assert_eq!(first, second);
        frame.clear_dirty();

        layout.update();
        render(&mut layout, &mut frame, (40, 20));
        assert!(frame.has_changes());
        assert!(frame.dirty_indices().len() < 40 * 20);
    }

    #[test]
    fn long_headless_run_survives_resizes() {
        let mut frame = Frame::new(30, 10);
        let mut layout = layout_for(&frame);
        let sizes = [(30, 10), (5, 3), (80, 24), (1, 1), (0, 0), (50, 40)];
        for (i, &size) in sizes.iter().cycle().take(600).enumerate() {
            let size = if i % 50 == 0 { size } else { (frame.width, frame.height) };
            render(&mut layout, &mut frame, size);
            layout.update();
            assert_eq!(layout.cols.len(), frame.width as usize);
            assert!(layout.cols.iter().all(|c| !c.raindrops.is_empty()));
        }
    }
}
