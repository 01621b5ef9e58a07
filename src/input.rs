// Copyright (c) 2026 rezky_nightky

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::{debug, trace, warn};

/// Where raw terminal events come from.
pub trait EventSource: Send + 'static {
    /// Waits up to `timeout` for one event.
    fn poll(&mut self, timeout: Duration) -> io::Result<Option<Event>>;
}

pub struct CrosstermEvents;

impl EventSource for CrosstermEvents {
    fn poll(&mut self, timeout: Duration) -> io::Result<Option<Event>> {
        if event::poll(timeout)? {
            return event::read().map(Some);
        }
        Ok(None)
    }
}

pub fn is_quit(ev: &Event) -> bool {
    let Event::Key(KeyEvent {
        code,
        modifiers,
        kind,
        ..
    }) = ev
    else {
        return false;
    };
    if *kind != KeyEventKind::Press {
        return false;
    }
    match code {
        KeyCode::Esc => true,
        KeyCode::Char('c') | KeyCode::Char('C') => modifiers.contains(KeyModifiers::CONTROL),
        KeyCode::Char('Q') | KeyCode::Char('q') => true,
        _ => false,
    }
}

/// A background thread that blocks on the event source and hands events to
/// the frame loop through a bounded queue.
pub struct InputPump {
    rx: Option<Receiver<Event>>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl InputPump {
    pub fn spawn<E: EventSource>(
        source: E,
        depth: usize,
        poll_interval: Duration,
    ) -> io::Result<Self> {
        let (tx, rx) = mpsc::sync_channel(depth);
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("input".to_string())
            .spawn(move || pump(source, tx, thread_stop, poll_interval))?;
        debug!(depth, "input thread started");

        Ok(Self {
            rx: Some(rx),
            stop,
            handle: Some(handle),
        })
    }

    /// The next queued event, without waiting.
    pub fn try_next(&self) -> Option<Event> {
        self.rx.as_ref()?.try_recv().ok()
    }

    /// Whether the producer has exited on its own (source error).
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    /// Stops the producer and waits for it to exit.
    pub fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Release);
        self.rx.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("input thread panicked");
            }
            debug!("input thread joined");
        }
    }
}

impl Drop for InputPump {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn pump<E: EventSource>(
    mut source: E,
    tx: SyncSender<Event>,
    stop: Arc<AtomicBool>,
    poll_interval: Duration,
) {
    while !stop.load(Ordering::Acquire) {
        let mut pending = match source.poll(poll_interval) {
            Ok(Some(ev)) => ev,
            Ok(None) => continue,
            Err(e) => {
                warn!(error = %e, "reading terminal events failed");
                return;
            }
        };

        loop {
            match tx.try_send(pending) {
                Ok(()) => break,
                Err(TrySendError::Full(ev)) => {
                    if stop.load(Ordering::Acquire) {
                        return;
                    }
                    trace!("input queue full");
                    pending = ev;
                    thread::sleep(Duration::from_millis(1));
                }
                Err(TrySendError::Disconnected(_)) => return,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::time::Instant;

    struct Scripted {
        events: VecDeque<Event>,
    }

    impl EventSource for Scripted {
        fn poll(&mut self, timeout: Duration) -> io::Result<Option<Event>> {
            match self.events.pop_front() {
                Some(ev) => Ok(Some(ev)),
                None => {
                    thread::sleep(timeout);
                    Ok(None)
                }
            }
        }
    }

    struct Broken;

    impl EventSource for Broken {
        fn poll(&mut self, _timeout: Duration) -> io::Result<Option<Event>> {
            Err(io::Error::other("tty gone"))
        }
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    fn wait_for(pump: &InputPump) -> Option<Event> {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            if let Some(ev) = pump.try_next() {
                return Some(ev);
            }
            thread::sleep(Duration::from_millis(1));
        }
        None
    }

    #[test]
    fn quit_keys() {
        assert!(is_quit(&key(KeyCode::Esc, KeyModifiers::NONE)));
        assert!(is_quit(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(is_quit(&key(KeyCode::Char('Q'), KeyModifiers::SHIFT)));
        assert!(is_quit(&key(KeyCode::Char('q'), KeyModifiers::NONE)));

        assert!(!is_quit(&key(KeyCode::Char('c'), KeyModifiers::NONE)));
        assert!(!is_quit(&key(KeyCode::Char('x'), KeyModifiers::NONE)));
        assert!(!is_quit(&Event::Resize(80, 24)));

        let mut release = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert!(!is_quit(&Event::Key(release)));
    }

    #[test]
    fn forwards_events_in_order() {
        let source = Scripted {
            events: VecDeque::from([
                Event::Resize(100, 40),
                key(KeyCode::Char('x'), KeyModifiers::NONE),
                key(KeyCode::Esc, KeyModifiers::NONE),
            ]),
        };
        let mut pump = InputPump::spawn(source, 8, Duration::from_millis(5)).unwrap();

        assert_eq!(wait_for(&pump), Some(Event::Resize(100, 40)));
        assert_eq!(wait_for(&pump), Some(key(KeyCode::Char('x'), KeyModifiers::NONE)));
        assert!(wait_for(&pump).is_some_and(|ev| is_quit(&ev)));

        pump.shutdown();
        assert!(pump.is_finished());
        assert!(pump.try_next().is_none());
    }

    #[test]
    fn empty_queue_does_not_block() {
        let source = Scripted {
            events: VecDeque::new(),
        };
        let pump = InputPump::spawn(source, 8, Duration::from_millis(5)).unwrap();
        let started = Instant::now();
        assert!(pump.try_next().is_none());
        assert!(started.elapsed() < Duration::from_millis(50));
    }

    #[test]
    fn shutdown_joins_a_producer_stuck_on_a_full_queue() {
        let events = (0..32)
            .map(|_| key(KeyCode::Char('x'), KeyModifiers::NONE))
            .collect();
        let mut pump =
            InputPump::spawn(Scripted { events }, 1, Duration::from_millis(5)).unwrap();
        thread::sleep(Duration::from_millis(20));
        pump.shutdown();
        assert!(pump.is_finished());
    }

    #[test]
    fn source_errors_end_the_producer() {
        let pump = InputPump::spawn(Broken, 4, Duration::from_millis(5)).unwrap();
        let deadline = Instant::now() + Duration::from_secs(2);
        while !pump.is_finished() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
        assert!(pump.is_finished());
        assert!(pump.try_next().is_none());
    }
}
