use std::sync::Mutex;
use std::time::Instant;

use crate::schedule::policy::classify;

struct Running {
    epoch: Instant,
    /// Seconds already elapsed when the timer started counting.
    base: u64,
}

/// Elapsed-time authority for class mode.
///
/// The timer owns the single `elapsed_seconds` accessor; everything that
/// needs "time since class start" asks here instead of keeping its own
/// counter. Selecting a class mode restarts it, either from zero or from
/// the seconds already elapsed since the configured start instant.
pub struct ClassTimer {
    running: Mutex<Option<Running>>,
}

impl ClassTimer {
    pub fn new() -> Self {
        Self {
            running: Mutex::new(None),
        }
    }

    /// Begin counting from zero, now.
    pub fn start(&self) {
        self.start_with_elapsed(0);
    }

    /// Begin counting as if `base` seconds had already elapsed. Used
    /// when the kiosk enters class mode after the class's configured
    /// start time has passed.
    pub fn start_with_elapsed(&self, base: u64) {
        *self.running.lock().unwrap() = Some(Running {
            epoch: Instant::now(),
            base,
        });
    }

    pub fn stop(&self) {
        *self.running.lock().unwrap() = None;
    }

    /// Zero the elapsed time while keeping the timer running. No-op when
    /// stopped.
    pub fn reset(&self) {
        let mut running = self.running.lock().unwrap();
        if running.is_some() {
            *running = Some(Running {
                epoch: Instant::now(),
                base: 0,
            });
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.lock().unwrap().is_some()
    }

    /// Whole seconds since the (possibly offset) start, or `None` when
    /// the timer is stopped.
    pub fn elapsed_seconds(&self) -> Option<u64> {
        self.running
            .lock()
            .unwrap()
            .as_ref()
            .map(|r| r.base + r.epoch.elapsed().as_secs())
    }
}

impl Default for ClassTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// One status line per tick: mode, elapsed mm:ss, current time band.
pub fn render_status(label: &str, elapsed_seconds: u64) -> String {
    let minutos = elapsed_seconds / 60;
    let segundos = elapsed_seconds % 60;
    format!(
        "Modo: {} | Tiempo: {}:{:02} | {}",
        label,
        minutos,
        segundos,
        classify(elapsed_seconds).status_text()
    )
}
