use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

use crate::access::recorder;
use crate::attendance::engine::{self, FinalState};
use crate::core::error::{AccessError, AttendanceError};
use crate::core::state::AppState;
use crate::kiosk::session::{KioskMode, SessionContext};
use crate::kiosk::timer::{render_status, ClassTimer};
use crate::models::access::AccessKind;
use crate::schedule::policy::{classify, TimeBand};
use crate::utils::time::now_local;

/// Outcome of one kiosk interaction, rendered as the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanFeedback {
    /// A scan is already in flight; nothing was contacted.
    Busy,
    /// Refused by policy; no state changed.
    Rejected(String),
    /// Registered; terminal outcomes also consumed the code.
    Accepted(String),
    /// A store/WAL failure; the scan is treated as failed.
    Failed(String),
}

impl std::fmt::Display for ScanFeedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanFeedback::Busy => f.write_str("Ya hay un proceso en curso..."),
            ScanFeedback::Rejected(msg)
            | ScanFeedback::Accepted(msg)
            | ScanFeedback::Failed(msg) => f.write_str(msg),
        }
    }
}

struct Display {
    status: RwLock<String>,
    /// While true the ticker leaves the last scan result on screen.
    result_hold: AtomicBool,
}

fn idle_status(ctx: &SessionContext, timer: &ClassTimer) -> String {
    match (ctx.is_class(), timer.elapsed_seconds()) {
        (true, Some(elapsed)) => render_status(&ctx.label(), elapsed),
        _ => ctx.banner(),
    }
}

/// The kiosk interaction loop: mode selection, duplicate-scan latch,
/// timer display, and dispatch into the ledger/recorder/state machine.
pub struct ScanController {
    state: Arc<AppState>,
    ctx: Arc<RwLock<SessionContext>>,
    pub timer: Arc<ClassTimer>,
    processing: AtomicBool,
    display: Arc<Display>,
}

impl ScanController {
    pub fn new(state: Arc<AppState>) -> Self {
        let entry_zone = state.config.kiosk.entry_zone.unwrap_or_else(Uuid::nil);
        let zone_nombre = state
            .zone_registry
            .resolve(entry_zone)
            .map(|z| z.nombre)
            .unwrap_or_else(|| "Entrada Principal".to_string());

        let ctx = SessionContext::access(AccessKind::Entrada, entry_zone, zone_nombre);
        let banner = ctx.banner();

        Self {
            state,
            ctx: Arc::new(RwLock::new(ctx)),
            timer: Arc::new(ClassTimer::new()),
            processing: AtomicBool::new(false),
            display: Arc::new(Display {
                status: RwLock::new(banner),
                result_hold: AtomicBool::new(false),
            }),
        }
    }

    pub fn current_status(&self) -> String {
        self.display.status.read().unwrap().clone()
    }

    fn set_status(&self, text: String) {
        *self.display.status.write().unwrap() = text;
    }

    fn access_context(&self, kind: AccessKind, zone_id: Option<Uuid>) -> SessionContext {
        let zone_id = zone_id.unwrap_or_else(Uuid::nil);
        let zone_nombre = self
            .state
            .zone_registry
            .resolve(zone_id)
            .map(|z| z.nombre)
            .unwrap_or_else(|| kind.as_str().to_string());
        SessionContext::access(kind, zone_id, zone_nombre)
    }

    /// Handle a mode command: "entrada", "salida" or "clase N" (1-based
    /// index into the configured classes). Cancels any running timer;
    /// class modes restart it, counting from the class's configured
    /// start instant when that has already passed today.
    pub fn switch_mode(&self, command: &str) -> String {
        let mut initial_elapsed = 0u64;
        let next = match command {
            "entrada" => self.access_context(AccessKind::Entrada, self.state.config.kiosk.entry_zone),
            "salida" => self.access_context(AccessKind::Salida, self.state.config.kiosk.exit_zone),
            other => {
                let Some(raw_index) = other.strip_prefix("clase") else {
                    return format!("Comando no reconocido: {}", other);
                };
                let Ok(index) = raw_index.trim().parse::<usize>() else {
                    return format!("Clase no válida: {}", raw_index.trim());
                };
                let Some(schedule) = index
                    .checked_sub(1)
                    .and_then(|i| self.state.config.classes.get(i))
                    .and_then(|configured| self.state.schedules.get(configured.id))
                else {
                    return format!("Clase no válida: {}", index);
                };

                let now = now_local();
                if schedule.is_scheduled_day(now.date()) {
                    let start = schedule.start_instant(now.date());
                    if now > start {
                        initial_elapsed = (now - start).num_seconds().max(0) as u64;
                    }
                } else {
                    warn!(
                        clase = %schedule.nombre,
                        weekday = schedule.weekday,
                        "Hoy no es el día de esta clase"
                    );
                }
                SessionContext::class(schedule)
            }
        };

        self.timer.stop();
        if next.is_class() {
            self.timer.start_with_elapsed(initial_elapsed);
        }

        let banner = next.banner();
        *self.ctx.write().unwrap() = next;
        self.display.result_hold.store(false, Ordering::SeqCst);
        self.set_status(banner.clone());
        info!(modo = %banner, "Kiosk mode changed");
        banner
    }

    /// Process one scanned code.
    ///
    /// The latch makes duplicate submissions return immediately while a
    /// scan is in flight; after a result, the display auto-clears back
    /// to the idle prompt.
    pub async fn handle_scan(&self, code: &str) -> ScanFeedback {
        if self.processing.swap(true, Ordering::SeqCst) {
            return ScanFeedback::Busy;
        }

        self.set_status("Validando código QR...".to_string());
        let feedback = self.process(code).await;

        self.display.result_hold.store(true, Ordering::SeqCst);
        self.set_status(feedback.to_string());
        self.processing.store(false, Ordering::SeqCst);
        self.schedule_display_clear();

        feedback
    }

    async fn process(&self, code: &str) -> ScanFeedback {
        let state = &self.state;
        state.metrics.increment_scans();

        let Some(code_rec) = state.code_ledger.lookup(code) else {
            state.metrics.increment_rejected();
            return ScanFeedback::Rejected("Código QR no válido".to_string());
        };
        if code_rec.used {
            state.metrics.increment_rejected();
            return ScanFeedback::Rejected("Este código QR ya fue utilizado".to_string());
        }

        let Some(user) = state.user_directory.get(code_rec.user_id) else {
            state.metrics.increment_failed();
            return ScanFeedback::Failed("No se pudo resolver el usuario del código".to_string());
        };
        if !user.activo {
            state.metrics.increment_rejected();
            return ScanFeedback::Rejected(
                "Acceso denegado: el usuario no está activo.".to_string(),
            );
        }

        let mode = self.ctx.read().unwrap().mode.clone();
        match mode {
            KioskMode::Access { kind, zone_id, .. } => {
                match recorder::record(
                    &state.zone_registry,
                    &state.access_log,
                    &state.wal,
                    user.id,
                    zone_id,
                    kind,
                    now_local(),
                ) {
                    Ok(_) => {
                        if let Err(e) = state.code_ledger.consume(&state.wal, code, now_local()) {
                            warn!(error = %e, codigo = %code, "Failed to consume code after access");
                            state.metrics.increment_failed();
                            return ScanFeedback::Failed(
                                "Error al registrar el acceso".to_string(),
                            );
                        }
                        state.metrics.increment_accepted();
                        ScanFeedback::Accepted(format!(
                            "{} registrada: {}",
                            kind.as_str().to_uppercase(),
                            user.nombre
                        ))
                    }
                    Err(e @ AccessError::UnknownZone(_)) => {
                        state.metrics.increment_rejected();
                        ScanFeedback::Rejected(e.to_string())
                    }
                    Err(e) => {
                        state.metrics.increment_failed();
                        ScanFeedback::Failed(e.to_string())
                    }
                }
            }
            KioskMode::Class { schedule } => {
                let Some(elapsed) = self.timer.elapsed_seconds() else {
                    state.metrics.increment_rejected();
                    return ScanFeedback::Rejected(
                        "El temporizador de la clase no está activo".to_string(),
                    );
                };

                // Out-of-window scans are refused before the state
                // machine: no record mutation, no code consumption.
                let Some(scan) = classify(elapsed).to_scan_class() else {
                    state.metrics.increment_rejected();
                    return ScanFeedback::Rejected(
                        "Fuera de tiempo: No se aceptan códigos entre 3-10 minutos".to_string(),
                    );
                };

                let grupo = schedule
                    .grupo
                    .clone()
                    .unwrap_or_else(|| user.grupo.clone());

                match engine::register_scan(
                    &state.attendance,
                    &state.user_directory,
                    &state.wal,
                    user.id,
                    &grupo,
                    schedule.id,
                    scan,
                    now_local(),
                ) {
                    Ok(outcome) => {
                        if outcome.mark_used {
                            if let Err(e) =
                                state.code_ledger.consume(&state.wal, code, now_local())
                            {
                                warn!(error = %e, codigo = %code, "Failed to consume code after attendance");
                                state.metrics.increment_failed();
                                return ScanFeedback::Failed(
                                    "Error al actualizar asistencia".to_string(),
                                );
                            }
                        }
                        state.metrics.increment_accepted();
                        ScanFeedback::Accepted(match outcome.final_state {
                            FinalState::PrimeraPasada => format!(
                                "Primera pasada (Media asistencia): {} - Debe pasar segunda vez después de 10 min",
                                user.nombre
                            ),
                            FinalState::Retardo => {
                                format!("Retardo registrado: {}", user.nombre)
                            }
                            FinalState::Presente => {
                                format!("Asistencia COMPLETA (Presente): {}", user.nombre)
                            }
                        })
                    }
                    Err(e @ (AttendanceError::RosterInit(_) | AttendanceError::Store(_))) => {
                        state.metrics.increment_failed();
                        ScanFeedback::Failed(e.to_string())
                    }
                    Err(e) => {
                        state.metrics.increment_rejected();
                        ScanFeedback::Rejected(e.to_string())
                    }
                }
            }
        }
    }

    /// After a fixed delay, put the idle prompt (or the live timer
    /// status) back on screen for the next scan.
    fn schedule_display_clear(&self) {
        let ctx = Arc::clone(&self.ctx);
        let timer = Arc::clone(&self.timer);
        let display = Arc::clone(&self.display);
        let delay = Duration::from_secs(self.state.config.kiosk.display_clear_secs);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            display.result_hold.store(false, Ordering::SeqCst);
            let status = idle_status(&ctx.read().unwrap(), &timer);
            *display.status.write().unwrap() = status;
        });
    }

    /// Cooperative one-second ticker: in class mode it re-renders the
    /// current time band as status text, logging when the band changes.
    pub fn spawn_status_task(&self) -> tokio::task::JoinHandle<()> {
        let ctx = Arc::clone(&self.ctx);
        let timer = Arc::clone(&self.timer);
        let display = Arc::clone(&self.display);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            let mut last_band: Option<TimeBand> = None;
            loop {
                interval.tick().await;

                let (is_class, label) = {
                    let ctx = ctx.read().unwrap();
                    (ctx.is_class(), ctx.label())
                };
                if !is_class {
                    last_band = None;
                    continue;
                }
                let Some(elapsed) = timer.elapsed_seconds() else {
                    continue;
                };

                if !display.result_hold.load(Ordering::SeqCst) {
                    *display.status.write().unwrap() = render_status(&label, elapsed);
                }

                let band = classify(elapsed);
                if last_band != Some(band) {
                    info!(
                        modo = %label,
                        tiempo = elapsed,
                        estado = band.status_text(),
                        "Class time band"
                    );
                    last_band = Some(band);
                }
            }
        })
    }
}
