use crate::models::attendance::ScanClass;

/// Last second (inclusive) of the first-pass window.
pub const FIRST_PASS_WINDOW_END: u64 = 120;
/// Last second (inclusive) of the direct-late window.
pub const LATE_DIRECT_WINDOW_END: u64 = 180;
/// First second of the second-pass window.
pub const SECOND_PASS_START: u64 = 600;

/// Admission policy for a class-mode scan, derived from elapsed time
/// since the class timer started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeBand {
    FirstPass,
    LateDirect,
    OutOfWindow,
    SecondPass,
}

impl TimeBand {
    /// Status text shown on the kiosk while this band is active.
    pub fn status_text(&self) -> &'static str {
        match self {
            TimeBand::FirstPass => "PRIMERA PASADA (Media Asistencia)",
            TimeBand::LateDirect => "RETARDO (Última oportunidad)",
            TimeBand::OutOfWindow => "FUERA DE TIEMPO (No se aceptan códigos)",
            TimeBand::SecondPass => "SEGUNDA PASADA (Solo para quien pasó primera vez)",
        }
    }

    /// The scan classification fed to the state machine. Out-of-window
    /// scans are rejected before reaching it, so they map to nothing.
    pub fn to_scan_class(self) -> Option<ScanClass> {
        match self {
            TimeBand::FirstPass => Some(ScanClass::FirstPass),
            TimeBand::LateDirect => Some(ScanClass::LateDirect),
            TimeBand::OutOfWindow => None,
            TimeBand::SecondPass => Some(ScanClass::SecondPass),
        }
    }
}

/// Classify elapsed seconds since class start into exactly one band.
///
/// Total over all non-negative inputs; band edges are inclusive on the
/// lower band.
pub fn classify(elapsed_seconds: u64) -> TimeBand {
    if elapsed_seconds <= FIRST_PASS_WINDOW_END {
        TimeBand::FirstPass
    } else if elapsed_seconds <= LATE_DIRECT_WINDOW_END {
        TimeBand::LateDirect
    } else if elapsed_seconds < SECOND_PASS_START {
        TimeBand::OutOfWindow
    } else {
        TimeBand::SecondPass
    }
}
