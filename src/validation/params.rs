use serde::Deserialize;
use uuid::Uuid;

use crate::core::error::ValidationError;
use crate::models::access::AccessKind;
use crate::models::attendance::ScanClass;

/// Body of `POST /registrar-acceso`.
#[derive(Debug, Deserialize)]
pub struct RegistrarAccesoParams {
    pub user_id: Uuid,
    pub zone_id: Uuid,
    pub tipo_acceso: String,
}

#[derive(Debug)]
pub struct ValidatedAcceso {
    pub user_id: Uuid,
    pub zone_id: Uuid,
    pub kind: AccessKind,
}

impl RegistrarAccesoParams {
    pub fn validate(self) -> Result<ValidatedAcceso, ValidationError> {
        let kind = AccessKind::parse(&self.tipo_acceso)
            .ok_or(ValidationError::InvalidAccessKind(self.tipo_acceso))?;

        Ok(ValidatedAcceso {
            user_id: self.user_id,
            zone_id: self.zone_id,
            kind,
        })
    }
}

/// Body of `POST /registrar-asistencia`.
#[derive(Debug, Deserialize)]
pub struct RegistrarAsistenciaParams {
    pub user_id: Uuid,
    pub grupo: String,
    pub clase_id: Uuid,
    pub estado_asistencia: String,
    /// Elapsed seconds reported by the kiosk timer; informational.
    #[serde(default)]
    pub tiempo_transcurrido: Option<u64>,
}

#[derive(Debug)]
pub struct ValidatedAsistencia {
    pub user_id: Uuid,
    pub grupo: String,
    pub clase_id: Uuid,
    pub scan: ScanClass,
    pub tiempo_transcurrido: Option<u64>,
}

impl RegistrarAsistenciaParams {
    pub fn validate(self) -> Result<ValidatedAsistencia, ValidationError> {
        if self.grupo.trim().is_empty() {
            return Err(ValidationError::MissingParameter("grupo"));
        }

        let scan = ScanClass::parse(&self.estado_asistencia)
            .ok_or(ValidationError::InvalidAttendanceState(self.estado_asistencia))?;

        Ok(ValidatedAsistencia {
            user_id: self.user_id,
            grupo: self.grupo,
            clase_id: self.clase_id,
            scan,
            tiempo_transcurrido: self.tiempo_transcurrido,
        })
    }
}
