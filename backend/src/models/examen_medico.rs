use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::{
    Entity, EntityKind, FieldSpec, Labels, MedicoRef, PacienteRef, PatientScoped, Reference,
};

/// Medical exam ordered for a patient by a doctor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamenMedico {
    #[serde(default)]
    pub idexamen: Option<i64>,
    pub tipo_examen: String,
    pub fecha_examen: NaiveDate,
    pub hora_examen: NaiveTime,
    pub lugar_examen: String,
    pub estado_examen: String,
    #[serde(default)]
    pub observacion_examen: Option<String>,
    pub paciente: PacienteRef,
    pub medico: MedicoRef,
}

impl Entity for ExamenMedico {
    const KIND: EntityKind = EntityKind::ExamenMedico;
    const RESOURCE: &'static str = "examenes";
    const LABELS: Labels = Labels {
        singular: "el examen médico",
        plural: "exámenes médicos",
        feminine: false,
        key: "ExamenMedico",
        plural_key: "Examenes Medicos",
        update_verb: "actualizar",
    };
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::text("tipoExamen"),
        FieldSpec::date("fechaExamen"),
        FieldSpec::time("horaExamen"),
        FieldSpec::text("lugarExamen"),
        FieldSpec::text("estadoExamen"),
        FieldSpec::optional_text("observacionExamen", 500),
        FieldSpec::reference("paciente", "idpaciente"),
        FieldSpec::reference("medico", "idmedico"),
    ];

    fn id(&self) -> Option<i64> {
        self.idexamen
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.idexamen = id;
    }

    fn overwrite_from(&mut self, source: &Self) {
        self.tipo_examen = source.tipo_examen.clone();
        self.fecha_examen = source.fecha_examen;
        self.hora_examen = source.hora_examen;
        self.lugar_examen = source.lugar_examen.clone();
        self.estado_examen = source.estado_examen.clone();
        self.observacion_examen = source.observacion_examen.clone();
    }

    fn references(&self) -> Vec<Reference> {
        vec![
            Reference {
                kind: EntityKind::Paciente,
                column: "pacientes_idpaciente",
                id: self.paciente.idpaciente,
            },
            Reference {
                kind: EntityKind::Medico,
                column: "medicos_idmedico",
                id: self.medico.idmedico,
            },
        ]
    }
}

impl PatientScoped for ExamenMedico {
    fn paciente_id(&self) -> i64 {
        self.paciente.idpaciente
    }

    fn medico_id(&self) -> i64 {
        self.medico.idmedico
    }

    fn parents_mut(&mut self) -> (&mut PacienteRef, &mut MedicoRef) {
        (&mut self.paciente, &mut self.medico)
    }
}
