use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::{
    Entity, EntityKind, FieldSpec, Labels, MedicoRef, PacienteRef, PatientScoped, Reference,
};

/// Medical appointment of a patient with a doctor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitaMedica {
    #[serde(default)]
    pub idcita: Option<i64>,
    pub tipo_cita: String,
    pub fecha_cita: NaiveDate,
    pub hora_cita: NaiveTime,
    pub lugar_cita: String,
    pub estado_cita: String,
    #[serde(default)]
    pub observacion_cita: Option<String>,
    pub paciente: PacienteRef,
    pub medico: MedicoRef,
}

impl Entity for CitaMedica {
    const KIND: EntityKind = EntityKind::CitaMedica;
    const RESOURCE: &'static str = "citas";
    const LABELS: Labels = Labels {
        singular: "la cita médica",
        plural: "citas médicas",
        feminine: true,
        key: "CitaMedica",
        plural_key: "Citas Medicas",
        update_verb: "actualizar",
    };
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::text("tipoCita"),
        FieldSpec::date("fechaCita"),
        FieldSpec::time("horaCita"),
        FieldSpec::text("lugarCita"),
        FieldSpec::text("estadoCita"),
        FieldSpec::optional_text("observacionCita", 500),
        FieldSpec::reference("paciente", "idpaciente"),
        FieldSpec::reference("medico", "idmedico"),
    ];

    fn id(&self) -> Option<i64> {
        self.idcita
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.idcita = id;
    }

    fn overwrite_from(&mut self, source: &Self) {
        self.tipo_cita = source.tipo_cita.clone();
        self.fecha_cita = source.fecha_cita;
        self.hora_cita = source.hora_cita;
        self.lugar_cita = source.lugar_cita.clone();
        self.estado_cita = source.estado_cita.clone();
        self.observacion_cita = source.observacion_cita.clone();
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

impl PatientScoped for CitaMedica {
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
