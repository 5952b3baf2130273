use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{
    Entity, EntityKind, FieldSpec, Labels, MedicoRef, PacienteRef, PatientScoped, Reference,
};

/// Entry of a patient's clinical history. Free-text sections are capped at 500 characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoriaClinica {
    #[serde(default)]
    pub idhistoria: Option<i64>,
    pub fecha_historia: NaiveDate,
    #[serde(default)]
    pub antecedentes_historia: Option<String>,
    #[serde(default)]
    pub examenes_historia: Option<String>,
    #[serde(default)]
    pub diagnostico_historia: Option<String>,
    #[serde(default)]
    pub tratamiento_historia: Option<String>,
    pub paciente: PacienteRef,
    pub medico: MedicoRef,
}

impl Entity for HistoriaClinica {
    const KIND: EntityKind = EntityKind::HistoriaClinica;
    const RESOURCE: &'static str = "historias";
    const LABELS: Labels = Labels {
        singular: "la historia clínica",
        plural: "historias clínicas",
        feminine: true,
        key: "HistoriaClinica",
        plural_key: "Historias Clinicas",
        update_verb: "actualizar",
    };
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::date("fechaHistoria"),
        FieldSpec::optional_text("antecedentesHistoria", 500),
        FieldSpec::optional_text("examenesHistoria", 500),
        FieldSpec::optional_text("diagnosticoHistoria", 500),
        FieldSpec::optional_text("tratamientoHistoria", 500),
        FieldSpec::reference("paciente", "idpaciente"),
        FieldSpec::reference("medico", "idmedico"),
    ];

    fn id(&self) -> Option<i64> {
        self.idhistoria
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.idhistoria = id;
    }

    fn overwrite_from(&mut self, source: &Self) {
        self.fecha_historia = source.fecha_historia;
        self.antecedentes_historia = source.antecedentes_historia.clone();
        self.examenes_historia = source.examenes_historia.clone();
        self.diagnostico_historia = source.diagnostico_historia.clone();
        self.tratamiento_historia = source.tratamiento_historia.clone();
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

impl PatientScoped for HistoriaClinica {
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
