//! Generic entity contract shared by the six SaludContigo records.
//!
//! Every record (administrators, doctors, patients and the three
//! patient-scoped records) implements [`Entity`]. The trait carries the small
//! per-entity configuration the generic CRUD layers need: the field table used
//! for payload validation, the full-overwrite rule used by updates and the
//! labels used to build the Spanish response messages.
//!
//! Two capability traits gate the optional operations:
//!
//! - [`DocumentKeyed`]: lookup/update/delete by `numeroDocumento`
//! - [`PatientScoped`]: cascade queries through the referenced patient/doctor

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{Medico, MedicoRef, Paciente, PacienteRef};

/// Discriminant for the persisted tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Administrador,
    Medico,
    Paciente,
    CitaMedica,
    ExamenMedico,
    HistoriaClinica,
}

impl EntityKind {
    /// Physical table name.
    pub fn table(&self) -> &'static str {
        match self {
            Self::Administrador => "administradores",
            Self::Medico => "medicos",
            Self::Paciente => "pacientes",
            Self::CitaMedica => "citas_medicas",
            Self::ExamenMedico => "examenes_medicos",
            Self::HistoriaClinica => "historias_clinicas",
        }
    }

    /// Primary key column name.
    pub fn id_column(&self) -> &'static str {
        match self {
            Self::Administrador => "idadministrador",
            Self::Medico => "idmedico",
            Self::Paciente => "idpaciente",
            Self::CitaMedica => "idcita",
            Self::ExamenMedico => "idexamen",
            Self::HistoriaClinica => "idhistoria",
        }
    }
}

/// JSON shape expected for one payload field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Plain string.
    Text,
    /// `YYYY-MM-DD`
    Date,
    /// `HH:MM:SS`
    Time,
    /// Nested object carrying the referenced row id under `id_key`.
    Reference { id_key: &'static str },
}

/// One row of an entity's validation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub max_len: Option<usize>,
}

impl FieldSpec {
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Text,
            required: true,
            max_len: None,
        }
    }

    pub const fn optional_text(name: &'static str, max_len: usize) -> Self {
        Self {
            name,
            kind: FieldKind::Text,
            required: false,
            max_len: Some(max_len),
        }
    }

    pub const fn date(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Date,
            required: true,
            max_len: None,
        }
    }

    pub const fn time(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Time,
            required: true,
            max_len: None,
        }
    }

    pub const fn reference(name: &'static str, id_key: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Reference { id_key },
            required: true,
            max_len: None,
        }
    }
}

/// Foreign key held by a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    /// Referenced table.
    pub kind: EntityKind,
    /// Referencing column on the owning table.
    pub column: &'static str,
    pub id: i64,
}

/// Natural-language labels used to build response messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Labels {
    /// Singular noun phrase with article, lower case ("el paciente").
    pub singular: &'static str,
    /// Plural noun phrase without article, lower case ("citas médicas").
    pub plural: &'static str,
    /// Grammatical gender, drives participle agreement.
    pub feminine: bool,
    /// Envelope key for a single record.
    pub key: &'static str,
    /// Envelope key for the cascade update result.
    pub plural_key: &'static str,
    /// Verb used in the "could not update" message.
    pub update_verb: &'static str,
}

impl Labels {
    fn participle(&self, stem: &str) -> String {
        format!("{stem}{}", if self.feminine { "a" } else { "o" })
    }

    fn plural_participle(&self, stem: &str) -> String {
        format!("{stem}{}", if self.feminine { "as" } else { "os" })
    }

    pub fn not_found_id(&self, id: i64) -> String {
        format!(
            "{} ID: {id} no existe en la base de datos",
            capitalize(self.singular)
        )
    }

    pub fn not_found_document(&self, document: &str) -> String {
        format!(
            "{} Documento: {document} no existe en la base de datos",
            capitalize(self.singular)
        )
    }

    pub fn update_not_found_id(&self, id: i64) -> String {
        format!(
            "Error: no se pudo {}, {} ID: {id} no existe en la base de datos",
            self.update_verb, self.singular
        )
    }

    pub fn update_not_found_document(&self, document: &str) -> String {
        format!(
            "Error: no se pudo {}, {} con documento: {document} no existe en la base de datos",
            self.update_verb, self.singular
        )
    }

    pub fn created(&self) -> String {
        format!(
            "{} ha sido {} con éxito!!",
            capitalize(self.singular),
            self.participle("cread")
        )
    }

    pub fn updated(&self) -> String {
        format!(
            "{} ha sido {} con éxito!!",
            capitalize(self.singular),
            self.participle("actualizad")
        )
    }

    pub fn deleted(&self) -> String {
        format!(
            "{} ha sido {} con éxito!!",
            capitalize(self.singular),
            self.participle("eliminad")
        )
    }

    pub fn update_failed(&self) -> String {
        format!("Error al actualizar {} en la Base de Datos", self.singular)
    }

    pub fn delete_failed(&self) -> String {
        format!("Error al eliminar {} en la Base de Datos", self.singular)
    }

    pub fn none_for_doctor(&self, document: &str) -> String {
        format!(
            "No se encontraron {} para el médico con documento: {document}",
            self.plural
        )
    }

    pub fn none_for_patient(&self, document: &str) -> String {
        format!(
            "No se encontraron {} para el paciente con documento: {document}",
            self.plural
        )
    }

    pub fn none_for_document(&self) -> String {
        format!(
            "No se encontraron {} para el documento proporcionado.",
            self.plural
        )
    }

    pub fn bulk_updated(&self) -> String {
        format!(
            "{} {} con éxito.",
            capitalize(self.plural),
            self.plural_participle("actualizad")
        )
    }

    pub fn bulk_deleted(&self) -> String {
        format!(
            "{} {} con éxito.",
            capitalize(self.plural),
            self.plural_participle("eliminad")
        )
    }

    pub fn bulk_delete_failed(&self) -> String {
        let article = if self.feminine { "las" } else { "los" };
        format!("Error al eliminar {article} {} en la base de datos.", self.plural)
    }
}

/// Upper-cases the first character.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A persisted SaludContigo record.
pub trait Entity: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    const KIND: EntityKind;
    /// Path segment under `/api`.
    const RESOURCE: &'static str;
    const LABELS: Labels;
    /// Validation table applied to incoming payloads.
    const FIELDS: &'static [FieldSpec];

    fn id(&self) -> Option<i64>;

    fn set_id(&mut self, id: Option<i64>);

    /// Replaces every business field with the one in `source`.
    ///
    /// Identity is never copied. Patient/doctor references of the
    /// patient-scoped records are not business fields and stay untouched.
    fn overwrite_from(&mut self, source: &Self);

    /// Foreign keys held by this record.
    fn references(&self) -> Vec<Reference> {
        Vec::new()
    }

    /// Column and value of a store-level unique constraint, if any.
    fn unique_key(&self) -> Option<(&'static str, &str)> {
        None
    }
}

/// Records addressable by `numeroDocumento`.
pub trait DocumentKeyed: Entity {
    fn numero_documento(&self) -> &str;
}

/// Records that belong to a patient and are attended by a doctor.
pub trait PatientScoped: Entity {
    fn paciente_id(&self) -> i64;

    fn medico_id(&self) -> i64;

    /// Both parent references, for attaching the loaded records.
    fn parents_mut(&mut self) -> (&mut PacienteRef, &mut MedicoRef);
}

/// Embeds the referenced patient and doctor of every row.
///
/// `paciente` and `medico` look a parent up by id; rows whose parent is
/// missing keep the bare id.
pub fn attach_parents<E, P, M>(rows: &mut [E], paciente: P, medico: M)
where
    E: PatientScoped,
    P: Fn(i64) -> Option<Paciente>,
    M: Fn(i64) -> Option<Medico>,
{
    for row in rows {
        let (paciente_ref, medico_ref) = row.parents_mut();
        if let Some(record) = paciente(paciente_ref.idpaciente) {
            paciente_ref.attach(record);
        }
        if let Some(record) = medico(medico_ref.idmedico) {
            medico_ref.attach(record);
        }
    }
}
