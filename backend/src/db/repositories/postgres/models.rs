use chrono::{NaiveDate, NaiveTime};
use diesel::prelude::*;

use super::schema::{
    administradores, citas_medicas, examenes_medicos, historias_clinicas, medicos, pacientes,
};
use crate::models::{
    Administrador, CitaMedica, ExamenMedico, HistoriaClinica, Medico, MedicoRef, Paciente,
    PacienteRef,
};

// ==================== Administradores ====================

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = administradores)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AdministradorRow {
    pub idadministrador: i64,
    pub nombres: String,
    pub apellidos: String,
    pub tipo_documento: String,
    pub numero_documento: String,
    pub fecha_nacimiento: String,
    pub sexo: String,
    pub telefono: String,
    pub correo: String,
    pub direccion: String,
    pub ocupacion: String,
    pub username: String,
    pub password: String,
    pub estado: String,
    pub rol: String,
}

/// Insert values and full-update changeset.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = administradores)]
pub struct NewAdministradorRow {
    pub nombres: String,
    pub apellidos: String,
    pub tipo_documento: String,
    pub numero_documento: String,
    pub fecha_nacimiento: String,
    pub sexo: String,
    pub telefono: String,
    pub correo: String,
    pub direccion: String,
    pub ocupacion: String,
    pub username: String,
    pub password: String,
    pub estado: String,
    pub rol: String,
}

impl From<AdministradorRow> for Administrador {
    fn from(row: AdministradorRow) -> Self {
        Self {
            idadministrador: Some(row.idadministrador),
            nombres: row.nombres,
            apellidos: row.apellidos,
            tipo_documento: row.tipo_documento,
            numero_documento: row.numero_documento,
            fecha_nacimiento: row.fecha_nacimiento,
            sexo: row.sexo,
            telefono: row.telefono,
            correo: row.correo,
            direccion: row.direccion,
            ocupacion: row.ocupacion,
            username: row.username,
            password: row.password,
            estado: row.estado,
            rol: row.rol,
        }
    }
}

impl From<&Administrador> for NewAdministradorRow {
    fn from(a: &Administrador) -> Self {
        Self {
            nombres: a.nombres.clone(),
            apellidos: a.apellidos.clone(),
            tipo_documento: a.tipo_documento.clone(),
            numero_documento: a.numero_documento.clone(),
            fecha_nacimiento: a.fecha_nacimiento.clone(),
            sexo: a.sexo.clone(),
            telefono: a.telefono.clone(),
            correo: a.correo.clone(),
            direccion: a.direccion.clone(),
            ocupacion: a.ocupacion.clone(),
            username: a.username.clone(),
            password: a.password.clone(),
            estado: a.estado.clone(),
            rol: a.rol.clone(),
        }
    }
}

// ==================== Medicos ====================

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = medicos)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MedicoRow {
    pub idmedico: i64,
    pub nombres: String,
    pub apellidos: String,
    pub tipo_documento: String,
    pub numero_documento: String,
    pub fecha_nacimiento: String,
    pub sexo: String,
    pub telefono: String,
    pub correo: String,
    pub direccion: String,
    pub especialidad: String,
    pub username: String,
    pub password: String,
    pub estado: String,
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = medicos)]
pub struct NewMedicoRow {
    pub nombres: String,
    pub apellidos: String,
    pub tipo_documento: String,
    pub numero_documento: String,
    pub fecha_nacimiento: String,
    pub sexo: String,
    pub telefono: String,
    pub correo: String,
    pub direccion: String,
    pub especialidad: String,
    pub username: String,
    pub password: String,
    pub estado: String,
}

impl From<MedicoRow> for Medico {
    fn from(row: MedicoRow) -> Self {
        Self {
            idmedico: Some(row.idmedico),
            nombres: row.nombres,
            apellidos: row.apellidos,
            tipo_documento: row.tipo_documento,
            numero_documento: row.numero_documento,
            fecha_nacimiento: row.fecha_nacimiento,
            sexo: row.sexo,
            telefono: row.telefono,
            correo: row.correo,
            direccion: row.direccion,
            especialidad: row.especialidad,
            username: row.username,
            password: row.password,
            estado: row.estado,
        }
    }
}

impl From<&Medico> for NewMedicoRow {
    fn from(m: &Medico) -> Self {
        Self {
            nombres: m.nombres.clone(),
            apellidos: m.apellidos.clone(),
            tipo_documento: m.tipo_documento.clone(),
            numero_documento: m.numero_documento.clone(),
            fecha_nacimiento: m.fecha_nacimiento.clone(),
            sexo: m.sexo.clone(),
            telefono: m.telefono.clone(),
            correo: m.correo.clone(),
            direccion: m.direccion.clone(),
            especialidad: m.especialidad.clone(),
            username: m.username.clone(),
            password: m.password.clone(),
            estado: m.estado.clone(),
        }
    }
}

// ==================== Pacientes ====================

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = pacientes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PacienteRow {
    pub idpaciente: i64,
    pub nombres: String,
    pub apellidos: String,
    pub tipo_documento: String,
    pub numero_documento: String,
    pub fecha_nacimiento: String,
    pub sexo: String,
    pub telefono: String,
    pub correo: String,
    pub direccion: String,
    pub ocupacion: String,
    pub username: String,
    pub password: String,
    pub estado: String,
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = pacientes)]
pub struct NewPacienteRow {
    pub nombres: String,
    pub apellidos: String,
    pub tipo_documento: String,
    pub numero_documento: String,
    pub fecha_nacimiento: String,
    pub sexo: String,
    pub telefono: String,
    pub correo: String,
    pub direccion: String,
    pub ocupacion: String,
    pub username: String,
    pub password: String,
    pub estado: String,
}

impl From<PacienteRow> for Paciente {
    fn from(row: PacienteRow) -> Self {
        Self {
            idpaciente: Some(row.idpaciente),
            nombres: row.nombres,
            apellidos: row.apellidos,
            tipo_documento: row.tipo_documento,
            numero_documento: row.numero_documento,
            fecha_nacimiento: row.fecha_nacimiento,
            sexo: row.sexo,
            telefono: row.telefono,
            correo: row.correo,
            direccion: row.direccion,
            ocupacion: row.ocupacion,
            username: row.username,
            password: row.password,
            estado: row.estado,
        }
    }
}

impl From<&Paciente> for NewPacienteRow {
    fn from(p: &Paciente) -> Self {
        Self {
            nombres: p.nombres.clone(),
            apellidos: p.apellidos.clone(),
            tipo_documento: p.tipo_documento.clone(),
            numero_documento: p.numero_documento.clone(),
            fecha_nacimiento: p.fecha_nacimiento.clone(),
            sexo: p.sexo.clone(),
            telefono: p.telefono.clone(),
            correo: p.correo.clone(),
            direccion: p.direccion.clone(),
            ocupacion: p.ocupacion.clone(),
            username: p.username.clone(),
            password: p.password.clone(),
            estado: p.estado.clone(),
        }
    }
}

// ==================== Citas medicas ====================

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = citas_medicas)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CitaMedicaRow {
    pub idcita: i64,
    pub tipo_cita: String,
    pub fecha_cita: NaiveDate,
    pub hora_cita: NaiveTime,
    pub lugar_cita: String,
    pub estado_cita: String,
    pub observacion_cita: Option<String>,
    pub pacientes_idpaciente: i64,
    pub medicos_idmedico: i64,
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = citas_medicas)]
#[diesel(treat_none_as_null = true)]
pub struct NewCitaMedicaRow {
    pub tipo_cita: String,
    pub fecha_cita: NaiveDate,
    pub hora_cita: NaiveTime,
    pub lugar_cita: String,
    pub estado_cita: String,
    pub observacion_cita: Option<String>,
    pub pacientes_idpaciente: i64,
    pub medicos_idmedico: i64,
}

/// Business fields only; the patient/doctor references are never overwritten.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = citas_medicas)]
#[diesel(treat_none_as_null = true)]
pub struct CitaMedicaChanges {
    pub tipo_cita: String,
    pub fecha_cita: NaiveDate,
    pub hora_cita: NaiveTime,
    pub lugar_cita: String,
    pub estado_cita: String,
    pub observacion_cita: Option<String>,
}

impl From<CitaMedicaRow> for CitaMedica {
    fn from(row: CitaMedicaRow) -> Self {
        Self {
            idcita: Some(row.idcita),
            tipo_cita: row.tipo_cita,
            fecha_cita: row.fecha_cita,
            hora_cita: row.hora_cita,
            lugar_cita: row.lugar_cita,
            estado_cita: row.estado_cita,
            observacion_cita: row.observacion_cita,
            paciente: PacienteRef::new(row.pacientes_idpaciente),
            medico: MedicoRef::new(row.medicos_idmedico),
        }
    }
}

impl From<&CitaMedica> for NewCitaMedicaRow {
    fn from(c: &CitaMedica) -> Self {
        Self {
            tipo_cita: c.tipo_cita.clone(),
            fecha_cita: c.fecha_cita,
            hora_cita: c.hora_cita,
            lugar_cita: c.lugar_cita.clone(),
            estado_cita: c.estado_cita.clone(),
            observacion_cita: c.observacion_cita.clone(),
            pacientes_idpaciente: c.paciente.idpaciente,
            medicos_idmedico: c.medico.idmedico,
        }
    }
}

impl From<&CitaMedica> for CitaMedicaChanges {
    fn from(c: &CitaMedica) -> Self {
        Self {
            tipo_cita: c.tipo_cita.clone(),
            fecha_cita: c.fecha_cita,
            hora_cita: c.hora_cita,
            lugar_cita: c.lugar_cita.clone(),
            estado_cita: c.estado_cita.clone(),
            observacion_cita: c.observacion_cita.clone(),
        }
    }
}

// ==================== Examenes medicos ====================

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = examenes_medicos)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ExamenMedicoRow {
    pub idexamen: i64,
    pub tipo_examen: String,
    pub fecha_examen: NaiveDate,
    pub hora_examen: NaiveTime,
    pub lugar_examen: String,
    pub estado_examen: String,
    pub observacion_examen: Option<String>,
    pub pacientes_idpaciente: i64,
    pub medicos_idmedico: i64,
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = examenes_medicos)]
#[diesel(treat_none_as_null = true)]
pub struct NewExamenMedicoRow {
    pub tipo_examen: String,
    pub fecha_examen: NaiveDate,
    pub hora_examen: NaiveTime,
    pub lugar_examen: String,
    pub estado_examen: String,
    pub observacion_examen: Option<String>,
    pub pacientes_idpaciente: i64,
    pub medicos_idmedico: i64,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = examenes_medicos)]
#[diesel(treat_none_as_null = true)]
pub struct ExamenMedicoChanges {
    pub tipo_examen: String,
    pub fecha_examen: NaiveDate,
    pub hora_examen: NaiveTime,
    pub lugar_examen: String,
    pub estado_examen: String,
    pub observacion_examen: Option<String>,
}

impl From<ExamenMedicoRow> for ExamenMedico {
    fn from(row: ExamenMedicoRow) -> Self {
        Self {
            idexamen: Some(row.idexamen),
            tipo_examen: row.tipo_examen,
            fecha_examen: row.fecha_examen,
            hora_examen: row.hora_examen,
            lugar_examen: row.lugar_examen,
            estado_examen: row.estado_examen,
            observacion_examen: row.observacion_examen,
            paciente: PacienteRef::new(row.pacientes_idpaciente),
            medico: MedicoRef::new(row.medicos_idmedico),
        }
    }
}

impl From<&ExamenMedico> for NewExamenMedicoRow {
    fn from(e: &ExamenMedico) -> Self {
        Self {
            tipo_examen: e.tipo_examen.clone(),
            fecha_examen: e.fecha_examen,
            hora_examen: e.hora_examen,
            lugar_examen: e.lugar_examen.clone(),
            estado_examen: e.estado_examen.clone(),
            observacion_examen: e.observacion_examen.clone(),
            pacientes_idpaciente: e.paciente.idpaciente,
            medicos_idmedico: e.medico.idmedico,
        }
    }
}

impl From<&ExamenMedico> for ExamenMedicoChanges {
    fn from(e: &ExamenMedico) -> Self {
        Self {
            tipo_examen: e.tipo_examen.clone(),
            fecha_examen: e.fecha_examen,
            hora_examen: e.hora_examen,
            lugar_examen: e.lugar_examen.clone(),
            estado_examen: e.estado_examen.clone(),
            observacion_examen: e.observacion_examen.clone(),
        }
    }
}

// ==================== Historias clinicas ====================

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = historias_clinicas)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct HistoriaClinicaRow {
    pub idhistoria: i64,
    pub fecha_historia: NaiveDate,
    pub antecedentes_historia: Option<String>,
    pub examenes_historia: Option<String>,
    pub diagnostico_historia: Option<String>,
    pub tratamiento_historia: Option<String>,
    pub pacientes_idpaciente: i64,
    pub medicos_idmedico: i64,
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = historias_clinicas)]
#[diesel(treat_none_as_null = true)]
pub struct NewHistoriaClinicaRow {
    pub fecha_historia: NaiveDate,
    pub antecedentes_historia: Option<String>,
    pub examenes_historia: Option<String>,
    pub diagnostico_historia: Option<String>,
    pub tratamiento_historia: Option<String>,
    pub pacientes_idpaciente: i64,
    pub medicos_idmedico: i64,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = historias_clinicas)]
#[diesel(treat_none_as_null = true)]
pub struct HistoriaClinicaChanges {
    pub fecha_historia: NaiveDate,
    pub antecedentes_historia: Option<String>,
    pub examenes_historia: Option<String>,
    pub diagnostico_historia: Option<String>,
    pub tratamiento_historia: Option<String>,
}

impl From<HistoriaClinicaRow> for HistoriaClinica {
    fn from(row: HistoriaClinicaRow) -> Self {
        Self {
            idhistoria: Some(row.idhistoria),
            fecha_historia: row.fecha_historia,
            antecedentes_historia: row.antecedentes_historia,
            examenes_historia: row.examenes_historia,
            diagnostico_historia: row.diagnostico_historia,
            tratamiento_historia: row.tratamiento_historia,
            paciente: PacienteRef::new(row.pacientes_idpaciente),
            medico: MedicoRef::new(row.medicos_idmedico),
        }
    }
}

impl From<&HistoriaClinica> for NewHistoriaClinicaRow {
    fn from(h: &HistoriaClinica) -> Self {
        Self {
            fecha_historia: h.fecha_historia,
            antecedentes_historia: h.antecedentes_historia.clone(),
            examenes_historia: h.examenes_historia.clone(),
            diagnostico_historia: h.diagnostico_historia.clone(),
            tratamiento_historia: h.tratamiento_historia.clone(),
            pacientes_idpaciente: h.paciente.idpaciente,
            medicos_idmedico: h.medico.idmedico,
        }
    }
}

impl From<&HistoriaClinica> for HistoriaClinicaChanges {
    fn from(h: &HistoriaClinica) -> Self {
        Self {
            fecha_historia: h.fecha_historia,
            antecedentes_historia: h.antecedentes_historia.clone(),
            examenes_historia: h.examenes_historia.clone(),
            diagnostico_historia: h.diagnostico_historia.clone(),
            tratamiento_historia: h.tratamiento_historia.clone(),
        }
    }
}
