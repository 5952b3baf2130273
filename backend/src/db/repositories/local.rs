//! In-memory local repository implementation.
//!
//! Suitable for unit testing and local development. Every table lives behind a
//! single `parking_lot::RwLock`, so each operation (bulk ones included) is
//! atomic with respect to the others. The integrity rules of the relational
//! schema are reproduced: unique patient documents, foreign keys on insert and
//! update, and restricted deletes of referenced patients or doctors. Violations
//! are reported with the same wording PostgreSQL uses.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::db::repository::*;
use crate::models::{
    attach_parents, Administrador, CitaMedica, DocumentKeyed, Entity, EntityKind, ExamenMedico,
    HistoriaClinica, Medico, Paciente, PatientScoped,
};

/// One table: rows keyed by id plus the identity sequence.
#[derive(Debug)]
struct Table<E> {
    rows: BTreeMap<i64, E>,
    next_id: i64,
}

impl<E> Default for Table<E> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<E: Entity> Table<E> {
    fn insert(&mut self, mut entity: E) -> E {
        let id = self.next_id;
        self.next_id += 1;
        entity.set_id(Some(id));
        self.rows.insert(id, entity.clone());
        entity
    }

    fn ids_where(&self, predicate: impl Fn(&E) -> bool) -> Vec<i64> {
        self.rows
            .iter()
            .filter(|(_, row)| predicate(row))
            .map(|(id, _)| *id)
            .collect()
    }
}

struct LocalData {
    administradores: Table<Administrador>,
    medicos: Table<Medico>,
    pacientes: Table<Paciente>,
    citas_medicas: Table<CitaMedica>,
    examenes_medicos: Table<ExamenMedico>,
    historias_clinicas: Table<HistoriaClinica>,
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            administradores: Table::default(),
            medicos: Table::default(),
            pacientes: Table::default(),
            citas_medicas: Table::default(),
            examenes_medicos: Table::default(),
            historias_clinicas: Table::default(),
            is_healthy: true,
        }
    }
}

impl LocalData {
    fn contains(&self, kind: EntityKind, id: i64) -> bool {
        match kind {
            EntityKind::Administrador => self.administradores.rows.contains_key(&id),
            EntityKind::Medico => self.medicos.rows.contains_key(&id),
            EntityKind::Paciente => self.pacientes.rows.contains_key(&id),
            EntityKind::CitaMedica => self.citas_medicas.rows.contains_key(&id),
            EntityKind::ExamenMedico => self.examenes_medicos.rows.contains_key(&id),
            EntityKind::HistoriaClinica => self.historias_clinicas.rows.contains_key(&id),
        }
    }

    fn len(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Administrador => self.administradores.rows.len(),
            EntityKind::Medico => self.medicos.rows.len(),
            EntityKind::Paciente => self.pacientes.rows.len(),
            EntityKind::CitaMedica => self.citas_medicas.rows.len(),
            EntityKind::ExamenMedico => self.examenes_medicos.rows.len(),
            EntityKind::HistoriaClinica => self.historias_clinicas.rows.len(),
        }
    }

    /// First dependent row pointing at `(kind, id)`, as `(table, column)`.
    fn referencing(&self, kind: EntityKind, id: i64) -> Option<(&'static str, &'static str)> {
        fn scan<E: Entity>(
            table: &Table<E>,
            kind: EntityKind,
            id: i64,
        ) -> Option<(&'static str, &'static str)> {
            table.rows.values().find_map(|row| {
                row.references()
                    .into_iter()
                    .find(|r| r.kind == kind && r.id == id)
                    .map(|r| (E::KIND.table(), r.column))
            })
        }

        scan(&self.citas_medicas, kind, id)
            .or_else(|| scan(&self.examenes_medicos, kind, id))
            .or_else(|| scan(&self.historias_clinicas, kind, id))
    }

    fn patient_ids(&self, document: &str) -> BTreeSet<i64> {
        self.pacientes
            .ids_where(|p| p.numero_documento == document)
            .into_iter()
            .collect()
    }

    fn doctor_ids(&self, document: &str) -> BTreeSet<i64> {
        self.medicos
            .ids_where(|m| m.numero_documento == document)
            .into_iter()
            .collect()
    }
}

/// Access to the table holding `Self`.
trait LocalEntity: Entity {
    fn table(data: &LocalData) -> &Table<Self>;
    fn table_mut(data: &mut LocalData) -> &mut Table<Self>;

    /// Fills in referenced records on rows about to leave the store.
    fn load_parents(_data: &LocalData, _rows: &mut [Self]) {}
}

fn attach_stored_parents<E: PatientScoped>(data: &LocalData, rows: &mut [E]) {
    attach_parents(
        rows,
        |id| data.pacientes.rows.get(&id).cloned(),
        |id| data.medicos.rows.get(&id).cloned(),
    );
}

macro_rules! local_table {
    ($($entity:ty => $field:ident $([$loader:ident])?),* $(,)?) => {
        $(
            impl LocalEntity for $entity {
                fn table(data: &LocalData) -> &Table<Self> {
                    &data.$field
                }

                fn table_mut(data: &mut LocalData) -> &mut Table<Self> {
                    &mut data.$field
                }

                $(
                    fn load_parents(data: &LocalData, rows: &mut [Self]) {
                        $loader(data, rows)
                    }
                )?
            }
        )*
    };
}

local_table! {
    Administrador => administradores,
    Medico => medicos,
    Paciente => pacientes,
    CitaMedica => citas_medicas [attach_stored_parents],
    ExamenMedico => examenes_medicos [attach_stored_parents],
    HistoriaClinica => historias_clinicas [attach_stored_parents],
}

fn context<E: Entity>(operation: &str) -> ErrorContext {
    ErrorContext::new(operation).with_entity(E::KIND.table())
}

fn check_references<E: Entity>(data: &LocalData, entity: &E, operation: &str) -> RepositoryResult<()> {
    for reference in entity.references() {
        if !data.contains(reference.kind, reference.id) {
            let table = E::KIND.table();
            let constraint = format!("{}_{}_fkey", table, reference.column);
            return Err(RepositoryError::query_with_context(
                format!(
                    "insert or update on table \"{table}\" violates foreign key constraint \"{constraint}\""
                ),
                context::<E>(operation)
                    .with_entity_id(reference.id)
                    .with_details(format!("constraint={constraint}")),
            ));
        }
    }
    Ok(())
}

fn check_unique<E: LocalEntity>(data: &LocalData, entity: &E, operation: &str) -> RepositoryResult<()> {
    let Some((column, value)) = entity.unique_key() else {
        return Ok(());
    };
    let clash = E::table(data).rows.values().any(|row| {
        row.id() != entity.id() && row.unique_key().is_some_and(|(_, other)| other == value)
    });
    if clash {
        let constraint = format!("{}_{}_key", E::KIND.table(), column);
        return Err(RepositoryError::query_with_context(
            format!("duplicate key value violates unique constraint \"{constraint}\""),
            context::<E>(operation)
                .with_entity_id(value)
                .with_details(format!("constraint={constraint}")),
        ));
    }
    Ok(())
}

fn check_not_referenced<E: Entity>(data: &LocalData, id: i64, operation: &str) -> RepositoryResult<()> {
    if let Some((table, column)) = data.referencing(E::KIND, id) {
        let constraint = format!("{table}_{column}_fkey");
        return Err(RepositoryError::query_with_context(
            format!(
                "update or delete on table \"{}\" violates foreign key constraint \"{constraint}\" on table \"{table}\"",
                E::KIND.table()
            ),
            context::<E>(operation)
                .with_entity_id(id)
                .with_details(format!("constraint={constraint}")),
        ));
    }
    Ok(())
}

/// In-memory local repository.
///
/// # Example
/// ```
/// use saludcontigo::db::repositories::LocalRepository;
/// use saludcontigo::db::repository::CrudRepository;
/// use saludcontigo::models::Paciente;
///
/// let repo = LocalRepository::new();
/// let runtime = tokio::runtime::Runtime::new().unwrap();
/// let patients = runtime
///     .block_on(CrudRepository::<Paciente>::find_all(&repo))
///     .unwrap();
/// assert!(patients.is_empty());
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Set the health status for testing connection failures.
    ///
    /// While unhealthy every operation fails with a connection error.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository, resetting the id sequences.
    pub fn clear(&self) {
        let mut data = self.data.write();
        let is_healthy = data.is_healthy;
        *data = LocalData {
            is_healthy,
            ..Default::default()
        };
    }

    /// Number of rows currently stored for `E`.
    pub fn count<E: Entity>(&self) -> usize {
        self.data.read().len(E::KIND)
    }

    fn check_health(data: &LocalData, operation: &str) -> RepositoryResult<()> {
        if !data.is_healthy {
            return Err(RepositoryError::connection_with_context(
                "Database is not healthy",
                ErrorContext::new(operation),
            ));
        }
        Ok(())
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HealthRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }
}

#[async_trait]
impl<E: LocalEntity> CrudRepository<E> for LocalRepository {
    async fn find_all(&self) -> RepositoryResult<Vec<E>> {
        let data = self.data.read();
        Self::check_health(&data, "find_all")?;
        let mut rows: Vec<E> = E::table(&data).rows.values().cloned().collect();
        E::load_parents(&data, &mut rows);
        Ok(rows)
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<E>> {
        let data = self.data.read();
        Self::check_health(&data, "find_by_id")?;
        let mut row = E::table(&data).rows.get(&id).cloned();
        if let Some(row) = row.as_mut() {
            E::load_parents(&data, std::slice::from_mut(row));
        }
        Ok(row)
    }

    async fn save(&self, entity: &E) -> RepositoryResult<E> {
        let mut data = self.data.write();
        Self::check_health(&data, "save")?;
        check_references(&data, entity, "save")?;
        check_unique(&data, entity, "save")?;

        let table = E::table_mut(&mut data);
        let mut saved = match entity.id() {
            None => table.insert(entity.clone()),
            Some(id) => match table.rows.get_mut(&id) {
                Some(row) => {
                    *row = entity.clone();
                    entity.clone()
                }
                None => {
                    return Err(RepositoryError::not_found(format!(
                        "{} row {} does not exist",
                        E::KIND.table(),
                        id
                    ))
                    .with_operation("save")
                    .with_entity(E::KIND.table()))
                }
            },
        };
        E::load_parents(&data, std::slice::from_mut(&mut saved));
        Ok(saved)
    }

    async fn delete(&self, id: i64) -> RepositoryResult<()> {
        let mut data = self.data.write();
        Self::check_health(&data, "delete")?;
        check_not_referenced::<E>(&data, id, "delete")?;
        E::table_mut(&mut data).rows.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl<E: LocalEntity + DocumentKeyed> DocumentRepository<E> for LocalRepository {
    async fn find_by_document(&self, document: &str) -> RepositoryResult<Option<E>> {
        let data = self.data.read();
        Self::check_health(&data, "find_by_document")?;
        let mut matches = E::table(&data)
            .rows
            .values()
            .filter(|row| row.numero_documento() == document);
        let first = matches.next().cloned();
        let extra = matches.count();
        if extra > 0 {
            return Err(RepositoryError::query_with_context(
                format!("query did not return a unique result: {}", extra + 1),
                context::<E>("find_by_document").with_entity_id(document),
            ));
        }
        Ok(first)
    }

    async fn delete_by_document(&self, document: &str) -> RepositoryResult<usize> {
        let mut data = self.data.write();
        Self::check_health(&data, "delete_by_document")?;
        let ids = E::table(&data).ids_where(|row| row.numero_documento() == document);
        for id in &ids {
            check_not_referenced::<E>(&data, *id, "delete_by_document")?;
        }
        let table = E::table_mut(&mut data);
        for id in &ids {
            table.rows.remove(id);
        }
        Ok(ids.len())
    }
}

#[async_trait]
impl<E: LocalEntity + PatientScoped> CascadeRepository<E> for LocalRepository {
    async fn find_by_doctor_document(&self, document: &str) -> RepositoryResult<Vec<E>> {
        let data = self.data.read();
        Self::check_health(&data, "find_by_doctor_document")?;
        let doctors = data.doctor_ids(document);
        let mut rows: Vec<E> = E::table(&data)
            .rows
            .values()
            .filter(|row| doctors.contains(&row.medico_id()))
            .cloned()
            .collect();
        E::load_parents(&data, &mut rows);
        Ok(rows)
    }

    async fn find_by_patient_document(&self, document: &str) -> RepositoryResult<Vec<E>> {
        let data = self.data.read();
        Self::check_health(&data, "find_by_patient_document")?;
        let patients = data.patient_ids(document);
        let mut rows: Vec<E> = E::table(&data)
            .rows
            .values()
            .filter(|row| patients.contains(&row.paciente_id()))
            .cloned()
            .collect();
        E::load_parents(&data, &mut rows);
        Ok(rows)
    }

    async fn delete_by_patient_document(&self, document: &str) -> RepositoryResult<usize> {
        let mut data = self.data.write();
        Self::check_health(&data, "delete_by_patient_document")?;
        let patients = data.patient_ids(document);
        let table = E::table_mut(&mut data);
        let before = table.rows.len();
        table.rows.retain(|_, row| !patients.contains(&row.paciente_id()));
        Ok(before - table.rows.len())
    }

    async fn update_by_patient_document(
        &self,
        document: &str,
        changes: &E,
    ) -> RepositoryResult<Vec<E>> {
        let mut data = self.data.write();
        Self::check_health(&data, "update_by_patient_document")?;
        let patients = data.patient_ids(document);
        let mut updated: Vec<E> = E::table_mut(&mut data)
            .rows
            .values_mut()
            .filter(|row| patients.contains(&row.paciente_id()))
            .map(|row| {
                row.overwrite_from(changes);
                row.clone()
            })
            .collect();
        E::load_parents(&data, &mut updated);
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MedicoRef, PacienteRef};
    use chrono::{NaiveDate, NaiveTime};

    fn paciente(doc: &str) -> Paciente {
        Paciente {
            nombres: "Laura".into(),
            numero_documento: doc.into(),
            ..Default::default()
        }
    }

    fn medico(doc: &str) -> Medico {
        Medico {
            nombres: "Andrés".into(),
            numero_documento: doc.into(),
            especialidad: "General".into(),
            ..Default::default()
        }
    }

    fn cita(paciente: i64, medico: i64, tipo: &str) -> CitaMedica {
        CitaMedica {
            idcita: None,
            tipo_cita: tipo.into(),
            fecha_cita: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
            hora_cita: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            lugar_cita: "Consultorio 1".into(),
            estado_cita: "Programada".into(),
            observacion_cita: None,
            paciente: PacienteRef::new(paciente),
            medico: MedicoRef::new(medico),
        }
    }

    #[tokio::test]
    async fn test_health_check() {
        let repo = LocalRepository::new();
        assert!(repo.health_check().await.unwrap());

        repo.set_healthy(false);
        assert!(!repo.health_check().await.unwrap());
        let err = CrudRepository::<Paciente>::find_all(&repo).await.unwrap_err();
        assert!(matches!(err, RepositoryError::ConnectionError { .. }));
    }

    #[tokio::test]
    async fn test_ids_are_sequential_per_table() {
        let repo = LocalRepository::new();
        let first = repo.save(&paciente("1")).await.unwrap();
        let second = repo.save(&paciente("2")).await.unwrap();
        let doctor = repo.save(&medico("9")).await.unwrap();
        assert_eq!(first.idpaciente, Some(1));
        assert_eq!(second.idpaciente, Some(2));
        assert_eq!(doctor.idmedico, Some(1));
    }

    #[tokio::test]
    async fn test_clear_resets_sequences() {
        let repo = LocalRepository::new();
        repo.save(&paciente("1")).await.unwrap();
        repo.clear();
        assert_eq!(repo.count::<Paciente>(), 0);
        let again = repo.save(&paciente("1")).await.unwrap();
        assert_eq!(again.idpaciente, Some(1));
    }

    #[tokio::test]
    async fn test_referenced_patient_cannot_be_deleted() {
        let repo = LocalRepository::new();
        let p = repo.save(&paciente("123")).await.unwrap();
        let m = repo.save(&medico("456")).await.unwrap();
        repo.save(&cita(p.idpaciente.unwrap(), m.idmedico.unwrap(), "General"))
            .await
            .unwrap();

        let err = CrudRepository::<Paciente>::delete(&repo, p.idpaciente.unwrap())
            .await
            .unwrap_err();
        assert!(err
            .message()
            .contains("citas_medicas_pacientes_idpaciente_fkey"));
        assert_eq!(repo.count::<Paciente>(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_doctor_documents_are_ambiguous() {
        let repo = LocalRepository::new();
        repo.save(&medico("456")).await.unwrap();
        repo.save(&medico("456")).await.unwrap();

        let err = DocumentRepository::<Medico>::find_by_document(&repo, "456")
            .await
            .unwrap_err();
        assert_eq!(err.message(), "query did not return a unique result: 2");
    }

    #[tokio::test]
    async fn test_reads_attach_current_parent_records() {
        let repo = LocalRepository::new();
        let mut p = repo.save(&paciente("123")).await.unwrap();
        let m = repo.save(&medico("456")).await.unwrap();
        let saved = repo
            .save(&cita(p.idpaciente.unwrap(), m.idmedico.unwrap(), "General"))
            .await
            .unwrap();
        let attached = saved.paciente.record.as_deref().unwrap();
        assert_eq!(attached.numero_documento, "123");

        p.nombres = "Lucía".into();
        repo.save(&p).await.unwrap();

        let found = CrudRepository::<CitaMedica>::find_by_id(&repo, saved.idcita.unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.paciente.record.as_deref().unwrap().nombres, "Lucía");
        assert_eq!(found.medico.record.as_deref().unwrap().especialidad, "General");
    }

    #[tokio::test]
    async fn test_update_of_missing_row_fails() {
        let repo = LocalRepository::new();
        let mut ghost = paciente("1");
        ghost.idpaciente = Some(42);
        let err = repo.save(&ghost).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));
    }
}
