//! Repository trait definitions for database operations.
//!
//! Operations are split across small traits so each entity only exposes the
//! capabilities it actually has:
//!
//! - [`CrudRepository`]: list, find by id, save, delete (all six entities)
//! - [`DocumentRepository`]: find/delete by document number (person records)
//! - [`CascadeRepository`]: queries through the referenced patient/doctor
//!   document (appointments, exams, clinical histories)
//! - [`HealthRepository`]: store connectivity
//!
//! # Convenience Trait Bound
//!
//! Use [`FullRepository`] where every capability is needed, typically as the
//! `Arc<dyn FullRepository>` shared by the HTTP handlers:
//!
//! ```ignore
//! async fn example<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<()> {
//!     let patients: Vec<Paciente> = repo.find_all().await?;
//!     let citas = CascadeRepository::<CitaMedica>::find_by_patient_document(repo, "123").await?;
//!     Ok(())
//! }
//! ```

pub mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

use async_trait::async_trait;

use crate::models::{
    Administrador, CitaMedica, DocumentKeyed, Entity, ExamenMedico, HistoriaClinica, Medico,
    Paciente, PatientScoped,
};

/// Store connectivity.
#[async_trait]
pub trait HealthRepository: Send + Sync {
    /// Check if the database connection is healthy.
    ///
    /// # Returns
    /// - `Ok(true)` if connection is healthy
    /// - `Ok(false)` if connection is unhealthy but no error occurred
    /// - `Err(RepositoryError)` if an error occurred during the check
    async fn health_check(&self) -> RepositoryResult<bool>;
}

/// Basic CRUD for one entity type.
///
/// Absent keys are never errors: lookups return `None` and deletes of a
/// missing row succeed without effect.
#[async_trait]
pub trait CrudRepository<E: Entity>: Send + Sync {
    /// All rows ordered by id.
    async fn find_all(&self) -> RepositoryResult<Vec<E>>;

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<E>>;

    /// Insert when the id is absent, full update of the row when present.
    ///
    /// Returns the stored row with its id.
    async fn save(&self, entity: &E) -> RepositoryResult<E>;

    async fn delete(&self, id: i64) -> RepositoryResult<()>;
}

/// Lookups by `numero_documento`.
#[async_trait]
pub trait DocumentRepository<E: DocumentKeyed>: CrudRepository<E> {
    /// Single row with that document.
    ///
    /// Several matching rows is a query error, not an arbitrary pick.
    async fn find_by_document(&self, document: &str) -> RepositoryResult<Option<E>>;

    /// Delete every row with that document.
    async fn delete_by_document(&self, document: &str) -> RepositoryResult<usize>;
}

/// Queries joining through the referenced patient or doctor.
#[async_trait]
pub trait CascadeRepository<E: PatientScoped>: CrudRepository<E> {
    async fn find_by_doctor_document(&self, document: &str) -> RepositoryResult<Vec<E>>;

    async fn find_by_patient_document(&self, document: &str) -> RepositoryResult<Vec<E>>;

    /// Delete every row of the patient(s) with that document in one statement.
    ///
    /// Returns the number of deleted rows.
    async fn delete_by_patient_document(&self, document: &str) -> RepositoryResult<usize>;

    /// Overwrite the business fields of every row of the patient(s) with that
    /// document with the ones in `changes`, in one statement.
    ///
    /// Returns the updated rows ordered by id; empty when nothing matched.
    async fn update_by_patient_document(
        &self,
        document: &str,
        changes: &E,
    ) -> RepositoryResult<Vec<E>>;
}

/// Composite trait bound for a complete repository implementation.
///
/// Automatically implemented for any type that implements every
/// per-entity repository trait.
pub trait FullRepository:
    HealthRepository
    + DocumentRepository<Administrador>
    + DocumentRepository<Medico>
    + DocumentRepository<Paciente>
    + CascadeRepository<CitaMedica>
    + CascadeRepository<ExamenMedico>
    + CascadeRepository<HistoriaClinica>
{
}

impl<T> FullRepository for T where
    T: HealthRepository
        + DocumentRepository<Administrador>
        + DocumentRepository<Medico>
        + DocumentRepository<Paciente>
        + CascadeRepository<CitaMedica>
        + CascadeRepository<ExamenMedico>
        + CascadeRepository<HistoriaClinica>
{
}
