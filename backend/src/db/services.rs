//! Repository-agnostic record operations.
//!
//! These functions sit between the HTTP handlers and the repository traits.
//! They own the parts of each operation that must behave the same on every
//! backend: ids are always assigned by the store on create, and updates load
//! the current record, overwrite its business fields and save it back.
//!
//! # Usage
//!
//! ```no_run
//! use saludcontigo::db::{services, repositories::LocalRepository};
//! use saludcontigo::models::Paciente;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = LocalRepository::new();
//!     let pacientes: Vec<Paciente> = services::find_all(&repo).await?;
//!     println!("Found {} patients", pacientes.len());
//!     Ok(())
//! }
//! ```

use log::{debug, info, warn};

use super::repository::{
    CascadeRepository, CrudRepository, DocumentRepository, HealthRepository, RepositoryResult,
};
use crate::models::{DocumentKeyed, Entity, PatientScoped};

// ==================== Health & Connection ====================

pub async fn health_check<R: HealthRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

// ==================== Reads ====================

/// All records of one kind, ordered by id.
pub async fn find_all<E, R>(repo: &R) -> RepositoryResult<Vec<E>>
where
    E: Entity,
    R: CrudRepository<E> + ?Sized,
{
    let rows = repo.find_all().await?;
    debug!("Listed {} rows from {}", rows.len(), E::KIND.table());
    Ok(rows)
}

pub async fn find_by_id<E, R>(repo: &R, id: i64) -> RepositoryResult<Option<E>>
where
    E: Entity,
    R: CrudRepository<E> + ?Sized,
{
    repo.find_by_id(id).await
}

pub async fn find_by_document<E, R>(repo: &R, document: &str) -> RepositoryResult<Option<E>>
where
    E: DocumentKeyed,
    R: DocumentRepository<E> + ?Sized,
{
    repo.find_by_document(document).await
}

// ==================== Writes ====================

/// Insert a new record.
///
/// Any id carried by `entity` is discarded; the store assigns a fresh one.
pub async fn create<E, R>(repo: &R, mut entity: E) -> RepositoryResult<E>
where
    E: Entity,
    R: CrudRepository<E> + ?Sized,
{
    entity.set_id(None);
    let saved = repo.save(&entity).await?;
    info!(
        "Created {} row with id {:?}",
        E::KIND.table(),
        saved.id()
    );
    Ok(saved)
}

/// Full-overwrite update of the record with that id.
///
/// Returns `Ok(None)` when no such record exists; nothing is written then.
pub async fn update_by_id<E, R>(repo: &R, id: i64, changes: &E) -> RepositoryResult<Option<E>>
where
    E: Entity,
    R: CrudRepository<E> + ?Sized,
{
    let Some(mut current) = repo.find_by_id(id).await? else {
        warn!("Update skipped: {} id {} not found", E::KIND.table(), id);
        return Ok(None);
    };

    current.overwrite_from(changes);
    let saved = repo.save(&current).await?;
    info!("Updated {} row {}", E::KIND.table(), id);
    Ok(Some(saved))
}

/// Full-overwrite update of the record with that document number.
///
/// The document itself is a business field and may change.
pub async fn update_by_document<E, R>(
    repo: &R,
    document: &str,
    changes: &E,
) -> RepositoryResult<Option<E>>
where
    E: DocumentKeyed,
    R: DocumentRepository<E> + ?Sized,
{
    let Some(mut current) = repo.find_by_document(document).await? else {
        warn!(
            "Update skipped: {} document {} not found",
            E::KIND.table(),
            document
        );
        return Ok(None);
    };

    current.overwrite_from(changes);
    let saved = repo.save(&current).await?;
    info!("Updated {} row with document {}", E::KIND.table(), document);
    Ok(Some(saved))
}

pub async fn delete<E, R>(repo: &R, id: i64) -> RepositoryResult<()>
where
    E: Entity,
    R: CrudRepository<E> + ?Sized,
{
    repo.delete(id).await?;
    info!("Deleted {} row {}", E::KIND.table(), id);
    Ok(())
}

pub async fn delete_by_document<E, R>(repo: &R, document: &str) -> RepositoryResult<usize>
where
    E: DocumentKeyed,
    R: DocumentRepository<E> + ?Sized,
{
    let deleted = repo.delete_by_document(document).await?;
    info!(
        "Deleted {} row(s) from {} with document {}",
        deleted,
        E::KIND.table(),
        document
    );
    Ok(deleted)
}

// ==================== Patient / doctor cascades ====================

pub async fn find_by_doctor_document<E, R>(repo: &R, document: &str) -> RepositoryResult<Vec<E>>
where
    E: PatientScoped,
    R: CascadeRepository<E> + ?Sized,
{
    repo.find_by_doctor_document(document).await
}

pub async fn find_by_patient_document<E, R>(repo: &R, document: &str) -> RepositoryResult<Vec<E>>
where
    E: PatientScoped,
    R: CascadeRepository<E> + ?Sized,
{
    repo.find_by_patient_document(document).await
}

/// Remove every record of the patient with that document, in one statement.
pub async fn delete_by_patient_document<E, R>(repo: &R, document: &str) -> RepositoryResult<usize>
where
    E: PatientScoped,
    R: CascadeRepository<E> + ?Sized,
{
    let deleted = repo.delete_by_patient_document(document).await?;
    info!(
        "Deleted {} row(s) from {} for patient document {}",
        deleted,
        E::KIND.table(),
        document
    );
    Ok(deleted)
}

/// Overwrite the business fields of every record of that patient.
///
/// Returns the updated records; empty when the patient has none.
pub async fn update_by_patient_document<E, R>(
    repo: &R,
    document: &str,
    changes: &E,
) -> RepositoryResult<Vec<E>>
where
    E: PatientScoped,
    R: CascadeRepository<E> + ?Sized,
{
    let updated = repo.update_by_patient_document(document, changes).await?;
    if updated.is_empty() {
        warn!(
            "Bulk update matched no {} rows for patient document {}",
            E::KIND.table(),
            document
        );
    } else {
        info!(
            "Updated {} row(s) in {} for patient document {}",
            updated.len(),
            E::KIND.table(),
            document
        );
    }
    Ok(updated)
}
