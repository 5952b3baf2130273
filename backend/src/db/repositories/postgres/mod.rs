//! Postgres repository implementation using Diesel.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Read-only transactions for reads, one transaction per write
//! - Set-based cascade updates and deletes (single statement each)
//! - Patient-scoped rows returned with their patient and doctor embedded
//! - Automatic migration execution
//!
//! Failures are never retried; they surface to the caller as store errors.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task;

use crate::db::repository::{
    CascadeRepository, CrudRepository, DocumentRepository, ErrorContext, HealthRepository,
    RepositoryError, RepositoryResult,
};
use crate::models::{
    attach_parents, Administrador, CitaMedica, Entity, ExamenMedico, HistoriaClinica, Medico,
    Paciente, PatientScoped,
};

mod models;
mod schema;

use models::*;
use schema::*;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    /// Connection checkout timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
        }
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
    /// - `PG_POOL_MAX`: Maximum pool size (default: 10)
    /// - `PG_POOL_MIN`: Minimum pool size (default: 1)
    /// - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
    /// - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let defaults = Self::default();
        Ok(Self {
            database_url,
            max_pool_size: env_or("PG_POOL_MAX", defaults.max_pool_size),
            min_pool_size: env_or("PG_POOL_MIN", defaults.min_pool_size),
            connection_timeout_sec: env_or("PG_CONN_TIMEOUT_SEC", defaults.connection_timeout_sec),
            idle_timeout_sec: env_or("PG_IDLE_TIMEOUT_SEC", defaults.idle_timeout_sec),
        })
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

/// Pool health statistics.
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    /// Number of connections currently in use
    pub connections_in_use: u32,
    /// Number of idle connections
    pub idle_connections: u32,
    /// Total number of connections in the pool
    pub total_connections: u32,
    /// Maximum pool size
    pub max_size: u32,
    /// Total statements executed
    pub total_queries: u64,
    /// Total failed statements
    pub failed_queries: u64,
}

/// Diesel-backed repository for Postgres.
#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
    total_queries: Arc<AtomicU64>,
    failed_queries: Arc<AtomicU64>,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    ///
    /// # Returns
    /// * `Ok(PostgresRepository)` on success
    /// * `Err(RepositoryError)` if connection or migration fails
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        {
            let mut conn = pool
                .get()
                .map_err(|e| RepositoryError::from(e).with_operation("get_connection_for_migrations"))?;
            Self::run_migrations(&mut conn)?;
        }

        Ok(Self {
            pool,
            config,
            total_queries: Arc::new(AtomicU64::new(0)),
            failed_queries: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Run pending database migrations.
    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;

        Ok(())
    }

    /// Run a blocking database operation on a pooled connection.
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        let total_queries = self.total_queries.clone();
        let failed_queries = self.failed_queries.clone();

        task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(|e| {
                failed_queries.fetch_add(1, Ordering::Relaxed);
                RepositoryError::from(e).with_operation("get_connection")
            })?;

            total_queries.fetch_add(1, Ordering::Relaxed);
            f(&mut conn).inspect_err(|_| {
                failed_queries.fetch_add(1, Ordering::Relaxed);
            })
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }

    /// Run `f` inside a read-only transaction.
    async fn read<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static,
    {
        self.with_conn(move |conn| conn.build_transaction().read_only().run(f))
            .await
    }

    /// Run `f` inside a read-write transaction.
    async fn write<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static,
    {
        self.with_conn(move |conn| conn.transaction(f)).await
    }

    /// Get pool health statistics.
    pub fn get_pool_stats(&self) -> PoolStats {
        let state = self.pool.state();
        PoolStats {
            connections_in_use: state.connections - state.idle_connections,
            idle_connections: state.idle_connections,
            total_connections: state.connections,
            max_size: self.config.max_pool_size,
            total_queries: self.total_queries.load(Ordering::Relaxed),
            failed_queries: self.failed_queries.load(Ordering::Relaxed),
        }
    }
}

fn map_diesel_error(err: diesel::result::Error) -> RepositoryError {
    RepositoryError::from(err)
}

/// Fills in referenced records on rows about to leave the store.
trait LoadParents: Sized {
    fn load_parents(_conn: &mut PgConnection, _rows: &mut [Self]) -> RepositoryResult<()> {
        Ok(())
    }
}

impl LoadParents for Administrador {}
impl LoadParents for Medico {}
impl LoadParents for Paciente {}

/// One query per parent table, whatever the number of rows.
fn load_stored_parents<E: PatientScoped>(
    conn: &mut PgConnection,
    rows: &mut [E],
) -> RepositoryResult<()> {
    if rows.is_empty() {
        return Ok(());
    }
    let paciente_ids: Vec<i64> = rows.iter().map(|row| row.paciente_id()).collect();
    let medico_ids: Vec<i64> = rows.iter().map(|row| row.medico_id()).collect();

    let pacientes_by_id: HashMap<i64, Paciente> = pacientes::table
        .filter(pacientes::idpaciente.eq_any(paciente_ids))
        .select(PacienteRow::as_select())
        .load::<PacienteRow>(conn)
        .map_err(map_diesel_error)?
        .into_iter()
        .map(|row| (row.idpaciente, Paciente::from(row)))
        .collect();
    let medicos_by_id: HashMap<i64, Medico> = medicos::table
        .filter(medicos::idmedico.eq_any(medico_ids))
        .select(MedicoRow::as_select())
        .load::<MedicoRow>(conn)
        .map_err(map_diesel_error)?
        .into_iter()
        .map(|row| (row.idmedico, Medico::from(row)))
        .collect();

    attach_parents(
        rows,
        |id| pacientes_by_id.get(&id).cloned(),
        |id| medicos_by_id.get(&id).cloned(),
    );
    Ok(())
}

macro_rules! pg_parents {
    ($($entity:ty),* $(,)?) => {
        $(
            impl LoadParents for $entity {
                fn load_parents(conn: &mut PgConnection, rows: &mut [Self]) -> RepositoryResult<()> {
                    load_stored_parents(conn, rows)
                }
            }
        )*
    };
}

pg_parents!(CitaMedica, ExamenMedico, HistoriaClinica);

#[async_trait]
impl HealthRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn(|conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(map_diesel_error)
        })
        .await
    }
}

/// `CrudRepository` for one table.
macro_rules! pg_crud {
    ($entity:ty, $table:ident, $id:ident, $row:ty, $new_row:ty) => {
        #[async_trait]
        impl CrudRepository<$entity> for PostgresRepository {
            async fn find_all(&self) -> RepositoryResult<Vec<$entity>> {
                self.read(|conn| {
                    let mut rows: Vec<$entity> = $table::table
                        .order($table::$id.asc())
                        .select(<$row>::as_select())
                        .load::<$row>(conn)
                        .map_err(map_diesel_error)?
                        .into_iter()
                        .map(<$entity>::from)
                        .collect();
                    <$entity>::load_parents(conn, &mut rows)?;
                    Ok(rows)
                })
                .await
                .map_err(|e| e.with_operation("find_all").with_entity(stringify!($table)))
            }

            async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<$entity>> {
                self.read(move |conn| {
                    let mut row = $table::table
                        .find(id)
                        .select(<$row>::as_select())
                        .first::<$row>(conn)
                        .optional()
                        .map_err(map_diesel_error)?
                        .map(<$entity>::from);
                    if let Some(row) = row.as_mut() {
                        <$entity>::load_parents(conn, std::slice::from_mut(row))?;
                    }
                    Ok(row)
                })
                .await
                .map_err(|e| e.with_operation("find_by_id").with_entity(stringify!($table)))
            }

            async fn save(&self, entity: &$entity) -> RepositoryResult<$entity> {
                let values = <$new_row>::from(entity);
                let id = entity.id();
                self.write(move |conn| {
                    let row = match id {
                        None => diesel::insert_into($table::table)
                            .values(&values)
                            .returning(<$row>::as_returning())
                            .get_result::<$row>(conn),
                        Some(id) => diesel::update($table::table.find(id))
                            .set(&values)
                            .returning(<$row>::as_returning())
                            .get_result::<$row>(conn),
                    }
                    .map_err(map_diesel_error)?;
                    let mut saved = <$entity>::from(row);
                    <$entity>::load_parents(conn, std::slice::from_mut(&mut saved))?;
                    Ok(saved)
                })
                .await
                .map_err(|e| e.with_operation("save").with_entity(stringify!($table)))
            }

            async fn delete(&self, id: i64) -> RepositoryResult<()> {
                self.write(move |conn| {
                    diesel::delete($table::table.find(id))
                        .execute(conn)
                        .map(|_| ())
                        .map_err(map_diesel_error)
                })
                .await
                .map_err(|e| e.with_operation("delete").with_entity(stringify!($table)))
            }
        }
    };
}

/// `DocumentRepository` for one person table.
macro_rules! pg_document {
    ($entity:ty, $table:ident, $id:ident, $row:ty) => {
        #[async_trait]
        impl DocumentRepository<$entity> for PostgresRepository {
            async fn find_by_document(&self, document: &str) -> RepositoryResult<Option<$entity>> {
                let document = document.to_owned();
                self.read(move |conn| {
                    let mut rows = $table::table
                        .filter($table::numero_documento.eq(&document))
                        .order($table::$id.asc())
                        .select(<$row>::as_select())
                        .load::<$row>(conn)
                        .map_err(map_diesel_error)?;
                    if rows.len() > 1 {
                        return Err(RepositoryError::query_with_context(
                            format!("query did not return a unique result: {}", rows.len()),
                            ErrorContext::default().with_entity_id(&document),
                        ));
                    }
                    Ok(rows.pop().map(<$entity>::from))
                })
                .await
                .map_err(|e| {
                    e.with_operation("find_by_document")
                        .with_entity(stringify!($table))
                })
            }

            async fn delete_by_document(&self, document: &str) -> RepositoryResult<usize> {
                let document = document.to_owned();
                self.write(move |conn| {
                    diesel::delete($table::table.filter($table::numero_documento.eq(&document)))
                        .execute(conn)
                        .map_err(map_diesel_error)
                })
                .await
                .map_err(|e| {
                    e.with_operation("delete_by_document")
                        .with_entity(stringify!($table))
                })
            }
        }
    };
}

/// `CascadeRepository` for one patient-scoped table.
macro_rules! pg_cascade {
    ($entity:ty, $table:ident, $id:ident, $row:ty, $changes:ty) => {
        #[async_trait]
        impl CascadeRepository<$entity> for PostgresRepository {
            async fn find_by_doctor_document(
                &self,
                document: &str,
            ) -> RepositoryResult<Vec<$entity>> {
                let document = document.to_owned();
                self.read(move |conn| {
                    let mut rows: Vec<$entity> = $table::table
                        .inner_join(medicos::table)
                        .filter(medicos::numero_documento.eq(&document))
                        .order($table::$id.asc())
                        .select(<$row>::as_select())
                        .load::<$row>(conn)
                        .map_err(map_diesel_error)?
                        .into_iter()
                        .map(<$entity>::from)
                        .collect();
                    <$entity>::load_parents(conn, &mut rows)?;
                    Ok(rows)
                })
                .await
                .map_err(|e| {
                    e.with_operation("find_by_doctor_document")
                        .with_entity(stringify!($table))
                })
            }

            async fn find_by_patient_document(
                &self,
                document: &str,
            ) -> RepositoryResult<Vec<$entity>> {
                let document = document.to_owned();
                self.read(move |conn| {
                    let mut rows: Vec<$entity> = $table::table
                        .inner_join(pacientes::table)
                        .filter(pacientes::numero_documento.eq(&document))
                        .order($table::$id.asc())
                        .select(<$row>::as_select())
                        .load::<$row>(conn)
                        .map_err(map_diesel_error)?
                        .into_iter()
                        .map(<$entity>::from)
                        .collect();
                    <$entity>::load_parents(conn, &mut rows)?;
                    Ok(rows)
                })
                .await
                .map_err(|e| {
                    e.with_operation("find_by_patient_document")
                        .with_entity(stringify!($table))
                })
            }

            async fn delete_by_patient_document(&self, document: &str) -> RepositoryResult<usize> {
                let document = document.to_owned();
                self.write(move |conn| {
                    let patients = pacientes::table
                        .filter(pacientes::numero_documento.eq(&document))
                        .select(pacientes::idpaciente);
                    diesel::delete(
                        $table::table.filter($table::pacientes_idpaciente.eq_any(patients)),
                    )
                    .execute(conn)
                    .map_err(map_diesel_error)
                })
                .await
                .map_err(|e| {
                    e.with_operation("delete_by_patient_document")
                        .with_entity(stringify!($table))
                })
            }

            async fn update_by_patient_document(
                &self,
                document: &str,
                changes: &$entity,
            ) -> RepositoryResult<Vec<$entity>> {
                let document = document.to_owned();
                let changes = <$changes>::from(changes);
                self.write(move |conn| {
                    let patients = pacientes::table
                        .filter(pacientes::numero_documento.eq(&document))
                        .select(pacientes::idpaciente);
                    let mut rows = diesel::update(
                        $table::table.filter($table::pacientes_idpaciente.eq_any(patients)),
                    )
                    .set(&changes)
                    .returning(<$row>::as_returning())
                    .get_results::<$row>(conn)
                    .map_err(map_diesel_error)?;
                    rows.sort_by_key(|row| row.$id);
                    let mut updated: Vec<$entity> = rows.into_iter().map(<$entity>::from).collect();
                    <$entity>::load_parents(conn, &mut updated)?;
                    Ok(updated)
                })
                .await
                .map_err(|e| {
                    e.with_operation("update_by_patient_document")
                        .with_entity(stringify!($table))
                })
            }
        }
    };
}

pg_crud!(Administrador, administradores, idadministrador, AdministradorRow, NewAdministradorRow);
pg_crud!(Medico, medicos, idmedico, MedicoRow, NewMedicoRow);
pg_crud!(Paciente, pacientes, idpaciente, PacienteRow, NewPacienteRow);
pg_crud!(CitaMedica, citas_medicas, idcita, CitaMedicaRow, NewCitaMedicaRow);
pg_crud!(ExamenMedico, examenes_medicos, idexamen, ExamenMedicoRow, NewExamenMedicoRow);
pg_crud!(HistoriaClinica, historias_clinicas, idhistoria, HistoriaClinicaRow, NewHistoriaClinicaRow);

pg_document!(Administrador, administradores, idadministrador, AdministradorRow);
pg_document!(Medico, medicos, idmedico, MedicoRow);
pg_document!(Paciente, pacientes, idpaciente, PacienteRow);

pg_cascade!(CitaMedica, citas_medicas, idcita, CitaMedicaRow, CitaMedicaChanges);
pg_cascade!(ExamenMedico, examenes_medicos, idexamen, ExamenMedicoRow, ExamenMedicoChanges);
pg_cascade!(HistoriaClinica, historias_clinicas, idhistoria, HistoriaClinicaRow, HistoriaClinicaChanges);
