use chrono::Utc;
use reqwest::StatusCode;
use tracing::{error, info, warn};

use chatbase_schema::{Statement, executor_function_sql, rls_statements, table_statements};
use chatbase_types::{NewUsername, Table};

use crate::backend::{RestBackend, TableProbe};
use crate::error::{BackendError, StepError};

/// Fixed key of the disposable smoke-test row.
pub const SMOKE_TEST_USER_ID: &str = "chatbase_smoke_probe";
const SMOKE_TEST_USERNAME: &str = "chatbase_smoke_probe";

/// Outcome of one statement within a batch.
#[derive(Debug)]
pub struct StatementOutcome {
    pub label: String,
    pub result: Result<(), StepError>,
}

/// Per-statement results of a batch. Every statement is attempted even after
/// an earlier one failed.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<StatementOutcome>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }

    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    pub fn failures(&self) -> impl Iterator<Item = &StatementOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }
}

/// Ensures the chat schema exists on a backend.
///
/// Every step is idempotent; a second run against a provisioned backend
/// reports the same success as the first.
pub struct Provisioner<B> {
    backend: B,
    executor: String,
}

impl<B: RestBackend> Provisioner<B> {
    pub fn new(backend: B, executor: impl Into<String>) -> Self {
        Self {
            backend,
            executor: executor.into(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn executor(&self) -> &str {
        &self.executor
    }

    /// Run one statement through the remote SQL executor.
    pub async fn execute_sql(&self, sql: &str) -> Result<(), StepError> {
        let args = serde_json::json!({ "sql": sql });
        let reply = self.backend.rpc(&self.executor, &args).await?;

        // `void` functions answer 204 on newer gateways.
        if reply.status == StatusCode::OK || reply.status == StatusCode::NO_CONTENT {
            Ok(())
        } else {
            Err(StepError::Rejected {
                status: reply.status,
                body: reply.body,
            })
        }
    }

    /// Create or replace the SQL executor function.
    ///
    /// Goes through the executor itself, so it only succeeds on backends
    /// where some executor already exists. Failing here is the common case
    /// on a fresh project.
    pub async fn ensure_sql_executor(&self) -> Result<(), StepError> {
        info!("Creating {} function...", self.executor);
        let sql = executor_function_sql(&self.executor);
        match self.execute_sql(&sql).await {
            Ok(()) => {
                info!("{} function is ready", self.executor);
                Ok(())
            }
            Err(e) => {
                warn!("Could not create {} function: {}", self.executor, e);
                Err(e)
            }
        }
    }

    /// Tables first, then indexes.
    pub async fn ensure_tables(&self) -> BatchReport {
        self.run_batch(table_statements()).await
    }

    /// Enable RLS on every table, then install the allow-all policies.
    pub async fn ensure_row_level_security(&self) -> BatchReport {
        self.run_batch(rls_statements()).await
    }

    async fn run_batch(&self, statements: Vec<Statement>) -> BatchReport {
        let mut report = BatchReport::default();
        for stmt in statements {
            info!("Creating {}...", stmt.label);
            let result = self.execute_sql(&stmt.sql).await;
            match &result {
                Ok(()) => info!("Created {}", stmt.label),
                Err(e) => error!("Failed to create {}: {}", stmt.label, e),
            }
            report.outcomes.push(StatementOutcome {
                label: stmt.label,
                result,
            });
        }
        report
    }

    pub async fn probe_table(&self, table: Table) -> Result<TableProbe, BackendError> {
        let reply = self.backend.read_one(table.name()).await?;
        Ok(TableProbe::classify(&reply))
    }

    /// The backend is reachable and accepts the credential when a probe of
    /// `messages` comes back either present or absent.
    pub async fn check_connection(&self) -> bool {
        match self.probe_table(Table::Messages).await {
            Ok(TableProbe::Present) => {
                info!("Connection ok, tables already exist");
                true
            }
            Ok(TableProbe::Absent) => {
                info!("Connection ok, tables don't exist yet");
                true
            }
            Ok(TableProbe::Undetermined(status)) => {
                error!("Connection check got unexpected status {}", status);
                false
            }
            Err(e) => {
                error!("Connection check failed: {}", e);
                false
            }
        }
    }

    /// Tables confirmed present, in [`Table::ALL`] order.
    pub async fn verify_schema(&self) -> Vec<Table> {
        let mut present = Vec::new();
        for table in Table::ALL {
            match self.probe_table(table).await {
                Ok(TableProbe::Present) => {
                    info!("Table '{}' exists", table);
                    present.push(table);
                }
                Ok(TableProbe::Absent) => warn!("Table '{}' does not exist", table),
                Ok(TableProbe::Undetermined(status)) => {
                    warn!("Table '{}' could not be confirmed (status: {})", table, status)
                }
                Err(e) => warn!("Error checking table '{}': {}", table, e),
            }
        }
        present
    }

    /// Insert and remove a sentinel username reservation.
    ///
    /// The delete always runs, whatever the insert did. Its own failure is
    /// only logged.
    pub async fn smoke_test(&self) -> Result<(), StepError> {
        let row = NewUsername {
            user_id: SMOKE_TEST_USER_ID.to_string(),
            username: SMOKE_TEST_USERNAME.to_string(),
            created_at: Utc::now(),
        };
        let body = serde_json::to_value(&row)?;

        let inserted = match self.backend.insert(Table::Usernames.name(), &body).await {
            Ok(reply) if reply.status == StatusCode::OK || reply.status == StatusCode::CREATED => {
                info!("Username insert test: {}", reply.status);
                Ok(())
            }
            Ok(reply) => {
                error!("Username insert failed ({}): {}", reply.status, reply.body);
                Err(StepError::Rejected {
                    status: reply.status,
                    body: reply.body,
                })
            }
            Err(e) => {
                error!("Username insert failed: {}", e);
                Err(e.into())
            }
        };

        match self
            .backend
            .delete_eq(Table::Usernames.name(), "user_id", SMOKE_TEST_USER_ID)
            .await
        {
            Ok(reply) if reply.is_success() => {}
            Ok(reply) => warn!("Smoke-test cleanup got status {}", reply.status),
            Err(e) => warn!("Smoke-test cleanup failed: {}", e),
        }

        inserted
    }
}
