//! Setup and check procedures driven by the binaries.

use tracing::{error, info, warn};

use chatbase_schema::{manual_setup_script, remediation_script};
use chatbase_types::Table;

use crate::backend::RestBackend;
use crate::provisioner::Provisioner;

/// Stages of a setup run, in order. A failure at any point ends the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SetupStage {
    Start,
    ExecutorReady,
    TablesReady,
    PoliciesReady,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupOutcome {
    Done,
    /// `reached` is the last stage completed before the failing step.
    Failed {
        reached: SetupStage,
        remediation: String,
    },
}

impl SetupOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SetupOutcome::Done)
    }
}

/// Executor, then tables, then policies. Nothing is retried.
pub async fn run_setup<B: RestBackend>(provisioner: &Provisioner<B>) -> SetupOutcome {
    let mut stage = SetupStage::Start;

    if provisioner.ensure_sql_executor().await.is_err() {
        warn!("Remote SQL execution unavailable, manual setup required");
        return SetupOutcome::Failed {
            reached: stage,
            remediation: manual_setup_script(provisioner.executor()),
        };
    }
    stage = advance(stage, SetupStage::ExecutorReady);

    let tables = provisioner.ensure_tables().await;
    if !tables.is_success() {
        error!("Failed to create {} of {} schema objects", tables.failures().count(), tables.attempted());
        return SetupOutcome::Failed {
            reached: stage,
            remediation: remediation_script(),
        };
    }
    stage = advance(stage, SetupStage::TablesReady);

    let policies = provisioner.ensure_row_level_security().await;
    if !policies.is_success() {
        error!("Failed to set up {} of {} policy statements", policies.failures().count(), policies.attempted());
        return SetupOutcome::Failed {
            reached: stage,
            remediation: remediation_script(),
        };
    }
    stage = advance(stage, SetupStage::PoliciesReady);

    advance(stage, SetupStage::Done);
    SetupOutcome::Done
}

fn advance(from: SetupStage, to: SetupStage) -> SetupStage {
    info!("Setup stage {:?} -> {:?}", from, to);
    to
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// All tables present and the smoke test passed.
    Healthy,
    /// All tables present but the write/delete probe failed.
    PermissionIssue,
    NotReady {
        present: Vec<Table>,
        remediation: String,
    },
    Unreachable,
}

impl CheckOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CheckOutcome::Healthy)
    }
}

/// Verification only. Never changes the schema.
pub async fn run_check<B: RestBackend>(provisioner: &Provisioner<B>) -> CheckOutcome {
    if !provisioner.check_connection().await {
        return CheckOutcome::Unreachable;
    }

    let present = provisioner.verify_schema().await;
    if present.len() < Table::ALL.len() {
        info!("Found {}/{} tables", present.len(), Table::ALL.len());
        return CheckOutcome::NotReady {
            present,
            remediation: remediation_script(),
        };
    }

    info!("All tables exist, testing functionality...");
    match provisioner.smoke_test().await {
        Ok(()) => CheckOutcome::Healthy,
        Err(e) => {
            warn!("Tables exist but the smoke test failed: {}", e);
            CheckOutcome::PermissionIssue
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, FakeBackend};
    use chatbase_schema::executor_function_sql;

    fn provisioner(backend: FakeBackend) -> Provisioner<FakeBackend> {
        Provisioner::new(backend, "execute_sql")
    }

    #[tokio::test]
    async fn test_setup_on_fresh_backend_prints_manual_script() {
        let p = provisioner(FakeBackend::new());

        let outcome = run_setup(&p).await;
        let SetupOutcome::Failed { reached, remediation } = outcome else {
            panic!("expected failure");
        };
        assert_eq!(reached, SetupStage::Start);
        assert!(remediation.contains(&executor_function_sql("execute_sql")));
        assert_eq!(remediation.matches("CREATE TABLE IF NOT EXISTS").count(), 4);

        // Stops right after the executor attempt.
        assert_eq!(p.backend().rpc_count(), 1);
    }

    #[tokio::test]
    async fn test_setup_success() {
        let p = provisioner(FakeBackend::with_executor());

        assert_eq!(run_setup(&p).await, SetupOutcome::Done);
        // 1 executor + 9 table/index + 20 RLS statements
        assert_eq!(p.backend().rpc_count(), 30);
        assert_eq!(p.verify_schema().await.len(), 4);
    }

    #[tokio::test]
    async fn test_setup_twice_is_still_success() {
        let p = provisioner(FakeBackend::with_executor());
        assert!(run_setup(&p).await.is_success());
        assert!(run_setup(&p).await.is_success());
    }

    #[tokio::test]
    async fn test_setup_stops_after_table_failure() {
        let backend = FakeBackend::with_executor();
        backend.fail_sql_containing("idx_messages_user_id");
        let p = provisioner(backend);

        let outcome = run_setup(&p).await;
        assert!(matches!(
            outcome,
            SetupOutcome::Failed { reached: SetupStage::ExecutorReady, .. }
        ));
        // No RLS statements were sent.
        assert_eq!(p.backend().rpc_count(), 10);
    }

    #[tokio::test]
    async fn test_setup_policy_failure() {
        let backend = FakeBackend::with_executor();
        backend.fail_sql_containing("ALTER TABLE typing_indicators");
        let p = provisioner(backend);

        let outcome = run_setup(&p).await;
        let SetupOutcome::Failed { reached, remediation } = outcome else {
            panic!("expected failure");
        };
        assert_eq!(reached, SetupStage::TablesReady);
        assert_eq!(remediation.matches("CREATE POLICY").count(), 16);
        assert_eq!(p.backend().rpc_count(), 30);
    }

    #[tokio::test]
    async fn test_check_with_no_tables_is_not_ready() {
        let p = provisioner(FakeBackend::new());

        let outcome = run_check(&p).await;
        let CheckOutcome::NotReady { present, remediation } = outcome else {
            panic!("expected not ready");
        };
        assert!(present.is_empty());
        assert_eq!(remediation.matches("CREATE TABLE IF NOT EXISTS").count(), 4);
        assert_eq!(remediation.matches("CREATE INDEX IF NOT EXISTS").count(), 5);
        assert_eq!(remediation.matches("CREATE POLICY").count(), 16);

        // Never touches rows when tables are missing.
        assert!(!p.backend().calls().iter().any(|c| matches!(c, Call::Insert { .. })));
    }

    #[tokio::test]
    async fn test_check_with_some_tables() {
        let backend = FakeBackend::new();
        backend.add_table("messages");
        backend.add_table("usernames");
        let p = provisioner(backend);

        let CheckOutcome::NotReady { present, .. } = run_check(&p).await else {
            panic!("expected not ready");
        };
        assert_eq!(present, vec![Table::Messages, Table::Usernames]);
    }

    #[tokio::test]
    async fn test_check_healthy() {
        let p = provisioner(FakeBackend::provisioned());
        assert_eq!(run_check(&p).await, CheckOutcome::Healthy);
        assert_eq!(p.backend().deletes(), 1);
    }

    #[tokio::test]
    async fn test_check_permission_issue() {
        let backend = FakeBackend::provisioned();
        backend.set_insert_status(reqwest::StatusCode::UNAUTHORIZED);
        let p = provisioner(backend);

        assert_eq!(run_check(&p).await, CheckOutcome::PermissionIssue);
        assert_eq!(p.backend().deletes(), 1);
    }

    #[tokio::test]
    async fn test_check_unreachable() {
        let backend = FakeBackend::new();
        backend.set_offline(true);
        let p = provisioner(backend);

        assert_eq!(run_check(&p).await, CheckOutcome::Unreachable);
    }

    #[tokio::test]
    async fn test_check_bare_not_found_is_unreachable() {
        // Every read answers 404 with no relation code, as a wrong base URL would.
        let backend = FakeBackend::new();
        for table in Table::ALL {
            backend.set_read_status(table.name(), reqwest::StatusCode::NOT_FOUND);
        }
        let p = provisioner(backend);

        assert_eq!(run_check(&p).await, CheckOutcome::Unreachable);
        assert!(p.backend().calls().iter().all(|c| matches!(c, Call::Read { .. })));
    }
}
