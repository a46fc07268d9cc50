//! In-memory stand-in for the REST backend.

use std::cell::RefCell;
use std::collections::HashMap;

use reqwest::StatusCode;
use serde_json::Value;

use crate::backend::{Reply, RestBackend};
use crate::error::BackendError;

const EXECUTOR: &str = "execute_sql";
const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Read { table: String },
    Insert { table: String, row: Value },
    Delete { table: String, column: String, value: String },
    Rpc { function: String, sql: String },
}

#[derive(Default)]
struct FakeState {
    tables: HashMap<String, Vec<Value>>,
    executor_installed: bool,
    failing_sql: Vec<String>,
    read_status: HashMap<String, StatusCode>,
    insert_status: Option<StatusCode>,
    offline: bool,
    calls: Vec<Call>,
}

#[derive(Default)]
pub struct FakeBackend {
    state: RefCell<FakeState>,
}

fn missing_table(table: &str) -> Reply {
    Reply::new(
        StatusCode::NOT_FOUND,
        format!(
            r#"{{"code":"PGRST205","message":"Could not find the table 'public.{}' in the schema cache"}}"#,
            table
        ),
    )
}

impl FakeBackend {
    /// Fresh project: no tables, no executor.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_executor() -> Self {
        let backend = Self::new();
        backend.state.borrow_mut().executor_installed = true;
        backend
    }

    /// Executor and all four tables in place.
    pub fn provisioned() -> Self {
        let backend = Self::with_executor();
        for table in ["messages", "user_presence", "typing_indicators", "usernames"] {
            backend.add_table(table);
        }
        backend
    }

    pub fn add_table(&self, table: &str) {
        self.state.borrow_mut().tables.entry(table.to_string()).or_default();
    }

    /// Reject every SQL statement containing `needle`.
    pub fn fail_sql_containing(&self, needle: &str) {
        self.state.borrow_mut().failing_sql.push(needle.to_string());
    }

    pub fn set_read_status(&self, table: &str, status: StatusCode) {
        self.state.borrow_mut().read_status.insert(table.to_string(), status);
    }

    pub fn set_insert_status(&self, status: StatusCode) {
        self.state.borrow_mut().insert_status = Some(status);
    }

    pub fn set_offline(&self, offline: bool) {
        self.state.borrow_mut().offline = offline;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn deletes(&self) -> usize {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|c| matches!(c, Call::Delete { .. }))
            .count()
    }

    pub fn rpc_count(&self) -> usize {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|c| matches!(c, Call::Rpc { .. }))
            .count()
    }

    pub fn row_count(&self, table: &str) -> usize {
        self.state.borrow().tables.get(table).map_or(0, Vec::len)
    }

    fn record(&self, call: Call) -> Result<(), BackendError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(call);
        if state.offline {
            Err(BackendError::Transport("connection refused".into()))
        } else {
            Ok(())
        }
    }
}

impl RestBackend for FakeBackend {
    async fn read_one(&self, table: &str) -> Result<Reply, BackendError> {
        self.record(Call::Read { table: table.to_string() })?;
        let state = self.state.borrow();

        if let Some(status) = state.read_status.get(table) {
            return Ok(Reply::new(*status, "{}"));
        }
        match state.tables.get(table) {
            Some(rows) => {
                let page: Vec<&Value> = rows.iter().take(1).collect();
                Ok(Reply::new(StatusCode::OK, serde_json::to_string(&page).unwrap()))
            }
            None => Ok(missing_table(table)),
        }
    }

    async fn insert(&self, table: &str, row: &Value) -> Result<Reply, BackendError> {
        self.record(Call::Insert {
            table: table.to_string(),
            row: row.clone(),
        })?;
        let mut state = self.state.borrow_mut();

        if let Some(status) = state.insert_status {
            return Ok(Reply::new(status, "{}"));
        }
        match state.tables.get_mut(table) {
            Some(rows) => {
                rows.push(row.clone());
                Ok(Reply::new(StatusCode::CREATED, ""))
            }
            None => Ok(missing_table(table)),
        }
    }

    async fn delete_eq(&self, table: &str, column: &str, value: &str) -> Result<Reply, BackendError> {
        self.record(Call::Delete {
            table: table.to_string(),
            column: column.to_string(),
            value: value.to_string(),
        })?;
        let mut state = self.state.borrow_mut();

        match state.tables.get_mut(table) {
            Some(rows) => {
                rows.retain(|row| row.get(column).and_then(Value::as_str) != Some(value));
                Ok(Reply::new(StatusCode::NO_CONTENT, ""))
            }
            None => Ok(missing_table(table)),
        }
    }

    async fn rpc(&self, function: &str, args: &Value) -> Result<Reply, BackendError> {
        let sql = args.get("sql").and_then(Value::as_str).unwrap_or_default().to_string();
        self.record(Call::Rpc {
            function: function.to_string(),
            sql: sql.clone(),
        })?;
        let mut state = self.state.borrow_mut();

        if function != EXECUTOR || !state.executor_installed {
            return Ok(Reply::new(
                StatusCode::NOT_FOUND,
                format!(r#"{{"code":"PGRST202","message":"Could not find the function public.{}(sql)"}}"#, function),
            ));
        }
        if state.failing_sql.iter().any(|needle| sql.contains(needle.as_str())) {
            return Ok(Reply::new(
                StatusCode::BAD_REQUEST,
                r#"{"code":"42601","message":"syntax error"}"#,
            ));
        }
        if let Some(rest) = sql.strip_prefix(CREATE_TABLE) {
            let name: String = rest
                .chars()
                .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
                .collect();
            state.tables.entry(name).or_default();
        }
        Ok(Reply::new(StatusCode::OK, ""))
    }
}
