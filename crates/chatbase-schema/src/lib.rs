//! SQL catalogue for the chat widget schema.
//!
//! Every statement here is idempotent: tables and indexes use
//! `IF NOT EXISTS`, policies are guarded by a `pg_policies` lookup, and the
//! executor function uses `CREATE OR REPLACE`. Re-running any of them against
//! a provisioned database is a no-op.

pub mod ddl;
pub mod policies;

use std::fmt::Write;

pub use ddl::{INDEXES, Index, create_table_sql, executor_function_sql, table_statements};
pub use policies::{Policy, PolicyAction, all_policies, enable_rls_sql, rls_statements};

use chatbase_types::Table;

/// One SQL statement plus the label reported while running it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub label: String,
    pub sql: String,
}

/// The full schema as a single script an operator can paste into the
/// backend's SQL editor.
pub fn remediation_script() -> String {
    let mut out = String::new();

    out.push_str("-- Create tables\n");
    for table in Table::ALL {
        out.push_str(create_table_sql(table));
        out.push_str("\n\n");
    }

    out.push_str("-- Create indexes\n");
    for index in &INDEXES {
        out.push_str(&index.create_sql());
        out.push('\n');
    }

    out.push_str("\n-- Enable Row Level Security\n");
    for table in Table::ALL {
        out.push_str(&enable_rls_sql(table));
        out.push('\n');
    }

    out.push_str("\n-- Create policies\n");
    for policy in all_policies() {
        out.push_str(&policy.create_sql());
        out.push('\n');
    }

    out
}

/// Executor definition followed by the full schema. Printed when the
/// executor cannot be created remotely.
pub fn manual_setup_script(executor: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "-- Create {executor} function");
    let _ = writeln!(out, "{}\n", executor_function_sql(executor));
    out.push_str(&remediation_script());
    out
}
