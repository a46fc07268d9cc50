use chatbase_types::Table;

use crate::Statement;

/// Command a row-level policy applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyAction {
    Select,
    Insert,
    Update,
    Delete,
}

impl PolicyAction {
    pub const ALL: [PolicyAction; 4] = [
        PolicyAction::Select,
        PolicyAction::Insert,
        PolicyAction::Update,
        PolicyAction::Delete,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            PolicyAction::Select => "SELECT",
            PolicyAction::Insert => "INSERT",
            PolicyAction::Update => "UPDATE",
            PolicyAction::Delete => "DELETE",
        }
    }

    fn slug(self) -> &'static str {
        match self {
            PolicyAction::Select => "select",
            PolicyAction::Insert => "insert",
            PolicyAction::Update => "update",
            PolicyAction::Delete => "delete",
        }
    }

    // INSERT policies only accept WITH CHECK.
    fn predicate(self) -> &'static str {
        match self {
            PolicyAction::Insert => "WITH CHECK (true)",
            _ => "USING (true)",
        }
    }
}

/// A permissive allow-all policy for one table and one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
    pub table: Table,
    pub action: PolicyAction,
}

impl Policy {
    pub fn name(&self) -> String {
        format!("{}_{}_all", self.table, self.action.slug())
    }

    /// Postgres has no `CREATE POLICY IF NOT EXISTS`, so the create is
    /// guarded by a `pg_policies` lookup inside an anonymous block.
    pub fn create_sql(&self) -> String {
        let name = self.name();
        format!(
            "DO $$ BEGIN
    IF NOT EXISTS (
        SELECT 1 FROM pg_policies
        WHERE schemaname = 'public' AND tablename = '{table}' AND policyname = '{name}'
    ) THEN
        CREATE POLICY \"{name}\" ON {table} FOR {action} {predicate};
    END IF;
END $$;",
            table = self.table,
            action = self.action.keyword(),
            predicate = self.action.predicate(),
        )
    }
}

/// Every policy, grouped by table.
pub fn all_policies() -> Vec<Policy> {
    Table::ALL
        .into_iter()
        .flat_map(|table| {
            PolicyAction::ALL
                .into_iter()
                .map(move |action| Policy { table, action })
        })
        .collect()
}

pub fn enable_rls_sql(table: Table) -> String {
    format!("ALTER TABLE {table} ENABLE ROW LEVEL SECURITY;")
}

/// RLS enable statements for all tables, then the policies.
pub fn rls_statements() -> Vec<Statement> {
    let enable = Table::ALL.into_iter().map(|table| Statement {
        label: format!("RLS on {table}"),
        sql: enable_rls_sql(table),
    });
    let policies = all_policies().into_iter().map(|policy| Statement {
        label: format!("policy {}", policy.name()),
        sql: policy.create_sql(),
    });
    enable.chain(policies).collect()
}
