use chatbase_types::Table;

use crate::Statement;

/// A single-column index on one of the chat tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Index {
    pub name: &'static str,
    pub table: Table,
    pub column: &'static str,
}

pub const INDEXES: [Index; 5] = [
    Index { name: "idx_messages_created_at", table: Table::Messages, column: "created_at" },
    Index { name: "idx_messages_user_id", table: Table::Messages, column: "user_id" },
    Index { name: "idx_user_presence_last_seen", table: Table::UserPresence, column: "last_seen" },
    Index { name: "idx_typing_created_at", table: Table::TypingIndicators, column: "created_at" },
    Index { name: "idx_usernames_username", table: Table::Usernames, column: "username" },
];

impl Index {
    pub fn create_sql(&self) -> String {
        format!(
            "CREATE INDEX IF NOT EXISTS {} ON {}({});",
            self.name, self.table, self.column
        )
    }
}

/// `CREATE TABLE IF NOT EXISTS` text for one table.
pub fn create_table_sql(table: Table) -> &'static str {
    match table {
        Table::Messages => {
            "CREATE TABLE IF NOT EXISTS messages (
    id UUID DEFAULT gen_random_uuid() PRIMARY KEY,
    user_id TEXT NOT NULL,
    username TEXT NOT NULL,
    content TEXT,
    message_type TEXT DEFAULT 'text' CHECK (message_type IN ('text', 'file')),
    file_name TEXT,
    file_url TEXT,
    file_type TEXT,
    created_at TIMESTAMPTZ DEFAULT NOW()
);"
        }
        Table::UserPresence => {
            "CREATE TABLE IF NOT EXISTS user_presence (
    id UUID DEFAULT gen_random_uuid() PRIMARY KEY,
    user_id TEXT UNIQUE NOT NULL,
    username TEXT NOT NULL,
    last_seen TIMESTAMPTZ DEFAULT NOW()
);"
        }
        Table::TypingIndicators => {
            "CREATE TABLE IF NOT EXISTS typing_indicators (
    id UUID DEFAULT gen_random_uuid() PRIMARY KEY,
    user_id TEXT UNIQUE NOT NULL,
    username TEXT NOT NULL,
    created_at TIMESTAMPTZ DEFAULT NOW()
);"
        }
        Table::Usernames => {
            "CREATE TABLE IF NOT EXISTS usernames (
    id UUID DEFAULT gen_random_uuid() PRIMARY KEY,
    user_id TEXT UNIQUE NOT NULL,
    username TEXT UNIQUE NOT NULL,
    created_at TIMESTAMPTZ DEFAULT NOW()
);"
        }
    }
}

/// Table statements first, then index statements. Indexes depend on the
/// tables, so the order matters when run one by one.
pub fn table_statements() -> Vec<Statement> {
    let tables = Table::ALL.into_iter().map(|table| Statement {
        label: format!("{} table", table.label()),
        sql: create_table_sql(table).to_string(),
    });
    let indexes = INDEXES.iter().map(|index| Statement {
        label: format!("index {}", index.name),
        sql: index.create_sql(),
    });
    tables.chain(indexes).collect()
}

/// SQL-execution entry point used by every other provisioning step.
/// `name` must already be validated as a plain identifier.
pub fn executor_function_sql(name: &str) -> String {
    format!(
        "CREATE OR REPLACE FUNCTION {name}(sql text)
RETURNS void
LANGUAGE plpgsql
SECURITY DEFINER
AS $$
BEGIN
    EXECUTE sql;
END;
$$;"
    )
}
