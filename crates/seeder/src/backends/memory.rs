//! In-memory backend
//!
//! Understands the subset of PostgreSQL the seed batches use: `CREATE
//! TABLE`, `ALTER TABLE` constraint changes, `DROP TABLE`, `DELETE FROM`
//! without a predicate, and `INSERT ... VALUES`. It tracks tables, primary
//! keys, constraint names, and rows, and reports errors with PostgreSQL's
//! wording so reruns behave the way they would against Aurora. Foreign keys
//! are recorded but not enforced.

use async_trait::async_trait;
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::{Token, Tokenizer, Word};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tokio::sync::Mutex;

use super::{DataApiBackend, ExecuteStatementRequest};
use crate::error::StatementError;
use crate::outcome::StatementResult;

type Row = BTreeMap<String, String>;

#[derive(Debug, Clone, Default)]
struct Table {
    columns: Vec<String>,
    primary_key: Vec<String>,
    constraints: BTreeSet<String>,
    rows: Vec<Row>,
}

impl Table {
    fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    fn key_of(&self, row: &Row) -> Option<Vec<String>> {
        if self.primary_key.is_empty() {
            return None;
        }
        Some(
            self.primary_key
                .iter()
                .map(|c| row.get(c).cloned().unwrap_or_else(|| "NULL".to_string()))
                .collect(),
        )
    }
}

#[derive(Debug, Default)]
struct Database {
    tables: BTreeMap<String, Table>,
}

#[derive(Debug, Clone)]
enum InjectedFailure {
    OnCall { call: usize, message: String },
    Matching { pattern: String, message: String },
}

/// Data API stand-in backed by an in-process table store
#[derive(Debug, Default)]
pub struct MemoryBackend {
    database: Mutex<Database>,
    executed: Mutex<Vec<String>>,
    failures: Vec<InjectedFailure>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the `call`-th request (1-based) with `message`, without executing it
    pub fn fail_on_call(mut self, call: usize, message: impl Into<String>) -> Self {
        self.failures.push(InjectedFailure::OnCall {
            call,
            message: message.into(),
        });
        self
    }

    /// Fail every request whose SQL contains `pattern`
    pub fn fail_matching(mut self, pattern: impl Into<String>, message: impl Into<String>) -> Self {
        self.failures.push(InjectedFailure::Matching {
            pattern: pattern.into(),
            message: message.into(),
        });
        self
    }

    /// SQL of every request received, in arrival order
    pub async fn executed(&self) -> Vec<String> {
        self.executed.lock().await.clone()
    }

    pub async fn table_names(&self) -> Vec<String> {
        self.database.lock().await.tables.keys().cloned().collect()
    }

    pub async fn row_count(&self, table: &str) -> Option<usize> {
        self.database
            .lock()
            .await
            .tables
            .get(table)
            .map(|t| t.rows.len())
    }

    pub async fn constraints(&self, table: &str) -> Option<Vec<String>> {
        self.database
            .lock()
            .await
            .tables
            .get(table)
            .map(|t| t.constraints.iter().cloned().collect())
    }

    fn injected_failure(&self, call: usize, sql: &str) -> Option<String> {
        self.failures.iter().find_map(|failure| match failure {
            InjectedFailure::OnCall { call: c, message } if *c == call => Some(message.clone()),
            InjectedFailure::Matching { pattern, message } if sql.contains(pattern.as_str()) => {
                Some(message.clone())
            }
            _ => None,
        })
    }
}

#[async_trait]
impl DataApiBackend for MemoryBackend {
    async fn execute_statement(
        &self,
        request: &ExecuteStatementRequest<'_>,
    ) -> Result<StatementResult, StatementError> {
        let call = {
            let mut executed = self.executed.lock().await;
            executed.push(request.sql.to_string());
            executed.len()
        };

        if let Some(message) = self.injected_failure(call, request.sql) {
            return Err(StatementError::new(message));
        }

        let tokens = Tokenizer::new(&PostgreSqlDialect {}, request.sql)
            .tokenize()
            .map_err(|e| StatementError::new(format!("syntax error: {}", e)))?;

        let mut database = self.database.lock().await;
        database.execute(Cursor::new(tokens))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

impl Database {
    fn execute(&mut self, mut cursor: Cursor) -> Result<StatementResult, StatementError> {
        if cursor.eat_keywords(&[Keyword::CREATE, Keyword::TABLE]) {
            self.create_table(&mut cursor)
        } else if cursor.eat_keywords(&[Keyword::ALTER, Keyword::TABLE]) {
            self.alter_table(&mut cursor)
        } else if cursor.eat_keywords(&[Keyword::DROP, Keyword::TABLE]) {
            self.drop_table(&mut cursor)
        } else if cursor.eat_keywords(&[Keyword::DELETE, Keyword::FROM]) {
            self.delete(&mut cursor)
        } else if cursor.eat_keywords(&[Keyword::INSERT, Keyword::INTO]) {
            self.insert(&mut cursor)
        } else {
            Err(StatementError::new(format!(
                "memory backend does not support this statement ({})",
                cursor.syntax_error()
            )))
        }
    }

    fn table(&self, name: &str) -> Result<&Table, StatementError> {
        self.tables.get(name).ok_or_else(|| missing_relation(name))
    }

    fn create_table(&mut self, cursor: &mut Cursor) -> Result<StatementResult, StatementError> {
        let if_not_exists = cursor.eat_keywords(&[Keyword::IF, Keyword::NOT, Keyword::EXISTS]);
        let name = cursor.object_name()?;

        if self.tables.contains_key(&name) {
            return if if_not_exists {
                tracing::debug!(table = %name, "relation already exists, skipping");
                Ok(StatementResult::default())
            } else {
                Err(StatementError::new(format!(
                    "relation \"{}\" already exists",
                    name
                )))
            };
        }

        let mut table = Table::default();
        for item in cursor.parenthesized_items()? {
            let mut item = Cursor::new(item);
            if item.eat_keyword(Keyword::CONSTRAINT) {
                let constraint = item.identifier()?;
                table.constraints.insert(constraint);
                if item.eat_keywords(&[Keyword::PRIMARY, Keyword::KEY]) {
                    table.primary_key = item.identifier_list()?;
                }
            } else if item.eat_keywords(&[Keyword::PRIMARY, Keyword::KEY]) {
                table.primary_key = item.identifier_list()?;
            } else if item.is_keyword(Keyword::FOREIGN)
                || item.is_keyword(Keyword::UNIQUE)
                || item.is_keyword(Keyword::CHECK)
            {
                continue;
            } else {
                let column = item.identifier()?;
                if item.contains_keywords(&[Keyword::PRIMARY, Keyword::KEY]) {
                    table.primary_key = vec![column.clone()];
                }
                table.columns.push(column);
            }
        }

        if !table.primary_key.is_empty() {
            table.constraints.insert(format!("{}_pkey", unqualified(&name)));
        }

        self.tables.insert(name, table);
        Ok(StatementResult::default())
    }

    fn alter_table(&mut self, cursor: &mut Cursor) -> Result<StatementResult, StatementError> {
        let name = cursor.object_name()?;
        let mut table = self.table(&name)?.clone();

        for operation in cursor.remaining_items() {
            let mut op = Cursor::new(operation);
            if op.eat_keywords(&[Keyword::DROP, Keyword::CONSTRAINT]) {
                let if_exists = op.eat_keywords(&[Keyword::IF, Keyword::EXISTS]);
                let constraint = op.identifier()?;
                if !table.constraints.remove(&constraint) && !if_exists {
                    return Err(StatementError::new(format!(
                        "constraint \"{}\" of relation \"{}\" does not exist",
                        constraint, name
                    )));
                }
            } else if op.eat_keywords(&[Keyword::ADD, Keyword::CONSTRAINT]) {
                let constraint = op.identifier()?;
                if table.constraints.contains(&constraint) {
                    return Err(StatementError::new(format!(
                        "constraint \"{}\" for relation \"{}\" already exists",
                        constraint, name
                    )));
                }
                if op.eat_keywords(&[Keyword::FOREIGN, Keyword::KEY]) {
                    for column in op.identifier_list()? {
                        if !table.has_column(&column) {
                            return Err(StatementError::new(format!(
                                "column \"{}\" referenced in foreign key constraint does not exist",
                                column
                            )));
                        }
                    }
                    op.expect_keyword(Keyword::REFERENCES)?;
                    let referenced = op.object_name()?;
                    if referenced != name {
                        self.table(&referenced)?;
                    }
                }
                table.constraints.insert(constraint);
            } else if op.eat_keyword(Keyword::ADD) {
                op.eat_keyword(Keyword::COLUMN);
                let if_not_exists = op.eat_keywords(&[Keyword::IF, Keyword::NOT, Keyword::EXISTS]);
                let column = op.identifier()?;
                if table.has_column(&column) {
                    if !if_not_exists {
                        return Err(StatementError::new(format!(
                            "column \"{}\" of relation \"{}\" already exists",
                            column, name
                        )));
                    }
                } else {
                    table.columns.push(column);
                }
            } else {
                return Err(StatementError::new(format!(
                    "memory backend does not support this ALTER TABLE operation ({})",
                    op.syntax_error()
                )));
            }
        }

        self.tables.insert(name, table);
        Ok(StatementResult::default())
    }

    fn drop_table(&mut self, cursor: &mut Cursor) -> Result<StatementResult, StatementError> {
        let if_exists = cursor.eat_keywords(&[Keyword::IF, Keyword::EXISTS]);
        let name = cursor.object_name()?;
        if self.tables.remove(&name).is_none() && !if_exists {
            return Err(missing_relation(&name));
        }
        Ok(StatementResult::default())
    }

    fn delete(&mut self, cursor: &mut Cursor) -> Result<StatementResult, StatementError> {
        let name = cursor.object_name()?;
        if cursor.is_keyword(Keyword::WHERE) {
            return Err(StatementError::new(
                "memory backend does not support DELETE with a WHERE clause",
            ));
        }
        if !cursor.at_end() {
            return Err(cursor.syntax_error());
        }

        let table = self.tables.get_mut(&name).ok_or_else(|| missing_relation(&name))?;
        let removed = table.rows.len();
        table.rows.clear();
        Ok(StatementResult::updated(removed as i64))
    }

    fn insert(&mut self, cursor: &mut Cursor) -> Result<StatementResult, StatementError> {
        let name = cursor.object_name()?;
        let table = self.tables.get(&name).ok_or_else(|| missing_relation(&name))?;

        let explicit_columns = cursor.peek() == Some(&Token::LParen);
        let columns = if explicit_columns {
            cursor.identifier_list()?
        } else {
            table.columns.clone()
        };
        for column in &columns {
            if !table.has_column(column) {
                return Err(StatementError::new(format!(
                    "column \"{}\" of relation \"{}\" does not exist",
                    column, name
                )));
            }
        }

        cursor.expect_keyword(Keyword::VALUES)?;
        let mut rows = Vec::new();
        loop {
            let values = cursor.parenthesized_items()?;
            if values.len() > columns.len() {
                return Err(StatementError::new(
                    "INSERT has more expressions than target columns",
                ));
            }
            // Without a column list, trailing columns take their defaults
            if explicit_columns && values.len() < columns.len() {
                return Err(StatementError::new(
                    "INSERT has more target columns than expressions",
                ));
            }
            let row: Row = columns
                .iter()
                .cloned()
                .zip(values.iter().map(|v| render(v)))
                .collect();
            rows.push(row);

            if !cursor.eat(&Token::Comma) {
                break;
            }
        }
        if !cursor.at_end() {
            return Err(StatementError::new(format!(
                "memory backend does not support this INSERT ({})",
                cursor.syntax_error()
            )));
        }

        let mut keys: HashSet<Vec<String>> = table.rows.iter().filter_map(|r| table.key_of(r)).collect();
        for row in &rows {
            if let Some(key) = table.key_of(row) {
                if let Some(column) = table
                    .primary_key
                    .iter()
                    .find(|c| row.get(*c).map_or(true, |v| v.eq_ignore_ascii_case("NULL")))
                {
                    return Err(StatementError::new(format!(
                        "null value in column \"{}\" of relation \"{}\" violates not-null constraint",
                        column, name
                    )));
                }
                if !keys.insert(key) {
                    return Err(StatementError::new(format!(
                        "duplicate key value violates unique constraint \"{}_pkey\"",
                        unqualified(&name)
                    )));
                }
            }
        }

        let inserted = rows.len();
        if let Some(table) = self.tables.get_mut(&name) {
            table.rows.extend(rows);
        }
        Ok(StatementResult::updated(inserted as i64))
    }
}

fn missing_relation(name: &str) -> StatementError {
    StatementError::new(format!("relation \"{}\" does not exist", name))
}

fn unqualified(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

fn normalize(word: &Word) -> String {
    if word.quote_style.is_some() {
        word.value.clone()
    } else {
        word.value.to_lowercase()
    }
}

fn render(tokens: &[Token]) -> String {
    tokens.iter().map(|t| t.to_string()).collect()
}

/// Token cursor over a statement with whitespace and comments removed
struct Cursor {
    tokens: Vec<Token>,
    pos: usize,
}

impl Cursor {
    fn new(tokens: Vec<Token>) -> Self {
        let tokens = tokens
            .into_iter()
            .filter(|t| !matches!(t, Token::Whitespace(_) | Token::EOF))
            .collect();
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self.peek(), Some(Token::Word(w)) if w.keyword == keyword)
    }

    fn eat_keyword(&mut self, keyword: Keyword) -> bool {
        if self.is_keyword(keyword) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consume the whole keyword sequence or nothing
    fn eat_keywords(&mut self, keywords: &[Keyword]) -> bool {
        let start = self.pos;
        for keyword in keywords {
            if !self.eat_keyword(*keyword) {
                self.pos = start;
                return false;
            }
        }
        true
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), StatementError> {
        if self.eat_keyword(keyword) {
            Ok(())
        } else {
            Err(self.syntax_error())
        }
    }

    /// Whether the keyword sequence appears anywhere after the cursor
    fn contains_keywords(&self, keywords: &[Keyword]) -> bool {
        self.tokens[self.pos..].windows(keywords.len()).any(|window| {
            window
                .iter()
                .zip(keywords)
                .all(|(t, k)| matches!(t, Token::Word(w) if w.keyword == *k))
        })
    }

    fn identifier(&mut self) -> Result<String, StatementError> {
        match self.peek() {
            Some(Token::Word(word)) => {
                let name = normalize(word);
                self.pos += 1;
                Ok(name)
            }
            _ => Err(self.syntax_error()),
        }
    }

    fn object_name(&mut self) -> Result<String, StatementError> {
        let mut name = self.identifier()?;
        while self.eat(&Token::Period) {
            name.push('.');
            name.push_str(&self.identifier()?);
        }
        Ok(name)
    }

    /// `( a, b, c )` as identifiers
    fn identifier_list(&mut self) -> Result<Vec<String>, StatementError> {
        self.parenthesized_items()?
            .into_iter()
            .map(|item| Cursor::new(item).identifier())
            .collect()
    }

    /// Top-level comma separated items between a pair of parentheses
    fn parenthesized_items(&mut self) -> Result<Vec<Vec<Token>>, StatementError> {
        if !self.eat(&Token::LParen) {
            return Err(self.syntax_error());
        }

        let mut items = Vec::new();
        let mut current = Vec::new();
        let mut depth = 0usize;
        loop {
            let token = match self.advance() {
                Some(token) => token,
                None => return Err(StatementError::new("syntax error at end of input")),
            };
            match token {
                Token::LParen => {
                    depth += 1;
                    current.push(token);
                }
                Token::RParen if depth == 0 => {
                    if !current.is_empty() {
                        items.push(current);
                    }
                    return Ok(items);
                }
                Token::RParen => {
                    depth -= 1;
                    current.push(token);
                }
                Token::Comma if depth == 0 => items.push(std::mem::take(&mut current)),
                other => current.push(other),
            }
        }
    }

    /// Remaining top-level comma separated items, up to a semicolon
    fn remaining_items(&mut self) -> Vec<Vec<Token>> {
        let mut items = Vec::new();
        let mut current = Vec::new();
        let mut depth = 0usize;
        while let Some(token) = self.advance() {
            match token {
                Token::SemiColon if depth == 0 => break,
                Token::Comma if depth == 0 => items.push(std::mem::take(&mut current)),
                Token::LParen => {
                    depth += 1;
                    current.push(token);
                }
                Token::RParen => {
                    depth = depth.saturating_sub(1);
                    current.push(token);
                }
                other => current.push(other),
            }
        }
        if !current.is_empty() {
            items.push(current);
        }
        items
    }

    fn at_end(&mut self) -> bool {
        while self.eat(&Token::SemiColon) {}
        self.pos >= self.tokens.len()
    }

    fn syntax_error(&self) -> StatementError {
        match self.peek() {
            Some(token) => StatementError::new(format!("syntax error at or near \"{}\"", token)),
            None => StatementError::new("syntax error at end of input"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConnectionCoordinates;

    async fn exec(backend: &MemoryBackend, sql: &str) -> Result<StatementResult, StatementError> {
        let coords = ConnectionCoordinates::new("arn:cluster", "arn:secret", "cmms");
        backend
            .execute_statement(&ExecuteStatementRequest::new(&coords, sql))
            .await
    }

    const CREATE_PUMPS: &str =
        "CREATE TABLE pumps (pumpid VARCHAR(20) PRIMARY KEY, name VARCHAR(100) NOT NULL, rated_kw NUMERIC(6, 2))";

    #[tokio::test]
    async fn test_create_and_insert() {
        let backend = MemoryBackend::new();
        exec(&backend, CREATE_PUMPS).await.unwrap();

        let result = exec(
            &backend,
            "INSERT INTO pumps (pumpid, name, rated_kw) VALUES ('P-1', 'Transfer, A', 75.5), ('P-2', 'Transfer B', -1);",
        )
        .await
        .unwrap();

        assert_eq!(result.records_updated, 2);
        assert_eq!(backend.row_count("pumps").await, Some(2));
        assert_eq!(backend.constraints("pumps").await, Some(vec!["pumps_pkey".to_string()]));
    }

    #[tokio::test]
    async fn test_create_existing_table() {
        let backend = MemoryBackend::new();
        exec(&backend, CREATE_PUMPS).await.unwrap();

        let err = exec(&backend, CREATE_PUMPS).await.unwrap_err();
        assert_eq!(err.message, "relation \"pumps\" already exists");

        exec(&backend, "CREATE TABLE IF NOT EXISTS pumps (pumpid VARCHAR(20) PRIMARY KEY)")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_duplicate_primary_key_rejects_whole_statement() {
        let backend = MemoryBackend::new();
        exec(&backend, CREATE_PUMPS).await.unwrap();
        exec(&backend, "INSERT INTO pumps (pumpid, name) VALUES ('P-1', 'A')")
            .await
            .unwrap();

        let err = exec(
            &backend,
            "INSERT INTO pumps (pumpid, name) VALUES ('P-2', 'B'), ('P-1', 'A again')",
        )
        .await
        .unwrap_err();

        assert_eq!(
            err.message,
            "duplicate key value violates unique constraint \"pumps_pkey\""
        );
        assert_eq!(backend.row_count("pumps").await, Some(1));
    }

    #[tokio::test]
    async fn test_delete_then_reinsert() {
        let backend = MemoryBackend::new();
        exec(&backend, CREATE_PUMPS).await.unwrap();
        exec(&backend, "INSERT INTO pumps (pumpid, name) VALUES ('P-1', 'A')")
            .await
            .unwrap();

        let deleted = exec(&backend, "DELETE FROM pumps;").await.unwrap();
        assert_eq!(deleted.records_updated, 1);

        exec(&backend, "INSERT INTO pumps (pumpid, name) VALUES ('P-1', 'A')")
            .await
            .unwrap();
        assert_eq!(backend.row_count("pumps").await, Some(1));
    }

    #[tokio::test]
    async fn test_missing_relation_and_column() {
        let backend = MemoryBackend::new();
        let err = exec(&backend, "DELETE FROM pumps").await.unwrap_err();
        assert_eq!(err.message, "relation \"pumps\" does not exist");

        exec(&backend, CREATE_PUMPS).await.unwrap();
        let err = exec(&backend, "INSERT INTO pumps (pumpid, flow) VALUES ('P-1', 3)")
            .await
            .unwrap_err();
        assert_eq!(err.message, "column \"flow\" of relation \"pumps\" does not exist");

        let err = exec(&backend, "INSERT INTO pumps (pumpid, name) VALUES ('P-1')")
            .await
            .unwrap_err();
        assert_eq!(err.message, "INSERT has more target columns than expressions");
    }

    #[tokio::test]
    async fn test_insert_without_column_list_fills_trailing_defaults() {
        let backend = MemoryBackend::new();
        exec(&backend, CREATE_PUMPS).await.unwrap();

        let result = exec(&backend, "INSERT INTO pumps VALUES ('P-1', 'Transfer A')")
            .await
            .unwrap();
        assert_eq!(result.records_updated, 1);

        let err = exec(&backend, "INSERT INTO pumps VALUES ('P-2', 'B', 1.5, 'extra')")
            .await
            .unwrap_err();
        assert_eq!(err.message, "INSERT has more expressions than target columns");

        let err = exec(&backend, "INSERT INTO pumps VALUES ('P-1')").await.unwrap_err();
        assert_eq!(
            err.message,
            "duplicate key value violates unique constraint \"pumps_pkey\""
        );
    }

    #[tokio::test]
    async fn test_constraint_drop_if_exists_then_add_is_rerunnable() {
        let backend = MemoryBackend::new();
        exec(&backend, "CREATE TABLE sites (siteid VARCHAR(20) PRIMARY KEY)")
            .await
            .unwrap();
        exec(&backend, "CREATE TABLE pumps (pumpid VARCHAR(20) PRIMARY KEY, siteid VARCHAR(20))")
            .await
            .unwrap();

        let alter = "ALTER TABLE pumps DROP CONSTRAINT IF EXISTS fk_pump_site, \
                     ADD CONSTRAINT fk_pump_site FOREIGN KEY (siteid) REFERENCES sites (siteid);";
        exec(&backend, alter).await.unwrap();
        exec(&backend, alter).await.unwrap();

        let err = exec(
            &backend,
            "ALTER TABLE pumps ADD CONSTRAINT fk_pump_site FOREIGN KEY (siteid) REFERENCES sites (siteid)",
        )
        .await
        .unwrap_err();
        assert_eq!(
            err.message,
            "constraint \"fk_pump_site\" for relation \"pumps\" already exists"
        );

        let err = exec(
            &backend,
            "ALTER TABLE pumps ADD CONSTRAINT fk_pump_area FOREIGN KEY (siteid) REFERENCES areas (areaid)",
        )
        .await
        .unwrap_err();
        assert_eq!(err.message, "relation \"areas\" does not exist");
    }

    #[tokio::test]
    async fn test_injected_failures_skip_execution() {
        let backend = MemoryBackend::new()
            .fail_on_call(1, "relation already exists")
            .fail_matching("DELETE", "permission denied for table pumps");

        let err = exec(&backend, CREATE_PUMPS).await.unwrap_err();
        assert_eq!(err.message, "relation already exists");
        assert!(backend.table_names().await.is_empty());

        exec(&backend, CREATE_PUMPS).await.unwrap();
        let err = exec(&backend, "DELETE FROM pumps").await.unwrap_err();
        assert_eq!(err.message, "permission denied for table pumps");

        assert_eq!(backend.executed().await.len(), 3);
    }

    #[tokio::test]
    async fn test_unsupported_statement() {
        let backend = MemoryBackend::new();
        let err = exec(&backend, "VACUUM").await.unwrap_err();
        assert!(err.message.starts_with("memory backend does not support"));
    }
}
