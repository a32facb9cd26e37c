//! Statement batches
//!
//! A batch is the ordered list of SQL statements a run executes. It is
//! built once at process start and never modified afterwards. Statements
//! run in the order they were listed; phases only label them.

mod cmms;

use serde::Serialize;
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use crate::error::BatchError;

/// Name of the file listing statement files in execution order
pub const MANIFEST_FILE: &str = "manifest.txt";

/// Statement group. Phases run in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Tables and keys
    Create,
    /// Removal of existing rows
    Delete,
    /// Seed rows
    Insert,
    /// File name carries no recognised prefix
    Other,
}

impl Phase {
    /// Infer the phase from a statement file name such as `deleteCMMSDataEquipment.sql`
    ///
    /// Returns `None` when the name starts with none of the phase prefixes.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        if lower.starts_with("create") {
            Some(Phase::Create)
        } else if lower.starts_with("delete") {
            Some(Phase::Delete)
        } else if lower.starts_with("insert") {
            Some(Phase::Insert)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Create => "create",
            Phase::Delete => "delete",
            Phase::Insert => "insert",
            Phase::Other => "other",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single statement file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statement {
    /// File name the statement was loaded from
    pub name: String,
    pub phase: Phase,
    /// SQL text as sent to the database
    pub sql: String,
}

impl Statement {
    /// Build a statement from a file name and its contents.
    ///
    /// The text is checked with `sqlparser`; text the parser does not
    /// understand is passed through untouched since the database has the
    /// final say on syntax.
    pub fn parse(name: impl Into<String>, text: &str) -> Result<Self, BatchError> {
        let name = name.into();
        let phase = Phase::from_file_name(&name).unwrap_or(Phase::Other);

        let sql = text.trim();
        if sql.is_empty() {
            return Err(BatchError::EmptyStatement(name));
        }

        match Parser::parse_sql(&PostgreSqlDialect {}, sql) {
            Ok(parsed) if parsed.is_empty() => return Err(BatchError::EmptyStatement(name)),
            Ok(parsed) if parsed.len() > 1 => {
                return Err(BatchError::MultipleStatements {
                    name,
                    count: parsed.len(),
                })
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(statement = %name, "SQL parsing failed, sending text as-is: {}", e);
            }
        }

        Ok(Self {
            name,
            phase,
            sql: sql.to_string(),
        })
    }
}

/// Ordered, immutable list of statements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementBatch {
    statements: Vec<Statement>,
}

impl StatementBatch {
    /// Build a batch that runs `statements` exactly in the given order.
    ///
    /// A phase running backwards (an insert before a delete, say) is logged
    /// but accepted.
    pub fn new(statements: Vec<Statement>) -> Self {
        if let Err(e) = check_phase_order(&statements) {
            tracing::warn!("Statement batch phases are out of order: {}", e);
        }
        Self { statements }
    }

    /// Build a batch, rejecting statements whose phase runs backwards
    pub fn with_phase_order(statements: Vec<Statement>) -> Result<Self, BatchError> {
        check_phase_order(&statements)?;
        Ok(Self { statements })
    }

    /// The CMMS seed batch compiled into the binary
    pub fn cmms() -> Result<Self, BatchError> {
        let statements = cmms::STATEMENTS
            .iter()
            .map(|(name, text)| Statement::parse(*name, text))
            .collect::<Result<Vec<_>, _>>()?;
        Self::with_phase_order(statements)
    }

    /// Load a batch from a directory containing `manifest.txt` and the files it lists
    pub async fn load_dir(dir: impl AsRef<Path>) -> Result<Self, BatchError> {
        let dir = dir.as_ref();
        let manifest_path = dir.join(MANIFEST_FILE);
        let manifest = tokio::fs::read_to_string(&manifest_path)
            .await
            .map_err(|e| BatchError::io(&manifest_path, e))?;

        let names = parse_manifest(&manifest)?;
        let mut statements = Vec::with_capacity(names.len());
        for name in names {
            let path = dir.join(&name);
            let text = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| BatchError::io(&path, e))?;
            statements.push(Statement::parse(name, &text)?);
        }

        tracing::debug!(dir = %dir.display(), count = statements.len(), "Loaded statement batch");
        Ok(Self::new(statements))
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Statement> {
        self.statements.iter()
    }

    /// Number of statements in a phase
    pub fn phase_len(&self, phase: Phase) -> usize {
        self.statements.iter().filter(|s| s.phase == phase).count()
    }
}

impl<'a> IntoIterator for &'a StatementBatch {
    type Item = &'a Statement;
    type IntoIter = std::slice::Iter<'a, Statement>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.iter()
    }
}

/// Phases must never decrease. Unclassified statements are ignored.
fn check_phase_order(statements: &[Statement]) -> Result<(), BatchError> {
    let mut previous: Option<&Statement> = None;
    for statement in statements.iter().filter(|s| s.phase != Phase::Other) {
        if let Some(prev) = previous {
            if statement.phase < prev.phase {
                return Err(BatchError::PhaseOrder {
                    name: statement.name.clone(),
                    phase: statement.phase.to_string(),
                    previous: prev.phase.to_string(),
                });
            }
        }
        previous = Some(statement);
    }
    Ok(())
}

/// Parse manifest text into file names, skipping comments and blank lines
pub fn parse_manifest(content: &str) -> Result<Vec<String>, BatchError> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();

    for (line_no, line) in content.lines().enumerate() {
        let entry = line.trim();
        if entry.is_empty() || entry.starts_with('#') {
            continue;
        }
        if entry.contains('/') || entry.contains('\\') {
            return Err(BatchError::Manifest(format!(
                "line {}: '{}' must be a bare file name",
                line_no + 1,
                entry
            )));
        }
        if !seen.insert(entry.to_string()) {
            return Err(BatchError::Manifest(format!(
                "line {}: '{}' is listed more than once",
                line_no + 1,
                entry
            )));
        }
        names.push(entry.to_string());
    }

    if names.is_empty() {
        return Err(BatchError::Manifest("no statement files listed".to_string()));
    }

    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_phase_from_file_name() {
        assert_eq!(Phase::from_file_name("createCMMSTableEquipment.sql"), Some(Phase::Create));
        assert_eq!(Phase::from_file_name("DeleteCMMSDataEquipment.sql"), Some(Phase::Delete));
        assert_eq!(Phase::from_file_name("insertCMMSDataEquipment.sql"), Some(Phase::Insert));
        assert_eq!(Phase::from_file_name("updateCMMSDataEquipment.sql"), None);
        assert!(Phase::Create < Phase::Delete && Phase::Delete < Phase::Insert);
        assert_eq!(Phase::Other.to_string(), "other");
    }

    #[test]
    fn test_cmms_batch_layout() {
        let batch = StatementBatch::cmms().unwrap();
        assert_eq!(batch.len(), 28);
        assert_eq!(batch.phase_len(Phase::Create), 10);
        assert_eq!(batch.phase_len(Phase::Delete), 8);
        assert_eq!(batch.phase_len(Phase::Insert), 10);
        assert_eq!(batch.statements()[0].name, "createCMMSTableEquipmentTypes.sql");
        assert_eq!(batch.statements()[27].name, "insertCMMSDataMaintenanceINS.sql");
    }

    #[test]
    fn test_cmms_batch_matches_packaged_manifest() {
        let manifest = parse_manifest(include_str!("../../sql/manifest.txt")).unwrap();
        let batch = StatementBatch::cmms().unwrap();
        let names: Vec<&str> = batch.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, manifest);
    }

    #[test]
    fn test_statement_without_phase_prefix_is_unclassified() {
        let statement = Statement::parse("seedPumps.sql", "SELECT 1;").unwrap();
        assert_eq!(statement.phase, Phase::Other);
        assert!(matches!(
            Statement::parse("createNothing.sql", "  \n "),
            Err(BatchError::EmptyStatement(_))
        ));
    }

    #[test]
    fn test_statement_rejects_multiple_statements() {
        let err = Statement::parse(
            "createTwo.sql",
            "CREATE TABLE a (id INT); CREATE TABLE b (id INT);",
        )
        .unwrap_err();
        assert!(matches!(err, BatchError::MultipleStatements { count: 2, .. }));
    }

    #[test]
    fn test_statement_keeps_unparseable_text() {
        let sql = "CREATE TABLE odd (id INT) garbage garbage";
        let statement = Statement::parse("createOdd.sql", sql).unwrap();
        assert_eq!(statement.sql, sql);
    }

    #[test]
    fn test_backwards_phase_is_kept_in_given_order() {
        let statements = vec![
            Statement::parse("insertA.sql", "INSERT INTO a (id) VALUES (1);").unwrap(),
            Statement::parse("createA.sql", "CREATE TABLE a (id INT PRIMARY KEY);").unwrap(),
        ];

        let err = StatementBatch::with_phase_order(statements.clone()).unwrap_err();
        assert!(matches!(err, BatchError::PhaseOrder { .. }));

        let batch = StatementBatch::new(statements);
        let names: Vec<&str> = batch.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["insertA.sql", "createA.sql"]);
    }

    #[test]
    fn test_unclassified_statements_do_not_break_phase_order() {
        let statements = vec![
            Statement::parse("createA.sql", "CREATE TABLE a (id INT PRIMARY KEY);").unwrap(),
            Statement::parse("grantA.sql", "GRANT SELECT ON a TO reporting;").unwrap(),
            Statement::parse("insertA.sql", "INSERT INTO a (id) VALUES (1);").unwrap(),
        ];
        let batch = StatementBatch::with_phase_order(statements).unwrap();
        assert_eq!(batch.phase_len(Phase::Other), 1);
    }

    #[test]
    fn test_parse_manifest() {
        let names = parse_manifest("# header\n\ncreateA.sql\n  deleteA.sql  \n").unwrap();
        assert_eq!(names, vec!["createA.sql", "deleteA.sql"]);

        assert!(parse_manifest("# only comments\n").is_err());
        assert!(parse_manifest("createA.sql\ncreateA.sql\n").is_err());
        assert!(parse_manifest("../createA.sql\n").is_err());
    }

    #[tokio::test]
    async fn test_load_dir_follows_manifest_order() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("insertA.sql"), "INSERT INTO a (id) VALUES (1);").unwrap();
        fs::write(temp_dir.path().join("createA.sql"), "CREATE TABLE a (id INT PRIMARY KEY);")
            .unwrap();
        fs::write(temp_dir.path().join("deleteA.sql"), "DELETE FROM a;").unwrap();
        fs::write(
            temp_dir.path().join(MANIFEST_FILE),
            "createA.sql\ndeleteA.sql\ninsertA.sql\n",
        )
        .unwrap();

        let batch = StatementBatch::load_dir(temp_dir.path()).await.unwrap();
        let phases: Vec<Phase> = batch.iter().map(|s| s.phase).collect();
        assert_eq!(phases, vec![Phase::Create, Phase::Delete, Phase::Insert]);
        assert_eq!(batch.statements()[2].sql, "INSERT INTO a (id) VALUES (1);");
    }

    #[tokio::test]
    async fn test_load_dir_reports_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(MANIFEST_FILE), "createMissing.sql\n").unwrap();

        let err = StatementBatch::load_dir(temp_dir.path()).await.unwrap_err();
        match err {
            BatchError::Io { path, .. } => assert!(path.ends_with("createMissing.sql")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_load_packaged_sql_dir() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("sql");
        let loaded = StatementBatch::load_dir(&dir).await.unwrap();
        assert_eq!(loaded, StatementBatch::cmms().unwrap());
    }
}
