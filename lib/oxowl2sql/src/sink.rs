//! Where generated SQL statements go.

use std::convert::Infallible;
use std::error::Error;

/// Executes the statements of one build.
///
/// Implementations own the transaction boundary: the compiler executes
/// statements one by one and never commits on its own.
pub trait StatementSink {
    type Error: Error + Send + Sync + 'static;

    fn execute(&mut self, statement: &str) -> Result<(), Self::Error>;

    fn commit(&mut self) -> Result<(), Self::Error>;
}

/// Collects statements in memory instead of executing them.
///
/// Useful for tests and for rendering a build as an SQL script.
#[derive(Debug, Default)]
pub struct MemorySink {
    statements: Vec<String>,
    committed: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn statements(&self) -> &[String] {
        &self.statements
    }

    pub fn is_committed(&self) -> bool {
        self.committed
    }
}

impl StatementSink for MemorySink {
    type Error = Infallible;

    fn execute(&mut self, statement: &str) -> Result<(), Infallible> {
        self.statements.push(statement.to_owned());
        Ok(())
    }

    fn commit(&mut self) -> Result<(), Infallible> {
        self.committed = true;
        Ok(())
    }
}
