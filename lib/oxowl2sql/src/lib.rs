//! oxowl2sql compiles an OWL 2 ontology into a normalized relational schema.
//!
//! The ontology is loaded from RDF (with its resolvable `owl:imports`
//! closure), validated against a fixed 13 table data model, and emitted as
//! SQL statements to a [`StatementSink`]. Entities the data model cannot
//! represent, like anonymous individuals or individuals without exactly one
//! named class, are skipped and counted in the [`BuildReport`], never
//! approximated.
//!
//! Usage example:
//! ```
//! use oxowl2sql::{MemorySink, Ontology, SchemaCompiler};
//!
//! let ontology = Ontology::new(None);
//! let mut sink = MemorySink::new();
//! let report = SchemaCompiler::new(&ontology, &mut sink).build()?;
//! assert_eq!(report.validation_errors(), 0);
//! // 13 CREATE TABLE statements, no rows
//! assert_eq!(sink.statements().len(), 13);
//! # Ok::<_, std::convert::Infallible>(())
//! ```

mod compiler;
mod entity;
mod error;
mod expression;
pub mod hierarchy;
pub mod inference;
mod instance;
mod ontology;
mod parser;
mod report;
pub mod schema;
mod sink;

pub use crate::compiler::SchemaCompiler;
pub use crate::entity::{DataProperty, Individual, ObjectProperty, OwlClass, local_name};
pub use crate::error::OntologyLoadError;
pub use crate::expression::{
    ClassExpression, DataPropertyExpression, ObjectPropertyExpression, PropertyExpression,
};
pub use crate::instance::{IndividualIssue, individual_class};
pub use crate::ontology::{Ontology, ObjectPropertyCharacteristics};
pub use crate::report::{BuildReport, Skip};
pub use crate::sink::{MemorySink, StatementSink};
