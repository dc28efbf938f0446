//! Skip accounting for one build.
//!
//! Entities the data model cannot represent are skipped, never approximated.
//! Every skip increments the validation error counter and, when a log target
//! is attached, writes one line describing the entity and the table it could
//! not be inserted into.

use std::fmt;
use std::io::Write;

/// A single row-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Skip {
    AnonymousIndividual {
        individual: String,
    },
    UntypedIndividual {
        individual: String,
    },
    MultiplyTypedIndividual {
        individual: String,
    },
    AnonymouslyTypedIndividual {
        individual: String,
    },
    AnonymousSuperObjectProperty {
        property: String,
    },
    AnonymousSuperDataProperty {
        property: String,
    },
    AnonymousInverse {
        property: String,
    },
    AnonymousDataPropertyExpression {
        individual: String,
    },
    AnonymousObjectPropertyExpression {
        individual: String,
    },
    OutsideDataPropertyDomain {
        individual: String,
        class: String,
        property: String,
    },
    OutsideObjectPropertyDomain {
        individual: String,
        class: String,
        property: String,
    },
    AnonymousTarget {
        target: String,
        source: String,
        property: String,
    },
    UntypedTarget {
        target: String,
        source: String,
        property: String,
    },
    MultiplyTypedTarget {
        target: String,
        source: String,
        property: String,
    },
    AnonymouslyTypedTarget {
        target: String,
        source: String,
        property: String,
    },
    OutsideObjectPropertyRange {
        target: String,
        class: String,
        source: String,
        property: String,
    },
}

impl fmt::Display for Skip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AnonymousIndividual { individual } => write!(
                f,
                "{individual} is anonymous. Cannot insert into the Individual table."
            ),
            Self::UntypedIndividual { individual } => write!(
                f,
                "{individual} has no class. Cannot insert into the Individual table."
            ),
            Self::MultiplyTypedIndividual { individual } => write!(
                f,
                "{individual} has more than one class. Cannot insert into the Individual table."
            ),
            Self::AnonymouslyTypedIndividual { individual } => write!(
                f,
                "{individual} has an anonymous class. Cannot insert into the Individual table."
            ),
            Self::AnonymousSuperObjectProperty { property } => write!(
                f,
                "Object property {property} has an anonymous superproperty. \
                 Cannot insert into the ObjectPropertyRelationship table."
            ),
            Self::AnonymousSuperDataProperty { property } => write!(
                f,
                "Data property {property} has an anonymous superproperty. \
                 Cannot insert into the DataPropertyRelationship table."
            ),
            Self::AnonymousInverse { property } => write!(
                f,
                "Object property {property} has an anonymous inverse. \
                 Cannot insert into the ObjectPropertyInverse table."
            ),
            Self::AnonymousDataPropertyExpression { individual } => write!(
                f,
                "{individual} has an anonymous data property. \
                 Cannot insert into the DataPropertyInstance table."
            ),
            Self::AnonymousObjectPropertyExpression { individual } => write!(
                f,
                "{individual} has an anonymous object property. \
                 Cannot insert into the ObjectPropertyInstance table."
            ),
            Self::OutsideDataPropertyDomain {
                individual,
                class,
                property,
            } => write!(
                f,
                "{individual} of class {class} is not in the domain of data property \
                 {property}. Cannot insert into the DataPropertyInstance table."
            ),
            Self::OutsideObjectPropertyDomain {
                individual,
                class,
                property,
            } => write!(
                f,
                "{individual} of class {class} is not in the domain of object property \
                 {property}. Cannot insert into the ObjectPropertyInstance table."
            ),
            Self::AnonymousTarget {
                target,
                source,
                property,
            } => write!(
                f,
                "{target} is the anonymous individual mapped to {source} by object \
                 property {property}. Cannot insert into the ObjectPropertyInstance table."
            ),
            Self::UntypedTarget {
                target,
                source,
                property,
            } => write!(
                f,
                "{target} has no class and is mapped to {source} by object property \
                 {property}. Cannot insert into the ObjectPropertyInstance table."
            ),
            Self::MultiplyTypedTarget {
                target,
                source,
                property,
            } => write!(
                f,
                "{target} has more than one class and is mapped to {source} by object \
                 property {property}. Cannot insert into the ObjectPropertyInstance table."
            ),
            Self::AnonymouslyTypedTarget {
                target,
                source,
                property,
            } => write!(
                f,
                "{target} has an anonymous class and is mapped to {source} by object \
                 property {property}. Cannot insert into the ObjectPropertyInstance table."
            ),
            Self::OutsideObjectPropertyRange {
                target,
                class,
                source,
                property,
            } => write!(
                f,
                "{target} of class {class} is mapped to {source} by {property} but is \
                 not in the object property's range. Cannot insert into the \
                 ObjectPropertyInstance table."
            ),
        }
    }
}

/// Counters and optional log target for the skips of one build.
#[derive(Default)]
pub struct BuildReport {
    validation_errors: u64,
    log_errors: u64,
    log: Option<Box<dyn Write>>,
}

impl BuildReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log(log: Box<dyn Write>) -> Self {
        Self {
            log: Some(log),
            ..Self::default()
        }
    }

    /// Records one skip. A failing log write only increments the log error
    /// counter; logging stays enabled for the following skips.
    pub fn record(&mut self, skip: &Skip) {
        self.validation_errors += 1;
        tracing::debug!(%skip, "skipped entity");
        if let Some(log) = &mut self.log {
            if writeln!(log, "{skip}").is_err() {
                self.log_errors += 1;
            }
        }
    }

    /// Flushes the log target, if any.
    pub fn finish(&mut self) {
        if let Some(log) = &mut self.log {
            if log.flush().is_err() {
                self.log_errors += 1;
            }
        }
    }

    /// Number of entities skipped because the data model cannot represent
    /// them.
    pub fn validation_errors(&self) -> u64 {
        self.validation_errors
    }

    /// Number of failed writes to the log target.
    pub fn log_errors(&self) -> u64 {
        self.log_errors
    }

    /// Number of lines actually written to the log target, when one was
    /// attached.
    pub fn logged_entries(&self) -> Option<u64> {
        self.log
            .is_some()
            .then(|| self.validation_errors.saturating_sub(self.log_errors))
    }

    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Finished building the database with {} skipped entries",
            self.validation_errors
        );
        if let Some(logged) = self.logged_entries() {
            summary.push_str(&format!(" ({logged} logged)"));
        }
        summary
    }
}

impl fmt::Debug for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildReport")
            .field("validation_errors", &self.validation_errors)
            .field("log_errors", &self.log_errors)
            .field("logging", &self.log.is_some())
            .finish()
    }
}
