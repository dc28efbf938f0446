//! Sequences one full build: schema DDL, class pass, property passes and the
//! instance pass, in foreign key dependency order.

use crate::entity::{DataProperty, Individual, ObjectProperty, OwlClass, local_name};
use crate::expression::PropertyExpression;
use crate::hierarchy;
use crate::inference::{self, DataPropertyClosures, ObjectPropertyClosures};
use crate::instance::{self, IndividualIssue};
use crate::ontology::Ontology;
use crate::report::{BuildReport, Skip};
use crate::schema::{self, Row};
use crate::sink::StatementSink;
use rustc_hash::FxHashSet;
use std::io::Write;

/// Compiles one ontology into one relational database.
///
/// Statements flow to the sink as they are generated, except for rows whose
/// foreign keys point at rows of the same pass: those are buffered and
/// flushed once the pass completes. A statement error aborts the build;
/// entities the data model cannot represent are skipped and counted instead.
pub struct SchemaCompiler<'a, S: StatementSink> {
    ontology: &'a Ontology,
    sink: &'a mut S,
    report: BuildReport,
    datatype: String,
}

impl<'a, S: StatementSink> SchemaCompiler<'a, S> {
    pub fn new(ontology: &'a Ontology, sink: &'a mut S) -> Self {
        Self {
            ontology,
            sink,
            report: BuildReport::new(),
            datatype: schema::DEFAULT_IDENTIFIER_DATATYPE.to_owned(),
        }
    }

    /// Overrides the SQL datatype of the identifier columns.
    pub fn with_identifier_datatype(mut self, datatype: impl Into<String>) -> Self {
        self.datatype = datatype.into();
        self
    }

    /// Attaches a log target receiving one line per skipped entity.
    pub fn with_error_log(mut self, log: Box<dyn Write>) -> Self {
        self.report = BuildReport::with_log(log);
        self
    }

    /// Runs the build to completion and returns the skip accounting.
    ///
    /// The sink is left uncommitted; committing is the caller's decision.
    pub fn build(mut self) -> Result<BuildReport, S::Error> {
        self.create_tables()?;
        self.populate_classes()?;
        let object_closures = self.populate_object_properties()?;
        let data_closures = self.populate_data_properties()?;
        self.populate_instances(&object_closures, &data_closures)?;
        self.report.finish();
        tracing::info!(
            skipped = self.report.validation_errors(),
            "finished building the database"
        );
        Ok(self.report)
    }

    fn create_tables(&mut self) -> Result<(), S::Error> {
        tracing::info!("initializing SQL tables");
        for statement in schema::create_table_statements(&self.datatype) {
            self.sink.execute(&statement)?;
        }
        Ok(())
    }

    fn populate_classes(&mut self) -> Result<(), S::Error> {
        let ontology = self.ontology;
        let mut classes: Vec<_> = ontology.classes().collect();
        classes.sort_unstable_by(|a, b| a.iri().as_str().cmp(b.iri().as_str()));
        tracing::info!(count = classes.len(), "populating the Class table");
        for &class in &classes {
            self.sink.execute(
                &Row::new("Class")
                    .text("name", class.local_name())
                    .insert_statement(),
            )?;
        }

        let mut relationships = RowBuffer::new();
        for &class in &classes {
            let mut ancestors: Vec<_> = hierarchy::ancestors_of(ontology, class)
                .into_iter()
                .collect();
            ancestors.sort_unstable_by(|a, b| a.iri().as_str().cmp(b.iri().as_str()));
            for ancestor in ancestors {
                relationships.push(
                    Row::new("ClassRelationship")
                        .text("subclass", class.local_name())
                        .text("superclass", ancestor.local_name()),
                );
            }
        }
        tracing::info!(
            count = relationships.len(),
            "populating the ClassRelationship table"
        );
        relationships.flush(self.sink)
    }

    fn populate_object_properties(&mut self) -> Result<ObjectPropertyClosures, S::Error> {
        let ontology = self.ontology;
        let mut properties: Vec<_> = ontology.object_properties().collect();
        properties.sort_unstable_by(|a, b| a.iri().as_str().cmp(b.iri().as_str()));
        tracing::info!(count = properties.len(), "populating the object property tables");

        let mut closures = ObjectPropertyClosures::default();
        let mut relationships = RowBuffer::new();
        let mut inverses = RowBuffer::new();
        for &property in &properties {
            let name = property.local_name();
            let flags = ontology.object_property_characteristics(property);
            self.sink.execute(
                &Row::new("ObjectPropertyType")
                    .text("name", name)
                    .bool("isFunctional", flags.functional)
                    .bool("isInverseFunctional", flags.inverse_functional)
                    .bool("isSymmetric", flags.symmetric)
                    .bool("isAsymmetric", flags.asymmetric)
                    .bool("isTransitive", flags.transitive)
                    .bool("isReflexive", flags.reflexive)
                    .bool("isIrreflexive", flags.irreflexive)
                    .insert_statement(),
            )?;

            let ancestors = hierarchy::property_ancestors(ontology, property);
            self.buffer_relationships(
                "ObjectPropertyRelationship",
                property,
                &ancestors,
                ontology.super_object_property_expressions_of(property),
                ObjectProperty::local_name,
                |name| Skip::AnonymousSuperObjectProperty {
                    property: name.to_owned(),
                },
                &mut relationships,
            );

            for inverse in ontology.inverses_of(property) {
                match inverse {
                    PropertyExpression::Named(inverse) => inverses.push(
                        Row::new("ObjectPropertyInverse")
                            .text("property", name)
                            .text("inverseProperty", inverse.local_name()),
                    ),
                    PropertyExpression::Anonymous(_) => self.report.record(&Skip::AnonymousInverse {
                        property: name.to_owned(),
                    }),
                }
            }

            let domain = inference::effective_object_domain(ontology, &ancestors);
            for class in sorted_classes(&domain) {
                self.sink.execute(
                    &Row::new("ObjectPropertyDomain")
                        .text("domainClass", class)
                        .text("property", name)
                        .insert_statement(),
                )?;
            }
            let range = inference::effective_object_range(ontology, &ancestors);
            for class in sorted_classes(&range) {
                self.sink.execute(
                    &Row::new("ObjectPropertyRange")
                        .text("property", name)
                        .text("rangeClass", class)
                        .insert_statement(),
                )?;
            }
            closures.domains.insert(property.clone(), domain);
            closures.ranges.insert(property.clone(), range);
        }
        tracing::info!(
            count = relationships.len(),
            "populating the ObjectPropertyRelationship table"
        );
        relationships.flush(self.sink)?;
        tracing::info!(
            count = inverses.len(),
            "populating the ObjectPropertyInverse table"
        );
        inverses.flush(self.sink)?;
        Ok(closures)
    }

    fn populate_data_properties(&mut self) -> Result<DataPropertyClosures, S::Error> {
        let ontology = self.ontology;
        let mut properties: Vec<_> = ontology.data_properties().collect();
        properties.sort_unstable_by(|a, b| a.iri().as_str().cmp(b.iri().as_str()));
        tracing::info!(count = properties.len(), "populating the data property tables");

        let mut closures = DataPropertyClosures::default();
        let mut relationships = RowBuffer::new();
        for &property in &properties {
            let name = property.local_name();
            self.sink.execute(
                &Row::new("DataPropertyType")
                    .text("name", name)
                    .bool("isFunctional", ontology.is_functional_data_property(property))
                    .insert_statement(),
            )?;

            let ancestors = hierarchy::property_ancestors(ontology, property);
            self.buffer_relationships(
                "DataPropertyRelationship",
                property,
                &ancestors,
                ontology.super_data_property_expressions_of(property),
                DataProperty::local_name,
                |name| Skip::AnonymousSuperDataProperty {
                    property: name.to_owned(),
                },
                &mut relationships,
            );

            let domain = inference::effective_data_domain(ontology, &ancestors);
            for class in sorted_classes(&domain) {
                self.sink.execute(
                    &Row::new("DataPropertyDomain")
                        .text("domainClass", class)
                        .text("property", name)
                        .insert_statement(),
                )?;
            }
            closures.domains.insert(property.clone(), domain);
        }
        tracing::info!(
            count = relationships.len(),
            "populating the DataPropertyRelationship table"
        );
        relationships.flush(self.sink)?;
        Ok(closures)
    }

    /// Buffers the superproperty rows of one property: one `isInferred=false`
    /// row per declared named superproperty, one `isInferred=true` row per
    /// remaining member of the ancestor closure. A property never gets a row
    /// with itself.
    #[expect(clippy::too_many_arguments)]
    fn buffer_relationships<P: hierarchy::HierarchicalProperty>(
        &mut self,
        table: &'static str,
        property: &P,
        ancestors: &FxHashSet<P>,
        declared: &[PropertyExpression<P>],
        property_name: impl Fn(&P) -> &str,
        anonymous_skip: impl Fn(&str) -> Skip,
        buffer: &mut RowBuffer,
    ) {
        let name = property_name(property).to_owned();
        let mut inferred = ancestors.clone();
        inferred.remove(property);
        for expression in declared {
            match expression {
                PropertyExpression::Named(sup) => {
                    inferred.remove(sup);
                    if sup != property {
                        buffer.push(
                            Row::new(table)
                                .text("subproperty", name.clone())
                                .text("superproperty", property_name(sup))
                                .bool("isInferred", false),
                        );
                    }
                }
                PropertyExpression::Anonymous(_) => self.report.record(&anonymous_skip(&name)),
            }
        }
        let mut inferred: Vec<_> = inferred.into_iter().collect();
        inferred.sort_unstable_by(|a, b| property_name(a).cmp(property_name(b)));
        for sup in &inferred {
            buffer.push(
                Row::new(table)
                    .text("subproperty", name.clone())
                    .text("superproperty", property_name(sup))
                    .bool("isInferred", true),
            );
        }
    }

    fn populate_instances(
        &mut self,
        object_closures: &ObjectPropertyClosures,
        data_closures: &DataPropertyClosures,
    ) -> Result<(), S::Error> {
        let ontology = self.ontology;
        let mut individuals: Vec<_> = ontology.individuals().collect();
        individuals.sort_unstable_by(|a, b| a.to_string().cmp(&b.to_string()));
        tracing::info!(count = individuals.len(), "populating the Individual table");

        let mut instances = RowBuffer::new();
        for &individual in &individuals {
            let (name_node, class) = match instance::individual_class(ontology, individual) {
                Ok(resolved) => resolved,
                Err(issue) => {
                    self.report.record(&individual_skip(issue, individual));
                    continue;
                }
            };
            let name = local_name(name_node);
            let class_name = class.local_name().to_owned();
            self.sink.execute(
                &Row::new("Individual")
                    .text("name", name)
                    .text("class", class_name.clone())
                    .insert_statement(),
            )?;

            for (expression, values) in ontology.data_assertions_of(individual) {
                let PropertyExpression::Named(property) = expression else {
                    self.report.record(&Skip::AnonymousDataPropertyExpression {
                        individual: name.to_owned(),
                    });
                    continue;
                };
                let in_domain = data_closures
                    .domains
                    .get(property)
                    .is_some_and(|classes| classes.contains(&class));
                if !in_domain {
                    self.report.record(&Skip::OutsideDataPropertyDomain {
                        individual: name.to_owned(),
                        class: class_name.clone(),
                        property: property.local_name().to_owned(),
                    });
                    continue;
                }
                for value in values {
                    self.sink.execute(
                        &Row::new("DataPropertyInstance")
                            .text("domainClass", class_name.clone())
                            .text("domainIndividual", name)
                            .text("property", property.local_name())
                            .text("value", value.value())
                            .insert_statement(),
                    )?;
                }
            }

            for (expression, targets) in ontology.object_assertions_of(individual) {
                let PropertyExpression::Named(property) = expression else {
                    self.report.record(&Skip::AnonymousObjectPropertyExpression {
                        individual: name.to_owned(),
                    });
                    continue;
                };
                let property_name = property.local_name();
                let in_domain = object_closures
                    .domains
                    .get(property)
                    .is_some_and(|classes| classes.contains(&class));
                if !in_domain {
                    self.report.record(&Skip::OutsideObjectPropertyDomain {
                        individual: name.to_owned(),
                        class: class_name.clone(),
                        property: property_name.to_owned(),
                    });
                    continue;
                }
                for target in targets {
                    let (target_node, target_class) =
                        match instance::individual_class(ontology, target) {
                            Ok(resolved) => resolved,
                            Err(issue) => {
                                self.report
                                    .record(&target_skip(issue, target, name, property_name));
                                continue;
                            }
                        };
                    let in_range = object_closures
                        .ranges
                        .get(property)
                        .is_some_and(|classes| classes.contains(&target_class));
                    if !in_range {
                        self.report.record(&Skip::OutsideObjectPropertyRange {
                            target: local_name(target_node).to_owned(),
                            class: target_class.local_name().to_owned(),
                            source: name.to_owned(),
                            property: property_name.to_owned(),
                        });
                        continue;
                    }
                    instances.push(
                        Row::new("ObjectPropertyInstance")
                            .text("domainClass", class_name.clone())
                            .text("domainIndividual", name)
                            .text("property", property_name)
                            .text("rangeClass", target_class.local_name())
                            .text("rangeIndividual", local_name(target_node)),
                    );
                }
            }
        }
        tracing::info!(
            count = instances.len(),
            "populating the ObjectPropertyInstance table"
        );
        instances.flush(self.sink)
    }
}

fn individual_skip(issue: IndividualIssue, individual: &Individual) -> Skip {
    let individual = display_name(individual);
    match issue {
        IndividualIssue::Anonymous => Skip::AnonymousIndividual { individual },
        IndividualIssue::Untyped => Skip::UntypedIndividual { individual },
        IndividualIssue::MultiplyTyped => Skip::MultiplyTypedIndividual { individual },
        IndividualIssue::AnonymousType => Skip::AnonymouslyTypedIndividual { individual },
    }
}

fn target_skip(issue: IndividualIssue, target: &Individual, source: &str, property: &str) -> Skip {
    let target = display_name(target);
    let source = source.to_owned();
    let property = property.to_owned();
    match issue {
        IndividualIssue::Anonymous => Skip::AnonymousTarget {
            target,
            source,
            property,
        },
        IndividualIssue::Untyped => Skip::UntypedTarget {
            target,
            source,
            property,
        },
        IndividualIssue::MultiplyTyped => Skip::MultiplyTypedTarget {
            target,
            source,
            property,
        },
        IndividualIssue::AnonymousType => Skip::AnonymouslyTypedTarget {
            target,
            source,
            property,
        },
    }
}

fn display_name(individual: &Individual) -> String {
    match individual {
        Individual::Named(node) => local_name(node).to_owned(),
        Individual::Anonymous(node) => node.to_string(),
    }
}

fn sorted_classes(classes: &FxHashSet<OwlClass>) -> Vec<&str> {
    let mut names: Vec<_> = classes.iter().map(OwlClass::local_name).collect();
    names.sort_unstable();
    names
}

/// Order-preserving, deduplicating buffer for rows whose foreign keys point
/// at rows of the pass that generates them.
struct RowBuffer {
    statements: Vec<String>,
    seen: FxHashSet<String>,
}

impl RowBuffer {
    fn new() -> Self {
        Self {
            statements: Vec::new(),
            seen: FxHashSet::default(),
        }
    }

    fn push(&mut self, row: Row) {
        let statement = row.insert_statement();
        if self.seen.insert(statement.clone()) {
            self.statements.push(statement);
        }
    }

    fn len(&self) -> usize {
        self.statements.len()
    }

    fn flush<S: StatementSink>(self, sink: &mut S) -> Result<(), S::Error> {
        for statement in self.statements {
            sink.execute(&statement)?;
        }
        Ok(())
    }
}
