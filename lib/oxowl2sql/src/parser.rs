//! Builds an [`Ontology`] from RDF documents, following `owl:imports`.

use crate::entity::{DataProperty, Individual, ObjectProperty, OwlClass};
use crate::error::OntologyLoadError;
use crate::expression::{ClassExpression, PropertyExpression};
use crate::ontology::Ontology;
use oxrdf::vocab::{rdf, rdfs};
use oxrdf::{
    BlankNode, Graph, NamedNode, SubjectRef, Term, TermRef, Triple,
};
use oxrdfio::{RdfFormat, RdfParser};
use rustc_hash::FxHashSet;
use std::ffi::OsStr;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

mod vocab {
    use oxrdf::NamedNodeRef;

    pub const ONTOLOGY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Ontology");
    pub const IMPORTS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#imports");
    pub const CLASS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Class");
    pub const OBJECT_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#ObjectProperty");
    pub const DATATYPE_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#DatatypeProperty");
    pub const NAMED_INDIVIDUAL: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#NamedIndividual");
    pub const UNION_OF: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#unionOf");
    pub const INVERSE_OF: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#inverseOf");
    pub const FUNCTIONAL_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#FunctionalProperty");
    pub const INVERSE_FUNCTIONAL_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#InverseFunctionalProperty");
    pub const SYMMETRIC_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#SymmetricProperty");
    pub const ASYMMETRIC_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#AsymmetricProperty");
    pub const TRANSITIVE_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#TransitiveProperty");
    pub const REFLEXIVE_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#ReflexiveProperty");
    pub const IRREFLEXIVE_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#IrreflexiveProperty");
}

const RESERVED_NAMESPACES: [&str; 4] = [
    "http://www.w3.org/1999/02/22-rdf-syntax-ns#",
    "http://www.w3.org/2000/01/rdf-schema#",
    "http://www.w3.org/2002/07/owl#",
    "http://www.w3.org/2001/XMLSchema#",
];

fn is_reserved(iri: &str) -> bool {
    RESERVED_NAMESPACES
        .iter()
        .any(|namespace| iri.starts_with(namespace))
}

/// Parses a document and every import reachable from it into a single graph.
pub(crate) fn load_graph(path: &Path) -> Result<Graph, OntologyLoadError> {
    let mut graph = Graph::default();
    let mut pending = vec![path.to_path_buf()];
    let mut loaded = FxHashSet::default();
    while let Some(file) = pending.pop() {
        let file = file.canonicalize().unwrap_or(file);
        if !loaded.insert(file.clone()) {
            continue;
        }
        tracing::debug!(file = %file.display(), "parsing ontology document");
        let imports = parse_document(&file, &mut graph)?;
        let base_dir = file.parent().unwrap_or_else(|| Path::new("."));
        for import in imports {
            if let Some(resolved) = resolve_import(&import, base_dir) {
                pending.push(resolved);
            } else {
                tracing::warn!(import = %import, "unresolvable owl:imports target, skipping");
            }
        }
    }
    Ok(graph)
}

/// Parses one document into `graph` and returns its `owl:imports` targets.
fn parse_document(path: &Path, graph: &mut Graph) -> Result<Vec<NamedNode>, OntologyLoadError> {
    let format = rdf_format_for_path(path)?;
    let reader = BufReader::new(File::open(path)?);
    let parser = RdfParser::from_format(format).rename_blank_nodes();
    let parser = match parser
        .clone()
        .with_base_iri(format!("file://{}", path.display()))
    {
        Ok(parser) => parser,
        Err(_) => parser,
    };
    let mut imports = Vec::new();
    for quad in parser.for_reader(reader) {
        let quad = quad?;
        if quad.predicate.as_ref() == vocab::IMPORTS {
            if let Term::NamedNode(import) = &quad.object {
                imports.push(import.clone());
            }
        }
        let triple = Triple::new(quad.subject, quad.predicate, quad.object);
        graph.insert(triple.as_ref());
    }
    Ok(imports)
}

fn rdf_format_for_path(path: &Path) -> Result<RdfFormat, OntologyLoadError> {
    path.extension()
        .and_then(OsStr::to_str)
        .and_then(RdfFormat::from_extension)
        .ok_or_else(|| OntologyLoadError::UnsupportedFormat(path.display().to_string()))
}

/// Maps an `owl:imports` IRI to a local file.
///
/// `file:` IRIs resolve to their path; for anything else the last IRI segment
/// is tried next to the importing document.
fn resolve_import(import: &NamedNode, base_dir: &Path) -> Option<PathBuf> {
    let iri = import.as_str();
    if let Some(path) = iri.strip_prefix("file://") {
        let path = PathBuf::from(path);
        return path.exists().then_some(path);
    }
    let name = iri.rsplit(['/', '#']).next()?;
    if name.is_empty() {
        return None;
    }
    let candidate = base_dir.join(name);
    candidate.exists().then_some(candidate)
}

pub(crate) fn ontology_from_graph(graph: &Graph) -> Ontology {
    let mut ontology = Ontology::new(None);
    read_declarations(graph, &mut ontology);
    read_class_axioms(graph, &mut ontology);
    read_property_axioms(graph, &mut ontology);
    read_assertions(graph, &mut ontology);
    ontology
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Characteristic {
    Functional,
    InverseFunctional,
    Symmetric,
    Asymmetric,
    Transitive,
    Reflexive,
    Irreflexive,
}

fn read_declarations(graph: &Graph, ontology: &mut Ontology) {
    let mut characteristics = Vec::new();
    for triple in graph.triples_for_predicate(rdf::TYPE) {
        let SubjectRef::NamedNode(subject) = triple.subject else {
            continue;
        };
        let TermRef::NamedNode(object) = triple.object else {
            continue;
        };
        if object == vocab::ONTOLOGY {
            ontology.set_iri(Some(subject.into_owned()));
            continue;
        }
        if is_reserved(subject.as_str()) {
            continue;
        }
        if object == vocab::CLASS {
            ontology.declare_class(OwlClass::new(subject.into_owned()));
        } else if object == vocab::OBJECT_PROPERTY {
            ontology.declare_object_property(ObjectProperty::new(subject.into_owned()));
        } else if object == vocab::DATATYPE_PROPERTY {
            ontology.declare_data_property(DataProperty::new(subject.into_owned()));
        } else if object == vocab::NAMED_INDIVIDUAL {
            ontology.declare_individual(Individual::Named(subject.into_owned()));
        } else if object == vocab::FUNCTIONAL_PROPERTY {
            characteristics.push((subject.into_owned(), Characteristic::Functional));
        } else if object == vocab::INVERSE_FUNCTIONAL_PROPERTY {
            characteristics.push((subject.into_owned(), Characteristic::InverseFunctional));
        } else if object == vocab::SYMMETRIC_PROPERTY {
            characteristics.push((subject.into_owned(), Characteristic::Symmetric));
        } else if object == vocab::ASYMMETRIC_PROPERTY {
            characteristics.push((subject.into_owned(), Characteristic::Asymmetric));
        } else if object == vocab::TRANSITIVE_PROPERTY {
            characteristics.push((subject.into_owned(), Characteristic::Transitive));
        } else if object == vocab::REFLEXIVE_PROPERTY {
            characteristics.push((subject.into_owned(), Characteristic::Reflexive));
        } else if object == vocab::IRREFLEXIVE_PROPERTY {
            characteristics.push((subject.into_owned(), Characteristic::Irreflexive));
        }
    }
    for (subject, characteristic) in characteristics {
        apply_characteristic(ontology, subject, characteristic);
    }
}

/// `owl:FunctionalProperty` applies to whichever kind the property was
/// declared as. The six object-only characteristics imply an object property
/// declaration, as in the OWL 2 RDF mapping.
fn apply_characteristic(ontology: &mut Ontology, subject: NamedNode, characteristic: Characteristic) {
    let object_property = ObjectProperty::new(subject);
    if characteristic == Characteristic::Functional
        && !ontology.contains_object_property(&object_property)
    {
        let data_property = DataProperty::new(object_property.into_inner());
        if ontology.contains_data_property(&data_property) {
            ontology.set_functional_data_property(data_property);
        }
        return;
    }
    let flags = ontology.object_property_characteristics_mut(&object_property);
    match characteristic {
        Characteristic::Functional => flags.functional = true,
        Characteristic::InverseFunctional => flags.inverse_functional = true,
        Characteristic::Symmetric => flags.symmetric = true,
        Characteristic::Asymmetric => flags.asymmetric = true,
        Characteristic::Transitive => flags.transitive = true,
        Characteristic::Reflexive => flags.reflexive = true,
        Characteristic::Irreflexive => flags.irreflexive = true,
    }
}

fn read_class_axioms(graph: &Graph, ontology: &mut Ontology) {
    for triple in graph.triples_for_predicate(rdfs::SUB_CLASS_OF) {
        let Some(sub) = class_expression_for_subject(graph, triple.subject) else {
            continue;
        };
        let Some(sup) = class_expression_for_term(graph, triple.object) else {
            continue;
        };
        ontology.add_subclass_of(sub, sup);
    }
}

fn read_property_axioms(graph: &Graph, ontology: &mut Ontology) {
    for triple in graph.triples_for_predicate(rdfs::SUB_PROPERTY_OF) {
        let SubjectRef::NamedNode(subject) = triple.subject else {
            continue;
        };
        let object_property = ObjectProperty::new(subject.into_owned());
        if ontology.contains_object_property(&object_property) {
            if let Some(sup) = property_expression(triple.object, ObjectProperty::new) {
                ontology.add_super_object_property(object_property, sup);
            }
            continue;
        }
        let data_property = DataProperty::new(object_property.into_inner());
        if ontology.contains_data_property(&data_property) {
            if let Some(sup) = property_expression(triple.object, DataProperty::new) {
                ontology.add_super_data_property(data_property, sup);
            }
        }
    }
    for triple in graph.triples_for_predicate(rdfs::DOMAIN) {
        let SubjectRef::NamedNode(subject) = triple.subject else {
            continue;
        };
        let Some(domain) = class_expression_for_term(graph, triple.object) else {
            continue;
        };
        let object_property = ObjectProperty::new(subject.into_owned());
        if ontology.contains_object_property(&object_property) {
            ontology.add_object_domain(object_property, domain);
            continue;
        }
        let data_property = DataProperty::new(object_property.into_inner());
        if ontology.contains_data_property(&data_property) {
            ontology.add_data_domain(data_property, domain);
        }
    }
    for triple in graph.triples_for_predicate(rdfs::RANGE) {
        let SubjectRef::NamedNode(subject) = triple.subject else {
            continue;
        };
        let object_property = ObjectProperty::new(subject.into_owned());
        if !ontology.contains_object_property(&object_property) {
            // data property ranges are datatypes, not classes
            continue;
        }
        if let Some(range) = class_expression_for_term(graph, triple.object) {
            ontology.add_object_range(object_property, range);
        }
    }
    for triple in graph.triples_for_predicate(vocab::INVERSE_OF) {
        let SubjectRef::NamedNode(subject) = triple.subject else {
            continue;
        };
        let object_property = ObjectProperty::new(subject.into_owned());
        if !ontology.contains_object_property(&object_property) {
            continue;
        }
        if let Some(inverse) = property_expression(triple.object, ObjectProperty::new) {
            ontology.add_inverse_of(object_property, inverse);
        }
    }
}

fn read_assertions(graph: &Graph, ontology: &mut Ontology) {
    for triple in graph.triples_for_predicate(rdf::TYPE) {
        match triple.object {
            TermRef::NamedNode(class) if !is_reserved(class.as_str()) => {
                ontology.assert_type(
                    individual_for_subject(triple.subject),
                    ClassExpression::Class(OwlClass::new(class.into_owned())),
                );
            }
            TermRef::BlankNode(node) => {
                let expression =
                    anonymous_class_expression(graph, node, &mut FxHashSet::default());
                ontology.assert_type(individual_for_subject(triple.subject), expression);
            }
            _ => (),
        }
    }
    for triple in graph.iter() {
        if triple.predicate == rdf::TYPE {
            continue;
        }
        let object_property = ObjectProperty::new(triple.predicate.into_owned());
        if ontology.contains_object_property(&object_property) {
            let target = match triple.object {
                TermRef::NamedNode(node) => Individual::Named(node.into_owned()),
                TermRef::BlankNode(node) => Individual::Anonymous(node.into_owned()),
                _ => continue,
            };
            ontology.assert_object_value(
                individual_for_subject(triple.subject),
                PropertyExpression::Named(object_property),
                target,
            );
            continue;
        }
        let data_property = DataProperty::new(object_property.into_inner());
        if ontology.contains_data_property(&data_property) {
            let TermRef::Literal(literal) = triple.object else {
                continue;
            };
            ontology.assert_data_value(
                individual_for_subject(triple.subject),
                PropertyExpression::Named(data_property),
                literal.into_owned(),
            );
        }
    }
}

fn individual_for_subject(subject: SubjectRef<'_>) -> Individual {
    match subject {
        SubjectRef::NamedNode(node) => Individual::Named(node.into_owned()),
        SubjectRef::BlankNode(node) => Individual::Anonymous(node.into_owned()),
    }
}

fn property_expression<P>(
    term: TermRef<'_>,
    named: impl FnOnce(NamedNode) -> P,
) -> Option<PropertyExpression<P>> {
    match term {
        TermRef::NamedNode(node) => Some(PropertyExpression::Named(named(node.into_owned()))),
        TermRef::BlankNode(node) => Some(PropertyExpression::Anonymous(node.into_owned())),
        _ => None,
    }
}

fn class_expression_for_subject(
    graph: &Graph,
    subject: SubjectRef<'_>,
) -> Option<ClassExpression> {
    match subject {
        SubjectRef::NamedNode(node) => (!is_reserved(node.as_str()))
            .then(|| ClassExpression::Class(OwlClass::new(node.into_owned()))),
        SubjectRef::BlankNode(node) => Some(anonymous_class_expression(
            graph,
            node,
            &mut FxHashSet::default(),
        )),
    }
}

fn class_expression_for_term(graph: &Graph, term: TermRef<'_>) -> Option<ClassExpression> {
    match term {
        TermRef::NamedNode(node) => (!is_reserved(node.as_str()))
            .then(|| ClassExpression::Class(OwlClass::new(node.into_owned()))),
        TermRef::BlankNode(node) => Some(anonymous_class_expression(
            graph,
            node,
            &mut FxHashSet::default(),
        )),
        _ => None,
    }
}

/// Resolves a blank class node: an `owl:unionOf` list becomes
/// [`ClassExpression::UnionOf`], everything else stays opaque.
fn anonymous_class_expression(
    graph: &Graph,
    node: oxrdf::BlankNodeRef<'_>,
    visiting: &mut FxHashSet<BlankNode>,
) -> ClassExpression {
    if !visiting.insert(node.into_owned()) {
        return ClassExpression::Anonymous(node.into_owned());
    }
    if let Some(head) = graph.object_for_subject_predicate(node, vocab::UNION_OF) {
        if let Some(disjuncts) = expression_list(graph, head, visiting) {
            return ClassExpression::UnionOf(disjuncts);
        }
    }
    ClassExpression::Anonymous(node.into_owned())
}

/// Walks an RDF collection of class expressions. Returns `None` on a
/// malformed or cyclic list.
fn expression_list(
    graph: &Graph,
    head: TermRef<'_>,
    visiting: &mut FxHashSet<BlankNode>,
) -> Option<Vec<ClassExpression>> {
    let nil = Term::from(rdf::NIL.into_owned());
    let mut expressions = Vec::new();
    let mut seen = FxHashSet::default();
    let mut current = head.into_owned();
    while current != nil {
        if !seen.insert(current.clone()) {
            return None;
        }
        let subject = match &current {
            Term::NamedNode(node) => SubjectRef::from(node.as_ref()),
            Term::BlankNode(node) => SubjectRef::from(node.as_ref()),
            _ => return None,
        };
        let first = graph.object_for_subject_predicate(subject, rdf::FIRST)?;
        match first {
            TermRef::NamedNode(node) => {
                if !is_reserved(node.as_str()) {
                    expressions.push(ClassExpression::Class(OwlClass::new(node.into_owned())));
                }
            }
            TermRef::BlankNode(node) => {
                expressions.push(anonymous_class_expression(graph, node, visiting));
            }
            _ => return None,
        }
        let rest = graph
            .object_for_subject_predicate(subject, rdf::REST)?
            .into_owned();
        current = rest;
    }
    Some(expressions)
}
