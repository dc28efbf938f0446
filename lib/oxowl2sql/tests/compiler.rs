//! Full builds against an in-memory recording sink.

use oxowl2sql::{BuildReport, MemorySink, Ontology, SchemaCompiler};

fn load_turtle(content: &str) -> Ontology {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ontology.ttl");
    std::fs::write(&path, content).unwrap();
    Ontology::load(&path).unwrap()
}

fn build(ontology: &Ontology) -> (Vec<String>, BuildReport) {
    let mut sink = MemorySink::new();
    let report = SchemaCompiler::new(ontology, &mut sink).build().unwrap();
    assert!(!sink.is_committed());
    (sink.statements().to_vec(), report)
}

fn position(statements: &[String], needle: &str) -> usize {
    statements
        .iter()
        .position(|statement| statement == needle)
        .unwrap_or_else(|| panic!("missing statement: {needle}"))
}

const PREFIXES: &str = "\
@prefix : <http://example.com/zoo#> .
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
";

#[test]
fn subclass_closure_reaches_the_relational_schema() {
    let ontology = load_turtle(&format!(
        "{PREFIXES}
:Animal a owl:Class .
:Dog a owl:Class ; rdfs:subClassOf :Animal .
:rex a :Dog .
"
    ));
    let (statements, report) = build(&ontology);

    assert_eq!(report.validation_errors(), 0);
    let class_rows = position(
        &statements,
        "INSERT INTO Class (name) VALUES ('Animal')",
    );
    let relationship = position(
        &statements,
        "INSERT INTO ClassRelationship (subclass, superclass) VALUES ('Dog', 'Animal')",
    );
    let individual = position(
        &statements,
        "INSERT INTO Individual (name, class) VALUES ('rex', 'Dog')",
    );
    assert!(class_rows < relationship);
    assert!(relationship < individual);
    // reflexive closure rows
    position(
        &statements,
        "INSERT INTO ClassRelationship (subclass, superclass) VALUES ('Dog', 'Dog')",
    );
    position(
        &statements,
        "INSERT INTO ClassRelationship (subclass, superclass) VALUES ('Animal', 'Animal')",
    );
}

#[test]
fn transitive_class_relationships_are_materialized_once() {
    let ontology = load_turtle(&format!(
        "{PREFIXES}
:A a owl:Class .
:B a owl:Class ; rdfs:subClassOf :A .
:C a owl:Class ; rdfs:subClassOf :A .
:D a owl:Class ; rdfs:subClassOf :B , :C .
"
    ));
    let (statements, _) = build(&ontology);

    let row = "INSERT INTO ClassRelationship (subclass, superclass) VALUES ('D', 'A')";
    assert_eq!(
        statements
            .iter()
            .filter(|statement| statement.as_str() == row)
            .count(),
        1
    );
}

#[test]
fn unconstrained_property_accepts_every_pairing() {
    let ontology = load_turtle(&format!(
        "{PREFIXES}
:ClassX a owl:Class .
:ClassY a owl:Class .
:hasOwner a owl:ObjectProperty .
:a a :ClassX .
:b a :ClassY .
:a :hasOwner :b .
"
    ));
    let (statements, report) = build(&ontology);

    assert_eq!(report.validation_errors(), 0);
    // with no declared domain or range, every class qualifies
    for class in ["ClassX", "ClassY"] {
        position(
            &statements,
            &format!(
                "INSERT INTO ObjectPropertyDomain (domainClass, property) \
                 VALUES ('{class}', 'hasOwner')"
            ),
        );
        position(
            &statements,
            &format!(
                "INSERT INTO ObjectPropertyRange (property, rangeClass) \
                 VALUES ('hasOwner', '{class}')"
            ),
        );
    }
    let target_row = position(
        &statements,
        "INSERT INTO Individual (name, class) VALUES ('b', 'ClassY')",
    );
    let instance_row = position(
        &statements,
        "INSERT INTO ObjectPropertyInstance \
         (domainClass, domainIndividual, property, rangeClass, rangeIndividual) \
         VALUES ('ClassX', 'a', 'hasOwner', 'ClassY', 'b')",
    );
    // object property instances are deferred until every individual exists
    assert!(target_row < instance_row);
}

#[test]
fn declared_and_inferred_superproperties_are_partitioned() {
    let ontology = load_turtle(&format!(
        "{PREFIXES}
:p a owl:ObjectProperty ; rdfs:subPropertyOf :q .
:q a owl:ObjectProperty ; rdfs:subPropertyOf :r .
:r a owl:ObjectProperty .
"
    ));
    let (statements, _) = build(&ontology);

    let relationship = |sub: &str, sup: &str, inferred: bool| {
        format!(
            "INSERT INTO ObjectPropertyRelationship (subproperty, superproperty, isInferred) \
             VALUES ('{sub}', '{sup}', {inferred})"
        )
    };
    position(&statements, &relationship("p", "q", false));
    position(&statements, &relationship("q", "r", false));
    position(&statements, &relationship("p", "r", true));
    assert!(
        !statements
            .iter()
            .any(|statement| statement.contains("VALUES ('p', 'p'"))
    );
    // relationship rows only flush once every type row exists
    let last_type = statements
        .iter()
        .rposition(|statement| statement.starts_with("INSERT INTO ObjectPropertyType"))
        .unwrap();
    let first_relationship = statements
        .iter()
        .position(|statement| statement.starts_with("INSERT INTO ObjectPropertyRelationship"))
        .unwrap();
    assert!(last_type < first_relationship);
}

#[test]
fn characteristics_reach_the_type_row() {
    let ontology = load_turtle(&format!(
        "{PREFIXES}
:eats a owl:ObjectProperty , owl:TransitiveProperty .
"
    ));
    let (statements, _) = build(&ontology);

    position(
        &statements,
        "INSERT INTO ObjectPropertyType \
         (name, isFunctional, isInverseFunctional, isSymmetric, isAsymmetric, \
         isTransitive, isReflexive, isIrreflexive) \
         VALUES ('eats', false, false, false, false, true, false, false)",
    );
}

#[test]
fn declared_inverses_are_recorded() {
    let ontology = load_turtle(&format!(
        "{PREFIXES}
:hasOwner a owl:ObjectProperty ; owl:inverseOf :ownerOf .
:ownerOf a owl:ObjectProperty .
"
    ));
    let (statements, _) = build(&ontology);

    position(
        &statements,
        "INSERT INTO ObjectPropertyInverse (property, inverseProperty) \
         VALUES ('hasOwner', 'ownerOf')",
    );
}

#[test]
fn domain_violations_suppress_the_instance_row() {
    let ontology = load_turtle(&format!(
        "{PREFIXES}
:Person a owl:Class .
:Dog a owl:Class .
:hasPet a owl:ObjectProperty ; rdfs:domain :Person ; rdfs:range :Dog .
:x a :Dog .
:y a :Dog .
:x :hasPet :y .
"
    ));
    let (statements, report) = build(&ontology);

    assert_eq!(report.validation_errors(), 1);
    assert!(
        !statements
            .iter()
            .any(|statement| statement.starts_with("INSERT INTO ObjectPropertyInstance"))
    );
}

#[test]
fn range_violations_suppress_the_instance_row() {
    let ontology = load_turtle(&format!(
        "{PREFIXES}
:Person a owl:Class .
:Dog a owl:Class .
:hasPet a owl:ObjectProperty ; rdfs:domain :Person ; rdfs:range :Dog .
:alice a :Person .
:bob a :Person .
:alice :hasPet :bob .
"
    ));
    let (statements, report) = build(&ontology);

    assert_eq!(report.validation_errors(), 1);
    assert!(
        !statements
            .iter()
            .any(|statement| statement.starts_with("INSERT INTO ObjectPropertyInstance"))
    );
}

#[test]
fn individuals_without_exactly_one_named_class_are_skipped() {
    let ontology = load_turtle(&format!(
        "{PREFIXES}
:Dog a owl:Class .
:Robot a owl:Class .
:rex a :Dog , :Robot .
:ghost a owl:NamedIndividual .
"
    ));
    let (statements, report) = build(&ontology);

    assert_eq!(report.validation_errors(), 2);
    assert!(
        !statements
            .iter()
            .any(|statement| statement.starts_with("INSERT INTO Individual"))
    );
}

#[test]
fn data_values_are_emitted_verbatim_and_escaped() {
    let ontology = load_turtle(&format!(
        "{PREFIXES}
:Person a owl:Class .
:age a owl:DatatypeProperty ; rdfs:domain :Person .
:note a owl:DatatypeProperty .
:alice a :Person ; :age \"38\" ; :note \"it's\" .
"
    ));
    let (statements, report) = build(&ontology);

    assert_eq!(report.validation_errors(), 0);
    position(
        &statements,
        "INSERT INTO DataPropertyInstance (domainClass, domainIndividual, property, value) \
         VALUES ('Person', 'alice', 'age', '38')",
    );
    position(
        &statements,
        "INSERT INTO DataPropertyInstance (domainClass, domainIndividual, property, value) \
         VALUES ('Person', 'alice', 'note', 'it\\'s')",
    );
}

#[test]
fn data_domain_violations_suppress_the_value_rows() {
    let ontology = load_turtle(&format!(
        "{PREFIXES}
:Person a owl:Class .
:Dog a owl:Class .
:age a owl:DatatypeProperty ; rdfs:domain :Person .
:rex a :Dog ; :age \"3\" .
"
    ));
    let (statements, report) = build(&ontology);

    assert_eq!(report.validation_errors(), 1);
    assert!(
        !statements
            .iter()
            .any(|statement| statement.starts_with("INSERT INTO DataPropertyInstance"))
    );
}

#[test]
fn union_domains_expand_to_each_disjunct() {
    let ontology = load_turtle(&format!(
        "{PREFIXES}
:Cat a owl:Class .
:Dog a owl:Class .
:Person a owl:Class .
:eats a owl:ObjectProperty ;
    rdfs:domain [ a owl:Class ; owl:unionOf ( :Cat :Dog ) ] .
"
    ));
    let (statements, _) = build(&ontology);

    for class in ["Cat", "Dog"] {
        position(
            &statements,
            &format!(
                "INSERT INTO ObjectPropertyDomain (domainClass, property) \
                 VALUES ('{class}', 'eats')"
            ),
        );
    }
    assert!(!statements.iter().any(|statement| {
        statement == "INSERT INTO ObjectPropertyDomain (domainClass, property) \
                      VALUES ('Person', 'eats')"
    }));
}

#[test]
fn imports_are_merged_from_sibling_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("base.ttl"),
        format!(
            "{PREFIXES}
<http://example.com/zoo> a owl:Ontology ;
    owl:imports <http://example.com/animals.ttl> .
:Dog a owl:Class ; rdfs:subClassOf :Animal .
"
        ),
    )
    .unwrap();
    std::fs::write(
        dir.path().join("animals.ttl"),
        format!(
            "{PREFIXES}
:Animal a owl:Class .
:Pet a owl:Class .
"
        ),
    )
    .unwrap();

    let ontology = Ontology::load(dir.path().join("base.ttl")).unwrap();
    assert_eq!(ontology.classes().count(), 3);
    assert_eq!(
        ontology.iri().map(|iri| iri.as_str()),
        Some("http://example.com/zoo")
    );
}

#[test]
fn empty_ontology_still_creates_the_schema() {
    let ontology = Ontology::new(None);
    let (statements, report) = build(&ontology);
    assert_eq!(statements.len(), 13);
    assert_eq!(report.validation_errors(), 0);
}
