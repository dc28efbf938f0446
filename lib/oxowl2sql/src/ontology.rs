use crate::entity::{DataProperty, Individual, ObjectProperty, OwlClass};
use crate::error::OntologyLoadError;
use crate::expression::{
    ClassExpression, DataPropertyExpression, ObjectPropertyExpression, PropertyExpression,
};
use crate::parser;
use oxrdf::{Graph, Literal, NamedNode};
use rustc_hash::{FxHashMap, FxHashSet};
use std::path::Path;

/// The seven object property characteristics of OWL 2.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObjectPropertyCharacteristics {
    pub functional: bool,
    pub inverse_functional: bool,
    pub symmetric: bool,
    pub asymmetric: bool,
    pub transitive: bool,
    pub reflexive: bool,
    pub irreflexive: bool,
}

/// An indexed view over the axioms and assertions of an OWL 2 ontology.
///
/// The signature sets are kept consistent by the mutation methods: asserting
/// an axiom declares every named entity it mentions, so `classes()`,
/// `object_properties()`, `data_properties()` and `individuals()` always
/// enumerate the full signature.
#[derive(Debug, Clone, Default)]
pub struct Ontology {
    iri: Option<NamedNode>,
    classes: FxHashSet<OwlClass>,
    object_properties: FxHashSet<ObjectProperty>,
    data_properties: FxHashSet<DataProperty>,
    individuals: FxHashSet<Individual>,
    sub_class_of: Vec<(ClassExpression, ClassExpression)>,
    super_object_properties: FxHashMap<ObjectProperty, Vec<ObjectPropertyExpression>>,
    super_data_properties: FxHashMap<DataProperty, Vec<DataPropertyExpression>>,
    object_domains: FxHashMap<ObjectProperty, Vec<ClassExpression>>,
    object_ranges: FxHashMap<ObjectProperty, Vec<ClassExpression>>,
    data_domains: FxHashMap<DataProperty, Vec<ClassExpression>>,
    inverses: FxHashMap<ObjectProperty, Vec<ObjectPropertyExpression>>,
    object_characteristics: FxHashMap<ObjectProperty, ObjectPropertyCharacteristics>,
    functional_data_properties: FxHashSet<DataProperty>,
    types: FxHashMap<Individual, Vec<ClassExpression>>,
    object_assertions: FxHashMap<Individual, Vec<(ObjectPropertyExpression, Vec<Individual>)>>,
    data_assertions: FxHashMap<Individual, Vec<(DataPropertyExpression, Vec<Literal>)>>,
}

impl Ontology {
    #[inline]
    pub fn new(iri: Option<NamedNode>) -> Self {
        Self {
            iri,
            ..Self::default()
        }
    }

    /// Loads an ontology and its resolvable import closure from a file.
    ///
    /// The RDF format is guessed from the file extension. `owl:imports`
    /// targets with a `file:` scheme, or whose last IRI segment names a file
    /// next to the importing document, are parsed into the same graph;
    /// anything else is skipped with a warning. Import cycles terminate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, OntologyLoadError> {
        let graph = parser::load_graph(path.as_ref())?;
        Ok(Self::from_graph(&graph))
    }

    /// Builds an indexed ontology from an already parsed RDF graph.
    pub fn from_graph(graph: &Graph) -> Self {
        parser::ontology_from_graph(graph)
    }

    /// The `owl:Ontology` IRI, if the source declared one.
    #[inline]
    pub fn iri(&self) -> Option<&NamedNode> {
        self.iri.as_ref()
    }

    #[inline]
    pub(crate) fn set_iri(&mut self, iri: Option<NamedNode>) {
        self.iri = iri;
    }

    pub fn classes(&self) -> impl Iterator<Item = &OwlClass> {
        self.classes.iter()
    }

    pub fn object_properties(&self) -> impl Iterator<Item = &ObjectProperty> {
        self.object_properties.iter()
    }

    pub fn data_properties(&self) -> impl Iterator<Item = &DataProperty> {
        self.data_properties.iter()
    }

    pub fn individuals(&self) -> impl Iterator<Item = &Individual> {
        self.individuals.iter()
    }

    #[inline]
    pub fn contains_class(&self, class: &OwlClass) -> bool {
        self.classes.contains(class)
    }

    #[inline]
    pub fn contains_object_property(&self, property: &ObjectProperty) -> bool {
        self.object_properties.contains(property)
    }

    #[inline]
    pub fn contains_data_property(&self, property: &DataProperty) -> bool {
        self.data_properties.contains(property)
    }

    #[inline]
    pub fn contains_individual(&self, individual: &Individual) -> bool {
        self.individuals.contains(individual)
    }

    /// One-level superclass expressions of a named class.
    pub fn superclass_expressions_of<'a>(
        &'a self,
        class: &'a OwlClass,
    ) -> impl Iterator<Item = &'a ClassExpression> {
        self.sub_class_of
            .iter()
            .filter(move |(sub, _)| sub.as_class() == Some(class))
            .map(|(_, sup)| sup)
    }

    /// One-level subclass expressions of a named class.
    pub fn subclass_expressions_of<'a>(
        &'a self,
        class: &'a OwlClass,
    ) -> impl Iterator<Item = &'a ClassExpression> {
        self.sub_class_of
            .iter()
            .filter(move |(_, sup)| sup.as_class() == Some(class))
            .map(|(sub, _)| sub)
    }

    /// One-level declared super-property expressions of an object property.
    pub fn super_object_property_expressions_of(
        &self,
        property: &ObjectProperty,
    ) -> &[ObjectPropertyExpression] {
        self.super_object_properties
            .get(property)
            .map_or(&[], Vec::as_slice)
    }

    /// One-level declared super-property expressions of a data property.
    pub fn super_data_property_expressions_of(
        &self,
        property: &DataProperty,
    ) -> &[DataPropertyExpression] {
        self.super_data_properties
            .get(property)
            .map_or(&[], Vec::as_slice)
    }

    /// Declared domain expressions of an object property.
    pub fn object_domains_of(&self, property: &ObjectProperty) -> &[ClassExpression] {
        self.object_domains.get(property).map_or(&[], Vec::as_slice)
    }

    /// Declared range expressions of an object property.
    pub fn object_ranges_of(&self, property: &ObjectProperty) -> &[ClassExpression] {
        self.object_ranges.get(property).map_or(&[], Vec::as_slice)
    }

    /// Declared domain expressions of a data property.
    pub fn data_domains_of(&self, property: &DataProperty) -> &[ClassExpression] {
        self.data_domains.get(property).map_or(&[], Vec::as_slice)
    }

    /// Declared inverse property expressions of an object property.
    pub fn inverses_of(&self, property: &ObjectProperty) -> &[ObjectPropertyExpression] {
        self.inverses.get(property).map_or(&[], Vec::as_slice)
    }

    pub fn object_property_characteristics(
        &self,
        property: &ObjectProperty,
    ) -> ObjectPropertyCharacteristics {
        self.object_characteristics
            .get(property)
            .copied()
            .unwrap_or_default()
    }

    #[inline]
    pub fn is_functional_data_property(&self, property: &DataProperty) -> bool {
        self.functional_data_properties.contains(property)
    }

    /// Asserted types of an individual, deduplicated.
    pub fn types_of(&self, individual: &Individual) -> &[ClassExpression] {
        self.types.get(individual).map_or(&[], Vec::as_slice)
    }

    /// Object property assertions with this individual as subject, grouped by
    /// property expression.
    pub fn object_assertions_of(
        &self,
        individual: &Individual,
    ) -> &[(ObjectPropertyExpression, Vec<Individual>)] {
        self.object_assertions
            .get(individual)
            .map_or(&[], Vec::as_slice)
    }

    /// Data property assertions with this individual as subject, grouped by
    /// property expression.
    pub fn data_assertions_of(
        &self,
        individual: &Individual,
    ) -> &[(DataPropertyExpression, Vec<Literal>)] {
        self.data_assertions
            .get(individual)
            .map_or(&[], Vec::as_slice)
    }

    pub fn declare_class(&mut self, class: OwlClass) {
        self.classes.insert(class);
    }

    pub fn declare_object_property(&mut self, property: ObjectProperty) {
        self.object_properties.insert(property);
    }

    pub fn declare_data_property(&mut self, property: DataProperty) {
        self.data_properties.insert(property);
    }

    pub fn declare_individual(&mut self, individual: Individual) {
        self.individuals.insert(individual);
    }

    pub fn add_subclass_of(&mut self, sub: ClassExpression, sup: ClassExpression) {
        self.declare_expression_classes(&sub);
        self.declare_expression_classes(&sup);
        self.sub_class_of.push((sub, sup));
    }

    pub fn add_super_object_property(
        &mut self,
        property: ObjectProperty,
        sup: ObjectPropertyExpression,
    ) {
        self.declare_object_property(property.clone());
        if let PropertyExpression::Named(named) = &sup {
            self.declare_object_property(named.clone());
        }
        self.super_object_properties
            .entry(property)
            .or_default()
            .push(sup);
    }

    pub fn add_super_data_property(&mut self, property: DataProperty, sup: DataPropertyExpression) {
        self.declare_data_property(property.clone());
        if let PropertyExpression::Named(named) = &sup {
            self.declare_data_property(named.clone());
        }
        self.super_data_properties
            .entry(property)
            .or_default()
            .push(sup);
    }

    pub fn add_object_domain(&mut self, property: ObjectProperty, domain: ClassExpression) {
        self.declare_object_property(property.clone());
        self.declare_expression_classes(&domain);
        self.object_domains.entry(property).or_default().push(domain);
    }

    pub fn add_object_range(&mut self, property: ObjectProperty, range: ClassExpression) {
        self.declare_object_property(property.clone());
        self.declare_expression_classes(&range);
        self.object_ranges.entry(property).or_default().push(range);
    }

    pub fn add_data_domain(&mut self, property: DataProperty, domain: ClassExpression) {
        self.declare_data_property(property.clone());
        self.declare_expression_classes(&domain);
        self.data_domains.entry(property).or_default().push(domain);
    }

    pub fn add_inverse_of(&mut self, property: ObjectProperty, inverse: ObjectPropertyExpression) {
        self.declare_object_property(property.clone());
        if let PropertyExpression::Named(named) = &inverse {
            self.declare_object_property(named.clone());
        }
        self.inverses.entry(property).or_default().push(inverse);
    }

    pub fn object_property_characteristics_mut(
        &mut self,
        property: &ObjectProperty,
    ) -> &mut ObjectPropertyCharacteristics {
        self.declare_object_property(property.clone());
        self.object_characteristics
            .entry(property.clone())
            .or_default()
    }

    pub fn set_functional_data_property(&mut self, property: DataProperty) {
        self.declare_data_property(property.clone());
        self.functional_data_properties.insert(property);
    }

    pub fn assert_type(&mut self, individual: Individual, r#type: ClassExpression) {
        self.declare_expression_classes(&r#type);
        self.declare_individual(individual.clone());
        let types = self.types.entry(individual).or_default();
        if !types.contains(&r#type) {
            types.push(r#type);
        }
    }

    pub fn assert_object_value(
        &mut self,
        individual: Individual,
        property: ObjectPropertyExpression,
        target: Individual,
    ) {
        if let PropertyExpression::Named(named) = &property {
            self.declare_object_property(named.clone());
        }
        self.declare_individual(individual.clone());
        self.declare_individual(target.clone());
        let assertions = self.object_assertions.entry(individual).or_default();
        if let Some((_, targets)) = assertions
            .iter_mut()
            .find(|(existing, _)| *existing == property)
        {
            if !targets.contains(&target) {
                targets.push(target);
            }
        } else {
            assertions.push((property, vec![target]));
        }
    }

    pub fn assert_data_value(
        &mut self,
        individual: Individual,
        property: DataPropertyExpression,
        value: Literal,
    ) {
        if let PropertyExpression::Named(named) = &property {
            self.declare_data_property(named.clone());
        }
        self.declare_individual(individual.clone());
        let assertions = self.data_assertions.entry(individual).or_default();
        if let Some((_, values)) = assertions
            .iter_mut()
            .find(|(existing, _)| *existing == property)
        {
            if !values.contains(&value) {
                values.push(value);
            }
        } else {
            assertions.push((property, vec![value]));
        }
    }

    fn declare_expression_classes(&mut self, expression: &ClassExpression) {
        for class in expression.named_classes() {
            self.declare_class(class);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(iri: &str) -> OwlClass {
        OwlClass::new(NamedNode::new(iri).unwrap())
    }

    #[test]
    fn axioms_declare_their_named_entities() {
        let mut ontology = Ontology::new(None);
        let animal = class("http://example.com/zoo#Animal");
        let dog = class("http://example.com/zoo#Dog");
        ontology.add_subclass_of(
            ClassExpression::Class(dog.clone()),
            ClassExpression::Class(animal.clone()),
        );
        assert!(ontology.contains_class(&animal));
        assert!(ontology.contains_class(&dog));
        assert_eq!(ontology.classes().count(), 2);
    }

    #[test]
    fn union_domains_declare_their_disjuncts() {
        let mut ontology = Ontology::new(None);
        let property = ObjectProperty::new(NamedNode::new("http://example.com/zoo#eats").unwrap());
        let cat = class("http://example.com/zoo#Cat");
        let dog = class("http://example.com/zoo#Dog");
        ontology.add_object_domain(
            property.clone(),
            ClassExpression::UnionOf(vec![
                ClassExpression::Class(cat.clone()),
                ClassExpression::Class(dog.clone()),
            ]),
        );
        assert!(ontology.contains_class(&cat));
        assert!(ontology.contains_class(&dog));
        assert!(ontology.contains_object_property(&property));
        assert_eq!(ontology.object_domains_of(&property).len(), 1);
    }

    #[test]
    fn asserted_types_are_deduplicated() {
        let mut ontology = Ontology::new(None);
        let dog = class("http://example.com/zoo#Dog");
        let rex = Individual::Named(NamedNode::new("http://example.com/zoo#rex").unwrap());
        ontology.assert_type(rex.clone(), ClassExpression::Class(dog.clone()));
        ontology.assert_type(rex.clone(), ClassExpression::Class(dog));
        assert_eq!(ontology.types_of(&rex).len(), 1);
        assert!(ontology.contains_individual(&rex));
    }

    #[test]
    fn object_assertions_group_by_property() {
        let mut ontology = Ontology::new(None);
        let owns = ObjectProperty::new(NamedNode::new("http://example.com/zoo#owns").unwrap());
        let alice = Individual::Named(NamedNode::new("http://example.com/zoo#alice").unwrap());
        let rex = Individual::Named(NamedNode::new("http://example.com/zoo#rex").unwrap());
        let tom = Individual::Named(NamedNode::new("http://example.com/zoo#tom").unwrap());
        ontology.assert_object_value(
            alice.clone(),
            PropertyExpression::Named(owns.clone()),
            rex.clone(),
        );
        ontology.assert_object_value(
            alice.clone(),
            PropertyExpression::Named(owns.clone()),
            tom.clone(),
        );
        ontology.assert_object_value(alice.clone(), PropertyExpression::Named(owns), rex);
        let assertions = ontology.object_assertions_of(&alice);
        assert_eq!(assertions.len(), 1);
        assert_eq!(assertions[0].1.len(), 2);
    }

    #[test]
    fn missing_entries_read_as_empty() {
        let ontology = Ontology::new(None);
        let property = ObjectProperty::new(NamedNode::new("http://example.com/zoo#eats").unwrap());
        assert!(ontology.object_domains_of(&property).is_empty());
        assert!(ontology.inverses_of(&property).is_empty());
        assert_eq!(
            ontology.object_property_characteristics(&property),
            ObjectPropertyCharacteristics::default()
        );
    }
}
