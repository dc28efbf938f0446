//! Reflexive transitive closures over the declared class and property
//! hierarchies.
//!
//! Traversal only follows named expressions: anonymous subsumption endpoints
//! are not expanded here. Every walk carries its result set as the visited
//! set, so cyclic subsumption terminates.

use crate::entity::{DataProperty, ObjectProperty, OwlClass};
use crate::expression::PropertyExpression;
use crate::ontology::Ontology;
use rustc_hash::FxHashSet;
use std::hash::Hash;

/// The named subclasses of `class`, including `class` itself.
pub fn descendants_of(ontology: &Ontology, class: &OwlClass) -> FxHashSet<OwlClass> {
    let mut descendants = FxHashSet::default();
    collect_descendants(ontology, class, &mut descendants);
    descendants
}

fn collect_descendants(ontology: &Ontology, class: &OwlClass, descendants: &mut FxHashSet<OwlClass>) {
    if !descendants.insert(class.clone()) {
        return;
    }
    for expression in ontology.subclass_expressions_of(class) {
        if let Some(sub) = expression.as_class() {
            collect_descendants(ontology, sub, descendants);
        }
    }
}

/// The named superclasses of `class`, including `class` itself.
pub fn ancestors_of(ontology: &Ontology, class: &OwlClass) -> FxHashSet<OwlClass> {
    let mut ancestors = FxHashSet::default();
    collect_ancestors(ontology, class, &mut ancestors);
    ancestors
}

fn collect_ancestors(ontology: &Ontology, class: &OwlClass, ancestors: &mut FxHashSet<OwlClass>) {
    if !ancestors.insert(class.clone()) {
        return;
    }
    for expression in ontology.superclass_expressions_of(class) {
        if let Some(sup) = expression.as_class() {
            collect_ancestors(ontology, sup, ancestors);
        }
    }
}

/// A property kind with a declared super-property hierarchy.
pub trait HierarchicalProperty: Clone + Eq + Hash + Sized {
    fn super_expressions<'a>(&self, ontology: &'a Ontology) -> &'a [PropertyExpression<Self>];
}

impl HierarchicalProperty for ObjectProperty {
    fn super_expressions<'a>(&self, ontology: &'a Ontology) -> &'a [PropertyExpression<Self>] {
        ontology.super_object_property_expressions_of(self)
    }
}

impl HierarchicalProperty for DataProperty {
    fn super_expressions<'a>(&self, ontology: &'a Ontology) -> &'a [PropertyExpression<Self>] {
        ontology.super_data_property_expressions_of(self)
    }
}

/// The named superproperties of `property`, including `property` itself.
///
/// Anonymous super-property expressions are skipped; the one-level declared
/// expressions are the caller's to inspect for them.
pub fn property_ancestors<P: HierarchicalProperty>(
    ontology: &Ontology,
    property: &P,
) -> FxHashSet<P> {
    let mut ancestors = FxHashSet::default();
    collect_property_ancestors(ontology, property, &mut ancestors);
    ancestors
}

fn collect_property_ancestors<P: HierarchicalProperty>(
    ontology: &Ontology,
    property: &P,
    ancestors: &mut FxHashSet<P>,
) {
    if !ancestors.insert(property.clone()) {
        return;
    }
    for expression in property.super_expressions(ontology) {
        if let PropertyExpression::Named(sup) = expression {
            collect_property_ancestors(ontology, sup, ancestors);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::ClassExpression;
    use oxrdf::NamedNode;

    fn class(name: &str) -> OwlClass {
        OwlClass::new(NamedNode::new(format!("http://example.com/zoo#{name}")).unwrap())
    }

    fn property(name: &str) -> ObjectProperty {
        ObjectProperty::new(NamedNode::new(format!("http://example.com/zoo#{name}")).unwrap())
    }

    fn subclass(ontology: &mut Ontology, sub: &OwlClass, sup: &OwlClass) {
        ontology.add_subclass_of(
            ClassExpression::Class(sub.clone()),
            ClassExpression::Class(sup.clone()),
        );
    }

    #[test]
    fn closures_are_reflexive_and_transitive() {
        let mut ontology = Ontology::new(None);
        let animal = class("Animal");
        let dog = class("Dog");
        let poodle = class("Poodle");
        subclass(&mut ontology, &dog, &animal);
        subclass(&mut ontology, &poodle, &dog);

        let ancestors = ancestors_of(&ontology, &poodle);
        assert_eq!(
            ancestors,
            [poodle.clone(), dog.clone(), animal.clone()]
                .into_iter()
                .collect()
        );
        let descendants = descendants_of(&ontology, &animal);
        assert_eq!(descendants, [animal, dog, poodle].into_iter().collect());
    }

    #[test]
    fn cyclic_subsumption_terminates() {
        let mut ontology = Ontology::new(None);
        let a = class("A");
        let b = class("B");
        subclass(&mut ontology, &a, &b);
        subclass(&mut ontology, &b, &a);

        let expected: FxHashSet<_> = [a.clone(), b.clone()].into_iter().collect();
        assert_eq!(ancestors_of(&ontology, &a), expected);
        assert_eq!(descendants_of(&ontology, &b), expected);
    }

    #[test]
    fn anonymous_superclasses_are_not_expanded() {
        let mut ontology = Ontology::new(None);
        let dog = class("Dog");
        let cat = class("Cat");
        let animal = class("Animal");
        ontology.add_subclass_of(
            ClassExpression::Class(dog.clone()),
            ClassExpression::UnionOf(vec![
                ClassExpression::Class(cat),
                ClassExpression::Class(animal),
            ]),
        );
        assert_eq!(
            ancestors_of(&ontology, &dog),
            [dog].into_iter().collect()
        );
    }

    #[test]
    fn property_closure_follows_named_supers() {
        let mut ontology = Ontology::new(None);
        let has_pet = property("hasPet");
        let has_animal = property("hasAnimal");
        let related_to = property("relatedTo");
        ontology.add_super_object_property(
            has_pet.clone(),
            PropertyExpression::Named(has_animal.clone()),
        );
        ontology.add_super_object_property(
            has_animal.clone(),
            PropertyExpression::Named(related_to.clone()),
        );
        assert_eq!(
            property_ancestors(&ontology, &has_pet),
            [has_pet, has_animal, related_to].into_iter().collect()
        );
    }

    #[test]
    fn cyclic_property_hierarchy_terminates() {
        let mut ontology = Ontology::new(None);
        let p = property("p");
        let q = property("q");
        ontology.add_super_object_property(p.clone(), PropertyExpression::Named(q.clone()));
        ontology.add_super_object_property(q.clone(), PropertyExpression::Named(p.clone()));
        assert_eq!(
            property_ancestors(&ontology, &p),
            [p, q].into_iter().collect()
        );
    }
}
