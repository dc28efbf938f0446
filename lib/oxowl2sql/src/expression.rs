//! Class and property expressions as they occur on the right-hand side of
//! subsumption, domain, range and inverse axioms.

use crate::entity::{DataProperty, ObjectProperty, OwlClass};
use oxrdf::BlankNode;

/// A class expression attached to an axiom.
///
/// Only named classes and `owl:unionOf` disjunctions of them can be projected
/// into the relational schema. Every other anonymous construct (restrictions,
/// intersections, complements...) is carried opaquely as
/// [`ClassExpression::Anonymous`] so that consumers decide explicitly how to
/// handle it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClassExpression {
    /// A named class.
    Class(OwlClass),
    /// An `owl:unionOf` disjunction.
    UnionOf(Vec<ClassExpression>),
    /// Any other anonymous class expression, identified by its blank node.
    Anonymous(BlankNode),
}

impl ClassExpression {
    #[inline]
    pub fn is_named(&self) -> bool {
        matches!(self, Self::Class(_))
    }

    #[inline]
    pub fn as_class(&self) -> Option<&OwlClass> {
        match self {
            Self::Class(class) => Some(class),
            _ => None,
        }
    }

    /// All named classes reachable through disjunctions.
    ///
    /// A named class expands to itself, a disjunction to the named classes of
    /// its disjuncts, and any other anonymous expression to nothing.
    pub fn named_classes(&self) -> Vec<OwlClass> {
        let mut classes = Vec::new();
        self.collect_named_classes(&mut classes);
        classes
    }

    fn collect_named_classes(&self, classes: &mut Vec<OwlClass>) {
        match self {
            Self::Class(class) => classes.push(class.clone()),
            Self::UnionOf(disjuncts) => {
                for disjunct in disjuncts {
                    disjunct.collect_named_classes(classes);
                }
            }
            Self::Anonymous(_) => (),
        }
    }
}

impl From<OwlClass> for ClassExpression {
    #[inline]
    fn from(class: OwlClass) -> Self {
        Self::Class(class)
    }
}

/// A possibly anonymous property expression.
///
/// The relational schema only represents named properties. Anonymous
/// expressions (like `owl:inverseOf` property expressions) surface as
/// validation errors wherever a name would be required.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyExpression<P> {
    Named(P),
    Anonymous(BlankNode),
}

impl<P> PropertyExpression<P> {
    #[inline]
    pub fn as_named(&self) -> Option<&P> {
        match self {
            Self::Named(property) => Some(property),
            Self::Anonymous(_) => None,
        }
    }
}

pub type ObjectPropertyExpression = PropertyExpression<ObjectProperty>;
pub type DataPropertyExpression = PropertyExpression<DataProperty>;

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::NamedNode;

    fn class(iri: &str) -> OwlClass {
        OwlClass::new(NamedNode::new(iri).unwrap())
    }

    #[test]
    fn named_class_expands_to_itself() {
        let cat = class("http://example.com/zoo#Cat");
        assert_eq!(
            ClassExpression::Class(cat.clone()).named_classes(),
            vec![cat]
        );
    }

    #[test]
    fn nested_unions_expand_to_their_named_disjuncts() {
        let cat = class("http://example.com/zoo#Cat");
        let dog = class("http://example.com/zoo#Dog");
        let expression = ClassExpression::UnionOf(vec![
            ClassExpression::Class(cat.clone()),
            ClassExpression::UnionOf(vec![
                ClassExpression::Class(dog.clone()),
                ClassExpression::Anonymous(BlankNode::default()),
            ]),
        ]);
        assert_eq!(expression.named_classes(), vec![cat, dog]);
    }

    #[test]
    fn anonymous_expression_expands_to_nothing() {
        assert!(
            ClassExpression::Anonymous(BlankNode::default())
                .named_classes()
                .is_empty()
        );
    }
}
