//! Validation of individuals against the relational data model.

use crate::entity::{Individual, OwlClass};
use crate::ontology::Ontology;
use oxrdf::NamedNode;

/// Why an individual cannot be represented in the `Individual` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndividualIssue {
    /// The individual is a blank node.
    Anonymous,
    /// The individual has no asserted type.
    Untyped,
    /// The individual has more than one asserted type.
    MultiplyTyped,
    /// The sole asserted type is an anonymous class expression.
    AnonymousType,
}

/// Resolves an individual to its name and its single named class.
///
/// The `Individual` table key is `(name, class)`, so only named individuals
/// with exactly one named type can be represented.
pub fn individual_class<'a>(
    ontology: &'a Ontology,
    individual: &'a Individual,
) -> Result<(&'a NamedNode, OwlClass), IndividualIssue> {
    let Individual::Named(name) = individual else {
        return Err(IndividualIssue::Anonymous);
    };
    match ontology.types_of(individual) {
        [] => Err(IndividualIssue::Untyped),
        [r#type] => match r#type.as_class() {
            Some(class) => Ok((name, class.clone())),
            None => Err(IndividualIssue::AnonymousType),
        },
        _ => Err(IndividualIssue::MultiplyTyped),
    }
}
