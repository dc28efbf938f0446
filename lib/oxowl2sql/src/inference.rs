//! Effective domain and range computation.
//!
//! The effective domain of a property is the union, over the property and all
//! its superproperties, of the descendant closure of every named class in
//! every declared domain expression. A property with no usable declared
//! domain accepts every class of the signature. Ranges of object properties
//! follow the same rule over declared range expressions; the two computations
//! never share state.

use crate::entity::{DataProperty, ObjectProperty, OwlClass};
use crate::expression::ClassExpression;
use crate::hierarchy;
use crate::ontology::Ontology;
use rustc_hash::{FxHashMap, FxHashSet};

/// Effective domains and ranges of every object property, keyed by property.
#[derive(Debug, Default)]
pub struct ObjectPropertyClosures {
    pub domains: FxHashMap<ObjectProperty, FxHashSet<OwlClass>>,
    pub ranges: FxHashMap<ObjectProperty, FxHashSet<OwlClass>>,
}

/// Effective domains of every data property, keyed by property.
#[derive(Debug, Default)]
pub struct DataPropertyClosures {
    pub domains: FxHashMap<DataProperty, FxHashSet<OwlClass>>,
}

/// The classes whose instances may be subjects of `property`, given its
/// superproperty closure `ancestors`.
pub fn effective_object_domain(
    ontology: &Ontology,
    ancestors: &FxHashSet<ObjectProperty>,
) -> FxHashSet<OwlClass> {
    effective_classes(ontology, ancestors, Ontology::object_domains_of)
}

/// The classes whose instances may be objects of `property`, given its
/// superproperty closure `ancestors`.
pub fn effective_object_range(
    ontology: &Ontology,
    ancestors: &FxHashSet<ObjectProperty>,
) -> FxHashSet<OwlClass> {
    effective_classes(ontology, ancestors, Ontology::object_ranges_of)
}

/// The classes whose instances may carry values of `property`, given its
/// superproperty closure `ancestors`.
pub fn effective_data_domain(
    ontology: &Ontology,
    ancestors: &FxHashSet<DataProperty>,
) -> FxHashSet<OwlClass> {
    effective_classes(ontology, ancestors, Ontology::data_domains_of)
}

fn effective_classes<P>(
    ontology: &Ontology,
    ancestors: &FxHashSet<P>,
    declared: impl for<'a> Fn(&'a Ontology, &P) -> &'a [ClassExpression],
) -> FxHashSet<OwlClass> {
    let mut classes = FxHashSet::default();
    for property in ancestors {
        for expression in declared(ontology, property) {
            for class in expression.named_classes() {
                classes.extend(hierarchy::descendants_of(ontology, &class));
            }
        }
    }
    if classes.is_empty() {
        classes.extend(ontology.classes().cloned());
    }
    classes
}
