use oxrdf::{BlankNode, NamedNode};
use std::fmt;

/// Returns the identifier fragment of an IRI.
///
/// The fragment part if there is one, otherwise the last path segment,
/// otherwise the full IRI.
pub fn local_name(node: &NamedNode) -> &str {
    let iri = node.as_str();
    if let Some((_, fragment)) = iri.rsplit_once('#') {
        fragment
    } else if let Some((_, segment)) = iri.rsplit_once('/') {
        segment
    } else {
        iri
    }
}

/// An [OWL class](https://www.w3.org/TR/owl2-syntax/#Classes).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwlClass(NamedNode);

impl OwlClass {
    #[inline]
    pub fn new(iri: NamedNode) -> Self {
        Self(iri)
    }

    #[inline]
    pub fn iri(&self) -> &NamedNode {
        &self.0
    }

    /// The class identifier used in the relational schema.
    #[inline]
    pub fn local_name(&self) -> &str {
        local_name(&self.0)
    }

    #[inline]
    pub fn into_inner(self) -> NamedNode {
        self.0
    }
}

impl From<NamedNode> for OwlClass {
    #[inline]
    fn from(iri: NamedNode) -> Self {
        Self(iri)
    }
}

impl fmt::Display for OwlClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// An [OWL object property](https://www.w3.org/TR/owl2-syntax/#Object_Properties).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectProperty(NamedNode);

impl ObjectProperty {
    #[inline]
    pub fn new(iri: NamedNode) -> Self {
        Self(iri)
    }

    #[inline]
    pub fn iri(&self) -> &NamedNode {
        &self.0
    }

    #[inline]
    pub fn local_name(&self) -> &str {
        local_name(&self.0)
    }

    #[inline]
    pub fn into_inner(self) -> NamedNode {
        self.0
    }
}

impl From<NamedNode> for ObjectProperty {
    #[inline]
    fn from(iri: NamedNode) -> Self {
        Self(iri)
    }
}

impl fmt::Display for ObjectProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// An [OWL data property](https://www.w3.org/TR/owl2-syntax/#Data_Properties).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataProperty(NamedNode);

impl DataProperty {
    #[inline]
    pub fn new(iri: NamedNode) -> Self {
        Self(iri)
    }

    #[inline]
    pub fn iri(&self) -> &NamedNode {
        &self.0
    }

    #[inline]
    pub fn local_name(&self) -> &str {
        local_name(&self.0)
    }

    #[inline]
    pub fn into_inner(self) -> NamedNode {
        self.0
    }
}

impl From<NamedNode> for DataProperty {
    #[inline]
    fn from(iri: NamedNode) -> Self {
        Self(iri)
    }
}

impl fmt::Display for DataProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// An [OWL individual](https://www.w3.org/TR/owl2-syntax/#Individuals),
/// either named by an IRI or anonymous.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Individual {
    Named(NamedNode),
    Anonymous(BlankNode),
}

impl Individual {
    #[inline]
    pub fn is_named(&self) -> bool {
        matches!(self, Self::Named(_))
    }

    #[inline]
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous(_))
    }

    /// The IRI of the individual if it is named.
    #[inline]
    pub fn iri(&self) -> Option<&NamedNode> {
        match self {
            Self::Named(iri) => Some(iri),
            Self::Anonymous(_) => None,
        }
    }
}

impl From<NamedNode> for Individual {
    #[inline]
    fn from(iri: NamedNode) -> Self {
        Self::Named(iri)
    }
}

impl From<BlankNode> for Individual {
    #[inline]
    fn from(node: BlankNode) -> Self {
        Self::Anonymous(node)
    }
}

impl fmt::Display for Individual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(iri) => iri.fmt(f),
            Self::Anonymous(node) => node.fmt(f),
        }
    }
}
