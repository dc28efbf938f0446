//! SQL schema layout and statement generation.
//!
//! The 13 tables are emitted in foreign key dependency order so the schema
//! can be created statement by statement on an empty database. Identifier
//! columns all share one configurable wide text datatype.

/// Datatype of every identifier column. `BINARY` keeps MySQL comparisons
/// case-sensitive, so `Dog` and `dog` stay distinct keys.
pub const DEFAULT_IDENTIFIER_DATATYPE: &str = "VARCHAR(333) BINARY";

/// The `CREATE TABLE` statements of the full schema, in an order that
/// satisfies every foreign key.
pub fn create_table_statements(datatype: &str) -> Vec<String> {
    vec![
        format!(
            "CREATE TABLE Class (\
             name {datatype} NOT NULL, \
             PRIMARY KEY (name))"
        ),
        format!(
            "CREATE TABLE ClassRelationship (\
             subclass {datatype} NOT NULL, \
             superclass {datatype} NOT NULL, \
             PRIMARY KEY (subclass, superclass), \
             FOREIGN KEY (subclass) REFERENCES Class(name) \
             ON DELETE CASCADE ON UPDATE CASCADE, \
             FOREIGN KEY (superclass) REFERENCES Class(name) \
             ON DELETE CASCADE ON UPDATE CASCADE)"
        ),
        format!(
            "CREATE TABLE Individual (\
             name {datatype} NOT NULL, \
             class {datatype} NOT NULL, \
             PRIMARY KEY (name, class), \
             FOREIGN KEY (class) REFERENCES Class(name) \
             ON DELETE CASCADE ON UPDATE CASCADE)"
        ),
        format!(
            "CREATE TABLE ObjectPropertyType (\
             name {datatype} NOT NULL, \
             isFunctional BOOLEAN NOT NULL, \
             isInverseFunctional BOOLEAN NOT NULL, \
             isSymmetric BOOLEAN NOT NULL, \
             isAsymmetric BOOLEAN NOT NULL, \
             isTransitive BOOLEAN NOT NULL, \
             isReflexive BOOLEAN NOT NULL, \
             isIrreflexive BOOLEAN NOT NULL, \
             PRIMARY KEY (name))"
        ),
        format!(
            "CREATE TABLE ObjectPropertyDomain (\
             domainClass {datatype} NOT NULL, \
             property {datatype} NOT NULL, \
             PRIMARY KEY (property, domainClass), \
             FOREIGN KEY (property) REFERENCES ObjectPropertyType(name) \
             ON DELETE CASCADE ON UPDATE CASCADE, \
             FOREIGN KEY (domainClass) REFERENCES Class(name) \
             ON DELETE CASCADE ON UPDATE CASCADE)"
        ),
        format!(
            "CREATE TABLE ObjectPropertyRange (\
             property {datatype} NOT NULL, \
             rangeClass {datatype} NOT NULL, \
             PRIMARY KEY (property, rangeClass), \
             FOREIGN KEY (property) REFERENCES ObjectPropertyType(name) \
             ON DELETE CASCADE ON UPDATE CASCADE, \
             FOREIGN KEY (rangeClass) REFERENCES Class(name) \
             ON DELETE CASCADE ON UPDATE CASCADE)"
        ),
        format!(
            "CREATE TABLE ObjectPropertyInstance (\
             domainClass {datatype} NOT NULL, \
             domainIndividual {datatype} NOT NULL, \
             property {datatype} NOT NULL, \
             rangeClass {datatype} NOT NULL, \
             rangeIndividual {datatype} NOT NULL, \
             PRIMARY KEY (domainIndividual, domainClass, rangeIndividual, rangeClass, property), \
             FOREIGN KEY (domainIndividual, domainClass) REFERENCES Individual(name, class) \
             ON DELETE CASCADE ON UPDATE CASCADE, \
             FOREIGN KEY (rangeIndividual, rangeClass) REFERENCES Individual(name, class) \
             ON DELETE CASCADE ON UPDATE CASCADE, \
             FOREIGN KEY (property, domainClass) \
             REFERENCES ObjectPropertyDomain(property, domainClass) \
             ON DELETE CASCADE ON UPDATE CASCADE, \
             FOREIGN KEY (property, rangeClass) \
             REFERENCES ObjectPropertyRange(property, rangeClass) \
             ON DELETE CASCADE ON UPDATE CASCADE)"
        ),
        format!(
            "CREATE TABLE ObjectPropertyRelationship (\
             subproperty {datatype} NOT NULL, \
             superproperty {datatype} NOT NULL, \
             isInferred BOOLEAN DEFAULT false, \
             PRIMARY KEY (subproperty, superproperty), \
             FOREIGN KEY (subproperty) REFERENCES ObjectPropertyType(name) \
             ON DELETE CASCADE ON UPDATE CASCADE, \
             FOREIGN KEY (superproperty) REFERENCES ObjectPropertyType(name) \
             ON DELETE CASCADE ON UPDATE CASCADE)"
        ),
        format!(
            "CREATE TABLE ObjectPropertyInverse (\
             property {datatype}, \
             inverseProperty {datatype}, \
             PRIMARY KEY (property, inverseProperty), \
             FOREIGN KEY (property) REFERENCES ObjectPropertyType(name) \
             ON DELETE CASCADE ON UPDATE CASCADE, \
             FOREIGN KEY (inverseProperty) REFERENCES ObjectPropertyType(name) \
             ON DELETE CASCADE ON UPDATE CASCADE)"
        ),
        format!(
            "CREATE TABLE DataPropertyType (\
             name {datatype} NOT NULL, \
             isFunctional BOOLEAN NOT NULL, \
             PRIMARY KEY (name))"
        ),
        format!(
            "CREATE TABLE DataPropertyDomain (\
             domainClass {datatype} NOT NULL, \
             property {datatype} NOT NULL, \
             PRIMARY KEY (property, domainClass), \
             FOREIGN KEY (property) REFERENCES DataPropertyType(name) \
             ON DELETE CASCADE ON UPDATE CASCADE, \
             FOREIGN KEY (domainClass) REFERENCES Class(name) \
             ON DELETE CASCADE ON UPDATE CASCADE)"
        ),
        format!(
            "CREATE TABLE DataPropertyRelationship (\
             subproperty {datatype} NOT NULL, \
             superproperty {datatype} NOT NULL, \
             isInferred BOOLEAN DEFAULT false, \
             PRIMARY KEY (subproperty, superproperty), \
             FOREIGN KEY (subproperty) REFERENCES DataPropertyType(name) \
             ON DELETE CASCADE ON UPDATE CASCADE, \
             FOREIGN KEY (superproperty) REFERENCES DataPropertyType(name) \
             ON DELETE CASCADE ON UPDATE CASCADE)"
        ),
        format!(
            "CREATE TABLE DataPropertyInstance (\
             id BIGINT NOT NULL AUTO_INCREMENT, \
             domainClass {datatype} NOT NULL, \
             domainIndividual {datatype} NOT NULL, \
             property {datatype} NOT NULL, \
             value TEXT NOT NULL, \
             PRIMARY KEY (id), \
             FOREIGN KEY (domainIndividual, domainClass) REFERENCES Individual(name, class) \
             ON DELETE CASCADE ON UPDATE CASCADE, \
             FOREIGN KEY (property, domainClass) \
             REFERENCES DataPropertyDomain(property, domainClass) \
             ON DELETE CASCADE ON UPDATE CASCADE)"
        ),
    ]
}

/// A value of an insert statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    Bool(bool),
}

/// An insert row under construction. Fields keep their insertion order, so a
/// given row always renders to the same statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    table: &'static str,
    fields: Vec<(&'static str, Value)>,
}

impl Row {
    pub fn new(table: &'static str) -> Self {
        Self {
            table,
            fields: Vec::new(),
        }
    }

    pub fn text(mut self, field: &'static str, value: impl Into<String>) -> Self {
        self.fields.push((field, Value::Text(value.into())));
        self
    }

    pub fn bool(mut self, field: &'static str, value: bool) -> Self {
        self.fields.push((field, Value::Bool(value)));
        self
    }

    /// Renders the row as an `INSERT` statement. Booleans are unquoted
    /// literals; text values are single-quoted and escaped.
    pub fn insert_statement(&self) -> String {
        let mut fields = String::new();
        let mut values = String::new();
        for (i, (field, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                fields.push_str(", ");
                values.push_str(", ");
            }
            fields.push_str(field);
            match value {
                Value::Bool(b) => values.push_str(if *b { "true" } else { "false" }),
                Value::Text(text) => {
                    values.push('\'');
                    values.push_str(&escape_text(text));
                    values.push('\'');
                }
            }
        }
        format!("INSERT INTO {} ({fields}) VALUES ({values})", self.table)
    }
}

/// Backslash-escapes single quotes and backslashes so the value can sit
/// inside a single-quoted MySQL string literal. No other transformation.
pub fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if c == '\'' || c == '\\' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thirteen_tables_in_dependency_order() {
        let statements = create_table_statements(DEFAULT_IDENTIFIER_DATATYPE);
        assert_eq!(statements.len(), 13);

        let position = |table: &str| {
            statements
                .iter()
                .position(|statement| {
                    statement.starts_with(&format!("CREATE TABLE {table} ("))
                })
                .unwrap_or_else(|| panic!("no table {table}"))
        };
        assert!(position("Class") < position("ClassRelationship"));
        assert!(position("Class") < position("Individual"));
        assert!(position("ObjectPropertyType") < position("ObjectPropertyDomain"));
        assert!(position("ObjectPropertyDomain") < position("ObjectPropertyInstance"));
        assert!(position("ObjectPropertyRange") < position("ObjectPropertyInstance"));
        assert!(position("Individual") < position("ObjectPropertyInstance"));
        assert!(position("DataPropertyType") < position("DataPropertyDomain"));
        assert!(position("DataPropertyDomain") < position("DataPropertyInstance"));
    }

    #[test]
    fn every_table_cascades_on_delete_and_update() {
        for statement in create_table_statements(DEFAULT_IDENTIFIER_DATATYPE) {
            if statement.contains("FOREIGN KEY") {
                assert!(statement.contains("ON DELETE CASCADE ON UPDATE CASCADE"));
            }
        }
    }

    #[test]
    fn insert_statement_is_deterministic() {
        let row = Row::new("Individual").text("name", "rex").text("class", "Dog");
        assert_eq!(
            row.insert_statement(),
            "INSERT INTO Individual (name, class) VALUES ('rex', 'Dog')"
        );
        assert_eq!(row.insert_statement(), row.clone().insert_statement());
    }

    #[test]
    fn booleans_are_unquoted() {
        let row = Row::new("DataPropertyType")
            .text("name", "age")
            .bool("isFunctional", true);
        assert_eq!(
            row.insert_statement(),
            "INSERT INTO DataPropertyType (name, isFunctional) VALUES ('age', true)"
        );
    }

    #[test]
    fn quotes_and_backslashes_are_escaped() {
        let row = Row::new("Class").text("name", r"O'Brien\'s");
        assert_eq!(
            row.insert_statement(),
            r"INSERT INTO Class (name) VALUES ('O\'Brien\\\'s')"
        );
    }

    #[test]
    fn plain_text_is_untransformed() {
        assert_eq!(escape_text("Ärger 100%"), "Ärger 100%");
    }
}
