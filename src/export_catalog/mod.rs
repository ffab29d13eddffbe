//! # Export Catalog
//!
//! Declarative mapping from the scheduling graph onto flat relational tables.
//!
//! Every exported file is described once as an [`EntityExport`]: the graph
//! pattern it is read from, and an ordered list of [`ColumnSpec`]s naming the
//! element and property each column comes from and the [`Coercion`] applied
//! to it. Graph sources render the pattern into a query (see
//! [`crate::graph_source::cypher`]); the exporter uses the column order for
//! the CSV header and the key columns for deterministic row order.
//!
//! ## Pattern shapes
//!
//! ```text
//! Node:         (n:Label)
//! Relationship: (a:FromLabel)-[r:TYPE]->(b:ToLabel)
//! ```
//!
//! Relationship columns pick their value from the start node, the edge itself
//! or the end node, which is how direction inversions (prerequisites) and
//! edge-property flattening (OFFERS onto sections) are expressed.

pub mod coercion;

pub use coercion::{Cell, Coercion};

/// Which part of a matched pattern a column is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    /// The single node of a node pattern.
    Node,
    /// Start node of a relationship pattern.
    Start,
    /// The relationship itself.
    Edge,
    /// End node of a relationship pattern.
    End,
}

impl Element {
    /// Query variable bound to this element.
    pub fn variable(self) -> &'static str {
        match self {
            Element::Node => "n",
            Element::Start => "a",
            Element::Edge => "r",
            Element::End => "b",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    Node {
        label: &'static str,
    },
    Relationship {
        from_label: &'static str,
        rel_type: &'static str,
        to_label: &'static str,
    },
}

impl Pattern {
    fn allows(&self, element: Element) -> bool {
        match self {
            Pattern::Node { .. } => element == Element::Node,
            Pattern::Relationship { .. } => element != Element::Node,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Header name and SQL column name
    pub name: &'static str,
    pub element: Element,
    /// Graph property read for this column
    pub property: &'static str,
    pub coercion: Coercion,
}

/// One exported table: source pattern, ordered columns and natural key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityExport {
    /// Relational table name, also the CSV file stem
    pub table: &'static str,
    pub pattern: Pattern,
    pub columns: Vec<ColumnSpec>,
    /// Columns forming the natural (primary) key, in sort priority order
    pub key: Vec<&'static str>,
}

impl EntityExport {
    pub fn file_name(&self) -> String {
        format!("{}.csv", self.table)
    }

    pub fn header(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }

    /// Positions of the key columns inside `columns`.
    pub fn key_indices(&self) -> Vec<usize> {
        self.key
            .iter()
            .filter_map(|k| self.columns.iter().position(|c| c.name == *k))
            .collect()
    }

    /// Structural sanity: unique column names, key columns present, and every
    /// column reading from an element the pattern actually binds.
    pub fn check(&self) -> Result<(), String> {
        for (i, column) in self.columns.iter().enumerate() {
            if self.columns[..i].iter().any(|c| c.name == column.name) {
                return Err(format!("duplicate column `{}`", column.name));
            }
            if !self.pattern.allows(column.element) {
                return Err(format!(
                    "column `{}` reads {:?}, which the pattern does not bind",
                    column.name, column.element
                ));
            }
        }
        if self.key.is_empty() {
            return Err("no key columns".to_string());
        }
        for key in &self.key {
            if !self.columns.iter().any(|c| c.name == *key) {
                return Err(format!("key column `{}` is not exported", key));
            }
        }
        Ok(())
    }
}

fn col(
    name: &'static str,
    element: Element,
    property: &'static str,
    coercion: Coercion,
) -> ColumnSpec {
    ColumnSpec {
        name,
        element,
        property,
        coercion,
    }
}

/// Column read from the node of a node pattern under its own name.
fn prop(name: &'static str, coercion: Coercion) -> ColumnSpec {
    col(name, Element::Node, name, coercion)
}

fn node(table: &'static str, label: &'static str, columns: Vec<ColumnSpec>) -> EntityExport {
    EntityExport {
        table,
        pattern: Pattern::Node { label },
        columns,
        key: vec!["id"],
    }
}

fn relationship(
    table: &'static str,
    (from_label, rel_type, to_label): (&'static str, &'static str, &'static str),
    columns: Vec<ColumnSpec>,
    key: Vec<&'static str>,
) -> EntityExport {
    EntityExport {
        table,
        pattern: Pattern::Relationship {
            from_label,
            rel_type,
            to_label,
        },
        columns,
        key,
    }
}

/// Node tables, in export order.
pub fn node_exports() -> Vec<EntityExport> {
    use Coercion::*;

    vec![
        node("college", "College", vec![prop("id", Text), prop("name", Text)]),
        node("term", "Term", vec![prop("id", Integer)]),
        node("day", "Day", vec![prop("id", Text)]),
        node(
            "subject",
            "Subject",
            vec![prop("id", Text), prop("name", Text), prop("college_id", Text)],
        ),
        node(
            "instructor",
            "Instructor",
            vec![
                prop("id", Integer),
                prop("name", Text),
                prop("department", Text),
                prop("rmp_legacy_id", Integer),
                prop("rmp_id", Text),
                prop("num_ratings", Integer),
                prop("avg_rating", Float),
                prop("avg_difficulty", Float),
            ],
        ),
        node(
            "course",
            "Course",
            vec![
                prop("id", Text),
                prop("subject_id", Text),
                prop("course_number", Text),
                prop("title", Text),
                prop("credits", Float),
                prop("credit_range", Text),
                prop("description", Text),
                prop("writing_intensive", Flag),
                prop("repeat_status", Text),
                prop("restrictions", Text),
            ],
        ),
        // Sections only exist through OFFERS; scheduling method lives on the edge.
        relationship(
            "section",
            ("Course", "OFFERS", "Section"),
            vec![
                col("crn", Element::End, "crn", Integer),
                col("course_id", Element::End, "course_id", Text),
                col("subject_code", Element::End, "subject_code", Text),
                col("course_number", Element::End, "course_number", Text),
                col("term_id", Element::End, "term", Integer),
                col("section", Element::End, "section", Text),
                col("max_enroll", Element::End, "max_enroll", Integer),
                col("start_time", Element::End, "start_time", TimeOfDay),
                col("end_time", Element::End, "end_time", TimeOfDay),
                col("instruction_method", Element::Edge, "instruction_method", Text),
                col("instruction_type", Element::Edge, "instruction_type", Text),
            ],
            vec!["crn"],
        ),
    ]
}

/// Join tables, in export order.
pub fn relationship_exports() -> Vec<EntityExport> {
    use Coercion::*;

    vec![
        relationship(
            "section_days",
            ("Section", "SCHEDULED_ON", "Day"),
            vec![
                col("section_crn", Element::Start, "crn", Integer),
                col("day_id", Element::End, "id", Text),
            ],
            vec!["section_crn", "day_id"],
        ),
        relationship(
            "instructor_sections",
            ("Instructor", "TEACHES", "Section"),
            vec![
                col("instructor_id", Element::Start, "id", Integer),
                col("section_crn", Element::End, "crn", Integer),
            ],
            vec!["instructor_id", "section_crn"],
        ),
        relationship(
            "instructor_courses",
            ("Instructor", "TAUGHT", "Course"),
            vec![
                col("instructor_id", Element::Start, "id", Integer),
                col("course_id", Element::End, "id", Text),
            ],
            vec!["instructor_id", "course_id"],
        ),
        // Stored as (prerequisite)-[:PREREQUISITE]->(course): the end node is
        // the course being taken, the start node what must be completed first.
        relationship(
            "course_prerequisites",
            ("Course", "PREREQUISITE", "Course"),
            vec![
                col("course_id", Element::End, "id", Text),
                col("prerequisite_course_id", Element::Start, "id", Text),
                col("relationship_type", Element::Edge, "relationship_type", Text),
                col("group_id", Element::Edge, "group_id", Text),
                col("can_take_concurrent", Element::Edge, "can_take_concurrent", Flag),
                col("minimum_grade", Element::Edge, "minimum_grade", Text),
            ],
            vec!["course_id", "prerequisite_course_id"],
        ),
        // (a)-[:COREQUISITE]->(b): a requires b concurrently. Exported in the
        // stored direction, unlike prerequisites.
        relationship(
            "course_corequisites",
            ("Course", "COREQUISITE", "Course"),
            vec![
                col("course_id", Element::Start, "id", Text),
                col("corequisite_course_id", Element::End, "id", Text),
            ],
            vec!["course_id", "corequisite_course_id"],
        ),
    ]
}

/// Every exported table: nodes first, then relationships.
pub fn catalog() -> Vec<EntityExport> {
    let mut all = node_exports();
    all.extend(relationship_exports());
    all
}
