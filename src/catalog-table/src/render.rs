//! Rendering record sequences into table lines.

use crate::error::{TableError, TableResult};
use crate::record::Record;
use crate::table::Table;
use crate::value::Value;

/// A named accessor for one field of a record kind.
pub struct Field<R> {
    name: &'static str,
    get: fn(&R) -> Value,
}

impl<R> Field<R> {
    pub const fn new(name: &'static str, get: fn(&R) -> Value) -> Self {
        Self { name, get }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn value(&self, record: &R) -> Value {
        (self.get)(record)
    }
}

impl<R> Clone for Field<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for Field<R> {}

impl<R> std::fmt::Debug for Field<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field").field("name", &self.name).finish()
    }
}

/// A record kind with a fixed, ordered list of fields.
///
/// The field list is the table's column order. Because it is fixed per type,
/// every slice of `R` is uniform in shape.
pub trait TableRow: Sized {
    fn fields() -> Vec<Field<Self>>;
}

/// Lay out a typed record sequence as a [`Table`].
pub fn layout<R: TableRow>(records: &[R]) -> Table {
    let fields = R::fields();
    let headers = fields.iter().map(|f| f.name().to_string()).collect();
    let rows = records
        .iter()
        .map(|record| fields.iter().map(|f| f.value(record).to_string()).collect())
        .collect();

    // One cell per field by construction, so no count check.
    Table::measure(headers, rows)
}

/// Render a typed record sequence into table lines.
///
/// Empty input yields no lines; otherwise header, separator and one line per
/// record.
pub fn render<R: TableRow>(records: &[R]) -> Vec<String> {
    layout(records).lines()
}

/// Render dynamically shaped records into table lines.
///
/// The first record defines the columns. Any later record whose field names or
/// order differ is rejected with [`TableError::ShapeMismatch`] and nothing is
/// rendered.
pub fn render_records(records: &[Record]) -> TableResult<Vec<String>> {
    let Some(first) = records.first() else {
        return Ok(Vec::new());
    };

    let headers: Vec<String> = first.field_names().map(str::to_string).collect();
    let mut rows = Vec::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        if !first.same_shape(record) {
            return Err(TableError::ShapeMismatch {
                row: index,
                expected: headers.clone(),
                found: record.field_names().map(str::to_string).collect(),
            });
        }
        rows.push(record.values().map(Value::to_string).collect());
    }

    Ok(Table::build(headers, rows)?.lines())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    struct Item {
        id: i32,
        name: &'static str,
        price: f64,
        note: Option<String>,
    }

    impl TableRow for Item {
        fn fields() -> Vec<Field<Self>> {
            vec![
                Field::new("Id", |i: &Self| i.id.into()),
                Field::new("Name", |i: &Self| i.name.into()),
                Field::new("Price", |i: &Self| i.price.into()),
            ]
        }
    }

    struct Note(Option<String>);

    impl TableRow for Note {
        fn fields() -> Vec<Field<Self>> {
            vec![Field::new("Note", |n: &Self| n.0.clone().into())]
        }
    }

    fn items() -> Vec<Item> {
        vec![
            Item {
                id: 1,
                name: "A",
                price: 9.99,
                note: None,
            },
            Item {
                id: 2,
                name: "Bob",
                price: 19.5,
                note: Some("unused".into()),
            },
        ]
    }

    #[test]
    fn test_render_typed_records() {
        assert_eq!(
            render(&items()).join("\n"),
            "| Id | Name | Price |\n\
             |----|------|-------|\n\
             | 1  | A    | 9.99  |\n\
             | 2  | Bob  | 19.5  |"
        );
    }

    #[test]
    fn test_render_empty_typed() {
        let none: Vec<Item> = Vec::new();
        assert!(render(&none).is_empty());
    }

    #[test]
    fn test_fields_not_listed_are_not_rendered() {
        let lines = render(&items());
        assert!(items()[1].note.is_some());
        assert_eq!(crate::parse_header(&lines[0]), vec!["Id", "Name", "Price"]);
    }

    #[test]
    fn test_null_renders_empty_cell() {
        let lines = render(&[Note(None), Note(Some("ok".into()))]);
        assert_eq!(lines[2], "|      |");
        assert_eq!(lines[3], "| ok   |");
    }

    #[test]
    fn test_render_records_matches_typed() {
        let records = vec![
            Record::new().with("Id", 1).with("Name", "A").with("Price", 9.99),
            Record::new().with("Id", 2).with("Name", "Bob").with("Price", 19.5),
        ];
        assert_eq!(render_records(&records).unwrap(), render(&items()));
    }

    #[test]
    fn test_render_records_empty() {
        assert_eq!(render_records(&[]).unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_render_records_shape_mismatch() {
        let records = vec![
            Record::new().with("Id", 1).with("Name", "A"),
            Record::new().with("Id", 2).with("Name", "B"),
            Record::new().with("Id", 3).with("Title", "C"),
        ];
        let err = render_records(&records).unwrap_err();
        assert_eq!(
            err,
            TableError::ShapeMismatch {
                row: 2,
                expected: vec!["Id".into(), "Name".into()],
                found: vec!["Id".into(), "Title".into()],
            }
        );
    }

    #[test]
    fn test_render_records_extra_field_is_mismatch() {
        let records = vec![
            Record::new().with("Id", 1),
            Record::new().with("Id", 2).with("Extra", true),
        ];
        assert!(matches!(
            render_records(&records),
            Err(TableError::ShapeMismatch { row: 1, .. })
        ));
    }
}
