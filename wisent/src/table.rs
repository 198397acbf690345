//! Column access for `Table` expressions
//!
//! A table is `(Table (Column 'name values) ...)`: every column is an
//! expression whose first child is the column name as a symbol and whose
//! second child holds the values.

use wisent_core::{Atom, Element, Expression};

use crate::Result;

/// Head of table expressions
pub const TABLE_HEAD: &str = "Table";

/// One column of a table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column<'a> {
    pub name: &'a str,
    pub values: Element<'a>,
}

/// Decode one column expression; `None` if it does not have the column shape
pub fn column_of<'a>(column: &Expression<'a>) -> Result<Option<Column<'a>>> {
    let mut children = column.flat_children()?;
    let (Some(name), Some(values)) = (children.next(), children.next()) else {
        return Ok(None);
    };
    match name.resolve()? {
        Atom::Symbol(name) | Atom::Text(name) => Ok(Some(Column { name, values })),
        _ => Ok(None),
    }
}

/// All well-formed columns of `table`, in order
pub fn columns<'a>(table: &Expression<'a>) -> Result<Vec<Column<'a>>> {
    let mut columns = Vec::new();
    for child in table.flat_children()? {
        if let Some(expression) = child.as_expression()? {
            if let Some(column) = column_of(&expression)? {
                columns.push(column);
            }
        }
    }
    Ok(columns)
}

/// Values of the first column called `name`
pub fn column<'a>(table: &Expression<'a>, name: &str) -> Result<Option<Element<'a>>> {
    for child in table.flat_children()? {
        let Some(expression) = child.as_expression()? else {
            continue;
        };
        if let Some(column) = column_of(&expression)? {
            if column.name == name {
                return Ok(Some(column.values));
            }
        }
    }
    Ok(None)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use wisent_core::{Buffer, BufferBuilder, Node};

    /// `(Table (Column 'a (List 1.5 2.5)) (Column 'b (List 1 2 3)))`
    pub(crate) fn sample_table() -> Node {
        Node::expression(
            TABLE_HEAD,
            vec![
                Node::expression(
                    "Column",
                    vec![
                        Node::symbol("a"),
                        Node::expression("List", vec![Node::Double(1.5), Node::Double(2.5)]),
                    ],
                ),
                Node::expression(
                    "Column",
                    vec![
                        Node::symbol("b"),
                        Node::expression("List", vec![Node::Long(1), Node::Long(2), Node::Long(3)]),
                    ],
                ),
            ],
        )
    }

    #[test]
    fn test_columns() {
        let bytes = BufferBuilder::new().encode(&sample_table()).unwrap();
        let buffer = Buffer::new(&bytes).unwrap();
        let table = buffer.expression(0).unwrap();

        let names: Vec<_> = columns(&table).unwrap().iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["a", "b"]);

        let values = column(&table, "b").unwrap().unwrap();
        assert_eq!(values.to_string(), "(List 1 2 3)");
        assert_eq!(column(&table, "missing").unwrap(), None);
    }

    #[test]
    fn test_malformed_columns_are_skipped() {
        let table = Node::expression(
            TABLE_HEAD,
            vec![
                Node::Long(4),
                Node::expression("Column", vec![Node::symbol("lonely")]),
                Node::expression("Column", vec![Node::Long(1), Node::Long(2)]),
            ],
        );
        let bytes = BufferBuilder::new().encode(&table).unwrap();
        let buffer = Buffer::new(&bytes).unwrap();
        let table = buffer.expression(0).unwrap();

        assert!(columns(&table).unwrap().is_empty());
    }
}
