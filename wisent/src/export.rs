//! JSON export of decoded expressions
//!
//! `Object`, `List` and `Table` expressions map onto JSON objects and arrays.
//! Any other expression becomes `{"<head>": [children...]}`.

use serde_json::{Map, Number, Value};
use wisent_core::{Atom, Element, Expression};

use crate::table::{column_of, TABLE_HEAD};
use crate::Result;

/// Head of key/value expressions: `(Object (key value) ...)`
pub const OBJECT_HEAD: &str = "Object";
/// Head of sequence expressions
pub const LIST_HEAD: &str = "List";

/// Convert an element and everything below it to JSON
pub fn to_json(element: &Element<'_>) -> Result<Value> {
    Ok(match element.resolve()? {
        Atom::Integer(value) => Value::from(value),
        Atom::Float(value) => Number::from_f64(value).map_or(Value::Null, Value::Number),
        Atom::Text(text) | Atom::Symbol(text) => Value::String(text.to_owned()),
        Atom::Expression(expression) => expression_to_json(&expression)?,
    })
}

/// Convert an expression to JSON according to its head
pub fn expression_to_json(expression: &Expression<'_>) -> Result<Value> {
    match expression.head()? {
        OBJECT_HEAD => object_to_json(expression),
        LIST_HEAD => expression
            .flat_children()?
            .map(|child| to_json(&child))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        TABLE_HEAD => table_to_json(expression),
        head => {
            let children = expression
                .flat_children()?
                .map(|child| to_json(&child))
                .collect::<Result<Vec<_>>>()?;
            let mut map = Map::new();
            map.insert(head.to_owned(), Value::Array(children));
            Ok(Value::Object(map))
        }
    }
}

/// Each entry's head is the key and its first child the value
fn object_to_json(object: &Expression<'_>) -> Result<Value> {
    let mut map = Map::new();
    for child in object.flat_children()? {
        let Some(entry) = child.as_expression()? else {
            continue;
        };
        let value = match entry.flat_children()?.next() {
            Some(value) => to_json(&value)?,
            None => Value::Null,
        };
        map.insert(entry.head()?.to_owned(), value);
    }
    Ok(Value::Object(map))
}

fn table_to_json(table: &Expression<'_>) -> Result<Value> {
    let mut map = Map::new();
    for child in table.flat_children()? {
        let Some(expression) = child.as_expression()? else {
            continue;
        };
        if let Some(column) = column_of(&expression)? {
            map.insert(column.name.to_owned(), to_json(&column.values)?);
        }
    }
    Ok(Value::Object(map))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::tests::sample_table;
    use serde_json::json;
    use wisent_core::{Buffer, BufferBuilder, Node};

    fn export(root: &Node) -> Value {
        let bytes = BufferBuilder::new().encode(root).unwrap();
        let buffer = Buffer::new(&bytes).unwrap();
        to_json(&buffer.root().unwrap()).unwrap()
    }

    #[test]
    fn test_scalars() {
        assert_eq!(export(&Node::Long(-4)), json!(-4));
        assert_eq!(export(&Node::Double(0.25)), json!(0.25));
        assert_eq!(export(&Node::Double(f64::NAN)), Value::Null);
        assert_eq!(export(&Node::text("hi")), json!("hi"));
        assert_eq!(export(&Node::symbol("sym")), json!("sym"));
    }

    #[test]
    fn test_object_and_list() {
        let root = Node::expression(
            OBJECT_HEAD,
            vec![
                Node::expression("name", vec![Node::text("weather")]),
                Node::expression(
                    "sizes",
                    vec![Node::expression(LIST_HEAD, vec![Node::Long(1), Node::Long(2)])],
                ),
                Node::expression("empty", vec![]),
            ],
        );
        assert_eq!(
            export(&root),
            json!({"name": "weather", "sizes": [1, 2], "empty": null})
        );
    }

    #[test]
    fn test_compressed_list() {
        let root = Node::expression(LIST_HEAD, (0..6).map(Node::Long).collect());
        let bytes = BufferBuilder::new().encode(&root).unwrap();
        let buffer = Buffer::new(&bytes).unwrap();
        let runs: Vec<_> = buffer.root().unwrap().children().unwrap().collect();
        assert!(runs[0].is_compressed());

        assert_eq!(export(&root), json!([0, 1, 2, 3, 4, 5]));
    }

    #[test]
    fn test_table() {
        assert_eq!(
            export(&sample_table()),
            json!({"a": [1.5, 2.5], "b": [1, 2, 3]})
        );
    }

    #[test]
    fn test_other_heads() {
        let root = Node::expression("point", vec![Node::Long(1), Node::symbol("x")]);
        assert_eq!(export(&root), json!({"point": [1, "x"]}));
    }
}
