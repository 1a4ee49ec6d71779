// Column descriptors for table views.
//
// A column names a row field and says how to present it. Rendering of the
// `Custom` kind is left to a caller-supplied closure, so the table contract
// stays independent of whatever draws it (terminal table, JSON, GUI).

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::controller::ListQueryController;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// How a column turns a row into a cell.
pub enum ColumnKind<T, V> {
    /// The field's value as text.
    Text,
    /// The field's truthiness as a yes/no mark.
    Boolean,
    /// Anything else; the closure sees the whole row.
    Custom(Arc<dyn Fn(&T) -> V + Send + Sync>),
}

impl<T, V> Clone for ColumnKind<T, V> {
    fn clone(&self) -> Self {
        match self {
            Self::Text => Self::Text,
            Self::Boolean => Self::Boolean,
            Self::Custom(render) => Self::Custom(Arc::clone(render)),
        }
    }
}

impl<T, V> fmt::Debug for ColumnKind<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("Text"),
            Self::Boolean => f.write_str("Boolean"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A rendered cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell<V> {
    Text(String),
    Boolean(bool),
    Custom(V),
}

#[derive(Debug, Clone)]
pub struct Column<T, V> {
    /// Row field name; also the sort field when `sortable`.
    pub key: String,
    pub title: String,
    pub sortable: bool,
    pub align: Align,
    pub width: Option<u16>,
    pub kind: ColumnKind<T, V>,
}

impl<T, V> Column<T, V> {
    fn with_kind(key: &str, title: &str, kind: ColumnKind<T, V>) -> Self {
        Self {
            key: key.to_owned(),
            title: title.to_owned(),
            sortable: false,
            align: Align::Left,
            width: None,
            kind,
        }
    }

    pub fn text(key: &str, title: &str) -> Self {
        Self::with_kind(key, title, ColumnKind::Text)
    }

    pub fn boolean(key: &str, title: &str) -> Self {
        Self::with_kind(key, title, ColumnKind::Boolean)
    }

    pub fn custom(
        key: &str,
        title: &str,
        render: impl Fn(&T) -> V + Send + Sync + 'static,
    ) -> Self {
        Self::with_kind(key, title, ColumnKind::Custom(Arc::new(render)))
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }
}

impl<T, V> Column<T, V> {
    /// Render a row whose fields were already serialized into `fields`.
    pub fn cell_from(&self, row: &T, fields: &Value) -> Cell<V> {
        let field = fields.get(&self.key).unwrap_or(&Value::Null);
        match &self.kind {
            ColumnKind::Text => Cell::Text(text_of(field)),
            ColumnKind::Boolean => Cell::Boolean(truthy(field)),
            ColumnKind::Custom(render) => Cell::Custom(render(row)),
        }
    }
}

impl<T: Serialize, V> Column<T, V> {
    /// Render `row` through this column.
    pub fn cell(&self, row: &T) -> Cell<V> {
        self.cell_from(row, &fields_of(row))
    }
}

/// Render `row` through every column. The row is serialized once.
pub fn row_cells<T: Serialize, V>(columns: &[Column<T, V>], row: &T) -> Vec<Cell<V>> {
    let fields = fields_of(row);
    columns.iter().map(|c| c.cell_from(row, &fields)).collect()
}

fn fields_of<T: Serialize>(row: &T) -> Value {
    serde_json::to_value(row).unwrap_or(Value::Null)
}

fn text_of(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() > 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

impl<T> ListQueryController<T> {
    /// Header click on `column`. Non-sortable columns are ignored.
    pub fn sort_by_column<V>(&mut self, column: &Column<T, V>) -> bool {
        if !column.sortable {
            return false;
        }
        self.sort_by(&column.key);
        true
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use refdesk_api::types::{Client, Label};

    use super::*;
    use crate::clock::ManualClock;
    use crate::config::ListSettings;
    use crate::sort::SortDirection;

    fn client() -> Client {
        Client {
            id: 4,
            name: "Ann".into(),
            phone: "998901234567".into(),
            birthday: None,
            address: None,
            manager_id: Some(Label::Text("Bob".into())),
            active: true,
        }
    }

    #[test]
    fn text_cells_read_the_named_field() {
        let row = client();
        let name: Column<Client, ()> = Column::text("name", "Name");
        let id: Column<Client, ()> = Column::text("id", "ID");
        let manager: Column<Client, ()> = Column::text("manager_id", "Manager");
        let birthday: Column<Client, ()> = Column::text("birthday", "Birthday");

        assert_eq!(name.cell(&row), Cell::Text("Ann".into()));
        assert_eq!(id.cell(&row), Cell::Text("4".into()));
        assert_eq!(manager.cell(&row), Cell::Text("Bob".into()));
        assert_eq!(birthday.cell(&row), Cell::Text(String::new()));
    }

    #[test]
    fn boolean_and_custom_cells() {
        let row = client();
        let active: Column<Client, ()> = Column::boolean("active", "Active");
        let actions = Column::custom("action", "", |c: &Client| format!("edit/{}", c.id));

        assert_eq!(active.cell(&row), Cell::Boolean(true));
        assert_eq!(actions.cell(&row), Cell::Custom("edit/4".to_owned()));
    }

    /// Counts how often it is serialized.
    struct Counted {
        id: u64,
        serialized: std::cell::Cell<u32>,
    }

    impl Serialize for Counted {
        fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
            use serde::ser::SerializeStruct;

            self.serialized.set(self.serialized.get() + 1);
            let mut st = s.serialize_struct("Counted", 2)?;
            st.serialize_field("id", &self.id)?;
            st.serialize_field("active", &true)?;
            st.end()
        }
    }

    #[test]
    fn row_cells_serialize_each_row_once() {
        let row = Counted {
            id: 7,
            serialized: std::cell::Cell::new(0),
        };
        let columns: Vec<Column<Counted, String>> = vec![
            Column::text("id", "ID"),
            Column::boolean("active", "Active"),
            Column::text("missing", "Missing"),
            Column::custom("label", "Label", |r: &Counted| format!("#{}", r.id)),
        ];

        let cells = row_cells(&columns, &row);

        assert_eq!(row.serialized.get(), 1);
        assert_eq!(
            cells,
            vec![
                Cell::Text("7".into()),
                Cell::Boolean(true),
                Cell::Text(String::new()),
                Cell::Custom("#7".into()),
            ]
        );
    }

    #[test]
    fn only_sortable_columns_change_the_sort() {
        let mut c: ListQueryController<Client> =
            ListQueryController::new(ListSettings::default(), Arc::new(ManualClock::new()));
        let name: Column<Client, ()> = Column::text("name", "Name").sortable();
        let phone: Column<Client, ()> = Column::text("phone", "Phone");

        assert!(!c.sort_by_column(&phone));
        assert_eq!(c.sort().field, "id");

        assert!(c.sort_by_column(&name));
        assert!(c.sort_by_column(&name));
        assert_eq!(c.sort().field, "name");
        assert_eq!(c.sort().direction, SortDirection::Desc);
    }
}
