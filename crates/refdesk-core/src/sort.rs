use std::fmt;

pub use refdesk_api::SortDirection;

/// Column + direction a list is ordered by.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortState {
    pub field: String,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            field: "id".into(),
            direction: SortDirection::Asc,
        }
    }
}

impl SortState {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    /// Column-header click: the current column flips direction, any other
    /// column becomes current in ascending order.
    pub fn toggle(&mut self, field: &str) {
        if self.field == field {
            self.direction = self.direction.toggled();
        } else {
            self.field = field.to_owned();
            self.direction = SortDirection::Asc;
        }
    }
}

impl fmt::Display for SortState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_column_alternates() {
        let mut sort = SortState::default();
        sort.toggle("name");
        assert_eq!(sort.direction, SortDirection::Asc);
        sort.toggle("name");
        assert_eq!(sort.direction, SortDirection::Desc);
        sort.toggle("name");
        assert_eq!(sort.direction, SortDirection::Asc);
    }

    #[test]
    fn new_column_always_starts_ascending() {
        let mut sort = SortState::new("name", SortDirection::Desc);
        sort.toggle("phone");
        assert_eq!(sort, SortState::new("phone", SortDirection::Asc));
    }
}
