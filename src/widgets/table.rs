//! Sortable, searchable table rows.

use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::page::NodeId;

static LEADING_NUMBER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\s*[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").ok());

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Marker class written on the active header.
    pub const fn class(self) -> &'static str {
        match self {
            Self::Ascending => "sort-asc",
            Self::Descending => "sort-desc",
        }
    }

    pub const fn arrow(self) -> &'static str {
        match self {
            Self::Ascending => "▲",
            Self::Descending => "▼",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub key: String,
    pub label: String,
    pub sortable: bool,
    pub node: Option<NodeId>,
}

impl Column {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            sortable: true,
            node: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub cells: Vec<String>,
    pub hidden: bool,
    pub node: Option<NodeId>,
}

impl Row {
    pub fn new<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cells: cells.into_iter().map(Into::into).collect(),
            hidden: false,
            node: None,
        }
    }

    /// Whitespace-joined text of every cell, as searched by the filter.
    pub fn text(&self) -> String {
        self.cells.join(" ")
    }

    fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map_or("", String::as_str)
    }
}

/// Current sort key of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub column: usize,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableModel {
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
    sort: Option<SortKey>,
    query: String,
}

impl TableModel {
    pub const fn new(columns: Vec<Column>, rows: Vec<Row>) -> Self {
        Self {
            columns,
            rows,
            sort: None,
            query: String::new(),
        }
    }

    pub fn column_index(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.key == key)
    }

    pub const fn sort_key(&self) -> Option<SortKey> {
        self.sort
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Stable sort of all rows (hidden ones included) by one column.
    pub fn sort_by(&mut self, column: usize, direction: SortDirection) {
        self.rows.sort_by(|a, b| {
            let ord = compare_cells(a.cell(column), b.cell(column));
            match direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        });
        self.sort = Some(SortKey { column, direction });
    }

    /// Header activation: the same column flips direction, a new column
    /// starts ascending. Returns the direction applied.
    pub fn activate_column(&mut self, column: usize) -> SortDirection {
        let direction = match self.sort {
            Some(current) if current.column == column => current.direction.reversed(),
            _ => SortDirection::Ascending,
        };
        self.sort_by(column, direction);
        direction
    }

    /// Hide every row whose text does not contain `query`, ignoring case.
    /// An empty query shows everything. Returns the visible row count.
    pub fn filter(&mut self, query: &str) -> usize {
        let needle = query.to_lowercase();
        for row in &mut self.rows {
            row.hidden = !contains_folded(&row.text(), &needle);
        }
        query.clone_into(&mut self.query);
        self.visible_count()
    }

    pub fn visible_count(&self) -> usize {
        self.rows.iter().filter(|r| !r.hidden).count()
    }

    pub fn visible_rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(|r| !r.hidden)
    }

    /// The `"N results"` line shown under the search box.
    pub fn result_label(&self) -> String {
        format!("{} results", self.visible_count())
    }
}

/// Substring test ignoring case. `needle` must already be lowercase; an
/// empty needle matches everything, whitespace included.
pub fn contains_folded(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(needle)
}

/// Numeric comparison when both cells start with a number, otherwise
/// case-insensitive text with lowercase sorting first on ties.
pub fn compare_cells(a: &str, b: &str) -> Ordering {
    if let (Some(x), Some(y)) = (parse_leading_number(a), parse_leading_number(b)) {
        return x.total_cmp(&y);
    }
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

/// Parse the numeric prefix of `text` (`"12px"` → 12, `" -3.5e2x"` → -350).
pub fn parse_leading_number(text: &str) -> Option<f64> {
    LEADING_NUMBER
        .as_ref()?
        .find(text)
        .and_then(|m| m.as_str().trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn single_column(values: &[&str]) -> TableModel {
        TableModel::new(
            vec![Column::new("value", "Value")],
            values.iter().map(|v| Row::new([*v])).collect(),
        )
    }

    fn column_values(table: &TableModel) -> Vec<&str> {
        table.rows.iter().map(|r| r.cells[0].as_str()).collect()
    }

    #[test]
    fn test_numeric_sort() {
        let mut table = single_column(&["10", "2", "1"]);
        table.sort_by(0, SortDirection::Ascending);
        assert_eq!(column_values(&table), vec!["1", "2", "10"]);
    }

    #[test]
    fn test_text_sort_ignores_case() {
        let mut table = single_column(&["b", "A", "c"]);
        table.sort_by(0, SortDirection::Ascending);
        assert_eq!(column_values(&table), vec!["A", "b", "c"]);
        table.sort_by(0, SortDirection::Descending);
        assert_eq!(column_values(&table), vec!["c", "b", "A"]);
    }

    #[test]
    fn test_text_ties_put_lowercase_first() {
        assert_eq!(compare_cells("a", "A"), Ordering::Less);
        assert_eq!(compare_cells("A", "a"), Ordering::Greater);
        assert_eq!(compare_cells("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_mixed_values_fall_back_to_text() {
        assert_eq!(compare_cells("12px", "4px"), Ordering::Greater);
        assert_eq!(compare_cells("10", "abc"), Ordering::Less);
    }

    #[test]
    fn test_parse_leading_number() {
        assert_eq!(parse_leading_number("12px"), Some(12.0));
        assert_eq!(parse_leading_number(" -3.5e2x"), Some(-350.0));
        assert_eq!(parse_leading_number(".5rem"), Some(0.5));
        assert_eq!(parse_leading_number("px12"), None);
        assert_eq!(parse_leading_number(""), None);
    }

    #[test]
    fn test_activate_column_flips_then_resets() {
        let mut table = TableModel::new(
            vec![Column::new("name", "Name"), Column::new("size", "Size")],
            vec![Row::new(["b", "1"]), Row::new(["a", "2"])],
        );
        assert_eq!(table.activate_column(0), SortDirection::Ascending);
        assert_eq!(table.activate_column(0), SortDirection::Descending);
        assert_eq!(table.activate_column(0), SortDirection::Ascending);
        table.activate_column(0);
        assert_eq!(table.activate_column(1), SortDirection::Ascending);
        assert_eq!(
            table.sort_key(),
            Some(SortKey {
                column: 1,
                direction: SortDirection::Ascending
            })
        );
    }

    #[test]
    fn test_filter_hides_without_removing() {
        let mut table = single_column(&["apple pie", "banana", "Pineapple"]);
        assert_eq!(table.filter("APPLE"), 2);
        assert_eq!(table.rows.len(), 3);
        let visible: Vec<_> = table.visible_rows().map(|r| r.cells[0].as_str()).collect();
        assert_eq!(visible, vec!["apple pie", "Pineapple"]);
        assert_eq!(table.result_label(), "2 results");

        assert_eq!(table.filter(""), 3);
        assert!(table.rows.iter().all(|r| !r.hidden));
    }

    #[test]
    fn test_filter_keeps_surrounding_whitespace() {
        let mut table = single_column(&["apple pie", "banana", "Pineapple"]);
        assert_eq!(table.filter("apple "), 1);
        let visible: Vec<_> = table.visible_rows().map(|r| r.cells[0].as_str()).collect();
        assert_eq!(visible, vec!["apple pie"]);
        assert_eq!(table.query(), "apple ");

        assert_eq!(table.filter(" "), 1);
        assert_eq!(table.filter(" pine"), 0);
    }

    #[test]
    fn test_sort_keeps_hidden_flags() {
        let mut table = single_column(&["pear", "apple", "plum"]);
        table.filter("um");
        table.sort_by(0, SortDirection::Ascending);
        let hidden: Vec<_> = table.rows.iter().map(|r| r.hidden).collect();
        assert_eq!(hidden, vec![true, true, false]);
    }

    proptest! {
        #[test]
        fn prop_integer_columns_sort_numerically(
            values in proptest::collection::vec(-10_000i32..10_000, 0..40),
        ) {
            let strings: Vec<String> = values.iter().map(ToString::to_string).collect();
            let refs: Vec<&str> = strings.iter().map(String::as_str).collect();
            let mut table = single_column(&refs);
            table.sort_by(0, SortDirection::Ascending);

            let mut expected = values.clone();
            expected.sort_unstable();
            let sorted: Vec<i32> = table
                .rows
                .iter()
                .map(|r| r.cells[0].parse().unwrap())
                .collect();
            prop_assert_eq!(sorted, expected);
        }

        #[test]
        fn prop_filter_is_complete(
            words in proptest::collection::vec("[a-zA-Z]{1,8}", 1..20),
            needle in "[a-z]{1,3}",
        ) {
            let refs: Vec<&str> = words.iter().map(String::as_str).collect();
            let mut table = single_column(&refs);
            let visible = table.filter(&needle);
            let expected = words.iter().filter(|w| w.to_lowercase().contains(&needle)).count();
            prop_assert_eq!(visible, expected);
        }
    }
}
