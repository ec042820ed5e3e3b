//! Builds parameterized WHERE / ORDER BY / LIMIT clauses for list endpoints.
//! Column names only ever come from constants in this crate; user input is always a parameter.

use crate::service::pagination::PageRequest;
use crate::sql::params::PgBindValue;

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<PgBindValue>,
}

/// Conjunction of conditions, numbering `$n` placeholders as they are added.
#[derive(Default)]
pub struct Filter {
    parts: Vec<String>,
    params: Vec<PgBindValue>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    fn push_param(&mut self, v: PgBindValue) -> usize {
        self.params.push(v);
        self.params.len()
    }

    /// Condition with no parameters, e.g. `deleted_at IS NULL`.
    pub fn raw(mut self, condition: &str) -> Self {
        self.parts.push(condition.to_string());
        self
    }

    pub fn eq(mut self, column: &str, value: impl Into<PgBindValue>) -> Self {
        let n = self.push_param(value.into());
        self.parts.push(format!("{} = ${}", column, n));
        self
    }

    pub fn eq_opt<V: Into<PgBindValue>>(self, column: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.eq(column, v),
            None => self,
        }
    }

    /// Case-insensitive substring match against any of `columns` (OR), one shared parameter.
    pub fn contains_any(mut self, columns: &[&str], term: &str) -> Self {
        let n = self.push_param(PgBindValue::Text(like_pattern(term)));
        let ors: Vec<String> = columns.iter().map(|c| format!("{} ILIKE ${}", c, n)).collect();
        self.parts.push(format!("({})", ors.join(" OR ")));
        self
    }

    /// Case-insensitive equality against any element of a TEXT[] column.
    pub fn array_has_ci(mut self, column: &str, value: &str) -> Self {
        let n = self.push_param(PgBindValue::Text(value.to_string()));
        self.parts.push(format!(
            "EXISTS (SELECT 1 FROM unnest({}) AS elem WHERE lower(elem) = lower(${}))",
            column, n
        ));
        self
    }

    pub fn where_clause(&self) -> String {
        if self.parts.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.parts.join(" AND "))
        }
    }

    /// `SELECT <columns> ... ORDER BY ... LIMIT ... OFFSET ...` plus the matching `COUNT(*)`.
    pub fn into_page_queries(self, table: &str, columns: &str, sort: &Sort, page: &PageRequest) -> (QueryBuf, QueryBuf) {
        let where_clause = self.where_clause();
        let count = QueryBuf {
            sql: format!("SELECT COUNT(*) FROM {}{}", table, where_clause),
            params: self.params.clone(),
        };
        let list = QueryBuf {
            sql: format!(
                "SELECT {} FROM {}{}{} LIMIT {} OFFSET {}",
                columns,
                table,
                where_clause,
                sort.order_by(),
                page.limit,
                page.offset()
            ),
            params: self.params,
        };
        (list, count)
    }
}

/// Escape LIKE wildcards in `term` and wrap it in `%...%`.
pub fn like_pattern(term: &str) -> String {
    let mut out = String::with_capacity(term.len() + 2);
    out.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

/// ORDER BY over an allow-listed column. `id` breaks ties so pages are stable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub column: &'static str,
    pub descending: bool,
    /// Sorts NULLs last (used for `paid_at`).
    pub nulls_last: bool,
}

impl Sort {
    pub const fn desc(column: &'static str) -> Self {
        Sort { column, descending: true, nulls_last: false }
    }

    /// Pick `field` from `allowed`; anything else falls back to `fallback` descending.
    /// `order` is `asc`/`desc` (case-insensitive); anything else means descending.
    pub fn parse(field: Option<&str>, order: Option<&str>, allowed: &[&'static str], fallback: &'static str) -> Self {
        let chosen = field.and_then(|f| allowed.iter().copied().find(|a| a.eq_ignore_ascii_case(f.trim())));
        match chosen {
            Some(column) => Sort {
                column,
                descending: !order.is_some_and(|o| o.trim().eq_ignore_ascii_case("asc")),
                nulls_last: false,
            },
            None => Sort::desc(fallback),
        }
    }

    pub fn order_by(&self) -> String {
        let dir = if self.descending { "DESC" } else { "ASC" };
        let nulls = if self.nulls_last { " NULLS LAST" } else { "" };
        format!(" ORDER BY {} {}{}, id {}", self.column, dir, nulls, dir)
    }
}
