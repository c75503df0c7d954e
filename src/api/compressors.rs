//! Generated compressor rows for the paged datagrid demos
//!
//! A fixed set of 1000 rows is filtered, sorted and paged from the query.
//! Sorting compares the upper-cased text form of the column, the way the
//! client-side grid does, so numbers sort as strings.

use std::cmp::Reverse;

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::http::QueryParams;

const TOTAL_ROWS: u32 = 1000;
const STATUSES: [&str; 6] = ["OK", "On Hold", "Inactive", "Active", "Late", "Complete"];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Compressor {
    pub id: u32,
    pub product_id: u32,
    pub product_name: String,
    pub activity: &'static str,
    pub quantity: f64,
    pub price: f64,
    pub status: &'static str,
    pub order_date: String,
    pub action: &'static str,
}

impl Compressor {
    fn generate(id: u32) -> Self {
        let order_date = NaiveDate::from_ymd_opt(2015, 1, 1)
            .and_then(|d| d.checked_add_days(Days::new(u64::from(id))))
            .map(|d| d.format("%Y-%m-%dT00:00:00.000Z").to_string())
            .unwrap_or_default();
        Self {
            id,
            product_id: 214_220 + id,
            product_name: format!("Compressor {id}"),
            activity: "Assemble Paint",
            quantity: 1.0 + f64::from(id) / 2.0,
            price: 210.99 - f64::from(id),
            status: STATUSES[id as usize % STATUSES.len()],
            order_date,
            action: "Action",
        }
    }

    /// Text form of a column, `None` for unknown columns
    fn column(&self, name: &str) -> Option<String> {
        let text = match name {
            "id" => self.id.to_string(),
            "productId" => self.product_id.to_string(),
            "productName" => self.product_name.clone(),
            "activity" => self.activity.to_string(),
            "quantity" => self.quantity.to_string(),
            "price" => self.price.to_string(),
            "status" => self.status.to_string(),
            "orderDate" => self.order_date.clone(),
            "action" => self.action.to_string(),
            _ => return None,
        };
        Some(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Contains,
    Equals,
}

/// Column filter from `filterValue`/`filterColumn`/`filterOp`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnFilter {
    pub column: String,
    pub op: FilterOp,
    /// Lower-cased
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressorQuery {
    /// Free-text filter over the first four columns, lower-cased
    pub filter: Option<String>,
    pub column_filter: Option<ColumnFilter>,
    pub sort: Option<(String, bool)>,
    pub page_num: usize,
    pub page_size: usize,
}

impl Default for CompressorQuery {
    fn default() -> Self {
        Self {
            filter: None,
            column_filter: None,
            sort: None,
            page_num: 1,
            page_size: 10,
        }
    }
}

impl CompressorQuery {
    pub fn from_query(query: &QueryParams) -> Self {
        let filter = query
            .get_non_empty("filter")
            .map(|f| f.replacen('\'', "", 1).to_lowercase());
        let column_filter = query.get_non_empty("filterValue").map(|value| ColumnFilter {
            column: query.get("filterColumn").unwrap_or_default().to_string(),
            op: match query.get("filterOp") {
                Some("equals") => FilterOp::Equals,
                _ => FilterOp::Contains,
            },
            value: value.to_lowercase(),
        });
        let sort = query
            .get_non_empty("sortId")
            .map(|id| (id.to_string(), query.get("sortAsc") == Some("true")));
        Self {
            filter,
            column_filter,
            sort,
            page_num: query.get_parsed("pageNum").filter(|n| *n > 0).unwrap_or(1),
            page_size: query.get_parsed("pageSize").filter(|n| *n > 0).unwrap_or(10),
        }
    }

    fn keeps(&self, row: &Compressor) -> bool {
        if let Some(cf) = &self.column_filter {
            let text = match cf.column.as_str() {
                "productId" => row.product_id.to_string(),
                "productName" => row.product_name.to_lowercase(),
                "activity" => row.activity.to_lowercase(),
                "quantity" => row.quantity.to_string(),
                _ => return false,
            };
            return match cf.op {
                FilterOp::Contains => text.contains(&cf.value),
                FilterOp::Equals => text == cf.value,
            };
        }
        match &self.filter {
            Some(term) => {
                row.product_id.to_string().contains(term)
                    || row.product_name.to_lowercase().contains(term)
                    || row.activity.to_lowercase().contains(term)
                    || row.quantity.to_string().contains(term)
            }
            None => true,
        }
    }
}

/// One page of rows plus the filtered total
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub total: usize,
    pub data: Vec<Compressor>,
}

pub fn query_compressors(query: &CompressorQuery) -> Page {
    let mut rows: Vec<Compressor> = (0..TOTAL_ROWS)
        .map(Compressor::generate)
        .filter(|row| query.keeps(row))
        .collect();

    // Stable in both directions; an unknown column leaves the order untouched
    match &query.sort {
        Some((column, true)) => {
            rows.sort_by_cached_key(|row| row.column(column).map(|t| t.to_uppercase()));
        }
        Some((column, false)) => {
            rows.sort_by_cached_key(|row| Reverse(row.column(column).map(|t| t.to_uppercase())));
        }
        None => {}
    }

    let total = rows.len();
    let start = (query.page_num - 1).saturating_mul(query.page_size);
    let data = rows
        .into_iter()
        .skip(start)
        .take(query.page_size)
        .collect();
    Page { total, data }
}
