use crate::model::Row;

/// Row count and summed price of a list
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub count: usize,
    pub sum: f64,
}

/// Count rows and add up their `price` cells.
///
/// The sum is of unit prices, not price × quantity, even though each row is
/// displayed with its line total. Cells that are not numbers count as 0.
pub fn compute_totals(rows: &[Row]) -> Totals {
    Totals {
        count: rows.len(),
        sum: rows.iter().map(|row| row.price.or_zero()).sum(),
    }
}
