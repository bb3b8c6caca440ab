use srk_schemas::StockLine;

use crate::types::StockMap;

/// Case-insensitive substring match over the columns an operator searches by.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StockFilter {
    needle: String,
}

impl StockFilter {
    pub fn new(text: &str) -> Self {
        Self {
            needle: text.trim().to_lowercase(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    pub fn matches(&self, line: &StockLine) -> bool {
        if self.needle.is_empty() {
            return true;
        }
        haystack(line).contains(&self.needle)
    }
}

// key, item, quantity, location, handling unit, batch1
fn haystack(line: &StockLine) -> String {
    let fields = [
        line.sequence.to_string(),
        line.item.clone().unwrap_or_default(),
        line.quantity_on_hand.to_string(),
        line.location.clone().unwrap_or_default(),
        line.handling_unit.clone().unwrap_or_default(),
        line.batch1.clone().unwrap_or_default(),
    ];
    fields.join(" ").to_lowercase()
}

/// Lines of `stock` matching `filter`, in key order.
pub fn filter_lines<'a>(
    stock: &'a StockMap,
    filter: &'a StockFilter,
) -> impl Iterator<Item = &'a StockLine> + 'a {
    stock.values().filter(move |l| filter.matches(l))
}
