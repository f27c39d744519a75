//! Cart line as written by the cart page.
//!
//! The cart is owned elsewhere; the storefront only reads it to compute the
//! navbar badge. Only `qty` is interpreted and every other field is ignored.
//! Lines are read one by one, so a line of any shape still counts.

use serde_json::Value;

/// One line of the stored cart.
#[derive(Debug, Clone, Default)]
pub struct CartLine {
    pub qty: Option<Value>,
}

impl CartLine {
    /// The line stored as `record`. Records that are not objects have no
    /// `qty`.
    #[must_use]
    pub fn from_record(record: &Value) -> Self {
        Self {
            qty: record.get("qty").cloned(),
        }
    }

    /// Units this line contributes to the badge.
    ///
    /// A positive number (or numeric string) counts as its integer part;
    /// anything else, including a missing or zero `qty`, counts as one.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn quantity(&self) -> u64 {
        let parsed = match &self.qty {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        match parsed {
            Some(n) if n >= 1.0 && n.is_finite() => n as u64,
            _ => 1,
        }
    }
}

/// Sum of quantities across all lines.
#[must_use]
pub fn total_quantity(lines: &[CartLine]) -> u64 {
    lines.iter().map(CartLine::quantity).sum()
}
