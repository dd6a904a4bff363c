//! Cart data model: products, cart lines, the cart itself and the scan mode

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// A scanned product. Identified by name; immutable once scanned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub price: f64,
}

impl Product {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}

/// One cart entry per unique product name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLine {
    pub name: String,
    pub price: f64,
    pub quantity: u32,
}

impl CartLine {
    /// Line subtotal (price x quantity)
    pub fn subtotal(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

/// Scan mode selected by the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Add,
    Remove,
}

impl Mode {
    /// The other mode
    pub fn toggled(self) -> Self {
        match self {
            Mode::Add => Mode::Remove,
            Mode::Remove => Mode::Add,
        }
    }

    /// Label shown next to the mode switch
    pub fn label(self) -> &'static str {
        match self {
            Mode::Add => "Add Mode",
            Mode::Remove => "Remove Mode",
        }
    }
}

/// Cart lines in first-insertion order, unique by product name.
///
/// Lines are only created and destroyed through [`Cart::add`] and
/// [`Cart::remove`], so no line ever holds a zero quantity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.name == name)
    }

    pub fn quantity_of(&self, name: &str) -> u32 {
        self.get(name).map_or(0, |line| line.quantity)
    }

    /// Increment the line for `product`, creating it with quantity 1 if absent.
    /// Returns the new quantity.
    pub fn add(&mut self, product: &Product) -> u32 {
        match self.lines.iter_mut().find(|line| line.name == product.name) {
            Some(line) => {
                line.quantity += 1;
                line.quantity
            }
            None => {
                self.lines.push(CartLine {
                    name: product.name.clone(),
                    price: product.price,
                    quantity: 1,
                });
                1
            }
        }
    }

    /// Decrement the line named `name`, dropping it when it reaches zero.
    /// Returns the remaining quantity, or `None` if the product was not in the cart.
    pub fn remove(&mut self, name: &str) -> Option<u32> {
        let idx = self.lines.iter().position(|line| line.name == name)?;
        let remaining = self.lines[idx].quantity.saturating_sub(1);
        if remaining == 0 {
            self.lines.remove(idx);
        } else {
            self.lines[idx].quantity = remaining;
        }
        Some(remaining)
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of price x quantity over all lines, computed fresh on every call
    pub fn total(&self) -> f64 {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }
}
