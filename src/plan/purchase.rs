//! Planned purchases handed to the actuator

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::types::Points;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    /// Version acquired
    pub name: String,
    /// On-screen row to tap; differs from `name` only for multi-step in-place upgrades
    pub row: String,
    /// Taps on `row`; greater than one only for multi-step in-place upgrades
    pub repeat_count: u32,
    /// Points charged
    pub cost: Points,
}

impl Purchase {
    pub fn single(name: impl Into<String>, cost: Points) -> Self {
        let name = name.into();
        Self {
            row: name.clone(),
            name,
            repeat_count: 1,
            cost,
        }
    }
}

/// Ordered purchases for one planning cycle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseList {
    pub purchases: Vec<Purchase>,
    pub total_cost: Points,
    pub remaining_budget: Points,
}

impl PurchaseList {
    pub fn new(budget: Points) -> Self {
        Self {
            purchases: Vec::new(),
            total_cost: 0,
            remaining_budget: budget,
        }
    }

    pub fn push(&mut self, purchase: Purchase) {
        self.total_cost += purchase.cost;
        self.remaining_budget = self.remaining_budget.saturating_sub(purchase.cost);
        self.purchases.push(purchase);
    }

    pub fn len(&self) -> usize {
        self.purchases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.purchases.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Purchase> {
        self.purchases.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.purchases.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.purchases.iter().any(|p| p.name == name)
    }
}

impl fmt::Display for PurchaseList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.purchases.is_empty() {
            writeln!(f, "Nothing to buy.")?;
        }
        for (i, purchase) in self.purchases.iter().enumerate() {
            write!(f, "{:>3}. {} ({}pt)", i + 1, purchase.name, purchase.cost)?;
            if purchase.repeat_count > 1 {
                write!(f, " via \"{}\" x{}", purchase.row, purchase.repeat_count)?;
            }
            writeln!(f)?;
        }
        write!(
            f,
            "Total: {}pt, remaining: {}pt",
            self.total_cost, self.remaining_budget
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_tracks_totals() {
        let mut list = PurchaseList::new(300);
        list.push(Purchase::single("Focus", 120));
        list.push(Purchase {
            name: "Maestro".into(),
            row: "Recovery ○".into(),
            repeat_count: 2,
            cost: 150,
        });
        assert_eq!(list.total_cost, 270);
        assert_eq!(list.remaining_budget, 30);
        assert_eq!(list.names(), vec!["Focus", "Maestro"]);
        assert!(list.contains("Maestro"));
        assert!(!list.contains("Recovery ○"));
    }

    #[test]
    fn test_display() {
        let mut list = PurchaseList::new(300);
        list.push(Purchase {
            name: "Maestro".into(),
            row: "Recovery ○".into(),
            repeat_count: 2,
            cost: 150,
        });
        let text = list.to_string();
        assert!(text.contains("1. Maestro (150pt) via \"Recovery ○\" x2"));
        assert!(text.ends_with("Total: 150pt, remaining: 150pt"));
        assert!(PurchaseList::new(5).to_string().starts_with("Nothing to buy."));
    }
}
