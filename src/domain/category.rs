use serde::{Deserialize, Serialize};

use super::Cents;

/// The closed set of transaction categories.
/// Declaration order matters: it is the iteration order for reports and the
/// tie-break order when picking the top expense category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Food,
    Transport,
    Entertainment,
    Shopping,
    Bills,
    Health,
    Education,
    Income,
    Other,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Food,
        Category::Transport,
        Category::Entertainment,
        Category::Shopping,
        Category::Bills,
        Category::Health,
        Category::Education,
        Category::Income,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Entertainment => "Entertainment",
            Category::Shopping => "Shopping",
            Category::Bills => "Bills",
            Category::Health => "Health",
            Category::Education => "Education",
            Category::Income => "Income",
            Category::Other => "Other",
        }
    }

    pub fn is_income(&self) -> bool {
        matches!(self, Category::Income)
    }

    /// Apply this category's sign to a magnitude: Income is an inflow,
    /// everything else an outflow.
    pub fn signed(&self, magnitude: Cents) -> Cents {
        let magnitude = magnitude.abs();
        if self.is_income() { magnitude } else { -magnitude }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown category: {}", s))
    }
}
