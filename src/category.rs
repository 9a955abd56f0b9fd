//! The fixed set of categories a task belongs to

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The four columns of the board.
///
/// This set is closed: there is no way to create a custom category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(alias = "Lavoro")]
    Work,
    #[serde(alias = "Casa")]
    Home,
    #[serde(alias = "Corsi")]
    Courses,
    #[serde(alias = "Allenamento")]
    Training,
}

impl Category {
    /// Every category, in board order
    pub const ALL: [Category; 4] = [Category::Work, Category::Home, Category::Courses, Category::Training];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Work => "Work",
            Category::Home => "Home",
            Category::Courses => "Courses",
            Category::Training => "Training",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    /// Case-insensitive, also accepts the Italian labels used by older snapshots
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "work" | "lavoro" => Ok(Category::Work),
            "home" | "casa" => Ok(Category::Home),
            "courses" | "corsi" => Ok(Category::Courses),
            "training" | "allenamento" => Ok(Category::Training),
            other => Err(format!("unknown category {:?} (expected one of Work, Home, Courses, Training)", other)),
        }
    }
}
