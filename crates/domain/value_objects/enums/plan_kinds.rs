use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlanKind {
    #[default]
    Free,
    Premium,
    Family,
    Student,
}

impl Display for PlanKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            PlanKind::Free => "free",
            PlanKind::Premium => "premium",
            PlanKind::Family => "family",
            PlanKind::Student => "student",
        };
        write!(f, "{}", kind)
    }
}

impl PlanKind {
    pub fn from_str(value: &str) -> Self {
        match value {
            "premium" => PlanKind::Premium,
            "family" => PlanKind::Family,
            "student" => PlanKind::Student,
            _ => PlanKind::Free,
        }
    }
}
