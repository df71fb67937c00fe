use std::fmt;

/// A category cell, before (`Code`) and after label mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Category {
    /// integer code as loaded from the dataset
    Code(i64),
    /// display label from a [`LabelMap`]
    Label(&'static str),
    /// code outside the label map, kept distinguishable ([`UnmappedPolicy::Tag`])
    Unknown(i64),
    /// code outside the label map, dropped from group-bys ([`UnmappedPolicy::Drop`])
    Missing,
}
impl Category {
    /// The grouping key, `None` for a missing category
    pub fn group_key(&self) -> Option<String> {
        match self {
            Category::Missing => None,
            other => Some(other.to_string()),
        }
    }
}
impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Code(code) => write!(f, "{}", code),
            Category::Label(label) => f.write_str(label),
            Category::Unknown(code) => write!(f, "unknown({})", code),
            Category::Missing => Ok(()),
        }
    }
}

/// What to do with a category code that falls outside the label map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnmappedPolicy {
    /// keep the row under an `unknown(code)` label
    #[default]
    Tag,
    /// turn the category into a missing value, excluded from group-bys
    Drop,
}

/// Closed mapping from small integer codes to display labels
pub struct LabelMap {
    name: &'static str,
    entries: &'static [(i64, &'static str)],
}
impl LabelMap {
    pub fn season() -> Self {
        Self {
            name: "season",
            entries: &[(1, "Spring"), (2, "Summer"), (3, "Fall"), (4, "Winter")],
        }
    }
    pub fn weather() -> Self {
        Self {
            name: "weathersit",
            entries: &[(1, "Sunny"), (2, "Cloudy"), (3, "Rainy")],
        }
    }
    pub fn name(&self) -> &'static str {
        self.name
    }
    pub fn get(&self, code: i64) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, label)| *label)
    }
    /// Maps one cell, applying `policy` to codes outside the map.
    /// Unmapped codes are reported but never abort the computation.
    pub fn apply(&self, category: &Category, policy: UnmappedPolicy) -> Category {
        match *category {
            Category::Code(code) => match self.get(code) {
                Some(label) => Category::Label(label),
                None => {
                    log::warn!("unmapped {} code: {}", self.name, code);
                    match policy {
                        UnmappedPolicy::Tag => Category::Unknown(code),
                        UnmappedPolicy::Drop => Category::Missing,
                    }
                }
            },
            ref mapped => mapped.clone(),
        }
    }
}
