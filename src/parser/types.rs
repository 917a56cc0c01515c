use serde::{Deserialize, Serialize};

/// A decoded method name.
///
/// `full` is the identifier with any outer `$...$` wrapper removed. `source`
/// is the inlining/source context, present only when the identifier splits
/// into a context and a short display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodName {
    pub full: String,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub short: String,
}

/// One optimization pass dump, spanning its `begin_cfg`..`end_cfg` lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    pub name: String,
    pub start_line: usize,
    pub end_line: usize,
}

/// One compilation record and the phases dumped for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Method {
    pub name: MethodName,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opt_id: Option<String>,
    #[serde(default)]
    pub phases: Vec<Phase>,
}

impl Method {
    pub fn new(name: MethodName, opt_id: Option<String>) -> Self {
        Self {
            name,
            opt_id,
            phases: Vec::new(),
        }
    }

    /// Display label, e.g. `foo (opt #3)`.
    pub fn label(&self) -> String {
        match &self.opt_id {
            Some(id) => format!("{} (opt #{})", self.name.short, id),
            None => self.name.short.clone(),
        }
    }
}
