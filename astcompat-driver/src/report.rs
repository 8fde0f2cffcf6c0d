//! Findings of a check run, printed as text or JSON

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Casts,
    Constants,
    Locations,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Casts => "casts",
            Category::Constants => "constants",
            Category::Locations => "locations",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub category: Category,
    /// `file:line:column` of the node the finding is about
    pub location: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub unit: String,
    pub schema: String,
    pub standard: String,
    pub cplusplus17: bool,
    pub findings: Vec<Finding>,
}

impl Report {
    pub fn new(unit: &str, schema: String, standard: String, cplusplus17: bool) -> Self {
        Self {
            unit: unit.to_string(),
            schema,
            standard,
            cplusplus17,
            findings: Vec::new(),
        }
    }

    pub fn push(&mut self, category: Category, location: String, message: String) {
        self.findings.push(Finding {
            category,
            location,
            message,
        });
    }

    pub fn count(&self, category: Category) -> usize {
        self.findings
            .iter()
            .filter(|finding| finding.category == category)
            .count()
    }

    pub fn render_text(&self) -> String {
        let mut out = format!(
            "{} (schema {}, {}{})\n",
            self.unit,
            self.schema,
            self.standard,
            if self.cplusplus17 { ", C++17 features" } else { "" }
        );
        for finding in &self.findings {
            out.push_str(&format!(
                "  [{}] {}: {}\n",
                finding.category, finding.location, finding.message
            ));
        }
        out.push_str(&format!("{} finding(s)\n", self.findings.len()));
        out
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn report() -> Report {
        let mut report = Report::new("demo", "9.0.0".to_string(), "c++17".to_string(), true);
        report.push(
            Category::Casts,
            "a.cxx:3:5".to_string(),
            "CXXStaticCastExpr written as DeclRefExpr".to_string(),
        );
        report.push(
            Category::Constants,
            "a.cxx:4:9".to_string(),
            "condition is always 5".to_string(),
        );
        report
    }

    #[test]
    fn test_render_text() {
        assert_eq!(
            report().render_text(),
            "demo (schema 9.0.0, c++17, C++17 features)\n\
             \x20 [casts] a.cxx:3:5: CXXStaticCastExpr written as DeclRefExpr\n\
             \x20 [constants] a.cxx:4:9: condition is always 5\n\
             2 finding(s)\n"
        );
    }

    #[test]
    fn test_count_by_category() {
        let report = report();
        assert_eq!(report.count(Category::Casts), 1);
        assert_eq!(report.count(Category::Locations), 0);
    }

    #[test]
    fn test_json_uses_lowercase_categories() {
        let json = report().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["findings"][0]["category"], "casts");
        assert_eq!(value["cplusplus17"], true);
    }
}
