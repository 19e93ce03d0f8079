use anyhow::Result;
use reqlens_core::models::Endpoint;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Markdown report generator
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// Generates a Markdown report file
    pub fn generate(&self, endpoints: &[Endpoint], output_path: &str) -> Result<()> {
        fs::write(Path::new(output_path), self.render(endpoints))?;
        Ok(())
    }

    /// Renders the report as Markdown text
    pub fn render(&self, endpoints: &[Endpoint]) -> String {
        let mut report = String::new();

        report.push_str("# API Surface Report\n\n");
        report.push_str(&format!(
            "## Scan Date\n{}\n\n",
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        ));

        let controllers = Self::controllers_in_order(endpoints);

        report.push_str("## Scan Statistics\n\n");
        report.push_str(&format!("- **Total Endpoints**: {}\n", endpoints.len()));
        report.push_str(&format!("- **Controllers**: {}\n", controllers.len()));
        report.push_str("- **By Method**:\n");
        for method in ["GET", "POST", "PUT", "PATCH", "DELETE", "HEAD", "OPTIONS"] {
            let count = endpoints
                .iter()
                .filter(|e| e.http_method.as_str() == method)
                .count();
            if count > 0 {
                report.push_str(&format!("  - {}: {}\n", method, count));
            }
        }
        report.push('\n');
        report.push_str("---\n\n");

        for controller in &controllers {
            report.push_str(&format!("## {}\n\n", controller));

            for endpoint in endpoints.iter().filter(|e| &e.controller_name == controller) {
                report.push_str(&format!("### `{}`\n\n", endpoint.signature()));
                report.push_str(&format!("- **Action**: `{}`\n", endpoint.method_name));
                report.push_str(&format!("- **Returns**: `{}`\n", endpoint.return_type));
                report.push_str(&format!(
                    "- **Location**: `{}:{}`\n\n",
                    endpoint.location.file, endpoint.location.line
                ));

                if endpoint.parameters.is_empty() {
                    report.push_str("No parameters.\n\n");
                } else {
                    report.push_str("| Parameter | Type | Source | Required |\n");
                    report.push_str("|-----------|------|--------|----------|\n");
                    for param in &endpoint.parameters {
                        report.push_str(&format!(
                            "| `{}` | `{}` | {} | {} |\n",
                            param.name,
                            param.declared_type,
                            param.source.as_str(),
                            if param.required { "yes" } else { "no" }
                        ));
                    }
                    report.push('\n');
                }
            }

            report.push_str("---\n\n");
        }

        report
    }

    /// Controller names in first-seen order
    fn controllers_in_order(endpoints: &[Endpoint]) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut result = Vec::new();
        for endpoint in endpoints {
            if seen.insert(endpoint.controller_name.clone()) {
                result.push(endpoint.controller_name.clone());
            }
        }
        result
    }
}
