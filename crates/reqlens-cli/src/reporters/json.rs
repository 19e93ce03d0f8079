use anyhow::Result;
use reqlens_core::models::Endpoint;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

/// JSON report generator
pub struct JsonReporter;

impl JsonReporter {
    /// Generates a JSON report file
    pub fn generate(&self, endpoints: &[Endpoint], output_path: &str) -> Result<()> {
        let json_string = self.render(endpoints)?;
        fs::write(Path::new(output_path), json_string)?;
        Ok(())
    }

    /// Renders the report as pretty-printed JSON
    pub fn render(&self, endpoints: &[Endpoint]) -> Result<String> {
        let report = serde_json::json!({
            "version": "1.0.0",
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "summary": Self::build_summary(endpoints),
            "endpoints": endpoints,
        });

        Ok(serde_json::to_string_pretty(&report)?)
    }

    fn build_summary(endpoints: &[Endpoint]) -> serde_json::Value {
        let mut by_method: HashMap<String, usize> = HashMap::new();
        for endpoint in endpoints {
            *by_method
                .entry(endpoint.http_method.as_str().to_lowercase())
                .or_insert(0) += 1;
        }

        let mut by_source: HashMap<String, usize> = HashMap::new();
        for param in endpoints.iter().flat_map(|e| &e.parameters) {
            *by_source.entry(param.source.as_str().to_string()).or_insert(0) += 1;
        }

        let controllers: HashSet<&str> = endpoints
            .iter()
            .map(|e| e.controller_name.as_str())
            .collect();

        serde_json::json!({
            "total_endpoints": endpoints.len(),
            "controllers": controllers.len(),
            "endpoints_by_method": by_method,
            "parameters_by_source": by_source,
        })
    }
}
