use crate::config::Config;
use crate::reporters::{JsonReporter, MarkdownReporter};
use crate::ReportFormat;
use anyhow::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use reqlens_aspnet::EndpointScanner;
use reqlens_core::models::{Document, Endpoint, HttpMethod};
use reqlens_core::resolve::{FsWorkspace, SearchScope, WorkspaceFiles};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Scans C# sources and reports the endpoints they declare
pub fn execute_scan(
    paths: &[PathBuf],
    format: ReportFormat,
    output: Option<&Path>,
    config: &Config,
) -> Result<()> {
    if !config.scan.enabled {
        warn!("scan requested while scan.enabled = false");
        println!("Scanning is disabled in the configuration (scan.enabled = false).");
        return Ok(());
    }

    let files = collect_files(paths, config.search_scope())?;
    if files.is_empty() {
        println!("No C# files found under the given paths.");
        return Ok(());
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files {msg}",
            )
            .expect("Failed to create progress bar template")
            .progress_chars("#>-"),
    );
    pb.set_message("Scanning...");

    let scanner = EndpointScanner::new();
    let mut endpoints = Vec::new();
    let mut scanned = 0usize;

    for file in &files {
        match Document::read(file) {
            Ok(document) => {
                endpoints.extend(scanner.scan(&document));
                scanned += 1;
            }
            Err(e) => {
                warn!(path = %file.display(), error = %e, "Skipping unreadable file");
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message("Scan complete");

    info!(
        files = scanned,
        endpoints = endpoints.len(),
        "document scan finished"
    );

    match (format, output) {
        (ReportFormat::Json, Some(path)) => {
            JsonReporter.generate(&endpoints, &path.to_string_lossy())?;
            println!("Report saved to {}", path.display());
        }
        (ReportFormat::Json, None) => {
            println!("{}", JsonReporter.render(&endpoints)?);
        }
        (ReportFormat::Markdown, Some(path)) => {
            MarkdownReporter.generate(&endpoints, &path.to_string_lossy())?;
            println!("Report saved to {}", path.display());
        }
        (ReportFormat::Markdown, None) => {
            println!("{}", MarkdownReporter.render(&endpoints));
        }
        (ReportFormat::Text, Some(path)) => {
            fs::write(path, render_text(&endpoints, scanned))?;
            println!("Report saved to {}", path.display());
        }
        (ReportFormat::Text, None) => {
            print_endpoints(&endpoints);
            println!(
                "\n{} endpoint(s) across {} file(s)",
                endpoints.len().to_string().bold(),
                scanned
            );
        }
    }

    Ok(())
}

/// Expands the given paths into a flat list of C# files.
///
/// Directories go through the same workspace walker the resolver uses, so
/// build output and VCS noise are skipped and the scope ceiling applies.
fn collect_files(paths: &[PathBuf], scope: SearchScope) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(FsWorkspace::new(path).with_scope(scope).enumerate());
        } else if path
            .extension()
            .map_or(false, |e| e.eq_ignore_ascii_case("cs"))
        {
            files.push(path.clone());
        } else {
            anyhow::bail!("Not a C# source file or directory: {}", path.display());
        }
    }
    Ok(files)
}

fn print_endpoints(endpoints: &[Endpoint]) {
    for (idx, endpoint) in endpoints.iter().enumerate() {
        println!(
            "{:>3}. {} {}",
            idx,
            color_method(endpoint.http_method),
            endpoint.route.bold()
        );
        println!(
            "     {}.{} -> {}  ({}:{})",
            endpoint.controller_name,
            endpoint.method_name,
            endpoint.return_type,
            endpoint.location.file,
            endpoint.location.line
        );
        for param in &endpoint.parameters {
            let requirement = if param.required { "required" } else { "optional" };
            println!(
                "       {:<6} {}: {} ({})",
                param.source.as_str(),
                param.name,
                param.declared_type,
                requirement
            );
        }
    }
}

fn color_method(method: HttpMethod) -> colored::ColoredString {
    let label = method.as_str();
    match method {
        HttpMethod::Get | HttpMethod::Head => label.green(),
        HttpMethod::Post => label.blue(),
        HttpMethod::Put | HttpMethod::Patch => label.yellow(),
        HttpMethod::Delete => label.red(),
        HttpMethod::Options => label.cyan(),
    }
}

/// Plain-text rendering used when the report goes to a file
fn render_text(endpoints: &[Endpoint], scanned: usize) -> String {
    let mut text = String::new();
    for (idx, endpoint) in endpoints.iter().enumerate() {
        text.push_str(&format!("{:>3}. {}\n", idx, endpoint.signature()));
        text.push_str(&format!(
            "     {}.{} -> {}  ({}:{})\n",
            endpoint.controller_name,
            endpoint.method_name,
            endpoint.return_type,
            endpoint.location.file,
            endpoint.location.line
        ));
        for param in &endpoint.parameters {
            let requirement = if param.required { "required" } else { "optional" };
            text.push_str(&format!(
                "       {:<6} {}: {} ({})\n",
                param.source.as_str(),
                param.name,
                param.declared_type,
                requirement
            ));
        }
    }
    text.push_str(&format!(
        "\n{} endpoint(s) across {} file(s)\n",
        endpoints.len(),
        scanned
    ));
    text
}
