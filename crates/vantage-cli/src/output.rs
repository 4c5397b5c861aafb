//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};
use vantage_domain::{Id, Investigation, InvestigationListing, ProviderMetadata};
use vantage_engine::report::{truncate_label, InvestigationReport};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a finished investigation.
    pub fn format_investigation(&self, investigation: &Investigation) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_report(investigation),
            OutputFormat::Table => Ok(self.format_investigation_table(investigation)),
            OutputFormat::Quiet => Ok(investigation.id().to_string()),
        }
    }

    /// Pretty JSON report, used by `export` whatever the format.
    pub fn format_report(&self, investigation: &Investigation) -> Result<String> {
        let report = InvestigationReport::from_investigation(investigation);
        Ok(serde_json::to_string_pretty(&report)?)
    }

    fn format_investigation_table(&self, inv: &Investigation) -> String {
        let mut out = Vec::new();

        out.push(self.colorize(&format!("Investigation {}", inv.id()), "cyan"));
        out.push(format!("Query:  {} ({})", inv.initial_query(), inv.initial_type()));
        let status = match inv.status().as_str() {
            "completed" => self.colorize("completed", "green"),
            other => self.colorize(other, "red"),
        };
        out.push(format!("Status: {}", status));
        if !inv.notes().is_empty() {
            out.push(format!("Notes:  {}", inv.notes()));
        }

        let mut builder = Builder::default();
        builder.push_record(["Type", "Value", "Confidence", "Source"]);
        for entity in inv.entities() {
            builder.push_record([
                entity.entity_type.as_str().to_string(),
                truncate_label(&entity.value),
                format!("{:.2}", entity.confidence),
                entity.source_provider.clone(),
            ]);
        }
        out.push(String::new());
        out.push(format!("Entities ({})", inv.entities().len()));
        out.push(Self::render(builder));

        if !inv.relationships().is_empty() {
            let label = |id: Id| {
                inv.entity_by_id(id)
                    .map(|e| truncate_label(&e.value))
                    .unwrap_or_else(|| id.to_string())
            };
            let mut builder = Builder::default();
            builder.push_record(["From", "Relationship", "To", "Confidence"]);
            for rel in inv.relationships() {
                builder.push_record([
                    label(rel.source_entity_id),
                    rel.relationship_type.clone(),
                    label(rel.target_entity_id),
                    format!("{:.2}", rel.confidence),
                ]);
            }
            out.push(String::new());
            out.push(format!("Relationships ({})", inv.relationships().len()));
            out.push(Self::render(builder));
        }

        out.push(String::new());
        if inv.provider_runs().is_empty() {
            out.push(self.warning("No providers ran"));
        } else {
            out.push("Providers:".to_string());
            for run in inv.provider_runs() {
                let line = if run.is_failure() {
                    self.error(&run.audit_label())
                } else {
                    self.success(&run.audit_label())
                };
                out.push(format!("  {} ({} ms)", line, run.elapsed_ms));
            }
        }

        out.join("\n")
    }

    /// Format loaded providers.
    pub fn format_providers(&self, providers: &[ProviderMetadata]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(providers)?),
            OutputFormat::Quiet => Ok(providers
                .iter()
                .map(|p| p.name.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if providers.is_empty() {
                    return Ok(self.colorize("No providers loaded.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["Name", "Types", "Credential", "Description"]);
                for p in providers {
                    let types: Vec<&str> = p.supported_types.iter().map(|t| t.as_str()).collect();
                    builder.push_record([
                        p.name.clone(),
                        types.join(", "),
                        if p.requires_credential { "yes" } else { "no" }.to_string(),
                        p.description.clone(),
                    ]);
                }
                Ok(Self::render(builder))
            }
        }
    }

    /// Format supported type names.
    pub fn format_types(&self, types: &[String]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(types)?),
            _ => Ok(types.join("\n")),
        }
    }

    /// Format saved investigation summaries.
    pub fn format_history(&self, listings: &[InvestigationListing]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(listings)?),
            OutputFormat::Quiet => Ok(listings
                .iter()
                .map(|l| l.id.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if listings.is_empty() {
                    return Ok(self.colorize("No investigations found.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["ID", "Query", "Type", "Status", "Entities", "Created"]);
                for l in listings {
                    builder.push_record([
                        l.id.to_string(),
                        truncate_label(&l.initial_query),
                        l.initial_type.as_str().to_string(),
                        l.status.as_str().to_string(),
                        l.entity_count.to_string(),
                        l.created_at.to_string(),
                    ]);
                }
                Ok(Self::render(builder))
            }
        }
    }

    fn render(builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vantage_domain::{Entity, EntityType, Metadata, ProviderRun};

    fn create_test_investigation() -> Investigation {
        let mut inv = Investigation::new("alice@example.com", EntityType::Email);
        inv.start().unwrap();
        let seed = inv
            .add_entity(Entity::new(EntityType::Email, "alice@example.com", "user_input"))
            .id;
        let user = inv
            .add_entity(Entity::new(EntityType::Username, "alice", "Email Enrichment").with_confidence(0.7))
            .id;
        inv.add_relationship(seed, user, "email_contains_username", 0.7, Metadata::new());
        inv.record_run(ProviderRun::succeeded("Email Enrichment", 1, 2));
        inv.record_run(ProviderRun::failed("Breach Check", "offline", 5));
        inv.complete().unwrap();
        inv
    }

    #[test]
    fn test_table_format() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter
            .format_investigation(&create_test_investigation())
            .unwrap();
        assert!(output.contains("Query:  alice@example.com (email)"));
        assert!(output.contains("Entities (2)"));
        assert!(output.contains("email_contains_username"));
        assert!(output.contains("0.70"));
        assert!(output.contains("✓ Email Enrichment"));
        assert!(output.contains("✗ Breach Check (FAILED)"));
    }

    #[test]
    fn test_json_format() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter
            .format_investigation(&create_test_investigation())
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["total_entities"], 2);
        assert_eq!(value["providers_run"][1], "Breach Check (FAILED)");
    }

    #[test]
    fn test_quiet_format() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let inv = create_test_investigation();
        let output = formatter.format_investigation(&inv).unwrap();
        assert_eq!(output, inv.id().to_string());
    }

    #[test]
    fn test_empty_history() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_history(&[]).unwrap();
        assert!(output.contains("No investigations found"));
    }

    #[test]
    fn test_providers_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let providers = vec![ProviderMetadata {
            name: "Phone Number Analysis".to_string(),
            description: "Validate phone numbers".to_string(),
            supported_types: vec![EntityType::Phone],
            requires_credential: false,
            icon: "phone".to_string(),
        }];
        let output = formatter.format_providers(&providers).unwrap();
        assert!(output.contains("Phone Number Analysis"));
        assert!(output.contains("phone"));

        let quiet = Formatter::new(OutputFormat::Quiet, false);
        assert_eq!(quiet.format_providers(&providers).unwrap(), "Phone Number Analysis");
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let msg = formatter.success("test");
        assert_eq!(msg, "✓ test");
    }
}
