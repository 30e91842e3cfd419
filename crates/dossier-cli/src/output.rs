//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use dossier_domain::{ClientProfile, Competitor, CompetitorKind, Priority, SourceTier};
use dossier_extractor::{ParseResult, WarningLevel};
use dossier_gatekeeper::{Severity, ValidationResult};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

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

    /// Format a parse result.
    pub fn format_result(&self, result: &ParseResult) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(result.to_json()?),
            OutputFormat::Table => Ok(self.format_result_table(result)),
            OutputFormat::Quiet => Ok(format!(
                "{}\t{:.2}",
                result.data.client_name, result.confidence.overall
            )),
        }
    }

    fn format_result_table(&self, result: &ParseResult) -> String {
        let mut out = vec![profile_table(&result.data)];

        let mut summary = format!(
            "Confidence: {:.2} | Type: {} | Sections: {}",
            result.confidence.overall, result.document_type, result.metadata.section_count
        );
        if let Some(heuristic) = &result.metadata.fallback_heuristic {
            summary.push_str(&format!(" | Fallback: {}", heuristic));
        }
        if result.metadata.from_cache {
            summary.push_str(" | Cached");
        }
        out.push(self.colorize(&summary, "cyan"));

        for warning in &result.warnings {
            let mut line = match warning.level {
                WarningLevel::Error => self.error(&warning.message),
                WarningLevel::Warning => self.warning(&warning.message),
                WarningLevel::Info => self.info(&warning.message),
            };
            if let Some(suggestion) = &warning.suggestion {
                line.push_str(&format!("\n    {}", suggestion));
            }
            out.push(line);
        }

        let issues = result.validation.issues.len();
        out.push(if result.validation.is_valid {
            self.success(&format!("Valid (score {:.2}, {} issue(s))", result.validation.score, issues))
        } else {
            self.error(&format!("Invalid (score {:.2}, {} issue(s))", result.validation.score, issues))
        });
        out.join("\n")
    }

    /// Format a validation result.
    pub fn format_validation(&self, validation: &ValidationResult) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(validation)?),
            OutputFormat::Quiet => Ok(if validation.is_valid { "valid" } else { "invalid" }.to_string()),
            OutputFormat::Table => Ok(self.format_validation_table(validation)),
        }
    }

    fn format_validation_table(&self, validation: &ValidationResult) -> String {
        let verdict = if validation.is_valid {
            self.success(&format!("Valid (score {:.2})", validation.score))
        } else {
            self.error(&format!("Invalid (score {:.2})", validation.score))
        };
        if validation.issues.is_empty() {
            return verdict;
        }

        let mut builder = Builder::default();
        builder.push_record(["Severity", "Field", "Message", "Suggestion"]);
        for issue in &validation.issues {
            let severity = match issue.severity {
                Severity::Error => self.colorize("error", "red"),
                Severity::Warning => self.colorize("warning", "yellow"),
            };
            builder.push_record([
                severity,
                issue.field.map(|f| f.to_string()).unwrap_or_default(),
                issue.message.clone(),
                issue.suggestion.clone().unwrap_or_default(),
            ]);
        }
        format!("{}\n{}", styled(builder), verdict)
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

fn styled(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

/// Render a profile as a two-column table; empty fields are listed as "-".
fn profile_table(profile: &ClientProfile) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);

    let mut row = |name: &str, value: String| {
        let value = if value.is_empty() { "-".to_string() } else { value };
        builder.push_record([name.to_string(), value]);
    };

    row("Client", profile.client_name.clone());
    row("Industry", profile.industry.clone());
    row("Products", profile.products.join(", "));
    row(
        "Executives",
        profile
            .executives
            .iter()
            .map(|e| {
                if e.role.is_empty() {
                    e.name.clone()
                } else {
                    format!("{} ({})", e.name, e.role)
                }
            })
            .collect::<Vec<_>>()
            .join("; "),
    );
    row(
        "Competitors",
        profile.competitors.iter().map(format_competitor).collect::<Vec<_>>().join(", "),
    );
    row("Excluded topics", profile.excluded_topics.join(", "));
    for tier in SourceTier::ALL {
        row(&format!("Sources: {}", tier), profile.sources.get(tier).join(", "));
    }
    row("Schedule", profile.briefing.schedule.clone());
    row("Audience", profile.briefing.audience.clone());
    row("Frequency", profile.briefing.frequency.clone());
    row(
        "Contacts",
        profile
            .contacts
            .iter()
            .map(|c| match (c.name.is_empty(), c.email.is_empty()) {
                (false, false) => format!("{} <{}>", c.name, c.email),
                (true, _) => c.email.clone(),
                (false, true) => c.name.clone(),
            })
            .collect::<Vec<_>>()
            .join("; "),
    );

    styled(builder)
}

fn format_competitor(competitor: &Competitor) -> String {
    let kind = match competitor.kind {
        CompetitorKind::Direct => "direct",
        CompetitorKind::Indirect => "indirect",
    };
    let priority = match competitor.priority {
        Priority::High => "high",
        Priority::Medium => "medium",
        Priority::Low => "low",
    };
    format!("{} [{}/{}]", competitor.name, kind, priority)
}
