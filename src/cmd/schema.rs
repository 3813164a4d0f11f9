//! Schema command - print expected input formats

use crate::core::{AssessmentConfig, TaxReturnInput, TaxYear};
use clap::Args;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// What to print
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,

    /// Tax year for the built-in configuration (e.g., 2025-26)
    #[arg(short, long, default_value = "2025-26")]
    year: TaxYear,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for the tax return file
    JsonSchema,
    /// JSON Schema for a configuration file
    ConfigSchema,
    /// The built-in configuration, usable as a starting point for --config
    DefaultConfig,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let json = match self.format {
            SchemaFormat::JsonSchema => serde_json::to_string_pretty(&schema_for!(TaxReturnInput))?,
            SchemaFormat::ConfigSchema => {
                serde_json::to_string_pretty(&schema_for!(AssessmentConfig))?
            }
            SchemaFormat::DefaultConfig => {
                serde_json::to_string_pretty(&AssessmentConfig::for_year(self.year)?)?
            }
        };
        println!("{}", json);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn return_schema_names_every_source() {
        let schema = serde_json::to_value(schema_for!(TaxReturnInput)).unwrap();
        let properties = &schema["properties"];
        for field in [
            "tax_year",
            "employment",
            "business",
            "investment",
            "qualifying_payments",
            "tax_payments",
        ] {
            assert!(properties.get(field).is_some(), "missing {field}");
        }
    }
}
