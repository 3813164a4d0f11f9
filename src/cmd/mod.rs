pub mod assess;
pub mod html;
pub mod income;
pub mod schema;
pub mod validate;

use crate::core::{read_config_json, read_return_json, AssessmentConfig, TaxReturnInput, TaxYear};
use anyhow::Context;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

/// Options shared by every command that reads a return
#[derive(clap::Args, Debug)]
pub struct ReturnArgs {
    /// Tax return file (JSON). Use "-" to read from stdin.
    #[arg(short, long, default_value = "-")]
    pub input: PathBuf,

    /// Override the tax year in the return file (e.g., 2025-26)
    #[arg(short, long)]
    pub year: Option<TaxYear>,
}

impl ReturnArgs {
    pub fn read(&self) -> anyhow::Result<TaxReturnInput> {
        let mut input = read_return(&self.input)?;
        if let Some(year) = self.year {
            input.tax_year = year;
        }
        Ok(input)
    }
}

/// Read a return file (or stdin with "-")
pub fn read_return(path: &Path) -> anyhow::Result<TaxReturnInput> {
    if path.as_os_str() == "-" {
        read_from_stdin()
    } else {
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        read_return_json(BufReader::new(file))
            .with_context(|| format!("reading return from {}", path.display()))
    }
}

fn read_from_stdin() -> anyhow::Result<TaxReturnInput> {
    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin.lock());

    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;

    if buffer.is_empty() {
        anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
    }

    read_return_json(io::Cursor::new(buffer))
}

/// Read and validate a configuration file
pub fn read_config(path: &Path) -> anyhow::Result<AssessmentConfig> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let config = read_config_json(BufReader::new(file))
        .with_context(|| format!("invalid configuration in {}", path.display()))?;
    log::info!("Loaded configuration for {} from {}", config.tax_year, path.display());
    Ok(config)
}

/// Parameters for `tax_year`: the loaded configuration, else the built-in table
pub fn config_for(
    loaded: Option<&AssessmentConfig>,
    tax_year: TaxYear,
) -> anyhow::Result<AssessmentConfig> {
    match loaded {
        Some(config) => {
            config.check_year(tax_year)?;
            Ok(config.clone())
        }
        None => Ok(AssessmentConfig::for_year(tax_year)?),
    }
}
