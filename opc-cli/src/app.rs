use crate::ui;
use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use opc_da_properties::{
    StatusCode, TagPropertyProvider, VariantType, WellKnownProperty, quality_to_string,
};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

/// Query normalized OPC DA tag properties.
#[derive(Debug, Parser)]
#[command(name = "opc-cli", version, about)]
pub struct Cli {
    /// JSON simulation fixture used as the data source.
    #[arg(short, long, global = true)]
    pub source: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Show the normalized properties of a tag.
    Properties {
        tag: String,
        /// Restrict to these properties (numeric id or name, e.g. `quality`).
        #[arg(short, long = "property", value_parser = parse_property_id)]
        properties: Vec<u32>,
    },
    /// List the properties a tag advertises.
    Catalog { tag: String },
    /// Decode the quality bits of a packed OPC status word.
    Quality {
        #[arg(value_parser = parse_number::<u16>)]
        status: u16,
    },
    /// Resolve a variant type code to its name, or a name to its code.
    Vt { code_or_name: String },
    /// Describe a per-item status code.
    ErrorString {
        #[arg(value_parser = parse_number::<u32>)]
        code: u32,
    },
}

/// Accepts a numeric property id or a well-known property name.
fn parse_property_id(s: &str) -> Result<u32, String> {
    if let Ok(id) = s.trim().parse::<u32>() {
        return Ok(id);
    }
    s.parse::<WellKnownProperty>()
        .map(WellKnownProperty::id)
        .map_err(|e| e.to_string())
}

/// Parses decimal or `0x`-prefixed hexadecimal numbers.
fn parse_number<T>(s: &str) -> Result<T, String>
where
    T: TryFrom<u64>,
{
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse::<u64>(),
    }
    .map_err(|e| format!("'{s}' is not a number: {e}"))?;
    T::try_from(parsed).map_err(|_| format!("'{s}' is out of range"))
}

/// Executes CLI commands against an optional property provider.
///
/// Commands that decode values locally (`quality`, `vt`) work without a
/// data source.
pub struct App {
    provider: Option<Arc<dyn TagPropertyProvider>>,
    format: OutputFormat,
}

impl App {
    pub fn new(provider: Option<Arc<dyn TagPropertyProvider>>, format: OutputFormat) -> Self {
        Self { provider, format }
    }

    fn provider(&self) -> Result<&dyn TagPropertyProvider> {
        self.provider
            .as_deref()
            .ok_or_else(|| anyhow!("This command needs a data source; pass --source <FILE>"))
    }

    pub async fn execute<W: Write>(&self, command: &Command, out: &mut W) -> Result<()> {
        match command {
            Command::Properties { tag, properties } => {
                let result = self
                    .provider()?
                    .get_tag_properties(tag, properties.clone())
                    .await
                    .with_context(|| format!("Failed to read properties of '{tag}'"))?;
                tracing::info!(tag = %tag, count = result.properties.len(), "Properties read");
                ui::render_properties(out, &result, self.format)?;
            }
            Command::Catalog { tag } => {
                let descriptors = self
                    .provider()?
                    .available_properties(tag)
                    .await
                    .with_context(|| format!("Failed to read property catalog of '{tag}'"))?;
                ui::render_catalog(out, &descriptors, self.format)?;
            }
            Command::Quality { status } => {
                ui::render_quality(out, *status, quality_to_string(*status), self.format)?;
            }
            Command::Vt { code_or_name } => {
                let vt = match parse_number::<u16>(code_or_name) {
                    Ok(code) => VariantType::try_from(code)?,
                    Err(_) => code_or_name.parse::<VariantType>()?,
                };
                ui::render_variant_type(out, vt, self.format)?;
            }
            Command::ErrorString { code } => {
                let code = StatusCode(*code);
                let text = self.provider()?.error_string(code).await?;
                ui::render_error_string(out, code, &text, self.format)?;
            }
        }
        Ok(())
    }
}
