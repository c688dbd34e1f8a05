use crate::app::OutputFormat;
use anyhow::Result;
use comfy_table::presets::NOTHING;
use comfy_table::{ContentArrangement, Table};
use opc_da_properties::{PropertyDescriptor, StatusCode, TagProperties, VariantType};
use serde::Serialize;
use serde_json::json;
use std::io::Write;

const COLUMN_GAP: &str = "  ";

/// Borderless table; columns are left-aligned and never wrapped.
fn new_table(header: Vec<&'static str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(NOTHING)
        .set_content_arrangement(ContentArrangement::Disabled)
        .set_header(header);
    table
}

fn write_table<W: Write>(out: &mut W, table: &Table) -> Result<()> {
    for line in table.lines() {
        let line = line.trim_end();
        if !line.is_empty() {
            writeln!(out, "{line}")?;
        }
    }
    Ok(())
}

fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn type_cell(code: u16) -> String {
    VariantType::try_from(code).map_or_else(|_| format!("unknown ({code})"), |vt| vt.to_string())
}

pub fn render_properties<W: Write>(
    out: &mut W,
    result: &TagProperties,
    format: OutputFormat,
) -> Result<()> {
    if format == OutputFormat::Json {
        return write_json(out, result);
    }

    let mut table = new_table(vec!["ID", "DESCRIPTION", "TYPE", "VALUE"]);
    for property in &result.properties {
        table.add_row(vec![
            property.id.to_string(),
            property.description.clone(),
            property
                .data_type
                .map_or_else(|| "-".to_string(), |vt| vt.to_string()),
            property.value.to_string(),
        ]);
    }
    write_table(out, &table)?;

    let failed: Vec<(usize, StatusCode)> = result
        .errors
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, code)| !code.is_ok())
        .collect();
    if !failed.is_empty() {
        writeln!(out)?;
        writeln!(out, "Item errors:")?;
        for (index, code) in failed {
            writeln!(out, "  #{index}: {code}")?;
        }
    }
    Ok(())
}

pub fn render_catalog<W: Write>(
    out: &mut W,
    descriptors: &[PropertyDescriptor],
    format: OutputFormat,
) -> Result<()> {
    if format == OutputFormat::Json {
        return write_json(out, descriptors);
    }

    let mut table = new_table(vec!["ID", "DESCRIPTION", "TYPE"]);
    for descriptor in descriptors {
        table.add_row(vec![
            descriptor.id.to_string(),
            descriptor.description.clone(),
            type_cell(descriptor.declared_type),
        ]);
    }
    write_table(out, &table)
}

pub fn render_quality<W: Write>(
    out: &mut W,
    status: u16,
    label: &str,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(out, &json!({ "status": status, "quality": label })),
        OutputFormat::Table => {
            writeln!(out, "{label}")?;
            Ok(())
        }
    }
}

pub fn render_variant_type<W: Write>(
    out: &mut W,
    vt: VariantType,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(out, &json!({ "code": vt.code(), "name": vt })),
        OutputFormat::Table => {
            writeln!(out, "{vt} ({})", vt.code())?;
            Ok(())
        }
    }
}

pub fn render_error_string<W: Write>(
    out: &mut W,
    code: StatusCode,
    text: &str,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(out, &json!({ "code": code.0, "text": text })),
        OutputFormat::Table => {
            writeln!(out, "0x{:08X}{COLUMN_GAP}{text}", code.0)?;
            Ok(())
        }
    }
}
