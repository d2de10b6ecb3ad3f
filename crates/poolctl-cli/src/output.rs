//! Output renderers and formatting helpers for CLI commands.

use anyhow::anyhow;
use poolctl_attr::catalog::{self, AttributeDefinition, ValueKind};
use poolctl_attr::codec::{self, ResolvedAttribute};
use poolctl_attr::error::AttrError;
use poolctl_attr::types;
use poolctl_data::AttributeRecord;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::context::{CliError, CliResult};

/// Type-code label: the well-known name, or the numeric code in parentheses.
pub(crate) fn type_label(code: u16) -> String {
    types::name(code).map_or_else(|| format!("({code})"), str::to_string)
}

pub(crate) fn describe_attr_error(err: &AttrError) -> String {
    match err {
        AttrError::UnknownAttribute { keyword } => {
            format!("the {keyword} attribute is not recognized")
        }
        AttrError::TypeMismatch { keyword, expected } => {
            format!("the {keyword} attribute requires {} value", expected.describe())
        }
        AttrError::Encoding {
            keyword,
            value: Some(value),
            reason,
        } => format!("invalid value '{value}' for the {keyword} attribute: {reason}"),
        AttrError::Encoding {
            keyword,
            value: None,
            reason,
        } => format!("the {keyword} attribute {reason}"),
    }
}

pub(crate) fn describe_deleted(keyword: &str, record: &AttributeRecord) -> String {
    let rendered = codec::display_value(record.type_code, &record.value);
    match record_kind(record.type_code) {
        ValueKind::Address => format!("deleted {keyword} server {rendered}"),
        ValueKind::String => format!(
            "deleted {keyword} attribute ({}) with value '{rendered}'.",
            type_label(record.type_code)
        ),
        ValueKind::Subnet => format!(
            "deleted {keyword} attribute ({}) with value {rendered}.",
            type_label(record.type_code)
        ),
        ValueKind::Hex => format!(
            "deleted {keyword} attribute ({}) with value 0x{rendered}.",
            type_label(record.type_code)
        ),
    }
}

pub(crate) fn describe_no_match(keyword: &str, resolved: &ResolvedAttribute) -> String {
    if resolved.blob.is_empty() {
        if resolved.type_code_v6.is_none() {
            format!(
                "no {keyword} attribute ({}) was found",
                type_label(resolved.type_code)
            )
        } else {
            format!("no {keyword} attribute was found")
        }
    } else if resolved.kind == ValueKind::Address {
        format!(
            "the {keyword} server {} was not found",
            codec::display_value(resolved.type_code, &resolved.blob)
        )
    } else {
        format!(
            "the {keyword} attribute ({}) with value '{}' was not found",
            type_label(resolved.type_code),
            codec::display_value(resolved.type_code, &resolved.blob)
        )
    }
}

pub(crate) fn describe_definition(def: &AttributeDefinition) -> String {
    let names = def.type_code_v6.map_or_else(
        || type_label(def.type_code),
        |v6| format!("{}, {}", type_label(def.type_code), type_label(v6)),
    );
    format!("{:<19}  {:<7}  ({names})", def.keyword, def.kind.label())
}

#[derive(Serialize)]
struct AttributeRow {
    id: i64,
    type_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'static str>,
    value: String,
    value_hex: String,
}

impl AttributeRow {
    fn from_record(record: &AttributeRecord) -> Self {
        Self {
            id: record.id,
            type_code: record.type_code,
            name: types::name(record.type_code),
            value: codec::display_value(record.type_code, &record.value),
            value_hex: hex::encode(&record.value),
        }
    }
}

pub(crate) fn render_attribute_list(
    records: &[AttributeRecord],
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => {
            let rows: Vec<AttributeRow> =
                records.iter().map(AttributeRow::from_record).collect();
            let text = serde_json::to_string_pretty(&rows)
                .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
            println!("{text}");
        }
        OutputFormat::Table => {
            if records.is_empty() {
                return Ok(());
            }
            println!(" type  description          value");
            for record in records {
                println!(
                    "{:>5}  {:<20} {}",
                    record.type_code,
                    types::name(record.type_code).unwrap_or(""),
                    codec::display_value(record.type_code, &record.value)
                );
            }
        }
    }
    Ok(())
}

fn record_kind(code: u16) -> ValueKind {
    catalog::lookup_by_code(code).map_or(ValueKind::Hex, |def| def.kind)
}
