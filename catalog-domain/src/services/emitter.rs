//! Projection of catalog items into a Lua items file.
//!
//! The output is a chunk of the form `return { ['name'] = { ... }, ... }`.
//! Fields are written in a fixed order and only when they carry a value, so
//! the same input always produces byte-identical text.

use serde_json::{Number, Value};

use crate::entities::{ClientData, ExportReport, Item, ItemButton, NumericValue, ServerData};
use crate::error::CatalogError;
use crate::services::lua_writer::{LuaKey, LuaWriter};
use crate::services::validation::ItemValidator;
use crate::value_objects::{AssetRef, ValidationPolicy};

pub const EXPORT_FILENAME: &str = "items.lua";
pub const EXPORT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Renders `items` in input order.
///
/// `base_url` is the scheme and authority every `imageurl` is rebased onto.
/// Items failing validation are skipped or abort the export according to
/// `policy`.
pub fn emit_items(
    items: &[Item],
    base_url: &str,
    policy: ValidationPolicy,
) -> Result<ExportReport, CatalogError> {
    let mut validator = ItemValidator::default();
    let mut writer = LuaWriter::returning_table();
    let mut skipped = Vec::new();
    let mut emitted = 0;

    for (index, item) in items.iter().enumerate() {
        if let Err(issue) = validator.check(index, item) {
            match policy {
                ValidationPolicy::Abort => return Err(CatalogError::Validation(issue)),
                ValidationPolicy::Skip => {
                    skipped.push(issue);
                    continue;
                }
            }
        }
        write_item(&mut writer, item, base_url);
        emitted += 1;
    }

    Ok(ExportReport {
        text: writer.finish(),
        emitted,
        skipped,
    })
}

fn write_item(writer: &mut LuaWriter, item: &Item, base_url: &str) {
    writer.open_table(LuaKey::Bracketed(item.name.trim()));
    writer.string_field(LuaKey::Ident("label"), item.label.trim());
    number_field(writer, "weight", item.weight.as_ref());
    number_field(writer, "degrade", item.degrade.as_ref());
    number_field(writer, "consume", item.consume.as_ref());
    if item.stack == Some(true) {
        writer.bool_field(LuaKey::Ident("stack"), true);
    }
    if let Some(client) = &item.client {
        write_client(writer, client, base_url);
    }
    if let Some(server) = &item.server {
        write_server(writer, server);
    }
    write_buttons(writer, &item.buttons);
    writer.close_table();
}

fn write_client(writer: &mut LuaWriter, client: &ClientData, base_url: &str) {
    writer.open_table(LuaKey::Ident("client"));
    text_field(writer, "anim", client.anim.as_deref());
    text_field(writer, "prop", client.prop.as_deref());
    number_field(writer, "usetime", client.usetime.as_ref());
    text_field(writer, "notification", client.notification.as_deref());
    text_field(writer, "image", client.image.as_deref());
    if let Some(asset) = client.imageurl.as_deref().and_then(AssetRef::parse) {
        writer.string_field(LuaKey::Ident("imageurl"), &asset.rebase(base_url));
    }
    writer.open_table(LuaKey::Ident("status"));
    for (key, value) in &client.status {
        if let Some(token) = status_token(value) {
            writer.raw_field(LuaKey::auto(key), &token);
        }
    }
    writer.close_table();
    writer.close_table();
}

fn write_server(writer: &mut LuaWriter, server: &ServerData) {
    writer.open_table(LuaKey::Ident("server"));
    text_field(writer, "export", server.export.as_deref());
    writer.close_table();
}

fn write_buttons(writer: &mut LuaWriter, buttons: &[ItemButton]) {
    writer.open_table(LuaKey::Ident("buttons"));
    for button in buttons {
        writer.open_element();
        text_field(writer, "label", Some(button.label.as_str()));
        text_field(writer, "group", Some(button.group.as_str()));
        text_field(writer, "action", Some(button.action.as_str()));
        writer.close_table();
    }
    writer.close_table();
}

fn text_field(writer: &mut LuaWriter, key: &str, value: Option<&str>) {
    if let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) {
        writer.string_field(LuaKey::Ident(key), value);
    }
}

fn number_field(writer: &mut LuaWriter, key: &str, value: Option<&NumericValue>) {
    if let Some(number) = value
        .and_then(NumericValue::as_number)
        .filter(|number| !is_zero(number))
    {
        writer.raw_field(LuaKey::Ident(key), &number.to_string());
    }
}

fn is_zero(number: &Number) -> bool {
    number.as_f64().map(|value| value == 0.0).unwrap_or(false)
}

/// Status values are trusted expressions and are written unquoted.
fn status_token(value: &Value) -> Option<String> {
    match value {
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::String(expr) => {
            let expr = expr.trim();
            if expr.is_empty() {
                None
            } else {
                Some(expr.to_string())
            }
        }
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
