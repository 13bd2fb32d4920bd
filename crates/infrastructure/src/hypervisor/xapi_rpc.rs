use hypnos_dns_domain::DomainError;
use serde_json::Value;
use std::fmt::Write as _;

/// Wire codec for the XAPI XML-RPC transport: envelope building on the
/// way out, `Status`/`Value` extraction on the way back. Only the value
/// shapes XAPI actually returns are handled (strings, booleans, ints,
/// arrays, structs).

pub fn build_envelope(method: &str, params: &[Value]) -> Result<String, DomainError> {
    let mut body = String::with_capacity(256);
    body.push_str("<?xml version=\"1.0\"?><methodCall><methodName>");
    body.push_str(&escape(method));
    body.push_str("</methodName><params>");

    for param in params {
        body.push_str("<param><value>");
        match param {
            Value::String(s) => {
                let _ = write!(body, "<string>{}</string>", escape(s));
            }
            Value::Bool(b) => {
                let _ = write!(body, "<boolean>{}</boolean>", if *b { 1 } else { 0 });
            }
            Value::Number(n) => {
                let _ = write!(body, "<int>{}</int>", n);
            }
            other => {
                return Err(DomainError::backend(
                    "encoding XML-RPC call",
                    format!("unsupported parameter {:?}", other),
                ));
            }
        }
        body.push_str("</value></param>");
    }

    body.push_str("</params></methodCall>");
    Ok(body)
}

/// Decode a methodResponse and unwrap XAPI's `{Status, Value}` struct.
/// A `Failure` status surfaces the joined `ErrorDescription`.
pub fn parse_response(xml: &str) -> Result<Value, DomainError> {
    let doc = roxmltree::Document::parse(xml)
        .map_err(|e| DomainError::backend("parsing XML-RPC response", e))?;

    let value_node = doc
        .descendants()
        .find(|n| n.has_tag_name("param"))
        .and_then(|param| param.children().find(|n| n.has_tag_name("value")))
        .ok_or_else(|| {
            DomainError::backend("parsing XML-RPC response", "no parameter value in response")
        })?;

    let envelope = decode_value(value_node);
    let Value::Object(fields) = &envelope else {
        return Err(DomainError::backend(
            "parsing XML-RPC response",
            "response is not a Status/Value struct",
        ));
    };

    match fields.get("Status").and_then(Value::as_str) {
        Some("Success") => Ok(fields.get("Value").cloned().unwrap_or(Value::Null)),
        Some(_) => {
            let description = fields
                .get("ErrorDescription")
                .and_then(Value::as_array)
                .map(|parts| {
                    parts
                        .iter()
                        .filter_map(Value::as_str)
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .unwrap_or_else(|| "unknown failure".to_string());
            Err(DomainError::backend("XAPI call failed", description))
        }
        None => Err(DomainError::backend(
            "parsing XML-RPC response",
            "response carries no Status field",
        )),
    }
}

fn decode_value(value_node: roxmltree::Node<'_, '_>) -> Value {
    let Some(typed) = value_node.children().find(|n| n.is_element()) else {
        // An untyped <value> is a string per XML-RPC.
        return Value::String(value_node.text().unwrap_or_default().to_string());
    };

    let text = || typed.text().unwrap_or_default();
    match typed.tag_name().name() {
        "string" => Value::String(text().to_string()),
        "boolean" => Value::Bool(text().trim() == "1"),
        "int" | "i4" => text()
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or(Value::Null),
        "double" => text()
            .trim()
            .parse::<f64>()
            .map(Value::from)
            .unwrap_or(Value::Null),
        "array" => {
            let items = typed
                .children()
                .find(|n| n.has_tag_name("data"))
                .map(|data| {
                    data.children()
                        .filter(|n| n.has_tag_name("value"))
                        .map(decode_value)
                        .collect()
                })
                .unwrap_or_default();
            Value::Array(items)
        }
        "struct" => {
            let mut fields = serde_json::Map::new();
            for member in typed.children().filter(|n| n.has_tag_name("member")) {
                let name = member
                    .children()
                    .find(|n| n.has_tag_name("name"))
                    .and_then(|n| n.text())
                    .unwrap_or_default()
                    .to_string();
                let value = member
                    .children()
                    .find(|n| n.has_tag_name("value"))
                    .map(decode_value)
                    .unwrap_or(Value::Null);
                fields.insert(name, value);
            }
            Value::Object(fields)
        }
        _ => Value::String(text().to_string()),
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
