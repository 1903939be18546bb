// Modello della risposta del servizio di estrazione
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The only `status` value the service uses for a successful extraction.
pub const RECEIVED_STATUS: &str = "received";
/// Shown when a rejected reply carries no usable `message`.
pub const UNKNOWN_ERROR: &str = "desconocido";

const FIELD_PREFIX: &str = "pdf_";

/// Why an upload did not produce an [`ExtractionResponse`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExtractionError {
    /// The service answered, but not with `status == "received"` (or with a non-2xx code).
    #[error("extraction rejected: {}", .message.as_deref().unwrap_or(UNKNOWN_ERROR))]
    Rejected { message: Option<String> },
    /// Network, timeout, unreadable file or undecodable body.
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("request cancelled")]
    Cancelled,
}

#[derive(Debug, Deserialize)]
struct ReceivedBody {
    status: String,
    #[serde(default)]
    resultado: Option<Map<String, Value>>,
    #[serde(default)]
    errores: Option<Map<String, Value>>,
}

/// Parsed body of a successful extraction.
///
/// `errores` is total over the keys of `resultado`: every extracted field has an
/// explicit boolean, missing entries are filled with `false` when decoding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resultado: Option<Map<String, Value>>,
    pub errores: Map<String, Value>,
}

/// One rendered/exported line of the results table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRow {
    pub key: String,
    pub label: String,
    pub value: String,
    pub has_error: bool,
}

impl ExtractionResponse {
    /// Decode a `"received"` body. Key order of `resultado` is the server's.
    pub fn from_body(body: Value) -> Result<Self, serde_json::Error> {
        let raw: ReceivedBody = serde_json::from_value(body)?;
        let errores = total_error_map(raw.resultado.as_ref(), raw.errores.unwrap_or_default());
        Ok(Self {
            status: raw.status,
            resultado: raw.resultado,
            errores,
        })
    }

    pub fn has_error(&self, key: &str) -> bool {
        self.errores.get(key).map(is_truthy).unwrap_or(false)
    }

    pub fn rows(&self) -> Vec<FieldRow> {
        let Some(resultado) = &self.resultado else {
            return Vec::new();
        };
        resultado
            .iter()
            .map(|(key, value)| FieldRow {
                key: key.clone(),
                label: field_label(key),
                value: display_value(value),
                has_error: self.has_error(key),
            })
            .collect()
    }

    /// Number of extracted fields flagged as failed.
    pub fn error_count(&self) -> usize {
        self.rows().iter().filter(|r| r.has_error).count()
    }

    /// Keys of the extracted fields flagged as failed, in server order.
    pub fn failed_fields(&self) -> Vec<String> {
        self.rows().into_iter().filter(|r| r.has_error).map(|r| r.key).collect()
    }

    pub fn error_summary(&self) -> String {
        match self.error_count() {
            0 => "No se encontraron errores de captura".to_string(),
            1 => "Se encontró 1 campo con errores".to_string(),
            n => format!("Se encontraron {} campos con errores", n),
        }
    }
}

/// `pdf_invoice_date` -> `invoice date`. Only the first `pdf_` and the first `_`
/// are substituted, so `pdf_due_date_iso` becomes `due date_iso`.
pub fn field_label(key: &str) -> String {
    key.replacen(FIELD_PREFIX, "", 1).replacen('_', " ", 1)
}

/// String form of an extracted scalar; strings are shown without quotes.
/// Whole floats drop their fraction (`1500.0` -> `1500`).
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) if n.is_f64() => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 => {
                (f as i64).to_string()
            }
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

/// Loose truthiness used by the service for error flags.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn total_error_map(resultado: Option<&Map<String, Value>>, errores: Map<String, Value>) -> Map<String, Value> {
    let mut total: Map<String, Value> = errores
        .into_iter()
        .map(|(key, flag)| {
            let flag = is_truthy(&flag);
            (key, Value::Bool(flag))
        })
        .collect();
    if let Some(resultado) = resultado {
        for key in resultado.keys() {
            if !total.contains_key(key) {
                total.insert(key.clone(), Value::Bool(false));
            }
        }
    }
    total
}

/// Human-readable `message` of a rejected reply, if the body has one.
pub fn reply_message(body: &Value) -> Option<String> {
    match body.get("message")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        Value::Array(_) | Value::Object(_) => body.get("message").map(Value::to_string),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> ExtractionResponse {
        ExtractionResponse::from_body(json!({
            "status": "received",
            "resultado": {"pdf_total": "100", "pdf_date": "2024-01-01"},
            "errores": {"pdf_total": true}
        }))
        .unwrap()
    }

    #[test]
    fn rows_follow_server_order_with_error_flags() {
        let rows = sample().rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].label, "total");
        assert_eq!(rows[0].value, "100");
        assert!(rows[0].has_error);
        assert_eq!(rows[1].label, "date");
        assert_eq!(rows[1].value, "2024-01-01");
        assert!(!rows[1].has_error);
    }

    #[test]
    fn missing_error_entries_become_explicit_false() {
        let response = sample();
        assert_eq!(response.errores.get("pdf_date"), Some(&Value::Bool(false)));
        assert_eq!(response.errores.get("pdf_total"), Some(&Value::Bool(true)));
    }

    #[test]
    fn label_only_substitutes_first_occurrence() {
        assert_eq!(field_label("pdf_invoice_number"), "invoice number");
        assert_eq!(field_label("pdf_due_date_iso"), "due date_iso");
        assert_eq!(field_label("total_pdf_amount"), "total amount");
        assert_eq!(field_label("plain"), "plain");
    }

    #[test]
    fn non_string_scalars_use_json_text() {
        assert_eq!(display_value(&json!(12.5)), "12.5");
        assert_eq!(display_value(&json!(true)), "true");
        assert_eq!(display_value(&Value::Null), "null");
    }

    #[test]
    fn whole_amounts_render_without_fraction() {
        assert_eq!(display_value(&json!(1500.0)), "1500");
        assert_eq!(display_value(&json!(-3.0)), "-3");
        assert_eq!(display_value(&json!(1500)), "1500");
        assert_eq!(display_value(&json!(1500.25)), "1500.25");

        let response = ExtractionResponse::from_body(json!({
            "status": "received",
            "resultado": {"pdf_total": 1500.0, "pdf_sub_total": 1293.1},
            "errores": {}
        }))
        .unwrap();
        let rows = response.rows();
        assert_eq!(rows[0].value, "1500");
        assert_eq!(rows[1].value, "1293.1");
    }

    #[test]
    fn failed_fields_lists_flagged_keys() {
        let response = ExtractionResponse::from_body(json!({
            "status": "received",
            "resultado": {"pdf_rfc": "X", "pdf_total": "1", "pdf_date": "2024-01-01"},
            "errores": {"pdf_rfc": true, "pdf_date": true}
        }))
        .unwrap();
        assert_eq!(response.failed_fields(), vec!["pdf_rfc".to_string(), "pdf_date".to_string()]);
        assert_eq!(response.error_summary(), "Se encontraron 2 campos con errores");
        assert!(sample().failed_fields() == vec!["pdf_total".to_string()]);
    }

    #[test]
    fn error_flags_are_coerced_by_truthiness() {
        let response = ExtractionResponse::from_body(json!({
            "status": "received",
            "resultado": {"pdf_a": 1, "pdf_b": 2, "pdf_c": 3, "pdf_d": 4},
            "errores": {"pdf_a": 1, "pdf_b": 0, "pdf_c": "", "pdf_d": null}
        }))
        .unwrap();
        assert!(response.has_error("pdf_a"));
        assert!(!response.has_error("pdf_b"));
        assert!(!response.has_error("pdf_c"));
        assert!(!response.has_error("pdf_d"));
    }

    #[test]
    fn body_without_resultado_has_no_rows() {
        let response = ExtractionResponse::from_body(json!({"status": "received"})).unwrap();
        assert!(response.resultado.is_none());
        assert!(response.rows().is_empty());
        assert!(response.errores.is_empty());
    }

    #[test]
    fn summary_counts_failed_fields() {
        assert_eq!(sample().error_summary(), "Se encontró 1 campo con errores");
        let clean = ExtractionResponse::from_body(json!({
            "status": "received",
            "resultado": {"pdf_total": "1"}
        }))
        .unwrap();
        assert_eq!(clean.error_summary(), "No se encontraron errores de captura");
    }

    #[test]
    fn reply_message_ignores_empty_values() {
        assert_eq!(reply_message(&json!({"message": "bad scan"})).as_deref(), Some("bad scan"));
        assert_eq!(reply_message(&json!({"message": ""})), None);
        assert_eq!(reply_message(&json!({"status": "error"})), None);
    }

    #[test]
    fn rejected_error_displays_default_token() {
        let err = ExtractionError::Rejected { message: None };
        assert!(err.to_string().contains(UNKNOWN_ERROR));
    }
}
