use serde_json::json;

use super::core::PageSession;
use super::frame::{download_script, js_str, select_option_script, set_value_script};
use crate::cdp::CdpError;

#[test]
fn test_js_str_escapes_quotes() {
    assert_eq!(js_str("select#complex"), r#""select#complex""#);
    assert_eq!(js_str(r#"a[href*=".pdf"]"#), r#""a[href*=\".pdf\"]""#);
    assert_eq!(js_str("line\nbreak"), r#""line\nbreak""#);
}

#[test]
fn test_select_option_script_embeds_literals() {
    let script = select_option_script("select[name='est']", "Saket Court Complex");
    assert!(script.contains(r#"document.querySelector("select[name='est']")"#));
    assert!(script.contains(r#""Saket Court Complex".trim()"#));
    assert!(script.contains("dispatchEvent(new Event('change'"));
}

#[test]
fn test_set_value_script_escapes_value() {
    let script = set_value_script("#date", "17-10-2026\"; alert(1); \"");
    assert!(script.contains(r#"el.value = "17-10-2026\"; alert(1); \"";"#));
}

#[test]
fn test_download_script_uses_anchor() {
    let script = download_script("https://example.org/list.pdf");
    assert!(script.contains(r#"a.href = "https://example.org/list.pdf";"#));
    assert!(script.contains("a.download = ''"));
}

#[test]
fn test_unwrap_evaluation_value() {
    let result = json!({"result": {"type": "string", "value": "complete"}});
    let value = PageSession::unwrap_evaluation(result).unwrap();
    assert_eq!(value, "complete");
}

#[test]
fn test_unwrap_evaluation_exception() {
    let result = json!({
        "result": {"type": "object", "subtype": "error"},
        "exceptionDetails": {
            "text": "Uncaught",
            "exception": {"description": "TypeError: sel is null"}
        }
    });
    let err = PageSession::unwrap_evaluation(result).unwrap_err();
    assert!(matches!(err, CdpError::JavaScript(ref m) if m.contains("sel is null")));
}
