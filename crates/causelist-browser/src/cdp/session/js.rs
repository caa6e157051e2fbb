//! JavaScript execution operations for CDP page session.

use serde_json::{json, Value};

use crate::cdp::error::CdpError;

use super::core::PageSession;

impl PageSession {
    /// Evaluate JavaScript expression in the page's main world.
    pub async fn evaluate(&self, expression: &str) -> Result<Value, CdpError> {
        self.evaluate_in(expression, None).await
    }

    /// Evaluate JavaScript expression, optionally inside a specific
    /// execution context (e.g. an iframe's isolated world).
    pub async fn evaluate_in(
        &self,
        expression: &str,
        context_id: Option<i64>,
    ) -> Result<Value, CdpError> {
        let mut params = json!({
            "expression": expression,
            "returnByValue": true,
            "awaitPromise": true,
        });
        if let Some(id) = context_id {
            params["contextId"] = json!(id);
        }

        let result = self.call("Runtime.evaluate", Some(params)).await?;
        Self::unwrap_evaluation(result)
    }

    /// Turn a `Runtime.evaluate` result into its value, or the exception
    /// it raised.
    pub(super) fn unwrap_evaluation(result: Value) -> Result<Value, CdpError> {
        if let Some(exception) = result.get("exceptionDetails") {
            let text = exception["exception"]["description"]
                .as_str()
                .or_else(|| exception["text"].as_str())
                .unwrap_or("Unknown error");
            return Err(CdpError::JavaScript(text.to_string()));
        }

        Ok(result["result"]["value"].clone())
    }
}
