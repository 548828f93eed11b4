use crate::dom::{ElementNode, Page};
use crate::error::{BackupError, Result};
use headless_chrome::Tab;
use serde_json::Value;
use std::sync::Arc;

/// A live browser tab
pub struct TabPage {
    tab: Arc<Tab>,
}

impl TabPage {
    pub fn new(tab: Arc<Tab>) -> Self {
        Self { tab }
    }

    fn evaluate(&self, expression: &str) -> Result<Option<Value>> {
        let result = self
            .tab
            .evaluate(expression, false)
            .map_err(|e| BackupError::EvaluationFailed(e.to_string()))?;
        Ok(result.value.filter(|v| !v.is_null()))
    }
}

/// Call the snapshot function with `selector` as a JS string literal
fn query_expression(selector: &str) -> Result<String> {
    let js_fn = include_str!("query_nodes.js");
    Ok(format!("({})({})", js_fn.trim_end(), serde_json::to_string(selector)?))
}

fn height_expression(selector: &str) -> Result<String> {
    Ok(format!(
        "(function(s) {{ const el = document.querySelector(s); return el ? el.scrollHeight : null; }})({})",
        serde_json::to_string(selector)?
    ))
}

/// The snapshot script returns a JSON string; decode it into nodes
fn parse_nodes(value: Value) -> Result<Vec<ElementNode>> {
    let json_str: String = serde_json::from_value(value)
        .map_err(|e| BackupError::DomParseFailed(format!("Failed to get JSON string: {}", e)))?;

    serde_json::from_str(&json_str).map_err(|e| BackupError::DomParseFailed(format!("Failed to parse nodes: {}", e)))
}

impl Page for TabPage {
    fn query_all(&self, selector: &str) -> Result<Vec<ElementNode>> {
        let value = self
            .evaluate(&query_expression(selector)?)?
            .ok_or_else(|| BackupError::DomParseFailed("No value returned from node query".to_string()))?;
        parse_nodes(value)
    }

    fn scroll_by(&self, pixels: i64) -> Result<()> {
        self.evaluate(&format!("window.scrollBy({{ top: {}, left: 0, behavior: 'instant' }})", pixels))?;
        Ok(())
    }

    fn scroll_height(&self, selector: &str) -> Result<Option<f64>> {
        Ok(self.evaluate(&height_expression(selector)?)?.and_then(|v| v.as_f64()))
    }

    fn current_url(&self) -> Result<String> {
        Ok(self.tab.get_url())
    }
}
