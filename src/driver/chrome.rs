use crate::driver::{Driver, DriverError, DriverResult, How};
use headless_chrome::Tab;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::cell::Cell;
use std::sync::Arc;

/// Page-side handle registry and finders, evaluated once per driver call
const LOCATOR_SCRIPT: &str = include_str!("locator.js");

/// Index of a node in the page-side registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChromeHandle(pub u64);

#[derive(Debug, Deserialize)]
struct Reply {
    #[serde(default)]
    ok: Value,
    error: Option<String>,
    message: Option<String>,
}

/// [`Driver`] over a `headless_chrome` tab.
///
/// Every call is one `Runtime.evaluate` round trip. Nodes are registered in a
/// table on the page's top window; a handle whose node left the document
/// reads as stale. Frame focus is tracked here and sent along with each query.
pub struct ChromeDriver {
    tab: Arc<Tab>,
    frame: Cell<Option<u64>>,
}

impl ChromeDriver {
    pub fn new(tab: Arc<Tab>) -> Self {
        Self { tab, frame: Cell::new(None) }
    }

    pub fn tab(&self) -> &Arc<Tab> {
        &self.tab
    }

    fn call<T: DeserializeOwned>(&self, request: Value) -> DriverResult<T> {
        let expression = format!("({})({})", LOCATOR_SCRIPT.trim(), request);
        let result = self
            .tab
            .evaluate(&expression, false)
            .map_err(|e| DriverError::Other(format!("Failed to execute locator script: {}", e)))?;

        let json_value = result
            .value
            .ok_or_else(|| DriverError::Other("No value returned from locator script".to_string()))?;
        let json_str: String = serde_json::from_value(json_value)
            .map_err(|e| DriverError::Other(format!("Failed to get JSON string: {}", e)))?;
        let reply: Reply = serde_json::from_str(&json_str)
            .map_err(|e| DriverError::Other(format!("Failed to parse locator reply: {}", e)))?;

        match reply.error.as_deref() {
            None => serde_json::from_value(reply.ok)
                .map_err(|e| DriverError::Other(format!("Unexpected locator reply: {}", e))),
            Some("stale") => Err(DriverError::Stale),
            Some("frame") => Err(DriverError::NoSuchFrame(reply.message.unwrap_or_default())),
            Some(_) => Err(DriverError::Other(
                reply.message.unwrap_or_else(|| "locator script failed".to_string()),
            )),
        }
    }

    fn find(&self, how: How, value: &str, scope: Option<&ChromeHandle>) -> DriverResult<Vec<ChromeHandle>> {
        let ids: Vec<u64> = self.call(json!({
            "op": "find",
            "how": how,
            "value": value,
            "scope": scope.map(|h| h.0),
            "frame": self.frame.get(),
        }))?;
        Ok(ids.into_iter().map(ChromeHandle).collect())
    }

    fn read<T: DeserializeOwned>(&self, op: &str, handle: &ChromeHandle) -> DriverResult<T> {
        self.call(json!({ "op": op, "handle": handle.0 }))
    }
}

impl Driver for ChromeDriver {
    type Handle = ChromeHandle;

    fn find_one(&self, how: How, value: &str, scope: Option<&ChromeHandle>) -> DriverResult<Option<ChromeHandle>> {
        Ok(self.find(how, value, scope)?.into_iter().next())
    }

    fn find_all(&self, how: How, value: &str, scope: Option<&ChromeHandle>) -> DriverResult<Vec<ChromeHandle>> {
        self.find(how, value, scope)
    }

    fn get_attribute(&self, handle: &ChromeHandle, name: &str) -> DriverResult<Option<String>> {
        self.call(json!({ "op": "attribute", "handle": handle.0, "name": name }))
    }

    fn get_text(&self, handle: &ChromeHandle) -> DriverResult<String> {
        self.read("text", handle)
    }

    fn get_text_content(&self, handle: &ChromeHandle) -> DriverResult<String> {
        self.read("text_content", handle)
    }

    fn get_tag_name(&self, handle: &ChromeHandle) -> DriverResult<String> {
        self.read("tag_name", handle)
    }

    fn is_displayed(&self, handle: &ChromeHandle) -> DriverResult<bool> {
        self.read("displayed", handle)
    }

    fn switch_to_frame(&self, frame: Option<&ChromeHandle>) -> DriverResult<()> {
        match frame {
            None => self.frame.set(None),
            Some(handle) => {
                let _: bool = self.read("frame", handle).map_err(|err| match err {
                    DriverError::Stale => DriverError::NoSuchFrame(format!("frame {} is stale", handle.0)),
                    other => other,
                })?;
                self.frame.set(Some(handle.0));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_is_a_function_expression() {
        let script = LOCATOR_SCRIPT.trim();
        assert!(script.starts_with("(function (request)"));
        assert!(script.ends_with(')'));
    }

    #[test]
    fn test_reply_parsing() {
        let reply: Reply = serde_json::from_str(r#"{"ok":[1,2]}"#).unwrap();
        assert!(reply.error.is_none());
        assert_eq!(serde_json::from_value::<Vec<u64>>(reply.ok).unwrap(), vec![1, 2]);

        let reply: Reply = serde_json::from_str(r#"{"error":"stale","message":null}"#).unwrap();
        assert_eq!(reply.error.as_deref(), Some("stale"));

        let reply: Reply = serde_json::from_str(r#"{"ok":null}"#).unwrap();
        assert_eq!(serde_json::from_value::<Option<String>>(reply.ok).unwrap(), None);
    }
}
