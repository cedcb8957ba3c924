//! In-memory stand-in for a scope on the other end of a [`Transport`].

use std::collections::HashMap;

use crate::transport::{Transport, TransportError};

const VBS_QUERY_PREFIX: &str = "VBS? return = ";

/// Records every command and keeps a flat copy of the VBS property tree, answering
/// `VBS? return = <path>` from it the way the firmware does: strings unquoted,
/// booleans as `-1`/`0`, unknown properties as `0`.
#[derive(Debug, Default)]
pub struct FakeScope {
    pub commands: Vec<String>,
    pub queries: Vec<String>,
    properties: HashMap<String, String>,
    replies: HashMap<String, String>,
    raw: Vec<u8>,
}

impl FakeScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_property(mut self, path: &str, value: &str) -> Self {
        self.properties.insert(path.to_string(), value.to_string());
        self
    }

    /// Canned reply for an exact query string, taking precedence over the property tree
    pub fn with_reply(mut self, query: &str, reply: &str) -> Self {
        self.replies.insert(query.to_string(), reply.to_string());
        self
    }

    pub fn with_raw(mut self, raw: &[u8]) -> Self {
        self.raw = raw.to_vec();
        self
    }

    pub fn property(&self, path: &str) -> Option<&str> {
        self.properties.get(path).map(String::as_str)
    }

    pub fn commands_containing(&self, needle: &str) -> Vec<&str> {
        self.commands
            .iter()
            .filter(|c| c.contains(needle))
            .map(String::as_str)
            .collect()
    }

    fn normalise(value: &str) -> String {
        let value = value.trim();
        match value.to_ascii_lowercase().as_str() {
            "true" => return "-1".to_string(),
            "false" => return "0".to_string(),
            _ => {}
        }
        value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(value)
            .to_string()
    }
}

impl Transport for FakeScope {
    fn write(&mut self, command: &str) -> Result<(), TransportError> {
        self.commands.push(command.to_string());
        if let Some((path, value)) = command
            .strip_prefix("VBS ")
            .and_then(|assignment| assignment.split_once('='))
        {
            self.properties
                .insert(path.trim().to_string(), Self::normalise(value));
        }
        Ok(())
    }

    fn read_raw(&mut self) -> Result<Vec<u8>, TransportError> {
        Ok(self.raw.clone())
    }

    fn query(&mut self, command: &str) -> Result<String, TransportError> {
        self.queries.push(command.to_string());
        if let Some(reply) = self.replies.get(command) {
            return Ok(reply.clone());
        }
        let reply = command
            .strip_prefix(VBS_QUERY_PREFIX)
            .map(|path| {
                self.properties
                    .get(path.trim())
                    .cloned()
                    .unwrap_or_else(|| "0".to_string())
            })
            .unwrap_or_default();
        Ok(reply)
    }
}
