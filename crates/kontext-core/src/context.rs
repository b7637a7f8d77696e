use std::fmt;

use crate::error::{Error, Result};

const MAX_NAME_LEN: usize = 255;

/// A proposed context: the name used for its cluster, user and context entries,
/// plus the endpoint and bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextConfig {
    pub name: String,
    pub server: String,
    pub token: String,
}

impl ContextConfig {
    pub fn new(name: impl Into<String>, server: impl Into<String>, token: impl Into<String>) -> Self {
        Self { name: name.into(), server: server.into(), token: token.into() }
    }

    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        if self.server.trim().is_empty() {
            return Err(Error::validation("server address cannot be empty"));
        }
        if self.token.is_empty() {
            return Err(Error::validation("token cannot be empty"));
        }
        Ok(())
    }
}

pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::validation("context name cannot be empty"));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(Error::validation(format!("context name too long (max {MAX_NAME_LEN} characters)")));
    }
    Ok(())
}

/// Selects contexts for deletion: an exact name or `prefix*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextPattern {
    Exact(String),
    Prefix(String),
}

impl ContextPattern {
    pub fn parse(pattern: &str) -> Result<Self> {
        if pattern.is_empty() {
            return Err(Error::validation("context name or pattern cannot be empty"));
        }
        let (head, wildcard) = match pattern.strip_suffix('*') {
            Some(prefix) => (prefix, true),
            None => (pattern, false),
        };
        if head.contains('*') {
            return Err(Error::validation(format!("wildcard is only supported at the end of a pattern: {pattern:?}")));
        }
        if !wildcard {
            return Ok(Self::Exact(head.to_string()));
        }
        if head.is_empty() {
            return Err(Error::validation("wildcard pattern must include a prefix"));
        }
        Ok(Self::Prefix(head.to_string()))
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Exact(exact) => name == exact,
            Self::Prefix(prefix) => name.starts_with(prefix.as_str()),
        }
    }
}

impl fmt::Display for ContextPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(name) => write!(f, "{name}"),
            Self::Prefix(prefix) => write!(f, "{prefix}*"),
        }
    }
}
