//! Parsing of `#{...}` parameter markers into executable SQL sources.

use std::collections::BTreeMap;

use anyhow::{Result, bail};
use serde::Serialize;

use crate::options::PlaceholderStyle;
use crate::schema::TypeRef;

/// Extra values handed to a SQL source alongside the parameter object.
pub type AdditionalParameters = BTreeMap<String, serde_json::Value>;

/// One bound parameter, in the order it appears in the SQL text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterMapping {
    /// Property read from the parameter object.
    pub property: String,
    /// `key=value` attributes following the property, e.g. `jdbcType=VARCHAR`.
    pub attributes: BTreeMap<String, String>,
}

/// SQL text with parameter markers replaced by driver placeholders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SqlSource {
    /// Executable SQL text.
    pub sql: String,
    /// Parameters in placeholder order.
    pub parameter_mappings: Vec<ParameterMapping>,
    /// The parameter object's type.
    pub parameter_type: TypeRef,
    /// Values supplied in addition to the parameter object.
    pub additional_parameters: AdditionalParameters,
}

/// Rewrites `#{property[,attr=value...]}` markers into placeholders.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlSourceBuilder {
    style: PlaceholderStyle,
}

impl SqlSourceBuilder {
    /// Creates a builder emitting the given placeholder style.
    #[must_use]
    pub const fn new(style: PlaceholderStyle) -> Self {
        Self { style }
    }

    /// Parses statement text into a [`SqlSource`].
    ///
    /// # Errors
    ///
    /// Returns an error if a marker is unterminated, names no property, or
    /// carries a malformed attribute.
    pub fn parse(
        &self, original: &str, parameter_type: &TypeRef, additional: &AdditionalParameters,
    ) -> Result<SqlSource> {
        let mut sql = String::with_capacity(original.len());
        let mut parameter_mappings = Vec::new();
        let mut rest = original;

        while let Some(start) = rest.find("#{") {
            sql.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(end) = after.find('}') else {
                bail!("unterminated parameter marker at byte {}", original.len() - rest.len() + start);
            };

            parameter_mappings.push(parse_mapping(&after[..end])?);
            sql.push_str(&self.style.render(parameter_mappings.len()));
            rest = &after[end + 1..];
        }
        sql.push_str(rest);

        Ok(SqlSource {
            sql,
            parameter_mappings,
            parameter_type: parameter_type.clone(),
            additional_parameters: additional.clone(),
        })
    }
}

fn parse_mapping(content: &str) -> Result<ParameterMapping> {
    let mut parts = content.split(',');
    let property = parts.next().unwrap_or_default().trim();
    if property.is_empty() {
        bail!("parameter marker `#{{{content}}}` names no property");
    }

    let mut attributes = BTreeMap::new();
    for part in parts {
        let Some((key, value)) = part.split_once('=') else {
            bail!("malformed attribute `{}` in `#{{{content}}}`", part.trim());
        };
        attributes.insert(key.trim().to_string(), value.trim().to_string());
    }

    Ok(ParameterMapping {
        property: property.to_string(),
        attributes,
    })
}
