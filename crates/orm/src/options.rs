use anyhow::{Context, Result, bail};
use fromenv::FromEnv;

/// Options for the in-memory statement registry.
///
/// This struct is used to load registry options from environment variables.
#[derive(Debug, Clone, FromEnv)]
pub struct ConfigOptions {
    /// `?` for positional placeholders, `$` for numbered ones (`$1`, `$2`, ...).
    #[env(from = "KONO_ORM_PLACEHOLDER", default = "?")]
    pub placeholder: String,
}

impl Default for ConfigOptions {
    fn default() -> Self {
        Self {
            placeholder: "?".to_string(),
        }
    }
}

impl ConfigOptions {
    /// Loads options from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable cannot be read.
    pub fn load() -> Result<Self> {
        Self::from_env().finalize().context("issue loading orm options")
    }

    /// Resolves the configured placeholder style.
    ///
    /// # Errors
    ///
    /// Returns an error if the placeholder is neither `?` nor `$`.
    pub fn placeholder_style(&self) -> Result<PlaceholderStyle> {
        match self.placeholder.trim() {
            "?" => Ok(PlaceholderStyle::Positional),
            "$" => Ok(PlaceholderStyle::Numbered),
            other => bail!("unsupported placeholder `{other}`; expected `?` or `$`"),
        }
    }
}

/// How parsed SQL sources mark bound parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// `?`
    #[default]
    Positional,
    /// `$1`, `$2`, ...
    Numbered,
}

impl PlaceholderStyle {
    /// Renders the placeholder for the 1-based parameter `index`.
    #[must_use]
    pub fn render(self, index: usize) -> String {
        match self {
            Self::Positional => "?".to_string(),
            Self::Numbered => format!("${index}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_styles() {
        let options = ConfigOptions::default();
        assert_eq!(options.placeholder_style().unwrap(), PlaceholderStyle::Positional);

        let options = ConfigOptions {
            placeholder: "$".to_string(),
        };
        assert_eq!(options.placeholder_style().unwrap(), PlaceholderStyle::Numbered);

        let options = ConfigOptions {
            placeholder: ":".to_string(),
        };
        let err = options.placeholder_style().unwrap_err();
        assert!(err.to_string().contains("unsupported placeholder"));
    }

    #[test]
    fn render() {
        assert_eq!(PlaceholderStyle::Positional.render(3), "?");
        assert_eq!(PlaceholderStyle::Numbered.render(3), "$3");
    }
}
