//! Compiled stylesheet formats.
//!
//! # Example
//!
//! ```toml
//! [compilers.".ccss"]
//! transform = "css_nesting"     # in-process, preferred when present
//! binary_path = "clevercss"     # fallback external compiler
//! arguments = "*.ccss"          # `*` = source path without extension
//! ```

use serde::{Deserialize, Serialize};

use super::{ConfigDiagnostics, FieldPath};
use crate::compiler::TransformRegistry;

/// One `[compilers.".ext"]` entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerFormat {
    /// Name of an in-process transform.
    pub transform: Option<String>,
    /// External compiler executable.
    pub binary_path: Option<String>,
    /// Argument template for the external compiler.
    pub arguments: String,
}

impl CompilerFormat {
    /// Validate one entry.
    ///
    /// # Checks
    /// - the extension starts with `.`
    /// - at least one of `transform` / `binary_path` is set
    /// - a named transform exists
    /// - a binary without a transform to fall back from is installed
    pub fn validate(&self, ext: &str, transforms: &TransformRegistry, diag: &mut ConfigDiagnostics) {
        let field = |name: &str| FieldPath::new(format!("compilers.\"{ext}\".{name}"));

        if !ext.starts_with('.') {
            diag.error_with_hint(
                FieldPath::new(format!("compilers.\"{ext}\"")),
                "extension must start with `.`",
                format!("use \".{ext}\""),
            );
        }

        let binary = self.binary_path.as_deref().filter(|b| !b.is_empty());
        if self.transform.is_none() && binary.is_none() {
            diag.error(
                field("binary_path"),
                "neither `transform` nor `binary_path` is configured",
            );
            return;
        }

        if let Some(name) = &self.transform
            && !transforms.contains(name)
        {
            diag.error_with_hint(
                field("transform"),
                format!("unknown transform `{name}`"),
                "available: css_nesting, identity",
            );
        }

        if self.transform.is_none()
            && let Some(binary) = binary
        {
            let program = binary.split_whitespace().next().unwrap_or(binary);
            if which::which(program).is_err() {
                diag.error_with_hint(
                    field("binary_path"),
                    format!("`{program}` not found"),
                    "install the compiler or update binary_path",
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(ext: &str, format: &CompilerFormat) -> ConfigDiagnostics {
        let mut diag = ConfigDiagnostics::new();
        format.validate(ext, &TransformRegistry::with_builtins(), &mut diag);
        diag
    }

    #[test]
    fn test_transform_only_is_valid() {
        let format = CompilerFormat {
            transform: Some("css_nesting".into()),
            ..CompilerFormat::default()
        };
        assert!(check(".ncss", &format).is_empty());
    }

    #[test]
    fn test_missing_both_mechanisms() {
        let diag = check(".ccss", &CompilerFormat::default());
        assert_eq!(diag.len(), 1);
        assert_eq!(diag.errors()[0].field.as_str(), "compilers.\".ccss\".binary_path");
    }

    #[test]
    fn test_extension_needs_dot_and_known_transform() {
        let format = CompilerFormat {
            transform: Some("clevercss.convert".into()),
            ..CompilerFormat::default()
        };
        let diag = check("ccss", &format);
        assert_eq!(diag.len(), 2);
    }

    #[test]
    fn test_binary_not_installed() {
        let format = CompilerFormat {
            binary_path: Some("definitely-not-a-real-compiler-xyz".into()),
            arguments: "*.ccss".into(),
            ..CompilerFormat::default()
        };
        let diag = check(".ccss", &format);
        assert_eq!(diag.len(), 1);
        assert!(diag.errors()[0].message.contains("not found"));
    }
}
