use crate::transform_code::{self, DEFAULT_IMAGE, OVERLAY_IMAGE, PATH_ESCAPE, RAW};

pub(crate) const KEY_VALUE_DELIMITER: &str = "-";
pub(crate) const TRANSFORM_DELIMITER: &str = ",";
pub(crate) const CHAIN_DELIMITER: &str = ":";

/// Value marking a directive as a bare flag: the serializer emits the key
/// alone, with no delimiter and no value.
pub const FLAG: &str = "-";

/// One step of a transformation chain.
///
/// A step is an ordered set of directive key/value pairs applied together,
/// such as a resize plus a crop. Directive order is preserved because it is
/// significant in the serialized string.
///
/// # Example
///
/// ```rust
/// use imagekit_url::TransformationStep;
///
/// let step = TransformationStep::new()
///     .add("height", 300)
///     .add("width", 400)
///     .flag("progressive");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformationStep {
    pub(crate) entries: Vec<(String, String)>,
}

impl TransformationStep {
    /// Creates an empty step.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a directive. `key` may be a friendly name from the short-code
    /// table or a wire code used literally.
    pub fn add(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.entries.push((key.into(), value.to_string()));
        self
    }

    /// Appends a value-less flag directive.
    pub fn flag(self, key: impl Into<String>) -> Self {
        self.add(key, FLAG)
    }

    /// Appends a token emitted verbatim, bypassing `key-value` formatting.
    pub fn raw(self, value: impl Into<String>) -> Self {
        self.add(RAW, value.into())
    }
}

/// Serializes a transformation chain into the endpoint's string grammar.
///
/// Directives become `code-value` tokens joined with `,`; steps are joined
/// with `:`. An empty chain serializes to the empty string.
pub(crate) fn transformation_to_str(steps: &[TransformationStep]) -> String {
    let mut parsed_transforms = Vec::with_capacity(steps.len());
    for step in steps {
        let mut tokens = Vec::with_capacity(step.entries.len());
        for (key, value) in &step.entries {
            let code = transform_code::code_for(key).unwrap_or(key.as_str());

            // Nested-path values cannot carry literal slashes through the
            // flat grammar.
            let value = if code == OVERLAY_IMAGE || code == DEFAULT_IMAGE {
                escape_nested_path(value)
            } else {
                value.clone()
            };

            if value == FLAG {
                tokens.push(code.to_string());
            } else if code == RAW {
                tokens.push(value);
            } else {
                tokens.push(format!("{code}{KEY_VALUE_DELIMITER}{value}"));
            }
        }
        parsed_transforms.push(tokens.join(TRANSFORM_DELIMITER));
    }
    parsed_transforms.join(CHAIN_DELIMITER)
}

/// Strips one leading `/` and replaces the remaining separators with the
/// reserved escape sequence.
fn escape_nested_path(value: &str) -> String {
    value.strip_prefix('/').unwrap_or(value).replace('/', PATH_ESCAPE)
}
