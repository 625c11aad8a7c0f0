//! `${VAR}` placeholder substitution for provider environment values.

/// Outcome of expanding one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    /// The expanded value.
    pub value: String,
    /// Variables referenced without a default that were not set.
    pub unresolved: Vec<String>,
}

/// Expands `${VAR}` and `${VAR:-default}` placeholders in `input`.
///
/// `lookup` resolves a variable name to its value. Unset variables without a
/// default expand to the empty string and are reported in
/// [`Expansion::unresolved`]. A default applies when the variable is unset or
/// empty. An unterminated `${` and the empty placeholder `${}` are copied
/// literally.
///
/// # Examples
///
/// ```
/// use armature::tool_registry::domain::expand_placeholders;
///
/// let expansion = expand_placeholders("Bearer ${TOKEN}", |name| {
///     (name == "TOKEN").then(|| "s3cret".to_owned())
/// });
/// assert_eq!(expansion.value, "Bearer s3cret");
/// assert!(expansion.unresolved.is_empty());
/// ```
pub fn expand_placeholders(input: &str, lookup: impl Fn(&str) -> Option<String>) -> Expansion {
    let mut value = String::with_capacity(input.len());
    let mut unresolved = Vec::new();
    let mut characters = input.chars().peekable();

    while let Some(character) = characters.next() {
        if character != '$' || characters.peek() != Some(&'{') {
            value.push(character);
            continue;
        }
        characters.next();

        let mut body = String::new();
        let mut closed = false;
        for inner in characters.by_ref() {
            if inner == '}' {
                closed = true;
                break;
            }
            body.push(inner);
        }

        if !closed || body.is_empty() {
            value.push_str("${");
            value.push_str(&body);
            if closed {
                value.push('}');
            }
            continue;
        }

        let (variable, fallback) = match body.split_once(":-") {
            Some((variable, fallback)) => (variable, Some(fallback)),
            None => (body.as_str(), None),
        };

        match (lookup(variable), fallback) {
            (Some(found), Some(default)) if found.is_empty() => value.push_str(default),
            (Some(found), _) => value.push_str(&found),
            (None, Some(default)) => value.push_str(default),
            (None, None) => unresolved.push(variable.to_owned()),
        }
    }

    Expansion { value, unresolved }
}
