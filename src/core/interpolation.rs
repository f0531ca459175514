//! `${name}` variable substitution
//!
//! A value such as `jdbc:${db.host}:${db.port}` is resolved by looking up
//! each variable through the same configuration. Scanning is left to right:
//! after a replacement it continues behind the inserted text, after an
//! unresolvable variable it continues one character further. A `${` without
//! a closing `}`, or an empty name, ends substitution for the whole value.
//!
//! Variables that refer back to a name still being resolved are left in
//! place, as are variables nested deeper than [`MAX_VARIABLE_DEPTH`].

use crate::config::Config;

/// Maximum number of nested variable lookups
pub const MAX_VARIABLE_DEPTH: usize = 32;

const VARIABLE_START: &str = "${";
const VARIABLE_END: char = '}';

/// Looks up `key` and, if `evaluate` is set, substitutes its variables
///
/// `chain` holds the names currently being resolved, outermost first, and
/// is restored before returning.
pub(crate) fn resolve(
    config: &Config,
    key: &str,
    evaluate: bool,
    chain: &mut Vec<String>,
) -> Option<String> {
    let value = config.get_value(key)?;
    if !evaluate {
        return Some(value);
    }
    Some(substitute(config, value, chain))
}

fn substitute(config: &Config, mut value: String, chain: &mut Vec<String>) -> String {
    let mut position = 0;

    while let Some(offset) = value.get(position..).and_then(|rest| rest.find(VARIABLE_START)) {
        let start = position + offset;
        let Some(length) = value[start..].find(VARIABLE_END) else {
            break;
        };
        let name = value[start + VARIABLE_START.len()..start + length].to_string();
        if name.is_empty() {
            break;
        }

        match lookup_variable(config, &name, chain) {
            Some(replacement) => {
                let token = format!("{VARIABLE_START}{name}{VARIABLE_END}");
                value = value.replace(&token, &replacement);
                position = start + replacement.len();
            }
            None => position = start + 1,
        }
    }

    value
}

fn lookup_variable(config: &Config, name: &str, chain: &mut Vec<String>) -> Option<String> {
    if chain.iter().any(|resolving| resolving == name) {
        tracing::warn!(
            variable = %name,
            chain = %chain.join(" -> "),
            "Cyclic variable reference left unresolved"
        );
        return None;
    }

    if chain.len() >= MAX_VARIABLE_DEPTH {
        tracing::warn!(
            variable = %name,
            depth = chain.len(),
            "Variable nesting too deep, left unresolved"
        );
        return None;
    }

    chain.push(name.to_string());
    let resolved = resolve(config, name, true, chain);
    chain.pop();

    if resolved.is_none() {
        tracing::debug!(variable = %name, "Variable has no value");
    }
    resolved
}
