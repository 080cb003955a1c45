//! Binding name validation
//!
//! Script-format workers see every binding as a top-level global, so names must be
//! plain identifiers:
//! - Start with an ASCII letter, `_` or `$`
//! - Continue with ASCII letters, digits, `_` or `$`
//! - Not shadow one of the globals the environment installs

use crate::error::EnvError;
use crate::globals::GlobalSymbol;

/// Validate a binding name (single pass, no allocations on success)
pub fn validate_binding_name(name: &str) -> Result<(), EnvError> {
    let invalid = |reason: &str| EnvError::InvalidBindingName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    let Some((&first, rest)) = name.as_bytes().split_first() else {
        return Err(invalid("cannot be empty"));
    };

    if !(first.is_ascii_alphabetic() || first == b'_' || first == b'$') {
        return Err(invalid("must start with a letter, '_' or '$'"));
    }

    if rest
        .iter()
        .any(|&byte| !(byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'$'))
    {
        return Err(invalid("may only contain letters, digits, '_' or '$'"));
    }

    if let Some(symbol) = GlobalSymbol::ALL.iter().find(|s| s.name() == name) {
        return Err(EnvError::InvalidBindingName {
            name: name.to_string(),
            reason: format!("shadows the installed global '{}'", symbol.name()),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_names() {
        for name in ["SESSIONS", "kv", "_private", "$store", "DB_2", "a"] {
            assert!(validate_binding_name(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn reject_empty() {
        let err = validate_binding_name("").unwrap_err();
        assert!(err.to_string().contains("WENV-011"));
        assert!(err.to_string().contains("cannot be empty"));
    }

    #[test]
    fn reject_leading_digit() {
        let err = validate_binding_name("2FA_KEY").unwrap_err();
        assert!(err.to_string().contains("must start with"));
    }

    #[test]
    fn reject_punctuation() {
        for name in ["my-kv", "my.kv", "my kv", "kv!"] {
            assert!(validate_binding_name(name).is_err(), "{name}");
        }
    }

    #[test]
    fn reject_installed_globals() {
        let err = validate_binding_name("caches").unwrap_err();
        assert!(err.to_string().contains("shadows the installed global 'caches'"));
        assert!(validate_binding_name("Response").is_err());
        assert!(validate_binding_name("WebSocketPair").is_err());
    }
}
