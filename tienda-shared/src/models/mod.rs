/// Database models (the record store)
///
/// Each model owns its table's CRUD and lookup operations:
///
/// - `user`: system users (registration, authentication identity)
/// - `session`: server-side login sessions
/// - `customer`: customer records
/// - `product`: product catalog

pub mod customer;
pub mod product;
pub mod session;
pub mod user;

/// Escapes ILIKE pattern metacharacters so user queries match literally
///
/// `%`, `_`, and `\` in free-text search input would otherwise act as
/// wildcards inside the `'%' || $1 || '%'` pattern.
pub(crate) fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_passes_plain_text() {
        assert_eq!(escape_like("shirt"), "shirt");
    }

    #[test]
    fn test_escape_like_escapes_metacharacters() {
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
    }
}
