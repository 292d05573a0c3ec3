//! Typed endpoint bindings, grouped by backend resource.

pub mod auth;
pub mod invitations;
pub mod products;
pub mod rbac;

/// Percent-encode a query parameter value.
pub(crate) fn encode_query(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_query_escapes_reserved_characters() {
        assert_eq!(encode_query("a/b?c=d"), "a%2Fb%3Fc%3Dd");
    }
}
