// SPDX-License-Identifier: MIT OR Apache-2.0

//! Construction sugar for context maps.

/// Builds a [`ContextMap`](crate::ContextMap) from `key: value` pairs.
///
/// Values are anything convertible to [`Value`](crate::Value) — scalars,
/// strings, nested maps, lists.
///
/// ```rust
/// let context = logtree::context! {
///     user_id: 42,
///     name: "alice",
///     admin: false,
/// };
/// assert_eq!(context.len(), 3);
/// ```
#[macro_export]
macro_rules! context {
    {} => { $crate::ContextMap::new() };
    { $($key:ident : $value:expr),+ $(,)? } => {{
        let map = $crate::ContextMap::new();
        $( map.insert(stringify!($key), $crate::Value::from($value)); )+
        map
    }};
}

#[cfg(test)]
mod tests {
    use crate::Value;

    #[test]
    fn builds_maps() {
        let context = context! {
            user_id: 42,
            name: "alice",
        };
        assert_eq!(context.get("user_id"), Some(Value::Int(42)));
        assert_eq!(context.get("name"), Some(Value::Str("alice".into())));
    }

    #[test]
    fn empty_invocation() {
        let context = context! {};
        assert!(context.is_empty());
    }

    #[test]
    fn nests() {
        let inner = context! { x: 1 };
        let outer = context! { inner: inner.clone() };
        assert_eq!(outer.get("inner"), Some(Value::Map(inner)));
    }
}
