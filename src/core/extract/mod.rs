//! Per-source extractors. Each one is total: a missing or malformed
//! signal resolves the field to `None`, never to a guess.

pub mod course;
pub mod encyclopedia;
pub mod html;
pub mod links;
pub mod ranking;

/// One layer of a fallback chain.
pub type Resolver<'a, T> = &'a dyn Fn() -> Option<T>;

/// Runs resolvers in order and keeps the first value produced.
pub fn first_of<T>(resolvers: &[Resolver<'_, T>]) -> Option<T> {
    resolvers.iter().find_map(|resolve| resolve())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_first_of_stops_at_first_hit() {
        let calls = Cell::new(0);
        let resolvers: [Resolver<'_, &str>; 3] = [
            &|| {
                calls.set(calls.get() + 1);
                None
            },
            &|| {
                calls.set(calls.get() + 1);
                Some("second")
            },
            &|| {
                calls.set(calls.get() + 1);
                Some("third")
            },
        ];
        assert_eq!(first_of(&resolvers), Some("second"));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_first_of_empty_chain() {
        let resolvers: [Resolver<'_, String>; 0] = [];
        assert_eq!(first_of(&resolvers), None);
    }
}
