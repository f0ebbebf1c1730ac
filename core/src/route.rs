//! Navigable screens.

use std::fmt;

use crate::types::EmployeeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `/`
    List,
    /// `/employee/{id}`
    Detail(EmployeeId),
}

impl Route {
    /// Resolve a path. Unknown paths yield `None`.
    pub fn parse(path: &str) -> Option<Route> {
        let path = path.trim();
        if path.is_empty() || path == "/" {
            return Some(Route::List);
        }
        let id = path
            .strip_prefix("/employee/")?
            .trim_end_matches('/')
            .parse()
            .ok()?;
        Some(Route::Detail(id))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::List => write!(f, "/"),
            Route::Detail(id) => write!(f, "/employee/{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_paths() {
        assert_eq!(Route::parse("/"), Some(Route::List));
        assert_eq!(Route::parse(""), Some(Route::List));
        assert_eq!(Route::parse("/employee/12"), Some(Route::Detail(EmployeeId(12))));
        assert_eq!(Route::parse("/employee/12/"), Some(Route::Detail(EmployeeId(12))));
    }

    #[test]
    fn rejects_unknown_paths() {
        assert_eq!(Route::parse("/employee/abc"), None);
        assert_eq!(Route::parse("/employees"), None);
    }

    #[test]
    fn display_is_inverse_of_parse() {
        let route = Route::Detail(EmployeeId(7));
        assert_eq!(Route::parse(&route.to_string()), Some(route));
    }
}
