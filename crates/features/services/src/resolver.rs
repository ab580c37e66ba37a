use bindery_domain::constants::DEFAULT_TYPE_KEY;

/// Maps a reported service type onto a registry key.
///
/// Every key that occurs as a substring of `reported` is a candidate. No candidate resolves to
/// the catch-all `"default"` key; otherwise the shortest candidate wins, and among candidates of
/// equal length the first one yielded by `keys` is kept. Empty keys never match.
///
/// ```rust
/// use bindery_services::resolve_service_type;
///
/// let keys = ["appmonitor", "default", "monitor"];
/// assert_eq!(resolve_service_type("appmonitor-2.0", keys), "monitor");
/// assert_eq!(resolve_service_type("cleardb", keys), "default");
/// ```
pub fn resolve_service_type<'a>(reported: &str, keys: impl IntoIterator<Item = &'a str>) -> &'a str {
    let mut best: Option<&'a str> = None;

    for key in keys {
        if key.is_empty() || !reported.contains(key) {
            continue;
        }
        match best {
            Some(current) if current.len() <= key.len() => {},
            _ => best = Some(key),
        }
    }

    best.unwrap_or(DEFAULT_TYPE_KEY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_match() {
        assert_eq!(resolve_service_type("mysql-5.7", ["mysql", "default"]), "mysql");
    }

    #[test]
    fn test_no_match_falls_back_to_default() {
        assert_eq!(resolve_service_type("elephantsql", ["mysql", "mongodb"]), DEFAULT_TYPE_KEY);
        assert_eq!(resolve_service_type("", ["mysql"]), DEFAULT_TYPE_KEY);
    }

    #[test]
    fn test_shortest_match_wins() {
        assert_eq!(resolve_service_type("appmonitor-2.0", ["appmonitor", "monitor"]), "monitor");
        assert_eq!(resolve_service_type("appmonitor-2.0", ["monitor", "appmonitor"]), "monitor");
    }

    #[test]
    fn test_equal_length_ties_keep_first() {
        assert_eq!(resolve_service_type("redis-mongo", ["mongo", "redis"]), "mongo");
        assert_eq!(resolve_service_type("redis-mongo", ["redis", "mongo"]), "redis");
    }

    #[test]
    fn test_empty_key_is_ignored() {
        assert_eq!(resolve_service_type("mysql", ["", "mysql"]), "mysql");
    }

    #[test]
    fn test_default_key_can_match_literally() {
        assert_eq!(resolve_service_type("user-provided-default", ["default", "user-provided"]), "default");
    }
}
