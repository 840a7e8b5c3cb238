//! Case-insensitive name lists (whitelists)

use std::collections::HashSet;

/// A set of function/constant names, folded to lower case once
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameList {
    names: HashSet<String>,
}

impl NameList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma-separated list; blank entries are ignored
    pub fn parse(list: &str) -> Self {
        list.split(',').collect()
    }

    /// Add a single name
    pub fn insert(&mut self, name: &str) {
        let name = normalize(name);
        if !name.is_empty() {
            self.names.insert(name);
        }
    }

    /// Is `name` listed? A leading `\` is ignored.
    pub fn contains(&self, name: &str) -> bool {
        !self.names.is_empty() && self.names.contains(&normalize(name))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn normalize(name: &str) -> String {
    name.trim().trim_start_matches('\\').to_lowercase()
}

impl<S: AsRef<str>> FromIterator<S> for NameList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut list = NameList::new();
        for name in iter {
            list.insert(name.as_ref());
        }
        list
    }
}

impl<S: AsRef<str>> Extend<S> for NameList {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for name in iter {
            self.insert(name.as_ref());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_comma_separated() {
        let list = NameList::parse("mysql_to_rfc3339, Mysql_Helper,,  ");
        assert_eq!(list.len(), 2);
        assert!(list.contains("mysql_to_rfc3339"));
        assert!(list.contains("MYSQL_HELPER"));
        assert!(list.contains("\\mysql_helper"));
        assert!(!list.contains("mysql_query"));
    }

    #[test]
    fn test_from_array() {
        let list: NameList = vec!["a", "B"].into_iter().collect();
        assert!(list.contains("b"));

        let mut list = NameList::new();
        assert!(list.is_empty());
        list.extend(["x"]);
        assert!(list.contains("X"));
    }
}
