use std::fmt;

/// Ordered set of CSS class names, mirroring `Element.classList`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList {
    classes: Vec<String>,
}

impl ClassList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a whitespace-separated `class` attribute.
    pub fn parse(attr: &str) -> Self {
        let mut list = Self::new();
        for class in attr.split_whitespace() {
            list.add(class);
        }
        list
    }

    pub fn contains(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn add(&mut self, class: &str) {
        if !self.contains(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn remove(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    /// Force `class` on or off.
    pub fn toggle(&mut self, class: &str, on: bool) {
        if on {
            self.add(class);
        } else {
            self.remove(class);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl fmt::Display for ClassList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.classes.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dedups_and_keeps_order() {
        let list = ClassList::parse("  far fa-heart far icon-default ");
        assert_eq!(list.to_string(), "far fa-heart icon-default");
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_toggle_is_forced() {
        let mut list = ClassList::parse("far");
        list.toggle("fas", true);
        list.toggle("fas", true);
        list.toggle("far", false);
        list.toggle("far", false);
        assert_eq!(list.to_string(), "fas");
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut list = ClassList::new();
        list.remove("is-loading");
        assert!(list.is_empty());
    }
}
