//! Extraction of the catalog fragment from a full HTML document.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use crate::dom::{ActionButton, ButtonState, ClassList};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FragmentError {
    #[error("No element with id {0:?} in document")]
    MissingContainer(String),
    #[error("Element with id {0:?} is never closed")]
    Unclosed(String),
}

/// Markup tokens the balancer walks over. Group 1 is a comment, group 2 a
/// whole raw-text element (`script`, `style`, `textarea`); neither can
/// contain real tags. Otherwise it is a start or end tag: group 3 is `/` for
/// end tags, group 4 the name, group 5 `/` for self-closing tags.
static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?is)(<!--.*?-->)",
        r"|(<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>|<textarea\b[^>]*>.*?</textarea\s*>)",
        r"|<(/?)([a-z][a-z0-9-]*)\b[^>]*?(/?)>",
    ))
    .expect("tag regex should compile")
});

static BUTTON_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<button\b([^>]*)>(.*?)</button>").expect("button regex should compile")
});

static PRODUCT_ID_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bdata-product-id\s*=\s*["']([^"']*)["']"#).expect("data attribute regex should compile")
});

static CLASS_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bclass\s*=\s*["']([^"']*)["']"#).expect("class regex should compile")
});

static ICON_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<i\b[^>]*\bclass\s*=\s*["']([^"']*\bicon-default\b[^"']*)["']"#)
        .expect("icon regex should compile")
});

/// Inner markup of a catalog container, plus the controls it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    html: String,
}

impl Fragment {
    /// Pull the inner markup of the element with `container_id` out of
    /// `document`.
    pub fn extract(document: &str, container_id: &str) -> Result<Self, FragmentError> {
        extract_inner_html(document, container_id).map(|html| Self { html })
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    /// Action controls (`<button data-product-id=...>`) in document order,
    /// each with its `icon-default` child's classes when present.
    pub fn action_buttons(&self) -> Vec<ActionButton> {
        BUTTON_PATTERN
            .captures_iter(&self.html)
            .filter_map(|caps| {
                let attrs = caps.get(1)?.as_str();
                let body = caps.get(2).map_or("", |m| m.as_str());
                let product_id = PRODUCT_ID_ATTR.captures(attrs)?.get(1)?.as_str().to_string();
                let classes = CLASS_ATTR
                    .captures(attrs)
                    .and_then(|c| c.get(1))
                    .map(|m| ClassList::parse(m.as_str()))
                    .unwrap_or_default();
                let icon = ICON_TAG
                    .captures(body)
                    .and_then(|c| c.get(1))
                    .map(|m| ClassList::parse(m.as_str()));

                Some(ActionButton::from_state(ButtonState {
                    product_id: Some(product_id),
                    classes,
                    disabled: false,
                    icon,
                }))
            })
            .collect()
    }
}

/// Inner markup of the element with `id`, balancing nested tags of the
/// same name.
pub fn extract_inner_html(document: &str, id: &str) -> Result<String, FragmentError> {
    let open_pattern = Regex::new(&format!(
        r#"<([a-zA-Z][a-zA-Z0-9-]*)\b[^>]*\sid\s*=\s*["']{}["'][^>]*>"#,
        regex::escape(id)
    ))
    .map_err(|_| FragmentError::MissingContainer(id.to_string()))?;

    let open = open_pattern
        .captures(document)
        .ok_or_else(|| FragmentError::MissingContainer(id.to_string()))?;
    let (Some(whole), Some(name)) = (open.get(0), open.get(1)) else {
        return Err(FragmentError::MissingContainer(id.to_string()));
    };
    let name = name.as_str();
    let start = whole.end();

    let mut depth = 1usize;
    for tag in TAG_PATTERN.captures_iter(&document[start..]) {
        // Comments and raw-text bodies are skipped whole.
        let Some(tag_name) = tag.get(4) else { continue };
        if !tag_name.as_str().eq_ignore_ascii_case(name) {
            continue;
        }
        let closing = tag.get(3).is_some_and(|m| !m.as_str().is_empty());
        let self_closing = tag.get(5).is_some_and(|m| !m.as_str().is_empty());

        if closing {
            depth -= 1;
            if depth == 0 {
                let Some(close) = tag.get(0) else { break };
                return Ok(document[start..start + close.start()].to_string());
            }
        } else if !self_closing {
            depth += 1;
        }
    }

    Err(FragmentError::Unclosed(id.to_string()))
}
