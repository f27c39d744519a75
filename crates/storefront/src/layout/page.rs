//! The page the layout controller binds into.
//!
//! [`Page`] is the small slice of DOM the controller needs: look elements
//! up, replace a container's contents, and edit text, classes and
//! attributes. [`PageModel`] implements it in memory by scanning HTML start
//! tags, which is enough for the storefront's flat navbar and footer
//! markup. It is not an HTML parser; text content of scanned elements is
//! not tracked.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

/// Handle to an element on a [`Page`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementRef(usize);

/// How to find elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector<'s> {
    /// `#id`
    Id(&'s str),
    /// `.class`
    Class(&'s str),
    /// `tag.class`
    TagClass(&'s str, &'s str),
}

/// DOM operations used by the layout controller.
pub trait Page {
    /// Path of the current document, e.g. `/tienda/productos.html`.
    fn current_path(&self) -> &str;

    /// All attached elements matching `selector`, in document order.
    fn select(&self, selector: Selector<'_>) -> Vec<ElementRef>;

    /// Value of an attribute.
    fn attribute(&self, element: ElementRef, name: &str) -> Option<String>;

    /// Replace an element's contents with `html`.
    fn set_inner_html(&mut self, element: ElementRef, html: &str);

    /// Replace an element's text.
    fn set_text(&mut self, element: ElementRef, text: &str);

    fn add_class(&mut self, element: ElementRef, class: &str);

    fn remove_class(&mut self, element: ElementRef, class: &str);

    fn set_attribute(&mut self, element: ElementRef, name: &str, value: &str);

    /// First element with this id.
    fn by_id(&self, id: &str) -> Option<ElementRef> {
        self.select(Selector::Id(id)).into_iter().next()
    }
}

/// An element tracked by [`PageModel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    /// Text set through [`Page::set_text`].
    pub text: Option<String>,
    /// HTML set through [`Page::set_inner_html`].
    pub inner_html: Option<String>,
    /// Container whose contents this element came from.
    parent: Option<ElementRef>,
    attached: bool,
}

impl Element {
    fn new(tag: &str, attributes: BTreeMap<String, String>, parent: Option<ElementRef>) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes,
            text: None,
            inner_html: None,
            parent,
            attached: true,
        }
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attributes.get("id").map(String::as_str)
    }

    /// Class list, in order.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attributes
            .get("class")
            .map(String::as_str)
            .unwrap_or_default()
            .split_ascii_whitespace()
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    fn matches(&self, selector: Selector<'_>) -> bool {
        match selector {
            Selector::Id(id) => self.id() == Some(id),
            Selector::Class(class) => self.has_class(class),
            Selector::TagClass(tag, class) => self.tag.eq_ignore_ascii_case(tag) && self.has_class(class),
        }
    }
}

static START_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<([a-zA-Z][a-zA-Z0-9-]*)((?:\s+[^>]*?)?)\s*/?>").expect("Invalid regex")
});

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([a-zA-Z_:][-a-zA-Z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .expect("Invalid regex")
});

/// Scan `html` for start tags.
fn scan(html: &str) -> Vec<(String, BTreeMap<String, String>)> {
    START_TAG_RE
        .captures_iter(html)
        .map(|caps| {
            let tag = caps.get(1).map_or("", |m| m.as_str()).to_owned();
            let attributes = caps
                .get(2)
                .map(|m| parse_attributes(m.as_str()))
                .unwrap_or_default();
            (tag, attributes)
        })
        .collect()
}

fn parse_attributes(raw: &str) -> BTreeMap<String, String> {
    ATTR_RE
        .captures_iter(raw)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str().to_ascii_lowercase();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map_or("", |m| m.as_str());
            Some((name, value.to_owned()))
        })
        .collect()
}

/// In-memory [`Page`].
#[derive(Debug, Clone, Default)]
pub struct PageModel {
    path: String,
    elements: Vec<Element>,
}

impl PageModel {
    /// An empty page at `path`.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            elements: Vec::new(),
        }
    }

    /// A page at `path` whose elements are scanned from `html`.
    #[must_use]
    pub fn from_html(path: impl Into<String>, html: &str) -> Self {
        let mut page = Self::new(path);
        page.register(html, None);
        page
    }

    /// A page with the empty navbar and footer containers every storefront
    /// page carries.
    #[must_use]
    pub fn shell(path: impl Into<String>) -> Self {
        Self::from_html(
            path,
            r#"<div id="navbar-container"></div><main></main><div id="footer-container"></div>"#,
        )
    }

    /// Element behind a handle, if it is still attached.
    #[must_use]
    pub fn element(&self, element: ElementRef) -> Option<&Element> {
        self.elements.get(element.0).filter(|e| e.attached)
    }

    /// Element with this id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Element> {
        self.by_id(id).and_then(|r| self.element(r))
    }

    /// Attached elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(|e| e.attached)
    }

    fn register(&mut self, html: &str, parent: Option<ElementRef>) {
        for (tag, attributes) in scan(html) {
            self.elements.push(Element::new(&tag, attributes, parent));
        }
    }

    /// Detach everything inserted under `container`, recursively.
    fn detach_children(&mut self, container: ElementRef) {
        let children: Vec<ElementRef> = self
            .elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.attached && e.parent == Some(container))
            .map(|(i, _)| ElementRef(i))
            .collect();
        for child in children {
            self.detach_children(child);
            if let Some(e) = self.elements.get_mut(child.0) {
                e.attached = false;
            }
        }
    }

    fn element_mut(&mut self, element: ElementRef) -> Option<&mut Element> {
        self.elements.get_mut(element.0).filter(|e| e.attached)
    }
}

impl Page for PageModel {
    fn current_path(&self) -> &str {
        &self.path
    }

    fn select(&self, selector: Selector<'_>) -> Vec<ElementRef> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.attached && e.matches(selector))
            .map(|(i, _)| ElementRef(i))
            .collect()
    }

    fn attribute(&self, element: ElementRef, name: &str) -> Option<String> {
        self.element(element)?.attributes.get(name).cloned()
    }

    fn set_inner_html(&mut self, element: ElementRef, html: &str) {
        if self.element(element).is_none() {
            return;
        }
        self.detach_children(element);
        if let Some(e) = self.element_mut(element) {
            e.inner_html = Some(html.to_owned());
            e.text = None;
        }
        self.register(html, Some(element));
    }

    fn set_text(&mut self, element: ElementRef, text: &str) {
        if self.element(element).is_none() {
            return;
        }
        self.detach_children(element);
        if let Some(e) = self.element_mut(element) {
            e.text = Some(text.to_owned());
            e.inner_html = None;
        }
    }

    fn add_class(&mut self, element: ElementRef, class: &str) {
        let Some(e) = self.element_mut(element) else {
            return;
        };
        if e.has_class(class) {
            return;
        }
        let list = e.attributes.entry("class".to_owned()).or_default();
        if !list.is_empty() {
            list.push(' ');
        }
        list.push_str(class);
    }

    fn remove_class(&mut self, element: ElementRef, class: &str) {
        let Some(e) = self.element_mut(element) else {
            return;
        };
        let kept: Vec<&str> = e.classes().filter(|c| *c != class).collect();
        let kept = kept.join(" ");
        e.attributes.insert("class".to_owned(), kept);
    }

    fn set_attribute(&mut self, element: ElementRef, name: &str, value: &str) {
        if let Some(e) = self.element_mut(element) {
            e.attributes.insert(name.to_ascii_lowercase(), value.to_owned());
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const NAVBAR: &str = r#"
        <nav class="navbar navbar-expand-lg">
          <a class="nav-link" href="index.html">Inicio</a>
          <a class='nav-link' href=productos.html>Productos</a>
          <li class="nav-item admin-only d-none"><a class="nav-link" href="admin.html">Admin</a></li>
          <span id="navUserName"></span>
          <button id="btnLogout" class="btn btn-outline-light" disabled>Salir</button>
        </nav>"#;

    #[test]
    fn test_scans_attributes() {
        let page = PageModel::from_html("/index.html", NAVBAR);
        let links = page.select(Selector::TagClass("a", "nav-link"));
        let hrefs: Vec<String> = links
            .iter()
            .map(|l| page.attribute(*l, "href").unwrap())
            .collect();
        assert_eq!(hrefs, vec!["index.html", "productos.html", "admin.html"]);

        let logout = page.get("btnLogout").unwrap();
        assert_eq!(logout.tag, "button");
        assert_eq!(logout.attributes.get("disabled").map(String::as_str), Some(""));
        assert!(page.get("navUserName").is_some());
    }

    #[test]
    fn test_inner_html_replaces_children() {
        let mut page = PageModel::shell("/");
        let container = page.by_id("navbar-container").unwrap();

        page.set_inner_html(container, NAVBAR);
        assert!(page.by_id("btnLogout").is_some());

        page.set_inner_html(container, "<div class=\"alert\">x</div>");
        assert!(page.by_id("btnLogout").is_none());
        assert_eq!(page.select(Selector::Class("alert")).len(), 1);
    }

    #[test]
    fn test_class_edits() {
        let mut page = PageModel::from_html("/", NAVBAR);
        let admin = page.select(Selector::Class("admin-only"))[0];

        page.remove_class(admin, "d-none");
        let element = page.element(admin).unwrap();
        assert!(!element.has_class("d-none"));
        assert!(element.has_class("nav-item"));

        page.add_class(admin, "active");
        page.add_class(admin, "active");
        assert_eq!(page.attribute(admin, "class").unwrap(), "nav-item admin-only active");
    }
}
