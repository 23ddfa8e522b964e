//! Declarative admin form metadata.
//!
//! A connection factory describes the settings it needs as an ordered list
//! of form elements. The host renders them in its admin UI and stores the
//! submitted values as [`Parameters`](super::Parameters).

use serde::{Deserialize, Serialize};

/// One selectable option of a [`Select`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Stored value.
    pub key: String,
    /// Label shown to the admin.
    pub value: String,
}

/// Drop-down element.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Select {
    /// Parameter name the value is stored under.
    pub name: String,
    /// Field title.
    pub title: String,
    /// Available options, in display order.
    pub options: Vec<SelectOption>,
    /// Help text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

/// Free-text element.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Input {
    /// Parameter name the value is stored under.
    pub name: String,
    /// Field title.
    pub title: String,
    /// HTML input type, e.g. `text` or `password`.
    #[serde(rename = "type")]
    pub input_type: String,
    /// Help text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

/// A form element.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "element", rename_all = "lowercase")]
pub enum Element {
    /// Drop-down.
    Select(Select),
    /// Free-text input.
    Input(Input),
}

impl Element {
    /// Parameter name of the element.
    pub fn name(&self) -> &str {
        match self {
            Self::Select(select) => &select.name,
            Self::Input(input) => &input.name,
        }
    }

    /// Returns true for drop-downs.
    pub fn is_select(&self) -> bool {
        matches!(self, Self::Select(_))
    }

    /// Returns true for free-text inputs.
    pub fn is_input(&self) -> bool {
        matches!(self, Self::Input(_))
    }
}

/// Ordered list of form elements.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    elements: Vec<Element>,
}

impl Container {
    /// Elements in registration order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if no element was registered.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Look up an element by parameter name.
    pub fn get(&self, name: &str) -> Option<&Element> {
        self.elements.iter().find(|element| element.name() == name)
    }
}

/// Collects form elements in order.
#[derive(Debug, Default)]
pub struct Builder {
    form: Container,
}

impl Builder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element.
    pub fn add(&mut self, element: Element) {
        self.form.elements.push(element);
    }

    /// The form built so far.
    pub fn form(&self) -> &Container {
        &self.form
    }

    /// Consume the builder and return the form.
    pub fn into_form(self) -> Container {
        self.form
    }
}

/// Creates form elements.
///
/// The host supplies its own factory; [`DefaultElementFactory`] builds the
/// plain element types of this module.
pub trait ElementFactory: Send + Sync {
    /// Create a drop-down from `(key, label)` pairs.
    fn new_select(&self, name: &str, title: &str, options: &[(&str, &str)], help: &str)
        -> Element;

    /// Create a free-text input.
    fn new_input(&self, name: &str, title: &str, input_type: &str, help: &str) -> Element;
}

/// Element factory producing [`Select`] and [`Input`] elements.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultElementFactory;

impl ElementFactory for DefaultElementFactory {
    fn new_select(
        &self,
        name: &str,
        title: &str,
        options: &[(&str, &str)],
        help: &str,
    ) -> Element {
        Element::Select(Select {
            name: name.to_string(),
            title: title.to_string(),
            options: options
                .iter()
                .map(|(key, value)| SelectOption {
                    key: key.to_string(),
                    value: value.to_string(),
                })
                .collect(),
            help: non_empty(help),
        })
    }

    fn new_input(&self, name: &str, title: &str, input_type: &str, help: &str) -> Element {
        Element::Input(Input {
            name: name.to_string(),
            title: title.to_string(),
            input_type: input_type.to_string(),
            help: non_empty(help),
        })
    }
}

fn non_empty(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
