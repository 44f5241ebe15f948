//! Style/explode-aware rendering of parameter values into wire strings.
//!
//! Pure functions over the current values of a tree: rendering never mutates
//! and is total. Unassigned leaves render as the empty string, arrays with
//! no elements yield the empty join. Property and element order follows
//! declaration order, never an alphabetical re-sort.

use crate::parameter::{
    ArrayParameter, LeafParameter, ObjectParameter, ParameterElement, ParameterStyle,
};

impl ParameterElement {
    /// Render with the parameter's own resolved style and explode flag
    pub fn render(&self) -> String {
        self.render_as(self.style(), self.explode())
    }

    /// Render with an explicit style and the parameter's own explode flag
    pub fn render_with_style(&self, style: ParameterStyle) -> String {
        self.render_as(style, self.explode())
    }

    /// Render with an explicit style and explode flag
    pub fn render_as(&self, style: ParameterStyle, explode: bool) -> String {
        match self {
            ParameterElement::Leaf(leaf) => render_primitive(leaf, style),
            ParameterElement::Object(object) => render_object(object, style, explode),
            ParameterElement::Array(array) => render_array(array, style, explode),
            ParameterElement::Combined(combined) => {
                match combined.schemas().iter().find(|schema| schema.has_value()) {
                    Some(schema) => schema.render_as(style, explode),
                    None => {
                        tracing::warn!(
                            "combined schema parameter '{}' has no valued candidate to render",
                            self.name()
                        );
                        String::new()
                    }
                }
            }
        }
    }

    /// Plain value of the element as used inside composite renderings:
    /// leaves as bare text, composites flattened with commas
    fn value_string(&self) -> String {
        match self {
            ParameterElement::Leaf(leaf) => {
                leaf.value().map(ToString::to_string).unwrap_or_default()
            }
            ParameterElement::Object(object) => object
                .properties()
                .iter()
                .flat_map(|(name, child)| [name.clone(), child.value_string()])
                .collect::<Vec<_>>()
                .join(","),
            ParameterElement::Array(array) => array
                .elements()
                .iter()
                .map(ParameterElement::value_string)
                .collect::<Vec<_>>()
                .join(","),
            ParameterElement::Combined(combined) => combined
                .schemas()
                .iter()
                .find(|schema| schema.has_value())
                .map(ParameterElement::value_string)
                .unwrap_or_default(),
        }
    }
}

fn render_primitive(leaf: &LeafParameter, style: ParameterStyle) -> String {
    let name = &leaf.meta.name;
    let value = leaf.value().map(ToString::to_string).unwrap_or_default();
    match style {
        ParameterStyle::Matrix => format!(";{name}={value}"),
        ParameterStyle::Form => format!("{name}={value}"),
        ParameterStyle::Label => format!(".{value}"),
        ParameterStyle::Simple
        | ParameterStyle::SpaceDelimited
        | ParameterStyle::PipeDelimited => value,
        ParameterStyle::DeepObject => {
            tracing::warn!(
                "deepObject style applies to objects only; rendering '{name}' as a plain value"
            );
            value
        }
    }
}

fn render_array(array: &ArrayParameter, style: ParameterStyle, explode: bool) -> String {
    let name = &array.meta.name;
    let values: Vec<String> = array
        .elements()
        .iter()
        .map(ParameterElement::value_string)
        .collect();

    match style {
        ParameterStyle::Simple => values.join(","),
        ParameterStyle::Label => {
            if values.is_empty() {
                String::new()
            } else {
                format!(".{}", values.join("."))
            }
        }
        ParameterStyle::Matrix => {
            if explode {
                values
                    .iter()
                    .map(|value| format!(";{name}={value}"))
                    .collect()
            } else {
                format!(";{name}={}", values.join(","))
            }
        }
        ParameterStyle::Form => {
            if explode {
                values
                    .iter()
                    .map(|value| format!("{name}={value}"))
                    .collect::<Vec<_>>()
                    .join("&")
            } else {
                format!("{name}={}", values.join(","))
            }
        }
        ParameterStyle::SpaceDelimited => values.join("%20"),
        ParameterStyle::PipeDelimited => values.join("|"),
        ParameterStyle::DeepObject => {
            tracing::warn!(
                "deepObject style applies to objects only; rendering array '{name}' as simple"
            );
            values.join(",")
        }
    }
}

fn render_object(object: &ObjectParameter, style: ParameterStyle, explode: bool) -> String {
    let name = &object.meta.name;
    let pairs: Vec<(&str, String)> = object
        .properties()
        .iter()
        .map(|(property, child)| (property.as_str(), child.value_string()))
        .collect();
    // The non-exploded shape flattens keys and values into one list
    let flat = |separator: &str| -> String {
        pairs
            .iter()
            .flat_map(|(property, value)| [property.to_string(), value.clone()])
            .collect::<Vec<_>>()
            .join(separator)
    };

    match style {
        ParameterStyle::Simple => {
            if explode {
                pairs
                    .iter()
                    .map(|(property, value)| format!("{property}={value}"))
                    .collect::<Vec<_>>()
                    .join(",")
            } else {
                flat(",")
            }
        }
        ParameterStyle::Label => {
            if pairs.is_empty() {
                return String::new();
            }
            if explode {
                pairs
                    .iter()
                    .map(|(property, value)| format!(".{property}={value}"))
                    .collect()
            } else {
                format!(".{}", flat("."))
            }
        }
        ParameterStyle::Matrix => {
            if explode {
                pairs
                    .iter()
                    .map(|(property, value)| format!(";{property}={value}"))
                    .collect()
            } else {
                format!(";{name}={}", flat(","))
            }
        }
        ParameterStyle::Form => {
            if explode {
                pairs
                    .iter()
                    .map(|(property, value)| format!("{property}={value}"))
                    .collect::<Vec<_>>()
                    .join("&")
            } else {
                format!("{name}={}", flat(","))
            }
        }
        ParameterStyle::SpaceDelimited => flat("%20"),
        ParameterStyle::PipeDelimited => flat("|"),
        ParameterStyle::DeepObject => pairs
            .iter()
            .map(|(property, value)| format!("{name}[{property}]={value}"))
            .collect::<Vec<_>>()
            .join("&"),
    }
}
