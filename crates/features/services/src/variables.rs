use bindery_xml::Element;

const VARIABLE: &str = "variable";

/// Appends `<variable name=".." value=".."/>` to the binding-variables root.
pub fn add_variable(root: &mut Element, name: impl Into<String>, value: impl Into<String>) {
    root.push(Element::new(VARIABLE).with_attribute("name", name).with_attribute("value", value));
}

/// Value of the first variable called `name`.
#[must_use]
pub fn variable_value<'a>(root: &'a Element, name: &str) -> Option<&'a str> {
    root.elements()
        .find(|v| v.name() == VARIABLE && v.attribute("name") == Some(name))
        .and_then(|v| v.attribute("value"))
}
