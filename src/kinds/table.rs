use super::{AttributeSpec as A, ElementKind, QueryStrategy};

/// Attributes every HTML element accepts
pub static GLOBAL_ATTRIBUTES: &[A] = &[
    A::string("id"),
    A::new("class_name", "class", super::AttributeType::String),
    A::string("title"),
    A::string("lang").ci(),
    A::string("dir").ci(),
    A::boolean("hidden"),
    A::int("tabindex"),
    A::string("accesskey"),
    A::string("draggable").ci(),
    A::new("content_editable", "contenteditable", super::AttributeType::String).ci(),
    A::string("role"),
    A::string("style"),
];

/// Attributes whose values HTML defines as case-insensitive
pub static CASE_INSENSITIVE_ATTRIBUTES: &[&str] = &[
    "accept", "accept_charset", "align", "alink", "axis", "bgcolor", "charset", "checked", "clear",
    "codetype", "color", "compact", "declare", "defer", "dir", "direction", "disabled", "enctype", "face",
    "frame", "hreflang", "http_equiv", "lang", "language", "link", "media", "method", "multiple", "nohref",
    "noresize", "noshade", "nowrap", "readonly", "rel", "rev", "rules", "scope", "scrolling", "selected",
    "shape", "target", "type", "valign", "valuetype", "vlink",
];

/// `type` values that never accept free text
pub static NON_TEXT_INPUT_TYPES: &[&str] = &[
    "file", "radio", "checkbox", "submit", "reset", "image", "button", "hidden", "range", "color", "date",
    "datetime-local",
];

/// `type` values that make an `input` behave as a button
pub static BUTTON_INPUT_TYPES: &[&str] = &["button", "submit", "reset", "image"];

static INPUT_ATTRIBUTES: &[A] = &[
    A::string("name"),
    A::string("value"),
    A::string("type").ci(),
    A::string("placeholder"),
    A::string("accept").ci(),
    A::string("alt"),
    A::string("autocomplete"),
    A::boolean("checked"),
    A::boolean("disabled"),
    A::boolean("readonly"),
    A::boolean("required"),
    A::boolean("multiple"),
    A::int("size"),
    A::int("maxlength"),
    A::int("minlength"),
    A::string("min"),
    A::string("max"),
    A::string("step"),
    A::string("pattern"),
    A::string("form"),
    A::string("src"),
];

static BUTTON_ATTRIBUTES: &[A] = &[
    A::string("name"),
    A::string("value"),
    A::string("type").ci(),
    A::boolean("disabled"),
    A::string("form"),
    A::new("form_action", "formaction", super::AttributeType::String),
    A::new("form_method", "formmethod", super::AttributeType::String).ci(),
    A::string("alt"),
    A::string("src"),
];

pub static HTML_ELEMENT: ElementKind = ElementKind {
    name: "html_element",
    tag_names: &[],
    input_type: None,
    attributes: &[],
    strategy: QueryStrategy::Generic,
    frame: false,
};

pub static ANCHOR: ElementKind = ElementKind {
    name: "anchor",
    tag_names: &["a"],
    input_type: None,
    attributes: &[
        A::string("href"),
        A::string("target").ci(),
        A::string("rel").ci(),
        A::string("hreflang").ci(),
        A::string("download"),
        A::string("type").ci(),
        A::string("name"),
    ],
    strategy: QueryStrategy::Generic,
    frame: false,
};

pub static BUTTON: ElementKind = ElementKind {
    name: "button",
    tag_names: &["button"],
    input_type: None,
    attributes: BUTTON_ATTRIBUTES,
    strategy: QueryStrategy::Button,
    frame: false,
};

pub static INPUT: ElementKind = ElementKind {
    name: "input",
    tag_names: &["input"],
    input_type: None,
    attributes: INPUT_ATTRIBUTES,
    strategy: QueryStrategy::Generic,
    frame: false,
};

pub static TEXT_FIELD: ElementKind = ElementKind {
    name: "text_field",
    tag_names: &["input"],
    input_type: None,
    attributes: INPUT_ATTRIBUTES,
    strategy: QueryStrategy::TextField,
    frame: false,
};

pub static CHECKBOX: ElementKind = ElementKind {
    name: "checkbox",
    tag_names: &["input"],
    input_type: Some("checkbox"),
    attributes: INPUT_ATTRIBUTES,
    strategy: QueryStrategy::Generic,
    frame: false,
};

pub static RADIO: ElementKind = ElementKind {
    name: "radio",
    tag_names: &["input"],
    input_type: Some("radio"),
    attributes: INPUT_ATTRIBUTES,
    strategy: QueryStrategy::Generic,
    frame: false,
};

pub static SELECT: ElementKind = ElementKind {
    name: "select",
    tag_names: &["select"],
    input_type: None,
    attributes: &[
        A::string("name"),
        A::boolean("disabled"),
        A::boolean("multiple"),
        A::boolean("required"),
        A::int("size"),
        A::string("form"),
    ],
    strategy: QueryStrategy::Generic,
    frame: false,
};

pub static OPTION: ElementKind = ElementKind {
    name: "option",
    tag_names: &["option"],
    input_type: None,
    attributes: &[
        A::string("value"),
        A::string("label"),
        A::boolean("selected"),
        A::boolean("disabled"),
    ],
    strategy: QueryStrategy::Generic,
    frame: false,
};

pub static OPTGROUP: ElementKind = ElementKind {
    name: "optgroup",
    tag_names: &["optgroup"],
    input_type: None,
    attributes: &[A::string("label"), A::boolean("disabled")],
    strategy: QueryStrategy::Generic,
    frame: false,
};

pub static TEXTAREA: ElementKind = ElementKind {
    name: "textarea",
    tag_names: &["textarea"],
    input_type: None,
    attributes: &[
        A::string("name"),
        A::string("placeholder"),
        A::int("rows"),
        A::int("cols"),
        A::int("maxlength"),
        A::boolean("readonly"),
        A::boolean("disabled"),
        A::boolean("required"),
        A::string("wrap").ci(),
    ],
    strategy: QueryStrategy::Generic,
    frame: false,
};

pub static LABEL: ElementKind = ElementKind {
    name: "label",
    tag_names: &["label"],
    input_type: None,
    attributes: &[A::string("for"), A::string("form")],
    strategy: QueryStrategy::Generic,
    frame: false,
};

pub static FORM: ElementKind = ElementKind {
    name: "form",
    tag_names: &["form"],
    input_type: None,
    attributes: &[
        A::string("action"),
        A::string("method").ci(),
        A::string("enctype").ci(),
        A::string("target").ci(),
        A::string("name"),
        A::new("accept_charset", "accept-charset", super::AttributeType::String).ci(),
        A::boolean("novalidate"),
    ],
    strategy: QueryStrategy::Generic,
    frame: false,
};

pub static IMAGE: ElementKind = ElementKind {
    name: "image",
    tag_names: &["img"],
    input_type: None,
    attributes: &[
        A::string("src"),
        A::string("alt"),
        A::int("width"),
        A::int("height"),
        A::string("srcset"),
        A::string("loading").ci(),
    ],
    strategy: QueryStrategy::Generic,
    frame: false,
};

pub static TABLE: ElementKind = ElementKind {
    name: "table",
    tag_names: &["table"],
    input_type: None,
    attributes: &[A::string("border"), A::string("summary"), A::string("rules").ci()],
    strategy: QueryStrategy::Generic,
    frame: false,
};

pub static TABLE_SECTION: ElementKind = ElementKind {
    name: "table_section",
    tag_names: &["tbody", "thead", "tfoot"],
    input_type: None,
    attributes: &[A::string("align").ci(), A::string("valign").ci()],
    strategy: QueryStrategy::Generic,
    frame: false,
};

pub static ROW: ElementKind = ElementKind {
    name: "row",
    tag_names: &["tr"],
    input_type: None,
    attributes: &[A::string("align").ci(), A::string("valign").ci()],
    strategy: QueryStrategy::Row,
    frame: false,
};

pub static CELL: ElementKind = ElementKind {
    name: "cell",
    tag_names: &["th", "td"],
    input_type: None,
    attributes: &[
        A::int("colspan"),
        A::int("rowspan"),
        A::string("headers"),
        A::string("abbr"),
        A::string("scope").ci(),
    ],
    strategy: QueryStrategy::Cell,
    frame: false,
};

pub static DIV: ElementKind = ElementKind {
    name: "div",
    tag_names: &["div"],
    input_type: None,
    attributes: &[A::string("align").ci()],
    strategy: QueryStrategy::Generic,
    frame: false,
};

pub static SPAN: ElementKind = ElementKind {
    name: "span",
    tag_names: &["span"],
    input_type: None,
    attributes: &[],
    strategy: QueryStrategy::Generic,
    frame: false,
};

pub static PARAGRAPH: ElementKind = ElementKind {
    name: "paragraph",
    tag_names: &["p"],
    input_type: None,
    attributes: &[A::string("align").ci()],
    strategy: QueryStrategy::Generic,
    frame: false,
};

pub static LIST_ITEM: ElementKind = ElementKind {
    name: "list_item",
    tag_names: &["li"],
    input_type: None,
    attributes: &[A::int("value")],
    strategy: QueryStrategy::Generic,
    frame: false,
};

pub static LIST: ElementKind = ElementKind {
    name: "list",
    tag_names: &["ul", "ol"],
    input_type: None,
    attributes: &[A::boolean("reversed"), A::int("start"), A::string("type")],
    strategy: QueryStrategy::Generic,
    frame: false,
};

pub static HEADING: ElementKind = ElementKind {
    name: "heading",
    tag_names: &["h1", "h2", "h3", "h4", "h5", "h6"],
    input_type: None,
    attributes: &[A::string("align").ci()],
    strategy: QueryStrategy::Generic,
    frame: false,
};

pub static METER: ElementKind = ElementKind {
    name: "meter",
    tag_names: &["meter"],
    input_type: None,
    attributes: &[
        A::float("value"),
        A::float("min"),
        A::float("max"),
        A::float("low"),
        A::float("high"),
        A::float("optimum"),
    ],
    strategy: QueryStrategy::Generic,
    frame: false,
};

pub static TRACK: ElementKind = ElementKind {
    name: "track",
    tag_names: &["track"],
    input_type: None,
    attributes: &[
        A::string("kind").ci(),
        A::string("src"),
        A::string("srclang"),
        A::string("label"),
        A::boolean("default"),
    ],
    strategy: QueryStrategy::Generic,
    frame: false,
};

pub static IFRAME: ElementKind = ElementKind {
    name: "iframe",
    tag_names: &["iframe"],
    input_type: None,
    attributes: &[
        A::string("src"),
        A::string("srcdoc"),
        A::string("name"),
        A::int("width"),
        A::int("height"),
        A::string("sandbox"),
    ],
    strategy: QueryStrategy::Generic,
    frame: true,
};

pub static FRAME: ElementKind = ElementKind {
    name: "frame",
    tag_names: &["frame"],
    input_type: None,
    attributes: &[A::string("src"), A::string("name"), A::boolean("noresize").ci()],
    strategy: QueryStrategy::Generic,
    frame: true,
};

/// Registry, in lookup order
pub static KINDS: &[&ElementKind] = &[
    &HTML_ELEMENT,
    &ANCHOR,
    &BUTTON,
    &INPUT,
    &TEXT_FIELD,
    &CHECKBOX,
    &RADIO,
    &SELECT,
    &OPTION,
    &OPTGROUP,
    &TEXTAREA,
    &LABEL,
    &FORM,
    &IMAGE,
    &TABLE,
    &TABLE_SECTION,
    &ROW,
    &CELL,
    &DIV,
    &SPAN,
    &PARAGRAPH,
    &LIST_ITEM,
    &LIST,
    &HEADING,
    &METER,
    &TRACK,
    &IFRAME,
    &FRAME,
];
