//! Attribute schemas the provider registers with the host.
use crate::{
    validation::{
        validate_color, validate_flag_key, validate_key, validate_variation_value,
        validate_variations_kind,
    },
    ValidationError,
};

/// Validates one attribute value. Receives the attribute name and the value.
pub type Validator = fn(&str, &str) -> Result<(), ValidationError>;

/// Value type of an attribute.
#[derive(Clone, Copy)]
pub enum AttributeType {
    /// A single string.
    String,
    /// A boolean.
    Bool,
    /// A list of strings.
    StringList,
    /// Ordered list of nested blocks.
    BlockList(&'static [AttributeSchema]),
}

/// Who sets an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Set by the user, always.
    Required,
    /// Set by the user, may be left out.
    Optional,
    /// Set by the provider only.
    Computed,
    /// Set by the user, or by the provider when left out.
    OptionalComputed,
}

/// Value the host fills in for an attribute left out of the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    /// Boolean default.
    Bool(bool),
    /// String default.
    String(&'static str),
}

/// One attribute of a resource, data source or the provider block.
#[derive(Clone, Copy)]
pub struct AttributeSchema {
    /// Attribute name as written in configuration.
    pub name: &'static str,
    /// Value type.
    pub kind: AttributeType,
    /// Who sets the attribute.
    pub presence: Presence,
    /// The host masks the value in its output.
    pub sensitive: bool,
    /// Changing the attribute destroys and recreates the resource.
    pub force_new: bool,
    /// Minimum number of entries for list attributes.
    pub min_items: usize,
    /// Default for attributes left out.
    pub default: Option<DefaultValue>,
    /// Validator run on the configured value.
    pub validate: Option<Validator>,
}

impl AttributeSchema {
    const fn new(name: &'static str, kind: AttributeType, presence: Presence) -> Self {
        AttributeSchema {
            name,
            kind,
            presence,
            sensitive: false,
            force_new: false,
            min_items: 0,
            default: None,
            validate: None,
        }
    }

    const fn validated(mut self, validate: Validator) -> Self {
        self.validate = Some(validate);
        self
    }

    const fn with_default(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }
}

/// Schema of a resource or data source.
#[derive(Clone, Copy)]
pub struct ResourceSchema {
    /// Type name registered with the host.
    pub name: &'static str,
    /// Top-level attributes.
    pub attributes: &'static [AttributeSchema],
    /// Whether `import` is supported.
    pub importable: bool,
}

impl ResourceSchema {
    /// Look up a top-level attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&AttributeSchema> {
        self.attributes.iter().find(|attribute| attribute.name == name)
    }
}

use AttributeType::{Bool, BlockList, StringList};
use Presence::{Computed, Optional, OptionalComputed, Required};

const STRING: AttributeType = AttributeType::String;

pub(crate) static PROVIDER: ResourceSchema = ResourceSchema {
    name: "launchdarkly",
    attributes: &[AttributeSchema {
        sensitive: true,
        ..AttributeSchema::new("access_token", STRING, Required)
    }],
    importable: false,
};

const TARGETING_RULE: &[AttributeSchema] = &[
    AttributeSchema::new("value", STRING, Required).validated(validate_variation_value),
    AttributeSchema::new("environment", STRING, Required).validated(validate_key),
];

const VARIATION: &[AttributeSchema] = &[
    AttributeSchema::new("value", STRING, Required).validated(validate_variation_value),
    AttributeSchema::new("name", STRING, Optional),
    AttributeSchema::new("description", STRING, Optional),
];

const CUSTOM_PROPERTY: &[AttributeSchema] = &[
    AttributeSchema::new("key", STRING, Required),
    AttributeSchema::new("name", STRING, Required),
    AttributeSchema::new("value", StringList, Required),
];

const COMPUTED_CUSTOM_PROPERTY: &[AttributeSchema] = &[
    AttributeSchema::new("key", STRING, Computed),
    AttributeSchema::new("name", STRING, Computed),
    AttributeSchema::new("value", StringList, Computed),
];

pub(crate) static RESOURCES: &[ResourceSchema] = &[
    ResourceSchema {
        name: "launchdarkly_project",
        attributes: &[
            AttributeSchema::new("name", STRING, Required),
            AttributeSchema::new("key", STRING, Required).validated(validate_key),
        ],
        importable: true,
    },
    ResourceSchema {
        name: "launchdarkly_environment",
        attributes: &[
            AttributeSchema::new("project_key", STRING, Required).validated(validate_key),
            AttributeSchema::new("name", STRING, Required),
            AttributeSchema::new("key", STRING, Required).validated(validate_key),
            AttributeSchema::new("color", STRING, Required).validated(validate_color),
            AttributeSchema::new("api_key", STRING, Computed),
            AttributeSchema::new("mobile_key", STRING, Computed),
        ],
        importable: true,
    },
    ResourceSchema {
        name: "launchdarkly_feature_flag",
        attributes: &[
            AttributeSchema::new("project_key", STRING, Required).validated(validate_key),
            AttributeSchema::new("name", STRING, Required),
            AttributeSchema::new("key", STRING, Required).validated(validate_flag_key),
            AttributeSchema::new("description", STRING, Optional),
            AttributeSchema::new("temporary", Bool, Optional).with_default(DefaultValue::Bool(true)),
            AttributeSchema::new("include_in_snippet", Bool, Optional)
                .with_default(DefaultValue::Bool(false)),
            AttributeSchema {
                force_new: true,
                ..AttributeSchema::new("variations_kind", STRING, Optional)
                    .with_default(DefaultValue::String("boolean"))
                    .validated(validate_variations_kind)
            },
            AttributeSchema::new("default_targeting_rule", BlockList(TARGETING_RULE), Optional),
            AttributeSchema::new("default_off_targeting_rule", BlockList(TARGETING_RULE), Optional),
            AttributeSchema {
                min_items: 2,
                ..AttributeSchema::new("variations", BlockList(VARIATION), OptionalComputed)
            },
            AttributeSchema::new("tags", StringList, Optional),
            AttributeSchema::new("custom_properties", BlockList(CUSTOM_PROPERTY), Optional),
        ],
        importable: true,
    },
];

pub(crate) static DATA_SOURCES: &[ResourceSchema] = &[
    ResourceSchema {
        name: "launchdarkly_project",
        attributes: &[
            AttributeSchema::new("name", STRING, Computed),
            AttributeSchema::new("key", STRING, Required).validated(validate_key),
        ],
        importable: false,
    },
    ResourceSchema {
        name: "launchdarkly_environment",
        attributes: &[
            AttributeSchema::new("project_key", STRING, Required).validated(validate_key),
            AttributeSchema::new("name", STRING, Computed),
            AttributeSchema::new("key", STRING, Required).validated(validate_key),
            AttributeSchema::new("color", STRING, Computed),
            AttributeSchema::new("api_key", STRING, Computed),
            AttributeSchema::new("mobile_key", STRING, Computed),
        ],
        importable: false,
    },
    ResourceSchema {
        name: "launchdarkly_feature_flag",
        attributes: &[
            AttributeSchema::new("project_key", STRING, Required).validated(validate_key),
            AttributeSchema::new("name", STRING, Computed),
            AttributeSchema::new("key", STRING, Required),
            AttributeSchema::new("description", STRING, Computed),
            AttributeSchema::new("temporary", Bool, Computed),
            AttributeSchema::new("include_in_snippet", Bool, Computed),
            AttributeSchema::new("tags", StringList, Computed),
            AttributeSchema::new("custom_properties", BlockList(COMPUTED_CUSTOM_PROPERTY), Computed),
        ],
        importable: false,
    },
];
