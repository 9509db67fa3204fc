use serde::{Deserialize, Serialize};

/// Naming options for generated classes and files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorSettings {
    /// Prepended to the interface name: `IFoo` becomes `SIFoo`
    #[serde(default = "default_class_prefix")]
    pub class_prefix: String,

    /// Inserted between the class name and the file extension: `SIFoo.g.cs`
    #[serde(default = "default_filename_suffix")]
    pub filename_suffix: String,

    /// Generic runtime base class the generated class derives from
    #[serde(default = "default_base_class")]
    pub base_class: String,
}

fn default_class_prefix() -> String {
    "S".to_string()
}

fn default_filename_suffix() -> String {
    ".g".to_string()
}

fn default_base_class() -> String {
    "SerializableInterface".to_string()
}

impl GeneratorSettings {
    /// Name of the generated class for an interface
    pub fn class_name(&self, interface_name: &str) -> String {
        format!("{}{}", self.class_prefix, interface_name)
    }

    /// File name, extension included, of the generated unit for an interface
    pub fn file_name(&self, interface_name: &str, extension: &str) -> String {
        format!(
            "{}{}.{}",
            self.class_name(interface_name),
            self.filename_suffix,
            extension
        )
    }
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            class_prefix: default_class_prefix(),
            filename_suffix: default_filename_suffix(),
            base_class: default_base_class(),
        }
    }
}
