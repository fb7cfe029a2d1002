//! Tree configuration.

/// Per-tree configuration.
///
/// Controls the defaults applied to every component created in a tree.
#[derive(Debug, Clone)]
pub struct TreeConfig {
    /// Control-parent name used when a spec does not set one.
    pub control_parent_name: String,

    /// If true, components created without an owner are registered with
    /// the default owner so system-wide broadcasts can reach them.
    /// Registered components stay alive until explicitly destroyed.
    pub register_ownerless: bool,

    /// Name given to the default owner component.
    pub master_name: String,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            control_parent_name: "client".to_string(),
            register_ownerless: true,
            master_name: "master".to_string(),
        }
    }
}

impl TreeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default control-parent name.
    pub fn control_parent_name(mut self, name: impl Into<String>) -> Self {
        self.control_parent_name = name.into();
        self
    }

    /// Do not register ownerless components with the default owner.
    pub fn without_ownerless_registration(mut self) -> Self {
        self.register_ownerless = false;
        self
    }

    /// Set the default owner's name.
    pub fn master_name(mut self, name: impl Into<String>) -> Self {
        self.master_name = name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TreeConfig::default();
        assert_eq!(config.control_parent_name, "client");
        assert!(config.register_ownerless);
        assert_eq!(config.master_name, "master");
    }

    #[test]
    fn test_builder() {
        let config = TreeConfig::new()
            .control_parent_name("body")
            .without_ownerless_registration()
            .master_name("root");
        assert_eq!(config.control_parent_name, "body");
        assert!(!config.register_ownerless);
        assert_eq!(config.master_name, "root");
    }
}
