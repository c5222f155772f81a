//! The built-in default document every composition starts from.

use serde_yaml::Value;

/// Hard-coded baseline configuration. Profile layers merge over this.
pub const DEFAULT_DOCUMENT: &str = r#"
meta:
  min_ver: "0.1.0"
  generator: ninja
manifest:
  name: untitled
  type: executable
  version: "0.1.0"
  tooling:
    CC: cc
    CXX: c++
    CCFLAGS: ""
    CXXFLAGS: ""
    FMT: clang-format
    LINTER: clang-tidy
  dirs:
    include: [include]
    source: [src]
    build: build
dependencies: []
features: []
hooks: {}
"#;

/// Parse the default document into a value tree.
pub fn default_document() -> Value {
    serde_yaml::from_str(DEFAULT_DOCUMENT).expect("built-in default document parses")
}
