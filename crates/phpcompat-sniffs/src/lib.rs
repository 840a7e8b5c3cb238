//! phpcompat-sniffs: PHP cross-version compatibility checks
//!
//! Available sniffs:
//! - new_functions: functions not available in the oldest targeted version
//! - removed_functions: deprecated or removed functions
//! - removed_extensions: functions of deprecated or removed extensions
//! - new_constants: constants not available in the oldest targeted version
//! - removed_constants: deprecated or removed constants
//! - new_interfaces: built-in interfaces implemented before they existed
//! - new_type_declarations: parameter and return types newer than the range
//! - new_keywords: keywords and language constructs newer than the range
//! - new_execution_directives: unknown, invalid or too new `declare()` directives
//! - removed_ini_directives: deprecated or removed `ini_set()`/`ini_get()` settings
//! - removed_mbstring_modifiers: the `e` modifier in mbstring regex options

pub mod check;
pub mod options;
pub mod registry;

pub mod new_constants;
pub mod new_execution_directives;
pub mod new_functions;
pub mod new_interfaces;
pub mod new_keywords;
pub mod new_type_declarations;
pub mod removed_constants;
pub mod removed_extensions;
pub mod removed_functions;
pub mod removed_ini_directives;
pub mod removed_mbstring_modifiers;

pub use options::{NameListSetting, OptionSettings, SniffOptions};
pub use registry::{RegistryError, Sniff, SniffRegistry};

pub use new_constants::check_new_constants;
pub use new_execution_directives::check_new_execution_directives;
pub use new_functions::check_new_functions;
pub use new_interfaces::check_new_interfaces;
pub use new_keywords::check_new_keywords;
pub use new_type_declarations::check_new_type_declarations;
pub use removed_constants::check_removed_constants;
pub use removed_extensions::check_removed_extensions;
pub use removed_functions::check_removed_functions;
pub use removed_ini_directives::check_removed_ini_directives;
pub use removed_mbstring_modifiers::check_removed_mbstring_modifiers;
