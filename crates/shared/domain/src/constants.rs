//! Names and defaults shared across the workspace.

/// Registry key every plugin set must provide as the catch-all.
pub const DEFAULT_TYPE_KEY: &str = "default";

/// Stanza kind used when a descriptor does not declare one.
pub const NO_STANZA: &str = "none";

/// Root element of the binding-variables document.
pub const VARIABLES_ROOT: &str = "server";

/// File written into the server directory with the binding variables.
pub const VARIABLES_FILE: &str = "runtime-vars.xml";

/// Configuration document of the hosted server.
pub const SERVER_CONFIG_FILE: &str = "server.xml";

/// Subdirectory of the server directory that receives client libraries.
pub const LIBRARY_DIR: &str = "lib";

/// Extension of an installable client library.
pub const LIBRARY_EXTENSION: &str = "jar";

/// Path expression handlers use to reference the client library directory.
pub const LIBRARY_REF: &str = "${server.config.dir}/lib";

/// Environment variable carrying the opt-out directive.
pub const OPT_OUT_ENV: &str = "services_autoconfig_excludes";

/// Environment variable carrying the bound services document.
pub const SERVICES_ENV: &str = "VCAP_SERVICES";
