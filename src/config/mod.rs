mod manager;

pub use manager::{
    BUILTIN_API_KEY_ENV, BUILTIN_ENDPOINT, BUILTIN_MODELS, BUILTIN_PROVIDER, ChatConfig,
    ConfigError, ConfigFile, ConfigManager, CustomPersona, ProviderConfig, ResolveOptions,
    ResolvedConfig, resolve_config,
};
