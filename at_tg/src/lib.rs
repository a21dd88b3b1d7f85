pub mod auth;
pub mod bot_commands;
pub mod config;
pub mod editor;
pub mod error_handling;
pub mod handlers;
pub mod keyboards;
pub mod render;
pub mod session;

pub use auth::AdminGuard;
pub use bot_commands::Command;
pub use config::BotConfig;
pub use config::ConfigError;
pub use editor::EditError;
pub use editor::EditOutcome;
pub use editor::ParamEditor;
pub use handlers::BotContext;
pub use handlers::schema;
pub use keyboards::MenuAction;
pub use session::EditState;
pub use session::EditableField;
