mod import;
mod user;

pub use import::{cmd_import_ingredients, cmd_import_tags};
pub use user::cmd_create_user;
