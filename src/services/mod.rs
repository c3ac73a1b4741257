pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService};
pub use auth_service_impl::SeaOrmAuthService;

pub mod user_service;
pub mod user_service_impl;
pub use user_service::{UserError, UserService, UserView};
pub use user_service_impl::SeaOrmUserService;

pub mod catalog_service;
pub mod catalog_service_impl;
pub use catalog_service::{CatalogError, CatalogService};
pub use catalog_service_impl::SeaOrmCatalogService;

pub mod recipe_service;
pub mod recipe_service_impl;
pub use recipe_service::{RecipeError, RecipeQuery, RecipeService, RecipeView};
pub use recipe_service_impl::SeaOrmRecipeService;

pub mod social_service;
pub mod social_service_impl;
pub use social_service::{AuthorView, SocialError, SocialService};
pub use social_service_impl::SeaOrmSocialService;

pub mod shopping_list;
pub use shopping_list::render_shopping_list;
