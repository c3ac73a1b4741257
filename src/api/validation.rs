use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

use super::ApiError;
use super::types::{LoginRequest, RecipeRequest, SetPasswordRequest, SignupRequest};
use crate::models::errors::FieldErrors;
use crate::models::recipe::{IngredientAmount, RecipeDraft, RecipePatch};
use crate::models::user::NewUser;

const REQUIRED: &str = "This field is required.";
const BLANK: &str = "This field may not be blank.";
const EMPTY_LIST: &str = "This list may not be empty.";
const MIN_ONE: &str = "Ensure this value is greater than or equal to 1.";

const EMAIL_MAX_LEN: usize = 254;
const USER_NAME_MAX_LEN: usize = 150;
const RECIPE_NAME_MAX_LEN: usize = 200;

fn username_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[\w.@+-]+$").expect("Invalid regex"))
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("Invalid regex"))
}

pub fn validate_id(resource: &str, id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::not_found(resource, id));
    }
    Ok(id)
}

/// Required, trimmed, non-blank text with an optional length cap.
fn required_text(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<String>,
    max_len: Option<usize>,
) -> Option<String> {
    let Some(value) = value else {
        errors.add(field, REQUIRED);
        return None;
    };

    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(field, BLANK);
        return None;
    }

    if let Some(max) = max_len
        && trimmed.chars().count() > max
    {
        errors.add(
            field,
            format!("Ensure this field has no more than {max} characters."),
        );
        return None;
    }

    Some(trimmed.to_string())
}

/// Passwords are taken verbatim.
fn required_password(errors: &mut FieldErrors, field: &str, value: Option<String>) -> Option<String> {
    match value {
        None => {
            errors.add(field, REQUIRED);
            None
        }
        Some(v) if v.is_empty() => {
            errors.add(field, BLANK);
            None
        }
        Some(v) => Some(v),
    }
}

pub fn validate_signup(req: SignupRequest) -> Result<NewUser, FieldErrors> {
    let mut errors = FieldErrors::new();

    let email = required_text(&mut errors, "email", req.email, Some(EMAIL_MAX_LEN))
        .filter(|email| {
            let ok = email_regex().is_match(email);
            if !ok {
                errors.add("email", "Enter a valid email address.");
            }
            ok
        });

    let username = required_text(&mut errors, "username", req.username, Some(USER_NAME_MAX_LEN))
        .filter(|name| {
            let ok = username_regex().is_match(name);
            if !ok {
                errors.add(
                    "username",
                    "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
                );
            }
            ok
        });

    let first_name = required_text(
        &mut errors,
        "first_name",
        req.first_name,
        Some(USER_NAME_MAX_LEN),
    );
    let last_name = required_text(&mut errors, "last_name", req.last_name, Some(USER_NAME_MAX_LEN));
    let password = required_password(&mut errors, "password", req.password);

    match (email, username, first_name, last_name, password) {
        (Some(email), Some(username), Some(first_name), Some(last_name), Some(password))
            if errors.is_empty() =>
        {
            Ok(NewUser {
                email,
                username,
                first_name,
                last_name,
                password,
            })
        }
        _ => Err(errors),
    }
}

pub fn validate_login(req: LoginRequest) -> Result<(String, String), FieldErrors> {
    let mut errors = FieldErrors::new();
    let email = required_text(&mut errors, "email", req.email, None);
    let password = required_password(&mut errors, "password", req.password);

    match (email, password) {
        (Some(email), Some(password)) => Ok((email, password)),
        _ => Err(errors),
    }
}

/// Returns `(current_password, new_password)`.
pub fn validate_set_password(req: SetPasswordRequest) -> Result<(String, String), FieldErrors> {
    let mut errors = FieldErrors::new();
    let new_password = required_password(&mut errors, "new_password", req.new_password);
    let current_password = required_password(&mut errors, "current_password", req.current_password);

    match (current_password, new_password) {
        (Some(current), Some(new)) => Ok((current, new)),
        _ => Err(errors),
    }
}

fn positive_i32(errors: &mut FieldErrors, field: &str, value: i64) -> Option<i32> {
    if value < 1 {
        errors.add(field, MIN_ONE);
        return None;
    }
    match i32::try_from(value) {
        Ok(v) => Some(v),
        Err(_) => {
            errors.add(
                field,
                format!("Ensure this value is less than or equal to {}.", i32::MAX),
            );
            None
        }
    }
}

fn check_cooking_time(errors: &mut FieldErrors, value: Option<i64>) -> Option<i32> {
    let Some(value) = value else {
        errors.add("cooking_time", REQUIRED);
        return None;
    };
    positive_i32(errors, "cooking_time", value)
}

fn check_tags(errors: &mut FieldErrors, tags: Option<Vec<i32>>) -> Option<Vec<i32>> {
    let Some(tags) = tags else {
        errors.add("tags", REQUIRED);
        return None;
    };

    if tags.is_empty() {
        errors.add("tags", EMPTY_LIST);
        return None;
    }

    let mut seen = HashSet::with_capacity(tags.len());
    if !tags.iter().all(|id| seen.insert(*id)) {
        errors.add("tags", "Tags must not repeat.");
        return None;
    }

    Some(tags)
}

fn check_ingredients(
    errors: &mut FieldErrors,
    ingredients: Option<Vec<super::types::IngredientAmountRequest>>,
) -> Option<Vec<IngredientAmount>> {
    let Some(ingredients) = ingredients else {
        errors.add("ingredients", REQUIRED);
        return None;
    };

    if ingredients.is_empty() {
        errors.add("ingredients", EMPTY_LIST);
        return None;
    }

    let mut seen = HashSet::with_capacity(ingredients.len());
    if !ingredients.iter().all(|i| seen.insert(i.id)) {
        errors.add("ingredients", "Ingredients must not repeat.");
        return None;
    }

    let mut out = Vec::with_capacity(ingredients.len());
    for item in ingredients {
        let amount = positive_i32(errors, "ingredients", item.amount)?;
        out.push(IngredientAmount {
            ingredient_id: item.id,
            amount,
        });
    }

    Some(out)
}

/// Every field is required on create.
pub fn validate_recipe_draft(req: RecipeRequest) -> Result<RecipeDraft, FieldErrors> {
    let mut errors = FieldErrors::new();

    let ingredients = check_ingredients(&mut errors, req.ingredients);
    let tag_ids = check_tags(&mut errors, req.tags);
    let image = required_text(&mut errors, "image", req.image, None);
    let name = required_text(&mut errors, "name", req.name, Some(RECIPE_NAME_MAX_LEN));
    let text = required_text(&mut errors, "text", req.text, None);
    let cooking_time = check_cooking_time(&mut errors, req.cooking_time);

    match (ingredients, tag_ids, image, name, text, cooking_time) {
        (Some(ingredients), Some(tag_ids), Some(image), Some(name), Some(text), Some(cooking_time))
            if errors.is_empty() =>
        {
            Ok(RecipeDraft {
                name,
                image,
                text,
                cooking_time,
                tag_ids,
                ingredients,
            })
        }
        _ => Err(errors),
    }
}

/// Absent fields stay untouched; present ones follow the create rules.
pub fn validate_recipe_patch(req: RecipeRequest) -> Result<RecipePatch, FieldErrors> {
    let mut errors = FieldErrors::new();

    let patch = RecipePatch {
        ingredients: req
            .ingredients
            .and_then(|list| check_ingredients(&mut errors, Some(list))),
        tag_ids: req.tags.and_then(|list| check_tags(&mut errors, Some(list))),
        image: req
            .image
            .and_then(|v| required_text(&mut errors, "image", Some(v), None)),
        name: req
            .name
            .and_then(|v| required_text(&mut errors, "name", Some(v), Some(RECIPE_NAME_MAX_LEN))),
        text: req
            .text
            .and_then(|v| required_text(&mut errors, "text", Some(v), None)),
        cooking_time: req
            .cooking_time
            .and_then(|v| check_cooking_time(&mut errors, Some(v))),
    };

    errors.into_result(patch)
}

/// Clamp a client `limit` into `1..=max`, falling back to `default`.
#[must_use]
pub fn clamp_page_size(limit: Option<&str>, default: u64, max: u64) -> u64 {
    match limit.and_then(|l| l.trim().parse::<u64>().ok()) {
        Some(0) | None => default,
        Some(n) => n.min(max),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::IngredientAmountRequest;

    fn signup() -> SignupRequest {
        SignupRequest {
            email: Some("cook@example.com".to_string()),
            username: Some("cook.book+1".to_string()),
            first_name: Some("Ada".to_string()),
            last_name: Some("Baker".to_string()),
            password: Some("s3cret-pass".to_string()),
        }
    }

    fn recipe() -> RecipeRequest {
        RecipeRequest {
            ingredients: Some(vec![
                IngredientAmountRequest { id: 1, amount: 200 },
                IngredientAmountRequest { id: 2, amount: 3 },
            ]),
            tags: Some(vec![1, 2]),
            image: Some("data:image/png;base64,AAAA".to_string()),
            name: Some("Pancakes".to_string()),
            text: Some("Mix and fry.".to_string()),
            cooking_time: Some(15),
        }
    }

    #[test]
    fn test_validate_id() {
        assert!(validate_id("Recipe", 1).is_ok());
        assert!(validate_id("Recipe", 0).is_err());
        assert!(validate_id("Recipe", -3).is_err());
    }

    #[test]
    fn test_validate_signup_accepts_valid_payload() {
        let user = validate_signup(signup()).unwrap();
        assert_eq!(user.email, "cook@example.com");
        assert_eq!(user.username, "cook.book+1");
    }

    #[test]
    fn test_validate_signup_reports_each_field() {
        let errors = validate_signup(SignupRequest::default()).unwrap_err();
        for field in ["email", "username", "first_name", "last_name", "password"] {
            assert_eq!(errors.get(field), Some(&[REQUIRED.to_string()][..]), "{field}");
        }
    }

    #[test]
    fn test_validate_signup_rejects_bad_username_and_email() {
        let mut req = signup();
        req.username = Some("no spaces!".to_string());
        req.email = Some("not-an-email".to_string());

        let errors = validate_signup(req).unwrap_err();
        assert!(errors.get("username").is_some());
        assert!(errors.get("email").is_some());
        assert!(errors.get("first_name").is_none());
    }

    #[test]
    fn test_validate_signup_length_limits() {
        let mut req = signup();
        req.first_name = Some("a".repeat(151));
        let errors = validate_signup(req).unwrap_err();
        assert!(errors.get("first_name").is_some());
    }

    #[test]
    fn test_validate_recipe_draft() {
        let draft = validate_recipe_draft(recipe()).unwrap();
        assert_eq!(draft.tag_ids, vec![1, 2]);
        assert_eq!(
            draft.ingredients[0],
            IngredientAmount {
                ingredient_id: 1,
                amount: 200
            }
        );
    }

    #[test]
    fn test_validate_recipe_draft_rejects_duplicates() {
        let mut req = recipe();
        req.ingredients = Some(vec![
            IngredientAmountRequest { id: 1, amount: 1 },
            IngredientAmountRequest { id: 1, amount: 2 },
        ]);
        req.tags = Some(vec![3, 3]);

        let errors = validate_recipe_draft(req).unwrap_err();
        assert!(errors.get("ingredients").is_some());
        assert!(errors.get("tags").is_some());
    }

    #[test]
    fn test_validate_recipe_draft_rejects_empty_and_small_values() {
        let mut req = recipe();
        req.ingredients = Some(vec![]);
        req.tags = Some(vec![]);
        req.cooking_time = Some(0);
        req.name = Some("   ".to_string());

        let errors = validate_recipe_draft(req).unwrap_err();
        assert_eq!(errors.get("ingredients"), Some(&[EMPTY_LIST.to_string()][..]));
        assert_eq!(errors.get("tags"), Some(&[EMPTY_LIST.to_string()][..]));
        assert_eq!(errors.get("cooking_time"), Some(&[MIN_ONE.to_string()][..]));
        assert_eq!(errors.get("name"), Some(&[BLANK.to_string()][..]));
    }

    #[test]
    fn test_validate_recipe_draft_rejects_zero_amount() {
        let mut req = recipe();
        req.ingredients = Some(vec![IngredientAmountRequest { id: 1, amount: 0 }]);
        let errors = validate_recipe_draft(req).unwrap_err();
        assert_eq!(errors.get("ingredients"), Some(&[MIN_ONE.to_string()][..]));
    }

    #[test]
    fn test_validate_recipe_patch_keeps_absent_fields() {
        let req = RecipeRequest {
            name: Some("Renamed".to_string()),
            ..RecipeRequest::default()
        };
        let patch = validate_recipe_patch(req).unwrap();
        assert_eq!(patch.name.as_deref(), Some("Renamed"));
        assert!(patch.ingredients.is_none());
        assert!(patch.tag_ids.is_none());
        assert!(patch.cooking_time.is_none());
    }

    #[test]
    fn test_validate_recipe_patch_checks_present_fields() {
        let req = RecipeRequest {
            ingredients: Some(vec![]),
            ..RecipeRequest::default()
        };
        assert!(validate_recipe_patch(req).is_err());
    }

    #[test]
    fn test_clamp_page_size() {
        assert_eq!(clamp_page_size(None, 6, 100), 6);
        assert_eq!(clamp_page_size(Some("10"), 6, 100), 10);
        assert_eq!(clamp_page_size(Some("1000"), 6, 100), 100);
        assert_eq!(clamp_page_size(Some("0"), 6, 100), 6);
        assert_eq!(clamp_page_size(Some("abc"), 6, 100), 6);
    }
}
