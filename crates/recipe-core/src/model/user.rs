use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Display;

use super::recipe::{Category, RecipeId};

/// Type-safe identifier for users.
///
/// Profiles are stored under the uid the identity provider assigned, so this is
/// the same string the provider hands out.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl From<u32> for UserId {
    fn from(id: u32) -> Self {
        Self(format!("user_{id}"))
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Customer,
    Admin,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    #[default]
    Beginner,
    Intermediate,
    Expert,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementUnit {
    #[default]
    Metric,
    Imperial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DietaryRestriction {
    Vegetarian,
    Vegan,
    GlutenFree,
    DairyFree,
    NutFree,
    Keto,
    LowCarb,
    Halal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CookingStyle {
    QuickMeals,
    Healthy,
    ComfortFood,
    Gourmet,
    BudgetFriendly,
    MealPrep,
}

/// Cooking preferences. The default is what a freshly provisioned profile gets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub dietary_restrictions: BTreeSet<DietaryRestriction>,
    pub favorite_categories: Vec<Category>,
    pub skill_level: SkillLevel,
    pub cooking_style: BTreeSet<CookingStyle>,
    pub measurement_unit: MeasurementUnit,
}

/// A user's profile record, keyed by the identity provider's uid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default)]
    pub role: Role,
    pub preferences: Preferences,
    #[serde(default)]
    pub favorite_recipes: Vec<RecipeId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn from_create(id: UserId, params: ProfileCreate) -> Self {
        Self {
            id,
            email: params.email,
            name: params.name,
            profile_image: params.profile_image,
            bio: None,
            role: params.role,
            preferences: params.preferences,
            favorite_recipes: Vec::new(),
            created_at: params.created_at,
            updated_at: params.created_at,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn has_favorite(&self, recipe: &RecipeId) -> bool {
        self.favorite_recipes.contains(recipe)
    }
}

/// Create payload for the `profiles` collection.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileCreate {
    pub email: String,
    pub name: String,
    pub profile_image: Option<String>,
    pub role: Role,
    pub preferences: Preferences,
    pub created_at: DateTime<Utc>,
}

impl ProfileCreate {
    /// Defaults for an identity signing in without a profile record.
    ///
    /// The name falls back from the display name to the local part of the email
    /// and finally to `"User"`.
    pub fn provisioned(
        email: &str,
        display_name: Option<&str>,
        photo_url: Option<&str>,
        now: DateTime<Utc>,
    ) -> Self {
        let name = display_name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .or_else(|| email.split('@').next().filter(|local| !local.is_empty()))
            .unwrap_or("User")
            .to_string();

        Self {
            email: email.to_string(),
            name,
            profile_image: photo_url.map(str::to_string),
            role: Role::Customer,
            preferences: Preferences::default(),
            created_at: now,
        }
    }
}

/// Partial profile update. Unset fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub profile_image: Option<String>,
    pub preferences: Option<Preferences>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provisioned_name_prefers_display_name() {
        let now = Utc::now();
        let p = ProfileCreate::provisioned("ann@example.com", Some("Ann Lee"), None, now);
        assert_eq!(p.name, "Ann Lee");
        assert_eq!(p.role, Role::Customer);
        assert_eq!(p.preferences.skill_level, SkillLevel::Beginner);
        assert_eq!(p.preferences.measurement_unit, MeasurementUnit::Metric);
        assert!(p.preferences.dietary_restrictions.is_empty());
    }

    #[test]
    fn test_provisioned_name_falls_back_to_email_then_user() {
        let now = Utc::now();
        let p = ProfileCreate::provisioned("chef@example.com", Some("  "), None, now);
        assert_eq!(p.name, "chef");

        let p = ProfileCreate::provisioned("@example.com", None, None, now);
        assert_eq!(p.name, "User");
    }

    #[test]
    fn test_profile_serializes_with_camel_case_keys() {
        let profile = UserProfile::from_create(
            UserId::from("u1"),
            ProfileCreate::provisioned("a@b.c", None, None, Utc::now()),
        );
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["id"], "u1");
        assert_eq!(json["role"], "customer");
        assert_eq!(json["preferences"]["skillLevel"], "beginner");
        assert!(json["favoriteRecipes"].as_array().unwrap().is_empty());
    }
}
