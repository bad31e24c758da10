//! Recipe entity
//!
//! The list-heaviest kind: ingredients, instructions, tags and meal types are
//! all edited as one line per item.

use serde::{Deserialize, Serialize};

use crate::error::ValidationErrors;
use crate::form::{FieldReader, FieldSpec, FieldWidget, FormFields};
use crate::kind::ResourceKind;
use crate::resource::Resource;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Recipe {
    pub id: u32,
    pub name: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub prep_time_minutes: u32,
    pub cook_time_minutes: u32,
    pub servings: u32,
    pub difficulty: String,
    pub cuisine: String,
    pub calories_per_serving: u32,
    pub tags: Vec<String>,
    pub user_id: u32,
    pub image: String,
    pub rating: f64,
    pub meal_type: Vec<String>,
}

impl Recipe {
    pub fn total_calories(&self) -> u32 {
        self.calories_per_serving.saturating_mul(self.servings)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDraft {
    pub name: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub prep_time_minutes: u32,
    pub cook_time_minutes: u32,
    pub servings: u32,
    pub difficulty: String,
    pub cuisine: String,
    pub calories_per_serving: u32,
    pub tags: Vec<String>,
    pub rating: f64,
    pub meal_type: Vec<String>,
}

/// `Resource` binding for recipes
pub struct Recipes;

impl Resource for Recipes {
    const KIND: ResourceKind = ResourceKind::Recipe;
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("name", "Name", FieldWidget::Text).required("Name is required."),
        FieldSpec::new("difficulty", "Difficulty", FieldWidget::Text).required("Difficulty is required."),
        FieldSpec::new("prepTimeMinutes", "Preparation Time (min)", FieldWidget::Number)
            .required("Preparation time is required."),
        FieldSpec::new("cookTimeMinutes", "Cooking Time (min)", FieldWidget::Number)
            .required("Cooking Time is required."),
        FieldSpec::new("servings", "Servings", FieldWidget::Number).required("Servings amount is required."),
        FieldSpec::new("cuisine", "Cuisine", FieldWidget::Text).required("Cuisine is required."),
        FieldSpec::new("caloriesPerServing", "Calories/Serving", FieldWidget::Number)
            .required("Cal/serving amount is required."),
        FieldSpec::new("rating", "Rating", FieldWidget::Number).required("Rating is required."),
        FieldSpec::new("ingredients", "Ingredients", FieldWidget::List).required("Ingredients is required."),
        FieldSpec::new("instructions", "Instructions", FieldWidget::List).required("Instructions is required."),
        FieldSpec::new("mealType", "Meal Type", FieldWidget::List).required("Meal type is required."),
        FieldSpec::new("tags", "Tags", FieldWidget::List).required("Tags is required."),
    ];

    type Entity = Recipe;
    type Draft = RecipeDraft;

    fn entity_id(entity: &Recipe) -> u32 {
        entity.id
    }

    fn title(entity: &Recipe) -> String {
        entity.name.clone()
    }

    fn detail_rows(entity: &Recipe) -> Vec<(&'static str, String)> {
        let mut rows = vec![
            ("Total calories", entity.total_calories().to_string()),
            ("Author", format!("User #{}", entity.user_id)),
        ];
        if !entity.image.is_empty() {
            rows.push(("Image", entity.image.clone()));
        }
        rows
    }

    fn to_form_fields(entity: &Recipe) -> FormFields {
        let mut fields = FormFields::new()
            .with("name", entity.name.as_str())
            .with("difficulty", entity.difficulty.as_str())
            .with("prepTimeMinutes", entity.prep_time_minutes.to_string())
            .with("cookTimeMinutes", entity.cook_time_minutes.to_string())
            .with("servings", entity.servings.to_string())
            .with("cuisine", entity.cuisine.as_str())
            .with("caloriesPerServing", entity.calories_per_serving.to_string())
            .with("rating", entity.rating.to_string());
        fields.set_list("ingredients", &entity.ingredients);
        fields.set_list("instructions", &entity.instructions);
        fields.set_list("mealType", &entity.meal_type);
        fields.set_list("tags", &entity.tags);
        fields
    }

    fn from_form_fields(fields: &FormFields, _previous: Option<&Recipe>) -> Result<RecipeDraft, ValidationErrors> {
        let mut reader = FieldReader::new(fields, Self::FIELDS);
        let draft = RecipeDraft {
            name: reader.text("name"),
            ingredients: reader.list("ingredients"),
            instructions: reader.list("instructions"),
            prep_time_minutes: reader.number("prepTimeMinutes"),
            cook_time_minutes: reader.number("cookTimeMinutes"),
            servings: reader.number("servings"),
            difficulty: reader.text("difficulty"),
            cuisine: reader.text("cuisine"),
            calories_per_serving: reader.number("caloriesPerServing"),
            tags: reader.list("tags"),
            rating: reader.number("rating"),
            meal_type: reader.list("mealType"),
        };
        reader.finish(draft)
    }
}
