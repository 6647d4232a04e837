// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response structures for the drinks API. All types derive
//! `Serialize`/`Deserialize` and `ToSchema` for JSON handling and OpenAPI
//! documentation.
//!
//! A drink has two representations:
//!
//! - **short**: recipe parts as `{color, parts}` only, for the public menu
//! - **long**: full recipe including ingredient names

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Drink Models
// =============================================================================

/// One ingredient of a drink recipe.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct RecipePart {
    /// Ingredient name.
    pub name: String,
    /// Display color (CSS color string).
    pub color: String,
    /// Relative amount.
    pub parts: u32,
}

/// Recipe part without the ingredient name.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ShortRecipePart {
    pub color: String,
    pub parts: u32,
}

impl From<&RecipePart> for ShortRecipePart {
    fn from(part: &RecipePart) -> Self {
        Self {
            color: part.color.clone(),
            parts: part.parts,
        }
    }
}

/// A drink on the menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drink {
    pub id: i64,
    /// Unique, non-empty title.
    pub title: String,
    pub recipe: Vec<RecipePart>,
}

impl Drink {
    pub fn short(&self) -> DrinkShort {
        DrinkShort {
            id: self.id,
            title: self.title.clone(),
            recipe: self.recipe.iter().map(ShortRecipePart::from).collect(),
        }
    }

    pub fn long(&self) -> DrinkLong {
        DrinkLong {
            id: self.id,
            title: self.title.clone(),
            recipe: self.recipe.clone(),
        }
    }
}

/// Public representation of a drink.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct DrinkShort {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<ShortRecipePart>,
}

/// Full representation of a drink.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct DrinkLong {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<RecipePart>,
}

/// A recipe given either as one part or a list of parts.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(untagged)]
pub enum RecipeInput {
    One(RecipePart),
    Many(Vec<RecipePart>),
}

impl RecipeInput {
    pub fn into_parts(self) -> Vec<RecipePart> {
        match self {
            RecipeInput::One(part) => vec![part],
            RecipeInput::Many(parts) => parts,
        }
    }
}

/// Request to create a drink.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateDrinkRequest {
    pub title: String,
    pub recipe: RecipeInput,
}

/// Request to update a drink. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateDrinkRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub recipe: Option<RecipeInput>,
}

// =============================================================================
// Response Envelopes
// =============================================================================

/// `{"success": true, "drinks": [...]}` with short drinks.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct MenuResponse {
    pub success: bool,
    pub drinks: Vec<DrinkShort>,
}

/// `{"success": true, "drinks": [...]}` with long drinks.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct DrinkDetailsResponse {
    pub success: bool,
    pub drinks: Vec<DrinkLong>,
}

impl MenuResponse {
    pub fn new(drinks: Vec<DrinkShort>) -> Self {
        Self {
            success: true,
            drinks,
        }
    }
}

impl DrinkDetailsResponse {
    pub fn new(drinks: Vec<DrinkLong>) -> Self {
        Self {
            success: true,
            drinks,
        }
    }
}

/// `{"success": true, "delete": id}`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct DeleteResponse {
    pub success: bool,
    pub delete: i64,
}
