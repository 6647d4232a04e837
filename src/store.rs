// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory drink store.
//!
//! Ids are assigned sequentially from 1 and never reused. Titles are unique.

use std::collections::BTreeMap;

use crate::error::ApiError;
use crate::models::{Drink, RecipePart, UpdateDrinkRequest};

#[derive(Default)]
pub struct InMemoryStore {
    drinks: BTreeMap<i64, Drink>,
    last_id: i64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding the sample drink served on first run.
    pub fn with_sample_drink() -> Self {
        let mut store = Self::new();
        // Seeding an empty store cannot collide.
        let _ = store.create_drink(
            "water".to_string(),
            vec![RecipePart {
                name: "water".to_string(),
                color: "blue".to_string(),
                parts: 1,
            }],
        );
        store
    }

    /// All drinks, ordered by id.
    pub fn list_drinks(&self) -> Vec<Drink> {
        self.drinks.values().cloned().collect()
    }

    pub fn get_drink(&self, id: i64) -> Result<Drink, ApiError> {
        self.drinks.get(&id).cloned().ok_or_else(ApiError::not_found)
    }

    fn title_taken(&self, title: &str, except: Option<i64>) -> bool {
        self.drinks
            .values()
            .any(|d| d.title == title && Some(d.id) != except)
    }

    fn validate(title: &str, recipe: &[RecipePart]) -> Result<(), ApiError> {
        if title.trim().is_empty() || recipe.is_empty() {
            return Err(ApiError::unprocessable());
        }
        Ok(())
    }

    pub fn create_drink(&mut self, title: String, recipe: Vec<RecipePart>) -> Result<Drink, ApiError> {
        Self::validate(&title, &recipe)?;
        if self.title_taken(&title, None) {
            return Err(ApiError::unprocessable());
        }

        self.last_id += 1;
        let drink = Drink {
            id: self.last_id,
            title,
            recipe,
        };
        self.drinks.insert(drink.id, drink.clone());
        Ok(drink)
    }

    pub fn update_drink(&mut self, id: i64, update: UpdateDrinkRequest) -> Result<Drink, ApiError> {
        let current = self.get_drink(id)?;

        let title = update.title.unwrap_or(current.title);
        let recipe = update
            .recipe
            .map(|r| r.into_parts())
            .unwrap_or(current.recipe);

        Self::validate(&title, &recipe)?;
        if self.title_taken(&title, Some(id)) {
            return Err(ApiError::unprocessable());
        }

        let drink = Drink { id, title, recipe };
        self.drinks.insert(id, drink.clone());
        Ok(drink)
    }

    pub fn delete_drink(&mut self, id: i64) -> Result<(), ApiError> {
        if self.drinks.remove(&id).is_some() {
            Ok(())
        } else {
            Err(ApiError::not_found())
        }
    }
}
