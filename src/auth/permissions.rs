// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Permission strings and the permission check.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{AuthError, Claims};

/// Permissions configured on the Auth0 API for the drinks service.
///
/// - `GetDrinksDetail` - read full recipes (barista, manager)
/// - `PostDrinks` - create drinks (manager)
/// - `PatchDrinks` - edit drinks (manager)
/// - `DeleteDrinks` - delete drinks (manager)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Permission {
    #[serde(rename = "get:drinks-detail")]
    GetDrinksDetail,
    #[serde(rename = "post:drinks")]
    PostDrinks,
    #[serde(rename = "patch:drinks")]
    PatchDrinks,
    #[serde(rename = "delete:drinks")]
    DeleteDrinks,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::GetDrinksDetail => "get:drinks-detail",
            Permission::PostDrinks => "post:drinks",
            Permission::PatchDrinks => "patch:drinks",
            Permission::DeleteDrinks => "delete:drinks",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Confirm `claims` grant `permission`.
///
/// A token without a `permissions` claim means RBAC is not enabled for the
/// API in Auth0, which is reported separately from a missing grant.
pub fn check_permissions(permission: &str, claims: &Claims) -> Result<(), AuthError> {
    let granted = claims.permissions().ok_or(AuthError::PermissionsMissing)?;

    if !granted.contains(permission) {
        return Err(AuthError::Unauthorized);
    }

    Ok(())
}
