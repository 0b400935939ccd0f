//! User Listing Filter
//!
//! Search, ordering and paging for the admin user listing.

use kernel::error::app_error::{AppError, AppResult};

use crate::domain::value_object::user_role::UserRole;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Whitelisted ordering columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    Name,
    Email,
    Role,
    #[default]
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "name" => Some(SortField::Name),
            "email" => Some(SortField::Email),
            "role" => Some(SortField::Role),
            "created_at" => Some(SortField::CreatedAt),
            "updated_at" => Some(SortField::UpdatedAt),
            _ => None,
        }
    }

    /// Column name in the `users` table
    pub const fn column(&self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Email => "email",
            SortField::Role => "user_role",
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub const fn keyword(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Raw listing parameters as they arrive from a caller
#[derive(Debug, Clone, Default)]
pub struct UserFilterParams {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Validated listing filter
///
/// Text filters are case-insensitive substring matches. Paging is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserFilter {
    name: Option<String>,
    email: Option<String>,
    role: Option<UserRole>,
    sort_by: SortField,
    sort_order: SortOrder,
    page: u32,
    limit: u32,
}

impl Default for UserFilter {
    fn default() -> Self {
        Self {
            name: None,
            email: None,
            role: None,
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Empty or blank text counts as absent
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl UserFilter {
    /// Validate the ordering and role, clamp the paging
    pub fn new(params: UserFilterParams) -> AppResult<Self> {
        let sort_by = match non_blank(params.sort_by) {
            None => SortField::default(),
            Some(code) => SortField::from_code(&code).ok_or_else(|| {
                AppError::bad_request("Invalid sort_by field")
                    .with_action("Use one of: name, email, role, created_at, updated_at")
            })?,
        };

        let sort_order = match non_blank(params.sort_order).as_deref() {
            None => SortOrder::default(),
            Some("asc") => SortOrder::Asc,
            Some("desc") => SortOrder::Desc,
            Some(_) => return Err(AppError::bad_request("sort_order must be 'asc' or 'desc'")),
        };

        let role = match non_blank(params.role) {
            None => None,
            Some(code) => Some(
                UserRole::from_code(&code)
                    .ok_or_else(|| AppError::bad_request("Role must be 'admin' or 'user'"))?,
            ),
        };

        let page = params.page.filter(|p| *p >= 1).unwrap_or(1);
        let limit = params
            .limit
            .filter(|l| *l >= 1)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .min(MAX_PAGE_SIZE);

        Ok(Self {
            name: non_blank(params.name),
            email: non_blank(params.email),
            role,
            sort_by,
            sort_order,
            page,
            limit,
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn role(&self) -> Option<UserRole> {
        self.role
    }

    pub fn sort_by(&self) -> SortField {
        self.sort_by
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Rows skipped before this page
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}
