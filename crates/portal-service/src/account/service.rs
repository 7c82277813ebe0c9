//! Account management: listing, pausing, activating and deleting accounts.

use std::sync::Arc;

use tracing::{info, warn};

use portal_core::config::PaginationConfig;
use portal_core::error::AppError;
use portal_core::traits::Service;
use portal_core::types::{PageRequest, PageResponse, UserId};
use portal_database::UserStore;
use portal_entity::user::{AccountFilter, User, UserStatus};

use crate::context::ActorContext;

/// Handles superadmin account operations.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserStore>,
    pagination: PaginationConfig,
}

impl Service for AccountService {}

impl AccountService {
    pub fn new(users: Arc<dyn UserStore>, pagination: PaginationConfig) -> Self {
        Self { users, pagination }
    }

    /// Accounts matching `filter`, newest first. The caller never appears.
    pub async fn list_accounts(
        &self,
        ctx: &ActorContext,
        filter: AccountFilter,
        page: PageRequest,
    ) -> Result<PageResponse<User>, AppError> {
        ctx.require_superadmin()?;
        let page = PageRequest::new(
            page.page,
            page.page_size.min(self.pagination.max_page_size),
        );
        self.users
            .list_accounts(&filter.excluding(ctx.user_id), &page)
            .await
    }

    pub async fn get_account(&self, ctx: &ActorContext, user_id: UserId) -> Result<User, AppError> {
        ctx.require_self_or_superadmin(user_id)?;
        self.users
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Whether the account exists and is active.
    pub async fn is_active(&self, user_id: UserId) -> Result<bool, AppError> {
        Ok(self
            .users
            .find_user(user_id)
            .await?
            .is_some_and(|u| u.is_active()))
    }

    pub async fn pause_user(&self, ctx: &ActorContext, user_id: UserId) -> Result<User, AppError> {
        ctx.require_superadmin()?;
        if user_id == ctx.user_id {
            warn!(admin_id = %ctx.user_id, "Refused to pause own account");
            return Err(AppError::self_action_forbidden(
                "You cannot pause your own account.",
            ));
        }
        let user = self.users.set_user_status(user_id, UserStatus::Paused).await?;
        info!(admin_id = %ctx.user_id, target_id = %user_id, "User account paused");
        Ok(user)
    }

    pub async fn activate_user(
        &self,
        ctx: &ActorContext,
        user_id: UserId,
    ) -> Result<User, AppError> {
        ctx.require_superadmin()?;
        if user_id == ctx.user_id {
            warn!(admin_id = %ctx.user_id, "Refused to activate own account");
            return Err(AppError::self_action_forbidden(
                "You cannot activate your own account.",
            ));
        }
        let user = self.users.set_user_status(user_id, UserStatus::Active).await?;
        info!(admin_id = %ctx.user_id, target_id = %user_id, "User account activated");
        Ok(user)
    }

    /// Hard delete. A deleted supervisor's students become unassigned.
    pub async fn delete_user(&self, ctx: &ActorContext, user_id: UserId) -> Result<User, AppError> {
        ctx.require_superadmin()?;
        if user_id == ctx.user_id {
            warn!(admin_id = %ctx.user_id, "Refused to delete own account");
            return Err(AppError::self_action_forbidden(
                "You cannot delete your own account.",
            ));
        }
        let user = self.users.delete_user(user_id).await?;
        info!(
            admin_id = %ctx.user_id,
            target_id = %user_id,
            role = %user.role,
            "User account deleted"
        );
        Ok(user)
    }
}
