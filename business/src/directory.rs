//! Observable state for the user directory screen.
//!
//! Pagination, dedup and form validation all live here as plain
//! synchronous methods; commands call them through the updater after
//! network work completes, so every transition is visible to subscribers
//! in order.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use roster_states::{State, state_assign_impl};

use crate::api::NewUser;
use crate::error::ApiError;
use crate::models::{PagedUsers, Position, User};
use crate::validation::{email_valid, name_valid, phone_valid};

#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryState {
    /// Users in display order: newest registrations first within a page
    /// refresh, appended pages after.
    pub users: Vec<User>,
    /// Every user ever fetched, by id. Display entries resolve through
    /// here so a refetched user shows its latest values.
    pub user_cache: HashMap<i64, User>,
    pub positions: Vec<Position>,

    pub is_loading: bool,
    pub is_loading_more: bool,
    /// Last page merged; 0 before the first load.
    pub current_page: u32,
    pub total_pages: u32,
    pub has_more_data: bool,
    pub error_message: Option<String>,
    pub last_loaded_at: Option<DateTime<Utc>>,

    // Sign-up form.
    pub name: String,
    pub email: String,
    pub phone: String,
    pub selected_position_id: i64,
    pub has_attempted_sign_up: bool,
    pub name_field_valid: bool,
    pub email_field_valid: bool,
    pub phone_field_valid: bool,
    pub photo_field_valid: bool,
}

impl Default for DirectoryState {
    fn default() -> Self {
        Self {
            users: Vec::new(),
            user_cache: HashMap::new(),
            positions: Vec::new(),
            is_loading: false,
            is_loading_more: false,
            current_page: 0,
            total_pages: 1,
            has_more_data: true,
            error_message: None,
            last_loaded_at: None,
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            selected_position_id: 1,
            has_attempted_sign_up: false,
            name_field_valid: true,
            email_field_valid: true,
            phone_field_valid: true,
            photo_field_valid: true,
        }
    }
}

impl DirectoryState {
    pub fn begin_loading(&mut self) {
        self.is_loading = true;
        self.error_message = None;
    }

    pub fn begin_loading_more(&mut self) {
        self.is_loading_more = true;
        self.error_message = None;
    }

    /// Whether a load-more request may start.
    pub fn can_load_more(&self) -> bool {
        !self.is_loading
            && !self.is_loading_more
            && self.has_more_data
            && self.current_page < self.total_pages
    }

    /// Merge one fetched page. Page 1 replaces the list, later pages
    /// append; duplicates by id are dropped. `requested_count` decides
    /// `has_more_data`: a short page means the list is exhausted.
    pub fn merge_page(&mut self, page: &PagedUsers, requested_count: u32, now: DateTime<Utc>) {
        for user in &page.users {
            self.user_cache.insert(user.id, user.clone());
        }

        if page.page <= 1 {
            self.users.clear();
        }
        let mut seen: HashSet<i64> = self.users.iter().map(|u| u.id).collect();
        for user in &page.users {
            if seen.insert(user.id) {
                let resolved = self.user_cache.get(&user.id).unwrap_or(user).clone();
                self.users.push(resolved);
            }
        }

        self.current_page = page.page;
        self.total_pages = page.total_pages;
        self.has_more_data = page.users.len() as u32 == requested_count;
        self.is_loading = false;
        self.is_loading_more = false;
        self.last_loaded_at = Some(now);
    }

    /// Record a failed fetch. Already displayed users stay put.
    pub fn fail(&mut self, error: &ApiError) {
        self.fail_message(error.user_message());
    }

    pub fn fail_message(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
        self.is_loading = false;
        self.is_loading_more = false;
    }

    /// Prepend a freshly registered user, replacing any stale copy.
    pub fn insert_new_user(&mut self, user: User) {
        self.user_cache.insert(user.id, user.clone());
        self.users.retain(|u| u.id != user.id);
        self.users.insert(0, user);
        self.is_loading = false;
        self.error_message = None;
    }

    pub fn set_positions(&mut self, positions: Vec<Position>) {
        if let Some(first) = positions.first()
            && !positions.iter().any(|p| p.id == self.selected_position_id)
        {
            self.selected_position_id = first.id;
        }
        self.positions = positions;
        self.is_loading = false;
        self.is_loading_more = false;
    }

    /// Recompute per-field validity flags and mark the form as attempted.
    /// Returns true when name, email, phone and photo all pass. Photo
    /// validity is set by the caller before this runs since the bytes
    /// live outside this state.
    pub fn validate_fields(&mut self) -> bool {
        self.has_attempted_sign_up = true;
        self.name_field_valid = name_valid(&self.name);
        self.email_field_valid = email_valid(&self.email);
        self.phone_field_valid = phone_valid(&self.phone);
        self.name_field_valid
            && self.email_field_valid
            && self.phone_field_valid
            && self.photo_field_valid
    }

    /// Current form contents as a registration request.
    pub fn new_user_fields(&self) -> NewUser {
        NewUser {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            position_id: self.selected_position_id,
        }
    }
}

impl State for DirectoryState {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }

    fn snapshot(&self) -> Option<Box<dyn std::any::Any + Send>> {
        Some(Box::new(self.clone()))
    }

    fn assign_box(&mut self, new_self: Box<dyn std::any::Any + Send>) {
        state_assign_impl(self, new_self);
    }
}
