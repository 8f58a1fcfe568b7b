// ── Hub Atoms: Constants ───────────────────────────────────────────────────
// Named constants shared by the store, the access rules and the HTTP layer.

// ── Built-in Owner role ───────────────────────────────────────────────────
// Created by schema setup and never renamed or deleted. Access checks compare
// role ids, so the id is the stable identifier; the name is only for display.
pub const OWNER_ROLE_ID: &str = "owner";
pub const OWNER_ROLE_NAME: &str = "Owner";

// ── Pagination ────────────────────────────────────────────────────────────
pub const DEFAULT_PER_PAGE: u32 = 12;
pub const MAX_PER_PAGE: u32 = 100;

// ── Field limits (characters) ─────────────────────────────────────────────
pub const MAX_NAME_LEN: usize = 120;
pub const MAX_DESCRIPTION_LEN: usize = 2000;
pub const MAX_URL_LEN: usize = 2048;
pub const MAX_ICON_LEN: usize = 16;
pub const MAX_EMAIL_LEN: usize = 254;
