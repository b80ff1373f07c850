pub(crate) const BASE_URL_GLOBAL: &str = "__TXNBOARD_BASE_URL__";
pub(crate) const POLL_MS_GLOBAL: &str = "__TXNBOARD_POLL_MS__";
pub(crate) const LOG_LEVEL_GLOBAL: &str = "__TXNBOARD_LOG_LEVEL__";
pub(crate) const PHONE_COMMIT_EVENT: &str = "change";
pub(crate) const BADGE_CLICK_EVENT: &str = "click";
pub(crate) const SEARCH_INPUT_EVENT: &str = "input";
pub(crate) const ROW_TAG: &str = "tr";
pub(crate) const JSON_CONTENT_TYPE: &str = "application/json";
