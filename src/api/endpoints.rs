pub const LEADERS: &str = "/leaders";
pub const LEADERS_REORDER: &str = "/leaders/reorder";

pub const SERVICES: &str = "/services";
pub const SERVICE_CATEGORIES: &str = "/services/categories";
pub const SUB_SERVICES: &str = "/services/sub-services";
pub const SUB_SERVICES_ALL: &str = "/services/sub-services/all";
pub const SUB_SERVICES_REORDER: &str = "/services/sub-services/reorder";

pub const CONVERSATIONS: &str = "/chat/conversations";

pub const CONTACT: &str = "/contact";
pub const INSIGHTS: &str = "/insights";

pub const AUTH_LOGIN: &str = "/auth/login";
pub const AUTH_ME: &str = "/auth/me";
pub const AUTH_PROFILE: &str = "/auth/profile";
pub const AUTH_CHANGE_PASSWORD: &str = "/auth/change-password";

pub fn leader(id: &str) -> String {
    format!("{}/{}", LEADERS, id)
}

pub fn sub_service(id: &str) -> String {
    format!("{}/{}", SUB_SERVICES, id)
}

pub fn sub_service_toggle(id: &str) -> String {
    format!("{}/{}/toggle-status", SUB_SERVICES, id)
}

pub fn conversation_message(conversation_id: &str) -> String {
    format!("{}/{}/message", CONVERSATIONS, conversation_id)
}
