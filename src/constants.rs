pub mod paths {
    /// Public URL prefix that uploaded photos are served under.
    pub const PHOTO_URL_PREFIX: &str = "/user_profile";

    /// Placeholder shown when a student has no photo.
    pub const DEFAULT_PROFILE_IMAGE: &str = "/images/user-profile.jpg";

    pub const LOGIN: &str = "/student/login";

    pub const DASHBOARD: &str = "/student/dashboard";
}

pub mod session {

    pub const COOKIE_NAME: &str = "complaint_desk_session";

    /// Session key holding the authenticated student's email.
    pub const STUDENT_KEY: &str = "student_email";

    pub const FLASH_KEY: &str = "flash";
}

pub mod limits {

    pub const MAX_FIELD_LEN: usize = 120;

    pub const MAX_DESCRIPTION_LEN: usize = 5000;

    pub const MAX_FILENAME_LEN: usize = 100;

    /// Attempts at finding a free photo filename before giving up.
    pub const PHOTO_NAME_ATTEMPTS: u32 = 8;
}

pub const PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];
