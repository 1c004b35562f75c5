pub mod viewport {
    /// Widths up to and including this get the 120p tier in auto mode
    pub const SMALL_MAX_WIDTH: u32 = 480;
    pub const MEDIUM_MAX_WIDTH: u32 = 768;
    pub const LARGE_MAX_WIDTH: u32 = 1366;
}

pub mod seeking {
    pub const SEEK_STEP_SECS: f64 = 10.0;
}

pub mod restore {
    /// Delay before re-checking that a post-switch seek took effect
    pub const BACKSTOP_DELAY_MS: u64 = 100;
    /// Surface positions at or below this count as "still at zero"
    pub const POSITION_EPSILON: f64 = 0.05;
}

pub mod routes {
    pub const PROGRESS: &str = "progress/";
}

pub mod files {
    pub const CONFIG_DIR: &str = "videoflix-player";
    pub const CONFIG_FILE: &str = "config.json";
}

pub mod env {
    pub const SERVER_URL: &str = "VIDEOFLIX_SERVER_URL";
    pub const CHECKPOINT_ON_UNLOAD: &str = "VIDEOFLIX_CHECKPOINT_ON_UNLOAD";
}
