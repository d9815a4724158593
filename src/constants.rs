pub mod quotes {

    pub const DEFAULT_FETCH_COUNT: u32 = 12;
}

pub mod retry {
    use std::time::Duration;

    pub const MAX_AUTH_ATTEMPTS: u32 = 3;

    pub const AUTH_BACKOFF: Duration = Duration::from_secs(2);
}

pub mod auth {

    pub const MIN_PASSWORD_LENGTH: usize = 6;
}
