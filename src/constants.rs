pub mod traffic {

    /// Bytes per gigabyte as the panel counts them (2^30).
    pub const BYTES_PER_GB: i64 = 1 << 30;

    pub const DEFAULT_LIMIT_GB: f64 = 100.0;

    pub const DEFAULT_LIMIT_BYTES: i64 = 100 * BYTES_PER_GB;
}

pub mod token {
    use jsonwebtoken::Algorithm;

    pub const ALGORITHM: Algorithm = Algorithm::HS256;

    pub const VALIDITY_DAYS: i64 = 7;

    pub const TOKEN_TYPE: &str = "bearer";
}

pub mod limits {

    pub const DEFAULT_PAGE_SIZE: u64 = 100;

    pub const MAX_PAGE_SIZE: u64 = 1000;

    pub const MAX_PASSWORD_BYTES: usize = 4096;

    /// Applies to API-managed accounts and the configured administrator alike
    pub const MIN_PASSWORD_CHARS: usize = 6;
}
