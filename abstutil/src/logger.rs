/// Intercept messages using the `log` crate and print them to STDERR. Defaults to the `info`
/// level; override with `RUST_LOG`.
pub fn setup() {
    use env_logger::{Builder, Env};
    Builder::from_env(Env::default().default_filter_or("info")).init();
}

/// Like `setup`, but safe to call more than once. Meant for tests.
pub fn setup_for_tests() {
    use env_logger::{Builder, Env};
    let _ = Builder::from_env(Env::default().default_filter_or("info"))
        .is_test(true)
        .try_init();
}
